use criterion::{criterion_group, criterion_main, Criterion};

use wiregen::{build_tree, Element, ElementKind, Rect};

/// Synthetic wireframe: a grid of containers, each holding a button and a
/// text label, so the builder sees three nesting levels and plenty of
/// sibling candidates.
fn grid_elements(cols: usize, rows: usize) -> Vec<Element> {
    let mut elements = Vec::with_capacity(cols * rows * 3);
    for row in 0..rows {
        for col in 0..cols {
            let x = (col * 120) as f64;
            let y = (row * 80) as f64;
            let idx = row * cols + col;
            elements.push(Element::new(
                format!("card_{}", idx),
                ElementKind::Container,
                Rect::new(x, y, 110.0, 70.0),
            ));
            elements.push(Element::new(
                format!("btn_{}", idx),
                ElementKind::Button,
                Rect::new(x + 10.0, y + 40.0, 50.0, 20.0),
            ));
            elements.push(Element::new(
                format!("lbl_{}", idx),
                ElementKind::Text,
                Rect::new(x + 10.0, y + 10.0, 80.0, 12.0),
            ));
        }
    }
    elements
}

fn bench_build_tree(c: &mut Criterion) {
    let small = grid_elements(4, 4);
    let large = grid_elements(12, 12);

    c.bench_function("build_tree_48_elements", |b| {
        b.iter(|| build_tree(&small, 2.0).unwrap())
    });

    c.bench_function("build_tree_432_elements", |b| {
        b.iter(|| build_tree(&large, 2.0).unwrap())
    });
}

criterion_group!(benches, bench_build_tree);
criterion_main!(benches);
