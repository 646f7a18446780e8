//! Containment-tree construction over detected elements.
//!
//! This is the one pure-computation stage of the pipeline: it takes the flat
//! element list from detection and nests it by geometric containment. The
//! result is a single tree rooted at a synthetic document-root element whose
//! bounds are the union of everything detected.
//!
//! Parentage rules:
//! - an element's direct parent is the smallest-area element that contains
//!   its box (with a tolerance margin for detection noise) and is strictly
//!   larger, so the innermost container wins;
//! - identical boxes parent by detection order, earlier wins;
//! - equal-area candidates tie-break by detection order;
//! - overlapping-but-not-nested boxes are regrouped as siblings under the
//!   smallest element containing their union, or under the root.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::element::{Element, ElementKind};
use crate::error::Result;
use crate::geometry::Rect;

/// Identifier of the synthetic document root.
pub const ROOT_ID: &str = "root";

/// A node of the containment tree: one element plus its nested children in
/// visual reading order (top-to-bottom, then left-to-right).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyNode {
    pub element: Element,
    pub children: Vec<HierarchyNode>,
}

impl HierarchyNode {
    /// Total number of nodes in this subtree, the root included.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(HierarchyNode::node_count).sum::<usize>()
    }
}

/// Build the containment tree for a flat element list.
///
/// Pure function: the same input order always yields the same tree. Fails
/// with a validation error naming the first malformed element; no partial
/// recovery is attempted. An empty input yields a root with no children.
pub fn build_tree(elements: &[Element], tolerance: f64) -> Result<HierarchyNode> {
    for el in elements {
        el.validate()?;
    }

    let root_bounds = Rect::union_of(elements.iter().map(|e| &e.bounds));
    let root = Element::new(ROOT_ID, ElementKind::Root, root_bounds);

    // None means "attach to the implicit root".
    let mut parents: Vec<Option<usize>> = (0..elements.len())
        .map(|i| direct_parent(elements, i, tolerance))
        .collect();

    // Overlapping-but-not-nested pairs become siblings under whatever
    // contains their joint extent.
    for i in 0..elements.len() {
        for j in (i + 1)..elements.len() {
            let a = &elements[i].bounds;
            let b = &elements[j].bounds;
            if intersects(a, b) && !a.contains(b, tolerance) && !b.contains(a, tolerance) {
                let joint = smallest_container(elements, &a.union(b), tolerance, i, j);
                parents[i] = joint;
                parents[j] = joint;
            }
        }
    }

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); elements.len()];
    let mut root_children: Vec<usize> = Vec::new();
    for (i, parent) in parents.iter().enumerate() {
        match parent {
            Some(p) => children[*p].push(i),
            None => root_children.push(i),
        }
    }
    for list in children.iter_mut() {
        sort_reading_order(list, elements);
    }
    sort_reading_order(&mut root_children, elements);

    Ok(HierarchyNode {
        element: root,
        children: root_children
            .iter()
            .map(|&i| assemble(i, elements, &children))
            .collect(),
    })
}

/// Smallest-area element that may act as the direct parent of element `i`.
fn direct_parent(elements: &[Element], i: usize, tolerance: f64) -> Option<usize> {
    let target = &elements[i].bounds;
    let mut best: Option<(usize, f64)> = None;

    for (j, cand) in elements.iter().enumerate() {
        if j == i || !cand.bounds.contains(target, tolerance) {
            continue;
        }
        let area = cand.bounds.area();
        // A parent must be strictly larger; identical boxes fall back to
        // detection order with the earlier element on top.
        let eligible = area > target.area() || (cand.bounds == *target && j < i);
        if !eligible {
            continue;
        }
        best = match best {
            Some((bj, barea)) if area > barea || (area == barea && j > bj) => Some((bj, barea)),
            _ => Some((j, area)),
        };
    }

    best.map(|(j, _)| j)
}

/// Smallest element containing `extent`, excluding the pair being regrouped
/// and anything not larger than both of them.
fn smallest_container(
    elements: &[Element],
    extent: &Rect,
    tolerance: f64,
    skip_a: usize,
    skip_b: usize,
) -> Option<usize> {
    let floor = elements[skip_a]
        .bounds
        .area()
        .max(elements[skip_b].bounds.area());
    let mut best: Option<(usize, f64)> = None;

    for (k, cand) in elements.iter().enumerate() {
        if k == skip_a || k == skip_b {
            continue;
        }
        let area = cand.bounds.area();
        if area <= floor || !cand.bounds.contains(extent, tolerance) {
            continue;
        }
        best = match best {
            Some((bk, barea)) if area > barea || (area == barea && k > bk) => Some((bk, barea)),
            _ => Some((k, area)),
        };
    }

    best.map(|(k, _)| k)
}

fn intersects(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.width && b.x < a.x + a.width && a.y < b.y + b.height && b.y < a.y + a.height
}

fn sort_reading_order(indices: &mut [usize], elements: &[Element]) {
    indices.sort_by(|&a, &b| {
        let ra = &elements[a].bounds;
        let rb = &elements[b].bounds;
        ra.y.partial_cmp(&rb.y)
            .unwrap_or(Ordering::Equal)
            .then(ra.x.partial_cmp(&rb.x).unwrap_or(Ordering::Equal))
            .then(a.cmp(&b))
    });
}

fn assemble(idx: usize, elements: &[Element], children: &[Vec<usize>]) -> HierarchyNode {
    HierarchyNode {
        element: elements[idx].clone(),
        children: children[idx]
            .iter()
            .map(|&c| assemble(c, elements, children))
            .collect(),
    }
}
