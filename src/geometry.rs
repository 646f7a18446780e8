//! Bounding-box primitives used by detection and hierarchy construction.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// True if `inner` lies fully inside `self`, allowing `tol` pixels of
    /// slack on every edge to absorb detection noise.
    pub fn contains(&self, inner: &Rect, tol: f64) -> bool {
        inner.x >= self.x - tol
            && inner.y >= self.y - tol
            && inner.x + inner.width <= self.x + self.width + tol
            && inner.y + inner.height <= self.y + self.height + tol
    }

    /// Minimal rect covering both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        let min_x = self.x.min(other.x);
        let min_y = self.y.min(other.y);
        let max_x = (self.x + self.width).max(other.x + other.width);
        let max_y = (self.y + self.height).max(other.y + other.height);
        Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    /// Minimal rect covering every rect in the iterator, or a zero rect at
    /// the origin when the iterator is empty.
    pub fn union_of<'a, I>(rects: I) -> Rect
    where
        I: IntoIterator<Item = &'a Rect>,
    {
        let mut iter = rects.into_iter();
        match iter.next() {
            Some(first) => iter.fold(*first, |acc, r| acc.union(r)),
            None => Rect::new(0.0, 0.0, 0.0, 0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_respects_tolerance() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        let inner = Rect::new(-1.0, 10.0, 20.0, 20.0);
        assert!(!outer.contains(&inner, 0.0));
        assert!(outer.contains(&inner, 2.0));
    }

    #[test]
    fn contains_is_inclusive_on_edges() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(outer.contains(&outer, 0.0));
        let flush = Rect::new(80.0, 80.0, 20.0, 20.0);
        assert!(outer.contains(&flush, 0.0));
    }

    #[test]
    fn union_covers_both() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, 5.0, 10.0, 30.0);
        let u = a.union(&b);
        assert_eq!(u, Rect::new(0.0, 0.0, 30.0, 35.0));
        assert!(u.contains(&a, 0.0));
        assert!(u.contains(&b, 0.0));
    }

    #[test]
    fn union_of_empty_is_zero_rect() {
        let u = Rect::union_of(std::iter::empty::<&Rect>());
        assert_eq!(u.area(), 0.0);
    }

    #[test]
    fn serde_roundtrip() {
        let r = Rect::new(1.0, 2.0, 3.0, 4.0);
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(json, r#"{"x":1.0,"y":2.0,"width":3.0,"height":4.0}"#);
        let back: Rect = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }
}
