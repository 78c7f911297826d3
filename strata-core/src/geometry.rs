//! Point and rectangle arithmetic
//!
//! Rectangles are half-open: `[top, bottom)` on both axes. A rectangle
//! with `bottom <= top` on either axis is *invalid* and stands for "no
//! rectangle"; every operation in this crate treats invalid rectangles
//! as empty. Callers must check [`Rect::is_valid`] after clipping.

/// A point on the compositor plane. Coordinates may be negative while
/// a surface is positioned partially outside its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }

    /// Component-wise translation.
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Point {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Point { x, y }
    }
}

/// A half-open rectangle `[top, bottom)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub top: Point,
    pub bottom: Point,
}

impl Rect {
    /// The invalid zero rectangle, used as the "clean" dirty state.
    pub const EMPTY: Rect = Rect {
        top: Point::new(0, 0),
        bottom: Point::new(0, 0),
    };

    pub const fn new(tx: i32, ty: i32, bx: i32, by: i32) -> Self {
        Rect {
            top: Point::new(tx, ty),
            bottom: Point::new(bx, by),
        }
    }

    /// Rectangle with the given size, top at the origin.
    pub const fn sized(width: u16, height: u16) -> Self {
        Rect::new(0, 0, width as i32, height as i32)
    }

    /// True if this rectangle can exist (non-empty on both axes).
    pub const fn is_valid(&self) -> bool {
        self.bottom.x > self.top.x && self.bottom.y > self.top.y
    }

    /// Width in cells; 0 for invalid rectangles.
    pub const fn width(&self) -> usize {
        let w = self.bottom.x - self.top.x;
        if w > 0 {
            w as usize
        } else {
            0
        }
    }

    /// Height in cells; 0 for invalid rectangles.
    pub const fn height(&self) -> usize {
        let h = self.bottom.y - self.top.y;
        if h > 0 {
            h as usize
        } else {
            0
        }
    }

    /// Area in cells; 0 for invalid rectangles.
    pub const fn size(&self) -> usize {
        self.width() * self.height()
    }

    /// Row-major linear offset of `p` inside this rectangle.
    ///
    /// `p` must lie inside the rectangle; the mapping is the inverse of
    /// [`Rect::point_for`].
    pub const fn index_for(&self, p: Point) -> usize {
        ((p.y - self.top.y) as usize) * self.width() + (p.x - self.top.x) as usize
    }

    /// Point corresponding to a row-major linear offset.
    ///
    /// The rectangle must be valid (non-zero width).
    pub const fn point_for(&self, index: usize) -> Point {
        Point::new(
            self.top.x + (index % self.width()) as i32,
            self.top.y + (index / self.width()) as i32,
        )
    }

    /// True if `p` lies inside this rectangle.
    pub const fn contains(&self, p: Point) -> bool {
        p.x >= self.top.x && p.x < self.bottom.x && p.y >= self.top.y && p.y < self.bottom.y
    }

    /// This rectangle translated so its top corner is `pos`,
    /// preserving width and height.
    pub const fn at(&self, pos: Point) -> Rect {
        Rect {
            top: pos,
            bottom: Point::new(
                pos.x + (self.bottom.x - self.top.x),
                pos.y + (self.bottom.y - self.top.y),
            ),
        }
    }

    /// This rectangle translated by `(dx, dy)`.
    pub const fn translated(&self, dx: i32, dy: i32) -> Rect {
        Rect {
            top: self.top.offset(dx, dy),
            bottom: self.bottom.offset(dx, dy),
        }
    }

    /// Intersection of `a` and `b`. The result may be invalid when the
    /// ranges do not overlap; callers must check.
    pub fn intersect(a: Rect, b: Rect) -> Rect {
        Rect {
            top: Point::new(a.top.x.max(b.top.x), a.top.y.max(b.top.y)),
            bottom: Point::new(a.bottom.x.min(b.bottom.x), a.bottom.y.min(b.bottom.y)),
        }
    }

    /// Bounding rectangle of `a` and `b`.
    ///
    /// This is a conservative union: it contains both inputs but may
    /// cover cells in neither. Dirty tracking accepts the
    /// over-invalidation to stay O(1). Invalid inputs are treated as
    /// empty and do not widen the result.
    pub fn bounding(a: Rect, b: Rect) -> Rect {
        match (a.is_valid(), b.is_valid()) {
            (true, true) => Rect {
                top: Point::new(a.top.x.min(b.top.x), a.top.y.min(b.top.y)),
                bottom: Point::new(a.bottom.x.max(b.bottom.x), a.bottom.y.max(b.bottom.y)),
            },
            (true, false) => a,
            (false, true) => b,
            (false, false) => Rect::EMPTY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn invalid_rect_has_zero_size() {
        let r = Rect::new(5, 5, 5, 9);
        assert!(!r.is_valid());
        assert_eq!(r.width(), 0);
        assert_eq!(r.size(), 0);

        let r = Rect::new(3, 3, 1, 10);
        assert!(!r.is_valid());
        assert_eq!(r.size(), 0);
    }

    #[test]
    fn index_point_roundtrip() {
        let r = Rect::new(2, 3, 7, 8);
        for i in 0..r.size() {
            assert_eq!(r.index_for(r.point_for(i)), i);
        }
        assert_eq!(r.index_for(Point::new(2, 3)), 0);
        assert_eq!(r.index_for(Point::new(6, 7)), r.size() - 1);
    }

    #[test]
    fn at_preserves_dimensions() {
        let r = Rect::new(1, 1, 4, 6);
        let moved = r.at(Point::new(-2, 10));
        assert_eq!(moved.width(), r.width());
        assert_eq!(moved.height(), r.height());
        assert_eq!(moved.top, Point::new(-2, 10));
    }

    #[test]
    fn intersect_disjoint_is_invalid() {
        let a = Rect::new(0, 0, 4, 4);
        let b = Rect::new(10, 10, 12, 12);
        assert!(!Rect::intersect(a, b).is_valid());
    }

    #[test]
    fn bounding_ignores_invalid_input() {
        let a = Rect::new(0, 0, 4, 4);
        let degenerate = Rect::new(9, 9, 9, 9);
        assert_eq!(Rect::bounding(a, degenerate), a);
        assert_eq!(Rect::bounding(degenerate, a), a);
        assert_eq!(Rect::bounding(degenerate, degenerate), Rect::EMPTY);
    }

    fn arb_rect() -> impl Strategy<Value = Rect> {
        (-50i32..50, -50i32..50, 0i32..60, 0i32..60)
            .prop_map(|(x, y, w, h)| Rect::new(x, y, x + w, y + h))
    }

    proptest! {
        #[test]
        fn intersect_commutes(a in arb_rect(), b in arb_rect()) {
            prop_assert_eq!(Rect::intersect(a, b), Rect::intersect(b, a));
        }

        #[test]
        fn intersect_contained_in_both(a in arb_rect(), b in arb_rect()) {
            let i = Rect::intersect(a, b);
            if i.is_valid() {
                prop_assert!(i.top.x >= a.top.x && i.bottom.x <= a.bottom.x);
                prop_assert!(i.top.y >= b.top.y && i.bottom.y <= b.bottom.y);
            }
        }

        #[test]
        fn bounding_contains_both(a in arb_rect(), b in arb_rect()) {
            let u = Rect::bounding(a, b);
            for r in [a, b] {
                if r.is_valid() {
                    prop_assert!(u.top.x <= r.top.x && u.bottom.x >= r.bottom.x);
                    prop_assert!(u.top.y <= r.top.y && u.bottom.y >= r.bottom.y);
                }
            }
        }
    }
}
