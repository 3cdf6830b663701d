//! Page-space geometry.

/// An axis-aligned rectangle in CSS pixels.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub w: f64,
    /// Height.
    pub h: f64,
}

impl Rect {
    /// Construct a rectangle.
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Area, zero for degenerate rectangles.
    pub fn area(&self) -> f64 {
        self.w.max(0.0) * self.h.max(0.0)
    }

    /// Translate by an offset.
    pub fn shift(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.w, self.h)
    }

    /// Intersection of two rectangles, or None if they do not overlap.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let r = self.right().min(other.right());
        let b = self.bottom().min(other.bottom());
        if r < x || b < y {
            return None;
        }
        Some(Self::new(x, y, r - x, b - y))
    }

    /// Grow or shrink the bottom edge.
    pub fn extend_bottom(&self, delta: f64) -> Self {
        Self::new(self.x, self.y, self.w, (self.h + delta).max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersect() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(50.0, 50.0, 100.0, 100.0);
        assert_eq!(a.intersect(&b), Some(Rect::new(50.0, 50.0, 50.0, 50.0)));
        assert_eq!(a.intersect(&Rect::new(200.0, 0.0, 10.0, 10.0)), None);
        // Touching edges intersect with zero area.
        let edge = a.intersect(&Rect::new(100.0, 0.0, 10.0, 10.0));
        assert_eq!(edge.map(|r| r.area()), Some(0.0));
    }

    #[test]
    fn extend_bottom() {
        let a = Rect::new(0.0, 0.0, 10.0, 100.0);
        assert_eq!(a.extend_bottom(-150.0).h, 0.0);
        assert_eq!(a.extend_bottom(-40.0).bottom(), 60.0);
    }
}
