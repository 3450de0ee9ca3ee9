//! Axis-aligned collision primitives
//!
//! Everything on the field is a rectangle or a point: entities carry a
//! bounding [`Rect`], projectiles are tested as points or against a hit
//! radius around an enemy's center.

use glam::Vec2;

use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};

/// An axis-aligned rectangle (top-left corner + size)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rect of the given size centered on a point
    pub fn from_center(center: Vec2, w: f32, h: f32) -> Self {
        Self {
            x: center.x - w / 2.0,
            y: center.y - h / 2.0,
            w,
            h,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Overlap test; rects that merely touch along an edge do not overlap
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }

    /// Point containment; the left/top edges are inside, right/bottom are not
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x < self.x + self.w && p.y >= self.y && p.y < self.y + self.h
    }
}

/// True if a projectile at `point` connects with a target centered at `center`
#[inline]
pub fn within_hit_radius(point: Vec2, center: Vec2, radius: f32) -> bool {
    point.distance_squared(center) < radius * radius
}

/// True while a point is still on the visible field (projectile culling)
#[inline]
pub fn on_field(p: Vec2) -> bool {
    p.x >= 0.0 && p.x <= FIELD_WIDTH && p.y >= 0.0 && p.y <= FIELD_HEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_from_center() {
        let r = Rect::from_center(Vec2::new(100.0, 50.0), 30.0, 30.0);
        assert_eq!(r.x, 85.0);
        assert_eq!(r.y, 35.0);
        assert_eq!(r.center(), Vec2::new(100.0, 50.0));
    }

    #[test]
    fn test_rect_overlap() {
        let a = Rect::new(0.0, 0.0, 50.0, 50.0);
        let b = Rect::new(25.0, 25.0, 50.0, 50.0);
        let c = Rect::new(100.0, 100.0, 10.0, 10.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_rect_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 50.0, 50.0);
        let b = Rect::new(50.0, 0.0, 50.0, 50.0);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_rect_contains_point() {
        let r = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!(r.contains_point(Vec2::new(10.0, 10.0))); // top-left edge inside
        assert!(r.contains_point(Vec2::new(20.0, 20.0)));
        assert!(!r.contains_point(Vec2::new(30.0, 30.0))); // bottom-right edge outside
        assert!(!r.contains_point(Vec2::new(5.0, 15.0)));
    }

    #[test]
    fn test_hit_radius() {
        let center = Vec2::new(100.0, 100.0);
        assert!(within_hit_radius(Vec2::new(110.0, 100.0), center, 20.0));
        assert!(!within_hit_radius(Vec2::new(130.0, 100.0), center, 20.0));
    }

    #[test]
    fn test_on_field() {
        assert!(on_field(Vec2::new(0.0, 0.0)));
        assert!(on_field(Vec2::new(950.0, 500.0)));
        assert!(!on_field(Vec2::new(-1.0, 500.0)));
        assert!(!on_field(Vec2::new(950.0, FIELD_HEIGHT + 1.0)));
    }
}
