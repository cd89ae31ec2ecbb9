//! Stateless collision predicates
//!
//! The four shape tests every other part of the simulation is built on.
//! All of them are pure: same inputs, same answer, no side effects.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A circle in screen space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// An axis-aligned rectangle (min corner + size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    /// Build a rect centered on a point
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self {
            min: center - size / 2.0,
            size,
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size / 2.0
    }

    /// Grow the rect by `amount` on every side (negative shrinks)
    pub fn expand(&self, amount: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(amount),
            size: self.size + Vec2::splat(amount * 2.0),
        }
    }

    /// Whether a point lies inside (inclusive of edges)
    pub fn contains(&self, p: Vec2) -> bool {
        let max = self.max();
        p.x >= self.min.x && p.x <= max.x && p.y >= self.min.y && p.y <= max.y
    }
}

/// Circle vs circle: centers closer than the sum of radii minus padding
#[inline]
pub fn circle_circle(a: Circle, b: Circle, padding: f32) -> bool {
    a.center.distance(b.center) < a.radius + b.radius - padding
}

/// AABB overlap with both boxes expanded symmetrically by `padding`
pub fn rect_rect(a: Rect, b: Rect, padding: f32) -> bool {
    let a = a.expand(padding);
    let b = b.expand(padding);
    let (amax, bmax) = (a.max(), b.max());
    a.min.x < bmax.x && b.min.x < amax.x && a.min.y < bmax.y && b.min.y < amax.y
}

/// Rect vs circle: clamp the circle center to the rect to find the nearest
/// point, then compare squared distance against radius² + padding
pub fn rect_circle(rect: Rect, circle: Circle, padding: f32) -> bool {
    let nearest = circle.center.clamp(rect.min, rect.max());
    nearest.distance_squared(circle.center) < circle.radius * circle.radius + padding
}

/// Barycentric point-in-triangle test
///
/// True iff all three weights lie in [0, 1]. Degenerate (zero-area)
/// triangles never contain anything.
pub fn point_in_triangle(p: Vec2, v0: Vec2, v1: Vec2, v2: Vec2) -> bool {
    let denom = (v1.y - v2.y) * (v0.x - v2.x) + (v2.x - v1.x) * (v0.y - v2.y);
    if denom.abs() < f32::EPSILON {
        return false;
    }
    let w0 = ((v1.y - v2.y) * (p.x - v2.x) + (v2.x - v1.x) * (p.y - v2.y)) / denom;
    let w1 = ((v2.y - v0.y) * (p.x - v2.x) + (v0.x - v2.x) * (p.y - v2.y)) / denom;
    let w2 = 1.0 - w0 - w1;
    (0.0..=1.0).contains(&w0) && (0.0..=1.0).contains(&w1) && (0.0..=1.0).contains(&w2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_circle_circle_overlap() {
        let a = Circle::new(Vec2::ZERO, 10.0);
        let b = Circle::new(Vec2::new(15.0, 0.0), 10.0);
        assert!(circle_circle(a, b, 0.0));
        // Padding shrinks the effective contact distance
        assert!(!circle_circle(a, b, 6.0));
        // Just touching is not overlapping
        let c = Circle::new(Vec2::new(20.0, 0.0), 10.0);
        assert!(!circle_circle(a, c, 0.0));
    }

    #[test]
    fn test_rect_rect_overlap() {
        let a = Rect::new(Vec2::ZERO, Vec2::new(10.0, 10.0));
        let b = Rect::new(Vec2::new(8.0, 8.0), Vec2::new(10.0, 10.0));
        let c = Rect::new(Vec2::new(30.0, 0.0), Vec2::new(5.0, 5.0));
        assert!(rect_rect(a, b, 0.0));
        assert!(!rect_rect(a, c, 0.0));
        // Padding bridges the 20px gap between a and c
        assert!(rect_rect(a, c, 11.0));
    }

    #[test]
    fn test_rect_circle_nearest_point() {
        let rect = Rect::new(Vec2::ZERO, Vec2::new(10.0, 10.0));
        // Circle centered diagonally off the corner, distance ~7.07
        let circle = Circle::new(Vec2::new(15.0, 15.0), 8.0);
        assert!(rect_circle(rect, circle, 0.0));
        let far = Circle::new(Vec2::new(15.0, 15.0), 5.0);
        assert!(!rect_circle(rect, far, 0.0));
        // Center inside the rect always hits
        let inside = Circle::new(Vec2::new(5.0, 5.0), 0.1);
        assert!(rect_circle(rect, inside, 0.0));
    }

    #[test]
    fn test_point_in_triangle() {
        let v0 = Vec2::new(0.0, 0.0);
        let v1 = Vec2::new(10.0, 0.0);
        let v2 = Vec2::new(0.0, 10.0);
        assert!(point_in_triangle(Vec2::new(2.0, 2.0), v0, v1, v2));
        assert!(!point_in_triangle(Vec2::new(8.0, 8.0), v0, v1, v2));
        // Vertices count as inside (weights exactly 0/1)
        assert!(point_in_triangle(v0, v0, v1, v2));
    }

    #[test]
    fn test_degenerate_triangle_contains_nothing() {
        let v = Vec2::new(3.0, 3.0);
        assert!(!point_in_triangle(v, v, v, v));
    }

    proptest! {
        #[test]
        fn prop_circle_circle_symmetric(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0,
            ra in 0.0f32..100.0, rb in 0.0f32..100.0,
        ) {
            let a = Circle::new(Vec2::new(ax, ay), ra);
            let b = Circle::new(Vec2::new(bx, by), rb);
            prop_assert_eq!(circle_circle(a, b, 0.0), circle_circle(b, a, 0.0));
        }

        #[test]
        fn prop_predicates_deterministic(
            px in -500.0f32..500.0, py in -500.0f32..500.0,
            r in 0.0f32..100.0,
        ) {
            let rect = Rect::new(Vec2::new(-50.0, -50.0), Vec2::new(100.0, 100.0));
            let circle = Circle::new(Vec2::new(px, py), r);
            prop_assert_eq!(
                rect_circle(rect, circle, 0.0),
                rect_circle(rect, circle, 0.0)
            );
            let tri = (Vec2::new(-60.0, 0.0), Vec2::new(60.0, 0.0), Vec2::new(0.0, 90.0));
            prop_assert_eq!(
                point_in_triangle(circle.center, tri.0, tri.1, tri.2),
                point_in_triangle(circle.center, tri.0, tri.1, tri.2)
            );
        }
    }
}
