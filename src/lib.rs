//! Lumenfall - boss-fight combat simulation core
//!
//! Core modules:
//! - `sim`: Deterministic combat simulation (entities, collisions, rounds)
//! - `tuning`: Data-driven game balance
//!
//! Rendering, input, audio playback and persistence live in the embedding
//! game; this crate talks to them only through the collaborator traits in
//! `sim::hooks` and `sim::anim`.

pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

use glam::Vec2;

use crate::sim::geometry::Rect;

/// Game configuration constants
pub mod consts {
    /// Battle frame (the rectangular arena the fight happens in),
    /// in screen coordinates with y growing downward.
    pub const FRAME_MIN_X: f32 = 80.0;
    pub const FRAME_MIN_Y: f32 = 60.0;
    pub const FRAME_WIDTH: f32 = 480.0;
    pub const FRAME_HEIGHT: f32 = 360.0;

    /// Initial projectile pool reservation (slots, grows on demand)
    pub const POOL_RESERVE: usize = 64;

    /// Maximum after-image points kept per trailing entity
    pub const MAX_TRAIL_POINTS: usize = 24;
}

/// The battle frame as a rectangle
pub fn battle_frame() -> Rect {
    Rect::new(
        Vec2::new(consts::FRAME_MIN_X, consts::FRAME_MIN_Y),
        Vec2::new(consts::FRAME_WIDTH, consts::FRAME_HEIGHT),
    )
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), pos.y.atan2(pos.x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle_wraps() {
        assert!((normalize_angle(PI) - (-PI)).abs() < 1e-6);
        // 3π rounded to f32 sits just below the true odd multiple, so
        // the wrapped result can land on either side of the ±π seam
        assert!((normalize_angle(3.0 * PI).abs() - PI).abs() < 1e-5);
        assert!(normalize_angle(3.0 * PI) < PI);
        assert!((normalize_angle(-PI) - (-PI)).abs() < 1e-6);
        assert!((normalize_angle(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_polar_roundtrip() {
        let p = polar_to_cartesian(100.0, 1.2);
        let (r, theta) = cartesian_to_polar(p);
        assert!((r - 100.0).abs() < 1e-3);
        assert!((theta - 1.2).abs() < 1e-5);
    }
}
