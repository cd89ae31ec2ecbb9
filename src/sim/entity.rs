//! Entity base: the position/velocity/facing record shared by bullets,
//! collectables and the player
//!
//! Fields are accessor-mediated so the speed clamp invariant can never be
//! bypassed: once set, a moving body's speed stays within
//! [min_speed, max_speed].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Circle, Rect};

/// Position, velocity and orientation of a single entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pos: Vec2,
    vel: Vec2,
    accel: Vec2,
    /// Signed visual facing angle (radians)
    angle: f32,
    /// Bounding box (width, height)
    size: Vec2,
    min_speed: f32,
    max_speed: f32,
    /// Facing always snaps to the velocity heading
    navi: bool,
    /// Participates in collision checks
    collidable: bool,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            accel: Vec2::ZERO,
            angle: 0.0,
            size,
            min_speed: 0.0,
            max_speed: f32::MAX,
            navi: false,
            collidable: true,
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn set_pos(&mut self, pos: Vec2) {
        self.pos = pos;
    }

    #[inline]
    pub fn vel(&self) -> Vec2 {
        self.vel
    }

    /// Set velocity, clamped to the configured speed range. A zero vector
    /// stays zero (the minimum only applies to a moving body).
    pub fn set_vel(&mut self, vel: Vec2) {
        self.vel = clamp_speed(vel, self.min_speed, self.max_speed);
        if self.navi && self.vel != Vec2::ZERO {
            self.angle = self.vel.y.atan2(self.vel.x);
        }
    }

    #[inline]
    pub fn accel(&self) -> Vec2 {
        self.accel
    }

    pub fn set_accel(&mut self, accel: Vec2) {
        self.accel = accel;
    }

    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn set_angle(&mut self, angle: f32) {
        self.angle = angle;
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn set_size(&mut self, size: Vec2) {
        self.size = size;
    }

    /// Configure the speed clamp and re-apply it to the current velocity
    pub fn set_speed_limits(&mut self, min_speed: f32, max_speed: f32) {
        self.min_speed = min_speed.max(0.0);
        self.max_speed = max_speed.max(self.min_speed);
        self.vel = clamp_speed(self.vel, self.min_speed, self.max_speed);
    }

    #[inline]
    pub fn min_speed(&self) -> f32 {
        self.min_speed
    }

    #[inline]
    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    #[inline]
    pub fn navi(&self) -> bool {
        self.navi
    }

    pub fn set_navi(&mut self, navi: bool) {
        self.navi = navi;
        if navi && self.vel != Vec2::ZERO {
            self.angle = self.vel.y.atan2(self.vel.x);
        }
    }

    #[inline]
    pub fn collidable(&self) -> bool {
        self.collidable
    }

    pub fn set_collidable(&mut self, collidable: bool) {
        self.collidable = collidable;
    }

    /// Advance one frame: apply acceleration, clamp speed, move
    pub fn integrate(&mut self, dt: f32) {
        if self.accel != Vec2::ZERO {
            self.set_vel(self.vel + self.accel * dt);
        }
        self.pos += self.vel * dt;
        if self.navi && self.vel != Vec2::ZERO {
            self.angle = self.vel.y.atan2(self.vel.x);
        }
    }

    /// Axis-aligned bounding box centered on the position
    pub fn bounds(&self) -> Rect {
        Rect::from_center(self.pos, self.size)
    }

    /// Collision radius: half the bounding width
    #[inline]
    pub fn radius(&self) -> f32 {
        self.size.x / 2.0
    }

    pub fn circle(&self) -> Circle {
        Circle::new(self.pos, self.radius())
    }
}

fn clamp_speed(vel: Vec2, min_speed: f32, max_speed: f32) -> Vec2 {
    let speed = vel.length();
    if speed <= f32::EPSILON {
        return Vec2::ZERO;
    }
    vel / speed * speed.clamp(min_speed, max_speed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_clamped_on_set() {
        let mut body = Body::new(Vec2::ZERO, Vec2::splat(10.0));
        body.set_speed_limits(50.0, 200.0);

        body.set_vel(Vec2::new(300.0, 0.0));
        assert!((body.vel().length() - 200.0).abs() < 1e-3);

        body.set_vel(Vec2::new(10.0, 0.0));
        assert!((body.vel().length() - 50.0).abs() < 1e-3);

        // Zero velocity is exempt from the minimum
        body.set_vel(Vec2::ZERO);
        assert_eq!(body.vel(), Vec2::ZERO);
    }

    #[test]
    fn test_integrate_applies_accel_and_clamp() {
        let mut body = Body::new(Vec2::ZERO, Vec2::splat(10.0));
        body.set_speed_limits(0.0, 100.0);
        body.set_vel(Vec2::new(90.0, 0.0));
        body.set_accel(Vec2::new(1000.0, 0.0));

        body.integrate(1.0);
        // Acceleration pushed past the max, clamp held it
        assert!((body.vel().length() - 100.0).abs() < 1e-3);
        assert!((body.pos().x - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_navi_snaps_facing_to_heading() {
        let mut body = Body::new(Vec2::ZERO, Vec2::splat(10.0));
        body.set_navi(true);
        body.set_vel(Vec2::new(0.0, 50.0));
        assert!((body.angle() - std::f32::consts::FRAC_PI_2).abs() < 1e-5);

        body.set_navi(false);
        body.set_vel(Vec2::new(-50.0, 0.0));
        // Facing frozen once navi is off
        assert!((body.angle() - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn test_bounds_and_radius() {
        let body = Body::new(Vec2::new(100.0, 50.0), Vec2::new(20.0, 40.0));
        let bounds = body.bounds();
        assert_eq!(bounds.min, Vec2::new(90.0, 30.0));
        assert_eq!(bounds.max(), Vec2::new(110.0, 70.0));
        assert_eq!(body.radius(), 10.0);
    }
}
