//! Pickup entities with capture/attraction behavior
//!
//! A tension point flees the player briefly, then homes in until it is
//! captured. A recovery orb homes immediately. Both carry a hard TTL so
//! nothing leaks once the encounter winds down.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::tuning::CollectTuning;

use super::entity::Body;
use super::geometry::circle_circle;
use super::hooks::{DrawSink, SpriteInstance};
use super::player::Player;

/// What a pickup is worth when captured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectableKind {
    /// Resource point that fuels the player's special attack
    TensionPoint,
    /// Small heal
    RecoveryOrb,
}

/// Attraction phase
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
enum CapturePhase {
    /// Flying away from the player for a short randomized time
    Flee { remaining: f32 },
    /// Accelerating toward the player until captured
    Home,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectable {
    body: Body,
    kind: CollectableKind,
    value: u32,
    phase: CapturePhase,
    ttl: f32,
    consumed: bool,
}

impl Collectable {
    /// Spawn a tension point that flees the player before homing
    pub fn tension_point(
        pos: Vec2,
        value: u32,
        player: &Player,
        tuning: &CollectTuning,
        rng: &mut Pcg32,
    ) -> Self {
        let away = (pos - player.pos()).normalize_or(Vec2::new(0.0, -1.0));
        let mut body = Body::new(pos, Vec2::splat(tuning.size));
        body.set_speed_limits(0.0, tuning.max_speed);
        body.set_vel(away * tuning.flee_speed);
        Self {
            body,
            kind: CollectableKind::TensionPoint,
            value,
            phase: CapturePhase::Flee {
                remaining: rng.random_range(tuning.flee_min..tuning.flee_max),
            },
            ttl: tuning.ttl,
            consumed: false,
        }
    }

    /// Spawn a recovery orb that homes immediately
    pub fn recovery_orb(pos: Vec2, tuning: &CollectTuning) -> Self {
        let mut body = Body::new(pos, Vec2::splat(tuning.size));
        body.set_speed_limits(0.0, tuning.max_speed);
        Self {
            body,
            kind: CollectableKind::RecoveryOrb,
            value: tuning.recovery_heal as u32,
            phase: CapturePhase::Home,
            ttl: tuning.ttl,
            consumed: false,
        }
    }

    /// Advance one frame. Capture only happens against a living player.
    pub fn update(&mut self, dt: f32, player: &Player, tuning: &CollectTuning) {
        self.ttl -= dt;

        match &mut self.phase {
            CapturePhase::Flee { remaining } => {
                *remaining -= dt;
                if *remaining <= 0.0 {
                    self.phase = CapturePhase::Home;
                }
            }
            CapturePhase::Home => {
                let toward = (player.pos() - self.body.pos()).normalize_or_zero();
                self.body.set_accel(toward * tuning.home_accel);
            }
        }
        self.body.integrate(dt);

        if player.is_alive() && circle_circle(self.body.circle(), player.body().circle(), 0.0) {
            self.consumed = true;
        }
    }

    pub fn render(&self, sink: &mut dyn DrawSink) {
        let tint = match self.kind {
            CollectableKind::TensionPoint => [1.0, 0.9, 0.4, 1.0],
            CollectableKind::RecoveryOrb => [0.5, 1.0, 0.6, 1.0],
        };
        sink.draw(SpriteInstance {
            pos: self.body.pos(),
            angle: self.body.angle(),
            scale: Vec2::ONE,
            tint,
            frame: 0,
        });
    }

    #[inline]
    pub fn body(&self) -> &Body {
        &self.body
    }

    #[inline]
    pub fn kind(&self) -> CollectableKind {
        self.kind
    }

    #[inline]
    pub fn value(&self) -> u32 {
        self.value
    }

    /// Captured by the player this frame (fires the collection callback)
    #[inline]
    pub fn consumed(&self) -> bool {
        self.consumed
    }

    /// Timed out uncollected (silently discarded)
    #[inline]
    pub fn expired(&self) -> bool {
        self.ttl <= 0.0 && !self.consumed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::PlayerTuning;
    use rand::SeedableRng;

    fn player_at(pos: Vec2) -> Player {
        let mut player = Player::new(&PlayerTuning::default());
        player.set_pos(pos);
        player
    }

    #[test]
    fn test_tension_point_flees_then_homes() {
        let tuning = CollectTuning::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let player = player_at(Vec2::ZERO);
        let spawn = Vec2::new(50.0, 0.0);
        let mut point = Collectable::tension_point(spawn, 1, &player, &tuning, &mut rng);

        // During flee the distance to the player grows
        point.update(0.1, &player, &tuning);
        let fled = point.body().pos().distance(player.pos());
        assert!(fled > 50.0);

        // Long after the flee window it must have been captured
        let mut captured = false;
        for _ in 0..600 {
            point.update(1.0 / 60.0, &player, &tuning);
            if point.consumed() {
                captured = true;
                break;
            }
        }
        assert!(captured, "tension point should home in and be captured");
    }

    #[test]
    fn test_capture_requires_living_player() {
        let tuning = CollectTuning::default();
        let mut player = player_at(Vec2::ZERO);
        player.take_damage(f32::MAX);
        let mut orb = Collectable::recovery_orb(player.pos(), &tuning);

        orb.update(1.0 / 60.0, &player, &tuning);
        assert!(!orb.consumed());
    }

    #[test]
    fn test_ttl_expiry_is_not_consumption() {
        let tuning = CollectTuning::default();
        // Player far away and dead so neither homing nor capture resolves
        let mut player = player_at(Vec2::new(10_000.0, 10_000.0));
        player.take_damage(f32::MAX);
        let mut orb = Collectable::recovery_orb(Vec2::ZERO, &tuning);

        let mut elapsed = 0.0;
        while elapsed < tuning.ttl + 0.1 {
            orb.update(0.1, &player, &tuning);
            elapsed += 0.1;
        }
        assert!(orb.expired());
        assert!(!orb.consumed());
    }
}
