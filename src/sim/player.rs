//! The player character, as seen by the combat core
//!
//! Movement input is the scene's job; the simulation reads position and
//! bounds, applies damage, and drives the post-hit invulnerability
//! countdown. The invulnerability window is a plain timer compared
//! against the frame clock, ticked inside `update_fight_scene`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::battle_frame;
use crate::tuning::PlayerTuning;

use super::entity::Body;
use super::geometry::Rect;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    body: Body,
    hp: f32,
    max_hp: f32,
    /// Seconds of post-hit invulnerability remaining
    invuln_remaining: f32,
    /// Configured invulnerability window
    invuln_time: f32,
    light_radius: f32,
    light_osc_amp: f32,
    movement_enabled: bool,
}

impl Player {
    /// Spawn at the battle frame center
    pub fn new(tuning: &PlayerTuning) -> Self {
        Self {
            body: Body::new(battle_frame().center(), Vec2::splat(tuning.size)),
            hp: tuning.max_hp,
            max_hp: tuning.max_hp,
            invuln_remaining: 0.0,
            invuln_time: tuning.invuln_time,
            light_radius: tuning.light_radius,
            light_osc_amp: tuning.light_osc_amp,
            movement_enabled: true,
        }
    }

    #[inline]
    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.body.pos()
    }

    pub fn set_pos(&mut self, pos: Vec2) {
        self.body.set_pos(pos);
    }

    pub fn bounds(&self) -> Rect {
        self.body.bounds()
    }

    #[inline]
    pub fn hp(&self) -> f32 {
        self.hp
    }

    #[inline]
    pub fn max_hp(&self) -> f32 {
        self.max_hp
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.hp > 0.0
    }

    /// Apply damage. Negative amounts are ignored; HP floors at zero.
    pub fn take_damage(&mut self, amount: f32) {
        self.hp = (self.hp - amount.max(0.0)).max(0.0);
    }

    /// Restore HP, clamped to the maximum
    pub fn heal(&mut self, amount: f32) {
        self.hp = (self.hp + amount.max(0.0)).min(self.max_hp);
    }

    #[inline]
    pub fn is_invulnerable(&self) -> bool {
        self.invuln_remaining > 0.0
    }

    /// Arm the full post-hit invulnerability window
    pub fn start_invulnerability(&mut self) {
        self.invuln_remaining = self.invuln_time;
    }

    /// Count the invulnerability window down against the frame clock
    pub fn tick_invulnerability(&mut self, dt: f32) {
        self.invuln_remaining = (self.invuln_remaining - dt).max(0.0);
    }

    #[inline]
    pub fn light_radius(&self) -> f32 {
        self.light_radius
    }

    pub fn set_light_radius(&mut self, radius: f32) {
        self.light_radius = radius.max(0.0);
    }

    #[inline]
    pub fn light_osc_amp(&self) -> f32 {
        self.light_osc_amp
    }

    /// Effective aura reach: light radius plus oscillation amplitude.
    /// The slam attack's contact heuristic reads this.
    pub fn aura_radius(&self) -> f32 {
        self.light_radius + self.light_osc_amp
    }

    #[inline]
    pub fn movement_enabled(&self) -> bool {
        self.movement_enabled
    }

    pub fn set_movement_enabled(&mut self, enabled: bool) {
        self.movement_enabled = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_floors_at_zero() {
        let mut player = Player::new(&PlayerTuning::default());
        player.take_damage(40.0);
        assert_eq!(player.hp(), 60.0);
        player.take_damage(1000.0);
        assert_eq!(player.hp(), 0.0);
        assert!(!player.is_alive());
        // Negative damage is not a heal
        player.take_damage(-50.0);
        assert_eq!(player.hp(), 0.0);
    }

    #[test]
    fn test_heal_clamped_to_max() {
        let mut player = Player::new(&PlayerTuning::default());
        player.take_damage(10.0);
        player.heal(500.0);
        assert_eq!(player.hp(), player.max_hp());
    }

    #[test]
    fn test_invulnerability_countdown() {
        let mut player = Player::new(&PlayerTuning::default());
        assert!(!player.is_invulnerable());
        player.start_invulnerability();
        assert!(player.is_invulnerable());

        let window = PlayerTuning::default().invuln_time;
        player.tick_invulnerability(window / 2.0);
        assert!(player.is_invulnerable());
        player.tick_invulnerability(window);
        assert!(!player.is_invulnerable());
    }

    #[test]
    fn test_aura_radius_sums_oscillation() {
        let tuning = PlayerTuning::default();
        let player = Player::new(&tuning);
        assert_eq!(
            player.aura_radius(),
            tuning.light_radius + tuning.light_osc_amp
        );
    }
}
