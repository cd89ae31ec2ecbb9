//! The boss, as seen by the combat core
//!
//! Only the parts the simulation touches: a health pool and a defense
//! multiplier, both clamped at the mutator boundary so out-of-range
//! values never propagate.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    hp: f32,
    max_hp: f32,
    /// Fraction of incoming damage absorbed, always in [0, 1]
    defense_rate: f32,
}

impl Enemy {
    pub fn new(max_hp: f32) -> Self {
        Self {
            hp: max_hp,
            max_hp,
            defense_rate: 0.0,
        }
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

    #[inline]
    pub fn defense_rate(&self) -> f32 {
        self.defense_rate
    }

    /// Set the defense multiplier, clamped to [0, 1]
    pub fn set_defense_rate(&mut self, rate: f32) {
        self.defense_rate = rate.clamp(0.0, 1.0);
    }

    /// Apply damage through the defense multiplier. Returns the amount
    /// actually dealt.
    pub fn take_damage(&mut self, raw: f32) -> f32 {
        let applied = raw.max(0.0) * (1.0 - self.defense_rate);
        self.hp = (self.hp - applied).max(0.0);
        applied
    }
}
