//! Data-driven game balance
//!
//! Every speed, interval and damage knob the simulation uses, grouped by
//! subsystem. The shipped balance is `Tuning::default()`; embedders may
//! override any subset from JSON (missing fields keep their defaults).

use serde::{Deserialize, Serialize};

/// Player character balance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub max_hp: f32,
    /// Post-hit invulnerability window (seconds)
    pub invuln_time: f32,
    /// Bounding box side length
    pub size: f32,
    /// Light aura radius (read by the slam contact heuristic)
    pub light_radius: f32,
    /// Aura oscillation amplitude
    pub light_osc_amp: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            max_hp: 100.0,
            invuln_time: 1.5,
            size: 22.0,
            light_radius: 42.0,
            light_osc_amp: 6.0,
        }
    }
}

/// Simple/medium projectile balance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BulletTuning {
    pub size: f32,
    pub damage: f32,
    pub speed: f32,
    pub homing_speed: f32,
    /// Maximum heading correction for homing bullets (radians/sec)
    pub homing_turn_rate: f32,
    /// Blast scale oscillation rate (radians/sec of phase)
    pub blast_rate: f32,
    /// Blast scale oscillation amplitude (fraction of base scale)
    pub blast_amplitude: f32,
    /// Blast lifetime before it expires on its own (seconds)
    pub blast_duration: f32,
    /// After-image sample interval for snake bodies (seconds)
    pub snake_trail_interval: f32,
    /// Snake after-image fade rate (alpha/sec)
    pub snake_trail_fade: f32,
}

impl Default for BulletTuning {
    fn default() -> Self {
        Self {
            size: 16.0,
            damage: 8.0,
            speed: 180.0,
            homing_speed: 140.0,
            homing_turn_rate: 3.2,
            blast_rate: 7.0,
            blast_amplitude: 0.35,
            blast_duration: 2.5,
            snake_trail_interval: 0.05,
            snake_trail_fade: 2.0,
        }
    }
}

/// Scripted slam attack balance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SlamTuning {
    pub damage: f32,
    pub finger_count: usize,
    pub finger_length: f32,
    pub finger_width: f32,
    /// Palm bounding box side length
    pub palm_size: f32,
    /// Randomized idle bob duration range (seconds)
    pub idle_min: f32,
    pub idle_max: f32,
    /// Idle bob rate (radians/sec) and amplitude
    pub osc_rate: f32,
    pub osc_amp: f32,
    /// Outward sway envelope: amplitude, sine rate, exponential decay
    pub sway_amp: f32,
    pub sway_rate: f32,
    pub sway_decay: f32,
    /// Pre-stab shake amplitude
    pub shake_amp: f32,
    pub pause_time: f32,
    pub stab_time: f32,
    pub stab_pause_time: f32,
    pub reset_time: f32,
    pub stab_speed: f32,
    /// After-image sample interval during STAB (seconds)
    pub trail_interval: f32,
    /// After-image fade rate (alpha/sec)
    pub trail_fade: f32,
    /// Sustained player contact that destroys a finger (seconds)
    pub contact_break: f32,
    /// Enemy damage dealt when a finger is destroyed
    pub weaken_damage: f32,
    /// Tension points dropped by a destroyed finger
    pub reward_drops: u32,
}

impl Default for SlamTuning {
    fn default() -> Self {
        Self {
            damage: 14.0,
            finger_count: 4,
            finger_length: 64.0,
            finger_width: 20.0,
            palm_size: 48.0,
            idle_min: 0.8,
            idle_max: 2.2,
            osc_rate: 2.4,
            osc_amp: 10.0,
            sway_amp: 26.0,
            sway_rate: 9.0,
            sway_decay: 1.8,
            shake_amp: 2.5,
            pause_time: 0.35,
            stab_time: 0.45,
            stab_pause_time: 0.6,
            reset_time: 0.9,
            stab_speed: 900.0,
            trail_interval: 0.04,
            trail_fade: 2.5,
            contact_break: 0.9,
            weaken_damage: 10.0,
            reward_drops: 3,
        }
    }
}

/// Collectable balance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectTuning {
    pub size: f32,
    /// Tension point flee duration range (seconds)
    pub flee_min: f32,
    pub flee_max: f32,
    pub flee_speed: f32,
    pub home_accel: f32,
    pub max_speed: f32,
    /// Hard lifetime before an uncollected pickup is discarded (seconds)
    pub ttl: f32,
    /// HP restored by a recovery orb
    pub recovery_heal: f32,
}

impl Default for CollectTuning {
    fn default() -> Self {
        Self {
            size: 12.0,
            flee_min: 0.3,
            flee_max: 0.8,
            flee_speed: 160.0,
            home_accel: 600.0,
            max_speed: 420.0,
            ttl: 8.0,
            recovery_heal: 6.0,
        }
    }
}

/// Round scheduling balance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundTuning {
    /// Default round duration (seconds)
    pub duration: f32,
    /// Battle-frame transition budget before spawning begins (seconds)
    pub frame_transition: f32,
    pub swarm_interval: f32,
    /// Spawn annulus around the player (radius range)
    pub annulus_min: f32,
    pub annulus_max: f32,
    /// Persistent snake bodies placed on the first snake-round invocation
    pub snake_count: usize,
    /// Ring radius for the initial snake placement
    pub snake_ring: f32,
    pub snake_interval: f32,
    pub special_interval: f32,
    /// Half-width of the special round's spawn windows (radians)
    pub special_window: f32,
}

impl Default for RoundTuning {
    fn default() -> Self {
        Self {
            duration: 24.0,
            frame_transition: 1.2,
            swarm_interval: 0.8,
            annulus_min: 120.0,
            annulus_max: 220.0,
            snake_count: 4,
            snake_ring: 150.0,
            snake_interval: 1.2,
            special_interval: 0.5,
            special_window: std::f32::consts::FRAC_PI_3,
        }
    }
}

/// Complete balance sheet
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player: PlayerTuning,
    pub bullet: BulletTuning,
    pub slam: SlamTuning,
    pub collect: CollectTuning,
    pub rounds: RoundTuning,
}

impl Tuning {
    /// Parse tuning overrides from JSON. Missing fields keep defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the full balance sheet (for editor/debug dumps)
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_roundtrip_json() {
        let tuning = Tuning::default();
        let json = tuning.to_json().unwrap();
        let back = Tuning::from_json(&json).unwrap();
        assert_eq!(back.player.max_hp, tuning.player.max_hp);
        assert_eq!(back.rounds.snake_count, tuning.rounds.snake_count);
        assert_eq!(back.slam.finger_count, tuning.slam.finger_count);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{"player":{"max_hp":50.0}}"#).unwrap();
        assert_eq!(tuning.player.max_hp, 50.0);
        // Untouched fields keep shipped balance
        assert_eq!(tuning.player.invuln_time, PlayerTuning::default().invuln_time);
        assert_eq!(tuning.bullet.speed, BulletTuning::default().speed);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(Tuning::from_json("not json").is_err());
    }
}
