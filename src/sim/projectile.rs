//! Projectile variants
//!
//! One `Projectile` type parameterized by a tagged `Behavior` instead of
//! an inheritance tree. Pool-managed: `reset` re-initializes every field
//! in place so a recycled projectile is indistinguishable from a fresh
//! one.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::normalize_angle;
use crate::consts::MAX_TRAIL_POINTS;
use crate::tuning::BulletTuning;

use super::anim::Animation;
use super::entity::Body;
use super::geometry::rect_circle;
use super::hooks::{DrawSink, SpriteInstance};
use super::player::Player;

/// A fading after-image sample
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrailPoint {
    pub pos: Vec2,
    pub alpha: f32,
}

/// Per-variant update strategy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Behavior {
    /// Flies straight with whatever velocity it was given
    Linear,
    /// Steers its heading toward the player, capped turn rate
    Homing { turn_rate: f32 },
    /// Holds position while its render scale oscillates, then expires
    Blast {
        rate: f32,
        amplitude: f32,
        duration: f32,
        phase: f32,
    },
    /// Persistent homing body that leaves a fading after-image trail
    SnakeBody {
        turn_rate: f32,
        sample_interval: f32,
        fade_rate: f32,
        sample_timer: f32,
        #[serde(skip)]
        trail: Vec<TrailPoint>,
    },
}

/// Everything needed to (re)initialize a projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileParams {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub min_speed: f32,
    pub max_speed: f32,
    pub damage: f32,
    pub scale: Vec2,
    pub tint: [f32; 4],
    /// Player contact consumes the projectile
    pub destroy_on_hit: bool,
    /// Leaving the battle frame destroys the projectile
    pub bounded: bool,
    /// Facing snaps to the velocity heading
    pub navi: bool,
    pub behavior: Behavior,
    pub anim: Option<Animation>,
}

impl Default for ProjectileParams {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            size: Vec2::splat(16.0),
            min_speed: 0.0,
            max_speed: f32::MAX,
            damage: 0.0,
            scale: Vec2::ONE,
            tint: [1.0; 4],
            destroy_on_hit: true,
            bounded: true,
            navi: false,
            behavior: Behavior::Linear,
            anim: None,
        }
    }
}

impl ProjectileParams {
    /// A straight bullet flying in `dir` at the tuned speed
    pub fn linear(pos: Vec2, dir: Vec2, tuning: &BulletTuning) -> Self {
        Self {
            pos,
            vel: dir.normalize_or_zero() * tuning.speed,
            size: Vec2::splat(tuning.size),
            damage: tuning.damage,
            navi: true,
            ..Self::default()
        }
    }

    /// A homing bullet launched toward `target`
    pub fn homing(pos: Vec2, target: Vec2, tuning: &BulletTuning) -> Self {
        let dir = (target - pos).normalize_or_zero();
        Self {
            pos,
            vel: dir * tuning.homing_speed,
            size: Vec2::splat(tuning.size),
            damage: tuning.damage,
            navi: true,
            // Homing bullets spawn outside the frame and chase inward;
            // bounds pruning would kill them on the first frame
            bounded: false,
            behavior: Behavior::Homing {
                turn_rate: tuning.homing_turn_rate,
            },
            ..Self::default()
        }
    }

    /// A stationary scale-oscillating blast
    pub fn blast(pos: Vec2, tuning: &BulletTuning) -> Self {
        Self {
            pos,
            size: Vec2::splat(tuning.size * 2.0),
            damage: tuning.damage,
            destroy_on_hit: false,
            behavior: Behavior::Blast {
                rate: tuning.blast_rate,
                amplitude: tuning.blast_amplitude,
                duration: tuning.blast_duration,
                phase: 0.0,
            },
            ..Self::default()
        }
    }

    /// A persistent trailing snake body
    pub fn snake(pos: Vec2, target: Vec2, tuning: &BulletTuning) -> Self {
        let dir = (target - pos).normalize_or_zero();
        Self {
            pos,
            vel: dir * tuning.homing_speed,
            size: Vec2::splat(tuning.size),
            damage: tuning.damage,
            navi: true,
            destroy_on_hit: false,
            bounded: false,
            behavior: Behavior::SnakeBody {
                turn_rate: tuning.homing_turn_rate,
                sample_interval: tuning.snake_trail_interval,
                fade_rate: tuning.snake_trail_fade,
                sample_timer: 0.0,
                trail: Vec::new(),
            },
            ..Self::default()
        }
    }
}

/// A pool-managed projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    body: Body,
    damage: f32,
    base_scale: Vec2,
    scale: Vec2,
    tint: [f32; 4],
    destroy_on_hit: bool,
    bounded: bool,
    behavior: Behavior,
    anim: Option<Animation>,
    age: f32,
    expired: bool,
}

impl Projectile {
    pub fn new(params: &ProjectileParams) -> Self {
        let mut projectile = Self {
            body: Body::new(Vec2::ZERO, Vec2::ONE),
            damage: 0.0,
            base_scale: Vec2::ONE,
            scale: Vec2::ONE,
            tint: [1.0; 4],
            destroy_on_hit: true,
            bounded: true,
            behavior: Behavior::Linear,
            anim: None,
            age: 0.0,
            expired: false,
        };
        projectile.reset(params);
        projectile
    }

    /// Re-initialize every field in place. A recycled projectile after
    /// `reset` is indistinguishable from `Projectile::new` with the same
    /// params.
    pub fn reset(&mut self, params: &ProjectileParams) {
        self.body = Body::new(params.pos, params.size);
        self.body.set_speed_limits(params.min_speed, params.max_speed);
        self.body.set_navi(params.navi);
        self.body.set_vel(params.vel);
        self.damage = params.damage;
        self.base_scale = params.scale;
        self.scale = params.scale;
        self.tint = params.tint;
        self.destroy_on_hit = params.destroy_on_hit;
        self.bounded = params.bounded;
        self.behavior = params.behavior.clone();
        self.anim = params.anim.clone();
        self.age = 0.0;
        self.expired = false;
    }

    /// Advance one frame
    pub fn update(&mut self, dt: f32, player: &Player) {
        self.age += dt;
        if let Some(anim) = &mut self.anim {
            anim.advance(dt);
        }

        match &mut self.behavior {
            Behavior::Linear => {}
            Behavior::Homing { turn_rate } => {
                let turn_rate = *turn_rate;
                steer_toward(&mut self.body, player.pos(), turn_rate, dt);
            }
            Behavior::Blast {
                rate,
                amplitude,
                duration,
                phase,
            } => {
                *phase += *rate * dt;
                let pulse = 1.0 + *amplitude * phase.sin();
                self.scale = self.base_scale * pulse;
                if self.age >= *duration {
                    self.expired = true;
                }
            }
            Behavior::SnakeBody {
                turn_rate,
                sample_interval,
                fade_rate,
                sample_timer,
                trail,
            } => {
                let turn_rate = *turn_rate;
                for point in trail.iter_mut() {
                    point.alpha -= *fade_rate * dt;
                }
                trail.retain(|p| p.alpha > 0.0);
                *sample_timer += dt;
                while *sample_timer >= *sample_interval {
                    *sample_timer -= *sample_interval;
                    trail.insert(
                        0,
                        TrailPoint {
                            pos: self.body.pos(),
                            alpha: 1.0,
                        },
                    );
                    if trail.len() > MAX_TRAIL_POINTS {
                        trail.pop();
                    }
                }
                steer_toward(&mut self.body, player.pos(), turn_rate, dt);
            }
        }

        self.body.integrate(dt);
    }

    /// Contact test against the player's bounding box
    pub fn hits_player(&self, player: &Player) -> bool {
        self.body.collidable() && rect_circle(player.bounds(), self.body.circle(), 0.0)
    }

    /// Emit the trail (oldest faintest) then the projectile itself
    pub fn render(&self, sink: &mut dyn DrawSink) {
        if let Behavior::SnakeBody { trail, .. } = &self.behavior {
            for point in trail.iter().rev() {
                let mut tint = self.tint;
                tint[3] *= point.alpha * 0.5;
                sink.draw(SpriteInstance {
                    pos: point.pos,
                    angle: self.body.angle(),
                    scale: self.scale * point.alpha,
                    tint,
                    frame: self.frame(),
                });
            }
        }
        sink.draw(SpriteInstance {
            pos: self.body.pos(),
            angle: self.body.angle(),
            scale: self.scale,
            tint: self.tint,
            frame: self.frame(),
        });
    }

    #[inline]
    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    #[inline]
    pub fn damage(&self) -> f32 {
        self.damage
    }

    #[inline]
    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    #[inline]
    pub fn tint(&self) -> [f32; 4] {
        self.tint
    }

    #[inline]
    pub fn destroy_on_hit(&self) -> bool {
        self.destroy_on_hit
    }

    #[inline]
    pub fn bounded(&self) -> bool {
        self.bounded
    }

    /// Consumed or timed out on its own (e.g. a finished blast)
    #[inline]
    pub fn expired(&self) -> bool {
        self.expired
    }

    pub fn frame(&self) -> u32 {
        self.anim.as_ref().map(|a| a.current_frame()).unwrap_or(0)
    }

    #[cfg(test)]
    pub(crate) fn behavior(&self) -> &Behavior {
        &self.behavior
    }
}

/// Rotate a body's heading toward `target` by at most `turn_rate * dt`,
/// preserving speed
fn steer_toward(body: &mut Body, target: Vec2, turn_rate: f32, dt: f32) {
    let vel = body.vel();
    let speed = vel.length();
    if speed <= f32::EPSILON {
        return;
    }
    let current = vel.y.atan2(vel.x);
    let desired = {
        let to_target = target - body.pos();
        to_target.y.atan2(to_target.x)
    };
    let max_turn = turn_rate * dt;
    let delta = normalize_angle(desired - current).clamp(-max_turn, max_turn);
    let heading = current + delta;
    body.set_vel(Vec2::new(heading.cos(), heading.sin()) * speed);
}
