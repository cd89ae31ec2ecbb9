//! Round scheduling
//!
//! A round owns its spawn logic and timers; the scheduler owns the
//! clock. Each round begins with a battle-frame transition during which
//! nothing spawns, then receives `update_round` calls whose `dt` is
//! clipped so that the cumulative active time equals exactly
//! `duration - frame_transition`. A round that spawns every `interval`
//! seconds therefore fires exactly `floor(active / interval)` times,
//! with no partial spawn at the boundary.

use glam::Vec2;
use log::debug;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use std::f32::consts::PI;

use crate::polar_to_cartesian;
use crate::tuning::RoundTuning;

use super::anim::AnimationProvider;
use super::manager::ObjectManager;
use super::player::Player;
use super::projectile::ProjectileParams;
use super::slam::{SlamAttack, SlamSide};

/// Everything a round may touch while updating
pub struct RoundCtx<'a> {
    pub manager: &'a mut ObjectManager,
    pub player: &'a mut Player,
    pub anims: &'a dyn AnimationProvider,
    pub rng: &'a mut Pcg32,
    pub tuning: &'a RoundTuning,
}

impl RoundCtx<'_> {
    /// Random point on the spawn annulus centered on the player
    fn annulus_point(&mut self) -> Vec2 {
        let r = self
            .rng
            .random_range(self.tuning.annulus_min..self.tuning.annulus_max);
        let theta = self.rng.random_range(-PI..PI);
        self.player.pos() + polar_to_cartesian(r, theta)
    }
}

pub trait Round {
    /// Total round length including the frame transition (seconds)
    fn duration(&self) -> f32;

    /// Leading budget reserved for the battle-frame transition (seconds)
    fn frame_transition_time(&self) -> f32;

    /// Called once, on the first active frame
    fn on_enter(&mut self, _ctx: &mut RoundCtx) {}

    /// Called every active frame with transition-clipped `dt`
    fn update_round(&mut self, dt: f32, ctx: &mut RoundCtx);
}

/// What the scheduler did this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundSignal {
    /// Battle frame is animating toward the round's layout
    Transition,
    /// The current round is running
    Running,
    /// The current round just ended; the next one starts next frame
    Finished,
    /// No rounds left (or none configured)
    Idle,
}

pub struct RoundScheduler {
    rounds: Vec<Box<dyn Round>>,
    tuning: RoundTuning,
    current: usize,
    elapsed: f32,
    entered: bool,
    rng: Pcg32,
}

impl RoundScheduler {
    pub fn new(rounds: Vec<Box<dyn Round>>, tuning: RoundTuning, seed: u64) -> Self {
        Self {
            rounds,
            tuning,
            current: 0,
            elapsed: 0.0,
            entered: false,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Advance the schedule by one frame
    pub fn update(
        &mut self,
        dt: f32,
        manager: &mut ObjectManager,
        player: &mut Player,
        anims: &dyn AnimationProvider,
    ) -> RoundSignal {
        let Some(round) = self.rounds.get_mut(self.current) else {
            return RoundSignal::Idle;
        };

        let transition = round.frame_transition_time().max(0.0);
        let active_cap = (round.duration() - transition).max(0.0);

        let before = self.elapsed;
        self.elapsed += dt;

        if self.elapsed < transition {
            return RoundSignal::Transition;
        }

        let mut ctx = RoundCtx {
            manager,
            player,
            anims,
            rng: &mut self.rng,
            tuning: &self.tuning,
        };
        if !self.entered {
            self.entered = true;
            debug!("round {} entered", self.current);
            round.on_enter(&mut ctx);
        }

        // Clip to the active window on both ends so that the dts handed
        // to the round sum to exactly active_cap over its lifetime
        let active_before = (before - transition).max(0.0);
        let active_after = (self.elapsed - transition).min(active_cap);
        let active_dt = active_after - active_before;
        if active_dt > 0.0 {
            round.update_round(active_dt, &mut ctx);
        }

        if self.elapsed - transition >= active_cap {
            debug!("round {} finished", self.current);
            self.current += 1;
            self.elapsed = 0.0;
            self.entered = false;
            return RoundSignal::Finished;
        }
        RoundSignal::Running
    }

    /// Smoothstep-eased transition progress in [0, 1] for the frame
    /// animation; 1.0 once the round is active
    pub fn frame_progress(&self) -> f32 {
        let Some(round) = self.rounds.get(self.current) else {
            return 1.0;
        };
        let transition = round.frame_transition_time().max(f32::EPSILON);
        let t = (self.elapsed / transition).clamp(0.0, 1.0);
        t * t * (3.0 - 2.0 * t)
    }

    #[inline]
    pub fn current_round(&self) -> usize {
        self.current
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.current >= self.rounds.len()
    }
}

/// Homing bullets at a fixed interval from random annulus points
pub struct SwarmRound {
    duration: f32,
    transition: f32,
    interval: f32,
    timer: f32,
}

impl SwarmRound {
    pub fn new(tuning: &RoundTuning) -> Self {
        Self {
            duration: tuning.duration,
            transition: tuning.frame_transition,
            interval: tuning.swarm_interval,
            timer: 0.0,
        }
    }
}

impl Round for SwarmRound {
    fn duration(&self) -> f32 {
        self.duration
    }

    fn frame_transition_time(&self) -> f32 {
        self.transition
    }

    fn update_round(&mut self, dt: f32, ctx: &mut RoundCtx) {
        self.timer += dt;
        while self.timer >= self.interval {
            self.timer -= self.interval;
            let pos = ctx.annulus_point();
            let bullet = ctx.manager.tuning().bullet.clone();
            ctx.manager
                .create_bullet(&ProjectileParams::homing(pos, ctx.player.pos(), &bullet));
        }
    }
}

/// One-shot mirrored pair of slam attacks, idle-desynchronized
pub struct FingerRound {
    duration: f32,
    transition: f32,
}

impl FingerRound {
    pub fn new(tuning: &RoundTuning) -> Self {
        Self {
            duration: tuning.duration,
            transition: tuning.frame_transition,
        }
    }
}

impl Round for FingerRound {
    fn duration(&self) -> f32 {
        self.duration
    }

    fn frame_transition_time(&self) -> f32 {
        self.transition
    }

    fn on_enter(&mut self, ctx: &mut RoundCtx) {
        let cfg = ctx.manager.tuning().slam.clone();
        for side in [SlamSide::Left, SlamSide::Right] {
            let idle = ctx.rng.random_range(cfg.idle_min..cfg.idle_max);
            let seed = ctx.rng.random::<u64>();
            ctx.manager
                .add_bullet(SlamAttack::new(side, cfg.clone(), idle, seed, ctx.anims));
        }
    }

    fn update_round(&mut self, _dt: f32, _ctx: &mut RoundCtx) {}
}

/// Persistent snakes placed up front, then homing spawns that ramp up
/// in simultaneous count as the round progresses
pub struct SnakeRound {
    duration: f32,
    transition: f32,
    interval: f32,
    timer: f32,
    elapsed: f32,
}

impl SnakeRound {
    pub fn new(tuning: &RoundTuning) -> Self {
        Self {
            duration: tuning.duration,
            transition: tuning.frame_transition,
            interval: tuning.snake_interval,
            timer: 0.0,
            elapsed: 0.0,
        }
    }

    /// Intensity tier 1..=3 from round progress
    fn tier(&self) -> u32 {
        let active = (self.duration - self.transition).max(f32::EPSILON);
        let progress = (self.elapsed / active).clamp(0.0, 1.0);
        (1 + (3.0 * progress) as u32).min(3)
    }
}

impl Round for SnakeRound {
    fn duration(&self) -> f32 {
        self.duration
    }

    fn frame_transition_time(&self) -> f32 {
        self.transition
    }

    fn on_enter(&mut self, ctx: &mut RoundCtx) {
        let bullet = ctx.manager.tuning().bullet.clone();
        let count = ctx.tuning.snake_count.max(1);
        let ring = ctx.tuning.snake_ring;
        let center = ctx.player.pos();
        for i in 0..count {
            let theta = i as f32 / count as f32 * 2.0 * PI;
            let pos = center + polar_to_cartesian(ring, theta);
            ctx.manager
                .create_bullet(&ProjectileParams::snake(pos, center, &bullet));
        }
    }

    fn update_round(&mut self, dt: f32, ctx: &mut RoundCtx) {
        self.elapsed += dt;
        self.timer += dt;
        while self.timer >= self.interval {
            self.timer -= self.interval;
            let simultaneous = if self.tier() >= 3 { 3 } else { 2 };
            let bullet = ctx.manager.tuning().bullet.clone();
            for _ in 0..simultaneous {
                let pos = ctx.annulus_point();
                ctx.manager
                    .create_bullet(&ProjectileParams::homing(pos, ctx.player.pos(), &bullet));
            }
        }
    }
}

/// Homing spawns restricted to two mirrored angular windows around the
/// horizontal, leaving the vertical approaches safe
pub struct SpecialRound {
    duration: f32,
    transition: f32,
    interval: f32,
    timer: f32,
}

impl SpecialRound {
    pub fn new(tuning: &RoundTuning) -> Self {
        Self {
            duration: tuning.duration,
            transition: tuning.frame_transition,
            interval: tuning.special_interval,
            timer: 0.0,
        }
    }

    /// An angle inside one of the two allowed windows
    fn window_angle(rng: &mut Pcg32, half_width: f32) -> f32 {
        let base = if rng.random_bool(0.5) { 0.0 } else { PI };
        base + rng.random_range(-half_width..=half_width)
    }
}

impl Round for SpecialRound {
    fn duration(&self) -> f32 {
        self.duration
    }

    fn frame_transition_time(&self) -> f32 {
        self.transition
    }

    fn update_round(&mut self, dt: f32, ctx: &mut RoundCtx) {
        self.timer += dt;
        while self.timer >= self.interval {
            self.timer -= self.interval;
            let theta = Self::window_angle(ctx.rng, ctx.tuning.special_window);
            let r = ctx
                .rng
                .random_range(ctx.tuning.annulus_min..ctx.tuning.annulus_max);
            let pos = ctx.player.pos() + polar_to_cartesian(r, theta);
            let bullet = ctx.manager.tuning().bullet.clone();
            ctx.manager
                .create_bullet(&ProjectileParams::homing(pos, ctx.player.pos(), &bullet));
        }
    }
}

/// The standard encounter: swarm, fingers, snakes, then the special
pub fn standard_rounds(tuning: &RoundTuning) -> Vec<Box<dyn Round>> {
    vec![
        Box::new(SwarmRound::new(tuning)),
        Box::new(FingerRound::new(tuning)),
        Box::new(SnakeRound::new(tuning)),
        Box::new(SpecialRound::new(tuning)),
    ]
}
