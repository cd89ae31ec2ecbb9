//! The scripted multi-finger slam attack
//!
//! A composite hazard: a palm anchored at one side of the battle frame
//! with a row of finger sub-entities, cycling through a fixed timing
//! state machine. Prolonged player contact destroys a finger — the
//! hazard is lethal to itself, not only to the player.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::battle_frame;
use crate::tuning::SlamTuning;

use super::anim::{Animation, AnimationProvider};
use super::collectable::CollectableKind;
use super::entity::Body;
use super::geometry::point_in_triangle;
use super::hooks::{DrawSink, FightEvent, SpriteInstance};
use super::player::Player;

/// Which side of the battle frame the palm is anchored to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlamSide {
    Left,
    Right,
}

/// The slam's timing state. Transitions are driven purely by elapsed
/// local time; nothing external can cancel a state mid-way short of
/// removing the whole entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlamState {
    /// Sinusoidal vertical bob for a randomized duration
    IdleOscillate,
    /// Fingers extend while the palm sways on a decaying sine
    Outward,
    /// Brief positional shake; collision still disabled
    Pause,
    /// Full-speed lunge toward the player's side; collision enabled
    Stab,
    /// Holds position, collision still enabled
    StabPause,
    /// Eases back to the spawn position; collision disabled on entry
    Reset,
}

/// One finger sub-entity. Tracks its own sustained player contact.
#[derive(Debug, Clone)]
struct Finger {
    /// Offset from the palm center (x mirrored by side)
    offset: Vec2,
    anim: Animation,
    contact: f32,
    destroyed: bool,
}

/// A fading after-image sample left during STAB
#[derive(Debug, Clone, Copy)]
pub struct AfterImage {
    pub pos: Vec2,
    pub alpha: f32,
}

pub struct SlamAttack {
    body: Body,
    origin: Vec2,
    side: SlamSide,
    state: SlamState,
    state_time: f32,
    osc_phase: f32,
    idle_duration: f32,
    hold_pos: Vec2,
    stab_from: Vec2,
    fingers: Vec<Finger>,
    afterimages: Vec<AfterImage>,
    trail_timer: f32,
    cfg: SlamTuning,
    rng: Pcg32,
}

impl SlamAttack {
    /// Build a slam anchored to one frame side. `idle_time` is the first
    /// idle duration; the spawner randomizes it to desynchronize a
    /// mirrored pair.
    pub fn new(
        side: SlamSide,
        cfg: SlamTuning,
        idle_time: f32,
        seed: u64,
        anims: &dyn AnimationProvider,
    ) -> Self {
        let frame = battle_frame();
        let inset = cfg.palm_size / 2.0;
        let origin = match side {
            SlamSide::Left => Vec2::new(frame.min.x + inset, frame.center().y),
            SlamSide::Right => Vec2::new(frame.max().x - inset, frame.center().y),
        };

        let extend = anims
            .animation("finger_extend")
            .unwrap_or_else(|| Animation::still(0));
        let count = cfg.finger_count.max(1);
        let spacing = cfg.finger_width * 1.3;
        let fingers = (0..count)
            .map(|i| Finger {
                offset: Vec2::new(
                    cfg.palm_size / 2.0,
                    (i as f32 - (count - 1) as f32 / 2.0) * spacing,
                ),
                anim: extend.clone(),
                contact: 0.0,
                destroyed: false,
            })
            .collect();

        let mut body = Body::new(origin, Vec2::splat(cfg.palm_size));
        body.set_collidable(false);

        Self {
            body,
            origin,
            side,
            state: SlamState::IdleOscillate,
            state_time: 0.0,
            osc_phase: 0.0,
            idle_duration: idle_time.max(0.0),
            hold_pos: origin,
            stab_from: origin,
            fingers,
            afterimages: Vec::new(),
            trail_timer: 0.0,
            cfg,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Horizontal direction the fingers point (toward the arena center)
    #[inline]
    fn dir(&self) -> f32 {
        match self.side {
            SlamSide::Left => 1.0,
            SlamSide::Right => -1.0,
        }
    }

    /// Advance one frame. Deferred effects (sounds, enemy damage, reward
    /// drops) are pushed onto `events` for the manager to apply after its
    /// iteration pass.
    pub fn update(&mut self, dt: f32, player: &Player, events: &mut Vec<FightEvent>) {
        self.state_time += dt;

        match self.state {
            SlamState::IdleOscillate => {
                self.osc_phase += self.cfg.osc_rate * dt;
                self.body.set_pos(Vec2::new(
                    self.origin.x,
                    self.origin.y + self.osc_phase.sin() * self.cfg.osc_amp,
                ));
                if self.state_time >= self.idle_duration {
                    self.enter_outward();
                }
            }
            SlamState::Outward => {
                let t = self.state_time;
                let sway = self.cfg.sway_amp * (-t * self.cfg.sway_decay).exp()
                    * (t * self.cfg.sway_rate).sin();
                // Sway pushes away from the arena, opposite the fingers
                self.body
                    .set_pos(self.origin - Vec2::new(self.dir() * sway, 0.0));
                let mut all_done = true;
                for finger in self.fingers.iter_mut().filter(|f| !f.destroyed) {
                    finger.anim.advance(dt);
                    all_done &= finger.anim.is_finished();
                }
                if all_done {
                    self.enter_pause();
                }
            }
            SlamState::Pause => {
                let amp = self.cfg.shake_amp;
                let jitter = Vec2::new(
                    self.rng.random_range(-amp..=amp),
                    self.rng.random_range(-amp..=amp),
                );
                self.body.set_pos(self.hold_pos + jitter);
                if self.state_time >= self.cfg.pause_time {
                    self.enter_stab();
                }
            }
            SlamState::Stab => {
                self.body.integrate(dt);
                self.trail_timer += dt;
                while self.trail_timer >= self.cfg.trail_interval {
                    self.trail_timer -= self.cfg.trail_interval;
                    self.afterimages.push(AfterImage {
                        pos: self.body.pos(),
                        alpha: 1.0,
                    });
                }
                if self.state_time >= self.cfg.stab_time {
                    self.enter_stab_pause();
                }
            }
            SlamState::StabPause => {
                if self.state_time >= self.cfg.stab_pause_time {
                    self.enter_reset();
                }
            }
            SlamState::Reset => {
                let t = (self.state_time / self.cfg.reset_time).min(1.0);
                let eased = t * t * (3.0 - 2.0 * t);
                self.body.set_pos(self.stab_from.lerp(self.origin, eased));
                if t >= 1.0 {
                    self.enter_idle();
                }
            }
        }

        for image in &mut self.afterimages {
            image.alpha -= self.cfg.trail_fade * dt;
        }
        self.afterimages.retain(|i| i.alpha > 0.0);

        self.track_finger_contact(dt, player, events);
    }

    fn enter_outward(&mut self) {
        self.state = SlamState::Outward;
        self.state_time = 0.0;
        for finger in self.fingers.iter_mut().filter(|f| !f.destroyed) {
            finger.anim.restart();
        }
    }

    fn enter_pause(&mut self) {
        self.state = SlamState::Pause;
        self.state_time = 0.0;
        self.hold_pos = self.body.pos();
    }

    fn enter_stab(&mut self) {
        self.state = SlamState::Stab;
        self.state_time = 0.0;
        self.trail_timer = 0.0;
        self.body.set_pos(self.hold_pos);
        self.body.set_collidable(true);
        self.body
            .set_vel(Vec2::new(self.dir() * self.cfg.stab_speed, 0.0));
    }

    fn enter_stab_pause(&mut self) {
        self.state = SlamState::StabPause;
        self.state_time = 0.0;
        self.body.set_vel(Vec2::ZERO);
    }

    fn enter_reset(&mut self) {
        self.state = SlamState::Reset;
        self.state_time = 0.0;
        self.stab_from = self.body.pos();
        self.body.set_collidable(false);
    }

    fn enter_idle(&mut self) {
        self.state = SlamState::IdleOscillate;
        self.state_time = 0.0;
        self.osc_phase = 0.0;
        self.idle_duration = self
            .rng
            .random_range(self.cfg.idle_min..self.cfg.idle_max);
        self.body.set_pos(self.origin);
        for finger in &mut self.fingers {
            finger.contact = 0.0;
        }
    }

    /// Sustained-contact bookkeeping: while the attack is extended, a
    /// finger held against the player's light aura past the break
    /// threshold destroys itself, weakens the boss and drops rewards.
    fn track_finger_contact(
        &mut self,
        dt: f32,
        player: &Player,
        events: &mut Vec<FightEvent>,
    ) {
        let tracking = matches!(
            self.state,
            SlamState::Stab | SlamState::StabPause | SlamState::Reset
        );
        if !tracking || !player.is_alive() {
            return;
        }

        let reach_bonus = player.aura_radius();
        let palm = self.body.pos();
        let dir = self.dir();
        let cfg = &self.cfg;

        let mut any_destroyed = false;
        for finger in self.fingers.iter_mut().filter(|f| !f.destroyed) {
            let (v0, v1, v2) = finger_wedge(palm, dir, finger.offset, cfg, reach_bonus);
            if point_in_triangle(player.pos(), v0, v1, v2) {
                finger.contact += dt;
                if finger.contact >= cfg.contact_break {
                    finger.destroyed = true;
                    any_destroyed = true;
                    let base = palm + Vec2::new(finger.offset.x * dir, finger.offset.y);
                    events.push(FightEvent::Sound("weaken"));
                    events.push(FightEvent::DamageEnemy(cfg.weaken_damage));
                    for _ in 0..cfg.reward_drops {
                        events.push(FightEvent::SpawnCollectable {
                            kind: CollectableKind::TensionPoint,
                            pos: base,
                            value: 1,
                        });
                    }
                }
            } else {
                // Contact must be continuous; any gap resets the clock
                finger.contact = 0.0;
            }
        }

        if any_destroyed && self.fingers.iter().all(|f| f.destroyed) {
            events.push(FightEvent::Sound("explode"));
        }
    }

    /// Contact test against the player for damage purposes
    pub fn hits_player(&self, player: &Player) -> bool {
        if !self.body.collidable() {
            return false;
        }
        let half_width = player.body().radius();
        (0..self.fingers.len()).any(|i| {
            self.finger_wedge_world(i, half_width)
                .is_some_and(|(v0, v1, v2)| point_in_triangle(player.pos(), v0, v1, v2))
        })
    }

    /// World-space wedge triangle for a living finger, tip extended by
    /// `reach_bonus`. `None` for destroyed fingers or bad indices.
    pub fn finger_wedge_world(
        &self,
        index: usize,
        reach_bonus: f32,
    ) -> Option<(Vec2, Vec2, Vec2)> {
        let finger = self.fingers.get(index)?;
        if finger.destroyed {
            return None;
        }
        Some(finger_wedge(
            self.body.pos(),
            self.dir(),
            finger.offset,
            &self.cfg,
            reach_bonus,
        ))
    }

    /// After-images first (faint), then palm, then fingers
    pub fn render(&self, sink: &mut dyn DrawSink) {
        for image in &self.afterimages {
            sink.draw(SpriteInstance {
                pos: image.pos,
                angle: 0.0,
                scale: Vec2::ONE,
                tint: [0.8, 0.8, 1.0, image.alpha * 0.4],
                frame: 0,
            });
        }
        sink.draw(SpriteInstance {
            pos: self.body.pos(),
            angle: self.body.angle(),
            scale: Vec2::ONE,
            tint: [1.0; 4],
            frame: 0,
        });
        let dir = self.dir();
        for finger in self.fingers.iter().filter(|f| !f.destroyed) {
            sink.draw(SpriteInstance {
                pos: self.body.pos() + Vec2::new(finger.offset.x * dir, finger.offset.y),
                angle: if dir > 0.0 { 0.0 } else { std::f32::consts::PI },
                scale: Vec2::ONE,
                tint: [1.0; 4],
                frame: finger.anim.current_frame(),
            });
        }
    }

    #[inline]
    pub fn body(&self) -> &Body {
        &self.body
    }

    #[inline]
    pub fn state(&self) -> SlamState {
        self.state
    }

    #[inline]
    pub fn collision_enabled(&self) -> bool {
        self.body.collidable()
    }

    #[inline]
    pub fn damage(&self) -> f32 {
        self.cfg.damage
    }

    pub fn alive_fingers(&self) -> usize {
        self.fingers.iter().filter(|f| !f.destroyed).count()
    }

    /// All fingers destroyed: the whole attack retires
    pub fn expired(&self) -> bool {
        self.fingers.iter().all(|f| f.destroyed)
    }

    pub fn afterimages(&self) -> &[AfterImage] {
        &self.afterimages
    }
}

/// Wedge triangle for one finger: base edge at the palm, apex pointing
/// into the arena, tip extended by `reach_bonus`
fn finger_wedge(
    palm: Vec2,
    dir: f32,
    offset: Vec2,
    cfg: &SlamTuning,
    reach_bonus: f32,
) -> (Vec2, Vec2, Vec2) {
    let base = palm + Vec2::new(offset.x * dir, offset.y);
    let half_width = cfg.finger_width / 2.0;
    (
        base + Vec2::new(0.0, -half_width),
        base + Vec2::new(0.0, half_width),
        base + Vec2::new(dir * (cfg.finger_length + reach_bonus), 0.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::anim::NullAnimations;
    use crate::tuning::PlayerTuning;

    const DT: f32 = 1.0 / 60.0;

    fn test_slam(idle: f32) -> SlamAttack {
        SlamAttack::new(SlamSide::Left, SlamTuning::default(), idle, 42, &NullAnimations)
    }

    fn far_player() -> Player {
        let mut player = Player::new(&PlayerTuning::default());
        player.set_pos(Vec2::new(-10_000.0, -10_000.0));
        player
    }

    #[test]
    fn test_state_sequence_is_cyclic() {
        let mut slam = test_slam(0.2);
        let player = far_player();
        let mut events = Vec::new();

        let mut seen = vec![slam.state()];
        for _ in 0..2000 {
            slam.update(DT, &player, &mut events);
            if *seen.last().unwrap() != slam.state() {
                seen.push(slam.state());
            }
            // One full cycle plus re-entry into idle
            if seen.len() == 7 {
                break;
            }
        }
        assert_eq!(
            seen,
            vec![
                SlamState::IdleOscillate,
                SlamState::Outward,
                SlamState::Pause,
                SlamState::Stab,
                SlamState::StabPause,
                SlamState::Reset,
                SlamState::IdleOscillate,
            ]
        );
    }

    #[test]
    fn test_collision_window() {
        let mut slam = test_slam(0.2);
        let player = far_player();
        let mut events = Vec::new();

        for _ in 0..2000 {
            slam.update(DT, &player, &mut events);
            // Armed on entering Stab, disarmed again on entering Reset
            let expected = matches!(slam.state(), SlamState::Stab | SlamState::StabPause);
            assert_eq!(
                slam.collision_enabled(),
                expected,
                "collision flag wrong in {:?}",
                slam.state()
            );
        }
    }

    #[test]
    fn test_oscillation_confined_to_idle() {
        // The idle bob must not leak into other states: palm y matches
        // the origin-relative bob only while idling
        let mut slam = test_slam(0.5);
        let player = far_player();
        let mut events = Vec::new();
        let origin_y = slam.body().pos().y;

        // Leave idle
        while slam.state() == SlamState::IdleOscillate {
            slam.update(DT, &player, &mut events);
        }
        let y_after_idle = slam.body().pos().y;
        // Outward sway is horizontal only
        for _ in 0..10 {
            slam.update(DT, &player, &mut events);
            if slam.state() != SlamState::Outward {
                break;
            }
            assert!((slam.body().pos().y - origin_y).abs() <= (y_after_idle - origin_y).abs() + 1e-3);
        }
    }

    #[test]
    fn test_sustained_contact_destroys_finger() {
        let mut slam = test_slam(0.1);
        let mut player = Player::new(&PlayerTuning::default());
        let mut events = Vec::new();

        let finger_count = slam.alive_fingers();
        let mut destroyed_seen = false;
        for _ in 0..3000 {
            // Pin the player inside finger 0's wedge every frame
            if let Some((v0, v1, v2)) = slam.finger_wedge_world(0, 0.0) {
                player.set_pos((v0 + v1 + v2) / 3.0);
            }
            slam.update(DT, &player, &mut events);
            if slam.alive_fingers() < finger_count {
                destroyed_seen = true;
                break;
            }
        }
        assert!(destroyed_seen, "sustained contact should break a finger");

        let weaken = events
            .iter()
            .filter(|e| matches!(e, FightEvent::Sound("weaken")))
            .count();
        assert_eq!(weaken, 1);
        assert!(events
            .iter()
            .any(|e| matches!(e, FightEvent::DamageEnemy(_))));
        let drops = events
            .iter()
            .filter(|e| matches!(e, FightEvent::SpawnCollectable { .. }))
            .count();
        assert_eq!(drops, SlamTuning::default().reward_drops as usize);
    }

    #[test]
    fn test_all_fingers_destroyed_expires() {
        let mut slam = test_slam(0.1);
        let mut player = Player::new(&PlayerTuning::default());
        let mut events = Vec::new();

        for _ in 0..20_000 {
            // Chase whichever finger is still alive
            let alive = (0..SlamTuning::default().finger_count)
                .find(|&i| slam.finger_wedge_world(i, 0.0).is_some());
            if let Some(i) = alive {
                if let Some((v0, v1, v2)) = slam.finger_wedge_world(i, 0.0) {
                    player.set_pos((v0 + v1 + v2) / 3.0);
                }
            }
            slam.update(DT, &player, &mut events);
            if slam.expired() {
                break;
            }
        }
        assert!(slam.expired());
        assert!(events
            .iter()
            .any(|e| matches!(e, FightEvent::Sound("explode"))));
    }

    #[test]
    fn test_mirrored_slam_points_inward() {
        let right = SlamAttack::new(
            SlamSide::Right,
            SlamTuning::default(),
            0.1,
            7,
            &NullAnimations,
        );
        let (v0, _, tip) = right.finger_wedge_world(0, 0.0).unwrap();
        // Right-side fingers point in -x
        assert!(tip.x < v0.x);
    }
}
