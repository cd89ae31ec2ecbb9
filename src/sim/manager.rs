//! The object manager: owns every live projectile and collectable
//!
//! Pooled allocation (arena backing store + free-index stack), one
//! update per entity per frame, player collision resolution, and
//! deferred pruning of out-of-bounds or expired entities. Nothing here
//! mutates a collection while iterating it; removals and spawn effects
//! are batched and applied after the pass.

use glam::Vec2;
use log::debug;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::battle_frame;
use crate::consts::POOL_RESERVE;
use crate::tuning::Tuning;

use super::collectable::{Collectable, CollectableKind};
use super::enemy::Enemy;
use super::entity::Body;
use super::geometry::Rect;
use super::hooks::{DrawSink, FightEvent, FightHooks};
use super::player::Player;
use super::projectile::{Projectile, ProjectileParams};
use super::slam::SlamAttack;

/// An active bullet: either a pooled slot or a scripted entity whose
/// internal state is too specialized to reset generically
enum Bullet {
    Pooled(usize),
    Scripted(Box<SlamAttack>),
}

pub struct ObjectManager {
    tuning: Tuning,
    frame: Rect,
    /// Arena backing store; a slot's index never changes
    slots: Vec<Projectile>,
    /// Indices of retired slots available for reuse
    free: Vec<usize>,
    /// Live bullets in deterministic iteration order
    active: Vec<Bullet>,
    collectables: Vec<Collectable>,
    rng: Pcg32,
}

impl ObjectManager {
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        Self {
            tuning,
            frame: battle_frame(),
            slots: Vec::with_capacity(POOL_RESERVE),
            free: Vec::new(),
            active: Vec::new(),
            collectables: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    #[inline]
    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    #[inline]
    pub fn frame(&self) -> Rect {
        self.frame
    }

    /// Spawn a pooled projectile: reuse a retired slot when one exists,
    /// otherwise grow the arena. O(1) amortized either way.
    pub fn create_bullet(&mut self, params: &ProjectileParams) {
        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot].reset(params);
                slot
            }
            None => {
                self.slots.push(Projectile::new(params));
                if self.slots.len() > POOL_RESERVE {
                    debug!("projectile arena grew to {} slots", self.slots.len());
                }
                self.slots.len() - 1
            }
        };
        self.active.push(Bullet::Pooled(slot));
    }

    /// Insert a pre-built scripted entity, bypassing the pool
    pub fn add_bullet(&mut self, slam: SlamAttack) {
        self.active.push(Bullet::Scripted(Box::new(slam)));
    }

    pub fn add_collectable(&mut self, collectable: Collectable) {
        self.collectables.push(collectable);
    }

    /// Advance the whole fight by one frame.
    ///
    /// Every active projectile and collectable updates exactly once.
    /// A dead player short-circuits damage application, but bounds and
    /// expiry pruning still run so spawners never leak entities after
    /// the encounter ends.
    pub fn update_fight_scene(
        &mut self,
        dt: f32,
        player: &mut Player,
        enemy: &mut Enemy,
        hooks: &mut dyn FightHooks,
    ) {
        player.tick_invulnerability(dt);

        let mut events: Vec<FightEvent> = Vec::new();
        let mut removals: Vec<usize> = Vec::new();

        for (index, bullet) in self.active.iter_mut().enumerate() {
            match bullet {
                Bullet::Pooled(slot) => {
                    let projectile = &mut self.slots[*slot];
                    projectile.update(dt, player);

                    if projectile.expired() {
                        removals.push(index);
                        continue;
                    }
                    if projectile.bounded() && out_of_frame(self.frame, projectile.body()) {
                        removals.push(index);
                        continue;
                    }
                    if !player.is_invulnerable() && projectile.hits_player(player) {
                        if player.is_alive() {
                            player.take_damage(projectile.damage());
                            player.start_invulnerability();
                            events.push(FightEvent::Sound("hit"));
                        }
                        if projectile.destroy_on_hit() {
                            removals.push(index);
                        }
                    }
                }
                Bullet::Scripted(slam) => {
                    slam.update(dt, player, &mut events);

                    if slam.expired() {
                        removals.push(index);
                        continue;
                    }
                    if player.is_alive() && !player.is_invulnerable() && slam.hits_player(player)
                    {
                        player.take_damage(slam.damage());
                        player.start_invulnerability();
                        events.push(FightEvent::Sound("hit"));
                    }
                }
            }
        }

        let mut dead_collectables: Vec<usize> = Vec::new();
        for (index, collectable) in self.collectables.iter_mut().enumerate() {
            collectable.update(dt, player, &self.tuning.collect);
            if collectable.consumed() || collectable.expired() {
                dead_collectables.push(index);
            }
        }

        // Removal batch, applied only after the full iteration
        for index in removals.into_iter().rev() {
            match self.active.swap_remove(index) {
                Bullet::Pooled(slot) => self.free.push(slot),
                Bullet::Scripted(_) => {}
            }
        }

        for index in dead_collectables.into_iter().rev() {
            let collectable = self.collectables.swap_remove(index);
            if collectable.consumed() {
                hooks.sound("collect");
                hooks.collected(collectable.kind(), collectable.value());
                if collectable.kind() == CollectableKind::RecoveryOrb {
                    player.heal(collectable.value() as f32);
                }
            }
        }

        for event in events {
            match event {
                FightEvent::Sound(name) => hooks.sound(name),
                FightEvent::DamageEnemy(amount) => {
                    if enemy.is_alive() {
                        enemy.take_damage(amount);
                    }
                }
                FightEvent::SpawnCollectable { kind, pos, value } => {
                    let collectable = match kind {
                        CollectableKind::TensionPoint => Collectable::tension_point(
                            pos,
                            value,
                            player,
                            &self.tuning.collect,
                            &mut self.rng,
                        ),
                        CollectableKind::RecoveryOrb => {
                            Collectable::recovery_orb(pos, &self.tuning.collect)
                        }
                    };
                    self.collectables.push(collectable);
                }
            }
        }
    }

    /// One draw call per active entity; rendering itself is delegated
    pub fn render_fight_scene(&self, sink: &mut dyn DrawSink) {
        for bullet in &self.active {
            match bullet {
                Bullet::Pooled(slot) => self.slots[*slot].render(sink),
                Bullet::Scripted(slam) => slam.render(sink),
            }
        }
        for collectable in &self.collectables {
            collectable.render(sink);
        }
    }

    /// Retire every bullet (pooled slots go back to the free stack) and
    /// drop all collectables
    pub fn clear_bullets(&mut self) {
        for bullet in self.active.drain(..) {
            if let Bullet::Pooled(slot) = bullet {
                self.free.push(slot);
            }
        }
        self.collectables.clear();
        debug!("cleared fight scene ({} slots pooled)", self.free.len());
    }

    /// Allow or freeze player movement (read by the scene's input layer)
    pub fn set_player_movement(&self, player: &mut Player, enabled: bool) {
        player.set_movement_enabled(enabled);
    }

    /// Reposition the player to the battle frame center
    pub fn center_player(&self, player: &mut Player) {
        player.set_pos(self.frame.center());
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn pooled_count(&self) -> usize {
        self.free.len()
    }

    pub fn collectable_count(&self) -> usize {
        self.collectables.len()
    }
}

/// Fully outside the frame, with a margin of half the entity's larger
/// dimension
fn out_of_frame(frame: Rect, body: &Body) -> bool {
    let margin = body.size().x.max(body.size().y) / 2.0;
    !frame.expand(margin).contains(body.pos())
}
