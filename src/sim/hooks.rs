//! Collaborator seams: sounds, collection callbacks, and draw submission
//!
//! The simulation fires named triggers and emits draw calls; what happens
//! with them is the embedding game's business. Everything is injected,
//! never looked up globally.

use glam::Vec2;

use super::collectable::CollectableKind;

/// Fire-and-forget callbacks out of the simulation
pub trait FightHooks {
    /// Named sound-effect trigger ("weaken", "explode", "collect", ...)
    fn sound(&mut self, _name: &str) {}

    /// A collectable was captured by the player
    fn collected(&mut self, _kind: CollectableKind, _value: u32) {}
}

/// Hooks that discard everything (tests, headless runs)
pub struct NullHooks;

impl FightHooks for NullHooks {}

/// One draw call for one entity
#[derive(Debug, Clone, Copy)]
pub struct SpriteInstance {
    pub pos: Vec2,
    pub angle: f32,
    pub scale: Vec2,
    pub tint: [f32; 4],
    /// Texture/atlas frame id (from the entity's animation, 0 when none)
    pub frame: u32,
}

/// Receives one sprite per active entity per `render_fight_scene` call
pub trait DrawSink {
    fn draw(&mut self, sprite: SpriteInstance);
}

impl DrawSink for Vec<SpriteInstance> {
    fn draw(&mut self, sprite: SpriteInstance) {
        self.push(sprite);
    }
}

/// Deferred effects produced while iterating entities. Applied by the
/// object manager after the full pass so no entity update mutates the
/// collections being walked.
#[derive(Debug, Clone)]
pub enum FightEvent {
    Sound(&'static str),
    SpawnCollectable {
        kind: CollectableKind,
        pos: Vec2,
        value: u32,
    },
    DamageEnemy(f32),
}
