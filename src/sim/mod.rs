//! Deterministic combat simulation
//!
//! All fight logic lives here. This module must be pure and deterministic:
//! - Fixed timestep driven by the caller
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies; presentation goes through
//!   the collaborator traits in `hooks` and `anim`

pub mod anim;
pub mod collectable;
pub mod enemy;
pub mod entity;
pub mod geometry;
pub mod hooks;
pub mod manager;
pub mod player;
pub mod projectile;
pub mod rounds;
pub mod slam;

pub use anim::{AnimFrame, Animation, AnimationProvider, NullAnimations};
pub use collectable::{Collectable, CollectableKind};
pub use enemy::Enemy;
pub use entity::Body;
pub use geometry::{
    Circle, Rect, circle_circle, point_in_triangle, rect_circle, rect_rect,
};
pub use hooks::{DrawSink, FightEvent, FightHooks, NullHooks, SpriteInstance};
pub use manager::ObjectManager;
pub use player::Player;
pub use projectile::{Behavior, Projectile, ProjectileParams, TrailPoint};
pub use rounds::{
    FingerRound, Round, RoundCtx, RoundScheduler, RoundSignal, SnakeRound, SpecialRound,
    SwarmRound, standard_rounds,
};
pub use slam::{AfterImage, SlamAttack, SlamSide, SlamState};
