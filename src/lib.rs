//! glitchrun: tile collision and parkour movement core for a 2D platformer.
//!
//! A [`TileCollisionBuilder`] turns a [`TileGrid`] into a [`CollisionSpace`]
//! at level load. Each tick, a [`CollisionSystem`] borrowing that space
//! resolves movement for the [`Actor`] and any [`SimpleBody`]. Hazards near
//! the actor feed the corruption model, which bends gravity, friction and
//! inertia while the actor stays close.

pub mod actor;
pub mod api;
pub mod body;
pub mod builder;
pub mod collision;
pub mod config;
pub mod corruption;
pub mod error;
pub mod input;
pub mod narrowphase;
pub mod space;
pub mod timers;
pub mod types;

pub use crate::actor::{Actor, ActorFlags};
pub use crate::api::*;
pub use crate::body::SimpleBody;
pub use crate::builder::{BuildStats, NonEmptySolid, TileCollisionBuilder};
pub use crate::collision::CollisionSystem;
pub use crate::config::{ActorConfig, CoreConfig, CorruptionConfig};
pub use crate::corruption::{CorruptionState, PhysicsMultipliers};
pub use crate::error::ConfigError;
pub use crate::input::ActorInput;
pub use crate::narrowphase::Narrowphase;
pub use crate::space::CollisionSpace;
pub use crate::timers::{Timer, TimerSet, Timers};
pub use crate::types::*;
