//! Deterministic rollback-netcode simulation core.
//!
//! This crate is the simulation heart of a two-player real-time game: an
//! entity/component store, a fixed-step AABB physics simulator, a
//! player-character simulator, and a rollback manager that keeps a
//! speculative and a confirmed simulation state in lockstep, replaying on
//! demand when late input arrives. Rendering, asset loading, the network
//! transport, and process/CLI wiring are outside this crate, see
//! [`game::GameManager`] for the external surface a host integrates
//! against.

pub mod component_table;
pub mod components;
pub mod constants;
pub mod entity;
pub mod error;
pub mod game;
pub mod math;
pub mod physics;
pub mod player;
pub mod protocol;
pub mod ring_buffer;
pub mod rollback;

pub mod prelude {
    pub use crate::components::{player_input, BodyKind, BoxBody, PlayerCharacter, PlayerInput, Transform};
    pub use crate::entity::{ComponentMask, Entity, EntityStore, Frame, PlayerNumber};
    pub use crate::error::RollbackError;
    pub use crate::game::GameManager;
    pub use crate::math::Vec2;
}
