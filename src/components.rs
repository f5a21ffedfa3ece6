//! Component payloads. Pure data, behavior lives in the simulators
//! ([`crate::physics`], [`crate::player`]) that operate on these tables.

use crate::constants;
use crate::math::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyKind {
    #[default]
    Dynamic,
    Static,
}

/// An axis-aligned 2D rigid body.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoxBody {
    pub position: Vec2,
    pub velocity: Vec2,
    pub rotation: f32,
    pub angular_velocity: f32,
    /// Non-negative. A zero-extent body participates in no overlap tests.
    pub half_extents: Vec2,
    pub kind: BodyKind,
    pub is_trigger: bool,
}

impl BoxBody {
    pub fn is_zero_extent(&self) -> bool {
        self.half_extents.x <= 0.0 && self.half_extents.y <= 0.0
    }
}

/// Quantized input bits. Bits beyond these four are reserved and ignored.
pub type PlayerInput = u8;

pub mod player_input {
    use super::PlayerInput;

    pub const NONE: PlayerInput = 0;
    pub const UP: PlayerInput = 1 << 0;
    pub const DOWN: PlayerInput = 1 << 1;
    pub const LEFT: PlayerInput = 1 << 2;
    pub const RIGHT: PlayerInput = 1 << 3;
}

/// A player-controlled character. Composition, not inheritance: a player
/// owns a `BoxBody` that lives on the same entity, it does not subclass one.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerCharacter {
    pub player_number: u8,
    pub input: PlayerInput,
    pub health: i16,
    pub invincibility_timer: f32,
    pub shoot_cooldown: f32,
    /// Informational win counter; the authoritative win state lives in
    /// `GameManager`.
    pub wins: u32,
}

impl PlayerCharacter {
    /// Speed cap shared by every player, not a per-entity field since it
    /// must match across peers.
    pub const MAX_SPEED: f32 = constants::PLAYER_MAX_SPEED;

    pub fn new(player_number: u8) -> Self {
        Self {
            player_number,
            input: player_input::NONE,
            health: constants::PLAYER_HEALTH,
            invincibility_timer: 0.0,
            shoot_cooldown: 0.0,
            wins: 0,
        }
    }
}

/// Position/rotation/scale. Pure data: never read by the simulators, only
/// written at the end of a replay for rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    pub rotation: f32,
    pub scale: Vec2,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
        }
    }
}
