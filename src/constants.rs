//! Wire-contract constants. Every value here must match across all peers;
//! changing one without bumping a protocol version desyncs every client.

use crate::math::Vec2;

/// Fixed simulation step. The host drives the core at this cadence.
pub const FIXED_PERIOD: f32 = 1.0 / 50.0;

/// This engine supports exactly two players (see Non-goals).
pub const MAX_PLAYERS: usize = 2;

/// Sentinel for "no such player".
pub const INVALID_PLAYER: u8 = u8::MAX;

/// Capacity of each player's input ring buffer, i.e. the maximum tolerable
/// rollback window in frames.
pub const RING_BUFFER_CAPACITY: usize = 64;

pub const PLAYER_SPEED: f32 = 1.0;
pub const PLAYER_ANGULAR_SPEED_DEG: f32 = 90.0;
pub const PLAYER_MAX_SPEED: f32 = 2.0;

pub const PLAYER_HEALTH: i16 = 5;
pub const PLAYER_INVINCIBILITY_PERIOD: f32 = 1.5;
pub const INVINCIBILITY_FLASH_PERIOD: f32 = 0.5;

/// Half-extents per spawned geometry kind.
pub const PLAYER_HALF_EXTENTS: Vec2 = Vec2::new(0.32, 0.275);
pub const BOX_HALF_EXTENTS: Vec2 = Vec2::new(0.64, 0.16);
pub const WALL_HALF_EXTENTS: Vec2 = Vec2::new(0.32, 50.0);
/// Sized up from `BOX_HALF_EXTENTS` as the obvious "great" variant. See
/// DESIGN.md.
pub const GREAT_BOX_HALF_EXTENTS: Vec2 = Vec2::new(1.28, 0.64);

/// The epsilon used by the static-vs-dynamic axis test in
/// [`crate::physics`].
pub const STATIC_COLLISION_EPSILON: f32 = 0.1;

pub const WALL_POSITION: Vec2 = Vec2::new(4.0, 50.0);

/// Sized for up to 4 players even though only the first `MAX_PLAYERS` are
/// ever assigned, so the table has room if that cap ever grows.
pub const SPAWN_POSITIONS: [Vec2; 4] = [
    Vec2::new(-1.0, 0.0),
    Vec2::new(1.0, 0.0),
    Vec2::new(1.0, -1.0),
    Vec2::new(0.0, 0.0),
];
pub const SPAWN_ROTATIONS: [f32; 4] = [0.0, 0.0, -90.0, 90.0];

pub const SPAWN_BOX_POSITIONS: [Vec2; 10] = [
    Vec2::new(-1.0, 3.0),
    Vec2::new(1.0, 5.0),
    Vec2::new(0.5, 4.0),
    Vec2::new(2.0, 7.0),
    Vec2::new(1.5, 10.0),
    Vec2::new(1.0, 11.0),
    Vec2::new(-0.5, 14.0),
    Vec2::new(0.0, 16.0),
    Vec2::new(-1.5, 20.0),
    Vec2::new(0.0, 22.0),
];
