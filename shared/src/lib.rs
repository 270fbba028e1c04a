//! Types and rules shared by the relay and the clients: world-plane math,
//! rectangle collision, map grids, the message vocabulary and its framing.

use std::f32::consts::PI;

pub mod body;
pub mod collision;
pub mod frame;
pub mod map;
pub mod protocol;
pub mod vector;

pub use body::{Body, Edges, Shape};
pub use collision::{resolve_collision, Axis, Mover, Resolution};
pub use frame::{read_frame, write_frame, FrameError};
pub use map::Map;
pub use protocol::{ClientMessage, Player, ServerMessage};
pub use vector::Vector2;

/// Side of the square player hitbox.
pub const PLAYER_WIDTH: f32 = 0.3;
/// Rendered height of a player. Not part of the hitbox.
pub const PLAYER_HEIGHT: f32 = 0.8;
pub const PLAYER_SPEED: f32 = 1.5;
/// Radians per second while a turn key is held.
pub const PLAYER_ROTATION_SPEED: f32 = 0.9 * PI;
/// Heading given to every newly joined player.
pub const SPAWN_ROTATION: f32 = PI;

pub const BULLET_SIZE: f32 = 0.05;
pub const BULLET_SPEED: f32 = 3.0;
pub const BULLET_TTL_SECS: f64 = 8.0;

pub const WALL_SYMBOL: char = '#';
pub const WALL_SIZE: f32 = 1.0;
pub const WALL_HEIGHT: f32 = 1.0;

pub const SHOT_COOLDOWN_SECS: f64 = 0.25;
pub const DEATH_LOCKOUT_SECS: f64 = 0.5;
pub const KILL_COOLDOWN_SECS: f64 = 1.0;
pub const WIN_SCORE: u32 = 10;
pub const WIN_ANNOUNCE_DELAY_SECS: f64 = 0.1;
pub const RELOAD_DELAY_SECS: f64 = 10.0;

pub const DEFAULT_PORT: u16 = 4000;
