use crate::vector::Vector2;
use serde::{Deserialize, Serialize};

/// A connected player as tracked by the relay and mirrored by every client.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Player {
    pub id: u32,
    pub name: String,
    pub x: f32,
    pub y: f32,
    /// Heading in radians. Accumulates without wrapping.
    pub rotation: f32,
}

impl Player {
    pub fn new(id: u32, name: String, x: f32, y: f32, rotation: f32) -> Self {
        Self {
            id,
            name,
            x,
            y,
            rotation,
        }
    }

    pub fn position(&self) -> Vector2 {
        Vector2::new(self.x, self.y)
    }
}

/// Messages a client sends to the relay.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum ClientMessage {
    /// Chosen display name. `None` or an empty string means "use my id".
    Name { name: Option<String> },
    Shoot,
    Die,
    /// Victim id. Scoring is client-side; the relay does not act on it.
    Kill { id: u32 },
    Win,
    Move { x: f32, y: f32 },
    Rotate { rotation: f32 },
}

/// Messages the relay sends to clients.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum ServerMessage {
    /// Sent only to a freshly named connection.
    Init {
        player: Player,
        players: Vec<Player>,
        map_walls: Vec<String>,
        spawn_position: Vector2,
    },
    PlayerJoin {
        id: u32,
        x: f32,
        y: f32,
        rotation: f32,
        name: String,
    },
    PlayerLeave {
        id: u32,
    },
    PlayerShoot {
        id: u32,
    },
    PlayerDie {
        id: u32,
    },
    PlayerWin {
        id: u32,
    },
    PlayerUpdatePosition {
        id: u32,
        x: f32,
        y: f32,
    },
    PlayerUpdateRotation {
        id: u32,
        rotation: f32,
    },
}
