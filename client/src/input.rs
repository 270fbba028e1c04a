//! Held-key sampling for the local player

use macroquad::prelude::*;

/// Keys held during one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

impl FrameInput {
    /// -1, 0 or 1 along the current heading
    pub fn direction(&self) -> f32 {
        let mut direction = 0.0;
        if self.forward {
            direction += 1.0;
        }
        if self.backward {
            direction -= 1.0;
        }
        direction
    }

    pub fn moving(&self) -> bool {
        self.forward || self.backward
    }

    pub fn turning(&self) -> bool {
        self.left || self.right
    }

    /// Sign of the turn for this frame. Right wins when both are held.
    pub fn turn(&self) -> f32 {
        if self.right {
            -1.0
        } else if self.left {
            1.0
        } else {
            0.0
        }
    }
}

/// Reads the keyboard once per frame
pub struct InputManager;

impl InputManager {
    pub fn new() -> Self {
        Self
    }

    /// Samples arrow keys or WASD for movement, Space to fire
    pub fn sample(&self) -> FrameInput {
        FrameInput {
            forward: is_key_down(KeyCode::Up) || is_key_down(KeyCode::W),
            backward: is_key_down(KeyCode::Down) || is_key_down(KeyCode::S),
            left: is_key_down(KeyCode::Left) || is_key_down(KeyCode::A),
            right: is_key_down(KeyCode::Right) || is_key_down(KeyCode::D),
            fire: is_key_down(KeyCode::Space),
        }
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}
