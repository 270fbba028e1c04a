use crate::game::ClientGameState;
use ::rand::Rng;
use macroquad::prelude::*;
use shared::{Vector2, BULLET_SIZE, PLAYER_HEIGHT, PLAYER_WIDTH, WALL_HEIGHT, WALL_SIZE};

/// How long an announcement stays on screen
const BANNER_SECS: f64 = 3.0;
const FIELD_OF_VIEW_DEGREES: f32 = 80.0;
const EYE_HEIGHT: f32 = 0.0;
const FLOOR_EXTENT: f32 = 64.0;

/// Maps a point on the arena floor plan to world space, `height` above eye level
pub fn world_position(position: Vector2, height: f32) -> Vec3 {
    vec3(position.x, height, position.y)
}

/// One random opaque color per wall
pub fn random_wall_colors(count: usize) -> Vec<Color> {
    let mut rng = ::rand::thread_rng();
    (0..count)
        .map(|_| Color::new(rng.gen(), rng.gen(), rng.gen(), 1.0))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
struct Banner {
    text: String,
    shown_at: f64,
}

impl Banner {
    fn visible(&self, now: f64) -> bool {
        now - self.shown_at < BANNER_SECS
    }
}

pub struct Renderer {
    wall_colors: Vec<Color>,
    map_generation: u32,
    banner: Option<Banner>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            wall_colors: Vec::new(),
            map_generation: 0,
            banner: None,
        }
    }

    pub fn announce(&mut self, text: String, now: f64) {
        self.banner = Some(Banner {
            text,
            shown_at: now,
        });
    }

    pub fn render(&mut self, state: &ClientGameState, connected: bool, now: f64) {
        clear_background(Color::from_rgba(26, 26, 26, 255));

        let Some(local) = state.local() else {
            set_default_camera();
            let status = if connected {
                "Connecting..."
            } else {
                "Disconnected from relay"
            };
            draw_text(status, 20.0, 40.0, 30.0, WHITE);
            return;
        };

        if state.map_generation() != self.map_generation
            || state.walls().len() != self.wall_colors.len()
        {
            self.wall_colors = random_wall_colors(state.walls().len());
            self.map_generation = state.map_generation();
        }

        let eye = world_position(local.position(), EYE_HEIGHT);
        let target = eye + world_position(local.look_at(), 0.0);
        set_camera(&Camera3D {
            position: eye,
            target,
            up: vec3(0.0, 1.0, 0.0),
            fovy: FIELD_OF_VIEW_DEGREES.to_radians(),
            ..Default::default()
        });

        self.draw_world(state);

        set_default_camera();
        self.draw_hud(state, &local.name, connected, now);
    }

    fn draw_world(&self, state: &ClientGameState) {
        let floor = -WALL_HEIGHT / 2.0;
        draw_plane(
            vec3(FLOOR_EXTENT / 2.0, floor, FLOOR_EXTENT / 2.0),
            vec2(FLOOR_EXTENT, FLOOR_EXTENT),
            None,
            Color::from_rgba(68, 68, 68, 255),
        );

        for (wall, color) in state.walls().iter().zip(&self.wall_colors) {
            draw_cube(
                world_position(wall.position, 0.0),
                vec3(WALL_SIZE, WALL_HEIGHT, WALL_SIZE),
                None,
                *color,
            );
        }

        let player_center = floor + PLAYER_HEIGHT / 2.0;
        for remote in state.remotes() {
            let center = world_position(remote.position(), player_center);
            let size = vec3(PLAYER_WIDTH, PLAYER_HEIGHT, PLAYER_WIDTH);
            draw_cube(center, size, None, Color::from_rgba(255, 68, 68, 255));
            draw_cube_wires(center, size, WHITE);
        }

        for bullet in state.bullets() {
            let color = if bullet.is_frozen() { GRAY } else { YELLOW };
            draw_cube(
                world_position(bullet.body.position, EYE_HEIGHT - 0.1),
                vec3(BULLET_SIZE, BULLET_SIZE, BULLET_SIZE),
                None,
                color,
            );
        }
    }

    fn draw_hud(&mut self, state: &ClientGameState, name: &str, connected: bool, now: f64) {
        draw_text(&format!("Score: {}", state.score()), 10.0, 24.0, 24.0, WHITE);
        draw_text(name, 10.0, 48.0, 18.0, LIGHTGRAY);
        draw_text(
            &format!("{} players", state.remotes().len() + 1),
            10.0,
            68.0,
            18.0,
            LIGHTGRAY,
        );

        if !connected {
            draw_text("Disconnected from relay", 10.0, 92.0, 18.0, RED);
        }

        if state.is_dead() {
            let size = measure_text("Respawning", None, 40, 1.0);
            draw_text(
                "Respawning",
                (screen_width() - size.width) / 2.0,
                screen_height() / 2.0,
                40.0,
                RED,
            );
        }

        // Crosshair
        let (cx, cy) = (screen_width() / 2.0, screen_height() / 2.0);
        draw_line(cx - 6.0, cy, cx + 6.0, cy, 1.0, WHITE);
        draw_line(cx, cy - 6.0, cx, cy + 6.0, 1.0, WHITE);

        if let Some(banner) = &self.banner {
            if !banner.visible(now) {
                self.banner = None;
                return;
            }
            let size = measure_text(&banner.text, None, 48, 1.0);
            draw_text(
                &banner.text,
                (screen_width() - size.width) / 2.0,
                screen_height() / 3.0,
                48.0,
                GOLD,
            );
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
