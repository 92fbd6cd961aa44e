//! Brick Breaker - A single-screen Breakout game
//!
//! Core modules:
//! - `sim`: Frame simulation (entity state, input tracking, collisions)
//! - `game`: Game loop controller and run/pause/end state machine
//! - `renderer`: Drawing surfaces (recording list, WebGPU pipeline)
//! - `settings`: Data-driven grid size, lives and key bindings

pub mod game;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use game::Game;
pub use settings::{KeyBindings, Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Play field dimensions (logical units, y grows downward)
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Paddle defaults - rides the bottom edge of the field
    pub const PADDLE_WIDTH: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 15.0;
    /// Horizontal paddle speed (units per frame)
    pub const PADDLE_SPEED: f32 = 8.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    /// Launch velocity (units per frame)
    pub const BALL_LAUNCH_VX: f32 = 5.0;
    pub const BALL_LAUNCH_VY: f32 = -5.0;
    /// Distance of the serve position above the bottom edge
    pub const BALL_SERVE_OFFSET: f32 = 30.0;

    /// Brick grid layout
    pub const BRICK_COLUMNS: usize = 9;
    pub const BRICK_ROWS: usize = 5;
    pub const BRICK_WIDTH: f32 = 75.0;
    pub const BRICK_HEIGHT: f32 = 20.0;
    pub const BRICK_PADDING: f32 = 10.0;
    pub const BRICK_OFFSET_TOP: f32 = 60.0;
    pub const BRICK_OFFSET_LEFT: f32 = 30.0;

    /// Lives at the start of a session
    pub const STARTING_LIVES: u32 = 4;

    /// Pause overlay text size
    pub const PAUSE_LABEL_SIZE: f32 = 48.0;
}

use glam::Vec2;

/// Top-left corner of the brick at (column, row)
#[inline]
pub fn brick_origin(column: usize, row: usize) -> Vec2 {
    use consts::*;
    Vec2::new(
        column as f32 * (BRICK_WIDTH + BRICK_PADDING) + BRICK_OFFSET_LEFT,
        row as f32 * (BRICK_HEIGHT + BRICK_PADDING) + BRICK_OFFSET_TOP,
    )
}

/// Right edge of the last column, used to check that a grid fits the field
#[inline]
pub fn grid_right_edge(columns: usize) -> f32 {
    use consts::*;
    if columns == 0 {
        return BRICK_OFFSET_LEFT;
    }
    brick_origin(columns - 1, 0).x + BRICK_WIDTH
}

/// Bottom edge of the last row
#[inline]
pub fn grid_bottom_edge(rows: usize) -> f32 {
    use consts::*;
    if rows == 0 {
        return BRICK_OFFSET_TOP;
    }
    brick_origin(0, rows - 1).y + BRICK_HEIGHT
}
