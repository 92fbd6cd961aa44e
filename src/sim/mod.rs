//! Frame simulation module
//!
//! All gameplay logic lives here. No rendering or platform dependencies:
//! - One step per display frame, velocities in units per frame
//! - Stable iteration order (bricks scanned column-major)
//! - Session state passed explicitly, never global

pub mod collision;
pub mod input;
pub mod state;
pub mod tick;

pub use collision::{FrameOutcome, ball_brick_collisions, ball_wall_collisions, resolve_collisions};
pub use input::{InputAction, InputTracker, Key};
pub use state::{
    Ball, Brick, BrickGrid, BrickStatus, GameEvent, Outcome, Paddle, RunState, SessionState,
};
pub use tick::{TickInput, tick};
