//! Per-frame simulation step
//!
//! One call per display frame; velocities are in units per frame, so there
//! is no timestep.

use super::collision::{FrameOutcome, resolve_collisions};
use super::input::InputTracker;
use super::state::{GameEvent, SessionState};

/// Input commands for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Paddle direction: -1 left, 1 right, 0 still
    pub direction: f32,
}

impl From<&InputTracker> for TickInput {
    fn from(input: &InputTracker) -> Self {
        Self {
            direction: input.direction(),
        }
    }
}

/// Advance the session by one frame: collisions, then ball, then paddle.
///
/// Movement is skipped on the frame the ball is re-served or the session
/// ends.
pub fn tick(state: &mut SessionState, input: &TickInput, events: &mut Vec<GameEvent>) -> FrameOutcome {
    let outcome = resolve_collisions(state, events);
    if outcome == FrameOutcome::Continue {
        state.ball.integrate();
        state.paddle.shift(input.direction);
    }
    outcome
}
