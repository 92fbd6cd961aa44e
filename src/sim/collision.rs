//! Collision detection and response
//!
//! Runs once per frame against the current positions, before the ball is
//! integrated. Every response is a sign flip, so the ball never changes
//! speed.

use super::state::{BrickStatus, GameEvent, Outcome, SessionState};
use crate::consts::*;

/// What the rest of the frame should do after collisions are resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Keep going: integrate the ball and move the paddle
    Continue,
    /// A life was lost and the ball re-served; skip movement this frame
    Served,
    /// The session is over
    Ended(Outcome),
}

/// Resolve all collisions for one frame
pub fn resolve_collisions(state: &mut SessionState, events: &mut Vec<GameEvent>) -> FrameOutcome {
    if let Some(outcome) = ball_brick_collisions(state, events) {
        return FrameOutcome::Ended(outcome);
    }
    ball_wall_collisions(state, events)
}

/// Destroy every active brick whose rectangle holds the ball centre.
///
/// Overlaps are handled in grid scan order; two bricks hit in the same
/// frame flip the vertical velocity twice. Returns `Some(Win)` as soon as
/// the last brick goes.
pub fn ball_brick_collisions(
    state: &mut SessionState,
    events: &mut Vec<GameEvent>,
) -> Option<Outcome> {
    let total = state.grid.len();
    let center = state.ball.pos;

    for brick in state.grid.iter_mut() {
        if !brick.is_active() || !brick.contains(center) {
            continue;
        }

        state.ball.vel.y = -state.ball.vel.y;
        brick.status = BrickStatus::Destroyed;
        state.score += 1;

        log::debug!(
            "Brick ({}, {}) destroyed, score {}",
            brick.column,
            brick.row,
            state.score
        );
        events.push(GameEvent::BrickDestroyed {
            column: brick.column,
            row: brick.row,
        });
        events.push(GameEvent::ScoreChanged(state.score));

        if state.score as usize == total {
            log::info!("All {} bricks cleared", total);
            events.push(GameEvent::SessionEnded(Outcome::Win));
            return Some(Outcome::Win);
        }
    }

    None
}

/// Side walls, ceiling, and the paddle/bottom edge.
///
/// Checks use the position one frame ahead. At the bottom the ball bounces
/// if its current x is over the paddle; otherwise a life is lost.
pub fn ball_wall_collisions(state: &mut SessionState, events: &mut Vec<GameEvent>) -> FrameOutcome {
    let ball = &mut state.ball;
    let next = ball.next_pos();

    if next.x > FIELD_WIDTH - ball.radius || next.x < ball.radius {
        ball.vel.x = -ball.vel.x;
    }

    if next.y < ball.radius {
        ball.vel.y = -ball.vel.y;
    } else if next.y > FIELD_HEIGHT - ball.radius {
        if state.paddle.spans(ball.pos.x) {
            ball.vel.y = -ball.vel.y;
        } else {
            return lose_life(state, events);
        }
    }

    FrameOutcome::Continue
}

fn lose_life(state: &mut SessionState, events: &mut Vec<GameEvent>) -> FrameOutcome {
    state.lives = state.lives.saturating_sub(1);
    events.push(GameEvent::LivesChanged(state.lives));
    events.push(GameEvent::LifeLost {
        lives_left: state.lives,
    });

    if state.lives == 0 {
        log::info!("Last life lost at score {}", state.score);
        events.push(GameEvent::SessionEnded(Outcome::Loss));
        return FrameOutcome::Ended(Outcome::Loss);
    }

    log::info!("Ball missed the paddle, {} lives left", state.lives);
    state.serve();
    FrameOutcome::Served
}
