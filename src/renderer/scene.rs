//! Draws one frame of the session
//!
//! Pure with respect to game state: brick positions are recomputed from the
//! grid layout on every call.

use glam::Vec2;

use super::Canvas;
use super::vertex::colors;
use crate::brick_origin;
use crate::consts::*;
use crate::sim::{RunState, SessionState};

/// Draw the field: background, active bricks, ball, paddle, and the pause
/// label when paused
pub fn render<C: Canvas + ?Sized>(state: &SessionState, run_state: RunState, canvas: &mut C) {
    canvas.begin_frame(FIELD_WIDTH, FIELD_HEIGHT);

    draw_bricks(state, canvas);
    canvas.fill_circle(state.ball.pos, state.ball.radius, colors::BALL);

    let paddle = &state.paddle;
    canvas.fill_rect(
        Vec2::new(paddle.x, paddle.y()),
        Vec2::new(paddle.width, paddle.height),
        colors::PADDLE,
    );

    if run_state == RunState::Paused {
        canvas.fill_text(
            "PAUSED",
            Vec2::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT / 2.0),
            PAUSE_LABEL_SIZE,
            colors::PAUSE_LABEL,
        );
    }

    canvas.end_frame();
}

fn draw_bricks<C: Canvas + ?Sized>(state: &SessionState, canvas: &mut C) {
    let size = Vec2::new(BRICK_WIDTH, BRICK_HEIGHT);
    for brick in state.grid.iter().filter(|b| b.is_active()) {
        canvas.fill_rect(brick_origin(brick.column, brick.row), size, colors::BRICK);
    }
}
