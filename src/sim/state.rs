//! Session state and core simulation types
//!
//! Everything a running session mutates lives in [`SessionState`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::brick_origin;
use crate::consts::*;

/// Controller run state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    /// Waiting for `start()`
    NotStarted,
    /// Active gameplay
    Running,
    /// Frozen until toggled back or resumed
    Paused,
    /// Session over until restarted
    Ended(Outcome),
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Loss,
}

/// Notifications produced by the core for the UI shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    BrickDestroyed { column: usize, row: usize },
    ScoreChanged(u32),
    LivesChanged(u32),
    LifeLost { lives_left: u32 },
    SessionEnded(Outcome),
    RunStateChanged(RunState),
}

/// The ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Default for Ball {
    fn default() -> Self {
        Self {
            pos: Self::SERVE_POS,
            vel: Self::LAUNCH_VEL,
            radius: BALL_RADIUS,
        }
    }
}

impl Ball {
    /// Serve position, centred above the paddle
    pub const SERVE_POS: Vec2 = Vec2::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT - BALL_SERVE_OFFSET);
    pub const LAUNCH_VEL: Vec2 = Vec2::new(BALL_LAUNCH_VX, BALL_LAUNCH_VY);

    /// Position after one more frame at the current velocity
    #[inline]
    pub fn next_pos(&self) -> Vec2 {
        self.pos + self.vel
    }

    /// Advance by one frame
    #[inline]
    pub fn integrate(&mut self) {
        self.pos += self.vel;
    }
}

/// The player's paddle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    /// Left edge
    pub x: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
}

impl Default for Paddle {
    fn default() -> Self {
        Self {
            x: (FIELD_WIDTH - PADDLE_WIDTH) / 2.0,
            width: PADDLE_WIDTH,
            height: PADDLE_HEIGHT,
            speed: PADDLE_SPEED,
        }
    }
}

impl Paddle {
    /// Largest allowed left edge
    #[inline]
    pub fn max_x(&self) -> f32 {
        FIELD_WIDTH - self.width
    }

    /// Top edge; the paddle sits flush with the bottom of the field
    #[inline]
    pub fn y(&self) -> f32 {
        FIELD_HEIGHT - self.height
    }

    /// Whether `x` lies over the paddle (edges included)
    #[inline]
    pub fn spans(&self, x: f32) -> bool {
        x >= self.x && x <= self.x + self.width
    }

    /// Move by `direction` (-1, 0 or 1) times speed, clamped to the field
    pub fn shift(&mut self, direction: f32) {
        self.x = (self.x + direction * self.speed).clamp(0.0, self.max_x());
    }
}

/// Brick status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrickStatus {
    Active,
    Destroyed,
}

/// A brick in the grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub column: usize,
    pub row: usize,
    /// Top-left corner
    pub pos: Vec2,
    pub status: BrickStatus,
}

impl Brick {
    pub fn new(column: usize, row: usize) -> Self {
        Self {
            column,
            row,
            pos: brick_origin(column, row),
            status: BrickStatus::Active,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == BrickStatus::Active
    }

    /// Strict containment: a point on the edge is not inside
    pub fn contains(&self, point: Vec2) -> bool {
        point.x > self.pos.x
            && point.x < self.pos.x + BRICK_WIDTH
            && point.y > self.pos.y
            && point.y < self.pos.y + BRICK_HEIGHT
    }
}

/// Fixed-size brick grid, stored column-major
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrickGrid {
    columns: usize,
    rows: usize,
    bricks: Vec<Brick>,
}

impl BrickGrid {
    /// Build a grid with every brick active
    pub fn new(columns: usize, rows: usize) -> Self {
        let mut bricks = Vec::with_capacity(columns * rows);
        for column in 0..columns {
            for row in 0..rows {
                bricks.push(Brick::new(column, row));
            }
        }
        Self {
            columns,
            rows,
            bricks,
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Total bricks, destroyed ones included
    pub fn len(&self) -> usize {
        self.bricks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bricks.is_empty()
    }

    pub fn get(&self, column: usize, row: usize) -> Option<&Brick> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        self.bricks.get(column * self.rows + row)
    }

    /// Bricks in scan order (column-major, then row)
    pub fn iter(&self) -> impl Iterator<Item = &Brick> {
        self.bricks.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Brick> {
        self.bricks.iter_mut()
    }

    pub fn active_count(&self) -> usize {
        self.bricks.iter().filter(|b| b.is_active()).count()
    }
}

/// Complete session state, owned by the game loop controller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub score: u32,
    pub lives: u32,
    pub ball: Ball,
    pub paddle: Paddle,
    pub grid: BrickGrid,
    /// Lives restored by `reset`
    pub starting_lives: u32,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(STARTING_LIVES)
    }
}

impl SessionState {
    /// Fresh state with no grid built yet
    pub fn new(starting_lives: u32) -> Self {
        Self {
            score: 0,
            lives: starting_lives,
            ball: Ball::default(),
            paddle: Paddle::default(),
            grid: BrickGrid::default(),
            starting_lives,
        }
    }

    /// Zero the score, restore lives and serve. Leaves the grid alone.
    pub fn reset(&mut self) {
        self.score = 0;
        self.lives = self.starting_lives;
        self.serve();
    }

    /// Re-centre ball and paddle and restore the launch velocity
    pub fn serve(&mut self) {
        self.ball = Ball::default();
        self.paddle.x = (FIELD_WIDTH - self.paddle.width) / 2.0;
    }

    /// Allocate a fresh grid with every brick active
    pub fn init_grid(&mut self, columns: usize, rows: usize) {
        self.grid = BrickGrid::new(columns, rows);
    }

    pub fn has_grid(&self) -> bool {
        !self.grid.is_empty()
    }

    pub fn total_bricks(&self) -> usize {
        self.grid.len()
    }

    pub fn active_bricks(&self) -> usize {
        self.grid.active_count()
    }

    pub fn brick(&self, column: usize, row: usize) -> Option<&Brick> {
        self.grid.get(column, row)
    }

    /// Every brick destroyed
    pub fn is_cleared(&self) -> bool {
        self.has_grid() && self.score as usize == self.total_bricks()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_session() {
        let mut state = SessionState::default();
        state.init_grid(BRICK_COLUMNS, BRICK_ROWS);
        state.reset();

        assert_eq!(state.total_bricks(), 45);
        assert_eq!(state.active_bricks(), 45);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, 4);
        assert_eq!(state.paddle.x, 350.0);
        assert_eq!(state.ball.pos, Vec2::new(400.0, 570.0));
        assert_eq!(state.ball.vel, Vec2::new(5.0, -5.0));
    }

    #[test]
    fn test_brick_layout() {
        let grid = BrickGrid::new(9, 5);
        assert_eq!(grid.get(0, 0).unwrap().pos, Vec2::new(30.0, 60.0));
        assert_eq!(grid.get(1, 0).unwrap().pos, Vec2::new(115.0, 60.0));
        assert_eq!(grid.get(0, 1).unwrap().pos, Vec2::new(30.0, 90.0));
        assert_eq!(grid.get(8, 4).unwrap().pos, Vec2::new(710.0, 180.0));
        assert!(grid.get(9, 0).is_none());
        assert!(grid.get(0, 5).is_none());
    }

    #[test]
    fn test_grid_scan_order_is_column_major() {
        let grid = BrickGrid::new(3, 2);
        let order: Vec<_> = grid.iter().map(|b| (b.column, b.row)).collect();
        assert_eq!(order, vec![(0, 0), (0, 1), (1, 0), (1, 1), (2, 0), (2, 1)]);
    }

    #[test]
    fn test_reset_keeps_grid() {
        let mut state = SessionState::default();
        state.init_grid(2, 2);
        state.grid.iter_mut().next().unwrap().status = BrickStatus::Destroyed;
        state.score = 1;
        state.lives = 1;
        state.reset();

        assert_eq!(state.score, 0);
        assert_eq!(state.lives, 4);
        assert_eq!(state.active_bricks(), 3);
    }

    #[test]
    fn test_brick_contains_is_strict() {
        let brick = Brick::new(0, 0);
        assert!(brick.contains(Vec2::new(31.0, 61.0)));
        assert!(brick.contains(Vec2::new(104.9, 79.9)));
        assert!(!brick.contains(Vec2::new(30.0, 70.0)));
        assert!(!brick.contains(Vec2::new(105.0, 70.0)));
        assert!(!brick.contains(Vec2::new(50.0, 60.0)));
        assert!(!brick.contains(Vec2::new(50.0, 80.0)));
    }

    #[test]
    fn test_paddle_shift_clamps() {
        let mut paddle = Paddle::default();
        paddle.x = 695.0;
        paddle.shift(1.0);
        assert_eq!(paddle.x, 700.0);
        paddle.x = 3.0;
        paddle.shift(-1.0);
        assert_eq!(paddle.x, 0.0);
        paddle.shift(0.0);
        assert_eq!(paddle.x, 0.0);
    }

    #[test]
    fn test_paddle_span_includes_edges() {
        let paddle = Paddle::default();
        assert!(paddle.spans(350.0));
        assert!(paddle.spans(400.0));
        assert!(paddle.spans(450.0));
        assert!(!paddle.spans(349.9));
        assert!(!paddle.spans(450.1));
    }
}
