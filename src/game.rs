//! Game loop controller
//!
//! Owns the session state and the run state machine:
//!
//! ```text
//! NotStarted --start--> Running <--toggle/resume--> Paused
//!                          |
//!                   win or loss
//!                          v
//!                   Ended(outcome) --start--> Running
//! ```
//!
//! The shell drives it: it forwards key events, calls `tick` once per display
//! frame and only schedules another frame when a call says so. Ticks never
//! reschedule themselves while paused or ended, so no cancellation is needed.

use crate::renderer::{Canvas, render};
use crate::settings::Settings;
use crate::sim::{
    self, FrameOutcome, GameEvent, InputAction, InputTracker, RunState, SessionState, TickInput,
};

/// A single playthrough and the surface it is drawn on
pub struct Game<C: Canvas> {
    settings: Settings,
    state: SessionState,
    run_state: RunState,
    input: InputTracker,
    canvas: C,
    /// Events not yet taken by the shell
    events: Vec<GameEvent>,
    /// A frame callback is pending
    frame_scheduled: bool,
    /// Ticks executed this session
    frames: u64,
}

impl<C: Canvas> Game<C> {
    pub fn new(settings: Settings, canvas: C) -> Self {
        let settings = match settings.validate() {
            Ok(()) => settings,
            Err(e) => {
                log::warn!("Invalid settings ({e}), using defaults");
                Settings::default()
            }
        };
        Self {
            state: SessionState::new(settings.starting_lives),
            settings,
            run_state: RunState::NotStarted,
            input: InputTracker::new(),
            canvas,
            events: Vec::new(),
            frame_scheduled: false,
            frames: 0,
        }
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn input(&self) -> &InputTracker {
        &self.input
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Begin a session from NotStarted or Ended.
    ///
    /// Returns true when the caller must schedule the first frame.
    pub fn start(&mut self) -> bool {
        match self.run_state {
            RunState::NotStarted => {}
            RunState::Ended(_) => {
                // Bricks from the finished session must not carry over
                self.state = SessionState::new(self.settings.starting_lives);
            }
            RunState::Running | RunState::Paused => {
                log::warn!("start() ignored while {:?}", self.run_state);
                return false;
            }
        }

        if !self.state.has_grid() {
            self.state
                .init_grid(self.settings.columns, self.settings.rows);
        }
        self.state.reset();
        self.frames = 0;

        self.events.push(GameEvent::ScoreChanged(self.state.score));
        self.events.push(GameEvent::LivesChanged(self.state.lives));
        self.set_run_state(RunState::Running);

        log::info!(
            "Session started: {}x{} bricks, {} lives",
            self.state.grid.columns(),
            self.state.grid.rows(),
            self.state.lives
        );
        self.request_frame()
    }

    /// Leave Paused. Redraws at once without the pause label.
    pub fn resume(&mut self) -> bool {
        if self.run_state != RunState::Paused {
            log::debug!("resume() ignored while {:?}", self.run_state);
            return false;
        }
        self.set_run_state(RunState::Running);
        render(&self.state, self.run_state, &mut self.canvas);
        log::info!("Resumed");
        self.request_frame()
    }

    /// Pause while running, resume while paused; ignored otherwise
    pub fn toggle_pause(&mut self) -> bool {
        match self.run_state {
            RunState::Running => {
                self.set_run_state(RunState::Paused);
                // Frozen frame with the overlay
                render(&self.state, self.run_state, &mut self.canvas);
                log::info!("Paused at score {}", self.state.score);
                false
            }
            RunState::Paused => self.resume(),
            RunState::NotStarted | RunState::Ended(_) => false,
        }
    }

    /// Discard the session and go back to NotStarted. The next `start()`
    /// builds a fresh grid.
    pub fn restart(&mut self) {
        self.state = SessionState::new(self.settings.starting_lives);
        self.input.release_all();
        self.frames = 0;
        self.events.push(GameEvent::ScoreChanged(self.state.score));
        self.events.push(GameEvent::LivesChanged(self.state.lives));
        self.set_run_state(RunState::NotStarted);
        log::info!("Session reset");
    }

    /// Stop the loop before the shell navigates away
    pub fn request_exit(&mut self) {
        log::info!("Exit requested after {} frames", self.frames);
        self.restart();
    }

    /// Raw key-down from the shell. Returns true when a frame must be
    /// scheduled (pause toggled back to running).
    pub fn key_down(&mut self, key: &str) -> bool {
        let Some(key) = self.settings.keys.resolve(key) else {
            return false;
        };
        match self.input.key_down(key) {
            Some(InputAction::TogglePause) => self.toggle_pause(),
            None => false,
        }
    }

    pub fn key_up(&mut self, key: &str) {
        if let Some(key) = self.settings.keys.resolve(key) {
            self.input.key_up(key);
        }
    }

    /// Run one frame: render, collide, move. Returns true when the next
    /// frame should be scheduled.
    pub fn tick(&mut self) -> bool {
        self.frame_scheduled = false;
        if self.run_state != RunState::Running {
            return false;
        }

        render(&self.state, self.run_state, &mut self.canvas);

        let input = TickInput::from(&self.input);
        let outcome = sim::tick(&mut self.state, &input, &mut self.events);
        self.frames += 1;

        if let FrameOutcome::Ended(outcome) = outcome {
            self.set_run_state(RunState::Ended(outcome));
            log::info!(
                "Session ended: {:?} with score {} after {} frames",
                outcome,
                self.state.score,
                self.frames
            );
            return false;
        }

        self.frame_scheduled = true;
        true
    }

    fn request_frame(&mut self) -> bool {
        if self.frame_scheduled {
            return false;
        }
        self.frame_scheduled = true;
        true
    }

    fn set_run_state(&mut self, run_state: RunState) {
        if self.run_state != run_state {
            self.run_state = run_state;
            self.events.push(GameEvent::RunStateChanged(run_state));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::renderer::DrawList;
    use crate::sim::{Ball, BrickStatus, Outcome};
    use glam::Vec2;
    use proptest::prelude::*;

    fn game() -> Game<DrawList> {
        Game::new(Settings::default(), DrawList::new())
    }

    fn started() -> Game<DrawList> {
        let mut game = game();
        assert!(game.start());
        game.drain_events();
        game
    }

    /// Put the ball where the next frame misses the paddle
    fn aim_past_paddle(game: &mut Game<DrawList>) {
        game.state.paddle.x = 600.0;
        game.state.ball.pos = Vec2::new(200.0, 588.0);
        game.state.ball.vel = Vec2::new(5.0, 5.0);
    }

    #[test]
    fn test_start_fresh_session() {
        let mut game = game();
        assert_eq!(game.run_state(), RunState::NotStarted);

        assert!(game.start());

        assert_eq!(game.run_state(), RunState::Running);
        assert_eq!(game.state().active_bricks(), 45);
        assert_eq!(game.state().score, 0);
        assert_eq!(game.state().lives, 4);
        assert_eq!(game.state().paddle.x, 350.0);
        assert_eq!(
            game.drain_events(),
            vec![
                GameEvent::ScoreChanged(0),
                GameEvent::LivesChanged(4),
                GameEvent::RunStateChanged(RunState::Running)
            ]
        );
    }

    #[test]
    fn test_start_ignored_while_running() {
        let mut game = started();
        game.tick();
        let ball = game.state().ball;
        assert!(!game.start());
        assert_eq!(game.state().ball, ball);
        assert!(game.drain_events().is_empty());
    }

    #[test]
    fn test_no_ticks_before_start() {
        let mut game = game();
        assert!(!game.tick());
        assert_eq!(game.canvas().frames_presented(), 0);
        assert_eq!(game.frames(), 0);
    }

    #[test]
    fn test_tick_renders_then_moves() {
        let mut game = started();
        game.key_down("ArrowRight");

        assert!(game.tick());

        // Drawn at the pre-move positions
        assert_eq!(
            game.canvas().circles().next(),
            Some((Vec2::new(400.0, 570.0), BALL_RADIUS))
        );
        assert_eq!(game.state().ball.pos, Vec2::new(405.0, 565.0));
        assert_eq!(game.state().paddle.x, 358.0);
        assert_eq!(game.frames(), 1);
    }

    #[test]
    fn test_held_keys_move_paddle() {
        let mut game = started();
        game.key_down("Left");
        game.tick();
        game.tick();
        assert_eq!(game.state().paddle.x, 334.0);

        game.key_up("Left");
        game.tick();
        assert_eq!(game.state().paddle.x, 334.0);

        game.key_down("q");
        game.tick();
        assert_eq!(game.state().paddle.x, 334.0);
    }

    #[test]
    fn test_pause_freezes_and_resumes_unchanged() {
        let mut game = started();
        for _ in 0..10 {
            game.tick();
        }
        let ball = game.state().ball;
        let paddle = game.state().paddle;
        let presented = game.canvas().frames_presented();

        assert!(!game.key_down(" "));
        assert_eq!(game.run_state(), RunState::Paused);
        assert_eq!(game.canvas().texts().collect::<Vec<_>>(), vec!["PAUSED"]);
        assert_eq!(game.canvas().frames_presented(), presented + 1);

        // The pending frame fires and stops the loop
        assert!(!game.tick());
        assert!(!game.tick());
        assert_eq!(game.canvas().frames_presented(), presented + 1);
        assert_eq!(game.state().ball, ball);
        assert_eq!(game.state().paddle, paddle);

        // Auto-repeat while held does nothing
        assert!(!game.key_down(" "));
        assert_eq!(game.run_state(), RunState::Paused);

        game.key_up(" ");
        assert!(game.key_down("Spacebar"));
        assert_eq!(game.run_state(), RunState::Running);
        assert_eq!(game.canvas().texts().count(), 0);
        assert_eq!(game.state().ball, ball);
        assert_eq!(game.state().paddle, paddle);
        assert!(game.tick());
    }

    #[test]
    fn test_resume_before_pending_frame_keeps_one_loop() {
        let mut game = started();
        game.toggle_pause();
        // The frame requested by start() has not fired yet
        assert!(!game.resume());
        assert_eq!(game.run_state(), RunState::Running);
        assert!(game.tick());
    }

    #[test]
    fn test_resume_only_from_paused() {
        let mut game = game();
        assert!(!game.resume());
        assert_eq!(game.run_state(), RunState::NotStarted);

        game.start();
        assert!(!game.resume());
        assert_eq!(game.run_state(), RunState::Running);

        game.toggle_pause();
        game.tick();
        assert!(game.resume());
        assert_eq!(game.run_state(), RunState::Running);
    }

    #[test]
    fn test_pause_key_ignored_when_not_running() {
        let mut game = game();
        assert!(!game.key_down(" "));
        assert_eq!(game.run_state(), RunState::NotStarted);
        assert!(game.drain_events().is_empty());
    }

    #[test]
    fn test_life_loss_keeps_bricks_and_score() {
        let mut game = started();
        game.state.grid.iter_mut().next().unwrap().status = BrickStatus::Destroyed;
        game.state.score = 1;
        aim_past_paddle(&mut game);

        assert!(game.tick());

        assert_eq!(game.run_state(), RunState::Running);
        assert_eq!(game.state().lives, 3);
        assert_eq!(game.state().score, 1);
        assert_eq!(game.state().active_bricks(), 44);
        assert_eq!(game.state().ball, Ball::default());
        assert_eq!(game.state().paddle.x, 350.0);
        assert_eq!(
            game.drain_events(),
            vec![GameEvent::LivesChanged(3), GameEvent::LifeLost { lives_left: 3 }]
        );
    }

    #[test]
    fn test_loss_ends_session() {
        let mut game = started();
        for lives_left in (0..4).rev() {
            aim_past_paddle(&mut game);
            let scheduled = game.tick();
            assert_eq!(game.state().lives, lives_left);
            assert_eq!(scheduled, lives_left > 0);
        }

        assert_eq!(game.run_state(), RunState::Ended(Outcome::Loss));
        let events = game.drain_events();
        assert!(events.ends_with(&[
            GameEvent::LivesChanged(0),
            GameEvent::LifeLost { lives_left: 0 },
            GameEvent::SessionEnded(Outcome::Loss),
            GameEvent::RunStateChanged(RunState::Ended(Outcome::Loss)),
        ]));

        let frames = game.frames();
        assert!(!game.tick());
        assert_eq!(game.frames(), frames);
    }

    #[test]
    fn test_win_ends_session() {
        let mut game = started();
        for brick in game.state.grid.iter_mut().skip(1) {
            brick.status = BrickStatus::Destroyed;
        }
        game.state.score = 44;
        game.state.ball.pos = Vec2::new(60.0, 70.0);

        assert!(!game.tick());

        assert_eq!(game.run_state(), RunState::Ended(Outcome::Win));
        assert_eq!(game.state().score, 45);
        assert!(game.drain_events().ends_with(&[
            GameEvent::SessionEnded(Outcome::Win),
            GameEvent::RunStateChanged(RunState::Ended(Outcome::Win)),
        ]));
    }

    #[test]
    fn test_start_after_end_builds_fresh_grid() {
        let mut game = started();
        game.state.lives = 1;
        for brick in game.state.grid.iter_mut().take(20) {
            brick.status = BrickStatus::Destroyed;
        }
        aim_past_paddle(&mut game);
        game.tick();
        assert_eq!(game.run_state(), RunState::Ended(Outcome::Loss));

        assert!(game.start());
        assert_eq!(game.run_state(), RunState::Running);
        assert_eq!(game.state().active_bricks(), 45);
        assert_eq!(game.state().lives, 4);
        assert_eq!(game.state().score, 0);
    }

    #[test]
    fn test_restart_and_exit() {
        let mut game = started();
        game.key_down("ArrowLeft");
        game.tick();

        game.restart();
        assert_eq!(game.run_state(), RunState::NotStarted);
        assert!(!game.state().has_grid());
        assert_eq!(game.input().direction(), 0.0);
        assert!(!game.tick());

        // The frame pending from before restart() fired above
        assert!(game.start());
        assert_eq!(game.state().active_bricks(), 45);

        game.request_exit();
        assert_eq!(game.run_state(), RunState::NotStarted);
        assert!(!game.tick());
    }

    #[test]
    fn test_custom_settings() {
        let settings = Settings {
            columns: 3,
            rows: 2,
            starting_lives: 2,
            ..Default::default()
        };
        let mut game = Game::new(settings, DrawList::new());
        game.start();
        assert_eq!(game.state().total_bricks(), 6);
        assert_eq!(game.state().lives, 2);
    }

    #[test]
    fn test_invalid_settings_fall_back() {
        let settings = Settings {
            columns: 0,
            ..Default::default()
        };
        let game = Game::new(settings, DrawList::new());
        assert_eq!(game.settings(), &Settings::default());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Down(&'static str),
        Up(&'static str),
        Tick,
    }

    fn op() -> impl Strategy<Value = Op> {
        let keys = prop_oneof![Just("ArrowLeft"), Just("ArrowRight"), Just(" ")];
        prop_oneof![
            keys.clone().prop_map(Op::Down),
            keys.prop_map(Op::Up),
            Just(Op::Tick),
            Just(Op::Tick),
            Just(Op::Tick),
        ]
    }

    proptest! {
        #[test]
        fn prop_session_invariants(ops in proptest::collection::vec(op(), 0..600)) {
            let mut game = started();
            let mut score = 0;
            let mut lives = STARTING_LIVES;

            for op in ops {
                match op {
                    Op::Down(key) => {
                        if game.key_down(key) {
                            game.tick();
                        }
                    }
                    Op::Up(key) => game.key_up(key),
                    Op::Tick => {
                        game.tick();
                    }
                }

                let state = game.state();
                let ball = state.ball;
                prop_assert!(ball.pos.x >= ball.radius);
                prop_assert!(ball.pos.x <= FIELD_WIDTH - ball.radius);
                prop_assert!(ball.pos.y >= ball.radius);
                prop_assert!(state.paddle.x >= 0.0);
                prop_assert!(state.paddle.x <= FIELD_WIDTH - PADDLE_WIDTH);
                prop_assert!(state.score >= score);
                prop_assert!(state.lives <= lives);
                prop_assert_eq!(
                    state.score as usize,
                    state.total_bricks() - state.active_bricks()
                );
                score = state.score;
                lives = state.lives;

                prop_assert_eq!(
                    game.run_state() == RunState::Ended(Outcome::Loss),
                    state.lives == 0
                );
            }
        }
    }
}
