//! Brick Breaker entry point
//!
//! On the web this is the UI shell: DOM menus, keyboard forwarding, HUD
//! updates and the requestAnimationFrame loop. Natively it runs a headless
//! session with an autopilot.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use brick_breaker::consts::*;
    use brick_breaker::renderer::RenderState;
    use brick_breaker::sim::{GameEvent, Outcome, RunState};
    use brick_breaker::{Game, Settings};

    type SharedGame = Rc<RefCell<Game<RenderState>>>;

    pub async fn run() {
        console_error_panic_hook::set_once();
        let settings = Settings::load();
        let level = settings.log_level().to_level().unwrap_or(log::Level::Info);
        console_log::init_with_level(level).expect("Failed to init logger");

        log::info!("Brick Breaker starting...");
        // Write the effective settings back so they can be edited in place
        settings.save();

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let (width, height) = (FIELD_WIDTH as u32, FIELD_HEIGHT as u32);
        canvas.set_width(width);
        canvas.set_height(height);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height).await;
        let game = Rc::new(RefCell::new(Game::new(settings, render_state)));

        setup_input_handlers(game.clone());
        setup_menu_buttons(game.clone());

        // Initial HUD and start menu
        game.borrow_mut().restart();
        dispatch_events(&game);

        log::info!("Brick Breaker ready");
    }

    /// Forward core events to the DOM
    fn dispatch_events(game: &SharedGame) {
        loop {
            let events = game.borrow_mut().drain_events();
            if events.is_empty() {
                break;
            }
            for event in events {
                match event {
                    GameEvent::ScoreChanged(score) => set_text("score", score),
                    GameEvent::LivesChanged(lives) => set_text("lives", lives),
                    GameEvent::RunStateChanged(state) => show_menu(state),
                    GameEvent::SessionEnded(outcome) => {
                        let message = match outcome {
                            Outcome::Win => "YOU WIN!",
                            Outcome::Loss => "GAME OVER",
                        };
                        if let Some(window) = web_sys::window() {
                            let _ = window.alert_with_message(message);
                        }
                        game.borrow_mut().restart();
                    }
                    GameEvent::BrickDestroyed { .. } | GameEvent::LifeLost { .. } => {}
                }
            }
        }
    }

    fn set_text(id: &str, value: u32) {
        let document = web_sys::window().unwrap().document().unwrap();
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(&value.to_string()));
        }
    }

    fn set_visible(document: &web_sys::Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    /// Start menu before a session, Resume/Exit while paused, nothing while
    /// playing
    fn show_menu(state: RunState) {
        let document = web_sys::window().unwrap().document().unwrap();
        let (menu, start, pause) = match state {
            RunState::NotStarted => (true, true, false),
            RunState::Paused => (true, false, true),
            RunState::Running | RunState::Ended(_) => (false, false, false),
        };
        set_visible(&document, "menu", menu);
        set_visible(&document, "startBtn", start);
        set_visible(&document, "resumeBtn", pause);
        set_visible(&document, "exitBtn", pause);
    }

    fn setup_input_handlers(game: SharedGame) {
        let window = web_sys::window().unwrap();

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let schedule = game.borrow_mut().key_down(&event.key());
                dispatch_events(&game);
                if schedule {
                    request_animation_frame(game.clone());
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                game.borrow_mut().key_up(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_menu_buttons(game: SharedGame) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        if let Some(btn) = document.get_element_by_id("startBtn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let schedule = game.borrow_mut().start();
                dispatch_events(&game);
                if schedule {
                    request_animation_frame(game.clone());
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("resumeBtn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let schedule = game.borrow_mut().resume();
                dispatch_events(&game);
                if schedule {
                    request_animation_frame(game.clone());
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("exitBtn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().request_exit();
                if let Some(window) = web_sys::window() {
                    let _ = window.location().set_href("/");
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: SharedGame) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: SharedGame) {
        let reschedule = game.borrow_mut().tick();
        dispatch_events(&game);

        if reschedule {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    let settings = brick_breaker::Settings::load();
    env_logger::Builder::new()
        .filter_level(settings.log_level())
        .parse_default_env()
        .init();
    log::info!("Brick Breaker (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    headless::run(settings);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use brick_breaker::renderer::DrawList;
    use brick_breaker::sim::{GameEvent, RunState};
    use brick_breaker::{Game, Settings};

    /// Upper bound on frames; the ball can cycle forever without clearing
    /// the grid
    const MAX_FRAMES: u64 = 60 * 60 * 10;

    /// Dead zone (units) around the paddle centre where the autopilot holds
    /// still
    const DEAD_ZONE: f32 = 8.0;

    pub fn run(settings: Settings) {
        let mut game = Game::new(settings, DrawList::new());
        let mut scheduled = game.start();

        while scheduled && game.frames() < MAX_FRAMES {
            steer(&mut game);
            scheduled = game.tick();
            for event in game.drain_events() {
                match event {
                    GameEvent::LifeLost { lives_left } => {
                        log::warn!("Life lost at frame {}, {} left", game.frames(), lives_left)
                    }
                    GameEvent::ScoreChanged(score) if score % 10 == 0 => {
                        log::info!("Score {} at frame {}", score, game.frames())
                    }
                    other => log::debug!("{:?}", other),
                }
            }
        }

        let state = game.state();
        match game.run_state() {
            RunState::Ended(outcome) => println!(
                "{:?} after {} frames: score {}, lives {}",
                outcome,
                game.frames(),
                state.score,
                state.lives
            ),
            other => println!(
                "Stopped in {:?} after {} frames: score {}/{}, lives {}",
                other,
                game.frames(),
                state.score,
                state.total_bricks(),
                state.lives
            ),
        }
        game.request_exit();
    }

    /// Hold whichever movement key brings the paddle under the ball
    fn steer(game: &mut Game<DrawList>) {
        let keys = game.settings().keys.clone();
        let (Some(left), Some(right)) = (keys.move_left.first(), keys.move_right.first()) else {
            return;
        };

        let ball_x = game.state().ball.pos.x;
        let paddle = game.state().paddle;
        let centre = paddle.x + paddle.width / 2.0;

        if ball_x > centre + DEAD_ZONE {
            game.key_up(left);
            game.key_down(right);
        } else if ball_x < centre - DEAD_ZONE {
            game.key_up(right);
            game.key_down(left);
        } else {
            game.key_up(left);
            game.key_up(right);
        }
    }
}
