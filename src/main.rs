//! Flappy Arcade entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, TouchEvent};

    use flappy_arcade::audio::{self, web::AudioManager};
    use flappy_arcade::highscores::http::HttpScoreService;
    use flappy_arcade::platform::FrameClock;
    use flappy_arcade::renderer::canvas::CanvasSurface;
    use flappy_arcade::renderer::draw_frame;
    use flappy_arcade::sim::{Action, GameEvent, GamePhase, GameState, TickInput, tick};
    use flappy_arcade::{Settings, Tuning};

    /// Score service lives on the same origin as the page
    const SCORE_API_BASE: &str = "";

    /// Game instance holding all state
    struct Game {
        state: GameState,
        surface: CanvasSurface,
        clock: FrameClock,
        input: TickInput,
        settings: Settings,
        audio: AudioManager,
        scores: HttpScoreService,
        /// Whether a frame callback is scheduled
        loop_running: bool,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        /// Run simulation frames owed since the last callback
        fn update(&mut self, time: f64) {
            let steps = self.clock.advance(time);
            for _ in 0..steps {
                let input = std::mem::take(&mut self.input);
                if let Err(e) = tick(&mut self.state, &input) {
                    log::error!("Frame aborted: {}", e);
                    break;
                }
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            draw_frame(&mut self.surface, &self.state);
        }

        /// Primary input (space, click, tap) depends on the phase
        fn primary_input(&mut self) {
            self.audio.resume();
            match self.state.phase {
                GamePhase::Start => self.input.action = Some(Action::Start),
                GamePhase::Playing => self.input.flaps += 1,
                GamePhase::GameOver => self.input.action = Some(Action::Restart),
                GamePhase::Paused => {}
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.get_element_by_id("score") {
                el.set_text_content(Some(&self.state.current_score().to_string()));
            }

            if let Some(el) = document.get_element_by_id("fps") {
                let text = if self.settings.show_fps {
                    self.fps.to_string()
                } else {
                    String::new()
                };
                el.set_text_content(Some(&text));
            }

            let toggle = |id: &str, visible: bool| {
                if let Some(el) = document.get_element_by_id(id) {
                    let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
                }
            };
            toggle("start-screen", self.state.phase == GamePhase::Start);
            toggle("pause-menu", self.state.phase == GamePhase::Paused);
            toggle("game-over", self.state.phase == GamePhase::GameOver);

            if self.state.phase == GamePhase::GameOver {
                if let Some(el) = document.get_element_by_id("final-score") {
                    el.set_text_content(Some(&self.state.current_score().to_string()));
                }
                // Always shows something: fresh data or the cached value
                if let Some(el) = document.get_element_by_id("high-score") {
                    el.set_text_content(Some(&self.state.high_scores.high_score().to_string()));
                }
            }
        }
    }

    /// Submit the final score and refresh the board without blocking the loop
    fn report_game_over(game: &Rc<RefCell<Game>>, score: u64) {
        let (scores, game_id, name) = {
            let mut g = game.borrow_mut();
            if !g.state.high_scores.claim_report() {
                return;
            }
            (
                g.scores.clone(),
                g.state.game_id(),
                g.settings.player_name.clone(),
            )
        };

        let game = game.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let submitted = scores.submit_score(game_id, &name, score).await;
            game.borrow_mut()
                .state
                .high_scores
                .apply_submit(&name, score, submitted);

            let fetched = scores.get_high_scores(game_id).await;
            game.borrow_mut().state.high_scores.apply_fetch(fetched);
        });
    }

    /// Prime the cached high score for the title screen
    fn fetch_high_scores(game: &Rc<RefCell<Game>>) {
        let (scores, game_id) = {
            let g = game.borrow();
            (g.scores.clone(), g.state.game_id())
        };
        let game = game.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let fetched = scores.get_high_scores(game_id).await;
            game.borrow_mut().state.high_scores.apply_fetch(fetched);
        });
    }

    /// Route events to audio and the score service
    fn dispatch_events(game: &Rc<RefCell<Game>>) {
        let events = game.borrow_mut().state.drain_events();
        for event in &events {
            {
                let g = game.borrow();
                audio::play_event(&g.audio, event, g.settings.effective_volume());
            }
            if let GameEvent::GameOver { score, .. } = event {
                report_game_over(game, *score);
            }
        }
    }

    fn show_error(message: &str) {
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("error"))
        {
            el.set_text_content(Some(message));
            let _ = el.set_attribute("class", "");
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Flappy Arcade starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into()?;

        let tuning = match canvas.get_attribute("data-tuning") {
            Some(json) => Tuning::from_json(&json).unwrap_or_else(|e| {
                log::warn!("Ignoring tuning override: {}", e);
                Tuning::default()
            }),
            None => Tuning::default(),
        };

        let mut settings = Settings::default();
        settings.apply_overrides(
            canvas.get_attribute("data-player-name").as_deref(),
            canvas.get_attribute("data-master-volume").as_deref(),
            canvas.get_attribute("data-sfx-volume").as_deref(),
        );

        let seed = js_sys::Date::now() as u64;
        let state = match GameState::new(
            canvas.width() as f32,
            canvas.height() as f32,
            tuning,
            seed,
        ) {
            Ok(state) => state,
            Err(e) => {
                log::error!("Cannot start game: {}", e);
                show_error(&e.to_string());
                return Err(JsValue::from_str(&e.to_string()));
            }
        };

        let game = Rc::new(RefCell::new(Game {
            state,
            surface: CanvasSurface::new(ctx),
            clock: FrameClock::new(),
            input: TickInput::default(),
            settings,
            audio: AudioManager::new(),
            scores: HttpScoreService::new(SCORE_API_BASE),
            loop_running: false,
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
        }));

        log::info!("Game initialized with seed: {}", seed);

        fetch_high_scores(&game);
        setup_input_handlers(&canvas, game.clone());
        setup_auto_pause(game.clone());
        start_loop(&game);

        log::info!("Flappy Arcade running!");
        Ok(())
    }

    fn toggle_pause(game: &Rc<RefCell<Game>>) {
        let phase = game.borrow().state.phase;
        match phase {
            GamePhase::Playing => game.borrow_mut().input.action = Some(Action::Pause),
            GamePhase::Paused => {
                if game.borrow_mut().state.request(Action::Resume).is_ok() {
                    start_loop(game);
                }
            }
            _ => {}
        }
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse click
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().primary_input();
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().primary_input();
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let Some(window) = web_sys::window() else {
                return;
            };
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.repeat() {
                    return;
                }
                match event.key().as_str() {
                    " " | "ArrowUp" | "w" | "W" => {
                        event.prevent_default();
                        game.borrow_mut().primary_input();
                    }
                    "Enter" => {
                        let mut g = game.borrow_mut();
                        match g.state.phase {
                            GamePhase::Start => g.input.action = Some(Action::Start),
                            GamePhase::GameOver => g.input.action = Some(Action::Restart),
                            _ => {}
                        }
                    }
                    "Escape" | "p" | "P" => toggle_pause(&game),
                    "m" | "M" => {
                        let mut g = game.borrow_mut();
                        g.settings.muted = !g.settings.muted;
                        log::info!("Muted: {}", g.settings.muted);
                    }
                    "f" | "F" => {
                        let mut g = game.borrow_mut();
                        g.settings.show_fps = !g.settings.show_fps;
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.state.phase == GamePhase::Playing {
                        g.input.action = Some(Action::Pause);
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.settings.pause_on_blur && g.state.phase == GamePhase::Playing {
                    g.input.action = Some(Action::Pause);
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Schedule frames again with a fresh time baseline
    fn start_loop(game: &Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            if g.loop_running {
                return;
            }
            g.loop_running = true;
            g.clock.reset_baseline();
        }
        request_animation_frame(game.clone());
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render();
            g.update_hud();
        }

        dispatch_events(&game);

        // Pausing stops scheduling; resuming restarts the loop
        let paused = {
            let mut g = game.borrow_mut();
            let paused = g.state.phase == GamePhase::Paused;
            if paused {
                g.loop_running = false;
                g.clock.reset_baseline();
            }
            paused
        };
        if !paused {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless run: the autopilot plays one game and the score is reported to
/// an in-memory service. An optional tuning JSON path may be passed; the
/// player name and volume come from `FLAPPY_PLAYER` / `FLAPPY_VOLUME`.
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use flappy_arcade::Tuning;
    use flappy_arcade::audio::{self, LogSink};
    use flappy_arcade::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
    use flappy_arcade::highscores::InMemoryScoreService;
    use flappy_arcade::settings::Settings;
    use flappy_arcade::sim::{Action, GameEvent, GamePhase, GameState, TickInput, tick};

    env_logger::init();
    log::info!("Flappy Arcade (native) starting...");
    log::info!("Native mode runs a headless demo - run with `trunk serve` for web version");

    let tuning = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| Tuning::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Failed to load tuning from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => Tuning::default(),
    };

    let seed = 0x5eed;
    let mut state = match GameState::new(CANVAS_WIDTH, CANVAS_HEIGHT, tuning, seed) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Cannot start game: {}", e);
            std::process::exit(1);
        }
    };

    let mut settings = Settings::default();
    settings.apply_overrides(
        std::env::var("FLAPPY_PLAYER").ok().as_deref(),
        std::env::var("FLAPPY_VOLUME").ok().as_deref(),
        None,
    );
    let sink = LogSink;
    let mut service = InMemoryScoreService::new();
    state.high_scores.apply_fetch(Ok(Vec::new()));

    // Cap the demo at ten minutes of game time
    const MAX_FRAMES: u32 = 60 * 60 * 10;
    let mut input = TickInput {
        action: Some(Action::Start),
        idle_mode: true,
        ..Default::default()
    };
    let mut frames = 0;
    while frames < MAX_FRAMES && state.phase != GamePhase::GameOver {
        if let Err(e) = tick(&mut state, &input) {
            log::error!("Simulation error: {}", e);
            std::process::exit(1);
        }
        input.action = None;
        frames += 1;

        for event in state.drain_events() {
            audio::play_event(&sink, &event, settings.effective_volume());
            if let GameEvent::GameOver { score, .. } = event {
                state
                    .high_scores
                    .report(&mut service, &settings.player_name, score);
            }
        }
    }

    println!(
        "Demo finished after {} frames: score {}, high score {}, ended by {:?}",
        frames,
        state.current_score(),
        state.high_scores.high_score(),
        state.last_collision
    );
}
