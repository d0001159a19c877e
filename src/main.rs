//! Turret Blitz entry point
//!
//! Browser builds run the canvas game; native builds run a headless session
//! with the autopilot and print the result.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use glam::Vec2;
    use turret_blitz::audio::{AudioCue, AudioSink, WebAudio};
    use turret_blitz::consts::SIM_DT;
    use turret_blitz::persistence::LocalStorageStore;
    use turret_blitz::platform::{DomPresenter, sanitize_name};
    use turret_blitz::renderer::{CanvasSurface, draw_frame};
    use turret_blitz::sim::{GamePhase, LoopControl, TickInput};
    use turret_blitz::{Session, Settings, Tuning};

    /// Game instance holding all state
    struct Game {
        session: Session<DomPresenter, WebAudio>,
        surface: CanvasSurface,
        settings: Settings,
        last_time: f64,
        /// Whether an animation frame is scheduled
        looping: bool,
    }

    impl Game {
        /// Advance and draw one frame
        fn update(&mut self, time: f64) -> LoopControl {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            self.last_time = time;

            let control = self.session.frame(&TickInput::default(), dt);
            draw_frame(&self.session.state, &self.settings, &mut self.surface);
            control
        }

        fn queue(&mut self, input: TickInput) {
            self.session.queue_input(&input);
        }
    }

    fn window_size(window: &web_sys::Window) -> (u32, u32) {
        let w = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(800.0);
        let h = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(600.0);
        (w as u32, h as u32)
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialised".into());
        }

        log::info!("Turret Blitz starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let (width, height) = window_size(&window);
        let mut surface = CanvasSurface::new(canvas.clone()).ok_or("no 2d context")?;
        surface.resize(width, height);

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let mut session = Session::new(
            Tuning::default(),
            width as f32,
            height as f32,
            seed,
            Box::new(LocalStorageStore::default()),
            DomPresenter::new(document.clone()),
            WebAudio::new(&settings),
        );
        session.prompt_name(&settings.player_name);
        log::info!("Game initialized with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game {
            session,
            surface,
            settings,
            last_time: 0.0,
            looping: false,
        }));

        setup_input_handlers(&canvas, game.clone())?;
        setup_buttons(&document, game.clone());
        setup_resize(game.clone())?;

        // Draw the idle playfield behind the name prompt
        {
            let mut g = game.borrow_mut();
            let g = &mut *g;
            draw_frame(&g.session.state, &g.settings, &mut g.surface);
        }

        log::info!("Turret Blitz ready");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        // Mouse move - aim
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut().queue(TickInput {
                    pointer: Some(Vec2::new(event.offset_x() as f32, event.offset_y() as f32)),
                    ..Default::default()
                });
            });
            canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Mouse down - start firing
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut().queue(TickInput {
                    pointer: Some(Vec2::new(event.offset_x() as f32, event.offset_y() as f32)),
                    fire_pressed: true,
                    ..Default::default()
                });
            });
            canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Mouse up anywhere - stop firing
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().queue(TickInput {
                    fire_released: true,
                    ..Default::default()
                });
            });
            window.add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Keyboard
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.code() != "Space" {
                    return;
                }
                let control = game.borrow_mut().session.pause_or_restart();
                if let Some(control) = control {
                    event.prevent_default();
                    // No-op unless the loop stopped at game over
                    if control == LoopControl::Continue {
                        start_loop(game.clone());
                    }
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn setup_buttons(document: &web_sys::Document, game: Rc<RefCell<Game>>) {
        // Name popup
        if let Some(btn) = document.get_element_by_id("startGameButton") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                {
                    let mut g = game.borrow_mut();
                    let name = sanitize_name(&g.session.presenter.entered_name());
                    g.session.audio.resume();
                    if !g.session.begin(&name) {
                        return;
                    }
                    if g.settings.player_name != name {
                        g.settings.player_name = name;
                        g.settings.save();
                    }
                }
                start_loop(game.clone());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pause overlay
        if let Some(btn) = document.get_element_by_id("resumeGameButton") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                if g.session.state.phase == GamePhase::Paused {
                    g.session.audio.play(AudioCue::ButtonClick);
                    g.session.toggle_pause();
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Game over popup
        if let Some(btn) = document.get_element_by_id("playAgain") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let control = game.borrow_mut().session.restart();
                if control == LoopControl::Continue {
                    log::info!("Play again");
                    start_loop(game.clone());
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else { return };
            let (width, height) = window_size(&window);
            let mut g = game.borrow_mut();
            g.surface.resize(width, height);
            g.session.resize(width as f32, height as f32);
            log::info!("Resized to {}x{}", width, height);
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    /// Schedule frames until the session reports game over
    fn start_loop(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            if g.looping {
                return;
            }
            g.looping = true;
            g.last_time = 0.0;
        }
        request_animation_frame(game);
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let control = game.borrow_mut().update(time);
        match control {
            LoopControl::Continue => request_animation_frame(game),
            LoopControl::Stop => game.borrow_mut().looping = false,
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

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use clap::Parser;

    use turret_blitz::audio::LogAudio;
    use turret_blitz::headless;
    use turret_blitz::persistence::{JsonFileStore, LeaderboardStore, MemoryStore};
    use turret_blitz::platform::HeadlessPresenter;
    use turret_blitz::{Session, Settings, Tuning};

    #[derive(Parser, Debug)]
    #[command(name = "turret-blitz")]
    #[command(about = "Play a headless Turret Blitz session with the autopilot")]
    pub struct Cli {
        /// Player name recorded on the leaderboard (defaults to the settings name)
        #[arg(long)]
        name: Option<String>,
        /// Simulated seconds to play before stopping
        #[arg(long, default_value_t = 120.0)]
        seconds: f32,
        /// RNG seed (random if omitted)
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value_t = 800.0)]
        width: f32,
        #[arg(long, default_value_t = 600.0)]
        height: f32,
        /// Leaderboard JSON file (in-memory if omitted)
        #[arg(long)]
        leaderboard: Option<PathBuf>,
        /// Tuning JSON file
        #[arg(long)]
        tuning: Option<PathBuf>,
        /// Settings JSON file
        #[arg(long)]
        settings: Option<PathBuf>,
    }

    pub fn run(cli: Cli) {
        let settings = cli
            .settings
            .as_deref()
            .map(Settings::load_from)
            .unwrap_or_default();

        let tuning = match cli.tuning.as_deref().map(Tuning::load_from) {
            Some(Ok(tuning)) => tuning,
            Some(Err(err)) => {
                log::warn!("Could not load tuning, using defaults: {err}");
                Tuning::default()
            }
            None => Tuning::default(),
        };

        let seed = cli.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or_default()
        });
        log::info!("Seed: {seed}");

        let store: Box<dyn LeaderboardStore> = match cli.leaderboard {
            Some(path) => Box::new(JsonFileStore::new(path)),
            None => Box::new(MemoryStore::new()),
        };

        let mut session = Session::new(
            tuning,
            cli.width,
            cli.height,
            seed,
            store,
            HeadlessPresenter::new(),
            LogAudio::new(),
        );
        let name = cli.name.unwrap_or(settings.player_name);
        let summary = headless::run(&mut session, &name, cli.seconds);

        println!(
            "{}: score {}, health {}, {}s left, {} bullets, {:?} after {} frames",
            summary.player,
            summary.score,
            summary.health,
            summary.time_left,
            summary.bullets,
            summary.phase,
            summary.frames
        );
        println!("\nLeaderboard");
        for (rank, entry) in session.leaderboard.entries.iter().enumerate().take(10) {
            let marker = if entry.name == summary.player { "*" } else { " " };
            println!("{marker}{:>3}. {:<20} {:>8}", rank + 1, entry.name, entry.score);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::init();
    log::info!("Turret Blitz (native) starting...");
    native::run(native::Cli::parse());
}
