//! Rooftop Swing entry point
//!
//! Native: runs a headless autopilot session and logs the outcome.
//! Web: drives the simulation from requestAnimationFrame and hands a JSON
//! snapshot to the page's renderer every frame.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{KeyboardEvent, MouseEvent, Window};

    use rooftop_swing::{InputState, Key, MouseButton, Simulation, Tuning};

    // Hooks into the page-side renderer/HUD
    #[wasm_bindgen(inline_js = "
        export function present_frame(json) {
            if (typeof window.rooftopSwingRender === 'function') {
                window.rooftopSwingRender(JSON.parse(json));
            }
        }

        export function present_events(json) {
            if (typeof window.rooftopSwingEvents === 'function') {
                window.rooftopSwingEvents(JSON.parse(json));
            }
        }
    ")]
    extern "C" {
        fn present_frame(json: &str);
        fn present_events(json: &str);
    }

    /// Game instance holding all state
    struct Game {
        sim: Simulation,
        input: InputState,
    }

    impl Game {
        fn frame(&mut self, time: f64) {
            let input = self.input.take_frame();
            self.sim.frame(time, &input);

            let events = self.sim.drain_events();
            if !events.is_empty() {
                match serde_json::to_string(&events) {
                    Ok(json) => present_events(&json),
                    Err(e) => log::warn!("Event encode error: {}", e),
                }
            }

            match serde_json::to_string(&self.sim.snapshot()) {
                Ok(json) => present_frame(&json),
                Err(e) => log::warn!("Snapshot encode error: {}", e),
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);
        log::info!("Rooftop Swing starting...");

        let Some(window) = web_sys::window() else {
            return;
        };

        let mut tuning = Tuning::default();
        if let Some(width) = window.inner_width().ok().and_then(|w| w.as_f64()) {
            tuning.view_width = width as f32;
        }

        let game = Rc::new(RefCell::new(Game {
            sim: Simulation::from_entropy(tuning),
            input: InputState::new(),
        }));

        setup_input_handlers(&window, game.clone());
        request_animation_frame(game);
        log::info!("Rooftop Swing running!");
    }

    fn setup_input_handlers(window: &Window, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.code() == "Space" {
                    event.prevent_default();
                }
                if let Some(key) = Key::from_name(&event.key()) {
                    game.borrow_mut().input.key_down(key);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = Key::from_name(&event.key()) {
                    game.borrow_mut().input.key_up(key);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                if let Some(button) = MouseButton::from_index(event.button()) {
                    game.borrow_mut().input.mouse_down(button);
                }
            });
            let _ = window
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut()
                    .input
                    .pointer_moved(event.client_x() as f32, event.client_y() as f32);
            });
            let _ = window
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                event.prevent_default();
            });
            let _ = window
                .add_event_listener_with_callback("contextmenu", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut()>::new(move || {
                game.borrow_mut().input.release_all();
                log::info!("Window blurred, released held keys");
            });
            let _ = window
                .add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
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
        game.borrow_mut().frame(time);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Rooftop Swing (native) starting...");

    let options = native::Options::from_args(std::env::args().skip(1));
    native::run_demo(&options);
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use rooftop_swing::sim::GameEvent;
    use rooftop_swing::{Autopilot, Simulation, Tuning};

    /// Environment variable naming a tuning JSON file
    const TUNING_ENV: &str = "ROOFTOP_SWING_TUNING";
    const DEFAULT_SECONDS: f64 = 60.0;
    const FRAME_MS: f64 = 1000.0 / 60.0;

    #[derive(Debug, Default)]
    pub struct Options {
        pub seed: Option<u64>,
        pub seconds: Option<f64>,
        pub tuning_path: Option<String>,
    }

    impl Options {
        /// Parse `--seed N`, `--seconds S` and `--tuning PATH`
        pub fn from_args(mut args: impl Iterator<Item = String>) -> Self {
            let mut options = Self::default();
            while let Some(arg) = args.next() {
                let value = args.next();
                match (arg.as_str(), value) {
                    ("--seed", Some(v)) => match v.parse() {
                        Ok(seed) => options.seed = Some(seed),
                        Err(_) => log::warn!("Ignoring invalid seed: {}", v),
                    },
                    ("--seconds", Some(v)) => match v.parse::<f64>() {
                        Ok(s) if s.is_finite() && s > 0.0 => options.seconds = Some(s),
                        _ => log::warn!("Ignoring invalid duration: {}", v),
                    },
                    ("--tuning", Some(v)) => options.tuning_path = Some(v),
                    (other, _) => log::warn!("Ignoring unknown argument: {}", other),
                }
            }
            if options.tuning_path.is_none() {
                options.tuning_path = std::env::var(TUNING_ENV).ok();
            }
            options
        }
    }

    /// Let the autopilot play a session and report how it went
    pub fn run_demo(options: &Options) {
        let tuning = match &options.tuning_path {
            Some(path) => Tuning::load_or_default(path),
            None => Tuning::default(),
        };
        let mut sim = match options.seed {
            Some(seed) => Simulation::new(tuning, seed),
            None => Simulation::from_entropy(tuning),
        };
        let mut pilot = Autopilot::new();

        let seconds = options.seconds.unwrap_or(DEFAULT_SECONDS);
        let frames = (seconds * 1000.0 / FRAME_MS).ceil() as u64;
        let mut shots = 0u32;
        let mut ropes = 0u32;
        let mut now = 0.0;

        for _ in 0..frames {
            let input = pilot.drive(sim.state());
            sim.frame(now, &input);
            now += FRAME_MS;

            let mut won = false;
            for event in sim.drain_events() {
                match event {
                    GameEvent::Shot => shots += 1,
                    GameEvent::RopeAttached { .. } => ropes += 1,
                    GameEvent::Won { .. } => won = true,
                    _ => {}
                }
            }
            if won {
                break;
            }
        }

        let state = sim.state();
        let (kills, total) = state.kills();
        log::info!(
            "Session over after {} ticks ({:.1}s simulated)",
            state.time_ticks,
            state.clock_ms / 1000.0
        );
        println!("Kills: {} / {}", kills, total);
        println!("Ropes thrown: {}, bolts fired: {}", ropes, shots);
        println!(
            "Player ended at ({:.0}, {:.0}){}",
            state.player.pos.x,
            state.player.pos.y,
            if state.won { " - all enemies eliminated!" } else { "" }
        );
    }

}
