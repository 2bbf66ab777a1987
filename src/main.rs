//! Bounce Ball entry point
//!
//! Web: canvas 2D front end driven by requestAnimationFrame.
//! Native: headless autopilot demo that logs the run.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent,
    };

    use bounce_ball::consts::*;
    use bounce_ball::platform::{FrameLoop, LoopControl};
    use bounce_ball::sim::{GameEvent, Session, SessionPhase};
    use bounce_ball::{ProgressStore, QualityPreset, Settings, Tuning};

    /// Game instance holding all state
    struct Game {
        frames: FrameLoop<ProgressStore>,
        settings: Settings,
        ctx: CanvasRenderingContext2d,
        width: f32,
        height: f32,
        /// A frame is scheduled
        running: bool,
        /// Last landing text and the frame it appeared on
        toast: Option<(String, u32)>,
        frame_count: u32,
    }

    fn css(color: u32) -> String {
        format!("#{:06x}", color & 0xff_ffff)
    }

    impl Game {
        fn new(seed: u64, ctx: CanvasRenderingContext2d, width: f32, height: f32) -> Self {
            let settings = Settings::load();
            let mut session = Session::new(Tuning::default(), bounce_ball::sim::rng::seeded(seed));
            session.apply_settings(&settings);
            Self {
                frames: FrameLoop::new(session, ProgressStore::load()),
                settings,
                ctx,
                width,
                height,
                running: false,
                toast: None,
                frame_count: 0,
            }
        }

        fn start(&mut self) {
            self.frames
                .session
                .start_session(self.width, self.height, DEFAULT_SKIN_COLOR);
            self.toast = None;
        }

        /// Run one frame; returns whether to schedule another
        fn step(&mut self) -> bool {
            self.frame_count = self.frame_count.wrapping_add(1);
            let control = self.frames.frame();

            for event in self.frames.last_events() {
                if let GameEvent::Landed { points, combo, .. } = event {
                    self.toast = Some((format!("+{} (x{})", points, combo), self.frame_count));
                }
            }
            control == LoopControl::Continue
        }

        fn render(&self) {
            let ctx = &self.ctx;
            let session = &self.frames.session;
            let (w, h) = (self.width as f64, self.height as f64);

            ctx.set_global_alpha(1.0);
            ctx.set_fill_style_str("#1a1a2e");
            ctx.fill_rect(0.0, 0.0, w, h);

            for platform in &session.course.platforms {
                ctx.set_fill_style_str(&css(platform.color()));
                ctx.fill_rect(
                    platform.x as f64,
                    platform.y as f64,
                    platform.width as f64,
                    platform.height as f64,
                );
            }

            for particle in &session.particles {
                ctx.set_global_alpha(particle.life.max(0.0) as f64);
                ctx.set_fill_style_str(&css(particle.color));
                ctx.begin_path();
                let _ = ctx.arc(
                    particle.pos.x as f64,
                    particle.pos.y as f64,
                    particle.radius as f64,
                    0.0,
                    std::f64::consts::TAU,
                );
                ctx.fill();
            }
            ctx.set_global_alpha(1.0);

            // Dotted preview while charging
            ctx.set_fill_style_str("rgba(255,255,255,0.5)");
            for (i, point) in session.trajectory_preview(&self.settings).iter().enumerate() {
                if i % 2 == 0 {
                    ctx.fill_rect(point.x as f64 - 1.5, point.y as f64 - 1.5, 3.0, 3.0);
                }
            }

            if let Some(ball) = &session.ball {
                ctx.set_fill_style_str(&css(ball.color));
                ctx.begin_path();
                let _ = ctx.arc(
                    ball.pos.x as f64,
                    ball.pos.y as f64,
                    ball.radius as f64,
                    0.0,
                    std::f64::consts::TAU,
                );
                ctx.fill();
            }

            self.render_hud();
        }

        fn render_hud(&self) {
            let ctx = &self.ctx;
            let session = &self.frames.session;

            ctx.set_fill_style_str("#ffffff");
            ctx.set_font("20px sans-serif");
            let _ = ctx.fill_text(&format!("Score: {}", session.score), 16.0, 32.0);
            let _ = ctx.fill_text(&format!("Coins: {}", self.frames.sink.coins), 16.0, 58.0);

            if session.is_charging() {
                let fraction = (session.power() / session.tuning.max_power) as f64;
                ctx.set_fill_style_str("#333333");
                ctx.fill_rect(16.0, 72.0, 200.0, 12.0);
                ctx.set_fill_style_str("#ffe66d");
                ctx.fill_rect(16.0, 72.0, 200.0 * fraction, 12.0);
            }

            if let Some((text, since)) = &self.toast {
                if self.frame_count.wrapping_sub(*since) < 60 {
                    ctx.set_fill_style_str("#4ecdc4");
                    let _ = ctx.fill_text(text, self.width as f64 / 2.0 - 40.0, 80.0);
                }
            }

            if self.settings.debug_overlay {
                let info = session.debug_info();
                ctx.set_font("12px monospace");
                let _ = ctx.fill_text(
                    &format!(
                        "moving={} charging={} platforms={} difficulty={:.1} ({})",
                        info.is_moving,
                        info.is_charging,
                        info.platform_count,
                        info.difficulty,
                        info.tier.as_str()
                    ),
                    16.0,
                    self.height as f64 - 16.0,
                );
            }

            let banner = match session.phase {
                SessionPhase::Menu => Some("Click to start".to_string()),
                SessionPhase::Paused => Some("Paused (P to resume)".to_string()),
                SessionPhase::GameOver => Some(format!(
                    "Game over - {} points. Click to play again, R to revive",
                    session.score
                )),
                SessionPhase::Playing => None,
            };
            if let Some(banner) = banner {
                ctx.set_font("24px sans-serif");
                ctx.set_fill_style_str("#ffffff");
                let _ = ctx.fill_text(&banner, 40.0, self.height as f64 / 2.0);
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Bounce Ball starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let width = canvas.client_width().max(1) as u32;
        let height = canvas.client_height().max(1) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into()?;

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, ctx, width as f32, height as f32)));
        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&canvas, game.clone());
        setup_keyboard(game.clone());

        game.borrow().render();
        log::info!("Bounce Ball running!");
        Ok(())
    }

    /// Begin a press: starts a session from the menu or game over screen,
    /// otherwise starts charging
    fn pointer_down(game: &Rc<RefCell<Game>>) {
        let mut g = game.borrow_mut();
        let phase = g.frames.session.phase;
        match phase {
            SessionPhase::Menu | SessionPhase::GameOver => {
                g.start();
                drop(g);
                ensure_running(game.clone());
            }
            SessionPhase::Playing => g.frames.press(),
            SessionPhase::Paused => {}
        }
    }

    fn pointer_up(game: &Rc<RefCell<Game>>) {
        game.borrow_mut().frames.release();
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse down - start charging
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                pointer_down(&game);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse up / leave - release
        for name in ["mouseup", "mouseleave"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                pointer_up(&game);
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                pointer_down(&game);
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                pointer_up(&game);
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let mut g = game.borrow_mut();
            match event.key().as_str() {
                "p" | "P" => {
                    if g.frames.session.pause() {
                        log::info!("Paused");
                    } else if g.frames.session.resume() {
                        log::info!("Resumed");
                        drop(g);
                        ensure_running(game.clone());
                        return;
                    }
                    g.render();
                }
                "r" | "R" => {
                    // Revive events reach the sink on the next frame
                    if g.frames.session.revive_session() {
                        drop(g);
                        ensure_running(game.clone());
                    }
                }
                "d" | "D" => {
                    let enabled = !g.frames.autopilot();
                    g.frames.set_autopilot(enabled);
                    log::info!("Autopilot {}", if enabled { "on" } else { "off" });
                }
                "q" | "Q" => {
                    let next = match g.settings.quality {
                        QualityPreset::Low => QualityPreset::Medium,
                        QualityPreset::Medium => QualityPreset::High,
                        QualityPreset::High => QualityPreset::Low,
                    };
                    g.settings.apply_preset(next);
                    let settings = g.settings.clone();
                    g.frames.session.apply_settings(&settings);
                    settings.save();
                    log::info!("Quality {:?}", next);
                }
                "`" => {
                    g.settings.debug_overlay = !g.settings.debug_overlay;
                    g.settings.save();
                }
                _ => {}
            }
        });
        let _ = document
            .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Schedule the loop unless a frame is already pending
    fn ensure_running(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            if g.running {
                return;
            }
            g.running = true;
        }
        request_animation_frame(game);
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        let keep_going = {
            let mut g = game.borrow_mut();
            let keep_going = g.step();
            g.render();
            if !keep_going {
                g.running = false;
            }
            keep_going
        };

        // Not rescheduling is how the loop stops
        if keep_going {
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

#[cfg(not(target_arch = "wasm32"))]
const DEMO_WIDTH: f32 = 800.0;
#[cfg(not(target_arch = "wasm32"))]
const DEMO_HEIGHT: f32 = 600.0;
/// Frame cap for the headless demo (about five minutes at 60 Hz)
#[cfg(not(target_arch = "wasm32"))]
const DEMO_MAX_FRAMES: u32 = 18_000;

/// Usage: bounce-ball [seed] [tuning.json]
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use bounce_ball::consts::DEFAULT_SKIN_COLOR;
    use bounce_ball::platform::{FrameLoop, LoopControl};
    use bounce_ball::sim::{GameEvent, Session, rng};
    use bounce_ball::{ProgressStore, Tuning};

    env_logger::init();
    log::info!("Bounce Ball (native) starting...");

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(|| bounce_ball::persistence::now_ms() as u64);
    let tuning = match args.next() {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => Tuning::from_json_or_default(&json),
            Err(e) => {
                log::warn!("Could not read tuning file {}: {}", path, e);
                Tuning::default()
            }
        },
        None => Tuning::default(),
    };

    let mut session = Session::new(tuning, rng::seeded(seed));
    session.start_session(DEMO_WIDTH, DEMO_HEIGHT, DEFAULT_SKIN_COLOR);

    let mut frames = FrameLoop::new(session, ProgressStore::load());
    frames.set_autopilot(true);
    log::info!("Autopilot demo with seed {}", seed);

    let mut frame_count = 0;
    while frame_count < DEMO_MAX_FRAMES {
        frame_count += 1;
        let control = frames.frame();
        for event in frames.last_events() {
            if let GameEvent::Landed { .. } | GameEvent::SessionEnded { .. } = event {
                if let Ok(json) = serde_json::to_string(event) {
                    println!("{}", json);
                }
            }
        }
        if control == LoopControl::Stop {
            break;
        }
    }

    let summary = frames.session.summary();
    log::info!(
        "Demo finished after {} frames: score {}, platforms {}, coins {}",
        frame_count,
        summary.score,
        summary.platforms_cleared,
        frames.sink.coins
    );
}
