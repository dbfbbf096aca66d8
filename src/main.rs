//! Arena Blaster entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlInputElement, KeyboardEvent, MouseEvent};

    use arena_blaster::leaderboard::{self, LeaderboardEntry, ScoreSubmission};
    use arena_blaster::persistence;
    use arena_blaster::platform;
    use arena_blaster::renderer::{self, RenderState};
    use arena_blaster::sim::{Frame, GameEvent, Snapshot};
    use arena_blaster::{Leaderboard, Session, Settings, TimeFrame};

    const MEDALS: [&str; 3] = ["\u{1F947}", "\u{1F948}", "\u{1F949}"];

    /// Game instance holding all state
    struct Game {
        session: Session,
        render_state: Option<RenderState>,
        leaderboard: Leaderboard,
        settings: Settings,
        last_time: f64,
        /// Wall-clock time the current game ended, frozen for the summary
        ended_at: Option<f64>,
        score_saved: bool,
        frame: TimeFrame,
    }

    impl Game {
        fn new() -> Self {
            let settings = Settings::load(persistence::default_store().as_ref());
            let leaderboard = Leaderboard::load(persistence::default_store());
            let mut session = Session::new(
                platform::viewport(),
                platform::seed(),
                platform::now_ms(),
                settings.timing(),
            );
            session.subscribe(|frame: &Frame| {
                for event in &frame.events {
                    match event {
                        GameEvent::GameOver { score } => log::info!("Game over, score {}", score),
                        GameEvent::EnemyKilled { kind, points, .. } => {
                            log::debug!("Killed {} enemy (+{})", kind.as_str(), points)
                        }
                        other => log::trace!("{:?}", other),
                    }
                }
            });

            Self {
                session,
                render_state: None,
                frame: settings.leaderboard_frame,
                leaderboard,
                settings,
                last_time: 0.0,
                ended_at: None,
                score_saved: false,
            }
        }

        /// Run every tick due in this host frame
        fn update(&mut self, dt_ms: f64) {
            let now = platform::now_ms();
            self.session.update(dt_ms, now);
            if self.ended_at.is_none() && self.session.state().is_game_over() {
                self.ended_at = Some(now);
            }
        }

        /// Render the current frame
        fn render(&mut self, snapshot: &Snapshot) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&renderer::scene(snapshot)) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, snapshot: &Snapshot) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            let set_text = |selector: &str, text: String| {
                if let Some(el) = document.query_selector(selector).ok().flatten() {
                    el.set_text_content(Some(&text));
                }
            };
            set_text("#hud-health .hud-value", snapshot.health.to_string());
            set_text("#hud-score .hud-value", snapshot.score.to_string());
            set_text("#hud-time .hud-value", format!("{}s", snapshot.elapsed_secs));
            set_text("#hud-level .hud-value", snapshot.level.to_string());

            // Show/hide game over summary
            if let Some(el) = document.get_element_by_id("game-over") {
                match self.ended_at {
                    Some(ended_at) => {
                        let _ = el.set_attribute("class", "");
                        let state = self.session.state();
                        set_text("#kill-score", state.score().to_string());
                        set_text("#time-bonus", state.time_bonus(ended_at).to_string());
                        set_text("#final-score", state.final_score(ended_at).to_string());
                    }
                    None => {
                        let _ = el.set_attribute("class", "hidden");
                    }
                }
            }
        }

        /// Submit the final score once per game
        fn save_score(&mut self) {
            let Some(ended_at) = self.ended_at else {
                return;
            };
            if self.score_saved {
                log::info!("Score already saved");
                return;
            }

            if let Some(username) = read_username() {
                self.settings.username = username;
                if let Err(e) = self.settings.save(persistence::default_store().as_mut()) {
                    log::warn!("Could not save settings: {}", e);
                }
            }

            let submission = ScoreSubmission {
                username: self.settings.username.clone(),
                score: self.session.final_score(ended_at),
                attribution: self.settings.attribution.clone(),
            };
            self.score_saved =
                leaderboard::submit_score(&mut self.leaderboard, submission, platform::now_ms());
            set_visible("save-confirm", self.score_saved);
        }

        fn restart(&mut self) {
            self.session.reset(platform::now_ms());
            self.ended_at = None;
            self.score_saved = false;
            set_visible("save-confirm", false);
        }

        fn top_scores(&self) -> Vec<LeaderboardEntry> {
            leaderboard::fetch_top(
                &self.leaderboard,
                self.frame,
                self.settings.leaderboard_size(),
                platform::now_ms(),
            )
        }
    }

    fn set_visible(id: &str, visible: bool) {
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
        {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    fn read_username() -> Option<String> {
        let input: HtmlInputElement = web_sys::window()?
            .document()?
            .get_element_by_id("username")?
            .dyn_into()
            .ok()?;
        let value = input.value().trim().to_string();
        (!value.is_empty()).then_some(value)
    }

    /// Keys typed into the username field are not movement
    fn typing_in_field() -> bool {
        web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.active_element())
            .is_some_and(|el| el.tag_name().eq_ignore_ascii_case("input"))
    }

    fn escape_html(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
    }

    /// Redraw the leaderboard list and highlight the active window
    fn render_leaderboard(game: &Game) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        for frame in [TimeFrame::All, TimeFrame::Daily, TimeFrame::Weekly] {
            if let Some(btn) = document.get_element_by_id(&format!("lb-{}", frame.as_str())) {
                let class = if frame == game.frame { "lb-tab active" } else { "lb-tab" };
                let _ = btn.set_attribute("class", class);
            }
        }

        if let Some(list) = document.get_element_by_id("leaderboard-list") {
            let entries = game.top_scores();
            let html = if entries.is_empty() {
                "<li class=\"empty\">No scores yet</li>".to_string()
            } else {
                entries
                    .iter()
                    .enumerate()
                    .map(|(i, entry)| {
                        let rank = MEDALS
                            .get(i)
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| (i + 1).to_string());
                        format!(
                            "<li><span class=\"rank\">{}</span><span class=\"name\">{}</span><span class=\"score\">{}</span></li>",
                            rank,
                            escape_html(&entry.username),
                            entry.score
                        )
                    })
                    .collect()
            };
            list.set_inner_html(&html);
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Arena Blaster starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let viewport = platform::viewport();
        let width = (viewport.width as f64 * dpr) as u32;
        let height = (viewport.height as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let game = Rc::new(RefCell::new(Game::new()));
        if let Some(input) = document
            .get_element_by_id("username")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            input.set_value(&game.borrow().settings.username);
        }

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => {
                let adapter = instance
                    .request_adapter(&wgpu::RequestAdapterOptions {
                        power_preference: wgpu::PowerPreference::HighPerformance,
                        compatible_surface: Some(&surface),
                        force_fallback_adapter: false,
                    })
                    .await;
                match adapter {
                    Ok(adapter) => {
                        log::info!("Using adapter: {:?}", adapter.get_info().name);
                        match RenderState::new(
                            surface,
                            &adapter,
                            width,
                            height,
                            (viewport.width, viewport.height),
                        )
                        .await
                        {
                            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
                            Err(e) => log::error!("Renderer unavailable: {}", e),
                        }
                    }
                    Err(e) => log::error!("No WebGPU adapter: {}", e),
                }
            }
            Err(e) => log::error!("Failed to create surface: {}", e),
        }

        setup_input_handlers(game.clone());
        setup_game_over_buttons(game.clone());
        setup_leaderboard(game.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        // Start game loop
        request_animation_frame(game);

        log::info!("Arena Blaster running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if typing_in_field() {
                    return;
                }
                if game.borrow_mut().session.key_down(&event.key()) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().session.key_up(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur drops held keys so the player doesn't drift
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().session.release_keys();
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Primary button fires toward the pointer
        {
            let canvas = window
                .document()
                .and_then(|d| d.get_element_by_id("canvas"));
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                if event.button() != 0 {
                    return;
                }
                let click = Vec2::new(event.client_x() as f32, event.client_y() as f32);
                game.borrow_mut().session.pointer_click(click);
            });
            if let Some(canvas) = canvas {
                let _ = canvas
                    .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            }
            closure.forget();
        }
    }

    fn setup_game_over_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("save-score-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.save_score();
                render_leaderboard(&g);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("play-again-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().restart();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_leaderboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        for frame in [TimeFrame::All, TimeFrame::Daily, TimeFrame::Weekly] {
            if let Some(btn) = document.get_element_by_id(&format!("lb-{}", frame.as_str())) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    let mut g = game.borrow_mut();
                    g.frame = frame;
                    render_leaderboard(&g);
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        render_leaderboard(&game.borrow());

        // Periodic refresh picks up scores aging out of the daily/weekly windows
        let refresh_ms = game.borrow().settings.leaderboard_refresh_ms();
        let closure = Closure::<dyn FnMut()>::new(move || {
            render_leaderboard(&game.borrow());
        });
        if let Err(e) = window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            refresh_ms,
        ) {
            log::warn!("Leaderboard refresh disabled: {:?}", e);
        }
        closure.forget();
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

            // Calculate delta time
            let dt_ms = if g.last_time > 0.0 {
                time - g.last_time
            } else {
                0.0
            };
            g.last_time = time;

            g.update(dt_ms);
            let snapshot = g.session.snapshot(g.ended_at.unwrap_or_else(platform::now_ms));
            g.render(&snapshot);
            g.update_hud(&snapshot);
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Arena Blaster (native) starting...");
    log::info!("Native mode runs a headless session - run with `trunk serve` for the web version");

    let seconds = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u32>().ok())
        .unwrap_or(60);
    headless::run(seconds);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scripted session: strafes around the arena and shoots at the nearest enemy
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::Vec2;

    use arena_blaster::leaderboard::{self, ScoreSubmission};
    use arena_blaster::persistence::MemoryStore;
    use arena_blaster::platform;
    use arena_blaster::sim::geometry;
    use arena_blaster::{Leaderboard, Session, Settings, TimeFrame};

    const FRAME_MS: f64 = 16.0;
    /// Frames between shots
    const FIRE_EVERY: u32 = 15;
    /// Frames before switching strafe direction
    const STRAFE_EVERY: u32 = 90;

    pub fn run(seconds: u32) {
        let settings = Settings::default();
        let start = platform::now_ms();
        let seed = platform::seed();
        let mut session = Session::new(platform::viewport(), seed, start, settings.timing());

        let total_frames = (seconds as f64 * 1000.0 / FRAME_MS) as u32;
        let mut now = start;
        let mut strafe = ["a", "d"].iter().cycle();
        let mut held = None;

        for frame in 0..total_frames {
            if frame % STRAFE_EVERY == 0 {
                if let Some(key) = held.take() {
                    session.key_up(key);
                }
                if let Some(&key) = strafe.next() {
                    session.key_down(key);
                    held = Some(key);
                }
            }

            if frame % FIRE_EVERY == 0 {
                aim_at_nearest(&mut session);
            }

            now += FRAME_MS;
            session.update(FRAME_MS, now);
            if session.state().is_game_over() {
                break;
            }
        }
        session.shutdown();

        let state = session.state();
        println!("\nSession finished after {} ticks (seed {})", session.ticks(), seed);
        println!("  Kill score:  {}", state.score());
        println!("  Time bonus:  {}", state.time_bonus(now));
        println!("  Final score: {}", state.final_score(now));
        println!("  Health:      {}", state.health());

        let mut board = Leaderboard::load(Box::new(MemoryStore::new()));
        let submission = ScoreSubmission {
            username: settings.username.clone(),
            score: state.final_score(now),
            attribution: settings.attribution.clone(),
        };
        leaderboard::submit_score(&mut board, submission, now);
        for (i, entry) in leaderboard::fetch_top(&board, TimeFrame::All, 10, now)
            .iter()
            .enumerate()
        {
            println!("  #{} {} {}", i + 1, entry.username, entry.score);
        }
    }

    /// Clicks are measured from the viewport center, so offset by the
    /// player-to-enemy vector
    fn aim_at_nearest(session: &mut Session) {
        let state = session.state();
        let player = state.player().pos;
        let target = state.enemies().iter().map(|e| e.pos).min_by(|a, b| {
            geometry::distance(player, *a).total_cmp(&geometry::distance(player, *b))
        });
        if let Some(target) = target {
            let click: Vec2 = state.viewport().center() + (target - player);
            session.pointer_click(click);
        }
    }
}
