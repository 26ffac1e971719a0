//! Tile Quest entry point
//!
//! Handles platform-specific initialization and feeds input into the
//! simulation. The browser build paints to a canvas; the native build is a
//! line-oriented terminal host.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

    use tile_quest::levelgen::generate_level;
    use tile_quest::platform::now_ms;
    use tile_quest::renderer::{self, Hud, Palette};
    use tile_quest::sim::{CompletionStats, GridSimulation, LevelData, StepOutcome};
    use tile_quest::{SessionHistory, Settings};

    /// Game instance holding all state
    struct Game {
        sim: GridSimulation,
        settings: Settings,
        history: SessionHistory,
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
        /// Seed for the next locally generated level
        next_seed: u64,
        /// Waiting on the next level (input ignored)
        loading: bool,
        /// The running session was already recorded as abandoned
        abandon_recorded: bool,
    }

    impl Game {
        fn tile_size(&self) -> f32 {
            self.settings.effective_tile_size() as f32
        }

        /// Replace the running session; unplayable levels fall back to a local
        /// one, then to the tutorial
        fn start_level(&mut self, level: LevelData) {
            let now = now_ms();
            self.abandon_current(now);
            let difficulty = self.sim.level().difficulty;
            let sim = GridSimulation::new(level, now)
                .inspect_err(|e| log::warn!("Rejected level ({}), generating one locally", e))
                .or_else(|_| GridSimulation::new(self.local_level(difficulty), now))
                .or_else(|_| GridSimulation::new(LevelData::tutorial(), now));
            let sim = match sim {
                Ok(sim) => sim,
                Err(e) => {
                    log::error!("No playable level available: {}", e);
                    return;
                }
            };
            self.sim = sim;
            self.abandon_recorded = false;
            self.loading = false;
            self.resize_canvas();
            self.update_level_info();
            log::info!(
                "Level started: difficulty {}, {} coins",
                self.sim.level().difficulty,
                self.sim.level().grid.coin_count()
            );
        }

        fn local_level(&mut self, difficulty: u8) -> LevelData {
            let seed = self.next_seed;
            self.next_seed = self.next_seed.wrapping_add(1);
            generate_level(seed, difficulty)
        }

        /// Record the running session as abandoned (at most once)
        fn abandon_current(&mut self, now: f64) {
            if self.abandon_recorded {
                return;
            }
            if self.history.record_unfinished(&self.sim, now) {
                self.abandon_recorded = true;
                self.history.save();
                log::info!("Session abandoned after {} moves", self.sim.moves());
            }
        }

        fn resize_canvas(&self) {
            let size = renderer::board_size(&self.sim.level().grid, self.tile_size());
            self.canvas.set_width(size.x as u32);
            self.canvas.set_height(size.y as u32);
        }

        /// Handle a key press; returns the completion event if this key won
        fn handle_key(&mut self, key: &str) -> Option<CompletionStats> {
            if self.loading {
                return None;
            }
            let dir = self.settings.direction_for_key(key)?;
            let outcome = self.sim.apply_input(dir, now_ms());
            if outcome == StepOutcome::Respawned {
                log::info!("Spiked! Back to spawn");
            }
            outcome.completion().copied()
        }

        fn on_complete(&mut self, stats: &CompletionStats) {
            let difficulty = self.sim.level().difficulty;
            self.history.record_completion(stats, difficulty, now_ms());
            self.history.save();
            self.loading = true;
            log::info!(
                "Level complete: {:.1}s, {} coins, {} moves",
                stats.time,
                stats.coins,
                stats.moves
            );
        }

        fn render(&self) {
            let now = now_ms();
            let snapshot = self.sim.snapshot(now);
            let palette = Palette::for_contrast(self.settings.high_contrast);
            let shapes = renderer::build_frame(&snapshot, self.tile_size(), palette);
            if let Err(e) = renderer::canvas::paint(
                &self.ctx,
                self.canvas.width() as f64,
                self.canvas.height() as f64,
                &shapes,
            ) {
                log::warn!("Render error: {:?}", e);
            }
            self.update_hud(&Hud::from_snapshot(
                &snapshot,
                self.sim.level().grid.coin_count(),
            ));
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, hud: &Hud) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            if let Some(el) = document.query_selector("#hud-coins .hud-value").ok().flatten() {
                el.set_text_content(Some(&hud.coins_text()));
            }
            if let Some(el) = document.query_selector("#hud-moves .hud-value").ok().flatten() {
                el.set_text_content(Some(&hud.moves.to_string()));
            }
            if let Some(el) = document.get_element_by_id("hud-time") {
                if self.settings.show_timer {
                    let _ = el.set_attribute("class", "hud-item");
                    if let Some(val) = document
                        .query_selector("#hud-time .hud-value")
                        .ok()
                        .flatten()
                    {
                        val.set_text_content(Some(&hud.time_text()));
                    }
                } else {
                    let _ = el.set_attribute("class", "hud-item hidden");
                }
            }
            if let Some(el) = document.get_element_by_id("banner") {
                let class = if hud.won || self.loading { "banner" } else { "banner hidden" };
                let _ = el.set_attribute("class", class);
            }
        }

        fn update_level_info(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let level = self.sim.level();
            if let Some(el) = document.get_element_by_id("level-description") {
                el.set_text_content(Some(&level.description));
            }
            if let Some(el) = document.get_element_by_id("level-difficulty") {
                el.set_text_content(Some(level.difficulty_label().as_str()));
            }
            if let Some(el) = document.get_element_by_id("controls-hint") {
                el.set_text_content(Some(self.settings.keys.hint()));
            }
            if let Some(el) = document.get_element_by_id("stats") {
                let text = match self.history.summary() {
                    Some(s) => format!(
                        "Completed {} | Avg time {:.1}s | Avg coins {:.0} | Avg difficulty {:.1} | Sessions {}",
                        s.completed_levels,
                        s.avg_completion_time,
                        s.avg_coins,
                        s.avg_difficulty,
                        s.total_sessions
                    ),
                    None => "Complete your first level to see stats!".to_string(),
                };
                el.set_text_content(Some(&text));
            }
        }
    }

    /// Fetch (or generate) the next level, then start it
    async fn load_next_level(game: Rc<RefCell<Game>>, stats: CompletionStats) {
        let (endpoint, token, difficulty) = {
            let g = game.borrow();
            let current = g.sim.level().difficulty;
            let performance = g.history.performance();
            log::info!("Player performance: {}", performance.describe());
            (
                g.settings.generator_url.clone(),
                g.settings.generator_token.clone(),
                performance.trend.apply(current),
            )
        };

        let remote = match endpoint {
            Some(url) => match tile_quest::remote::fetch_next_level(&url, token.as_deref(), &stats)
                .await
            {
                Ok(level) => Some(level),
                Err(e) => {
                    log::warn!("Level generation failed: {}", e);
                    None
                }
            },
            None => None,
        };

        let mut g = game.borrow_mut();
        match remote {
            Some(level) => g.start_level(level),
            None => {
                let seed = g.next_seed;
                g.next_seed = g.next_seed.wrapping_add(1);
                g.start_level(generate_level(seed, difficulty));
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Tile Quest starting...");

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

        let settings = Settings::load();
        let history = SessionHistory::load();
        let seed = js_sys::Date::now() as u64;

        // First visit gets the tutorial, returning players a fresh level
        let level = match history.latest() {
            Some(last) => generate_level(seed, history.next_difficulty(last.difficulty)),
            None => LevelData::tutorial(),
        };
        let sim = GridSimulation::new(level, now_ms())
            .or_else(|_| GridSimulation::new(generate_level(seed, 1), now_ms()))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let game = Rc::new(RefCell::new(Game {
            sim,
            settings,
            history,
            canvas,
            ctx,
            next_seed: seed.wrapping_add(1),
            loading: false,
            abandon_recorded: false,
        }));
        {
            let g = game.borrow();
            g.resize_canvas();
            g.update_level_info();
        }

        setup_keyboard(game.clone());
        setup_unload(game.clone());
        request_animation_frame(game);
        Ok(())
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            let key = event.key();
            let won = {
                let mut g = game.borrow_mut();
                if g.settings.direction_for_key(&key).is_some() {
                    event.prevent_default();
                }
                let won = g.handle_key(&key);
                if let Some(stats) = &won {
                    g.on_complete(stats);
                }
                won
            };
            if let Some(stats) = won {
                wasm_bindgen_futures::spawn_local(load_next_level(game.clone(), stats));
            }
        });
        let _ =
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Leaving the page mid-level counts as an abandoned session
    fn setup_unload(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut()>::new(move || {
            game.borrow_mut().abandon_current(now_ms());
        });
        let _ =
            window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game.borrow().render();
            request_animation_frame(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Tile Quest (native) starting...");

    let level = match std::env::args().nth(1) {
        Some(path) => match load_level_file(&path) {
            Ok(level) => level,
            Err(e) => {
                log::error!("Could not load level from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => tile_quest::LevelData::tutorial(),
    };

    native::play(level);
}

#[cfg(not(target_arch = "wasm32"))]
fn load_level_file(path: &str) -> Result<tile_quest::LevelData, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)?;
    Ok(tile_quest::LevelData::from_json(&json)?)
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::io::{self, BufRead, Write};

    use tile_quest::levelgen::generate_level;
    use tile_quest::platform::now_ms;
    use tile_quest::renderer::{Hud, to_ascii};
    use tile_quest::sim::{GridSimulation, LevelData, StepOutcome};
    use tile_quest::{SessionHistory, Settings};

    fn draw(sim: &GridSimulation, settings: &Settings) {
        let snapshot = sim.snapshot(now_ms());
        let hud = Hud::from_snapshot(&snapshot, sim.level().grid.coin_count());
        println!("\n{}\n{}", to_ascii(&snapshot), hud.status_line(settings.show_timer));
    }

    /// Terminal loop: each input line is a sequence of w/a/s/d keys, `q` quits
    pub fn play(first: LevelData) {
        let settings = Settings::load();
        let mut history = SessionHistory::load();
        let mut seed = now_ms() as u64;

        let mut sim = match GridSimulation::new(first, now_ms()) {
            Ok(sim) => sim,
            Err(e) => {
                log::error!("Level is not playable: {}", e);
                return;
            }
        };
        println!("{}", sim.level().description);
        println!("{}, q to quit", settings.keys.hint());
        draw(&sim, &settings);

        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if line.trim() == "q" {
                break;
            }

            for key in line.chars().filter(|c| !c.is_whitespace()) {
                let Some(dir) = settings.direction_for_key(&key.to_string()) else {
                    continue;
                };
                match sim.apply_input(dir, now_ms()) {
                    StepOutcome::Won(stats) => {
                        println!(
                            "\nGoal! {:.1}s, {} coins, {} moves",
                            stats.time, stats.coins, stats.moves
                        );
                        let difficulty = sim.level().difficulty;
                        history.record_completion(&stats, difficulty, now_ms());
                        history.save();

                        let performance = history.performance();
                        log::info!("Player performance: {}", performance.describe());
                        seed = seed.wrapping_add(1);
                        let next = generate_level(seed, performance.trend.apply(difficulty));
                        println!(
                            "Next: {} ({})",
                            next.description,
                            next.difficulty_label().as_str()
                        );
                        match GridSimulation::new(next, now_ms()) {
                            Ok(next_sim) => sim = next_sim,
                            Err(e) => {
                                log::error!("Generated level is not playable: {}", e);
                                return;
                            }
                        }
                        break;
                    }
                    StepOutcome::Respawned => println!("Ouch! Back to the start."),
                    _ => {}
                }
            }

            draw(&sim, &settings);
            print!("> ");
            let _ = io::stdout().flush();
        }

        // Quit or end of input with the level still in play
        if history.record_unfinished(&sim, now_ms()) {
            history.save();
            log::info!("Session abandoned after {} moves", sim.moves());
        }

        if let Some(summary) = history.summary() {
            println!(
                "\n{} levels completed, avg {:.1}s, avg {:.0} coins",
                summary.completed_levels, summary.avg_completion_time, summary.avg_coins
            );
        }
    }
}
