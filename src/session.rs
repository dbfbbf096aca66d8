//! Simulation context
//!
//! A `Session` owns everything that can change during play: the store, the
//! held-key state, the scheduler and the observers. Host callbacks only ever
//! talk to the session, which turns them into commands.

use glam::Vec2;

use crate::input::InputController;
use crate::schedule::{Scheduler, TickKind, TickRates};
use crate::sim::geometry::Viewport;
use crate::sim::{Command, Frame, GameState, Snapshot, apply};

/// Receives a frame after every simulation tick
pub trait Observer {
    fn on_frame(&mut self, frame: &Frame);
}

impl<F: FnMut(&Frame)> Observer for F {
    fn on_frame(&mut self, frame: &Frame) {
        self(frame)
    }
}

/// One playable game: store, input, timers, observers
pub struct Session {
    state: GameState,
    input: InputController,
    scheduler: Scheduler,
    observers: Vec<Box<dyn Observer>>,
    /// Simulation ticks since the last reset
    ticks: u64,
}

impl Session {
    pub fn new(viewport: Viewport, seed: u64, now_ms: f64, rates: TickRates) -> Self {
        log::info!(
            "Session started ({}x{}, seed {})",
            viewport.width,
            viewport.height,
            seed
        );
        Self {
            state: GameState::new(viewport, seed, now_ms),
            input: InputController::new(),
            scheduler: Scheduler::new(rates),
            observers: Vec::new(),
            ticks: 0,
        }
    }

    pub fn subscribe(&mut self, observer: impl Observer + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn snapshot(&self, now_ms: f64) -> Snapshot {
        Snapshot::capture(&self.state, now_ms)
    }

    pub fn final_score(&self, now_ms: f64) -> i64 {
        self.state.final_score(now_ms)
    }

    pub fn key_down(&mut self, key: &str) -> bool {
        self.input.key_down(key)
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        self.input.key_up(key)
    }

    /// Release all held keys (window blur)
    pub fn release_keys(&mut self) {
        self.input.clear();
    }

    /// Fire toward a click in viewport coordinates. Applies even after game
    /// over, like movement.
    pub fn pointer_click(&mut self, click: Vec2) {
        let center = self.state.viewport().center();
        if let Some(command) = InputController::fire_command(click, center) {
            apply(&mut self.state, command);
        }
    }

    /// Run every tick that fell due during a host frame of `frame_ms`
    pub fn update(&mut self, frame_ms: f64, now_ms: f64) {
        for due in self.scheduler.advance(frame_ms) {
            if !self.scheduler.is_current(&due) {
                continue;
            }
            match due.kind {
                TickKind::Input => {
                    for command in self.input.movement_commands() {
                        apply(&mut self.state, command);
                    }
                }
                TickKind::Simulation => self.step(now_ms),
                TickKind::Spawn => apply(&mut self.state, Command::SpawnEnemy),
            }
        }
    }

    fn step(&mut self, now_ms: f64) {
        apply(&mut self.state, Command::Step);
        self.ticks += 1;

        if self.state.is_game_over() {
            self.scheduler.stop();
            log::info!(
                "Session ended after {} ticks, final score {}",
                self.ticks,
                self.state.final_score(now_ms)
            );
        }

        self.publish(now_ms);
    }

    /// Start over in the same viewport with fresh timers
    pub fn reset(&mut self, now_ms: f64) {
        apply(&mut self.state, Command::Reset { now_ms });
        self.scheduler.restart();
        self.ticks = 0;
        log::info!("Session reset");
        self.publish(now_ms);
    }

    /// Stop all timers; nothing mutates the state after this
    pub fn shutdown(&mut self) {
        self.scheduler.shutdown();
        self.input.clear();
        log::info!("Session shut down");
    }

    fn publish(&mut self, now_ms: f64) {
        let frame = Frame {
            tick: self.ticks,
            snapshot: Snapshot::capture(&self.state, now_ms),
            events: self.state.drain_events(),
        };
        for observer in &mut self.observers {
            observer.on_frame(&frame);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GameEvent;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn new_session() -> Session {
        Session::new(Viewport::new(800.0, 600.0), 777, 0.0, TickRates::default())
    }

    fn record(session: &mut Session) -> Rc<RefCell<Vec<Frame>>> {
        let frames = Rc::new(RefCell::new(Vec::new()));
        let sink = frames.clone();
        session.subscribe(move |frame: &Frame| sink.borrow_mut().push(frame.clone()));
        frames
    }

    #[test]
    fn test_frame_per_simulation_tick() {
        let mut session = new_session();
        let frames = record(&mut session);

        session.update(48.0, 48.0);

        assert_eq!(frames.borrow().len(), 3);
        assert_eq!(frames.borrow()[2].tick, 3);
        assert_eq!(session.ticks(), 3);
    }

    #[test]
    fn test_held_key_moves_player() {
        let mut session = new_session();
        session.key_down("ArrowLeft");
        session.update(32.0, 32.0);
        assert_eq!(session.state().player().pos, Vec2::new(390.0, 300.0));

        session.key_up("ArrowLeft");
        session.update(32.0, 64.0);
        assert_eq!(session.state().player().pos, Vec2::new(390.0, 300.0));
    }

    #[test]
    fn test_spawn_cadence() {
        let mut session = new_session();
        for i in 1..=40 {
            session.update(50.0, i as f64 * 50.0);
        }
        // Enemies spawn at the edges and need far more than 2s to reach the player
        assert_eq!(session.state().enemies().len(), 1);
    }

    #[test]
    fn test_click_fires_projectile() {
        let mut session = new_session();
        let frames = record(&mut session);
        session.pointer_click(Vec2::new(400.0, 0.0));
        assert_eq!(session.state().projectiles().len(), 1);
        let direction = session.state().projectiles()[0].direction;
        assert!((direction - Vec2::new(0.0, -1.0)).length() < 1e-6);

        session.update(16.0, 16.0);
        let frames = frames.borrow();
        assert!(
            frames[0]
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::ProjectileFired { .. }))
        );
        let pos = frames[0].snapshot.projectiles[0].pos;
        assert!((pos - Vec2::new(400.0, 290.0)).length() < 1e-4);
    }

    #[test]
    fn test_click_at_center_fires_nothing() {
        let mut session = new_session();
        session.pointer_click(Vec2::new(400.0, 300.0));
        assert!(session.state().projectiles().is_empty());
    }

    #[test]
    fn test_game_over_stops_simulation_but_not_input() {
        let mut session = new_session();
        let frames = record(&mut session);
        apply(&mut session.state, Command::UpdateHealth { delta: -95 });
        let player = session.state.player().pos;
        let id = session.state.next_entity_id();
        session.state.enemies.push(crate::sim::Enemy {
            id,
            pos: player + Vec2::new(5.0, 0.0),
            health: 100,
            kind: crate::sim::EnemyKind::Basic,
        });

        // Many ticks fall due in this frame; only the first may run
        session.update(100.0, 100.0);

        assert!(session.state().is_game_over());
        assert_eq!(session.ticks(), 1);
        assert_eq!(frames.borrow().len(), 1);
        assert!(frames.borrow()[0].snapshot.game_over);
        assert!(!session.scheduler().is_armed());

        let enemy_pos = session.state().enemies()[0].pos;
        session.key_down("d");
        session.update(100.0, 200.0);
        assert_eq!(session.ticks(), 1);
        assert_eq!(session.state().enemies()[0].pos, enemy_pos);
        assert!(session.state().player().pos.x > player.x);
    }

    #[test]
    fn test_reset_rearms_and_publishes() {
        let mut session = new_session();
        let frames = record(&mut session);
        apply(&mut session.state, Command::UpdateHealth { delta: -100 });
        session.update(16.0, 16.0);
        assert!(!session.scheduler().is_armed());

        session.reset(1_000.0);

        assert!(session.scheduler().is_armed());
        let last = frames.borrow().last().cloned().unwrap();
        assert_eq!(last.tick, 0);
        assert_eq!(last.snapshot.health, 100);
        assert!(!last.snapshot.game_over);
        assert!(last.events.contains(&GameEvent::GameReset));

        session.update(16.0, 1_016.0);
        assert_eq!(session.ticks(), 1);
    }

    #[test]
    fn test_shutdown_freezes_state() {
        let mut session = new_session();
        session.key_down("s");
        session.shutdown();
        let before = session.snapshot(0.0);
        session.update(100.0, 100.0);
        assert_eq!(session.snapshot(0.0), before);
    }
}
