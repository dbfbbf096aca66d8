//! Fixed-interval tick scheduling
//!
//! Three independent cadences run off the host clock: input sampling,
//! simulation steps and enemy spawns. The host reports how much time passed
//! each frame; the scheduler answers with the ticks that fell due, in the order
//! they fell due.
//!
//! Stopping is immediate. Ticks handed out before `stop` carry the old
//! generation and are rejected by `is_current`, so nothing computed for a
//! finished session can touch the next one.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Tick periods in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickRates {
    pub input_ms: f64,
    pub sim_ms: f64,
    pub spawn_ms: f64,
}

impl Default for TickRates {
    fn default() -> Self {
        Self {
            input_ms: INPUT_TICK_MS,
            sim_ms: SIM_TICK_MS,
            spawn_ms: SPAWN_TICK_MS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TickKind {
    Input,
    Simulation,
    Spawn,
}

/// A tick that fell due during `Scheduler::advance`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueTick {
    pub kind: TickKind,
    pub generation: u64,
}

/// One repeating timer
#[derive(Debug, Clone)]
pub struct Interval {
    period_ms: f64,
    /// Time since this interval last fired
    since_last_ms: f64,
}

impl Interval {
    pub fn new(period_ms: f64) -> Self {
        if !(period_ms > 0.0) {
            log::warn!("Interval period {} ms is not positive, it will never fire", period_ms);
        }
        Self {
            period_ms,
            since_last_ms: 0.0,
        }
    }

    pub fn period_ms(&self) -> f64 {
        self.period_ms
    }

    pub fn reset(&mut self) {
        self.since_last_ms = 0.0;
    }

    /// Advance by `dt_ms`, returning the offsets within `[0, dt_ms]` at which
    /// the interval fired
    pub fn advance(&mut self, dt_ms: f64) -> Vec<f64> {
        let mut fired = Vec::new();
        if !(self.period_ms > 0.0) {
            return fired;
        }

        let mut at = self.period_ms - self.since_last_ms;
        while at <= dt_ms {
            fired.push(at);
            at += self.period_ms;
        }
        self.since_last_ms = dt_ms - (at - self.period_ms);
        fired
    }
}

/// Owns the three cadences for a session
#[derive(Debug, Clone)]
pub struct Scheduler {
    input: Interval,
    simulation: Interval,
    spawn: Interval,
    /// Simulation and spawn run only while armed
    armed: bool,
    /// Input sampling keeps running after game over, until shutdown
    open: bool,
    generation: u64,
}

impl Scheduler {
    /// Create an armed scheduler
    pub fn new(rates: TickRates) -> Self {
        Self {
            input: Interval::new(rates.input_ms),
            simulation: Interval::new(rates.sim_ms),
            spawn: Interval::new(rates.spawn_ms),
            armed: true,
            open: true,
            generation: 0,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Collect every tick that fell due during a host frame of `frame_ms`.
    /// Frames longer than `MAX_FRAME_MS` are shortened so a stalled tab does not
    /// replay seconds of simulation at once.
    pub fn advance(&mut self, frame_ms: f64) -> Vec<DueTick> {
        if !self.open {
            return Vec::new();
        }
        let dt = frame_ms.clamp(0.0, MAX_FRAME_MS);

        let mut due: Vec<(f64, TickKind)> = self
            .input
            .advance(dt)
            .into_iter()
            .map(|at| (at, TickKind::Input))
            .collect();

        if self.armed {
            due.extend(
                self.simulation
                    .advance(dt)
                    .into_iter()
                    .map(|at| (at, TickKind::Simulation)),
            );
            due.extend(
                self.spawn
                    .advance(dt)
                    .into_iter()
                    .map(|at| (at, TickKind::Spawn)),
            );
        }

        due.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        let generation = self.generation;
        due.into_iter()
            .map(|(_, kind)| DueTick { kind, generation })
            .collect()
    }

    /// Whether a previously returned tick may still run
    pub fn is_current(&self, tick: &DueTick) -> bool {
        if !self.open {
            return false;
        }
        match tick.kind {
            TickKind::Input => true,
            TickKind::Simulation | TickKind::Spawn => {
                self.armed && tick.generation == self.generation
            }
        }
    }

    /// Cancel simulation and spawn ticks, including ones already handed out
    pub fn stop(&mut self) {
        if self.armed {
            log::debug!("Scheduler stopped (generation {})", self.generation);
        }
        self.armed = false;
        self.generation += 1;
        self.simulation.reset();
        self.spawn.reset();
    }

    /// Re-arm for a new session with fresh timers
    pub fn restart(&mut self) {
        self.generation += 1;
        self.armed = true;
        self.open = true;
        self.input.reset();
        self.simulation.reset();
        self.spawn.reset();
        log::debug!("Scheduler restarted (generation {})", self.generation);
    }

    /// Stop everything, input included
    pub fn shutdown(&mut self) {
        self.stop();
        self.open = false;
    }
}
