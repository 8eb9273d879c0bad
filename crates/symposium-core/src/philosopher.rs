//! The philosopher agent loop.
//!
//! A philosopher only touches the table through the monitor. Everything
//! else it does is sleeping for a random while and logging about it.

use rand::Rng;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use symposium_monitor::{AgentId, Monitor};
use tracing::{error, info};

use crate::config::AgentConfig;
use crate::phrases::say_something;
use crate::report::{Outcome, PhilosopherReport};

/// One seat at the table, driven by its own thread.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use rand::{rngs::StdRng, SeedableRng};
/// use symposium_core::{AgentConfig, Philosopher};
/// use symposium_monitor::Monitor;
///
/// let monitor = Arc::new(Monitor::new(1));
/// let config = AgentConfig { dining_steps: 3, time_to_waste_ms: 0, talk_probability: 1.0 };
///
/// let report = Philosopher::new(0, monitor, config, StdRng::seed_from_u64(1)).run();
/// assert_eq!(report.meals, 3);
/// assert_eq!(report.talks, 3);
/// ```
#[derive(Debug)]
pub struct Philosopher<R> {
    id: AgentId,
    monitor: Arc<Monitor>,
    config: AgentConfig,
    rng: R,
}

impl<R: Rng> Philosopher<R> {
    /// Seats philosopher `id` at the table guarded by `monitor`.
    pub fn new(id: AgentId, monitor: Arc<Monitor>, config: AgentConfig, rng: R) -> Self {
        Self {
            id,
            monitor,
            config,
            rng,
        }
    }

    /// Seat number.
    pub fn id(&self) -> AgentId {
        self.id
    }

    /// Runs every dining step, or stops at the first interrupted wait.
    ///
    /// An interrupted philosopher withdraws any pending request for forks
    /// before it leaves, so it never holds up its neighbors afterwards.
    pub fn run(mut self) -> PhilosopherReport {
        let mut report = PhilosopherReport::new(self.id);

        for step in 0..self.config.dining_steps {
            if let Err(err) = self.dine_once(&mut report) {
                self.monitor.abandon_resources(self.id);
                error!(
                    "Philosopher {} leaves the table after {} of {} steps: {}",
                    self.id, step, self.config.dining_steps, err
                );
                report.outcome = Outcome::from(err);
                return report;
            }
        }

        info!("Philosopher {} has finished dining", self.id);
        report
    }

    fn dine_once(&mut self, report: &mut PhilosopherReport) -> symposium_monitor::Result<()> {
        self.monitor.acquire_resources(self.id)?;
        self.eat();
        report.meals += 1;
        self.monitor.release_resources(self.id);

        self.think();
        report.thoughts += 1;

        if self.rng.gen_bool(self.config.talk_probability) {
            self.monitor.request_exclusive_turn(self.id)?;
            self.talk();
            report.talks += 1;
            self.monitor.release_exclusive_turn(self.id);
        }
        Ok(())
    }

    fn eat(&mut self) {
        self.inform("eating", true);
        self.pause(self.config.time_to_waste());
        self.inform("eating", false);
    }

    fn think(&mut self) {
        self.inform("thinking", true);
        self.pause(self.config.time_to_waste());
        self.inform("thinking", false);
    }

    fn talk(&mut self) {
        self.inform("talking", true);
        let phrase = say_something(self.id, &mut self.rng);
        info!("Philosopher {} says: {}", self.id, phrase);
        self.pause(self.config.time_to_talk());
        self.inform("talking", false);
    }

    /// Sleeps for a uniformly random duration in `[0, max]`.
    fn pause(&mut self, max: Duration) {
        let max_ms = u64::try_from(max.as_millis()).unwrap_or(u64::MAX);
        let ms = self.rng.gen_range(0..=max_ms);
        if ms > 0 {
            thread::sleep(Duration::from_millis(ms));
        }
    }

    fn inform(&self, activity: &str, started: bool) {
        let phase = if started { "started" } else { "finished" };
        info!("Philosopher {} has {} {}.", self.id, phase, activity);
    }
}
