//! The dinner facade.
//!
//! [`Dinner`] owns the shared monitor and seats one OS thread per
//! philosopher. It is the entry point used by the CLI.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use symposium_monitor::{AgentId, Monitor};
use tracing::{debug, error, info};

use crate::{
    config::DinnerConfig,
    error::DinnerError,
    philosopher::Philosopher,
    report::{DinnerReport, PhilosopherReport},
    Result,
};

/// A table of philosophers sharing one monitor.
///
/// # Example
///
/// ```rust
/// use symposium_core::{Dinner, DinnerConfig};
///
/// let mut config = DinnerConfig::default();
/// config.table.philosophers = 5;
/// config.agent.dining_steps = 3;
/// config.agent.time_to_waste_ms = 1;
///
/// let dinner = Dinner::new(config)?;
/// let report = dinner.run()?;
///
/// assert!(report.all_finished());
/// assert_eq!(report.total_meals(), 15);
/// # Ok::<(), symposium_core::DinnerError>(())
/// ```
#[derive(Debug)]
pub struct Dinner {
    config: DinnerConfig,
    monitor: Arc<Monitor>,
}

impl Dinner {
    /// Creates a dinner with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DinnerError::Config`] if the configuration is invalid.
    pub fn new(config: DinnerConfig) -> Result<Self> {
        config.validate()?;
        let monitor = Arc::new(Monitor::with_config(config.monitor_config()));

        info!(
            "Dinner set for {} philosophers, {} steps each",
            config.table.philosophers, config.agent.dining_steps
        );
        Ok(Self { config, monitor })
    }

    /// The configuration this dinner runs with.
    pub fn config(&self) -> &DinnerConfig {
        &self.config
    }

    /// Shared handle to the table's monitor.
    pub fn monitor(&self) -> &Arc<Monitor> {
        &self.monitor
    }

    /// Stops the dinner. Blocked philosophers leave the table.
    pub fn shutdown(&self) {
        self.monitor.shutdown();
    }

    /// Runs every philosopher to completion on its own thread.
    ///
    /// Blocks until all of them have left the table, either finished or
    /// stopped by [`shutdown`](Self::shutdown).
    ///
    /// # Errors
    ///
    /// - [`DinnerError::Spawn`] if a thread cannot be started. The table
    ///   is shut down and already-seated philosophers are joined first.
    /// - [`DinnerError::AgentPanicked`] if a philosopher thread panicked.
    pub fn run(&self) -> Result<DinnerReport> {
        let started = Instant::now();
        let n = self.config.table.philosophers;

        let mut handles = Vec::with_capacity(n);
        for id in 0..n {
            match self.seat(id) {
                Ok(handle) => handles.push(handle),
                Err(source) => {
                    error!("Could not seat philosopher {}: {}", id, source);
                    self.monitor.shutdown();
                    for handle in handles {
                        let _ = handle.join();
                    }
                    return Err(DinnerError::Spawn { agent: id, source });
                }
            }
        }
        debug!("All {} philosophers seated", n);

        let mut philosophers = Vec::with_capacity(n);
        let mut panicked = None;
        for (id, handle) in handles.into_iter().enumerate() {
            match handle.join() {
                Ok(report) => philosophers.push(report),
                Err(_) => {
                    error!("Philosopher {} panicked", id);
                    panicked.get_or_insert(id);
                }
            }
        }
        if let Some(agent) = panicked {
            return Err(DinnerError::AgentPanicked { agent });
        }

        let report = DinnerReport {
            philosophers,
            table: self.monitor.snapshot(),
            elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        };
        info!(
            "Dinner is over: {} meals, {} talks in {} ms",
            report.total_meals(),
            report.total_talks(),
            report.elapsed_ms
        );
        Ok(report)
    }

    fn seat(&self, id: AgentId) -> std::io::Result<JoinHandle<PhilosopherReport>> {
        let rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(id as u64)),
            None => StdRng::from_entropy(),
        };
        let philosopher = Philosopher::new(id, Arc::clone(&self.monitor), self.config.agent, rng);
        let guard = ShutdownOnPanic(Arc::clone(&self.monitor));

        thread::Builder::new()
            .name(format!("philosopher-{id}"))
            .spawn(move || {
                let _guard = guard;
                philosopher.run()
            })
    }
}

/// Closes the table if a philosopher thread unwinds, so its neighbors are
/// not left blocked behind forks that will never be put down.
struct ShutdownOnPanic(Arc<Monitor>);

impl Drop for ShutdownOnPanic {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.shutdown();
        }
    }
}
