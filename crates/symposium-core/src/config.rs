//! Configuration types for a dinner.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use symposium_monitor::{MonitorConfig, DEFAULT_WAITING_BOUND};

use crate::{error::DinnerError, Result};

/// Configuration for a whole dinner.
///
/// Every section falls back to its defaults when missing from a file, so
/// `{"table": {"philosophers": 7}}` is a complete config.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DinnerConfig {
    /// Table layout and monitor settings.
    pub table: TableConfig,

    /// Per-philosopher loop settings.
    pub agent: AgentConfig,

    /// Seed for reproducible timings and decisions. Philosopher `i` uses
    /// `seed + i`. Entropy-seeded when absent.
    pub seed: Option<u64>,
}

/// Table configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Number of philosophers, and of forks between them.
    pub philosophers: usize,

    /// Denials before a hungry philosopher escalates to starving.
    pub waiting_bound: u32,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            philosophers: 4,
            waiting_bound: DEFAULT_WAITING_BOUND,
        }
    }
}

/// Philosopher loop configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Eat/think/talk cycles each philosopher performs.
    pub dining_steps: u32,

    /// Upper bound for eating and thinking, in milliseconds. Talking takes
    /// at most half of it.
    pub time_to_waste_ms: u64,

    /// Chance of asking for the talking turn after each thought.
    pub talk_probability: f64,
}

impl AgentConfig {
    /// Upper bound for eating and thinking.
    pub fn time_to_waste(&self) -> Duration {
        Duration::from_millis(self.time_to_waste_ms)
    }

    /// Upper bound for talking.
    pub fn time_to_talk(&self) -> Duration {
        Duration::from_millis(self.time_to_waste_ms / 2)
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            dining_steps: 10,
            time_to_waste_ms: 1000,
            talk_probability: 0.5,
        }
    }
}

impl DinnerConfig {
    /// Loads a JSON config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// parsed config fails [`validate`](Self::validate).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the values a monitor or agent loop cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`DinnerError::Config`] describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.table.philosophers == 0 {
            return Err(DinnerError::Config(
                "number of philosophers must be a positive integer".into(),
            ));
        }
        if self.table.waiting_bound == 0 {
            return Err(DinnerError::Config(
                "waiting bound must be a positive integer".into(),
            ));
        }
        let p = self.agent.talk_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(DinnerError::Config(format!(
                "talk probability {p} is outside [0, 1]"
            )));
        }
        Ok(())
    }

    /// Monitor settings derived from the table section.
    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig::new(self.table.philosophers).with_waiting_bound(self.table.waiting_bound)
    }
}
