//! # Symposium Core
//!
//! Runs a dinner of philosophers around a shared [`Monitor`]. Each
//! philosopher gets its own OS thread and cycles through eating,
//! thinking and, now and then, talking.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                         Dinner                           │
//! │                                                          │
//! │   philosopher-0   philosopher-1   ...   philosopher-n-1  │
//! │        │               │                      │          │
//! │        └───────────────┼──────────────────────┘          │
//! │                        ▼                                 │
//! │              ┌───────────────────┐                       │
//! │              │  Arc<Monitor>     │  ← single lock        │
//! │              └───────────────────┘                       │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use symposium_core::{Dinner, DinnerConfig};
//!
//! let mut config = DinnerConfig::default();
//! config.agent.dining_steps = 2;
//! config.agent.time_to_waste_ms = 0;
//!
//! let report = Dinner::new(config)?.run()?;
//! assert_eq!(report.total_meals(), 8);
//! # Ok::<(), symposium_core::DinnerError>(())
//! ```
//!
//! ## Failure Handling
//!
//! A philosopher whose wait is interrupted withdraws its request, logs
//! the reason and stops; it is never retried. [`Dinner::shutdown`] stops
//! every philosopher this way.

mod config;
mod dinner;
mod error;
mod philosopher;
mod phrases;
mod report;

pub use config::{AgentConfig, DinnerConfig, TableConfig};
pub use dinner::Dinner;
pub use error::DinnerError;
pub use philosopher::Philosopher;
pub use phrases::say_something;
pub use report::{DinnerReport, Outcome, PhilosopherReport};

// Re-export monitor types for convenience
pub use symposium_monitor::{ActivityState, AgentId, Monitor, MonitorError, TableSnapshot};

/// Core result type for dinner operations.
pub type Result<T> = std::result::Result<T, DinnerError>;
