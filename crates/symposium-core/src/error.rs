//! Error types for running a dinner.

use thiserror::Error;

use symposium_monitor::{AgentId, MonitorError};

/// Core error type for dinner operations.
#[derive(Debug, Error)]
pub enum DinnerError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Monitor error passthrough.
    #[error("Monitor error: {0}")]
    Monitor(#[from] MonitorError),

    /// Config file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A philosopher thread could not be started.
    #[error("Could not seat philosopher {agent}: {source}")]
    Spawn {
        /// Philosopher whose thread failed to start
        agent: AgentId,
        /// Underlying OS error
        source: std::io::Error,
    },

    /// A philosopher thread panicked.
    #[error("Philosopher {agent} panicked")]
    AgentPanicked {
        /// First philosopher found to have panicked
        agent: AgentId,
    },
}
