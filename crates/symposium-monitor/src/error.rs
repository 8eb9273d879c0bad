//! Error types for the dining monitor.
//!
//! The monitor has no I/O and no business errors. The only runtime failure
//! is a blocking wait that ends without being granted what it asked for.

use thiserror::Error;

use crate::ring::AgentId;

/// Result type alias for monitor operations.
pub type Result<T> = std::result::Result<T, MonitorError>;

/// Errors returned by the blocking entry points of [`Monitor`](crate::Monitor).
///
/// Calling an operation from the wrong state or with an out-of-range agent id
/// is a programmer error and panics instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MonitorError {
    /// A targeted interrupt ended the agent's wait.
    ///
    /// If the agent was waiting for resources it is still `HUNGRY` or
    /// `STARVING`; call [`Monitor::abandon_resources`](crate::Monitor::abandon_resources)
    /// to withdraw the request.
    #[error("philosopher {agent} was interrupted while waiting")]
    Interrupted {
        /// Agent whose wait was interrupted
        agent: AgentId,
    },

    /// The monitor was shut down before the request could be granted.
    #[error("monitor has been shut down")]
    Shutdown,
}
