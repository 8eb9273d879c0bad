//! Run reports for philosophers and whole dinners.

use serde::{Deserialize, Serialize};

use symposium_monitor::{AgentId, MonitorError, TableSnapshot};

/// How a philosopher's loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Completed every dining step.
    Finished,
    /// Stopped after an interrupted wait.
    Interrupted,
    /// Stopped because the table was shut down.
    Shutdown,
}

impl From<MonitorError> for Outcome {
    fn from(err: MonitorError) -> Self {
        match err {
            MonitorError::Interrupted { .. } => Self::Interrupted,
            MonitorError::Shutdown => Self::Shutdown,
        }
    }
}

/// What one philosopher did during a dinner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhilosopherReport {
    /// Seat number.
    pub id: AgentId,
    /// Completed meals.
    pub meals: u32,
    /// Completed thinking sessions.
    pub thoughts: u32,
    /// Completed talks.
    pub talks: u32,
    /// How the loop ended.
    pub outcome: Outcome,
}

impl PhilosopherReport {
    /// Empty report for philosopher `id`.
    pub fn new(id: AgentId) -> Self {
        Self {
            id,
            meals: 0,
            thoughts: 0,
            talks: 0,
            outcome: Outcome::Finished,
        }
    }

    /// Returns true if every dining step was completed.
    pub fn is_finished(&self) -> bool {
        self.outcome == Outcome::Finished
    }
}

/// Summary of a whole dinner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DinnerReport {
    /// One report per philosopher, in seat order.
    pub philosophers: Vec<PhilosopherReport>,
    /// Table state after every philosopher left.
    pub table: TableSnapshot,
    /// Wall-clock duration of the dinner.
    pub elapsed_ms: u64,
}

impl DinnerReport {
    /// Meals eaten across the table.
    pub fn total_meals(&self) -> u32 {
        self.philosophers.iter().map(|p| p.meals).sum()
    }

    /// Talks given across the table.
    pub fn total_talks(&self) -> u32 {
        self.philosophers.iter().map(|p| p.talks).sum()
    }

    /// Returns true if every philosopher completed its loop.
    pub fn all_finished(&self) -> bool {
        self.philosophers.iter().all(PhilosopherReport::is_finished)
    }
}
