//! Per-philosopher activity state and table snapshots.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ring::{right_of, AgentId};

/// What a philosopher is doing, as far as the monitor is concerned.
///
/// `HUNGRY` and `STARVING` both mean "waiting to eat"; `STARVING` is the
/// escalated form that wins tie-breaks against merely hungry neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityState {
    /// Idle, holding nothing.
    #[default]
    Thinking,
    /// Waiting for both forks.
    Hungry,
    /// Holding both forks.
    Eating,
    /// Waiting for both forks after too many denials.
    Starving,
}

impl ActivityState {
    /// True while the philosopher waits to eat.
    pub const fn is_waiting(self) -> bool {
        matches!(self, Self::Hungry | Self::Starving)
    }

    /// True if this state keeps a hungry neighbor from being admitted.
    pub const fn blocks_neighbors(self) -> bool {
        matches!(self, Self::Eating | Self::Starving)
    }
}

impl fmt::Display for ActivityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Thinking => "thinking",
            Self::Hungry => "hungry",
            Self::Eating => "eating",
            Self::Starving => "starving",
        };
        f.write_str(name)
    }
}

/// Consistent copy of the monitor's shared state, taken under its lock.
///
/// # Example
///
/// ```rust
/// use symposium_monitor::{ActivityState, Monitor};
///
/// let monitor = Monitor::new(3);
/// monitor.acquire_resources(1)?;
///
/// let snapshot = monitor.snapshot();
/// assert_eq!(snapshot.states[1], ActivityState::Eating);
/// assert_eq!(snapshot.eating(), vec![1]);
/// assert!(snapshot.is_mutually_exclusive());
/// # Ok::<(), symposium_monitor::MonitorError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSnapshot {
    /// Activity state per philosopher.
    pub states: Vec<ActivityState>,
    /// Consecutive denials per philosopher since it last became hungry.
    pub wait_counts: Vec<u32>,
    /// Holder of the exclusive talking turn, if any.
    pub talker: Option<AgentId>,
}

impl TableSnapshot {
    /// Philosophers currently eating, in seat order.
    pub fn eating(&self) -> Vec<AgentId> {
        self.states
            .iter()
            .enumerate()
            .filter(|(_, state)| **state == ActivityState::Eating)
            .map(|(id, _)| id)
            .collect()
    }

    /// Returns true if no two adjacent philosophers are eating.
    pub fn is_mutually_exclusive(&self) -> bool {
        let n = self.states.len();
        if n < 2 {
            return true;
        }
        (0..n).all(|id| {
            let next = right_of(id, n);
            !(self.states[id] == ActivityState::Eating
                && self.states[next] == ActivityState::Eating)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(states: Vec<ActivityState>) -> TableSnapshot {
        let n = states.len();
        TableSnapshot {
            states,
            wait_counts: vec![0; n],
            talker: None,
        }
    }

    #[test]
    fn test_waiting_states() {
        assert!(ActivityState::Hungry.is_waiting());
        assert!(ActivityState::Starving.is_waiting());
        assert!(!ActivityState::Eating.is_waiting());
        assert!(!ActivityState::Thinking.is_waiting());
    }

    #[test]
    fn test_blocking_states() {
        assert!(ActivityState::Eating.blocks_neighbors());
        assert!(ActivityState::Starving.blocks_neighbors());
        assert!(!ActivityState::Hungry.blocks_neighbors());
        assert!(!ActivityState::Thinking.blocks_neighbors());
    }

    #[test]
    fn test_adjacent_eaters_detected_across_wrap() {
        use ActivityState::*;
        assert!(snapshot(vec![Eating, Thinking, Eating, Thinking]).is_mutually_exclusive());
        assert!(!snapshot(vec![Eating, Thinking, Thinking, Eating]).is_mutually_exclusive());
        assert!(!snapshot(vec![Thinking, Eating, Eating, Hungry]).is_mutually_exclusive());
    }

    #[test]
    fn test_single_seat_is_always_exclusive() {
        assert!(snapshot(vec![ActivityState::Eating]).is_mutually_exclusive());
    }

    #[test]
    fn test_snapshot_serialization() {
        use ActivityState::*;
        let snap = snapshot(vec![Eating, Starving, Thinking]);
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"starving\""));
        let parsed: TableSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, snap);
    }
}
