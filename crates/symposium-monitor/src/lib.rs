//! # Dining Monitor
//!
//! Deadlock-free, starvation-aware coordination for philosophers seated
//! around a table. Each philosopher alternates between thinking, eating
//! with the two forks it shares with its neighbors, and occasionally
//! talking, which only one philosopher may do at a time.
//!
//! ## Guarantees
//!
//! - **Mutual exclusion**: two neighbors never eat at the same time
//! - **No deadlock**: forks are never held one at a time, so there is no
//!   cyclic wait to form
//! - **Bounded waiting**: after `waiting_bound` denials a hungry
//!   philosopher starts starving and takes priority over hungry
//!   neighbors; ties between starving neighbors go to the longer waiter
//! - **Exclusive talking**: at most one philosopher holds the talking turn
//!
//! ## Components
//!
//! | Component | Purpose |
//! |-----------|---------|
//! | [`Monitor`] | Shared state behind one lock, blocking entry points |
//! | [`admit`] | Pure admission predicate with starvation tie-breaks |
//! | [`left_of`] / [`right_of`] | Ring topology, 0-based |
//! | [`TableSnapshot`] | Consistent, serializable view of the table |
//!
//! ## Quick Start
//!
//! ```rust
//! use symposium_monitor::{ActivityState, Monitor};
//!
//! let monitor = Monitor::new(5);
//!
//! monitor.acquire_resources(0)?;
//! assert_eq!(monitor.state(0), ActivityState::Eating);
//! monitor.release_resources(0);
//!
//! monitor.request_exclusive_turn(3)?;
//! monitor.release_exclusive_turn(3);
//! # Ok::<(), symposium_monitor::MonitorError>(())
//! ```
//!
//! ## Cancellation
//!
//! A blocked philosopher can be woken early with [`Monitor::interrupt`] or
//! by closing the whole table with [`Monitor::shutdown`]. An interrupted
//! acquire leaves the philosopher waiting so a later release can still
//! admit it; [`Monitor::abandon_resources`] withdraws the request instead.

mod admission;
mod error;
mod monitor;
mod ring;
mod state;

pub use admission::{admit, Admission, Grant, Seat};
pub use error::{MonitorError, Result};
pub use monitor::{Monitor, MonitorConfig, DEFAULT_WAITING_BOUND};
pub use ring::{left_of, neighbors, right_of, AgentId};
pub use state::{ActivityState, TableSnapshot};
