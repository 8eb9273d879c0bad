//! The admission predicate.
//!
//! Decides whether a waiting philosopher may start eating, given its own
//! seat and the seats on either side. The decision is a pure function of
//! the three states and wait counters; the monitor applies its outcome.
//!
//! # Rules
//!
//! 1. A waiting philosopher is admitted if neither neighbor is eating or
//!    starving.
//! 2. A starving philosopher with exactly one starving neighbor (and the
//!    other neighbor neither eating nor starving) is admitted if it has
//!    waited at least as long as that neighbor.
//! 3. A starving philosopher between two starving neighbors is admitted if
//!    it has waited at least as long as both.
//!
//! Rules 2 and 3 never admit next to an eating neighbor, so rule 1's
//! exclusion holds for every grant.

use crate::state::ActivityState;

/// One seat's view as seen by the admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seat {
    /// Current activity state.
    pub state: ActivityState,
    /// Consecutive denials since the philosopher became hungry.
    pub waited: u32,
}

impl Seat {
    /// Creates a seat view.
    pub const fn new(state: ActivityState, waited: u32) -> Self {
        Self { state, waited }
    }
}

/// Which rule admitted a philosopher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grant {
    /// Neither neighbor eating nor starving.
    Clear,
    /// Outwaited a starving left neighbor.
    OutwaitedLeft,
    /// Outwaited a starving right neighbor.
    OutwaitedRight,
    /// Outwaited starving neighbors on both sides.
    OutwaitedBoth,
}

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The philosopher may eat.
    Granted(Grant),
    /// The philosopher must keep waiting.
    Denied,
}

impl Admission {
    /// Returns true for any grant.
    pub const fn is_granted(self) -> bool {
        matches!(self, Self::Granted(_))
    }
}

/// Evaluates the admission rules for `me` seated between `left` and `right`.
///
/// # Example
///
/// ```rust
/// use symposium_monitor::{admit, ActivityState::*, Admission, Grant, Seat};
///
/// // Both neighbors idle: admitted straight away.
/// let outcome = admit(Seat::new(Thinking, 0), Seat::new(Hungry, 0), Seat::new(Thinking, 0));
/// assert_eq!(outcome, Admission::Granted(Grant::Clear));
///
/// // A neighbor is eating: denied.
/// let outcome = admit(Seat::new(Eating, 0), Seat::new(Hungry, 1), Seat::new(Thinking, 0));
/// assert_eq!(outcome, Admission::Denied);
/// ```
pub fn admit(left: Seat, me: Seat, right: Seat) -> Admission {
    if !me.state.is_waiting() {
        return Admission::Denied;
    }

    let left_blocks = left.state.blocks_neighbors();
    let right_blocks = right.state.blocks_neighbors();
    if !left_blocks && !right_blocks {
        return Admission::Granted(Grant::Clear);
    }

    // Tie-breaks only apply to an equally desperate philosopher.
    if me.state != ActivityState::Starving {
        return Admission::Denied;
    }

    let left_starving = left.state == ActivityState::Starving;
    let right_starving = right.state == ActivityState::Starving;

    let grant = match (left_starving, right_starving) {
        (true, true) if me.waited >= left.waited && me.waited >= right.waited => {
            Grant::OutwaitedBoth
        }
        (true, false) if !right_blocks && me.waited >= left.waited => Grant::OutwaitedLeft,
        (false, true) if !left_blocks && me.waited >= right.waited => Grant::OutwaitedRight,
        _ => return Admission::Denied,
    };
    Admission::Granted(grant)
}
