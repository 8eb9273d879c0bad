//! # Dining Monitor
//!
//! The single synchronization point shared by every philosopher thread.
//!
//! All per-philosopher state lives in one table behind one mutex, so the
//! admission check always sees a consistent view of a philosopher and both
//! of its neighbors. Each philosopher blocks on its own condition variable,
//! which lets a release wake exactly the neighbor it admitted. The talking
//! turn has a separate shared condition variable.
//!
//! ```text
//!            ┌──────────────── Mutex<Table> ────────────────┐
//!  acquire ─▶│ states[] │ waited[] │ talker │ interrupted[]  │◀─ release
//!            └──────────────────────────────────────────────┘
//!                 │ notify_one(seats[t])       │ notify_one(talk)
//!                 ▼                            ▼
//!          blocked eater t              blocked talker
//! ```
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::thread;
//! use symposium_monitor::{ActivityState, Monitor};
//!
//! let monitor = Arc::new(Monitor::new(5));
//!
//! monitor.acquire_resources(2)?;
//!
//! let waiter = {
//!     let monitor = Arc::clone(&monitor);
//!     thread::spawn(move || monitor.acquire_resources(1))
//! };
//!
//! // Philosopher 1 cannot eat until 2 puts its forks down.
//! while monitor.state(1) != ActivityState::Hungry {
//!     thread::yield_now();
//! }
//! monitor.release_resources(2);
//!
//! waiter.join().unwrap()?;
//! assert_eq!(monitor.state(1), ActivityState::Eating);
//! # Ok::<(), symposium_monitor::MonitorError>(())
//! ```

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, trace, warn};

use crate::admission::{admit, Admission, Seat};
use crate::error::{MonitorError, Result};
use crate::ring::{neighbors, AgentId};
use crate::state::{ActivityState, TableSnapshot};

/// Consecutive denials after which a hungry philosopher starts starving.
pub const DEFAULT_WAITING_BOUND: u32 = 2;

/// Configuration for [`Monitor`].
///
/// # Example
///
/// ```rust
/// use symposium_monitor::{Monitor, MonitorConfig};
///
/// let config = MonitorConfig::new(7).with_waiting_bound(3);
/// let monitor = Monitor::with_config(config);
/// assert_eq!(monitor.len(), 7);
/// assert_eq!(monitor.waiting_bound(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Number of philosophers at the table.
    pub philosophers: usize,
    /// Denials before a hungry philosopher escalates to starving.
    pub waiting_bound: u32,
}

impl MonitorConfig {
    /// Creates a config for `philosophers` seats with the default waiting bound.
    #[must_use]
    pub const fn new(philosophers: usize) -> Self {
        Self {
            philosophers,
            waiting_bound: DEFAULT_WAITING_BOUND,
        }
    }

    /// Sets the waiting bound.
    #[must_use]
    pub const fn with_waiting_bound(mut self, bound: u32) -> Self {
        self.waiting_bound = bound;
        self
    }
}

/// Shared state guarded by the monitor's lock.
#[derive(Debug)]
struct Table {
    states: Vec<ActivityState>,
    waited: Vec<u32>,
    talker: Option<AgentId>,
    /// Pending interrupts, consumed by the next blocked wait.
    interrupted: Vec<bool>,
    closed: bool,
}

impl Table {
    fn new(n: usize) -> Self {
        Self {
            states: vec![ActivityState::Thinking; n],
            waited: vec![0; n],
            talker: None,
            interrupted: vec![false; n],
            closed: false,
        }
    }

    fn seat(&self, id: AgentId) -> Seat {
        Seat::new(self.states[id], self.waited[id])
    }
}

/// Starvation-aware monitor for the dining philosophers.
///
/// # Thread Safety
///
/// `Monitor` is `Sync`; share one instance between all philosopher threads
/// through an `Arc`. Every operation takes the single internal lock.
///
/// # Caller Contract
///
/// - `acquire_resources(id)` only while `id` is not eating
/// - `release_resources(id)` only while `id` is eating
/// - `release_exclusive_turn(id)` only by the current holder
///
/// Violations are programmer errors caught by debug assertions. An agent
/// id outside `[0, len)` always panics.
#[derive(Debug)]
pub struct Monitor {
    config: MonitorConfig,
    table: Mutex<Table>,
    /// One condition per philosopher; only that philosopher waits on it.
    seats: Vec<Condvar>,
    talk: Condvar,
}

impl Monitor {
    /// Creates a monitor for `philosophers` seats, all thinking.
    ///
    /// # Panics
    ///
    /// Panics if `philosophers` is zero.
    #[must_use]
    pub fn new(philosophers: usize) -> Self {
        Self::with_config(MonitorConfig::new(philosophers))
    }

    /// Creates a monitor with custom configuration.
    ///
    /// # Panics
    ///
    /// Panics if `config.philosophers` or `config.waiting_bound` is zero.
    #[must_use]
    pub fn with_config(config: MonitorConfig) -> Self {
        assert!(config.philosophers >= 1, "a table needs at least one philosopher");
        assert!(config.waiting_bound >= 1, "waiting bound must be positive");

        let n = config.philosophers;
        Self {
            config,
            table: Mutex::new(Table::new(n)),
            seats: (0..n).map(|_| Condvar::new()).collect(),
            talk: Condvar::new(),
        }
    }

    /// Number of seats at the table.
    pub fn len(&self) -> usize {
        self.config.philosophers
    }

    /// Always false; a monitor has at least one seat.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Denials before a hungry philosopher escalates to starving.
    pub fn waiting_bound(&self) -> u32 {
        self.config.waiting_bound
    }

    /// Blocks until philosopher `id` holds both forks.
    ///
    /// Marks `id` hungry and runs the admission check. If denied, the call
    /// sleeps until a neighbor's release admits it. On return `id` is
    /// eating.
    ///
    /// A philosopher re-entering after an interrupted wait keeps its
    /// starving status and wait counter.
    ///
    /// # Errors
    ///
    /// - [`MonitorError::Interrupted`] if [`interrupt`](Self::interrupt)
    ///   targeted `id` while it waited. The philosopher stays hungry.
    /// - [`MonitorError::Shutdown`] if the monitor is or becomes closed.
    pub fn acquire_resources(&self, id: AgentId) -> Result<()> {
        self.check_id(id);
        let mut table = self.lock();
        if table.closed {
            return Err(MonitorError::Shutdown);
        }
        debug_assert_ne!(
            table.states[id],
            ActivityState::Eating,
            "philosopher {id} asked for forks it already holds"
        );

        if table.states[id] == ActivityState::Thinking {
            table.states[id] = ActivityState::Hungry;
        }
        self.test(&mut table, id);

        while table.states[id] != ActivityState::Eating {
            if table.closed {
                warn!("Philosopher {} stopped waiting for forks: shutdown", id);
                return Err(MonitorError::Shutdown);
            }
            if std::mem::take(&mut table.interrupted[id]) {
                warn!("Philosopher {} interrupted while {}", id, table.states[id]);
                return Err(MonitorError::Interrupted { agent: id });
            }
            table = self.seats[id]
                .wait(table)
                .unwrap_or_else(PoisonError::into_inner);
        }
        // An interrupt that lost the race against this grant is dropped.
        table.interrupted[id] = false;
        Ok(())
    }

    /// Puts down philosopher `id`'s forks.
    ///
    /// `id` goes back to thinking, then the left and right neighbors are
    /// re-checked in that order under the same lock. Never blocks.
    pub fn release_resources(&self, id: AgentId) {
        self.check_id(id);
        let mut table = self.lock();
        debug_assert_eq!(
            table.states[id],
            ActivityState::Eating,
            "philosopher {id} released forks it does not hold"
        );
        self.put_down(&mut table, id);
    }

    /// Withdraws philosopher `id` from the table's contention.
    ///
    /// Used when an agent gives up after an interrupted wait:
    /// - waiting (`HUNGRY`/`STARVING`): back to thinking with a cleared
    ///   counter, and both neighbors are re-checked since a starving
    ///   philosopher may have been holding them back
    /// - eating (admitted after the interrupt landed): released normally
    /// - thinking: nothing to do
    pub fn abandon_resources(&self, id: AgentId) {
        self.check_id(id);
        let mut table = self.lock();
        let state = table.states[id];
        match state {
            ActivityState::Eating => self.put_down(&mut table, id),
            ActivityState::Hungry | ActivityState::Starving => {
                debug!("Philosopher {} abandons its request while {}", id, state);
                table.waited[id] = 0;
                self.put_down(&mut table, id);
            }
            ActivityState::Thinking => {}
        }
    }

    /// Blocks until philosopher `id` holds the exclusive talking turn.
    ///
    /// # Errors
    ///
    /// - [`MonitorError::Interrupted`] if [`interrupt`](Self::interrupt)
    ///   targeted `id` while it waited
    /// - [`MonitorError::Shutdown`] if the monitor is or becomes closed
    pub fn request_exclusive_turn(&self, id: AgentId) -> Result<()> {
        self.check_id(id);
        let mut table = self.lock();
        debug_assert_ne!(table.talker, Some(id), "philosopher {id} already holds the turn");

        loop {
            if table.closed {
                return Err(MonitorError::Shutdown);
            }
            if table.talker.is_none() {
                table.talker = Some(id);
                table.interrupted[id] = false;
                trace!("Philosopher {} holds the talking turn", id);
                return Ok(());
            }
            if std::mem::take(&mut table.interrupted[id]) {
                warn!("Philosopher {} interrupted while waiting to talk", id);
                return Err(MonitorError::Interrupted { agent: id });
            }
            table = self.talk.wait(table).unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Gives up the talking turn and wakes one waiting talker, if any.
    pub fn release_exclusive_turn(&self, id: AgentId) {
        self.check_id(id);
        let mut table = self.lock();
        debug_assert_eq!(
            table.talker,
            Some(id),
            "philosopher {id} released a turn it does not hold"
        );
        table.talker = None;
        trace!("Philosopher {} released the talking turn", id);
        self.talk.notify_one();
    }

    /// Interrupts philosopher `id`'s blocking wait.
    ///
    /// If `id` is not blocked, the interrupt stays pending and ends its next
    /// wait. A call that is granted, immediately or by a racing release,
    /// discards the pending interrupt instead.
    pub fn interrupt(&self, id: AgentId) {
        self.check_id(id);
        let mut table = self.lock();
        table.interrupted[id] = true;
        debug!("Interrupt raised for philosopher {}", id);
        self.seats[id].notify_all();
        self.talk.notify_all();
    }

    /// Closes the monitor.
    ///
    /// Every blocked call returns [`MonitorError::Shutdown`] and later
    /// blocking calls fail immediately. Releases keep working so agents can
    /// put down what they hold.
    pub fn shutdown(&self) {
        let mut table = self.lock();
        if table.closed {
            return;
        }
        table.closed = true;
        info!("Monitor shutting down");
        for seat in &self.seats {
            seat.notify_all();
        }
        self.talk.notify_all();
    }

    /// Returns true once [`shutdown`](Self::shutdown) has been called.
    pub fn is_shut_down(&self) -> bool {
        self.lock().closed
    }

    /// Current activity state of philosopher `id`.
    pub fn state(&self, id: AgentId) -> ActivityState {
        self.check_id(id);
        self.lock().states[id]
    }

    /// Current wait counter of philosopher `id`.
    pub fn wait_count(&self, id: AgentId) -> u32 {
        self.check_id(id);
        self.lock().waited[id]
    }

    /// Holder of the talking turn, if any.
    pub fn exclusive_holder(&self) -> Option<AgentId> {
        self.lock().talker
    }

    /// Takes a consistent copy of the whole table.
    pub fn snapshot(&self) -> TableSnapshot {
        let table = self.lock();
        TableSnapshot {
            states: table.states.clone(),
            wait_counts: table.waited.clone(),
            talker: table.talker,
        }
    }

    /// Sets `id` thinking and re-checks its left, then right, neighbor.
    fn put_down(&self, table: &mut Table, id: AgentId) {
        table.states[id] = ActivityState::Thinking;
        debug!("Philosopher {} put down its forks", id);

        let (left, right) = neighbors(id, self.len());
        self.test(table, left);
        self.test(table, right);
    }

    /// Runs the admission check for `target` and applies its outcome.
    fn test(&self, table: &mut Table, target: AgentId) -> bool {
        let (left, right) = neighbors(target, self.len());
        let outcome = admit(table.seat(left), table.seat(target), table.seat(right));
        trace!(
            "Admission check for {}: {:?} (left {} {}, right {} {})",
            target,
            outcome,
            left,
            table.states[left],
            right,
            table.states[right]
        );

        match outcome {
            Admission::Granted(grant) => {
                table.states[target] = ActivityState::Eating;
                table.waited[target] = 0;
                debug!("Philosopher {} may eat ({:?})", target, grant);
                self.seats[target].notify_one();
                true
            }
            Admission::Denied if table.states[target].is_waiting() => {
                table.waited[target] = table.waited[target].saturating_add(1);
                if table.waited[target] >= self.config.waiting_bound
                    && table.states[target] == ActivityState::Hungry
                {
                    table.states[target] = ActivityState::Starving;
                    info!(
                        "Philosopher {} is starving after {} denials",
                        target, table.waited[target]
                    );
                } else {
                    debug!(
                        "Philosopher {} denied ({} so far)",
                        target, table.waited[target]
                    );
                }
                false
            }
            Admission::Denied => false,
        }
    }

    fn check_id(&self, id: AgentId) {
        assert!(
            id < self.len(),
            "philosopher {id} is not seated at a table of {}",
            self.len()
        );
    }

    fn lock(&self) -> MutexGuard<'_, Table> {
        // Every critical section leaves the table valid, so a panic in a
        // holder does not invalidate it.
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use ActivityState::*;

    fn set(monitor: &Monitor, seats: &[(AgentId, ActivityState, u32)]) {
        let mut table = monitor.lock();
        for &(id, state, waited) in seats {
            table.states[id] = state;
            table.waited[id] = waited;
        }
    }

    fn check(monitor: &Monitor, id: AgentId) -> bool {
        let mut table = monitor.lock();
        monitor.test(&mut table, id)
    }

    #[test]
    fn test_new_table_is_all_thinking() {
        let monitor = Monitor::new(5);
        let snapshot = monitor.snapshot();
        assert_eq!(snapshot.states, vec![Thinking; 5]);
        assert_eq!(snapshot.wait_counts, vec![0; 5]);
        assert_eq!(snapshot.talker, None);
        assert!(!monitor.is_shut_down());
        assert_eq!(monitor.waiting_bound(), DEFAULT_WAITING_BOUND);
    }

    #[test]
    #[should_panic(expected = "at least one philosopher")]
    fn test_empty_table_rejected() {
        let _ = Monitor::new(0);
    }

    #[test]
    #[should_panic(expected = "not seated")]
    fn test_out_of_range_id_panics() {
        let monitor = Monitor::new(3);
        let _ = monitor.state(3);
    }

    #[test]
    fn test_uncontended_acquire_is_immediate() {
        let monitor = Monitor::new(5);
        monitor.acquire_resources(2).unwrap();
        assert_eq!(monitor.state(2), Eating);
        assert_eq!(monitor.wait_count(2), 0);
    }

    #[test]
    fn test_single_philosopher_eats_alone() {
        let monitor = Monitor::new(1);
        for _ in 0..3 {
            monitor.acquire_resources(0).unwrap();
            monitor.release_resources(0);
        }
        assert_eq!(monitor.state(0), Thinking);
        assert_eq!(monitor.wait_count(0), 0);
    }

    #[test]
    fn test_denial_counts_and_escalates() {
        let monitor = Monitor::new(5);
        set(&monitor, &[(1, Eating, 0), (0, Hungry, 0)]);

        assert!(!check(&monitor, 0));
        assert_eq!(monitor.state(0), Hungry);
        assert_eq!(monitor.wait_count(0), 1);

        assert!(!check(&monitor, 0));
        assert_eq!(monitor.state(0), Starving);
        assert_eq!(monitor.wait_count(0), 2);
    }

    #[test]
    fn test_thinking_target_is_left_alone() {
        let monitor = Monitor::new(5);
        set(&monitor, &[(1, Eating, 0)]);
        assert!(!check(&monitor, 0));
        assert_eq!(monitor.state(0), Thinking);
        assert_eq!(monitor.wait_count(0), 0);
    }

    #[test]
    fn test_starving_neighbor_denies_hungry_peer() {
        let monitor = Monitor::new(5);
        set(&monitor, &[(0, Starving, 2), (4, Hungry, 0)]);
        assert!(!check(&monitor, 4));
        assert_eq!(monitor.state(4), Hungry);
        assert_eq!(monitor.wait_count(4), 1);
    }

    #[test]
    fn test_longer_waiter_wins_starving_tie() {
        let monitor = Monitor::new(5);
        set(&monitor, &[(1, Starving, 3), (2, Starving, 4)]);
        assert!(check(&monitor, 2));
        assert_eq!(monitor.state(2), Eating);
        assert_eq!(monitor.wait_count(2), 0);

        // 1 is now next to an eater and keeps waiting.
        assert!(!check(&monitor, 1));
        assert_eq!(monitor.state(1), Starving);
        assert_eq!(monitor.wait_count(1), 4);
    }

    #[test]
    fn test_release_admits_both_separated_neighbors() {
        let monitor = Monitor::new(5);
        // 1 and 3 are both waiting on 2. Only 2's release can admit them.
        set(&monitor, &[(2, Eating, 0), (1, Hungry, 1), (3, Hungry, 1)]);
        monitor.release_resources(2);
        assert_eq!(monitor.state(1), Eating);
        assert_eq!(monitor.state(3), Eating);
        assert!(monitor.snapshot().is_mutually_exclusive());
    }

    #[test]
    fn test_release_rechecks_left_before_right() {
        // On a ring of 3 both neighbors of 2 are adjacent to each other,
        // so only the one checked first can be admitted.
        let monitor = Monitor::new(3);
        set(&monitor, &[(2, Eating, 0), (1, Hungry, 0), (0, Hungry, 0)]);
        monitor.release_resources(2);

        assert_eq!(monitor.state(2), Thinking);
        assert_eq!(monitor.state(1), Eating);
        assert_eq!(monitor.wait_count(1), 0);
        assert_eq!(monitor.state(0), Hungry);
        assert_eq!(monitor.wait_count(0), 1);
    }

    #[test]
    fn test_release_on_two_seat_ring() {
        let monitor = Monitor::new(2);
        set(&monitor, &[(0, Eating, 0), (1, Starving, 2)]);
        monitor.release_resources(0);
        assert_eq!(monitor.state(1), Eating);
        assert_eq!(monitor.state(0), Thinking);
    }

    #[test]
    fn test_abandon_waiting_request() {
        let monitor = Monitor::new(5);
        set(&monitor, &[(0, Starving, 3), (4, Hungry, 1)]);
        monitor.abandon_resources(0);
        assert_eq!(monitor.state(0), Thinking);
        assert_eq!(monitor.wait_count(0), 0);
        // 4 was held back by the starving 0 and is re-checked.
        assert_eq!(monitor.state(4), Eating);
    }

    #[test]
    fn test_abandon_after_late_grant_releases() {
        let monitor = Monitor::new(3);
        set(&monitor, &[(0, Eating, 0), (1, Hungry, 1)]);
        monitor.abandon_resources(0);
        assert_eq!(monitor.state(0), Thinking);
        assert_eq!(monitor.state(1), Eating);
    }

    #[test]
    fn test_abandon_while_thinking_is_noop() {
        let monitor = Monitor::new(3);
        monitor.abandon_resources(1);
        assert_eq!(monitor.snapshot().states, vec![Thinking; 3]);
    }

    #[test]
    fn test_exclusive_turn_uncontended() {
        let monitor = Monitor::new(3);
        monitor.request_exclusive_turn(1).unwrap();
        assert_eq!(monitor.exclusive_holder(), Some(1));
        monitor.release_exclusive_turn(1);
        assert_eq!(monitor.exclusive_holder(), None);
    }

    #[test]
    fn test_pending_interrupt_consumed_by_next_wait() {
        let monitor = Monitor::new(3);
        monitor.acquire_resources(0).unwrap();
        monitor.interrupt(1);

        let result = monitor.acquire_resources(1);
        assert_eq!(result, Err(MonitorError::Interrupted { agent: 1 }));
        assert_eq!(monitor.state(1), Hungry);
        assert_eq!(monitor.wait_count(1), 1);
    }

    #[test]
    fn test_pending_interrupt_does_not_block_free_grant() {
        let monitor = Monitor::new(3);
        monitor.interrupt(1);
        monitor.acquire_resources(1).unwrap();
        assert_eq!(monitor.state(1), Eating);
        assert!(!monitor.lock().interrupted[1]);
    }

    #[test]
    fn test_talk_grant_discards_pending_interrupt() {
        let monitor = Monitor::new(3);
        monitor.interrupt(1);
        monitor.request_exclusive_turn(1).unwrap();
        monitor.release_exclusive_turn(1);

        // The next, unrelated wait for forks is not cut short.
        monitor.acquire_resources(0).unwrap();
        let result = thread::scope(|s| {
            let waiter = s.spawn(|| monitor.acquire_resources(1));
            while monitor.state(1) != Hungry {
                thread::yield_now();
            }
            monitor.release_resources(0);
            waiter.join().unwrap()
        });
        assert_eq!(result, Ok(()));
        assert_eq!(monitor.state(1), Eating);
    }

    #[test]
    fn test_interrupt_racing_grant_is_dropped() {
        let monitor = Monitor::new(3);
        monitor.acquire_resources(0).unwrap();

        let result = thread::scope(|s| {
            let waiter = s.spawn(|| monitor.acquire_resources(1));
            while monitor.state(1) != Hungry {
                thread::yield_now();
            }
            // Interrupt and admission land in the same critical section.
            {
                let mut table = monitor.lock();
                table.interrupted[1] = true;
                monitor.put_down(&mut table, 0);
            }
            waiter.join().unwrap()
        });

        assert_eq!(result, Ok(()));
        assert_eq!(monitor.state(1), Eating);
        assert!(!monitor.lock().interrupted[1]);
    }

    #[test]
    fn test_closed_monitor_rejects_blocking_calls() {
        let monitor = Monitor::new(3);
        monitor.shutdown();
        assert!(monitor.is_shut_down());
        assert_eq!(monitor.acquire_resources(0), Err(MonitorError::Shutdown));
        assert_eq!(monitor.request_exclusive_turn(0), Err(MonitorError::Shutdown));
        assert_eq!(monitor.state(0), Thinking);
    }

    #[test]
    fn test_reentry_keeps_starving_status() {
        let monitor = Monitor::new(3);
        monitor.acquire_resources(0).unwrap();
        set(&monitor, &[(1, Starving, 2)]);
        monitor.interrupt(1);

        let result = monitor.acquire_resources(1);
        assert!(matches!(result, Err(MonitorError::Interrupted { agent: 1 })));
        assert_eq!(monitor.state(1), Starving);
        assert_eq!(monitor.wait_count(1), 3);
    }
}
