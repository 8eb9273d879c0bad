//! Ring topology of the table.
//!
//! Philosophers sit in a circle and are numbered from `0` to `n - 1`.
//! Every index the monitor touches goes through these helpers so the
//! 0-based convention is applied in exactly one place.

/// Identity of a philosopher, in `[0, n)`.
pub type AgentId = usize;

/// Returns the neighbor sitting before `id` on a ring of `n` seats.
///
/// # Example
///
/// ```rust
/// use symposium_monitor::left_of;
///
/// assert_eq!(left_of(0, 5), 4);
/// assert_eq!(left_of(3, 5), 2);
/// ```
#[inline]
pub fn left_of(id: AgentId, n: usize) -> AgentId {
    debug_assert!(n >= 1 && id < n, "agent {id} outside ring of {n}");
    (id + n - 1) % n
}

/// Returns the neighbor sitting after `id` on a ring of `n` seats.
///
/// # Example
///
/// ```rust
/// use symposium_monitor::right_of;
///
/// assert_eq!(right_of(4, 5), 0);
/// assert_eq!(right_of(1, 5), 2);
/// ```
#[inline]
pub fn right_of(id: AgentId, n: usize) -> AgentId {
    debug_assert!(n >= 1 && id < n, "agent {id} outside ring of {n}");
    (id + 1) % n
}

/// Returns `(left, right)` neighbors of `id`.
#[inline]
pub fn neighbors(id: AgentId, n: usize) -> (AgentId, AgentId) {
    (left_of(id, n), right_of(id, n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_seat_wraps_to_last() {
        assert_eq!(left_of(0, 5), 4);
        assert_eq!(right_of(0, 5), 1);
    }

    #[test]
    fn test_last_seat_wraps_to_first() {
        assert_eq!(left_of(4, 5), 3);
        assert_eq!(right_of(4, 5), 0);
    }

    #[test]
    fn test_neighbors_stay_in_range() {
        for n in 1..=8 {
            for id in 0..n {
                let (left, right) = neighbors(id, n);
                assert!(left < n, "left of {id} on {n} is {left}");
                assert!(right < n, "right of {id} on {n} is {right}");
                assert_eq!(right_of(left, n), id);
                assert_eq!(left_of(right, n), id);
            }
        }
    }

    #[test]
    fn test_single_seat_is_its_own_neighbor() {
        assert_eq!(neighbors(0, 1), (0, 0));
    }

    #[test]
    fn test_two_seats_share_both_sides() {
        assert_eq!(neighbors(0, 2), (1, 1));
        assert_eq!(neighbors(1, 2), (0, 0));
    }
}
