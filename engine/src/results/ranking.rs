//! Best-attempt selection and comparison against the best.

use std::cmp::Ordering;

use crate::core::storage::HistoryEntry;
use crate::tasks::{Attempt, StroopAttempt};

/// Ordering keys of a stored attempt. Smaller [`rank_cmp`] wins.
pub trait Ranked: HistoryEntry {
    fn accuracy_pct(&self) -> f64;
    fn total_ms(&self) -> u64;
    /// Task bias metric (ABS or interference), reported in deltas.
    fn bias_ms(&self) -> f64;

    /// Secondary key applied between accuracy and total time, lower first.
    fn tie_break(&self) -> Option<f64> {
        None
    }
}

impl Ranked for Attempt {
    fn accuracy_pct(&self) -> f64 {
        self.accuracy_pct
    }

    fn total_ms(&self) -> u64 {
        self.total_ms
    }

    fn bias_ms(&self) -> f64 {
        self.abs_ms
    }
}

impl Ranked for StroopAttempt {
    fn accuracy_pct(&self) -> f64 {
        self.accuracy_pct
    }

    fn total_ms(&self) -> u64 {
        self.total_ms
    }

    fn bias_ms(&self) -> f64 {
        self.interference_ms as f64
    }

    fn tie_break(&self) -> Option<f64> {
        Some(self.interference_ms as f64)
    }
}

/// `Less` when `a` ranks above `b`.
pub fn rank_cmp<T: Ranked>(a: &T, b: &T) -> Ordering {
    b.accuracy_pct()
        .total_cmp(&a.accuracy_pct())
        .then_with(|| match (a.tie_break(), b.tie_break()) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            _ => Ordering::Equal,
        })
        .then_with(|| a.total_ms().cmp(&b.total_ms()))
}

/// Highest-ranked attempt; ties on every key keep the earliest entry.
pub fn pick_best<T: Ranked>(attempts: &[T]) -> Option<&T> {
    attempts.iter().reduce(|best, candidate| {
        if rank_cmp(candidate, best) == Ordering::Less {
            candidate
        } else {
            best
        }
    })
}

/// Latest attempt relative to the best one, `latest − best` per field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttemptDelta {
    pub accuracy_delta: f64,
    pub time_delta_ms: i64,
    pub bias_delta_ms: f64,
}

/// `None` when there is no history or `latest` is itself the best.
pub fn compare_to_best<T: Ranked>(latest: &T, history: &[T]) -> Option<AttemptDelta> {
    let best = pick_best(history)?;
    if best.id() == latest.id() {
        return None;
    }
    Some(AttemptDelta {
        accuracy_delta: latest.accuracy_pct() - best.accuracy_pct(),
        time_delta_ms: latest.total_ms() as i64 - best.total_ms() as i64,
        bias_delta_ms: latest.bias_ms() - best.bias_ms(),
    })
}
