//! Search statistics counters (spec section 4.3/8, scenario S4).
//!
//! Each worker thread accumulates into its own [`Statistics`] and the
//! batch driver sums thread-local values at join, mirroring the teacher's
//! convention of per-thread counters folded once at the end of a batch
//! rather than a single contended atomic.

use std::ops::AddAssign;

/// One named counter slot. Kept as an explicit enum (rather than a string
/// key) so a typo in a call site is a compile error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
  /// Seed hits whose ungapped extension met `min_ungapped_raw_score`.
  TentativeMatches2,
  /// Of those, the ones that survived the primary-hit collision filter.
  TentativeMatches3,
  /// Of those, the ones that met `min_hit_raw_score` (gapped or scalar SW)
  /// and were emitted to the trace-point buffer.
  TentativeMatches4,
  /// Swipe-kernel lanes that saturated and were retried on the int32 path.
  Overflows,
  _Count,
}

const N_COUNTERS: usize = Counter::_Count as usize;

/// A thread-local bank of counters. `Default` gives an all-zero bank for
/// each worker; [`Statistics::merge`] folds one bank into another so the
/// driver can sum every worker's counts after `join`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Statistics {
  counts: [u64; N_COUNTERS],
}

impl Statistics {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  pub fn inc(&mut self, counter: Counter) {
    self.counts[counter as usize] += 1;
  }

  #[must_use]
  pub fn get(&self, counter: Counter) -> u64 {
    self.counts[counter as usize]
  }

  pub fn merge(&mut self, other: &Statistics) {
    for (a, b) in self.counts.iter_mut().zip(other.counts.iter()) {
      *a += b;
    }
  }
}

impl AddAssign<&Statistics> for Statistics {
  fn add_assign(&mut self, rhs: &Statistics) {
    self.merge(rhs);
  }
}

#[cfg(test)]
mod stats_tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn counts_accumulate_independently() {
    let mut stats = Statistics::new();
    stats.inc(Counter::TentativeMatches2);
    stats.inc(Counter::TentativeMatches2);
    stats.inc(Counter::TentativeMatches3);
    assert_eq!(stats.get(Counter::TentativeMatches2), 2);
    assert_eq!(stats.get(Counter::TentativeMatches3), 1);
    assert_eq!(stats.get(Counter::TentativeMatches4), 0);
  }

  #[test]
  fn merge_sums_thread_local_banks() {
    let mut a = Statistics::new();
    a.inc(Counter::Overflows);
    let mut b = Statistics::new();
    b.inc(Counter::Overflows);
    b.inc(Counter::Overflows);
    a.merge(&b);
    assert_eq!(a.get(Counter::Overflows), 3);
  }
}
