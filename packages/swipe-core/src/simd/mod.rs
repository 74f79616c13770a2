//! SIMD score-vector abstraction (component C2).
//!
//! The swipe kernel is generic over a cell type that behaves like a small
//! vector of saturating integer lanes. Two backends implement
//! [`ScoreVector`]: [`Sse2I16`] packs 8 `int16` lanes using
//! `std::arch::x86_64` intrinsics, and [`ScalarI32`] is the single-lane
//! fallback used both on non-x86_64 targets and for the int32 overflow
//! retry pass.
//!
//! Score values are represented non-negatively: the recurrence in
//! component C5 floors every cell at zero, so a cell type built on
//! *unsigned* saturating arithmetic gets that floor for free (a
//! saturating subtraction below the representable minimum simply yields
//! zero, which is exactly `max(0, x)`). [`ScoreVector::ZERO_SCORE`] is the
//! bias applied to recover a true score from a lane value; it is zero for
//! both backends here but is kept as an associated constant so a future
//! cell type that needs headroom below zero can introduce one without
//! changing call sites.

#[cfg(target_arch = "x86_64")]
pub mod sse2;
pub mod scalar;

pub use scalar::ScalarI32;
#[cfg(target_arch = "x86_64")]
pub use sse2::Sse2I16;

/// A vector of `CHANNELS` saturating integer score lanes.
///
/// Implementors are plain-old-data wrappers copied by value; there is no
/// heap allocation and no per-call feature detection (the choice of
/// backend happens once, at compile time, via `cfg(target_arch)`).
pub trait ScoreVector: Copy + Clone + std::fmt::Debug {
  /// Number of independent DP lanes packed into one value.
  const CHANNELS: usize;

  /// Bias between a lane's internal representation and its true score:
  /// `true_score = internal + ZERO_SCORE`.
  const ZERO_SCORE: i32;

  /// The highest internal value a lane can hold before saturating.
  /// [`crate::swipe`] treats a lane whose running best reaches this value
  /// as `overflow = true` and reruns it on the scalar int32 path.
  const MAX_SCORE: i32;

  /// All lanes set to the representation of true score zero.
  fn zero() -> Self;

  /// All lanes set to the same true score.
  fn splat(true_score: i32) -> Self;

  /// One true score per lane, read from `scores` (length `CHANNELS`).
  /// Negative inputs are clamped to zero — every caller in this crate
  /// only ever constructs non-negative magnitudes this way (either a
  /// per-lane substitution score already floored, or a "zero out these
  /// lanes" reset delta).
  fn from_lanes(scores: &[i32]) -> Self;

  /// Lane-wise saturating add (never exceeds `MAX_SCORE`).
  #[must_use]
  fn adds(self, delta: Self) -> Self;

  /// Lane-wise saturating subtract (never drops below the zero floor).
  #[must_use]
  fn subs(self, delta: Self) -> Self;

  /// Lane-wise maximum.
  #[must_use]
  fn max(self, other: Self) -> Self;

  /// Writes every lane's true score into `out` (length `CHANNELS`).
  fn store(self, out: &mut [i32]);

  /// Converts one lane's internal value to a true, externally meaningful
  /// score.
  fn int_score(internal: i32) -> i32 {
    internal + Self::ZERO_SCORE
  }
}

#[cfg(test)]
mod simd_tests {
  use pretty_assertions::assert_eq;

  use super::*;

  fn exercises_basic_algebra<V: ScoreVector>() {
    let zero = V::zero();
    let mut out = vec![0; V::CHANNELS];
    zero.store(&mut out);
    assert!(out.iter().all(|&s| s == V::ZERO_SCORE));

    let five = V::splat(5);
    let three = V::splat(3);
    let mut sum = vec![0; V::CHANNELS];
    five.adds(three).store(&mut sum);
    assert!(sum.iter().all(|&s| s == 8));

    let mut diff = vec![0; V::CHANNELS];
    three.subs(five).store(&mut diff);
    assert!(diff.iter().all(|&s| s == 0), "saturating subtract must floor at zero");

    let mut maxed = vec![0; V::CHANNELS];
    five.max(three).store(&mut maxed);
    assert!(maxed.iter().all(|&s| s == 5));

    let mut per_lane = vec![0; V::CHANNELS];
    let lanes: Vec<i32> = (0..V::CHANNELS as i32).collect();
    V::from_lanes(&lanes).store(&mut per_lane);
    assert_eq!(per_lane, lanes);
  }

  #[test]
  fn scalar_backend_behaves() {
    exercises_basic_algebra::<ScalarI32>();
  }

  #[cfg(target_arch = "x86_64")]
  #[test]
  fn sse2_backend_behaves() {
    exercises_basic_algebra::<Sse2I16>();
  }
}
