//! 8-lane `int16` cell type built on SSE2 intrinsics.
//!
//! SSE2 is part of the x86-64 baseline, so unlike a feature such as AVX2
//! there is no runtime `is_x86_feature_detected!` gate here: every x86_64
//! target has it, and the backend is selected once at compile time via
//! `cfg(target_arch = "x86_64")` in [`super`].

use std::arch::x86_64::{__m128i, _mm_adds_epi16, _mm_loadu_si128, _mm_max_epi16, _mm_setzero_si128, _mm_set1_epi16, _mm_storeu_si128, _mm_subs_epu16};

use super::ScoreVector;

/// Eight `int16` score lanes, represented as a non-negative unsigned
/// value in each lane so that saturating subtraction implements the
/// zero floor of the local-alignment recurrence directly.
#[derive(Clone, Copy)]
pub struct Sse2I16(__m128i);

impl std::fmt::Debug for Sse2I16 {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let mut lanes = [0i32; 8];
    self.store(&mut lanes);
    write!(f, "Sse2I16({lanes:?})")
  }
}

impl ScoreVector for Sse2I16 {
  const CHANNELS: usize = 8;
  const ZERO_SCORE: i32 = 0;
  // One clear step below the signed saturation point (`i16::MAX` =
  // 32767) that `adds` actually saturates at, so a lane that reaches it
  // is still observably `>= MAX_SCORE` after saturating.
  const MAX_SCORE: i32 = i16::MAX as i32 - 1;

  fn zero() -> Self {
    // SAFETY: SSE2 is guaranteed present on every x86_64 target.
    unsafe { Self(_mm_setzero_si128()) }
  }

  fn splat(true_score: i32) -> Self {
    let biased = (true_score - Self::ZERO_SCORE).clamp(0, Self::MAX_SCORE) as i16;
    // SAFETY: SSE2 is guaranteed present on every x86_64 target.
    unsafe { Self(_mm_set1_epi16(biased)) }
  }

  fn from_lanes(scores: &[i32]) -> Self {
    assert!(scores.len() >= Self::CHANNELS, "from_lanes requires {} scores", Self::CHANNELS);
    let mut lanes = [0i16; 8];
    for (l, &s) in lanes.iter_mut().zip(scores) {
      *l = s.max(0).min(Self::MAX_SCORE) as i16;
    }
    // SAFETY: `lanes` is a fully initialised 16-byte buffer; `_mm_loadu_si128`
    // tolerates unaligned sources.
    unsafe { Self(_mm_loadu_si128(lanes.as_ptr().cast::<__m128i>())) }
  }

  fn adds(self, delta: Self) -> Self {
    // SAFETY: both operands are valid `__m128i` values; `_mm_adds_epi16`
    // requires no further preconditions beyond the SSE2 feature. Signed
    // saturation (ceiling at `i16::MAX`) rather than unsigned (ceiling at
    // `u16::MAX`) is required here: every lane stays non-negative, so the
    // two interpretations agree below the ceiling, but a lane that would
    // overflow must saturate at a value still `> MAX_SCORE` for the
    // overflow check in `crate::swipe` to see it. `_mm_adds_epu16` clamps
    // at 65535, which reinterpreted as `i16` wraps negative and hides the
    // saturated lane from `max`/`store`.
    unsafe { Self(_mm_adds_epi16(self.0, delta.0)) }
  }

  fn subs(self, delta: Self) -> Self {
    // SAFETY: see `adds`; `_mm_subs_epu16` saturates at zero rather than
    // wrapping, which is exactly the floor the DP recurrence needs.
    unsafe { Self(_mm_subs_epu16(self.0, delta.0)) }
  }

  fn max(self, other: Self) -> Self {
    // SAFETY: see `adds`. Values never exceed `i16::MAX`, so signed max
    // over the biased unsigned representation matches unsigned max.
    unsafe { Self(_mm_max_epi16(self.0, other.0)) }
  }

  fn store(self, out: &mut [i32]) {
    assert!(out.len() >= Self::CHANNELS, "store buffer must hold {} lanes", Self::CHANNELS);
    let mut lanes = [0i16; 8];
    // SAFETY: `lanes` is a correctly sized, 16-byte-aligned-or-not buffer;
    // `_mm_storeu_si128` tolerates unaligned destinations.
    unsafe {
      _mm_storeu_si128(lanes.as_mut_ptr().cast::<__m128i>(), self.0);
    }
    for (o, l) in out.iter_mut().zip(lanes) {
      *o = Self::int_score(i32::from(l));
    }
  }
}

#[cfg(test)]
mod sse2_tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn saturates_at_max_score() {
    let near_max = Sse2I16::splat(Sse2I16::MAX_SCORE);
    let mut lanes = [0; 8];
    near_max.adds(Sse2I16::splat(10_000)).store(&mut lanes);
    assert!(lanes.iter().all(|&s| s >= Sse2I16::MAX_SCORE));
  }

  #[test]
  fn lane_count_matches_register_width() {
    assert_eq!(Sse2I16::CHANNELS, 8);
  }
}

