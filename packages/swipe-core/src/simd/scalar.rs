use super::ScoreVector;

/// Single-lane fallback cell type, built on plain `i32` arithmetic. Used
/// on non-x86_64 targets and as the wider-range retry path for lanes that
/// overflowed [`super::Sse2I16`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalarI32(i32);

impl ScoreVector for ScalarI32 {
  const CHANNELS: usize = 1;
  const ZERO_SCORE: i32 = 0;
  const MAX_SCORE: i32 = i32::MAX - (1 << 16);

  fn zero() -> Self {
    Self(0)
  }

  fn splat(true_score: i32) -> Self {
    Self(true_score - Self::ZERO_SCORE)
  }

  fn from_lanes(scores: &[i32]) -> Self {
    Self(scores[0].max(0) - Self::ZERO_SCORE)
  }

  fn adds(self, delta: Self) -> Self {
    Self(self.0.saturating_add(delta.0).min(Self::MAX_SCORE))
  }

  fn subs(self, delta: Self) -> Self {
    Self(self.0.saturating_sub(delta.0).max(0))
  }

  fn max(self, other: Self) -> Self {
    Self(self.0.max(other.0))
  }

  fn store(self, out: &mut [i32]) {
    out[0] = Self::int_score(self.0);
  }
}
