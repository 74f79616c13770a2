//! Running 128-bit content hash (spec section 6: "Hash").
//!
//! The `murmurhash3` crate hashes one buffer at a time; it has no
//! incremental/streaming API. [`RunningHash`] folds successive buffers
//! into one 128-bit state by feeding the low 32 bits of the previous
//! state back in as the next call's seed and XOR-combining the results —
//! deterministic across runs (spec property 2) even though it isn't
//! bit-identical to a single-shot hash over the concatenation.

use murmurhash3::murmurhash3_x64_128;

#[derive(Debug, Clone, Copy, Default)]
pub struct RunningHash {
  state: (u64, u64),
}

impl RunningHash {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  pub fn update(&mut self, data: &[u8]) {
    let seed = self.state.0;
    let h = murmurhash3_x64_128(data, seed);
    self.state = (self.state.0 ^ h.0, self.state.1 ^ h.1);
  }

  #[must_use]
  pub fn finish(self) -> [u8; 16] {
    let mut out = [0u8; 16];
    out[0..8].copy_from_slice(&self.state.0.to_le_bytes());
    out[8..16].copy_from_slice(&self.state.1.to_le_bytes());
    out
  }
}

/// Renders a 128-bit hash as 32 lowercase hex characters, per spec
/// section 6.
#[must_use]
pub fn hex_hash(hash: &[u8; 16]) -> String {
  hash.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod murmur_tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn same_input_hashes_identically() {
    let mut a = RunningHash::new();
    a.update(b"ACDEFG");
    a.update(b"seq-a");
    let mut b = RunningHash::new();
    b.update(b"ACDEFG");
    b.update(b"seq-a");
    assert_eq!(a.finish(), b.finish());
  }

  #[test]
  fn different_input_order_differs() {
    let mut a = RunningHash::new();
    a.update(b"ACDEFG");
    a.update(b"KLMN");
    let mut b = RunningHash::new();
    b.update(b"KLMN");
    b.update(b"ACDEFG");
    assert_ne!(a.finish(), b.finish());
  }

  #[test]
  fn hex_hash_is_32_chars() {
    let hash = RunningHash::new().finish();
    assert_eq!(hex_hash(&hash).len(), 32);
  }
}
