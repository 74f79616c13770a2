use crate::letter::Letter;

/// One strand direction of a [`TranslatedSequence`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strand {
  Forward,
  Reverse,
}

/// A contiguous span of letters bracketed by [`Letter::DELIMITER`] on
/// both ends. `data()` excludes the sentinels; `with_delim()` includes
/// them, which is what the swipe kernel's band arithmetic expects.
#[derive(Debug, Clone)]
pub struct Sequence {
  /// `[DELIMITER, residues.., DELIMITER]`
  buf: Vec<Letter>,
}

impl Sequence {
  /// Builds a sequence from raw residues. Rejects zero-length input —
  /// callers building a database must surface this as
  /// [`crate::error::Error::InputFormat`].
  pub fn new(residues: &[Letter]) -> crate::error::Result<Self> {
    if residues.is_empty() {
      return Err(crate::error::Error::InputFormat("zero-length sequence".into()));
    }
    let mut buf = Vec::with_capacity(residues.len() + 2);
    buf.push(Letter::DELIMITER);
    buf.extend_from_slice(residues);
    buf.push(Letter::DELIMITER);
    Ok(Self { buf })
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.buf.len() - 2
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  #[must_use]
  pub fn data(&self) -> &[Letter] {
    &self.buf[1..self.buf.len() - 1]
  }

  #[must_use]
  pub fn with_delim(&self) -> &[Letter] {
    &self.buf
  }
}

/// An append-only collection of [`Sequence`]s stored in one backing
/// buffer, filled in two phases: [`SequenceSet::reserve`] accumulates
/// sizes, [`SequenceSet::finish_reserve`] allocates, then
/// [`SequenceSet::fill`] writes each sequence's bytes. Once
/// `finish_reserve` has run the set is immutable in shape — only the
/// already-reserved slots may be written into.
#[derive(Debug, Default)]
pub struct SequenceSet {
  reserved_lengths: Vec<usize>,
  /// Offsets into `buf`, one past the sequences allocated so far. Empty
  /// until `finish_reserve`.
  offsets: Vec<usize>,
  buf: Vec<Letter>,
}

impl SequenceSet {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Records the length (excluding sentinels) of the next sequence to be
  /// allocated. Returns the index it will occupy.
  pub fn reserve(&mut self, len: usize) -> usize {
    self.reserved_lengths.push(len);
    self.reserved_lengths.len() - 1
  }

  /// Allocates the backing buffer for every reserved sequence. After this
  /// call, `ptr_mut(i)` gives a writable view for sequence `i`.
  pub fn finish_reserve(&mut self) {
    let total: usize = self.reserved_lengths.iter().map(|&len| len + 2).sum();
    self.buf = vec![Letter::DELIMITER; total];
    self.offsets = Vec::with_capacity(self.reserved_lengths.len() + 1);
    let mut cursor = 0;
    for &len in &self.reserved_lengths {
      self.offsets.push(cursor);
      cursor += len + 2;
    }
    self.offsets.push(cursor);
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.reserved_lengths.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.reserved_lengths.is_empty()
  }

  /// Writable view (sentinels included) for sequence `i`. Callers write
  /// sentinel letters themselves at the two ends before filling the
  /// interior with residues read from the database.
  pub fn ptr_mut(&mut self, i: usize) -> &mut [Letter] {
    let start = self.offsets[i];
    let end = self.offsets[i + 1];
    &mut self.buf[start..end]
  }

  /// Read-only view (sentinels included) for sequence `i`.
  #[must_use]
  pub fn ptr(&self, i: usize) -> &[Letter] {
    let start = self.offsets[i];
    let end = self.offsets[i + 1];
    &self.buf[start..end]
  }

  #[must_use]
  pub fn seq_len(&self, i: usize) -> usize {
    self.reserved_lengths[i]
  }

  #[must_use]
  pub fn data(&self, i: usize) -> &[Letter] {
    let view = self.ptr(i);
    &view[1..view.len() - 1]
  }
}

/// The six reading frames of one DNA source sequence: three per strand,
/// offset 0, 1, 2 from the start of that strand.
#[derive(Debug)]
pub struct TranslatedSequence {
  source_len: usize,
  frames: [Sequence; 6],
}

impl TranslatedSequence {
  #[must_use]
  pub fn new(source_len: usize, frames: [Sequence; 6]) -> Self {
    Self { source_len, frames }
  }

  #[must_use]
  pub fn source_len(&self) -> usize {
    self.source_len
  }

  /// The three `Sequence` views for one strand: frames `0,1,2` forward,
  /// `3,4,5` reverse.
  #[must_use]
  pub fn get_strand(&self, strand: Strand) -> [&Sequence; 3] {
    match strand {
      Strand::Forward => [&self.frames[0], &self.frames[1], &self.frames[2]],
      Strand::Reverse => [&self.frames[3], &self.frames[4], &self.frames[5]],
    }
  }
}

#[cfg(test)]
mod sequence_tests {
  use pretty_assertions::assert_eq;

  use super::*;

  fn letters(s: &str) -> Vec<Letter> {
    s.bytes().map(Letter::from_ascii).collect()
  }

  #[test]
  fn zero_length_sequence_is_rejected() {
    let err = Sequence::new(&[]).unwrap_err();
    assert!(matches!(err, crate::error::Error::InputFormat(_)));
  }

  #[test]
  fn data_excludes_sentinels_with_delim_includes_them() {
    let seq = Sequence::new(&letters("ACDE")).unwrap();
    assert_eq!(seq.len(), 4);
    assert_eq!(seq.data(), letters("ACDE").as_slice());
    assert_eq!(seq.with_delim().len(), 6);
    assert!(seq.with_delim()[0].is_delimiter());
    assert!(seq.with_delim()[5].is_delimiter());
  }

  #[test]
  fn sequence_set_reserves_then_fills() {
    let mut set = SequenceSet::new();
    let i0 = set.reserve(4);
    let i1 = set.reserve(3);
    set.finish_reserve();

    set.ptr_mut(i0)[1..5].copy_from_slice(&letters("ACDE"));
    set.ptr_mut(i1)[1..4].copy_from_slice(&letters("FGH"));

    assert_eq!(set.len(), 2);
    assert_eq!(set.data(i0), letters("ACDE").as_slice());
    assert_eq!(set.data(i1), letters("FGH").as_slice());
    assert_eq!(set.seq_len(i0), 4);
  }
}
