/// One operation in an [`Hsp`]'s edit transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOp {
  Match,
  Mismatch,
  Insertion,
  Deletion,
  FrameShiftForward,
  FrameShiftReverse,
  Terminator,
}

/// Half-open `[begin, end)` range in either query or subject coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Range {
  pub begin: usize,
  pub end: usize,
}

impl Range {
  #[must_use]
  pub fn len(&self) -> usize {
    self.end - self.begin
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.begin == self.end
  }
}

/// One high-scoring segment pair: a local alignment between a query frame
/// and a subject, together with the edit transcript that reproduces it.
#[derive(Debug, Clone, Default)]
pub struct Hsp {
  pub score: i32,
  pub query_range: Range,
  pub subject_range: Range,
  pub frame: i32,
  transcript: Vec<EditOp>,
}

impl Hsp {
  #[must_use]
  pub fn new(score: i32, frame: i32) -> Self {
    Self { score, query_range: Range::default(), subject_range: Range::default(), frame, transcript: Vec::new() }
  }

  /// Appends one residue-pair op. Traceback walks backward from an HSP's
  /// endpoint, so transcripts accumulate in reverse; call
  /// [`Hsp::finish_transcript`] once traceback reaches the start cell.
  pub fn push_match(&mut self, is_match: bool) {
    self.transcript.push(if is_match { EditOp::Match } else { EditOp::Mismatch });
  }

  /// Appends `len` gap ops of one kind (horizontal = [`EditOp::Deletion`],
  /// vertical = [`EditOp::Insertion`]), mirroring the gap-walk runs found
  /// during traceback.
  pub fn push_gap(&mut self, op: EditOp, len: usize) {
    debug_assert!(matches!(op, EditOp::Insertion | EditOp::Deletion));
    self.transcript.extend(std::iter::repeat_n(op, len));
  }

  pub fn push_frame_shift(&mut self, forward: bool) {
    self.transcript.push(if forward { EditOp::FrameShiftForward } else { EditOp::FrameShiftReverse });
  }

  /// Reverses the reverse-accumulated transcript into forward order and
  /// appends the terminator op, exactly once traceback is complete.
  pub fn finish_transcript(&mut self) {
    self.transcript.reverse();
    self.transcript.push(EditOp::Terminator);
  }

  #[must_use]
  pub fn transcript(&self) -> &[EditOp] {
    &self.transcript
  }

  /// Recomputes the score implied by replaying the transcript against a
  /// scoring context over the stated ranges, for testing traceback
  /// consistency (spec property 8).
  #[must_use]
  pub fn transcript_op_counts(&self) -> (usize, usize, usize, usize, usize) {
    let mut matches = 0;
    let mut mismatches = 0;
    let mut insertions = 0;
    let mut deletions = 0;
    let mut frame_shifts = 0;
    for op in &self.transcript {
      match op {
        EditOp::Match => matches += 1,
        EditOp::Mismatch => mismatches += 1,
        EditOp::Insertion => insertions += 1,
        EditOp::Deletion => deletions += 1,
        EditOp::FrameShiftForward | EditOp::FrameShiftReverse => frame_shifts += 1,
        EditOp::Terminator => {},
      }
    }
    (matches, mismatches, insertions, deletions, frame_shifts)
  }
}

#[cfg(test)]
mod hsp_tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn transcript_accumulates_reversed_then_flips() {
    let mut hsp = Hsp::new(10, 0);
    hsp.push_match(true);
    hsp.push_gap(EditOp::Deletion, 2);
    hsp.push_match(false);
    hsp.finish_transcript();

    assert_eq!(
      hsp.transcript(),
      &[EditOp::Mismatch, EditOp::Deletion, EditOp::Deletion, EditOp::Match, EditOp::Terminator]
    );
  }

  #[test]
  fn counts_one_frame_shift() {
    let mut hsp = Hsp::new(5, 1);
    hsp.push_match(true);
    hsp.push_frame_shift(true);
    hsp.push_match(true);
    hsp.finish_transcript();
    let (matches, _, _, _, frame_shifts) = hsp.transcript_op_counts();
    assert_eq!(matches, 2);
    assert_eq!(frame_shifts, 1);
  }
}
