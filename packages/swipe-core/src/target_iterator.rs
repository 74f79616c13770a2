use crate::dp_target::DpTarget;
use crate::letter::Letter;

/// Multiplexes up to `N` [`DpTarget`]s onto SIMD lanes.
///
/// Tracks, per lane: `pos` (current column within that lane's subject,
/// in query-coordinate space so all lanes advance together column by
/// column), `target` (index into the target slice occupying the lane),
/// and `cols` (the widest projected column count across all lanes, used
/// to size the kernel's scratch buffers up front). `active` is a compact
/// list of lane indices still live; it shrinks as subjects are
/// exhausted and lanes are refilled from `next` until no targets remain.
#[derive(Debug)]
pub struct TargetIterator<'a, const N: usize> {
  pos: [i32; N],
  target: [usize; N],
  next: usize,
  n_targets: usize,
  cols: i32,
  active: Vec<usize>,
  targets: &'a [DpTarget<'a>],
}

impl<'a, const N: usize> TargetIterator<'a, N> {
  /// Initialises lanes for a banded pass starting at query column `i1`.
  /// Lane `c`'s first column corresponds to `i1 - d_end_c`, per the band
  /// layout in component C5.
  #[must_use]
  pub fn new_banded(targets: &'a [DpTarget<'a>], i1: i32, qlen: i32) -> Self {
    let n_targets = targets.len();
    let mut pos = [0i32; N];
    let mut target = [0usize; N];
    let mut active = Vec::with_capacity(N);
    let mut cols = 0;
    let mut next = 0;
    while next < N.min(n_targets) {
      let t = &targets[next];
      pos[next] = i1 - t.d_end;
      let j1 = (qlen - 1 - t.d_begin).min(t.subject.len() as i32 - 1) + 1;
      cols = cols.max(j1 - pos[next]);
      target[next] = next;
      active.push(next);
      next += 1;
    }
    Self { pos, target, next, n_targets, cols, active, targets }
  }

  #[must_use]
  pub fn cols(&self) -> i32 {
    self.cols
  }

  #[must_use]
  pub fn active(&self) -> &[usize] {
    &self.active
  }

  fn letter_at(&self, channel: usize) -> Letter {
    let p = self.pos[channel];
    if p >= 0 {
      let subject = self.targets[self.target[channel]].subject;
      subject.get(p as usize).copied().unwrap_or(Letter::MASK)
    } else {
      Letter::MASK
    }
  }

  /// Gathers the current column's letter from every active lane; lanes
  /// whose column hasn't reached the subject yet (negative `pos`, in the
  /// leading shift of a band) read as [`Letter::MASK`].
  #[must_use]
  pub fn get(&self) -> [Letter; N] {
    let mut out = [Letter::MASK; N];
    for &channel in &self.active {
      out[channel] = self.letter_at(channel);
    }
    out
  }

  /// Advances lane `channel` by one column. Returns `false` once the
  /// lane's subject is exhausted (the caller must then try
  /// [`TargetIterator::init_target`]).
  pub fn inc(&mut self, channel: usize) -> bool {
    self.pos[channel] += 1;
    (self.pos[channel] as usize) < self.targets[self.target[channel]].subject.len()
  }

  /// Replaces exhausted lane `channel` with the next queued target, if
  /// any; otherwise drops it from `active`. Returns whether a
  /// replacement was loaded.
  ///
  /// Looks `channel` up by value rather than taking its position in
  /// `active` as a parameter: a caller dropping several lanes in the
  /// same pass (the common case, since all lanes advance in lockstep and
  /// same-length subjects exhaust together) would otherwise see each
  /// `remove` shift every later index, corrupting or panicking on the
  /// next lookup.
  pub fn init_target(&mut self, channel: usize) -> bool {
    if self.next < self.n_targets {
      self.pos[channel] = 0;
      self.target[channel] = self.next;
      self.next += 1;
      true
    } else if let Some(slot) = self.active.iter().position(|&c| c == channel) {
      self.active.remove(slot);
      false
    } else {
      false
    }
  }
}

#[cfg(test)]
mod target_iterator_tests {
  use pretty_assertions::assert_eq;

  use super::*;

  fn letters(s: &str) -> Vec<Letter> {
    s.bytes().map(Letter::from_ascii).collect()
  }

  #[test]
  fn banded_init_offsets_lanes_by_band_end() {
    let subjects = [letters("ACDEFG"), letters("KLMN")];
    let targets = vec![DpTarget::new(&subjects[0], -1, 3, 0), DpTarget::new(&subjects[1], 0, 2, 1)];
    let it: TargetIterator<'_, 8> = TargetIterator::new_banded(&targets, 5, 6);
    assert_eq!(it.active(), &[0, 1]);
    assert!(it.cols() > 0);
  }

  #[test]
  fn inc_reports_exhaustion_and_init_target_drains_queue() {
    let subjects = [letters("AC")];
    let targets = vec![DpTarget::new(&subjects[0], 0, 1, 0)];
    let mut it: TargetIterator<'_, 4> = TargetIterator::new_banded(&targets, 1, 2);
    assert!(it.inc(0));
    assert!(!it.inc(0), "second advance should exhaust a 2-letter subject");
    assert!(!it.init_target(0), "no more targets queued");
    assert!(it.active().is_empty());
  }
}
