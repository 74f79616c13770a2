use crate::hsp::Hsp;
use crate::letter::Letter;

/// One subject queued for the swipe kernel: a sequence view, the
/// diagonal band to search within, and the bookkeeping the batch driver
/// needs to merge worker output back into order.
///
/// `d_begin`/`d_end` are half-open `[d_begin, d_end)` diagonal offsets in
/// query-coordinate space. Before a batch is dispatched, targets are
/// sorted stably by band width (`d_end - d_begin`) so that lanes in one
/// chunk cover similar-width bands.
#[derive(Debug, Clone)]
pub struct DpTarget<'a> {
  pub subject: &'a [Letter],
  pub d_begin: i32,
  pub d_end: i32,
  /// Position of this target in the caller-owned output ordering; the
  /// batch driver uses this to place `tmp` into the right output slot
  /// after a parallel pass, regardless of completion order.
  pub out_index: usize,
  /// Owned exclusively by the worker that processed this target until
  /// the driver's merge step moves it into the caller's sink.
  pub tmp: Option<Hsp>,
  pub score: i32,
  pub overflow: bool,
}

impl<'a> DpTarget<'a> {
  #[must_use]
  pub fn new(subject: &'a [Letter], d_begin: i32, d_end: i32, out_index: usize) -> Self {
    Self { subject, d_begin, d_end, out_index, tmp: None, score: 0, overflow: false }
  }

  #[must_use]
  pub fn band_width(&self) -> i32 {
    self.d_end - self.d_begin
  }
}

/// Stably sorts `targets` by band width, ascending, as required before a
/// batch is handed to the swipe kernel so lane-width chunks stay
/// homogeneous.
pub fn sort_by_band_width(targets: &mut [DpTarget<'_>]) {
  targets.sort_by_key(DpTarget::band_width);
}

#[cfg(test)]
mod dp_target_tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn sort_is_stable_and_ascending() {
    let subjects: Vec<Vec<Letter>> = (0..4).map(|_| vec![Letter::from_ascii(b'A')]).collect();
    let mut targets = vec![
      DpTarget::new(&subjects[0], 0, 10, 0),
      DpTarget::new(&subjects[1], 0, 4, 1),
      DpTarget::new(&subjects[2], 0, 4, 2),
      DpTarget::new(&subjects[3], 0, 7, 3),
    ];
    sort_by_band_width(&mut targets);
    let widths: Vec<i32> = targets.iter().map(DpTarget::band_width).collect();
    assert_eq!(widths, vec![4, 4, 7, 10]);
    // stability: the two width-4 targets keep their relative order
    assert_eq!(targets[0].out_index, 1);
    assert_eq!(targets[1].out_index, 2);
  }
}
