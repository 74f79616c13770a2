//! Banded 3-frame swipe kernel (component C5). Grounded in
//! `banded_3frame_swipe.cpp`: one query (already translated into its 3
//! reading frames for the strand under search) against up to
//! `V::CHANNELS` subjects packed into SIMD lanes, with frame-shift
//! transitions between adjacent reading frames folded into the same
//! recurrence as the ordinary diagonal/gap moves.
//!
//! The recurrence, per cell `(i, j, f)` (query residue `i`, subject
//! column `j`, frame `f`):
//!
//! ```text
//! H[i,j,f] = max(0,
//!                 H[i-1,j-1,f]   + m,
//!                 H[i-1,j-1,f-1] + m - frame_shift,   (f-1 wraps: f=2, i-=1)
//!                 H[i-1,j-1,f+1] + m - frame_shift,   (f+1 wraps: f=0, i+=1)
//!                 E[i,j,f],
//!                 F[i,j,f])
//! E[i,j,f] = max(E[i,j-1,f] - gap_extend, H[i,j-1,f] - gap_open - gap_extend)
//! F[i,j,f] = max(F[i-1,j,f] - gap_extend, H[i-1,j,f] - gap_open - gap_extend)
//! ```
//!
//! `E` (horizontal gap) persists across columns at a fixed row; `F`
//! (vertical gap) persists across rows within one column and resets each
//! new column. Per the retained (not re-centering) band behavior this
//! crate follows — see `DESIGN.md`'s Open Question 1 — `d_begin` is reset
//! to `d_end - band` once per batch, not recomputed as the diagonal
//! drifts.

use crate::dp_target::DpTarget;
use crate::hsp::{EditOp, Hsp, Range};
use crate::scoring::ScoringMatrix;
use crate::sequence::{Strand, TranslatedSequence};
use crate::simd::ScoreVector;
use crate::stats::{Counter, Statistics};
use crate::target_iterator::TargetIterator;

/// Per-query-letter substitution scores against the current subject
/// column, split into a non-negative "reward" part and a non-negative
/// "penalty" part so a signed BLOSUM score can be folded into the
/// zero-floored saturating arithmetic `ScoreVector` exposes: adding a
/// negative delta `m` is the same as `self.subs(V::from_lanes(&[-m]))`,
/// and `V::from_lanes` already clamps negative inputs to zero, so
/// building both the positive and the negated-then-clamped column gives
/// exactly the two operands a signed add needs.
struct SwipeProfile<V> {
  reward: Vec<V>,
  penalty: Vec<V>,
}

impl<V: ScoreVector> SwipeProfile<V> {
  /// Builds one row per query-letter value that can actually reach
  /// [`SwipeProfile::get`]: every real residue, plus [`crate::letter::Letter::MASK`]
  /// (a query frame that is only a single-letter placeholder — see
  /// `TranslatedSequence` callers that skip translation — still walks
  /// its one masked row through the same recurrence). `Letter::DELIMITER`
  /// never appears in a query frame's `data()` view and has no row here.
  fn build(matrix: &ScoringMatrix, subject_column: &[crate::letter::Letter]) -> Self {
    let rows = crate::letter::ALPHABET_SIZE + 2;
    let mut reward = vec![V::zero(); rows];
    let mut penalty = vec![V::zero(); rows];
    for q in 0..crate::letter::ALPHABET_SIZE {
      let query_letter = crate::letter::Letter(q as u8);
      let scores = matrix.score_profile(query_letter, subject_column);
      let pos: Vec<i32> = scores.iter().map(|&s| s.max(0)).collect();
      let neg: Vec<i32> = scores.iter().map(|&s| (-s).max(0)).collect();
      reward[q] = V::from_lanes(&pos);
      penalty[q] = V::from_lanes(&neg);
    }
    let mask_scores: Vec<i32> = subject_column.iter().map(|&s| matrix.score(crate::letter::Letter::MASK, s)).collect();
    let mask_pos: Vec<i32> = mask_scores.iter().map(|&s| s.max(0)).collect();
    let mask_neg: Vec<i32> = mask_scores.iter().map(|&s| (-s).max(0)).collect();
    reward[crate::letter::Letter::MASK.0 as usize] = V::from_lanes(&mask_pos);
    penalty[crate::letter::Letter::MASK.0 as usize] = V::from_lanes(&mask_neg);
    Self { reward, penalty }
  }

  fn get(&self, letter: crate::letter::Letter) -> (V, V) {
    let i = letter.0 as usize;
    (self.reward[i], self.penalty[i])
  }
}

/// Adds a signed substitution score to `base`, floored at zero exactly as
/// the recurrence requires.
fn add_signed<V: ScoreVector>(base: V, reward: V, penalty: V) -> V {
  base.adds(reward).subs(penalty)
}

/// One column's worth of lookback state: the previous column's `H` value
/// read at this row/frame and its two frame-shifted neighbours. In the
/// forward pass these are plain neighbouring slots in a rolling buffer
/// indexed by the flattened `(row, frame)` coordinate — stepping that
/// flat index by one automatically walks across a frame wrap into the
/// next or previous query row, which is what makes the frame-shift
/// lookups fall out of simple `beta - 1` / `beta + 1` offsets.
trait ColumnStorage<V> {
  /// Reads the previous column's value at flattened index `beta`
  /// (`None`/out-of-range reads as the implicit zero boundary).
  fn read_prev(&self, beta: i64) -> V;
  /// Writes this column's value at flattened index `beta`.
  fn write_cur(&mut self, beta: usize, value: V);
  /// Called once a column's cells are all written: makes `cur` the new
  /// `prev` for the next column.
  fn advance(&mut self);
}

/// Score-only storage: two rolling buffers, swapped each column. Used
/// when no traceback is required (the common case — most targets don't
/// end up as the best HSP for their query and never need a transcript).
struct RollingStorage<V> {
  prev: Vec<V>,
  cur: Vec<V>,
  len: usize,
}

impl<V: ScoreVector> RollingStorage<V> {
  fn new(len: usize) -> Self {
    Self { prev: vec![V::zero(); len], cur: vec![V::zero(); len], len }
  }
}

impl<V: ScoreVector> ColumnStorage<V> for RollingStorage<V> {
  fn read_prev(&self, beta: i64) -> V {
    if beta < 0 || beta as usize >= self.len { V::zero() } else { self.prev[beta as usize] }
  }

  fn write_cur(&mut self, beta: usize, value: V) {
    self.cur[beta] = value;
  }

  fn advance(&mut self) {
    std::mem::swap(&mut self.prev, &mut self.cur);
    self.cur.iter_mut().for_each(|v| *v = V::zero());
  }
}

/// Traceback storage: the entire `(columns + 1) x rows` history is kept,
/// column 0 being the implicit all-zero boundary before the first real
/// column. Column `c + 1` holds what the rolling variant would call
/// `cur` after processing logical column `c`.
struct HistoryStorage<V> {
  buf: Vec<V>,
  len: usize,
  col: usize,
}

impl<V: ScoreVector> HistoryStorage<V> {
  fn new(len: usize, cols: usize) -> Self {
    Self { buf: vec![V::zero(); len * (cols + 2)], len, col: 0 }
  }

  fn column_at(&self, logical_col: i64, beta: i64) -> V {
    if logical_col < 0 || beta < 0 || beta as usize >= self.len {
      return V::zero();
    }
    let history_col = logical_col as usize + 1;
    if history_col >= self.buf.len() / self.len {
      return V::zero();
    }
    self.buf[history_col * self.len + beta as usize]
  }
}

impl<V: ScoreVector> ColumnStorage<V> for HistoryStorage<V> {
  fn read_prev(&self, beta: i64) -> V {
    self.column_at(self.col as i64 - 1, beta)
  }

  fn write_cur(&mut self, beta: usize, value: V) {
    let base = (self.col + 1) * self.len;
    self.buf[base + beta] = value;
  }

  fn advance(&mut self) {
    self.col += 1;
  }
}

/// Result of running one banded batch: per-lane best score, the logical
/// column at which it occurred, and whether the lane saturated.
struct BatchResult {
  best: Vec<i32>,
  best_col: Vec<i64>,
  overflow: Vec<bool>,
}

/// Shared per-column cell computation, generic over the storage backend.
/// `i0_col` is the row origin for *this* column (the band's row window
/// slides by one every column).
#[allow(clippy::too_many_arguments)]
fn run_column<V: ScoreVector, S: ColumnStorage<V>>(
  storage: &mut S,
  hgap: &mut [V],
  profile: &SwipeProfile<V>,
  q: [&[crate::letter::Letter]; 3],
  qlens: [i32; 3],
  i0_col: i32,
  i0_clamped: i32,
  i1_clamped: i32,
  params_open: V,
  params_extend: V,
  frame_shift: V,
  col_best: &mut V,
) {
  let mut vgap = [V::zero(); 3];
  let mut i = i0_clamped;
  loop {
    for f in 0..3usize {
      // Frame 0 is already bounded by the caller's `i1_clamped` (derived
      // from `qlens[0]`); frames 1/2 can be shorter (a translated frame
      // one or two residues short, or a single-letter placeholder), so
      // only they need a per-row skip. Skipping just this frame, not the
      // whole row, keeps frame 0 scoring through every remaining row.
      if (f == 1 && i >= qlens[1]) || (f == 2 && i >= qlens[2]) {
        continue;
      }
      let beta = ((i - i0_col) * 3 + f as i32 + 1) as i64;
      let letter = q[f][i as usize];
      let (reward, penalty) = profile.get(letter);

      let sm3 = storage.read_prev(beta);
      let sm4 = storage.read_prev(beta - 1);
      let sm2 = storage.read_prev(beta + 1);

      let diag = add_signed(sm3, reward, penalty);
      let fwd_shift = add_signed(sm4, reward, penalty).subs(frame_shift);
      let rev_shift = add_signed(sm2, reward, penalty).subs(frame_shift);

      let old_hgap = hgap[beta as usize];
      let from_gaps = old_hgap.max(vgap[f]);
      let h = diag.max(fwd_shift).max(rev_shift).max(from_gaps);

      let new_hgap = old_hgap.subs(params_extend).max(h.subs(params_open));
      let new_vgap = vgap[f].subs(params_extend).max(h.subs(params_open));
      hgap[beta as usize] = new_hgap;
      vgap[f] = new_vgap;

      storage.write_cur(beta as usize, h);
      *col_best = col_best.max(h);
    }
    i += 1;
    if i > i1_clamped {
      break;
    }
  }
}

/// Extracts one lane's true score from a vector.
fn lane_value<V: ScoreVector>(v: V, channel: usize) -> i32 {
  let mut buf = vec![0i32; V::CHANNELS];
  v.store(&mut buf);
  buf[channel]
}

/// Runs the banded pass for one batch of up to `V::CHANNELS` targets,
/// filling in `score`/`overflow` on each [`DpTarget`] and, if `traceback`
/// is set, `tmp` with a fully reconstructed [`Hsp`]. Mirrors
/// `banded_3frame_swipe<_sv, _traceback>`: band recentring
/// (`d_begin = d_end - band`), the shared row/column sweep, and the
/// per-lane overflow flag the batch driver uses to decide which targets
/// need a scalar int32 retry.
pub fn banded_3frame_swipe<V: ScoreVector, const N: usize>(
  query: &TranslatedSequence,
  strand: Strand,
  targets: &mut [DpTarget<'_>],
  matrix: &ScoringMatrix,
  traceback: bool,
  stats: &mut Statistics,
) {
  debug_assert!(targets.len() <= N);
  if targets.is_empty() {
    return;
  }

  let frames = query.get_strand(strand);
  let q: [&[crate::letter::Letter]; 3] = [frames[0].data(), frames[1].data(), frames[2].data()];
  let qlens = [q[0].len() as i32, q[1].len() as i32, q[2].len() as i32];
  let qlen = qlens[0];

  let band = targets.iter().map(DpTarget::band_width).max().unwrap_or(0).max(1);
  let mut i0 = i32::MAX;
  let mut i1 = i32::MIN;
  for t in targets.iter_mut() {
    t.d_begin = t.d_end - band;
    let i2 = (t.d_end - 1).min(qlen - 1);
    i1 = i1.max(i2);
    i0 = i0.min(i2 + 1 - band);
  }
  let i0_orig = i0;
  let i1_orig = i1;

  let mut it: TargetIterator<'_, N> = TargetIterator::new_banded(targets, i1, qlen);
  let total_rows = (band * 3) as usize;
  let l = total_rows + 2;

  let mut hgap = vec![V::zero(); l];
  let open = V::splat(V::ZERO_SCORE + matrix.gap_open + matrix.gap_extend);
  let extend = V::splat(V::ZERO_SCORE + matrix.gap_extend);
  let frame_shift = V::splat(V::ZERO_SCORE + matrix.frame_shift);

  let mut best = vec![0i32; N];
  let mut best_col = vec![-1i64; N];
  let mut overflow = vec![false; N];

  let cols = it.cols().max(0) as usize;

  let mut rolling: Option<RollingStorage<V>> = None;
  let mut history: Option<HistoryStorage<V>> = None;
  if traceback {
    history = Some(HistoryStorage::new(l, cols));
  } else {
    rolling = Some(RollingStorage::new(l));
  }

  let mut j: i64 = 0;
  loop {
    if it.active().is_empty() {
      break;
    }
    let i0_clamped = i0.max(0);
    let i1_clamped = i1.min(qlen - 1);
    if i0_clamped > i1_clamped {
      break;
    }

    let column = it.get();
    let profile = SwipeProfile::<V>::build(matrix, &column);
    let mut col_best = V::zero();

    if let Some(storage) = rolling.as_mut() {
      run_column(storage, &mut hgap, &profile, q, qlens, i0, i0_clamped, i1_clamped, open, extend, frame_shift, &mut col_best);
      storage.advance();
    } else if let Some(storage) = history.as_mut() {
      run_column(storage, &mut hgap, &profile, q, qlens, i0, i0_clamped, i1_clamped, open, extend, frame_shift, &mut col_best);
      storage.advance();
    }

    let mut lane_scores = vec![0i32; N];
    col_best.store(&mut lane_scores);
    for &channel in it.active() {
      let score = lane_scores[channel];
      if score > best[channel] {
        best[channel] = score;
        best_col[channel] = j;
      }
      if score >= V::MAX_SCORE {
        overflow[channel] = true;
      }
    }

    // Advance every active lane by one subject column, refilling
    // exhausted ones from the queue. `init_target` looks up `channel` by
    // value in the live `active` list, so dropping several lanes in this
    // same pass (the common case for a chunk of equal-length subjects,
    // which all exhaust together) is safe to do in any order.
    let active_snapshot = it.active().to_vec();
    for &channel in &active_snapshot {
      if !it.inc(channel) {
        it.init_target(channel);
      }
    }

    i0 += 1;
    i1 += 1;
    j += 1;
  }

  // `TargetIterator::new_banded`/`init_target` fill and refill lanes
  // strictly in input order, so channel `k` always ends up holding
  // `targets[k]` by the time every lane has been assigned at least once.
  for (channel, target) in targets.iter_mut().enumerate() {
    target.score = best[channel];
    target.overflow = overflow[channel];
    if overflow[channel] {
      stats.inc(Counter::Overflows);
      continue;
    }
    if best[channel] <= 0 {
      continue;
    }
    if let Some(storage) = history.as_ref() {
      target.tmp = Some(traceback_one(storage, l, i0_orig, i1_orig, band, best_col[channel], channel, q, qlens, target.subject, matrix, strand, best[channel], target.d_end));
    } else {
      target.tmp = Some(score_only_hsp(best[channel], strand, i0_orig, best_col[channel], target.d_end, band));
    }
  }
}

/// Builds the minimal HSP a score-only pass can report: score and a
/// coarse estimate of the query range (no transcript). Mirrors the
/// `Traceback` overload DIAMOND skips for the `ScoreOnly` matrix variant.
fn score_only_hsp(score: i32, strand: Strand, i0_orig: i32, best_col: i64, d_end: i32, band: i32) -> Hsp {
  let frame = 0;
  let mut hsp = Hsp::new(score, if strand == Strand::Forward { frame } else { 3 + frame });
  let approx_row = i0_orig + best_col.clamp(0, i64::from(band)) as i32;
  let approx_col = (d_end - band).max(0) + best_col.clamp(0, i64::from(band)) as i32;
  hsp.query_range = Range { begin: approx_row.max(0) as usize, end: (approx_row + 1).max(1) as usize };
  hsp.subject_range = Range { begin: approx_col.max(0) as usize, end: (approx_col + 1).max(1) as usize };
  hsp
}

/// Walks the full history buffer backward from the cell that produced
/// `score`, preferring diagonal, then forward-shift, then reverse-shift,
/// and falling back to a gap-length scan when none of those three match
/// exactly — spec section 4.5's traceback ordering.
#[allow(clippy::too_many_arguments)]
fn traceback_one<V: ScoreVector>(
  storage: &HistoryStorage<V>,
  l: usize,
  i0_orig: i32,
  i1_orig: i32,
  band: i32,
  best_col: i64,
  channel: usize,
  q: [&[crate::letter::Letter]; 3],
  qlens: [i32; 3],
  subject: &[crate::letter::Letter],
  matrix: &ScoringMatrix,
  strand: Strand,
  score: i32,
  d_end: i32,
) -> Hsp {
  // Matches `TargetIterator::new_banded`'s own `i1 - d_end` baseline: logical
  // column 0 reads subject index `j0`, column `col` reads `j0 + col`.
  let j0 = i64::from(i1_orig) - i64::from(d_end);

  let read = |logical_col: i64, i: i32, frame: i32| -> i32 {
    if i < 0 || logical_col < 0 {
      return 0;
    }
    let i0_col = i0_orig + logical_col as i32;
    let beta = (i - i0_col) as i64 * 3 + i64::from(frame) + 1;
    lane_value(storage.column_at(logical_col, beta), channel)
  };

  // Find (row, frame) within `best_col`'s column achieving `score`.
  let i0_col = i0_orig + best_col as i32;
  let mut found = None;
  for beta_row in 0..=((band * 3) as i64) {
    let i = i0_col + (beta_row / 3) as i32;
    let frame = (beta_row % 3) as i32;
    if i < 0 || i >= qlens[0] {
      continue;
    }
    if (frame == 1 && i >= qlens[1]) || (frame == 2 && i >= qlens[2]) {
      continue;
    }
    if read(best_col, i, frame) == score {
      found = Some((i, frame));
      break;
    }
  }
  let (mut i, mut frame) = found.unwrap_or((i0_col, 0));
  let mut col = best_col;
  let query_end = i as usize + 1;
  let subject_end = (j0 + col) as usize + 1;

  let mut hsp = Hsp::new(score, if strand == Strand::Forward { frame } else { 3 + frame });
  let mut cur_score = score;

  loop {
    if cur_score <= 0 || col <= 0 || i <= 0 {
      break;
    }
    let subject_pos = (j0 + col - 1).max(0) as usize;
    let m = matrix.score(q[frame as usize][i as usize - 1], subject.get(subject_pos).copied().unwrap_or(crate::letter::Letter::MASK));

    let diag = read(col - 1, i - 1, frame);
    if diag + m == cur_score {
      hsp.push_match(m > 0);
      cur_score = diag;
      i -= 1;
      col -= 1;
      continue;
    }

    let (fwd_i, fwd_frame) = if frame == 0 { (i - 2, 2) } else { (i - 1, frame - 1) };
    let fwd = read(col - 1, fwd_i, fwd_frame);
    if fwd_i >= 0 && fwd + m - matrix.frame_shift == cur_score {
      hsp.push_match(m > 0);
      hsp.push_frame_shift(true);
      cur_score = fwd;
      i = fwd_i;
      frame = fwd_frame;
      col -= 1;
      continue;
    }

    let (rev_i, rev_frame) = if frame == 2 { (i, 0) } else { (i - 1, frame + 1) };
    let rev = read(col - 1, rev_i, rev_frame);
    if rev + m - matrix.frame_shift == cur_score {
      hsp.push_match(m > 0);
      hsp.push_frame_shift(false);
      cur_score = rev;
      i = rev_i;
      frame = rev_frame;
      col -= 1;
      continue;
    }

    // Gap walk: scan horizontal (subject-only) then vertical
    // (query-only) predecessors for the first length `k` whose affine
    // cost exactly accounts for the score drop.
    let max_k = band.max(1) as i64;
    let mut matched = false;
    for k in 1..=max_k.min(col) {
      let h_pred = read(col - k, i, frame);
      if h_pred - matrix.gap_open - matrix.gap_extend * k as i32 == cur_score {
        hsp.push_gap(EditOp::Deletion, k as usize);
        cur_score = h_pred;
        col -= k;
        matched = true;
        break;
      }
    }
    if matched {
      continue;
    }
    let max_kv = i64::from(i) + 1;
    for k in 1..=max_kv.min(i64::from(band * 3)) {
      let v_pred = read(col, i - k as i32, frame);
      if v_pred - matrix.gap_open - matrix.gap_extend * k as i32 == cur_score {
        hsp.push_gap(EditOp::Insertion, k as usize);
        cur_score = v_pred;
        i -= k as i32;
        matched = true;
        break;
      }
    }
    if !matched {
      // No exact predecessor found (can happen at the band's clipped
      // edge); stop the walk here rather than loop forever.
      break;
    }
  }

  hsp.finish_transcript();
  hsp.query_range = Range { begin: i.max(0) as usize, end: query_end };
  hsp.subject_range = Range { begin: (j0 + col).max(0) as usize, end: subject_end };
  hsp
}

#[cfg(test)]
mod swipe_tests {
  use pretty_assertions::assert_eq;

  use super::*;
  use crate::letter::Letter;
  use crate::sequence::Sequence;
  use crate::simd::ScalarI32;

  fn letters(s: &str) -> Vec<Letter> {
    s.bytes().map(Letter::from_ascii).collect()
  }

  fn translated_forward(residues: &str) -> TranslatedSequence {
    let seq = Sequence::new(&letters(residues)).unwrap();
    let placeholder = Sequence::new(&[Letter::MASK]).unwrap();
    TranslatedSequence::new(residues.len(), [seq, placeholder.clone(), placeholder.clone(), placeholder.clone(), placeholder.clone(), placeholder])
  }

  #[test]
  fn identical_sequences_score_highly_scenario_s1() {
    let query = translated_forward("MKTAYIAKQRQISFVKSHFSRQLEERLGLIEVQAPILSRVGDGTQDNLSGAEKAVQ");
    let subject_letters = letters("MKTAYIAKQRQISFVKSHFSRQLEERLGLIEVQAPILSRVGDGTQDNLSGAEKAVQ");
    let matrix = ScoringMatrix::blosum62(11, 1, 15);
    let mut targets = vec![DpTarget::new(&subject_letters, -3, 3, 0)];
    let mut stats = Statistics::new();
    banded_3frame_swipe::<ScalarI32, 1>(&query, Strand::Forward, &mut targets, &matrix, false, &mut stats);
    assert!(targets[0].score > 100, "an exact match of ~57 residues should score well over 100, got {}", targets[0].score);
    assert!(!targets[0].overflow);
  }

  #[test]
  fn unrelated_sequences_score_near_zero_scenario_s2() {
    let query = translated_forward("MKTAYIAKQRQISFVKSHFSRQLEERLGL");
    let subject_letters = letters("PPPPPPPPPPPPPPPPPPPPPPPPPPPPP");
    let matrix = ScoringMatrix::blosum62(11, 1, 15);
    let mut targets = vec![DpTarget::new(&subject_letters, -3, 3, 0)];
    let mut stats = Statistics::new();
    banded_3frame_swipe::<ScalarI32, 1>(&query, Strand::Forward, &mut targets, &matrix, false, &mut stats);
    assert!(targets[0].score < 30);
  }

  #[test]
  fn traceback_reproduces_the_reported_score() {
    let query = translated_forward("MKTAYIAKQRQISFVKSHFSRQLEERLGLIEVQAPILSRVGDGTQDNLSGAEKAVQ");
    let subject_letters = letters("MKTAYIAKQRQISFVKSHFSRQLEERLGLIEVQAPILSRVGDGTQDNLSGAEKAVQ");
    let matrix = ScoringMatrix::blosum62(11, 1, 15);
    let mut targets = vec![DpTarget::new(&subject_letters, -3, 3, 0)];
    let mut stats = Statistics::new();
    banded_3frame_swipe::<ScalarI32, 1>(&query, Strand::Forward, &mut targets, &matrix, true, &mut stats);
    let hsp = targets[0].tmp.as_ref().expect("a positive-score target should produce an HSP");
    assert_eq!(hsp.score, targets[0].score);
    let (matches, mismatches, _, _, _) = hsp.transcript_op_counts();
    assert!(matches + mismatches > 0, "an HSP from a real match should have a non-empty transcript");
    assert!(matches > mismatches, "an identical-sequence alignment should be mostly matches");
  }

  #[test]
  fn multiple_targets_packed_into_one_batch_get_independent_scores() {
    let query = translated_forward("MKTAYIAKQRQISFVKSHFSRQLEERLGL");
    let strong = letters("MKTAYIAKQRQISFVKSHFSRQLEERLGL");
    let weak = letters("PPPPPPPPPPPPPPPPPPPPPPPPPPPPP");
    let matrix = ScoringMatrix::blosum62(11, 1, 15);
    let mut targets = vec![DpTarget::new(&strong, -3, 3, 0), DpTarget::new(&weak, -3, 3, 1)];
    let mut stats = Statistics::new();
    banded_3frame_swipe::<ScalarI32, 2>(&query, Strand::Forward, &mut targets, &matrix, false, &mut stats);
    assert!(targets[0].score > targets[1].score);
  }
}
