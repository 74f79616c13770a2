//! Seeded pre-filter (spec section 4.3): ungapped extension, primary-hit
//! collision filter, optional banded Smith-Waterman fallback, hit
//! emission. Grounded in `search_query_offset`/`stage2_search` from
//! `reference.cpp`'s sibling `search/stage2.cpp`.

use std::collections::{HashMap, HashSet};

use itertools::Itertools;

use crate::config::AlignParams;
use crate::letter::Letter;
use crate::scoring::ScoringMatrix;
use crate::sequence::Sequence;
use crate::stats::{Counter, Statistics};

/// One stage-1 seed match against a single subject sequence: the subject
/// position the seed landed on, and the id of the seed shape that found
/// it (seeds of different lengths can land on the same diagonal and
/// should not be deduplicated against each other).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stage1Hit {
  pub subject_pos: usize,
  pub seed_id: usize,
}

/// A hit that survived the pre-filter and is ready for the caller's
/// trace-point buffer, equivalent to the `(q_num, s_pos, seed_offset)`
/// triple pushed by `search_query_offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TracePoint {
  pub query_id: usize,
  pub subject_pos: usize,
  pub seed_offset: usize,
}

/// Walks outward from `(q_start, s_start)` in lock-step along direction
/// `dir` (`+1` rightward, `-1` leftward), accumulating score until an
/// X-drop, a sentinel, or a masked letter ends the extension. Returns the
/// best score reached and the length that achieved it — positions past
/// `best_len` never improve on the maximum and are not part of the
/// reported extension (mirrors `stage2_ungapped`'s drop-off loop).
fn extend_one_way(query: &[Letter], subject: &[Letter], q_start: isize, s_start: isize, dir: isize, matrix: &ScoringMatrix, drop_off: i32) -> (i32, usize) {
  let mut qi = q_start;
  let mut si = s_start;
  let mut score = 0i32;
  let mut best_score = 0i32;
  let mut best_len = 0usize;
  let mut len = 0usize;
  loop {
    if qi < 0 || si < 0 {
      break;
    }
    let (Some(&q), Some(&s)) = (query.get(qi as usize), subject.get(si as usize)) else { break };
    if q.is_delimiter() || s.is_delimiter() || q.is_mask() || s.is_mask() {
      break;
    }
    score += matrix.score(q, s);
    len += 1;
    if score > best_score {
      best_score = score;
      best_len = len;
    } else if best_score - score > drop_off {
      break;
    }
    qi += dir;
    si += dir;
  }
  (best_score, best_len)
}

/// Ungapped stage-2 extension around one seed. Returns `(score, delta,
/// len)`: the summed score of the best left+right extension, how far it
/// reaches left of the seed, and its total length — the inputs to the
/// collision filter's hash key.
#[must_use]
pub fn stage2_ungapped(query: &Sequence, subject: &Sequence, query_pos: usize, subject_pos: usize, matrix: &ScoringMatrix, drop_off: i32) -> (i32, usize, usize) {
  let q = query.data();
  let s = subject.data();

  let (right_score, right_len) = extend_one_way(q, s, query_pos as isize, subject_pos as isize, 1, matrix, drop_off);
  let (left_score, left_len) = if query_pos == 0 || subject_pos == 0 {
    (0, 0)
  } else {
    extend_one_way(q, s, query_pos as isize - 1, subject_pos as isize - 1, -1, matrix, drop_off)
  };

  (right_score + left_score, left_len, left_len + right_len)
}

/// Hash key for the primary-hit collision filter: `(query-δ, subject-δ,
/// δ, seed_id, len)`. Two seeds whose ungapped extension covers the same
/// window on the same diagonal hash identically, so only the first one
/// observed is primary.
pub type CollisionKey = (isize, isize, isize, usize, usize);

#[must_use]
pub fn collision_key(query_pos: usize, subject_pos: usize, delta: usize, seed_id: usize, len: usize) -> CollisionKey {
  (query_pos as isize - delta as isize, subject_pos as isize - delta as isize, delta as isize, seed_id, len)
}

/// Pure with respect to `(query_pos, subject_pos, delta, seed_id, len)`:
/// given the same inputs and the same prior history recorded in `seen`,
/// always returns the same answer. `seen` is the only state, confined to
/// one pre-filter pass (spec section 4.3: "state is confined to the
/// statistics counters and the local collection of subjects").
pub fn is_primary(seen: &mut HashSet<CollisionKey>, query_pos: usize, subject_pos: usize, delta: usize, seed_id: usize, len: usize) -> bool {
  seen.insert(collision_key(query_pos, subject_pos, delta, seed_id, len))
}

/// Fixed-window banded Smith-Waterman fallback used when SIMD gapped
/// extension is unavailable (spec section 4.3, step 3). Affine gaps,
/// full quadratic DP over a small window centred on the seed — simplicity
/// over throughput, since this path only runs on the scalar build.
#[must_use]
pub fn banded_sw_fallback(query: &Sequence, subject: &Sequence, query_pos: usize, subject_pos: usize, matrix: &ScoringMatrix, params: &AlignParams) -> i32 {
  let q = query.data();
  let s = subject.data();
  let anchor = i64::from(params.seed_anchor);
  let half = i64::from(params.hit_band);

  let q_start = (query_pos as i64 - anchor).max(0) as usize;
  let q_end = ((query_pos as i64 + half) as usize).min(q.len());
  let s_start = (subject_pos as i64 - anchor).max(0) as usize;
  let s_end = ((subject_pos as i64 + half) as usize).min(s.len());
  if q_start >= q_end || s_start >= s_end {
    return 0;
  }
  let qw = &q[q_start..q_end];
  let sw = &s[s_start..s_end];

  let n = qw.len();
  let m = sw.len();
  let gap_open = params.gap_open;
  let gap_extend = params.gap_extend;

  let mut h = vec![0i32; m + 1];
  let mut e = vec![0i32; m + 1];
  let mut f_prev_row = vec![0i32; m + 1];
  let mut best = 0i32;

  for i in 1..=n {
    let mut h_diag_prev = h[0];
    let mut f_row = vec![0i32; m + 1];
    for j in 1..=m {
      let sub = matrix.score(qw[i - 1], sw[j - 1]);
      e[j] = (e[j] - gap_extend).max(h[j] - gap_open - gap_extend).max(0);
      f_row[j] = (f_prev_row[j] - gap_extend).max(h[j] - gap_open - gap_extend).max(0);
      let diag = h_diag_prev + sub;
      h_diag_prev = h[j];
      h[j] = 0.max(diag).max(e[j]).max(f_row[j]);
      best = best.max(h[j]);
    }
    f_prev_row = f_row;
  }
  best
}

/// Runs the full pre-filter over every stage-1 hit for one query offset
/// against one subject, pushing survivors into `out` (spec section 4.3,
/// steps 1-4). `simd_available` selects whether step 3's gapped fallback
/// runs at all: when SIMD is available the hit is simply forwarded to the
/// downstream lane-packed kernel with no scalar re-score.
pub fn search_query_offset(
  query_id: usize,
  query: &Sequence,
  query_pos: usize,
  subject: &Sequence,
  hits: &[Stage1Hit],
  matrix: &ScoringMatrix,
  params: &AlignParams,
  simd_available: bool,
  stats: &mut Statistics,
  seen: &mut HashSet<CollisionKey>,
  out: &mut Vec<TracePoint>,
) {
  for hit in hits {
    let (score, delta, len) = stage2_ungapped(query, subject, query_pos, hit.subject_pos, matrix, params.drop_off);
    if score < params.min_ungapped_raw_score {
      continue;
    }
    stats.inc(Counter::TentativeMatches2);

    if !is_primary(seen, query_pos, hit.subject_pos, delta, hit.seed_id, len) {
      continue;
    }
    stats.inc(Counter::TentativeMatches3);

    let mut final_score = score;
    if !simd_available && score < params.min_hit_raw_score {
      final_score = banded_sw_fallback(query, subject, query_pos, hit.subject_pos, matrix, params);
    }
    if !simd_available && final_score < params.min_hit_raw_score {
      continue;
    }
    stats.inc(Counter::TentativeMatches4);

    out.push(TracePoint { query_id, subject_pos: hit.subject_pos, seed_offset: query_pos });
  }
}

/// As [`search_query_offset`], but for seed candidates landing on more
/// than one subject at this query offset: `candidates` is an unsorted
/// `(subject_idx, Stage1Hit)` stream straight off a seed index lookup,
/// grouped here by subject (`Itertools::into_group_map`, equivalent to
/// DIAMOND's sorted-range `Map` over stage-1 hits) before each subject's
/// group runs through the ordinary single-subject pre-filter. `seen`
/// tracks collision-filter state per subject across repeated calls at
/// different query offsets.
#[allow(clippy::too_many_arguments)]
pub fn search_query_offset_multi(
  query_id: usize,
  query: &Sequence,
  query_pos: usize,
  subjects: &[Sequence],
  candidates: &[(usize, Stage1Hit)],
  matrix: &ScoringMatrix,
  params: &AlignParams,
  simd_available: bool,
  stats: &mut Statistics,
  seen: &mut HashMap<usize, HashSet<CollisionKey>>,
  out: &mut Vec<(usize, TracePoint)>,
) {
  let by_subject: HashMap<usize, Vec<Stage1Hit>> = candidates.iter().copied().into_group_map();
  for (subject_idx, hits) in by_subject {
    let subject = &subjects[subject_idx];
    let subject_seen = seen.entry(subject_idx).or_default();
    let mut local_out = Vec::new();
    search_query_offset(query_id, query, query_pos, subject, &hits, matrix, params, simd_available, stats, subject_seen, &mut local_out);
    out.extend(local_out.into_iter().map(|point| (subject_idx, point)));
  }
}

#[cfg(test)]
mod prefilter_tests {
  use pretty_assertions::assert_eq;

  use super::*;

  fn letters(s: &str) -> Vec<Letter> {
    s.bytes().map(Letter::from_ascii).collect()
  }

  fn matrix() -> ScoringMatrix {
    ScoringMatrix::blosum62(11, 1, 15)
  }

  #[test]
  fn ungapped_extension_scores_identical_flanks() {
    let query = Sequence::new(&letters("AAACDEFAAA")).unwrap();
    let subject = Sequence::new(&letters("GGACDEFGGG")).unwrap();
    let (score, delta, len) = stage2_ungapped(&query, &subject, 4, 4, &matrix(), 15);
    assert!(score > 0);
    assert_eq!(len, 5); // "ACDEF" matches exactly on both sides
    assert_eq!(delta, 2); // extension reaches 2 residues left of the seed
  }

  #[test]
  fn strong_exact_match_clears_the_ungapped_threshold() {
    // Spec scenario S4: a clean run of identical residues scores well
    // above the threshold, a single-residue match does not.
    let query = Sequence::new(&letters("WWWW")).unwrap();
    let subject = Sequence::new(&letters("WWWW")).unwrap();
    let (score, _, _) = stage2_ungapped(&query, &subject, 0, 0, &matrix(), 15);
    assert!(score >= 20, "four tryptophans should score >= 20, got {score}");

    let query_weak = Sequence::new(&letters("W")).unwrap();
    let subject_weak = Sequence::new(&letters("W")).unwrap();
    let (weak_score, _, _) = stage2_ungapped(&query_weak, &subject_weak, 0, 0, &matrix(), 15);
    assert!(weak_score < 20);
  }

  #[test]
  fn collision_filter_keeps_first_and_drops_duplicate() {
    let mut seen = HashSet::new();
    assert!(is_primary(&mut seen, 10, 20, 2, 0, 5));
    assert!(!is_primary(&mut seen, 10, 20, 2, 0, 5), "the same window on the same diagonal is not primary twice");
  }

  #[test]
  fn collision_filter_is_deterministic_given_the_same_history() {
    let mut seen_a = HashSet::new();
    let mut seen_b = HashSet::new();
    let first_a = is_primary(&mut seen_a, 1, 2, 0, 0, 3);
    let first_b = is_primary(&mut seen_b, 1, 2, 0, 0, 3);
    assert_eq!(first_a, first_b);
  }

  #[test]
  fn different_seed_ids_on_the_same_diagonal_are_each_primary() {
    let mut seen = HashSet::new();
    assert!(is_primary(&mut seen, 10, 20, 2, 0, 5));
    assert!(is_primary(&mut seen, 10, 20, 2, 1, 5), "a different seed shape must not be deduplicated against seed 0");
  }

  #[test]
  fn banded_sw_fallback_finds_a_positive_score_for_a_real_match() {
    let residues = "MKTAYIAKQRQISFVKSHFSRQLEERLGLIEVQAPILSRVGDGTQDNLSGAEKAVQVKVKALPDAQFEVVHSLAKWKRQTLGQHDFSAGEGLYTHMKALRPDEDRLSPLHSVYVDQWDWELVMGDRERGFGSLKSTVEAIWAGIKATEAAVSEEFGLAPFLPDQIHFVHSQELLSRYPDLDAKGRERAIAKDLGAVFLVGIGGKLSDGHRHDVRAPDYDDWSTPSELGHAGLNGDILVWNPVLEDAFELSSMGIRVDADTLKHQLALTGDEDRLELEWHQALLRGEMPQTIGGGIGQSRLTMLLLQLPHIGQVQAGVWPAAVRESVPSLL";
    let query = Sequence::new(&letters(residues)).unwrap();
    let subject = Sequence::new(&letters(residues)).unwrap();
    let params = AlignParams::default();
    let score = banded_sw_fallback(&query, &subject, 160, 160, &matrix(), &params);
    assert!(score > params.min_hit_raw_score);
  }

  #[test]
  fn search_query_offset_emits_only_primary_survivors() {
    let query = Sequence::new(&letters("AAACDEFGHIAAA")).unwrap();
    let subject = Sequence::new(&letters("GGACDEFGHIGGG")).unwrap();
    let hits = vec![Stage1Hit { subject_pos: 4, seed_id: 0 }];
    let matrix = matrix();
    let params = AlignParams { min_ungapped_raw_score: 5, min_hit_raw_score: 5, ..AlignParams::default() };
    let mut stats = Statistics::new();
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    search_query_offset(0, &query, 4, &subject, &hits, &matrix, &params, true, &mut stats, &mut seen, &mut out);
    assert_eq!(out.len(), 1);
    assert_eq!(stats.get(Counter::TentativeMatches4), 1);

    // Re-running the identical hit against the same `seen` set is no
    // longer primary, so nothing new is emitted.
    search_query_offset(0, &query, 4, &subject, &hits, &matrix, &params, true, &mut stats, &mut seen, &mut out);
    assert_eq!(out.len(), 1);
  }
}
