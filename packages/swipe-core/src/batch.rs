//! Batch driver (component C7): turns one query's trace points for one
//! database block into the final HSPs, dispatched across a fixed thread
//! pool. Grounded in `banded_3frame_swipe_targets`/
//! `banded_3frame_swipe_worker`/the outer `banded_3frame_swipe` in
//! `banded_3frame_swipe.cpp`: stable sort by band width, chunk into
//! SIMD-width groups, an atomic cursor handing chunks to a fixed pool of
//! worker threads (not a work-stealing pool — spec section 4.7/5 call out
//! this exact mechanism), and a second scalar int32 pass over whatever
//! overflowed the first.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::dp_target::{self, DpTarget};
use crate::hsp::Hsp;
use crate::scoring::ScoringMatrix;
use crate::sequence::{Strand, TranslatedSequence};
use crate::simd::{ScalarI32, ScoreVector};
#[cfg(target_arch = "x86_64")]
use crate::simd::Sse2I16;
use crate::stats::Statistics;
use crate::swipe::banded_3frame_swipe;

/// Runs every target in `targets` through the banded 3-frame swipe
/// kernel and returns one [`Hsp`] per target that scored above zero, in
/// the caller's original order (`None` for a target whose best score was
/// zero). Targets are stably sorted by band width before dispatch so
/// lanes packed into one SIMD chunk cover similar-width bands, then
/// restored to the caller's order on the way out via `out_index`.
pub fn run_batch(query: &TranslatedSequence, strand: Strand, mut targets: Vec<DpTarget<'_>>, matrix: &ScoringMatrix, traceback: bool, threads: usize) -> (Vec<Option<Hsp>>, Statistics) {
  dp_target::sort_by_band_width(&mut targets);

  let n = targets.len();
  let mut results: Vec<Option<Hsp>> = vec![None; n];
  let mut stats = Statistics::new();
  if n == 0 {
    return (results, stats);
  }

  #[cfg(target_arch = "x86_64")]
  let (simd_stats, overflowed) = dispatch_chunks::<Sse2I16, 8>(query, strand, &mut targets, matrix, traceback, threads);
  #[cfg(not(target_arch = "x86_64"))]
  let (simd_stats, overflowed) = dispatch_chunks::<ScalarI32, 1>(query, strand, &mut targets, matrix, traceback, threads);
  stats.merge(&simd_stats);

  if !overflowed.is_empty() {
    let mut retry_targets: Vec<DpTarget<'_>> = overflowed.into_iter().map(|out_index| targets[position_of(&targets, out_index)].clone()).collect();
    let (retry_stats, _) = dispatch_chunks::<ScalarI32, 1>(query, strand, &mut retry_targets, matrix, traceback, threads);
    stats.merge(&retry_stats);
    for retried in retry_targets {
      let pos = position_of(&targets, retried.out_index);
      targets[pos].score = retried.score;
      targets[pos].overflow = retried.overflow;
      targets[pos].tmp = retried.tmp;
    }
  }

  for target in targets {
    if target.score > 0 {
      results[target.out_index] = target.tmp;
    }
  }

  (results, stats)
}

/// Finds `out_index`'s position in `targets`. `overflowed`/`retried`
/// carry `out_index` (the caller's pre-sort order), but `targets` is in
/// post-sort order, so every lookup goes through this rather than
/// treating the value as a direct position. A plain function taking
/// `targets` by parameter, not a closure capturing it, so each call's
/// borrow ends before the caller goes on to mutate `targets`.
fn position_of(targets: &[DpTarget<'_>], out_index: usize) -> usize {
  targets.iter().position(|t| t.out_index == out_index).expect("overflowed out_index must exist in targets")
}

/// Splits `targets` into `N`-sized chunks (after the caller's band-width
/// sort) and hands them out to a fixed pool of `threads.max(1)` worker
/// threads via a shared atomic cursor — the same `post_add`-style work
/// distribution as the original, not a work-stealing scheduler. Returns
/// per-thread statistics merged into one bank, and the list of
/// (pre-sort-order) indices whose lane overflowed and needs a scalar
/// retry.
///
/// `N` must equal `V::CHANNELS`: the kernel's score vectors only ever
/// read/write their first `V::CHANNELS` lanes, so a target-iterator
/// width wider than that would silently drop every lane past the first.
/// Call sites therefore spell out the literal (`Sse2I16, 8` /
/// `ScalarI32, 1`) rather than passing `V::CHANNELS` through.
fn dispatch_chunks<V: ScoreVector, const N: usize>(query: &TranslatedSequence, strand: Strand, targets: &mut [DpTarget<'_>], matrix: &ScoringMatrix, traceback: bool, threads: usize) -> (Statistics, Vec<usize>) {
  debug_assert_eq!(N, V::CHANNELS);
  let chunk_size = N;
  let n_chunks = targets.len().div_ceil(chunk_size).max(1);
  let cursor = AtomicUsize::new(0);
  let n_workers = threads.max(1).min(n_chunks);

  // Each chunk gets its own mutex slot. Contention never actually
  // happens — the atomic cursor hands each index to exactly one worker —
  // but the mutex lets every worker safely reach into a shared `Vec`
  // instead of requiring `unsafe` slice-splitting tricks.
  let slots: Vec<std::sync::Mutex<Vec<DpTarget<'_>>>> = {
    let mut remaining: &mut [DpTarget<'_>] = targets;
    let mut out = Vec::with_capacity(n_chunks);
    while !remaining.is_empty() {
      let take = chunk_size.min(remaining.len());
      let (head, tail) = remaining.split_at_mut(take);
      out.push(std::sync::Mutex::new(head.to_vec()));
      remaining = tail;
    }
    out
  };
  let slots = &slots;

  let merged_stats = std::sync::Mutex::new(Statistics::new());
  let overflowed = std::sync::Mutex::new(Vec::new());

  std::thread::scope(|scope| {
    for _ in 0..n_workers {
      scope.spawn(|| {
        let mut local_stats = Statistics::new();
        loop {
          let idx = cursor.fetch_add(1, Ordering::Relaxed);
          if idx >= slots.len() {
            break;
          }
          let mut chunk = slots[idx].lock().unwrap();
          banded_3frame_swipe::<V, N>(query, strand, &mut chunk, matrix, traceback, &mut local_stats);
          for target in chunk.iter() {
            if target.overflow {
              overflowed.lock().unwrap().push(target.out_index);
            }
          }
        }
        merged_stats.lock().unwrap().merge(&local_stats);
      });
    }
  });

  // Scatter each processed chunk's targets back into the caller's slice.
  // Chunks were cut from `targets` as contiguous, in-order runs, so a
  // running position offset (not `out_index`, which tracks the caller's
  // pre-sort order) recovers where each one belongs.
  let mut position = 0usize;
  for slot in slots {
    for target in slot.lock().unwrap().drain(..) {
      targets[position].score = target.score;
      targets[position].overflow = target.overflow;
      targets[position].tmp = target.tmp;
      position += 1;
    }
  }

  (merged_stats.into_inner().unwrap(), overflowed.into_inner().unwrap())
}

#[cfg(test)]
mod batch_tests {
  use pretty_assertions::assert_eq;

  use super::*;
  use crate::letter::Letter;
  use crate::sequence::Sequence;

  fn letters(s: &str) -> Vec<Letter> {
    s.bytes().map(Letter::from_ascii).collect()
  }

  fn translated_forward(residues: &str) -> TranslatedSequence {
    let seq = Sequence::new(&letters(residues)).unwrap();
    let placeholder = Sequence::new(&[Letter::MASK]).unwrap();
    TranslatedSequence::new(residues.len(), [seq, placeholder.clone(), placeholder.clone(), placeholder.clone(), placeholder.clone(), placeholder])
  }

  #[test]
  fn results_come_back_in_the_caller_original_order() {
    let query = translated_forward("MKTAYIAKQRQISFVKSHFSRQLEERLGL");
    let strong = letters("MKTAYIAKQRQISFVKSHFSRQLEERLGL");
    let weak = letters("PPPPPPPPPPPPPPPPPPPPPPPPPPPPP");
    let matrix = ScoringMatrix::blosum62(11, 1, 15);
    // Deliberately out of band-width order and with weak first, so the
    // internal sort-by-width has to actually reorder something.
    let targets = vec![DpTarget::new(&weak, -5, 5, 0), DpTarget::new(&strong, -3, 3, 1)];
    let (results, _stats) = run_batch(&query, Strand::Forward, targets, &matrix, true, 2);
    assert_eq!(results.len(), 2);
    let weak_score = results[0].as_ref().map_or(0, |h| h.score);
    let strong_score = results[1].as_ref().map_or(0, |h| h.score);
    assert!(strong_score > weak_score);
  }

  #[test]
  fn empty_batch_returns_no_results() {
    let query = translated_forward("MKTAYIAKQRQISFVKSHFSRQLEERLGL");
    let matrix = ScoringMatrix::blosum62(11, 1, 15);
    let (results, stats) = run_batch(&query, Strand::Forward, Vec::new(), &matrix, false, 2);
    assert!(results.is_empty());
    assert_eq!(stats.get(crate::stats::Counter::Overflows), 0);
  }

  #[test]
  fn many_targets_span_multiple_chunks_and_all_score() {
    let query = translated_forward("MKTAYIAKQRQISFVKSHFSRQLEERLGL");
    let matrix = ScoringMatrix::blosum62(11, 1, 15);
    let subjects: Vec<Vec<Letter>> = (0..20).map(|_| letters("MKTAYIAKQRQISFVKSHFSRQLEERLGL")).collect();
    let targets: Vec<DpTarget<'_>> = subjects.iter().enumerate().map(|(i, s)| DpTarget::new(s, -3, 3, i)).collect();
    let (results, _stats) = run_batch(&query, Strand::Forward, targets, &matrix, false, 4);
    assert_eq!(results.len(), 20);
    assert!(results.iter().all(|r| r.as_ref().is_some_and(|h| h.score > 100)));
  }
}
