//! Exact-match k-mer seed index. This is CLI-only glue, not part of the
//! core engine: spec section 4.3 takes stage-1 seed hits as a given input
//! to the pre-filter and deliberately leaves seed generation out of
//! scope, so driving an end-to-end search needs *some* way to produce
//! them. A short fixed-length exact-match table is the simplest thing
//! that works, standing in for a production spaced-seed index the same
//! way `fasta.rs` in the core crate stands in for a full FASTA toolkit.

use std::collections::HashMap;

use swipe_core::db::Block;
use swipe_core::letter::Letter;

/// Maps every `seed_len`-mer found in a loaded block's sequences to the
/// `(subject index, subject position)` pairs where it occurs.
pub struct SeedIndex {
  seed_len: usize,
  table: HashMap<Vec<Letter>, Vec<(usize, usize)>>,
}

impl SeedIndex {
  #[must_use]
  pub fn build(block: &Block, seed_len: usize) -> Self {
    let mut table: HashMap<Vec<Letter>, Vec<(usize, usize)>> = HashMap::new();
    for subject_idx in 0..block.len() {
      let data = block.seqs.data(subject_idx);
      if data.len() < seed_len {
        continue;
      }
      for pos in 0..=data.len() - seed_len {
        let kmer = &data[pos..pos + seed_len];
        if kmer.iter().any(|l| l.is_mask()) {
          continue;
        }
        table.entry(kmer.to_vec()).or_default().push((subject_idx, pos));
      }
    }
    Self { seed_len, table }
  }

  #[must_use]
  pub fn seed_len(&self) -> usize {
    self.seed_len
  }

  /// Candidate `(subject index, subject position)` hits for the k-mer
  /// starting at `query_pos` in `query`. Empty once the window runs past
  /// the end of `query` or covers a masked residue.
  #[must_use]
  pub fn lookup(&self, query: &[Letter], query_pos: usize) -> &[(usize, usize)] {
    if query_pos + self.seed_len > query.len() {
      return &[];
    }
    let window = &query[query_pos..query_pos + self.seed_len];
    if window.iter().any(|l| l.is_mask()) {
      return &[];
    }
    self.table.get(window).map_or(&[], Vec::as_slice)
  }
}

#[cfg(test)]
mod seed_index_tests {
  use pretty_assertions::assert_eq;
  use swipe_core::db::build::{build_database, InputRecord};
  use swipe_core::masking::NoopMasker;
  use tempfile::tempdir;

  use super::*;

  fn letters(s: &str) -> Vec<Letter> {
    s.bytes().map(Letter::from_ascii).collect()
  }

  fn fixture_block() -> Block {
    let dir = tempdir().unwrap();
    let path = dir.path().join("db.sdb");
    let records = vec![
      Ok(InputRecord { id: "one".into(), residues: letters("ACDEFGHIKL") }),
      Ok(InputRecord { id: "two".into(), residues: letters("MNPQRSTVWY") }),
    ];
    build_database(&path, records.into_iter(), false, &NoopMasker).unwrap();
    let mut db = swipe_core::db::DatabaseFile::open(&path).unwrap();
    db.load_block(1_000, true, None).unwrap().unwrap()
  }

  #[test]
  fn finds_an_exact_seed_in_its_known_subject_and_position() {
    let block = fixture_block();
    let index = SeedIndex::build(&block, 4);
    let query = letters("ACDE");
    let hits = index.lookup(&query, 0);
    assert_eq!(hits, &[(0, 0)]);
  }

  #[test]
  fn a_seed_absent_from_the_block_returns_no_hits() {
    let block = fixture_block();
    let index = SeedIndex::build(&block, 4);
    let query = letters("ZZZZ");
    assert!(index.lookup(&query, 0).is_empty());
  }

  #[test]
  fn a_window_past_the_end_of_the_query_returns_no_hits() {
    let block = fixture_block();
    let index = SeedIndex::build(&block, 4);
    let query = letters("AC");
    assert!(index.lookup(&query, 0).is_empty());
  }
}
