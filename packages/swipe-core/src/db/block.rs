//! In-memory working set for one pass over the database (spec section 3:
//! "Block").

use crate::sequence::SequenceSet;

/// The in-memory working set for one pass: a sequence set, the optional
/// identifiers that go with it, the mapping from this block's local index
/// back to the database's global sequence index, and whether the whole
/// database fit in one block.
#[derive(Debug)]
pub struct Block {
  pub seqs: SequenceSet,
  pub ids: Option<Vec<String>>,
  /// `block_index -> database_index`.
  pub block_to_database_id: Vec<u64>,
  /// True iff this block does not contain the entire database — i.e. a
  /// caller must keep calling `load_block` to see the rest.
  pub blocked_processing: bool,
}

impl Block {
  #[must_use]
  pub fn len(&self) -> usize {
    self.seqs.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.seqs.is_empty()
  }
}
