//! Database build pass (spec section 4.6: "Build").

use std::fs::{self, File};
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

use rayon::prelude::*;

use crate::db::header::{PosRecord, ReferenceHeader, ReferenceHeader2};
use crate::db::murmur::RunningHash;
use crate::error::{Error, Result};
use crate::letter::Letter;
use crate::masking::Masker;

/// One record handed to [`build_database`]: an identifier and its residue
/// letters, already translated from ASCII.
pub struct InputRecord {
  pub id: String,
  pub residues: Vec<Letter>,
}

/// Sequences are batched before writing so the masker sees a whole batch
/// at once, mirroring `mask_seqs(*seqs, Masking::get(), false)` in
/// `reference.cpp`. 1e9 letters there; kept the same order of magnitude
/// here though it rarely matters outside of very large inputs.
const BATCH_LETTER_BUDGET: usize = 1_000_000_000;

fn write_one(out: &mut impl Write, id: &str, residues: &[Letter], offset: &mut u64, pos_array: &mut Vec<PosRecord>) -> Result<()> {
  pos_array.push(PosRecord { offset: *offset, length: residues.len() as u32 });
  out.write_all(&[0xFF])?;
  let raw: Vec<u8> = residues.iter().map(|l| l.0).collect();
  out.write_all(&raw)?;
  out.write_all(&[0xFF])?;
  out.write_all(id.as_bytes())?;
  out.write_all(&[0x00])?;
  *offset += residues.len() as u64 + id.len() as u64 + 3;
  Ok(())
}

/// Builds a database at `out_path` from `records`, applying `masker` to
/// each sequence first if `masking` is set. On any error (including a
/// zero-length sequence, spec property "InputFormat"), the partial output
/// file is removed before the error is returned.
pub fn build_database(
  out_path: &Path,
  records: impl Iterator<Item = Result<InputRecord>>,
  masking: bool,
  masker: &dyn Masker,
) -> Result<ReferenceHeader2> {
  match build_database_inner(out_path, records, masking, masker) {
    Ok(header2) => Ok(header2),
    Err(e) => {
      let _ = fs::remove_file(out_path);
      Err(e)
    }
  }
}

fn build_database_inner(
  out_path: &Path,
  mut records: impl Iterator<Item = Result<InputRecord>>,
  masking: bool,
  masker: &dyn Masker,
) -> Result<ReferenceHeader2> {
  let file = File::create(out_path)?;
  let mut out = BufWriter::new(file);

  let header = ReferenceHeader::new();
  let header2 = ReferenceHeader2::new();
  header.write(&mut out)?;
  header2.write(&mut out)?;

  let mut offset = out.stream_position()?;
  let mut pos_array = Vec::new();
  let mut hash = RunningHash::new();
  let mut letters: u64 = 0;
  let mut n_seqs: u64 = 0;

  let mut batch: Vec<InputRecord> = Vec::new();
  let mut batch_letters = 0usize;

  // Masking one sequence never depends on another, so a batch's masking
  // pass runs across threads via rayon; the write pass that follows stays
  // strictly sequential since it accumulates a running file offset and
  // content hash.
  let flush_batch = |batch: &mut Vec<InputRecord>,
                     out: &mut BufWriter<File>,
                     offset: &mut u64,
                     pos_array: &mut Vec<PosRecord>,
                     hash: &mut RunningHash,
                     letters: &mut u64,
                     n_seqs: &mut u64|
   -> Result<()> {
    for record in batch.iter() {
      if record.residues.is_empty() {
        return Err(Error::InputFormat(format!("sequence '{}' has zero length", record.id)));
      }
    }
    if masking {
      batch.par_iter_mut().for_each(|record| masker.mask(&mut record.residues));
    }
    for record in batch.drain(..) {
      let InputRecord { id, residues } = record;
      write_one(out, &id, &residues, offset, pos_array)?;
      let raw: Vec<u8> = residues.iter().map(|l| l.0).collect();
      hash.update(&raw);
      hash.update(id.as_bytes());
      *letters += residues.len() as u64;
      *n_seqs += 1;
    }
    Ok(())
  };

  for record in &mut records {
    let record = record?;
    batch_letters += record.residues.len();
    batch.push(record);
    if batch_letters >= BATCH_LETTER_BUDGET {
      flush_batch(&mut batch, &mut out, &mut offset, &mut pos_array, &mut hash, &mut letters, &mut n_seqs)?;
      batch_letters = 0;
    }
  }
  flush_batch(&mut batch, &mut out, &mut offset, &mut pos_array, &mut hash, &mut letters, &mut n_seqs)?;

  if n_seqs == 0 {
    return Err(Error::InputFormat("no sequences in input".into()));
  }

  let pos_array_offset = offset;
  pos_array.push(PosRecord { offset, length: 0 });
  for record in &pos_array {
    record.write(&mut out)?;
  }

  let mut header = ReferenceHeader::new();
  header.sequences = n_seqs;
  header.letters = letters;
  header.pos_array_offset = pos_array_offset;

  let mut header2 = ReferenceHeader2::new();
  header2.hash = hash.finish();

  out.seek(SeekFrom::Start(0))?;
  header.write(&mut out)?;
  header2.write(&mut out)?;
  out.flush()?;

  Ok(header2)
}

#[cfg(test)]
mod build_tests {
  use pretty_assertions::assert_eq;
  use tempfile::tempdir;

  use super::*;
  use crate::masking::NoopMasker;

  fn letters(s: &str) -> Vec<Letter> {
    s.bytes().map(Letter::from_ascii).collect()
  }

  #[test]
  fn builds_and_records_letter_and_sequence_counts() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("db.sdb");
    let records = vec![
      Ok(InputRecord { id: "A".into(), residues: letters("ACDE") }),
      Ok(InputRecord { id: "B".into(), residues: letters("FGHI") }),
    ];
    let header2 = build_database(&path, records.into_iter(), false, &NoopMasker).unwrap();
    assert_ne!(header2.hash, [0u8; 16]);
    assert!(path.exists());
  }

  #[test]
  fn zero_length_sequence_aborts_and_removes_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("db.sdb");
    let records = vec![Ok(InputRecord { id: "A".into(), residues: vec![] }), Ok(InputRecord { id: "B".into(), residues: letters("ACDE") })];
    let err = build_database(&path, records.into_iter(), false, &NoopMasker).unwrap_err();
    assert!(matches!(err, Error::InputFormat(_)));
    assert!(!path.exists());
  }
}
