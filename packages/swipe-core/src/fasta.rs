//! Minimal FASTA reader.
//!
//! Spec section 1 lists FASTA parsing as an external collaborator — the
//! core only consumes an iterator of `(id, residues)` pairs. This module
//! is the thin ambient glue the CLI needs to actually drive
//! [`crate::db::build_database`] and the translated-query path end to
//! end; it is deliberately not a general FASTA toolkit (no wrapping, no
//! multi-line awareness beyond concatenation, no IUPAC validation).

use std::io::BufRead;

/// One `>id\nresidues...` record, residues concatenated across lines and
/// with surrounding whitespace stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
  pub id: String,
  pub seq: Vec<u8>,
}

/// Streams [`FastaRecord`]s out of any `BufRead`. Blank lines between
/// records are ignored; a record with no header before the first sequence
/// line is treated as an error by the caller inspecting `id.is_empty()`.
pub struct FastaReader<R> {
  lines: std::io::Lines<R>,
  pending_header: Option<String>,
}

impl<R: BufRead> FastaReader<R> {
  #[must_use]
  pub fn new(reader: R) -> Self {
    Self { lines: reader.lines(), pending_header: None }
  }
}

impl<R: BufRead> Iterator for FastaReader<R> {
  type Item = std::io::Result<FastaRecord>;

  fn next(&mut self) -> Option<Self::Item> {
    let mut id = self.pending_header.take()?;
    let mut seq = Vec::new();
    loop {
      match self.lines.next() {
        Some(Ok(line)) => {
          let line = line.trim_end();
          if let Some(header) = line.strip_prefix('>') {
            self.pending_header = Some(header.to_owned());
            return Some(Ok(FastaRecord { id: std::mem::take(&mut id), seq }));
          }
          if !line.is_empty() {
            seq.extend_from_slice(line.as_bytes());
          }
        }
        Some(Err(e)) => return Some(Err(e)),
        None => return Some(Ok(FastaRecord { id, seq })),
      }
    }
  }
}

/// Finds the first `>` header and primes a [`FastaReader`] to start
/// yielding from it, skipping any leading blank lines or stray comments.
pub fn records<R: BufRead>(mut reader: R) -> std::io::Result<FastaReader<R>> {
  let mut first_header = None;
  loop {
    let mut line = String::new();
    let n = reader.read_line(&mut line)?;
    if n == 0 {
      break;
    }
    let trimmed = line.trim_end();
    if let Some(header) = trimmed.strip_prefix('>') {
      first_header = Some(header.to_owned());
      break;
    }
  }
  Ok(FastaReader { lines: reader.lines(), pending_header: first_header })
}

#[cfg(test)]
mod fasta_tests {
  use std::io::Cursor;

  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn parses_two_single_line_records() {
    let input = b">A\nACDE\n>B\nFGHI\n".to_vec();
    let recs: Vec<FastaRecord> = records(Cursor::new(input)).unwrap().map(Result::unwrap).collect();
    assert_eq!(recs, vec![
      FastaRecord { id: "A".into(), seq: b"ACDE".to_vec() },
      FastaRecord { id: "B".into(), seq: b"FGHI".to_vec() },
    ]);
  }

  #[test]
  fn concatenates_wrapped_lines() {
    let input = b">A\nACD\nEFG\n".to_vec();
    let recs: Vec<FastaRecord> = records(Cursor::new(input)).unwrap().map(Result::unwrap).collect();
    assert_eq!(recs, vec![FastaRecord { id: "A".into(), seq: b"ACDEFG".to_vec() }]);
  }

  #[test]
  fn zero_length_record_yields_empty_seq() {
    let input = b">A\n>B\nACDE\n".to_vec();
    let recs: Vec<FastaRecord> = records(Cursor::new(input)).unwrap().map(Result::unwrap).collect();
    assert_eq!(recs[0].seq, Vec::<u8>::new());
    assert_eq!(recs[1].seq, b"ACDE".to_vec());
  }
}
