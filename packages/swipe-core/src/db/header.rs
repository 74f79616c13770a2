//! On-disk header records (spec section 6: "Database file format").
//!
//! Both headers are hand-rolled little-endian binary records rather than
//! a serde format: the file is a streaming binary blob read with plain
//! `Read`/`Write`, matching the teacher's own `std::fs::File` +
//! `BufReader`/`BufWriter` convention (no `bincode`/`serde` in the
//! dependency stack for this layer).

use std::io::{Read, Write};

use crate::error::{Error, Result};

/// Fixed at construction; chosen to be distinctive in a hex dump and
/// unrelated to any other binary format's magic bytes.
pub const MAGIC_NUMBER: u64 = 0x5350_4957_4544_4231; // "SPIWEDB1" in ASCII

pub const CURRENT_DB_VERSION: u32 = 3;
pub const MIN_DB_VERSION: u32 = 3;
pub const BUILD: u32 = 1;
pub const MIN_BUILD_REQUIRED: u32 = 1;

/// Fixed-size record at file offset 0. 40 bytes on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceHeader {
  pub magic_number: u64,
  pub db_version: u32,
  pub build: u32,
  pub sequences: u64,
  pub letters: u64,
  pub pos_array_offset: u64,
}

impl ReferenceHeader {
  pub const SIZE: usize = 8 + 4 + 4 + 8 + 8 + 8;

  #[must_use]
  pub fn new() -> Self {
    Self {
      magic_number: MAGIC_NUMBER,
      db_version: CURRENT_DB_VERSION,
      build: BUILD,
      sequences: 0,
      letters: 0,
      pos_array_offset: 0,
    }
  }

  pub fn write(&self, w: &mut impl Write) -> Result<()> {
    w.write_all(&self.magic_number.to_le_bytes())?;
    w.write_all(&self.db_version.to_le_bytes())?;
    w.write_all(&self.build.to_le_bytes())?;
    w.write_all(&self.sequences.to_le_bytes())?;
    w.write_all(&self.letters.to_le_bytes())?;
    w.write_all(&self.pos_array_offset.to_le_bytes())?;
    Ok(())
  }

  /// Reads and validates the primary header, per the invariants of spec
  /// section 3/7: magic must match, build/version must be in range, and
  /// the database must be non-empty.
  pub fn read(r: &mut impl Read) -> Result<Self> {
    let mut buf = [0u8; Self::SIZE];
    r.read_exact(&mut buf).map_err(|_| Error::DatabaseFormat("short read of primary header".into()))?;
    let magic_number = u64::from_le_bytes(buf[0..8].try_into().unwrap());
    if magic_number != MAGIC_NUMBER {
      return Err(Error::DatabaseFormat("magic number mismatch".into()));
    }
    let db_version = u32::from_le_bytes(buf[8..12].try_into().unwrap());
    let build = u32::from_le_bytes(buf[12..16].try_into().unwrap());
    let sequences = u64::from_le_bytes(buf[16..24].try_into().unwrap());
    let letters = u64::from_le_bytes(buf[24..32].try_into().unwrap());
    let pos_array_offset = u64::from_le_bytes(buf[32..40].try_into().unwrap());

    if build < MIN_BUILD_REQUIRED || db_version < MIN_DB_VERSION {
      return Err(Error::DatabaseVersion("database was built with an older, incompatible version".into()));
    }
    if db_version > CURRENT_DB_VERSION {
      return Err(Error::DatabaseVersion("database was built with a newer, incompatible version".into()));
    }
    if sequences == 0 {
      return Err(Error::DatabaseIncomplete("database building did not complete successfully".into()));
    }

    Ok(Self { magic_number, db_version, build, sequences, letters, pos_array_offset })
  }
}

impl Default for ReferenceHeader {
  fn default() -> Self {
    Self::new()
  }
}

/// Variable-length, self-describing record immediately following the
/// primary header. `taxon_*` fields are offsets/sizes reserved for the
/// taxonomy side-tables the core does not interpret (spec section 1).
/// `0` means "absent" for every offset field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceHeader2 {
  pub hash: [u8; 16],
  pub taxon_array_offset: u64,
  pub taxon_array_size: u64,
  pub taxon_nodes_offset: u64,
  pub taxon_names_offset: u64,
}

impl ReferenceHeader2 {
  /// Byte length of the known fields after `size_of_record` itself,
  /// including the trailing end marker.
  const KNOWN_LEN: u64 = 16 + 8 * 4 + 8;
  const END_MARK: u64 = 0xFFFF_FFFF_FFFF_FFFF;

  #[must_use]
  pub fn new() -> Self {
    Self { hash: [0; 16], taxon_array_offset: 0, taxon_array_size: 0, taxon_nodes_offset: 0, taxon_names_offset: 0 }
  }

  pub fn write(&self, w: &mut impl Write) -> Result<()> {
    w.write_all(&Self::KNOWN_LEN.to_le_bytes())?;
    w.write_all(&self.hash)?;
    w.write_all(&self.taxon_array_offset.to_le_bytes())?;
    w.write_all(&self.taxon_array_size.to_le_bytes())?;
    w.write_all(&self.taxon_nodes_offset.to_le_bytes())?;
    w.write_all(&self.taxon_names_offset.to_le_bytes())?;
    w.write_all(&Self::END_MARK.to_le_bytes())?;
    Ok(())
  }

  /// Reads the known fields, then skips whatever trailing bytes
  /// `size_of_record` declares beyond them — the open question in spec
  /// section 9 resolves forward-compatibility this way: unknown trailing
  /// bytes are skipped, never rejected.
  pub fn read(r: &mut impl Read) -> Result<Self> {
    let mut size_buf = [0u8; 8];
    r.read_exact(&mut size_buf).map_err(|_| Error::DatabaseFormat("short read of secondary header size".into()))?;
    let size_of_record = u64::from_le_bytes(size_buf);

    let mut hash = [0u8; 16];
    r.read_exact(&mut hash).map_err(|_| Error::DatabaseFormat("short read of database hash".into()))?;
    let mut fields = [0u8; 8 * 4];
    r.read_exact(&mut fields).map_err(|_| Error::DatabaseFormat("short read of secondary header fields".into()))?;
    let taxon_array_offset = u64::from_le_bytes(fields[0..8].try_into().unwrap());
    let taxon_array_size = u64::from_le_bytes(fields[8..16].try_into().unwrap());
    let taxon_nodes_offset = u64::from_le_bytes(fields[16..24].try_into().unwrap());
    let taxon_names_offset = u64::from_le_bytes(fields[24..32].try_into().unwrap());

    let known_so_far = 16 + 8 * 4; // hash + four offsets, not counting size_of_record itself
    if size_of_record > known_so_far {
      let mut skip = vec![0u8; (size_of_record - known_so_far) as usize];
      r.read_exact(&mut skip).map_err(|_| Error::DatabaseFormat("short read of secondary header trailer".into()))?;
    }

    Ok(Self { hash, taxon_array_offset, taxon_array_size, taxon_nodes_offset, taxon_names_offset })
  }
}

impl Default for ReferenceHeader2 {
  fn default() -> Self {
    Self::new()
  }
}

/// A `(file-offset, sequence-length)` pair; 12 bytes logical on disk.
/// `length == 0` marks the position table's terminator entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PosRecord {
  pub offset: u64,
  pub length: u32,
}

impl PosRecord {
  pub const SIZE: usize = 8 + 4;

  pub fn write(&self, w: &mut impl Write) -> Result<()> {
    w.write_all(&self.offset.to_le_bytes())?;
    w.write_all(&self.length.to_le_bytes())?;
    Ok(())
  }

  pub fn read(r: &mut impl Read) -> Result<Self> {
    let mut buf = [0u8; Self::SIZE];
    r.read_exact(&mut buf).map_err(|_| Error::DatabaseFormat("short read of position record".into()))?;
    Ok(Self { offset: u64::from_le_bytes(buf[0..8].try_into().unwrap()), length: u32::from_le_bytes(buf[8..12].try_into().unwrap()) })
  }
}

#[cfg(test)]
mod header_tests {
  use std::io::Cursor;

  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn primary_header_round_trips() {
    let mut header = ReferenceHeader::new();
    header.sequences = 2;
    header.letters = 8;
    header.pos_array_offset = 123;
    let mut buf = Vec::new();
    header.write(&mut buf).unwrap();
    let read_back = ReferenceHeader::read(&mut Cursor::new(buf)).unwrap();
    assert_eq!(read_back, header);
  }

  #[test]
  fn rejects_wrong_magic() {
    let buf = vec![0u8; ReferenceHeader::SIZE];
    assert!(matches!(ReferenceHeader::read(&mut Cursor::new(buf)), Err(Error::DatabaseFormat(_))));
  }

  #[test]
  fn rejects_zero_sequences() {
    let header = ReferenceHeader::new(); // sequences defaults to 0
    let mut buf = Vec::new();
    header.write(&mut buf).unwrap();
    assert!(matches!(ReferenceHeader::read(&mut Cursor::new(buf)), Err(Error::DatabaseIncomplete(_))));
  }

  #[test]
  fn secondary_header_round_trips() {
    let mut header2 = ReferenceHeader2::new();
    header2.hash = [7u8; 16];
    header2.taxon_array_offset = 99;
    let mut buf = Vec::new();
    header2.write(&mut buf).unwrap();
    let read_back = ReferenceHeader2::read(&mut Cursor::new(buf)).unwrap();
    assert_eq!(read_back, header2);
  }

  #[test]
  fn secondary_header_skips_unknown_trailing_bytes() {
    let mut header2 = ReferenceHeader2::new();
    header2.hash = [3u8; 16];
    let mut buf = Vec::new();
    header2.write(&mut buf).unwrap();
    buf.extend_from_slice(b"future-field-bytes");
    // Patch size_of_record to declare the extra trailer too.
    let extra = 18u64;
    let new_size = ReferenceHeader2::KNOWN_LEN + extra;
    buf[0..8].copy_from_slice(&new_size.to_le_bytes());
    let read_back = ReferenceHeader2::read(&mut Cursor::new(buf)).unwrap();
    assert_eq!(read_back.hash, [3u8; 16]);
  }

  #[test]
  fn pos_record_terminator_has_zero_length() {
    let term = PosRecord { offset: 42, length: 0 };
    let mut buf = Vec::new();
    term.write(&mut buf).unwrap();
    let read_back = PosRecord::read(&mut Cursor::new(buf)).unwrap();
    assert_eq!(read_back.length, 0);
  }
}
