//! `swipe makedb`: builds a binary reference database from a FASTA input
//! (spec section 6, `--in`/`-d`/`--masking`).

use std::fs::File;
use std::io::{self, BufRead, BufReader};

use eyre::{Context, Result};
use log::info;
use swipe_core::db::build::{build_database, InputRecord};
use swipe_core::fasta;
use swipe_core::letter::Letter;
use swipe_core::masking::NoopMasker;

use crate::cli::MakedbArgs;

fn open_input(args: &MakedbArgs) -> Result<Box<dyn BufRead>> {
  match &args.input {
    None => Ok(Box::new(BufReader::new(io::stdin()))),
    Some(path) if path.as_os_str() == "-" => Ok(Box::new(BufReader::new(io::stdin()))),
    Some(path) => {
      let file = File::open(path).wrap_err_with(|| format!("Failed to open FASTA input '{}'", path.display()))?;
      Ok(Box::new(BufReader::new(file)))
    }
  }
}

pub fn run(args: &MakedbArgs) -> Result<()> {
  let reader = open_input(args)?;
  let records = fasta::records(reader).wrap_err("When scanning FASTA input")?;

  let input_records = records.map(|record| -> swipe_core::Result<InputRecord> {
    let record = record?;
    let residues: Vec<Letter> = record.seq.iter().map(|&b| Letter::from_ascii(b)).collect();
    Ok(InputRecord { id: record.id, residues })
  });

  let header2 = build_database(&args.db, input_records, args.masking, &NoopMasker).wrap_err_with(|| format!("When building database '{}'", args.db.display()))?;

  info!("Database '{}' built successfully. Content hash: {}", args.db.display(), swipe_core::db::hex_hash(&header2.hash));

  Ok(())
}
