//! `swipe getseq`: extracts sequences from a reference database back to
//! FASTA (spec section 6, `--db`/`--indices`/`--out`).

use std::fs::File;
use std::io::{self, BufWriter, Write};

use eyre::{Context, Result};
use swipe_core::db::{DatabaseFile, SeqSelection};

use crate::cli::GetseqArgs;

pub fn run(args: &GetseqArgs) -> Result<()> {
  let mut db = DatabaseFile::open(&args.db).wrap_err_with(|| format!("When opening database '{}'", args.db.display()))?;

  let selection = match &args.indices {
    None => SeqSelection::All,
    Some(indices) => SeqSelection::Indices(indices.iter().copied().collect()),
  };

  let mut out: Box<dyn Write> = match &args.out {
    None => Box::new(io::stdout()),
    Some(path) => Box::new(BufWriter::new(File::create(path).wrap_err_with(|| format!("Failed to create output file '{}'", path.display()))?)),
  };

  db.get_seq(&selection, &mut out).wrap_err("When extracting sequences")?;
  out.flush()?;

  Ok(())
}
