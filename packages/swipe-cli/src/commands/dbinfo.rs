//! `swipe dbinfo`: prints the header summary of a reference database
//! (spec section 6, `--db`).

use eyre::{Context, Result};
use swipe_core::db::DatabaseFile;

use crate::cli::DbinfoArgs;

pub fn run(args: &DbinfoArgs) -> Result<()> {
  let db = DatabaseFile::open(&args.db).wrap_err_with(|| format!("When opening database '{}'", args.db.display()))?;
  let info = db.info();

  println!("Database version  {}", info.db_version);
  println!("Build              {}", info.build);
  println!("Sequences          {}", info.sequences);
  println!("Letters            {}", info.letters);
  println!("Content hash       {}", swipe_core::db::hex_hash(db.hash()));
  println!("Taxonomy id lists  {}", db.has_taxon_id_lists());
  println!("Taxonomy nodes     {}", db.has_taxon_nodes());
  println!("Scientific names   {}", db.has_taxon_scientific_names());

  Ok(())
}
