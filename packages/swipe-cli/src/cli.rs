//! Command-line surface. Shape mirrors the teacher's `NextalignArgs`/
//! `NextalignCommands`: a top-level `Args` struct holding an optional
//! `#[clap(subcommand)]` enum, plus the verbosity flags every subcommand
//! shares.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use swipe_core::AlignParams;

#[derive(Parser, Debug)]
#[command(name = "swipe", author, version, about = "Protein-sequence similarity search: build reference databases and align queries against them.")]
pub struct SwipeArgs {
  #[command(subcommand)]
  pub command: SwipeCommands,

  /// Make output more quiet or more verbose (repeatable: `-v`, `-vv`, `-q`).
  #[command(flatten)]
  pub verbose: Verbosity<InfoLevel>,

  /// Set an explicit verbosity level, overriding `-v`/`-q`.
  #[arg(long, global = true, conflicts_with = "silent")]
  pub verbosity: Option<log::LevelFilter>,

  /// Disable all console output. Same as `--verbosity=off`.
  #[arg(long, global = true, conflicts_with = "verbosity")]
  pub silent: bool,
}

#[derive(Subcommand, Debug)]
pub enum SwipeCommands {
  /// Build a binary reference database from a FASTA input.
  Makedb(MakedbArgs),

  /// Print the header summary of a reference database.
  Dbinfo(DbinfoArgs),

  /// Extract sequences from a reference database back to FASTA.
  Getseq(GetseqArgs),

  /// Align protein or translated-DNA queries against a reference database.
  Blastp(BlastpArgs),

  /// Generate shell completions.
  Completions {
    /// Name of the shell to generate completions for.
    #[arg(value_name = "SHELL")]
    shell: clap_complete::Shell,
  },
}

#[derive(Parser, Debug)]
pub struct MakedbArgs {
  /// FASTA input to build from. Empty or "-" reads standard input.
  #[arg(long = "in", value_hint = ValueHint::FilePath)]
  pub input: Option<PathBuf>,

  /// Path of the database file to create.
  #[arg(long, short = 'd')]
  #[arg(value_hint = ValueHint::FilePath)]
  pub db: PathBuf,

  /// Apply low-complexity masking to reference sequences at build time.
  #[arg(long, default_value_t = true)]
  pub masking: bool,
}

#[derive(Parser, Debug)]
pub struct DbinfoArgs {
  /// Path of the database file to inspect.
  #[arg(long, short = 'd')]
  #[arg(value_hint = ValueHint::FilePath)]
  pub db: PathBuf,
}

#[derive(Parser, Debug)]
pub struct GetseqArgs {
  /// Path of the database file to read from.
  #[arg(long, short = 'd')]
  #[arg(value_hint = ValueHint::FilePath)]
  pub db: PathBuf,

  /// Database indices (0-based) to extract. If omitted, every sequence is
  /// extracted.
  #[arg(long, value_delimiter = ',')]
  pub indices: Option<Vec<u64>>,

  /// Write FASTA output here instead of standard output.
  #[arg(long, short = 'o')]
  #[arg(value_hint = ValueHint::AnyPath)]
  pub out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct BlastpArgs {
  /// FASTA file of query sequences.
  #[arg(long, short = 'q')]
  #[arg(value_hint = ValueHint::FilePath)]
  pub query: PathBuf,

  /// Path of the reference database to search (or a raw FASTA file, which
  /// is built into a temporary database on the fly).
  #[arg(long, short = 'd')]
  #[arg(value_hint = ValueHint::FilePath)]
  pub db: PathBuf,

  /// Write tabular HSP output here instead of standard output.
  #[arg(long, short = 'o')]
  #[arg(value_hint = ValueHint::AnyPath)]
  pub out: Option<PathBuf>,

  /// Treat queries as DNA and search all six translated reading frames
  /// (BLASTX-style). Without this flag, queries are treated as protein.
  #[arg(long)]
  pub translate_query: bool,

  /// Exact seed length used by the CLI's seed index when looking up
  /// candidate hits. Not part of the core engine: a short fixed-length
  /// exact-match index, simple by design, standing in for a production
  /// spaced-seed index.
  #[arg(long, default_value_t = 6)]
  pub seed_length: usize,

  #[command(flatten)]
  pub align_params: AlignParams,
}
