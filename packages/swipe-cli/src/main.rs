//! Entry point: parses [`cli::SwipeArgs`], resolves logging verbosity the
//! same way the teacher's `nextalign_parse_cli_args` does (`--silent` wins
//! over `--verbosity`, which wins over repeated `-v`/`-q`), installs
//! `color-eyre` for readable error reports, and dispatches to the chosen
//! subcommand.

mod cli;
mod commands;
mod logging;
mod output;
mod seed_index;

use clap::{CommandFactory, Parser};
use eyre::Result;
use log::LevelFilter;

use crate::cli::{SwipeArgs, SwipeCommands};

fn resolve_verbosity(args: &SwipeArgs) -> LevelFilter {
  if args.silent {
    return LevelFilter::Off;
  }
  if let Some(level) = args.verbosity {
    return level;
  }
  args.verbose.log_level_filter()
}

fn main() -> Result<()> {
  color_eyre::install()?;
  let args = SwipeArgs::parse();
  logging::setup_logger(resolve_verbosity(&args));

  match &args.command {
    SwipeCommands::Makedb(makedb_args) => commands::makedb::run(makedb_args),
    SwipeCommands::Dbinfo(dbinfo_args) => commands::dbinfo::run(dbinfo_args),
    SwipeCommands::Getseq(getseq_args) => commands::getseq::run(getseq_args),
    SwipeCommands::Blastp(blastp_args) => commands::search::run(blastp_args),
    SwipeCommands::Completions { shell } => {
      let mut command = SwipeArgs::command();
      let name = command.get_name().to_owned();
      clap_complete::generate(*shell, &mut command, name, &mut std::io::stdout());
      Ok(())
    }
  }
}
