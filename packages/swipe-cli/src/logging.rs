//! Logger setup shared by every subcommand. Mirrors the teacher's
//! `setup_logger`: a single `env_logger` instance configured once from the
//! resolved verbosity, writing to stderr so stdout stays free for FASTA /
//! tabular output.

use log::LevelFilter;

pub fn setup_logger(filter_level: LevelFilter) {
  env_logger::Builder::new()
    .filter_level(filter_level)
    .format_timestamp_millis()
    .target(env_logger::Target::Stderr)
    .init();
}
