//! Search/build tunables shared by the pre-filter, swipe kernel and batch
//! driver. A `clap::Parser` derive lives in the core (not the CLI crate)
//! because the original's `align/params.rs` placed the equivalent
//! `NextalignParams` alongside the algorithms it configures rather than in
//! the command-line layer; the CLI crate only adds process-level concerns
//! (verbosity, output paths) on top of this.

use clap::Args;

/// Tunables for the seeded pre-filter, the swipe kernel, and the batch
/// driver's block sizing. Defaults are DIAMOND's own defaults, kept as the
/// values a caller gets with no flags at all.
#[derive(Debug, Clone, Copy, Args)]
pub struct AlignParams {
  /// Gap opening penalty (subtracted once per gap).
  #[arg(long, default_value_t = 11)]
  pub gap_open: i32,

  /// Gap extension penalty (subtracted once per residue in the gap).
  #[arg(long, default_value_t = 1)]
  pub gap_extend: i32,

  /// Penalty subtracted when the 3-frame kernel takes a frame-shift
  /// transition.
  #[arg(long, default_value_t = 15)]
  pub frame_shift: i32,

  /// Ungapped-extension drop-off: stop extending once the running score
  /// falls this far below the best score seen so far.
  #[arg(long, default_value_t = 15)]
  pub drop_off: i32,

  /// Minimum raw score an ungapped extension must reach to survive stage
  /// 2 of the pre-filter.
  #[arg(long, default_value_t = 15)]
  pub min_ungapped_raw_score: i32,

  /// Minimum raw score a hit must reach (after the optional gapped
  /// fallback) to be emitted to the trace-point buffer.
  #[arg(long, default_value_t = 27)]
  pub min_hit_raw_score: i32,

  /// Half-width of the fixed window used by the scalar Smith-Waterman
  /// fallback.
  #[arg(long, default_value_t = 32)]
  pub hit_band: i32,

  /// Offset of the seed within the fixed window used by the scalar
  /// Smith-Waterman fallback.
  #[arg(long, default_value_t = 16)]
  pub seed_anchor: i32,

  /// Diagonal band half-width (in query-residue units) used by the
  /// banded 3-frame swipe kernel.
  #[arg(long, default_value_t = 64)]
  pub band: i32,

  /// Target number of reference letters loaded into memory per database
  /// block.
  #[arg(long, alias = "query-cover", alias = "chunk-size", default_value_t = 4_000_000_000)]
  pub block_letters: u64,

  /// Number of worker threads for the batch driver. `0` means "use all
  /// available cores".
  #[arg(long, default_value_t = 0)]
  pub threads: usize,

  /// Apply low-complexity masking to reference sequences at build time
  /// and to queries at search time.
  #[arg(long, default_value_t = true)]
  pub masking: bool,
}

impl AlignParams {
  #[must_use]
  pub fn resolved_threads(&self) -> usize {
    if self.threads == 0 { num_cpus::get() } else { self.threads }
  }
}

impl Default for AlignParams {
  fn default() -> Self {
    Self {
      gap_open: 11,
      gap_extend: 1,
      frame_shift: 15,
      drop_off: 15,
      min_ungapped_raw_score: 15,
      min_hit_raw_score: 27,
      hit_band: 32,
      seed_anchor: 16,
      band: 64,
      block_letters: 4_000_000_000,
      threads: 0,
      masking: true,
    }
  }
}

#[cfg(test)]
mod config_tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn resolved_threads_falls_back_to_all_cores() {
    let params = AlignParams { threads: 0, ..AlignParams::default() };
    assert_eq!(params.resolved_threads(), num_cpus::get());
  }

  #[test]
  fn resolved_threads_honors_explicit_count() {
    let params = AlignParams { threads: 4, ..AlignParams::default() };
    assert_eq!(params.resolved_threads(), 4);
  }
}
