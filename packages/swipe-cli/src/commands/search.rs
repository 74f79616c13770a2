//! `swipe blastp`: aligns query sequences against a reference database
//! (spec sections 4.3-4.7, `--query`/`--db`/`--translate-query`).
//!
//! Drives the engine end to end: loads the database one block at a time,
//! builds a CLI-local [`SeedIndex`] over each block, runs the seeded
//! pre-filter ([`swipe_core::prefilter`]) to turn exact-match seed hits
//! into trace points, groups surviving trace points by subject into one
//! [`DpTarget`] each, and hands them to [`swipe_core::batch::run_batch`].

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{self, BufWriter, Write};

use eyre::{Context, Result};
use log::{debug, info};
use swipe_core::batch::run_batch;
use swipe_core::db::{is_database_file, DatabaseFile};
use swipe_core::dp_target::DpTarget;
use swipe_core::fasta;
use swipe_core::letter::Letter;
use swipe_core::prefilter::{self, CollisionKey, Stage1Hit, TracePoint};
use swipe_core::scoring::ScoringMatrix;
use swipe_core::sequence::{Sequence, Strand, TranslatedSequence};
use swipe_core::stats::Statistics;
use swipe_core::translate;

use crate::cli::BlastpArgs;
use crate::output;
use crate::seed_index::SeedIndex;

/// One surviving trace point, tagged with the subject it was found
/// against — [`TracePoint`] itself doesn't carry subject identity because
/// the core pre-filter is invoked one subject at a time.
struct SubjectTrace {
  subject_idx: usize,
  point: TracePoint,
}

fn build_query(raw: &[u8], translate_query: bool) -> Result<TranslatedSequence> {
  if translate_query {
    return translate::translate_dna(raw).wrap_err("When translating a query sequence");
  }
  let residues: Vec<Letter> = raw.iter().map(|&b| Letter::from_ascii(b)).collect();
  let seq = Sequence::new(&residues).wrap_err("When parsing a protein query sequence")?;
  let placeholder = Sequence::new(&[Letter::MASK]).wrap_err("When building a placeholder frame")?;
  Ok(TranslatedSequence::new(raw.len(), [seq, placeholder.clone(), placeholder.clone(), placeholder.clone(), placeholder.clone(), placeholder]))
}

/// Scans every seed window of every frame of `strand`, looks each one up
/// in `seed_index`, and runs the pre-filter against the matching
/// subjects, collecting trace points that survive all four steps.
#[allow(clippy::too_many_arguments)]
fn collect_trace_points(
  query_id: usize,
  query: &TranslatedSequence,
  strand: Strand,
  seed_index: &SeedIndex,
  subject_seqs: &[Sequence],
  matrix: &ScoringMatrix,
  args: &BlastpArgs,
  simd_available: bool,
  stats: &mut Statistics,
) -> Vec<SubjectTrace> {
  let frames = query.get_strand(strand);
  let mut seen_per_subject: HashMap<usize, HashSet<CollisionKey>> = HashMap::new();
  let mut out = Vec::new();

  for frame in frames {
    let data = frame.data();
    if data.len() < seed_index.seed_len() {
      continue;
    }
    for query_pos in 0..=data.len() - seed_index.seed_len() {
      let candidates = seed_index.lookup(data, query_pos);
      if candidates.is_empty() {
        continue;
      }
      let mut by_subject: HashMap<usize, Vec<Stage1Hit>> = HashMap::new();
      for &(subject_idx, subject_pos) in candidates {
        by_subject.entry(subject_idx).or_default().push(Stage1Hit { subject_pos, seed_id: 0 });
      }
      for (subject_idx, hits) in by_subject {
        let subject = &subject_seqs[subject_idx];
        let seen = seen_per_subject.entry(subject_idx).or_default();
        let mut local_out = Vec::new();
        prefilter::search_query_offset(query_id, frame, query_pos, subject, &hits, matrix, &args.align_params, simd_available, stats, seen, &mut local_out);
        out.extend(local_out.into_iter().map(|point| SubjectTrace { subject_idx, point }));
      }
    }
  }

  out
}

/// Reduces the trace points for one subject down to a single [`DpTarget`]
/// band, centred on the diagonal of its first surviving trace point.
/// Returns the targets alongside a dense `out_index -> subject_idx` map,
/// since [`DpTarget::out_index`] indexes into `run_batch`'s result vector
/// (one slot per target), not the subject's index in the block.
fn build_targets<'a>(traces: &[SubjectTrace], subjects: &'a [&'a [Letter]], band: i32) -> (Vec<DpTarget<'a>>, Vec<usize>) {
  let mut by_subject: HashMap<usize, &SubjectTrace> = HashMap::new();
  for trace in traces {
    by_subject.entry(trace.subject_idx).or_insert(trace);
  }
  let mut subject_of_out_index = Vec::with_capacity(by_subject.len());
  let targets = by_subject
    .into_iter()
    .map(|(subject_idx, trace)| {
      let out_index = subject_of_out_index.len();
      subject_of_out_index.push(subject_idx);
      let diagonal = trace.point.seed_offset as i32 - trace.point.subject_pos as i32;
      let d_end = diagonal + band / 2;
      let d_begin = d_end - band;
      DpTarget::new(subjects[subject_idx], d_begin, d_end, out_index)
    })
    .collect();
  (targets, subject_of_out_index)
}

pub fn run(args: &BlastpArgs) -> Result<()> {
  let db = if is_database_file(&args.db) {
    DatabaseFile::open(&args.db).wrap_err_with(|| format!("When opening database '{}'", args.db.display()))?
  } else {
    info!("'{}' is not a database file; building a temporary one", args.db.display());
    let mut tmp_name = args.db.clone().into_os_string();
    tmp_name.push(".swipe-tmp.sdb");
    let tmp_path = std::path::PathBuf::from(tmp_name);
    let reader = File::open(&args.db).wrap_err_with(|| format!("Failed to open '{}'", args.db.display()))?;
    let records = fasta::records(io::BufReader::new(reader)).wrap_err("When scanning the FASTA database input")?.map(|record| -> swipe_core::Result<swipe_core::db::InputRecord> {
      let record = record?;
      let residues: Vec<Letter> = record.seq.iter().map(|&b| Letter::from_ascii(b)).collect();
      Ok(swipe_core::db::InputRecord { id: record.id, residues })
    });
    swipe_core::db::build_database(&tmp_path, records, args.align_params.masking, &swipe_core::masking::NoopMasker).wrap_err("When building the temporary database")?;
    DatabaseFile::open_temporary(&tmp_path).wrap_err("When opening the temporary database")?
  };

  let query_file = File::open(&args.query).wrap_err_with(|| format!("Failed to open query file '{}'", args.query.display()))?;
  let query_records: Vec<_> = fasta::records(io::BufReader::new(query_file)).wrap_err("When scanning query FASTA input")?.collect::<io::Result<Vec<_>>>().wrap_err("When reading a query record")?;

  let mut out: Box<dyn Write> = match &args.out {
    None => Box::new(io::stdout()),
    Some(path) => Box::new(BufWriter::new(File::create(path).wrap_err_with(|| format!("Failed to create output file '{}'", path.display()))?)),
  };
  output::write_header(&mut out)?;

  let matrix = ScoringMatrix::blosum62(args.align_params.gap_open, args.align_params.gap_extend, args.align_params.frame_shift);
  let threads = args.align_params.resolved_threads();
  let simd_available = cfg!(target_arch = "x86_64");
  let mut stats = Statistics::new();

  let blocks = db.load_blocks_pipelined(args.align_params.block_letters, true);
  let mut block_no = 0;
  for block in blocks {
    let block = block.wrap_err("When loading a database block")?;
    block_no += 1;
    debug!("Searching block {block_no} ({} subjects)", block.len());
    let seed_index = SeedIndex::build(&block, args.seed_length);
    let subject_slices: Vec<&[Letter]> = (0..block.len()).map(|i| block.seqs.data(i)).collect();
    let subject_seqs: Vec<Sequence> = (0..block.len()).map(|i| Sequence::new(block.seqs.data(i))).collect::<swipe_core::Result<_>>().wrap_err("When rebuilding a subject sequence")?;
    let ids = block.ids.as_ref().expect("blastp always requests ids");

    for (query_id, record) in query_records.iter().enumerate() {
      let query = build_query(&record.seq, args.translate_query)?;
      let strands = if args.translate_query { &[Strand::Forward, Strand::Reverse][..] } else { &[Strand::Forward][..] };

      for &strand in strands {
        let traces = collect_trace_points(query_id, &query, strand, &seed_index, &subject_seqs, &matrix, args, simd_available, &mut stats);
        if traces.is_empty() {
          continue;
        }
        let (targets, subject_of_out_index) = build_targets(&traces, &subject_slices, args.align_params.band);
        let (results, batch_stats) = run_batch(&query, strand, targets, &matrix, true, threads);
        stats.merge(&batch_stats);

        for (out_index, hsp) in results.into_iter().enumerate() {
          let Some(hsp) = hsp else { continue };
          if hsp.score < args.align_params.min_hit_raw_score {
            continue;
          }
          let subject_id = &ids[subject_of_out_index[out_index]];
          output::write_hit(&mut out, &record.id, subject_id, &hsp).wrap_err("When writing an HSP")?;
        }
      }
    }
  }

  out.flush()?;
  info!(
    "Search complete: {} ungapped, {} primary, {} emitted, {} overflowed",
    stats.get(swipe_core::stats::Counter::TentativeMatches2),
    stats.get(swipe_core::stats::Counter::TentativeMatches3),
    stats.get(swipe_core::stats::Counter::TentativeMatches4),
    stats.get(swipe_core::stats::Counter::Overflows),
  );

  Ok(())
}
