//! Tabular HSP output, the `blastp` subcommand's sink: one line per
//! reported HSP, BLAST's `-outfmt 6` column order.

use std::io::Write;

use swipe_core::hsp::Hsp;

pub fn write_header(out: &mut impl Write) -> std::io::Result<()> {
  writeln!(out, "# query\tsubject\tscore\tframe\tq_start\tq_end\ts_start\ts_end")
}

pub fn write_hit(out: &mut impl Write, query_id: &str, subject_id: &str, hsp: &Hsp) -> std::io::Result<()> {
  writeln!(
    out,
    "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
    query_id, subject_id, hsp.score, hsp.frame, hsp.query_range.begin, hsp.query_range.end, hsp.subject_range.begin, hsp.subject_range.end,
  )
}
