//! Throughput benchmark for the banded 3-frame swipe kernel (component
//! C5), the hot inner loop the batch driver fans out across threads.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use swipe_core::dp_target::DpTarget;
use swipe_core::letter::Letter;
use swipe_core::scoring::ScoringMatrix;
use swipe_core::sequence::{Sequence, Strand, TranslatedSequence};
use swipe_core::simd::ScalarI32;
use swipe_core::stats::Statistics;
use swipe_core::swipe::banded_3frame_swipe;

fn letters(s: &str) -> Vec<Letter> {
  s.bytes().map(Letter::from_ascii).collect()
}

const PROTEIN: &str = "MKTAYIAKQRQISFVKSHFSRQLEERLGLIEVQAPILSRVGDGTQDNLSGAEKAVQVKVKALPDAQFEVVHSLAKWKRQTLGQHDFSAGEGLYTHMKALRPDEDRLSPLHSVYVDQWDWELVMGDRERGFGSLKSTVEAIWAGIKATEAAVSEEFGLAPFLPDQIHFVHSQELLSRYPDLDAKGRERAIAKDLGAVFLVGIGGKLSDGHRHDVRAPDYDDWSTPSELGHAGLNGDILVWNPVLEDAFELSSMGIRVDADTLKHQLALTGDEDRLELEWHQALLRGEMPQTIGGGIGQSRLTMLLLQLPHIGQVQAGVWPAAVRESVPSLL";

fn translated_forward(residues: &str) -> TranslatedSequence {
  let seq = Sequence::new(&letters(residues)).unwrap();
  let placeholder = Sequence::new(&[Letter::MASK]).unwrap();
  TranslatedSequence::new(residues.len(), [seq, placeholder.clone(), placeholder.clone(), placeholder.clone(), placeholder.clone(), placeholder])
}

fn bench_swipe_kernel(c: &mut Criterion) {
  let query = translated_forward(PROTEIN);
  let subject_letters = letters(PROTEIN);
  let matrix = ScoringMatrix::blosum62(11, 1, 15);

  let mut group = c.benchmark_group("banded_3frame_swipe");
  for &n_subjects in &[1usize, 8, 32] {
    group.bench_with_input(BenchmarkId::from_parameter(n_subjects), &n_subjects, |b, &n_subjects| {
      b.iter(|| {
        let mut stats = Statistics::new();
        for i in 0..n_subjects {
          let mut targets = [DpTarget::new(&subject_letters, -64, 64, i)];
          banded_3frame_swipe::<ScalarI32, 1>(black_box(&query), Strand::Forward, &mut targets, &matrix, false, &mut stats);
        }
      });
    });
  }
  group.finish();
}

criterion_group!(benches, bench_swipe_kernel);
criterion_main!(benches);
