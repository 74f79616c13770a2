//! Translated-DNA query support.
//!
//! Builds the six reading frames ([`crate::sequence::TranslatedSequence`])
//! the swipe kernel aligns jointly three at a time (spec section 4.5).
//! Only the standard genetic code is implemented; `Non-goals` excludes
//! nucleotide-vs-nucleotide alignment but translated-DNA queries (BLASTX
//! style) are firmly in scope per spec section 1.

use crate::letter::Letter;
use crate::sequence::{Sequence, TranslatedSequence};

/// Standard genetic code lookup. Ambiguous or incomplete codons translate
/// to `X`; stop codons translate to `*`, both already part of
/// [`crate::letter::AMINO_ACIDS`].
#[must_use]
fn translate_codon(codon: [u8; 3]) -> u8 {
  let upper = codon.map(|c| c.to_ascii_uppercase());
  match &upper {
    b"TTT" | b"TTC" => b'F',
    b"TTA" | b"TTG" | b"CTT" | b"CTC" | b"CTA" | b"CTG" => b'L',
    b"ATT" | b"ATC" | b"ATA" => b'I',
    b"ATG" => b'M',
    b"GTT" | b"GTC" | b"GTA" | b"GTG" => b'V',
    b"TCT" | b"TCC" | b"TCA" | b"TCG" | b"AGT" | b"AGC" => b'S',
    b"CCT" | b"CCC" | b"CCA" | b"CCG" => b'P',
    b"ACT" | b"ACC" | b"ACA" | b"ACG" => b'T',
    b"GCT" | b"GCC" | b"GCA" | b"GCG" => b'A',
    b"TAT" | b"TAC" => b'Y',
    b"TAA" | b"TAG" | b"TGA" => b'*',
    b"CAT" | b"CAC" => b'H',
    b"CAA" | b"CAG" => b'Q',
    b"AAT" | b"AAC" => b'N',
    b"AAA" | b"AAG" => b'K',
    b"GAT" | b"GAC" => b'D',
    b"GAA" | b"GAG" => b'E',
    b"TGT" | b"TGC" => b'C',
    b"TGG" => b'W',
    b"CGT" | b"CGC" | b"CGA" | b"CGG" | b"AGA" | b"AGG" => b'R',
    b"GGT" | b"GGC" | b"GGA" | b"GGG" => b'G',
    _ => b'X',
  }
}

fn complement(base: u8) -> u8 {
  match base.to_ascii_uppercase() {
    b'A' => b'T',
    b'T' | b'U' => b'A',
    b'C' => b'G',
    b'G' => b'C',
    _ => b'N',
  }
}

fn reverse_complement(dna: &[u8]) -> Vec<u8> {
  dna.iter().rev().map(|&b| complement(b)).collect()
}

/// Translates `dna` (offset `frame_offset`, `0..3`) into residue letters.
fn translate_frame(dna: &[u8], frame_offset: usize) -> crate::error::Result<Sequence> {
  let codons = dna[frame_offset..].chunks_exact(3);
  let residues: Vec<Letter> = codons.map(|c| Letter::from_ascii(translate_codon([c[0], c[1], c[2]]))).collect();
  if residues.is_empty() {
    // A source too short for even one codon in this frame still needs a
    // well-formed (delimiter-only) Sequence; Sequence::new rejects
    // zero-length input, so synthesize a single masked placeholder.
    return Sequence::new(&[Letter::MASK]);
  }
  Sequence::new(&residues)
}

/// Builds all six reading frames of `dna` (forward frames 0,1,2 then
/// reverse-complement frames 3,4,5), per spec section 3's
/// `TranslatedSequence`.
pub fn translate_dna(dna: &[u8]) -> crate::error::Result<TranslatedSequence> {
  let rev = reverse_complement(dna);
  let frames = [
    translate_frame(dna, 0)?,
    translate_frame(dna, 1)?,
    translate_frame(dna, 2)?,
    translate_frame(&rev, 0)?,
    translate_frame(&rev, 1)?,
    translate_frame(&rev, 2)?,
  ];
  Ok(TranslatedSequence::new(dna.len(), frames))
}
