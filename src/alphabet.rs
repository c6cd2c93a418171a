//! Residue alphabets and symbol codes.
//!
//! Sequences reach the engines as dense codes `0..dim`, which index the
//! scoring matrix directly.
//!
//! - Nucleotides: A=0, C=1, G=2, T=3, N=4 (`U` reads as `T`, anything else as `N`)
//! - Amino acids: the 24 symbols of `ARNDCQEGHILKMFPSTWYVBZX*` in that order
//!   (unknown letters read as `X`)

use std::fmt;
use std::str::FromStr;

use crate::defaults::{AMINO_ACID_SYMBOLS, NUCLEOTIDE_SYMBOLS};

/// Code of the nucleotide wildcard `N`.
pub const NUCLEOTIDE_WILDCARD: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alphabet {
    Nucleotide,
    AminoAcid,
}

impl Alphabet {
    /// Number of symbol codes, i.e. the scoring matrix dimension.
    pub fn dim(self) -> usize {
        self.symbols().len()
    }

    pub fn symbols(self) -> &'static [u8] {
        match self {
            Alphabet::Nucleotide => NUCLEOTIDE_SYMBOLS.as_bytes(),
            Alphabet::AminoAcid => AMINO_ACID_SYMBOLS.as_bytes(),
        }
    }

    /// Code for one residue letter (case-insensitive).
    #[inline]
    pub fn encode_symbol(self, letter: u8) -> u8 {
        match self {
            Alphabet::Nucleotide => nucleotide_code(letter),
            Alphabet::AminoAcid => amino_acid_code(letter),
        }
    }

    pub fn encode(self, seq: &[u8]) -> Vec<u8> {
        seq.iter().map(|&b| self.encode_symbol(b)).collect()
    }

    /// Letters for a code sequence; out-of-range codes print as `?`.
    pub fn decode(self, codes: &[u8]) -> String {
        let symbols = self.symbols();
        codes
            .iter()
            .map(|&c| symbols.get(c as usize).map_or('?', |&s| s as char))
            .collect()
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Alphabet::Nucleotide => f.write_str("nucleotide"),
            Alphabet::AminoAcid => f.write_str("amino acid"),
        }
    }
}

impl FromStr for Alphabet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nt" | "dna" | "nucleotide" => Ok(Alphabet::Nucleotide),
            "aa" | "protein" | "amino" => Ok(Alphabet::AminoAcid),
            other => Err(format!("unknown alphabet '{other}'")),
        }
    }
}

#[inline]
pub fn nucleotide_code(base: u8) -> u8 {
    match base {
        b'A' | b'a' => 0,
        b'C' | b'c' => 1,
        b'G' | b'g' => 2,
        b'T' | b't' | b'U' | b'u' => 3,
        _ => NUCLEOTIDE_WILDCARD,
    }
}

#[inline]
fn amino_acid_code(residue: u8) -> u8 {
    let upper = residue.to_ascii_uppercase();
    AMINO_ACID_SYMBOLS
        .bytes()
        .position(|s| s == upper)
        .or_else(|| AMINO_ACID_SYMBOLS.bytes().position(|s| s == b'X'))
        .unwrap_or(0) as u8
}

/// Complement of a nucleotide code (`N` stays `N`).
#[inline]
pub fn complement_code(code: u8) -> u8 {
    match code {
        0..=3 => 3 - code,
        _ => NUCLEOTIDE_WILDCARD,
    }
}

/// Reverse complement of an encoded nucleotide sequence.
pub fn reverse_complement(codes: &[u8]) -> Vec<u8> {
    codes.iter().rev().map(|&c| complement_code(c)).collect()
}
