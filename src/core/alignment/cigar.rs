//! CIGAR operations and run-length strings.
//!
//! Only three operations occur in a pairwise alignment path:
//! `M` (diagonal step, one query and one database symbol), `I` (left step,
//! consumes a database symbol) and `D` (up step, consumes a query symbol).
//! Runs are always written with an explicit count, e.g. `1M2I`.

use std::fmt;
use std::str::FromStr;

/// CIGAR operation type with zero-cost conversion to/from bytes
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CigarOp {
    M = b'M', // Match/mismatch
    I = b'I', // Gap in the query, database symbol consumed
    D = b'D', // Gap in the database, query symbol consumed
}

impl CigarOp {
    /// Convert from byte representation
    #[inline(always)]
    pub const fn from_byte(b: u8) -> Option<Self> {
        match b {
            b'M' => Some(Self::M),
            b'I' => Some(Self::I),
            b'D' => Some(Self::D),
            _ => None,
        }
    }

    /// Convert to byte representation
    #[inline(always)]
    pub const fn to_byte(self) -> u8 {
        self as u8
    }

    /// Returns true if this operation consumes query symbols
    #[inline(always)]
    pub const fn consumes_query(self) -> bool {
        matches!(self, Self::M | Self::D)
    }

    /// Returns true if this operation consumes database symbols
    #[inline(always)]
    pub const fn consumes_db(self) -> bool {
        matches!(self, Self::M | Self::I)
    }
}

/// Run-length encoded edit script. Every run length is at least 1 and
/// adjacent runs always differ in operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Cigar {
    runs: Vec<(CigarOp, u32)>,
}

impl Cigar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `len` copies of `op`, merging with the last run.
    pub fn push(&mut self, op: CigarOp, len: u32) {
        if len == 0 {
            return;
        }
        match self.runs.last_mut() {
            Some((last, n)) if *last == op => *n += len,
            _ => self.runs.push((op, len)),
        }
    }

    /// Reverse the run order in place (paths are collected end to start).
    pub fn reverse(&mut self) {
        self.runs.reverse();
    }

    pub fn runs(&self) -> &[(CigarOp, u32)] {
        &self.runs
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Query symbols covered by the path.
    pub fn query_len(&self) -> usize {
        self.runs
            .iter()
            .filter(|(op, _)| op.consumes_query())
            .map(|&(_, n)| n as usize)
            .sum()
    }

    /// Database symbols covered by the path.
    pub fn db_len(&self) -> usize {
        self.runs
            .iter()
            .filter(|(op, _)| op.consumes_db())
            .map(|&(_, n)| n as usize)
            .sum()
    }
}

impl fmt::Display for Cigar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &(op, n) in &self.runs {
            write!(f, "{}{}", n, op.to_byte() as char)?;
        }
        Ok(())
    }
}

impl FromStr for Cigar {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cigar = Cigar::new();
        let mut len: Option<u32> = None;
        for ch in s.chars() {
            if let Some(digit) = ch.to_digit(10) {
                len = Some(
                    len.unwrap_or(0)
                        .checked_mul(10)
                        .and_then(|v| v.checked_add(digit))
                        .ok_or_else(|| format!("run length overflow in '{s}'"))?,
                );
                continue;
            }
            let op = u8::try_from(ch)
                .ok()
                .and_then(CigarOp::from_byte)
                .ok_or_else(|| format!("invalid CIGAR operation '{ch}' in '{s}'"))?;
            match len.take() {
                Some(n) if n > 0 => cigar.push(op, n),
                _ => return Err(format!("missing or zero run length before '{ch}' in '{s}'")),
            }
        }
        if len.is_some() {
            return Err(format!("trailing run length without operation in '{s}'"));
        }
        Ok(cigar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_merges_runs() {
        let mut cigar = Cigar::new();
        cigar.push(CigarOp::M, 2);
        cigar.push(CigarOp::M, 1);
        cigar.push(CigarOp::I, 1);
        cigar.push(CigarOp::D, 0);
        cigar.push(CigarOp::M, 4);
        assert_eq!(cigar.to_string(), "3M1I4M");
        assert_eq!(cigar.query_len(), 7);
        assert_eq!(cigar.db_len(), 8);
    }

    #[test]
    fn test_reverse() {
        let mut cigar: Cigar = "2M3D1M".parse().unwrap();
        cigar.reverse();
        assert_eq!(cigar.to_string(), "1M3D2M");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("M".parse::<Cigar>().is_err());
        assert!("3".parse::<Cigar>().is_err());
        assert!("2S".parse::<Cigar>().is_err());
        assert!("0M".parse::<Cigar>().is_err());
        assert_eq!("".parse::<Cigar>().unwrap(), Cigar::new());
    }

    #[test]
    fn test_op_bytes() {
        for op in [CigarOp::M, CigarOp::I, CigarOp::D] {
            assert_eq!(CigarOp::from_byte(op.to_byte()), Some(op));
        }
        assert!(CigarOp::M.consumes_query() && CigarOp::M.consumes_db());
        assert!(CigarOp::I.consumes_db() && !CigarOp::I.consumes_query());
        assert!(CigarOp::D.consumes_query() && !CigarOp::D.consumes_db());
    }
}
