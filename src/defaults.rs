// src/defaults.rs

// Search Constants
pub const HIT_COUNT: usize = 10;
pub const CHUNK_SIZE: usize = 1000;
pub const CDEPTH: usize = 4;
pub const MAX_QUERY_CHANNELS: usize = 6;

// Scoring Constants
pub const MATCH_SCORE: i32 = 1;
pub const MISMATCH_SCORE: i32 = -1;
pub const GAP_OPEN: i32 = 3;
pub const GAP_EXTEND: i32 = 1;

// Alphabet Constants
pub const NUCLEOTIDE_SYMBOLS: &str = "ACGTN";
pub const AMINO_ACID_SYMBOLS: &str = "ARNDCQEGHILKMFPSTWYVBZX*";
