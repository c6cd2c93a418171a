//! Sequence file input for the command-line tool.

pub mod fasta_reader;
