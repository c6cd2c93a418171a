// FASTA reader module using bio::io::fasta
//
// This module wraps bio::io::fasta with:
// - Automatic gzip detection by file extension and magic bytes
// - Multi-member decoding, so BGZIP files read like plain gzip
// - Loading a whole file into an encoded InMemoryDatabase

use bio::io::fasta;
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use crate::alphabet::Alphabet;
use crate::pipelines::search::database::{InMemoryDatabase, SequenceDatabase};

const BUFFER_SIZE: usize = 4 * 1024 * 1024; // 4MB buffer

/// FASTA reader with automatic gzip detection
pub struct FastaReader {
    records: fasta::Records<BufReader<Box<dyn Read>>>,
}

/// Check for the gzip magic bytes at the start of the file
fn is_gzip(path: &Path) -> io::Result<bool> {
    let mut magic = [0u8; 2];
    let mut file = File::open(path)?;
    let mut filled = 0;
    while filled < magic.len() {
        match file.read(&mut magic[filled..])? {
            0 => return Ok(false),
            n => filled += n,
        }
    }
    Ok(magic == [0x1f, 0x8b])
}

impl FastaReader {
    /// Open a FASTA file (.fa, .fasta, .fa.gz, ...)
    ///
    /// Gzip input is recognised by a `.gz` extension or the gzip magic bytes.
    pub fn new(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let gz_ext = path.extension().is_some_and(|ext| ext == "gz");
        let file = File::open(path)?;
        let reader: Box<dyn Read> = if gz_ext || is_gzip(path)? {
            log::debug!("Reading gzip-compressed FASTA {}", path.display());
            Box::new(MultiGzDecoder::new(file))
        } else {
            Box::new(file)
        };

        let fasta_reader = fasta::Reader::from_bufread(BufReader::with_capacity(BUFFER_SIZE, reader));
        Ok(Self {
            records: fasta_reader.records(),
        })
    }

    /// Read the next FASTA record
    ///
    /// Returns `Ok(Some(record))` if a record is found, `Ok(None)` at EOF,
    /// and `Err(e)` on a parse error.
    pub fn read_record(&mut self) -> io::Result<Option<fasta::Record>> {
        match self.records.next() {
            Some(Ok(record)) => Ok(Some(record)),
            Some(Err(e)) => Err(io::Error::new(io::ErrorKind::InvalidData, e)),
            None => Ok(None),
        }
    }

    /// Read every remaining record and encode it with `alphabet`.
    pub fn read_database(&mut self, alphabet: Alphabet) -> io::Result<InMemoryDatabase> {
        let mut db = InMemoryDatabase::new();
        while let Some(record) = self.read_record()? {
            db.push(record.id(), alphabet.encode(record.seq()));
        }
        log::debug!(
            "Loaded {} {alphabet} sequences ({} residues)",
            db.len(),
            db.residues()
        );
        Ok(db)
    }
}
