use std::fs::File;
use std::io::{BufRead, BufReader, Write};

use camino::Utf8Path;
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use noodles::fasta;

use crate::error::ForgeError;
use crate::store::Workspace;

/// Residues per output line. Format compatibility constant expected by the
/// packaging tool's downstream indexers, not a tunable.
pub const FASTA_LINE_WIDTH: usize = 60;

/// One parsed FASTA record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    pub name: String,
    pub description: Option<String>,
    pub residues: Vec<u8>,
}

impl SequenceRecord {
    pub fn header(&self) -> String {
        match &self.description {
            Some(description) => format!("{} {description}", self.name),
            None => self.name.clone(),
        }
    }

    pub fn from_header(header: &str, residues: Vec<u8>) -> Self {
        let (name, description) = match header.split_once(char::is_whitespace) {
            Some((name, rest)) => (name.to_string(), Some(rest.to_string())),
            None => (header.to_string(), None),
        };
        Self {
            name,
            description,
            residues,
        }
    }
}

fn is_gzipped(path: &Utf8Path) -> bool {
    path.as_str().to_lowercase().ends_with(".gz")
}

/// Read every record from a FASTA file, transparently decompressing `.gz`.
pub fn read_records(path: &Utf8Path) -> Result<Vec<SequenceRecord>, ForgeError> {
    let file = File::open(path.as_std_path()).map_err(|err| ForgeError::SequenceRead {
        path: path.to_owned(),
        message: err.to_string(),
    })?;
    let reader: Box<dyn BufRead> = if is_gzipped(path) {
        Box::new(BufReader::new(GzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };
    let mut fasta_reader = fasta::io::Reader::new(reader);

    let mut records = Vec::new();
    for result in fasta_reader.records() {
        let record = result.map_err(|err| ForgeError::SequenceRead {
            path: path.to_owned(),
            message: err.to_string(),
        })?;
        records.push(SequenceRecord {
            name: String::from_utf8_lossy(record.name()).to_string(),
            description: record
                .description()
                .map(|description| String::from_utf8_lossy(description).to_string()),
            residues: record.sequence().as_ref().to_vec(),
        });
    }
    Ok(records)
}

/// Parse a just-fetched sequence file and confirm it holds at least one
/// record. Zero records signal a failed or truncated download and abort the
/// run. Returns the records so downstream steps avoid a second read.
pub fn validate(path: &Utf8Path) -> Result<Vec<SequenceRecord>, ForgeError> {
    let records = read_records(path)?;
    if records.is_empty() {
        return Err(ForgeError::EmptySequenceFile(path.to_owned()));
    }
    Ok(records)
}

/// Write records as gzip-compressed FASTA at the fixed line width, atomically.
pub fn write_records_gz(path: &Utf8Path, records: &[SequenceRecord]) -> Result<(), ForgeError> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    for record in records {
        writeln!(encoder, ">{}", record.header())
            .map_err(|err| ForgeError::Filesystem(err.to_string()))?;
        for chunk in record.residues.chunks(FASTA_LINE_WIDTH) {
            encoder
                .write_all(chunk)
                .and_then(|_| encoder.write_all(b"\n"))
                .map_err(|err| ForgeError::Filesystem(err.to_string()))?;
        }
    }
    let bytes = encoder
        .finish()
        .map_err(|err| ForgeError::Filesystem(err.to_string()))?;
    Workspace::write_bytes_atomic(path, &bytes)
}
