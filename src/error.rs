use std::path::PathBuf;

use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum ForgeError {
    #[error("invalid chromosome id: {0:?}")]
    InvalidChromosomeId(String),

    #[error("invalid naming convention: {0} (expected ensembl or ucsc)")]
    InvalidNamingConvention(String),

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse config: {0}")]
    ConfigParse(String),

    #[error("invalid config: {0}")]
    ConfigInvalid(String),

    #[error("failed to read naming map at {0}")]
    NamingMapRead(PathBuf),

    #[error("failed to parse naming map: {0}")]
    NamingMapParse(String),

    #[error("no naming-map entry for chromosome {0}")]
    NamingMapMiss(String),

    #[error("fetch failed for {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("fetch of {url} returned status {status}")]
    FetchStatus { status: u16, url: String },

    #[error("no sequence records in {0} (download likely failed or was truncated)")]
    EmptySequenceFile(Utf8PathBuf),

    #[error("failed to read sequences from {path}: {message}")]
    SequenceRead { path: Utf8PathBuf, message: String },

    #[error("filesystem error: {0}")]
    Filesystem(String),

    #[error("required tool not found: {0}")]
    MissingTool(String),

    #[error("packaging tool failed: {0}")]
    BuildTool(String),
}
