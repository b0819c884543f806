use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the crackplot pipelines.
#[derive(Error, Debug)]
pub enum CrackError {
    /// An input file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A config file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A config file is not valid JSON for the expected schema.
    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The policy example list is empty.
    #[error("No composition policies given; pass at least one example with -p")]
    NoPolicies,

    /// A corpus line has no `<identifier>:<password>` shape (strict mode only).
    #[error("Malformed corpus line {line_number} in {path}: {line:?}")]
    MalformedLine {
        path: PathBuf,
        line_number: usize,
        line: String,
    },

    /// None of the inputs produced a single usable record.
    #[error("No valid records found in {0} input file(s)")]
    NoRecords(usize),
}

/// Convenience alias used throughout the crackplot crates.
pub type Result<T> = std::result::Result<T, CrackError>;
