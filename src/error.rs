use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EcgError {
    #[error("Unable to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed delimited text in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Unable to write results to {}: {source}", path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid ground truth index {token:?} in {}", path.display())]
    InvalidGroundTruth { path: PathBuf, token: String },

    #[error("No recordings found under {}", .0.display())]
    NoRecordings(PathBuf),

    #[error("Failed to write CSV summary: {0}")]
    Summary(#[from] csv::Error),

    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, EcgError>;
