use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid pattern for rule '{name}': {source}")]
    InvalidRule {
        name: String,
        #[source]
        source: regex::Error,
    },

    /// The embedding collaborator failed. `processed` counts the lines
    /// already committed to the store when the failure happened.
    #[error("Embedding failed after {processed} processed lines: {source}")]
    Embedding {
        processed: usize,
        #[source]
        source: anyhow::Error,
    },

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("No log data has been ingested yet; upload a log file first")]
    NoData,

    #[error("Answer generation failed: {0}")]
    Generation(#[source] anyhow::Error),

    #[error("Failed to load configuration: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
