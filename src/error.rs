use std::path::PathBuf;
use thiserror::Error;

/// Fatal pipeline failures. Per-file and per-row problems are absorbed into
/// the `IngestionReport` instead and never reach this type.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// No valid rows survived ingestion, or an aggregate was requested over
    /// zero rows.
    #[error("empty dataset: {0}")]
    EmptyDataset(String),

    #[error("failed to write {path}: {reason}")]
    OutputWrite { path: PathBuf, reason: String },
}

/// Why one input file could not be normalized. Recorded per file in the
/// `IngestionReport`; never aborts the run.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// The file vanished between discovery and read.
    #[error("missing")]
    Missing,

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("{0}")]
    Read(String),
}
