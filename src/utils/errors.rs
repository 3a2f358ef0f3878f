//! Structural errors (spec.md §7). A missing file, a missing required
//! column, or a malformed CSV stream are fatal — the driver cannot proceed
//! without them. A row simply failing to match a drug code is never an
//! error; it is a [`crate::models::reason::MatchOutcome`].

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("input file not found: {path}")]
    MissingFile { path: PathBuf },

    #[error("required column `{column}` missing from {file}")]
    MissingColumn { file: String, column: String },

    #[error("csv error reading {file}: {source}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type MatchResult<T> = Result<T, MatchError>;
