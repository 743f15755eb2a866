//! jobsim error taxonomy.
//!
//! Four kinds, matching the error handling design: input errors (bad
//! CLI arguments, unreadable files), configuration inconsistencies
//! (caught at load time), invariant violations (kernel bugs, fatal),
//! and I/O/JSON plumbing errors surfaced from the filesystem layer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum JobsimError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("input error: {0}")]
    Input(String),

    #[error("invariant violation: {0}")]
    Invariant(String),
}

pub type Result<T> = std::result::Result<T, JobsimError>;
