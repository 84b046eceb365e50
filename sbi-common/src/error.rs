//! Common error types for SBI
//!
//! Four failure families matter to callers:
//! - `Config`: malformed or incomplete rubric/settings, fatal at startup
//! - `Validation`: incomplete or inconsistent session state, blocks one transition
//! - `Persistence`: draft or report I/O failure, in-memory state is preserved
//! - `Lookup`: unknown track or trait referenced, a data-consistency bug

use std::path::PathBuf;
use thiserror::Error;

/// Common result type for SBI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the SBI crates
#[derive(Error, Debug)]
pub enum Error {
    /// Rubric or settings loading/validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Session state rejected by a transition or the finalization gate
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Draft or report could not be written or read back
    #[error("Persistence error at {}: {reason}", path.display())]
    Persistence { path: PathBuf, reason: String },

    /// Unknown track or trait id referenced
    #[error("Lookup error: {0}")]
    Lookup(String),

    /// Command issued on a screen that does not permit it
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a persistence error from any displayable cause
    pub fn persistence(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        Error::Persistence {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Named reasons a session is rejected
///
/// Shared by the trait-screen check (leaving a trait) and the finalization
/// gate, so the interviewer sees the same wording in both places.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Candidate Name is required.")]
    MissingCandidateName,

    #[error("Interview Date must be valid YYYY-MM-DD (got '{0}').")]
    InvalidInterviewDate(String),

    #[error("School selection is required.")]
    MissingLocation,

    #[error("Track selection is required.")]
    MissingTrack,

    #[error("Unknown track: '{0}'.")]
    UnknownTrack(String),

    #[error("Track '{0}' has no applicable traits.")]
    NoTraitsForTrack(String),

    #[error("Raw score is required (select 1-5) for trait: {trait_name}")]
    MissingRawScore { trait_id: String, trait_name: String },

    #[error("Trait '{trait_name}' has disqualifier checked but no verbatim notes.")]
    MissingVerbatimEvidence { trait_id: String, trait_name: String },
}
