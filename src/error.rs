//! # Error Types
//!
//! Typed failures for the ranking engine. Structural problems with the
//! catalog or the taste profile abort a run; per-track numeric problems
//! ([`RadioError::InvalidFeatureVector`]) are recovered by the pipeline and
//! reported next to the ranking instead.

use thiserror::Error;

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, RadioError>;

/// Everything that can go wrong while loading, scoring, ranking or
/// summarizing a catalog.
#[derive(Error, Debug)]
pub enum RadioError {
    /// Catalog is missing required columns or contains unreadable values
    #[error("Malformed catalog: {0}")]
    MalformedCatalog(String),

    /// Taste profile is missing fields or carries invalid weights
    #[error("Malformed profile: {0}")]
    MalformedProfile(String),

    /// A single track's numeric features are not finite after normalization
    #[error("Invalid feature vector for `{id}': {reason}")]
    InvalidFeatureVector { id: String, reason: String },

    /// Nothing left to summarize or rank
    #[error("Catalog contains no usable tracks")]
    EmptyCatalog,

    /// A tunable is out of its documented range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl RadioError {
    /// Whether the pipeline may drop the offending row and keep going.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::InvalidFeatureVector { .. })
    }
}
