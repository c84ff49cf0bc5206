//! Error types for Vertex Pop.
//!
//! Nothing in the simulation core is fatal. These errors only cross the
//! session boundary: a missing level tells the caller to navigate elsewhere,
//! and collaborator failures are logged and dropped.

use thiserror::Error;

/// Unified error type.
#[derive(Debug, Error)]
pub enum GameError {
    /// Requested level index is outside the catalogue.
    #[error("Level {0} does not exist")]
    LevelNotFound(usize),

    /// A tuning value is out of its valid range.
    #[error("Invalid tuning: {0}")]
    InvalidTuning(String),

    /// A level definition cannot be simulated.
    #[error("Invalid level: {0}")]
    InvalidLevel(String),

    /// Progress store failure.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Audio sink failure.
    #[error("Audio error: {0}")]
    Audio(String),

    /// Browser API unavailable.
    #[error("Platform error: {0}")]
    Platform(String),

    /// JSON encode/decode failure.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience alias for `Result<T, GameError>`.
pub type GameResult<T> = Result<T, GameError>;
