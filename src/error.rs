//! Error types

use thiserror::Error;

/// The only user-facing error: the requested countdown cannot be started.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInputError {
    #[error("minutes field is not a non-negative integer: {0:?}")]
    Minutes(String),
    #[error("seconds field is not a non-negative integer: {0:?}")]
    Seconds(String),
    #[error("countdown total must be positive, got {0}s")]
    NonPositive(i64),
    #[error("no time entered and no time accumulated")]
    NothingToStart,
}

/// Infrastructure failures surfaced by the application state
#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to lock {0}")]
    Poisoned(&'static str),
    #[error(transparent)]
    InvalidInput(#[from] InvalidInputError),
}
