//! Error types for the wellness core

use crate::schema::ValidationError;
use thiserror::Error;

/// Errors that can occur while estimating or aggregating
#[derive(Debug, Error)]
pub enum WellnessError {
    #[error("Unknown activity: {0}")]
    UnknownActivity(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Profile weight is required to estimate calories")]
    WeightRequired,

    #[error("Failed to parse payload: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}
