//! Error types for scoring and prediction.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoringError {
    #[error(transparent)]
    Core(#[from] yieldshift_core::Error),

    #[error("Opportunity at index {index} is not a JSON object")]
    NotAnObject { index: usize },
}

#[derive(Error, Debug)]
pub enum PredictionError {
    #[error("Missing field: {field}")]
    MissingField { field: &'static str },

    #[error("Field {field} must be a string")]
    NotAString { field: &'static str },

    #[error("Prediction request is not a JSON object")]
    NotAnObject,
}

pub type ScoringResult<T> = std::result::Result<T, ScoringError>;
pub type PredictionResult<T> = std::result::Result<T, PredictionError>;
