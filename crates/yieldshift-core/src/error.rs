//! Error types for the YieldShift scoring system.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Expected a JSON object for {field}")]
    NotAnObject { field: &'static str },

    #[error("Non-finite value for {field}")]
    NonFinite { field: &'static str },
}

pub type Result<T> = std::result::Result<T, Error>;
