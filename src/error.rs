//! Error type shared by the loading and averaging stages.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoreError {
    /// Records that violate the data model (no subjects, bad name, empty list).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScoreError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        ScoreError::InvalidInput(msg.into())
    }
}
