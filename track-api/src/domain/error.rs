use thiserror::Error;

use super::models::ActivityId;

/// Errors that can occur during activity operations.
#[derive(Debug, Error)]
pub enum ActivityError {
    #[error("activity not found: {0}")]
    NotFound(ActivityId),
    #[error("invalid activity: {0}")]
    Validation(String),
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("{0}")]
    Unknown(String),
}

impl ActivityError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }
}
