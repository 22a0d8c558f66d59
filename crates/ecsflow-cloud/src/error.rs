//! Gateway and lifecycle error types

use thiserror::Error;

/// Errors surfaced by the gateway and the lifecycle core.
///
/// None of these are caught and converted within the core; every failure
/// bubbles to the top-level invocation.
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Malformed provenance tag: {0}")]
    MalformedTag(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Command execution failed: {0}")]
    CommandFailed(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CloudError>;
