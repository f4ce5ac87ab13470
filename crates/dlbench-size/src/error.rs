//! Error types for dlbench-size.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SizeError {
    #[error("size request timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("size request failed: {0}")]
    Request(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, SizeError>;
