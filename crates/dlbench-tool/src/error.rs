//! Error types for tool identification.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown tool '{0}': expected one of hydra, aria2c, curl, wget")]
    UnknownTool(String),

    #[error("unknown piece selector '{0}': expected inorder or random")]
    UnknownSelector(String),

    #[error("unknown file allocation '{0}': expected none, trunc or falloc")]
    UnknownAllocation(String),
}

pub type Result<T> = std::result::Result<T, Error>;
