//! Error types for eventide-core.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("duplicate node: {0}")]
    DuplicateNode(String),
}

pub type Result<T> = std::result::Result<T, Error>;
