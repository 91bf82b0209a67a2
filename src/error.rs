use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while building or synthesizing a stack.
#[derive(Debug, Error)]
pub enum SynthError {
    #[error("construct id {id:?} already taken in stack {stack:?}")]
    DuplicateId { stack: String, id: String },

    #[error("method {method} already attached to resource {path:?}")]
    DuplicateMethod { path: String, method: &'static str },

    #[error("invalid path part {0:?}")]
    InvalidPathPart(String),

    #[error("code asset not found: {}", .path.display())]
    AssetNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub(crate) type Result<T> = std::result::Result<T, SynthError>;
