//! Error types for the editor

use pagecraft_schema::{PatchError, SchemaError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Invalid schema: {0}")]
    Schema(#[from] SchemaError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),
}

/// Local cache failures
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt cache entry: {0}")]
    Json(#[from] serde_json::Error),
}

/// Document store failures
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Patch rejected: {0}")]
    Patch(#[from] PatchError),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}
