//! Synchronization error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during a reconciliation pass.
///
/// Only tree-level failures abort a run; per-document errors are logged,
/// counted in the report, and the pass continues.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Docs directory missing or not a directory
    #[error("Docs directory not found: {0:?}")]
    DocsDirNotFound(PathBuf),

    /// Failure while walking a tree
    #[error("Failed to walk {path:?}: {source}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },

    /// Relative path cannot be mapped between trees
    #[error("Path is not valid unicode: {0:?}")]
    NonUnicodePath(PathBuf),

    /// Document bytes are not valid UTF-8
    #[error("Document is not valid UTF-8: {0:?}")]
    InvalidUtf8(PathBuf),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Record serialization error
    #[error(transparent)]
    Record(#[from] docvec_types::DocvecError),

    /// Embedding generation error
    #[error(transparent)]
    Embedding(#[from] docvec_embeddings::EmbeddingError),
}
