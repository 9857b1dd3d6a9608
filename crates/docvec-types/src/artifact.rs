//! Persisted embedding record format.
//!
//! One record is written per source document, in a tree that mirrors the
//! document tree by relative path. The stored `shasum` is what the next
//! reconciliation run compares against the current document fingerprint.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::DocvecError;

/// Persisted artifact for a single document.
///
/// Exactly three fields. Unknown or missing fields are a deserialization
/// error; the reconciler treats any such failure as a changed document and
/// recomputes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmbeddingRecord {
    /// Vector per embedding model, keyed by model name
    pub embeddings: BTreeMap<String, Vec<f32>>,

    /// SHA-256 hex digest of the source document bytes
    pub shasum: String,

    /// First line of the source document at derivation time
    pub headline: String,
}

impl EmbeddingRecord {
    /// Create a new record.
    pub fn new(
        embeddings: BTreeMap<String, Vec<f32>>,
        shasum: impl Into<String>,
        headline: impl Into<String>,
    ) -> Self {
        Self {
            embeddings,
            shasum: shasum.into(),
            headline: headline.into(),
        }
    }

    /// Serialize to pretty-printed JSON bytes for storage.
    pub fn to_bytes(&self) -> Result<Vec<u8>, DocvecError> {
        serde_json::to_vec_pretty(self).map_err(DocvecError::from)
    }

    /// Deserialize from JSON bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DocvecError> {
        serde_json::from_slice(bytes).map_err(DocvecError::from)
    }
}
