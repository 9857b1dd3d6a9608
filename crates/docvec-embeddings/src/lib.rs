//! # docvec-embeddings
//!
//! Local embedding generation for docvec using Candle.
//!
//! This crate is the derivation seam of the synchronizer: the reconciler
//! only sees the [`EmbeddingModel`] trait, so the Candle-backed embedder can
//! be swapped for any other implementation (or the [`MockEmbedder`] in
//! tests) without affecting synchronization behavior.
//!
//! ## Features
//! - Local inference via Candle (no Python, no API)
//! - intfloat/e5-large-v2 model (1024 dimensions)
//! - Automatic model file caching
//! - Deterministic mock embedder for tests

pub mod cache;
pub mod candle;
pub mod error;
pub mod mock;
pub mod model;

pub use crate::candle::CandleEmbedder;
pub use cache::{get_or_download_model, ModelCache, ModelPaths, DEFAULT_MODEL_REPO, MODEL_FILES};
pub use error::EmbeddingError;
pub use mock::MockEmbedder;
pub use model::{Embedding, EmbeddingModel, ModelInfo};
