//! # docvec-sync
//!
//! Incremental synchronization between a tree of source documents and a
//! mirrored tree of embedding records.
//!
//! ## Key Components
//!
//! - [`Reconciler`]: walks both trees, diffs them by relative path, and
//!   brings the record tree in line with the documents
//! - [`SyncReport`]: per-category counts for one reconciliation pass
//! - [`SyncError`]: error types for synchronization
//!
//! ## How a pass works
//!
//! 1. Enumerate documents under the docs directory and records under the
//!    embeddings directory
//! 2. For each document, compare its SHA-256 fingerprint against the one
//!    stored in the matching record; only new or changed documents are
//!    embedded, everything else is skipped
//! 3. Records whose document no longer exists are deleted
//!
//! Failures on individual paths are logged and counted; they never abort
//! the rest of the pass.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use docvec_embeddings::CandleEmbedder;
//! use docvec_sync::Reconciler;
//!
//! let embedder = Arc::new(CandleEmbedder::load_default()?);
//! let reconciler = Reconciler::new("./docs", "./embeddings", vec![embedder]);
//! let report = reconciler.run()?;
//! println!("{}", report);
//! ```

pub mod error;
pub mod reconcile;
pub mod report;
pub mod scan;

pub use error::SyncError;
pub use reconcile::Reconciler;
pub use report::{Disposition, SyncReport};
pub use scan::{scan_tree, swap_extension};
