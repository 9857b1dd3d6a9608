//! # docvec-types
//!
//! Shared domain types for the docvec embedding synchronizer.
//!
//! This crate defines the data structures used throughout the system:
//! - [`EmbeddingRecord`]: the persisted per-document artifact
//! - Fingerprints: SHA-256 content digests used for change detection
//! - [`Settings`]: layered configuration
//!
//! ## Usage
//!
//! ```rust
//! use docvec_types::fingerprint_bytes;
//!
//! let digest = fingerprint_bytes(b"Hello\nWorld");
//! assert_eq!(digest.len(), 64);
//! ```

pub mod artifact;
pub mod config;
pub mod error;
pub mod fingerprint;

pub use artifact::EmbeddingRecord;
pub use config::{ModelSettings, Settings};
pub use error::DocvecError;
pub use fingerprint::{fingerprint_bytes, headline};
