//! docvec CLI library exports.
//!
//! This crate provides the `docvec` binary.
//!
//! # Modules
//!
//! - `cli`: Command-line argument parsing with clap
//! - `commands`: Command implementations (sync, status)

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands};
pub use commands::{run_status, run_sync};
