//! docvec
//!
//! Keeps a tree of embedding records synchronized with a tree of source
//! documents, re-embedding only what changed.
//!
//! # Usage
//!
//! ```bash
//! docvec sync [--docs-dir DIR] [--embeddings-dir DIR] [--dry-run]
//! docvec status
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/docvec/config.toml)
//! 3. Environment variables (DOCVEC_*)
//! 4. CLI flags

use anyhow::Result;
use clap::Parser;

use docvec_cli::{run_status, run_sync, Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Sync {
            docs_dir,
            embeddings_dir,
            dry_run,
        } => {
            run_sync(
                cli.config.as_deref(),
                cli.log_level.as_deref(),
                docs_dir.as_deref(),
                embeddings_dir.as_deref(),
                dry_run,
            )?;
        }
        Commands::Status {
            docs_dir,
            embeddings_dir,
        } => {
            run_status(
                cli.config.as_deref(),
                cli.log_level.as_deref(),
                docs_dir.as_deref(),
                embeddings_dir.as_deref(),
            )?;
        }
    }

    Ok(())
}
