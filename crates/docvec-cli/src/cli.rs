//! CLI argument parsing for docvec.
//!
//! CLI flags override all other config sources.

use clap::{Parser, Subcommand};

/// docvec
///
/// Keeps a tree of embedding records synchronized with a tree of source
/// documents, re-embedding only what changed.
#[derive(Parser, Debug)]
#[command(name = "docvec")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default ~/.config/docvec/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// docvec commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one synchronization pass
    Sync {
        /// Override the documents directory
        #[arg(long)]
        docs_dir: Option<String>,

        /// Override the embeddings directory
        #[arg(long)]
        embeddings_dir: Option<String>,

        /// Classify and report without writing, deleting, or embedding
        #[arg(long)]
        dry_run: bool,
    },

    /// Show pending work without modifying anything
    Status {
        /// Override the documents directory
        #[arg(long)]
        docs_dir: Option<String>,

        /// Override the embeddings directory
        #[arg(long)]
        embeddings_dir: Option<String>,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
