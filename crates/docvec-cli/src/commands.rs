//! Command implementations for the docvec CLI.
//!
//! Handles:
//! - sync: load config, build the embedder, run one reconciliation pass
//! - status: classify pending work without touching anything

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::info;

use docvec_embeddings::{CandleEmbedder, EmbeddingModel, ModelCache};
use docvec_sync::{Reconciler, SyncReport};
use docvec_types::Settings;

/// Load settings and apply CLI overrides (highest precedence).
fn load_settings(
    config_path: Option<&str>,
    log_level_override: Option<&str>,
    docs_dir_override: Option<&str>,
    embeddings_dir_override: Option<&str>,
) -> Result<Settings> {
    let mut settings = Settings::load(config_path).context("Failed to load configuration")?;

    if let Some(log_level) = log_level_override {
        settings.log_level = log_level.to_string();
    }
    if let Some(docs_dir) = docs_dir_override {
        settings.docs_dir = docs_dir.to_string();
    }
    if let Some(embeddings_dir) = embeddings_dir_override {
        settings.embeddings_dir = embeddings_dir.to_string();
    }

    settings.validate().context("Invalid configuration")?;
    Ok(settings)
}

/// Initialize logging. RUST_LOG overrides the configured level.
fn init_logging(log_level: &str) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Build the configured embedding model.
fn load_embedder(settings: &Settings) -> Result<Arc<dyn EmbeddingModel>> {
    let mut cache = ModelCache::default();
    cache.repo_id = settings.model.repo_id.clone();
    if let Some(dir) = &settings.model.cache_dir {
        cache.cache_dir = Settings::expand_path(dir);
    }

    let embedder = CandleEmbedder::load(&cache).context("Failed to load embedding model")?;
    Ok(Arc::new(embedder))
}

/// Build a reconciler from settings.
fn reconciler(settings: &Settings, models: Vec<Arc<dyn EmbeddingModel>>) -> Reconciler {
    Reconciler::new(settings.docs_path(), settings.embeddings_path(), models).with_extensions(
        settings.doc_extension.clone(),
        settings.artifact_extension.clone(),
    )
}

/// Print the run summary.
fn print_report(report: &SyncReport) {
    println!("{}", report);
}

/// Run one synchronization pass.
///
/// Returns an error (non-zero exit) when any per-path failure occurred,
/// after completed work has been preserved and reported.
pub fn run_sync(
    config_path: Option<&str>,
    log_level: Option<&str>,
    docs_dir: Option<&str>,
    embeddings_dir: Option<&str>,
    dry_run: bool,
) -> Result<()> {
    let settings = load_settings(config_path, log_level, docs_dir, embeddings_dir)?;
    init_logging(&settings.log_level);

    info!(
        docs_dir = %settings.docs_dir,
        embeddings_dir = %settings.embeddings_dir,
        dry_run = dry_run,
        "Starting synchronization"
    );

    // Dry runs never embed, so skip loading the model
    let models = if dry_run {
        Vec::new()
    } else {
        vec![load_embedder(&settings)?]
    };

    let report = reconciler(&settings, models)
        .with_dry_run(dry_run)
        .run()
        .context("Synchronization failed")?;

    print_report(&report);

    if report.has_failures() {
        bail!("{} path(s) failed; see log for details", report.failed);
    }
    Ok(())
}

/// Show pending work without modifying anything.
pub fn run_status(
    config_path: Option<&str>,
    log_level: Option<&str>,
    docs_dir: Option<&str>,
    embeddings_dir: Option<&str>,
) -> Result<()> {
    let settings = load_settings(config_path, log_level, docs_dir, embeddings_dir)?;
    init_logging(&settings.log_level);

    let report = reconciler(&settings, Vec::new())
        .with_dry_run(true)
        .run()
        .context("Status check failed")?;

    println!(
        "pending: {} to embed, {} to delete, {} up to date",
        report.processed(),
        report.deleted,
        report.unchanged
    );

    if report.has_failures() {
        bail!("{} path(s) could not be inspected", report.failed);
    }
    Ok(())
}
