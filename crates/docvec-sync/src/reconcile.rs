//! The reconciliation pass.
//!
//! Diffs the document tree against the record tree by relative path and
//! stored fingerprint, embeds only what is new or stale, and deletes
//! records whose document is gone. One run is a single synchronous pass;
//! callers are responsible for not running two passes against the same
//! embeddings directory at once.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use docvec_embeddings::EmbeddingModel;
use docvec_types::{fingerprint_bytes, headline, EmbeddingRecord};

use crate::error::SyncError;
use crate::report::{Disposition, SyncReport};
use crate::scan::{scan_tree, swap_extension};

/// Keeps a tree of embedding records consistent with a document tree.
///
/// A record exists for a path if and only if a document exists at that
/// path, and its stored fingerprint matches the current document; both
/// invariants hold after `run` returns (failed paths excepted).
pub struct Reconciler {
    docs_dir: PathBuf,
    embeddings_dir: PathBuf,
    doc_extension: String,
    artifact_extension: String,
    models: Vec<Arc<dyn EmbeddingModel>>,
    dry_run: bool,
}

impl Reconciler {
    /// Create a reconciler with the default `md` -> `json` extensions.
    pub fn new(
        docs_dir: impl Into<PathBuf>,
        embeddings_dir: impl Into<PathBuf>,
        models: Vec<Arc<dyn EmbeddingModel>>,
    ) -> Self {
        Self {
            docs_dir: docs_dir.into(),
            embeddings_dir: embeddings_dir.into(),
            doc_extension: "md".to_string(),
            artifact_extension: "json".to_string(),
            models,
            dry_run: false,
        }
    }

    /// Set the document and record file extensions (without dots).
    pub fn with_extensions(
        mut self,
        doc_extension: impl Into<String>,
        artifact_extension: impl Into<String>,
    ) -> Self {
        self.doc_extension = doc_extension.into();
        self.artifact_extension = artifact_extension.into();
        self
    }

    /// Classify and report only; no writes, deletes, or embedding calls.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Run one full reconciliation pass.
    ///
    /// Per-path failures are logged, counted in the report, and skipped;
    /// the pass only aborts when a tree cannot be enumerated at all. The
    /// docs tree is never written to.
    pub fn run(&self) -> Result<SyncReport, SyncError> {
        if !self.docs_dir.is_dir() {
            return Err(SyncError::DocsDirNotFound(self.docs_dir.clone()));
        }

        let docs = scan_tree(&self.docs_dir, &self.doc_extension)?;
        info!(count = docs.len(), path = %self.docs_dir.display(), "Scanned documents");

        let records = if self.embeddings_dir.is_dir() {
            scan_tree(&self.embeddings_dir, &self.artifact_extension)?
        } else {
            BTreeSet::new()
        };

        if !self.dry_run {
            fs::create_dir_all(&self.embeddings_dir)?;
        }

        let mut report = SyncReport::new();

        for doc_rel in &docs {
            match self.process_document(doc_rel) {
                Ok(disposition) => report.record(disposition),
                Err(e) => {
                    warn!(path = %doc_rel.display(), error = %e, "Failed to process document");
                    report.failed += 1;
                }
            }
        }

        // A record is expected for every current document, including ones
        // that just failed; their stale records must survive the cleanup.
        let expected: BTreeSet<PathBuf> = docs
            .iter()
            .filter_map(|d| swap_extension(d, &self.doc_extension, &self.artifact_extension))
            .collect();

        for orphan in records.difference(&expected) {
            match self.delete_orphan(orphan) {
                Ok(()) => report.deleted += 1,
                Err(e) => {
                    warn!(path = %orphan.display(), error = %e, "Failed to delete orphaned record");
                    report.failed += 1;
                }
            }
        }

        info!(%report, dry_run = self.dry_run, "Reconciliation complete");
        Ok(report)
    }

    /// Classify one document and, unless unchanged or in dry-run, embed
    /// and persist its record.
    fn process_document(&self, doc_rel: &Path) -> Result<Disposition, SyncError> {
        let artifact_rel =
            swap_extension(doc_rel, &self.doc_extension, &self.artifact_extension)
                .ok_or_else(|| SyncError::NonUnicodePath(doc_rel.to_path_buf()))?;

        let doc_path = self.docs_dir.join(doc_rel);
        let artifact_path = self.embeddings_dir.join(&artifact_rel);

        let bytes = fs::read(&doc_path)?;
        let shasum = fingerprint_bytes(&bytes);

        let disposition = self.classify(&artifact_path, &shasum);
        if disposition == Disposition::Unchanged {
            debug!(path = %doc_rel.display(), "Unchanged, skipping");
            return Ok(disposition);
        }

        if self.dry_run {
            return Ok(disposition);
        }

        let content = String::from_utf8(bytes)
            .map_err(|_| SyncError::InvalidUtf8(doc_path.clone()))?;
        self.derive_and_write(doc_rel, &artifact_path, &content, &shasum)?;
        Ok(disposition)
    }

    /// Decide whether a document needs (re)embedding by comparing its
    /// fingerprint against the stored one. Any failure to read or parse
    /// the existing record forces recomputation rather than staleness.
    fn classify(&self, artifact_path: &Path, shasum: &str) -> Disposition {
        if !artifact_path.exists() {
            return Disposition::New;
        }

        let stored = fs::read(artifact_path)
            .map_err(SyncError::from)
            .and_then(|bytes| EmbeddingRecord::from_bytes(&bytes).map_err(SyncError::from));

        match stored {
            Ok(record) if record.shasum == shasum => Disposition::Unchanged,
            Ok(_) => Disposition::Changed,
            Err(e) => {
                debug!(path = %artifact_path.display(), error = %e, "Unreadable record, reprocessing");
                Disposition::Changed
            }
        }
    }

    /// Embed a document and atomically persist its record.
    fn derive_and_write(
        &self,
        doc_rel: &Path,
        artifact_path: &Path,
        content: &str,
        shasum: &str,
    ) -> Result<(), SyncError> {
        info!(path = %doc_rel.display(), "Processing");

        let headline = headline(content);

        let mut embeddings = BTreeMap::new();
        for model in &self.models {
            let embedding = model.embed(content)?;
            embeddings.insert(model.info().name.clone(), embedding.values);
        }

        let record = EmbeddingRecord::new(embeddings, shasum, headline);
        let bytes = record.to_bytes()?;

        let parent = artifact_path.parent().unwrap_or(&self.embeddings_dir);
        fs::create_dir_all(parent)?;

        // Write to a temp file in the destination directory, then rename
        // into place; a crash mid-write never leaves a partial record.
        let mut tmp = NamedTempFile::new_in(parent)?;
        tmp.write_all(&bytes)?;
        tmp.persist(artifact_path).map_err(|e| SyncError::Io(e.error))?;

        debug!(path = %artifact_path.display(), "Saved embedding record");
        Ok(())
    }

    /// Delete one orphaned record and prune any directories it leaves
    /// empty.
    fn delete_orphan(&self, orphan_rel: &Path) -> Result<(), SyncError> {
        if self.dry_run {
            return Ok(());
        }

        let path = self.embeddings_dir.join(orphan_rel);
        info!(path = %orphan_rel.display(), "Deleting orphaned record");
        fs::remove_file(&path)?;
        self.prune_empty_parents(&path);
        Ok(())
    }

    /// Remove empty directories above a deleted record, stopping at the
    /// embeddings root or the first non-empty directory.
    fn prune_empty_parents(&self, deleted: &Path) {
        let mut dir = deleted.parent();
        while let Some(d) = dir {
            if d == self.embeddings_dir {
                break;
            }
            // remove_dir refuses non-empty directories, ending the walk
            if fs::remove_dir(d).is_err() {
                break;
            }
            debug!(path = %d.display(), "Removed empty directory");
            dir = d.parent();
        }
    }
}
