//! Integration tests for the reconciliation pass.
//!
//! These tests drive the full sync workflow over real temp directories
//! with the deterministic mock embedder.

use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use docvec_embeddings::{EmbeddingModel, MockEmbedder};
use docvec_sync::Reconciler;
use docvec_types::{fingerprint_bytes, EmbeddingRecord};

/// Test harness holding a docs/embeddings directory pair and the mock.
struct TestHarness {
    _temp_dir: TempDir,
    docs_dir: PathBuf,
    embeddings_dir: PathBuf,
    embedder: Arc<MockEmbedder>,
}

impl TestHarness {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let docs_dir = temp_dir.path().join("docs");
        let embeddings_dir = temp_dir.path().join("embeddings");
        std::fs::create_dir_all(&docs_dir).unwrap();

        Self {
            _temp_dir: temp_dir,
            docs_dir,
            embeddings_dir,
            embedder: Arc::new(MockEmbedder::new()),
        }
    }

    fn with_embedder(embedder: MockEmbedder) -> Self {
        let mut harness = Self::new();
        harness.embedder = Arc::new(embedder);
        harness
    }

    fn reconciler(&self) -> Reconciler {
        Reconciler::new(
            &self.docs_dir,
            &self.embeddings_dir,
            vec![self.embedder.clone() as Arc<dyn EmbeddingModel>],
        )
    }

    fn write_doc(&self, rel: &str, content: &str) {
        let path = self.docs_dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn delete_doc(&self, rel: &str) {
        std::fs::remove_file(self.docs_dir.join(rel)).unwrap();
    }

    fn artifact_path(&self, rel: &str) -> PathBuf {
        self.embeddings_dir.join(rel)
    }

    fn read_record(&self, rel: &str) -> EmbeddingRecord {
        let bytes = std::fs::read(self.artifact_path(rel)).unwrap();
        EmbeddingRecord::from_bytes(&bytes).unwrap()
    }
}

#[test]
fn test_new_file_materialization() {
    let harness = TestHarness::new();
    harness.write_doc("a.md", "Hello\nWorld");

    let report = harness.reconciler().run().unwrap();

    assert_eq!(report.new, 1);
    assert_eq!(report.changed, 0);
    assert_eq!(report.failed, 0);

    let record = harness.read_record("a.json");
    assert_eq!(record.headline, "Hello");
    assert_eq!(record.shasum, fingerprint_bytes(b"Hello\nWorld"));

    // Vector matches what the embedder produces for the full text
    let expected = MockEmbedder::new().embed("Hello\nWorld").unwrap();
    assert_eq!(record.embeddings["mock-embedder"], expected.values);
}

#[test]
fn test_idempotence_second_run_embeds_nothing() {
    let harness = TestHarness::new();
    harness.write_doc("a.md", "Hello\nWorld");
    harness.write_doc("guide/b.md", "# Guide\nmore");

    harness.reconciler().run().unwrap();
    let calls_after_first = harness.embedder.call_count();
    assert_eq!(calls_after_first, 2);

    let report = harness.reconciler().run().unwrap();

    assert_eq!(harness.embedder.call_count(), calls_after_first);
    assert_eq!(report.unchanged, 2);
    assert_eq!(report.processed(), 0);
}

#[test]
fn test_change_detection_reembeds_once() {
    let harness = TestHarness::new();
    harness.write_doc("a.md", "original content");
    harness.reconciler().run().unwrap();
    let calls_before = harness.embedder.call_count();

    harness.write_doc("a.md", "updated content");
    let report = harness.reconciler().run().unwrap();

    assert_eq!(report.changed, 1);
    assert_eq!(harness.embedder.call_count(), calls_before + 1);
    assert_eq!(
        harness.read_record("a.json").shasum,
        fingerprint_bytes(b"updated content")
    );
}

#[test]
fn test_unchanged_artifact_untouched_byte_for_byte() {
    let harness = TestHarness::new();
    harness.write_doc("a.md", "stable content");
    harness.reconciler().run().unwrap();

    let bytes_before = std::fs::read(harness.artifact_path("a.json")).unwrap();
    let calls_before = harness.embedder.call_count();

    let report = harness.reconciler().run().unwrap();

    assert_eq!(report.unchanged, 1);
    assert_eq!(harness.embedder.call_count(), calls_before);
    let bytes_after = std::fs::read(harness.artifact_path("a.json")).unwrap();
    assert_eq!(bytes_before, bytes_after);
}

#[test]
fn test_cleanup_deletes_only_orphans() {
    let harness = TestHarness::new();
    harness.write_doc("a.md", "keep me");
    harness.write_doc("b.md", "delete me");
    harness.reconciler().run().unwrap();

    harness.delete_doc("b.md");
    let report = harness.reconciler().run().unwrap();

    assert_eq!(report.deleted, 1);
    assert!(!harness.artifact_path("b.json").exists());
    assert!(harness.artifact_path("a.json").exists());
}

#[test]
fn test_cleanup_prunes_empty_directories() {
    let harness = TestHarness::new();
    harness.write_doc("guide/deep/c.md", "nested");
    harness.reconciler().run().unwrap();
    assert!(harness.artifact_path("guide/deep/c.json").exists());

    harness.delete_doc("guide/deep/c.md");
    std::fs::remove_dir_all(harness.docs_dir.join("guide")).unwrap();
    harness.reconciler().run().unwrap();

    assert!(!harness.embeddings_dir.join("guide").exists());
    assert!(harness.embeddings_dir.exists());
}

#[test]
fn test_failure_isolation() {
    let harness = TestHarness::with_embedder(MockEmbedder::new().fail_on("BOOM"));

    // Give c an existing record so we can check it survives the failure
    harness.write_doc("c.md", "fine for now");
    harness.reconciler().run().unwrap();
    let stale_bytes = std::fs::read(harness.artifact_path("c.json")).unwrap();

    harness.write_doc("c.md", "this one goes BOOM");
    harness.write_doc("d.md", "healthy document");
    let report = harness.reconciler().run().unwrap();

    assert_eq!(report.failed, 1);
    assert!(report.has_failures());

    // d was processed despite c failing
    let d = harness.read_record("d.json");
    assert_eq!(d.shasum, fingerprint_bytes(b"healthy document"));

    // c's prior record is intact, not deleted and not corrupted
    let c_bytes = std::fs::read(harness.artifact_path("c.json")).unwrap();
    assert_eq!(c_bytes, stale_bytes);
}

#[test]
fn test_record_roundtrip_through_disk() {
    let harness = TestHarness::new();
    harness.write_doc("a.md", "# Title\nbody");
    harness.reconciler().run().unwrap();

    let record = harness.read_record("a.json");
    let reparsed = EmbeddingRecord::from_bytes(&record.to_bytes().unwrap()).unwrap();
    assert_eq!(record, reparsed);
}

#[test]
fn test_corrupt_record_forces_recompute() {
    let harness = TestHarness::new();
    harness.write_doc("a.md", "content");
    harness.reconciler().run().unwrap();
    let calls_before = harness.embedder.call_count();

    std::fs::write(harness.artifact_path("a.json"), b"{not valid json").unwrap();
    let report = harness.reconciler().run().unwrap();

    assert_eq!(report.changed, 1);
    assert_eq!(harness.embedder.call_count(), calls_before + 1);
    // The record is valid again afterwards
    let record = harness.read_record("a.json");
    assert_eq!(record.shasum, fingerprint_bytes(b"content"));
}

#[test]
fn test_record_missing_fingerprint_forces_recompute() {
    let harness = TestHarness::new();
    harness.write_doc("a.md", "content");
    harness.reconciler().run().unwrap();

    std::fs::write(
        harness.artifact_path("a.json"),
        br#"{"embeddings":{},"headline":"content"}"#,
    )
    .unwrap();
    let report = harness.reconciler().run().unwrap();

    assert_eq!(report.changed, 1);
}

#[test]
fn test_missing_docs_dir_is_fatal() {
    let temp = TempDir::new().unwrap();
    let docs = temp.path().join("missing");
    let embeddings = temp.path().join("embeddings");
    std::fs::create_dir_all(&embeddings).unwrap();
    std::fs::write(embeddings.join("a.json"), b"{}").unwrap();

    let embedder = Arc::new(MockEmbedder::new());
    let reconciler = Reconciler::new(&docs, &embeddings, vec![embedder as Arc<dyn EmbeddingModel>]);

    assert!(reconciler.run().is_err());
    // Aborted before any artifact mutation
    assert!(embeddings.join("a.json").exists());
}

#[test]
fn test_missing_embeddings_dir_is_created() {
    let harness = TestHarness::new();
    harness.write_doc("a.md", "content");
    assert!(!harness.embeddings_dir.exists());

    let report = harness.reconciler().run().unwrap();

    assert_eq!(report.new, 1);
    assert!(harness.artifact_path("a.json").exists());
}

#[test]
fn test_nested_tree_is_mirrored() {
    let harness = TestHarness::new();
    harness.write_doc("a.md", "root");
    harness.write_doc("guide/b.md", "one deep");
    harness.write_doc("guide/sub/c.md", "two deep");

    let report = harness.reconciler().run().unwrap();

    assert_eq!(report.new, 3);
    assert!(harness.artifact_path("a.json").exists());
    assert!(harness.artifact_path("guide/b.json").exists());
    assert!(harness.artifact_path("guide/sub/c.json").exists());
}

#[test]
fn test_non_document_files_ignored() {
    let harness = TestHarness::new();
    harness.write_doc("a.md", "document");
    harness.write_doc("notes.txt", "not a document");

    let report = harness.reconciler().run().unwrap();

    assert_eq!(report.new, 1);
    assert!(!harness.artifact_path("notes.json").exists());
}

#[test]
fn test_empty_document_gets_empty_headline() {
    let harness = TestHarness::new();
    harness.write_doc("empty.md", "");

    harness.reconciler().run().unwrap();

    let record = harness.read_record("empty.json");
    assert_eq!(record.headline, "");
    assert_eq!(record.shasum, fingerprint_bytes(b""));
}

#[test]
fn test_multiple_models_write_multiple_vectors() {
    let harness = TestHarness::new();
    harness.write_doc("a.md", "content");

    let second = Arc::new(MockEmbedder::with_name("second-model"));
    let reconciler = Reconciler::new(
        &harness.docs_dir,
        &harness.embeddings_dir,
        vec![
            harness.embedder.clone() as Arc<dyn EmbeddingModel>,
            second as Arc<dyn EmbeddingModel>,
        ],
    );
    reconciler.run().unwrap();

    let record = harness.read_record("a.json");
    assert_eq!(record.embeddings.len(), 2);
    assert!(record.embeddings.contains_key("mock-embedder"));
    assert!(record.embeddings.contains_key("second-model"));
}

#[test]
fn test_dry_run_reports_without_touching_anything() {
    let harness = TestHarness::new();
    harness.write_doc("a.md", "new doc");

    // Seed an orphan
    std::fs::create_dir_all(&harness.embeddings_dir).unwrap();
    std::fs::write(harness.artifact_path("gone.json"), b"{}").unwrap();

    let report = harness.reconciler().with_dry_run(true).run().unwrap();

    assert_eq!(report.new, 1);
    assert_eq!(report.deleted, 1);
    assert_eq!(harness.embedder.call_count(), 0);
    assert!(!harness.artifact_path("a.json").exists());
    assert!(harness.artifact_path("gone.json").exists());
}

#[test]
fn test_dotted_filename_maps_suffix_only() {
    let harness = TestHarness::new();
    harness.write_doc("notes.v2.md", "dotted");

    harness.reconciler().run().unwrap();

    assert!(harness.artifact_path("notes.v2.json").exists());
}

#[test]
fn test_custom_extensions() {
    let harness = TestHarness::new();
    harness.write_doc("a.txt", "plain text doc");

    let report = harness
        .reconciler()
        .with_extensions("txt", "emb")
        .run()
        .unwrap();

    assert_eq!(report.new, 1);
    assert!(harness.artifact_path("a.emb").exists());
}

#[test]
fn test_invalid_utf8_document_counts_as_failure() {
    let harness = TestHarness::new();
    harness.write_doc("a.md", "readable");
    std::fs::write(harness.docs_dir.join("bad.md"), [0xff, 0xfe, 0xfd]).unwrap();

    let report = harness.reconciler().run().unwrap();

    assert_eq!(report.failed, 1);
    assert_eq!(report.new, 1);
    assert!(harness.artifact_path("a.json").exists());
    assert!(!harness.artifact_path("bad.json").exists());
}
