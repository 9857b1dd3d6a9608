//! Mock embedder for testing.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::EmbeddingError;
use crate::model::{Embedding, EmbeddingModel, ModelInfo};

/// Mock embedder that generates deterministic vectors.
///
/// Useful for testing the synchronizer without loading a model. The same
/// input text always produces the same vector, `embed` calls are counted,
/// and failures can be injected for texts containing a marker substring.
pub struct MockEmbedder {
    info: ModelInfo,
    calls: AtomicUsize,
    fail_on: Vec<String>,
}

impl MockEmbedder {
    /// Create a new mock embedder.
    pub fn new() -> Self {
        Self {
            info: ModelInfo {
                name: "mock-embedder".to_string(),
                dimension: 8,
                max_sequence_length: usize::MAX,
            },
            calls: AtomicUsize::new(0),
            fail_on: Vec::new(),
        }
    }

    /// Create with a custom model name.
    pub fn with_name(name: impl Into<String>) -> Self {
        let mut mock = Self::new();
        mock.info.name = name.into();
        mock
    }

    /// Fail any `embed` call whose text contains the given marker.
    pub fn fail_on(mut self, marker: impl Into<String>) -> Self {
        self.fail_on.push(marker.into());
        self
    }

    /// Number of `embed` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl EmbeddingModel for MockEmbedder {
    fn info(&self) -> &ModelInfo {
        &self.info
    }

    fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        for marker in &self.fail_on {
            if text.contains(marker.as_str()) {
                return Err(EmbeddingError::Embed(format!(
                    "mock failure triggered by {:?}",
                    marker
                )));
            }
        }

        Ok(Embedding::new(mock_vector(text, self.info.dimension)))
    }
}

/// Derive a deterministic vector from text content.
fn mock_vector(text: &str, dimension: usize) -> Vec<f32> {
    let mut state: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in text.bytes() {
        state ^= u64::from(byte);
        state = state.wrapping_mul(0x0000_0100_0000_01b3);
    }

    (0..dimension)
        .map(|i| {
            let mixed = state
                .wrapping_add(i as u64)
                .wrapping_mul(0x9e37_79b9_7f4a_7c15);
            // Map into [-1, 1)
            (mixed >> 11) as f32 / (1u64 << 53) as f32 * 2.0 - 1.0
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_is_deterministic() {
        let mock = MockEmbedder::new();
        let a = mock.embed("Hello\nWorld").unwrap();
        let b = mock.embed("Hello\nWorld").unwrap();
        assert_eq!(a.values, b.values);
    }

    #[test]
    fn test_mock_differs_by_content() {
        let mock = MockEmbedder::new();
        let a = mock.embed("one").unwrap();
        let b = mock.embed("two").unwrap();
        assert_ne!(a.values, b.values);
    }

    #[test]
    fn test_mock_counts_calls() {
        let mock = MockEmbedder::new();
        assert_eq!(mock.call_count(), 0);
        mock.embed("a").unwrap();
        mock.embed("b").unwrap();
        assert_eq!(mock.call_count(), 2);
    }

    #[test]
    fn test_mock_injected_failure() {
        let mock = MockEmbedder::new().fail_on("BOOM");
        assert!(mock.embed("all fine here").is_ok());
        let err = mock.embed("this text goes BOOM").unwrap_err();
        assert!(matches!(err, EmbeddingError::Embed(_)));
        // Failed calls still count
        assert_eq!(mock.call_count(), 2);
    }

    #[test]
    fn test_mock_dimension() {
        let mock = MockEmbedder::new();
        let emb = mock.embed("text").unwrap();
        assert_eq!(emb.dimension(), mock.info().dimension);
    }

    #[test]
    fn test_mock_custom_name() {
        let mock = MockEmbedder::with_name("test-model");
        assert_eq!(mock.info().name, "test-model");
    }
}
