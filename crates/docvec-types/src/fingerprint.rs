//! Content fingerprinting and headline extraction.
//!
//! A document's fingerprint is the SHA-256 hex digest of its raw bytes.
//! Artifacts store the fingerprint of the document that produced them, so a
//! later run can compare it against the current document and skip unchanged
//! files.

use sha2::{Digest, Sha256};

/// Compute the SHA-256 hex digest of raw document bytes.
pub fn fingerprint_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Extract the headline from document content.
///
/// The headline is the first line with trailing whitespace stripped.
/// Empty content yields an empty headline.
pub fn headline(content: &str) -> String {
    content.lines().next().unwrap_or("").trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_known_digest() {
        // SHA-256 of the empty input
        assert_eq!(
            fingerprint_bytes(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_fingerprint_is_hex() {
        let digest = fingerprint_bytes(b"Hello\nWorld");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_fingerprint_changes_with_content() {
        assert_ne!(fingerprint_bytes(b"one"), fingerprint_bytes(b"two"));
    }

    #[test]
    fn test_headline_first_line() {
        assert_eq!(headline("# Title\nbody text"), "# Title");
    }

    #[test]
    fn test_headline_strips_trailing_whitespace() {
        assert_eq!(headline("# Title   \nbody"), "# Title");
    }

    #[test]
    fn test_headline_empty_content() {
        assert_eq!(headline(""), "");
    }

    #[test]
    fn test_headline_leading_blank_line() {
        assert_eq!(headline("\n# Title"), "");
    }

    #[test]
    fn test_headline_single_line_no_newline() {
        assert_eq!(headline("just one line"), "just one line");
    }
}
