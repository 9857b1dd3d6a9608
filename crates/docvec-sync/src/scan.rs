//! Document and record tree enumeration.
//!
//! Both trees are keyed by relative path; a document and its record differ
//! only in root directory and file extension.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::SyncError;

/// Recursively collect relative paths of files under `root` whose extension
/// matches `extension` (without the dot).
pub fn scan_tree(root: &Path, extension: &str) -> Result<BTreeSet<PathBuf>, SyncError> {
    let mut paths = BTreeSet::new();

    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|source| SyncError::Walk {
            path: root.to_path_buf(),
            source,
        })?;

        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }

        if let Ok(rel) = entry.path().strip_prefix(root) {
            paths.insert(rel.to_path_buf());
        }
    }

    Ok(paths)
}

/// Swap the file-name extension of a relative path.
///
/// Only the trailing `.{from_ext}` suffix is replaced, so `a.b.md` maps to
/// `a.b.json` and back. Returns `None` when the file name is not valid
/// unicode or does not carry the expected suffix.
pub fn swap_extension(rel: &Path, from_ext: &str, to_ext: &str) -> Option<PathBuf> {
    let name = rel.file_name()?.to_str()?;
    let stem = name.strip_suffix(&format!(".{}", from_ext))?;
    Some(rel.with_file_name(format!("{}.{}", stem, to_ext)))
}
