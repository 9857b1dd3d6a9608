//! Run summary for a reconciliation pass.

use std::fmt;

/// How a document was classified against its existing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// No record exists yet
    New,
    /// The stored fingerprint differs from the current document
    Changed,
    /// The stored fingerprint matches; nothing to do
    Unchanged,
}

/// Result of one reconciliation pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Documents with no prior record
    pub new: usize,
    /// Documents whose record was stale and recomputed
    pub changed: usize,
    /// Documents skipped because their record was current
    pub unchanged: usize,
    /// Orphaned records deleted
    pub deleted: usize,
    /// Per-path failures (document read, embedding, write, or delete)
    pub failed: usize,
}

impl SyncReport {
    /// Create a new empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a classified document.
    pub fn record(&mut self, disposition: Disposition) {
        match disposition {
            Disposition::New => self.new += 1,
            Disposition::Changed => self.changed += 1,
            Disposition::Unchanged => self.unchanged += 1,
        }
    }

    /// Number of documents that were (re)embedded.
    pub fn processed(&self) -> usize {
        self.new + self.changed
    }

    /// Whether any per-path failure occurred.
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} new, {} changed, {} unchanged, {} deleted, {} failed",
            self.new, self.changed, self.unchanged, self.deleted, self.failed
        )
    }
}
