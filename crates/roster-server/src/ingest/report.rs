//! Import run reporting

use serde::{Deserialize, Serialize};

/// Identifies the source row of a failure entry.
///
/// Validation failures carry the 1-based physical line number (the header
/// line counts as line 1). Persistence failures report `"unknown"`: the
/// source line is no longer tracked once a candidate reaches the
/// persistence stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowRef {
    Line(u64),
    Opaque(String),
}

impl RowRef {
    /// Row reference for failures whose source line is not tracked.
    pub fn unknown() -> Self {
        RowRef::Opaque("unknown".to_string())
    }
}

/// One failed row of an import run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedRow {
    pub row: RowRef,
    pub error: String,
}

/// Result of one ingestion run.
///
/// Created fresh per run and returned to the caller; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    /// Rows that passed validation and were queued for persistence.
    pub total_records: usize,
    /// Rows successfully persisted.
    pub imported_count: usize,
    /// Validation failures plus persistence failures.
    pub failed_count: usize,
    /// Failure entries in the order they were observed.
    pub failed_rows: Vec<FailedRow>,
}

impl ImportReport {
    /// One-line summary for logging.
    pub fn summary(&self) -> String {
        format!(
            "{} candidates, {} imported, {} failed",
            self.total_records, self.imported_count, self.failed_count
        )
    }
}
