//! Bulk import pipeline
//!
//! Consumes a delimited tabular byte stream, decodes it row by row, and
//! persists valid records one at a time. Row-level problems (missing
//! required fields, rejected inserts) are captured in the report; only
//! stream-level problems fail the run.

use futures::StreamExt;
use serde::Deserialize;
use thiserror::Error;
use tokio::io::AsyncRead;

use crate::features::employees::store::EmployeeStore;
use crate::features::employees::types::NewEmployee;

use super::report::{FailedRow, ImportReport, RowRef};
use super::source::UploadSource;

/// Failure message recorded for rows missing a required field.
const MISSING_REQUIRED_FIELDS: &str = "Missing required fields";

/// Pipeline-level failures. Row-level problems never surface here; they are
/// captured in the [`ImportReport`] instead.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("The uploaded CSV file is empty or contains no valid employee records")]
    NoValidRecords,

    #[error("Failed to decode CSV stream: {0}")]
    Decode(#[from] csv_async::Error),

    #[error("Failed to read upload: {0}")]
    Io(#[from] std::io::Error),
}

/// One decoded line of the input stream, field values still raw.
///
/// Columns are matched by header name, in any order; unknown columns are
/// ignored and missing columns decode as `None`.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    position: Option<String>,
    #[serde(default)]
    department: Option<String>,
    #[serde(default, rename = "photoUrl")]
    photo_url: Option<String>,
}

impl RawRow {
    /// Trim and check the four required fields, producing a candidate for
    /// persistence. A blank `photoUrl` becomes `None`.
    fn into_candidate(self) -> Option<NewEmployee> {
        let name = self.name.as_deref().map(str::trim).unwrap_or_default();
        let email = self.email.as_deref().map(str::trim).unwrap_or_default();
        let position = self.position.as_deref().map(str::trim).unwrap_or_default();
        let department = self.department.as_deref().map(str::trim).unwrap_or_default();

        if name.is_empty() || email.is_empty() || position.is_empty() || department.is_empty() {
            return None;
        }

        let photo_url = self
            .photo_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string);

        Some(NewEmployee {
            name: name.to_string(),
            email: email.to_string(),
            position: position.to_string(),
            department: department.to_string(),
            photo_url,
        })
    }
}

#[derive(Debug, Default)]
struct DecodedBatch {
    candidates: Vec<NewEmployee>,
    failures: Vec<FailedRow>,
}

/// Decode the full stream into candidates and validation failures.
///
/// The stream is consumed incrementally; decode suspends on reader I/O, so a
/// slow producer never forces the whole input into memory.
async fn decode<R>(reader: R) -> Result<DecodedBatch, ImportError>
where
    R: AsyncRead + Send + Unpin,
{
    let mut decoder = csv_async::AsyncReaderBuilder::new()
        .flexible(true)
        .create_deserializer(reader);
    let mut records = decoder.deserialize::<RawRow>();

    let mut batch = DecodedBatch::default();
    // 1-based physical line number; the header occupies line 1.
    let mut line = 1u64;

    while let Some(record) = records.next().await {
        line += 1;
        let row = record?;
        match row.into_candidate() {
            Some(candidate) => batch.candidates.push(candidate),
            None => batch.failures.push(FailedRow {
                row: RowRef::Line(line),
                error: MISSING_REQUIRED_FIELDS.to_string(),
            }),
        }
    }

    Ok(batch)
}

/// Run one ingestion pass over `source`, persisting candidates via `store`.
///
/// The source's backing resource is released exactly once, as soon as
/// decoding completes or fails and before any early return. Persistence is
/// sequential: each create is awaited before the next begins, and a failed
/// create is recorded and skipped rather than aborting the batch.
#[tracing::instrument(skip(store, source))]
pub async fn run<S, U>(store: &S, mut source: U) -> Result<ImportReport, ImportError>
where
    S: EmployeeStore + ?Sized,
    U: UploadSource,
{
    let decoded = match source.open().await {
        Ok(reader) => decode(reader).await,
        Err(err) => Err(ImportError::Io(err)),
    };

    // The upload is consumed (or unreadable) at this point; free it before
    // touching the store.
    source.release().await;

    let batch = decoded?;

    if batch.candidates.is_empty() {
        return Err(ImportError::NoValidRecords);
    }

    let total_records = batch.candidates.len();
    let mut failed_rows = batch.failures;
    let mut imported_count = 0usize;

    for candidate in batch.candidates {
        match store.create(candidate).await {
            Ok(employee) => {
                imported_count += 1;
                tracing::debug!(employee_id = employee.id, "Imported employee");
            },
            Err(err) => {
                // The source line is no longer tracked at this stage.
                tracing::warn!(error = %err, "Failed to persist imported employee");
                failed_rows.push(FailedRow {
                    row: RowRef::unknown(),
                    error: err.to_string(),
                });
            },
        }
    }

    let report = ImportReport {
        total_records,
        imported_count,
        failed_count: failed_rows.len(),
        failed_rows,
    };

    tracing::info!(summary = %report.summary(), "Import run completed");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::employees::filter::EmployeeFilter;
    use crate::features::employees::store::{StoreError, StoreResult};
    use crate::features::employees::types::Employee;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// In-memory store; creates fail for configured email addresses.
    #[derive(Default)]
    struct FakeStore {
        created: Mutex<Vec<NewEmployee>>,
        fail_emails: HashSet<String>,
        next_id: AtomicI64,
    }

    impl FakeStore {
        fn failing_on(emails: &[&str]) -> Self {
            Self {
                fail_emails: emails.iter().map(|e| e.to_string()).collect(),
                ..Default::default()
            }
        }

        fn created(&self) -> Vec<NewEmployee> {
            self.created.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EmployeeStore for FakeStore {
        async fn create(&self, employee: NewEmployee) -> StoreResult<Employee> {
            if self.fail_emails.contains(&employee.email) {
                return Err(StoreError::Duplicate(
                    "duplicate key value violates unique constraint \"employees_email_key\""
                        .to_string(),
                ));
            }

            let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            let record = Employee {
                id,
                name: employee.name.clone(),
                email: employee.email.clone(),
                position: employee.position.clone(),
                department: employee.department.clone(),
                photo_url: employee.photo_url.clone(),
                created_at: Utc::now(),
            };
            self.created.lock().unwrap().push(employee);
            Ok(record)
        }

        async fn get(&self, id: i64) -> StoreResult<Employee> {
            Err(StoreError::NotFound(id))
        }

        async fn update(&self, id: i64, _employee: NewEmployee) -> StoreResult<Employee> {
            Err(StoreError::NotFound(id))
        }

        async fn delete(&self, id: i64) -> StoreResult<Employee> {
            Err(StoreError::NotFound(id))
        }

        async fn list(&self, _filter: &EmployeeFilter) -> StoreResult<Vec<Employee>> {
            Ok(vec![])
        }
    }

    /// In-memory upload source with a release counter.
    struct FakeSource {
        data: Vec<u8>,
        releases: Arc<AtomicUsize>,
        fail_open: bool,
    }

    impl FakeSource {
        fn new(data: &[u8]) -> (Self, Arc<AtomicUsize>) {
            let releases = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    data: data.to_vec(),
                    releases: releases.clone(),
                    fail_open: false,
                },
                releases,
            )
        }

        fn failing_open() -> (Self, Arc<AtomicUsize>) {
            let (mut source, releases) = Self::new(b"");
            source.fail_open = true;
            (source, releases)
        }
    }

    #[async_trait]
    impl UploadSource for FakeSource {
        type Reader = std::io::Cursor<Vec<u8>>;

        async fn open(&mut self) -> std::io::Result<Self::Reader> {
            if self.fail_open {
                Err(std::io::Error::other("upload is gone"))
            } else {
                Ok(std::io::Cursor::new(self.data.clone()))
            }
        }

        async fn release(&mut self) {
            self.releases.fetch_add(1, Ordering::SeqCst);
        }
    }

    const HEADER: &str = "name,email,position,department,photoUrl\n";

    #[tokio::test]
    async fn test_imports_all_valid_rows() {
        let csv = format!(
            "{HEADER}Ada,ada@example.com,Engineer,R&D,\n\
             Grace,grace@example.com,Admiral,Navy,https://example.com/grace.png\n"
        );
        let store = FakeStore::default();
        let (source, releases) = FakeSource::new(csv.as_bytes());

        let report = run(&store, source).await.unwrap();

        assert_eq!(report.total_records, 2);
        assert_eq!(report.imported_count, 2);
        assert_eq!(report.failed_count, 0);
        assert!(report.failed_rows.is_empty());
        assert_eq!(releases.load(Ordering::SeqCst), 1);

        let created = store.created();
        assert_eq!(created.len(), 2);
        assert_eq!(created[0].photo_url, None);
        assert_eq!(
            created[1].photo_url.as_deref(),
            Some("https://example.com/grace.png")
        );
    }

    #[tokio::test]
    async fn test_row_missing_required_field_is_reported_not_imported() {
        // Second data row (physical line 3) has no email.
        let csv = format!(
            "{HEADER}Ada,ada@example.com,Engineer,R&D,\n\
             Grace,,Admiral,Navy,\n\
             Edsger,edsger@example.com,Professor,CS,\n"
        );
        let store = FakeStore::default();
        let (source, _) = FakeSource::new(csv.as_bytes());

        let report = run(&store, source).await.unwrap();

        assert_eq!(report.total_records, 2);
        assert_eq!(report.imported_count, 2);
        assert_eq!(report.failed_count, 1);
        assert_eq!(
            report.failed_rows,
            vec![FailedRow {
                row: RowRef::Line(3),
                error: "Missing required fields".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_whitespace_only_field_counts_as_missing() {
        let csv = format!(
            "{HEADER}Ada,ada@example.com,Engineer,R&D,\n\
             Grace,grace@example.com,\"   \",Navy,\n"
        );
        let store = FakeStore::default();
        let (source, _) = FakeSource::new(csv.as_bytes());

        let report = run(&store, source).await.unwrap();

        assert_eq!(report.total_records, 1);
        assert_eq!(report.failed_rows[0].row, RowRef::Line(3));
    }

    #[tokio::test]
    async fn test_header_only_stream_fails_the_run() {
        let store = FakeStore::default();
        let (source, releases) = FakeSource::new(HEADER.as_bytes());

        let result = run(&store, source).await;

        assert!(matches!(result, Err(ImportError::NoValidRecords)));
        assert_eq!(releases.load(Ordering::SeqCst), 1);
        assert!(store.created().is_empty());
    }

    #[tokio::test]
    async fn test_all_rows_invalid_fails_the_run() {
        let csv = format!("{HEADER},,Engineer,R&D,\n,,Admiral,Navy,\n");
        let store = FakeStore::default();
        let (source, releases) = FakeSource::new(csv.as_bytes());

        let result = run(&store, source).await;

        assert!(matches!(result, Err(ImportError::NoValidRecords)));
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_persistence_failure_is_reported_with_unknown_row() {
        let csv = format!(
            "{HEADER}Ada,ada@example.com,Engineer,R&D,\n\
             Grace,dup@example.com,Admiral,Navy,\n"
        );
        let store = FakeStore::failing_on(&["dup@example.com"]);
        let (source, _) = FakeSource::new(csv.as_bytes());

        let report = run(&store, source).await.unwrap();

        assert_eq!(report.total_records, 2);
        assert_eq!(report.imported_count, 1);
        assert_eq!(report.failed_count, 1);
        assert_eq!(report.failed_rows.len(), 1);
        assert_eq!(report.failed_rows[0].row, RowRef::unknown());
        assert!(report.failed_rows[0]
            .error
            .contains("duplicate key value violates unique constraint"));
    }

    #[tokio::test]
    async fn test_validation_failures_precede_persistence_failures_in_order() {
        let csv = format!(
            "{HEADER},missing-name@example.com,Engineer,R&D,\n\
             Ada,dup@example.com,Engineer,R&D,\n\
             ,also-missing@example.com,Admiral,Navy,\n\
             Grace,grace@example.com,Admiral,Navy,\n"
        );
        let store = FakeStore::failing_on(&["dup@example.com"]);
        let (source, _) = FakeSource::new(csv.as_bytes());

        let report = run(&store, source).await.unwrap();

        assert_eq!(report.total_records, 2);
        assert_eq!(report.imported_count, 1);
        assert_eq!(report.failed_count, 3);
        // Validation failures in source-row order, persistence failures after.
        assert_eq!(report.failed_rows[0].row, RowRef::Line(2));
        assert_eq!(report.failed_rows[1].row, RowRef::Line(4));
        assert_eq!(report.failed_rows[2].row, RowRef::unknown());
    }

    #[tokio::test]
    async fn test_columns_matched_by_name_not_position() {
        let csv = "department,photoUrl,email,name,position\n\
                   R&D,,ada@example.com,Ada,Engineer\n";
        let store = FakeStore::default();
        let (source, _) = FakeSource::new(csv.as_bytes());

        let report = run(&store, source).await.unwrap();

        assert_eq!(report.imported_count, 1);
        let created = store.created();
        assert_eq!(created[0].name, "Ada");
        assert_eq!(created[0].department, "R&D");
    }

    #[tokio::test]
    async fn test_unknown_columns_are_ignored() {
        let csv = "name,email,position,department,photoUrl,badge,notes\n\
                   Ada,ada@example.com,Engineer,R&D,,B-17,likes punch cards\n";
        let store = FakeStore::default();
        let (source, _) = FakeSource::new(csv.as_bytes());

        let report = run(&store, source).await.unwrap();
        assert_eq!(report.imported_count, 1);
    }

    #[tokio::test]
    async fn test_quoted_values_decode_per_csv_rules() {
        let csv = format!("{HEADER}\"Lovelace, Ada\",ada@example.com,Engineer,\"R&D\",\n");
        let store = FakeStore::default();
        let (source, _) = FakeSource::new(csv.as_bytes());

        let report = run(&store, source).await.unwrap();
        assert_eq!(report.imported_count, 1);
        assert_eq!(store.created()[0].name, "Lovelace, Ada");
    }

    #[tokio::test]
    async fn test_short_row_is_a_validation_failure_not_an_abort() {
        let csv = format!("{HEADER}Ada,ada@example.com,Engineer,R&D,\nGrace,grace@example.com\n");
        let store = FakeStore::default();
        let (source, _) = FakeSource::new(csv.as_bytes());

        let report = run(&store, source).await.unwrap();

        assert_eq!(report.total_records, 1);
        assert_eq!(report.failed_count, 1);
        assert_eq!(report.failed_rows[0].row, RowRef::Line(3));
    }

    #[tokio::test]
    async fn test_malformed_stream_aborts_after_release() {
        // Invalid UTF-8 in a field aborts the whole run.
        let mut csv = HEADER.as_bytes().to_vec();
        csv.extend_from_slice(b"Ada,\xff\xfe,Engineer,R&D,\n");
        let store = FakeStore::default();
        let (source, releases) = FakeSource::new(&csv);

        let result = run(&store, source).await;

        assert!(matches!(result, Err(ImportError::Decode(_))));
        assert_eq!(releases.load(Ordering::SeqCst), 1);
        assert!(store.created().is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_source_aborts_after_release() {
        let store = FakeStore::default();
        let (source, releases) = FakeSource::failing_open();

        let result = run(&store, source).await;

        assert!(matches!(result, Err(ImportError::Io(_))));
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_release_happens_exactly_once_on_success() {
        let csv = format!("{HEADER}Ada,ada@example.com,Engineer,R&D,\n");
        let store = FakeStore::default();
        let (source, releases) = FakeSource::new(csv.as_bytes());

        run(&store, source).await.unwrap();
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_counts_reconcile_across_stages() {
        let csv = format!(
            "{HEADER}Ada,ada@example.com,Engineer,R&D,\n\
             ,,,,\n\
             Grace,dup@example.com,Admiral,Navy,\n\
             Edsger,edsger@example.com,Professor,CS,\n"
        );
        let store = FakeStore::failing_on(&["dup@example.com"]);
        let (source, _) = FakeSource::new(csv.as_bytes());

        let report = run(&store, source).await.unwrap();

        // totalRecords counts only persistence candidates; failedCount spans
        // both validation and persistence failures.
        assert_eq!(report.total_records, 3);
        assert_eq!(report.imported_count, 2);
        assert_eq!(report.failed_count, 2);
        let persistence_failures = report
            .failed_rows
            .iter()
            .filter(|f| f.row == RowRef::unknown())
            .count();
        assert_eq!(report.total_records, report.imported_count + persistence_failures);
    }
}
