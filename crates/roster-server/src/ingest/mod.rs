//! Bulk employee ingestion
//!
//! Streaming CSV decode of an uploaded file, per-row validation, and
//! sequential persistence that tolerates row-level failure without aborting
//! the batch. Each run produces an [`report::ImportReport`]; only
//! stream-level problems (unreadable input, zero valid rows) fail the run
//! itself.
//!
//! The uploaded bytes are owned by exactly one run via a
//! [`source::UploadSource`], whose backing resource is released exactly once
//! on every exit path.

pub mod pipeline;
pub mod report;
pub mod source;

pub use pipeline::{run, ImportError};
pub use report::{FailedRow, ImportReport, RowRef};
