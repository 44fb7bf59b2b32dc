//! Employee record types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted employee record.
///
/// `id` is assigned by the database on creation and never reused across
/// deletions. `created_at` is set once at insert time and never mutated.
/// The four required text fields are never empty or whitespace-only in a
/// persisted record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub position: String,
    pub department: String,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A validated employee payload awaiting persistence.
///
/// Field values are already trimmed; `photo_url` is `None` when absent or
/// blank in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmployee {
    pub name: String,
    pub email: String,
    pub position: String,
    pub department: String,
    pub photo_url: Option<String>,
}
