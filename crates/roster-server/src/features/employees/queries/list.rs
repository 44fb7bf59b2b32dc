//! List employees with optional filters
//!
//! Filter semantics live in [`EmployeeFilter`](super::super::filter::EmployeeFilter):
//! each present, non-empty criterion becomes a case-insensitive substring
//! match, and results always come back newest-created first. No pagination.

use super::super::filter::EmployeeFilter;
use super::super::store::{EmployeeStore, StoreError};
use super::super::types::Employee;

#[derive(Debug, thiserror::Error)]
pub enum ListEmployeesError {
    #[error("Database error: {0}")]
    Store(#[from] StoreError),
}

#[tracing::instrument(skip(store, filter))]
pub async fn handle<S>(
    store: &S,
    filter: EmployeeFilter,
) -> Result<Vec<Employee>, ListEmployeesError>
where
    S: EmployeeStore + ?Sized,
{
    let employees = store.list(&filter).await?;
    tracing::debug!(count = employees.len(), "Employees listed");
    Ok(employees)
}
