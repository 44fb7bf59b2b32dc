//! Delete employee command

use serde::{Deserialize, Serialize};

use super::super::store::{EmployeeStore, StoreError};
use super::super::types::Employee;

/// Command to delete an employee record by id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteEmployeeCommand {
    pub id: i64,
}

/// Errors that can occur when deleting an employee
#[derive(Debug, thiserror::Error)]
pub enum DeleteEmployeeError {
    #[error("Employee with id {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Store(StoreError),
}

/// Handler function for deleting employees; returns the deleted record.
#[tracing::instrument(skip(store), fields(employee_id = command.id))]
pub async fn handle<S>(
    store: &S,
    command: DeleteEmployeeCommand,
) -> Result<Employee, DeleteEmployeeError>
where
    S: EmployeeStore + ?Sized,
{
    let employee = store.delete(command.id).await.map_err(|err| match err {
        StoreError::NotFound(id) => DeleteEmployeeError::NotFound(id),
        other => DeleteEmployeeError::Store(other),
    })?;

    tracing::info!(employee_id = employee.id, "Employee deleted");
    Ok(employee)
}
