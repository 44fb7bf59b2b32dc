//! Update employee command

use serde::{Deserialize, Serialize};

use crate::features::shared::validation::{
    validate_email, validate_text, validate_url, ValidationError,
};

use super::super::store::{EmployeeStore, StoreError};
use super::super::types::{Employee, NewEmployee};

/// Command to replace all mutable fields of an employee record.
///
/// `id` is taken from the request path, not the body. `created_at` is owned
/// by storage and never touched by an update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeeCommand {
    #[serde(skip)]
    pub id: i64,

    pub name: String,
    pub email: String,
    pub position: String,
    pub department: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

/// Errors that can occur when updating an employee
#[derive(Debug, thiserror::Error)]
pub enum UpdateEmployeeError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Employee with id {0} not found")]
    NotFound(i64),

    #[error("Employee with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("Database error: {0}")]
    Store(StoreError),
}

impl UpdateEmployeeCommand {
    /// Validates the command parameters; same rules as creation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_text(&self.name, "name", 2, 100)?;
        validate_email(&self.email, 100)?;
        validate_text(&self.position, "position", 2, 100)?;
        validate_text(&self.department, "department", 2, 100)?;

        if let Some(url) = self.photo_url.as_deref().map(str::trim) {
            if !url.is_empty() {
                validate_url(url, "photoUrl")?;
            }
        }

        Ok(())
    }

    fn into_new_employee(self) -> NewEmployee {
        NewEmployee {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            position: self.position.trim().to_string(),
            department: self.department.trim().to_string(),
            photo_url: self
                .photo_url
                .as_deref()
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(str::to_string),
        }
    }
}

/// Handler function for updating employees
#[tracing::instrument(skip(store, command), fields(employee_id = command.id))]
pub async fn handle<S>(
    store: &S,
    command: UpdateEmployeeCommand,
) -> Result<Employee, UpdateEmployeeError>
where
    S: EmployeeStore + ?Sized,
{
    command.validate()?;

    let id = command.id;
    let email = command.email.trim().to_string();
    let employee = store
        .update(id, command.into_new_employee())
        .await
        .map_err(|err| match err {
            StoreError::NotFound(_) => UpdateEmployeeError::NotFound(id),
            StoreError::Duplicate(_) => UpdateEmployeeError::DuplicateEmail(email.clone()),
            other => UpdateEmployeeError::Store(other),
        })?;

    tracing::info!(employee_id = employee.id, "Employee updated");
    Ok(employee)
}
