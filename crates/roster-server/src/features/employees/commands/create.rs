//! Create employee command
//!
//! Command: pure data structure with validation. Handler: standalone async
//! function over the [`EmployeeStore`] trait with the business logic.

use serde::{Deserialize, Serialize};

use crate::features::shared::validation::{
    validate_email, validate_text, validate_url, ValidationError,
};

use super::super::store::{EmployeeStore, StoreError};
use super::super::types::{Employee, NewEmployee};

/// Command to create a new employee record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeCommand {
    pub name: String,
    pub email: String,
    pub position: String,
    pub department: String,

    /// Optional photo URL; blank is treated as absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

/// Errors that can occur when creating an employee
#[derive(Debug, thiserror::Error)]
pub enum CreateEmployeeError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Employee with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("Database error: {0}")]
    Store(StoreError),
}

impl CreateEmployeeCommand {
    /// Validates the command parameters
    ///
    /// # Errors
    ///
    /// - name, position, department: 2-100 characters after trimming
    /// - email: valid address, at most 100 characters
    /// - photoUrl: http(s) URL when present and non-blank
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

    /// Trimmed payload ready for persistence.
    pub(crate) fn into_new_employee(self) -> NewEmployee {
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

/// Handler function for creating employees
#[tracing::instrument(skip(store, command), fields(email = %command.email))]
pub async fn handle<S>(
    store: &S,
    command: CreateEmployeeCommand,
) -> Result<Employee, CreateEmployeeError>
where
    S: EmployeeStore + ?Sized,
{
    command.validate()?;

    let email = command.email.trim().to_string();
    let employee = store
        .create(command.into_new_employee())
        .await
        .map_err(|err| match err {
            StoreError::Duplicate(_) => CreateEmployeeError::DuplicateEmail(email.clone()),
            other => CreateEmployeeError::Store(other),
        })?;

    tracing::info!(employee_id = employee.id, "Employee created");
    Ok(employee)
}
