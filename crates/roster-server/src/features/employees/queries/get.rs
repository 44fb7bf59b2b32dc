//! Get a single employee by id

use serde::{Deserialize, Serialize};

use super::super::store::{EmployeeStore, StoreError};
use super::super::types::Employee;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetEmployeeQuery {
    pub id: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum GetEmployeeError {
    #[error("Employee with id {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Store(StoreError),
}

#[tracing::instrument(skip(store), fields(employee_id = query.id))]
pub async fn handle<S>(store: &S, query: GetEmployeeQuery) -> Result<Employee, GetEmployeeError>
where
    S: EmployeeStore + ?Sized,
{
    store.get(query.id).await.map_err(|err| match err {
        StoreError::NotFound(id) => GetEmployeeError::NotFound(id),
        other => GetEmployeeError::Store(other),
    })
}
