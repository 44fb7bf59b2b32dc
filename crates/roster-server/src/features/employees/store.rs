//! Employee persistence
//!
//! [`EmployeeStore`] is the seam between business logic and storage: CRUD
//! handlers and the bulk-import pipeline both depend on it, so they can be
//! exercised against an in-memory fake in tests. [`PgEmployeeStore`] is the
//! PostgreSQL implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use super::filter::EmployeeFilter;
use super::types::{Employee, NewEmployee};

/// Errors from employee storage operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// Requested record does not exist
    #[error("Employee with id {0} not found")]
    NotFound(i64),

    /// Record already exists (unique constraint violation)
    #[error("{0}")]
    Duplicate(String),

    /// SQL query or connection error
    #[error("Database query failed: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistent storage for employee records
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// Insert a new record; the store assigns `id` and `created_at`.
    async fn create(&self, employee: NewEmployee) -> StoreResult<Employee>;

    /// Fetch a record by id.
    async fn get(&self, id: i64) -> StoreResult<Employee>;

    /// Replace all mutable fields of an existing record.
    async fn update(&self, id: i64, employee: NewEmployee) -> StoreResult<Employee>;

    /// Delete a record, returning the deleted row.
    async fn delete(&self, id: i64) -> StoreResult<Employee>;

    /// List records matching `filter`, newest-created first.
    async fn list(&self, filter: &EmployeeFilter) -> StoreResult<Vec<Employee>>;
}

/// PostgreSQL-backed [`EmployeeStore`]
#[derive(Debug, Clone)]
pub struct PgEmployeeStore {
    pool: PgPool,
}

const EMPLOYEE_COLUMNS: &str = "id, name, email, position, department, photo_url, created_at";

impl PgEmployeeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_unique_violation(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.is_unique_violation() {
            return StoreError::Duplicate(db_err.message().to_string());
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl EmployeeStore for PgEmployeeStore {
    #[tracing::instrument(skip(self, employee), fields(email = %employee.email))]
    async fn create(&self, employee: NewEmployee) -> StoreResult<Employee> {
        let sql = format!(
            "INSERT INTO employees (name, email, position, department, photo_url) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {EMPLOYEE_COLUMNS}"
        );

        let record = sqlx::query_as::<_, Employee>(&sql)
            .bind(&employee.name)
            .bind(&employee.email)
            .bind(&employee.position)
            .bind(&employee.department)
            .bind(&employee.photo_url)
            .fetch_one(&self.pool)
            .await
            .map_err(map_unique_violation)?;

        tracing::debug!(employee_id = record.id, "Employee created");
        Ok(record)
    }

    #[tracing::instrument(skip(self))]
    async fn get(&self, id: i64) -> StoreResult<Employee> {
        let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = $1");

        sqlx::query_as::<_, Employee>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound(id))
    }

    #[tracing::instrument(skip(self, employee), fields(email = %employee.email))]
    async fn update(&self, id: i64, employee: NewEmployee) -> StoreResult<Employee> {
        let sql = format!(
            "UPDATE employees \
             SET name = $1, email = $2, position = $3, department = $4, photo_url = $5 \
             WHERE id = $6 \
             RETURNING {EMPLOYEE_COLUMNS}"
        );

        sqlx::query_as::<_, Employee>(&sql)
            .bind(&employee.name)
            .bind(&employee.email)
            .bind(&employee.position)
            .bind(&employee.department)
            .bind(&employee.photo_url)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_unique_violation)?
            .ok_or(StoreError::NotFound(id))
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: i64) -> StoreResult<Employee> {
        let sql = format!("DELETE FROM employees WHERE id = $1 RETURNING {EMPLOYEE_COLUMNS}");

        sqlx::query_as::<_, Employee>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound(id))
    }

    #[tracing::instrument(skip(self, filter))]
    async fn list(&self, filter: &EmployeeFilter) -> StoreResult<Vec<Employee>> {
        let predicate = filter.predicate();
        let sql = format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees{} ORDER BY created_at DESC",
            predicate.where_sql()
        );

        let mut query = sqlx::query_as::<_, Employee>(&sql);
        for param in predicate.params() {
            query = query.bind(param);
        }

        let records = query.fetch_all(&self.pool).await?;
        tracing::debug!(count = records.len(), "Employees listed");
        Ok(records)
    }
}
