//! Employee API routes
//!
//! Wires the employee commands and queries to Axum HTTP handlers.
//!
//! # Route Structure
//!
//! - `POST /api/v1/employees` - Create a new employee
//! - `GET /api/v1/employees` - List employees with optional filters
//! - `GET /api/v1/employees/:id` - Get a single employee by id
//! - `PUT /api/v1/employees/:id` - Update an employee
//! - `DELETE /api/v1/employees/:id` - Delete an employee
//! - `POST /api/v1/employees/import` - Bulk import from an uploaded CSV file

use crate::api::response::{ApiResponse, ErrorResponse};
use crate::ingest::{self, ImportError};
use crate::ingest::source::TempFileSource;
use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use sqlx::PgPool;

use super::commands::{
    self, CreateEmployeeCommand, CreateEmployeeError, DeleteEmployeeCommand, DeleteEmployeeError,
    UpdateEmployeeCommand, UpdateEmployeeError,
};
use super::filter::EmployeeFilter;
use super::queries::{self, GetEmployeeError, GetEmployeeQuery, ListEmployeesError};
use super::store::PgEmployeeStore;

// ============================================================================
// Router Configuration
// ============================================================================

/// Creates the employees router with all routes configured
pub fn employees_routes() -> Router<PgPool> {
    Router::new()
        .route("/", post(create_employee).get(list_employees))
        .route("/import", post(import_employees))
        .route(
            "/:id",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

/// Create a new employee
///
/// `POST /api/v1/employees`
///
/// - `201 Created` - Employee created successfully
/// - `400 Bad Request` - Validation error
/// - `409 Conflict` - Employee with this email already exists
#[tracing::instrument(skip(pool, command), fields(email = %command.email))]
async fn create_employee(
    State(pool): State<PgPool>,
    Json(command): Json<CreateEmployeeCommand>,
) -> Result<Response, EmployeeApiError> {
    let store = PgEmployeeStore::new(pool);
    let employee = commands::create::handle(&store, command).await?;

    tracing::info!(employee_id = employee.id, "Employee created via API");

    Ok((StatusCode::CREATED, Json(ApiResponse::success(employee))).into_response())
}

/// Update an existing employee
///
/// `PUT /api/v1/employees/:id`
///
/// - `200 OK` - Employee updated successfully
/// - `400 Bad Request` - Validation error
/// - `404 Not Found` - Employee not found
/// - `409 Conflict` - Another employee already has this email
#[tracing::instrument(skip(pool, command), fields(employee_id = id))]
async fn update_employee(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
    Json(mut command): Json<UpdateEmployeeCommand>,
) -> Result<Response, EmployeeApiError> {
    // Set id from path parameter
    command.id = id;

    let store = PgEmployeeStore::new(pool);
    let employee = commands::update::handle(&store, command).await?;

    tracing::info!(employee_id = employee.id, "Employee updated via API");

    Ok((StatusCode::OK, Json(ApiResponse::success(employee))).into_response())
}

/// Delete an employee
///
/// `DELETE /api/v1/employees/:id`
///
/// - `200 OK` - Employee deleted; the deleted record is returned
/// - `404 Not Found` - Employee not found
#[tracing::instrument(skip(pool), fields(employee_id = id))]
async fn delete_employee(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<Response, EmployeeApiError> {
    let store = PgEmployeeStore::new(pool);
    let employee = commands::delete::handle(&store, DeleteEmployeeCommand { id }).await?;

    tracing::info!(employee_id = employee.id, "Employee deleted via API");

    Ok((StatusCode::OK, Json(ApiResponse::success(employee))).into_response())
}

/// Bulk import employees from an uploaded CSV file
///
/// `POST /api/v1/employees/import`
///
/// Expects a multipart form with a `file` field. The upload is spooled to a
/// temp file which is removed when the run finishes, whatever the outcome.
///
/// - `200 OK` - Import ran; the report carries per-row failures, if any
/// - `400 Bad Request` - No file, unreadable stream, or no valid records
#[tracing::instrument(skip(pool, multipart))]
async fn import_employees(
    State(pool): State<PgPool>,
    mut multipart: Multipart,
) -> Result<Response, EmployeeApiError> {
    let mut source: Option<TempFileSource> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| EmployeeApiError::MultipartRead(e.to_string()))?
    {
        if field.name() == Some("file") {
            let spooled = TempFileSource::spool(field)
                .await
                .map_err(|e| EmployeeApiError::Import(ImportError::Io(e)))?;
            source = Some(spooled);
            break;
        }
    }

    let source = source.ok_or(EmployeeApiError::MissingUploadFile)?;

    let store = PgEmployeeStore::new(pool);
    let report = ingest::run(&store, source).await?;

    tracing::info!(summary = %report.summary(), "Bulk import completed via API");

    Ok((StatusCode::OK, Json(ApiResponse::success(report))).into_response())
}

// ============================================================================
// Query Handlers (Read Operations)
// ============================================================================

/// Get a single employee by id
///
/// `GET /api/v1/employees/:id`
#[tracing::instrument(skip(pool), fields(employee_id = id))]
async fn get_employee(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<Response, EmployeeApiError> {
    let store = PgEmployeeStore::new(pool);
    let employee = queries::get::handle(&store, GetEmployeeQuery { id }).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(employee))).into_response())
}

/// List employees with optional filters
///
/// `GET /api/v1/employees?name=&email=&department=&position=`
///
/// Present, non-empty parameters are case-insensitive substring matches;
/// results are ordered newest-created first.
#[tracing::instrument(skip(pool, filter))]
async fn list_employees(
    State(pool): State<PgPool>,
    Query(filter): Query<EmployeeFilter>,
) -> Result<Response, EmployeeApiError> {
    let store = PgEmployeeStore::new(pool);
    let employees = queries::list::handle(&store, filter).await?;

    tracing::debug!(count = employees.len(), "Employees listed via API");

    Ok((StatusCode::OK, Json(ApiResponse::success(employees))).into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Unified error type for employee API endpoints
#[derive(Debug)]
enum EmployeeApiError {
    Create(CreateEmployeeError),
    Update(UpdateEmployeeError),
    Delete(DeleteEmployeeError),
    Get(GetEmployeeError),
    List(ListEmployeesError),
    Import(ImportError),
    MissingUploadFile,
    MultipartRead(String),
}

impl From<CreateEmployeeError> for EmployeeApiError {
    fn from(err: CreateEmployeeError) -> Self {
        Self::Create(err)
    }
}

impl From<UpdateEmployeeError> for EmployeeApiError {
    fn from(err: UpdateEmployeeError) -> Self {
        Self::Update(err)
    }
}

impl From<DeleteEmployeeError> for EmployeeApiError {
    fn from(err: DeleteEmployeeError) -> Self {
        Self::Delete(err)
    }
}

impl From<GetEmployeeError> for EmployeeApiError {
    fn from(err: GetEmployeeError) -> Self {
        Self::Get(err)
    }
}

impl From<ListEmployeesError> for EmployeeApiError {
    fn from(err: ListEmployeesError) -> Self {
        Self::List(err)
    }
}

impl From<ImportError> for EmployeeApiError {
    fn from(err: ImportError) -> Self {
        Self::Import(err)
    }
}

impl IntoResponse for EmployeeApiError {
    fn into_response(self) -> Response {
        match self {
            // Validation errors
            EmployeeApiError::Create(CreateEmployeeError::Validation(_))
            | EmployeeApiError::Update(UpdateEmployeeError::Validation(_)) => {
                let error = ErrorResponse::new("VALIDATION_ERROR", self.to_string());
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            },

            // Duplicates
            EmployeeApiError::Create(CreateEmployeeError::DuplicateEmail(_))
            | EmployeeApiError::Update(UpdateEmployeeError::DuplicateEmail(_)) => {
                let error = ErrorResponse::new("CONFLICT", self.to_string());
                (StatusCode::CONFLICT, Json(error)).into_response()
            },

            // Not found
            EmployeeApiError::Update(UpdateEmployeeError::NotFound(_))
            | EmployeeApiError::Delete(DeleteEmployeeError::NotFound(_))
            | EmployeeApiError::Get(GetEmployeeError::NotFound(_)) => {
                let error = ErrorResponse::new("NOT_FOUND", self.to_string());
                (StatusCode::NOT_FOUND, Json(error)).into_response()
            },

            // Pipeline-level import failures are the caller's problem: a
            // missing, unreadable, or empty upload.
            EmployeeApiError::MissingUploadFile
            | EmployeeApiError::MultipartRead(_)
            | EmployeeApiError::Import(ImportError::NoValidRecords)
            | EmployeeApiError::Import(ImportError::Decode(_)) => {
                let error = ErrorResponse::new("IMPORT_ERROR", self.to_string());
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            },
            EmployeeApiError::Import(ImportError::Io(_)) => {
                tracing::error!("IO error during bulk import: {}", self);
                let error = ErrorResponse::new("INTERNAL_ERROR", "Failed to read the uploaded file");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            },

            // Everything else is a storage problem
            EmployeeApiError::Create(CreateEmployeeError::Store(_))
            | EmployeeApiError::Update(UpdateEmployeeError::Store(_))
            | EmployeeApiError::Delete(DeleteEmployeeError::Store(_))
            | EmployeeApiError::Get(GetEmployeeError::Store(_))
            | EmployeeApiError::List(ListEmployeesError::Store(_)) => {
                tracing::error!("Database error during employee operation: {}", self);
                let error = ErrorResponse::new("INTERNAL_ERROR", "A database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            },
        }
    }
}

impl std::fmt::Display for EmployeeApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create(e) => write!(f, "{}", e),
            Self::Update(e) => write!(f, "{}", e),
            Self::Delete(e) => write!(f, "{}", e),
            Self::Get(e) => write!(f, "{}", e),
            Self::List(e) => write!(f, "{}", e),
            Self::Import(e) => write!(f, "{}", e),
            Self::MissingUploadFile => write!(f, "No file uploaded"),
            Self::MultipartRead(e) => write!(f, "Failed to read multipart upload: {}", e),
        }
    }
}
