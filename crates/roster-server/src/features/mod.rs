//! Feature modules implementing the roster API
//!
//! Each feature is organized as a vertical slice with its own commands
//! (write operations), queries (read operations), and routes. Handlers are
//! standalone async functions over the [`employees::store::EmployeeStore`]
//! trait, keeping business logic independent of the HTTP layer and of the
//! concrete database.

pub mod employees;
pub mod shared;

use axum::Router;
use sqlx::PgPool;

/// Creates the main API router with all feature routes mounted
///
/// Each feature is mounted under its own path prefix:
/// - `/employees` - Employee CRUD, filtered listing, and bulk CSV import
pub fn router(pool: PgPool) -> Router<()> {
    Router::new().nest("/employees", employees::employees_routes().with_state(pool))
}
