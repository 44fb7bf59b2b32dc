//! Roster Server Library
//!
//! HTTP service for managing employee records.
//!
//! # Overview
//!
//! The roster server provides a REST API for employee record management:
//!
//! - **API Endpoints**: CRUD and filtered listing of employee records
//! - **Bulk Import**: streaming CSV ingestion with per-row failure reporting
//! - **Database Management**: PostgreSQL integration with SQLx
//! - **Configuration**: Environment-based configuration management
//! - **Middleware**: CORS and request logging
//!
//! # Architecture
//!
//! The server follows the vertical-slice layout used across the workspace:
//! each feature owns its commands (write operations), queries (read
//! operations), and routes. Handlers are standalone async functions over the
//! [`features::employees::store::EmployeeStore`] trait, so business logic is
//! testable without a live database.
//!
//! The bulk-import subsystem lives in [`ingest`]: a streaming CSV decoder,
//! a per-run import report, and a temp-file upload source with guaranteed
//! release.
//!
//! ## Framework Stack
//!
//! - **Axum**: web framework (routing, extractors, multipart uploads)
//! - **SQLx**: async PostgreSQL driver and migrations
//! - **Tower**: middleware and service abstractions
//!
//! # Example
//!
//! ```no_run
//! use roster_server::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     println!("binding {}:{}", config.server.host, config.server.port);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod features;
pub mod ingest;
pub mod middleware;
