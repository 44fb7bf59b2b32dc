//! Employee feature slice
//!
//! CRUD operations, filtered listing, and bulk CSV import for employee
//! records.

pub mod commands;
pub mod filter;
pub mod queries;
pub mod routes;
pub mod store;
pub mod types;


pub use routes::employees_routes;
