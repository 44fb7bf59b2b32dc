//! Write operations for employee records

pub mod create;
pub mod delete;
pub mod update;

pub use create::{CreateEmployeeCommand, CreateEmployeeError};
pub use delete::{DeleteEmployeeCommand, DeleteEmployeeError};
pub use update::{UpdateEmployeeCommand, UpdateEmployeeError};
