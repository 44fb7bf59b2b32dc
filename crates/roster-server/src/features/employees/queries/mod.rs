//! Read operations for employee records

pub mod get;
pub mod list;

pub use get::{GetEmployeeError, GetEmployeeQuery};
pub use list::ListEmployeesError;
