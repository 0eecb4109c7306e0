//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain rules with the storage port. Each public method
//! on `StudentService` is one self-contained operation that a request
//! handler calls.

pub mod students;

pub use students::{ServiceError, ServiceResult, StudentService};
