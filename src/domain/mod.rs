//! Domain layer - Student records and the rules around them.
//!
//! Pure types and validation with no I/O (hexagonal architecture inner
//! ring). Everything here is serializable and testable in isolation.

pub mod form;
pub mod stats;
pub mod student;

pub use form::{StudentFields, StudentForm, ValidationError};
pub use stats::StudentStats;
pub use student::{Student, StudentDocument, StudentId};
