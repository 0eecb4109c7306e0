//! Student form input and validation.
//!
//! `StudentForm` is the raw, stringly-typed submission exactly as it
//! arrives from the browser. `validate` turns it into `StudentFields`,
//! the typed payload that create and update apply to the document.
//! Roll number uniqueness needs the document and is checked by the
//! service, not here.

use std::num::{IntErrorKind, ParseIntError};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::student::Student;

/// Tokens accepted as "true" for boolean form fields (case-insensitive).
///
/// A checkbox posts `on` by default; our forms post `true`. Anything
/// else, including an absent field, is false.
pub const TRUTHY_TOKENS: [&str; 4] = ["true", "on", "yes", "1"];

/// Highest accepted attendance percentage.
pub const MAX_ATTENDANCE: i64 = 100;

/// Reasons a submission is rejected before touching storage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill all required fields!")]
    MissingFields,

    #[error("Attendance must be between 0 and 100!")]
    AttendanceOutOfRange(i64),

    #[error("Invalid attendance value!")]
    InvalidAttendance(String),
}

/// Raw form submission for create and edit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentForm {
    pub roll_no: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub course: Option<String>,
    pub year: Option<String>,
    pub grade: Option<String>,
    pub attendance: Option<String>,
    pub fees_paid: Option<String>,
    pub address: Option<String>,
}

/// Validated, trimmed field values ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentFields {
    pub roll_no: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub course: String,
    pub year: String,
    pub grade: String,
    pub attendance: u8,
    pub fees_paid: bool,
    pub address: String,
}

/// Parse a boolean form value against [`TRUTHY_TOKENS`].
pub fn parse_truthy(value: Option<&str>) -> bool {
    value.is_some_and(|v| {
        let v = v.trim();
        TRUTHY_TOKENS.iter().any(|t| t.eq_ignore_ascii_case(v))
    })
}

fn trimmed(value: Option<&String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

impl StudentForm {
    /// Prefill a form from a stored record (edit page).
    pub fn from_student(student: &Student) -> Self {
        Self {
            roll_no: Some(student.roll_no.clone()),
            name: Some(student.name.clone()),
            email: Some(student.email.clone()),
            phone: Some(student.phone.clone()),
            course: Some(student.course.clone()),
            year: Some(student.year.clone()),
            grade: Some(student.grade.clone()),
            attendance: Some(student.attendance.to_string()),
            fees_paid: student.fees_paid.then(|| "true".to_string()),
            address: Some(student.address.clone()),
        }
    }

    /// Whether the boolean fees field is ticked.
    pub fn fees_paid(&self) -> bool {
        parse_truthy(self.fees_paid.as_deref())
    }

    /// Validate the submission.
    ///
    /// # Errors
    /// - `MissingFields` if any required field is blank after trimming
    /// - `InvalidAttendance` if attendance is not an integer
    /// - `AttendanceOutOfRange` if attendance is outside 0..=100
    pub fn validate(&self) -> Result<StudentFields, ValidationError> {
        let roll_no = trimmed(self.roll_no.as_ref());
        let name = trimmed(self.name.as_ref());
        let email = trimmed(self.email.as_ref());
        let phone = trimmed(self.phone.as_ref());
        let course = trimmed(self.course.as_ref());
        let year = trimmed(self.year.as_ref());
        let grade = trimmed(self.grade.as_ref());
        // An absent attendance field counts as zero; a blank one does not.
        let attendance = self
            .attendance
            .as_deref()
            .map_or_else(|| "0".to_string(), |v| v.trim().to_string());

        let required = [
            &roll_no, &name, &email, &phone, &course, &year, &grade, &attendance,
        ];
        if required.iter().any(|v| v.is_empty()) {
            return Err(ValidationError::MissingFields);
        }

        let attendance = parse_attendance(&attendance)?;

        Ok(StudentFields {
            roll_no,
            name,
            email,
            phone,
            course,
            year,
            grade,
            attendance,
            fees_paid: self.fees_paid(),
            address: trimmed(self.address.as_ref()),
        })
    }
}

/// Integers too large for `i64` are still integers, so they report as
/// out of range (saturated) rather than invalid.
fn parse_attendance(raw: &str) -> Result<u8, ValidationError> {
    let value: i64 = raw.parse().map_err(|e: ParseIntError| match e.kind() {
        IntErrorKind::PosOverflow => ValidationError::AttendanceOutOfRange(i64::MAX),
        IntErrorKind::NegOverflow => ValidationError::AttendanceOutOfRange(i64::MIN),
        _ => ValidationError::InvalidAttendance(raw.to_string()),
    })?;
    if !(0..=MAX_ATTENDANCE).contains(&value) {
        return Err(ValidationError::AttendanceOutOfRange(value));
    }
    u8::try_from(value).map_err(|_| ValidationError::AttendanceOutOfRange(value))
}
