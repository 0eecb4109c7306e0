//! Summary statistics over the student collection.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::student::Student;

/// Dashboard summary served by `/api/stats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentStats {
    /// Number of stored records.
    pub total_students: usize,
    /// Number of distinct course values.
    pub total_courses: usize,
    /// Number of records with fees paid.
    pub active_students: usize,
}

impl StudentStats {
    /// Compute statistics in one pass over the records.
    pub fn compute(students: &[Student]) -> Self {
        let courses: HashSet<&str> = students.iter().map(|s| s.course.as_str()).collect();
        Self {
            total_students: students.len(),
            total_courses: courses.len(),
            active_students: students.iter().filter(|s| s.fees_paid).count(),
        }
    }
}
