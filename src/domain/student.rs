//! Core student record types.
//!
//! Defines the `Student` entity and the `StudentDocument` that holds the
//! whole collection plus the id counter. The document doubles as the
//! in-memory record repository: every lookup is a linear scan over the
//! loaded students, which is all a collection of this size needs.

use chrono::Local;
use serde::{Deserialize, Serialize};

use super::form::StudentFields;

// ────────────────────────────────────────────
// Identifiers and timestamps
// ────────────────────────────────────────────

/// Sequential student identifier. Never reused after deletion.
pub type StudentId = u64;

/// Timestamp format used for `created_at` / `updated_at`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current local time formatted for persistence.
pub fn timestamp_now() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

// ────────────────────────────────────────────
// Student
// ────────────────────────────────────────────

/// One student entry in the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Sequential identifier assigned at creation.
    pub id: StudentId,
    /// User-supplied roll number, unique among stored records.
    pub roll_no: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub course: String,
    pub year: String,
    pub grade: String,
    /// Attendance percentage (0–100).
    pub attendance: u8,
    /// Always `"{attendance}%"`. Recomputed on load when missing.
    #[serde(default)]
    pub attendance_percent: String,
    pub fees_paid: bool,
    #[serde(default)]
    pub address: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Student {
    /// Build a new record from validated fields, stamping both timestamps.
    pub fn new(id: StudentId, fields: StudentFields) -> Self {
        let now = timestamp_now();
        let mut student = Self {
            id,
            roll_no: String::new(),
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            course: String::new(),
            year: String::new(),
            grade: String::new(),
            attendance: 0,
            attendance_percent: String::new(),
            fees_paid: false,
            address: String::new(),
            created_at: now.clone(),
            updated_at: now,
        };
        student.assign(fields);
        student
    }

    /// Overwrite all editable fields and refresh `updated_at`.
    pub fn apply(&mut self, fields: StudentFields) {
        self.assign(fields);
        self.updated_at = timestamp_now();
    }

    fn assign(&mut self, fields: StudentFields) {
        self.roll_no = fields.roll_no;
        self.name = fields.name;
        self.email = fields.email;
        self.phone = fields.phone;
        self.course = fields.course;
        self.year = fields.year;
        self.grade = fields.grade;
        self.attendance = fields.attendance;
        self.attendance_percent = format!("{}%", fields.attendance);
        self.fees_paid = fields.fees_paid;
        self.address = fields.address;
    }

    /// Case-insensitive substring match across name, roll number,
    /// course and email. `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        [&self.name, &self.roll_no, &self.course, &self.email]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

// ────────────────────────────────────────────
// Collection document
// ────────────────────────────────────────────

/// The whole persisted collection plus the id counter.
///
/// Invariant: `next_id` is greater than every stored `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentDocument {
    pub students: Vec<Student>,
    pub next_id: StudentId,
}

impl Default for StudentDocument {
    fn default() -> Self {
        Self {
            students: Vec::new(),
            next_id: 1,
        }
    }
}

impl StudentDocument {
    /// Find a student by id.
    pub fn find_by_id(&self, id: StudentId) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    fn find_by_id_mut(&mut self, id: StudentId) -> Option<&mut Student> {
        self.students.iter_mut().find(|s| s.id == id)
    }

    /// Find a student holding `roll_no`, skipping `excluding` when given.
    pub fn find_by_roll_no(
        &self,
        roll_no: &str,
        excluding: Option<StudentId>,
    ) -> Option<&Student> {
        self.students
            .iter()
            .filter(|s| Some(s.id) != excluding)
            .find(|s| s.roll_no == roll_no)
    }

    /// All students satisfying `predicate`, in stored order.
    pub fn filter<P>(&self, predicate: P) -> Vec<&Student>
    where
        P: Fn(&Student) -> bool,
    {
        self.students.iter().filter(|s| predicate(s)).collect()
    }

    /// Free-text search. The query is trimmed and lowercased; an empty
    /// query matches everything.
    pub fn search(&self, query: &str) -> Vec<&Student> {
        let needle = query.trim().to_lowercase();
        self.filter(|s| s.matches(&needle))
    }

    /// Append a new record under the next id and advance the counter.
    pub fn insert(&mut self, fields: StudentFields) -> &Student {
        let id = self.next_id;
        self.next_id += 1;
        self.students.push(Student::new(id, fields));
        &self.students[self.students.len() - 1]
    }

    /// Update a record in place. Returns `None` if the id is unknown.
    pub fn update(&mut self, id: StudentId, fields: StudentFields) -> Option<&Student> {
        let student = self.find_by_id_mut(id)?;
        student.apply(fields);
        Some(student)
    }

    /// Remove a record outright, returning it if it existed.
    pub fn remove(&mut self, id: StudentId) -> Option<Student> {
        let index = self.students.iter().position(|s| s.id == id)?;
        Some(self.students.remove(index))
    }

    /// Restore the `next_id` invariant. Returns true if a repair was needed.
    pub fn repair_next_id(&mut self) -> bool {
        let floor = self.students.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        if self.next_id < floor {
            self.next_id = floor;
            true
        } else {
            false
        }
    }

    /// Recompute `attendance_percent` wherever it does not match
    /// `attendance`. Returns how many records were fixed.
    pub fn repair_attendance_percent(&mut self) -> usize {
        let mut repaired = 0;
        for student in &mut self.students {
            let expected = format!("{}%", student.attendance);
            if student.attendance_percent != expected {
                student.attendance_percent = expected;
                repaired += 1;
            }
        }
        repaired
    }
}
