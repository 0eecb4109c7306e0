//! Property-Based Tests — Domain Layer Invariants
//!
//! Uses `proptest` to verify validation, boolean parsing, search and id
//! allocation across random inputs.

use proptest::prelude::*;

use student_records::domain::form::{parse_truthy, StudentForm, ValidationError};
use student_records::domain::student::StudentDocument;

fn form_with_attendance(attendance: String) -> StudentForm {
    StudentForm {
        roll_no: Some("R1".to_string()),
        name: Some("Alice".to_string()),
        email: Some("a@x.com".to_string()),
        phone: Some("1".to_string()),
        course: Some("CS".to_string()),
        year: Some("1".to_string()),
        grade: Some("A".to_string()),
        attendance: Some(attendance),
        fees_paid: None,
        address: None,
    }
}

// ── Attendance Validation ───────────────────────────────────

proptest! {
    /// Every integer in 0..=100 is accepted and stored verbatim.
    #[test]
    fn attendance_in_range_accepted(a in 0u8..=100) {
        let fields = form_with_attendance(a.to_string()).validate().unwrap();
        prop_assert_eq!(fields.attendance, a);
    }

    /// Integers above 100 are rejected as out of range.
    #[test]
    fn attendance_above_range_rejected(a in 101i64..1_000_000) {
        let err = form_with_attendance(a.to_string()).validate().unwrap_err();
        prop_assert_eq!(err, ValidationError::AttendanceOutOfRange(a));
    }

    /// Negative integers are rejected as out of range.
    #[test]
    fn attendance_below_range_rejected(a in -1_000_000i64..0) {
        let err = form_with_attendance(a.to_string()).validate().unwrap_err();
        prop_assert_eq!(err, ValidationError::AttendanceOutOfRange(a));
    }

    /// Alphabetic attendance is never accepted.
    #[test]
    fn attendance_alpha_rejected(s in "[a-zA-Z]{1,8}") {
        let err = form_with_attendance(s.clone()).validate().unwrap_err();
        prop_assert_eq!(err, ValidationError::InvalidAttendance(s));
    }
}

// ── Boolean Parsing ─────────────────────────────────────────

proptest! {
    /// Only the documented tokens parse as true.
    #[test]
    fn truthy_only_for_known_tokens(s in "[a-z0-9]{0,6}") {
        let expected = matches!(s.as_str(), "true" | "on" | "yes" | "1");
        prop_assert_eq!(parse_truthy(Some(s.as_str())), expected);
    }
}

// ── Search and Id Allocation ────────────────────────────────

proptest! {
    /// Search ignores case: any casing of a stored name finds it.
    #[test]
    fn search_is_case_insensitive(name in "[a-zA-Z]{3,12}") {
        let mut doc = StudentDocument::default();
        let fields = form_with_attendance("50".to_string());
        let mut fields = fields.validate().unwrap();
        fields.name = name.clone();
        doc.insert(fields);

        prop_assert_eq!(doc.search(&name.to_uppercase()).len(), 1);
        prop_assert_eq!(doc.search(&name.to_lowercase()).len(), 1);
    }

    /// After N inserts, with any deletions in between, next_id is N + 1.
    #[test]
    fn next_id_counts_every_create(deletes in proptest::collection::vec(any::<bool>(), 1..30)) {
        let mut doc = StudentDocument::default();
        for (i, delete) in deletes.iter().enumerate() {
            let mut fields = form_with_attendance("50".to_string()).validate().unwrap();
            fields.roll_no = format!("R{i}");
            let id = doc.insert(fields).id;
            if *delete {
                doc.remove(id);
            }
        }
        prop_assert_eq!(doc.next_id, deletes.len() as u64 + 1);
    }
}
