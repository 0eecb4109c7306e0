//! Student Service - Record Lifecycle Orchestration
//!
//! One method per use case: list, search, view, create, update, delete,
//! stats and export. Every call loads the full document through the
//! storage port; mutating calls validate, apply the change in memory and
//! save the whole document back.
//!
//! Read-modify-write cycles are serialized by a single writer lock, so
//! two concurrent requests in this process cannot drop each other's
//! changes. Reads skip the lock. Stores write atomically and never let
//! a read discard a document that a save has already replaced.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use crate::domain::form::{StudentForm, ValidationError};
use crate::domain::stats::StudentStats;
use crate::domain::student::{Student, StudentDocument, StudentId};
use crate::ports::storage::StudentStore;

/// Why a use case could not complete.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Student not found!")]
    NotFound(StudentId),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Roll number {0} already exists!")]
    DuplicateRollNo(String),

    #[error("Storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl ServiceError {
    /// Short stable label for metrics and logs.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Validation(ValidationError::MissingFields) => "missing_fields",
            Self::Validation(ValidationError::AttendanceOutOfRange(_)) => {
                "attendance_out_of_range"
            }
            Self::Validation(ValidationError::InvalidAttendance(_)) => "invalid_attendance",
            Self::DuplicateRollNo(_) => "duplicate_roll_no",
            Self::Storage(_) => "storage",
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Explicit record repository handed to every request handler.
pub struct StudentService {
    /// Storage port.
    store: Arc<dyn StudentStore>,
    /// Single-writer lock around load → mutate → save.
    write_lock: Mutex<()>,
}

impl StudentService {
    /// Create a service over the given store.
    pub fn new(store: Arc<dyn StudentStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Prepare the backing storage. Called once at startup.
    pub async fn init(&self) -> anyhow::Result<()> {
        self.store.init().await
    }

    /// Whether the backing storage is usable.
    pub async fn is_healthy(&self) -> bool {
        self.store.is_healthy().await
    }

    async fn load(&self) -> ServiceResult<StudentDocument> {
        Ok(self.store.load().await?)
    }

    /// All records in stored order.
    pub async fn list(&self) -> ServiceResult<Vec<Student>> {
        Ok(self.load().await?.students)
    }

    /// Records whose name, roll number, course or email contain `query`
    /// (case-insensitive).
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> ServiceResult<Vec<Student>> {
        let document = self.load().await?;
        Ok(document.search(query).into_iter().cloned().collect())
    }

    /// One record by id.
    pub async fn get(&self, id: StudentId) -> ServiceResult<Student> {
        self.load()
            .await?
            .find_by_id(id)
            .cloned()
            .ok_or(ServiceError::NotFound(id))
    }

    /// Validate and append a new record.
    #[instrument(skip(self, form))]
    pub async fn create(&self, form: &StudentForm) -> ServiceResult<Student> {
        let fields = form.validate()?;

        let _guard = self.write_lock.lock().await;
        let mut document = self.load().await?;

        if document.find_by_roll_no(&fields.roll_no, None).is_some() {
            warn!(roll_no = %fields.roll_no, "Rejected duplicate roll number");
            return Err(ServiceError::DuplicateRollNo(fields.roll_no));
        }

        let student = document.insert(fields).clone();
        self.store.save(&document).await?;

        info!(id = student.id, roll_no = %student.roll_no, "Student created");
        Ok(student)
    }

    /// Validate and overwrite an existing record.
    #[instrument(skip(self, form))]
    pub async fn update(&self, id: StudentId, form: &StudentForm) -> ServiceResult<Student> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.load().await?;

        // An unknown id wins over a bad submission.
        if document.find_by_id(id).is_none() {
            return Err(ServiceError::NotFound(id));
        }
        let fields = form.validate()?;
        if document.find_by_roll_no(&fields.roll_no, Some(id)).is_some() {
            warn!(id, roll_no = %fields.roll_no, "Rejected duplicate roll number");
            return Err(ServiceError::DuplicateRollNo(fields.roll_no));
        }

        let student = document
            .update(id, fields)
            .cloned()
            .ok_or(ServiceError::NotFound(id))?;
        self.store.save(&document).await?;

        info!(id, roll_no = %student.roll_no, "Student updated");
        Ok(student)
    }

    /// Remove a record. Deleting an unknown id saves nothing and
    /// reports `NotFound`.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: StudentId) -> ServiceResult<Student> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.load().await?;

        let removed = document.remove(id).ok_or(ServiceError::NotFound(id))?;
        self.store.save(&document).await?;

        info!(id, roll_no = %removed.roll_no, "Student deleted");
        Ok(removed)
    }

    /// Totals for the dashboard.
    pub async fn stats(&self) -> ServiceResult<StudentStats> {
        Ok(StudentStats::compute(&self.load().await?.students))
    }

    /// The full, unfiltered collection for export.
    pub async fn export(&self) -> ServiceResult<Vec<Student>> {
        self.list().await
    }
}
