//! Storage Port - Student Document Persistence Interface
//!
//! The whole collection is read and written as one document. Adapters
//! decide where it lives (a JSON file, process memory); the service
//! layer only knows this trait.

use async_trait::async_trait;

use crate::domain::student::StudentDocument;

/// Trait for student document persistence.
///
/// `load` repairs rather than fails: a missing or malformed document
/// yields `StudentDocument::default()`. Only genuine I/O faults (e.g.
/// permission denied) are returned as errors.
#[async_trait]
pub trait StudentStore: Send + Sync + 'static {
  /// Ensure the storage location exists and holds a document.
  /// Called once at process start.
  async fn init(&self) -> anyhow::Result<()>;

  /// Load the full document.
  async fn load(&self) -> anyhow::Result<StudentDocument>;

  /// Overwrite the persisted document with `document`.
  async fn save(&self, document: &StudentDocument) -> anyhow::Result<()>;

  /// Check if the storage location is usable.
  async fn is_healthy(&self) -> bool;
}
