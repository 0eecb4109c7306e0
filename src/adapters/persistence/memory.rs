//! In-process student store.
//!
//! Holds the document behind a `RwLock`. Nothing survives a restart;
//! used for tests and for the `memory` storage backend.

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::student::StudentDocument;
use crate::ports::storage::StudentStore;

/// Volatile student store.
#[derive(Default)]
pub struct MemoryStore {
    document: RwLock<StudentDocument>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with `document`.
    pub fn with_document(document: StudentDocument) -> Self {
        Self {
            document: RwLock::new(document),
        }
    }
}

#[async_trait]
impl StudentStore for MemoryStore {
    async fn init(&self) -> Result<()> {
        Ok(())
    }

    async fn load(&self) -> Result<StudentDocument> {
        Ok(self.document.read().await.clone())
    }

    async fn save(&self, document: &StudentDocument) -> Result<()> {
        *self.document.write().await = document.clone();
        Ok(())
    }

    async fn is_healthy(&self) -> bool {
        true
    }
}
