//! JSON File Store - Whole-Document Student Persistence
//!
//! Saves the student document to a single pretty-printed JSON file
//! using atomic writes (write to tmp file, then rename), so the file is
//! always either the old or the new version, never a partial write.
//!
//! A missing file loads as an empty document. A malformed file is moved
//! aside to `<file>.corrupt-<timestamp>` and also loads as empty, so the
//! next save cannot silently destroy the only copy.
//!
//! Saves and the move-aside both run under `io_lock`. A reader that saw
//! malformed bytes re-reads the file under that lock before moving
//! anything, so a document saved in the meantime is never quarantined.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Local;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use crate::domain::student::StudentDocument;
use crate::ports::storage::StudentStore;

/// File-backed student store.
pub struct JsonFileStore {
    /// Path to the document, e.g. `data/students.json`.
    path: PathBuf,
    /// Temporary path for atomic writes.
    tmp_path: PathBuf,
    /// Serializes every change to the file on disk.
    io_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Create a store for the given document path. Nothing is touched on
    /// disk until `init`, `load` or `save` runs.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        Self {
            path,
            tmp_path: PathBuf::from(tmp),
            io_lock: Mutex::new(()),
        }
    }

    /// Path of the persisted document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> Option<&Path> {
        self.path.parent().filter(|p| !p.as_os_str().is_empty())
    }

    async fn read_raw(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path).await {
            Ok(json) => Ok(Some(json)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).context("Failed to read student file"),
        }
    }

    /// Re-read the file under `io_lock` and move it aside only if it is
    /// still malformed. Whatever a concurrent save left behind wins.
    async fn recover_malformed(&self) -> Result<StudentDocument> {
        let _guard = self.io_lock.lock().await;

        let Some(json) = self.read_raw().await? else {
            return Ok(StudentDocument::default());
        };
        let err = match serde_json::from_str(&json) {
            Ok(document) => return Ok(document),
            Err(e) => e,
        };

        match self.quarantine().await {
            Ok(moved_to) => warn!(
                error = %err,
                moved_to = %moved_to.display(),
                "Student file is malformed, starting with an empty document"
            ),
            Err(move_err) => warn!(
                error = %err,
                move_error = %move_err,
                "Student file is malformed and could not be moved aside"
            ),
        }
        Ok(StudentDocument::default())
    }

    fn quarantine_path(&self, stamp: &str, attempt: u32) -> PathBuf {
        let mut target = self.path.clone().into_os_string();
        target.push(format!(".corrupt-{stamp}"));
        if attempt > 0 {
            target.push(format!("-{attempt}"));
        }
        PathBuf::from(target)
    }

    /// Move an unparseable document out of the way. Never overwrites an
    /// earlier quarantined copy. Caller holds `io_lock`.
    async fn quarantine(&self) -> Result<PathBuf> {
        let stamp = Local::now().format("%Y%m%d%H%M%S").to_string();
        let mut attempt = 0;
        let mut target = self.quarantine_path(&stamp, attempt);
        while fs::try_exists(&target)
            .await
            .context("Failed to stat quarantine target")?
        {
            attempt += 1;
            target = self.quarantine_path(&stamp, attempt);
        }

        fs::rename(&self.path, &target)
            .await
            .context("Failed to move corrupt student file aside")?;
        Ok(target)
    }
}

#[async_trait]
impl StudentStore for JsonFileStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn init(&self) -> Result<()> {
        if let Some(dir) = self.parent_dir() {
            fs::create_dir_all(dir)
                .await
                .context("Failed to create data directory")?;
        }

        if fs::try_exists(&self.path)
            .await
            .context("Failed to stat student file")?
        {
            return Ok(());
        }

        self.save(&StudentDocument::default()).await?;
        info!("Initialized empty student document");
        Ok(())
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> Result<StudentDocument> {
        let Some(json) = self.read_raw().await? else {
            info!("No student file found, starting with an empty document");
            return Ok(StudentDocument::default());
        };

        let mut document = match serde_json::from_str(&json) {
            Ok(document) => document,
            Err(_) => self.recover_malformed().await?,
        };

        if document.repair_next_id() {
            warn!(
                next_id = document.next_id,
                "next_id was not above every stored id, repaired"
            );
        }
        let stale = document.repair_attendance_percent();
        if stale > 0 {
            warn!(records = stale, "attendance_percent was stale, recomputed");
        }

        Ok(document)
    }

    #[instrument(skip(self, document), fields(path = %self.path.display()))]
    async fn save(&self, document: &StudentDocument) -> Result<()> {
        let json = serde_json::to_string_pretty(document)
            .context("Failed to serialize student document")?;

        let _guard = self.io_lock.lock().await;

        fs::write(&self.tmp_path, &json)
            .await
            .context("Failed to write tmp student file")?;

        fs::rename(&self.tmp_path, &self.path)
            .await
            .context("Failed to rename student file")?;

        info!(
            students = document.students.len(),
            next_id = document.next_id,
            "Student document saved"
        );

        Ok(())
    }

    async fn is_healthy(&self) -> bool {
        let dir = self.parent_dir().unwrap_or_else(|| Path::new("."));
        fs::metadata(dir).await.is_ok_and(|m| m.is_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::form::StudentFields;

    fn fields(roll_no: &str) -> StudentFields {
        StudentFields {
            roll_no: roll_no.to_string(),
            name: "Alice".to_string(),
            email: "a@x.com".to_string(),
            phone: "1".to_string(),
            course: "CS".to_string(),
            year: "1".to_string(),
            grade: "A".to_string(),
            attendance: 95,
            fees_paid: false,
            address: String::new(),
        }
    }

    #[tokio::test]
    async fn test_init_creates_default_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("students.json");
        let store = JsonFileStore::new(&path);

        store.init().await.unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let doc: StudentDocument = serde_json::from_str(&raw).unwrap();
        assert_eq!(doc, StudentDocument::default());
        assert!(store.is_healthy().await);
    }

    #[tokio::test]
    async fn test_init_keeps_existing_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("students.json"));
        let mut doc = StudentDocument::default();
        doc.insert(fields("R1"));
        store.save(&doc).await.unwrap();

        store.init().await.unwrap();

        assert_eq!(store.load().await.unwrap(), doc);
    }

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("absent.json"));
        assert_eq!(store.load().await.unwrap(), StudentDocument::default());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("students.json"));
        let mut doc = StudentDocument::default();
        doc.insert(fields("R1"));
        doc.insert(fields("R2"));

        store.save(&doc).await.unwrap();

        assert_eq!(store.load().await.unwrap(), doc);
        assert!(!dir.path().join("students.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_moved_aside() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.json");
        std::fs::write(&path, "{ not json").unwrap();
        let store = JsonFileStore::new(&path);

        let doc = store.load().await.unwrap();

        assert_eq!(doc, StudentDocument::default());
        assert!(!path.exists());
        let preserved: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().contains(".corrupt-"))
            .collect();
        assert_eq!(preserved.len(), 1);
        assert_eq!(
            std::fs::read_to_string(preserved[0].path()).unwrap(),
            "{ not json"
        );
    }

    #[tokio::test]
    async fn test_stale_next_id_is_repaired_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("students.json"));
        let mut doc = StudentDocument::default();
        doc.insert(fields("R1"));
        doc.insert(fields("R2"));
        doc.next_id = 2;
        store.save(&doc).await.unwrap();

        assert_eq!(store.load().await.unwrap().next_id, 3);
    }

    #[tokio::test]
    async fn test_missing_attendance_percent_is_recomputed_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.json");
        std::fs::write(
            &path,
            r#"{"students":[{"id":1,"roll_no":"R1","name":"Dee","email":"d@x.com",
                "phone":"9","course":"CS","year":"2","grade":"B","attendance":70,
                "fees_paid":true,"created_at":"2024-01-01 10:00:00",
                "updated_at":"2024-01-01 10:00:00"}],"next_id":2}"#,
        )
        .unwrap();
        let store = JsonFileStore::new(&path);

        let doc = store.load().await.unwrap();

        assert_eq!(doc.students[0].attendance_percent, "70%");
        assert_eq!(doc.students[0].address, "");
    }

    #[tokio::test]
    async fn test_quarantine_keeps_every_corrupt_copy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.json");
        let store = JsonFileStore::new(&path);

        std::fs::write(&path, "{ first").unwrap();
        store.load().await.unwrap();
        std::fs::write(&path, "{ second").unwrap();
        store.load().await.unwrap();

        let mut preserved: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().contains(".corrupt-"))
            .map(|e| std::fs::read_to_string(e.path()).unwrap())
            .collect();
        preserved.sort();
        assert_eq!(preserved, vec!["{ first", "{ second"]);
    }

    #[tokio::test]
    async fn test_malformed_bytes_are_not_quarantined_after_a_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.json");
        let store = JsonFileStore::new(&path);
        let mut doc = StudentDocument::default();
        doc.insert(fields("R1"));
        store.save(&doc).await.unwrap();

        // A reader that saw stale malformed bytes must pick up the saved
        // document instead of moving it aside.
        assert_eq!(store.recover_malformed().await.unwrap(), doc);
        assert!(path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
