//! File-based record storage.
//!
//! Records are stored as one JSON file per record at
//! `<data_dir>/<kind>/<id>.json`. Atomic writes are achieved via the
//! temp file + rename pattern.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use uuid::Uuid;

use crate::config::data_dir;
use crate::error::{PinkTowerError, Result};
use crate::store::{Record, RecordStore};

/// File-based datastore.
///
/// Cheap to clone; the handle is just the data directory path.
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Directory under which per-kind subdirectories live.
    root: PathBuf,
}

impl FileStore {
    /// Create a file store rooted at the default data directory
    /// (`~/.pinktower/data/` or `$PINKTOWER_HOME/data/`).
    pub fn new() -> Result<Self> {
        let root = data_dir().ok_or_else(|| {
            PinkTowerError::config("Could not determine data directory (no home directory)")
        })?;
        Self::with_root(root)
    }

    /// Create a file store rooted at a custom directory.
    pub fn with_root(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.exists() {
            fs::create_dir_all(&root).map_err(|e| PinkTowerError::storage(&root, e))?;
        }
        Ok(Self { root })
    }

    /// The directory holding one record kind.
    fn kind_dir(&self, kind: &str) -> PathBuf {
        self.root.join(kind)
    }

    /// The path for a record file.
    fn record_path(&self, kind: &str, id: Uuid) -> PathBuf {
        self.kind_dir(kind).join(format!("{}.json", id))
    }

    /// The path for a temp file used during atomic writes.
    fn temp_path(&self, kind: &str, id: Uuid) -> PathBuf {
        self.kind_dir(kind).join(format!(".{}.json.tmp", id))
    }

    /// Write a record atomically using temp file + rename.
    fn atomic_write<R: Record>(&self, record: &R) -> Result<()> {
        let dir = self.kind_dir(R::KIND);
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| PinkTowerError::storage(&dir, e))?;
        }

        let final_path = self.record_path(R::KIND, record.record_id());
        let temp_path = self.temp_path(R::KIND, record.record_id());

        let json = serde_json::to_string_pretty(record)?;

        {
            let mut file = fs::File::create(&temp_path)
                .map_err(|e| PinkTowerError::storage(&temp_path, e))?;
            file.write_all(json.as_bytes())
                .map_err(|e| PinkTowerError::storage(&temp_path, e))?;
            file.sync_all()
                .map_err(|e| PinkTowerError::storage(&temp_path, e))?;
        }

        // Rename temp file to final path (atomic on POSIX)
        fs::rename(&temp_path, &final_path)
            .map_err(|e| PinkTowerError::storage(&final_path, e))?;

        Ok(())
    }
}

impl<R: Record> RecordStore<R> for FileStore {
    fn get(&self, id: Uuid) -> Result<Option<R>> {
        let path = self.record_path(R::KIND, id);

        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path).map_err(|e| PinkTowerError::storage(&path, e))?;
        let record: R = serde_json::from_str(&content)?;

        Ok(Some(record))
    }

    fn put(&self, record: &R) -> Result<()> {
        self.atomic_write(record)
    }

    fn delete(&self, id: Uuid) -> Result<()> {
        let path = self.record_path(R::KIND, id);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PinkTowerError::storage(&path, e)),
        }
    }

    fn list(&self) -> Result<Vec<R>> {
        let dir = self.kind_dir(R::KIND);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&dir).map_err(|e| PinkTowerError::storage(&dir, e))?;

        let mut records = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| PinkTowerError::storage(&dir, e))?;
            let path = entry.path();

            // Skip non-JSON files and temp files
            if path.extension().map(|e| e != "json").unwrap_or(true) {
                continue;
            }
            if path
                .file_name()
                .map(|n| n.to_string_lossy().starts_with('.'))
                .unwrap_or(true)
            {
                continue;
            }

            // Skip files that fail to read or parse; a corrupt record
            // should not take the whole collection down.
            if let Ok(content) = fs::read_to_string(&path) {
                match serde_json::from_str::<R>(&content) {
                    Ok(record) => records.push(record),
                    Err(e) => {
                        tracing::warn!("skipping unreadable record {}: {}", path.display(), e);
                    }
                }
            }
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Guide, Student};
    use crate::store::traits::tests::test_record_store_crud;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_crud() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::with_root(dir.path()).unwrap();
        test_record_store_crud(&store);
    }

    #[test]
    fn test_kinds_live_in_separate_directories() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::with_root(dir.path()).unwrap();

        let student = Student::new("Ada", "Lovelace");
        let guide = Guide::new("key-1", "A Guide");
        store.put(&student).unwrap();
        store.put(&guide).unwrap();

        assert!(dir
            .path()
            .join("students")
            .join(format!("{}.json", student.id))
            .exists());
        assert!(dir
            .path()
            .join("guides")
            .join(format!("{}.json", guide.id))
            .exists());
    }

    #[test]
    fn test_list_skips_temp_and_foreign_files() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::with_root(dir.path()).unwrap();

        let student = Student::new("Ada", "Lovelace");
        store.put(&student).unwrap();

        let students_dir = dir.path().join("students");
        std::fs::write(students_dir.join(".leftover.json.tmp"), "{}").unwrap();
        std::fs::write(students_dir.join("notes.txt"), "not a record").unwrap();

        let listed: Vec<Student> = store.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, student.id);
    }

    #[test]
    fn test_list_skips_corrupt_records() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::with_root(dir.path()).unwrap();

        let student = Student::new("Ada", "Lovelace");
        store.put(&student).unwrap();

        let students_dir = dir.path().join("students");
        std::fs::write(
            students_dir.join(format!("{}.json", Uuid::new_v4())),
            "{ not valid json",
        )
        .unwrap();

        let listed: Vec<Student> = store.list().unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[test]
    fn test_missing_kind_dir_lists_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::with_root(dir.path()).unwrap();
        let listed: Vec<Student> = store.list().unwrap();
        assert!(listed.is_empty());
    }

    #[test]
    fn test_reopen_sees_persisted_records() {
        let dir = TempDir::new().unwrap();
        let student = Student::new("Ada", "Lovelace");
        {
            let store = FileStore::with_root(dir.path()).unwrap();
            store.put(&student).unwrap();
        }
        let reopened = FileStore::with_root(dir.path()).unwrap();
        let loaded: Option<Student> = reopened.get(student.id).unwrap();
        assert_eq!(loaded.unwrap().display_name, "Ada Lovelace");
    }
}
