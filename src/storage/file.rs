//! File-backed client storage
//!
//! All keys live in one JSON object on disk. The file is loaded once on
//! open and rewritten after every mutation: the new content goes to a
//! sibling temp file first and is then renamed over the old one, so a
//! crash mid-write never leaves a truncated store behind.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{ClientStorage, StorageError, StorageResult};

/// Client storage persisted to a single JSON file
pub struct FileStorage {
    path: PathBuf,
    items: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Open or create the store at `path`
    ///
    /// A missing file is an empty store. A file that is not a JSON object
    /// of strings is moved aside to `<name>.bad` and the store starts empty.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let items: BTreeMap<String, String> = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => match serde_json::from_str(&content) {
                Ok(items) => items,
                Err(e) => {
                    let moved_to = quarantine(&path)?;
                    tracing::warn!(
                        path = ?path,
                        moved_to = ?moved_to,
                        error = %e,
                        "Unreadable client storage moved aside, starting empty"
                    );
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(path = ?path, keys = items.len(), "Opened client storage");

        Ok(Self {
            path,
            items: Mutex::new(items),
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `change` to the map and write the result to disk
    fn mutate<F>(&self, change: F) -> StorageResult<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let mut items = self
            .items
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;

        let mut next = items.clone();
        change(&mut next);
        self.persist(&next)?;
        *items = next;
        Ok(())
    }

    fn persist(&self, items: &BTreeMap<String, String>) -> StorageResult<()> {
        let content = serde_json::to_string_pretty(items)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Rename a corrupt store to `<name>.bad`, replacing any earlier one
fn quarantine(path: &Path) -> StorageResult<PathBuf> {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".bad");
    let target = path.with_file_name(name);
    fs::rename(path, &target)?;
    Ok(target)
}

impl ClientStorage for FileStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let items = self
            .items
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.mutate(|items| {
            items.insert(key.to_string(), value.to_string());
        })
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.mutate(|items| {
            items.remove(key);
        })
    }

    fn clear(&self) -> StorageResult<()> {
        self.mutate(|items| items.clear())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");

        {
            let storage = FileStorage::open(&path).unwrap();
            storage.set_item("token", "tok123").unwrap();
            storage.set_item("education", "[]").unwrap();
        }

        let storage = FileStorage::open(&path).unwrap();
        assert_eq!(storage.get_item("token").unwrap().as_deref(), Some("tok123"));
        assert_eq!(storage.get_item("education").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_missing_file_is_empty_and_nested_dirs_are_created() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("session.json");

        let storage = FileStorage::open(&path).unwrap();
        assert!(storage.get_item("token").unwrap().is_none());

        storage.set_item("token", "x").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_remove_and_clear_are_persisted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");

        let storage = FileStorage::open(&path).unwrap();
        storage.set_item("token", "a").unwrap();
        storage.set_item("todo_tasks", "[]").unwrap();
        storage.remove_item("token").unwrap();

        let reopened = FileStorage::open(&path).unwrap();
        assert!(reopened.get_item("token").unwrap().is_none());
        assert!(reopened.get_item("todo_tasks").unwrap().is_some());

        reopened.clear().unwrap();
        let reopened = FileStorage::open(&path).unwrap();
        assert!(reopened.get_item("todo_tasks").unwrap().is_none());
    }

    #[test]
    fn test_corrupt_file_is_moved_aside() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        let storage = FileStorage::open(&path).unwrap();
        assert!(storage.get_item("token").unwrap().is_none());
        assert!(!path.exists());

        let bad = dir.path().join("session.json.bad");
        assert_eq!(std::fs::read_to_string(&bad).unwrap(), "not json");

        storage.set_item("todo_tasks", "[]").unwrap();
        storage.clear().unwrap();
        let reopened = FileStorage::open(&path).unwrap();
        assert!(reopened.get_item("todo_tasks").unwrap().is_none());
    }
}
