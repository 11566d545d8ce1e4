//! Persisted Client Storage
//!
//! A small string key/value store with the contract of a browser's local
//! storage: get, set, remove, clear. Values are strings; structured values
//! are stored as JSON through [`read_json`] and [`write_json`].
//!
//! - **file**: JSON file on disk, rewritten on every mutation
//! - **memory**: process-local map for tests and ephemeral sessions
//! - **error**: Error types
//!
//! # Key namespaces
//!
//! ```text
//! session store:  token, user, education
//! checklist:      todo_tasks
//! ```
//!
//! The two owners never touch each other's keys; only `clear()` (logout)
//! crosses the boundary.

pub mod error;
pub mod file;
pub mod memory;

pub use error::{StorageError, StorageResult};
pub use file::FileStorage;
pub use memory::MemoryStorage;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Key holding the bearer credential
pub const TOKEN_KEY: &str = "token";
/// Key holding the serialized user profile
pub const PROFILE_KEY: &str = "user";
/// Key holding the serialized education tips
pub const TIPS_KEY: &str = "education";
/// Key holding the serialized onboarding checklist
pub const CHECKLIST_KEY: &str = "todo_tasks";

/// Local key/value storage shared by the session store and the checklist
pub trait ClientStorage: Send + Sync {
    /// Read the raw value stored under `key`
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete `key`; deleting a missing key is not an error
    fn remove_item(&self, key: &str) -> StorageResult<()>;

    /// Erase every key
    fn clear(&self) -> StorageResult<()>;
}

/// Read and decode a JSON value
pub fn read_json<T: DeserializeOwned>(
    storage: &dyn ClientStorage,
    key: &str,
) -> StorageResult<Option<T>> {
    match storage.get_item(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Encode and store a JSON value
pub fn write_json<T: Serialize + ?Sized>(
    storage: &dyn ClientStorage,
    key: &str,
    value: &T,
) -> StorageResult<()> {
    let raw = serde_json::to_string(value)?;
    storage.set_item(key, &raw)
}
