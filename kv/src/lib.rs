//! KvStore - synchronous local key-value storage
//!
//! A small `localStorage`-style store: string keys map to string values,
//! every call completes synchronously, and a value is always read or written
//! whole.
//!
//! # Backends
//!
//! - [`FileStore`] keeps one file per key in a directory:
//!
//! ```text
//! store/
//! ├── .lock          # advisory lock shared by all keys
//! ├── todos.json     # value stored under "todos"
//! └── ...
//! ```
//!
//! - [`MemoryStore`] keeps values in a `HashMap`; used for tests and
//!   throwaway sessions.
//!
//! # Example
//!
//! ```ignore
//! use kvstore::{FileStore, KeyValueStore};
//!
//! let mut store = FileStore::open("store")?;
//! store.set("todos", "[]")?;
//! assert_eq!(store.get("todos")?.as_deref(), Some("[]"));
//! ```

mod error;
mod file;
mod memory;

pub use error::StoreError;
pub use file::FileStore;
pub use memory::MemoryStore;

/// Result alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// A synchronous string key-value store
pub trait KeyValueStore {
    /// Read the value stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// Check that a key is usable by every backend
///
/// Keys double as file names for [`FileStore`], so they are restricted to
/// ASCII alphanumerics plus `_`, `-` and `.`, must be non-empty and may not
/// start with a dot.
pub fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));

    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}
