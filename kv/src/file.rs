//! File-backed backend

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::{debug, warn};

use crate::{KeyValueStore, Result, StoreError, validate_key};

const LOCK_FILE: &str = ".lock";
const VALUE_EXT: &str = "json";

/// Directory-backed store: one file per key, guarded by an advisory lock
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// reader in another process sees either the old or the new value.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open or create a store at the given directory
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let root = path.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|source| StoreError::Open {
            path: root.clone(),
            source,
        })?;
        debug!(?root, "Opened file store");
        Ok(Self { root })
    }

    /// Directory holding the store
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn value_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.{}", key, VALUE_EXT))
    }

    fn lock(&self, exclusive: bool) -> Result<LockGuard> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(self.root.join(LOCK_FILE))?;

        let locked = if exclusive {
            FileExt::lock_exclusive(&file)
        } else {
            FileExt::lock_shared(&file)
        };
        locked.map_err(StoreError::Lock)?;

        Ok(LockGuard { file })
    }
}

/// Releases the advisory lock when dropped
struct LockGuard {
    file: File,
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            warn!("Failed to release store lock: {}", e);
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        let _guard = self.lock(false)?;

        match fs::read_to_string(self.value_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        let _guard = self.lock(true)?;

        let path = self.value_path(key);
        let tmp_path = path.with_extension(format!("{}.tmp", VALUE_EXT));

        if let Err(e) = write_then_rename(&tmp_path, &path, value) {
            if let Err(cleanup) = fs::remove_file(&tmp_path)
                && cleanup.kind() != ErrorKind::NotFound
            {
                warn!(?tmp_path, "Failed to remove temporary file: {}", cleanup);
            }
            return Err(e.into());
        }

        debug!(key, bytes = value.len(), "Wrote value");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        validate_key(key)?;
        let _guard = self.lock(true)?;

        match fs::remove_file(self.value_path(key)) {
            Ok(()) => {
                debug!(key, "Removed value");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn write_then_rename(tmp_path: &Path, path: &Path, value: &str) -> std::io::Result<()> {
    let mut tmp = File::create(tmp_path)?;
    tmp.write_all(value.as_bytes())?;
    tmp.sync_all()?;
    drop(tmp);

    fs::rename(tmp_path, path)
}
