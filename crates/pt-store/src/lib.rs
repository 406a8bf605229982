//! Storage layer for the presence tracker.
//!
//! Persists the entity directory and one presence log per entity as JSON
//! files under a data directory:
//!
//! ```text
//! <data_dir>/
//!   directory.json     { "<id>": "<name>", ... }
//!   logs/<name>.json   [ { "time": "YYYY-MM-DD HH:MM:SS" }, ... ]
//!   .lock
//! ```
//!
//! # Concurrency
//!
//! Every mutation takes an exclusive advisory lock on `.lock` for its whole
//! read-modify-write cycle. The lock is released when the guard drops, on
//! every exit path. Files are replaced by writing a temporary sibling and
//! renaming it over the target, so a crash never leaves a half-written file.
//!
//! Reads do not lock; they may observe the state before or after a
//! concurrent mutation but never a partial file.

mod directory;

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use pt_core::RawEvent;
use serde::Serialize;
use tempfile::NamedTempFile;
use thiserror::Error;

pub use directory::{AddOutcome, Directory, Entry};

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A filesystem operation failed.
    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// A stored file is not valid JSON of the expected shape.
    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// No entity has this display name.
    #[error("no entity named {0:?}")]
    NotFound(String),
    /// The display name already belongs to another identifier.
    #[error("display name {name:?} is already used by ID {existing_id}")]
    DuplicateName { name: String, existing_id: String },
    /// The identifier or name is empty or cannot key a log file.
    #[error("invalid identifier or name: {0:?}")]
    InvalidName(String),
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

const DIRECTORY_FILE: &str = "directory.json";
const LOGS_DIR: &str = "logs";
const LOCK_FILE: &str = ".lock";

/// Exclusive hold on the store. Released on drop.
struct LockGuard {
    file: File,
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!(error = %e, "failed to release store lock");
        }
    }
}

/// File-backed directory and logs.
#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
}

impl Store {
    /// Opens the store at `data_dir`, creating any missing pieces empty.
    pub fn open(data_dir: &Path) -> Result<Self, StoreError> {
        let store = Self {
            root: data_dir.to_path_buf(),
        };

        let logs_dir = store.logs_dir();
        fs::create_dir_all(&logs_dir).map_err(|e| StoreError::io(&logs_dir, e))?;

        let directory_path = store.directory_path();
        if !directory_path.exists() {
            let _lock = store.lock()?;
            if !directory_path.exists() {
                write_json_atomic(&directory_path, &Directory::default())?;
                tracing::info!(path = %directory_path.display(), "created empty directory");
            }
        }

        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn directory_path(&self) -> PathBuf {
        self.root.join(DIRECTORY_FILE)
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join(LOGS_DIR)
    }

    /// Path of the log keyed by `name`.
    pub fn log_path(&self, name: &str) -> Result<PathBuf, StoreError> {
        directory::validate_key(name)?;
        Ok(self.logs_dir().join(format!("{name}.json")))
    }

    fn lock(&self) -> Result<LockGuard, StoreError> {
        let path = self.root.join(LOCK_FILE);
        let file = File::create(&path).map_err(|e| StoreError::io(&path, e))?;
        file.lock_exclusive().map_err(|e| StoreError::io(&path, e))?;
        Ok(LockGuard { file })
    }

    /// Loads the directory. A missing file reads as empty.
    pub fn load_directory(&self) -> Result<Directory, StoreError> {
        Ok(read_json(&self.directory_path())?.unwrap_or_default())
    }

    /// Resolves a display name to its directory entry.
    pub fn resolve(&self, name: &str) -> Result<Entry, StoreError> {
        self.load_directory()?
            .find_by_name(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    /// Adds an entity, or renames an existing identifier.
    pub fn add_entity(&self, id: &str, name: &str) -> Result<AddOutcome, StoreError> {
        let _lock = self.lock()?;
        let mut directory = self.load_directory()?;
        let outcome = directory.add(id, name)?;
        write_json_atomic(&self.directory_path(), &directory)?;

        match &outcome {
            AddOutcome::Inserted => tracing::info!(id, name, "added entity"),
            AddOutcome::Replaced { previous_name } => {
                tracing::info!(id, name, previous_name = %previous_name, "renamed entity");
                if previous_name != name && self.log_path(previous_name)?.exists() {
                    tracing::warn!(
                        previous_name = %previous_name,
                        "log keyed by previous name is no longer reachable"
                    );
                }
            }
        }
        Ok(outcome)
    }

    /// Removes an entity by display name and deletes its log.
    ///
    /// A missing log is not an error. The log is deleted before the directory
    /// is rewritten, so a failure leaves the entity in place.
    pub fn remove_entity(&self, name: &str) -> Result<Entry, StoreError> {
        let _lock = self.lock()?;
        let mut directory = self.load_directory()?;
        let removed = directory.remove_by_name(name)?;
        let log_path = self.log_path(&removed.name)?;

        match fs::remove_file(&log_path) {
            Ok(()) => tracing::debug!(path = %log_path.display(), "deleted log"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(StoreError::io(&log_path, e)),
        }
        write_json_atomic(&self.directory_path(), &directory)?;

        tracing::info!(id = %removed.id, name = %removed.name, "removed entity");
        Ok(removed)
    }

    /// Loads an entity's raw log. Returns `None` if no log exists yet.
    pub fn load_log(&self, name: &str) -> Result<Option<Vec<RawEvent>>, StoreError> {
        read_json(&self.log_path(name)?)
    }

    /// Replaces an entity's log.
    pub fn save_log(&self, name: &str, events: &[RawEvent]) -> Result<(), StoreError> {
        let path = self.log_path(name)?;
        let _lock = self.lock()?;
        write_json_atomic(&path, &events)
    }
}

fn read_json<T>(path: &Path) -> Result<Option<T>, StoreError>
where
    T: serde::de::DeserializeOwned,
{
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(StoreError::io(path, e)),
    };
    serde_json::from_str(&content)
        .map(Some)
        .map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })
}

/// Writes pretty JSON to a temporary sibling, then renames it over `path`.
fn write_json_atomic<T>(path: &Path, value: &T) -> Result<(), StoreError>
where
    T: Serialize + ?Sized,
{
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let json = serde_json::to_string_pretty(value).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let mut tmp = NamedTempFile::new_in(parent).map_err(|e| StoreError::io(parent, e))?;
    tmp.write_all(json.as_bytes())
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| StoreError::io(tmp.path(), e))?;
    tmp.persist(path)
        .map_err(|e| StoreError::io(path, e.error))?;
    Ok(())
}
