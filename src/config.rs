//! Explicit configuration for the record store and the borrow workflow.
//! Nothing in the crate reads a global path; callers build a [`StoreConfig`]
//! and hand it to [`crate::Library::open`].

use std::path::PathBuf;
use std::time::Duration;

use directories::BaseDirs;

use crate::error::StoreError;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".library-records";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "library.sqlite";
/// Environment variable that overrides the default database path.
pub const DB_PATH_ENV: &str = "LIBRARY_RECORDS_DB";

const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Where the collections live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    File(PathBuf),
    /// Private in-memory database, discarded when the connection closes.
    InMemory,
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub location: StoreLocation,
    /// How long a writer waits for another writer's transaction to finish.
    pub busy_timeout: Duration,
}

impl StoreConfig {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            location: StoreLocation::File(path.into()),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    pub fn in_memory() -> Self {
        Self {
            location: StoreLocation::InMemory,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    /// Resolve the database path from `LIBRARY_RECORDS_DB`, falling back to
    /// `~/.library-records/library.sqlite`.
    pub fn from_env() -> Result<Self, StoreError> {
        match std::env::var_os(DB_PATH_ENV) {
            Some(path) if !path.is_empty() => Ok(Self::file(PathBuf::from(path))),
            _ => Ok(Self::file(default_db_path()?)),
        }
    }
}

/// Resolve the absolute path to the SQLite database inside the user's home.
pub fn default_db_path() -> Result<PathBuf, StoreError> {
    let base_dirs = BaseDirs::new().ok_or(StoreError::NoHomeDir)?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(DB_FILE_NAME))
}

/// Knobs for the borrow/reservation workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowPolicy {
    /// Reject borrows and reservations that name an unknown member. Turning
    /// this off reproduces the unchecked self-service reservation path.
    pub validate_member: bool,
}

impl Default for WorkflowPolicy {
    fn default() -> Self {
        Self {
            validate_member: true,
        }
    }
}
