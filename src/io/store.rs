use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::io::recovery::atomic_write;
use crate::model::task::Task;

pub const TASKS_FILE_NAME: &str = "tasks.json";

/// Error type for task persistence
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("stored tasks are corrupted")]
    Corrupt,
    #[error("could not encode tasks: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Byte-level storage for the task list.
pub trait TaskStore {
    /// Stored bytes, or an empty JSON list when nothing was saved yet.
    fn load(&self) -> Result<Vec<u8>, StoreError>;
    fn save(&self, data: &[u8]) -> Result<(), StoreError>;
}

/// Tasks kept in a single JSON file
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into() }
    }

    /// The tasks file inside a data directory
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(TASKS_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TaskStore for FileStore {
    fn load(&self) -> Result<Vec<u8>, StoreError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(b"[]".to_vec()),
            Err(source) => Err(StoreError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn save(&self, data: &[u8]) -> Result<(), StoreError> {
        let write_err = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir).map_err(write_err)?;
        }
        atomic_write(&self.path, data).map_err(write_err)
    }
}

pub fn decode_tasks(data: &[u8]) -> Result<Vec<Task>, StoreError> {
    serde_json::from_slice(data).map_err(|_| StoreError::Corrupt)
}

pub fn encode_tasks(tasks: &[Task]) -> Result<Vec<u8>, StoreError> {
    let mut out = serde_json::to_vec_pretty(tasks)?;
    out.push(b'\n');
    Ok(out)
}

/// Result of reading the task list at startup
#[derive(Debug)]
pub struct LoadedTasks {
    pub tasks: Vec<Task>,
    /// Raw bytes that failed to decode; the list is empty when set
    pub corrupt: Option<Vec<u8>>,
}

/// Load and decode, starting empty when the stored data is corrupt.
/// Read failures are still errors.
pub fn load_tasks(store: &dyn TaskStore, now: DateTime<Local>) -> Result<LoadedTasks, StoreError> {
    let data = store.load()?;
    match decode_tasks(&data) {
        Ok(mut tasks) => {
            for task in &mut tasks {
                task.normalize(now);
            }
            Ok(LoadedTasks {
                tasks,
                corrupt: None,
            })
        }
        Err(StoreError::Corrupt) => Ok(LoadedTasks {
            tasks: Vec::new(),
            corrupt: Some(data),
        }),
        Err(e) => Err(e),
    }
}
