//! Persistence for user-entered progress.
//!
//! Actual mobility values are optional and only used to overlay the
//! projection. They live in `<data_dir>/progress.json`, guarded by the
//! `progress.json.lock` sidecar.

use crate::{Error, Result, UserProgress};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// File name of the progress store inside the data directory
pub const PROGRESS_FILE_NAME: &str = "progress.json";

/// Stored progress values with the time they were entered
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ProgressRecord {
    pub values: UserProgress,
    pub recorded_at: DateTime<Utc>,
}

impl ProgressRecord {
    pub fn new(values: UserProgress) -> Self {
        Self {
            values,
            recorded_at: Utc::now(),
        }
    }

    pub fn path_in(data_dir: &Path) -> PathBuf {
        data_dir.join(PROGRESS_FILE_NAME)
    }

    /// Sidecar lock file guarding `path` (`progress.json.lock`)
    ///
    /// The store itself is replaced by rename on every save, so locking it
    /// directly would leave readers holding a lock on an unlinked inode.
    pub fn lock_path(path: &Path) -> PathBuf {
        let mut name = path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| PROGRESS_FILE_NAME.into());
        name.push(".lock");
        path.with_file_name(name)
    }

    fn open_lock(path: &Path) -> std::io::Result<File> {
        OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(Self::lock_path(path))
    }

    /// Load the record under a shared lock
    ///
    /// Returns `None` if the file doesn't exist.
    /// If the file is unreadable or corrupted, logs a warning and returns `None`.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            tracing::debug!("No progress file at {:?}", path);
            return Ok(None);
        }

        let lock = match Self::open_lock(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("Unable to open progress lock for {:?}: {}. Ignoring.", path, e);
                return Ok(None);
            }
        };

        if let Err(e) = lock.lock_shared() {
            tracing::warn!("Unable to lock progress file {:?}: {}. Ignoring.", path, e);
            return Ok(None);
        }

        let contents = std::fs::read_to_string(path);
        lock.unlock()?;

        let contents = match contents {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("Progress file {:?} cleared before read", path);
                return Ok(None);
            }
            Err(e) => {
                tracing::warn!("Failed to read progress file {:?}: {}. Ignoring.", path, e);
                return Ok(None);
            }
        };

        // Out-of-range values fail here too, via UserProgress's TryFrom
        match serde_json::from_str::<ProgressRecord>(&contents) {
            Ok(record) => {
                tracing::debug!("Loaded progress from {:?}", path);
                Ok(Some(record))
            }
            Err(e) => {
                tracing::warn!("Failed to parse progress file {:?}: {}. Ignoring.", path, e);
                Ok(None)
            }
        }
    }

    /// Save the record
    ///
    /// Writers are serialized by an exclusive lock on the sidecar lock file.
    /// The new contents go to a temp file in the same directory, are synced,
    /// then renamed over the original, so readers see either the old or the
    /// new record and never a partial write.
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "progress path missing parent")
        })?;
        std::fs::create_dir_all(parent)?;

        let lock = Self::open_lock(path)?;
        lock.lock_exclusive()?;

        let result = self.write_atomic(parent, path);
        lock.unlock()?;
        result?;

        tracing::info!("Saved progress to {:?}", path);
        Ok(())
    }

    fn write_atomic(&self, dir: &Path, path: &Path) -> Result<()> {
        let temp = NamedTempFile::new_in(dir)?;
        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            serde_json::to_writer_pretty(&mut writer, self)?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }

    /// Remove the stored record, returning whether one existed
    pub fn clear(path: &Path) -> Result<bool> {
        if !path.exists() {
            return Ok(false);
        }

        let lock = Self::open_lock(path)?;
        lock.lock_exclusive()?;
        let removed = std::fs::remove_file(path);
        lock.unlock()?;

        match removed {
            Ok(()) => {
                tracing::info!("Cleared progress at {:?}", path);
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
