//! File-backed persistence provider
//!
//! Each key is stored as `<data_dir>/<key>.json`. Writes are atomic (write
//! to a temp file, sync, then rename) so a crash never leaves a value
//! half-written.
//!
//! Storage location: `~/.local/share/ticklist/` (configurable via `Config`)

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::error::{StorageError, StorageResult};
use super::{validate_key, KeyValueStore, CORRUPT_SUFFIX};

/// Persistence provider writing one file per key
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

/// Storage statistics for a single key
#[derive(Debug, Clone, Default)]
pub struct StorageStats {
    /// Whether a value has been written for the key
    pub exists: bool,
    /// Size of the stored value in bytes
    pub size: u64,
}

impl StorageStats {
    /// Get size in human-readable format
    pub fn size_human(&self) -> String {
        format_bytes(self.size)
    }
}

impl FileStore {
    /// Create a provider rooted at `dir`
    ///
    /// The directory is created lazily on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the stored values
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`
    pub fn path_for(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{}.json", key)))
    }

    /// Size and presence of the value stored under `key`
    pub fn stats(&self, key: &str) -> StorageResult<StorageStats> {
        let path = self.path_for(key)?;
        match fs::metadata(&path) {
            Ok(meta) => Ok(StorageStats {
                exists: true,
                size: meta.len(),
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(StorageStats::default()),
            Err(e) => Err(StorageError::read(e, path)),
        }
    }
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.path_for(key)?;
        let backup_path = self.path_for(&format!("{}{}", key, CORRUPT_SUFFIX))?;

        tokio::task::spawn_blocking(move || -> StorageResult<Option<String>> {
            let bytes = match fs::read(&path) {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
                Err(e) => return Err(StorageError::read(e, path)),
            };

            match String::from_utf8(bytes) {
                Ok(content) => {
                    debug!("Read {} bytes from {:?}", content.len(), path);
                    Ok(Some(content))
                }
                Err(e) => {
                    let backup = back_up_raw(&backup_path, e.as_bytes());
                    Err(StorageError::InvalidEncoding { path, backup })
                }
            }
        })
        .await?
    }

    async fn set(&self, key: &str, value: String) -> StorageResult<()> {
        let path = self.path_for(key)?;

        tokio::task::spawn_blocking(move || -> StorageResult<()> {
            atomic_write(&path, value.as_bytes())?;
            debug!("Wrote {} bytes to {:?}", value.len(), path);
            Ok(())
        })
        .await?
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| StorageError::CreateDirectory {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    // Temp file must live in the same directory for the rename to be atomic
    let temp_path = path.with_extension("json.tmp");

    let mut file =
        File::create(&temp_path).map_err(|e| StorageError::write(e, temp_path.clone()))?;

    file.write_all(data)
        .map_err(|e| StorageError::write(e, temp_path.clone()))?;

    file.sync_all()
        .map_err(|e| StorageError::write(e, temp_path.clone()))?;

    fs::rename(&temp_path, path).map_err(|source| StorageError::AtomicWriteFailed {
        from: temp_path.clone(),
        to: path.to_path_buf(),
        source,
    })?;

    Ok(())
}

/// Copy an undecodable value next to the original
fn back_up_raw(backup_path: &Path, data: &[u8]) -> Option<PathBuf> {
    match atomic_write(backup_path, data) {
        Ok(()) => {
            warn!("Copied undecodable value to {:?}", backup_path);
            Some(backup_path.to_path_buf())
        }
        Err(e) => {
            warn!("Could not back up undecodable value to {:?}: {}", backup_path, e);
            None
        }
    }
}

fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
