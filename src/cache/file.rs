//! File-backed cache store.
//!
//! Each key is one `<dir>/<key>.json` file. Publishing writes a uniquely
//! named temporary file in the same directory, syncs it and renames it over
//! the target, so concurrent readers see either the previous file or the new
//! one.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::cache::{CacheError, CacheStore};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Stores artifacts as files in one directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Final location of `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let seq = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        self.dir.join(format!(
            ".{}.{}.{}.{}.tmp",
            key,
            std::process::id(),
            nanos,
            seq
        ))
    }
}

impl CacheStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CacheError::Io(e)),
        }
    }

    fn publish(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        fs::create_dir_all(&self.dir)?;

        let temp = self.temp_path(key);
        let written = write_synced(&temp, value).and_then(|_| fs::rename(&temp, self.path_for(key)));

        if let Err(e) = written {
            let _ = fs::remove_file(&temp);
            return Err(CacheError::Io(e));
        }

        tracing::debug!(
            path = %self.path_for(key).display(),
            bytes = value.len(),
            "Cache artifact published"
        );
        Ok(())
    }
}

fn write_synced(path: &Path, value: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(value)?;
    file.sync_all()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o644))?;
    }

    Ok(())
}
