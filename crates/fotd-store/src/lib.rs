//! Single-document snapshot store.
//!
//! The latest [`Snapshot`] lives in one JSON file, replaced atomically by
//! writing a sibling temp file and renaming it over the target. Readers never
//! observe a partially written document. The last saved snapshot is also
//! kept in memory for the read API.

mod error;

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fotd_core::Snapshot;
use tempfile::NamedTempFile;
use tokio::sync::RwLock;

pub use error::StoreError;

pub struct SnapshotStore {
    path: PathBuf,
    current: RwLock<Arc<Snapshot>>,
}

impl SnapshotStore {
    /// Open the store at `path`, reading any snapshot already on disk.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if an existing file cannot be read or parsed.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let snapshot = read_blocking(path.clone()).await?;
        tracing::info!(
            path = %path.display(),
            locations = snapshot.total_locations,
            "snapshot store opened"
        );
        Ok(Self {
            path,
            current: RwLock::new(Arc::new(snapshot)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The most recently saved (or initially loaded) snapshot.
    pub async fn current(&self) -> Arc<Snapshot> {
        Arc::clone(&*self.current.read().await)
    }

    /// Persist `snapshot`, then make it the current one.
    ///
    /// The in-memory snapshot is left untouched when the write fails.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if serialization or the file write fails.
    pub async fn save(&self, snapshot: Snapshot) -> Result<Arc<Snapshot>, StoreError> {
        let body = serde_json::to_vec_pretty(&snapshot).map_err(StoreError::Serialize)?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomic(&path, &body)).await??;

        let snapshot = Arc::new(snapshot);
        *self.current.write().await = Arc::clone(&snapshot);
        tracing::info!(
            path = %self.path.display(),
            locations = snapshot.total_locations,
            "snapshot saved"
        );
        Ok(snapshot)
    }

    /// Read the snapshot on disk, bypassing the in-memory copy.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] for any failure other than the file being absent.
    pub async fn load(&self) -> Result<Snapshot, StoreError> {
        read_blocking(self.path.clone()).await
    }
}

async fn read_blocking(path: PathBuf) -> Result<Snapshot, StoreError> {
    tokio::task::spawn_blocking(move || read_snapshot(&path)).await?
}

/// Read the snapshot at `path`; an absent file yields [`Snapshot::empty`].
///
/// # Errors
///
/// Returns [`StoreError`] if the file exists but cannot be read or parsed.
pub fn read_snapshot(path: &Path) -> Result<Snapshot, StoreError> {
    let body = match fs::read(path) {
        Ok(body) => body,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Snapshot::empty()),
        Err(e) => return Err(StoreError::io(path, e)),
    };
    serde_json::from_slice(&body).map_err(|source| StoreError::Deserialize {
        path: path.to_path_buf(),
        source,
    })
}

/// Replace the file at `path` with `body` in one rename.
fn write_atomic(path: &Path, body: &[u8]) -> Result<(), StoreError> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| StoreError::io(dir, e))?;
    tmp.write_all(body).map_err(|e| StoreError::io(tmp.path(), e))?;
    tmp.as_file_mut()
        .sync_all()
        .map_err(|e| StoreError::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| StoreError::io(path, e.error))?;
    Ok(())
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
