use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};
use tempfile::NamedTempFile;

use crate::storage::StorageError;
use crate::storage::note::Snapshot;

/// Single JSON file holding the whole snapshot.
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the saved snapshot.
    ///
    /// Never fails: a missing file yields the default snapshot (which is
    /// written out right away), an unreadable or malformed one yields the
    /// default snapshot and leaves the file untouched. IDs out of range count
    /// as malformed. `next_id` is always past the highest stored note ID.
    pub fn load(&self) -> Snapshot {
        if !self.path.exists() {
            info!("No data file at {}, starting fresh", self.path.display());
            let snapshot = Snapshot::default();
            if let Err(e) = self.save(&snapshot) {
                error!("Failed to write initial data file: {}", e);
            }
            return snapshot;
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read {}: {}", self.path.display(), e);
                return Snapshot::default();
            }
        };

        match serde_json::from_str::<Snapshot>(&content) {
            Ok(mut snapshot) => {
                if !snapshot.repair_next_id() {
                    warn!(
                        "Ignoring data file {} with out-of-range note IDs",
                        self.path.display()
                    );
                    return Snapshot::default();
                }
                info!(
                    "Loaded {} notes from {}",
                    snapshot.notes.len(),
                    self.path.display()
                );
                snapshot
            }
            Err(e) => {
                warn!("Ignoring malformed data file {}: {}", self.path.display(), e);
                Snapshot::default()
            }
        }
    }

    /// Write the snapshot, replacing the previous file atomically
    pub fn save(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|source| StorageError::Directory {
            path: dir.to_path_buf(),
            source,
        })?;

        let json = serde_json::to_string_pretty(snapshot)?;

        // Write next to the target so the rename stays on one filesystem
        let mut temp_file = NamedTempFile::new_in(dir)?;
        temp_file.write_all(json.as_bytes())?;
        temp_file.flush()?;
        temp_file
            .persist(&self.path)
            .map_err(|e| StorageError::Persist {
                path: self.path.clone(),
                source: e.error,
            })?;

        debug!("Saved data to {}", self.path.display());
        Ok(())
    }
}
