//! Last-result snapshot cache
//!
//! Keeps exactly one [`RaceResultSet`]: the most recent one that normalized
//! successfully. It is read once at startup for a first paint and overwritten
//! after every successful fetch. There is no expiry and no partial update.
//!
//! Reading never fails. A missing snapshot, an unreadable file and a snapshot
//! that no longer deserializes are all reported as `None`.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info, warn};

use crate::types::RaceResultSet;
use crate::{RaceboardError, Result};

/// Well-known key the snapshot is stored under.
pub const CACHE_KEY: &str = "last-race-results";

/// Storage for the last successfully loaded result set
pub trait ResultCache: Send + Sync {
    /// The stored snapshot, or `None` when absent or unreadable.
    fn load(&self) -> Option<RaceResultSet>;

    /// Replace the stored snapshot.
    fn save(&self, results: &RaceResultSet) -> Result<()>;

    /// Remove the stored snapshot, if any.
    fn clear(&self) -> Result<()>;
}

/// Snapshot stored as a YAML document on disk
#[derive(Debug, Clone)]
pub struct FileCache {
    path: PathBuf,
}

impl FileCache {
    /// Cache storing its snapshot under `dir`.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self { path: dir.as_ref().join(format!("{}.yaml", CACHE_KEY)) }
    }

    /// Location of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("yaml.tmp")
    }
}

impl ResultCache for FileCache {
    fn load(&self) -> Option<RaceResultSet> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No cached results");
                return None;
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read cached results");
                return None;
            }
        };

        match serde_yaml_ng::from_str::<RaceResultSet>(&contents) {
            Ok(results) => {
                debug!(
                    path = %self.path.display(),
                    race = %results.race.race_name,
                    drivers = results.len(),
                    "Loaded cached results"
                );
                Some(results)
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Discarding unreadable cached results"
                );
                None
            }
        }
    }

    fn save(&self, results: &RaceResultSet) -> Result<()> {
        let yaml = serde_yaml_ng::to_string(results)
            .map_err(|e| RaceboardError::Serialization { details: e.to_string() })?;

        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)
                .map_err(|e| RaceboardError::cache_error(dir.to_path_buf(), e))?;
        }

        // Write then rename so a crash never leaves a half-written snapshot
        let temp = self.temp_path();
        std::fs::write(&temp, yaml).map_err(|e| RaceboardError::cache_error(temp.clone(), e))?;
        std::fs::rename(&temp, &self.path)
            .map_err(|e| RaceboardError::cache_error(self.path.clone(), e))?;

        info!(
            path = %self.path.display(),
            race = %results.race.race_name,
            drivers = results.len(),
            "Cached results snapshot"
        );
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "Cleared cached results");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(RaceboardError::cache_error(self.path.clone(), e)),
        }
    }
}

/// In-process snapshot, for tests and runs that should not touch disk
#[derive(Debug, Default)]
pub struct MemoryCache {
    snapshot: Mutex<Option<RaceResultSet>>,
    saves: Mutex<usize>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache pre-populated with a snapshot.
    pub fn with_snapshot(results: RaceResultSet) -> Self {
        Self { snapshot: Mutex::new(Some(results)), saves: Mutex::new(0) }
    }

    /// Number of successful [`ResultCache::save`] calls.
    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ResultCache for MemoryCache {
    fn load(&self) -> Option<RaceResultSet> {
        self.snapshot.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).clone()
    }

    fn save(&self, results: &RaceResultSet) -> Result<()> {
        *self.snapshot.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) =
            Some(results.clone());
        *self.saves.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) += 1;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.snapshot.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
        Ok(())
    }
}
