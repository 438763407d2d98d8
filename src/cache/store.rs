//! In-memory snapshot store with file-backed fallback
//!
//! The store is a single `Arc` slot behind a lock held only for the instant
//! of a swap or clone. Readers either see the old snapshot in full or the
//! new one in full, never a mix. Only the background refresher publishes;
//! every other context reads.

use crate::schema::{SchemaSnapshot, SnapshotSource};
use crate::{Result, SchemascopeError};
use parking_lot::RwLock;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Bundled fallback snapshot, shipped with the binary
const BUNDLED_FALLBACK: &str = include_str!("../../data/fallback_schema.json");

/// Process-wide holder of the current schema snapshot
pub struct SnapshotStore {
    /// Published snapshot; the lock is held only to swap or clone the Arc
    slot: RwLock<Arc<SchemaSnapshot>>,

    /// Where successful publishes are mirrored to disk
    cache_file: PathBuf,

    /// Bundled fallback JSON; None disables it (tests)
    bundled: Option<&'static str>,
}

impl SnapshotStore {
    /// Create a store starting from the explicit empty snapshot
    pub fn new(cache_file: impl Into<PathBuf>) -> Self {
        Self::with_bundled(cache_file, Some(BUNDLED_FALLBACK))
    }

    /// Create a store with an explicit bundled fallback (or none)
    pub fn with_bundled(cache_file: impl Into<PathBuf>, bundled: Option<&'static str>) -> Self {
        Self {
            slot: RwLock::new(Arc::new(SchemaSnapshot::empty())),
            cache_file: cache_file.into(),
            bundled,
        }
    }

    /// The latest published snapshot
    ///
    /// Never blocks on I/O; safe to call concurrently with a publish.
    pub fn current(&self) -> Arc<SchemaSnapshot> {
        self.slot.read().clone()
    }

    /// Atomically replace the visible snapshot, then mirror it to disk
    ///
    /// A snapshot whose `fetched_at` is older than the published one is
    /// rejected: the only writer stamps construction time, so a regression
    /// means a stale publisher. Persistence is best-effort: a write error
    /// is logged and the in-memory publish stands.
    pub fn publish(&self, snapshot: SchemaSnapshot) {
        {
            let current = self.slot.read();
            if let (Some(new_at), Some(cur_at)) = (snapshot.fetched_at, current.fetched_at) {
                if new_at < cur_at {
                    tracing::warn!(
                        new_at = %new_at,
                        current_at = %cur_at,
                        "Rejecting snapshot older than the published one"
                    );
                    return;
                }
            }
        }

        let snapshot = Arc::new(snapshot);
        *self.slot.write() = snapshot.clone();

        tracing::info!(
            classes = snapshot.stats.total_classes,
            predicates = snapshot.stats.total_predicates,
            source = ?snapshot.source,
            "Published snapshot"
        );

        if let Err(e) = self.persist(&snapshot) {
            tracing::warn!(error = %e, path = %self.cache_file.display(), "Failed to persist snapshot");
        }
    }

    /// Install a snapshot without touching the cache file
    ///
    /// Used at startup when the snapshot itself came from the fallback chain.
    pub fn install(&self, snapshot: SchemaSnapshot) {
        *self.slot.write() = Arc::new(snapshot);
    }

    /// Write a snapshot to the cache file
    fn persist(&self, snapshot: &SchemaSnapshot) -> Result<()> {
        if let Some(parent) = self.cache_file.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| SchemascopeError::Persist(e.to_string()))?;
        }

        let json = serde_json::to_string_pretty(snapshot)
            .map_err(|e| SchemascopeError::Persist(e.to_string()))?;
        fs::write(&self.cache_file, json).map_err(|e| SchemascopeError::Persist(e.to_string()))?;

        tracing::debug!(path = %self.cache_file.display(), "Snapshot persisted");
        Ok(())
    }

    /// Read the last persisted snapshot, falling back to the bundled data
    ///
    /// The result is always re-tagged `Cached`: whatever its original
    /// source, the data is an old fetch by the time it is re-loaded.
    pub fn load_fallback(&self) -> Result<SchemaSnapshot> {
        match load_snapshot_file(&self.cache_file) {
            Ok(snapshot) => {
                tracing::info!(
                    path = %self.cache_file.display(),
                    classes = snapshot.stats.total_classes,
                    "Loaded persisted snapshot"
                );
                return Ok(snapshot.with_source(SnapshotSource::Cached));
            }
            Err(e) => {
                tracing::debug!(error = %e, "No usable persisted snapshot");
            }
        }

        let bundled = self.bundled.ok_or_else(|| {
            SchemascopeError::Load("No persisted snapshot and no bundled fallback".to_string())
        })?;

        let snapshot: SchemaSnapshot = serde_json::from_str(bundled)
            .map_err(|e| SchemascopeError::Load(format!("Bundled fallback unreadable: {}", e)))?;

        tracing::info!(
            classes = snapshot.stats.total_classes,
            "Loaded bundled fallback snapshot"
        );
        Ok(snapshot.with_source(SnapshotSource::Cached))
    }

    /// Populate the store at startup: persisted file, bundled data, or the
    /// explicit empty snapshot, never an error
    pub fn bootstrap(&self) {
        match self.load_fallback() {
            Ok(snapshot) => self.install(snapshot),
            Err(e) => {
                tracing::warn!(error = %e, "Starting with the empty snapshot");
                self.install(SchemaSnapshot::empty());
            }
        }
    }

    /// Path of the cache file backing this store
    pub fn cache_file(&self) -> &Path {
        &self.cache_file
    }
}

fn load_snapshot_file(path: &Path) -> Result<SchemaSnapshot> {
    if !path.exists() {
        return Err(SchemascopeError::Load(format!(
            "Cache file not found: {}",
            path.display()
        )));
    }
    let content = fs::read_to_string(path).map_err(|e| SchemascopeError::Load(e.to_string()))?;
    serde_json::from_str(&content).map_err(|e| SchemascopeError::Load(e.to_string()))
}
