//! Per-feed duplicate cache of recently published GUIDs.
//!
//! The remote watermark alone cannot catch feed entries whose published
//! timestamp is older than material we already synced (backfilled or
//! corrected posts). The cache covers that gap: a bounded, insertion-ordered
//! record of the GUIDs we most recently published, persisted to a flat file
//! at `<cache_dir>/<name>.guids`, one GUID per line, most-recent-last.
//!
//! The run loop must call [`GuidCache::save`] at the end of every sync pass,
//! on failure as well as success. A pass that publishes 3 of 10 entries and
//! then dies must not re-publish those 3 on the next run.
//!
//! Only one process may use a given cache file at a time; no file locking is
//! done.

pub mod error;

pub use error::CacheError;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Maximum GUIDs retained across runs (FIFO, oldest evicted first).
pub const DEFAULT_MAX_GUIDS: usize = 500;

pub struct GuidCache {
    path: PathBuf,
    max_guids: usize,
    // Insertion order for eviction, plus a mirrored set for fast lookup.
    // Invariant: `seen` holds exactly the elements of `order`.
    order: Vec<String>,
    seen: HashSet<String>,
}

impl GuidCache {
    /// Open the cache file for one feed, creating it empty if absent.
    ///
    /// Creating the file up front is a write probe: an unwritable cache
    /// directory fails here, before any publishing work has happened.
    pub fn open(cache_dir: &Path, cache_name: &str) -> Result<Self, CacheError> {
        Self::open_with_capacity(cache_dir, cache_name, DEFAULT_MAX_GUIDS)
    }

    pub fn open_with_capacity(
        cache_dir: &Path,
        cache_name: &str,
        max_guids: usize,
    ) -> Result<Self, CacheError> {
        let path = cache_dir.join(format!("{cache_name}.guids"));
        let mut cache = Self {
            path,
            max_guids,
            order: Vec::new(),
            seen: HashSet::new(),
        };
        if !cache.path.exists() {
            cache.save()?;
        }
        cache.load()?;
        Ok(cache)
    }

    /// Whether `guid` was recently published.
    ///
    /// An empty GUID always reports `true`: it cannot distinguish entries, so
    /// it must never be cached, and treating it as present keeps `add` from
    /// recording it. The synchronizer checks for emptiness separately so such
    /// entries are still published.
    pub fn contains(&self, guid: &str) -> bool {
        if guid.is_empty() {
            return true;
        }
        self.seen.contains(guid)
    }

    /// Record a published GUID. Empty GUIDs, GUIDs already present, and GUIDs
    /// containing a newline (which would corrupt the line-oriented file) are
    /// ignored with a log line.
    pub fn add(&mut self, guid: &str) {
        if guid.is_empty() {
            tracing::debug!("Refusing to cache an empty GUID");
            return;
        }
        if self.seen.contains(guid) {
            return;
        }
        if guid.contains('\n') {
            tracing::warn!("Refusing to cache a GUID containing a newline");
            return;
        }
        self.order.push(guid.to_string());
        self.seen.insert(guid.to_string());
    }

    /// Persist the most recent `max_guids` entries, one per line.
    ///
    /// In-memory growth beyond the cap during a pass is fine; trimming
    /// happens here and at load.
    pub fn save(&self) -> Result<(), CacheError> {
        let start = self.order.len().saturating_sub(self.max_guids);
        let mut contents = String::new();
        for guid in &self.order[start..] {
            contents.push_str(guid);
            contents.push('\n');
        }
        std::fs::write(&self.path, contents).map_err(|source| CacheError::Write {
            path: self.path.clone(),
            source,
        })
    }

    fn load(&mut self) -> Result<(), CacheError> {
        let contents = std::fs::read_to_string(&self.path).map_err(|source| CacheError::Read {
            path: self.path.clone(),
            source,
        })?;
        let lines: Vec<&str> = contents.lines().filter(|line| !line.is_empty()).collect();
        let start = lines.len().saturating_sub(self.max_guids);
        self.order = lines[start..].iter().map(|s| s.to_string()).collect();
        self.seen = self.order.iter().cloned().collect();
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}
