//! Durable storage for generated bodies, addressed by fingerprint.
//!
//! One directory per engine configuration, containing zero or more files
//! named `<fingerprint-hex>.<ext>`, each holding the raw body text for that
//! fingerprint. The directory listing plus filename is the only index.

use crate::{Fingerprint, Result};
use dashmap::DashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

/// File-backed store for generated function bodies.
///
/// The store never swallows I/O failures; callers decide whether a failed
/// operation is tolerable.
#[derive(Debug)]
pub struct BodyCache {
    root: PathBuf,
    ext: String,
}

impl BodyCache {
    /// Open a cache rooted at `root`, creating the directory if needed.
    ///
    /// The root is created once here, not per call.
    pub fn new(root: impl Into<PathBuf>, ext: impl Into<String>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        debug!("body cache rooted at {}", root.display());
        Ok(Self {
            root,
            ext: ext.into(),
        })
    }

    /// The cache root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn location(&self, fingerprint: &Fingerprint) -> PathBuf {
        self.root.join(format!("{}.{}", fingerprint, self.ext))
    }

    /// Return the stored body text for a fingerprint, if an artifact exists.
    /// No side effects.
    pub fn lookup(&self, fingerprint: &Fingerprint) -> Result<Option<String>> {
        match fs::read_to_string(self.location(fingerprint)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Persist body text at the fingerprint's location. Last write wins.
    pub fn store(&self, fingerprint: &Fingerprint, body: &str) -> Result<()> {
        fs::write(self.location(fingerprint), body)?;
        Ok(())
    }

    /// Remove the stored artifact if present. Idempotent.
    pub fn invalidate(&self, fingerprint: &Fingerprint) -> Result<()> {
        match fs::remove_file(self.location(fingerprint)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Per-fingerprint mutual exclusion.
///
/// Optional hardening layer: the baseline contract is lock-free with
/// last-write-wins artifacts, so the arena is only engaged when the engine
/// is configured for exclusive calls.
#[derive(Debug, Default)]
pub struct LockArena {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl LockArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for a fingerprint, creating it on first use.
    pub async fn acquire(&self, fingerprint: &Fingerprint) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(fingerprint.as_str().to_string())
            .or_default()
            .clone();
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FnInterface;

    fn fingerprint() -> Fingerprint {
        Fingerprint::of(&FnInterface::new("sort").with_typed_param("a", "list"))
    }

    #[test]
    fn test_store_lookup_invalidate() {
        let dir = tempfile::tempdir().unwrap();
        let cache = BodyCache::new(dir.path().join("bodies"), "rhai").unwrap();
        let fp = fingerprint();

        assert_eq!(cache.lookup(&fp).unwrap(), None);

        cache.store(&fp, "a.sort();\na").unwrap();
        assert_eq!(cache.lookup(&fp).unwrap().as_deref(), Some("a.sort();\na"));

        // overwrite semantics
        cache.store(&fp, "a").unwrap();
        assert_eq!(cache.lookup(&fp).unwrap().as_deref(), Some("a"));

        cache.invalidate(&fp).unwrap();
        assert_eq!(cache.lookup(&fp).unwrap(), None);

        // idempotent on absent artifacts
        cache.invalidate(&fp).unwrap();
    }

    #[test]
    fn test_location_is_fingerprint_plus_ext() {
        let dir = tempfile::tempdir().unwrap();
        let cache = BodyCache::new(dir.path(), "rhai").unwrap();
        let fp = fingerprint();

        cache.store(&fp, "42").unwrap();
        assert!(dir.path().join(format!("{}.rhai", fp)).exists());
    }

    #[tokio::test]
    async fn test_lock_arena_is_exclusive_per_fingerprint() {
        use std::time::Duration;

        let arena = LockArena::new();
        let fp = fingerprint();
        let other = Fingerprint::of(&FnInterface::new("other"));

        let guard = arena.acquire(&fp).await;

        // Same key is held until the guard drops.
        let blocked = tokio::time::timeout(Duration::from_millis(50), arena.acquire(&fp)).await;
        assert!(blocked.is_err());

        // A different key is independent.
        let _other_guard = arena.acquire(&other).await;

        drop(guard);
        let _reacquired = arena.acquire(&fp).await;
    }
}
