//! Per-owner asset retention
//!
//! An [`AssetRefCache`] belongs to exactly one owner (a scene node, a UI
//! view, a gameplay system) and pins assets for that owner's lifetime. The
//! cache releases everything it retained when the owner tears down, either
//! explicitly via [`release_assets`](AssetRefCache::release_assets) or
//! automatically on drop.

use rustc_hash::FxHashMap;

use super::handle::{AssetId, SharedAsset};
use super::store::{AssetLoader, LoadError};

/// A set of assets retained on behalf of one owner.
#[derive(Default)]
pub struct AssetRefCache {
    /// Retained assets, keyed by identity so the same asset is never
    /// double-acquired
    retained: FxHashMap<AssetId, SharedAsset>,
}

impl AssetRefCache {
    /// Create a new empty cache
    #[must_use]
    pub fn new() -> Self {
        Self {
            retained: FxHashMap::default(),
        }
    }

    /// Retain `asset` for this owner's lifetime.
    ///
    /// Acquires once and records the handle. Idempotent per asset: caching
    /// the same asset again is a no-op, the count is never bumped twice.
    #[track_caller]
    pub fn cache_asset(&mut self, asset: &SharedAsset) {
        if !self.retained.contains_key(&asset.id()) {
            asset.acquire();
            self.retained.insert(asset.id(), SharedAsset::clone(asset));
        }
    }

    /// Release every retained asset exactly once and clear the cache.
    ///
    /// Safe to call repeatedly; once the cache is empty further calls
    /// release nothing. Runs automatically when the cache is dropped.
    pub fn release_assets(&mut self) {
        for asset in self.retained.values() {
            asset.release();
        }
        self.retained.clear();
    }

    /// Resolve `path` through `loader`.
    ///
    /// Pure pass-through: the returned asset is NOT retained by this cache.
    /// Call [`cache_asset`](Self::cache_asset) on the result to pin it.
    ///
    /// # Errors
    ///
    /// Propagates the loader's error unchanged
    pub fn load(&self, loader: &dyn AssetLoader, path: &str) -> Result<SharedAsset, LoadError> {
        loader.load(path)
    }

    /// Check whether `id` is retained by this cache
    #[must_use]
    pub fn contains(&self, id: AssetId) -> bool {
        self.retained.contains_key(&id)
    }

    /// Get the number of retained assets
    #[must_use]
    pub fn len(&self) -> usize {
        self.retained.len()
    }

    /// Check if the cache retains nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.retained.is_empty()
    }
}

impl Drop for AssetRefCache {
    fn drop(&mut self) {
        self.release_assets();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetStore, RawAsset};

    #[test]
    fn test_idempotent_retain() {
        let asset = RawAsset::shared("tex/wall.png");
        let mut cache = AssetRefCache::new();

        cache.cache_asset(&asset);
        cache.cache_asset(&asset);

        assert_eq!(asset.ref_count(), 1);
        assert_eq!(cache.len(), 1);

        cache.release_assets();
        assert_eq!(asset.ref_count(), 0);
    }

    #[test]
    fn test_clean_teardown() {
        let asset = RawAsset::shared("tex/wall.png");
        let mut cache = AssetRefCache::new();
        cache.cache_asset(&asset);

        cache.release_assets();
        assert!(cache.is_empty());

        // Second call must release nothing; an over-release would panic.
        cache.release_assets();
        assert_eq!(asset.ref_count(), 0);
    }

    #[test]
    fn test_drop_releases_retained() {
        let asset = RawAsset::shared("tex/wall.png");
        {
            let mut cache = AssetRefCache::new();
            cache.cache_asset(&asset);
            assert_eq!(asset.ref_count(), 1);
        }
        assert_eq!(asset.ref_count(), 0);
    }

    #[test]
    fn test_explicit_release_then_drop() {
        let asset = RawAsset::shared("tex/wall.png");
        let mut cache = AssetRefCache::new();
        cache.cache_asset(&asset);
        cache.release_assets();
        drop(cache);
        assert_eq!(asset.ref_count(), 0);
    }

    #[test]
    fn test_load_does_not_cache() {
        let mut store = AssetStore::new();
        store.insert("tex/wall.png");

        let cache = AssetRefCache::new();
        let loaded = cache.load(&store, "tex/wall.png").unwrap();

        assert_eq!(loaded.ref_count(), 0);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_load_propagates_errors() {
        let store = AssetStore::new();
        let cache = AssetRefCache::new();
        assert!(cache.load(&store, "tex/missing.png").is_err());
    }
}
