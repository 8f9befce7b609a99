//! Asset registry and loading seam
//!
//! Provides a path-deduplicated registry of engine assets and the loader
//! interface consumed by [`AssetRefCache::load`](crate::assets::AssetRefCache::load).

use rustc_hash::FxHashMap;

use super::handle::{AssetId, RawAsset, SharedAsset};

/// Load-by-path interface to the engine's resource backend.
///
/// Loading hands out a handle; it does not retain on the caller's behalf.
/// Callers that want an asset kept alive must acquire it themselves (usually
/// through an [`AssetRefCache`](crate::assets::AssetRefCache)).
pub trait AssetLoader {
    /// Resolve `path` to an asset handle
    ///
    /// # Errors
    ///
    /// Returns an error if no asset is registered under `path`
    fn load(&self, path: &str) -> Result<SharedAsset, LoadError>;
}

/// Registry of all live assets, indexed by ID with path-based deduplication.
pub struct AssetStore {
    /// Assets indexed by their ID
    assets: FxHashMap<AssetId, SharedAsset>,
    /// Path to ID mapping for deduplication
    path_to_id: FxHashMap<String, AssetId>,
}

impl AssetStore {
    /// Create a new empty store
    #[must_use]
    pub fn new() -> Self {
        Self {
            assets: FxHashMap::default(),
            path_to_id: FxHashMap::default(),
        }
    }

    /// Register an asset under `path`, returning its handle.
    ///
    /// If an asset already exists at that path, the existing handle is
    /// returned instead of creating a duplicate.
    pub fn insert(&mut self, path: impl Into<String>) -> SharedAsset {
        let path = path.into();
        if let Some(id) = self.path_to_id.get(&path)
            && let Some(asset) = self.assets.get(id)
        {
            return SharedAsset::clone(asset);
        }

        let asset = RawAsset::shared(path.clone());
        self.path_to_id.insert(path, asset.id());
        self.assets.insert(asset.id(), SharedAsset::clone(&asset));
        asset
    }

    /// Get an asset by ID
    #[must_use]
    pub fn get(&self, id: AssetId) -> Option<SharedAsset> {
        self.assets.get(&id).cloned()
    }

    /// Check if an asset exists at `path`
    #[must_use]
    pub fn contains_path(&self, path: &str) -> bool {
        self.path_to_id.contains_key(path)
    }

    /// Remove an asset by ID
    ///
    /// Returns true if the asset was removed
    pub fn remove(&mut self, id: AssetId) -> bool {
        if let Some(asset) = self.assets.remove(&id) {
            self.path_to_id.remove(asset.path());
            true
        } else {
            false
        }
    }

    /// Evict every asset whose reference count has dropped to zero.
    ///
    /// Returns the number of assets removed.
    pub fn release_unused(&mut self) -> usize {
        let unused: Vec<AssetId> = self
            .assets
            .values()
            .filter(|asset| asset.ref_count() == 0)
            .map(|asset| asset.id())
            .collect();
        for id in &unused {
            if let Some(asset) = self.assets.remove(id) {
                log::debug!("evicting unused asset '{}'", asset.path());
                self.path_to_id.remove(asset.path());
            }
        }
        unused.len()
    }

    /// Get the number of registered assets
    #[must_use]
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Check if the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Iterate over all asset handles
    pub fn iter(&self) -> impl Iterator<Item = &SharedAsset> {
        self.assets.values()
    }
}

impl Default for AssetStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetLoader for AssetStore {
    fn load(&self, path: &str) -> Result<SharedAsset, LoadError> {
        self.path_to_id
            .get(path)
            .and_then(|id| self.assets.get(id))
            .cloned()
            .ok_or_else(|| LoadError::NotFound(path.to_string()))
    }
}

/// Errors that can occur while resolving an asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// No asset registered under the given path
    NotFound(String),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "no asset registered at '{path}'"),
        }
    }
}

impl std::error::Error for LoadError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_load() {
        let mut store = AssetStore::new();
        let asset = store.insert("tex/wall.png");

        let loaded = store.load("tex/wall.png").unwrap();
        assert_eq!(loaded.id(), asset.id());
    }

    #[test]
    fn test_path_deduplication() {
        let mut store = AssetStore::new();
        let first = store.insert("tex/wall.png");
        let second = store.insert("tex/wall.png");

        assert_eq!(first.id(), second.id());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_load_missing_path() {
        let store = AssetStore::new();
        let err = store.load("tex/missing.png").unwrap_err();
        assert_eq!(err, LoadError::NotFound("tex/missing.png".to_string()));
    }

    #[test]
    fn test_remove_clears_path_mapping() {
        let mut store = AssetStore::new();
        let asset = store.insert("tex/wall.png");

        assert!(store.remove(asset.id()));
        assert!(!store.contains_path("tex/wall.png"));
        assert!(!store.remove(asset.id()));
    }

    #[test]
    fn test_release_unused_keeps_retained() {
        let mut store = AssetStore::new();
        let kept = store.insert("tex/kept.png");
        store.insert("tex/unused.png");
        kept.acquire();

        assert_eq!(store.release_unused(), 1);
        assert_eq!(store.len(), 1);
        assert!(store.contains_path("tex/kept.png"));
    }
}
