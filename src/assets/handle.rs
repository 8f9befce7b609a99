//! Asset identity and the reference-counting capability interface
//!
//! Owners hold assets as `SharedAsset` (a shared trait object) rather than a
//! concrete type, so a diagnostic wrapper can be substituted for a raw asset
//! without touching call sites.

use std::fmt;
use std::panic::Location;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

/// Global counter for generating unique asset IDs
static NEXT_ASSET_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for an asset.
///
/// Identity is by ID, never by pointer: a tracing wrapper around an asset
/// reports the same `AssetId` as the asset it wraps.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetId(u64);

impl AssetId {
    /// Allocate the next unique ID
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_ASSET_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw numeric value
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The reference-counting capability every asset handle exposes.
///
/// The count itself belongs to the engine side of the asset; this interface
/// only mutates and observes it. `acquire` and `release` are `#[track_caller]`
/// so an implementation that records provenance can attribute each call to
/// its immediate caller.
pub trait Asset: Send + Sync {
    /// Stable identity of the underlying asset
    fn id(&self) -> AssetId;

    /// Path the asset was registered under
    fn path(&self) -> &str;

    /// Increment the reference count, returning the new count
    #[track_caller]
    fn acquire(&self) -> usize;

    /// Decrement the reference count, returning the new count.
    ///
    /// # Panics
    ///
    /// Releasing an asset whose count is already zero is a programming
    /// error and panics rather than wrapping silently.
    #[track_caller]
    fn release(&self) -> usize;

    /// Current reference count
    fn ref_count(&self) -> usize;
}

impl fmt::Debug for dyn Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Asset")
            .field("id", &self.id())
            .field("path", &self.path())
            .field("ref_count", &self.ref_count())
            .finish()
    }
}

/// How owners store and pass assets: a shared handle to the capability
/// interface, not to a concrete type.
pub type SharedAsset = Arc<dyn Asset>;

/// A plain engine-side asset: a path plus an intrinsic reference count.
///
/// Starts with a count of zero; holders acquire what they retain.
#[derive(Debug)]
pub struct RawAsset {
    id: AssetId,
    path: String,
    refs: AtomicUsize,
}

impl RawAsset {
    /// Create a new asset registered under `path`
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            id: AssetId::next(),
            path: path.into(),
            refs: AtomicUsize::new(0),
        }
    }

    /// Create a new asset already wrapped as a `SharedAsset`
    #[must_use]
    pub fn shared(path: impl Into<String>) -> SharedAsset {
        Arc::new(Self::new(path))
    }
}

impl Asset for RawAsset {
    fn id(&self) -> AssetId {
        self.id
    }

    fn path(&self) -> &str {
        &self.path
    }

    #[track_caller]
    fn acquire(&self) -> usize {
        self.refs.fetch_add(1, Ordering::AcqRel) + 1
    }

    #[track_caller]
    fn release(&self) -> usize {
        let prev = self.refs.fetch_sub(1, Ordering::AcqRel);
        assert!(
            prev > 0,
            "release() on '{}' at {} with no outstanding references",
            self.path,
            Location::caller()
        );
        prev - 1
    }

    fn ref_count(&self) -> usize {
        self.refs.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_ids() {
        let a = RawAsset::new("a.png");
        let b = RawAsset::new("b.png");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_acquire_release_counts() {
        let asset = RawAsset::new("tex/wall.png");
        assert_eq!(asset.ref_count(), 0);
        assert_eq!(asset.acquire(), 1);
        assert_eq!(asset.acquire(), 2);
        assert_eq!(asset.release(), 1);
        assert_eq!(asset.release(), 0);
    }

    #[test]
    #[should_panic(expected = "no outstanding references")]
    fn test_release_underflow_panics() {
        let asset = RawAsset::new("tex/wall.png");
        asset.release();
    }

    #[test]
    fn test_shared_handle_identity() {
        let shared = RawAsset::shared("mesh/crate.gltf");
        let other = Arc::clone(&shared);
        assert_eq!(shared.id(), other.id());
        shared.acquire();
        assert_eq!(other.ref_count(), 1);
    }
}
