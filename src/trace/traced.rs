//! Provenance-recording asset decorator
//!
//! A [`TracedAsset`] stands in for the asset it wraps: same identity, same
//! reference count, same return values. The only addition is a provenance
//! entry per acquire/release. Once [`reset`](TracedAsset::reset) runs, the
//! wrapper is a pure pass-through and records nothing further.

use std::sync::{Arc, Mutex};

use crate::assets::{Asset, AssetId, SharedAsset};

use super::callsite::CallSite;
use super::provenance::{Provenance, ProvenanceMode};

enum Direction {
    Acquire,
    Release,
}

/// Decorator that records which call sites mutate an asset's count.
pub struct TracedAsset {
    inner: SharedAsset,
    /// `None` after reset; recording stops but forwarding continues
    trace: Mutex<Option<Provenance>>,
}

impl TracedAsset {
    /// Wrap `inner`, recording provenance in the given mode
    #[must_use]
    pub fn new(inner: SharedAsset, mode: ProvenanceMode) -> Arc<Self> {
        Arc::new(Self {
            inner,
            trace: Mutex::new(Some(Provenance::new(mode))),
        })
    }

    /// Get the wrapped asset
    #[must_use]
    pub fn inner(&self) -> &SharedAsset {
        &self.inner
    }

    /// Acquire with an explicit call-site tag instead of the caller's
    /// source location
    pub fn acquire_from(&self, site: impl Into<CallSite>) -> usize {
        self.record(Direction::Acquire, site.into());
        self.inner.acquire()
    }

    /// Release with an explicit call-site tag instead of the caller's
    /// source location
    pub fn release_from(&self, site: impl Into<CallSite>) -> usize {
        self.record(Direction::Release, site.into());
        self.inner.release()
    }

    /// Restore hook: discard the provenance map.
    ///
    /// The wrapper keeps forwarding, behaviorally identical to the raw
    /// asset. Idempotent.
    pub fn reset(&self) {
        *self.trace.lock().expect("provenance lock poisoned") = None;
    }

    /// Check whether this wrapper is still recording
    #[must_use]
    pub fn is_recording(&self) -> bool {
        self.trace
            .lock()
            .expect("provenance lock poisoned")
            .is_some()
    }

    /// Snapshot of the provenance map, `None` once reset
    #[must_use]
    pub fn provenance(&self) -> Option<Provenance> {
        self.trace
            .lock()
            .expect("provenance lock poisoned")
            .clone()
    }

    fn record(&self, direction: Direction, site: CallSite) {
        let mut guard = self.trace.lock().expect("provenance lock poisoned");
        if let Some(prov) = guard.as_mut() {
            match direction {
                Direction::Acquire => prov.record_acquire(site),
                Direction::Release => prov.record_release(site),
            }
        }
    }
}

impl Asset for TracedAsset {
    fn id(&self) -> AssetId {
        self.inner.id()
    }

    fn path(&self) -> &str {
        self.inner.path()
    }

    #[track_caller]
    fn acquire(&self) -> usize {
        self.acquire_from(CallSite::caller())
    }

    #[track_caller]
    fn release(&self) -> usize {
        self.release_from(CallSite::caller())
    }

    fn ref_count(&self) -> usize {
        self.inner.ref_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::RawAsset;

    fn traced(path: &str) -> Arc<TracedAsset> {
        TracedAsset::new(RawAsset::shared(path), ProvenanceMode::default())
    }

    #[test]
    fn test_transparent_forwarding() {
        let raw = RawAsset::shared("tex/wall.png");
        let wrapped = TracedAsset::new(SharedAsset::clone(&raw), ProvenanceMode::default());

        assert_eq!(wrapped.id(), raw.id());
        assert_eq!(wrapped.path(), "tex/wall.png");
        assert_eq!(wrapped.acquire(), 1);
        assert_eq!(raw.ref_count(), 1);
        assert_eq!(wrapped.release(), 0);
    }

    #[test]
    fn test_counts_accumulate_per_site() {
        let wrapped = traced("tex/wall.png");
        for _ in 0..3 {
            wrapped.acquire_from("X");
        }
        wrapped.acquire_from("Y");

        let prov = wrapped.provenance().unwrap();
        assert_eq!(prov.count_for(&CallSite::from("X")), 3);
        assert_eq!(prov.count_for(&CallSite::from("Y")), 1);
    }

    #[test]
    fn test_track_caller_attribution() {
        let wrapped = traced("tex/wall.png");
        let mut count = 0;
        for _ in 0..4 {
            count = wrapped.acquire();
        }
        assert_eq!(count, 4);

        // All four acquires came from the same source line.
        let prov = wrapped.provenance().unwrap();
        let entries = prov.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].2, 4);
    }

    #[test]
    fn test_reset_stops_recording_keeps_forwarding() {
        let wrapped = traced("tex/wall.png");
        wrapped.acquire_from("X");
        wrapped.reset();

        assert!(!wrapped.is_recording());
        assert!(wrapped.provenance().is_none());

        assert_eq!(wrapped.acquire_from("X"), 2);
        assert_eq!(wrapped.release(), 1);
        assert!(wrapped.provenance().is_none());
    }

    #[test]
    fn test_reset_is_idempotent() {
        let wrapped = traced("tex/wall.png");
        wrapped.reset();
        wrapped.reset();
        assert!(!wrapped.is_recording());
    }
}
