//! Leak tracking service
//!
//! The [`LeakTracker`] decides which assets get a provenance-recording
//! wrapper substituted for their handle, keeps the set of traced assets, and
//! renders the outstanding counts for diagnosis. It is an explicit service
//! object: create one per scene (or one per process) and pass it where
//! tracing decisions are made. Hosts that share a tracker across threads
//! wrap it in their own lock; all mutation goes through `&mut self`.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::assets::{Asset, AssetId, SharedAsset};

use super::provenance::{ProvenanceMode, RecordKind};
use super::report::{AssetReport, LeakReport, SiteRecord};
use super::traced::TracedAsset;

/// Predicate deciding whether an asset qualifies for tracing.
///
/// Must not panic; a panicking filter propagates to the `trace` caller.
pub type AssetFilter = dyn Fn(&dyn Asset) -> bool + Send + Sync;

/// Tracks reference-count provenance for a chosen set of assets.
pub struct LeakTracker {
    checking: bool,
    filter: Option<Box<AssetFilter>>,
    mode: ProvenanceMode,
    traced: FxHashMap<AssetId, Arc<TracedAsset>>,
}

impl LeakTracker {
    /// Create a tracker with checking off, no filter, combined provenance
    #[must_use]
    pub fn new() -> Self {
        Self {
            checking: false,
            filter: None,
            mode: ProvenanceMode::default(),
            traced: FxHashMap::default(),
        }
    }

    /// Set the provenance mode for assets traced from now on
    #[must_use]
    pub fn with_mode(mut self, mode: ProvenanceMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the tracing filter
    #[must_use]
    pub fn with_filter(
        mut self,
        filter: impl Fn(&dyn Asset) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.filter = Some(Box::new(filter));
        self
    }

    /// Remove the tracing filter; every candidate qualifies again
    pub fn clear_filter(&mut self) {
        self.filter = None;
    }

    /// Enable tracing of new candidates
    pub fn start_check(&mut self) {
        self.checking = true;
    }

    /// Stop tracing new candidates.
    ///
    /// No effect on already-traced assets: established traces persist until
    /// explicitly untraced or reset.
    pub fn stop_check(&mut self) {
        self.checking = false;
    }

    /// Check whether new trace attempts are accepted
    #[must_use]
    pub const fn is_checking(&self) -> bool {
        self.checking
    }

    /// Check whether `asset` qualifies for tracing right now.
    ///
    /// Always false while checking is off; otherwise the configured filter
    /// decides (default: everything qualifies).
    #[must_use]
    pub fn check_filter(&self, asset: &dyn Asset) -> bool {
        if !self.checking {
            return false;
        }
        match &self.filter {
            Some(filter) => filter(asset),
            None => true,
        }
    }

    /// Substitute a provenance-recording wrapper for `asset`.
    ///
    /// Returns the handle the caller should store from now on:
    /// - already traced: the existing wrapper, never re-wrapped;
    /// - qualifying: a fresh wrapper, with one acquire held by this tracker
    ///   until untrace/reset;
    /// - not qualifying (checking off or filtered out): the input unchanged.
    pub fn trace(&mut self, asset: &SharedAsset) -> SharedAsset {
        if let Some(existing) = self.traced.get(&asset.id()) {
            let existing: Arc<TracedAsset> = Arc::clone(existing);
            return existing;
        }
        if !self.check_filter(asset.as_ref()) {
            return SharedAsset::clone(asset);
        }

        // The tracker's own retain, undone when the trace ends. Taken on the
        // raw asset so it never shows up in the provenance map.
        asset.acquire();
        let wrapped = TracedAsset::new(SharedAsset::clone(asset), self.mode);
        log::debug!("tracing asset '{}' {}", asset.path(), asset.id());
        self.traced.insert(asset.id(), Arc::clone(&wrapped));
        wrapped
    }

    /// Invoke the restore hook on `asset` if it is traced.
    ///
    /// The provenance map is discarded and the wrapper becomes a pure
    /// pass-through; the asset stays in the traced set.
    pub fn reset_asset(&self, asset: &SharedAsset) {
        if let Some(wrapped) = self.traced.get(&asset.id()) {
            wrapped.reset();
        }
    }

    /// End the trace on `asset`: reset, drop the tracker's retain, remove
    /// from the traced set.
    ///
    /// Returns the original inner handle for the owner to swap back, or
    /// `None` if the asset was not traced.
    pub fn untrace(&mut self, asset: &SharedAsset) -> Option<SharedAsset> {
        let wrapped = self.traced.remove(&asset.id())?;
        wrapped.reset();
        let inner = SharedAsset::clone(wrapped.inner());
        inner.release();
        Some(inner)
    }

    /// End every trace and clear the traced set.
    ///
    /// Releases exactly the retains this tracker took at trace time; run
    /// before a scene transition so the tracker itself leaks nothing.
    pub fn reset(&mut self) {
        for wrapped in self.traced.values() {
            wrapped.reset();
            wrapped.inner().release();
        }
        self.traced.clear();
    }

    /// Log one `<call-site> : <count>` line per provenance entry of every
    /// traced asset with a non-empty map. Read-only.
    pub fn dump(&self) {
        for line in self.dump_lines() {
            log::info!("{line}");
        }
    }

    /// The lines `dump` would log, in deterministic order
    #[must_use]
    pub fn dump_lines(&self) -> Vec<String> {
        let mut reports: Vec<&Arc<TracedAsset>> = self.traced.values().collect();
        reports.sort_by_key(|wrapped| wrapped.id());

        let mut lines = Vec::new();
        for wrapped in reports {
            let Some(prov) = wrapped.provenance() else {
                continue;
            };
            if prov.is_empty() {
                continue;
            }
            lines.push(format!(
                "asset '{}' {} ({} refs)",
                wrapped.path(),
                wrapped.id(),
                wrapped.ref_count()
            ));
            for (site, kind, count) in prov.entries() {
                match kind {
                    RecordKind::Combined => lines.push(format!("{site} : {count}")),
                    RecordKind::Acquire => lines.push(format!("{site} (acquire) : {count}")),
                    RecordKind::Release => lines.push(format!("{site} (release) : {count}")),
                }
            }
        }
        lines
    }

    /// Structured snapshot of the tracker state for serialization
    #[must_use]
    pub fn report(&self) -> LeakReport {
        let mut assets: Vec<AssetReport> = self
            .traced
            .values()
            .map(|wrapped| AssetReport {
                id: wrapped.id(),
                path: wrapped.path().to_string(),
                ref_count: wrapped.ref_count(),
                sites: wrapped
                    .provenance()
                    .map(|prov| {
                        prov.entries()
                            .into_iter()
                            .map(|(site, kind, count)| SiteRecord { site, kind, count })
                            .collect()
                    })
                    .unwrap_or_default(),
            })
            .collect();
        assets.sort_by_key(|report| report.id);
        LeakReport { assets }
    }

    /// Read-only snapshot of the traced set
    #[must_use]
    pub fn traced_assets(&self) -> Vec<Arc<TracedAsset>> {
        self.traced.values().cloned().collect()
    }

    /// Get the wrapper tracing `id`, if any
    #[must_use]
    pub fn traced_asset(&self, id: AssetId) -> Option<Arc<TracedAsset>> {
        self.traced.get(&id).cloned()
    }

    /// Check whether `id` is currently traced
    #[must_use]
    pub fn is_traced(&self, id: AssetId) -> bool {
        self.traced.contains_key(&id)
    }

    /// Get the number of traced assets
    #[must_use]
    pub fn traced_count(&self) -> usize {
        self.traced.len()
    }
}

impl Default for LeakTracker {
    fn default() -> Self {
        Self::new()
    }
}
