//! Per-asset provenance bookkeeping
//!
//! Maps call sites to mutation counts for one traced asset. The original
//! diagnostic this reproduces folded acquires and releases into a single
//! counter per site; [`ProvenanceMode`] keeps that as the default while
//! allowing the two directions to be tracked separately.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::callsite::CallSite;

/// How acquire and release provenance is keyed.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProvenanceMode {
    /// One counter per call site, shared by acquires and releases
    #[default]
    Combined,
    /// Independent counters for acquires and releases
    Separate,
}

/// Which direction a recorded mutation went.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RecordKind {
    /// Acquire and release folded together (combined mode)
    Combined,
    /// Reference-count increment
    Acquire,
    /// Reference-count decrement
    Release,
}

/// Call-site counters for one traced asset.
#[derive(Debug, Clone)]
pub struct Provenance {
    mode: ProvenanceMode,
    /// Acquire counters; in combined mode this holds both directions
    acquires: FxHashMap<CallSite, u64>,
    /// Release counters; unused in combined mode
    releases: FxHashMap<CallSite, u64>,
}

impl Provenance {
    /// Create an empty map for the given mode
    #[must_use]
    pub fn new(mode: ProvenanceMode) -> Self {
        Self {
            mode,
            acquires: FxHashMap::default(),
            releases: FxHashMap::default(),
        }
    }

    /// Get the configured mode
    #[must_use]
    pub const fn mode(&self) -> ProvenanceMode {
        self.mode
    }

    /// Record one acquire from `site`
    pub fn record_acquire(&mut self, site: CallSite) {
        *self.acquires.entry(site).or_insert(0) += 1;
    }

    /// Record one release from `site`
    pub fn record_release(&mut self, site: CallSite) {
        match self.mode {
            ProvenanceMode::Combined => *self.acquires.entry(site).or_insert(0) += 1,
            ProvenanceMode::Separate => *self.releases.entry(site).or_insert(0) += 1,
        }
    }

    /// Check if nothing has been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.acquires.is_empty() && self.releases.is_empty()
    }

    /// Count recorded for `site`.
    ///
    /// In combined mode this is the folded acquire+release total; in
    /// separate mode it is the acquire count only.
    #[must_use]
    pub fn count_for(&self, site: &CallSite) -> u64 {
        self.acquires.get(site).copied().unwrap_or(0)
    }

    /// Snapshot of every counter, sorted by call site for deterministic
    /// output. Each entry is (site, kind, count).
    #[must_use]
    pub fn entries(&self) -> Vec<(CallSite, RecordKind, u64)> {
        let mut entries: Vec<(CallSite, RecordKind, u64)> = match self.mode {
            ProvenanceMode::Combined => self
                .acquires
                .iter()
                .map(|(site, count)| (site.clone(), RecordKind::Combined, *count))
                .collect(),
            ProvenanceMode::Separate => self
                .acquires
                .iter()
                .map(|(site, count)| (site.clone(), RecordKind::Acquire, *count))
                .chain(
                    self.releases
                        .iter()
                        .map(|(site, count)| (site.clone(), RecordKind::Release, *count)),
                )
                .collect(),
        };
        entries.sort();
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combined_folds_directions() {
        let mut prov = Provenance::new(ProvenanceMode::Combined);
        prov.record_acquire(CallSite::from("X"));
        prov.record_release(CallSite::from("X"));
        prov.record_acquire(CallSite::from("Y"));

        assert_eq!(prov.count_for(&CallSite::from("X")), 2);
        assert_eq!(prov.count_for(&CallSite::from("Y")), 1);
        assert_eq!(prov.entries().len(), 2);
    }

    #[test]
    fn test_separate_keeps_directions_apart() {
        let mut prov = Provenance::new(ProvenanceMode::Separate);
        prov.record_acquire(CallSite::from("X"));
        prov.record_acquire(CallSite::from("X"));
        prov.record_release(CallSite::from("X"));

        let entries = prov.entries();
        assert_eq!(entries.len(), 2);
        assert!(
            entries
                .iter()
                .any(|(_, kind, count)| *kind == RecordKind::Acquire && *count == 2)
        );
        assert!(
            entries
                .iter()
                .any(|(_, kind, count)| *kind == RecordKind::Release && *count == 1)
        );
    }

    #[test]
    fn test_empty_until_recorded() {
        let mut prov = Provenance::new(ProvenanceMode::Combined);
        assert!(prov.is_empty());
        prov.record_release(CallSite::from("X"));
        assert!(!prov.is_empty());
    }

    #[test]
    fn test_entries_sorted_by_site() {
        let mut prov = Provenance::new(ProvenanceMode::Combined);
        prov.record_acquire(CallSite::from("b"));
        prov.record_acquire(CallSite::from("a"));
        prov.record_acquire(CallSite::from("c"));

        let sites: Vec<String> = prov
            .entries()
            .iter()
            .map(|(site, _, _)| site.to_string())
            .collect();
        assert_eq!(sites, vec!["a", "b", "c"]);
    }
}
