//! Asset reference tracking and leak detection
//!
//! This library provides:
//! - Per-owner asset retention with automatic teardown (`AssetRefCache`)
//! - Opt-in reference-count provenance tracing (`LeakTracker`)
//! - Human-readable and serializable leak reports
//!
//! Assets live behind the [`assets::Asset`] capability interface, so the
//! tracker can substitute a recording wrapper for any handle without its
//! call sites noticing.

pub mod assets;
pub mod trace;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::assets::{
        Asset, AssetId, AssetLoader, AssetRefCache, AssetStore, LoadError, RawAsset, SharedAsset,
    };
    pub use crate::trace::{
        CallSite, LeakReport, LeakTracker, Provenance, ProvenanceMode, TracedAsset,
    };
}
