//! Reference-count provenance tracing
//!
//! Provides leak diagnosis for engine-managed assets:
//! - Call-site identification ([`CallSite`])
//! - A transparent recording decorator ([`TracedAsset`])
//! - The tracing service itself ([`LeakTracker`])
//! - Serializable leak snapshots ([`LeakReport`])

mod callsite;
mod provenance;
mod report;
mod traced;
mod tracker;

pub use callsite::CallSite;
pub use provenance::{Provenance, ProvenanceMode, RecordKind};
pub use report::{AssetReport, LeakReport, ReportError, SiteRecord};
pub use traced::TracedAsset;
pub use tracker::{AssetFilter, LeakTracker};
