//! Asset handles, retention, and loading
//!
//! Provides handle-based resource management with:
//! - A capability interface ([`Asset`]) for engine-managed reference counts
//! - Per-owner retention with automatic teardown ([`AssetRefCache`])
//! - A path-deduplicated registry and loader seam ([`AssetStore`])

mod cache;
mod handle;
mod store;

pub use cache::AssetRefCache;
pub use handle::{Asset, AssetId, RawAsset, SharedAsset};
pub use store::{AssetLoader, AssetStore, LoadError};
