//! Leak report serialization
//!
//! Snapshots of tracker state can be saved in RON or JSON and diffed across
//! runs to see which call sites stopped balancing their releases.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::assets::AssetId;

use super::callsite::CallSite;
use super::provenance::RecordKind;

/// One call-site counter within an asset's report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteRecord {
    /// Where the mutations came from
    pub site: CallSite,
    /// Direction of the recorded mutations
    pub kind: RecordKind,
    /// Accumulated count
    pub count: u64,
}

/// Snapshot of one traced asset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetReport {
    /// Asset identity
    pub id: AssetId,
    /// Path the asset was registered under
    pub path: String,
    /// Reference count at snapshot time
    pub ref_count: usize,
    /// Per-site counters, sorted by site
    pub sites: Vec<SiteRecord>,
}

/// Snapshot of every traced asset, sorted by ID
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeakReport {
    /// All traced assets
    pub assets: Vec<AssetReport>,
}

impl LeakReport {
    /// Check if nothing was traced
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Save the report to a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_ron(&self, path: impl AsRef<Path>) -> Result<(), ReportError> {
        let ron_string = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ReportError::SerializeError(e.to_string()))?;
        fs::write(path, ron_string).map_err(|e| ReportError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Load a report from a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, ReportError> {
        let content = fs::read_to_string(path).map_err(|e| ReportError::IoError(e.to_string()))?;
        let report: Self =
            ron::from_str(&content).map_err(|e| ReportError::DeserializeError(e.to_string()))?;
        Ok(report)
    }

    /// Save the report to a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), ReportError> {
        let json_string = serde_json::to_string_pretty(self)
            .map_err(|e| ReportError::SerializeError(e.to_string()))?;
        fs::write(path, json_string).map_err(|e| ReportError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Load a report from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ReportError> {
        let content = fs::read_to_string(path).map_err(|e| ReportError::IoError(e.to_string()))?;
        let report: Self = serde_json::from_str(&content)
            .map_err(|e| ReportError::DeserializeError(e.to_string()))?;
        Ok(report)
    }
}

/// Errors that can occur while saving or loading reports
#[derive(Debug, Clone)]
pub enum ReportError {
    /// IO error
    IoError(String),
    /// Serialization error
    SerializeError(String),
    /// Deserialization error
    DeserializeError(String),
}

impl std::fmt::Display for ReportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO error: {e}"),
            Self::SerializeError(e) => write!(f, "Serialization error: {e}"),
            Self::DeserializeError(e) => write!(f, "Deserialization error: {e}"),
        }
    }
}

impl std::error::Error for ReportError {}
