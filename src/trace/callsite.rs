//! Call-site identification
//!
//! A [`CallSite`] names the source location an acquire or release came from.
//! The default path captures the immediate caller through `#[track_caller]`;
//! callers that need deterministic attribution (tests, scripting bindings)
//! supply an explicit tag instead.

use std::fmt;
use std::panic::Location;

use serde::{Deserialize, Serialize};

/// Stable identifier for the origin of a reference-count mutation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallSite(String);

impl CallSite {
    /// Capture the immediate caller's source location.
    ///
    /// Repeated calls from the same source location yield the same
    /// identifier, so counts accumulate per call site.
    #[must_use]
    #[track_caller]
    pub fn caller() -> Self {
        Self::from(Location::caller())
    }

    /// View the identifier as a string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static Location<'static>> for CallSite {
    fn from(location: &'static Location<'static>) -> Self {
        Self(format!("{}:{}", location.file(), location.line()))
    }
}

impl From<&str> for CallSite {
    fn from(tag: &str) -> Self {
        Self(tag.to_string())
    }
}

impl From<String> for CallSite {
    fn from(tag: String) -> Self {
        Self(tag)
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caller_is_stable_per_line() {
        let mut sites = Vec::new();
        for _ in 0..3 {
            sites.push(CallSite::caller());
        }
        assert_eq!(sites[0], sites[1]);
        assert_eq!(sites[1], sites[2]);
    }

    #[test]
    fn test_distinct_lines_distinct_sites() {
        let first = CallSite::caller();
        let second = CallSite::caller();
        assert_ne!(first, second);
    }

    #[test]
    fn test_explicit_tag() {
        let site = CallSite::from("LoginView::on_open");
        assert_eq!(site.as_str(), "LoginView::on_open");
        assert_eq!(site.to_string(), "LoginView::on_open");
    }
}
