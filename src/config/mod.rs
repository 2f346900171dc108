//! Tunables for the aggregation engine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Label used when a grouping key is absent on a record.
pub const MISSING_KEY_LABEL: &str = "Not set";

/// Controls which records feed the location and day views.
///
/// Excluded categories are lump costs (flights, typically) that would skew
/// per-day and per-location breakdowns; they always remain visible in the
/// category view itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalyticsConfig {
    #[serde(default = "default_excluded_categories")]
    pub excluded_categories: BTreeSet<String>,
    #[serde(default = "default_missing_label")]
    pub missing_label: String,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            excluded_categories: default_excluded_categories(),
            missing_label: default_missing_label(),
        }
    }
}

impl AnalyticsConfig {
    /// A config that filters nothing, for callers that want raw views.
    pub fn unfiltered() -> Self {
        Self {
            excluded_categories: BTreeSet::new(),
            missing_label: default_missing_label(),
        }
    }

    pub fn is_excluded(&self, category: Option<&str>) -> bool {
        category
            .map(|c| self.excluded_categories.contains(c))
            .unwrap_or(false)
    }
}

fn default_excluded_categories() -> BTreeSet<String> {
    ["Transit - Flight"].iter().map(|s| s.to_string()).collect()
}

fn default_missing_label() -> String {
    MISSING_KEY_LABEL.to_string()
}
