use serde::{Deserialize, Serialize};

/// Optional narrowing criteria applied to sailing lists before comparison.
///
/// Absent criteria impose no constraint; present criteria are ANDed
/// together. Multi-value criteria (`ships`, `ports`) are ORs of
/// bidirectional case-insensitive substring matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Filters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ships: Option<Vec<String>>,
    /// Inclusive lower bound on the sail date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// Inclusive upper bound on the sail date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ports: Option<Vec<String>>,
    /// Minimum night count; sailings with an unknown count (0) are exempt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_days: Option<u32>,
    /// Five-character offer-code prefix; codes shorter than five
    /// characters never match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offer_code_prefix: Option<String>,
}

impl Filters {
    /// True when no criterion is present.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
