use serde::{Deserialize, Serialize};
use std::fmt;

/// Where an extracted sailing came from within its offer payload.
///
/// Distinguishes the top-level offer lists from the secondary detail fetch,
/// and offered sailings from explicitly excluded ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SailingSource {
    /// Sailing offered by the top-level campaign offer.
    Included,
    /// Sailing explicitly excluded by the top-level campaign offer.
    Excluded,
    /// Sailing offered by an offer inside the detail fetch.
    DetailsIncluded,
    /// Sailing explicitly excluded by an offer inside the detail fetch.
    DetailsExcluded,
}

impl fmt::Display for SailingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Included => write!(f, "included"),
            Self::Excluded => write!(f, "excluded"),
            Self::DetailsIncluded => write!(f, "details-included"),
            Self::DetailsExcluded => write!(f, "details-excluded"),
        }
    }
}

/// One cruise departure in canonical form, the unit of comparison.
///
/// All string fields are already normalized by the extractor: the ship name
/// is canonicalized, the sail date is `YYYY-MM-DD` or empty when the raw
/// value could not be parsed, and `nights` is `0` when the itinerary text
/// carried no leading night count (unknown, not a zero-night cruise).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sailing {
    pub ship_name: String,
    pub sail_date: String,
    pub departure_port: String,
    pub itinerary: String,
    pub nights: u32,
    /// Code of the containing offer, not of the sailing itself.
    pub offer_code: String,
    pub offer_name: String,
    /// Absent for sailings ingested from an external CSV.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SailingSource>,
}

impl Sailing {
    /// Composite key correlating sailings across sources.
    ///
    /// Two sailings are "the same sailing" iff this key matches exactly.
    pub fn comparison_key(&self) -> String {
        format!("{}|{}", self.ship_name, self.sail_date).to_lowercase()
    }

    /// Whether this sailing may participate in key-based matching.
    ///
    /// Sailings whose date failed to normalize never match anything;
    /// without this guard, every unparseable-date sailing of one ship
    /// would collapse onto the same `ship|` key.
    pub fn has_comparable_date(&self) -> bool {
        !self.sail_date.is_empty()
    }
}
