use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::bounceback::BounceBackRecord;
use crate::filter::{filter_sailings, sailing_matches};
use crate::models::{Filters, Sailing, SailingSource};

use super::first_non_empty;

/// One API sailing paired with one bounce-back row sharing its ship and
/// (non-empty) sail date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overlap {
    pub ship_name: String,
    pub sail_date: String,
    pub departure_port: String,
    pub itinerary: String,
    pub api_offer: ApiOfferRef,
    pub bounce_back_offer: BounceBackOfferRef,
}

/// The API side of an overlap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiOfferRef {
    pub offer_code: String,
    pub offer_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SailingSource>,
}

/// The external (CSV) side of an overlap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BounceBackOfferRef {
    pub offer_code: String,
    pub stateroom_type: String,
    pub offer_type: String,
    pub next_cruise_bonus: String,
}

/// Earliest and latest sail date across all overlaps. String comparison
/// is valid because dates are canonical `YYYY-MM-DD`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub earliest: Option<String>,
    pub latest: Option<String>,
}

impl DateRange {
    fn widen(&mut self, date: &str) {
        if self.earliest.as_deref().is_none_or(|earliest| date < earliest) {
            self.earliest = Some(date.to_string());
        }
        if self.latest.as_deref().is_none_or(|latest| date > latest) {
            self.latest = Some(date.to_string());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BounceBackStats {
    pub total_api_sailings: usize,
    pub filtered_api_sailings: usize,
    pub total_bounce_back_offers: usize,
    pub filtered_bounce_back_offers: usize,
    pub total_overlaps: usize,
    /// Count of distinct ship names appearing in any overlap.
    pub unique_ships_count: usize,
    pub date_range: DateRange,
    pub filters_applied: Filters,
}

/// Full Mode A result: the overlaps plus both sides' raw and filtered
/// collections, so renderers and callers can show their work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BounceBackComparison {
    pub overlaps: Vec<Overlap>,
    pub stats: BounceBackStats,
    pub all_api_sailings: Vec<Sailing>,
    pub all_bounce_back_offers: Vec<BounceBackRecord>,
    pub filtered_api_sailings: Vec<Sailing>,
    pub filtered_bounce_back_offers: Vec<BounceBackRecord>,
}

/// Correlates API sailings against bounce-back rows.
///
/// Both sides are filtered first. Every `(api, bounce-back)` pair whose
/// canonical ship names are exactly equal and whose sail dates are equal
/// and non-empty produces one overlap: cross-product semantics, so one
/// API sailing pairs with every external row sharing its key. Offer codes
/// play no part in the match.
#[must_use]
pub fn compare_with_bounce_back(
    api_sailings: Vec<Sailing>,
    bounce_back: Vec<BounceBackRecord>,
    filters: &Filters,
) -> BounceBackComparison {
    let filtered_api = filter_sailings(&api_sailings, filters);
    let filtered_bounce: Vec<BounceBackRecord> = bounce_back
        .iter()
        .filter(|record| sailing_matches(&record.sailing, filters))
        .cloned()
        .collect();

    let mut overlaps = Vec::new();
    let mut unique_ships = HashSet::new();
    let mut date_range = DateRange::default();

    for api in &filtered_api {
        for record in &filtered_bounce {
            if same_canonical_ship(&api.ship_name, &record.sailing.ship_name)
                && api.sail_date == record.sailing.sail_date
                && !api.sail_date.is_empty()
            {
                overlaps.push(build_overlap(api, record));
                unique_ships.insert(api.ship_name.clone());
                date_range.widen(&api.sail_date);
            }
        }
    }

    let stats = BounceBackStats {
        total_api_sailings: api_sailings.len(),
        filtered_api_sailings: filtered_api.len(),
        total_bounce_back_offers: bounce_back.len(),
        filtered_bounce_back_offers: filtered_bounce.len(),
        total_overlaps: overlaps.len(),
        unique_ships_count: unique_ships.len(),
        date_range,
        filters_applied: filters.clone(),
    };

    BounceBackComparison {
        overlaps,
        stats,
        all_api_sailings: api_sailings,
        all_bounce_back_offers: bounce_back,
        filtered_api_sailings: filtered_api,
        filtered_bounce_back_offers: filtered_bounce,
    }
}

/// Exact equality on canonical ship names. Inputs are already normalized,
/// so this is effectively case-sensitive-on-canonical-form.
fn same_canonical_ship(api_ship: &str, external_ship: &str) -> bool {
    api_ship == external_ship
}

fn build_overlap(api: &Sailing, record: &BounceBackRecord) -> Overlap {
    Overlap {
        ship_name: api.ship_name.clone(),
        sail_date: api.sail_date.clone(),
        departure_port: first_non_empty(
            api.departure_port.clone(),
            record.sailing.departure_port.clone(),
        ),
        itinerary: first_non_empty(api.itinerary.clone(), record.sailing.itinerary.clone()),
        api_offer: ApiOfferRef {
            offer_code: api.offer_code.clone(),
            offer_name: api.offer_name.clone(),
            source: api.source,
        },
        bounce_back_offer: BounceBackOfferRef {
            offer_code: record.sailing.offer_code.clone(),
            stateroom_type: record.stateroom_type.clone(),
            offer_type: record.offer_type.clone(),
            next_cruise_bonus: record.next_cruise_bonus.clone(),
        },
    }
}
