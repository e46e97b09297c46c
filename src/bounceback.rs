//! Bounce-back CSV ingestion.
//!
//! The parser mirrors the upstream export format rather than RFC 4180: a
//! double quote toggles quoted mode (commas inside are literal) and every
//! quote character is stripped from the output, so a doubled quote (`""`)
//! is NOT unescaped to a literal quote. Unquoted whitespace around fields
//! is trimmed. This is a known simplification; output-side escaping in
//! the report module is standard.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::Sailing;
use crate::normalize::{extract_nights, normalize_date, normalize_ship_name};

/// One bounce-back CSV row, normalized into a comparable sailing plus the
/// columns that only exist on the external side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BounceBackRecord {
    #[serde(flatten)]
    pub sailing: Sailing,
    #[serde(default)]
    pub stateroom_type: String,
    #[serde(default)]
    pub offer_type: String,
    #[serde(default)]
    pub next_cruise_bonus: String,
}

/// Parses CSV text into header-keyed records.
///
/// Line 0 is the header. Rows are zipped positionally against the headers;
/// missing trailing values become empty strings and excess values are
/// dropped. Row lengths are not validated against the header count.
#[must_use]
pub fn parse_csv(text: &str) -> Vec<HashMap<String, String>> {
    let mut lines = text.trim().split('\n');
    let Some(header_line) = lines.next() else {
        return Vec::new();
    };
    let headers: Vec<String> = header_line
        .split(',')
        .map(|header| header.trim().replace('"', ""))
        .collect();

    lines
        .map(|line| {
            let values = split_csv_line(line);
            headers
                .iter()
                .enumerate()
                .map(|(index, header)| {
                    let value = values.get(index).cloned().unwrap_or_default();
                    (header.clone(), value)
                })
                .collect()
        })
        .collect()
}

/// Parses bounce-back CSV text straight into comparable records.
#[must_use]
pub fn parse_bounce_back(text: &str) -> Vec<BounceBackRecord> {
    normalize_records(&parse_csv(text))
}

/// Normalizes header-keyed CSV records into comparable bounce-back
/// records. Ship names, dates, and night counts go through the same
/// normalizers as API sailings so the two sides become comparable.
#[must_use]
pub fn normalize_records(records: &[HashMap<String, String>]) -> Vec<BounceBackRecord> {
    records
        .iter()
        .map(|record| {
            let field = |name: &str| record.get(name).cloned().unwrap_or_default();
            let itinerary = field("Itinerary");
            BounceBackRecord {
                sailing: Sailing {
                    ship_name: normalize_ship_name(&field("Ship")),
                    sail_date: normalize_date(&field("Sail Date")),
                    departure_port: field("Departure Port"),
                    nights: extract_nights(&itinerary),
                    itinerary,
                    offer_code: field("Offer Code"),
                    offer_name: String::new(),
                    source: None,
                },
                stateroom_type: field("Stateroom Type"),
                offer_type: field("Offer Type"),
                next_cruise_bonus: field("Next Cruise Bonus"),
            }
        })
        .collect()
}

fn split_csv_line(line: &str) -> Vec<String> {
    let mut values = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                values.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    values.push(current.trim().to_string());
    values
}
