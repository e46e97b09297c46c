//! Compound filtering over extracted sailings.

use crate::models::{Filters, Sailing};
use crate::normalize::parse_calendar_date;

/// Applies every present criterion to the list; a sailing survives only if
/// it passes all of them. An empty filter set returns the input unchanged.
///
/// Criteria are independent: evaluation order never affects the result.
#[must_use]
pub fn filter_sailings(sailings: &[Sailing], filters: &Filters) -> Vec<Sailing> {
    if filters.is_empty() {
        return sailings.to_vec();
    }
    sailings
        .iter()
        .filter(|sailing| sailing_matches(sailing, filters))
        .cloned()
        .collect()
}

/// Tests one sailing against every present criterion.
pub fn sailing_matches(sailing: &Sailing, filters: &Filters) -> bool {
    if let Some(ships) = filters.ships.as_deref()
        && !ships.is_empty()
        && !ships
            .iter()
            .any(|ship| loose_contains(&sailing.ship_name, ship))
    {
        return false;
    }

    if (filters.start_date.is_some() || filters.end_date.is_some())
        && !within_date_range(sailing, filters)
    {
        return false;
    }

    if let Some(ports) = filters.ports.as_deref()
        && !ports.is_empty()
        && !ports
            .iter()
            .any(|port| loose_contains(&sailing.departure_port, port))
    {
        return false;
    }

    // Sailings with an unknown night count (0) are exempt: missing
    // itinerary text must not exclude otherwise valid sailings.
    if let Some(min_days) = filters.min_days
        && min_days > 0
        && sailing.nights > 0
        && sailing.nights < min_days
    {
        return false;
    }

    if let Some(prefix) = filters.offer_code_prefix.as_deref().map(str::trim)
        && !prefix.is_empty()
        && !code_has_prefix(&sailing.offer_code, prefix)
    {
        return false;
    }

    true
}

/// Bidirectional case-insensitive substring test used by the ship and port
/// criteria: the filter term may name part of the field or vice versa.
/// Distinct from the comparator's exact and prefix equivalences.
fn loose_contains(field: &str, term: &str) -> bool {
    let field = field.to_lowercase();
    let term = term.to_lowercase();
    field.contains(&term) || term.contains(&field)
}

/// Inclusive date-range check. A sailing whose date failed to normalize
/// fails any date-bounded filter; a bound that itself fails to parse
/// imposes no constraint.
fn within_date_range(sailing: &Sailing, filters: &Filters) -> bool {
    let Some(sail_date) = parse_calendar_date(&sailing.sail_date) else {
        return false;
    };
    if let Some(start) = filters.start_date.as_deref().and_then(parse_calendar_date)
        && sail_date < start
    {
        return false;
    }
    if let Some(end) = filters.end_date.as_deref().and_then(parse_calendar_date)
        && sail_date > end
    {
        return false;
    }
    true
}

/// Exact match of the code's first five characters against the trimmed
/// filter term, case-insensitively. Codes shorter than five characters
/// never match.
fn code_has_prefix(code: &str, prefix: &str) -> bool {
    let code_prefix: String = code.chars().take(5).collect();
    code_prefix.chars().count() == 5 && code_prefix.to_uppercase() == prefix.to_uppercase()
}
