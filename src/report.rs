//! Renderers for comparison results.
//!
//! JSON output is just serde on the result structs; this module renders
//! the console summaries and the CSV documents. CSV output uses standard
//! escaping (quote-wrap plus doubled interior quotes) even though the
//! ingest side deliberately does not.

use crate::compare::{BounceBackComparison, OfferRef, Overlap, UserComparison};
use crate::models::Sailing;

const BOUNCE_BACK_CSV_HEADER: [&str; 11] = [
    "Ship Name",
    "Sail Date",
    "Departure Port",
    "Itinerary",
    "API Offer Code",
    "API Offer Name",
    "API Source",
    "Bounce-Back Offer Code",
    "Stateroom Type",
    "Offer Type",
    "Next Cruise Bonus",
];

/// Renders the Mode A result as a console report grouped by ship.
#[must_use]
pub fn bounce_back_console_report(result: &BounceBackComparison) -> String {
    let stats = &result.stats;
    let mut report = String::new();

    report.push_str("=== OFFER COMPARISON REPORT ===\n\n");
    report.push_str("STATISTICS:\n");
    report.push_str(&format!(
        "- Total API Sailings: {}\n",
        stats.total_api_sailings
    ));
    report.push_str(&format!(
        "- Filtered API Sailings: {}\n",
        stats.filtered_api_sailings
    ));
    report.push_str(&format!(
        "- Total Bounce-Back Offers: {}\n",
        stats.total_bounce_back_offers
    ));
    report.push_str(&format!(
        "- Filtered Bounce-Back Offers: {}\n",
        stats.filtered_bounce_back_offers
    ));
    report.push_str(&format!("- Total Overlaps Found: {}\n", stats.total_overlaps));
    report.push_str(&format!(
        "- Unique Ships with Overlaps: {}\n",
        stats.unique_ships_count
    ));
    report.push_str(&format!(
        "- Date Range: {} to {}\n",
        stats.date_range.earliest.as_deref().unwrap_or("n/a"),
        stats.date_range.latest.as_deref().unwrap_or("n/a"),
    ));

    push_filter_block(&mut report, &stats.filters_applied);

    report.push_str("\nOVERLAPS BY SHIP AND DATE:\n");
    if result.overlaps.is_empty() {
        report.push_str(
            "No overlapping ships and dates found between API offers and bounce-back offers.\n",
        );
        return report;
    }

    for (ship, overlaps) in group_overlaps_by_ship(&result.overlaps) {
        report.push_str(&format!("\n{}:\n", ship.to_uppercase()));
        for overlap in overlaps {
            report.push_str(&format!(
                "  - {}: {}\n",
                overlap.sail_date, overlap.departure_port
            ));
            report.push_str(&format!(
                "    API: {} ({}) [{}]\n",
                overlap.api_offer.offer_code,
                overlap.api_offer.offer_name,
                overlap
                    .api_offer
                    .source
                    .map(|source| source.to_string())
                    .unwrap_or_default(),
            ));
            report.push_str(&format!(
                "    Bounce-Back: {} - {}\n",
                overlap.bounce_back_offer.offer_code, overlap.bounce_back_offer.offer_type
            ));
            if !overlap.bounce_back_offer.next_cruise_bonus.is_empty() {
                report.push_str(&format!(
                    "    Bonus: {}\n",
                    overlap.bounce_back_offer.next_cruise_bonus
                ));
            }
            report.push_str(&format!("    Itinerary: {}\n", overlap.itinerary));
        }
    }

    report
}

/// Renders the Mode A overlaps as a CSV document with a fixed 11-column
/// layout, one row per overlap.
#[must_use]
pub fn bounce_back_csv(result: &BounceBackComparison) -> String {
    let mut lines = vec![csv_line(
        &BOUNCE_BACK_CSV_HEADER.map(str::to_string),
    )];
    for overlap in &result.overlaps {
        lines.push(csv_line(&[
            overlap.ship_name.clone(),
            overlap.sail_date.clone(),
            overlap.departure_port.clone(),
            overlap.itinerary.clone(),
            overlap.api_offer.offer_code.clone(),
            overlap.api_offer.offer_name.clone(),
            overlap
                .api_offer
                .source
                .map(|source| source.to_string())
                .unwrap_or_default(),
            overlap.bounce_back_offer.offer_code.clone(),
            overlap.bounce_back_offer.stateroom_type.clone(),
            overlap.bounce_back_offer.offer_type.clone(),
            overlap.bounce_back_offer.next_cruise_bonus.clone(),
        ]));
    }
    lines.join("\n")
}

/// Renders the Mode B result as a console report: summary block plus
/// capped listings with "... and N more" tails.
#[must_use]
pub fn user_comparison_console_report(result: &UserComparison) -> String {
    let stats = &result.stats;
    let mut report = String::new();

    report.push_str("=== USER OFFER COMPARISON REPORT ===\n\n");
    report.push_str("OFFER SUMMARY:\n");
    report.push_str(&format!("- Common Offers: {}\n", stats.common_offers));
    report.push_str(&format!("- USER1 Only: {}\n", stats.user1_only_offers));
    report.push_str(&format!("- USER2 Only: {}\n", stats.user2_only_offers));

    report.push_str("\nCRUISE ITINERARY SUMMARY:\n");
    report.push_str(&format!(
        "- USER1 Total Sailings: {} ({} after filters)\n",
        stats.user1_total_sailings, stats.user1_filtered_sailings
    ));
    report.push_str(&format!(
        "- USER2 Total Sailings: {} ({} after filters)\n",
        stats.user2_total_sailings, stats.user2_filtered_sailings
    ));
    report.push_str(&format!(
        "- Matching Itineraries: {}\n",
        stats.matching_sailings
    ));
    report.push_str(&format!(
        "- USER1 Only Sailings: {}\n",
        stats.user1_only_sailings
    ));
    report.push_str(&format!(
        "- USER2 Only Sailings: {}\n",
        stats.user2_only_sailings
    ));

    push_filter_block(&mut report, &result.filters_applied);

    push_code_list(&mut report, "Common Offer Codes", &result.common_offer_codes);
    push_code_list(&mut report, "USER1 Only Offer Codes", &result.user1_only_codes);
    push_code_list(&mut report, "USER2 Only Offer Codes", &result.user2_only_codes);

    if result.matching_sailings.is_empty() {
        report.push_str("\nNo matching cruise itineraries found.\n");
    } else {
        report.push_str(&format!(
            "\nMATCHING ITINERARIES ({}):\n",
            result.matching_sailings.len()
        ));
        for matched in result.matching_sailings.iter().take(10) {
            report.push_str(&format!("\n  {} - {}\n", matched.ship_name, matched.sail_date));
            report.push_str(&format!("    Departure Port: {}\n", matched.departure_port));
            report.push_str(&format!("    Itinerary: {}\n", matched.itinerary));
            if matched.nights > 0 {
                report.push_str(&format!("    Nights: {}\n", matched.nights));
            }
            report.push_str(&format!(
                "    USER1 Offers: {}\n",
                join_codes(&matched.user1_offers)
            ));
            report.push_str(&format!(
                "    USER2 Offers: {}\n",
                join_codes(&matched.user2_offers)
            ));
        }
        if result.matching_sailings.len() > 10 {
            report.push_str(&format!(
                "  ... and {} more matching itineraries\n",
                result.matching_sailings.len() - 10
            ));
        }
    }

    push_sailing_list(&mut report, "USER1 ONLY SAILINGS", &result.user1_only_sailings);
    push_sailing_list(&mut report, "USER2 ONLY SAILINGS", &result.user2_only_sailings);

    report
}

/// Renders the Mode B result as a two-section CSV document: the offer-code
/// table, then the itinerary table.
#[must_use]
pub fn user_comparison_csv(result: &UserComparison) -> String {
    let mut code_rows = vec![csv_line(&[
        "Offer Code".to_string(),
        "Available For USER1".to_string(),
        "Available For USER2".to_string(),
        "Status".to_string(),
    ])];
    for offer in &result.common_offer_codes {
        code_rows.push(csv_line(&[
            offer.code.clone(),
            "Yes".to_string(),
            "Yes".to_string(),
            "Common".to_string(),
        ]));
    }
    for offer in &result.user1_only_codes {
        code_rows.push(csv_line(&[
            offer.code.clone(),
            "Yes".to_string(),
            "No".to_string(),
            "USER1 Only".to_string(),
        ]));
    }
    for offer in &result.user2_only_codes {
        code_rows.push(csv_line(&[
            offer.code.clone(),
            "No".to_string(),
            "Yes".to_string(),
            "USER2 Only".to_string(),
        ]));
    }

    let mut itinerary_rows = vec![csv_line(&[
        "Ship Name".to_string(),
        "Sail Date".to_string(),
        "Departure Port".to_string(),
        "Itinerary".to_string(),
        "Nights".to_string(),
        "USER1 Offer Codes".to_string(),
        "USER2 Offer Codes".to_string(),
        "USER1 Offer Names".to_string(),
        "USER2 Offer Names".to_string(),
        "Status".to_string(),
    ])];
    for matched in &result.matching_sailings {
        itinerary_rows.push(csv_line(&[
            matched.ship_name.clone(),
            matched.sail_date.clone(),
            matched.departure_port.clone(),
            matched.itinerary.clone(),
            nights_cell(matched.nights),
            join_codes(&matched.user1_offers),
            join_codes(&matched.user2_offers),
            join_names(&matched.user1_offers),
            join_names(&matched.user2_offers),
            "Matching".to_string(),
        ]));
    }
    for sailing in &result.user1_only_sailings {
        itinerary_rows.push(only_sailing_row(sailing, true));
    }
    for sailing in &result.user2_only_sailings {
        itinerary_rows.push(only_sailing_row(sailing, false));
    }

    [
        "=== OFFER CODE COMPARISON ===".to_string(),
        code_rows.join("\n"),
        String::new(),
        "=== CRUISE ITINERARY COMPARISON ===".to_string(),
        itinerary_rows.join("\n"),
    ]
    .join("\n")
}

fn only_sailing_row(sailing: &Sailing, is_user1: bool) -> String {
    let (user1_code, user2_code, user1_name, user2_name, status) = if is_user1 {
        (
            sailing.offer_code.clone(),
            String::new(),
            sailing.offer_name.clone(),
            String::new(),
            "USER1 Only",
        )
    } else {
        (
            String::new(),
            sailing.offer_code.clone(),
            String::new(),
            sailing.offer_name.clone(),
            "USER2 Only",
        )
    };
    csv_line(&[
        sailing.ship_name.clone(),
        sailing.sail_date.clone(),
        sailing.departure_port.clone(),
        sailing.itinerary.clone(),
        nights_cell(sailing.nights),
        user1_code,
        user2_code,
        user1_name,
        user2_name,
        status.to_string(),
    ])
}

fn nights_cell(nights: u32) -> String {
    if nights == 0 {
        String::new()
    } else {
        nights.to_string()
    }
}

fn join_codes(offers: &[OfferRef]) -> String {
    offers
        .iter()
        .map(|offer| offer.code.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

fn join_names(offers: &[OfferRef]) -> String {
    offers
        .iter()
        .map(|offer| offer.name.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

fn push_filter_block(report: &mut String, filters: &crate::models::Filters) {
    if filters.is_empty() {
        return;
    }
    report.push_str("\nFILTERS APPLIED:\n");
    if let Some(ships) = filters.ships.as_deref()
        && !ships.is_empty()
    {
        report.push_str(&format!("- Ships: {}\n", ships.join(", ")));
    }
    if let Some(start_date) = filters.start_date.as_deref() {
        report.push_str(&format!("- Start Date: {start_date}\n"));
    }
    if let Some(end_date) = filters.end_date.as_deref() {
        report.push_str(&format!("- End Date: {end_date}\n"));
    }
    if let Some(ports) = filters.ports.as_deref()
        && !ports.is_empty()
    {
        report.push_str(&format!("- Ports: {}\n", ports.join(", ")));
    }
    if let Some(min_days) = filters.min_days
        && min_days > 0
    {
        report.push_str(&format!("- Minimum Days: {min_days}\n"));
    }
    if let Some(prefix) = filters.offer_code_prefix.as_deref() {
        report.push_str(&format!("- Offer Code Prefix: {prefix}\n"));
    }
}

fn push_code_list(report: &mut String, title: &str, offers: &[OfferRef]) {
    if offers.is_empty() {
        return;
    }
    report.push_str(&format!("\n{} ({}):\n", title, offers.len()));
    for offer in offers.iter().take(10) {
        if offer.name.is_empty() {
            report.push_str(&format!("  - {}\n", offer.code));
        } else {
            report.push_str(&format!("  - {} ({})\n", offer.code, offer.name));
        }
    }
    if offers.len() > 10 {
        report.push_str(&format!("  ... and {} more\n", offers.len() - 10));
    }
}

fn push_sailing_list(report: &mut String, title: &str, sailings: &[Sailing]) {
    if sailings.is_empty() {
        return;
    }
    report.push_str(&format!("\n{} ({}):\n", title, sailings.len()));
    for sailing in sailings.iter().take(5) {
        report.push_str(&format!(
            "  - {} - {} ({}) - {}\n",
            sailing.ship_name, sailing.sail_date, sailing.departure_port, sailing.offer_code
        ));
    }
    if sailings.len() > 5 {
        report.push_str(&format!("  ... and {} more\n", sailings.len() - 5));
    }
}

/// Groups overlaps by ship name in first-appearance order.
fn group_overlaps_by_ship(overlaps: &[Overlap]) -> Vec<(String, Vec<&Overlap>)> {
    let mut grouped: Vec<(String, Vec<&Overlap>)> = Vec::new();
    for overlap in overlaps {
        match grouped.iter_mut().find(|(ship, _)| *ship == overlap.ship_name) {
            Some((_, group)) => group.push(overlap),
            None => grouped.push((overlap.ship_name.clone(), vec![overlap])),
        }
    }
    grouped
}

fn csv_line(fields: &[String]) -> String {
    fields
        .iter()
        .map(|field| escape_csv(field))
        .collect::<Vec<_>>()
        .join(",")
}

/// Quote-wraps a value containing a comma, quote, or newline, doubling
/// interior quotes.
fn escape_csv(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounceback::BounceBackRecord;
    use crate::compare::{compare_with_bounce_back, compare_users};
    use crate::models::{Filters, SailingSource};

    fn sailing(ship: &str, date: &str, port: &str, code: &str) -> Sailing {
        Sailing {
            ship_name: ship.to_string(),
            sail_date: date.to_string(),
            departure_port: port.to_string(),
            itinerary: "7 Night Western Caribbean".to_string(),
            nights: 7,
            offer_code: code.to_string(),
            offer_name: "Free Cruise".to_string(),
            source: Some(SailingSource::Included),
        }
    }

    fn bounce(ship: &str, date: &str, code: &str, bonus: &str) -> BounceBackRecord {
        BounceBackRecord {
            sailing: Sailing {
                ship_name: ship.to_string(),
                sail_date: date.to_string(),
                departure_port: String::new(),
                itinerary: String::new(),
                nights: 0,
                offer_code: code.to_string(),
                offer_name: String::new(),
                source: None,
            },
            stateroom_type: "Balcony".to_string(),
            offer_type: "Comped".to_string(),
            next_cruise_bonus: bonus.to_string(),
        }
    }

    fn sample_result() -> BounceBackComparison {
        compare_with_bounce_back(
            vec![sailing(
                "Oasis Of The Seas",
                "2025-06-01",
                "Miami, Florida",
                "ABCDE1",
            )],
            vec![bounce(
                "Oasis Of The Seas",
                "2025-06-01",
                "ABCDE9",
                "$100 \"Free\" Play, or so",
            )],
            &Filters::default(),
        )
    }

    #[test]
    fn csv_starts_with_fixed_header() {
        let csv = bounce_back_csv(&sample_result());
        let header = csv.lines().next().unwrap();
        assert_eq!(
            header,
            "Ship Name,Sail Date,Departure Port,Itinerary,API Offer Code,API Offer Name,\
             API Source,Bounce-Back Offer Code,Stateroom Type,Offer Type,Next Cruise Bonus"
        );
    }

    #[test]
    fn csv_escaping_round_trips_through_the_parser() {
        let csv = bounce_back_csv(&sample_result());
        let records = crate::bounceback::parse_csv(&csv);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["Ship Name"], "Oasis Of The Seas");
        assert_eq!(records[0]["Departure Port"], "Miami, Florida");
        // Interior quotes are stripped by the simplified parser, but the
        // comma inside the quoted field survives splitting.
        assert_eq!(records[0]["Next Cruise Bonus"], "$100 Free Play, or so");
    }

    #[test]
    fn empty_overlaps_render_header_only_csv() {
        let result = compare_with_bounce_back(Vec::new(), Vec::new(), &Filters::default());
        let csv = bounce_back_csv(&result);
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn console_report_groups_overlaps_by_ship() {
        let report = bounce_back_console_report(&sample_result());
        assert!(report.contains("OASIS OF THE SEAS:"));
        assert!(report.contains("API: ABCDE1 (Free Cruise) [included]"));
        assert!(report.contains("Bounce-Back: ABCDE9 - Comped"));
        assert!(report.contains("- Total Overlaps Found: 1"));
    }

    #[test]
    fn console_report_handles_no_overlaps() {
        let result = compare_with_bounce_back(Vec::new(), Vec::new(), &Filters::default());
        let report = bounce_back_console_report(&result);
        assert!(report.contains("No overlapping ships and dates found"));
        assert!(report.contains("- Date Range: n/a to n/a"));
    }

    #[test]
    fn console_report_lists_applied_filters() {
        let filters = Filters {
            ships: Some(vec!["Oasis".to_string()]),
            min_days: Some(5),
            ..Filters::default()
        };
        let result = compare_with_bounce_back(Vec::new(), Vec::new(), &filters);
        let report = bounce_back_console_report(&result);
        assert!(report.contains("FILTERS APPLIED:"));
        assert!(report.contains("- Ships: Oasis"));
        assert!(report.contains("- Minimum Days: 5"));
    }

    fn user_payload(code: &str, name: &str, ship: &str, date: &str) -> crate::models::OfferWithDetails {
        serde_json::from_value(serde_json::json!({
            "offer": {
                "campaignOffer": {
                    "offerCode": code,
                    "name": name,
                    "sailings": [{
                        "shipName": ship,
                        "sailDate": date,
                        "departurePort": { "name": "Miami, Florida" },
                        "itineraryName": "7 Night Western Caribbean",
                        "roomType": "BALCONY"
                    }]
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn user_csv_has_both_sections() {
        let user1 = vec![user_payload("AAAAA1", "One", "oasis of the seas", "2025-06-01")];
        let user2 = vec![user_payload("AAAAA9", "Two", "oasis of the seas", "2025-06-01")];
        let result = compare_users(&user1, &user2, &Filters::default());
        let csv = user_comparison_csv(&result);

        assert!(csv.starts_with("=== OFFER CODE COMPARISON ==="));
        assert!(csv.contains("AAAAA1,Yes,Yes,Common"));
        assert!(csv.contains("=== CRUISE ITINERARY COMPARISON ==="));
        assert!(csv.contains("Oasis Of The Seas,2025-06-01"));
        assert!(csv.contains("Matching"));
    }

    #[test]
    fn user_console_report_caps_long_listings() {
        let user1: Vec<_> = (0..12)
            .map(|i| {
                user_payload(
                    &format!("AAA{i:02}X"),
                    "Offer",
                    "oasis of the seas",
                    &format!("2025-06-{:02}", i + 1),
                )
            })
            .collect();
        let result = compare_users(&user1, &[], &Filters::default());
        let report = user_comparison_console_report(&result);

        assert!(report.contains("USER1 Only Offer Codes (12):"));
        assert!(report.contains("... and 2 more"));
        assert!(report.contains("USER1 ONLY SAILINGS (12):"));
        assert!(report.contains("... and 7 more"));
    }
}
