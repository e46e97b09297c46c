//! End-to-end coverage of the bounce-back comparison path: raw offer
//! payloads through extraction, filtering, comparison, and rendering.

use std::fs;
use std::io::Write as _;

use offerdeck::bounceback::parse_bounce_back;
use offerdeck::compare::compare_with_bounce_back;
use offerdeck::extract::extract_all_sailings;
use offerdeck::models::{Filters, OfferWithDetails};
use offerdeck::report;

fn offers_fixture() -> Vec<OfferWithDetails> {
    serde_json::from_value(serde_json::json!([
        {
            "offer": {
                "campaignOffer": {
                    "offerCode": "ABCDE1",
                    "name": "Club Royale Comp",
                    "sailings": [
                        {
                            "shipName": "oasis of the seas",
                            "sailDate": "2025-06-01T00:00:00.000Z",
                            "departurePort": { "name": "Miami, Florida" },
                            "itineraryName": "7 Night Western Caribbean",
                            "itineraryDescription": "7 Night Western Caribbean",
                            "roomType": "BALCONY"
                        },
                        {
                            "shipName": "oasis of the seas",
                            "sailDate": "2025-06-08",
                            "roomType": null
                        }
                    ]
                },
                "playerOfferId": "p-1"
            },
            "details": {
                "offers": [
                    {
                        "campaignOffer": {
                            "offerCode": "ABCDE1",
                            "name": "Club Royale Comp",
                            "sailings": [
                                {
                                    "shipName": "utopia of the seas",
                                    "sailDate": "2025-07-04",
                                    "departurePort": { "name": "Port Canaveral" },
                                    "itineraryName": "3 Night Weekend Getaway",
                                    "itineraryDescription": "3 Night Weekend Getaway",
                                    "roomType": "INTERIOR"
                                }
                            ]
                        }
                    }
                ]
            }
        },
        {
            "offer": {
                "campaignOffer": {
                    "offerCode": "FGHIJ2",
                    "name": "Instant Reward",
                    "sailings": [
                        {
                            "shipName": "serenade of the seas",
                            "sailDate": "2025-09-15",
                            "departurePort": { "name": "Tampa, Florida" },
                            "itineraryName": "5 Night Cozumel",
                            "roomType": "OCEANVIEW"
                        }
                    ]
                }
            },
            "details": null,
            "error": "HTTP 500: upstream hiccup"
        }
    ]))
    .unwrap()
}

const BOUNCE_BACK_CSV: &str = "\
Ship,Sail Date,Departure Port,Itinerary,Offer Code,Stateroom Type,Offer Type,Next Cruise Bonus
Oasis of the Seas,\"June 1, 2025\",\"Miami, Florida\",7 Night Western Caribbean,ZZZZZ9,Balcony,Comped,\"$200 Free Play\"
Utopia of the Seas,\"July 4, 2025\",Port Canaveral,3 Night Weekend Getaway,YYYYY8,Interior,Discounted,
Wonder of the Seas,\"August 20, 2025\",Port Canaveral,4 Night Bahamas,XXXXX7,Suite,Comped,";

#[test]
fn full_pipeline_finds_overlaps_by_ship_and_date() {
    let api_sailings = extract_all_sailings(&offers_fixture());
    let bounce_back = parse_bounce_back(BOUNCE_BACK_CSV);

    let result = compare_with_bounce_back(api_sailings, bounce_back, &Filters::default());

    // Oasis 2025-06-01 and Utopia 2025-07-04 overlap; Wonder and Serenade
    // have no partner. Offer codes differ on purpose: they are ignored.
    assert_eq!(result.stats.total_overlaps, 2);
    assert_eq!(result.stats.unique_ships_count, 2);
    assert_eq!(result.stats.date_range.earliest.as_deref(), Some("2025-06-01"));
    assert_eq!(result.stats.date_range.latest.as_deref(), Some("2025-07-04"));

    let oasis = result
        .overlaps
        .iter()
        .find(|o| o.ship_name == "Oasis Of The Seas")
        .expect("oasis overlap");
    assert_eq!(oasis.api_offer.offer_code, "ABCDE1");
    assert_eq!(oasis.bounce_back_offer.offer_code, "ZZZZZ9");
    assert_eq!(oasis.bounce_back_offer.next_cruise_bonus, "$200 Free Play");
}

#[test]
fn room_type_filter_and_detail_degradation_reduce_counts() {
    let api_sailings = extract_all_sailings(&offers_fixture());

    // Four raw sailings exist but one has a null room type; the offer
    // with a failed detail fetch still contributes its top-level sailing.
    assert_eq!(api_sailings.len(), 3);
    assert!(
        api_sailings
            .iter()
            .any(|s| s.ship_name == "Serenade Of The Seas")
    );
}

#[test]
fn filters_narrow_both_sides_before_overlap() {
    let api_sailings = extract_all_sailings(&offers_fixture());
    let bounce_back = parse_bounce_back(BOUNCE_BACK_CSV);

    let filters = Filters {
        ships: Some(vec!["utopia".to_string()]),
        ..Filters::default()
    };
    let result = compare_with_bounce_back(api_sailings, bounce_back, &filters);

    assert_eq!(result.stats.filtered_api_sailings, 1);
    assert_eq!(result.stats.filtered_bounce_back_offers, 1);
    assert_eq!(result.stats.total_overlaps, 1);
    assert_eq!(result.overlaps[0].ship_name, "Utopia Of The Seas");
}

#[test]
fn min_days_filter_respects_unknown_night_counts() {
    let api_sailings = extract_all_sailings(&offers_fixture());
    let bounce_back = parse_bounce_back(BOUNCE_BACK_CSV);

    let filters = Filters {
        min_days: Some(5),
        ..Filters::default()
    };
    let result = compare_with_bounce_back(api_sailings, bounce_back, &filters);

    // 7-night Oasis passes, 3-night Utopia is dropped on both sides.
    assert_eq!(result.stats.total_overlaps, 1);
    assert_eq!(result.overlaps[0].ship_name, "Oasis Of The Seas");
}

#[test]
fn csv_file_round_trip_through_the_filesystem() {
    let mut file = tempfile::NamedTempFile::new().expect("create temp csv");
    file.write_all(BOUNCE_BACK_CSV.as_bytes())
        .expect("write temp csv");

    let text = fs::read_to_string(file.path()).expect("read temp csv");
    let bounce_back = parse_bounce_back(&text);
    assert_eq!(bounce_back.len(), 3);
    assert_eq!(bounce_back[0].sailing.sail_date, "2025-06-01");
    assert_eq!(bounce_back[0].sailing.nights, 7);
}

#[test]
fn missing_csv_file_is_a_hard_failure() {
    let missing = fs::read_to_string("definitely-not-here/bounce-back.csv");
    assert!(missing.is_err());
}

#[test]
fn rendered_csv_parses_back_to_the_same_field_values() {
    let api_sailings = extract_all_sailings(&offers_fixture());
    let bounce_back = parse_bounce_back(BOUNCE_BACK_CSV);
    let result = compare_with_bounce_back(api_sailings, bounce_back, &Filters::default());

    let csv = report::bounce_back_csv(&result);
    let reparsed = offerdeck::bounceback::parse_csv(&csv);

    assert_eq!(reparsed.len(), result.overlaps.len());
    for (row, overlap) in reparsed.iter().zip(&result.overlaps) {
        assert_eq!(row["Ship Name"], overlap.ship_name);
        assert_eq!(row["Sail Date"], overlap.sail_date);
        assert_eq!(row["Departure Port"], overlap.departure_port);
        assert_eq!(row["API Offer Code"], overlap.api_offer.offer_code);
        assert_eq!(
            row["Bounce-Back Offer Code"],
            overlap.bounce_back_offer.offer_code
        );
    }
}

#[test]
fn json_report_uses_camel_case_and_round_trips() {
    let api_sailings = extract_all_sailings(&offers_fixture());
    let bounce_back = parse_bounce_back(BOUNCE_BACK_CSV);
    let result = compare_with_bounce_back(api_sailings, bounce_back, &Filters::default());

    let json = serde_json::to_value(&result).expect("serialize result");
    assert!(json["stats"]["totalApiSailings"].is_number());
    assert!(json["stats"]["dateRange"]["earliest"].is_string());
    assert!(json["overlaps"][0]["apiOffer"]["offerCode"].is_string());

    let back: offerdeck::compare::BounceBackComparison =
        serde_json::from_value(json).expect("deserialize result");
    assert_eq!(back, result);
}
