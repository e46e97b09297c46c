//! Flattens nested offer payloads into canonical sailing records.

use crate::models::{CampaignOffer, OfferWithDetails, RawSailing, Sailing, SailingSource};
use crate::normalize::{extract_nights, normalize_date, normalize_ship_name};

/// Extracts every actionable sailing from one offer-with-details payload.
///
/// Walks four lists in fixed order: the top-level offer's sailings and
/// excluded sailings, then each detail offer's sailings and excluded
/// sailings. Raw records without a room type carry no pricing and are
/// dropped. The offer code and name stamped onto each sailing come from
/// the containing offer, not from the sailing record itself.
///
/// Absent lists and a missing or failed detail fetch (`details: None`)
/// simply contribute nothing.
#[must_use]
pub fn extract_sailings(offer_with_details: &OfferWithDetails) -> Vec<Sailing> {
    let mut sailings = Vec::new();

    if let Some(campaign) = offer_with_details.offer.campaign_offer.as_ref() {
        collect_sailings(
            &mut sailings,
            &campaign.sailings,
            campaign,
            SailingSource::Included,
        );
        collect_sailings(
            &mut sailings,
            &campaign.excluded_sailings,
            campaign,
            SailingSource::Excluded,
        );
    }

    if let Some(details) = offer_with_details.details.as_ref() {
        for detail_offer in &details.offers {
            if let Some(campaign) = detail_offer.campaign_offer.as_ref() {
                collect_sailings(
                    &mut sailings,
                    &campaign.sailings,
                    campaign,
                    SailingSource::DetailsIncluded,
                );
                collect_sailings(
                    &mut sailings,
                    &campaign.excluded_sailings,
                    campaign,
                    SailingSource::DetailsExcluded,
                );
            }
        }
    }

    sailings
}

/// Extracts sailings from every offer in a fetched batch, preserving
/// batch order.
#[must_use]
pub fn extract_all_sailings(offers: &[OfferWithDetails]) -> Vec<Sailing> {
    offers.iter().flat_map(extract_sailings).collect()
}

fn collect_sailings(
    out: &mut Vec<Sailing>,
    raw_sailings: &[RawSailing],
    campaign: &CampaignOffer,
    source: SailingSource,
) {
    for raw in raw_sailings {
        if raw.room_type.is_some() {
            out.push(to_sailing(raw, campaign, source));
        }
    }
}

fn to_sailing(raw: &RawSailing, campaign: &CampaignOffer, source: SailingSource) -> Sailing {
    // The description usually carries the "<n> Night ..." lead; fall back
    // to the name when it is absent.
    let nights_text = if raw.itinerary_description.is_empty() {
        &raw.itinerary_name
    } else {
        &raw.itinerary_description
    };

    Sailing {
        ship_name: normalize_ship_name(&raw.ship_name),
        sail_date: normalize_date(&raw.sail_date),
        departure_port: raw
            .departure_port
            .as_ref()
            .map(|port| port.name.clone())
            .unwrap_or_default(),
        itinerary: raw.itinerary_name.clone(),
        nights: extract_nights(nights_text),
        offer_code: campaign.offer_code.clone(),
        offer_name: campaign.name.clone(),
        source: Some(source),
    }
}
