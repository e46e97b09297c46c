use serde::{Deserialize, Serialize};

/// One offer from the listing endpoint, paired with the result of its
/// detail fetch.
///
/// `details` is `None` either because the detail fetch failed (in which
/// case `error` records why) or because the caller never performed one;
/// extraction treats both as "no detail sailings" and still walks the
/// top-level offer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferWithDetails {
    #[serde(default)]
    pub offer: OfferEnvelope,
    #[serde(default)]
    pub details: Option<OffersResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// An element of the offer listing: the campaign offer plus the player
/// handle the detail request needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferEnvelope {
    #[serde(default)]
    pub campaign_offer: Option<CampaignOffer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_offer_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignOffer {
    #[serde(default)]
    pub offer_code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sailings: Vec<RawSailing>,
    #[serde(default)]
    pub excluded_sailings: Vec<RawSailing>,
}

/// A sailing exactly as the API reports it, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSailing {
    #[serde(default)]
    pub ship_name: String,
    #[serde(default)]
    pub sail_date: String,
    #[serde(default)]
    pub departure_port: Option<DeparturePort>,
    #[serde(default)]
    pub itinerary_name: String,
    #[serde(default)]
    pub itinerary_description: String,
    /// Null for sailings without pricing; the extractor drops those.
    /// Kept opaque because the API is not consistent about its shape.
    #[serde(default)]
    pub room_type: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeparturePort {
    #[serde(default)]
    pub name: String,
}

/// Body shape shared by the offer listing and the per-offer detail
/// endpoint: a list of offer envelopes. Detail responses nest exactly one
/// level deep; detail offers never carry details of their own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OffersResponse {
    #[serde(default)]
    pub offers: Vec<OfferEnvelope>,
}
