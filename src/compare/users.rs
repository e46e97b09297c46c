use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::extract::extract_all_sailings;
use crate::filter::filter_sailings;
use crate::models::{Filters, OfferWithDetails, Sailing};

use super::first_non_empty;

/// Offer metadata in the one shape every renderer consumes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferRef {
    pub code: String,
    pub name: String,
    pub description: String,
}

/// One ship+date key held by both users, with the de-duplicated offers
/// each side contributes to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingSailing {
    pub ship_name: String,
    pub sail_date: String,
    pub departure_port: String,
    pub itinerary: String,
    pub nights: u32,
    pub user1_offers: Vec<OfferRef>,
    pub user2_offers: Vec<OfferRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserComparisonStats {
    pub user1_total_sailings: usize,
    pub user2_total_sailings: usize,
    pub user1_filtered_sailings: usize,
    pub user2_filtered_sailings: usize,
    pub common_offers: usize,
    pub user1_only_offers: usize,
    pub user2_only_offers: usize,
    pub matching_sailings: usize,
    pub user1_only_sailings: usize,
    pub user2_only_sailings: usize,
}

/// Full Mode B result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserComparison {
    pub common_offer_codes: Vec<OfferRef>,
    pub user1_only_codes: Vec<OfferRef>,
    pub user2_only_codes: Vec<OfferRef>,
    pub matching_sailings: Vec<MatchingSailing>,
    pub user1_only_sailings: Vec<Sailing>,
    pub user2_only_sailings: Vec<Sailing>,
    pub stats: UserComparisonStats,
    pub filters_applied: Filters,
}

/// Correlates two users' offer sets.
///
/// Extracts and filters both sides' sailings, classifies their offer
/// codes by five-character prefix equivalence, and matches sailings by
/// comparison key. Sailings whose date failed to normalize are
/// non-matchable by construction and land directly in their side's
/// "only" list.
#[must_use]
pub fn compare_users(
    user1_offers: &[OfferWithDetails],
    user2_offers: &[OfferWithDetails],
    filters: &Filters,
) -> UserComparison {
    let user1_all = extract_all_sailings(user1_offers);
    let user2_all = extract_all_sailings(user2_offers);
    let user1_sailings = filter_sailings(&user1_all, filters);
    let user2_sailings = filter_sailings(&user2_all, filters);

    let (common_offer_codes, user1_only_codes, user2_only_codes) =
        classify_offer_codes(&user1_sailings, &user2_sailings, user1_offers, user2_offers);

    let user1_grouped = group_by_key(&user1_sailings);
    let user2_grouped = group_by_key(&user2_sailings);

    let mut matching_sailings = Vec::new();
    let mut user1_only_sailings = Vec::new();
    let mut user2_only_sailings = Vec::new();

    for key in &user1_grouped.key_order {
        let group1 = &user1_grouped.groups[key];
        match user2_grouped.groups.get(key) {
            Some(group2) => matching_sailings.push(build_match(
                group1,
                group2,
                user1_offers,
                user2_offers,
            )),
            None => user1_only_sailings.extend(group1.iter().cloned()),
        }
    }
    user1_only_sailings.extend(user1_grouped.undated);

    for key in &user2_grouped.key_order {
        if !user1_grouped.groups.contains_key(key) {
            user2_only_sailings.extend(user2_grouped.groups[key].iter().cloned());
        }
    }
    user2_only_sailings.extend(user2_grouped.undated);

    let stats = UserComparisonStats {
        user1_total_sailings: user1_all.len(),
        user2_total_sailings: user2_all.len(),
        user1_filtered_sailings: user1_sailings.len(),
        user2_filtered_sailings: user2_sailings.len(),
        common_offers: common_offer_codes.len(),
        user1_only_offers: user1_only_codes.len(),
        user2_only_offers: user2_only_codes.len(),
        matching_sailings: matching_sailings.len(),
        user1_only_sailings: user1_only_sailings.len(),
        user2_only_sailings: user2_only_sailings.len(),
    };

    UserComparison {
        common_offer_codes,
        user1_only_codes,
        user2_only_codes,
        matching_sailings,
        user1_only_sailings,
        user2_only_sailings,
        stats,
        filters_applied: filters.clone(),
    }
}

/// Five-character equivalence class for offer codes; shorter codes use
/// the whole code. Deliberately looser than exact equality: the two
/// accounts assign different full codes to the same promotion family.
fn code_prefix(code: &str) -> String {
    code.chars().take(5).collect::<String>().to_uppercase()
}

/// Classifies offer codes by prefix with stable one-to-one consumption.
///
/// Each user-1 code (in first-extraction order) claims at most one
/// still-unclaimed user-2 code with the same prefix, earliest candidate
/// first. Claimed codes become common; what remains on either side is
/// that side's "only" list.
fn classify_offer_codes(
    user1_sailings: &[Sailing],
    user2_sailings: &[Sailing],
    user1_offers: &[OfferWithDetails],
    user2_offers: &[OfferWithDetails],
) -> (Vec<OfferRef>, Vec<OfferRef>, Vec<OfferRef>) {
    let user1_codes = distinct_codes(user1_sailings);
    let mut user2_remaining = distinct_codes(user2_sailings);

    let mut common = Vec::new();
    let mut user1_only = Vec::new();

    for code in user1_codes {
        let prefix = code_prefix(&code);
        match user2_remaining
            .iter()
            .position(|candidate| code_prefix(candidate) == prefix)
        {
            Some(index) => {
                let matched = user2_remaining.remove(index);
                let (name, description) = offer_info(user1_offers, &code).unwrap_or_default();
                let (fallback_name, fallback_description) =
                    offer_info(user2_offers, &matched).unwrap_or_default();
                common.push(OfferRef {
                    code,
                    name: first_non_empty(name, fallback_name),
                    description: first_non_empty(description, fallback_description),
                });
            }
            None => user1_only.push(offer_ref(user1_offers, &code)),
        }
    }

    let user2_only = user2_remaining
        .iter()
        .map(|code| offer_ref(user2_offers, code))
        .collect();

    (common, user1_only, user2_only)
}

/// Distinct offer codes in first-occurrence order.
fn distinct_codes(sailings: &[Sailing]) -> Vec<String> {
    let mut seen = HashSet::new();
    sailings
        .iter()
        .filter(|sailing| seen.insert(sailing.offer_code.clone()))
        .map(|sailing| sailing.offer_code.clone())
        .collect()
}

/// Finds the display name and description for an offer code, checking
/// each payload's top-level offer before its detail offers.
fn offer_info(offers: &[OfferWithDetails], code: &str) -> Option<(String, String)> {
    for offer_with_details in offers {
        if let Some(campaign) = offer_with_details.offer.campaign_offer.as_ref()
            && campaign.offer_code == code
        {
            return Some((campaign.name.clone(), campaign.description.clone()));
        }
        if let Some(details) = offer_with_details.details.as_ref() {
            for detail_offer in &details.offers {
                if let Some(campaign) = detail_offer.campaign_offer.as_ref()
                    && campaign.offer_code == code
                {
                    return Some((campaign.name.clone(), campaign.description.clone()));
                }
            }
        }
    }
    None
}

fn offer_ref(offers: &[OfferWithDetails], code: &str) -> OfferRef {
    let (name, description) = offer_info(offers, code).unwrap_or_default();
    OfferRef {
        code: code.to_string(),
        name,
        description,
    }
}

/// Sailings grouped by comparison key in first-appearance order, with
/// undated sailings held apart so they never match.
struct GroupedSailings {
    key_order: Vec<String>,
    groups: HashMap<String, Vec<Sailing>>,
    undated: Vec<Sailing>,
}

fn group_by_key(sailings: &[Sailing]) -> GroupedSailings {
    let mut key_order = Vec::new();
    let mut groups: HashMap<String, Vec<Sailing>> = HashMap::new();
    let mut undated = Vec::new();

    for sailing in sailings {
        if !sailing.has_comparable_date() {
            undated.push(sailing.clone());
            continue;
        }
        let key = sailing.comparison_key();
        if !groups.contains_key(&key) {
            key_order.push(key.clone());
        }
        groups.entry(key).or_default().push(sailing.clone());
    }

    GroupedSailings {
        key_order,
        groups,
        undated,
    }
}

fn build_match(
    group1: &[Sailing],
    group2: &[Sailing],
    user1_offers: &[OfferWithDetails],
    user2_offers: &[OfferWithDetails],
) -> MatchingSailing {
    let first = &group1[0];
    MatchingSailing {
        ship_name: first.ship_name.clone(),
        sail_date: first.sail_date.clone(),
        departure_port: first.departure_port.clone(),
        itinerary: first.itinerary.clone(),
        nights: first.nights,
        user1_offers: distinct_offer_refs(group1, user1_offers),
        user2_offers: distinct_offer_refs(group2, user2_offers),
    }
}

/// One `OfferRef` per distinct offer code in the group, first-occurrence
/// order: several offers from the same user on the same sailing collapse
/// into parallel entries, never a cross-product.
fn distinct_offer_refs(group: &[Sailing], offers: &[OfferWithDetails]) -> Vec<OfferRef> {
    let mut seen = HashSet::new();
    group
        .iter()
        .filter(|sailing| seen.insert(sailing.offer_code.clone()))
        .map(|sailing| {
            let description = offer_info(offers, &sailing.offer_code)
                .map(|(_, description)| description)
                .unwrap_or_default();
            OfferRef {
                code: sailing.offer_code.clone(),
                name: sailing.offer_name.clone(),
                description,
            }
        })
        .collect()
}
