//! Fetch orchestration: authenticate an account and pull its full offer
//! set, details included.

use std::thread;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::{ApiClient, ApiError, account_id_from_token};
use crate::credentials::Credentials;
use crate::models::{OfferEnvelope, OfferWithDetails};

/// Identity details for a fetched account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub consumer_id: String,
    pub crown_and_anchor_id: String,
    pub account_id: String,
}

/// Everything fetched for one account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOffers {
    pub user_label: String,
    pub user_info: UserInfo,
    pub offers_with_details: Vec<OfferWithDetails>,
}

/// Authenticates, fetches the account and its offer listing, then the
/// per-offer details concurrently (one thread per offer, results kept in
/// listing order).
///
/// A failed detail fetch degrades that one offer to `details: None` with
/// the error recorded; it never fails the batch. Failures before the
/// detail stage (authentication, account, listing) are hard errors.
pub fn fetch_user_offers(
    client: &ApiClient,
    credentials: &Credentials,
    label: &str,
) -> Result<UserOffers, ApiError> {
    info!(user = label, "authenticating");
    let token = client.request_access_token(&credentials.username, &credentials.password)?;
    let account_id = account_id_from_token(&token)?;

    info!(user = label, "fetching guest account");
    let account = client.fetch_guest_account(&token)?;
    let consumer_id = account.payload.consumer_id;
    let cruise_loyalty_id = account.payload.loyalty_information.crown_and_anchor_id;

    info!(user = label, "fetching offer listing");
    let listing = client.fetch_offers(&token, &consumer_id, &cruise_loyalty_id)?;

    info!(
        user = label,
        offers = listing.offers.len(),
        "fetching offer details"
    );
    let offers_with_details =
        fetch_details(client, &token, &cruise_loyalty_id, listing.offers, label);

    Ok(UserOffers {
        user_label: label.to_string(),
        user_info: UserInfo {
            consumer_id,
            crown_and_anchor_id: cruise_loyalty_id,
            account_id,
        },
        offers_with_details,
    })
}

/// Fetches two accounts' offers concurrently.
pub fn fetch_two_users(
    client: &ApiClient,
    user1: &Credentials,
    user2: &Credentials,
) -> Result<(UserOffers, UserOffers), ApiError> {
    thread::scope(|scope| {
        let handle1 = scope.spawn(|| fetch_user_offers(client, user1, "USER1"));
        let handle2 = scope.spawn(|| fetch_user_offers(client, user2, "USER2"));
        let result1 = join_or_propagate(handle1);
        let result2 = join_or_propagate(handle2);
        Ok((result1?, result2?))
    })
}

fn fetch_details(
    client: &ApiClient,
    token: &str,
    cruise_loyalty_id: &str,
    offers: Vec<OfferEnvelope>,
    label: &str,
) -> Vec<OfferWithDetails> {
    thread::scope(|scope| {
        let handles: Vec<_> = offers
            .iter()
            .map(|offer| {
                scope.spawn(move || fetch_one_detail(client, token, cruise_loyalty_id, offer, label))
            })
            .collect();

        offers
            .iter()
            .zip(handles)
            .map(|(offer, handle)| {
                let (details, error) = join_or_propagate(handle);
                OfferWithDetails {
                    offer: offer.clone(),
                    details,
                    error,
                }
            })
            .collect()
    })
}

fn fetch_one_detail(
    client: &ApiClient,
    token: &str,
    cruise_loyalty_id: &str,
    offer: &OfferEnvelope,
    label: &str,
) -> (Option<crate::models::OffersResponse>, Option<String>) {
    let Some(campaign) = offer.campaign_offer.as_ref() else {
        return (None, Some("offer carries no campaign data".to_string()));
    };
    match client.fetch_offer_details(
        token,
        cruise_loyalty_id,
        &campaign.offer_code,
        offer.player_offer_id.as_deref(),
    ) {
        Ok(details) => (Some(details), None),
        Err(error) => {
            warn!(
                user = label,
                offer = %campaign.offer_code,
                %error,
                "detail fetch failed; keeping offer without details"
            );
            (None, Some(error.to_string()))
        }
    }
}

fn join_or_propagate<T>(handle: thread::ScopedJoinHandle<'_, T>) -> T {
    match handle.join() {
        Ok(value) => value,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}
