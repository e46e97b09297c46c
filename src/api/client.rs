//! Blocking HTTP client for the offer API.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::models::OffersResponse;

use super::account_id_from_token;

const DEFAULT_AUTH_BASE_URL: &str = "https://www.royalcaribbean.com";
const DEFAULT_ACCOUNT_BASE_URL: &str = "https://aws-prd.api.rccl.com";
const DEFAULT_OFFERS_URL: &str = "https://www.royalcaribbean.com/api/casino/casino-offers/v1";

/// How much of an error response body is carried into the error value.
const BODY_EXCERPT_LEN: usize = 200;

/// Errors from the offer API collaborators.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network-level failures (connection, DNS, TLS).
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Non-success HTTP responses, with a response-body excerpt.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Responses that could not be decoded as the expected JSON shape.
    #[error("unexpected response body: {0}")]
    Decode(#[source] reqwest::Error),

    /// Access-token problems (missing token, malformed JWT).
    #[error("access token error: {0}")]
    Token(String),

    /// Client construction or configuration problems.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Builder for [`ApiClient`].
///
/// Base URLs default to the production hosts; the client authorization
/// blob and app key fall back to the `OFFERDECK_CLIENT_AUTH` and
/// `OFFERDECK_APP_KEY` environment variables when not set explicitly.
#[derive(Debug, Default)]
pub struct ApiClientBuilder {
    auth_base_url: Option<String>,
    account_base_url: Option<String>,
    offers_url: Option<String>,
    client_auth: Option<String>,
    app_key: Option<String>,
}

impl ApiClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the base URL of the authentication host.
    pub fn auth_base_url(mut self, url: impl Into<String>) -> Self {
        self.auth_base_url = Some(url.into());
        self
    }

    /// Overrides the base URL of the guest-account host.
    pub fn account_base_url(mut self, url: impl Into<String>) -> Self {
        self.account_base_url = Some(url.into());
        self
    }

    /// Overrides the full URL of the casino-offers endpoint.
    pub fn offers_url(mut self, url: impl Into<String>) -> Self {
        self.offers_url = Some(url.into());
        self
    }

    /// Sets the base64 client-credential blob sent as `Basic` auth on the
    /// token request.
    pub fn client_auth(mut self, value: impl Into<String>) -> Self {
        self.client_auth = Some(value.into());
        self
    }

    /// Sets the `appkey` header value for the guest-account endpoint.
    pub fn app_key(mut self, value: impl Into<String>) -> Self {
        self.app_key = Some(value.into());
        self
    }

    pub fn build(self) -> Result<ApiClient, ApiError> {
        let auth_base_url = self
            .auth_base_url
            .unwrap_or_else(|| DEFAULT_AUTH_BASE_URL.to_string());
        let account_base_url = self
            .account_base_url
            .unwrap_or_else(|| DEFAULT_ACCOUNT_BASE_URL.to_string());
        let offers_url = self
            .offers_url
            .unwrap_or_else(|| DEFAULT_OFFERS_URL.to_string());
        let client_auth = self
            .client_auth
            .or_else(|| std::env::var("OFFERDECK_CLIENT_AUTH").ok());
        let app_key = self
            .app_key
            .or_else(|| std::env::var("OFFERDECK_APP_KEY").ok());

        for url in [&auth_base_url, &account_base_url, &offers_url] {
            reqwest::Url::parse(url)
                .map_err(|error| ApiError::Config(format!("invalid URL {url}: {error}")))?;
        }

        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(ApiError::Network)?;

        Ok(ApiClient {
            http,
            auth_base_url,
            account_base_url,
            offers_url,
            client_auth,
            app_key,
        })
    }
}

/// Synchronous client for the authentication, account, and offer
/// endpoints. Construct with [`ApiClientBuilder`].
pub struct ApiClient {
    http: reqwest::blocking::Client,
    auth_base_url: String,
    account_base_url: String,
    offers_url: String,
    client_auth: Option<String>,
    app_key: Option<String>,
}

/// Guest-account response envelope.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestAccount {
    #[serde(default)]
    pub payload: GuestAccountPayload,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestAccountPayload {
    #[serde(default)]
    pub consumer_id: String,
    #[serde(default)]
    pub loyalty_information: LoyaltyInformation,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltyInformation {
    #[serde(default)]
    pub crown_and_anchor_id: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: String,
}

impl ApiClient {
    /// Requests a password-grant access token and returns it.
    pub fn request_access_token(
        &self,
        username: &str,
        password: &str,
    ) -> Result<String, ApiError> {
        let Some(client_auth) = self.client_auth.as_deref() else {
            return Err(ApiError::Config(
                "client authorization is not configured; set OFFERDECK_CLIENT_AUTH".to_string(),
            ));
        };

        let url = format!("{}/auth/oauth2/access_token", self.auth_base_url);
        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Basic {client_auth}"))
            .form(&[
                ("grant_type", "password"),
                ("username", username),
                ("password", password),
                ("scope", "openid profile email vdsid"),
            ])
            .send()
            .map_err(ApiError::Network)?;
        let response = check_status(response)?;
        debug!("access token request succeeded");

        let token: TokenResponse = response.json().map_err(ApiError::Decode)?;
        if token.access_token.is_empty() {
            return Err(ApiError::Token(
                "token response carried no access_token".to_string(),
            ));
        }
        Ok(token.access_token)
    }

    /// Fetches the guest account keyed by the token's account id.
    pub fn fetch_guest_account(&self, access_token: &str) -> Result<GuestAccount, ApiError> {
        let Some(app_key) = self.app_key.as_deref() else {
            return Err(ApiError::Config(
                "app key is not configured; set OFFERDECK_APP_KEY".to_string(),
            ));
        };

        let account_id = account_id_from_token(access_token)?;
        let url = format!(
            "{}/en/royal/web/v3/guestAccounts/{account_id}",
            self.account_base_url
        );
        let response = self
            .http
            .get(&url)
            .header("access-token", access_token)
            .header("appkey", app_key)
            .header("content-type", "application/json")
            .send()
            .map_err(ApiError::Network)?;
        let response = check_status(response)?;
        debug!(%account_id, "guest account fetched");

        response.json().map_err(ApiError::Decode)
    }

    /// Fetches the account's full offer listing.
    pub fn fetch_offers(
        &self,
        access_token: &str,
        consumer_id: &str,
        cruise_loyalty_id: &str,
    ) -> Result<OffersResponse, ApiError> {
        let body = serde_json::json!({
            "cruiseLoyaltyId": cruise_loyalty_id,
            "consumerId": consumer_id,
            "brand": "R",
        });
        let response = self.post_offers(access_token, &body)?;
        debug!("offer listing fetched");
        response.json().map_err(ApiError::Decode)
    }

    /// Fetches the detail payload (including excluded sailings) for one
    /// offer.
    pub fn fetch_offer_details(
        &self,
        access_token: &str,
        cruise_loyalty_id: &str,
        offer_code: &str,
        player_offer_id: Option<&str>,
    ) -> Result<OffersResponse, ApiError> {
        let body = serde_json::json!({
            "returnExcludedSailings": true,
            "brand": "R",
            "cruiseLoyaltyId": cruise_loyalty_id,
            "offerCode": offer_code,
            "playerOfferId": player_offer_id,
        });
        let response = self.post_offers(access_token, &body)?;
        debug!(%offer_code, "offer details fetched");
        response.json().map_err(ApiError::Decode)
    }

    fn post_offers(
        &self,
        access_token: &str,
        body: &serde_json::Value,
    ) -> Result<reqwest::blocking::Response, ApiError> {
        let account_id = account_id_from_token(access_token)?;
        let response = self
            .http
            .post(&self.offers_url)
            .header("authorization", format!("Bearer {access_token}"))
            .header("account-id", account_id)
            .json(body)
            .send()
            .map_err(ApiError::Network)?;
        check_status(response)
    }
}

fn check_status(
    response: reqwest::blocking::Response,
) -> Result<reqwest::blocking::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body: String = response
        .text()
        .unwrap_or_default()
        .chars()
        .take(BODY_EXCERPT_LEN)
        .collect();
    Err(ApiError::Http {
        status: status.as_u16(),
        body,
    })
}
