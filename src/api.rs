//! HTTP collaborators for the offer API.
//!
//! Thin request/response wrappers with no retry or backoff: the
//! comparison engine never performs I/O, and every endpoint here is a
//! single call that either succeeds or surfaces a typed error.

mod client;
mod token;

pub use client::{
    ApiClient, ApiClientBuilder, ApiError, GuestAccount, GuestAccountPayload, LoyaltyInformation,
};
pub use token::account_id_from_token;
