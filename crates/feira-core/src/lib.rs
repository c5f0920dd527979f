// SPDX-License-Identifier: AGPL-3.0
// Feira Ofertas Core - Shared logic for all frontends
//
// This crate provides:
// - Wire types and AppError for the Feira marketplace API
// - TokenStore for persistent bearer-token storage
// - SessionStore for the login/logout lifecycle
// - ApiClient, the typed HTTP client
// - OfferQueries, the cached query layer over offer endpoints
//
// Frontend-specific code lives in separate crates.

pub mod cache;
pub mod client;
pub mod queries;
pub mod session;
pub mod token;
pub mod types;

// Re-export commonly used items
pub use cache::{ListKey, ListScope, OfferCache};
pub use client::{ApiClient, ClientConfig, API_URL_ENV};
pub use queries::{OfferApi, OfferQueries};
pub use session::SessionStore;
pub use token::TokenStore;
pub use types::{
    AppError, AuthRequest, AuthResponse, Offer, OfferDraft, OfferPageQuery, OfferStatus, Page,
    RegisterRequest, Role, User,
};
