// SPDX-License-Identifier: AGPL-3.0
// Feira Ofertas CLI - Application State

use feira_core::{ApiClient, AppError, ClientConfig, OfferQueries, SessionStore, TokenStore};
use std::sync::Arc;

/// Shared stores and client handed to every command
pub struct AppState {
    pub client: Arc<ApiClient>,
    pub session: SessionStore,
    pub offers: OfferQueries,
}

impl AppState {
    /// Create application state with all stores initialized
    pub fn new(config: ClientConfig) -> Result<Self, AppError> {
        let tokens = Arc::new(TokenStore::new()?);
        let client = Arc::new(ApiClient::new(config, tokens.clone())?);
        let session = SessionStore::new(tokens);
        let offers = OfferQueries::new(client.clone());

        Ok(Self {
            client,
            session,
            offers,
        })
    }
}
