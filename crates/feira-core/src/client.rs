// SPDX-License-Identifier: AGPL-3.0
// Feira Ofertas Core - Typed HTTP client
//
// The single point of outbound HTTP calls. Every route is a typed method:
// the input shape is serialized from a concrete type, the response is
// decoded against the declared output type, and any mismatch surfaces as a
// serialization error. A bearer token from the token store is attached to
// every request that has one; authorization failures are observed on the
// way back.

use crate::token::TokenStore;
use crate::types::{
    AppError, AuthRequest, AuthResponse, Offer, OfferDraft, OfferPageQuery, Page, RegisterRequest,
    User,
};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

/// Environment variable naming the API origin
pub const API_URL_ENV: &str = "FEIRA_API_URL";

const DEFAULT_API_URL: &str = "http://localhost:8080";
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Client configuration: API origin plus transport timeouts
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API origin without the `/api` prefix
    pub base_url: String,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
}

impl ClientConfig {
    /// Read the API origin from the environment, falling back to localhost
    pub fn from_env() -> Self {
        let base_url = std::env::var(API_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Self::with_base_url(base_url)
    }

    /// Build a configuration for an explicit API origin
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }

    /// Full prefix every route is appended to
    fn api_root(&self) -> String {
        format!("{}/api", self.base_url.trim_end_matches('/'))
    }
}

/// Typed client for the Feira offer marketplace API
pub struct ApiClient {
    http_client: Client,
    api_root: String,
    tokens: Arc<TokenStore>,
}

impl ApiClient {
    /// Build a client with explicit transport timeouts
    pub fn new(config: ClientConfig, tokens: Arc<TokenStore>) -> Result<Self, AppError> {
        let http_client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .build()
            .map_err(|e| AppError::InvalidConfig(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_root: config.api_root(),
            tokens,
        })
    }

    // --- auth routes ---

    /// POST /auth/login
    pub async fn login(&self, credentials: &AuthRequest) -> Result<AuthResponse, AppError> {
        credentials.validate()?;
        let request = self
            .request(Method::POST, "/auth/login")
            .json(credentials);
        self.execute(request).await
    }

    /// POST /auth/register
    pub async fn register(&self, account: &RegisterRequest) -> Result<User, AppError> {
        account.validate()?;
        let request = self
            .request(Method::POST, "/auth/register")
            .json(account);
        self.execute(request).await
    }

    // --- user routes ---

    /// GET /usuarios/me
    pub async fn me(&self) -> Result<User, AppError> {
        self.execute(self.request(Method::GET, "/usuarios/me")).await
    }

    /// GET /usuarios
    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.execute(self.request(Method::GET, "/usuarios")).await
    }

    /// GET /usuarios/:id
    pub async fn get_user(&self, id: i64) -> Result<User, AppError> {
        self.execute(self.request(Method::GET, &format!("/usuarios/{}", id)))
            .await
    }

    // --- offer routes ---

    /// GET /ofertas
    pub async fn list_offers(&self, query: &OfferPageQuery) -> Result<Page<Offer>, AppError> {
        let request = self
            .request(Method::GET, "/ofertas")
            .query(&page_query_params(query));
        self.execute(request).await
    }

    /// GET /ofertas/minhas
    pub async fn my_offers(&self, query: &OfferPageQuery) -> Result<Page<Offer>, AppError> {
        let request = self
            .request(Method::GET, "/ofertas/minhas")
            .query(&page_query_params(query));
        self.execute(request).await
    }

    /// GET /ofertas/:id
    pub async fn get_offer(&self, id: i64) -> Result<Offer, AppError> {
        self.execute(self.request(Method::GET, &format!("/ofertas/{}", id)))
            .await
    }

    /// POST /ofertas
    pub async fn create_offer(&self, draft: &OfferDraft) -> Result<Offer, AppError> {
        draft.validate()?;
        let request = self.request(Method::POST, "/ofertas").json(draft);
        self.execute(request).await
    }

    /// PUT /ofertas/:id
    pub async fn update_offer(&self, id: i64, draft: &OfferDraft) -> Result<Offer, AppError> {
        draft.validate()?;
        let request = self
            .request(Method::PUT, &format!("/ofertas/{}", id))
            .json(draft);
        self.execute(request).await
    }

    /// DELETE /ofertas/:id
    pub async fn delete_offer(&self, id: i64) -> Result<(), AppError> {
        let request = self.request(Method::DELETE, &format!("/ofertas/{}", id));
        self.execute_empty(request).await
    }

    /// POST /ofertas/:id/aprovar
    pub async fn approve_offer(&self, id: i64) -> Result<Offer, AppError> {
        self.execute(self.request(Method::POST, &format!("/ofertas/{}/aprovar", id)))
            .await
    }

    /// POST /ofertas/:id/rejeitar
    pub async fn reject_offer(&self, id: i64, reason: Option<&str>) -> Result<Offer, AppError> {
        let mut request = self.request(Method::POST, &format!("/ofertas/{}/rejeitar", id));
        if let Some(reason) = reason {
            request = request.query(&[("motivo", reason)]);
        }
        self.execute(request).await
    }

    // --- transport plumbing ---

    /// Build a request for a route, attaching the bearer token when present
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.api_root, path);
        let mut request = self.http_client.request(method, url);

        if let Some(token) = self.tokens.get() {
            request = request.bearer_auth(token);
        }

        request
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, AppError> {
        let body = self.dispatch(request).await?;
        serde_json::from_slice(&body)
            .map_err(|e| AppError::Serialization(format!("Failed to parse response: {}", e)))
    }

    /// Like `execute`, for routes whose success body carries nothing useful
    async fn execute_empty(&self, request: RequestBuilder) -> Result<(), AppError> {
        self.dispatch(request).await.map(|_| ())
    }

    async fn dispatch(&self, request: RequestBuilder) -> Result<Vec<u8>, AppError> {
        let response = request.send().await.map_err(map_transport_error)?;

        let status = response.status();
        observe_auth_failure(status);

        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(AppError::Api {
                status: status.as_u16(),
                message: body_preview(body.as_ref()),
            });
        }

        Ok(body.to_vec())
    }
}

/// Observe 401/403 responses. Placeholder for session invalidation: the web
/// client logged these without clearing the token, and this client matches
/// that behaviour.
fn observe_auth_failure(status: StatusCode) {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        tracing::warn!("Authorization failure from API: {}", status.as_u16());
    }
}

fn page_query_params(query: &OfferPageQuery) -> Vec<(&'static str, String)> {
    let mut params = Vec::with_capacity(3);
    if let Some(name) = &query.name {
        params.push(("nome", name.clone()));
    }
    params.push(("page", query.page.to_string()));
    params.push(("size", query.size.to_string()));
    params
}

fn map_transport_error(error: reqwest::Error) -> AppError {
    if error.is_connect() {
        AppError::ConnectionRefused(error.to_string())
    } else if error.is_timeout() {
        AppError::Timeout(error.to_string())
    } else {
        AppError::Network(error.to_string())
    }
}

/// Compact, bounded excerpt of an error body for messages and logs
fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{}...", preview)
    } else {
        preview
    }
}
