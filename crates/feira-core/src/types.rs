// SPDX-License-Identifier: AGPL-3.0
// Feira Ofertas Core - Type definitions
//
// Wire shapes for the Feira HTTP API. The backend speaks Portuguese
// camelCase; serde renames keep the Rust side idiomatic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum accepted offer description length, in characters
pub const MAX_DESCRIPTION_CHARS: usize = 1000;

/// Minimum accepted password length, in characters
pub const MIN_PASSWORD_CHARS: usize = 6;

/// Fixed user role, one per account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "ADMINISTRADOR")]
    Administrator,
    #[serde(rename = "COMERCIANTE")]
    Merchant,
    #[serde(rename = "USUARIO")]
    User,
}

impl Role {
    /// Wire name used by the backend
    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::Administrator => "ADMINISTRADOR",
            Self::Merchant => "COMERCIANTE",
            Self::User => "USUARIO",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ADMINISTRADOR" => Ok(Self::Administrator),
            "COMERCIANTE" => Ok(Self::Merchant),
            "USUARIO" => Ok(Self::User),
            other => Err(AppError::Validation(format!("Unknown role: {}", other))),
        }
    }
}

/// Authenticated user profile (wire: UsuarioDto)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "papel")]
    pub role: Role,
    #[serde(rename = "dataCriacao")]
    pub created_at: DateTime<Utc>,
}

/// Approval state of an offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OfferStatus {
    #[serde(rename = "PENDENTE")]
    Pending,
    #[serde(rename = "APROVADO")]
    Approved,
    #[serde(rename = "REJEITADO")]
    Rejected,
}

impl OfferStatus {
    /// Wire name used by the backend
    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::Pending => "PENDENTE",
            Self::Approved => "APROVADO",
            Self::Rejected => "REJEITADO",
        }
    }
}

/// A merchant-listed product offer (wire: Oferta)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offer {
    pub id: i64,
    #[serde(rename = "nomeProduto")]
    pub product_name: String,
    #[serde(rename = "preco")]
    pub price: f64,
    #[serde(rename = "quantidade")]
    pub quantity: u32,
    #[serde(rename = "descricao")]
    pub description: String,
    pub status: OfferStatus,
    #[serde(rename = "dataCriacao")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "fotoUrl")]
    pub photo_url: Option<String>,
    #[serde(rename = "comercianteNome")]
    pub merchant_name: String,
    /// Set once an administrator has reviewed the offer
    #[serde(rename = "administradorNome")]
    pub admin_name: Option<String>,
}

/// Create/edit payload for an offer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferDraft {
    #[serde(rename = "nomeProduto")]
    pub product_name: String,
    #[serde(rename = "preco")]
    pub price: f64,
    #[serde(rename = "quantidade")]
    pub quantity: u32,
    #[serde(rename = "descricao")]
    pub description: String,
}

impl OfferDraft {
    /// Validate the draft before it is allowed anywhere near the network.
    ///
    /// Quantity zero is fine (sold out listings stay visible); price must be
    /// a finite number strictly greater than zero.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.product_name.trim().is_empty() {
            return Err(AppError::Validation(
                "Product name must not be empty".to_string(),
            ));
        }
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(AppError::Validation(
                "Price must be a positive number".to_string(),
            ));
        }
        if self.description.chars().count() > MAX_DESCRIPTION_CHARS {
            return Err(AppError::Validation(format!(
                "Description must be at most {} characters",
                MAX_DESCRIPTION_CHARS
            )));
        }
        Ok(())
    }
}

/// Login credentials (wire: AuthRequest)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthRequest {
    pub email: String,
    #[serde(rename = "senha")]
    pub password: String,
}

impl AuthRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_credentials(&self.email, &self.password)
    }
}

/// Successful login payload: the profile plus an opaque bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

/// Account registration payload (wire: UsuarioCreateDto)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "senha")]
    pub password: String,
    #[serde(rename = "papel")]
    pub role: Role,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("Name must not be empty".to_string()));
        }
        validate_credentials(&self.email, &self.password)
    }
}

fn validate_credentials(email: &str, password: &str) -> Result<(), AppError> {
    if !email.contains('@') || email.trim().is_empty() {
        return Err(AppError::Validation(
            "Email address is not valid".to_string(),
        ));
    }
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(AppError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_CHARS
        )));
    }
    Ok(())
}

/// Sort flags inside the page envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sort {
    pub empty: bool,
    pub sorted: bool,
    pub unsorted: bool,
}

/// Paging metadata inside the page envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pageable {
    pub page_number: u32,
    pub page_size: u32,
    pub sort: Sort,
    pub offset: u64,
    pub paged: bool,
    pub unpaged: bool,
}

/// Spring-style page envelope returned by list endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub pageable: Pageable,
    pub total_pages: u32,
    pub total_elements: u64,
    pub last: bool,
    pub size: u32,
    pub number: u32,
    pub sort: Sort,
    pub number_of_elements: u32,
    pub first: bool,
    pub empty: bool,
}

/// List query parameters for offer endpoints
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OfferPageQuery {
    /// Optional product name filter (wire: nome)
    pub name: Option<String>,
    pub page: u32,
    pub size: u32,
}

impl Default for OfferPageQuery {
    fn default() -> Self {
        Self {
            name: None,
            page: 0,
            size: 10,
        }
    }
}

/// Error types for the application
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Connection refused: {0}")]
    ConnectionRefused(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("API returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("File I/O error: {0}")]
    FileIo(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Validation failed: {0}")]
    Validation(String),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::FileIo(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> OfferDraft {
        OfferDraft {
            product_name: "Tomate".to_string(),
            price: 4.5,
            quantity: 12,
            description: "Tomate orgânico".to_string(),
        }
    }

    #[test]
    fn test_zero_quantity_is_valid() {
        let mut d = draft();
        d.quantity = 0;
        assert!(d.validate().is_ok());
    }

    #[test]
    fn test_non_positive_price_rejected() {
        for price in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let mut d = draft();
            d.price = price;
            assert!(
                matches!(d.validate(), Err(AppError::Validation(_))),
                "price {} should fail validation",
                price
            );
        }
    }

    #[test]
    fn test_description_over_limit_rejected() {
        let mut d = draft();
        d.description = "a".repeat(MAX_DESCRIPTION_CHARS);
        assert!(d.validate().is_ok());
        d.description.push('a');
        assert!(matches!(d.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_short_password_rejected() {
        let req = AuthRequest {
            email: "ana@example.com".to_string(),
            password: "12345".to_string(),
        };
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_offer_decodes_from_backend_json() {
        let body = r#"{
            "id": 7,
            "nomeProduto": "Alface",
            "preco": 2.5,
            "quantidade": 0,
            "descricao": "Alface crespa",
            "status": "APROVADO",
            "dataCriacao": "2025-11-02T14:30:00Z",
            "fotoUrl": null,
            "comercianteNome": "Quitanda da Ana",
            "administradorNome": "Carlos"
        }"#;

        let offer: Offer = serde_json::from_str(body).expect("offer should decode");
        assert_eq!(offer.id, 7);
        assert_eq!(offer.status, OfferStatus::Approved);
        assert_eq!(offer.quantity, 0);
        assert_eq!(offer.admin_name.as_deref(), Some("Carlos"));
    }

    #[test]
    fn test_unknown_status_is_schema_error() {
        let body = r#"{
            "id": 7,
            "nomeProduto": "Alface",
            "preco": 2.5,
            "quantidade": 1,
            "descricao": "",
            "status": "CANCELADO",
            "dataCriacao": "2025-11-02T14:30:00Z",
            "fotoUrl": null,
            "comercianteNome": "Quitanda da Ana",
            "administradorNome": null
        }"#;

        assert!(serde_json::from_str::<Offer>(body).is_err());
    }

    #[test]
    fn test_page_envelope_decodes() {
        let body = r#"{
            "content": [],
            "pageable": {
                "pageNumber": 0,
                "pageSize": 10,
                "sort": { "empty": true, "sorted": false, "unsorted": true },
                "offset": 0,
                "paged": true,
                "unpaged": false
            },
            "totalPages": 0,
            "totalElements": 0,
            "last": true,
            "size": 10,
            "number": 0,
            "sort": { "empty": true, "sorted": false, "unsorted": true },
            "numberOfElements": 0,
            "first": true,
            "empty": true
        }"#;

        let page: Page<Offer> = serde_json::from_str(body).expect("page should decode");
        assert!(page.empty);
        assert_eq!(page.total_elements, 0);
    }

    #[test]
    fn test_role_wire_names_round_trip() {
        for role in [Role::Administrator, Role::Merchant, Role::User] {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_wire()));
            let back: Role = serde_json::from_str(&json).unwrap();
            assert_eq!(back, role);
        }
    }
}
