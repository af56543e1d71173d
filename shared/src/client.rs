//! Client-related types for the storefront admin API
//!
//! Request/response types shared between the client library and anything
//! standing in for the remote API in tests.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::models::{Product, ProductDraft};

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Login request body for `POST /admin/signin`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigninRequest {
    pub username: String,
    pub password: String,
}

/// Login response data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigninResponse {
    pub token: String,
    /// Token expiry, UTC milliseconds.
    pub expired: i64,
}

/// Response of `POST /api/user/check`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckSessionResponse {
    pub success: bool,
}

// =============================================================================
// Product API DTOs
// =============================================================================

/// Response of the admin product listing endpoint.
///
/// The server keys products by id and may send `null` instead of an empty
/// mapping; entry order is whatever the server emitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductListResponse {
    #[serde(default)]
    pub products: Option<IndexMap<String, Product>>,
}

/// Envelope for create/update bodies: `{ "data": <product> }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductEnvelope {
    pub data: ProductDraft,
}

/// Acknowledgment returned by create/update/delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Error body the storefront API attaches to non-success responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
