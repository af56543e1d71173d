//! Storefront API gateway
//!
//! Thin typed wrapper over the admin endpoints. Takes a [`CredentialCell`]
//! at construction and reads it per call; it never writes session state.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use shared::client::{
    AckResponse, ApiErrorBody, CheckSessionResponse, ProductEnvelope, ProductListResponse,
    SigninRequest, SigninResponse,
};
use shared::models::{Product, ProductDraft};

use crate::config::ClientConfig;
use crate::credential::CredentialCell;
use crate::error::{ApiError, ApiResult};

/// Create-or-edit discriminator for [`StorefrontApi::upsert_product`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertMode {
    Create,
    Edit,
}

/// The remote operations of the storefront admin API.
#[async_trait]
pub trait StorefrontApi: Send + Sync {
    /// Exchange credentials for a token and its expiry.
    async fn signin(&self, credentials: &SigninRequest) -> ApiResult<SigninResponse>;

    /// Verify that the ambient token is still accepted server-side.
    async fn check_session(&self) -> ApiResult<CheckSessionResponse>;

    /// Fetch all products. Keyed mappings and null payloads are normalized
    /// to a plain sequence in server order.
    async fn list_products(&self) -> ApiResult<Vec<Product>>;

    /// Create a product, or replace an existing one when `mode` is `Edit`
    /// (the draft must carry an id).
    async fn upsert_product(&self, mode: UpsertMode, draft: &ProductDraft)
    -> ApiResult<AckResponse>;

    /// Delete a product by id.
    async fn delete_product(&self, id: &str) -> ApiResult<AckResponse>;
}

/// Network gateway backed by reqwest.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
    api_path: String,
    credential: CredentialCell,
}

impl HttpGateway {
    /// Build a gateway from configuration and a credential cell.
    pub fn new(config: &ClientConfig, credential: CredentialCell) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_path: config.api_path.clone(),
            credential,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn product_collection_url(&self) -> String {
        format!("{}/api/{}/admin/product", self.base_url, self.api_path)
    }

    fn product_url(&self, id: &str) -> String {
        format!("{}/api/{}/admin/product/{}", self.base_url, self.api_path, id)
    }

    /// Attach the ambient token, when one is set.
    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.credential.token() {
            Some(token) => request.header(reqwest::header::AUTHORIZATION, token),
            None => request,
        }
    }

    /// Normalize a response: non-success statuses become [`ApiError`] with
    /// the server message when the body carries one, or a synthesized
    /// `"API error (status: <code>)"` text otherwise.
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ApiErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| format!("API error (status: {})", status.as_u16()));
            return match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    Err(ApiError::Unauthorized(message))
                }
                _ => Err(ApiError::Server {
                    status: status.as_u16(),
                    message,
                }),
            };
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl StorefrontApi for HttpGateway {
    async fn signin(&self, credentials: &SigninRequest) -> ApiResult<SigninResponse> {
        let url = format!("{}/admin/signin", self.base_url);
        let response = self.client.post(&url).json(credentials).send().await?;
        match Self::handle_response(response).await {
            // Any answered rejection of a signin is a credential problem,
            // whatever status the server picked.
            Err(ApiError::Server { message, .. }) => Err(ApiError::Unauthorized(message)),
            other => other,
        }
    }

    async fn check_session(&self) -> ApiResult<CheckSessionResponse> {
        let url = format!("{}/api/user/check", self.base_url);
        let response = self.authorized(self.client.post(&url)).send().await?;
        Self::handle_response(response).await
    }

    async fn list_products(&self) -> ApiResult<Vec<Product>> {
        let url = format!("{}/api/{}/admin/products/all", self.base_url, self.api_path);
        let response = self.authorized(self.client.get(&url)).send().await?;
        let listing: ProductListResponse = Self::handle_response(response).await?;
        Ok(listing
            .products
            .map(|products| products.into_values().collect())
            .unwrap_or_default())
    }

    async fn upsert_product(
        &self,
        mode: UpsertMode,
        draft: &ProductDraft,
    ) -> ApiResult<AckResponse> {
        let body = ProductEnvelope {
            data: draft.clone(),
        };
        let response = match mode {
            UpsertMode::Create => {
                let request = self.client.post(self.product_collection_url()).json(&body);
                self.authorized(request).send().await?
            }
            UpsertMode::Edit => {
                let id = draft.id.as_deref().ok_or_else(|| {
                    ApiError::Validation("cannot edit a draft without an id".to_string())
                })?;
                let request = self.client.put(self.product_url(id)).json(&body);
                self.authorized(request).send().await?
            }
        };
        Self::handle_response(response).await
    }

    async fn delete_product(&self, id: &str) -> ApiResult<AckResponse> {
        let response = self
            .authorized(self.client.delete(self.product_url(id)))
            .send()
            .await?;
        Self::handle_response(response).await
    }
}
