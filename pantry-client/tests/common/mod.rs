//! Test support: a recording notification sink, a mock storefront API
//! served over real HTTP, and helpers to assemble the client stack.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};

use shared::client::{ProductEnvelope, SigninRequest};
use shared::models::{Product, ProductDraft};
use shared::util::now_millis;

use pantry_client::{
    CatalogCache, ClientConfig, CredentialCell, HttpGateway, MutationCoordinator,
    NotificationSink, SessionController, SessionStore, StorefrontApi,
};

pub const USERNAME: &str = "admin@example.com";
pub const PASSWORD: &str = "secret";
pub const VALID_TOKEN: &str = "mock-token-1";

// =============================================================================
// Recording sink
// =============================================================================

/// Sink that records every notification for later assertions. `confirm`
/// acknowledges unconditionally.
#[derive(Debug, Default)]
pub struct RecordingSink {
    successes: Mutex<Vec<String>>,
    errors: Mutex<Vec<(String, String)>>,
    confirms: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn recorded_successes(&self) -> Vec<String> {
        self.successes.lock().unwrap().clone()
    }

    pub fn recorded_errors(&self) -> Vec<(String, String)> {
        self.errors.lock().unwrap().clone()
    }

    pub fn recorded_confirms(&self) -> Vec<String> {
        self.confirms.lock().unwrap().clone()
    }
}

impl NotificationSink for RecordingSink {
    fn success(&self, title: &str) {
        self.successes.lock().unwrap().push(title.to_string());
    }

    fn error(&self, title: &str, detail: &str) {
        self.errors
            .lock()
            .unwrap()
            .push((title.to_string(), detail.to_string()));
    }

    fn confirm(&self, title: &str) -> bool {
        self.confirms.lock().unwrap().push(title.to_string());
        true
    }
}

// =============================================================================
// Mock storefront API
// =============================================================================

/// Shared state of the mock storefront server.
#[derive(Clone, Default)]
pub struct MockStorefront {
    products: Arc<Mutex<HashMap<String, Product>>>,
    next_id: Arc<Mutex<u64>>,
    delete_calls: Arc<Mutex<u32>>,
}

impl MockStorefront {
    pub fn insert(&self, product: Product) {
        self.products
            .lock()
            .unwrap()
            .insert(product.id.clone(), product);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.products.lock().unwrap().contains_key(id)
    }

    pub fn product_count(&self) -> usize {
        self.products.lock().unwrap().len()
    }

    /// How many times the delete endpoint has been hit.
    pub fn delete_count(&self) -> u32 {
        *self.delete_calls.lock().unwrap()
    }

    fn fresh_id(&self) -> String {
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        format!("p-{}", *next_id)
    }
}

/// Build a server-side product from a submitted draft.
pub fn materialize(id: &str, draft: &ProductDraft) -> Product {
    Product {
        id: id.to_string(),
        title: draft.title.clone(),
        category: draft.category.clone(),
        unit: draft.unit.clone(),
        origin_price: draft.origin_price,
        price: draft.price,
        description: draft.description.clone(),
        content: draft.content.clone(),
        is_enabled: draft.is_enabled,
        image_url: draft.image_url.clone(),
        images_url: draft.images_url.clone(),
    }
}

/// A catalog product for seeding the mock.
pub fn sample_product(id: &str, category: &str) -> Product {
    Product {
        id: id.into(),
        title: format!("product {id}"),
        category: category.into(),
        unit: "kg".into(),
        origin_price: 100,
        price: 80,
        description: "sample".into(),
        content: "sample content".into(),
        is_enabled: true,
        image_url: String::new(),
        images_url: Default::default(),
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        == Some(VALID_TOKEN)
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"message": "please sign in again"})),
    )
}

async fn signin(Json(body): Json<SigninRequest>) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if body.username == USERNAME && body.password == PASSWORD {
        Ok(Json(json!({
            "token": VALID_TOKEN,
            "expired": now_millis() + 3_600_000,
        })))
    } else {
        Err((
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "invalid credentials"})),
        ))
    }
}

async fn check(headers: HeaderMap) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if authorized(&headers) {
        Ok(Json(json!({"success": true})))
    } else {
        Err(unauthorized())
    }
}

async fn list_products(
    State(state): State<MockStorefront>,
    headers: HeaderMap,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if !authorized(&headers) {
        return Err(unauthorized());
    }
    let products = state.products.lock().unwrap();
    if products.is_empty() {
        // The real API sends null instead of an empty mapping.
        Ok(Json(json!({"products": null})))
    } else {
        Ok(Json(json!({"products": serde_json::to_value(&*products).unwrap()})))
    }
}

async fn create_product(
    State(state): State<MockStorefront>,
    headers: HeaderMap,
    Json(envelope): Json<ProductEnvelope>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if !authorized(&headers) {
        return Err(unauthorized());
    }
    let id = state.fresh_id();
    state
        .products
        .lock()
        .unwrap()
        .insert(id.clone(), materialize(&id, &envelope.data));
    Ok(Json(json!({"success": true})))
}

async fn update_product(
    State(state): State<MockStorefront>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(envelope): Json<ProductEnvelope>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if !authorized(&headers) {
        return Err(unauthorized());
    }
    let mut products = state.products.lock().unwrap();
    if !products.contains_key(&id) {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({"message": "product not found"})),
        ));
    }
    products.insert(id.clone(), materialize(&id, &envelope.data));
    Ok(Json(json!({"success": true})))
}

async fn delete_product(
    State(state): State<MockStorefront>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    *state.delete_calls.lock().unwrap() += 1;
    if !authorized(&headers) {
        return Err(unauthorized());
    }
    if state.products.lock().unwrap().remove(&id).is_none() {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({"message": "product not found"})),
        ));
    }
    Ok(Json(json!({"success": true})))
}

fn router(state: MockStorefront) -> Router {
    Router::new()
        .route("/admin/signin", post(signin))
        .route("/api/user/check", post(check))
        .route("/api/pantry/admin/products/all", get(list_products))
        .route("/api/pantry/admin/product", post(create_product))
        .route(
            "/api/pantry/admin/product/{id}",
            put(update_product).delete(delete_product),
        )
        .with_state(state)
}

/// Serve the mock on an ephemeral port and return its base URL.
pub async fn spawn_mock() -> (String, MockStorefront) {
    let state = MockStorefront::default();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock listener");
    let addr = listener.local_addr().expect("mock listener addr");
    let app = router(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve mock");
    });
    (format!("http://{addr}"), state)
}

// =============================================================================
// Client stack assembly
// =============================================================================

/// Wire a real gateway, catalog, controller, and coordinator against
/// `base_url`, sharing one credential cell.
pub fn build_stack(
    base_url: &str,
    store: Arc<dyn SessionStore>,
    sink: Arc<RecordingSink>,
) -> (SessionController, MutationCoordinator, Arc<CatalogCache>) {
    let config = ClientConfig::new(base_url, "pantry").with_timeout(5);
    let credential = CredentialCell::new();
    let gateway: Arc<dyn StorefrontApi> =
        Arc::new(HttpGateway::new(&config, credential.clone()).expect("build gateway"));
    let catalog = Arc::new(CatalogCache::new());
    let session = SessionController::new(
        gateway.clone(),
        store,
        catalog.clone(),
        sink.clone(),
        credential,
    );
    let coordinator = MutationCoordinator::new(gateway, catalog.clone(), sink);
    (session, coordinator, catalog)
}
