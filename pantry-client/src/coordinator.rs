//! Mutation coordinator
//!
//! Orchestrates create/edit/delete against the storefront API: one mutation
//! in flight at a time, a wholesale catalog resync after every acknowledged
//! change, exactly one notification per outcome.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use thiserror::Error;
use tracing::debug;

use shared::models::{Product, ProductDraft};

use crate::catalog::CatalogCache;
use crate::error::ApiError;
use crate::gateway::{StorefrontApi, UpsertMode};
use crate::notify::NotificationSink;

/// Error returned by mutation entry points.
#[derive(Debug, Error)]
pub enum MutationError {
    /// Another mutating operation is still in flight; the call was rejected
    /// without touching the network.
    #[error("another operation is already in flight")]
    Busy,

    /// `confirm_deletion` was called with nothing staged.
    #[error("no deletion pending")]
    NoPendingDeletion,

    /// The API call failed. The operator has already been notified; callers
    /// observe this to keep the form open, not to notify again.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// State machine driving catalog mutations.
///
/// The in-flight flag is the "operation forbidden" input lock: the UI layer
/// must block mutating actions while it is set, and the coordinator rejects
/// any that arrive anyway.
pub struct MutationCoordinator {
    gateway: Arc<dyn StorefrontApi>,
    catalog: Arc<CatalogCache>,
    sink: Arc<dyn NotificationSink>,
    in_flight: AtomicBool,
    pending_deletion: RwLock<Option<Product>>,
}

/// Clears the in-flight flag when an operation leaves scope, on every path.
struct FlightGuard<'a>(&'a AtomicBool);

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl MutationCoordinator {
    pub fn new(
        gateway: Arc<dyn StorefrontApi>,
        catalog: Arc<CatalogCache>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            gateway,
            catalog,
            sink,
            in_flight: AtomicBool::new(false),
            pending_deletion: RwLock::new(None),
        }
    }

    /// Whether a mutating operation (including its resync) is in flight.
    pub fn is_operation_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// The product currently staged for deletion, if any.
    pub fn pending_deletion(&self) -> Option<Product> {
        self.pending_deletion
            .read()
            .expect("pending-deletion lock poisoned")
            .clone()
    }

    fn acquire(&self) -> Result<FlightGuard<'_>, MutationError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Mutation rejected: another operation is in flight");
            return Err(MutationError::Busy);
        }
        Ok(FlightGuard(&self.in_flight))
    }

    /// Submit a create or edit. Holds the input lock for the round-trip and
    /// the follow-up catalog resync; on failure the caller is expected to
    /// keep the form open for correction.
    pub async fn submit_upsert(
        &self,
        mode: UpsertMode,
        draft: &ProductDraft,
    ) -> Result<(), MutationError> {
        let _guard = self.acquire()?;
        match self.gateway.upsert_product(mode, draft).await {
            Ok(ack) if ack.success => {
                self.resync().await;
                self.sink.success(match mode {
                    UpsertMode::Create => "Product created",
                    UpsertMode::Edit => "Product updated",
                });
                Ok(())
            }
            Ok(ack) => Err(self.refusal(mode_failure_title(mode), ack.message)),
            Err(e) => {
                self.sink.error(mode_failure_title(mode), &e.user_message());
                Err(e.into())
            }
        }
    }

    /// Stage a product for deletion. No network call: intent and confirmation
    /// are two separate operator actions. Re-requesting replaces the staged
    /// product.
    pub fn request_deletion(&self, product: Product) {
        *self
            .pending_deletion
            .write()
            .expect("pending-deletion lock poisoned") = Some(product);
    }

    /// Drop the staged deletion.
    pub fn cancel_deletion(&self) {
        *self
            .pending_deletion
            .write()
            .expect("pending-deletion lock poisoned") = None;
    }

    /// Delete the staged product. On failure the selection stays, so the
    /// operator can retry.
    pub async fn confirm_deletion(&self) -> Result<(), MutationError> {
        let Some(product) = self.pending_deletion() else {
            return Err(MutationError::NoPendingDeletion);
        };
        let _guard = self.acquire()?;
        match self.gateway.delete_product(&product.id).await {
            Ok(ack) if ack.success => {
                self.resync().await;
                self.sink.success("Product deleted");
                self.cancel_deletion();
                Ok(())
            }
            Ok(ack) => Err(self.refusal("Failed to delete product", ack.message)),
            Err(e) => {
                self.sink.error("Failed to delete product", &e.user_message());
                Err(e.into())
            }
        }
    }

    /// Reload the catalog under the input lock (manual refresh).
    pub async fn refresh_catalog(&self) -> Result<(), MutationError> {
        let _guard = self.acquire()?;
        match self.gateway.list_products().await {
            Ok(products) => {
                self.catalog.replace_all(products);
                Ok(())
            }
            Err(e) => {
                self.sink.error("Failed to load products", &e.user_message());
                Err(e.into())
            }
        }
    }

    /// Wholesale refresh after an acknowledged mutation. A list failure gets
    /// its own notification; the mutation itself already succeeded.
    async fn resync(&self) {
        match self.gateway.list_products().await {
            Ok(products) => self.catalog.replace_all(products),
            Err(e) => self.sink.error("Failed to load products", &e.user_message()),
        }
    }

    /// An HTTP-success response whose ack says `success: false`. Rare, but
    /// still a server refusal: notify once and re-raise.
    fn refusal(&self, title: &str, message: Option<String>) -> MutationError {
        let message = message.unwrap_or_else(|| "request was not acknowledged".to_string());
        self.sink.error(title, &message);
        MutationError::Api(ApiError::Server {
            status: 200,
            message,
        })
    }
}

fn mode_failure_title(mode: UpsertMode) -> &'static str {
    match mode {
        UpsertMode::Create => "Failed to create product",
        UpsertMode::Edit => "Failed to update product",
    }
}
