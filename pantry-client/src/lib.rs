//! Pantry Client - HTTP client for the storefront admin API
//!
//! Provides the session lifecycle, product catalog cache, and mutation
//! coordination behind the back-office console.

pub mod catalog;
pub mod config;
pub mod coordinator;
pub mod credential;
pub mod error;
pub mod gateway;
pub mod logger;
pub mod notify;
pub mod session;
pub mod store;

pub use catalog::CatalogCache;
pub use config::ClientConfig;
pub use coordinator::{MutationCoordinator, MutationError};
pub use credential::CredentialCell;
pub use error::{ApiError, ApiResult};
pub use gateway::{HttpGateway, StorefrontApi, UpsertMode};
pub use notify::{NotificationSink, TracingSink};
pub use session::{AuthState, SessionController};
pub use store::{FileSessionStore, MemorySessionStore, PersistedSession, SessionStore, StoreError};
