//! Session lifecycle controller
//!
//! Drives login, logout, and startup session restore. The controller is the
//! only owner of authentication state: it writes the credential cell and the
//! persisted store; the gateway only ever reads the token.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use tracing::{debug, info, warn};

use shared::client::SigninRequest;

use crate::catalog::CatalogCache;
use crate::credential::CredentialCell;
use crate::error::ApiResult;
use crate::gateway::StorefrontApi;
use crate::notify::NotificationSink;
use crate::store::{PersistedSession, SessionStore};

/// Authentication lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    /// No session; only login is possible.
    Unauthenticated,
    /// Login round-trip in progress.
    Authenticating,
    /// A persisted token has been attached but not yet verified server-side.
    /// Treated as authenticated for display so a valid session never bounces
    /// through the login screen.
    OptimisticallyAuthenticated,
    /// Token accepted by the server; catalog operations are available.
    Authenticated,
}

/// Login / restore / logout state machine.
pub struct SessionController {
    gateway: Arc<dyn StorefrontApi>,
    store: Arc<dyn SessionStore>,
    catalog: Arc<CatalogCache>,
    sink: Arc<dyn NotificationSink>,
    credential: CredentialCell,
    state: RwLock<AuthState>,
    /// Bumped on every teardown; async continuations compare against it so a
    /// response that straggles in after logout is never applied.
    epoch: AtomicU64,
    /// Interactive session check in progress. Independent of the mutation
    /// lock; both may be true at once.
    checking: AtomicBool,
}

impl SessionController {
    pub fn new(
        gateway: Arc<dyn StorefrontApi>,
        store: Arc<dyn SessionStore>,
        catalog: Arc<CatalogCache>,
        sink: Arc<dyn NotificationSink>,
        credential: CredentialCell,
    ) -> Self {
        Self {
            gateway,
            store,
            catalog,
            sink,
            credential,
            state: RwLock::new(AuthState::Unauthenticated),
            epoch: AtomicU64::new(0),
            checking: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> AuthState {
        *self.state.read().expect("auth state lock poisoned")
    }

    /// Whether the console should show the authenticated surface. True for
    /// the optimistic window too.
    pub fn is_authenticated(&self) -> bool {
        matches!(
            self.state(),
            AuthState::Authenticated | AuthState::OptimisticallyAuthenticated
        )
    }

    /// Whether an interactive session check is in flight.
    pub fn is_checking(&self) -> bool {
        self.checking.load(Ordering::SeqCst)
    }

    fn set_state(&self, next: AuthState) {
        let mut state = self.state.write().expect("auth state lock poisoned");
        if *state != next {
            debug!(from = ?*state, to = ?next, "Auth state change");
            *state = next;
        }
    }

    fn current_epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    /// Exchange credentials for a session. On success the token is
    /// persisted, the credential cell is armed, and the catalog is primed
    /// with a first fetch. A failed login always lands unauthenticated, even
    /// if an older session existed.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<()> {
        self.set_state(AuthState::Authenticating);
        let epoch = self.current_epoch();
        let request = SigninRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        match self.gateway.signin(&request).await {
            Ok(signin) => {
                if self.current_epoch() != epoch {
                    // Torn down while the request was out; leave state alone.
                    return Ok(());
                }
                let session = PersistedSession {
                    token: signin.token.clone(),
                    expires_at: signin.expired,
                };
                if let Err(e) = self.store.save(&session) {
                    warn!(error = %e, "Failed to persist session");
                }
                self.credential.set(signin.token);
                self.set_state(AuthState::Authenticated);
                info!(username, "Signed in");
                self.sink.success("Logged in");
                if let Err(e) = self.refresh_catalog().await {
                    self.sink.error("Failed to load products", &e.user_message());
                }
                Ok(())
            }
            Err(e) => {
                self.credential.clear();
                self.set_state(AuthState::Unauthenticated);
                self.sink.error("Login failed", &e.user_message());
                Err(e)
            }
        }
    }

    /// Restore a persisted session at startup. Returns whether the session
    /// ended up authenticated.
    ///
    /// The stored token is attached optimistically before the server is
    /// asked, so a valid session never flashes the login screen; the
    /// follow-up check still enforces server-side expiry. Any check failure
    /// silently reverts to unauthenticated and clears the persisted token;
    /// the operator just sees the login screen.
    pub async fn restore_session(&self) -> bool {
        let session = match self.store.load() {
            Ok(Some(session)) => session,
            Ok(None) => {
                self.set_state(AuthState::Unauthenticated);
                return false;
            }
            Err(e) => {
                warn!(error = %e, "Failed to read persisted session");
                self.set_state(AuthState::Unauthenticated);
                return false;
            }
        };

        self.credential.set(session.token.clone());
        self.set_state(AuthState::OptimisticallyAuthenticated);
        let epoch = self.current_epoch();

        let verified = match self.gateway.check_session().await {
            Ok(check) => check.success,
            Err(e) => {
                debug!(error = %e, "Session check failed during restore");
                false
            }
        };

        if self.current_epoch() != epoch {
            // Logged out while the check was out; nothing to apply.
            return false;
        }

        if verified {
            self.set_state(AuthState::Authenticated);
            info!("Session restored");
            if let Err(e) = self.refresh_catalog().await {
                self.sink.error("Failed to load products", &e.user_message());
            }
            true
        } else {
            self.credential.clear();
            self.set_state(AuthState::Unauthenticated);
            if let Err(e) = self.store.clear() {
                warn!(error = %e, "Failed to clear persisted session");
            }
            false
        }
    }

    /// Operator-invoked session probe with its own in-flight indicator.
    /// Shows a confirmation on success and an error otherwise; never changes
    /// authentication state.
    pub async fn check_session_interactive(&self) -> ApiResult<bool> {
        self.checking.store(true, Ordering::SeqCst);
        let result = self.gateway.check_session().await;
        self.checking.store(false, Ordering::SeqCst);
        match result {
            Ok(check) if check.success => {
                self.sink.confirm("Currently logged in");
                Ok(true)
            }
            Ok(_) => Ok(false),
            Err(e) => {
                self.sink.error("Session check failed", &e.user_message());
                Err(e)
            }
        }
    }

    /// Clear the session locally. Always succeeds; no network round-trip,
    /// and any response still in flight is ignored when it lands.
    pub fn logout(&self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear persisted session");
        }
        self.credential.clear();
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.set_state(AuthState::Unauthenticated);
        info!("Signed out");
        self.sink.success("Logged out");
    }

    async fn refresh_catalog(&self) -> ApiResult<()> {
        let products = self.gateway.list_products().await?;
        self.catalog.replace_all(products);
        Ok(())
    }
}
