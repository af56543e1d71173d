//! Ambient credential cell
//!
//! Holds the token attached to all outgoing calls. The lifecycle controller
//! is the only writer; the gateway reads it on every request. Clones share
//! the same slot.

use std::sync::{Arc, RwLock};

/// Shared slot for the current session token.
#[derive(Debug, Clone, Default)]
pub struct CredentialCell {
    token: Arc<RwLock<Option<String>>>,
}

impl CredentialCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current token, if a session is active.
    pub fn token(&self) -> Option<String> {
        self.token.read().expect("credential lock poisoned").clone()
    }

    /// Install a token after login or restore.
    pub fn set(&self, token: impl Into<String>) {
        *self.token.write().expect("credential lock poisoned") = Some(token.into());
    }

    /// Drop the token on logout or expiry.
    pub fn clear(&self) {
        *self.token.write().expect("credential lock poisoned") = None;
    }

    pub fn is_set(&self) -> bool {
        self.token.read().expect("credential lock poisoned").is_some()
    }
}
