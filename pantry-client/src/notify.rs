//! Notification sink
//!
//! User-facing success/error/confirm messaging, abstracted so the library
//! never talks to a concrete UI. Every failure path produces exactly one
//! `error` call; there are no silent failures.

use tracing::{error, info};

/// Outcome messaging consumed by the lifecycle controller and the mutation
/// coordinator.
pub trait NotificationSink: Send + Sync {
    /// Transient success message.
    fn success(&self, title: &str);

    /// Failure message with the classified detail text.
    fn error(&self, title: &str, detail: &str);

    /// Confirmation dialog; returns whether the operator acknowledged.
    fn confirm(&self, title: &str) -> bool;
}

/// Sink that reports through the tracing pipeline. Default for headless use;
/// `confirm` acknowledges unconditionally.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn success(&self, title: &str) {
        info!(target: "notify", "{title}");
    }

    fn error(&self, title: &str, detail: &str) {
        error!(target: "notify", detail = %detail, "{title}");
    }

    fn confirm(&self, title: &str) -> bool {
        info!(target: "notify", "{title}");
        true
    }
}
