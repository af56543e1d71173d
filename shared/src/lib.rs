//! Shared types for the pantry workspace
//!
//! Data models and API DTOs used by both the client library and the
//! console frontend.

pub mod client;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
