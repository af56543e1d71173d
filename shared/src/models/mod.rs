//! Data models
//!
//! Shared between the client library and the console (via API wire shapes).

pub mod product;

// Re-exports
pub use product::*;
