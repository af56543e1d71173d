//! Logging Infrastructure
//!
//! Console logging setup shared by the console binary and tools.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, prelude::*};

/// Initialize the logging system.
///
/// # Arguments
/// * `level` - Log level used when `RUST_LOG` is unset (e.g. "info")
/// * `json_format` - Whether to use JSON format (true for production)
pub fn init_logger(level: &str, json_format: bool) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = tracing_subscriber::registry().with(env_filter);

    if json_format {
        let console_layer = fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true);
        subscriber.with(console_layer).init();
    } else {
        let console_layer = fmt::layer().with_target(true);
        subscriber.with(console_layer).init();
    }

    Ok(())
}
