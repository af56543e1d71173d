//! Client configuration

/// Configuration for connecting to the storefront API.
///
/// # Environment variables
///
/// All values can be supplied through the environment:
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | API_BASE | http://localhost:3000 | API origin |
/// | API_PATH | pantry | Store path segment in product routes |
/// | REQUEST_TIMEOUT_SECS | 30 | Request timeout (seconds) |
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API origin (e.g. "https://storefront.example.com").
    pub base_url: String,
    /// Store path segment inserted into product routes.
    pub api_path: String,
    /// Request timeout in seconds.
    pub timeout: u64,
}

impl ClientConfig {
    /// Create a configuration with the default timeout.
    pub fn new(base_url: impl Into<String>, api_path: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_path: api_path.into(),
            timeout: 30,
        }
    }

    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("API_BASE")
                .unwrap_or_else(|_| "http://localhost:3000".into()),
            api_path: std::env::var("API_PATH").unwrap_or_else(|_| "pantry".into()),
            timeout: std::env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        }
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
