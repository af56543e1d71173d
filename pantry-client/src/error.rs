//! Client error types

use thiserror::Error;

/// Error taxonomy for storefront API operations.
///
/// Every transport or protocol failure is normalized into one of these at
/// the gateway boundary; nothing above it sees a raw reqwest error.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad credentials or an expired session. The payload is the
    /// server-supplied message when one was present.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The request went out but no response came back.
    #[error("network error or no response from server")]
    Network(#[source] Option<reqwest::Error>),

    /// The server answered with a non-success status.
    #[error("server error (status {status}): {message}")]
    Server { status: u16, message: String },

    /// Malformed client-side input.
    #[error("validation error: {0}")]
    Validation(String),
}

impl ApiError {
    /// The human-readable text surfaced to the operator, preferring the
    /// server-supplied message where one exists.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthorized(msg) => msg.clone(),
            ApiError::Network(_) => "network error or no response from server".to_string(),
            ApiError::Server { message, .. } => message.clone(),
            ApiError::Validation(msg) => msg.clone(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        // A builder or decode failure never left the machine; everything
        // else is the transport giving up without a usable response.
        if err.is_builder() || err.is_decode() {
            ApiError::Validation(err.to_string())
        } else {
            ApiError::Network(Some(err))
        }
    }
}

/// Result type for storefront API operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_server_text() {
        let err = ApiError::Server {
            status: 400,
            message: "category is required".into(),
        };
        assert_eq!(err.user_message(), "category is required");

        let err = ApiError::Unauthorized("invalid credentials".into());
        assert_eq!(err.user_message(), "invalid credentials");
    }

    #[test]
    fn test_network_message_is_generic() {
        let err = ApiError::Network(None);
        assert_eq!(err.user_message(), "network error or no response from server");
    }
}
