//! Error types for the Aliyun DirectMail client.
//!
//! Every failure a send can produce is a [`DmError`] variant:
//! - Client-side input errors (no destination addresses)
//! - Configuration and signing errors
//! - Network and transport errors, including timeouts and cancellation
//! - Provider errors carried in the `{Code, Message}` response envelope
//! - Unexpected HTTP status codes with no provider error code
//! - Debug dump failures, when dump errors are configured as fatal
//!
//! # Examples
//!
//! ```rust
//! use integrations_aliyun_dm::error::DmError;
//!
//! fn describe(error: &DmError) {
//!     if let Some(code) = error.error_code() {
//!         println!("DirectMail rejected the request: {}", code);
//!     }
//!     if let Some(status) = error.status_code() {
//!         println!("HTTP status: {}", status);
//!     }
//! }
//! ```

mod mapping;

pub use mapping::{interpret_response, parse_error_response, ProviderErrorResponse};

use thiserror::Error;

use crate::config::ConfigError;
use crate::signing::SigningError;

/// Result type alias for DirectMail operations.
pub type DmResult<T> = Result<T, DmError>;

/// Top-level error type for the DirectMail client.
#[derive(Debug, Error)]
pub enum DmError {
    /// The caller supplied input that cannot be sent.
    ///
    /// Raised before any network activity, e.g. when no destination
    /// address was given.
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Description of the invalid input.
        message: String,
    },

    /// Configuration-related errors.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
        /// Optional underlying error source.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Request signing errors.
    #[error("Signing error: {message}")]
    Signing {
        /// Description of the signing error.
        message: String,
    },

    /// Transport and network errors.
    ///
    /// Any failure building or executing the HTTP request, or reading the
    /// response body.
    #[error("Transport error: {message}")]
    Transport {
        /// Description of the transport error.
        message: String,
        /// Optional underlying error source.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The request exceeded the configured timeout.
    #[error("Timeout: {message}")]
    Timeout {
        /// Description of the timeout.
        message: String,
    },

    /// The caller cancelled the send before it completed.
    #[error("Send cancelled")]
    Cancelled,

    /// Error returned by DirectMail in the response envelope.
    ///
    /// Renders as `"<code> Error: <message>"`.
    #[error("{code} Error: {message}")]
    Provider {
        /// Provider error code (e.g. "InvalidParameter.AccountName").
        code: String,
        /// Human-readable error message.
        message: String,
        /// Provider request ID, when the envelope carried one.
        request_id: Option<String>,
    },

    /// The response carried no provider error code but the status was not 200.
    #[error("returned status {status} instead of 200")]
    UnexpectedStatus {
        /// The HTTP status code received.
        status: u16,
    },

    /// Dumping the request or response for debugging failed.
    #[error("Debug dump failed: {message}")]
    Dump {
        /// Description of the dump failure.
        message: String,
    },
}

impl DmError {
    /// Returns the provider error code if available.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use integrations_aliyun_dm::error::DmError;
    ///
    /// let error = DmError::Provider {
    ///     code: "InvalidMailAddress.NotFound".to_string(),
    ///     message: "The specified mail address is not found.".to_string(),
    ///     request_id: None,
    /// };
    ///
    /// assert_eq!(error.error_code(), Some("InvalidMailAddress.NotFound"));
    /// ```
    pub fn error_code(&self) -> Option<&str> {
        match self {
            DmError::Provider { code, .. } => Some(code.as_str()),
            _ => None,
        }
    }

    /// Returns the provider request ID if available.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            DmError::Provider { request_id, .. } => request_id.as_deref(),
            _ => None,
        }
    }

    /// Returns the HTTP status for [`DmError::UnexpectedStatus`].
    pub fn status_code(&self) -> Option<u16> {
        match self {
            DmError::UnexpectedStatus { status } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if repeating the same send could succeed.
    ///
    /// The client never retries on its own; this is a hint for callers
    /// that implement their own policy.
    pub fn is_retryable(&self) -> bool {
        match self {
            DmError::Transport { .. } | DmError::Timeout { .. } => true,
            DmError::UnexpectedStatus { status } => *status >= 500,
            DmError::Provider { code, .. } => {
                code.starts_with("Throttling")
                    || code == "ServiceUnavailable"
                    || code == "InternalError"
            }
            _ => false,
        }
    }
}

impl From<ConfigError> for DmError {
    fn from(err: ConfigError) -> Self {
        DmError::Configuration {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<SigningError> for DmError {
    fn from(err: SigningError) -> Self {
        DmError::Signing {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for DmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DmError::Timeout {
                message: err.to_string(),
            }
        } else {
            DmError::Transport {
                message: err.to_string(),
                source: Some(Box::new(err)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_display() {
        let error = DmError::Provider {
            code: "InvalidParameter.AccountName".to_string(),
            message: "bad".to_string(),
            request_id: Some("6F4F5E2B-0B6E-4B2D-8E3A-1D0E3F4A5B6C".to_string()),
        };
        assert_eq!(error.to_string(), "InvalidParameter.AccountName Error: bad");
        assert_eq!(error.error_code(), Some("InvalidParameter.AccountName"));
        assert_eq!(
            error.request_id(),
            Some("6F4F5E2B-0B6E-4B2D-8E3A-1D0E3F4A5B6C")
        );
    }

    #[test]
    fn test_unexpected_status() {
        let error = DmError::UnexpectedStatus { status: 500 };
        assert_eq!(error.status_code(), Some(500));
        assert_eq!(error.to_string(), "returned status 500 instead of 200");
        assert!(error.is_retryable());

        let error = DmError::UnexpectedStatus { status: 404 };
        assert!(!error.is_retryable());
    }

    #[test]
    fn test_is_retryable() {
        let throttled = DmError::Provider {
            code: "Throttling.User".to_string(),
            message: "Request was denied due to user flow control.".to_string(),
            request_id: None,
        };
        assert!(throttled.is_retryable());

        let rejected = DmError::Provider {
            code: "InvalidToAddress".to_string(),
            message: "The specified toAddress is invalid.".to_string(),
            request_id: None,
        };
        assert!(!rejected.is_retryable());

        let timeout = DmError::Timeout {
            message: "operation timed out".to_string(),
        };
        assert!(timeout.is_retryable());

        assert!(!DmError::Cancelled.is_retryable());
        assert!(!DmError::InvalidInput {
            message: "need at least one email address".to_string(),
        }
        .is_retryable());
    }

    #[test]
    fn test_accessors_on_other_variants() {
        let error = DmError::Dump {
            message: "header value is not visible ASCII".to_string(),
        };
        assert_eq!(error.error_code(), None);
        assert_eq!(error.request_id(), None);
        assert_eq!(error.status_code(), None);
    }

    #[test]
    fn test_from_config_error() {
        let err: DmError = ConfigError::MissingField {
            field: "account_name".to_string(),
        }
        .into();
        assert!(matches!(err, DmError::Configuration { .. }));
        assert!(err.to_string().contains("account_name"));
    }

    #[test]
    fn test_from_signing_error() {
        let err: DmError = SigningError::MissingParameter {
            name: "Timestamp".to_string(),
        }
        .into();
        assert!(matches!(err, DmError::Signing { .. }));
        assert_eq!(
            err.to_string(),
            "Signing error: Missing signature parameter: Timestamp"
        );
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DmError>();
    }
}
