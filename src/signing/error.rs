//! Signing error types.

use thiserror::Error;

/// Errors that can occur while signing a request.
#[derive(Debug, Error)]
pub enum SigningError {
    /// A parameter the signature covers was missing.
    ///
    /// # Examples
    ///
    /// ```
    /// use integrations_aliyun_dm::signing::SigningError;
    ///
    /// let error = SigningError::MissingParameter {
    ///     name: "Timestamp".to_string(),
    /// };
    /// assert_eq!(error.to_string(), "Missing signature parameter: Timestamp");
    /// ```
    #[error("Missing signature parameter: {name}")]
    MissingParameter {
        /// The name of the missing parameter.
        name: String,
    },
}
