//! DirectMail client.
//!
//! A [`DmClient`] holds the account name, access key and mode flags. It is
//! immutable: [`DmClient::debug`] returns a new client rather than flipping
//! a flag in place. Mails are created from a client and borrow it for their
//! credentials at send time.
//!
//! # Example
//!
//! ```rust,no_run
//! use integrations_aliyun_dm::DmClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = DmClient::new("noreply@mail.example.com", "LTAI5tExampleKeyId", "ExampleKeySecret")?
//!     .debug(true);
//!
//! client
//!     .new_html_mail("Welcome", "<b>hello</b> world")
//!     .send(&["user@example.com"])
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::Arc;

use crate::config::DmConfig;
use crate::error::DmResult;
use crate::http::dump;
use crate::http::{ReqwestTransport, SignedRequest, Transport};
use crate::mail::{BodyFormat, Mail};

/// Client for the DirectMail API.
///
/// Cloning is cheap; clones share configuration and transport.
#[derive(Clone)]
pub struct DmClient {
    config: Arc<DmConfig>,
    transport: Arc<dyn Transport>,
}

impl DmClient {
    /// Create a client from an account name and access key pair, using the
    /// default endpoint and timeouts.
    ///
    /// # Arguments
    ///
    /// * `account_name` - Sender address registered in the DirectMail console
    /// * `access_key_id` - Access key ID used to sign requests
    /// * `access_key_secret` - Access key secret used to sign requests
    ///
    /// # Returns
    ///
    /// A new `DmClient` with debug dumping off.
    ///
    /// # Errors
    ///
    /// Returns `DmError::Configuration` if any argument is empty, or
    /// `DmError::Transport` if the HTTP client cannot be initialized.
    pub fn new(
        account_name: impl Into<String>,
        access_key_id: impl Into<String>,
        access_key_secret: impl Into<String>,
    ) -> DmResult<Self> {
        let config = DmConfig::builder()
            .account_name(account_name)
            .credentials(access_key_id, access_key_secret)
            .build()?;

        Self::with_config(config)
    }

    /// Create a client from a full configuration.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::time::Duration;
    /// use integrations_aliyun_dm::{DmClient, DmConfig};
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = DmConfig::builder()
    ///     .account_name("noreply@mail.example.com")
    ///     .credentials("AKID", "SECRET")
    ///     .timeout(Duration::from_secs(10))
    ///     .build()?;
    ///
    /// let client = DmClient::with_config(config)?;
    /// assert!(!client.is_debug());
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_config(config: DmConfig) -> DmResult<Self> {
        let transport = Arc::new(ReqwestTransport::from_config(&config)?) as Arc<dyn Transport>;
        Ok(Self::with_transport(config, transport))
    }

    /// Create a client with a custom transport.
    pub fn with_transport(config: DmConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
        }
    }

    /// Derive a client with debug dumping switched on or off.
    ///
    /// The original client is left untouched; both share the transport.
    pub fn debug(&self, debug: bool) -> Self {
        let mut config = (*self.config).clone();
        config.debug = debug;

        Self {
            config: Arc::new(config),
            transport: Arc::clone(&self.transport),
        }
    }

    /// Returns true if requests and responses are dumped to the log.
    pub fn is_debug(&self) -> bool {
        self.config.debug
    }

    /// The client configuration.
    pub fn config(&self) -> &DmConfig {
        &self.config
    }

    /// The sender account name.
    pub fn account_name(&self) -> &str {
        &self.config.account_name
    }

    /// Create a plain-text mail.
    pub fn new_mail(&self, subject: impl Into<String>, content: impl Into<String>) -> Mail<'_> {
        Mail::new(self, subject, content, BodyFormat::Text)
    }

    /// Create an HTML mail.
    pub fn new_html_mail(
        &self,
        subject: impl Into<String>,
        content: impl Into<String>,
    ) -> Mail<'_> {
        Mail::new(self, subject, content, BodyFormat::Html)
    }

    /// Post a signed request and interpret the response.
    ///
    /// Exactly one transport call is made.
    pub(crate) async fn execute(&self, request: SignedRequest) -> DmResult<()> {
        let action = request.get("Action").unwrap_or_default().to_string();
        let http_request =
            request.into_http_request(&self.config.endpoint, &self.config.user_agent)?;

        if self.config.debug {
            dump::emit(
                "request",
                dump::dump_request(&http_request),
                self.config.dump_errors_are_fatal,
            )?;
        }

        tracing::debug!(
            action = %action,
            endpoint = %self.config.endpoint,
            "sending DirectMail request"
        );

        let response = self.transport.send(http_request).await?;

        tracing::debug!(
            action = %action,
            status = response.status().as_u16(),
            "received DirectMail response"
        );

        if self.config.debug {
            dump::emit(
                "response",
                dump::dump_response(&response, response.is_json()),
                self.config.dump_errors_are_fatal,
            )?;
        }

        response.into_result()
    }
}

impl fmt::Debug for DmClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DmClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DmError;

    #[test]
    fn test_new_client() {
        let client = DmClient::new("noreply@mail.example.com", "AKID", "SECRET").unwrap();

        assert_eq!(client.account_name(), "noreply@mail.example.com");
        assert_eq!(client.config().credentials.access_key_id(), "AKID");
        assert!(!client.is_debug());
    }

    #[test]
    fn test_new_client_rejects_empty_credentials() {
        let result = DmClient::new("noreply@mail.example.com", "AKID", "");
        assert!(matches!(result, Err(DmError::Configuration { .. })));
    }

    #[test]
    fn test_debug_derives_new_client() {
        let client = DmClient::new("noreply@mail.example.com", "AKID", "SECRET").unwrap();
        let debug_client = client.debug(true);

        assert!(debug_client.is_debug());
        assert!(!client.is_debug());
        assert!(!debug_client.debug(false).is_debug());
        assert!(Arc::ptr_eq(&client.transport, &debug_client.transport));
    }

    #[test]
    fn test_debug_output_redacts_secret() {
        let client = DmClient::new("noreply@mail.example.com", "AKID", "SECRET-VALUE").unwrap();
        let debug = format!("{:?}", client);

        assert!(debug.contains("noreply@mail.example.com"));
        assert!(!debug.contains("SECRET-VALUE"));
    }

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DmClient>();
    }
}
