//! Configuration module for the DirectMail client.
//!
//! This module provides the configuration type and builder used to create
//! a [`DmClient`](crate::DmClient), including:
//!
//! - Account name and access key credentials
//! - Endpoint override (for mock servers and private gateways)
//! - Timeout settings and user agent
//! - Debug dumping and the dump failure policy

use std::time::Duration;
use url::Url;

pub mod error;

pub use error::ConfigError;

use crate::credentials::AccessKey;

/// Default DirectMail endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://dm.aliyuncs.com/";

/// Default timeout for the whole request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default timeout for establishing connections.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for the DirectMail client.
#[derive(Debug, Clone)]
pub struct DmConfig {
    /// Sender account name registered in the DirectMail console.
    pub account_name: String,

    /// Access key used to sign requests.
    pub credentials: AccessKey,

    /// Endpoint the signed request is posted to.
    pub endpoint: Url,

    /// Timeout for the entire request.
    pub timeout: Duration,

    /// Timeout for establishing connections.
    pub connect_timeout: Duration,

    /// User agent sent with every request.
    pub user_agent: String,

    /// Dump outgoing requests and incoming responses to the log.
    pub debug: bool,

    /// Whether a failed debug dump fails the send.
    ///
    /// When false, the failure is logged as a warning and the send proceeds.
    pub dump_errors_are_fatal: bool,
}

impl DmConfig {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```
    /// use integrations_aliyun_dm::config::DmConfig;
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = DmConfig::builder()
    ///     .account_name("noreply@mail.example.com")
    ///     .credentials("access_key_id", "access_key_secret")
    ///     .build()?;
    ///
    /// assert_eq!(config.endpoint.as_str(), "https://dm.aliyuncs.com/");
    /// # Ok(())
    /// # }
    /// ```
    pub fn builder() -> DmConfigBuilder {
        DmConfigBuilder::default()
    }

    /// Host name of the configured endpoint.
    pub fn host(&self) -> Option<&str> {
        self.endpoint.host_str()
    }
}

/// Builder for [`DmConfig`].
#[derive(Default)]
pub struct DmConfigBuilder {
    account_name: Option<String>,
    credentials: Option<AccessKey>,
    endpoint: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    user_agent: Option<String>,
    debug: bool,
    dump_errors_are_fatal: Option<bool>,
}

impl DmConfigBuilder {
    /// Set the sender account name.
    pub fn account_name(mut self, account_name: impl Into<String>) -> Self {
        self.account_name = Some(account_name.into());
        self
    }

    /// Set the access key pair.
    ///
    /// # Example
    ///
    /// ```
    /// use integrations_aliyun_dm::config::DmConfig;
    ///
    /// let builder = DmConfig::builder()
    ///     .credentials("LTAI5tExampleKeyId", "ExampleKeySecret");
    /// ```
    pub fn credentials(
        mut self,
        access_key_id: impl Into<String>,
        access_key_secret: impl Into<String>,
    ) -> Self {
        self.credentials = Some(AccessKey::new(access_key_id, access_key_secret));
        self
    }

    /// Set a custom endpoint URL.
    ///
    /// # Example
    ///
    /// ```
    /// use integrations_aliyun_dm::config::DmConfig;
    ///
    /// let builder = DmConfig::builder().endpoint("http://127.0.0.1:8080/");
    /// ```
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, duration: Duration) -> Self {
        self.connect_timeout = Some(duration);
        self
    }

    /// Set a custom user agent string.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Enable or disable request/response dumping.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Choose whether a failed debug dump fails the send (default: true).
    pub fn dump_errors_are_fatal(mut self, fatal: bool) -> Self {
        self.dump_errors_are_fatal = Some(fatal);
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// - `ConfigError::MissingField` if the account name or either half of the
    ///   access key is missing or empty.
    /// - `ConfigError::Invalid` if the endpoint is not an absolute http(s) URL
    ///   or a timeout is zero.
    pub fn build(self) -> Result<DmConfig, ConfigError> {
        let account_name = self
            .account_name
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ConfigError::MissingField {
                field: "account_name".to_string(),
            })?;

        let credentials = self.credentials.ok_or_else(|| ConfigError::MissingField {
            field: "credentials".to_string(),
        })?;

        if credentials.is_empty() {
            let field = if credentials.access_key_id().is_empty() {
                "access_key_id"
            } else {
                "access_key_secret"
            };
            return Err(ConfigError::MissingField {
                field: field.to_string(),
            });
        }

        let endpoint = parse_endpoint(self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT))?;

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        let connect_timeout = self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT);
        if timeout.is_zero() || connect_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                message: "timeouts must be greater than zero".to_string(),
            });
        }

        Ok(DmConfig {
            account_name,
            credentials,
            endpoint,
            timeout,
            connect_timeout,
            user_agent: self.user_agent.unwrap_or_else(default_user_agent),
            debug: self.debug,
            dump_errors_are_fatal: self.dump_errors_are_fatal.unwrap_or(true),
        })
    }
}

fn parse_endpoint(endpoint: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(endpoint).map_err(|e| ConfigError::Invalid {
        message: format!("invalid endpoint URL {:?}: {}", endpoint, e),
    })?;

    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(ConfigError::Invalid {
            message: format!("endpoint must be an http(s) URL with a host: {}", endpoint),
        });
    }

    Ok(url)
}

fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
