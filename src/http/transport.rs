//! Transport layer abstraction for HTTP communication.
//!
//! The default implementation uses reqwest. Tests and callers with special
//! networking needs can provide their own implementation.

use async_trait::async_trait;
use reqwest::{Client, Request};
use std::time::Duration;

use super::response::DmResponse;
use crate::config::DmConfig;
use crate::error::{DmError, DmResult};

/// Trait for HTTP transport implementations.
///
/// A transport performs exactly one round trip per call and returns the
/// fully read response. It must not retry.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send an HTTP request and return the buffered response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent, times out, or the
    /// response body cannot be read.
    async fn send(&self, request: Request) -> DmResult<DmResponse>;
}

/// Reqwest-based HTTP transport implementation.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a new reqwest transport.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::time::Duration;
    /// use integrations_aliyun_dm::http::ReqwestTransport;
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let transport = ReqwestTransport::new(
    ///     Duration::from_secs(30),
    ///     Duration::from_secs(10),
    /// )?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(timeout: Duration, connect_timeout: Duration) -> DmResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| DmError::Transport {
                message: format!("Failed to create HTTP client: {}", e),
                source: Some(Box::new(e)),
            })?;

        Ok(Self { client })
    }

    /// Create a transport using the timeouts from a configuration.
    pub fn from_config(config: &DmConfig) -> DmResult<Self> {
        Self::new(config.timeout, config.connect_timeout)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: Request) -> DmResult<DmResponse> {
        let response = self.client.execute(request).await?;
        DmResponse::from_reqwest(response).await
    }
}
