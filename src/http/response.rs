//! Buffered HTTP responses from the DirectMail API.

use http::header::CONTENT_TYPE;
use http::{HeaderMap, StatusCode, Version};

use crate::error::{interpret_response, DmError, DmResult};

/// A fully read response: status line, headers and body.
#[derive(Debug, Clone)]
pub struct DmResponse {
    status: StatusCode,
    version: Version,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl DmResponse {
    /// Create a new response.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use http::{HeaderMap, StatusCode};
    /// use integrations_aliyun_dm::http::DmResponse;
    ///
    /// let response = DmResponse::new(StatusCode::OK, HeaderMap::new(), b"{}".to_vec());
    /// assert!(response.into_result().is_ok());
    /// ```
    pub fn new(status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            version: Version::HTTP_11,
            headers,
            body,
        }
    }

    /// Set the protocol version reported in debug dumps.
    pub fn with_version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    /// Read a reqwest response to the end.
    pub async fn from_reqwest(response: reqwest::Response) -> DmResult<Self> {
        let status = response.status();
        let version = response.version();
        let headers = response.headers().clone();

        let body = response
            .bytes()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DmError::from(e)
                } else {
                    DmError::Transport {
                        message: format!("Failed to read response body: {}", e),
                        source: Some(Box::new(e)),
                    }
                }
            })?
            .to_vec();

        Ok(Self {
            status,
            version,
            headers,
            body,
        })
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Get the HTTP version.
    pub fn version(&self) -> Version {
        self.version
    }

    /// Get all headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get a header value, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Get the response body.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Returns true if the content type mentions JSON.
    pub fn is_json(&self) -> bool {
        self.header(CONTENT_TYPE.as_str())
            .map_or(false, |ct| ct.contains("json"))
    }

    /// Interpret the response as the outcome of a send.
    ///
    /// See [`interpret_response`] for the rules.
    pub fn into_result(self) -> DmResult<()> {
        interpret_response(self.status.as_u16(), &self.body)
    }
}
