//! RPC request building for the DirectMail API.
//!
//! DirectMail is an Alibaba Cloud RPC-style API: every call is a flat set of
//! `Key=Value` parameters, signed as a whole and posted as a form body.

use chrono::{DateTime, Utc};
use http::header::{HeaderValue, CONTENT_TYPE, USER_AGENT};
use std::collections::BTreeMap;
use url::Url;

use crate::credentials::AccessKey;
use crate::error::{DmError, DmResult};
use crate::signing::{self, SigningError, SIGNATURE_METHOD, SIGNATURE_PARAM, SIGNATURE_VERSION};

/// Content type of every RPC request body.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP method used for every RPC request.
const RPC_METHOD: &str = "POST";

/// An unsigned RPC request: the action, API version and action parameters.
///
/// # Examples
///
/// ```rust
/// use integrations_aliyun_dm::http::RpcRequest;
///
/// let request = RpcRequest::new("SingleSendMail", "2015-11-23")
///     .param("AccountName", "noreply@mail.example.com")
///     .param("AddressType", "0");
///
/// assert_eq!(request.get("Action"), Some("SingleSendMail"));
/// assert_eq!(request.get("Format"), Some("json"));
/// ```
#[derive(Debug, Clone)]
pub struct RpcRequest {
    params: BTreeMap<String, String>,
}

impl RpcRequest {
    /// Create a request for `action` against API `version`, asking for JSON.
    pub fn new(action: impl Into<String>, version: impl Into<String>) -> Self {
        let mut params = BTreeMap::new();
        params.insert("Format".to_string(), "json".to_string());
        params.insert("Version".to_string(), version.into());
        params.insert("Action".to_string(), action.into());
        Self { params }
    }

    /// Set an action parameter, replacing any previous value.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Get a parameter value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Add the common signature parameters and sign the request.
    ///
    /// `timestamp` and `nonce` are explicit so the resulting signature can be
    /// reproduced; callers normally pass `Utc::now()` and
    /// [`signing::generate_nonce`].
    ///
    /// # Arguments
    ///
    /// * `credentials` - Access key whose ID is sent and whose secret keys the HMAC
    /// * `timestamp` - Request time, sent as `Timestamp`
    /// * `nonce` - Value sent as `SignatureNonce`
    ///
    /// # Returns
    ///
    /// The signed request, or an error if a signed parameter is missing.
    pub fn sign(
        self,
        credentials: &AccessKey,
        timestamp: &DateTime<Utc>,
        nonce: impl Into<String>,
    ) -> Result<SignedRequest, SigningError> {
        let mut params = self.params;
        params.insert(
            "AccessKeyId".to_string(),
            credentials.access_key_id().to_string(),
        );
        params.insert("SignatureMethod".to_string(), SIGNATURE_METHOD.to_string());
        params.insert("SignatureVersion".to_string(), SIGNATURE_VERSION.to_string());
        params.insert("Timestamp".to_string(), signing::format_timestamp(timestamp));
        params.insert("SignatureNonce".to_string(), nonce.into());

        let signature = signing::sign(RPC_METHOD, &params, credentials.access_key_secret())?;
        params.insert(SIGNATURE_PARAM.to_string(), signature);

        Ok(SignedRequest { params })
    }
}

/// A fully signed RPC request, ready to be posted.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    params: BTreeMap<String, String>,
}

impl SignedRequest {
    /// All parameters, including `Signature`.
    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    /// Get a parameter value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// The computed signature.
    pub fn signature(&self) -> &str {
        self.get(SIGNATURE_PARAM).unwrap_or_default()
    }

    /// The form-urlencoded POST body.
    pub fn body(&self) -> String {
        signing::form_body(&self.params)
    }

    /// Build the HTTP request posting this body to `endpoint`.
    pub fn into_http_request(self, endpoint: &Url, user_agent: &str) -> DmResult<reqwest::Request> {
        let body = self.body();

        let mut request = reqwest::Request::new(reqwest::Method::POST, endpoint.clone());
        let headers = request.headers_mut();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent).map_err(|e| DmError::Configuration {
                message: format!("Invalid user-agent header: {}", e),
                source: Some(Box::new(e)),
            })?,
        );
        *request.body_mut() = Some(body.into());

        Ok(request)
    }
}
