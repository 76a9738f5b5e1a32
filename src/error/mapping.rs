//! Interpretation of DirectMail responses.
//!
//! DirectMail reports application-level failures in a JSON envelope:
//!
//! ```json
//! {
//!   "RequestId": "A8D9C0A4-5E7B-4D4C-8D39-2B9C3B9E5A01",
//!   "HostId": "dm.aliyuncs.com",
//!   "Code": "InvalidParameter.AccountName",
//!   "Message": "The specified account name is invalid."
//! }
//! ```
//!
//! A populated `Code` wins over the HTTP status: a 200 response carrying a
//! code is still a failure.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::{DmError, DmResult};

/// The `{Code, Message}` error envelope returned by DirectMail.
///
/// Decoding is per field: any JSON object decodes, and a field that is
/// missing or not a string is left empty. Keys match case-insensitively,
/// with an exact match preferred.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(from = "Map<String, Value>")]
pub struct ProviderErrorResponse {
    /// Provider error code. Empty means "no error".
    pub code: String,

    /// Human-readable error message.
    pub message: String,

    /// Request ID for support tickets.
    pub request_id: Option<String>,

    /// Host that served the request.
    pub host_id: Option<String>,
}

impl ProviderErrorResponse {
    /// Returns true when the envelope carries an error code.
    pub fn is_error(&self) -> bool {
        !self.code.is_empty()
    }
}

impl From<Map<String, Value>> for ProviderErrorResponse {
    fn from(object: Map<String, Value>) -> Self {
        Self {
            code: string_field(&object, "Code").unwrap_or_default(),
            message: string_field(&object, "Message").unwrap_or_default(),
            request_id: string_field(&object, "RequestId"),
            host_id: string_field(&object, "HostId"),
        }
    }
}

fn string_field(object: &Map<String, Value>, name: &str) -> Option<String> {
    object
        .get(name)
        .or_else(|| {
            object
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value)
        })
        .and_then(Value::as_str)
        .map(str::to_string)
}

impl From<ProviderErrorResponse> for DmError {
    fn from(response: ProviderErrorResponse) -> Self {
        DmError::Provider {
            code: response.code,
            message: response.message,
            request_id: response.request_id,
        }
    }
}

/// Parse a provider error envelope from a response body.
///
/// Bodies that are not JSON objects, or that do not carry a non-empty
/// string `Code`, yield `None`. Decoding failures are never reported.
///
/// # Examples
///
/// ```rust
/// use integrations_aliyun_dm::error::parse_error_response;
///
/// let body = br#"{"Code":"InvalidParameter.AccountName","Message":"bad"}"#;
/// let envelope = parse_error_response(body).unwrap();
/// assert_eq!(envelope.code, "InvalidParameter.AccountName");
///
/// assert!(parse_error_response(b"{}").is_none());
/// assert!(parse_error_response(b"<html>502 Bad Gateway</html>").is_none());
/// ```
pub fn parse_error_response(body: &[u8]) -> Option<ProviderErrorResponse> {
    serde_json::from_slice::<ProviderErrorResponse>(body)
        .ok()
        .filter(ProviderErrorResponse::is_error)
}

/// Turn a raw response into the outcome of a send.
///
/// 1. A non-empty provider `Code` fails with [`DmError::Provider`].
/// 2. Otherwise a status other than 200 fails with [`DmError::UnexpectedStatus`].
/// 3. Otherwise the send succeeded.
///
/// # Examples
///
/// ```rust
/// use integrations_aliyun_dm::error::{interpret_response, DmError};
///
/// assert!(interpret_response(200, b"{}").is_ok());
///
/// let err = interpret_response(500, b"{}").unwrap_err();
/// assert!(matches!(err, DmError::UnexpectedStatus { status: 500 }));
/// ```
pub fn interpret_response(status: u16, body: &[u8]) -> DmResult<()> {
    if let Some(envelope) = parse_error_response(body) {
        return Err(envelope.into());
    }

    if status != 200 {
        return Err(DmError::UnexpectedStatus { status });
    }

    Ok(())
}
