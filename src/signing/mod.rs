//! Alibaba Cloud RPC request signing (signature version 1.0, HMAC-SHA1).
//!
//! Signing takes the full parameter set of a request and produces the value
//! of its `Signature` parameter:
//!
//! 1. Build the canonical query string (see [`canonical_query_string`]).
//! 2. String-to-sign: `METHOD & percent_encode("/") & percent_encode(canonical)`.
//! 3. HMAC-SHA1 over the string-to-sign, keyed with `secret + "&"`.
//! 4. Base64-encode the digest.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use integrations_aliyun_dm::signing::sign;
//!
//! let mut params = BTreeMap::new();
//! params.insert("AccessKeyId".to_string(), "testid".to_string());
//! params.insert("Action".to_string(), "DescribeRegions".to_string());
//! params.insert("Format".to_string(), "XML".to_string());
//! params.insert("SignatureMethod".to_string(), "HMAC-SHA1".to_string());
//! params.insert(
//!     "SignatureNonce".to_string(),
//!     "3ee8c1b8-83d3-44af-a94f-4e0ad82fd6cf".to_string(),
//! );
//! params.insert("SignatureVersion".to_string(), "1.0".to_string());
//! params.insert("Timestamp".to_string(), "2016-02-23T12:46:24Z".to_string());
//! params.insert("Version".to_string(), "2014-05-26".to_string());
//!
//! let signature = sign("GET", &params, "testsecret").unwrap();
//! assert_eq!(signature, "OLeaidS1JvxuMvnyHOwuJ+uX5qY=");
//! ```

mod canonical;
mod error;

pub use canonical::{canonical_query_string, form_body, normalize_form_encoding, percent_encode};
pub use error::SigningError;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, SecondsFormat, Utc};
use hmac::{Hmac, Mac};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha1::Sha1;
use std::collections::BTreeMap;

type HmacSha1 = Hmac<Sha1>;

/// Value of the `SignatureMethod` parameter.
pub const SIGNATURE_METHOD: &str = "HMAC-SHA1";

/// Value of the `SignatureVersion` parameter.
pub const SIGNATURE_VERSION: &str = "1.0";

/// Name of the parameter that carries the signature.
pub const SIGNATURE_PARAM: &str = "Signature";

/// Length of a generated `SignatureNonce`.
pub const NONCE_LENGTH: usize = 64;

/// Parameters the server refuses to verify a signature without.
const REQUIRED_PARAMS: [&str; 4] = ["AccessKeyId", "SignatureNonce", "Timestamp", "SignatureMethod"];

/// Generate a fresh `SignatureNonce`.
///
/// 64 characters drawn from `[0-9A-Za-z]` using the thread-local CSPRNG.
pub fn generate_nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(NONCE_LENGTH)
        .map(char::from)
        .collect()
}

/// Format a timestamp as RFC 3339 in UTC with second precision (`...Z`).
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use integrations_aliyun_dm::signing::format_timestamp;
///
/// let ts = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
/// assert_eq!(format_timestamp(&ts), "2024-01-02T03:04:05Z");
/// ```
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Build the string-to-sign for a request.
///
/// Any `Signature` parameter already present is excluded.
pub fn string_to_sign(method: &str, params: &BTreeMap<String, String>) -> String {
    let canonical = if params.contains_key(SIGNATURE_PARAM) {
        let unsigned: BTreeMap<String, String> = params
            .iter()
            .filter(|(key, _)| key.as_str() != SIGNATURE_PARAM)
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        canonical_query_string(&unsigned)
    } else {
        canonical_query_string(params)
    };

    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        percent_encode("/"),
        percent_encode(&canonical)
    )
}

/// HMAC-SHA1 the string-to-sign with `secret + "&"` and base64 the digest.
pub fn compute_signature(string_to_sign: &str, access_key_secret: &str) -> String {
    let key = format!("{}&", access_key_secret);
    let mut mac = HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC can take key of any size");
    mac.update(string_to_sign.as_bytes());

    STANDARD.encode(mac.finalize().into_bytes())
}

/// Compute the `Signature` value for a parameter set.
///
/// # Errors
///
/// Returns [`SigningError::MissingParameter`] if a parameter the signature
/// must cover is absent.
pub fn sign(
    method: &str,
    params: &BTreeMap<String, String>,
    access_key_secret: &str,
) -> Result<String, SigningError> {
    if let Some(missing) = REQUIRED_PARAMS.iter().find(|name| !params.contains_key(**name)) {
        return Err(SigningError::MissingParameter {
            name: missing.to_string(),
        });
    }

    Ok(compute_signature(&string_to_sign(method, params), access_key_secret))
}
