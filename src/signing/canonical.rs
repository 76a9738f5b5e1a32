//! Canonical query string building for the Alibaba Cloud RPC signature.
//!
//! The provider encodes with form-urlencoding and then fixes up the three
//! places where that differs from RFC 3986: a space is `%20` (not `+`), `*`
//! is `%2A`, and `~` stays literal (not `%7E`).

use std::collections::BTreeMap;
use url::form_urlencoded;

/// Apply the provider's normalization pass to form-urlencoded text.
///
/// `+` (an encoded space) becomes `%20`, `*` becomes `%2A` and `%7E` becomes
/// `~`. A literal `+` in the original input was already encoded as `%2B` and
/// is left alone.
///
/// # Examples
///
/// ```
/// use integrations_aliyun_dm::signing::normalize_form_encoding;
///
/// assert_eq!(normalize_form_encoding("a+b*c%7E"), "a%20b%2Ac~");
/// ```
pub fn normalize_form_encoding(encoded: &str) -> String {
    encoded
        .replace('+', "%20")
        .replace('*', "%2A")
        .replace("%7E", "~")
}

/// Percent-encode a single value the way the provider's signer does.
///
/// # Examples
///
/// ```
/// use integrations_aliyun_dm::signing::percent_encode;
///
/// assert_eq!(percent_encode("/"), "%2F");
/// assert_eq!(percent_encode("hello world"), "hello%20world");
/// assert_eq!(percent_encode("a+b"), "a%2Bb");
/// assert_eq!(percent_encode("*~"), "%2A~");
/// ```
pub fn percent_encode(input: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(input.as_bytes()).collect();
    normalize_form_encoding(&encoded)
}

/// Build the canonical query string from a parameter set.
///
/// Parameters are sorted by key (the `BTreeMap` order), each key and value
/// percent-encoded, and joined as `k=v` pairs with `&`.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use integrations_aliyun_dm::signing::canonical_query_string;
///
/// let mut params = BTreeMap::new();
/// params.insert("Version".to_string(), "2015-11-23".to_string());
/// params.insert("Action".to_string(), "SingleSendMail".to_string());
///
/// assert_eq!(
///     canonical_query_string(&params),
///     "Action=SingleSendMail&Version=2015-11-23"
/// );
/// ```
pub fn canonical_query_string(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{}={}", percent_encode(key), percent_encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Serialize a parameter set as an `application/x-www-form-urlencoded` body.
///
/// This is plain form encoding (spaces as `+`), which is what the server
/// decodes before it recomputes the signature.
pub fn form_body(params: &BTreeMap<String, String>) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.iter())
        .finish()
}
