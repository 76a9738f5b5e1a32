//! End-to-end send tests against a WireMock server.

use std::collections::BTreeMap;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use integrations_aliyun_dm::{DmClient, DmConfig, DmError};
use serde_json::json;
use sha1::Sha1;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ACCOUNT: &str = "noreply@mail.example.com";
const KEY_ID: &str = "testid";
const KEY_SECRET: &str = "testsecret";

async fn setup() -> (MockServer, DmClient) {
    let mock_server = MockServer::start().await;

    let config = DmConfig::builder()
        .account_name(ACCOUNT)
        .credentials(KEY_ID, KEY_SECRET)
        .endpoint(format!("{}/", mock_server.uri()))
        .timeout(Duration::from_secs(5))
        .build()
        .expect("valid config");

    let client = DmClient::with_config(config).expect("client");
    (mock_server, client)
}

fn json_response(status: u16, body: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(status)
        .insert_header("content-type", "application/json;charset=utf-8")
        .set_body_json(body)
}

fn form_params(body: &[u8]) -> BTreeMap<String, String> {
    url::form_urlencoded::parse(body).into_owned().collect()
}

/// RFC 3986 encoding with `~` unreserved, written out byte by byte.
fn rfc3986(input: &str) -> String {
    let mut out = String::new();
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

/// Recompute the signature of a received request from scratch.
fn verify_signature(params: &BTreeMap<String, String>, secret: &str) -> String {
    let canonical = params
        .iter()
        .filter(|(k, _)| k.as_str() != "Signature")
        .map(|(k, v)| format!("{}={}", rfc3986(k), rfc3986(v)))
        .collect::<Vec<_>>()
        .join("&");
    let string_to_sign = format!("POST&%2F&{}", rfc3986(&canonical));

    let mut mac = Hmac::<Sha1>::new_from_slice(format!("{}&", secret).as_bytes()).unwrap();
    mac.update(string_to_sign.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}

#[tokio::test]
async fn test_send_posts_one_signed_request() {
    let (mock_server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .respond_with(json_response(200, json!({"EnvId": "600000", "RequestId": "req-1"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    client
        .new_html_mail("Hello *world* ~", "<b>hello</b> world")
        .send(&["a@example.com", "b@example.com"])
        .await
        .expect("send succeeds");

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    let params = form_params(&requests[0].body);
    assert_eq!(params["Format"], "json");
    assert_eq!(params["Version"], "2015-11-23");
    assert_eq!(params["AccessKeyId"], KEY_ID);
    assert_eq!(params["SignatureMethod"], "HMAC-SHA1");
    assert_eq!(params["SignatureVersion"], "1.0");
    assert_eq!(params["Action"], "SingleSendMail");
    assert_eq!(params["AccountName"], ACCOUNT);
    assert_eq!(params["ReplyToAddress"], "false");
    assert_eq!(params["AddressType"], "0");
    assert_eq!(params["Subject"], "Hello *world* ~");
    assert_eq!(params["HtmlBody"], "<b>hello</b> world");
    assert!(!params.contains_key("TextBody"));
    assert_eq!(params["ToAddress"], "a@example.com,b@example.com");

    let timestamp = &params["Timestamp"];
    assert!(timestamp.ends_with('Z'));
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());

    assert_eq!(params["Signature"], verify_signature(&params, KEY_SECRET));
}

#[tokio::test]
async fn test_nonce_regenerated_per_send() {
    let (mock_server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(json_response(200, json!({})))
        .expect(2)
        .mount(&mock_server)
        .await;

    let mail = client.new_mail("Subject", "Body");
    mail.send(&["user@example.com"]).await.unwrap();
    mail.send(&["user@example.com"]).await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    let nonces: Vec<String> = requests
        .iter()
        .map(|r| form_params(&r.body)["SignatureNonce"].clone())
        .collect();

    assert_eq!(nonces.len(), 2);
    assert_ne!(nonces[0], nonces[1]);
    for nonce in &nonces {
        assert_eq!(nonce.len(), 64);
        assert!(nonce.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}

#[tokio::test]
async fn test_provider_error_on_200() {
    let (mock_server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(json_response(
            200,
            json!({"Code": "InvalidParameter.AccountName", "Message": "bad"}),
        ))
        .mount(&mock_server)
        .await;

    let err = client
        .new_mail("Subject", "Body")
        .send(&["user@example.com"])
        .await
        .unwrap_err();

    assert!(matches!(err, DmError::Provider { .. }));
    assert_eq!(err.to_string(), "InvalidParameter.AccountName Error: bad");
}

#[tokio::test]
async fn test_provider_error_wins_over_status() {
    let (mock_server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(json_response(
            400,
            json!({
                "RequestId": "B5D6A4C2",
                "HostId": "dm.aliyuncs.com",
                "Code": "InvalidToAddress",
                "Message": "The specified toAddress is invalid."
            }),
        ))
        .mount(&mock_server)
        .await;

    let err = client
        .new_mail("Subject", "Body")
        .send(&["not-an-address"])
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), Some("InvalidToAddress"));
    assert_eq!(err.request_id(), Some("B5D6A4C2"));
}

#[tokio::test]
async fn test_unexpected_status() {
    let (mock_server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(json_response(500, json!({})))
        .mount(&mock_server)
        .await;

    let err = client
        .new_mail("Subject", "Body")
        .send(&["user@example.com"])
        .await
        .unwrap_err();

    assert!(matches!(err, DmError::UnexpectedStatus { status: 500 }));
}

#[tokio::test]
async fn test_non_json_error_page() {
    let (mock_server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(502)
                .insert_header("content-type", "text/html")
                .set_body_string("<html>Bad Gateway</html>"),
        )
        .mount(&mock_server)
        .await;

    let err = client
        .debug(true)
        .new_mail("Subject", "Body")
        .send(&["user@example.com"])
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(502));
}

#[tokio::test]
async fn test_empty_addresses_issue_no_request() {
    let (mock_server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(json_response(200, json!({})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let none: [&str; 0] = [];
    let err = client.new_mail("Subject", "Body").send(&none).await.unwrap_err();

    assert!(matches!(err, DmError::InvalidInput { .. }));
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_debug_send_succeeds() {
    let (mock_server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(json_response(200, json!({"RequestId": "req-2"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    client
        .debug(true)
        .new_html_mail("test", "<b>hello</b> world")
        .send(&["user@example.com"])
        .await
        .expect("debug dumps do not change the outcome");
}

#[tokio::test]
async fn test_send_until_cancelled() {
    let (mock_server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(json_response(200, json!({})).set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let err = client
        .new_mail("Subject", "Body")
        .send_until(
            &["user@example.com"],
            tokio::time::sleep(Duration::from_millis(50)),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, DmError::Cancelled));
}

#[tokio::test]
async fn test_send_until_completes_before_cancel() {
    let (mock_server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(json_response(200, json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    client
        .new_mail("Subject", "Body")
        .send_until(
            &["user@example.com"],
            tokio::time::sleep(Duration::from_secs(10)),
        )
        .await
        .expect("send finishes first");
}

#[tokio::test]
async fn test_request_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(json_response(200, json!({})).set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let config = DmConfig::builder()
        .account_name(ACCOUNT)
        .credentials(KEY_ID, KEY_SECRET)
        .endpoint(format!("{}/", mock_server.uri()))
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();
    let client = DmClient::with_config(config).unwrap();

    let err = client
        .new_mail("Subject", "Body")
        .send(&["user@example.com"])
        .await
        .unwrap_err();

    assert!(matches!(err, DmError::Timeout { .. }));
}
