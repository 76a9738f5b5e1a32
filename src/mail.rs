//! Mail values and the `SingleSendMail` action.

use chrono::{DateTime, Utc};
use std::future::Future;

use crate::client::DmClient;
use crate::error::{DmError, DmResult};
use crate::http::{RpcRequest, SignedRequest};
use crate::signing;

/// DirectMail API version.
pub const API_VERSION: &str = "2015-11-23";

/// Action that sends one mail to one or more recipients.
pub const SINGLE_SEND_MAIL: &str = "SingleSendMail";

/// Whether the mail body is plain text or HTML.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFormat {
    /// Plain text, sent as `TextBody`.
    Text,
    /// HTML, sent as `HtmlBody`.
    Html,
}

impl BodyFormat {
    /// Name of the request parameter carrying a body in this format.
    pub fn param_name(&self) -> &'static str {
        match self {
            BodyFormat::Text => "TextBody",
            BodyFormat::Html => "HtmlBody",
        }
    }
}

/// A mail ready to be sent.
///
/// Created with [`DmClient::new_mail`] or [`DmClient::new_html_mail`]. A mail
/// holds no network resources and can be sent any number of times; every
/// send is signed with a fresh timestamp and nonce.
#[derive(Debug, Clone)]
pub struct Mail<'a> {
    client: &'a DmClient,
    subject: String,
    content: String,
    format: BodyFormat,
}

impl<'a> Mail<'a> {
    pub(crate) fn new(
        client: &'a DmClient,
        subject: impl Into<String>,
        content: impl Into<String>,
        format: BodyFormat,
    ) -> Self {
        Self {
            client,
            subject: subject.into(),
            content: content.into(),
            format,
        }
    }

    /// The mail subject.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// The mail body.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// The body format.
    pub fn format(&self) -> BodyFormat {
        self.format
    }

    /// Returns true for HTML mails.
    pub fn is_html(&self) -> bool {
        self.format == BodyFormat::Html
    }

    /// Build the unsigned `SingleSendMail` request for `addresses`.
    ///
    /// # Errors
    ///
    /// Returns [`DmError::InvalidInput`] if `addresses` is empty.
    pub fn to_request<S: AsRef<str>>(&self, addresses: &[S]) -> DmResult<RpcRequest> {
        if addresses.is_empty() {
            return Err(DmError::InvalidInput {
                message: "need at least one email address".to_string(),
            });
        }

        let to_address = addresses
            .iter()
            .map(|address| address.as_ref())
            .collect::<Vec<_>>()
            .join(",");

        Ok(RpcRequest::new(SINGLE_SEND_MAIL, API_VERSION)
            .param("AccountName", self.client.account_name())
            .param("ReplyToAddress", "false")
            .param("AddressType", "0")
            .param("Subject", self.subject.as_str())
            .param(self.format.param_name(), self.content.as_str())
            .param("ToAddress", to_address))
    }

    /// Build and sign the request with an explicit timestamp and nonce.
    ///
    /// # Example
    ///
    /// ```rust
    /// use chrono::{TimeZone, Utc};
    /// use integrations_aliyun_dm::DmClient;
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = DmClient::new("noreply@mail.example.com", "testid", "testsecret")?;
    /// let mail = client.new_mail("Hello *world* ~ 你好", "plain text + more");
    ///
    /// let signed = mail.sign_for(
    ///     &["a@example.com", "b@example.com"],
    ///     &Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
    ///     "0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ01",
    /// )?;
    /// assert_eq!(signed.signature(), "T983URWJ7qxlaihhWbHtMmjXbR4=");
    /// # Ok(())
    /// # }
    /// ```
    pub fn sign_for<S: AsRef<str>>(
        &self,
        addresses: &[S],
        timestamp: &DateTime<Utc>,
        nonce: impl Into<String>,
    ) -> DmResult<SignedRequest> {
        let request = self.to_request(addresses)?;
        Ok(request.sign(&self.client.config().credentials, timestamp, nonce)?)
    }

    /// Send the mail to `addresses`.
    ///
    /// Performs exactly one HTTP round trip. Nothing is sent if `addresses`
    /// is empty. Dropping the returned future cancels the call.
    ///
    /// # Arguments
    ///
    /// * `addresses` - Destination addresses, joined with commas into `ToAddress`
    ///
    /// # Returns
    ///
    /// `Ok(())` once DirectMail accepted the mail.
    ///
    /// # Errors
    ///
    /// - [`DmError::InvalidInput`] when `addresses` is empty
    /// - [`DmError::Transport`] / [`DmError::Timeout`] on network failure
    /// - [`DmError::Provider`] when the response carries an error code
    /// - [`DmError::UnexpectedStatus`] when the status is not 200
    /// - [`DmError::Dump`] when a debug dump fails and dump errors are fatal
    pub async fn send<S: AsRef<str>>(&self, addresses: &[S]) -> DmResult<()> {
        let request = self.sign_now(addresses)?;
        self.client.execute(request).await
    }

    /// Send the mail, giving up with [`DmError::Cancelled`] as soon as
    /// `cancel` completes.
    ///
    /// A `cancel` future that is already complete wins, so no request is
    /// issued.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use std::time::Duration;
    /// use integrations_aliyun_dm::DmClient;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = DmClient::new("noreply@mail.example.com", "AKID", "SECRET")?;
    /// client
    ///     .new_mail("Subject", "Body")
    ///     .send_until(&["user@example.com"], tokio::time::sleep(Duration::from_secs(5)))
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn send_until<S, F>(&self, addresses: &[S], cancel: F) -> DmResult<()>
    where
        S: AsRef<str>,
        F: Future<Output = ()>,
    {
        let request = self.sign_now(addresses)?;

        tokio::select! {
            biased;
            _ = cancel => {
                tracing::debug!("DirectMail send cancelled");
                Err(DmError::Cancelled)
            }
            result = self.client.execute(request) => result,
        }
    }

    fn sign_now<S: AsRef<str>>(&self, addresses: &[S]) -> DmResult<SignedRequest> {
        let request = self.sign_for(addresses, &Utc::now(), signing::generate_nonce())?;
        tracing::debug!(
            recipients = addresses.len(),
            html = self.is_html(),
            "signed SingleSendMail request"
        );
        Ok(request)
    }
}
