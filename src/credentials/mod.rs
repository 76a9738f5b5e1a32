//! Alibaba Cloud access key credentials.
//!
//! The access key secret is stored as a `SecretString` so it never shows up
//! in `Debug` output or logs, and the whole value is zeroized on drop.

use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// An Alibaba Cloud access key pair.
///
/// # Example
///
/// ```
/// use integrations_aliyun_dm::credentials::AccessKey;
///
/// let key = AccessKey::new("LTAI5tExampleKeyId", "ExampleKeySecret");
/// assert_eq!(key.access_key_id(), "LTAI5tExampleKeyId");
/// assert!(!format!("{:?}", key).contains("ExampleKeySecret"));
/// ```
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct AccessKey {
    access_key_id: String,
    // SecretString zeroizes itself on drop
    #[zeroize(skip)]
    access_key_secret: SecretString,
}

impl AccessKey {
    /// Create a new access key pair.
    pub fn new(access_key_id: impl Into<String>, access_key_secret: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            access_key_secret: SecretString::new(access_key_secret.into()),
        }
    }

    /// Get the access key ID.
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    /// Get the access key secret.
    ///
    /// # Security
    ///
    /// This exposes the secret. Do not log or persist the returned value.
    pub fn access_key_secret(&self) -> &str {
        self.access_key_secret.expose_secret()
    }

    /// Returns true if either half of the pair is empty.
    pub fn is_empty(&self) -> bool {
        self.access_key_id.is_empty() || self.access_key_secret.expose_secret().is_empty()
    }
}

impl fmt::Debug for AccessKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessKey")
            .field("access_key_id", &self.access_key_id)
            .field("access_key_secret", &"[REDACTED]")
            .finish()
    }
}
