//! Alibaba Cloud DirectMail Integration Module
//!
//! Minimal client for sending transactional email through the DirectMail
//! `SingleSendMail` RPC action.
//!
//! # Features
//!
//! - **RPC Signature 1.0**: HMAC-SHA1 request signing with the provider's
//!   percent-encoding rules
//! - **Provider Errors**: the `{Code, Message}` envelope surfaced as a typed error
//! - **One Call Per Send**: no retries, queueing or background work
//! - **Debug Dumps**: wire-format request/response dumps through `tracing`
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use integrations_aliyun_dm::DmClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = DmClient::new(
//!         "noreply@mail.example.com",
//!         "LTAI5tExampleKeyId",
//!         "ExampleKeySecret",
//!     )?;
//!
//!     client
//!         .new_html_mail("test", "<b>hello</b> world")
//!         .send(&["user@example.com"])
//!         .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Error Handling
//!
//! ```rust,no_run
//! use integrations_aliyun_dm::{DmClient, DmError};
//!
//! # async fn example(client: DmClient) {
//! match client.new_mail("Subject", "Body").send(&["user@example.com"]).await {
//!     Ok(()) => println!("sent"),
//!     Err(DmError::Provider { code, message, .. }) => eprintln!("{}: {}", code, message),
//!     Err(DmError::UnexpectedStatus { status }) => eprintln!("HTTP {}", status),
//!     Err(other) => eprintln!("{}", other),
//! }
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod http;
pub mod mail;
pub mod signing;

pub use client::DmClient;
pub use config::{ConfigError, DmConfig, DmConfigBuilder};
pub use credentials::AccessKey;
pub use error::{DmError, DmResult, ProviderErrorResponse};
pub use http::{DmResponse, ReqwestTransport, Transport};
pub use mail::{BodyFormat, Mail};
