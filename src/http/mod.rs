//! HTTP plumbing for the DirectMail RPC API.
//!
//! ```text
//! ┌─────────────────┐
//! │   RpcRequest    │  - Action parameters
//! └────────┬────────┘
//!          │ sign()
//!          ▼
//! ┌─────────────────┐
//! │  SignedRequest  │  - Common + Signature parameters
//! └────────┬────────┘  - Form body
//!          │
//!          ▼
//! ┌─────────────────┐
//! │   Transport     │  - One round trip, buffered response
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │   DmResponse    │  - Provider envelope / status check
//! └─────────────────┘
//! ```

pub mod dump;
mod request;
mod response;
mod transport;

pub use request::{RpcRequest, SignedRequest, FORM_CONTENT_TYPE};
pub use response::DmResponse;
pub use transport::{ReqwestTransport, Transport};
