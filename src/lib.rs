//! Typed Rust client for the Mandrill transactional email HTTP API.
//!
//! The crate is split in three layers: a domain layer of strong types, a
//! transport layer for the JSON wire format, and a small client layer
//! orchestrating requests.
//!
//! Calls that reach Mandrill return `Ok(ApiResult<_>)`: either the decoded
//! payload or the [`ApiError`] Mandrill reported. Transport and decode failures
//! are reported as [`MandrillError`].
//!
//! ```rust,no_run
//! use mandrill::{ApiKey, MandrillClient, Message, RecipientType};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = MandrillClient::new(ApiKey::new("...")?);
//!
//!     let mut message = Message {
//!         subject: Some("Welcome".to_owned()),
//!         from_email: Some("hello@example.com".to_owned()),
//!         text: Some("Hi Bob!".to_owned()),
//!         ..Default::default()
//!     };
//!     message.add_recipient("bob@example.com", "Bob Johnson", RecipientType::To);
//!
//!     match client.messages_send(&message).await? {
//!         Ok(results) => println!("sent: {results:?}"),
//!         Err(api_error) => eprintln!("rejected by Mandrill: {api_error}"),
//!     }
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{
    BoxError, BoxFuture, HttpResponse, HttpTransport, MandrillClient, MandrillClientBuilder,
    MandrillError, ReqwestTransport,
};
pub use domain::{
    ApiError, ApiKey, ApiResult, Attachment, KnownErrorName, Message, RcptMergeVars,
    RecipientMetadata, RecipientResult, RecipientType, SendAt, SendOptions, SendStatus,
    TemplateName, To, ValidationError, Variable, convert_map_to_variables,
    convert_map_to_variables_for_recipient,
};
