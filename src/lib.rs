//! # MailSlurp Client
//! Asynchronous wrapper around the MailSlurp email testing HTTP API: create disposable inboxes, send email from them, wait for received email, and list inbox contents using [`Client`] and [`ClientBuilder`].
//!
//! ## Audience and uses
//! For Rust developers writing integration tests for sign-up, password reset, or notification flows: create an inbox, trigger your application, wait for the email ([`Client::wait_for_latest_email`]), then pull the verification code out of the body ([`extract_code`]).
//!
//! ## Runtime requirements
//! Async-only; run inside a Tokio (v1) runtime. HTTP calls use `reqwest`. The API key is read from the `API_KEY` environment variable by [`Client::from_env`], or passed to [`ClientBuilder::api_key`].
//!
//! ## Waiting
//! [`Client::wait_for_latest_email`] lets the service block server-side up to the requested timeout. [`Client::poll_for_latest_email`] polls the inbox listing locally with an explicit deadline. Both have cancellable variants taking a [`CancellationToken`].
//!
//! ## Out of scope
//! Not a mail server or SMTP client. It only calls the MailSlurp REST API and inherits its availability and retention limits.
//!
//! ## Errors
//! Missing credentials fail with [`Error::MissingApiKey`] before any request. Transport failures are [`Error::Request`], unexpected statuses [`Error::Status`], and an empty wait is [`Error::Timeout`]. Nothing is retried automatically. The crate-wide [`Result`] alias wraps these errors.
//!
//! ## Example
//! ```no_run
//! use mailslurp_client::{Client, CreateInboxOptions, SendEmailOptions, WaitRequest};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mailslurp_client::Error> {
//!     let client = Client::from_env()?;
//!     let sender = client.create_inbox(CreateInboxOptions::default()).await?;
//!     let receiver = client.create_inbox(CreateInboxOptions::default()).await?;
//!
//!     let options = SendEmailOptions::new(
//!         receiver.email_address.clone(),
//!         "Hello inbox2",
//!         "Your code is: 123",
//!     );
//!     client.send_email(sender.id, options).await?;
//!
//!     let request = WaitRequest::new(receiver.id).timeout(Duration::from_millis(30_000));
//!     let email = client.wait_for_latest_email(&request).await?;
//!     println!("code: {}", email.extract_code()?);
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod extract;
mod models;
mod wait;

pub use client::{Client, ClientBuilder};
pub use config::{API_KEY_VAR, BASE_URL_VAR, Config};
pub use error::Error;
pub use extract::{CodePattern, extract_code};
pub use models::{
    CreateInboxOptions, Email, EmailPreview, Inbox, Page, PageOptions, SendEmailOptions,
    SortDirection,
};
pub use tokio_util::sync::CancellationToken;
pub use wait::{DEFAULT_WAIT_TIMEOUT, PollOptions, WaitRequest};

/// Result type alias for MailSlurp operations.
///
/// This is equivalent to `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
