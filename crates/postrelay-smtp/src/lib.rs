//! # postrelay-smtp
//!
//! An SMTP mail-submission client implementing RFC 5321.
//!
//! ## Features
//!
//! - **Reply parsing**: single- and multi-line replies with continuation
//!   handling and code validation
//! - **Extension negotiation**: EHLO capability registry (AUTH, SIZE,
//!   STARTTLS, unknown extensions retained)
//! - **Authentication**: LOGIN and PLAIN, with per-step failure attribution
//! - **TLS support**: implicit TLS (port 465) and STARTTLS upgrade
//! - **Mail transaction**: MAIL FROM / RCPT TO / DATA with dot-stuffed
//!   payload termination
//!
//! ## Quick Start
//!
//! ```ignore
//! use postrelay_mime::Email;
//! use postrelay_smtp::{Client, Config, Credentials, Security};
//!
//! #[tokio::main]
//! async fn main() -> postrelay_smtp::Result<()> {
//!     let config = Config::builder("smtp.example.com")
//!         .security(Security::StartTls)
//!         .build();
//!     let credentials = Credentials::new("user@example.com", "password");
//!
//!     let mut client = Client::establish(config, Some(&credentials)).await?;
//!
//!     let email = Email::new(
//!         "user@example.com",
//!         vec!["recipient@example.com".to_string()],
//!         "Hello",
//!         "Hello from postrelay",
//!     )?;
//!     client.send(&email, Some(&credentials)).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Session phases
//!
//! ```text
//! Disconnected ── greeting ──→ Greeted ── EHLO ──→ Identified
//!                                                      │
//!                                     AUTH ──→ Authenticated
//!                                                      │
//!                              MAIL/RCPT/DATA ──→ InTransaction ──→ Closed
//! ```
//!
//! A failure at any step aborts the session; construct a fresh client (and
//! stream) to retry.
//!
//! ## Modules
//!
//! - [`auth`]: mechanism selection and SASL payloads
//! - [`command`]: SMTP command builders
//! - [`connection`]: configuration, streams, and the client
//! - [`parser`]: reply parser
//! - [`types`]: core SMTP types (replies, extensions, addresses,
//!   credentials)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod auth;
pub mod command;
pub mod connection;
mod error;
pub mod parser;
pub mod types;

pub use connection::{
    Client, Config, ConfigBuilder, MailStream, Phase, Security, connect_plain, connect_tls,
};
pub use error::{Error, Result};
pub use types::{
    Address, AuthMechanism, Credentials, Extension, Extensions, Greeting, Reply, ReplyCode,
};
