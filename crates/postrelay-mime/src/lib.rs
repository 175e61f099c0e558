//! # postrelay-mime
//!
//! Outgoing MIME message assembly for SMTP submission.
//!
//! Builds the RFC 5322 payload the [`postrelay-smtp`] client transmits during
//! the DATA phase: header block (with an RFC 2822 `Date:`), plain-text body,
//! and `multipart/mixed` attachment parts encoded as Base64.
//!
//! ## Quick Start
//!
//! ```
//! use postrelay_mime::{Attachment, Email};
//!
//! # fn main() -> postrelay_mime::Result<()> {
//! let mut email = Email::new(
//!     "sender@example.com",
//!     vec!["recipient@example.com".to_string()],
//!     "Hello",
//!     "Hello from postrelay",
//! )?;
//! email.attach(Attachment::new(
//!     "report.csv",
//!     "text/csv",
//!     b"a,b\r\n1,2\r\n".to_vec(),
//! ));
//!
//! let payload = email.render()?;
//! # assert!(!payload.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! [`postrelay-smtp`]: https://docs.rs/postrelay-smtp

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod encoding;
mod error;
mod message;

pub use error::{Error, Result};
pub use message::{Attachment, Email};
