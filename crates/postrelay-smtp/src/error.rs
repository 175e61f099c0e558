//! Error types for SMTP submission.

use std::io;

use crate::types::Reply;

/// Result type alias for SMTP operations.
pub type Result<T> = std::result::Result<T, Error>;

/// SMTP error types.
///
/// Server-reported failures preserve the numeric reply code and the reply
/// text verbatim so callers can inspect or log them. Any failure aborts the
/// session; there is no retry or reconnection inside the client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error from the underlying stream.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The server did not reply within the configured read timeout.
    #[error("Read timed out")]
    Timeout,

    /// A reply line did not match `<3-digit code><'-'|' '><text>`, or the
    /// reply ended without a terminal line.
    #[error("Malformed reply: {0}")]
    MalformedReply(String),

    /// Continuation lines of a multi-line reply carried differing codes.
    #[error("Reply code mismatch: expected {expected}, found {found}")]
    ReplyCodeMismatch {
        /// Code of the first reply line.
        expected: u16,
        /// Code of the offending continuation line.
        found: u16,
    },

    /// The server banner was not a 220 greeting with a domain and text.
    #[error("Invalid greeting: {0}")]
    InvalidGreeting(String),

    /// The server replied with a code other than the expected one.
    #[error("Unexpected reply: expected {expected}, got {} {}", .reply.code, .reply.text())]
    UnexpectedReply {
        /// Code the transaction step required.
        expected: u16,
        /// Full reply the server sent instead.
        reply: Reply,
    },

    /// The server advertised no authentication mechanism this client speaks.
    #[error("No supported authentication mechanism")]
    NoSupportedAuthMechanism,

    /// The server rejected the username during the LOGIN exchange.
    #[error("Invalid username ({code}): {reply}")]
    InvalidUsername {
        /// Reply code.
        code: u16,
        /// Reply text.
        reply: String,
    },

    /// The server rejected the password during the LOGIN exchange.
    #[error("Invalid password ({code}): {reply}")]
    InvalidPassword {
        /// Reply code.
        code: u16,
        /// Reply text.
        reply: String,
    },

    /// The server rejected the combined PLAIN credentials.
    #[error("Authentication failed ({code}): {reply}")]
    AuthenticationFailed {
        /// Reply code.
        code: u16,
        /// Reply text.
        reply: String,
    },

    /// The server rejected a recipient; the whole send is aborted.
    #[error("Recipient {address} rejected ({code}): {reply}")]
    RecipientRejected {
        /// The rejected recipient address.
        address: String,
        /// Reply code.
        code: u16,
        /// Reply text.
        reply: String,
    },

    /// Invalid envelope address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Hostname not usable for TLS server-name verification.
    #[error("Invalid hostname: {0}")]
    InvalidHostname(String),

    /// Operation not valid in the current session phase.
    #[error("Invalid state for operation: {0}")]
    InvalidState(String),

    /// Feature not advertised by the server.
    #[error("Server does not support {0}")]
    NotSupported(String),

    /// Message assembly error.
    #[error("Message error: {0}")]
    Message(#[from] postrelay_mime::Error),
}

impl Error {
    /// Returns true if this error carries a permanent (5xx) server code.
    #[must_use]
    pub const fn is_permanent(&self) -> bool {
        matches!(
            self,
            Self::InvalidUsername { code, .. }
                | Self::InvalidPassword { code, .. }
                | Self::AuthenticationFailed { code, .. }
                | Self::RecipientRejected { code, .. }
                if *code >= 500 && *code < 600
        )
    }
}
