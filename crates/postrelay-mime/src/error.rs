//! Error types for message assembly.

/// Result type alias for message assembly operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Message assembly error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A message must have at least one recipient.
    #[error("Message has no recipients")]
    EmptyRecipients,

    /// A header value contains bytes that would break the header block.
    #[error("Invalid header value: {0}")]
    InvalidHeader(String),
}
