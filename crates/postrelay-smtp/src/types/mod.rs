//! Core SMTP types (replies, extensions, addresses, credentials).

mod address;
mod credentials;
mod extension;
mod reply;

pub use address::Address;
pub use credentials::Credentials;
pub use extension::{AuthMechanism, Extension, Extensions};
pub use reply::{Greeting, Reply, ReplyCode};
