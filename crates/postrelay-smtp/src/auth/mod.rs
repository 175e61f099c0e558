//! Authentication mechanism selection and SASL payload construction.
//!
//! The challenge/response exchanges themselves are driven by the client,
//! which owns the stream; this module holds the pure pieces: picking a
//! mechanism from the advertised set and building the Base64 payloads.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::{Error, Result};
use crate::types::{AuthMechanism, Credentials};

/// Chooses a mechanism from the advertised set.
///
/// LOGIN is preferred over PLAIN when both are advertised: its two distinct
/// challenge points let failures be attributed to the username or the
/// password, which PLAIN's combined payload cannot.
///
/// # Errors
///
/// Returns [`Error::NoSupportedAuthMechanism`] if the set is empty.
pub fn select_mechanism(advertised: &[AuthMechanism]) -> Result<AuthMechanism> {
    if advertised.contains(&AuthMechanism::Login) {
        Ok(AuthMechanism::Login)
    } else if advertised.contains(&AuthMechanism::Plain) {
        Ok(AuthMechanism::Plain)
    } else {
        Err(Error::NoSupportedAuthMechanism)
    }
}

/// Builds the PLAIN initial response: `base64(NUL user NUL pass)`.
#[must_use]
pub fn plain_initial_response(credentials: &Credentials) -> String {
    let payload = format!("\0{}\0{}", credentials.user, credentials.pass);
    STANDARD.encode(payload.as_bytes())
}

/// Encodes a single LOGIN challenge response (username or password).
#[must_use]
pub fn encode_credential(value: &str) -> String {
    STANDARD.encode(value.as_bytes())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::manual_string_new, clippy::needless_collect, clippy::unreadable_literal, clippy::used_underscore_items, clippy::similar_names)]
mod tests {
    use super::*;

    #[test]
    fn login_preferred_over_plain() {
        let advertised = [AuthMechanism::Plain, AuthMechanism::Login];
        assert_eq!(
            select_mechanism(&advertised).unwrap(),
            AuthMechanism::Login
        );
    }

    #[test]
    fn plain_selected_when_alone() {
        let advertised = [AuthMechanism::Plain];
        assert_eq!(
            select_mechanism(&advertised).unwrap(),
            AuthMechanism::Plain
        );
    }

    #[test]
    fn empty_set_has_no_mechanism() {
        assert!(matches!(
            select_mechanism(&[]),
            Err(Error::NoSupportedAuthMechanism)
        ));
    }

    #[test]
    fn plain_payload_is_nul_delimited() {
        let creds = Credentials::new("user", "pass");
        assert_eq!(plain_initial_response(&creds), "AHVzZXIAcGFzcw==");
    }

    #[test]
    fn credential_lines_are_plain_base64() {
        assert_eq!(encode_credential("user"), "dXNlcg==");
    }
}
