//! SMTP reply types.

use crate::error::{Error, Result};

/// SMTP reply from the server.
///
/// Multi-line replies keep their lines in wire order; every line of a
/// multi-line reply shares the same code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Reply code (e.g., 250).
    pub code: ReplyCode,
    /// Reply text lines, code and separator stripped. Never empty.
    pub lines: Vec<String>,
}

impl Reply {
    /// Creates a new reply.
    #[must_use]
    pub const fn new(code: ReplyCode, lines: Vec<String>) -> Self {
        Self { code, lines }
    }

    /// Returns true if this is a success reply (2xx).
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.code.is_success()
    }

    /// Returns true if this is an intermediate reply (3xx).
    #[must_use]
    pub const fn is_intermediate(&self) -> bool {
        self.code.is_intermediate()
    }

    /// Returns true if this is a permanent error (5xx).
    #[must_use]
    pub const fn is_permanent_error(&self) -> bool {
        self.code.is_permanent()
    }

    /// Returns the full reply text as a single string.
    #[must_use]
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Reassembles the reply into its wire lines, restoring the
    /// continuation structure (`-` separators, terminal space).
    #[must_use]
    pub fn to_wire_lines(&self) -> Vec<String> {
        let last = self.lines.len().saturating_sub(1);
        self.lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let sep = if i == last { ' ' } else { '-' };
                format!("{}{}{}", self.code, sep, line)
            })
            .collect()
    }
}

/// SMTP reply code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReplyCode(u16);

impl ReplyCode {
    /// Creates a new reply code.
    #[must_use]
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Returns the numeric code.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// Returns true if this is a success code (2xx).
    #[must_use]
    pub const fn is_success(self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// Returns true if this is an intermediate code (3xx).
    #[must_use]
    pub const fn is_intermediate(self) -> bool {
        self.0 >= 300 && self.0 < 400
    }

    /// Returns true if this is a transient error (4xx).
    #[must_use]
    pub const fn is_transient(self) -> bool {
        self.0 >= 400 && self.0 < 500
    }

    /// Returns true if this is a permanent error (5xx).
    #[must_use]
    pub const fn is_permanent(self) -> bool {
        self.0 >= 500 && self.0 < 600
    }
}

impl std::fmt::Display for ReplyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

// Reply codes the transaction driver gates on
impl ReplyCode {
    /// 220 Service ready
    pub const SERVICE_READY: Self = Self(220);
    /// 221 Service closing transmission channel
    pub const CLOSING: Self = Self(221);
    /// 235 Authentication succeeded
    pub const AUTH_SUCCEEDED: Self = Self(235);
    /// 250 Requested mail action okay, completed
    pub const OK: Self = Self(250);
    /// 334 Continue with authentication
    pub const AUTH_CONTINUE: Self = Self(334);
    /// 354 Start mail input
    pub const START_DATA: Self = Self(354);
    /// 535 Authentication credentials invalid
    pub const AUTH_FAILED: Self = Self(535);
    /// 550 Mailbox unavailable
    pub const MAILBOX_UNAVAILABLE: Self = Self(550);
}

/// The parsed 220 banner that opens a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Greeting {
    /// Reply code (always 220 for a valid greeting).
    pub code: ReplyCode,
    /// Domain the server announced, the banner's first token.
    pub domain: String,
    /// Remainder of the banner line.
    pub greeting: String,
}

impl Greeting {
    /// Extracts the domain and greeting text from a banner reply.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGreeting`] if the code is not 220 or the
    /// banner cannot be split into a domain and remainder.
    pub fn from_reply(reply: &Reply) -> Result<Self> {
        if reply.code != ReplyCode::SERVICE_READY {
            return Err(Error::InvalidGreeting(format!(
                "{} {}",
                reply.code,
                reply.text()
            )));
        }

        let banner = reply
            .lines
            .first()
            .ok_or_else(|| Error::InvalidGreeting("empty banner".to_string()))?;
        let (domain, greeting) = banner
            .split_once(' ')
            .ok_or_else(|| Error::InvalidGreeting(banner.clone()))?;

        Ok(Self {
            code: reply.code,
            domain: domain.to_string(),
            greeting: greeting.to_string(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::manual_string_new, clippy::needless_collect, clippy::unreadable_literal, clippy::used_underscore_items, clippy::similar_names)]
mod tests {
    use super::*;

    #[test]
    fn code_classes() {
        assert!(ReplyCode::OK.is_success());
        assert!(ReplyCode::AUTH_SUCCEEDED.is_success());
        assert!(ReplyCode::AUTH_CONTINUE.is_intermediate());
        assert!(ReplyCode::START_DATA.is_intermediate());
        assert!(ReplyCode::new(421).is_transient());
        assert!(ReplyCode::AUTH_FAILED.is_permanent());
        assert!(!ReplyCode::OK.is_permanent());
    }

    #[test]
    fn display_pads_to_three_digits() {
        assert_eq!(format!("{}", ReplyCode::OK), "250");
        assert_eq!(format!("{}", ReplyCode::new(42)), "042");
    }

    #[test]
    fn text_joins_lines() {
        let reply = Reply::new(
            ReplyCode::OK,
            vec!["first".to_string(), "second".to_string()],
        );
        assert_eq!(reply.text(), "first\nsecond");
    }

    #[test]
    fn wire_lines_restore_continuation() {
        let reply = Reply::new(
            ReplyCode::OK,
            vec!["smtp.example.com".to_string(), "8BITMIME".to_string()],
        );
        assert_eq!(
            reply.to_wire_lines(),
            vec!["250-smtp.example.com", "250 8BITMIME"]
        );
    }

    #[test]
    fn greeting_splits_domain_and_text() {
        let reply = Reply::new(
            ReplyCode::SERVICE_READY,
            vec!["smtp.gmail.com at your service".to_string()],
        );
        let greeting = Greeting::from_reply(&reply).unwrap();
        assert_eq!(greeting.code.as_u16(), 220);
        assert_eq!(greeting.domain, "smtp.gmail.com");
        assert_eq!(greeting.greeting, "at your service");
    }

    #[test]
    fn greeting_rejects_wrong_code() {
        let reply = Reply::new(ReplyCode::new(554), vec!["no service".to_string()]);
        assert!(matches!(
            Greeting::from_reply(&reply),
            Err(Error::InvalidGreeting(_))
        ));
    }

    #[test]
    fn greeting_rejects_bare_domain() {
        let reply = Reply::new(ReplyCode::SERVICE_READY, vec!["smtp.host.com".to_string()]);
        assert!(matches!(
            Greeting::from_reply(&reply),
            Err(Error::InvalidGreeting(_))
        ));
    }
}
