//! EHLO extension registry.

use crate::types::Reply;

/// A single server-advertised capability line, split into an uppercased
/// keyword and its remaining whitespace-delimited parameters.
///
/// Unrecognized extensions are retained as-is and ignored downstream, which
/// keeps the registry forward-compatible by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    /// Uppercased first token of the capability line.
    pub keyword: String,
    /// Remaining tokens, in order.
    pub params: Vec<String>,
}

impl Extension {
    /// Parses a capability line from an EHLO reply.
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let mut tokens = line.split_whitespace();
        let keyword = tokens.next().unwrap_or_default().to_uppercase();
        let params = tokens.map(str::to_string).collect();
        Self { keyword, params }
    }
}

/// The capability set negotiated for one session.
///
/// Built once from the EHLO reply and read-only thereafter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extensions {
    entries: Vec<Extension>,
}

impl Extensions {
    /// Builds the registry from an EHLO reply, treating every line as a
    /// capability line.
    #[must_use]
    pub fn from_reply(reply: &Reply) -> Self {
        reply.lines.iter().map(|line| Extension::parse(line)).collect()
    }

    /// Looks up an extension by keyword, case-insensitively.
    #[must_use]
    pub fn supports(&self, keyword: &str) -> Option<&Extension> {
        self.entries
            .iter()
            .find(|ext| ext.keyword.eq_ignore_ascii_case(keyword))
    }

    /// Returns the advertised authentication mechanisms this client speaks.
    #[must_use]
    pub fn auth_mechanisms(&self) -> Vec<AuthMechanism> {
        self.supports("AUTH").map_or_else(Vec::new, |ext| {
            ext.params
                .iter()
                .filter_map(|p| AuthMechanism::parse(p))
                .collect()
        })
    }

    /// Returns the advertised maximum message size, if any.
    #[must_use]
    pub fn max_message_size(&self) -> Option<usize> {
        self.supports("SIZE")
            .and_then(|ext| ext.params.first())
            .and_then(|p| p.parse().ok())
    }

    /// Returns true if no capabilities have been negotiated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the capability lines in wire order.
    pub fn iter(&self) -> std::slice::Iter<'_, Extension> {
        self.entries.iter()
    }
}

impl FromIterator<Extension> for Extensions {
    fn from_iter<I: IntoIterator<Item = Extension>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Extensions {
    type Item = &'a Extension;
    type IntoIter = std::slice::Iter<'a, Extension>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// SASL authentication mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMechanism {
    /// PLAIN - single combined NUL-delimited payload
    Plain,
    /// LOGIN - separate username and password round-trips
    Login,
}

impl AuthMechanism {
    /// Parses an authentication mechanism name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "PLAIN" => Some(Self::Plain),
            "LOGIN" => Some(Self::Login),
            _ => None,
        }
    }

    /// Returns the mechanism name as a string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Plain => "PLAIN",
            Self::Login => "LOGIN",
        }
    }
}
