//! Connection management: configuration, streams, and the client.

mod client;
mod stream;

use std::time::Duration;

pub use client::{Client, Phase};
pub use stream::{MailStream, connect_plain, connect_tls};

/// Connection security mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Security {
    /// No encryption (port 25). **Not recommended for production.**
    None,
    /// Start with plaintext, upgrade with STARTTLS (port 587).
    StartTls,
    /// TLS from the start (port 465). **Recommended.**
    #[default]
    Implicit,
}

impl Security {
    /// Returns the default port for this security mode.
    #[must_use]
    pub const fn default_port(self) -> u16 {
        match self {
            Self::None => 25,
            Self::StartTls => 587,
            Self::Implicit => 465,
        }
    }
}

/// Default read timeout applied before each blocking read.
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// SMTP connection configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server hostname.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Security mode.
    pub security: Security,
    /// Read timeout.
    pub timeout: Duration,
    /// Name the client announces in EHLO.
    pub local_hostname: String,
}

impl Config {
    /// Creates a new configuration with implicit TLS on port 465.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: 465,
            security: Security::Implicit,
            timeout: DEFAULT_TIMEOUT,
            local_hostname: "localhost".to_string(),
        }
    }

    /// Creates a configuration builder.
    #[must_use]
    pub fn builder(host: impl Into<String>) -> ConfigBuilder {
        ConfigBuilder::new(host)
    }
}

/// Builder for connection configuration.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    host: String,
    port: Option<u16>,
    security: Security,
    timeout: Duration,
    local_hostname: String,
}

impl ConfigBuilder {
    /// Creates a new builder with the given hostname.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: None,
            security: Security::Implicit,
            timeout: DEFAULT_TIMEOUT,
            local_hostname: "localhost".to_string(),
        }
    }

    /// Sets an explicit port (defaults to the security mode's port).
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets the security mode.
    #[must_use]
    pub const fn security(mut self, security: Security) -> Self {
        self.security = security;
        self
    }

    /// Sets the read timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the name announced in EHLO.
    #[must_use]
    pub fn local_hostname(mut self, name: impl Into<String>) -> Self {
        self.local_hostname = name.into();
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> Config {
        Config {
            port: self.port.unwrap_or_else(|| self.security.default_port()),
            host: self.host,
            security: self.security,
            timeout: self.timeout,
            local_hostname: self.local_hostname,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::manual_string_new, clippy::needless_collect, clippy::unreadable_literal, clippy::used_underscore_items, clippy::similar_names)]
mod tests {
    use super::*;

    #[test]
    fn default_ports_follow_security() {
        assert_eq!(Security::None.default_port(), 25);
        assert_eq!(Security::StartTls.default_port(), 587);
        assert_eq!(Security::Implicit.default_port(), 465);
    }

    #[test]
    fn builder_defaults_port_from_security() {
        let config = Config::builder("smtp.example.com")
            .security(Security::StartTls)
            .build();
        assert_eq!(config.port, 587);
    }

    #[test]
    fn builder_explicit_port_wins() {
        let config = Config::builder("smtp.example.com")
            .security(Security::StartTls)
            .port(2525)
            .build();
        assert_eq!(config.port, 2525);
    }
}
