//! SMTP client: session orchestration and the mail transaction driver.

use std::io;
use std::time::Duration;

use postrelay_mime::Email;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use crate::auth;
use crate::command::Command;
use crate::connection::stream::MailStream;
use crate::connection::{Config, DEFAULT_TIMEOUT, Security};
use crate::error::{Error, Result};
use crate::parser::{is_last_reply_line, is_reply_line, parse_reply};
use crate::types::{Address, AuthMechanism, Credentials, Extensions, Greeting, Reply};

/// Session phase, advanced by the transaction driver.
///
/// Every failure aborts the session; callers construct a fresh client (and
/// stream) to retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Connected, greeting not yet consumed.
    Disconnected,
    /// 220 banner accepted.
    Greeted,
    /// EHLO exchanged, capability set negotiated.
    Identified,
    /// Credentials accepted by the server.
    Authenticated,
    /// MAIL/RCPT/DATA sequence in flight.
    InTransaction,
    /// QUIT sent or stream shut down; the client is spent.
    Closed,
}

/// SMTP submission client.
///
/// Generic over the underlying stream so the socket-backed [`MailStream`]
/// and in-memory test doubles are interchangeable. One session per client;
/// commands are strictly sequential, the protocol permits no pipelining.
#[derive(Debug)]
pub struct Client<S> {
    stream: BufReader<S>,
    local_hostname: String,
    timeout: Duration,
    phase: Phase,
    extensions: Extensions,
}

impl<S> Client<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wraps an already-connected stream.
    pub fn new(stream: S) -> Self {
        Self {
            stream: BufReader::new(stream),
            local_hostname: "localhost".to_string(),
            timeout: DEFAULT_TIMEOUT,
            phase: Phase::Disconnected,
            extensions: Extensions::default(),
        }
    }

    /// Sets the name announced in EHLO.
    #[must_use]
    pub fn with_local_hostname(mut self, name: impl Into<String>) -> Self {
        self.local_hostname = name.into();
        self
    }

    /// Sets the read timeout applied before each blocking read.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the current session phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the capability set negotiated via EHLO.
    #[must_use]
    pub const fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    /// Reads one complete (possibly multi-line) reply from the stream.
    ///
    /// # Errors
    ///
    /// Returns parse errors per [`parse_reply`], [`Error::Timeout`] if the
    /// server stays silent past the read timeout, and an I/O error if the
    /// stream closes before any reply line arrives.
    pub async fn accept_reply(&mut self) -> Result<Reply> {
        let mut lines = Vec::new();
        loop {
            let Some(line) = self.read_line().await? else {
                if lines.is_empty() {
                    return Err(Error::Io(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "connection closed before reply",
                    )));
                }
                // Stream ended mid-reply; parse_reply reports the missing
                // terminal line.
                break;
            };
            if line.is_empty() {
                continue;
            }

            let done = is_last_reply_line(&line) || !is_reply_line(&line);
            lines.push(line);
            if done {
                break;
            }
        }

        let reply = parse_reply(&lines)?;
        tracing::trace!(code = reply.code.as_u16(), lines = reply.lines.len(), "reply");
        Ok(reply)
    }

    /// Consumes the 220 banner that opens the session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGreeting`] if the code is not 220 or the
    /// banner has no domain and remainder.
    pub async fn accept_greeting(&mut self) -> Result<Greeting> {
        let reply = self.accept_reply().await?;
        let greeting = Greeting::from_reply(&reply)?;
        tracing::debug!(domain = %greeting.domain, "greeted");
        self.phase = Phase::Greeted;
        Ok(greeting)
    }

    /// Writes `line + CRLF`, flushes, and reads one reply, requiring the
    /// expected code.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedReply`] if the reply code differs from
    /// `expecting`, or any read/parse error.
    pub async fn transmit(&mut self, line: &str, expecting: u16) -> Result<Reply> {
        tracing::debug!(%line, "command");
        self.write_line(line.as_bytes()).await?;
        let reply = self.accept_reply().await?;
        expect_code(reply, expecting)
    }

    /// Runs the session initialization sequence: greeting (if not yet
    /// consumed), EHLO, then authentication when credentials are supplied
    /// and the server advertises AUTH.
    ///
    /// # Errors
    ///
    /// Returns any greeting, EHLO, or authentication error.
    pub async fn initialize_session(
        &mut self,
        credentials: Option<&Credentials>,
    ) -> Result<()> {
        if self.phase == Phase::Disconnected {
            self.accept_greeting().await?;
        }
        self.ehlo().await?;
        self.authorize_if_advertised(credentials).await
    }

    /// Sends EHLO and rebuilds the capability set from the reply.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedReply`] if the server does not answer 250.
    pub async fn ehlo(&mut self) -> Result<&Extensions> {
        let cmd = Command::Ehlo {
            hostname: self.local_hostname.clone(),
        };
        let reply = self.transmit_cmd(&cmd, 250).await?;
        self.extensions = Extensions::from_reply(&reply);
        self.phase = Phase::Identified;
        Ok(&self.extensions)
    }

    /// Authenticates against the given capability set, which may be the
    /// discovered one or a caller-supplied override.
    ///
    /// Selects LOGIN over PLAIN when both are advertised.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSupportedAuthMechanism`] when the set advertises
    /// neither mechanism, and the mechanism-specific failures otherwise:
    /// [`Error::InvalidUsername`] / [`Error::InvalidPassword`] for LOGIN,
    /// [`Error::AuthenticationFailed`] for PLAIN.
    pub async fn authorize(
        &mut self,
        extensions: &Extensions,
        credentials: &Credentials,
    ) -> Result<()> {
        let mechanism = auth::select_mechanism(&extensions.auth_mechanisms())?;
        tracing::debug!(mechanism = mechanism.as_str(), "authenticating");
        match mechanism {
            AuthMechanism::Login => self.auth_login(credentials).await?,
            AuthMechanism::Plain => self.auth_plain(credentials).await?,
        }
        self.phase = Phase::Authenticated;
        Ok(())
    }

    /// Submits one email: initializes the session if needed, then drives
    /// MAIL FROM, RCPT TO per recipient, DATA, the dot-stuffed payload and
    /// its terminator, and QUIT.
    ///
    /// The first rejected recipient aborts the whole send; there is no
    /// partial-recipient delivery. On any failure the stream is shut down
    /// and the client is spent.
    ///
    /// # Errors
    ///
    /// Returns initialization errors, [`Error::RecipientRejected`],
    /// [`Error::UnexpectedReply`] for any other refused step, or message
    /// assembly errors.
    pub async fn send(
        &mut self,
        email: &Email,
        credentials: Option<&Credentials>,
    ) -> Result<()> {
        match self.phase {
            Phase::Closed => {
                return Err(Error::InvalidState("session is closed".to_string()));
            }
            Phase::InTransaction => {
                return Err(Error::InvalidState(
                    "transaction already in progress".to_string(),
                ));
            }
            Phase::Disconnected | Phase::Greeted => {
                self.initialize_session(credentials).await?;
            }
            Phase::Identified | Phase::Authenticated => {}
        }

        let from = Address::new(email.from.as_str())?;
        let mut recipients = Vec::with_capacity(email.to.len());
        for to in &email.to {
            recipients.push(Address::new(to.as_str())?);
        }
        let payload = email.render()?;

        self.phase = Phase::InTransaction;
        match self.run_transaction(&from, &recipients, &payload).await {
            Ok(()) => {
                self.phase = Phase::Identified;
                self.quit().await
            }
            Err(e) => {
                self.close().await;
                Err(e)
            }
        }
    }

    /// Sends QUIT and shuts the stream down, tolerating a server that
    /// closes the connection instead of answering 221.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedReply`] if the server answers with an
    /// unrelated code, or a non-disconnect I/O error.
    pub async fn quit(&mut self) -> Result<()> {
        if self.phase == Phase::Closed {
            return Ok(());
        }
        let result = self.transmit_cmd(&Command::Quit, 221).await;
        self.close().await;
        match result {
            Ok(_) => Ok(()),
            Err(Error::Io(e)) if is_disconnect(&e) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Shuts the stream down and marks the session closed.
    pub async fn close(&mut self) {
        self.phase = Phase::Closed;
        let _ = self.stream.get_mut().shutdown().await;
    }

    async fn authorize_if_advertised(
        &mut self,
        credentials: Option<&Credentials>,
    ) -> Result<()> {
        if let Some(creds) = credentials {
            if self.extensions.supports("AUTH").is_some() {
                let extensions = self.extensions.clone();
                self.authorize(&extensions, creds).await?;
            }
        }
        Ok(())
    }

    async fn auth_plain(&mut self, credentials: &Credentials) -> Result<()> {
        let cmd = Command::Auth {
            mechanism: AuthMechanism::Plain,
            initial_response: Some(auth::plain_initial_response(credentials)),
        };
        let reply = self.transmit_cmd_unchecked(&cmd).await?;
        if reply.code.is_permanent() {
            return Err(Error::AuthenticationFailed {
                code: reply.code.as_u16(),
                reply: reply.text(),
            });
        }
        if !reply.is_success() {
            return Err(Error::UnexpectedReply {
                expected: 235,
                reply,
            });
        }
        Ok(())
    }

    async fn auth_login(&mut self, credentials: &Credentials) -> Result<()> {
        let cmd = Command::Auth {
            mechanism: AuthMechanism::Login,
            initial_response: None,
        };
        // The 334 prompts carry base64 "Username:"/"Password:" text; only
        // the continuation code is validated.
        self.transmit_cmd(&cmd, 334).await?;

        let reply = self
            .transmit_credential(&auth::encode_credential(&credentials.user))
            .await?;
        if reply.code.is_permanent() {
            return Err(Error::InvalidUsername {
                code: reply.code.as_u16(),
                reply: reply.text(),
            });
        }
        if reply.code.as_u16() != 334 {
            return Err(Error::UnexpectedReply {
                expected: 334,
                reply,
            });
        }

        let reply = self
            .transmit_credential(&auth::encode_credential(&credentials.pass))
            .await?;
        if reply.code.is_permanent() {
            return Err(Error::InvalidPassword {
                code: reply.code.as_u16(),
                reply: reply.text(),
            });
        }
        if !reply.is_success() {
            return Err(Error::UnexpectedReply {
                expected: 235,
                reply,
            });
        }
        Ok(())
    }

    async fn run_transaction(
        &mut self,
        from: &Address,
        recipients: &[Address],
        payload: &[u8],
    ) -> Result<()> {
        let cmd = Command::MailFrom { from: from.clone() };
        self.transmit_cmd(&cmd, 250).await?;

        for to in recipients {
            let cmd = Command::RcptTo { to: to.clone() };
            let reply = self.transmit_cmd_unchecked(&cmd).await?;
            if reply.code.as_u16() != 250 {
                return Err(Error::RecipientRejected {
                    address: to.as_str().to_string(),
                    code: reply.code.as_u16(),
                    reply: reply.text(),
                });
            }
        }

        self.transmit_cmd(&Command::Data, 354).await?;
        self.send_payload(payload).await?;
        self.transmit(".", 250).await?;
        Ok(())
    }

    /// Writes the message payload with dot-stuffing and a guaranteed
    /// trailing CRLF, so the lone `.` terminator line that follows is
    /// unambiguous.
    async fn send_payload(&mut self, message: &[u8]) -> Result<()> {
        let mut wire = Vec::with_capacity(message.len() + 2);
        let mut segments = message.split(|&b| b == b'\n').peekable();
        while let Some(segment) = segments.next() {
            let line = segment.strip_suffix(b"\r").unwrap_or(segment);
            if line.is_empty() && segments.peek().is_none() {
                break;
            }
            if line.first() == Some(&b'.') {
                wire.push(b'.');
            }
            wire.extend_from_slice(line);
            wire.extend_from_slice(b"\r\n");
        }

        tracing::trace!(bytes = wire.len(), "payload");
        self.write_all_flush(&wire).await
    }

    async fn transmit_cmd(&mut self, cmd: &Command, expecting: u16) -> Result<Reply> {
        let reply = self.transmit_cmd_unchecked(cmd).await?;
        expect_code(reply, expecting)
    }

    async fn transmit_cmd_unchecked(&mut self, cmd: &Command) -> Result<Reply> {
        // Log the verb only; AUTH arguments carry credentials.
        tracing::debug!(command = cmd.verb(), "command");
        self.write_all_flush(&cmd.serialize()).await?;
        self.accept_reply().await
    }

    /// Writes one LOGIN challenge response. Elided from log output.
    async fn transmit_credential(&mut self, line: &str) -> Result<Reply> {
        tracing::debug!("credential line");
        self.write_line(line.as_bytes()).await?;
        self.accept_reply().await
    }

    async fn write_line(&mut self, line: &[u8]) -> Result<()> {
        let mut buf = Vec::with_capacity(line.len() + 2);
        buf.extend_from_slice(line);
        buf.extend_from_slice(b"\r\n");
        self.write_all_flush(&buf).await
    }

    async fn write_all_flush(&mut self, bytes: &[u8]) -> Result<()> {
        let stream = self.stream.get_mut();
        stream.write_all(bytes).await?;
        stream.flush().await?;
        Ok(())
    }

    /// Reads one line, bounded by the read timeout. `None` means the
    /// stream reached end of data.
    async fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let read = tokio::time::timeout(self.timeout, self.stream.read_line(&mut line))
            .await
            .map_err(|_| Error::Timeout)??;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end().to_string()))
    }
}

impl Client<MailStream> {
    /// Connects per the configuration and runs the full initialization
    /// sequence: greeting, EHLO, STARTTLS upgrade when configured, and
    /// authentication when credentials are supplied and AUTH is
    /// advertised.
    ///
    /// # Errors
    ///
    /// Returns connection, TLS, or initialization errors.
    pub async fn establish(
        config: Config,
        credentials: Option<&Credentials>,
    ) -> Result<Self> {
        let stream = match config.security {
            Security::Implicit => {
                super::stream::connect_tls(&config.host, config.port).await?
            }
            Security::None | Security::StartTls => {
                super::stream::connect_plain(&config.host, config.port).await?
            }
        };
        tracing::debug!(host = %config.host, port = config.port, "connected");

        let mut client = Self::new(stream)
            .with_local_hostname(config.local_hostname.clone())
            .with_timeout(config.timeout);
        client.accept_greeting().await?;
        client.ehlo().await?;

        let mut client = if config.security == Security::StartTls {
            client.starttls(&config.host).await?
        } else {
            client
        };
        client.authorize_if_advertised(credentials).await?;
        Ok(client)
    }

    /// Issues STARTTLS, upgrades the stream, and re-identifies with EHLO;
    /// the capability set is rebuilt from the post-upgrade reply.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotSupported`] if the server does not advertise
    /// STARTTLS, or the upgrade/EHLO errors.
    pub async fn starttls(mut self, hostname: &str) -> Result<Self> {
        if self.extensions.supports("STARTTLS").is_none() {
            return Err(Error::NotSupported("STARTTLS".to_string()));
        }
        self.transmit_cmd(&Command::StartTls, 220).await?;

        let Self {
            stream,
            local_hostname,
            timeout,
            ..
        } = self;
        let upgraded = stream.into_inner().upgrade_to_tls(hostname).await?;

        let mut client = Self {
            stream: BufReader::new(upgraded),
            local_hostname,
            timeout,
            phase: Phase::Greeted,
            extensions: Extensions::default(),
        };
        client.ehlo().await?;
        Ok(client)
    }
}

fn expect_code(reply: Reply, expecting: u16) -> Result<Reply> {
    if reply.code.as_u16() == expecting {
        Ok(reply)
    } else {
        Err(Error::UnexpectedReply {
            expected: expecting,
            reply,
        })
    }
}

fn is_disconnect(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::UnexpectedEof
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::NotConnected
    )
}
