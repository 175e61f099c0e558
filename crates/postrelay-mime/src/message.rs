//! Outgoing email message model and wire rendering.
//!
//! An [`Email`] collects the envelope-visible headers, a body, and any
//! attachments, and renders them into the CRLF-terminated RFC 5322 payload
//! the submission client writes during the DATA phase. Rendering never
//! applies dot-stuffing; that belongs to the transmission layer.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::encoding::encode_base64_wrapped;
use crate::error::{Error, Result};

/// Counter used to derive a process-unique multipart boundary per render.
static BOUNDARY_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A file attached to an [`Email`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// File name presented to the receiving client.
    pub filename: String,
    /// MIME content type of the attachment (e.g. `application/pdf`).
    pub content_type: String,
    /// Raw attachment bytes; encoded as Base64 during rendering.
    pub body: Vec<u8>,
}

impl Attachment {
    /// Creates a new attachment.
    #[must_use]
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        body: Vec<u8>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            body,
        }
    }
}

/// An outgoing email message.
///
/// Fields stay public and mutable until the message is handed to the
/// submission client; the client treats it as read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    /// Envelope sender address.
    pub from: String,
    /// Recipient addresses. Never empty.
    pub to: Vec<String>,
    /// Subject line.
    pub subject: String,
    /// Message body bytes.
    pub body: Vec<u8>,
    /// Ordered attachments.
    pub attachments: Vec<Attachment>,
}

impl Email {
    /// Creates a new message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyRecipients`] if `to` is empty.
    pub fn new(
        from: impl Into<String>,
        to: Vec<String>,
        subject: impl Into<String>,
        body: impl Into<Vec<u8>>,
    ) -> Result<Self> {
        if to.is_empty() {
            return Err(Error::EmptyRecipients);
        }

        Ok(Self {
            from: from.into(),
            to,
            subject: subject.into(),
            body: body.into(),
            attachments: Vec::new(),
        })
    }

    /// Appends an attachment.
    pub fn attach(&mut self, attachment: Attachment) {
        self.attachments.push(attachment);
    }

    /// Renders the message into its RFC 5322 wire form, stamped with the
    /// current UTC time.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHeader`] if a header value contains CR or LF,
    /// or [`Error::EmptyRecipients`] if the recipient list was emptied after
    /// construction.
    pub fn render(&self) -> Result<Vec<u8>> {
        self.render_with_date(&chrono::Utc::now().to_rfc2822())
    }

    /// Renders the message with an explicit `Date:` header value.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Email::render`].
    pub fn render_with_date(&self, date: &str) -> Result<Vec<u8>> {
        if self.to.is_empty() {
            return Err(Error::EmptyRecipients);
        }

        for value in [&self.from, &self.subject]
            .into_iter()
            .chain(self.to.iter())
        {
            check_header_value(value)?;
        }

        let mut out = Vec::with_capacity(self.body.len() + 512);
        push_header(&mut out, "Date", date);
        push_header(&mut out, "From", &self.from);
        push_header(&mut out, "To", &self.to.join(", "));
        push_header(&mut out, "Subject", &self.subject);
        push_header(&mut out, "MIME-Version", "1.0");

        if self.attachments.is_empty() {
            push_header(&mut out, "Content-Type", "text/plain; charset=utf-8");
            out.extend_from_slice(b"\r\n");
            out.extend_from_slice(&self.body);
        } else {
            let boundary = next_boundary();
            push_header(
                &mut out,
                "Content-Type",
                &format!("multipart/mixed; boundary=\"{boundary}\""),
            );
            out.extend_from_slice(b"\r\n");

            // Body part first, then attachments in order.
            out.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
            push_header(&mut out, "Content-Type", "text/plain; charset=utf-8");
            out.extend_from_slice(b"\r\n");
            out.extend_from_slice(&self.body);
            out.extend_from_slice(b"\r\n");

            for attachment in &self.attachments {
                check_header_value(&attachment.filename)?;
                check_header_value(&attachment.content_type)?;

                out.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
                push_header(&mut out, "Content-Type", &attachment.content_type);
                push_header(&mut out, "Content-Transfer-Encoding", "base64");
                push_header(
                    &mut out,
                    "Content-Disposition",
                    &format!("attachment; filename=\"{}\"", attachment.filename),
                );
                out.extend_from_slice(b"\r\n");
                out.extend_from_slice(encode_base64_wrapped(&attachment.body).as_bytes());
                out.extend_from_slice(b"\r\n");
            }

            out.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
        }

        Ok(out)
    }
}

/// Rejects header values that would terminate the header line early.
fn check_header_value(value: &str) -> Result<()> {
    if value.contains('\r') || value.contains('\n') {
        return Err(Error::InvalidHeader(value.to_string()));
    }
    Ok(())
}

fn push_header(out: &mut Vec<u8>, name: &str, value: &str) {
    out.extend_from_slice(name.as_bytes());
    out.extend_from_slice(b": ");
    out.extend_from_slice(value.as_bytes());
    out.extend_from_slice(b"\r\n");
}

fn next_boundary() -> String {
    let n = BOUNDARY_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("=_postrelay_{n:016x}")
}
