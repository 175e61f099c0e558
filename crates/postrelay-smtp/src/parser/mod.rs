//! SMTP reply parser.

use crate::error::{Error, Result};
use crate::types::{Reply, ReplyCode};

/// Checks whether a line has reply shape: a 3-digit code followed by `-`
/// (continuation) or ` ` (terminal).
#[must_use]
pub fn is_reply_line(line: &str) -> bool {
    let bytes = line.as_bytes();
    bytes.len() >= 4
        && bytes[..3].iter().all(u8::is_ascii_digit)
        && (bytes[3] == b'-' || bytes[3] == b' ')
}

/// Checks whether a line terminates a reply (` ` separator).
#[must_use]
pub fn is_last_reply_line(line: &str) -> bool {
    is_reply_line(line) && line.as_bytes()[3] == b' '
}

/// Parses an SMTP reply from response lines.
///
/// SMTP replies can be single-line or multi-line:
/// - Single: `250 OK`
/// - Multi: `250-First line`, `250-Second line`, `250 Last line`
///
/// The parser performs no semantic validation of the code's meaning; that
/// is the transaction driver's job.
///
/// # Errors
///
/// Returns [`Error::MalformedReply`] when a line does not have reply shape
/// or no terminal line is present, and [`Error::ReplyCodeMismatch`] when a
/// continuation line carries a different code than the first line.
pub fn parse_reply(lines: &[String]) -> Result<Reply> {
    let mut code: Option<u16> = None;
    let mut texts = Vec::with_capacity(lines.len());
    let mut terminated = false;

    for line in lines {
        if terminated {
            return Err(Error::MalformedReply(format!(
                "text after terminal reply line: {line}"
            )));
        }
        if !is_reply_line(line) {
            return Err(Error::MalformedReply(line.clone()));
        }

        let line_code = line[..3]
            .parse::<u16>()
            .map_err(|_| Error::MalformedReply(line.clone()))?;
        match code {
            None => code = Some(line_code),
            Some(expected) if expected != line_code => {
                return Err(Error::ReplyCodeMismatch {
                    expected,
                    found: line_code,
                });
            }
            Some(_) => {}
        }

        texts.push(line[4..].to_string());
        terminated = is_last_reply_line(line);
    }

    let Some(code) = code else {
        return Err(Error::MalformedReply("empty reply".to_string()));
    };
    if !terminated {
        return Err(Error::MalformedReply(
            "reply ended without a terminal line".to_string(),
        ));
    }

    Ok(Reply::new(ReplyCode::new(code), texts))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::manual_string_new, clippy::needless_collect, clippy::unreadable_literal, clippy::used_underscore_items, clippy::similar_names)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn single_line_reply() {
        let reply = parse_reply(&lines(&["250 OK"])).unwrap();
        assert_eq!(reply.code.as_u16(), 250);
        assert_eq!(reply.lines, vec!["OK"]);
        assert!(reply.is_success());
    }

    #[test]
    fn multi_line_reply_preserves_order() {
        let reply = parse_reply(&lines(&[
            "250-smtp.sendgrid.net",
            "250-8BITMIME",
            "250-SIZE 31457280",
            "250-AUTH PLAIN LOGIN",
            "250 AUTH=PLAIN LOGIN",
        ]))
        .unwrap();
        assert_eq!(reply.code.as_u16(), 250);
        assert_eq!(
            reply.lines,
            vec![
                "smtp.sendgrid.net",
                "8BITMIME",
                "SIZE 31457280",
                "AUTH PLAIN LOGIN",
                "AUTH=PLAIN LOGIN",
            ]
        );
    }

    #[test]
    fn leading_zero_code() {
        let reply = parse_reply(&lines(&["042 ok"])).unwrap();
        assert_eq!(reply.code.as_u16(), 42);
    }

    #[test]
    fn missing_terminal_line() {
        let result = parse_reply(&lines(&["250-one", "250-two"]));
        assert!(matches!(result, Err(Error::MalformedReply(_))));
    }

    #[test]
    fn empty_input() {
        assert!(matches!(parse_reply(&[]), Err(Error::MalformedReply(_))));
    }

    #[test]
    fn bad_separator() {
        assert!(matches!(
            parse_reply(&lines(&["250+OK"])),
            Err(Error::MalformedReply(_))
        ));
    }

    #[test]
    fn non_numeric_code() {
        assert!(matches!(
            parse_reply(&lines(&["ABC OK"])),
            Err(Error::MalformedReply(_))
        ));
    }

    #[test]
    fn short_line() {
        assert!(matches!(
            parse_reply(&lines(&["250"])),
            Err(Error::MalformedReply(_))
        ));
    }

    #[test]
    fn code_mismatch_across_lines() {
        let result = parse_reply(&lines(&["250-one", "251 two"]));
        assert!(matches!(
            result,
            Err(Error::ReplyCodeMismatch {
                expected: 250,
                found: 251
            })
        ));
    }

    #[test]
    fn trailing_lines_rejected() {
        let result = parse_reply(&lines(&["250 done", "250 extra"]));
        assert!(matches!(result, Err(Error::MalformedReply(_))));
    }

    #[test]
    fn reassembly_is_idempotent() {
        let wire = lines(&["250-smtp.sendgrid.net", "250-8BITMIME", "250 SIZE 31457280"]);
        let reply = parse_reply(&wire).unwrap();
        assert_eq!(reply.to_wire_lines(), wire);
        let reparsed = parse_reply(&reply.to_wire_lines()).unwrap();
        assert_eq!(reparsed, reply);
    }

    #[test]
    fn line_shape_helpers() {
        assert!(is_reply_line("250 OK"));
        assert!(is_reply_line("250-Continuing"));
        assert!(!is_reply_line("250"));
        assert!(!is_reply_line("garbage"));
        assert!(is_last_reply_line("250 OK"));
        assert!(!is_last_reply_line("250-Continuing"));
    }
}
