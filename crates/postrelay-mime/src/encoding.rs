//! Transfer-encoding utilities for outgoing messages.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Maximum line length for encoded body parts (RFC 2045).
const MAX_LINE_LENGTH: usize = 76;

/// Encodes data as Base64 on a single line.
#[must_use]
pub fn encode_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Encodes data as Base64, folded into CRLF-separated lines of at most
/// 76 characters, as required for message body parts.
#[must_use]
pub fn encode_base64_wrapped(data: &[u8]) -> String {
    let encoded = STANDARD.encode(data);
    let mut result = String::with_capacity(encoded.len() + encoded.len() / MAX_LINE_LENGTH * 2);

    for (i, ch) in encoded.chars().enumerate() {
        if i > 0 && i % MAX_LINE_LENGTH == 0 {
            result.push_str("\r\n");
        }
        result.push(ch);
    }

    result
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::manual_string_new, clippy::needless_collect, clippy::unreadable_literal, clippy::used_underscore_items, clippy::similar_names)]
mod tests {
    use super::*;

    #[test]
    fn encode_simple() {
        assert_eq!(encode_base64(b"hello"), "aGVsbG8=");
    }

    #[test]
    fn encode_empty() {
        assert_eq!(encode_base64(b""), "");
    }

    #[test]
    fn wrapped_short_input_is_single_line() {
        let encoded = encode_base64_wrapped(b"hello");
        assert_eq!(encoded, "aGVsbG8=");
        assert!(!encoded.contains("\r\n"));
    }

    #[test]
    fn wrapped_long_input_folds_at_76() {
        let data = vec![0xAB_u8; 100];
        let encoded = encode_base64_wrapped(&data);
        for line in encoded.split("\r\n") {
            assert!(line.len() <= MAX_LINE_LENGTH);
        }
        // Folding must not change the payload.
        let joined: String = encoded.split("\r\n").collect();
        assert_eq!(joined, encode_base64(&data));
    }

    #[test]
    fn wrapped_exact_boundary_has_no_trailing_break() {
        // 57 input bytes encode to exactly 76 characters.
        let data = vec![b'x'; 57];
        let encoded = encode_base64_wrapped(&data);
        assert_eq!(encoded.len(), 76);
        assert!(!encoded.ends_with("\r\n"));
    }

    proptest::proptest! {
        #[test]
        fn folding_never_changes_the_payload(data: Vec<u8>) {
            let folded = encode_base64_wrapped(&data);
            let joined: String = folded.split("\r\n").collect();
            proptest::prop_assert_eq!(joined, encode_base64(&data));
        }
    }
}
