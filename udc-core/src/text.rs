//! Line-ending normalization and content hashing.
//!
//! Documents are identified by the SHA-1 digest of their CRLF form, so the
//! same helpers must be used on the parse path and on the serialization
//! path. Both conversions are pure and idempotent and only ever touch line
//! terminators, never field content.

use sha1::{Digest, Sha1};

/// Convert CRLF line endings to bare LF.
pub fn dos2unix(text: &str) -> String {
    text.replace("\r\n", "\n")
}

/// Convert any mix of line endings to CRLF.
pub fn unix2dos(text: &str) -> String {
    dos2unix(text).replace('\n', "\r\n")
}

/// Content hash of a document: SHA-1 over the CRLF form, uppercase hex.
pub fn content_hash(text: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(unix2dos(text).as_bytes());
    hex::encode_upper(hasher.finalize())
}

/// Append `Label: value` when the field is present.
pub(crate) fn push_single(out: &mut String, label: &str, value: &Option<String>) {
    if let Some(value) = value {
        out.push_str(label);
        out.push_str(": ");
        out.push_str(value);
        out.push('\n');
    }
}

/// Append a `Label:` header and its content lines when the block appeared
/// in the source document.
pub(crate) fn push_block(out: &mut String, label: &str, lines: &Option<Vec<String>>) {
    if let Some(lines) = lines {
        out.push_str(label);
        out.push_str(":\n");
        for line in lines {
            out.push_str(line);
            out.push('\n');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dos2unix_strips_carriage_returns() {
        assert_eq!(dos2unix("a\r\nb\r\n"), "a\nb\n");
        assert_eq!(dos2unix("a\nb\n"), "a\nb\n");
    }

    #[test]
    fn test_unix2dos_expands_all_line_endings() {
        assert_eq!(unix2dos("a\nb\n"), "a\r\nb\r\n");
        assert_eq!(unix2dos("a\r\nb\n"), "a\r\nb\r\n");
    }

    #[test]
    fn test_conversions_are_idempotent() {
        let mixed = "one\r\ntwo\nthree\r\n";
        assert_eq!(unix2dos(&unix2dos(mixed)), unix2dos(mixed));
        assert_eq!(dos2unix(&dos2unix(mixed)), dos2unix(mixed));
    }

    #[test]
    fn test_content_hash_known_vector() {
        // SHA-1("abc"), no line endings involved
        assert_eq!(content_hash("abc"), "A9993E364706816ABA3E25717850C26C9CD0D89D");
    }

    #[test]
    fn test_content_hash_normalizes_line_endings() {
        assert_eq!(content_hash("a\nb\n"), content_hash("a\r\nb\r\n"));
    }
}
