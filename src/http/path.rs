//! URL path handling
//!
//! Decodes request paths, maps them onto a relative filesystem path that
//! cannot climb above the document root, and escapes names for HTML output.

use std::fmt::Write;
use std::path::PathBuf;

/// Percent-decode a URL path; malformed escapes are kept literally
pub fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                decoded.push((hi << 4) | lo);
                i += 3;
                continue;
            }
        }
        decoded.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&decoded).into_owned()
}

const fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Percent-encode a single path segment for use in an `href`
pub fn percent_encode_segment(segment: &str) -> String {
    let mut encoded = String::with_capacity(segment.len());
    for &byte in segment.as_bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
            encoded.push(char::from(byte));
        } else {
            let _ = write!(encoded, "%{byte:02X}");
        }
    }
    encoded
}

/// Turn a decoded URL path into a path relative to the document root
///
/// Empty and `.` segments are dropped and `..` removes the previous segment,
/// never going above the root. Returns `None` for paths containing NUL.
pub fn normalize(decoded: &str) -> Option<PathBuf> {
    if decoded.contains('\0') {
        return None;
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s if cfg!(windows) && (s.contains('\\') || s.contains(':')) => return None,
            s => segments.push(s),
        }
    }
    Some(segments.iter().collect())
}

/// Escape text for inclusion in HTML content or attribute values
pub fn html_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_percent_decode() {
        assert_eq!(percent_decode("/my%20file.txt"), "/my file.txt");
        assert_eq!(percent_decode("/caf%C3%A9"), "/café");
        assert_eq!(percent_decode("/100%"), "/100%");
        assert_eq!(percent_decode("/%zz/%4"), "/%zz/%4");
        assert_eq!(percent_decode("/%2e%2E/x"), "/../x");
    }

    #[test]
    fn test_percent_encode_segment() {
        assert_eq!(percent_encode_segment("a b.txt"), "a%20b.txt");
        assert_eq!(percent_encode_segment("café"), "caf%C3%A9");
        assert_eq!(percent_encode_segment("x?y#z"), "x%3Fy%23z");
    }

    #[test]
    fn test_normalize_plain() {
        assert_eq!(normalize("/").unwrap(), Path::new(""));
        assert_eq!(normalize("/a/b.txt").unwrap(), Path::new("a/b.txt"));
        assert_eq!(normalize("//a/./b/").unwrap(), Path::new("a/b"));
    }

    #[test]
    fn test_normalize_never_climbs_above_root() {
        assert_eq!(normalize("/../etc/passwd").unwrap(), Path::new("etc/passwd"));
        assert_eq!(normalize("/a/../../b").unwrap(), Path::new("b"));
        assert_eq!(normalize("/a/b/../c").unwrap(), Path::new("a/c"));
        assert!(normalize("/a\0b").is_none());
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<a href="x">&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#x27;&lt;/a&gt;"
        );
    }
}
