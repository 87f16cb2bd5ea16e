//! String escaping for quoted literals

use std::fmt::Write;

/// Append `s` as a double-quoted literal
pub fn write_quoted(out: &mut String, s: &str) {
    out.reserve(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

/// Resolve escape sequences in the body of a quoted literal
///
/// On failure returns the byte offset of the bad sequence inside `body` and a
/// message. Unknown escapes keep the escaped character.
pub fn unescape(body: &str) -> Result<String, (usize, &'static str)> {
    if !body.contains('\\') {
        return Ok(body.to_owned());
    }

    let mut out = String::with_capacity(body.len());
    let mut chars = body.char_indices();
    while let Some((index, c)) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some((_, escaped)) = chars.next() else {
            return Err((index, "dangling escape at end of string"));
        };
        match escaped {
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'u' => {
                let hex: String = chars.by_ref().take(4).map(|(_, h)| h).collect();
                let decoded = (hex.len() == 4)
                    .then(|| u32::from_str_radix(&hex, 16).ok())
                    .flatten()
                    .and_then(char::from_u32)
                    .ok_or((index, "invalid unicode escape"))?;
                out.push(decoded);
            }
            other => out.push(other),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quoted(s: &str) -> String {
        let mut out = String::new();
        write_quoted(&mut out, s);
        out
    }

    #[test]
    fn test_escapes_quotes_and_backslashes() {
        assert_eq!(quoted(r#"say "hi" \o/"#), r#""say \"hi\" \\o/""#);
    }

    #[test]
    fn test_control_characters() {
        assert_eq!(quoted("a\nb\u{1}"), "\"a\\nb\\u0001\"");
        assert_eq!(unescape("a\\nb\\u0001"), Ok("a\nb\u{1}".to_string()));
    }

    #[test]
    fn test_bad_escapes() {
        assert_eq!(unescape("abc\\"), Err((3, "dangling escape at end of string")));
        assert_eq!(unescape("\\u12"), Err((0, "invalid unicode escape")));
        assert_eq!(unescape("\\q"), Ok("q".to_string()));
    }
}
