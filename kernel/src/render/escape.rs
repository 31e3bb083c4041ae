// Declaration String Literals
//
// Quoting for values written into the declaration, and the template
// escaping shared with the re-encoded JSON fragments.

use std::borrow::Cow;
use std::fmt::Write;

/// Quote `value` as a declaration string literal.
///
/// Escapes quotes, backslashes and control characters, and doubles the
/// `${` / `%{` template introducers so the value is never interpolated.
pub fn hcl_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');

    for c in escape_templates(value).chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                // Writing into a String cannot fail.
                let _ = write!(out, "\\u{:04x}", u32::from(c));
            }
            c => out.push(c),
        }
    }

    out.push('"');
    out
}

/// Double every `${` and `%{` so the text is read literally inside a
/// declaration string.
pub fn escape_templates(text: &str) -> Cow<'_, str> {
    if !text.contains("${") && !text.contains("%{") {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 4);
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        out.push(c);
        if matches!(c, '$' | '%') && chars.peek() == Some(&'{') {
            out.push(c);
        }
    }
    Cow::Owned(out)
}
