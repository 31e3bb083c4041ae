// Nested Fragment Re-encoder
//
// Renders loosely-typed JSON values back into indented text so they can be
// embedded inside a `jsonencode(...)` expression of the declaration.

use std::string::FromUtf8Error;

use serde_json::Value;

pub mod escape;
pub mod hcl;

/// Spaces added per nesting level.
pub const NEST_WIDTH: usize = 2;

/// Errors produced while re-encoding a value.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("stream payload must be an object, found {found}")]
    NotAnObject { found: &'static str },

    #[error("failed to serialize payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("serialized payload is not UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),
}

/// Render `value` as pretty JSON.
///
/// Each nesting level adds [`NEST_WIDTH`] spaces and every line after the
/// first is prefixed with `indent` spaces, so the fragment lines up when it
/// is written inline after a key. Object keys come out in lexicographic
/// order.
pub fn render(value: &Value, indent: usize) -> Result<String, RenderError> {
    Ok(indent_lines(&serde_json::to_string_pretty(value)?, indent))
}

/// Like [`render`], but string tokens are also valid declaration strings.
///
/// `${` / `%{` are doubled and backspace / form feed are written as
/// `\u0008` / `\u000c`. Undoing the doubling gives back [`render`]'s JSON.
pub fn render_hcl(value: &Value, indent: usize) -> Result<String, RenderError> {
    Ok(indent_lines(&hcl::to_string_pretty(value)?, indent))
}

/// Render a stream payload for the declaration.
///
/// Streams are string-keyed configuration objects; `null` is passed through
/// and every other shape is rejected.
pub fn render_stream(value: &Value, indent: usize) -> Result<String, RenderError> {
    match value {
        Value::Object(_) | Value::Null => render_hcl(value, indent),
        other => Err(RenderError::NotAnObject {
            found: kind(other),
        }),
    }
}

// Pretty JSON escapes newlines inside strings, so every '\n' here is
// structural.
fn indent_lines(pretty: &str, indent: usize) -> String {
    if indent == 0 {
        return pretty.to_owned();
    }

    let prefix = " ".repeat(indent);
    let mut out = String::with_capacity(pretty.len() + prefix.len() * 8);
    for (i, line) in pretty.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
            out.push_str(&prefix);
        }
        out.push_str(line);
    }
    out
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_levels_are_indented_from_base() {
        let value = json!({ "paths": ["/var/log/nginx/access.log"] });

        let out = render(&value, 6).unwrap();

        assert_eq!(
            out,
            "{\n        \"paths\": [\n          \"/var/log/nginx/access.log\"\n        ]\n      }"
        );
    }

    #[test]
    fn zero_indent_is_plain_pretty_json() {
        let value = json!({ "a": 1 });
        assert_eq!(render(&value, 0).unwrap(), "{\n  \"a\": 1\n}");
    }

    #[test]
    fn keys_are_sorted() {
        let value: Value = serde_json::from_str(r#"{ "zeta": 1, "alpha": 2, "mid": 3 }"#).unwrap();

        let out = render(&value, 0).unwrap();

        let alpha = out.find("alpha").unwrap();
        let mid = out.find("mid").unwrap();
        let zeta = out.find("zeta").unwrap();
        assert!(alpha < mid && mid < zeta, "unsorted output: {out}");
    }

    #[test]
    fn multiline_strings_stay_on_one_line() {
        let value = json!({ "processors": "- add_fields:\n    target: x" });

        let out = render(&value, 4).unwrap();

        assert_eq!(out.lines().count(), 3);
        let back: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn scalars_render_inline() {
        assert_eq!(render(&json!(true), 6).unwrap(), "true");
        assert_eq!(render(&json!("x"), 6).unwrap(), "\"x\"");
        assert_eq!(render(&json!({}), 6).unwrap(), "{}");
    }

    #[test]
    fn stream_payload_must_be_object() {
        let err = render_stream(&json!(["a", "b"]), 6).unwrap_err();
        assert!(matches!(err, RenderError::NotAnObject { found: "array" }));

        let err = render_stream(&json!("text"), 6).unwrap_err();
        assert_eq!(
            err.to_string(),
            "stream payload must be an object, found string"
        );
    }

    #[test]
    fn stream_payload_is_declaration_safe() {
        let value = json!({ "condition": "${kubernetes.labels.app} == 'web'", "sep": "a\u{8}b" });

        let out = render_stream(&value, 6).unwrap();

        assert_eq!(
            out,
            "{\n        \"condition\": \"$${kubernetes.labels.app} == 'web'\",\n        \"sep\": \"a\\u0008b\"\n      }"
        );
        // Plain rendering keeps JSON's own escapes.
        assert!(render(&value, 6).unwrap().contains(r#""a\bb""#));
    }

    #[test]
    fn null_stream_payload_passes_through() {
        assert_eq!(render_stream(&Value::Null, 6).unwrap(), "null");
    }
}
