// End-to-End Conversion
//
// Runs the full pipeline for one request:
// raw text → decode → precondition → emit → declaration

use crate::document::{decode, DecodeError, PreconditionError};
use crate::emit::{emit, EmitConfig, EmitError, Emission, StreamEncodeError};

/// Errors that abort a conversion.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    #[error(transparent)]
    Stream(#[from] StreamEncodeError),
}

impl From<EmitError> for ConvertError {
    fn from(err: EmitError) -> Self {
        match err {
            EmitError::Precondition(e) => ConvertError::Precondition(e),
            EmitError::Stream(e) => ConvertError::Stream(e),
        }
    }
}

/// Convert a raw integration policy into a resource declaration.
///
/// This function is:
/// - deterministic
/// - side-effect free apart from diagnostics
/// - safe to call concurrently
pub fn convert(raw: &str, config: &EmitConfig) -> Result<Emission, ConvertError> {
    // 1. Decode
    let doc = decode(raw)?;
    tracing::debug!(
        package = %doc.package.name,
        inputs = doc.inputs.len(),
        streams = doc.stream_count(),
        vars = doc.vars.len(),
        "decoded integration policy"
    );

    // 2. Emit (checks preconditions first)
    let emission = emit(&doc, config)?;

    tracing::info!(
        package = %doc.package.name,
        skipped = emission.skipped.len(),
        "converted integration policy"
    );

    Ok(emission)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::StreamErrorPolicy;
    use serde_json::{json, Value};

    const NGINX: &str = r#"{"package":{"name":"nginx","version":"1.0.0"},"name":"nginx-1","namespace":"","description":"d","policy_ids":["p1"],"inputs":{"nginx-logfile":{"enabled":true,"streams":{"access":{"paths":["/var/log/nginx/access.log"]}}}},"vars":{}}"#;

    /// Pull the `streams_json` object of the first input back out as JSON.
    fn streams_json(text: &str) -> Value {
        let start = text.find("streams_json = jsonencode(").unwrap() + "streams_json = jsonencode(".len();
        let end = text[start..].find("\n    })").unwrap() + start + "\n    }".len();
        // Keys are written as `"name" : ` which is also valid JSON.
        serde_json::from_str(&text[start..end]).unwrap()
    }

    #[test]
    fn nginx_scenario() {
        let emission = convert(NGINX, &EmitConfig::default()).unwrap();
        let text = &emission.text;

        assert!(text.starts_with(r#"resource "elasticstack_fleet_integration_policy" "nginx""#));
        assert!(text.contains(r#"namespace           = "default""#));
        assert_eq!(text.matches("  input {").count(), 1);
        assert!(text.contains(r#"input_id = "nginx-logfile""#));
        assert!(text.contains("enabled  = true"));
        assert!(!text.contains("vars_json"));
        assert_eq!(
            streams_json(text),
            json!({ "access": { "paths": ["/var/log/nginx/access.log"] } })
        );
        assert!(emission.is_complete());
    }

    #[test]
    fn decode_error_is_surfaced() {
        let err = convert("{ not json", &EmitConfig::default()).unwrap_err();
        assert!(matches!(err, ConvertError::Decode(DecodeError::Json(_))));
        assert!(err.to_string().starts_with("error parsing JSON"));
    }

    #[test]
    fn blank_input_is_a_decode_error() {
        let err = convert(" \n\t", &EmitConfig::default()).unwrap_err();
        assert!(matches!(err, ConvertError::Decode(DecodeError::Empty)));
        assert_eq!(err.to_string(), "no policy document provided");
    }

    #[test]
    fn missing_policy_ids_is_surfaced() {
        let err = convert(r#"{ "package": { "name": "nginx" } }"#, &EmitConfig::default())
            .unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Precondition(PreconditionError::MissingPolicyId)
        ));
    }

    #[test]
    fn strict_stream_failure_is_surfaced() {
        let raw = r#"{ "policy_ids": ["p"], "inputs": { "i": { "streams": { "s": [1] } } } }"#;
        let config = EmitConfig {
            stream_errors: StreamErrorPolicy::Fail,
            ..EmitConfig::default()
        };

        let err = convert(raw, &config).unwrap_err();

        match err {
            ConvertError::Stream(e) => {
                assert_eq!(e.input_id, "i");
                assert_eq!(e.stream, "s");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
