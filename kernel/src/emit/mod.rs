// Declaration Emitter
//
// Walks a decoded integration policy and writes the Terraform resource
// declaration for it. Pure and deterministic: the same document and config
// always produce the same bytes.

use crate::document::{Document, PreconditionError};
use crate::render::escape::hcl_string;
use crate::render::{render_stream, RenderError};

pub mod config;

pub use config::{EmitConfig, StreamErrorPolicy};

/// Base indentation of stream payloads inside `streams_json`.
const STREAM_INDENT: usize = 6;

/// A stream payload that could not be re-encoded.
#[derive(Debug, thiserror::Error)]
#[error("input `{input_id}` stream `{stream}`: {source}")]
pub struct StreamEncodeError {
    pub input_id: String,
    pub stream: String,
    #[source]
    pub source: RenderError,
}

/// Errors that abort an emission.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error("precondition failed: {0}")]
    Precondition(#[from] PreconditionError),

    #[error("stream encoding failed: {0}")]
    Stream(#[from] StreamEncodeError),
}

/// Result of a successful emission.
#[derive(Debug)]
pub struct Emission {
    /// The declaration text, newline terminated.
    pub text: String,

    /// Streams left out under [`StreamErrorPolicy::Skip`].
    pub skipped: Vec<StreamEncodeError>,
}

impl Emission {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Emit the declaration for `doc`.
///
/// Inputs, streams and vars are written in lexicographic key order.
/// Fails before writing anything if the document has no agent policy id.
pub fn emit(doc: &Document, config: &EmitConfig) -> Result<Emission, EmitError> {
    let agent_policy_id = doc.agent_policy_id()?;

    let mut out = String::new();
    let mut skipped = Vec::new();

    out.push_str(&format!(
        "resource {} {} {{\n",
        hcl_string(&config.resource_type),
        hcl_string(&doc.package.name)
    ));
    attribute(&mut out, "name", &doc.name);
    attribute(&mut out, "namespace", doc.effective_namespace());
    attribute(&mut out, "description", &doc.description);
    attribute(&mut out, "agent_policy_id", agent_policy_id);
    attribute(&mut out, "integration_name", &doc.package.name);
    attribute(&mut out, "integration_version", &doc.package.version);

    if !doc.vars.is_empty() {
        let entries: Vec<String> = doc
            .vars
            .iter()
            .map(|(key, value)| format!("    {} : {}", hcl_string(key), hcl_string(value)))
            .collect();
        json_object(&mut out, "  vars_json", &entries, "  ");
    }

    for (input_id, input) in &doc.inputs {
        out.push_str("  input {\n");
        out.push_str(&format!("    input_id = {}\n", hcl_string(input_id)));
        out.push_str(&format!("    enabled  = {}\n", input.enabled));

        let mut entries = Vec::with_capacity(input.streams.len());
        for (stream, payload) in &input.streams {
            match render_stream(payload, STREAM_INDENT) {
                Ok(rendered) => {
                    entries.push(format!("      {} : {}", hcl_string(stream), rendered));
                }
                Err(source) => {
                    let err = StreamEncodeError {
                        input_id: input_id.clone(),
                        stream: stream.clone(),
                        source,
                    };
                    if config.stream_errors == StreamErrorPolicy::Fail {
                        return Err(err.into());
                    }
                    tracing::warn!(
                        input_id = %input_id,
                        stream = %stream,
                        error = %err.source,
                        "skipping stream that could not be encoded"
                    );
                    skipped.push(err);
                }
            }
        }
        json_object(&mut out, "    streams_json", &entries, "    ");

        out.push_str("  }\n");
    }

    out.push_str("}\n");

    Ok(Emission { text: out, skipped })
}

/// Emit with the built-in configuration.
pub fn emit_default(doc: &Document) -> Result<Emission, EmitError> {
    emit(doc, &EmitConfig::default())
}

/// Write an aligned top-level string attribute.
fn attribute(out: &mut String, name: &str, value: &str) {
    out.push_str(&format!("  {:<19} = {}\n", name, hcl_string(value)));
}

/// Write `<lead> = jsonencode({ ... })` with pre-rendered entry lines.
///
/// Entries are joined without a trailing comma; no entries gives `({})`.
fn json_object(out: &mut String, lead: &str, entries: &[String], close_indent: &str) {
    if entries.is_empty() {
        out.push_str(&format!("{lead} = jsonencode({{}})\n"));
        return;
    }
    out.push_str(&format!("{lead} = jsonencode({{\n"));
    out.push_str(&entries.join(",\n"));
    out.push_str(&format!("\n{close_indent}}})\n"));
}
