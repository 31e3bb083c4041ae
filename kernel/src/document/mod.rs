// Integration Policy Document
//
// Typed view of a Fleet integration policy as exported by Kibana,
// and the decoder that builds it from raw JSON text.
// Decoding is shape-only: no Elastic-specific meaning is checked here.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Namespace used when the document leaves it absent or empty.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Decoded integration policy.
///
/// Maps are ordered so every walk over them is lexicographic by key.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Document {
    #[serde(deserialize_with = "null_as_default")]
    pub package: Package,

    #[serde(deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(deserialize_with = "null_as_default")]
    pub description: String,

    #[serde(deserialize_with = "null_as_default")]
    pub namespace: String,

    #[serde(deserialize_with = "null_as_default")]
    pub policy_ids: Vec<String>,

    #[serde(deserialize_with = "null_as_default")]
    pub inputs: BTreeMap<String, Input>,

    #[serde(deserialize_with = "null_as_default")]
    pub vars: BTreeMap<String, String>,
}

/// Integration package identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Package {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(deserialize_with = "null_as_default")]
    pub version: String,
}

/// A named input and its raw stream payloads.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Input {
    #[serde(deserialize_with = "null_as_default")]
    pub enabled: bool,

    /// Stream payloads are kept loosely typed; the emitter checks their shape.
    #[serde(deserialize_with = "null_as_default")]
    pub streams: BTreeMap<String, Value>,
}

/// Raw text could not be decoded into a [`Document`].
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("no policy document provided")]
    Empty,

    #[error("error parsing JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Document is missing something emission cannot do without.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PreconditionError {
    #[error("policy_ids is empty: at least one agent policy id is required")]
    MissingPolicyId,
}

impl Document {
    /// Namespace with the default rule applied.
    pub fn effective_namespace(&self) -> &str {
        if self.namespace.is_empty() {
            DEFAULT_NAMESPACE
        } else {
            &self.namespace
        }
    }

    /// The agent policy this integration is attached to.
    ///
    /// Only the first entry of `policy_ids` is used.
    pub fn agent_policy_id(&self) -> Result<&str, PreconditionError> {
        self.policy_ids
            .first()
            .map(String::as_str)
            .ok_or(PreconditionError::MissingPolicyId)
    }

    /// Total number of streams across all inputs.
    pub fn stream_count(&self) -> usize {
        self.inputs.values().map(|input| input.streams.len()).sum()
    }
}

/// Decode raw JSON text into a [`Document`].
///
/// Unknown fields are ignored and missing ones take their zero value.
/// Field names match exactly, and a field given twice is an error.
pub fn decode(raw: &str) -> Result<Document, DecodeError> {
    if raw.trim().is_empty() {
        return Err(DecodeError::Empty);
    }
    Ok(serde_json::from_str(raw)?)
}

/// Treat an explicit JSON `null` like an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
