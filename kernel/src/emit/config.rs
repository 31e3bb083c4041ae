// Emitter Configuration
//
// Knobs for the declaration emitter, loadable from JSON.

use serde::{Deserialize, Serialize};

/// Resource type written when none is configured.
pub const DEFAULT_RESOURCE_TYPE: &str = "elasticstack_fleet_integration_policy";

/// What to do with a stream payload that cannot be re-encoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamErrorPolicy {
    /// Log the problem, leave the stream out and keep going.
    #[default]
    Skip,

    /// Abort the whole emission.
    Fail,
}

/// Emitter configuration loaded from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitConfig {
    pub resource_type: String,
    pub stream_errors: StreamErrorPolicy,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            resource_type: DEFAULT_RESOURCE_TYPE.into(),
            stream_errors: StreamErrorPolicy::Skip,
        }
    }
}
