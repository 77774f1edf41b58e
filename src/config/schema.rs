//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root configuration for the header patching server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PatchConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Response header policy applied to every request.
    pub policy: PolicyConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// File representation of a header policy.
///
/// The callback stage has no file form; it can only be attached in code.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct PolicyConfig {
    /// Header names to keep.
    pub allow: Option<Vec<String>>,

    /// Header names to strip.
    pub remove: Option<Vec<String>>,

    /// Headers to set. A `null` value (JSON only) is skipped.
    #[serde(rename = "static")]
    pub static_headers: Option<BTreeMap<String, Option<StaticValue>>>,
}

/// Value of a static header entry: one value or several.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum StaticValue {
    One(String),
    Many(Vec<String>),
}

impl StaticValue {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let values: &[String] = match self {
            StaticValue::One(v) => std::slice::from_ref(v),
            StaticValue::Many(v) => v,
        };
        values.iter().map(String::as_str)
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
