//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ConfigSchema {
    /// Toolchain-provided values, keyed by their reference (`flutter.compileSdkVersion`)
    #[serde(default)]
    pub toolchain: BTreeMap<String, ToolchainEntry>,

    /// Named signing configs available to build types
    #[serde(default)]
    pub signing: BTreeMap<String, SigningEntry>,

    #[serde(default)]
    pub resolve: ResolveConfig,
}

/// A toolchain value as written in the configuration file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolchainEntry {
    Integer(i64),
    Text(String),
}

/// Signing config metadata
///
/// Only the name matters for resolution; the remaining fields are carried
/// through for the external build executor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_file: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_alias: Option<String>,
}

/// Resolution behaviour
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolveConfig {
    /// Treat lint warnings as errors
    #[serde(default)]
    pub strict: bool,

    /// Properties file consulted for toolchain values, relative to the descriptor
    #[serde(default = "default_properties")]
    pub properties: Option<String>,

    /// Register the implicit `debug` signing config
    #[serde(default = "default_true")]
    pub implicit_debug_signing: bool,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            strict: false,
            properties: default_properties(),
            implicit_debug_signing: true,
        }
    }
}

fn default_properties() -> Option<String> {
    Some("../local.properties".to_string())
}

fn default_true() -> bool {
    true
}
