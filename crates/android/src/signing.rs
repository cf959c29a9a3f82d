//! Signing config registry
//!
//! Build types refer to signing configs by name. The registry is defined
//! outside the descriptor (the Android Gradle Plugin always provides
//! `debug`; others come from the tool configuration). Keystores are never
//! opened here.

use droidconf_core::config::{expand_path, ConfigSchema};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Name of the signing config the Android Gradle Plugin always defines
pub const DEBUG_SIGNING_CONFIG: &str = "debug";

/// A named signing config
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningConfig {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_alias: Option<String>,
}

impl SigningConfig {
    /// Config with a name only
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            store_file: None,
            key_alias: None,
        }
    }
}

/// Registry of signing configs, keyed by name
#[derive(Debug, Clone, Default)]
pub struct SigningRegistry {
    configs: BTreeMap<String, SigningConfig>,
}

impl SigningRegistry {
    /// Empty registry
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry containing the implicit `debug` config
    pub fn with_debug() -> Self {
        let mut registry = Self::empty();
        registry.register(SigningConfig::named(DEBUG_SIGNING_CONFIG));
        registry
    }

    /// Build from the tool configuration
    pub fn from_config(schema: &ConfigSchema) -> Self {
        let mut registry = if schema.resolve.implicit_debug_signing {
            Self::with_debug()
        } else {
            Self::empty()
        };

        for (name, entry) in &schema.signing {
            registry.register(SigningConfig {
                name: name.clone(),
                store_file: entry.store_file.as_deref().map(expand_path),
                key_alias: entry.key_alias.clone(),
            });
        }

        registry
    }

    /// Add or replace a config
    pub fn register(&mut self, config: SigningConfig) {
        self.configs.insert(config.name.clone(), config);
    }

    /// Builder form of [`SigningRegistry::register`]
    pub fn with(mut self, config: SigningConfig) -> Self {
        self.register(config);
        self
    }

    /// True when the name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.configs.contains_key(name)
    }

    /// Look up a config
    pub fn get(&self, name: &str) -> Option<&SigningConfig> {
        self.configs.get(name)
    }

    /// Registered names in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.configs.keys().map(String::as_str)
    }

    /// Number of registered configs
    pub fn len(&self) -> usize {
        self.configs.len()
    }

    /// True when nothing is registered
    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_debug() {
        let registry = SigningRegistry::with_debug();
        assert!(registry.contains("debug"));
        assert!(!registry.contains("release"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_from_config() {
        let schema: ConfigSchema = toml::from_str(
            "[signing.release]\nstore_file = \"keys/release.jks\"\nkey_alias = \"upload\"\n",
        )
        .unwrap();
        let registry = SigningRegistry::from_config(&schema);

        assert!(registry.contains("debug"));
        let release = registry.get("release").unwrap();
        assert_eq!(release.key_alias.as_deref(), Some("upload"));
        assert_eq!(release.store_file.as_deref(), Some(std::path::Path::new("keys/release.jks")));
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["debug", "release"]);
    }

    #[test]
    fn test_from_config_without_implicit_debug() {
        let schema: ConfigSchema =
            toml::from_str("[resolve]\nimplicit_debug_signing = false\n").unwrap();
        let registry = SigningRegistry::from_config(&schema);
        assert!(registry.is_empty());
    }
}
