//! Toolchain-provided values
//!
//! Build scripts refer to values owned by the external toolchain, such as
//! `flutter.compileSdkVersion` or `flutter.versionCode`. Resolution looks
//! them up through [`ToolchainValues`] instead of hardcoding them.

use droidconf_core::config::{ConfigSchema, ToolchainEntry};
use droidconf_core::properties::Properties;
use std::collections::BTreeMap;
use std::fmt;

/// A value supplied by the toolchain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolchainValue {
    Integer(i64),
    Text(String),
}

impl ToolchainValue {
    /// Interpret as an SDK level or version code
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Self::Integer(i) => u32::try_from(*i).ok(),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Interpret as text
    pub fn as_text(&self) -> String {
        match self {
            Self::Integer(i) => i.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

impl fmt::Display for ToolchainValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{}", i),
            Self::Text(s) => write!(f, "\"{}\"", s),
        }
    }
}

impl From<&ToolchainEntry> for ToolchainValue {
    fn from(entry: &ToolchainEntry) -> Self {
        match entry {
            ToolchainEntry::Integer(i) => Self::Integer(*i),
            ToolchainEntry::Text(s) => Self::Text(s.clone()),
        }
    }
}

/// Lookup interface for toolchain values
pub trait ToolchainValues {
    /// Look up a reference such as `flutter.targetSdkVersion`
    fn lookup(&self, key: &str) -> Option<ToolchainValue>;

    /// Short description for log output
    fn describe(&self) -> String {
        "toolchain".to_string()
    }
}

impl<T: ToolchainValues + ?Sized> ToolchainValues for &T {
    fn lookup(&self, key: &str) -> Option<ToolchainValue> {
        (**self).lookup(key)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl<T: ToolchainValues + ?Sized> ToolchainValues for Box<T> {
    fn lookup(&self, key: &str) -> Option<ToolchainValue> {
        (**self).lookup(key)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Toolchain that knows nothing; every reference stays unresolved
#[derive(Debug, Clone, Copy, Default)]
pub struct NoToolchain;

impl ToolchainValues for NoToolchain {
    fn lookup(&self, _key: &str) -> Option<ToolchainValue> {
        None
    }

    fn describe(&self) -> String {
        "none".to_string()
    }
}

/// Map-backed toolchain, typically the `[toolchain]` table of the tool configuration
#[derive(Debug, Clone, Default)]
pub struct MapToolchain {
    values: BTreeMap<String, ToolchainValue>,
}

impl MapToolchain {
    /// Empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value
    pub fn with(mut self, key: impl Into<String>, value: ToolchainValue) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    /// Build from the tool configuration
    pub fn from_config(schema: &ConfigSchema) -> Self {
        Self {
            values: schema
                .toolchain
                .iter()
                .map(|(k, v)| (k.clone(), ToolchainValue::from(v)))
                .collect(),
        }
    }

    /// Number of known values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ToolchainValues for MapToolchain {
    fn lookup(&self, key: &str) -> Option<ToolchainValue> {
        self.values.get(key).cloned()
    }

    fn describe(&self) -> String {
        format!("config ({} values)", self.values.len())
    }
}

/// Toolchain backed by a `.properties` file such as Flutter's `local.properties`
#[derive(Debug, Clone)]
pub struct PropertiesToolchain {
    properties: Properties,
    origin: String,
}

impl PropertiesToolchain {
    /// Wrap parsed properties; `origin` is used in log output
    pub fn new(properties: Properties, origin: impl Into<String>) -> Self {
        Self {
            properties,
            origin: origin.into(),
        }
    }
}

impl ToolchainValues for PropertiesToolchain {
    /// Values stay text as written; [`ToolchainValue::as_u32`] parses them on demand
    fn lookup(&self, key: &str) -> Option<ToolchainValue> {
        self.properties
            .get(key)
            .map(|raw| ToolchainValue::Text(raw.to_string()))
    }

    fn describe(&self) -> String {
        self.origin.clone()
    }
}

/// Layers of toolchains, consulted in order; the first hit wins
#[derive(Default)]
pub struct LayeredToolchain {
    layers: Vec<Box<dyn ToolchainValues>>,
}

impl LayeredToolchain {
    /// No layers
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a layer with lower precedence than the existing ones
    pub fn push(&mut self, layer: impl ToolchainValues + 'static) {
        self.layers.push(Box::new(layer));
    }

    /// Builder form of [`LayeredToolchain::push`]
    pub fn with(mut self, layer: impl ToolchainValues + 'static) -> Self {
        self.push(layer);
        self
    }

    /// Number of layers
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// True when there are no layers
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl fmt::Debug for LayeredToolchain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayeredToolchain")
            .field("layers", &self.describe())
            .finish()
    }
}

impl ToolchainValues for LayeredToolchain {
    fn lookup(&self, key: &str) -> Option<ToolchainValue> {
        self.layers.iter().find_map(|layer| {
            let value = layer.lookup(key)?;
            tracing::trace!(key, source = %layer.describe(), "Toolchain value found");
            Some(value)
        })
    }

    fn describe(&self) -> String {
        let names: Vec<String> = self.layers.iter().map(|l| l.describe()).collect();
        names.join(" > ")
    }
}
