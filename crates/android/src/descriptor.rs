//! Declarative build descriptor model
//!
//! Mirrors the structure of an `android/app/build.gradle.kts`: a plugin
//! list, the `android` block with its nested `defaultConfig`, `buildTypes`,
//! `compileOptions` and `kotlinOptions` blocks, the `flutter` block and the
//! dependency list. Keys use Gradle's camelCase names in TOML and JSON.
//!
//! Values the toolchain provides (`flutter.compileSdkVersion`) are kept as
//! references and only become concrete during resolution.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A declared value: either written out or a toolchain reference
///
/// In TOML a reference is written `compileSdk = { ref = "flutter.compileSdkVersion" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value<T> {
    Literal(T),
    Reference {
        #[serde(rename = "ref")]
        reference: String,
    },
}

impl<T> Value<T> {
    /// Build a reference value
    pub fn reference(reference: impl Into<String>) -> Self {
        Self::Reference {
            reference: reference.into(),
        }
    }

    /// Reference text, if this is a reference
    pub fn as_reference(&self) -> Option<&str> {
        match self {
            Self::Reference { reference } => Some(reference),
            Self::Literal(_) => None,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Value<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(v) => v.fmt(f),
            Self::Reference { reference } => f.write_str(reference),
        }
    }
}

/// Root of a build descriptor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Declaration {
    /// Applied plugin ids, opaque to resolution
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<String>,

    #[serde(default)]
    pub android: AndroidBlock,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flutter: Option<FlutterBlock>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<DependencyDeclaration>,
}

/// `android { ... }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AndroidBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compile_sdk: Option<Value<u32>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ndk_version: Option<Value<String>>,

    #[serde(default, skip_serializing_if = "DefaultConfig::is_empty")]
    pub default_config: DefaultConfig,

    #[serde(default, skip_serializing_if = "CompileOptions::is_empty")]
    pub compile_options: CompileOptions,

    #[serde(default, skip_serializing_if = "KotlinOptions::is_empty")]
    pub kotlin_options: KotlinOptions,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub build_types: BTreeMap<String, BuildType>,
}

/// `android.defaultConfig { ... }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DefaultConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_sdk: Option<Value<u32>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_sdk: Option<Value<u32>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_code: Option<Value<u32>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_name: Option<Value<String>>,
}

impl DefaultConfig {
    /// True when nothing is declared
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// `android.compileOptions { ... }`
///
/// Levels are kept as written minus any `JavaVersion.` qualifier;
/// resolution decides whether they are supported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompileOptions {
    #[serde(default, deserialize_with = "java_level", skip_serializing_if = "Option::is_none")]
    pub source_compatibility: Option<String>,

    #[serde(default, deserialize_with = "java_level", skip_serializing_if = "Option::is_none")]
    pub target_compatibility: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_core_library_desugaring_enabled: Option<bool>,
}

impl CompileOptions {
    /// True when nothing is declared
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Drop the `JavaVersion.` qualifier so `VERSION_17` and
/// `JavaVersion.VERSION_17` are stored the same way
pub fn java_level_spelling(raw: &str) -> &str {
    raw.strip_prefix("JavaVersion.").unwrap_or(raw)
}

fn java_level<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.map(|r| java_level_spelling(&r).to_string()))
}

/// `android.kotlinOptions { ... }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct KotlinOptions {
    #[serde(default, deserialize_with = "java_level", skip_serializing_if = "Option::is_none")]
    pub jvm_target: Option<String>,
}

impl KotlinOptions {
    /// True when nothing is declared
    pub fn is_empty(&self) -> bool {
        self.jvm_target.is_none()
    }
}

/// One entry of `android.buildTypes`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BuildType {
    /// Name of the signing config this build type uses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing_config: Option<String>,
}

impl BuildType {
    /// Build type signed with the named config
    pub fn signed_with(name: impl Into<String>) -> Self {
        Self {
            signing_config: Some(name.into()),
        }
    }
}

/// `flutter { ... }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FlutterBlock {
    /// Path to the Flutter project root, relative to the app module
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Configuration used when a dependency does not name one
pub const DEFAULT_DEPENDENCY_CONFIGURATION: &str = "implementation";

/// One dependency: `configuration("group:artifact:version")`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DependencyDeclaration {
    #[serde(default = "default_configuration")]
    pub configuration: String,

    /// `group:artifact`
    pub coordinate: String,

    #[serde(default)]
    pub version: String,
}

fn default_configuration() -> String {
    DEFAULT_DEPENDENCY_CONFIGURATION.to_string()
}

impl DependencyDeclaration {
    /// Create a dependency
    pub fn new(
        configuration: impl Into<String>,
        coordinate: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            configuration: configuration.into(),
            coordinate: coordinate.into(),
            version: version.into(),
        }
    }

    /// Split Gradle string notation `group:artifact[:version[:classifier]]`
    ///
    /// Everything after the artifact is kept as the version so classifiers
    /// survive a render/parse cycle.
    pub fn from_notation(configuration: impl Into<String>, notation: &str) -> Self {
        let mut parts = notation.splitn(3, ':');
        let group = parts.next().unwrap_or_default();
        let coordinate = match parts.next() {
            Some(artifact) => format!("{}:{}", group, artifact),
            None => group.to_string(),
        };
        let version = parts.next().unwrap_or_default();
        Self::new(configuration, coordinate, version)
    }

    /// Gradle string notation
    pub fn notation(&self) -> String {
        if self.version.is_empty() {
            self.coordinate.clone()
        } else {
            format!("{}:{}", self.coordinate, self.version)
        }
    }
}

impl fmt::Display for DependencyDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(\"{}\")", self.configuration, self.notation())
    }
}
