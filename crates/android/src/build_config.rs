//! The resolved build configuration handed to the build executor

use crate::descriptor::{
    AndroidBlock, BuildType, CompileOptions, Declaration, DefaultConfig, DependencyDeclaration,
    FlutterBlock, KotlinOptions, Value,
};
use crate::language::LanguageLevel;
use serde::Serialize;
use std::collections::BTreeMap;

/// Build type whose signing config counts as "the" signing reference
pub const RELEASE_BUILD_TYPE: &str = "release";

/// Validated configuration with every toolchain reference made concrete
///
/// Only [`crate::resolver::resolve`] constructs it; it has no setters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfig {
    pub(crate) application_id: String,
    pub(crate) namespace: String,
    pub(crate) min_sdk: u32,
    pub(crate) target_sdk: u32,
    pub(crate) compile_sdk: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) version_code: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) version_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) ndk_version: Option<String>,
    pub(crate) source_compatibility: LanguageLevel,
    pub(crate) target_compatibility: LanguageLevel,
    pub(crate) jvm_target: LanguageLevel,
    pub(crate) core_library_desugaring: bool,
    pub(crate) plugins: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) flutter_source: Option<String>,
    pub(crate) build_types: BTreeMap<String, BuildType>,
    pub(crate) dependencies: Vec<DependencyDeclaration>,
}

impl BuildConfig {
    pub fn application_id(&self) -> &str {
        &self.application_id
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn min_sdk(&self) -> u32 {
        self.min_sdk
    }

    pub fn target_sdk(&self) -> u32 {
        self.target_sdk
    }

    pub fn compile_sdk(&self) -> u32 {
        self.compile_sdk
    }

    pub fn version_code(&self) -> Option<u32> {
        self.version_code
    }

    pub fn version_name(&self) -> Option<&str> {
        self.version_name.as_deref()
    }

    pub fn ndk_version(&self) -> Option<&str> {
        self.ndk_version.as_deref()
    }

    pub fn source_compatibility(&self) -> LanguageLevel {
        self.source_compatibility
    }

    pub fn target_compatibility(&self) -> LanguageLevel {
        self.target_compatibility
    }

    /// Kotlin JVM target
    pub fn jvm_target(&self) -> LanguageLevel {
        self.jvm_target
    }

    /// Whether core library desugaring is enabled
    pub fn core_library_desugaring(&self) -> bool {
        self.core_library_desugaring
    }

    pub fn plugins(&self) -> &[String] {
        &self.plugins
    }

    pub fn flutter_source(&self) -> Option<&str> {
        self.flutter_source.as_deref()
    }

    pub fn build_types(&self) -> &BTreeMap<String, BuildType> {
        &self.build_types
    }

    pub fn dependencies(&self) -> &[DependencyDeclaration] {
        &self.dependencies
    }

    /// Signing config used by the `release` build type
    pub fn signing_config(&self) -> Option<&str> {
        self.build_types
            .get(RELEASE_BUILD_TYPE)
            .and_then(|bt| bt.signing_config.as_deref())
    }

    /// Dependencies declared under one configuration
    pub fn dependencies_in<'a>(
        &'a self,
        configuration: &'a str,
    ) -> impl Iterator<Item = &'a DependencyDeclaration> + 'a {
        self.dependencies
            .iter()
            .filter(move |d| d.configuration == configuration)
    }

    /// Write the configuration back out in declarative form
    ///
    /// Every value is concrete, so the result resolves to an equal
    /// configuration without consulting the toolchain.
    pub fn to_declaration(&self) -> Declaration {
        Declaration {
            plugins: self.plugins.clone(),
            android: AndroidBlock {
                namespace: Some(self.namespace.clone()),
                compile_sdk: Some(Value::Literal(self.compile_sdk)),
                ndk_version: self.ndk_version.clone().map(Value::Literal),
                default_config: DefaultConfig {
                    application_id: Some(self.application_id.clone()),
                    min_sdk: Some(Value::Literal(self.min_sdk)),
                    target_sdk: Some(Value::Literal(self.target_sdk)),
                    version_code: self.version_code.map(Value::Literal),
                    version_name: self.version_name.clone().map(Value::Literal),
                },
                compile_options: CompileOptions {
                    source_compatibility: Some(self.source_compatibility.gradle_constant().to_string()),
                    target_compatibility: Some(self.target_compatibility.gradle_constant().to_string()),
                    is_core_library_desugaring_enabled: Some(self.core_library_desugaring),
                },
                kotlin_options: KotlinOptions {
                    jvm_target: Some(self.jvm_target.jvm_target().to_string()),
                },
                build_types: self.build_types.clone(),
            },
            flutter: self.flutter_source.as_ref().map(|source| FlutterBlock {
                source: Some(source.clone()),
            }),
            dependencies: self.dependencies.clone(),
        }
    }
}
