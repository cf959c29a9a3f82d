//! Build configuration resolver
//!
//! Turns a [`Declaration`] into a [`BuildConfig`]:
//!
//! 1. plugin ids are present
//! 2. the application id is known
//! 3. SDK levels resolve to integers and satisfy `minSdk <= targetSdk <= compileSdk`
//! 4. version code/name and NDK version resolve
//! 5. language levels are supported
//! 6. signing configs exist in the registry
//! 7. dependencies are well formed and unique by coordinate
//!
//! The first failure is returned; nothing is produced on failure.

use crate::build_config::{BuildConfig, RELEASE_BUILD_TYPE};
use crate::descriptor::{Declaration, Value};
use crate::error::{ConfigError, ResolveResult};
use crate::language::LanguageLevel;
use crate::signing::{SigningRegistry, DEBUG_SIGNING_CONFIG};
use crate::toolchain::ToolchainValues;
use droidconf_core::validation::{ValidationError, ValidationResult, Validator};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Configuration name the Android Gradle Plugin uses for the desugaring library
pub const DESUGARING_CONFIGURATION: &str = "coreLibraryDesugaring";

static COORDINATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.\-]+:[A-Za-z0-9_.\-]+$").expect("valid regex"));

static CONFIGURATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid regex"));

/// Language level used when `compileOptions` leaves it out
const DEFAULT_LANGUAGE_LEVEL: LanguageLevel = LanguageLevel::Java8;

/// Resolver bound to a toolchain and a signing registry
pub struct Resolver<'a> {
    toolchain: &'a dyn ToolchainValues,
    registry: &'a SigningRegistry,
}

impl<'a> Resolver<'a> {
    /// Create a resolver
    pub fn new(toolchain: &'a dyn ToolchainValues, registry: &'a SigningRegistry) -> Self {
        Self {
            toolchain,
            registry,
        }
    }

    /// Resolve a declaration
    pub fn resolve(&self, declaration: &Declaration) -> ResolveResult<BuildConfig> {
        resolve(declaration, self.toolchain, self.registry)
    }
}

/// Validate a declaration and build the resolved configuration
pub fn resolve(
    declaration: &Declaration,
    toolchain: &dyn ToolchainValues,
    registry: &SigningRegistry,
) -> ResolveResult<BuildConfig> {
    let android = &declaration.android;
    let default_config = &android.default_config;

    check_plugins(&declaration.plugins)?;

    let application_id = non_empty(default_config.application_id.as_deref())
        .or_else(|| non_empty(android.namespace.as_deref()))
        .ok_or_else(|| ConfigError::MissingField {
            field: "android.defaultConfig.applicationId".to_string(),
        })?
        .to_string();
    let namespace = non_empty(android.namespace.as_deref())
        .unwrap_or(&application_id)
        .to_string();

    let compile_sdk = match &android.compile_sdk {
        Some(value) => resolve_sdk("android.compileSdk", value, toolchain)?,
        None => return Err(missing("android.compileSdk")),
    };
    let min_sdk = match &default_config.min_sdk {
        Some(value) => resolve_sdk("android.defaultConfig.minSdk", value, toolchain)?,
        None => return Err(missing("android.defaultConfig.minSdk")),
    };
    let target_sdk = match &default_config.target_sdk {
        Some(value) => resolve_sdk("android.defaultConfig.targetSdk", value, toolchain)?,
        None => compile_sdk,
    };

    if !(min_sdk <= target_sdk && target_sdk <= compile_sdk) {
        return Err(ConfigError::InvalidSdkOrdering {
            min_sdk,
            target_sdk,
            compile_sdk,
        });
    }

    let version_code = default_config
        .version_code
        .as_ref()
        .map(|v| resolve_version_code(v, toolchain))
        .transpose()?;
    let version_name = default_config
        .version_name
        .as_ref()
        .map(|v| resolve_text("android.defaultConfig.versionName", v, toolchain))
        .transpose()?;
    let ndk_version = android
        .ndk_version
        .as_ref()
        .map(|v| resolve_text("android.ndkVersion", v, toolchain))
        .transpose()?;

    let options = &android.compile_options;
    let source_compatibility = resolve_level(
        "android.compileOptions.sourceCompatibility",
        options.source_compatibility.as_deref(),
    )?
    .unwrap_or(DEFAULT_LANGUAGE_LEVEL);
    let target_compatibility = resolve_level(
        "android.compileOptions.targetCompatibility",
        options.target_compatibility.as_deref(),
    )?
    .unwrap_or(DEFAULT_LANGUAGE_LEVEL);
    let jvm_target = resolve_level(
        "android.kotlinOptions.jvmTarget",
        android.kotlin_options.jvm_target.as_deref(),
    )?
    .unwrap_or(target_compatibility);

    for (build_type, config) in &android.build_types {
        if let Some(name) = &config.signing_config {
            if !registry.contains(name) {
                return Err(ConfigError::UnknownSigningConfig {
                    build_type: build_type.clone(),
                    name: name.clone(),
                });
            }
        }
    }

    check_dependencies(declaration)?;

    let config = BuildConfig {
        application_id,
        namespace,
        min_sdk,
        target_sdk,
        compile_sdk,
        version_code,
        version_name,
        ndk_version,
        source_compatibility,
        target_compatibility,
        jvm_target,
        core_library_desugaring: options.is_core_library_desugaring_enabled.unwrap_or(false),
        plugins: declaration.plugins.clone(),
        flutter_source: declaration.flutter.as_ref().and_then(|f| f.source.clone()),
        build_types: android.build_types.clone(),
        dependencies: declaration.dependencies.clone(),
    };

    tracing::debug!(
        application_id = %config.application_id,
        min_sdk,
        target_sdk,
        compile_sdk,
        toolchain = %toolchain.describe(),
        "Build configuration resolved"
    );

    Ok(config)
}

/// Non-fatal findings on a resolved configuration
pub fn lint(config: &BuildConfig) -> ValidationResult {
    let has_desugaring_library = config.dependencies_in(DESUGARING_CONFIGURATION).next().is_some();

    Validator::new()
        .warning(config.jvm_target != config.target_compatibility, || {
            ValidationError::new(
                "android.kotlinOptions.jvmTarget",
                "JVM_TARGET_MISMATCH",
                "Kotlin jvmTarget differs from targetCompatibility",
            )
            .with_values(
                config.target_compatibility.jvm_target(),
                config.jvm_target.jvm_target(),
            )
        })
        .warning(config.source_compatibility > config.target_compatibility, || {
            ValidationError::new(
                "android.compileOptions.sourceCompatibility",
                "SOURCE_NEWER_THAN_TARGET",
                "sourceCompatibility is newer than targetCompatibility",
            )
            .with_values(
                format!("<= {}", config.target_compatibility),
                config.source_compatibility.to_string(),
            )
        })
        .warning(config.core_library_desugaring && !has_desugaring_library, || {
            ValidationError::new(
                "dependencies",
                "DESUGARING_LIBRARY_MISSING",
                "core library desugaring is enabled but no coreLibraryDesugaring dependency is declared",
            )
        })
        .warning(!config.core_library_desugaring && has_desugaring_library, || {
            ValidationError::new(
                "android.compileOptions.isCoreLibraryDesugaringEnabled",
                "DESUGARING_DISABLED",
                "a coreLibraryDesugaring dependency is declared but desugaring is disabled",
            )
        })
        .warning(config.signing_config() == Some(DEBUG_SIGNING_CONFIG), || {
            ValidationError::new(
                format!("android.buildTypes.{}.signingConfig", RELEASE_BUILD_TYPE),
                "RELEASE_DEBUG_SIGNED",
                "release builds are signed with the debug key",
            )
        })
        .validate()
}

fn missing(field: &str) -> ConfigError {
    ConfigError::MissingField {
        field: field.to_string(),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn check_plugins(plugins: &[String]) -> ResolveResult<()> {
    match plugins.iter().position(|p| p.trim().is_empty()) {
        Some(index) => Err(ConfigError::InvalidPlugin { index }),
        None => Ok(()),
    }
}

fn resolve_sdk(field: &str, value: &Value<u32>, toolchain: &dyn ToolchainValues) -> ResolveResult<u32> {
    match value {
        Value::Literal(level) => Ok(*level),
        Value::Reference { reference } => toolchain
            .lookup(reference)
            .and_then(|v| v.as_u32())
            .ok_or_else(|| ConfigError::UnresolvedSdkVersion {
                field: field.to_string(),
                reference: reference.clone(),
            }),
    }
}

fn resolve_version_code(value: &Value<u32>, toolchain: &dyn ToolchainValues) -> ResolveResult<u32> {
    match value {
        Value::Literal(code) => Ok(*code),
        Value::Reference { reference } => toolchain
            .lookup(reference)
            .and_then(|v| v.as_u32())
            .ok_or_else(|| ConfigError::UnresolvedToolchainValue {
                field: "android.defaultConfig.versionCode".to_string(),
                reference: reference.clone(),
            }),
    }
}

fn resolve_text(
    field: &str,
    value: &Value<String>,
    toolchain: &dyn ToolchainValues,
) -> ResolveResult<String> {
    match value {
        Value::Literal(text) => Ok(text.clone()),
        Value::Reference { reference } => toolchain
            .lookup(reference)
            .map(|v| v.as_text())
            .ok_or_else(|| ConfigError::UnresolvedToolchainValue {
                field: field.to_string(),
                reference: reference.clone(),
            }),
    }
}

fn resolve_level(field: &str, raw: Option<&str>) -> ResolveResult<Option<LanguageLevel>> {
    raw.map(|value| {
        LanguageLevel::parse(value).ok_or_else(|| ConfigError::UnsupportedLanguageLevel {
            field: field.to_string(),
            value: value.to_string(),
        })
    })
    .transpose()
}

fn check_dependencies(declaration: &Declaration) -> ResolveResult<()> {
    let mut seen = HashSet::new();

    for (index, dep) in declaration.dependencies.iter().enumerate() {
        if !CONFIGURATION_RE.is_match(&dep.configuration) {
            return Err(ConfigError::InvalidDependency {
                index,
                reason: format!("configuration `{}` is not a valid name", dep.configuration),
            });
        }
        if !COORDINATE_RE.is_match(&dep.coordinate) {
            return Err(ConfigError::InvalidDependency {
                index,
                reason: format!("coordinate `{}` is not in group:artifact form", dep.coordinate),
            });
        }
        if dep.version.trim().is_empty() {
            return Err(ConfigError::InvalidDependency {
                index,
                reason: format!("`{}` has no version", dep.coordinate),
            });
        }
        if !seen.insert(dep.coordinate.as_str()) {
            return Err(ConfigError::DuplicateDependency {
                coordinate: dep.coordinate.clone(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{BuildType, DependencyDeclaration, FlutterBlock};
    use crate::toolchain::{MapToolchain, NoToolchain, ToolchainValue};
    use crate::signing::SigningConfig;
    use proptest::prelude::*;

    fn declaration(min: u32, target: u32, compile: u32, signing: &str) -> Declaration {
        let mut decl = Declaration::default();
        decl.android.default_config.application_id = Some("com.example.test_app".to_string());
        decl.android.compile_sdk = Some(Value::Literal(compile));
        decl.android.default_config.min_sdk = Some(Value::Literal(min));
        decl.android.default_config.target_sdk = Some(Value::Literal(target));
        decl.android
            .build_types
            .insert("release".to_string(), BuildType::signed_with(signing));
        decl
    }

    fn flutter_declaration() -> Declaration {
        let mut decl = declaration(21, 0, 0, "debug");
        decl.plugins = vec![
            "com.android.application".to_string(),
            "kotlin-android".to_string(),
            "dev.flutter.flutter-gradle-plugin".to_string(),
        ];
        decl.android.namespace = Some("com.example.test_app".to_string());
        decl.android.compile_sdk = Some(Value::reference("flutter.compileSdkVersion"));
        decl.android.ndk_version = Some(Value::Literal("27.0.12077973".to_string()));
        decl.android.default_config.target_sdk = Some(Value::reference("flutter.targetSdkVersion"));
        decl.android.default_config.version_code = Some(Value::reference("flutter.versionCode"));
        decl.android.default_config.version_name = Some(Value::reference("flutter.versionName"));
        decl.android.compile_options.source_compatibility = Some("JavaVersion.VERSION_17".to_string());
        decl.android.compile_options.target_compatibility = Some("JavaVersion.VERSION_17".to_string());
        decl.android.compile_options.is_core_library_desugaring_enabled = Some(true);
        decl.android.kotlin_options.jvm_target = Some("JavaVersion.VERSION_17".to_string());
        decl.flutter = Some(FlutterBlock {
            source: Some("../..".to_string()),
        });
        decl.dependencies = vec![DependencyDeclaration::from_notation(
            DESUGARING_CONFIGURATION,
            "com.android.tools:desugar_jdk_libs:2.1.4",
        )];
        decl
    }

    fn flutter_toolchain() -> MapToolchain {
        MapToolchain::new()
            .with("flutter.compileSdkVersion", ToolchainValue::Integer(35))
            .with("flutter.targetSdkVersion", ToolchainValue::Integer(35))
            .with("flutter.versionCode", ToolchainValue::Integer(1))
            .with("flutter.versionName", ToolchainValue::Text("1.0.0".to_string()))
    }

    #[test]
    fn test_resolve_example_with_debug_signing() {
        let registry = SigningRegistry::with_debug();
        let config = resolve(&declaration(21, 34, 34, "debug"), &NoToolchain, &registry).unwrap();

        assert_eq!(config.min_sdk(), 21);
        assert_eq!(config.target_sdk(), 34);
        assert_eq!(config.compile_sdk(), 34);
        assert_eq!(config.signing_config(), Some("debug"));
        assert_eq!(config.namespace(), "com.example.test_app");
    }

    #[test]
    fn test_resolve_example_with_unknown_signing() {
        let registry = SigningRegistry::with_debug();
        let err = resolve(&declaration(21, 34, 34, "release-unknown"), &NoToolchain, &registry)
            .unwrap_err();

        assert_eq!(
            err,
            ConfigError::UnknownSigningConfig {
                build_type: "release".to_string(),
                name: "release-unknown".to_string(),
            }
        );
    }

    #[test]
    fn test_resolve_registered_release_signing() {
        let registry = SigningRegistry::with_debug().with(SigningConfig::named("upload"));
        let config = resolve(&declaration(21, 34, 34, "upload"), &NoToolchain, &registry).unwrap();
        assert_eq!(config.signing_config(), Some("upload"));
    }

    #[test]
    fn test_resolve_flutter_template() {
        let registry = SigningRegistry::with_debug();
        let config = resolve(&flutter_declaration(), &flutter_toolchain(), &registry).unwrap();

        assert_eq!(config.compile_sdk(), 35);
        assert_eq!(config.target_sdk(), 35);
        assert_eq!(config.version_code(), Some(1));
        assert_eq!(config.version_name(), Some("1.0.0"));
        assert_eq!(config.ndk_version(), Some("27.0.12077973"));
        assert_eq!(config.source_compatibility(), LanguageLevel::Java17);
        assert_eq!(config.jvm_target(), LanguageLevel::Java17);
        assert!(config.core_library_desugaring());
        assert_eq!(config.flutter_source(), Some("../.."));
        assert_eq!(config.plugins().len(), 3);
        assert_eq!(config.dependencies_in(DESUGARING_CONFIGURATION).count(), 1);
    }

    #[test]
    fn test_unresolved_sdk_reference() {
        let registry = SigningRegistry::with_debug();
        let err = resolve(&flutter_declaration(), &NoToolchain, &registry).unwrap_err();

        assert_eq!(
            err,
            ConfigError::UnresolvedSdkVersion {
                field: "android.compileSdk".to_string(),
                reference: "flutter.compileSdkVersion".to_string(),
            }
        );
    }

    #[test]
    fn test_non_numeric_sdk_reference_is_unresolved() {
        let toolchain = flutter_toolchain()
            .with("flutter.targetSdkVersion", ToolchainValue::Text("latest".to_string()));
        let err = resolve(&flutter_declaration(), &toolchain, &SigningRegistry::with_debug())
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnresolvedSdkVersion { ref field, .. } if field == "android.defaultConfig.targetSdk"
        ));
    }

    #[test]
    fn test_unresolved_version_name() {
        let toolchain = MapToolchain::new()
            .with("flutter.compileSdkVersion", ToolchainValue::Integer(35))
            .with("flutter.targetSdkVersion", ToolchainValue::Integer(35))
            .with("flutter.versionCode", ToolchainValue::Integer(1));
        let err = resolve(&flutter_declaration(), &toolchain, &SigningRegistry::with_debug())
            .unwrap_err();

        assert_eq!(
            err,
            ConfigError::UnresolvedToolchainValue {
                field: "android.defaultConfig.versionName".to_string(),
                reference: "flutter.versionName".to_string(),
            }
        );
    }

    #[test]
    fn test_invalid_sdk_ordering() {
        let registry = SigningRegistry::with_debug();
        let err = resolve(&declaration(21, 35, 34, "debug"), &NoToolchain, &registry).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidSdkOrdering {
                min_sdk: 21,
                target_sdk: 35,
                compile_sdk: 34,
            }
        );

        let err = resolve(&declaration(30, 29, 34, "debug"), &NoToolchain, &registry).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSdkOrdering { .. }));
    }

    #[test]
    fn test_target_sdk_defaults_to_compile_sdk() {
        let mut decl = declaration(21, 0, 34, "debug");
        decl.android.default_config.target_sdk = None;
        let config = resolve(&decl, &NoToolchain, &SigningRegistry::with_debug()).unwrap();
        assert_eq!(config.target_sdk(), 34);
    }

    #[test]
    fn test_missing_fields() {
        let registry = SigningRegistry::with_debug();

        let mut decl = declaration(21, 34, 34, "debug");
        decl.android.compile_sdk = None;
        assert_eq!(
            resolve(&decl, &NoToolchain, &registry).unwrap_err(),
            ConfigError::MissingField {
                field: "android.compileSdk".to_string()
            }
        );

        let mut decl = declaration(21, 34, 34, "debug");
        decl.android.default_config.min_sdk = None;
        assert_eq!(
            resolve(&decl, &NoToolchain, &registry).unwrap_err().field(),
            "android.defaultConfig.minSdk"
        );

        let mut decl = declaration(21, 34, 34, "debug");
        decl.android.default_config.application_id = Some("  ".to_string());
        assert_eq!(
            resolve(&decl, &NoToolchain, &registry).unwrap_err().field(),
            "android.defaultConfig.applicationId"
        );
    }

    #[test]
    fn test_application_id_falls_back_to_namespace() {
        let mut decl = declaration(21, 34, 34, "debug");
        decl.android.default_config.application_id = None;
        decl.android.namespace = Some("com.example.ns".to_string());

        let config = resolve(&decl, &NoToolchain, &SigningRegistry::with_debug()).unwrap();
        assert_eq!(config.application_id(), "com.example.ns");
    }

    #[test]
    fn test_unsupported_language_level() {
        let mut decl = declaration(21, 34, 34, "debug");
        decl.android.compile_options.target_compatibility = Some("JavaVersion.VERSION_1_6".to_string());

        let err = resolve(&decl, &NoToolchain, &SigningRegistry::with_debug()).unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnsupportedLanguageLevel {
                field: "android.compileOptions.targetCompatibility".to_string(),
                value: "JavaVersion.VERSION_1_6".to_string(),
            }
        );
    }

    #[test]
    fn test_language_level_defaults() {
        let mut decl = declaration(21, 34, 34, "debug");
        decl.android.compile_options.target_compatibility = Some("11".to_string());

        let config = resolve(&decl, &NoToolchain, &SigningRegistry::with_debug()).unwrap();
        assert_eq!(config.source_compatibility(), LanguageLevel::Java8);
        assert_eq!(config.target_compatibility(), LanguageLevel::Java11);
        assert_eq!(config.jvm_target(), LanguageLevel::Java11);
    }

    #[test]
    fn test_duplicate_dependency() {
        let mut decl = declaration(21, 34, 34, "debug");
        decl.dependencies = vec![
            DependencyDeclaration::from_notation("implementation", "androidx.core:core-ktx:1.13.1"),
            DependencyDeclaration::from_notation("testImplementation", "junit:junit:4.13.2"),
            DependencyDeclaration::from_notation("implementation", "androidx.core:core-ktx:1.12.0"),
        ];

        let err = resolve(&decl, &NoToolchain, &SigningRegistry::with_debug()).unwrap_err();
        assert_eq!(
            err,
            ConfigError::DuplicateDependency {
                coordinate: "androidx.core:core-ktx".to_string()
            }
        );
    }

    #[test]
    fn test_invalid_dependencies() {
        let registry = SigningRegistry::with_debug();

        let mut decl = declaration(21, 34, 34, "debug");
        decl.dependencies = vec![DependencyDeclaration::from_notation("implementation", "androidx.core:core-ktx")];
        let err = resolve(&decl, &NoToolchain, &registry).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDependency { index: 0, .. }));

        decl.dependencies = vec![DependencyDeclaration::new("implementation", "not a coordinate", "1.0")];
        let err = resolve(&decl, &NoToolchain, &registry).unwrap_err();
        assert!(err.to_string().contains("group:artifact"));

        decl.dependencies = vec![DependencyDeclaration::new("", "g:a", "1.0")];
        assert!(resolve(&decl, &NoToolchain, &registry).is_err());
    }

    #[test]
    fn test_empty_plugin_id() {
        let mut decl = declaration(21, 34, 34, "debug");
        decl.plugins = vec!["com.android.application".to_string(), " ".to_string()];

        let err = resolve(&decl, &NoToolchain, &SigningRegistry::with_debug()).unwrap_err();
        assert_eq!(err, ConfigError::InvalidPlugin { index: 1 });
    }

    #[test]
    fn test_resolver_struct() {
        let toolchain = flutter_toolchain();
        let registry = SigningRegistry::with_debug();
        let resolver = Resolver::new(&toolchain, &registry);
        assert!(resolver.resolve(&flutter_declaration()).is_ok());
    }

    #[test]
    fn test_lint_flutter_template() {
        let config = resolve(
            &flutter_declaration(),
            &flutter_toolchain(),
            &SigningRegistry::with_debug(),
        )
        .unwrap();
        let findings = lint(&config);

        assert!(findings.is_valid());
        let codes: Vec<&str> = findings.warnings().iter().map(|w| w.code.as_str()).collect();
        assert_eq!(codes, vec!["RELEASE_DEBUG_SIGNED"]);
    }

    #[test]
    fn test_lint_desugaring_and_jvm_target() {
        let mut decl = flutter_declaration();
        decl.dependencies.clear();
        decl.android.kotlin_options.jvm_target = Some("11".to_string());
        decl.android.build_types.clear();

        let config = resolve(&decl, &flutter_toolchain(), &SigningRegistry::with_debug()).unwrap();
        let codes: Vec<String> = lint(&config).warnings().iter().map(|w| w.code.clone()).collect();
        assert_eq!(codes, vec!["JVM_TARGET_MISMATCH", "DESUGARING_LIBRARY_MISSING"]);
    }

    #[test]
    fn test_lint_desugaring_disabled() {
        let mut decl = flutter_declaration();
        decl.android.compile_options.is_core_library_desugaring_enabled = Some(false);
        decl.android.compile_options.source_compatibility = Some("21".to_string());

        let config = resolve(&decl, &flutter_toolchain(), &SigningRegistry::with_debug()).unwrap();
        let codes: Vec<String> = lint(&config).warnings().iter().map(|w| w.code.clone()).collect();
        assert!(codes.contains(&"DESUGARING_DISABLED".to_string()));
        assert!(codes.contains(&"SOURCE_NEWER_THAN_TARGET".to_string()));
    }

    #[test]
    fn test_round_trip_through_declaration() {
        let registry = SigningRegistry::with_debug();
        let config = resolve(&flutter_declaration(), &flutter_toolchain(), &registry).unwrap();

        let again = resolve(&config.to_declaration(), &NoToolchain, &registry).unwrap();
        assert_eq!(config, again);
        assert_eq!(config.to_declaration(), again.to_declaration());
    }

    proptest! {
        #[test]
        fn prop_ordered_sdks_resolve_exactly(min in 1u32..40, d1 in 0u32..10, d2 in 0u32..10) {
            let target = min + d1;
            let compile = target + d2;
            let registry = SigningRegistry::with_debug();

            let config = resolve(&declaration(min, target, compile, "debug"), &NoToolchain, &registry).unwrap();
            prop_assert_eq!(config.min_sdk(), min);
            prop_assert_eq!(config.target_sdk(), target);
            prop_assert_eq!(config.compile_sdk(), compile);
        }

        #[test]
        fn prop_unordered_sdks_fail(min in 1u32..60, target in 1u32..60, compile in 1u32..60) {
            prop_assume!(!(min <= target && target <= compile));
            let registry = SigningRegistry::with_debug();

            let result = resolve(&declaration(min, target, compile, "debug"), &NoToolchain, &registry);
            let is_ordering_error = matches!(result, Err(ConfigError::InvalidSdkOrdering { .. }));
            prop_assert!(is_ordering_error);
        }

        #[test]
        fn prop_unregistered_signing_fails(name in "[a-z][a-z0-9-]{0,12}") {
            prop_assume!(name != "debug");
            let registry = SigningRegistry::with_debug();

            let result = resolve(&declaration(21, 34, 34, &name), &NoToolchain, &registry);
            let is_signing_error = matches!(result, Err(ConfigError::UnknownSigningConfig { .. }));
            prop_assert!(is_signing_error);
        }

        #[test]
        fn prop_round_trip(min in 1u32..30, code in 1u32..1000, desugar in any::<bool>()) {
            let mut decl = declaration(min, 34, 35, "debug");
            decl.android.default_config.version_code = Some(Value::Literal(code));
            decl.android.compile_options.is_core_library_desugaring_enabled = Some(desugar);
            let registry = SigningRegistry::with_debug();

            let config = resolve(&decl, &NoToolchain, &registry).unwrap();
            let again = resolve(&config.to_declaration(), &NoToolchain, &registry).unwrap();
            prop_assert_eq!(config, again);
        }
    }
}
