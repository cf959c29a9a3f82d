//! A descriptor on disk together with the environment it resolves against

use crate::build_config::BuildConfig;
use crate::descriptor::Declaration;
use crate::loader::load_declaration;
use crate::resolver::{lint, resolve};
use crate::signing::SigningRegistry;
use crate::toolchain::{LayeredToolchain, MapToolchain, PropertiesToolchain, ToolchainValues};
use droidconf_core::config::Config;
use droidconf_core::properties::Properties;
use droidconf_core::validation::ValidationResult;
use droidconf_core::Result;
use std::path::{Path, PathBuf};

/// Loaded descriptor, toolchain layers and signing registry
#[derive(Debug)]
pub struct Project {
    descriptor: PathBuf,
    declaration: Declaration,
    toolchain: LayeredToolchain,
    registry: SigningRegistry,
}

/// Outcome of [`Project::check`]
#[derive(Debug)]
pub struct CheckReport {
    pub config: BuildConfig,
    pub findings: ValidationResult,
}

impl CheckReport {
    /// True when no finding counts as an error
    pub fn passed(&self) -> bool {
        self.findings.is_valid()
    }
}

impl Project {
    /// Load a descriptor and assemble its toolchain
    ///
    /// Toolchain values from the configuration file take precedence over the
    /// properties file. An explicit `properties` path must exist; the
    /// configured default is skipped when absent.
    pub fn open(descriptor: &Path, config: &Config, properties: Option<&Path>) -> Result<Self> {
        let declaration = load_declaration(descriptor)?;

        let mut toolchain = LayeredToolchain::new();
        let from_config = MapToolchain::from_config(&config.schema);
        if !from_config.is_empty() {
            toolchain.push(from_config);
        }

        let descriptor_dir = descriptor.parent().unwrap_or_else(|| Path::new(""));
        match properties {
            Some(path) => {
                let props = Properties::load(path)?;
                toolchain.push(PropertiesToolchain::new(props, path.display().to_string()));
            }
            None => match config.properties_path(descriptor_dir) {
                Some(path) if path.exists() => {
                    let props = Properties::load(&path)?;
                    toolchain.push(PropertiesToolchain::new(props, path.display().to_string()));
                }
                Some(path) => {
                    tracing::debug!(path = %path.display(), "Properties file not found, skipping");
                }
                None => {}
            },
        }

        let registry = SigningRegistry::from_config(&config.schema);

        tracing::debug!(
            descriptor = %descriptor.display(),
            toolchain = %toolchain.describe(),
            signing_configs = registry.len(),
            "Project opened"
        );

        Ok(Self {
            descriptor: descriptor.to_path_buf(),
            declaration,
            toolchain,
            registry,
        })
    }

    pub fn descriptor(&self) -> &Path {
        &self.descriptor
    }

    pub fn declaration(&self) -> &Declaration {
        &self.declaration
    }

    pub fn toolchain(&self) -> &LayeredToolchain {
        &self.toolchain
    }

    pub fn registry(&self) -> &SigningRegistry {
        &self.registry
    }

    /// Resolve the declaration
    pub fn resolve(&self) -> Result<BuildConfig> {
        Ok(resolve(&self.declaration, &self.toolchain, &self.registry)?)
    }

    /// Resolve and lint; in strict mode warnings become errors
    pub fn check(&self, strict: bool) -> Result<CheckReport> {
        let config = self.resolve()?;
        let mut findings = lint(&config);
        if strict {
            findings = findings.escalate_warnings();
        }
        Ok(CheckReport { config, findings })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use droidconf_core::ErrorCode;
    use tempfile::TempDir;

    const APP_KTS: &str = r#"android {
    namespace = "com.example.app"
    compileSdk = flutter.compileSdkVersion
    defaultConfig {
        minSdk = 21
        targetSdk = flutter.targetSdkVersion
        versionCode = flutter.versionCode
        versionName = flutter.versionName
    }
    buildTypes {
        release {
            signingConfig = signingConfigs.getByName("upload")
        }
    }
}
"#;

    const CONFIG: &str = r#"
[toolchain]
"flutter.compileSdkVersion" = 35
"flutter.targetSdkVersion" = 34
"flutter.versionCode" = 7

[signing.upload]
key_alias = "upload"
"#;

    /// Lay out `android/app/build.gradle.kts` and `android/local.properties`
    fn flutter_layout(properties: &str) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let app = dir.path().join("android").join("app");
        std::fs::create_dir_all(&app).unwrap();
        let descriptor = app.join("build.gradle.kts");
        std::fs::write(&descriptor, APP_KTS).unwrap();
        std::fs::write(dir.path().join("android").join("local.properties"), properties).unwrap();
        (dir, descriptor)
    }

    #[test]
    fn test_resolve_with_config_and_properties() {
        let (_dir, descriptor) = flutter_layout("flutter.versionName=2.1.0\nflutter.versionCode=99\n");
        let config = Config::from_toml(CONFIG).unwrap();

        let project = Project::open(&descriptor, &config, None).unwrap();
        assert_eq!(project.toolchain().len(), 2);

        let resolved = project.resolve().unwrap();
        assert_eq!(resolved.compile_sdk(), 35);
        assert_eq!(resolved.target_sdk(), 34);
        // config values win over local.properties
        assert_eq!(resolved.version_code(), Some(7));
        assert_eq!(resolved.version_name(), Some("2.1.0"));
        assert_eq!(resolved.signing_config(), Some("upload"));
    }

    #[test]
    fn test_properties_version_name_is_verbatim() {
        let (_dir, descriptor) = flutter_layout("flutter.versionName=007\n");
        let config = Config::from_toml(CONFIG).unwrap();

        let resolved = Project::open(&descriptor, &config, None).unwrap().resolve().unwrap();
        assert_eq!(resolved.version_name(), Some("007"));
    }

    #[test]
    fn test_missing_default_properties_is_skipped() {
        let (dir, descriptor) = flutter_layout("");
        std::fs::remove_file(dir.path().join("android").join("local.properties")).unwrap();
        let config = Config::from_toml(CONFIG).unwrap();

        let project = Project::open(&descriptor, &config, None).unwrap();
        assert_eq!(project.toolchain().len(), 1);

        let err = project.resolve().unwrap_err();
        assert_eq!(err.code, ErrorCode::UnresolvedToolchainValue);
        assert_eq!(err.context.as_deref(), Some("android.defaultConfig.versionName"));
    }

    #[test]
    fn test_explicit_properties_must_exist() {
        let (dir, descriptor) = flutter_layout("");
        let config = Config::default();

        let err = Project::open(&descriptor, &config, Some(&dir.path().join("nope.properties")))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::FileNotFound);
    }

    #[test]
    fn test_unknown_signing_without_config() {
        let (_dir, descriptor) = flutter_layout(
            "flutter.compileSdkVersion=34\nflutter.targetSdkVersion=34\nflutter.versionCode=1\nflutter.versionName=1.0\n",
        );

        let project = Project::open(&descriptor, &Config::default(), None).unwrap();
        let err = project.resolve().unwrap_err();
        assert_eq!(err.code, ErrorCode::UnknownSigningConfig);
        assert_eq!(err.exit_code(), droidconf_core::error::exit_codes::VALIDATION_ERROR);
    }

    #[test]
    fn test_check_strict_escalates_warnings() {
        let (_dir, descriptor) = flutter_layout("flutter.versionName=1.0\n");
        let config = Config::from_toml(CONFIG).unwrap();
        let project = Project::open(&descriptor, &config, None).unwrap();

        // targetCompatibility defaults to 1.8; nothing else to warn about
        let relaxed = project.check(false).unwrap();
        assert!(relaxed.passed());
        assert!(relaxed.findings.is_clean());

        let mut config = Config::from_toml(CONFIG).unwrap();
        config.schema.signing.clear();
        let (_dir2, debug_signed) = flutter_layout("flutter.versionName=1.0\n");
        std::fs::write(
            &debug_signed,
            APP_KTS.replace("getByName(\"upload\")", "getByName(\"debug\")"),
        )
        .unwrap();
        let project = Project::open(&debug_signed, &config, None).unwrap();

        assert!(project.check(false).unwrap().passed());
        let strict = project.check(true).unwrap();
        assert!(!strict.passed());
        assert_eq!(strict.findings.errors()[0].code, "RELEASE_DEBUG_SIGNED");
    }
}
