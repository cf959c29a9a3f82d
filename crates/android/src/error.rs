//! Resolution and descriptor errors
//!
//! Every variant names the offending field so the message can be shown to
//! the user as is.

use droidconf_core::error::{Error, ErrorCode};
use thiserror::Error;

/// Result alias for resolution
pub type ResolveResult<T> = std::result::Result<T, ConfigError>;

/// A declaration failed validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} is required")]
    MissingField { field: String },

    #[error("{field}: SDK version reference `{reference}` does not resolve to an API level")]
    UnresolvedSdkVersion { field: String, reference: String },

    #[error("{field}: toolchain value `{reference}` is not available")]
    UnresolvedToolchainValue { field: String, reference: String },

    #[error(
        "SDK versions must satisfy minSdk <= targetSdk <= compileSdk \
         (minSdk = {min_sdk}, targetSdk = {target_sdk}, compileSdk = {compile_sdk})"
    )]
    InvalidSdkOrdering {
        min_sdk: u32,
        target_sdk: u32,
        compile_sdk: u32,
    },

    #[error("{field}: unsupported language level `{value}`")]
    UnsupportedLanguageLevel { field: String, value: String },

    #[error("android.buildTypes.{build_type}.signingConfig: unknown signing config `{name}`")]
    UnknownSigningConfig { build_type: String, name: String },

    #[error("dependencies[{index}]: {reason}")]
    InvalidDependency { index: usize, reason: String },

    #[error("dependencies: duplicate coordinate `{coordinate}`")]
    DuplicateDependency { coordinate: String },

    #[error("plugins[{index}]: plugin id must not be empty")]
    InvalidPlugin { index: usize },
}

impl ConfigError {
    /// Error code for this failure
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::MissingField { .. } => ErrorCode::MissingField,
            Self::UnresolvedSdkVersion { .. } => ErrorCode::UnresolvedSdkVersion,
            Self::UnresolvedToolchainValue { .. } => ErrorCode::UnresolvedToolchainValue,
            Self::InvalidSdkOrdering { .. } => ErrorCode::InvalidSdkOrdering,
            Self::UnsupportedLanguageLevel { .. } => ErrorCode::UnsupportedLanguageLevel,
            Self::UnknownSigningConfig { .. } => ErrorCode::UnknownSigningConfig,
            Self::InvalidDependency { .. } => ErrorCode::InvalidDependency,
            Self::DuplicateDependency { .. } => ErrorCode::DuplicateDependency,
            Self::InvalidPlugin { .. } => ErrorCode::InvalidPlugin,
        }
    }

    /// Dotted path of the offending field
    pub fn field(&self) -> String {
        match self {
            Self::MissingField { field }
            | Self::UnresolvedSdkVersion { field, .. }
            | Self::UnresolvedToolchainValue { field, .. }
            | Self::UnsupportedLanguageLevel { field, .. } => field.clone(),
            Self::InvalidSdkOrdering { .. } => "android.defaultConfig.minSdk".to_string(),
            Self::UnknownSigningConfig { build_type, .. } => {
                format!("android.buildTypes.{}.signingConfig", build_type)
            }
            Self::InvalidDependency { index, .. } => format!("dependencies[{}]", index),
            Self::DuplicateDependency { .. } => "dependencies".to_string(),
            Self::InvalidPlugin { index } => format!("plugins[{}]", index),
        }
    }

    /// Recovery suggestion
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::UnresolvedSdkVersion { reference, .. }
            | Self::UnresolvedToolchainValue { reference, .. } => Some(format!(
                "Define \"{}\" in the [toolchain] table of .droidconf.toml or in local.properties",
                reference
            )),
            Self::UnsupportedLanguageLevel { .. } => Some(
                "Use one of JavaVersion.VERSION_1_8, VERSION_11, VERSION_17, VERSION_21".to_string(),
            ),
            Self::UnknownSigningConfig { name, .. } => Some(format!(
                "Add a [signing.{}] table to .droidconf.toml or reference \"debug\"",
                name
            )),
            Self::DuplicateDependency { .. } => {
                Some("Declare each coordinate once".to_string())
            }
            _ => None,
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        let mut error = Error::new(err.code(), err.to_string()).with_context(err.field());
        if let Some(suggestion) = err.suggestion() {
            error = error.with_suggestion(suggestion);
        }
        error.with_source(err)
    }
}

/// A descriptor could not be read
#[derive(Error, Debug)]
pub enum DescriptorError {
    #[error("syntax error at {line}:{column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("invalid value at {line}:{column}: {message}")]
    Invalid {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("{field} cannot be written as Kotlin DSL: {message}")]
    Unrenderable { field: String, message: String },

    #[error("unsupported descriptor format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid TOML descriptor: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON descriptor: {0}")]
    Json(#[from] serde_json::Error),
}

impl DescriptorError {
    pub(crate) fn syntax(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            column,
            message: message.into(),
        }
    }

    pub(crate) fn invalid(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::Invalid {
            line,
            column,
            message: message.into(),
        }
    }
}

impl From<DescriptorError> for Error {
    fn from(err: DescriptorError) -> Self {
        let code = match &err {
            DescriptorError::UnsupportedFormat(_) => ErrorCode::UnsupportedDescriptor,
            DescriptorError::Unrenderable { .. } => ErrorCode::DescriptorError,
            _ => ErrorCode::DescriptorSyntax,
        };
        let suggestion = match &err {
            DescriptorError::UnsupportedFormat(_) => {
                Some("Use a .gradle.kts, .toml or .json descriptor")
            }
            _ => None,
        };
        let mut error = Error::new(code, err.to_string());
        if let Some(s) = suggestion {
            error = error.with_suggestion(s);
        }
        if let DescriptorError::Unrenderable { field, .. } = &err {
            error = error.with_context(field.clone());
        }
        error.with_source(err)
    }
}
