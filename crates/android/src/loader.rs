//! Descriptor loading and rendering across formats

use crate::descriptor::Declaration;
use crate::error::DescriptorError;
use crate::kts;
use droidconf_core::error::{Error, Result, ResultExt};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// On-disk descriptor format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorFormat {
    /// Gradle Kotlin DSL (`build.gradle.kts`)
    Kts,
    Toml,
    Json,
}

impl DescriptorFormat {
    /// Pick the format from a file name
    pub fn from_path(path: &Path) -> std::result::Result<Self, DescriptorError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if name.ends_with(".kts") {
            Ok(Self::Kts)
        } else if name.ends_with(".toml") {
            Ok(Self::Toml)
        } else if name.ends_with(".json") {
            Ok(Self::Json)
        } else {
            Err(DescriptorError::UnsupportedFormat(path.display().to_string()))
        }
    }

    /// Parse descriptor source in this format
    pub fn parse(self, source: &str) -> std::result::Result<Declaration, DescriptorError> {
        match self {
            Self::Kts => kts::parse(source),
            Self::Toml => Ok(toml::from_str(source)?),
            Self::Json => Ok(serde_json::from_str(source)?),
        }
    }

    /// Render a declaration in this format
    pub fn render(self, declaration: &Declaration) -> Result<String> {
        match self {
            Self::Kts => Ok(kts::render(declaration)?),
            Self::Toml => Ok(toml::to_string_pretty(declaration)?),
            Self::Json => {
                let mut out = serde_json::to_string_pretty(declaration)?;
                out.push('\n');
                Ok(out)
            }
        }
    }
}

impl FromStr for DescriptorFormat {
    type Err = DescriptorError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "kts" | "kotlin" | "gradle" => Ok(Self::Kts),
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            other => Err(DescriptorError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for DescriptorFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Kts => "kts",
            Self::Toml => "toml",
            Self::Json => "json",
        })
    }
}

/// Read and parse a descriptor, choosing the format from its extension
pub fn load_declaration(path: &Path) -> Result<Declaration> {
    let format = DescriptorFormat::from_path(path)?;

    if !path.exists() {
        return Err(Error::file_not_found(path));
    }
    let source = std::fs::read_to_string(path)?;

    let declaration = format
        .parse(&source)
        .map_err(Error::from)
        .context(path.display().to_string())?;

    tracing::debug!(path = %path.display(), %format, "Descriptor loaded");
    Ok(declaration)
}
