//! Java/Kotlin language compatibility levels

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Language level accepted for `sourceCompatibility`, `targetCompatibility`
/// and `kotlinOptions.jvmTarget`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LanguageLevel {
    /// Java 1.8
    Java8,
    /// Java 11
    Java11,
    /// Java 17
    Java17,
    /// Java 21
    Java21,
}

impl LanguageLevel {
    /// All supported levels, oldest first
    pub const ALL: [LanguageLevel; 4] = [Self::Java8, Self::Java11, Self::Java17, Self::Java21];

    /// Gradle `JavaVersion` constant name
    pub fn gradle_constant(&self) -> &'static str {
        match self {
            Self::Java8 => "VERSION_1_8",
            Self::Java11 => "VERSION_11",
            Self::Java17 => "VERSION_17",
            Self::Java21 => "VERSION_21",
        }
    }

    /// Kotlin `jvmTarget` string form
    pub fn jvm_target(&self) -> &'static str {
        match self {
            Self::Java8 => "1.8",
            Self::Java11 => "11",
            Self::Java17 => "17",
            Self::Java21 => "21",
        }
    }

    /// Parse any accepted spelling, `None` when unsupported
    ///
    /// Accepts `JavaVersion.VERSION_17`, `VERSION_17`, `17`, `1.8`, and the
    /// `.toString()` suffix used for `jvmTarget`.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let trimmed = trimmed.strip_suffix(".toString()").unwrap_or(trimmed);
        let trimmed = trimmed.strip_prefix("JavaVersion.").unwrap_or(trimmed);
        let number = trimmed.strip_prefix("VERSION_").unwrap_or(trimmed);

        match number {
            "1_8" | "1.8" | "8" => Some(Self::Java8),
            "11" => Some(Self::Java11),
            "17" => Some(Self::Java17),
            "21" => Some(Self::Java21),
            _ => None,
        }
    }
}

impl fmt::Display for LanguageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.gradle_constant())
    }
}

/// Error returned when a language level is not supported
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported language level `{0}`")]
pub struct UnsupportedLevel(pub String);

impl FromStr for LanguageLevel {
    type Err = UnsupportedLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnsupportedLevel(s.to_string()))
    }
}

impl Serialize for LanguageLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.gradle_constant())
    }
}

impl<'de> Deserialize<'de> for LanguageLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
