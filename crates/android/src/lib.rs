//! Android build configuration for droidconf
//!
//! This crate turns an app module's build descriptor into a validated
//! [`BuildConfig`]:
//!
//! - Descriptor model mirroring `android/app/build.gradle.kts`
//! - Kotlin DSL reader and writer, plus TOML/JSON loading
//! - Toolchain value lookup (`flutter.compileSdkVersion`, `local.properties`)
//! - Signing config registry
//! - Resolution with SDK ordering, language level, signing and dependency checks

pub mod build_config;
pub mod descriptor;
pub mod error;
pub mod kts;
pub mod language;
pub mod loader;
pub mod project;
pub mod resolver;
pub mod signing;
pub mod toolchain;

pub use build_config::BuildConfig;
pub use descriptor::{Declaration, DependencyDeclaration, Value};
pub use error::{ConfigError, DescriptorError, ResolveResult};
pub use language::LanguageLevel;
pub use loader::{load_declaration, DescriptorFormat};
pub use project::{CheckReport, Project};
pub use resolver::{lint, resolve, Resolver};
pub use signing::{SigningConfig, SigningRegistry};
pub use toolchain::{
    LayeredToolchain, MapToolchain, NoToolchain, PropertiesToolchain, ToolchainValue,
    ToolchainValues,
};
