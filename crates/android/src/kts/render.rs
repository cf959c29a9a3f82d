//! Kotlin DSL writer
//!
//! Output is laid out the way `flutter create` lays out
//! `android/app/build.gradle.kts` and reads back through [`super::parse`].

use crate::build_config::RELEASE_BUILD_TYPE;
use crate::descriptor::{java_level_spelling, AndroidBlock, Declaration, Value};
use crate::error::DescriptorError;
use crate::signing::DEBUG_SIGNING_CONFIG;
use std::fmt::{self, Write};

const INDENT: &str = "    ";

/// Words the parser reads as statement keywords even when backticked
const STATEMENT_KEYWORDS: [&str; 3] = ["import", "val", "var"];

/// Render a declaration as Kotlin DSL source
///
/// Fails when a reference or configuration name has no spelling the
/// reader accepts back.
pub fn render(declaration: &Declaration) -> Result<String, DescriptorError> {
    check(declaration)?;
    let mut out = Writer::default();
    // Writing into a String cannot fail
    let _ = out.declaration(declaration);
    Ok(out.finish())
}

fn check(decl: &Declaration) -> Result<(), DescriptorError> {
    let android = &decl.android;
    let config = &android.default_config;
    let references = [
        ("android.compileSdk", android.compile_sdk.as_ref().and_then(Value::as_reference)),
        ("android.ndkVersion", android.ndk_version.as_ref().and_then(Value::as_reference)),
        ("android.defaultConfig.minSdk", config.min_sdk.as_ref().and_then(Value::as_reference)),
        ("android.defaultConfig.targetSdk", config.target_sdk.as_ref().and_then(Value::as_reference)),
        ("android.defaultConfig.versionCode", config.version_code.as_ref().and_then(Value::as_reference)),
        ("android.defaultConfig.versionName", config.version_name.as_ref().and_then(Value::as_reference)),
    ];

    for (field, path) in references {
        let Some(path) = path else { continue };
        if !path.split('.').all(is_writable_name) {
            return Err(unrenderable(
                field,
                format!("reference `{}` has an unwritable segment", path),
            ));
        }
    }

    for (index, dep) in decl.dependencies.iter().enumerate() {
        let name = dep.configuration.as_str();
        if !is_writable_name(name) || STATEMENT_KEYWORDS.contains(&name) {
            return Err(unrenderable(
                &format!("dependencies[{}].configuration", index),
                format!("`{}` is not a usable configuration name", name),
            ));
        }
    }

    Ok(())
}

fn unrenderable(field: &str, message: String) -> DescriptorError {
    DescriptorError::Unrenderable {
        field: field.to_string(),
        message,
    }
}

/// Plain or backticked identifier the lexer reads back unchanged
fn is_writable_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['`', '\n', '\r'])
}

#[derive(Default)]
struct Writer {
    buf: String,
    depth: usize,
    /// A blank line is owed before the next section
    pending_gap: bool,
}

impl Writer {
    fn finish(self) -> String {
        self.buf
    }

    fn line(&mut self, text: impl fmt::Display) -> fmt::Result {
        for _ in 0..self.depth {
            self.buf.push_str(INDENT);
        }
        writeln!(self.buf, "{}", text)
    }

    fn open(&mut self, head: &str) -> fmt::Result {
        if self.pending_gap {
            self.buf.push('\n');
            self.pending_gap = false;
        }
        self.line(format_args!("{} {{", head))?;
        self.depth += 1;
        Ok(())
    }

    fn close(&mut self) -> fmt::Result {
        self.depth -= 1;
        self.line("}")?;
        self.pending_gap = true;
        Ok(())
    }

    fn assign(&mut self, name: &str, value: impl fmt::Display) -> fmt::Result {
        self.line(format_args!("{} = {}", name, value))
    }

    fn declaration(&mut self, decl: &Declaration) -> fmt::Result {
        if !decl.plugins.is_empty() {
            self.open("plugins")?;
            for id in &decl.plugins {
                self.line(format_args!("id({})", quote(id)))?;
            }
            self.close()?;
        }

        if decl.android != AndroidBlock::default() {
            self.android(&decl.android)?;
        }

        if let Some(flutter) = &decl.flutter {
            self.open("flutter")?;
            if let Some(source) = &flutter.source {
                self.assign("source", quote(source))?;
            }
            self.close()?;
        }

        if !decl.dependencies.is_empty() {
            self.open("dependencies")?;
            for dep in &decl.dependencies {
                self.line(format_args!(
                    "{}({})",
                    identifier(&dep.configuration),
                    quote(&dep.notation())
                ))?;
            }
            self.close()?;
        }

        Ok(())
    }

    fn android(&mut self, android: &AndroidBlock) -> fmt::Result {
        self.open("android")?;

        if let Some(namespace) = &android.namespace {
            self.assign("namespace", quote(namespace))?;
        }
        if let Some(sdk) = &android.compile_sdk {
            self.assign("compileSdk", number(sdk))?;
        }
        if let Some(ndk) = &android.ndk_version {
            self.assign("ndkVersion", text(ndk))?;
        }
        self.pending_gap = true;

        let config = &android.default_config;
        if !config.is_empty() {
            self.open("defaultConfig")?;
            if let Some(id) = &config.application_id {
                self.assign("applicationId", quote(id))?;
            }
            if let Some(v) = &config.min_sdk {
                self.assign("minSdk", number(v))?;
            }
            if let Some(v) = &config.target_sdk {
                self.assign("targetSdk", number(v))?;
            }
            if let Some(v) = &config.version_code {
                self.assign("versionCode", number(v))?;
            }
            if let Some(v) = &config.version_name {
                self.assign("versionName", text(v))?;
            }
            self.close()?;
        }

        if !android.build_types.is_empty() {
            self.open("buildTypes")?;
            for (name, build_type) in &android.build_types {
                let head = if name == RELEASE_BUILD_TYPE || name == DEBUG_SIGNING_CONFIG {
                    name.clone()
                } else {
                    format!("create({})", quote(name))
                };
                self.pending_gap = false;
                self.open(&head)?;
                if let Some(signing) = &build_type.signing_config {
                    self.assign(
                        "signingConfig",
                        format_args!("signingConfigs.getByName({})", quote(signing)),
                    )?;
                }
                self.close()?;
            }
            self.pending_gap = false;
            self.close()?;
        }

        let options = &android.compile_options;
        if !options.is_empty() {
            self.open("compileOptions")?;
            if let Some(raw) = &options.source_compatibility {
                self.assign("sourceCompatibility", java_version(raw))?;
            }
            if let Some(raw) = &options.target_compatibility {
                self.assign("targetCompatibility", java_version(raw))?;
            }
            if let Some(enabled) = options.is_core_library_desugaring_enabled {
                self.assign("isCoreLibraryDesugaringEnabled", enabled)?;
            }
            self.close()?;
        }

        if let Some(target) = &android.kotlin_options.jvm_target {
            self.open("kotlinOptions")?;
            let value = match java_constant(target) {
                Some(constant) => format!("JavaVersion.{}.toString()", constant),
                None => quote(java_level_spelling(target)),
            };
            self.assign("jvmTarget", value)?;
            self.close()?;
        }

        self.pending_gap = false;
        self.close()
    }
}

/// Quote and escape a Kotlin string literal
fn quote(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    out.push('"');
    for c in raw.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '$' => out.push_str("\\$"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn is_identifier(raw: &str) -> bool {
    let mut chars = raw.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

fn identifier(raw: &str) -> String {
    if is_identifier(raw) {
        raw.to_string()
    } else {
        format!("`{}`", raw)
    }
}

fn reference(path: &str) -> String {
    path.split('.').map(identifier).collect::<Vec<_>>().join(".")
}

fn number(value: &Value<u32>) -> String {
    match value {
        Value::Literal(n) => n.to_string(),
        Value::Reference { reference: path } => reference(path),
    }
}

fn text(value: &Value<String>) -> String {
    match value {
        Value::Literal(s) => quote(s),
        Value::Reference { reference: path } => reference(path),
    }
}

/// `VERSION_17` when it can be written as a `JavaVersion` member
fn java_constant(raw: &str) -> Option<&str> {
    let raw = java_level_spelling(raw);
    (raw.starts_with("VERSION_") && is_identifier(raw)).then_some(raw)
}

fn java_version(raw: &str) -> String {
    match java_constant(raw) {
        Some(constant) => format!("JavaVersion.{}", constant),
        None => format!("JavaVersion.toVersion({})", quote(java_level_spelling(raw))),
    }
}
