//! Maps a parsed Kotlin DSL script onto a [`Declaration`]
//!
//! Assignments are addressed by their full dotted path, so
//! `android { defaultConfig { minSdk = 21 } }` and
//! `android.defaultConfig.minSdk = 21` mean the same thing. Statements
//! outside the recognised set are skipped.

use super::syntax::{parse_script, Arg, Expr, Segment, Statement, StatementKind};
use crate::descriptor::{
    java_level_spelling, BuildType, Declaration, DependencyDeclaration, FlutterBlock, Value,
};
use crate::error::DescriptorError;

/// Methods that name a build type by their first argument
const NAMING_METHODS: [&str; 5] = ["getByName", "create", "maybeCreate", "named", "register"];

/// Parse Kotlin DSL source into a declaration
pub fn parse(source: &str) -> Result<Declaration, DescriptorError> {
    let statements = parse_script(source)?;
    let mut reader = Reader::default();
    reader.visit_all(&statements, &[])?;
    Ok(reader.declaration)
}

#[derive(Default)]
struct Reader {
    declaration: Declaration,
}

impl Reader {
    fn visit_all(&mut self, statements: &[Statement], scope: &[String]) -> Result<(), DescriptorError> {
        for statement in statements {
            self.visit(statement, scope)?;
        }
        Ok(())
    }

    fn visit(&mut self, statement: &Statement, scope: &[String]) -> Result<(), DescriptorError> {
        match &statement.kind {
            StatementKind::Import(_) | StatementKind::Local { .. } => Ok(()),
            StatementKind::Block { head, body } => {
                let inner = self.enter_block(scope, head);
                self.visit_all(body, &inner)
            }
            StatementKind::Assign { target, value } => {
                match plain_names(target) {
                    Some(names) => {
                        let path = join_path(scope, &names);
                        self.assign(&path, value, statement)
                    }
                    None => {
                        tracing::debug!(line = statement.line, "Skipping assignment to call chain");
                        Ok(())
                    }
                }
            }
            StatementKind::Call { chain, .. } => self.call(scope, chain, statement),
        }
    }

    /// Scope for the body of a block, registering blocks whose presence matters
    fn enter_block(&mut self, scope: &[String], head: &[Segment]) -> Vec<String> {
        let mut inner = scope.to_vec();
        let Some((last, parents)) = head.split_last() else {
            return inner;
        };
        inner.extend(parents.iter().map(|s| s.name.clone()));

        if scope_is(&inner, "android.buildTypes") {
            let name = build_type_name(last);
            self.declaration
                .android
                .build_types
                .entry(name.clone())
                .or_default();
            inner.push(name);
            return inner;
        }

        inner.push(last.name.clone());
        if scope_is(&inner, "flutter") && self.declaration.flutter.is_none() {
            self.declaration.flutter = Some(FlutterBlock::default());
        }
        inner
    }

    fn assign(&mut self, path: &str, value: &Expr, at: &Statement) -> Result<(), DescriptorError> {
        let android = &mut self.declaration.android;

        match path {
            "android.namespace" => android.namespace = Some(string(path, value, at)?),
            "android.compileSdk" | "android.compileSdkVersion" => {
                android.compile_sdk = Some(int_value(path, value, at)?)
            }
            "android.ndkVersion" => android.ndk_version = Some(text_value(path, value, at)?),
            "android.defaultConfig.applicationId" => {
                android.default_config.application_id = Some(string(path, value, at)?)
            }
            "android.defaultConfig.minSdk" | "android.defaultConfig.minSdkVersion" => {
                android.default_config.min_sdk = Some(int_value(path, value, at)?)
            }
            "android.defaultConfig.targetSdk" | "android.defaultConfig.targetSdkVersion" => {
                android.default_config.target_sdk = Some(int_value(path, value, at)?)
            }
            "android.defaultConfig.versionCode" => {
                android.default_config.version_code = Some(int_value(path, value, at)?)
            }
            "android.defaultConfig.versionName" => {
                android.default_config.version_name = Some(text_value(path, value, at)?)
            }
            "android.compileOptions.sourceCompatibility" => {
                android.compile_options.source_compatibility = Some(java_version(path, value, at)?)
            }
            "android.compileOptions.targetCompatibility" => {
                android.compile_options.target_compatibility = Some(java_version(path, value, at)?)
            }
            "android.compileOptions.isCoreLibraryDesugaringEnabled" => {
                android.compile_options.is_core_library_desugaring_enabled =
                    Some(boolean(path, value, at)?)
            }
            "android.kotlinOptions.jvmTarget" => {
                android.kotlin_options.jvm_target = Some(jvm_target(path, value, at)?)
            }
            "flutter.source" => {
                let source = string(path, value, at)?;
                self.declaration.flutter.get_or_insert_with(FlutterBlock::default).source = Some(source);
            }
            _ => match path
                .strip_prefix("android.buildTypes.")
                .and_then(|rest| rest.strip_suffix(".signingConfig"))
            {
                Some(build_type) => {
                    let signing = signing_name(path, value, at)?;
                    android.build_types.insert(
                        build_type.to_string(),
                        BuildType {
                            signing_config: signing,
                        },
                    );
                }
                None => tracing::debug!(path, line = at.line, "Skipping unrecognised assignment"),
            },
        }

        Ok(())
    }

    fn call(&mut self, scope: &[String], chain: &[Segment], at: &Statement) -> Result<(), DescriptorError> {
        if scope_is(scope, "plugins") {
            match plugin_id(chain) {
                Some(id) => self.declaration.plugins.push(id),
                None => tracing::debug!(line = at.line, "Skipping unrecognised plugin entry"),
            }
            return Ok(());
        }

        if scope_is(scope, "dependencies") {
            match dependency(chain) {
                Some(dep) => self.declaration.dependencies.push(dep),
                None => tracing::debug!(line = at.line, "Skipping non-module dependency"),
            }
            return Ok(());
        }

        // Setter-call style: `minSdkVersion(21)`, `namespace("...")`
        if let [Segment {
            name,
            args: Some(args),
        }] = chain
        {
            if let [Arg { name: None, value }] = args.as_slice() {
                let path = join_path(scope, &[name.clone()]);
                return self.assign(&path, value, at);
            }
        }

        tracing::debug!(line = at.line, "Skipping unrecognised call");
        Ok(())
    }
}

fn scope_is(scope: &[String], dotted: &str) -> bool {
    scope.join(".") == dotted
}

fn join_path(scope: &[String], names: &[String]) -> String {
    scope
        .iter()
        .chain(names.iter())
        .cloned()
        .collect::<Vec<_>>()
        .join(".")
}

fn plain_names(chain: &[Segment]) -> Option<Vec<String>> {
    chain
        .iter()
        .map(|s| s.args.is_none().then(|| s.name.clone()))
        .collect()
}

fn single_string_arg(segment: &Segment) -> Option<&str> {
    match segment.args.as_deref() {
        Some([Arg {
            name: None,
            value: Expr::Str(text),
        }]) => Some(text.as_str()),
        _ => None,
    }
}

fn build_type_name(head: &Segment) -> String {
    match single_string_arg(head) {
        Some(name) if NAMING_METHODS.contains(&head.name.as_str()) => name.to_string(),
        _ => head.name.clone(),
    }
}

fn plugin_id(chain: &[Segment]) -> Option<String> {
    match chain {
        [segment] if segment.name == "id" => single_string_arg(segment).map(str::to_string),
        [segment] if segment.name == "kotlin" => {
            single_string_arg(segment).map(|s| format!("org.jetbrains.kotlin.{}", s))
        }
        [segment] if segment.args.is_none() => Some(segment.name.clone()),
        _ => None,
    }
}

fn dependency(chain: &[Segment]) -> Option<DependencyDeclaration> {
    let [segment] = chain else {
        return None;
    };
    let args = segment.args.as_deref()?;

    if let Some(notation) = single_string_arg(segment) {
        return Some(DependencyDeclaration::from_notation(segment.name.clone(), notation));
    }

    // Named form: implementation(group = "g", name = "a", version = "v")
    let named = |key: &str| {
        args.iter().find_map(|arg| match (&arg.name, &arg.value) {
            (Some(n), Expr::Str(v)) if n == key => Some(v.clone()),
            _ => None,
        })
    };
    let group = named("group")?;
    let artifact = named("name")?;
    Some(DependencyDeclaration::new(
        segment.name.clone(),
        format!("{}:{}", group, artifact),
        named("version").unwrap_or_default(),
    ))
}

fn invalid(path: &str, expected: &str, at: &Statement) -> DescriptorError {
    DescriptorError::invalid(at.line, at.column, format!("{} expects {}", path, expected))
}

fn string(path: &str, value: &Expr, at: &Statement) -> Result<String, DescriptorError> {
    match value {
        Expr::Str(text) => Ok(text.clone()),
        _ => Err(invalid(path, "a string", at)),
    }
}

fn boolean(path: &str, value: &Expr, at: &Statement) -> Result<bool, DescriptorError> {
    value.as_bool().ok_or_else(|| invalid(path, "true or false", at))
}

fn int_value(path: &str, value: &Expr, at: &Statement) -> Result<Value<u32>, DescriptorError> {
    match value {
        Expr::Int(i) => u32::try_from(*i)
            .map(Value::Literal)
            .map_err(|_| invalid(path, "a non-negative integer", at)),
        other => other
            .as_path()
            .map(Value::reference)
            .ok_or_else(|| invalid(path, "an integer or a toolchain reference", at)),
    }
}

fn text_value(path: &str, value: &Expr, at: &Statement) -> Result<Value<String>, DescriptorError> {
    match value {
        Expr::Str(text) => Ok(Value::Literal(text.clone())),
        other => other
            .as_path()
            .map(Value::reference)
            .ok_or_else(|| invalid(path, "a string or a toolchain reference", at)),
    }
}

/// `JavaVersion.VERSION_17` or `JavaVersion.toVersion("17")`, stored as `VERSION_17`/`17`
fn java_version(path: &str, value: &Expr, at: &Statement) -> Result<String, DescriptorError> {
    let raw = match value {
        Expr::Str(text) => text.clone(),
        Expr::Int(i) => i.to_string(),
        Expr::Chain(segments) => match segments.as_slice() {
            [first, last] if first.name == "JavaVersion" && last.name == "toVersion" => {
                match single_string_arg(last) {
                    Some(text) => text.to_string(),
                    None => return Err(invalid(path, "a JavaVersion constant", at)),
                }
            }
            _ => value
                .as_path()
                .ok_or_else(|| invalid(path, "a JavaVersion constant", at))?,
        },
    };
    Ok(java_level_spelling(&raw).to_string())
}

/// `"17"` or `JavaVersion.VERSION_17.toString()`
fn jvm_target(path: &str, value: &Expr, at: &Statement) -> Result<String, DescriptorError> {
    match value {
        Expr::Str(text) => Ok(java_level_spelling(text).to_string()),
        Expr::Chain(segments) => {
            let segments = match segments.split_last() {
                Some((last, rest))
                    if last.name == "toString" && matches!(last.args.as_deref(), Some([])) =>
                {
                    rest
                }
                _ => segments.as_slice(),
            };
            Expr::Chain(segments.to_vec())
                .as_path()
                .filter(|p| !p.is_empty())
                .map(|p| java_level_spelling(&p).to_string())
                .ok_or_else(|| invalid(path, "a JVM target", at))
        }
        Expr::Int(_) => Err(invalid(path, "a JVM target string", at)),
    }
}

/// `signingConfigs.getByName("debug")`, `signingConfigs.debug` or `null`
fn signing_name(path: &str, value: &Expr, at: &Statement) -> Result<Option<String>, DescriptorError> {
    let Expr::Chain(segments) = value else {
        return Err(invalid(path, "a signing config", at));
    };

    match segments.as_slice() {
        [only] if only.name == "null" && only.args.is_none() => Ok(None),
        [registry, entry] if registry.name == "signingConfigs" => {
            if NAMING_METHODS.contains(&entry.name.as_str()) {
                single_string_arg(entry)
                    .map(|name| Some(name.to_string()))
                    .ok_or_else(|| invalid(path, "a signing config name", at))
            } else if entry.args.is_none() {
                Ok(Some(entry.name.clone()))
            } else {
                Err(invalid(path, "a signing config", at))
            }
        }
        _ => Err(invalid(path, "a signing config", at)),
    }
}
