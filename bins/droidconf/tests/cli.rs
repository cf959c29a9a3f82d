use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const APP_KTS: &str = r#"plugins {
    id("com.android.application")
    id("kotlin-android")
    id("dev.flutter.flutter-gradle-plugin")
}

android {
    namespace = "com.example.test_app"
    compileSdk = flutter.compileSdkVersion
    ndkVersion = "27.0.12077973"

    defaultConfig {
        applicationId = "com.example.test_app"
        minSdk = 21
        targetSdk = flutter.targetSdkVersion
        versionCode = flutter.versionCode
        versionName = flutter.versionName
    }

    buildTypes {
        release {
            signingConfig = signingConfigs.getByName("debug")
        }
    }

    compileOptions {
        sourceCompatibility = JavaVersion.VERSION_17
        targetCompatibility = JavaVersion.VERSION_17
        isCoreLibraryDesugaringEnabled = true
    }

    kotlinOptions {
        jvmTarget = JavaVersion.VERSION_17.toString()
    }
}

flutter {
    source = "../.."
}

dependencies {
    coreLibraryDesugaring("com.android.tools:desugar_jdk_libs:2.1.4")
}
"#;

const CONFIG: &str = r#"
[toolchain]
"flutter.compileSdkVersion" = 35
"flutter.targetSdkVersion" = 35
"#;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Flutter layout: android/app/build.gradle.kts, android/local.properties
    fn new(script: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let app = dir.path().join("android").join("app");
        std::fs::create_dir_all(&app).unwrap();
        std::fs::write(app.join("build.gradle.kts"), script).unwrap();
        std::fs::write(
            dir.path().join("android").join("local.properties"),
            "flutter.sdk=/opt/flutter\nflutter.versionCode=3\nflutter.versionName=1.2.0\n",
        )
        .unwrap();
        std::fs::write(dir.path().join(".droidconf.toml"), CONFIG).unwrap();
        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn descriptor(&self) -> PathBuf {
        self.path().join("android").join("app").join("build.gradle.kts")
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("droidconf").unwrap();
        cmd.current_dir(self.path())
            .env("XDG_CONFIG_HOME", self.path())
            .env_remove("RUST_LOG")
            .arg("--no-color");
        cmd
    }
}

#[test]
fn test_resolve_text() {
    let ws = Workspace::new(APP_KTS);

    ws.cmd()
        .arg("resolve")
        .arg(ws.descriptor())
        .assert()
        .success()
        .stdout(predicate::str::contains("com.example.test_app"))
        .stdout(predicate::str::contains("1.2.0"))
        .stdout(predicate::str::contains("desugar_jdk_libs"));
}

#[test]
fn test_resolve_json() {
    let ws = Workspace::new(APP_KTS);

    let output = ws
        .cmd()
        .args(["resolve", "--format", "json"])
        .arg(ws.descriptor())
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["minSdk"], 21);
    assert_eq!(json["compileSdk"], 35);
    assert_eq!(json["versionCode"], 3);
    assert_eq!(json["targetCompatibility"], "VERSION_17");
    assert_eq!(json["buildTypes"]["release"]["signingConfig"], "debug");
}

#[test]
fn test_unknown_signing_config_exits_with_validation_error() {
    let ws = Workspace::new(&APP_KTS.replace(
        "getByName(\"debug\")",
        "getByName(\"release-unknown\")",
    ));

    ws.cmd()
        .arg("resolve")
        .arg(ws.descriptor())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("release-unknown"))
        .stderr(predicate::str::contains("E6006"));
}

#[test]
fn test_json_error_report() {
    let ws = Workspace::new(&APP_KTS.replace("minSdk = 21", ""));

    let output = ws
        .cmd()
        .args(["resolve", "--format", "json"])
        .arg(ws.descriptor())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["code"], "MISSING_FIELD");
    assert_eq!(report["code_str"], "E6001");
    assert_eq!(report["context"], "android.defaultConfig.minSdk");
}

#[test]
fn test_invalid_sdk_ordering_exits_with_validation_error() {
    let ws = Workspace::new(&APP_KTS.replace("minSdk = 21", "minSdk = 40"));

    ws.cmd()
        .arg("resolve")
        .arg(ws.descriptor())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("minSdk <= targetSdk <= compileSdk"));
}

#[test]
fn test_duplicate_dependency_exits_with_validation_error() {
    let ws = Workspace::new(&APP_KTS.replace(
        "coreLibraryDesugaring(\"com.android.tools:desugar_jdk_libs:2.1.4\")",
        "coreLibraryDesugaring(\"com.android.tools:desugar_jdk_libs:2.1.4\")\n    implementation(\"com.android.tools:desugar_jdk_libs:2.0.0\")",
    ));

    ws.cmd()
        .arg("resolve")
        .arg(ws.descriptor())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("duplicate coordinate"));
}

#[test]
fn test_syntax_error_exits_with_config_error() {
    let ws = Workspace::new("android {\n    namespace = \n");

    ws.cmd()
        .arg("resolve")
        .arg(ws.descriptor())
        .assert()
        .code(3)
        .stderr(predicate::str::contains("syntax error"));
}

#[test]
fn test_missing_descriptor_fails() {
    let ws = Workspace::new(APP_KTS);

    ws.cmd()
        .args(["resolve", "nowhere/build.gradle.kts"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn test_missing_explicit_config_exits_with_config_error() {
    let ws = Workspace::new(APP_KTS);

    ws.cmd()
        .args(["--config", "missing.toml", "resolve"])
        .arg(ws.descriptor())
        .assert()
        .code(3);
}

#[test]
fn test_check_reports_warnings() {
    let ws = Workspace::new(APP_KTS);

    ws.cmd()
        .arg("check")
        .arg(ws.descriptor())
        .assert()
        .success()
        .stderr(predicate::str::contains("RELEASE_DEBUG_SIGNED"))
        .stdout(predicate::str::contains("1 warning"));
}

#[test]
fn test_check_strict_fails_on_warnings() {
    let ws = Workspace::new(APP_KTS);

    ws.cmd()
        .args(["check", "--strict"])
        .arg(ws.descriptor())
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Strict mode"))
        .stderr(predicate::str::contains("Check failed: 1 error"));
}

#[test]
fn test_verbose_logs_go_to_stderr_as_json() {
    let ws = Workspace::new(APP_KTS);

    let output = ws
        .cmd()
        .args(["-v", "--log-json", "resolve", "--format", "json"])
        .arg(ws.descriptor())
        .output()
        .unwrap();
    assert!(output.status.success());

    // stdout stays a single JSON document
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["minSdk"], 21);

    let stderr = String::from_utf8(output.stderr).unwrap();
    let event = stderr
        .lines()
        .filter_map(|line| serde_json::from_str::<serde_json::Value>(line).ok())
        .find(|event| event["fields"]["message"] == "Resolving descriptor")
        .expect("resolve event logged");
    assert_eq!(event["level"], "INFO");
}

#[test]
fn test_string_template_exits_with_config_error() {
    let ws = Workspace::new(&APP_KTS.replace(
        "namespace = \"com.example.test_app\"",
        "namespace = \"com.example.$flavor\"",
    ));

    ws.cmd()
        .arg("resolve")
        .arg(ws.descriptor())
        .assert()
        .code(3)
        .stderr(predicate::str::contains("string templates are not supported"));
}

#[test]
fn test_render_toml_then_resolve() {
    let ws = Workspace::new(APP_KTS);

    let output = ws
        .cmd()
        .args(["render", "--to", "toml"])
        .arg(ws.descriptor())
        .output()
        .unwrap();
    assert!(output.status.success());

    let toml_path = ws.path().join("android").join("app").join("build.toml");
    std::fs::write(&toml_path, &output.stdout).unwrap();

    ws.cmd()
        .args(["resolve", "--format", "json"])
        .arg(&toml_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"compileSdk\": 35"));
}

#[test]
fn test_render_kts_is_stable() {
    let ws = Workspace::new(APP_KTS);

    let first = ws.cmd().arg("render").arg(ws.descriptor()).output().unwrap();
    assert!(first.status.success());

    let copy = ws.path().join("copy.gradle.kts");
    std::fs::write(&copy, &first.stdout).unwrap();
    let second = ws.cmd().arg("render").arg(&copy).output().unwrap();

    assert_eq!(first.stdout, second.stdout);
}
