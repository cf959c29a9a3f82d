//! droidconf CLI
//!
//! Resolves an Android app module's build descriptor against the toolchain
//! and signing configuration, and reports what the build would use.

use anyhow::Result;
use clap::{Parser, Subcommand};
use droidconf_android::{load_declaration, BuildConfig, DescriptorFormat, Project};
use droidconf_cli::output::{format_count, print_error, print_findings, OutputFormat, Status};
use droidconf_core::config::Config;
use droidconf_core::error::{exit_codes, Error};
use droidconf_telemetry::{TelemetryConfig, Timer};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "droidconf")]
#[command(about = "Resolve and validate Android app build configuration")]
#[command(version)]
struct Cli {
    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase output verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Write log events to stderr as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a descriptor and print the build configuration
    Resolve {
        /// Descriptor (.gradle.kts, .toml or .json)
        descriptor: PathBuf,
        /// Properties file with toolchain values (default: ../local.properties)
        #[arg(long)]
        properties: Option<PathBuf>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Resolve a descriptor and report lint findings
    Check {
        /// Descriptor (.gradle.kts, .toml or .json)
        descriptor: PathBuf,
        /// Properties file with toolchain values (default: ../local.properties)
        #[arg(long)]
        properties: Option<PathBuf>,
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },

    /// Convert a descriptor to another format
    Render {
        /// Descriptor (.gradle.kts, .toml or .json)
        descriptor: PathBuf,
        /// Target format: kts, toml, json
        #[arg(long, default_value = "kts")]
        to: DescriptorFormat,
    },
}

fn main() {
    let cli = Cli::parse();

    if cli.no_color {
        owo_colors::set_override(false);
    }

    let telemetry = TelemetryConfig {
        json: cli.log_json,
        ..TelemetryConfig::for_verbosity(cli.verbose, cli.quiet)
    };
    if let Err(e) = droidconf_telemetry::init_with_config(telemetry) {
        Status::warning(&format!("Logging disabled: {}", e));
    }

    let json_errors = matches!(
        cli.command,
        Commands::Resolve {
            format: OutputFormat::Json,
            ..
        }
    );

    let exit_code = match run(&cli) {
        Ok(code) => code,
        Err(e) => report_failure(e, json_errors),
    };

    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> Result<i32> {
    let config = Config::load(cli.config.as_deref())?;
    tracing::debug!(config = ?config.path, "Configuration ready");

    match &cli.command {
        Commands::Resolve {
            descriptor,
            properties,
            format,
        } => run_resolve(cli, &config, descriptor, properties.as_deref(), *format),
        Commands::Check {
            descriptor,
            properties,
            strict,
        } => run_check(
            cli,
            &config,
            descriptor,
            properties.as_deref(),
            *strict || config.schema.resolve.strict,
        ),
        Commands::Render { descriptor, to } => run_render(descriptor, *to),
    }
}

/// Print the error and pick the exit code; JSON callers also get the report on stdout
fn report_failure(err: anyhow::Error, json: bool) -> i32 {
    match err.downcast_ref::<Error>() {
        Some(coded) => {
            if json {
                if let Ok(report) = serde_json::to_string_pretty(&coded.to_report()) {
                    println!("{}", report);
                }
            }
            print_error(coded);
            coded.exit_code()
        }
        None => {
            Status::error(&format!("{:#}", err));
            exit_codes::FAILURE
        }
    }
}

fn run_resolve(
    cli: &Cli,
    config: &Config,
    descriptor: &Path,
    properties: Option<&Path>,
    format: OutputFormat,
) -> Result<i32> {
    tracing::info!(descriptor = %descriptor.display(), ?format, "Resolving descriptor");
    let timer = Timer::start("resolve");
    let project = Project::open(descriptor, config, properties)?;
    let resolved = project.resolve()?;
    timer.stop();
    tracing::info!(
        application_id = resolved.application_id(),
        compile_sdk = resolved.compile_sdk(),
        "Descriptor resolved"
    );

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&resolved)?),
        OutputFormat::Toml => print!("{}", toml::to_string_pretty(&resolved)?),
        OutputFormat::Text => {
            print_config(&resolved);
            if !cli.quiet {
                Status::success(&format!("Resolved {}", descriptor.display()));
            }
        }
    }

    Ok(exit_codes::SUCCESS)
}

fn run_check(
    cli: &Cli,
    config: &Config,
    descriptor: &Path,
    properties: Option<&Path>,
    strict: bool,
) -> Result<i32> {
    tracing::info!(descriptor = %descriptor.display(), strict, "Checking descriptor");
    if strict && !cli.quiet {
        Status::info("Strict mode: warnings count as errors");
    }

    let project = Project::open(descriptor, config, properties)?;
    let report = project.check(strict)?;
    tracing::info!(
        errors = report.findings.errors().len(),
        warnings = report.findings.warnings().len(),
        "Check finished"
    );

    print_findings(&report.findings);

    if !report.passed() {
        Status::error(&format!(
            "Check failed: {}",
            format_count(report.findings.errors().len(), "error", "errors")
        ));
        return Ok(exit_codes::VALIDATION_ERROR);
    }

    if !cli.quiet {
        Status::success(&format!(
            "{} is valid ({})",
            descriptor.display(),
            format_count(report.findings.warnings().len(), "warning", "warnings")
        ));
    }
    Ok(exit_codes::SUCCESS)
}

fn run_render(descriptor: &Path, to: DescriptorFormat) -> Result<i32> {
    tracing::info!(descriptor = %descriptor.display(), %to, "Rendering descriptor");
    let declaration = load_declaration(descriptor)?;
    print!("{}", to.render(&declaration)?);
    Ok(exit_codes::SUCCESS)
}

fn print_config(config: &BuildConfig) {
    Status::header("Build configuration");
    Status::field("applicationId", config.application_id());
    Status::field("namespace", config.namespace());
    Status::field("minSdk", config.min_sdk());
    Status::field("targetSdk", config.target_sdk());
    Status::field("compileSdk", config.compile_sdk());
    if let Some(code) = config.version_code() {
        Status::field("versionCode", code);
    }
    if let Some(name) = config.version_name() {
        Status::field("versionName", name);
    }
    if let Some(ndk) = config.ndk_version() {
        Status::field("ndkVersion", ndk);
    }
    Status::field("sourceCompatibility", config.source_compatibility());
    Status::field("targetCompatibility", config.target_compatibility());
    Status::field("jvmTarget", config.jvm_target().jvm_target());
    Status::field("coreLibraryDesugaring", config.core_library_desugaring());
    Status::field("signingConfig", config.signing_config().unwrap_or("-"));

    if !config.plugins().is_empty() {
        Status::header("Plugins");
        for plugin in config.plugins() {
            println!("  {}", plugin);
        }
    }

    if !config.dependencies().is_empty() {
        Status::header("Dependencies");
        for dependency in config.dependencies() {
            println!("  {}", dependency);
        }
    }
}
