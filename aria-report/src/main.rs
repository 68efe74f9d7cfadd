//! aria-report - command-line entry point
//!
//! Subcommands:
//! - `run`: full pipeline with the configured generators
//! - `generate-report`: same, with `--meta key=value` package metadata
//! - `init-config`: write a default TOML configuration

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use indexmap::IndexMap;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use aria_common::config::{
    load_config, resolve_base_path, resolve_config_path, write_toml_config, LoggingConfig,
    TomlConfig, BASE_PATH_ENV,
};
use aria_report::{parse_metadata_overrides, run_default};

/// Command-line arguments for aria-report
#[derive(Parser, Debug)]
#[command(name = "aria-report")]
#[command(about = "Draft grounded reports from raw project materials")]
#[command(version)]
struct Args {
    /// Configuration file (TOML)
    #[arg(short, long, global = true, env = "ARIA_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the full pipeline
    Run {
        /// Project root containing `materials/`
        #[arg(long)]
        base_path: Option<PathBuf>,

        /// Report title
        #[arg(long)]
        title: String,
    },

    /// Run the full pipeline with package metadata overrides
    GenerateReport {
        /// Project root containing `materials/`
        #[arg(long)]
        base_path: Option<PathBuf>,

        /// Report title
        #[arg(long)]
        title: String,

        /// Repeatable key=value entries added to the package metadata
        #[arg(long = "meta", value_name = "KEY=VALUE")]
        meta: Vec<String>,
    },

    /// Write a default configuration file
    InitConfig {
        /// Destination path
        #[arg(long)]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .context("Invalid log level")?;
    let registry = tracing_subscriber::registry().with(filter);

    match &logging.file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            registry
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .init();
        }
        None => registry.with(fmt::layer().with_writer(std::io::stderr)).init(),
    }
    Ok(())
}

/// Config for a pipeline command; `<base>/aria-report.toml` is honoured
///
/// Tracing is installed from the loaded config, so the source is logged here
/// rather than while loading.
fn load_pipeline_config(explicit: Option<&Path>, base_hint: Option<&Path>) -> Result<TomlConfig> {
    let env_base = std::env::var_os(BASE_PATH_ENV).map(PathBuf::from);
    let hint = base_hint.or(env_base.as_deref());
    let path = resolve_config_path(explicit, hint);
    let config = load_config(path.as_deref()).context("Failed to load configuration")?;

    init_tracing(&config.logging)?;
    info!("Starting aria-report v{}", env!("CARGO_PKG_VERSION"));
    info!("{}", config_source(path.as_deref()));
    Ok(config)
}

fn config_source(path: Option<&Path>) -> String {
    match path {
        Some(path) => format!("Loaded configuration from {}", path.display()),
        None => "No configuration file found; using built-in defaults".to_string(),
    }
}

async fn run_pipeline(
    config: &TomlConfig,
    base_path: Option<&Path>,
    title: &str,
    overrides: IndexMap<String, String>,
) -> Result<()> {
    let base = resolve_base_path(base_path, BASE_PATH_ENV, config);
    info!("Base path: {}", base.display());

    let package = run_default(&base, title, config, &overrides)
        .await
        .context("Report pipeline failed")?;

    println!(
        "Wrote '{}' ({} sections)",
        package.draft.title,
        package.draft.sections.len()
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Command::InitConfig { output, force } => {
            if output.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", output.display());
            }
            write_toml_config(&TomlConfig::default(), &output)
                .context("Failed to write configuration")?;
            println!("Wrote default configuration to {}", output.display());
            Ok(())
        }
        Command::Run { base_path, title } => {
            let config = load_pipeline_config(args.config.as_deref(), base_path.as_deref())?;
            run_pipeline(&config, base_path.as_deref(), &title, IndexMap::new()).await
        }
        Command::GenerateReport {
            base_path,
            title,
            meta,
        } => {
            let overrides = parse_metadata_overrides(&meta).context("Invalid --meta entry")?;
            let config = load_pipeline_config(args.config.as_deref(), base_path.as_deref())?;
            run_pipeline(&config, base_path.as_deref(), &title, overrides).await
        }
    }
}
