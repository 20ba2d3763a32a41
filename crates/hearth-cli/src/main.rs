//! Hearth - host application user configuration
//!
//! Usage:
//!   hearth                  # Show the active config (default)
//!   hearth path             # Where the config file lives
//!   hearth get core debug   # Print one stored value
//!   hearth --debug ...      # Force debug logging

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use hearth_core::config::{ConfigLocations, UserConfig, Value};
use hearth_core::context::AppContext;
use hearth_core::logging::LogSwitch;
use hearth_core::types::{ConfigOrigin, ExecParams};

#[derive(Parser)]
#[command(name = "hearth")]
#[command(about = "Host application user configuration", long_about = None)]
struct Cli {
    /// Force debug logging regardless of stored settings
    #[arg(long, global = true)]
    debug: bool,

    /// Log file used while `filelogging` is enabled
    /// (default: hearth_runtime.log in the application data directory)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the resolved config file path and how it was chosen
    Path,

    /// Show every stored section and option
    Show {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Print a single stored value
    Get {
        /// Section name
        section: String,
        /// Option name
        key: String,
    },

    /// Print the content fingerprint of the config
    Fingerprint,

    /// List extension root directories, built-in first
    ExtDirs,
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable INI text
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let exec = ExecParams {
        forced_debug_mode: cli.debug || ExecParams::from_env().forced_debug_mode,
    };
    let ctx = AppContext::from_env(exec)?;

    let switch = LogSwitch::new();
    let log_file = cli
        .log_file
        .clone()
        .unwrap_or_else(|| default_log_file(ctx.locations()));
    init_tracing(&switch, &log_file);

    let config = ctx.user_config(Arc::new(switch));

    match cli.command.unwrap_or(Commands::Show {
        format: OutputFormat::Table,
    }) {
        Commands::Path => run_path(&config),
        Commands::Show { format } => run_show(&config, format)?,
        Commands::Get { section, key } => run_get(&config, &section, &key)?,
        Commands::Fingerprint => println!("{}", config.get_config_version()),
        Commands::ExtDirs => {
            for dir in config.get_ext_root_dirs() {
                println!("{}", dir.display());
            }
        }
    }

    Ok(())
}

fn default_log_file(locations: &ConfigLocations) -> PathBuf {
    locations.universal_data_file("runtime", "log")
}

/// Console output plus an optional log file, both gated by `switch`.
/// `RUST_LOG`, when set, narrows both further.
fn init_tracing(switch: &LogSwitch, log_file: &Path) {
    let env_filter = std::env::var_os("RUST_LOG")
        .is_some()
        .then(EnvFilter::from_default_env);

    let (file, file_error) = match open_log_file(log_file) {
        Ok(file) => (Some(file), None),
        Err(e) => (None, Some(e)),
    };
    let file_layer = file.map(|file| {
        tracing_subscriber::fmt::layer()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_filter(switch.file_filter())
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(switch.console_filter()),
        )
        .with(file_layer)
        .init();

    if let Some(e) = file_error {
        tracing::warn!(path = %log_file.display(), error = %e, "can not open log file");
    }
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

fn run_path(config: &UserConfig) {
    let Some(path) = config.config_file() else {
        println!("(in-memory, not saved)");
        return;
    };
    println!("{}", path.display());

    if let Some(resolution) = config.resolution() {
        let origin = match resolution.origin {
            ConfigOrigin::LocalOverride => "local override",
            ConfigOrigin::Shared => "shared",
        };
        println!("  origin: {}", origin);
        if resolution.legacy_migrated {
            println!("  renamed from legacy file");
        }
        if let Some(seed) = &resolution.seeded_from {
            println!("  seeded from: {}", seed.display());
        }
    }
}

fn run_show(config: &UserConfig, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => print!("{}", config.store().to_ini_string()),
        OutputFormat::Json => {
            let output: BTreeMap<&str, BTreeMap<&str, &Value>> = config
                .store()
                .sections()
                .map(|section| (section.name(), section.iter().collect()))
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

fn run_get(config: &UserConfig, section: &str, key: &str) -> Result<()> {
    let value = config.store().get_section(section)?.require(key)?;
    println!("{}", value.encode());
    Ok(())
}
