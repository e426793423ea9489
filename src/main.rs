/// Gate and level statistics for generated FHE circuits.
/// The circuit generator writes every evaluation level as a
/// `static LEVEL_<n>` table terminated by a blank line. Running
/// this tool next to the generated `src/` directory prints, for
/// each `*rs_fhe_lib.rs` file, how many gates and levels it holds
/// and how wide every level is.
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, Registry, reload};

use fhe_level_stats::builders::reporter::ReportFormat;
use fhe_level_stats::core::config::{ConfigManager, ConfigOverrides, ExportFormat, StatsConfig};
use fhe_level_stats::utils;

#[derive(Parser)]
#[command(name = "fhe-level-stats")]
#[command(about = "Report gate and level counts for generated FHE circuit sources")]
#[command(version)]
struct Cli {
    /// Path to the configuration file (defaults to ./level-stats.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    scan: ScanArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct ScanArgs {
    /// Directory holding the generated sources
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Only scan files whose name contains this text
    #[arg(long, global = true)]
    filter: Option<String>,

    /// Line prefix that opens a level
    #[arg(long, global = true)]
    marker: Option<String>,

    /// Report format: text, json or yaml
    #[arg(long, global = true)]
    format: Option<ReportFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan the sources and print the report (the default)
    Report,
    /// Write a default configuration file
    Init,
    /// Check the effective configuration for problems
    Validate,
    /// Print the effective configuration
    ShowConfig {
        /// Config syntax to print: toml, json or yaml
        #[arg(long = "as", default_value = "toml")]
        syntax: ExportFormat,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_manager = match &cli.config {
        Some(path) => ConfigManager::new_at(path),
        None => ConfigManager::new()?,
    };

    // Logging starts before the config file is read so loading can be traced.
    let log_filter = init_tracing(cli.verbose);

    let overrides = ConfigOverrides {
        source_dir: cli.scan.dir.clone(),
        file_filter: cli.scan.filter.clone(),
        level_marker: cli.scan.marker.clone(),
        format: cli.scan.format,
        verbose: cli.verbose,
    };

    // `init` must work even when an existing config file is broken.
    let load_config = || -> Result<StatsConfig> {
        let config = utils::load_effective_config(&config_manager, overrides)?;
        if config.verbose && !cli.verbose {
            enable_debug_logging(&log_filter);
        }
        Ok(config)
    };

    match cli.command {
        Some(Commands::Init) => utils::initialize_config(&config_manager),
        None | Some(Commands::Report) => utils::run_report(load_config()?),
        Some(Commands::Validate) => {
            let config = load_config()?;
            utils::validate_config(&config_manager, &config)
        }
        Some(Commands::ShowConfig { syntax }) => {
            let config = load_config()?;
            utils::show_config(&config_manager, &config, syntax)
        }
    }
}

type LogFilterHandle = reload::Handle<EnvFilter, Registry>;

/// Initialize tracing on stderr with an env-driven filter (default WARN).
/// The returned handle lets a config file raise the level after loading.
fn init_tracing(verbose: bool) -> LogFilterHandle {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let (filter, handle) = reload::Layer::new(filter);
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
    handle
}

/// Switches to debug output unless `RUST_LOG` already picked the filter.
fn enable_debug_logging(handle: &LogFilterHandle) {
    if std::env::var_os("RUST_LOG").is_some() {
        return;
    }
    if let Err(err) = handle.modify(|filter| *filter = EnvFilter::new("debug")) {
        tracing::warn!(error = %err, "could not raise log level");
    }
}
