use anyhow::Result;
use std::io::{self, Write};
use tracing::info;

use crate::core::config::{
    ConfigManager, ConfigOverrides, ConfigProvider, ExportFormat, StatsConfig,
};
use crate::core::engine::StatsEngine;
use crate::core::source::FsSourceTree;

/// Loads the configuration file (or defaults) and layers the command line on top.
pub fn load_effective_config(
    config_manager: &ConfigManager,
    overrides: ConfigOverrides,
) -> Result<StatsConfig> {
    let mut config = config_manager.load_config()?;
    config.apply_overrides(overrides);
    Ok(config)
}

/// Scans the configured directory and prints the report to stdout.
pub fn run_report(config: StatsConfig) -> Result<()> {
    let tree = FsSourceTree::new(&config.source_dir);
    let engine = StatsEngine::new(config, tree)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    engine.run(&mut out)
}

pub fn initialize_config(config_manager: &ConfigManager) -> Result<()> {
    let path = config_manager.get_config_path().display();
    if config_manager.initialize()? {
        info!(path = %path, "wrote default configuration");
        println!("✓ Created {path}");
    } else {
        println!("Configuration already exists at {path}");
    }
    Ok(())
}

pub fn validate_config(config_manager: &ConfigManager, config: &StatsConfig) -> Result<()> {
    let issues = config_manager.validate_config(config);

    if issues.is_empty() {
        println!("✓ Configuration is valid.");
        Ok(())
    } else {
        println!("⚠️  Found issues in configuration:");
        for issue in issues {
            println!("  - {issue}");
        }
        anyhow::bail!("Configuration validation failed.");
    }
}

pub fn show_config(
    config_manager: &ConfigManager,
    config: &StatsConfig,
    format: ExportFormat,
) -> Result<()> {
    let content = config_manager.export_config(config, format)?;
    let mut out = io::stdout().lock();
    out.write_all(content.as_bytes())?;
    if !content.ends_with('\n') {
        writeln!(out)?;
    }
    Ok(())
}
