use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::builders::levels::{DEFAULT_LEVEL_MARKER, LevelMarker};
use crate::builders::reporter::ReportFormat;
use crate::builders::validator::{ConfigValidator, StandardValidator};

/// Name of the optional configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "level-stats.toml";
pub const DEFAULT_SOURCE_DIR: &str = "src";
pub const DEFAULT_FILE_FILTER: &str = "rs_fhe_lib.rs";

/// Everything the engine needs to know to produce a report.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct StatsConfig {
    /// Directory holding the generated circuit sources.
    pub source_dir: PathBuf,
    /// Only files whose name contains this substring are scanned.
    pub file_filter: String,
    /// Literal prefix that opens a level region.
    pub level_marker: String,
    pub format: ReportFormat,
    pub verbose: bool,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from(DEFAULT_SOURCE_DIR),
            file_filter: DEFAULT_FILE_FILTER.to_string(),
            level_marker: DEFAULT_LEVEL_MARKER.to_string(),
            format: ReportFormat::Text,
            verbose: false,
        }
    }
}

/// Command line values that take precedence over the configuration file.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub source_dir: Option<PathBuf>,
    pub file_filter: Option<String>,
    pub level_marker: Option<String>,
    pub format: Option<ReportFormat>,
    pub verbose: bool,
}

impl StatsConfig {
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(source_dir) = overrides.source_dir {
            self.source_dir = source_dir;
        }
        if let Some(file_filter) = overrides.file_filter {
            self.file_filter = file_filter;
        }
        if let Some(level_marker) = overrides.level_marker {
            self.level_marker = level_marker;
        }
        if let Some(format) = overrides.format {
            self.format = format;
        }
        self.verbose |= overrides.verbose;
    }

    pub fn marker(&self) -> Result<LevelMarker> {
        LevelMarker::new(self.level_marker.clone())
    }
}

/// Formats the configuration can be exported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Toml,
    Json,
    Yaml,
}

impl std::str::FromStr for ExportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "toml" => Ok(ExportFormat::Toml),
            "json" => Ok(ExportFormat::Json),
            "yaml" | "yml" => Ok(ExportFormat::Yaml),
            _ => anyhow::bail!("Invalid export format: {s}"),
        }
    }
}

pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Uses `level-stats.toml` in the current working directory.
    pub fn new() -> Result<Self> {
        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        Ok(Self::new_at(current_dir.join(CONFIG_FILE_NAME)))
    }

    pub fn new_at<P: AsRef<Path>>(config_path: P) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
        }
    }

    /// Writes the default configuration unless a file is already present.
    /// Returns `true` when a new file was written.
    pub fn initialize(&self) -> Result<bool> {
        if self.config_path.exists() {
            return Ok(false);
        }

        self.save_config(&StatsConfig::default())?;
        Ok(true)
    }

    /// Runs the standard validator against the loaded configuration and
    /// returns the issues found.
    pub fn validate_config(&self, config: &StatsConfig) -> Vec<String> {
        StandardValidator::new().validate_config(config)
    }

    pub fn export_config(&self, config: &StatsConfig, format: ExportFormat) -> Result<String> {
        let content = match format {
            ExportFormat::Json => {
                serde_json::to_string_pretty(config).context("Failed to serialize to JSON")?
            }
            ExportFormat::Yaml => {
                serde_yaml::to_string(config).context("Failed to serialize to YAML")?
            }
            ExportFormat::Toml => {
                toml::to_string_pretty(config).context("Failed to serialize to TOML")?
            }
        };
        Ok(content)
    }
}

pub trait ConfigProvider {
    fn load_config(&self) -> Result<StatsConfig>;
    fn save_config(&self, config: &StatsConfig) -> Result<()>;
    fn get_config_path(&self) -> &Path;
}

impl ConfigProvider for ConfigManager {
    fn load_config(&self) -> Result<StatsConfig> {
        if !self.config_path.exists() {
            debug!(path = %self.config_path.display(), "no config file, using defaults");
            return Ok(StatsConfig::default());
        }

        let content = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file {}", self.config_path.display())
        })?;

        toml::from_str(&content).with_context(|| {
            format!("Failed to parse config file {}", self.config_path.display())
        })
    }

    fn save_config(&self, config: &StatsConfig) -> Result<()> {
        let content = toml::to_string_pretty(config).context("Failed to serialize config")?;

        fs::write(&self.config_path, content).with_context(|| {
            format!("Failed to write config file {}", self.config_path.display())
        })?;

        Ok(())
    }

    fn get_config_path(&self) -> &Path {
        &self.config_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_match_generator_layout() {
        let config = StatsConfig::default();
        assert_eq!(config.source_dir, PathBuf::from("src"));
        assert_eq!(config.file_filter, "rs_fhe_lib.rs");
        assert_eq!(config.level_marker, "static LEVEL_");
        assert_eq!(config.format, ReportFormat::Text);
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::new_at(dir.path().join(CONFIG_FILE_NAME));
        assert_eq!(manager.load_config().unwrap(), StatsConfig::default());
    }

    #[test]
    fn test_initialize_then_round_trip() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::new_at(dir.path().join(CONFIG_FILE_NAME));
        assert!(manager.initialize().unwrap());
        assert!(!manager.initialize().unwrap());

        let mut config = manager.load_config().unwrap();
        config.file_filter = "_lib.rs".to_string();
        config.format = ReportFormat::Json;
        manager.save_config(&config).unwrap();

        assert_eq!(manager.load_config().unwrap(), config);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "level_marker = \"const LEVEL_\"\nformat = \"yaml\"\n").unwrap();

        let config = ConfigManager::new_at(&path).load_config().unwrap();
        assert_eq!(config.level_marker, "const LEVEL_");
        assert_eq!(config.format, ReportFormat::Yaml);
        assert_eq!(config.file_filter, DEFAULT_FILE_FILTER);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "source_dir = [").unwrap();

        let err = ConfigManager::new_at(&path).load_config().unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_overrides_take_precedence() {
        let mut config = StatsConfig::default();
        config.apply_overrides(ConfigOverrides {
            source_dir: Some(PathBuf::from("circuits")),
            format: Some(ReportFormat::Json),
            verbose: true,
            ..Default::default()
        });
        assert_eq!(config.source_dir, PathBuf::from("circuits"));
        assert_eq!(config.format, ReportFormat::Json);
        assert_eq!(config.file_filter, DEFAULT_FILE_FILTER);
        assert!(config.verbose);
    }

    #[test]
    fn test_export_formats() {
        let manager = ConfigManager::new_at("unused.toml");
        let config = StatsConfig::default();

        let json = manager.export_config(&config, ExportFormat::Json).unwrap();
        assert!(json.contains("\"file_filter\": \"rs_fhe_lib.rs\""));

        let toml = manager.export_config(&config, ExportFormat::Toml).unwrap();
        assert!(toml.contains("level_marker = \"static LEVEL_\""));

        let yaml = manager.export_config(&config, ExportFormat::Yaml).unwrap();
        assert!(yaml.contains("format: text"));
    }
}
