use std::path::Path;

use crate::core::config::StatsConfig;

/// The `ConfigValidator` trait defines the public interface for checking a
/// configuration before a scan is attempted.
pub trait ConfigValidator {
    /// Performs a full validation of the `StatsConfig` and returns a list of
    /// human-readable issues. An empty list means the configuration is usable.
    fn validate_config(&self, config: &StatsConfig) -> Vec<String>;
}

/// The `StandardValidator` is the default implementation of `ConfigValidator`.
///
/// It catches settings that would make a scan fail outright (a missing source
/// directory) or silently report nothing (an empty marker or filter).
pub struct StandardValidator;

impl StandardValidator {
    pub fn new() -> Self {
        Self
    }

    fn check_source_dir(&self, source_dir: &Path) -> Option<String> {
        if !source_dir.exists() {
            Some(format!("Source directory not found: {}", source_dir.display()))
        } else if !source_dir.is_dir() {
            Some(format!(
                "Source path is not a directory: {}",
                source_dir.display()
            ))
        } else {
            None
        }
    }

    /// Checks the marker for values that can never match a line.
    fn check_marker(&self, marker: &str) -> Vec<String> {
        let mut issues = Vec::new();
        if marker.is_empty() {
            issues.push("Level marker cannot be empty".to_string());
        } else if marker.starts_with(char::is_whitespace) {
            // Lines are only trimmed on the right, so this only matches indented markers.
            issues.push(format!(
                "Level marker '{marker}' starts with whitespace and only matches indented lines"
            ));
        } else if marker.trim_end() != marker {
            issues.push(format!(
                "Level marker '{marker}' ends with whitespace and will never match a trimmed line"
            ));
        }
        issues
    }
}

impl Default for StandardValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigValidator for StandardValidator {
    fn validate_config(&self, config: &StatsConfig) -> Vec<String> {
        let mut issues = Vec::new();

        if let Some(issue) = self.check_source_dir(&config.source_dir) {
            issues.push(issue);
        }

        if config.file_filter.is_empty() {
            issues.push("File filter is empty and will match every file".to_string());
        }

        issues.extend(self.check_marker(&config.level_marker));
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn config_in(dir: &Path) -> StatsConfig {
        StatsConfig {
            source_dir: dir.to_path_buf(),
            ..StatsConfig::default()
        }
    }

    #[test]
    fn test_valid_config_has_no_issues() {
        let dir = tempdir().unwrap();
        let issues = StandardValidator::new().validate_config(&config_in(dir.path()));
        assert!(issues.is_empty(), "unexpected issues: {issues:?}");
    }

    #[test]
    fn test_missing_source_dir() {
        let dir = tempdir().unwrap();
        let config = config_in(&dir.path().join("nope"));
        let issues = StandardValidator::new().validate_config(&config);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].starts_with("Source directory not found"));
    }

    #[test]
    fn test_source_path_is_a_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("file.rs");
        fs::write(&file, "").unwrap();
        let issues = StandardValidator::new().validate_config(&config_in(&file));
        assert!(issues[0].starts_with("Source path is not a directory"));
    }

    #[test]
    fn test_marker_and_filter_checks() {
        let dir = tempdir().unwrap();
        let validator = StandardValidator::new();

        let mut config = config_in(dir.path());
        config.level_marker = String::new();
        config.file_filter = String::new();
        let issues = validator.validate_config(&config);
        assert_eq!(issues.len(), 2);

        config.file_filter = "rs_fhe_lib.rs".to_string();
        config.level_marker = "static LEVEL_ ".to_string();
        assert!(validator.validate_config(&config)[0].contains("ends with whitespace"));

        config.level_marker = "  static LEVEL_".to_string();
        assert!(validator.validate_config(&config)[0].contains("starts with whitespace"));
    }
}
