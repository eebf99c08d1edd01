//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.esgdash.toml` files.

use crate::analysis::ScoreWeights;
use crate::report::ReportOptions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".esgdash.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Data source settings.
    #[serde(default)]
    pub data: DataConfig,

    /// ESG scoring settings.
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// Where the metric records come from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Path to the JSON record collection.
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("data/esg_data.json")
}

/// Weights for the overall ESG score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_safety_weight")]
    pub safety_weight: f64,

    #[serde(default = "default_environment_weight")]
    pub environment_weight: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            safety_weight: default_safety_weight(),
            environment_weight: default_environment_weight(),
        }
    }
}

fn default_safety_weight() -> f64 {
    0.4
}

fn default_environment_weight() -> f64 {
    0.6
}

impl ScoringConfig {
    pub fn weights(&self) -> ScoreWeights {
        ScoreWeights {
            safety: self.safety_weight,
            environment: self.environment_weight,
        }
    }
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Include the data overview table.
    #[serde(default = "default_true")]
    pub include_overview: bool,

    /// Minimum magnitude of a year-over-year change worth listing.
    #[serde(default = "default_change_threshold")]
    pub change_threshold: f64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            include_overview: true,
            change_threshold: default_change_threshold(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_change_threshold() -> f64 {
    0.1
}

impl ReportConfig {
    pub fn options(&self) -> ReportOptions {
        ReportOptions {
            include_overview: self.include_overview,
            change_threshold: self.change_threshold,
        }
    }
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Reject settings that would make scores or reports meaningless.
    pub fn validate(&self) -> Result<()> {
        let safety_weight = self.scoring.safety_weight;
        let environment_weight = self.scoring.environment_weight;

        if safety_weight < 0.0 || environment_weight < 0.0 {
            anyhow::bail!("Scoring weights must not be negative");
        }
        if safety_weight + environment_weight <= 0.0 {
            anyhow::bail!("At least one scoring weight must be positive");
        }
        if self.report.change_threshold < 0.0 {
            anyhow::bail!("Change threshold must not be negative");
        }

        Ok(())
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref data) = args.data {
            self.data.path = data.clone();
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Log level after merging: `--quiet` wins over `verbose` from either source.
    pub fn log_level(&self, args: &crate::cli::Args) -> tracing::Level {
        if self.general.verbose && !args.quiet {
            tracing::Level::DEBUG
        } else {
            args.log_level()
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.data.path, PathBuf::from("data/esg_data.json"));
        assert_eq!(config.scoring.weights(), ScoreWeights::default());
        assert!(config.report.include_overview);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
verbose = true

[data]
path = "/srv/esg/records.json"

[scoring]
safety_weight = 0.5
environment_weight = 0.5

[report]
change_threshold = 1.0
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert!(config.general.verbose);
        assert_eq!(config.data.path, PathBuf::from("/srv/esg/records.json"));
        assert_eq!(config.scoring.safety_weight, 0.5);
        assert_eq!(config.report.change_threshold, 1.0);
        assert!(config.report.include_overview);
    }

    #[test]
    fn test_invalid_weights() {
        let mut config = Config::default();
        config.scoring.safety_weight = -1.0;
        assert!(config.validate().is_err());

        config.scoring.safety_weight = 0.0;
        config.scoring.environment_weight = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[scoring]\nsafety_weight = 0.7\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.scoring.safety_weight, 0.7);
        assert_eq!(config.scoring.environment_weight, 0.6);
    }

    #[test]
    fn test_merge_with_args() {
        let args = crate::cli::Args::parse_from(["esgdash", "--data", "other.json", "--verbose"]);
        let mut config = Config::default();
        config.merge_with_args(&args);

        assert_eq!(config.data.path, PathBuf::from("other.json"));
        assert!(config.general.verbose);
    }

    #[test]
    fn test_verbose_setting_controls_log_level() {
        let mut config = Config::default();
        config.general.verbose = true;

        let args = crate::cli::Args::parse_from(["esgdash"]);
        assert_eq!(config.log_level(&args), tracing::Level::DEBUG);

        let quiet = crate::cli::Args::parse_from(["esgdash", "--quiet"]);
        assert_eq!(config.log_level(&quiet), tracing::Level::ERROR);

        config.general.verbose = false;
        assert_eq!(config.log_level(&args), tracing::Level::INFO);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[data]"));
        assert!(toml_str.contains("[scoring]"));
        assert!(toml_str.contains("[report]"));
    }
}
