//! Optional TOML configuration for the `drill` binary.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use drill_core::ProgressPolicy;

/// Top-level config file layout. Every table is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub progress: ProgressPolicy,
}

impl AppConfig {
    /// Read and validate `path`, or fall back to defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("invalid config file: {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw).context("failed to parse TOML")?;
        config
            .progress
            .validate()
            .context("invalid [progress] settings")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_means_defaults() {
        assert_eq!(AppConfig::parse("").unwrap(), AppConfig::default());
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let config = AppConfig::parse(
            r#"
            [progress]
            recent_window = 5
            unlock_thresholds = [10, 20, 30, 40]

            [progress.pass_probability]
            best_score_weight = 0.5
            "#,
        )
        .unwrap();
        assert_eq!(config.progress.recent_window, 5);
        assert_eq!(config.progress.unlock_thresholds, [10, 20, 30, 40]);
        assert_eq!(config.progress.pass_mark_percent, 70);
        assert!((config.progress.pass_probability.best_score_weight - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.progress.pass_probability.recent_attempts, 5);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = AppConfig::parse("[progress]\nrecent_window = 0\n").unwrap_err();
        assert!(format!("{err:#}").contains("recent history window"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(AppConfig::parse("[progress]\nwindow = 3\n").is_err());
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/drill.toml"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/drill.toml"));
    }
}
