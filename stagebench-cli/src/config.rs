//! Configuration loading from stagebench.toml
//!
//! Run settings can be given in a `stagebench.toml` file in the project root.
//! The file is discovered by walking up from the current directory; CLI flags
//! override anything it sets.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file looked up during discovery
pub const CONFIG_FILE_NAME: &str = "stagebench.toml";

/// Errors from reading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("failed to read {}", .path.display())]
    Io {
        /// Path that was read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid configuration TOML
    #[error("invalid configuration in {}", .path.display())]
    Parse {
        /// Path that was parsed
        path: PathBuf,
        /// Underlying TOML error
        #[source]
        source: toml::de::Error,
    },
}

/// StageBench configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StageConfig {
    /// Runner configuration
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// How many trials to run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Measured trials (1 switches to single-trial reporting)
    #[serde(default = "default_trials")]
    pub trials: u64,
    /// Trials run before measurement and discarded
    #[serde(default)]
    pub warmup_trials: u64,
    /// Show a progress bar on stderr while trials run
    #[serde(default = "default_progress")]
    pub progress: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            trials: default_trials(),
            warmup_trials: 0,
            progress: default_progress(),
        }
    }
}

fn default_trials() -> u64 {
    stagebench_core::DEFAULT_TRIALS
}
fn default_progress() -> bool {
    true
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output format: "human" or "json"
    #[serde(default = "default_format")]
    pub format: String,
    /// Sample output values shown in single-trial mode
    #[serde(default = "default_preview_len")]
    pub preview_len: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            preview_len: default_preview_len(),
        }
    }
}

fn default_format() -> String {
    "human".to_string()
}
fn default_preview_len() -> usize {
    stagebench_report::DEFAULT_PREVIEW_LEN
}

impl StageConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Try to discover and load configuration by walking up from current directory
    pub fn discover() -> Option<Self> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return match Self::load(&config_path) {
                    Ok(config) => {
                        tracing::debug!(path = %config_path.display(), "loaded configuration");
                        Some(config)
                    }
                    Err(e) => {
                        let cause = std::error::Error::source(&e)
                            .map(ToString::to_string)
                            .unwrap_or_default();
                        tracing::warn!("ignoring configuration: {e}: {cause}");
                        None
                    }
                };
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# StageBench Configuration

[runner]
# Measured trials; 1 prints raw single-trial durations instead of mean±stddev
trials = 100
# Trials run first and discarded
warmup_trials = 0
# Progress bar on stderr
progress = true

[output]
# Output format: human, json
format = "human"
# Sample output values shown in single-trial mode
preview_len = 5
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StageConfig::default();
        assert_eq!(config.runner.trials, 100);
        assert_eq!(config.runner.warmup_trials, 0);
        assert!(config.runner.progress);
        assert_eq!(config.output.format, "human");
        assert_eq!(config.output.preview_len, 5);
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
            [runner]
            trials = 10
            warmup_trials = 2
        "#;

        let config: StageConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.runner.trials, 10);
        assert_eq!(config.runner.warmup_trials, 2);
        // Defaults should still apply
        assert!(config.runner.progress);
        assert_eq!(config.output.format, "human");
    }

    #[test]
    fn test_default_toml_parses() {
        let config: StageConfig = toml::from_str(&StageConfig::default_toml()).unwrap();
        assert_eq!(config.runner.trials, 100);
        assert_eq!(config.output.preview_len, 5);
    }

    #[test]
    fn test_load_missing_file() {
        let err = StageConfig::load("/nonexistent/stagebench.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_invalid_file() {
        let path = std::env::temp_dir().join(format!(
            "stagebench-invalid-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[runner]\ntrials = \"many\"\n").unwrap();
        let err = StageConfig::load(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
