//! Solver configuration: defaults, an optional TOML file, then environment.

use crate::playback::PlaybackDelays;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const ENV_URL: &str = "CUBE_SOLVER_URL";
pub const ENV_TIMEOUT_SECS: &str = "CUBE_SOLVER_TIMEOUT_SECS";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value `{value}` for {var}")]
    InvalidEnv { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Where the search service listens
    pub base_url: String,
    /// Budget for each request to the service
    pub timeout_secs: u64,
    /// How far back the backtracking retry may rewind
    pub max_backtrack_depth: usize,
    pub move_delay_ms: u64,
    pub double_delay_ms: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_secs: 100,
            max_backtrack_depth: 12,
            move_delay_ms: 550,
            double_delay_ms: 200,
        }
    }
}

impl SolverConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read a config file that must exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Read a config file, falling back to defaults when it does not exist
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Overlay `CUBE_SOLVER_URL` and `CUBE_SOLVER_TIMEOUT_SECS`
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_vars(|name| std::env::var(name).ok())
    }

    /// Overlay variables from any lookup; unset or empty values are skipped
    pub fn apply_vars<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = var(ENV_URL) {
            self.base_url = url;
        }
        if let Some(value) = var(ENV_TIMEOUT_SECS) {
            self.timeout_secs = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: ENV_TIMEOUT_SECS,
                value,
            })?;
        }
        Ok(())
    }

    pub fn request_budget(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn playback_delays(&self) -> PlaybackDelays {
        PlaybackDelays {
            move_delay: Duration::from_millis(self.move_delay_ms),
            double_delay: Duration::from_millis(self.double_delay_ms),
        }
    }
}
