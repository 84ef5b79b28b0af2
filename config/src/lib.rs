//! Earthworm configuration file.
//!
//! ```toml
//! [analyzer]
//! interpreter = "python"
//! version = "3"
//! module = "src.decomposer"
//! home = "${HOME}/earthworm"
//! flags = ["--noprogress"]
//! timeout_secs = 60
//!
//! [markers]
//! icon = "earthworm"
//! refresh = "update_all"
//! ```

use std::path::{Path, PathBuf};
use std::{env, fs};

use serde::Deserialize;

use earthworm_analyzer::AnalyzerConfig;
use earthworm_types::MarkerStyle;

#[derive(Debug, Default, Deserialize)]
pub struct EarthwormConfig {
    pub analyzer: Option<AnalyzerConfig>,
    pub markers: Option<MarkerStyle>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

/// Expand `${VAR}` references from the environment.
///
/// Unset variables expand to the empty string; an unclosed `${` is kept as-is.
#[must_use]
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(open) = rest.find("${") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };
        let var = &after[..close];
        if !var.is_empty() {
            out.push_str(&env::var(var).unwrap_or_default());
        }
        rest = &after[close + 1..];
    }

    out.push_str(rest);
    out
}

impl EarthwormConfig {
    /// Load `~/.earthworm/config.toml`. A missing file is `Ok(None)`.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let Some(path) = config_path() else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    /// Load an explicit config file. Unlike [`load`](Self::load), a missing
    /// file is an error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(config),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    /// Analyzer settings with `${VAR}` references in `home` expanded.
    #[must_use]
    pub fn analyzer(&self) -> AnalyzerConfig {
        let config = self.analyzer.clone().unwrap_or_default();
        let home = config.home().map(expand_env_vars);
        config.with_home(home)
    }

    #[must_use]
    pub fn marker_style(&self) -> MarkerStyle {
        self.markers.unwrap_or_default()
    }
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".earthworm").join("config.toml"))
}
