use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::payload::Limits;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "WFGRAPH_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub limits: Limits,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Reject payloads with malformed or dangling records instead of
    /// filtering them.
    #[serde(default)]
    pub strict: bool,
}

/// Pick the config file to read: explicit path, then `$WFGRAPH_CONFIG`,
/// then the per-user config directory.
///
/// The per-user file is only returned if it exists; an explicit or
/// environment path is returned as-is so a typo surfaces as an error.
#[must_use]
pub fn config_path(explicit: Option<&Path>, env_value: Option<String>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(value) = env_value.filter(|v| !v.trim().is_empty()) {
        return Some(PathBuf::from(value));
    }
    dirs::config_dir()
        .map(|dir| dir.join("wfgraph/config.toml"))
        .filter(|path| path.exists())
}

/// Parse a config file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid TOML for
/// [`Config`]. The underlying `toml::de::Error` stays reachable through
/// `anyhow::Error::downcast_ref`.
pub fn load_config_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<Config>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Resolve and load the effective config, falling back to defaults when no
/// file is configured.
///
/// # Errors
///
/// Propagates errors from [`load_config_file`].
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    config_path(explicit, env::var(CONFIG_ENV).ok()).map_or_else(
        || Ok(Config::default()),
        |path| {
            tracing::debug!(path = %path.display(), "loading config");
            load_config_file(&path)
        },
    )
}
