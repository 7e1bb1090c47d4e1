// Global configuration management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub host: HostConfig,

    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    /// Command used to spawn the host process the UI bridges to
    #[serde(default = "default_host_command")]
    pub command: String,

    /// Extra arguments passed to the host command
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Title shown in the header; the literal "not-set" when absent
    #[serde(default = "default_title")]
    pub title: String,
}

fn default_host_command() -> String {
    "capmix-host".to_string()
}

fn default_title() -> String {
    "not-set".to_string()
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            command: default_host_command(),
            args: Vec::new(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
        }
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "macos") {
            dirs::home_dir()
                .context("Could not determine home directory")?
                .join(".config")
                .join("capmix")
        } else {
            dirs::config_dir()
                .context("Could not determine config directory")?
                .join("capmix")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from disk, or create default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = fs::read_to_string(&config_path).with_context(|| {
                format!("Failed to read config file: {}", config_path.display())
            })?;

            let config: Config = toml::from_str(&contents).with_context(|| {
                format!("Failed to parse config file: {}", config_path.display())
            })?;

            Ok(config)
        } else {
            let config = Config::default();

            // Try to save the default config, but don't fail if we can't
            if let Err(e) = config.save() {
                tracing::warn!("could not create default config file: {e:#}");
            }

            Ok(config)
        }
    }

    /// Save config to disk
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&config_path, contents)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        Ok(())
    }
}

/// Fixed location of the advisory JSON configuration, relative to the
/// working directory.
pub const ADVISORY_CONFIG: &str = "config.json";

/// Read the advisory configuration file at startup. The parsed value is
/// discarded; a failure is logged and must never reach the user or abort
/// startup.
pub fn probe_advisory(dir: &Path) {
    match fetch_advisory(dir) {
        Ok(_) => tracing::debug!("advisory config read"),
        Err(e) => tracing::info!("advisory config unavailable: {e:#}"),
    }
}

/// Read the advisory configuration file and parse it as JSON.
///
/// No schema is consumed at this layer.
pub fn fetch_advisory(dir: &Path) -> Result<serde_json::Value> {
    let path = dir.join(ADVISORY_CONFIG);
    let contents = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(value)
}
