//! Configuration file handling.
//!
//! Persistent defaults for the prompter (speed, color, autostart, font
//! preferences) stored as TOML under the platform config directory.
//! CLI flags override anything loaded from the file.

use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::engine::clock::{MAX_SPEED, MIN_SPEED};

/// User configuration, all fields optional in the file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Default speed multiplier
    pub speed: f64,
    /// Named terminal color for script text
    pub text_color: String,
    /// Start playing immediately when a session opens
    pub auto_start: bool,
    /// Requested font size (recognized, not applied by terminals)
    pub font_size: u16,
    /// Requested font family (recognized, not applied by terminals)
    pub font_family: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            speed: 1.0,
            text_color: "white".to_string(),
            auto_start: false,
            font_size: 48,
            font_family: "monospace".to_string(),
        }
    }
}

impl Config {
    /// Path of the config file: `<config dir>/promptr/config.toml`.
    pub fn config_path() -> Result<PathBuf> {
        let base = dirs::config_dir().ok_or_else(|| anyhow!("no config directory available"))?;
        Ok(base.join("promptr").join("config.toml"))
    }

    /// Parse a config from TOML text, clamping the speed into its
    /// valid range.
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content).context("invalid config file")?;
        config.speed = config.speed.clamp(MIN_SPEED, MAX_SPEED);
        Ok(config)
    }

    /// Serialize to pretty TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize config")
    }

    /// Load from the config file, falling back to defaults when the
    /// file does not exist.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml(&content)
    }

    /// Write the config file, creating its directory if needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, self.to_toml()?)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }
}
