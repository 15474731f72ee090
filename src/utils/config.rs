//! Configuration management for reelswap
//!
//! This module handles loading and managing application configuration
//! from layered TOML files and environment variables.

use crate::carousel::{CarouselOptions, TransitionMode};
use crate::utils::error::{IntoReelError, ReelError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Recognised log levels
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Carousel construction options
    pub carousel: CarouselOptions,

    /// Simulated host settings for dry runs
    pub simulation: SimulationConfig,

    /// General application settings
    pub general: GeneralConfig,
}

/// Simulated host configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Length of every simulated clip in milliseconds
    pub clip_ms: u64,

    /// Number of transitions to run before stopping
    pub cycles: u32,
}

/// General application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            clip_ms: 3000,
            cycles: 4,
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from various sources
    ///
    /// Configuration is loaded in the following order (later sources override earlier):
    /// 1. Default values
    /// 2. System config file (/etc/reelswap/config.toml on Linux)
    /// 3. User config file (~/.config/reelswap/config.toml on Linux)
    /// 4. The explicit file, if given
    /// 5. Environment variables (REELSWAP_* prefix)
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut layers = toml::Table::new();

        for path in [Self::system_config_path(), Self::user_config_path()].into_iter().flatten() {
            if path.exists() {
                log::debug!("Reading config layer {:?}", path);
                merge_tables(&mut layers, Self::read_table(&path)?);
            }
        }

        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ReelError::Config(format!("Config file not found: {}", path.display())));
            }
            log::debug!("Reading config layer {:?}", path);
            merge_tables(&mut layers, Self::read_table(path)?);
        }

        let mut config: Config = toml::Value::Table(layers)
            .try_into()
            .config_err("Failed to parse config")?;

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Load a single file on top of the defaults, without other layers
    pub fn from_file(path: &Path) -> Result<Self> {
        let config: Config = toml::Value::Table(Self::read_table(path)?)
            .try_into()
            .config_err("Failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to user config file
    pub fn save(&self) -> Result<()> {
        let path = Self::user_config_path()
            .ok_or_else(|| ReelError::Config("Cannot determine user config path".to_string()))?;
        self.save_to(&path)
    }

    /// Save configuration to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).config_err("Failed to create config directory")?;
        }

        let toml = toml::to_string_pretty(self).config_err("Failed to serialize config")?;

        std::fs::write(path, toml).config_err("Failed to write config file")?;

        Ok(())
    }

    fn read_table(path: &Path) -> Result<toml::Table> {
        let contents = std::fs::read_to_string(path).config_err("Failed to read config file")?;

        contents.parse::<toml::Table>().config_err("Failed to parse config file")
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(mode) = std::env::var("REELSWAP_MODE") {
            self.carousel.mode = mode.parse::<TransitionMode>()?;
        }

        if let Ok(speed) = std::env::var("REELSWAP_SPEED") {
            self.carousel.speed = speed
                .trim()
                .parse()
                .map_err(|_| ReelError::Config("Invalid REELSWAP_SPEED".to_string()))?;
        }

        if let Ok(width) = std::env::var("REELSWAP_WIDTH") {
            self.carousel.width = width
                .trim()
                .parse()
                .map_err(|_| ReelError::Config("Invalid REELSWAP_WIDTH".to_string()))?;
        }

        if let Ok(height) = std::env::var("REELSWAP_HEIGHT") {
            self.carousel.height = height
                .trim()
                .parse()
                .map_err(|_| ReelError::Config("Invalid REELSWAP_HEIGHT".to_string()))?;
        }

        if let Ok(muted) = std::env::var("REELSWAP_MUTED") {
            self.carousel.muted = parse_flag(&muted)
                .ok_or_else(|| ReelError::Config("Invalid REELSWAP_MUTED".to_string()))?;
        }

        if let Ok(log_level) = std::env::var("REELSWAP_LOG_LEVEL") {
            self.general.log_level = log_level.trim().to_lowercase();
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.carousel.speed == 0 {
            return Err(ReelError::Config("Transition speed must be non-zero".to_string()));
        }

        for (name, value) in [("width", self.carousel.width), ("height", self.carousel.height)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ReelError::Config(format!("Carousel {} must be non-negative, got {}", name, value)));
            }
        }

        if self.simulation.clip_ms == 0 {
            return Err(ReelError::Config("Simulated clip length must be non-zero".to_string()));
        }

        if !LOG_LEVELS.contains(&self.general.log_level.as_str()) {
            return Err(ReelError::Config(format!(
                "Invalid log level '{}', must be one of: {:?}",
                self.general.log_level, LOG_LEVELS
            )));
        }

        Ok(())
    }

    /// Get system config file path
    fn system_config_path() -> Option<PathBuf> {
        #[cfg(target_os = "linux")]
        return Some(PathBuf::from("/etc/reelswap/config.toml"));

        #[cfg(target_os = "windows")]
        return std::env::var("PROGRAMDATA")
            .ok()
            .map(|p| PathBuf::from(p).join("reelswap").join("config.toml"));

        #[cfg(target_os = "macos")]
        return Some(PathBuf::from("/Library/Application Support/reelswap/config.toml"));

        #[allow(unreachable_code)]
        None
    }

    /// Get user config file path
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("reelswap").join("config.toml"))
    }
}

/// Recursively overlay `overlay` onto `base`; tables merge, everything else replaces
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => merge_tables(existing, incoming),
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
