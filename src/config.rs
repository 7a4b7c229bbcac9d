// src/config.rs

//! Defines the configuration structures for the platform shim.
//!
//! The configuration is deserialized from a JSON file named by the
//! `ROGUE_PLATFORM_CONFIG` environment variable. Every section carries
//! defaults, so a partial file (or none at all) yields a working setup that
//! matches the classic 100×34 grid.

use anyhow::{Context, Result};
use log::{info, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "ROGUE_PLATFORM_CONFIG";

/// Process-wide configuration, loaded once on first access.
///
/// A configuration file that exists but cannot be parsed is reported and the
/// defaults are used instead.
pub static CONFIG: Lazy<Config> = Lazy::new(|| match Config::from_env() {
    Ok(config) => config,
    Err(e) => {
        warn!("Failed to load configuration: {:#}. Using defaults.", e);
        Config::default()
    }
});

// --- Top-Level Configuration Structure ---

/// Represents the complete configuration of the platform shim.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Grid dimensions supplied by the game.
    pub grid: GridConfig,
    /// Where the font atlases and icon live.
    pub assets: AssetsConfig,
    /// Window and font sizing settings.
    pub window: WindowConfig,
    /// Event loop pacing.
    pub performance: PerformanceConfig,
    /// Which display backend drives the window.
    pub backend: Backend,
    /// Literal character substitutions applied to text input.
    pub remaps: Vec<RemapConfig>,
}

impl Config {
    /// Loads the configuration named by `ROGUE_PLATFORM_CONFIG`, or the
    /// defaults when the variable is unset.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(Path::new(&path)),
            None => {
                info!("{} not set, using default configuration.", CONFIG_ENV_VAR);
                Ok(Self::default())
            }
        }
    }

    /// Reads and parses a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }
}

// --- Grid Configuration ---

/// The fixed cell grid the game draws into.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GridConfig {
    pub columns: u32,
    pub rows: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            columns: 100,
            rows: 34,
        }
    }
}

// --- Assets Configuration ---

/// Location of the bitmap font atlases and window icon.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssetsConfig {
    /// Data directory; assets are read from `<directory>/assets/`.
    pub directory: PathBuf,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        AssetsConfig {
            directory: PathBuf::from("."),
        }
    }
}

// --- Window Configuration ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Font size (1–13) to start with. `None` fits the usable display area.
    pub font_size: Option<u8>,
    /// Horizontal space left free around the window by the startup fit.
    pub margin_width_px: u32,
    /// Vertical space left free (taskbars, title bar) by the startup fit.
    pub margin_height_px: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            title: "Brogue".to_string(),
            font_size: None,
            margin_width_px: 20,
            margin_height_px: 100,
        }
    }
}

// --- Performance Configuration ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Time budget per idle iteration of the blocking wait, in milliseconds.
    pub pause_between_polls_ms: u64,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        PerformanceConfig {
            pause_between_polls_ms: 36,
        }
    }
}

// --- Backend Selection ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Backend {
    #[default]
    X11,
    /// No window; events come from a script and nothing is displayed.
    Headless,
}

// --- Remap Configuration ---

/// A single text-input substitution, e.g. `{ "from": "y", "to": "z" }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemapConfig {
    pub from: String,
    pub to: String,
}
