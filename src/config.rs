//! Configuration (backdrop.toml)

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::geometry::{LogicalPoint, LogicalSize};

/// Name of the configuration file
pub const CONFIG_FILE_NAME: &str = "backdrop.toml";

/// Top-level configuration loaded from backdrop.toml
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub surface: SurfaceConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// How logical geometry is turned into physical pixels
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ScaleMode {
    /// Multiply by a fixed factor
    Fixed { factor: f64 },
    /// Use the effective DPI of the monitor nearest the window origin
    Monitor,
}

impl Default for ScaleMode {
    fn default() -> Self {
        ScaleMode::Fixed { factor: 1.25 }
    }
}

/// Background surface window settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Window class name, also used by senders to find the window
    pub class_name: String,
    /// Window title
    pub title: String,
    /// Logical origin; also picks the target monitor
    pub origin: LogicalPoint,
    /// Logical size
    pub size: LogicalSize,
    pub scale: ScaleMode,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            class_name: "BACKDROP_SURFACE_WINDOW".to_string(),
            title: "backdrop_surface".to_string(),
            origin: LogicalPoint::new(10, 10),
            size: LogicalSize::new(1280, 720),
            scale: ScaleMode::default(),
        }
    }
}

/// Log file settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,
    /// Log file; defaults to backdrop.log next to the executable
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            file: None,
        }
    }
}

impl Config {
    /// Find backdrop.toml in standard locations
    pub fn find_config_path() -> Option<PathBuf> {
        // Check in order: %APPDATA%/backdrop, exe dir, cwd
        let candidates = [
            dirs::config_dir().map(|p| p.join("backdrop").join(CONFIG_FILE_NAME)),
            std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|d| d.join(CONFIG_FILE_NAME))),
            Some(PathBuf::from(CONFIG_FILE_NAME)),
        ];

        candidates.into_iter().flatten().find(|c| c.exists())
    }

    /// Load configuration from the standard locations, defaults if absent
    pub fn load() -> Result<Self, ConfigError> {
        match Self::find_config_path() {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}
