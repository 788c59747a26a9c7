//! Error types

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the background surface and its platform layer
#[derive(Error, Debug)]
pub enum SurfaceError {
    /// The window class could not be registered
    #[error("failed to register window class {class}: {reason}")]
    ClassRegistration { class: String, reason: String },

    /// The window itself could not be created
    #[error("failed to create window: {0}")]
    WindowCreation(String),

    /// A bitmap could not be loaded from disk
    #[error("failed to load bitmap {path:?}: {reason}")]
    BitmapLoad { path: PathBuf, reason: String },

    /// No running surface window has the given class
    #[error("no window found with class {0}")]
    WindowNotFound(String),

    /// A copy-data message could not be delivered
    #[error("failed to send message: {0}")]
    Send(String),
}

/// Configuration loading error
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}
