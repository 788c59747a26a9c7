//! Backdrop - a borderless background window for a desktop host runner
//!
//! The window sits at the bottom of the z-order behind the host's main
//! rendering surface and paints one bitmap. Other processes change the
//! bitmap by sending a `WM_COPYDATA` message tagged
//! [`message::SET_BACKGROUND_IMAGE`] whose payload is the UTF-16 path.
//!
//! Everything except [`platform::win32`] is platform-neutral, so the surface
//! logic is tested against [`platform::NullPlatform`] on any OS.

// Include the log module first so the log! macro is visible everywhere
#[macro_use]
pub mod log;

pub mod config;
pub mod error;
pub mod geometry;
pub mod message;
pub mod platform;
pub mod registry;
pub mod routing;
pub mod surface;

pub use config::{Config, ScaleMode, SurfaceConfig};
pub use error::{ConfigError, SurfaceError};
pub use platform::{SurfacePlatform, WindowId};
pub use surface::BackgroundSurface;
