//! Win32 platform implementation

pub mod dpi;
pub mod ipc;
pub mod paint;
pub mod window;

pub use dpi::{enable_dpi_awareness, monitor_dpi_at};
pub use ipc::{find_surface_window, send_background_image};
pub use window::{hwnd, module_instance, window_id, BackgroundWindow, Win32Platform};
