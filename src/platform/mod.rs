//! Platform abstraction layer
//!
//! The surface drives the windowing system through [`SurfacePlatform`].
//! Windows is the only real backend; [`null::NullPlatform`] records calls
//! in memory for tests and headless use.

use std::path::Path;

use crate::error::SurfaceError;
use crate::geometry::{LogicalPoint, PhysicalSize, WindowGeometry};

pub mod null;

#[cfg(target_os = "windows")]
pub mod win32;

pub use null::{NullPlatform, PlatformCall};

/// Opaque identity of a live platform window
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(usize);

impl WindowId {
    pub fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    pub fn as_raw(self) -> usize {
        self.0
    }
}

/// Operations the background surface needs from the windowing system.
///
/// Every method takes `&self`: implementations may re-enter the surface
/// synchronously (creating, destroying and redrawing a window all dispatch
/// messages before returning).
pub trait SurfacePlatform {
    /// Handle identifying the owning application instance
    type Instance: Copy;
    /// An open paint session on a window
    type Paint;
    /// A loaded bitmap; dropping it releases the underlying resource
    type Bitmap;

    fn register_class(&self, instance: Self::Instance, class_name: &str)
        -> Result<(), SurfaceError>;
    fn unregister_class(&self, instance: Self::Instance, class_name: &str);

    /// Effective DPI of the monitor nearest `point`, if it can be queried
    fn monitor_dpi(&self, point: LogicalPoint) -> Option<u32>;

    /// Create a borderless popup window of the registered class
    fn create_window(
        &self,
        instance: Self::Instance,
        class_name: &str,
        title: &str,
        geometry: &WindowGeometry,
    ) -> Result<WindowId, SurfaceError>;
    fn destroy_window(&self, window: WindowId);

    /// Let the platform scale non-client areas with the monitor DPI
    fn enable_dpi_scaling(&self, window: WindowId);

    fn show_window(&self, window: WindowId);
    fn hide_window(&self, window: WindowId);
    fn is_visible(&self, window: WindowId) -> bool;
    /// Move to the bottom of the z-order without moving or resizing
    fn send_to_bottom(&self, window: WindowId);
    /// Invalidate the whole client area and repaint before returning
    fn redraw(&self, window: WindowId);

    fn client_size(&self, window: WindowId) -> PhysicalSize;
    fn begin_paint(&self, window: WindowId) -> Self::Paint;
    /// Load a bitmap file stretched to `size`
    fn load_bitmap(&self, path: &Path, size: PhysicalSize) -> Result<Self::Bitmap, SurfaceError>;
    /// Copy `bitmap` onto the painted window at the origin
    fn draw_bitmap(&self, paint: &Self::Paint, bitmap: &Self::Bitmap, size: PhysicalSize);
    fn end_paint(&self, paint: Self::Paint);
}
