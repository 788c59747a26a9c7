//! Logical and physical window geometry
//!
//! Logical values are what the configuration speaks in; physical values are
//! what the window is created with after multiplying by a scale factor.

use serde::{Deserialize, Serialize};

/// Reference DPI at which logical and physical pixels coincide
pub const BASE_DPI: u32 = 96;

/// A point in logical pixels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LogicalPoint {
    pub x: i32,
    pub y: i32,
}

impl LogicalPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A size in logical pixels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LogicalSize {
    pub width: i32,
    pub height: i32,
}

impl LogicalSize {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// A size in physical pixels (client areas, bitmap targets)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct PhysicalSize {
    pub width: i32,
    pub height: i32,
}

impl PhysicalSize {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Requested window placement in physical pixels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct WindowGeometry {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl WindowGeometry {
    /// Scale a logical origin and size into physical placement
    pub fn scaled(origin: LogicalPoint, size: LogicalSize, factor: f64) -> Self {
        Self {
            x: scale(origin.x, factor),
            y: scale(origin.y, factor),
            width: scale(size.width, factor),
            height: scale(size.height, factor),
        }
    }

    pub fn size(&self) -> PhysicalSize {
        PhysicalSize::new(self.width, self.height)
    }
}

/// Convert a logical value to physical, truncating toward zero
pub fn scale(source: i32, factor: f64) -> i32 {
    (source as f64 * factor) as i32
}

/// Scale factor for a DPI value (1.0 at 96 DPI)
pub fn scale_factor_for_dpi(dpi: u32) -> f64 {
    dpi as f64 / BASE_DPI as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_truncates() {
        assert_eq!(scale(10, 1.25), 12);
        assert_eq!(scale(3, 1.5), 4);
        assert_eq!(scale(-3, 1.5), -4);
        assert_eq!(scale(0, 2.0), 0);
    }

    #[test]
    fn test_scaled_geometry() {
        let geometry = WindowGeometry::scaled(
            LogicalPoint::new(10, 10),
            LogicalSize::new(1280, 720),
            1.25,
        );

        assert_eq!(
            geometry,
            WindowGeometry {
                x: 12,
                y: 12,
                width: 1600,
                height: 900,
            }
        );
        assert_eq!(geometry.size(), PhysicalSize::new(1600, 900));
    }

    #[test]
    fn test_scale_factor_for_dpi() {
        assert_eq!(scale_factor_for_dpi(96), 1.0);
        assert_eq!(scale_factor_for_dpi(120), 1.25);
        assert_eq!(scale_factor_for_dpi(192), 2.0);
    }
}
