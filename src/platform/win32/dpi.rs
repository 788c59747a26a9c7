//! DPI awareness utilities for Windows

use windows::Win32::Foundation::{HWND, POINT};
use windows::Win32::Graphics::Gdi::{MonitorFromPoint, MONITOR_DEFAULTTONEAREST};
use windows::Win32::UI::HiDpi::*;

use crate::geometry::LogicalPoint;

/// Enable per-monitor DPI awareness (call early in main)
pub fn enable_dpi_awareness() -> Result<(), windows::core::Error> {
    unsafe {
        // Try V2 first (Windows 10 1703+)
        if SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2).is_ok() {
            return Ok(());
        }
        // Fall back to V1
        SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE)
    }
}

/// Effective DPI of the monitor nearest a point
pub fn monitor_dpi_at(point: LogicalPoint) -> Option<u32> {
    unsafe {
        let monitor = MonitorFromPoint(
            POINT {
                x: point.x,
                y: point.y,
            },
            MONITOR_DEFAULTTONEAREST,
        );

        let mut dpi_x = 0u32;
        let mut dpi_y = 0u32;
        match GetDpiForMonitor(monitor, MDT_EFFECTIVE_DPI, &mut dpi_x, &mut dpi_y) {
            Ok(()) => Some(dpi_x),
            Err(e) => {
                log!("GetDpiForMonitor failed: {:?}", e);
                None
            }
        }
    }
}

/// Scale the non-client area with the monitor DPI.
///
/// Only matters under per-monitor V1 awareness; V2 windows already scale,
/// so a failure here is not an error.
pub fn enable_non_client_scaling(hwnd: HWND) {
    unsafe {
        let _ = EnableNonClientDpiScaling(hwnd);
    }
}
