//! Sending copy-data commands to a running background window

use std::ffi::c_void;
use std::path::Path;

use windows::core::{HSTRING, PCWSTR};
use windows::Win32::Foundation::{HWND, LPARAM, WPARAM};
use windows::Win32::System::DataExchange::COPYDATASTRUCT;
use windows::Win32::UI::WindowsAndMessaging::{FindWindowW, SendMessageW, WM_COPYDATA};

use crate::error::SurfaceError;
use crate::message::{encode_path, SET_BACKGROUND_IMAGE};

/// Find a top-level window by class name
pub fn find_surface_window(class_name: &str) -> Result<HWND, SurfaceError> {
    let hwnd = unsafe { FindWindowW(&HSTRING::from(class_name), PCWSTR::null()) }
        .map_err(|_| SurfaceError::WindowNotFound(class_name.to_string()))?;

    if hwnd.0.is_null() {
        return Err(SurfaceError::WindowNotFound(class_name.to_string()));
    }
    Ok(hwnd)
}

/// Ask the window at `target` to show the bitmap at `path`.
///
/// Blocks until the target's window procedure has handled the message.
pub fn send_background_image(target: HWND, path: &Path) -> Result<(), SurfaceError> {
    let payload = encode_path(path);
    let len = u32::try_from(payload.len())
        .map_err(|_| SurfaceError::Send(format!("path too long: {} bytes", payload.len())))?;

    let data = COPYDATASTRUCT {
        dwData: SET_BACKGROUND_IMAGE,
        cbData: len,
        lpData: payload.as_ptr() as *mut c_void,
    };

    log!("send_background_image: {:?} -> {:?}", path, target);
    unsafe {
        SendMessageW(
            target,
            WM_COPYDATA,
            WPARAM(0),
            LPARAM(&data as *const COPYDATASTRUCT as isize),
        );
    }
    Ok(())
}
