//! GDI paint session and bitmap blitting

use std::path::Path;

use windows::core::HSTRING;
use windows::Win32::Foundation::{HINSTANCE, HWND};
use windows::Win32::Graphics::Gdi::{
    BeginPaint, BitBlt, CreateCompatibleDC, DeleteDC, DeleteObject, EndPaint, SelectObject,
    HBITMAP, HDC, HGDIOBJ, PAINTSTRUCT, SRCCOPY,
};
use windows::Win32::UI::WindowsAndMessaging::{LoadImageW, IMAGE_BITMAP, LR_LOADFROMFILE};

use crate::error::SurfaceError;
use crate::geometry::PhysicalSize;

/// An open BeginPaint/EndPaint pair; ends when dropped
pub struct PaintSession {
    hwnd: HWND,
    hdc: HDC,
    ps: PAINTSTRUCT,
}

impl PaintSession {
    pub fn begin(hwnd: HWND) -> Self {
        let mut ps = PAINTSTRUCT::default();
        let hdc = unsafe { BeginPaint(hwnd, &mut ps) };
        Self { hwnd, hdc, ps }
    }

    pub fn hdc(&self) -> HDC {
        self.hdc
    }
}

impl Drop for PaintSession {
    fn drop(&mut self) {
        unsafe {
            let _ = EndPaint(self.hwnd, &self.ps);
        }
    }
}

/// A GDI bitmap deleted when dropped
pub struct OwnedBitmap(HBITMAP);

impl OwnedBitmap {
    fn as_gdi(&self) -> HGDIOBJ {
        HGDIOBJ(self.0 .0)
    }
}

impl Drop for OwnedBitmap {
    fn drop(&mut self) {
        unsafe {
            let _ = DeleteObject(self.as_gdi());
        }
    }
}

/// Load a .bmp file stretched to `size`.
///
/// The native loader only understands single-frame bitmaps; anything else
/// fails here.
pub fn load_bitmap(path: &Path, size: PhysicalSize) -> Result<OwnedBitmap, SurfaceError> {
    let wide = HSTRING::from(path);
    let handle = unsafe {
        LoadImageW(
            HINSTANCE::default(),
            &wide,
            IMAGE_BITMAP,
            size.width,
            size.height,
            LR_LOADFROMFILE,
        )
    }
    .map_err(|e| SurfaceError::BitmapLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    Ok(OwnedBitmap(HBITMAP(handle.0)))
}

/// Copy `bitmap` onto the session's DC at the origin through a memory DC
pub fn draw_bitmap(session: &PaintSession, bitmap: &OwnedBitmap, size: PhysicalSize) {
    unsafe {
        let mem_dc = CreateCompatibleDC(session.hdc());
        if mem_dc.0.is_null() {
            return;
        }

        let previous = SelectObject(mem_dc, bitmap.as_gdi());
        if let Err(e) = BitBlt(
            session.hdc(),
            0,
            0,
            size.width,
            size.height,
            mem_dc,
            0,
            0,
            SRCCOPY,
        ) {
            log!("BitBlt failed: {:?}", e);
        }

        // Deselect before deleting so the bitmap is never owned by a dead DC
        SelectObject(mem_dc, previous);
        let _ = DeleteDC(mem_dc);
    }
}
