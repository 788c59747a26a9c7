//! Win32 window class, window procedure and the background window owner

use std::cell::RefCell;
use std::ffi::c_void;
use std::path::{Path, PathBuf};
use std::rc::{Rc, Weak};

use windows::core::{Error, HSTRING, PCWSTR};
use windows::Win32::Foundation::{HINSTANCE, HWND, LPARAM, LRESULT, RECT, WPARAM};
use windows::Win32::Graphics::Gdi::{InvalidateRect, UpdateWindow, COLOR_WINDOW, HBRUSH};
use windows::Win32::System::DataExchange::COPYDATASTRUCT;
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::WindowsAndMessaging::*;

use super::dpi::{enable_non_client_scaling, monitor_dpi_at};
use super::paint::{self, OwnedBitmap, PaintSession};
use crate::config::SurfaceConfig;
use crate::error::SurfaceError;
use crate::geometry::{LogicalPoint, PhysicalSize, WindowGeometry};
use crate::message::{Dispatch, SurfaceMessage};
use crate::platform::{SurfacePlatform, WindowId};
use crate::routing::HandleTable;
use crate::surface::BackgroundSurface;

type Win32Surface = BackgroundSurface<Win32Platform>;

thread_local! {
    /// Owners of the windows created on this thread
    static ROUTES: RefCell<HandleTable<WindowId, Weak<Win32Surface>>> =
        RefCell::new(HandleTable::new());
}

pub fn window_id(hwnd: HWND) -> WindowId {
    WindowId::from_raw(hwnd.0 as usize)
}

pub fn hwnd(window: WindowId) -> HWND {
    HWND(window.as_raw() as *mut c_void)
}

/// Handle of the running executable
pub fn module_instance() -> Result<HINSTANCE, Error> {
    unsafe { GetModuleHandleW(None).map(Into::into) }
}

fn owner_of(window: WindowId) -> Option<Rc<Win32Surface>> {
    ROUTES
        .with(|routes| routes.borrow().get(window))
        .and_then(|owner| owner.upgrade())
}

/// Reduce a raw message to what the surface understands
///
/// # Safety
/// For `WM_COPYDATA`, `lparam` must be null or point to a valid
/// `COPYDATASTRUCT` for the lifetime `'a`.
unsafe fn translate<'a>(msg: u32, lparam: LPARAM) -> SurfaceMessage<'a> {
    match msg {
        WM_COPYDATA => match (lparam.0 as *const COPYDATASTRUCT).as_ref() {
            Some(data) => {
                let payload = if data.lpData.is_null() || data.cbData == 0 {
                    &[][..]
                } else {
                    std::slice::from_raw_parts(data.lpData as *const u8, data.cbData as usize)
                };
                SurfaceMessage::CopyData {
                    tag: data.dwData,
                    payload,
                }
            }
            // No payload at all; consumed like an unknown tag
            None => SurfaceMessage::CopyData {
                tag: 0,
                payload: &[],
            },
        },
        WM_PAINT => SurfaceMessage::Paint,
        _ => SurfaceMessage::Other,
    }
}

/// Window procedure
unsafe extern "system" fn wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    let window = window_id(hwnd);

    match msg {
        WM_NCCREATE => {
            let owner = ROUTES
                .with(|routes| routes.borrow_mut().bind(window))
                .and_then(|owner| owner.upgrade());
            if let Some(surface) = owner {
                log!("wnd_proc: WM_NCCREATE bound {:?}", window);
                surface.attach(window);
            }
            DefWindowProcW(hwnd, msg, wparam, lparam)
        }
        WM_NCDESTROY => {
            let owner = ROUTES
                .with(|routes| routes.borrow_mut().unbind(window))
                .and_then(|owner| owner.upgrade());
            if let Some(surface) = owner {
                surface.detach(window);
            }
            DefWindowProcW(hwnd, msg, wparam, lparam)
        }
        _ => {
            let Some(surface) = owner_of(window) else {
                return DefWindowProcW(hwnd, msg, wparam, lparam);
            };

            match surface.handle_message(window, translate(msg, lparam)) {
                Dispatch::Handled => LRESULT(0),
                Dispatch::Default => DefWindowProcW(hwnd, msg, wparam, lparam),
            }
        }
    }
}

/// The real windowing system. Stateless: every call goes straight to user32/gdi32.
#[derive(Clone, Copy, Debug, Default)]
pub struct Win32Platform;

impl SurfacePlatform for Win32Platform {
    type Instance = HINSTANCE;
    type Paint = PaintSession;
    type Bitmap = OwnedBitmap;

    fn register_class(&self, instance: HINSTANCE, class_name: &str) -> Result<(), SurfaceError> {
        let registration_error = |e: Error| SurfaceError::ClassRegistration {
            class: class_name.to_string(),
            reason: e.to_string(),
        };

        let class = HSTRING::from(class_name);
        unsafe {
            let wc = WNDCLASSEXW {
                cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
                style: CS_HREDRAW | CS_VREDRAW,
                lpfnWndProc: Some(wnd_proc),
                cbClsExtra: 0,
                cbWndExtra: 0,
                hInstance: instance,
                hIcon: HICON::default(),
                hCursor: LoadCursorW(None, IDC_ARROW).map_err(registration_error)?,
                // Shows through whenever no image is painted
                hbrBackground: HBRUSH((COLOR_WINDOW.0 + 1) as usize as *mut c_void),
                lpszMenuName: PCWSTR::null(),
                lpszClassName: PCWSTR(class.as_ptr()),
                hIconSm: HICON::default(),
            };

            if RegisterClassExW(&wc) == 0 {
                return Err(registration_error(Error::from_win32()));
            }
        }
        Ok(())
    }

    fn unregister_class(&self, instance: HINSTANCE, class_name: &str) {
        unsafe {
            if let Err(e) = UnregisterClassW(&HSTRING::from(class_name), instance) {
                log!("UnregisterClassW({}) failed: {:?}", class_name, e);
            }
        }
    }

    fn monitor_dpi(&self, point: LogicalPoint) -> Option<u32> {
        monitor_dpi_at(point)
    }

    fn create_window(
        &self,
        instance: HINSTANCE,
        class_name: &str,
        title: &str,
        geometry: &WindowGeometry,
    ) -> Result<WindowId, SurfaceError> {
        let hwnd = unsafe {
            CreateWindowExW(
                WINDOW_EX_STYLE::default(),
                &HSTRING::from(class_name),
                &HSTRING::from(title),
                // Popup window (no frame), initially hidden
                WS_POPUP,
                geometry.x,
                geometry.y,
                geometry.width,
                geometry.height,
                None,
                None,
                instance,
                None,
            )
        }
        .map_err(|e| SurfaceError::WindowCreation(e.to_string()))?;

        Ok(window_id(hwnd))
    }

    fn destroy_window(&self, window: WindowId) {
        unsafe {
            let _ = DestroyWindow(hwnd(window));
        }
    }

    fn enable_dpi_scaling(&self, window: WindowId) {
        enable_non_client_scaling(hwnd(window));
    }

    fn show_window(&self, window: WindowId) {
        unsafe {
            let _ = ShowWindow(hwnd(window), SW_SHOWNOACTIVATE);
        }
    }

    fn hide_window(&self, window: WindowId) {
        unsafe {
            let _ = ShowWindow(hwnd(window), SW_HIDE);
        }
    }

    fn is_visible(&self, window: WindowId) -> bool {
        unsafe { IsWindowVisible(hwnd(window)).as_bool() }
    }

    fn send_to_bottom(&self, window: WindowId) {
        unsafe {
            if let Err(e) = SetWindowPos(
                hwnd(window),
                HWND_BOTTOM,
                0,
                0,
                0,
                0,
                SWP_NOMOVE | SWP_NOSIZE,
            ) {
                log!("SetWindowPos(HWND_BOTTOM) failed: {:?}", e);
            }
        }
    }

    fn redraw(&self, window: WindowId) {
        let hwnd = hwnd(window);
        unsafe {
            let _ = InvalidateRect(hwnd, None, false);
            let _ = UpdateWindow(hwnd);
        }
    }

    fn client_size(&self, window: WindowId) -> PhysicalSize {
        let mut rect = RECT::default();
        unsafe {
            let _ = GetClientRect(hwnd(window), &mut rect);
        }
        PhysicalSize::new(rect.right - rect.left, rect.bottom - rect.top)
    }

    fn begin_paint(&self, window: WindowId) -> PaintSession {
        PaintSession::begin(hwnd(window))
    }

    fn load_bitmap(&self, path: &Path, size: PhysicalSize) -> Result<OwnedBitmap, SurfaceError> {
        paint::load_bitmap(path, size)
    }

    fn draw_bitmap(&self, paint: &PaintSession, bitmap: &OwnedBitmap, size: PhysicalSize) {
        paint::draw_bitmap(paint, bitmap, size);
    }

    fn end_paint(&self, paint: PaintSession) {
        drop(paint);
    }
}

/// Background window owned by the host.
///
/// Must be created, updated and dropped on the thread that runs the
/// message loop for its window.
pub struct BackgroundWindow {
    surface: Rc<Win32Surface>,
}

impl BackgroundWindow {
    pub fn new(config: SurfaceConfig) -> Self {
        Self {
            surface: Rc::new(BackgroundSurface::new(Win32Platform, config)),
        }
    }

    /// Create (or re-create) the window; it starts hidden
    pub fn create(&self, instance: HINSTANCE) -> Result<HWND, SurfaceError> {
        ROUTES.with(|routes| routes.borrow_mut().stage(Rc::downgrade(&self.surface)));
        let result = self.surface.create(instance);
        ROUTES.with(|routes| routes.borrow_mut().clear_staged());

        result.map(hwnd)
    }

    pub fn update_background(&self, path: impl Into<PathBuf>) {
        self.surface.update_background(path);
    }

    pub fn show(&self) {
        self.surface.show();
    }

    pub fn hide(&self) {
        self.surface.hide();
    }

    /// The live window, if any
    pub fn hwnd(&self) -> Option<HWND> {
        self.surface.handle().map(hwnd)
    }

    pub fn image_path(&self) -> PathBuf {
        self.surface.image_path()
    }

    pub fn destroy(&self) {
        self.surface.destroy();
    }
}

impl Drop for BackgroundWindow {
    fn drop(&mut self) {
        // While the surface is still reachable, so WM_NCDESTROY can detach it
        self.surface.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{encode_path, SET_BACKGROUND_IMAGE};
    use crate::platform::win32::send_background_image;

    fn config(name: &str) -> SurfaceConfig {
        SurfaceConfig {
            class_name: format!("BACKDROP_TEST_{}", name),
            ..SurfaceConfig::default()
        }
    }

    fn instance() -> HINSTANCE {
        module_instance().unwrap()
    }

    fn bound_windows() -> usize {
        ROUTES.with(|routes| routes.borrow().len())
    }

    #[test]
    fn test_translate_null_copy_data() {
        let message = unsafe { translate(WM_COPYDATA, LPARAM(0)) };
        assert_eq!(
            message,
            SurfaceMessage::CopyData {
                tag: 0,
                payload: &[],
            }
        );
    }

    #[test]
    fn test_translate_null_payload_pointer() {
        let data = COPYDATASTRUCT {
            dwData: SET_BACKGROUND_IMAGE,
            cbData: 8,
            lpData: std::ptr::null_mut(),
        };

        let message = unsafe { translate(WM_COPYDATA, LPARAM(&data as *const _ as isize)) };
        assert_eq!(
            message,
            SurfaceMessage::CopyData {
                tag: SET_BACKGROUND_IMAGE,
                payload: &[],
            }
        );
    }

    #[test]
    fn test_translate_path_payload() {
        let payload = encode_path(Path::new("C:\\bg\\dusk.bmp"));
        let data = COPYDATASTRUCT {
            dwData: SET_BACKGROUND_IMAGE,
            cbData: payload.len() as u32,
            lpData: payload.as_ptr() as *mut c_void,
        };

        let message = unsafe { translate(WM_COPYDATA, LPARAM(&data as *const _ as isize)) };
        assert_eq!(
            message,
            SurfaceMessage::CopyData {
                tag: SET_BACKGROUND_IMAGE,
                payload: &payload,
            }
        );
    }

    #[test]
    fn test_translate_other_messages() {
        assert_eq!(unsafe { translate(WM_PAINT, LPARAM(0)) }, SurfaceMessage::Paint);
        assert_eq!(unsafe { translate(WM_SIZE, LPARAM(0)) }, SurfaceMessage::Other);
    }

    #[test]
    fn test_create_binds_owner() {
        let window = BackgroundWindow::new(config("BIND"));
        let target = window.create(instance()).unwrap();

        assert_eq!(window.hwnd(), Some(target));
        assert!(owner_of(window_id(target)).is_some());
        assert!(!window.surface.is_visible());
    }

    #[test]
    fn test_copy_data_reaches_owner() {
        let window = BackgroundWindow::new(config("COPY_DATA"));
        let target = window.create(instance()).unwrap();

        send_background_image(target, Path::new("C:\\bg\\sent.bmp")).unwrap();

        assert_eq!(window.image_path(), PathBuf::from("C:\\bg\\sent.bmp"));
    }

    #[test]
    fn test_recreate_rebinds_routes() {
        let window = BackgroundWindow::new(config("RECREATE"));
        let first = window.create(instance()).unwrap();
        let second = window.create(instance()).unwrap();

        assert_ne!(first, second);
        assert!(owner_of(window_id(first)).is_none());
        assert!(owner_of(window_id(second)).is_some());
        assert_eq!(bound_windows(), 1);
    }

    #[test]
    fn test_destroyed_from_outside_clears_handle() {
        let window = BackgroundWindow::new(config("OUTSIDE"));
        let target = window.create(instance()).unwrap();

        unsafe { DestroyWindow(target).unwrap() };

        assert_eq!(window.hwnd(), None);
        assert!(owner_of(window_id(target)).is_none());
        assert_eq!(bound_windows(), 0);
    }

    #[test]
    fn test_unowned_window_uses_default_handling() {
        let class = config("UNOWNED");
        let window = BackgroundWindow::new(class.clone());
        window.create(instance()).unwrap();

        // Same class, created without staging an owner
        let stray = Win32Platform
            .create_window(
                instance(),
                &class.class_name,
                "stray",
                &WindowGeometry::default(),
            )
            .unwrap();
        assert!(owner_of(stray).is_none());

        send_background_image(hwnd(stray), Path::new("ignored.bmp")).unwrap();
        assert_eq!(window.image_path(), PathBuf::new());

        Win32Platform.destroy_window(stray);
    }

    #[test]
    fn test_drop_unregisters_class() {
        let class = config("DROP");
        {
            let window = BackgroundWindow::new(class.clone());
            window.create(instance()).unwrap();
            assert!(crate::registry::ClassRegistry::global().is_registered(&class.class_name));
        }
        assert!(!crate::registry::ClassRegistry::global().is_registered(&class.class_name));
        assert_eq!(bound_windows(), 0);
    }
}
