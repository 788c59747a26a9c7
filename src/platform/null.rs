//! In-memory platform that records every call

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use super::{SurfacePlatform, WindowId};
use crate::error::SurfaceError;
use crate::geometry::{LogicalPoint, PhysicalSize, WindowGeometry};

/// A call made against [`NullPlatform`]
#[derive(Clone, Debug, PartialEq)]
pub enum PlatformCall {
    RegisterClass(String),
    UnregisterClass(String),
    CreateWindow {
        window: WindowId,
        class_name: String,
        title: String,
        geometry: WindowGeometry,
    },
    DestroyWindow(WindowId),
    EnableDpiScaling(WindowId),
    ShowWindow(WindowId),
    HideWindow(WindowId),
    SendToBottom(WindowId),
    Redraw(WindowId),
    BeginPaint(WindowId),
    LoadBitmap(PathBuf),
    DrawBitmap { window: WindowId, path: PathBuf, size: PhysicalSize },
    EndPaint(WindowId),
}

#[derive(Debug)]
struct NullWindow {
    geometry: WindowGeometry,
    visible: bool,
}

/// Paint session handed out by [`NullPlatform::begin_paint`]
#[derive(Debug)]
pub struct NullPaint {
    window: WindowId,
}

/// Bitmap handed out by [`NullPlatform::load_bitmap`]
#[derive(Debug)]
pub struct NullBitmap {
    path: PathBuf,
    live: Rc<Cell<usize>>,
}

impl Drop for NullBitmap {
    fn drop(&mut self) {
        self.live.set(self.live.get() - 1);
    }
}

/// Platform without a windowing system.
///
/// Windows exist only as entries in a map. Failures can be injected for
/// class registration, window creation and individual bitmap paths.
#[derive(Debug, Default)]
pub struct NullPlatform {
    calls: RefCell<Vec<PlatformCall>>,
    windows: RefCell<BTreeMap<WindowId, NullWindow>>,
    next_window: Cell<usize>,
    fail_registration: Cell<bool>,
    fail_creation: Cell<bool>,
    monitor_dpi: Cell<Option<u32>>,
    unloadable: RefCell<HashSet<PathBuf>>,
    live_bitmaps: Rc<Cell<usize>>,
    open_paints: Cell<usize>,
}

impl NullPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent class registrations fail
    pub fn fail_registration(&self, fail: bool) {
        self.fail_registration.set(fail);
    }

    /// Make subsequent window creations fail
    pub fn fail_creation(&self, fail: bool) {
        self.fail_creation.set(fail);
    }

    /// DPI reported for every monitor (None = query unsupported)
    pub fn set_monitor_dpi(&self, dpi: Option<u32>) {
        self.monitor_dpi.set(dpi);
    }

    /// Make bitmap loads for `path` fail
    pub fn set_unloadable(&self, path: impl Into<PathBuf>) {
        self.unloadable.borrow_mut().insert(path.into());
    }

    pub fn calls(&self) -> Vec<PlatformCall> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    /// Number of recorded calls matching `pred`
    pub fn count(&self, pred: impl Fn(&PlatformCall) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| pred(c)).count()
    }

    pub fn live_windows(&self) -> Vec<WindowId> {
        self.windows.borrow().keys().copied().collect()
    }

    pub fn is_live(&self, window: WindowId) -> bool {
        self.windows.borrow().contains_key(&window)
    }

    /// Bitmaps loaded and not yet released
    pub fn live_bitmaps(&self) -> usize {
        self.live_bitmaps.get()
    }

    /// Paint sessions begun and not yet ended
    pub fn open_paints(&self) -> usize {
        self.open_paints.get()
    }

    fn record(&self, call: PlatformCall) {
        self.calls.borrow_mut().push(call);
    }

    fn set_visible(&self, window: WindowId, visible: bool) {
        if let Some(w) = self.windows.borrow_mut().get_mut(&window) {
            w.visible = visible;
        }
    }
}

impl SurfacePlatform for NullPlatform {
    type Instance = ();
    type Paint = NullPaint;
    type Bitmap = NullBitmap;

    fn register_class(&self, _instance: (), class_name: &str) -> Result<(), SurfaceError> {
        if self.fail_registration.get() {
            return Err(SurfaceError::ClassRegistration {
                class: class_name.to_string(),
                reason: "registration disabled".to_string(),
            });
        }
        self.record(PlatformCall::RegisterClass(class_name.to_string()));
        Ok(())
    }

    fn unregister_class(&self, _instance: (), class_name: &str) {
        self.record(PlatformCall::UnregisterClass(class_name.to_string()));
    }

    fn monitor_dpi(&self, _point: LogicalPoint) -> Option<u32> {
        self.monitor_dpi.get()
    }

    fn create_window(
        &self,
        _instance: (),
        class_name: &str,
        title: &str,
        geometry: &WindowGeometry,
    ) -> Result<WindowId, SurfaceError> {
        if self.fail_creation.get() {
            return Err(SurfaceError::WindowCreation("creation disabled".to_string()));
        }

        let window = WindowId::from_raw(self.next_window.get() + 1);
        self.next_window.set(window.as_raw());
        self.windows.borrow_mut().insert(
            window,
            NullWindow {
                geometry: *geometry,
                visible: false,
            },
        );
        self.record(PlatformCall::CreateWindow {
            window,
            class_name: class_name.to_string(),
            title: title.to_string(),
            geometry: *geometry,
        });
        Ok(window)
    }

    fn destroy_window(&self, window: WindowId) {
        self.windows.borrow_mut().remove(&window);
        self.record(PlatformCall::DestroyWindow(window));
    }

    fn enable_dpi_scaling(&self, window: WindowId) {
        self.record(PlatformCall::EnableDpiScaling(window));
    }

    fn show_window(&self, window: WindowId) {
        self.set_visible(window, true);
        self.record(PlatformCall::ShowWindow(window));
    }

    fn hide_window(&self, window: WindowId) {
        self.set_visible(window, false);
        self.record(PlatformCall::HideWindow(window));
    }

    fn is_visible(&self, window: WindowId) -> bool {
        self.windows
            .borrow()
            .get(&window)
            .map(|w| w.visible)
            .unwrap_or(false)
    }

    fn send_to_bottom(&self, window: WindowId) {
        self.record(PlatformCall::SendToBottom(window));
    }

    fn redraw(&self, window: WindowId) {
        self.record(PlatformCall::Redraw(window));
    }

    fn client_size(&self, window: WindowId) -> PhysicalSize {
        self.windows
            .borrow()
            .get(&window)
            .map(|w| w.geometry.size())
            .unwrap_or_default()
    }

    fn begin_paint(&self, window: WindowId) -> NullPaint {
        self.open_paints.set(self.open_paints.get() + 1);
        self.record(PlatformCall::BeginPaint(window));
        NullPaint { window }
    }

    fn load_bitmap(&self, path: &Path, size: PhysicalSize) -> Result<NullBitmap, SurfaceError> {
        self.record(PlatformCall::LoadBitmap(path.to_path_buf()));
        if self.unloadable.borrow().contains(path) {
            return Err(SurfaceError::BitmapLoad {
                path: path.to_path_buf(),
                reason: format!("cannot load at {}x{}", size.width, size.height),
            });
        }

        self.live_bitmaps.set(self.live_bitmaps.get() + 1);
        Ok(NullBitmap {
            path: path.to_path_buf(),
            live: Rc::clone(&self.live_bitmaps),
        })
    }

    fn draw_bitmap(&self, paint: &NullPaint, bitmap: &NullBitmap, size: PhysicalSize) {
        self.record(PlatformCall::DrawBitmap {
            window: paint.window,
            path: bitmap.path.clone(),
            size,
        });
    }

    fn end_paint(&self, paint: NullPaint) {
        self.open_paints.set(self.open_paints.get() - 1);
        self.record(PlatformCall::EndPaint(paint.window));
    }
}
