//! Background surface - one window showing one bitmap
//!
//! The surface owns at most one live window and the path of the image it
//! paints. It is driven from the thread that runs the host's message loop:
//! the host calls [`BackgroundSurface::create`] and
//! [`BackgroundSurface::update_background`], the window procedure forwards
//! messages to [`BackgroundSurface::handle_message`].
//!
//! State lives in `Cell`/`RefCell` so every operation takes `&self`. No
//! borrow is held across a platform call, since the platform may dispatch
//! messages back into the surface before it returns.

use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};

use crate::config::{ScaleMode, SurfaceConfig};
use crate::error::SurfaceError;
use crate::geometry::{scale_factor_for_dpi, WindowGeometry};
use crate::message::{decode_path, CopyDataTag, Dispatch, SurfaceMessage};
use crate::platform::{SurfacePlatform, WindowId};
use crate::registry::ClassRegistry;

pub struct BackgroundSurface<P: SurfacePlatform> {
    platform: P,
    registry: &'static ClassRegistry,
    config: SurfaceConfig,
    handle: Cell<Option<WindowId>>,
    image_path: RefCell<PathBuf>,
    /// Instance whose class reference this surface holds, if any
    class_holder: Cell<Option<P::Instance>>,
}

impl<P: SurfacePlatform> BackgroundSurface<P> {
    /// Create an empty surface using the process-wide class registry
    pub fn new(platform: P, config: SurfaceConfig) -> Self {
        Self::with_registry(platform, config, ClassRegistry::global())
    }

    pub fn with_registry(
        platform: P,
        config: SurfaceConfig,
        registry: &'static ClassRegistry,
    ) -> Self {
        Self {
            platform,
            registry,
            config,
            handle: Cell::new(None),
            image_path: RefCell::new(PathBuf::new()),
            class_holder: Cell::new(None),
        }
    }

    /// Create the window, replacing any window created earlier.
    ///
    /// The window starts hidden at the bottom of the z-order.
    pub fn create(&self, instance: P::Instance) -> Result<WindowId, SurfaceError> {
        self.destroy();

        self.acquire_class(instance)?;

        let factor = self.scale_factor();
        let geometry = WindowGeometry::scaled(self.config.origin, self.config.size, factor);
        log!(
            "BackgroundSurface::create: scale={} geometry={:?}",
            factor,
            geometry
        );

        let window = match self.platform.create_window(
            instance,
            &self.config.class_name,
            &self.config.title,
            &geometry,
        ) {
            Ok(window) => window,
            Err(e) => {
                log!("BackgroundSurface::create failed: {}", e);
                self.release_class();
                return Err(e);
            }
        };
        self.handle.set(Some(window));

        self.platform.hide_window(window);
        self.platform.send_to_bottom(window);

        log!("BackgroundSurface::create: window {:?}", window);
        Ok(window)
    }

    /// Replace the background image path.
    ///
    /// A visible window is repainted before this returns; a hidden one picks
    /// the new path up on its next paint. The path is not validated here.
    pub fn update_background(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        log!("BackgroundSurface::update_background: {:?}", path);
        *self.image_path.borrow_mut() = path;

        if let Some(window) = self.handle.get() {
            if self.platform.is_visible(window) {
                self.platform.redraw(window);
            }
        }
    }

    /// Destroy the window and release the window class.
    ///
    /// Leaves the surface empty; calling it again does nothing.
    pub fn destroy(&self) {
        if let Some(window) = self.handle.take() {
            log!("BackgroundSurface::destroy: window {:?}", window);
            self.platform.destroy_window(window);
        }
        self.release_class();
    }

    /// Record the live window once the platform reports its creation
    pub fn attach(&self, window: WindowId) {
        self.handle.set(Some(window));
        self.platform.enable_dpi_scaling(window);
    }

    /// Forget the window after the platform tore it down
    pub fn detach(&self, window: WindowId) {
        if self.handle.get() == Some(window) {
            log!("BackgroundSurface::detach: window {:?} destroyed", window);
            self.handle.set(None);
        }
    }

    /// Handle one message for `window`
    pub fn handle_message(&self, window: WindowId, message: SurfaceMessage<'_>) -> Dispatch {
        match message {
            SurfaceMessage::CopyData { tag, payload } => {
                match CopyDataTag::from(tag) {
                    CopyDataTag::SetBackgroundImage => {
                        self.update_background(decode_path(payload));
                    }
                    CopyDataTag::SetBackgroundColor => {
                        log!("BackgroundSurface: background color is reserved, ignoring");
                    }
                    CopyDataTag::Unknown(tag) => {
                        log!("BackgroundSurface: ignoring copy-data tag {}", tag);
                    }
                }
                Dispatch::Handled
            }
            SurfaceMessage::Paint => {
                self.paint(window);
                Dispatch::Handled
            }
            SurfaceMessage::Other => Dispatch::Default,
        }
    }

    /// Show the window without activating it
    pub fn show(&self) {
        if let Some(window) = self.handle.get() {
            self.platform.show_window(window);
        }
    }

    pub fn hide(&self) {
        if let Some(window) = self.handle.get() {
            self.platform.hide_window(window);
        }
    }

    pub fn is_visible(&self) -> bool {
        self.handle
            .get()
            .map(|w| self.platform.is_visible(w))
            .unwrap_or(false)
    }

    /// The live window, if created
    pub fn handle(&self) -> Option<WindowId> {
        self.handle.get()
    }

    pub fn image_path(&self) -> PathBuf {
        self.image_path.borrow().clone()
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    fn paint(&self, window: WindowId) {
        let paint = self.platform.begin_paint(window);

        let path = self.image_path();
        if !path.as_os_str().is_empty() {
            self.draw_image(&paint, window, &path);
        }

        self.platform.end_paint(paint);
    }

    // Load failures are deliberately silent: the class brush shows instead.
    fn draw_image(&self, paint: &P::Paint, window: WindowId, path: &Path) {
        let size = self.platform.client_size(window);
        if let Ok(bitmap) = self.platform.load_bitmap(path, size) {
            self.platform.draw_bitmap(paint, &bitmap, size);
        }
    }

    fn scale_factor(&self) -> f64 {
        match self.config.scale {
            ScaleMode::Fixed { factor } => factor,
            ScaleMode::Monitor => self
                .platform
                .monitor_dpi(self.config.origin)
                .map(scale_factor_for_dpi)
                .unwrap_or(1.0),
        }
    }

    fn acquire_class(&self, instance: P::Instance) -> Result<(), SurfaceError> {
        let class_name = &self.config.class_name;
        self.registry.acquire(class_name, || {
            self.platform.register_class(instance, class_name)
        })?;
        self.class_holder.set(Some(instance));
        Ok(())
    }

    fn release_class(&self) {
        if let Some(instance) = self.class_holder.take() {
            let class_name = &self.config.class_name;
            self.registry.release(class_name, || {
                self.platform.unregister_class(instance, class_name)
            });
        }
    }
}

impl<P: SurfacePlatform> Drop for BackgroundSurface<P> {
    fn drop(&mut self) {
        self.destroy();
    }
}
