//! Object geometry queries and canvas resizing

use log::info;
use lvrt_engine::{EngineError, TreeSnapshot};
use serde::Serialize;

use crate::error::{RuntimeError, RuntimeResult};
use crate::lifecycle::RuntimeSession;
use crate::provider::WidgetProvider;

/// Geometry of one object on the active screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ObjectArea {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    /// Position was computed by the parent's layout
    pub layout_positioned: bool,
    /// Alignment code, `0` (default) through `9`
    pub alignment: i32,
}

impl<P: WidgetProvider> RuntimeSession<P> {
    /// Look up an object by name path on the active screen
    ///
    /// Pending layout is computed first. An empty path names the screen.
    pub fn get_object_area(&mut self, path: &str) -> RuntimeResult<Option<ObjectArea>> {
        self.ensure_running()?;
        self.provider.update_layout();

        let Some(screen) = self.provider.screen_active() else {
            return Ok(None);
        };
        let Some(obj) = self.provider.child_by_name(screen, path) else {
            return Ok(None);
        };
        Ok(self.provider.object_area(obj).map(|area| ObjectArea {
            x: area.x1,
            y: area.y1,
            width: area.width(),
            height: area.height(),
            layout_positioned: self.provider.is_layout_positioned(obj),
            alignment: self.provider.style_align(obj).code(),
        }))
    }

    /// Change the display resolution; objects are laid out again lazily
    pub fn resize_canvas(&mut self, width: u32, height: u32) -> RuntimeResult<()> {
        self.ensure_running()?;
        self.provider.set_resolution(width, height).map_err(|err| match err {
            EngineError::InvalidResolution { .. } => RuntimeError::InvalidCanvas(err.to_string()),
            other => RuntimeError::Engine(other),
        })?;
        info!("canvas resized to {width}x{height}");
        Ok(())
    }

    /// Current display resolution
    #[must_use]
    pub fn canvas_size(&self) -> Option<(u32, u32)> {
        if self.is_running() {
            self.provider.resolution()
        } else {
            None
        }
    }

    /// Number of children of the active screen
    #[must_use]
    pub fn screen_child_count(&self) -> Option<usize> {
        if !self.is_running() {
            return None;
        }
        self.provider
            .screen_active()
            .and_then(|screen| self.provider.child_count(screen))
    }

    /// Laid-out tree of the active screen
    pub fn snapshot(&mut self) -> RuntimeResult<Option<TreeSnapshot>> {
        self.ensure_running()?;
        self.provider.update_layout();
        Ok(self
            .provider
            .screen_active()
            .and_then(|screen| self.provider.snapshot(screen)))
    }
}
