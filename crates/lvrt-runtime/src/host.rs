//! Status-code surface for hosts that cannot consume `Result`
//!
//! Each function wraps one session operation. Failures are logged and turned
//! into integer codes; the detailed message has already reached the host as
//! a [`crate::HostEvent`].

use log::warn;

use crate::error::RuntimeResult;
use crate::introspect::ObjectArea;
use crate::lifecycle::RuntimeSession;
use crate::provider::WidgetProvider;

/// Operation succeeded
pub const STATUS_OK: i32 = 0;

/// Geometry tuple: found, x, y, width, height, layout positioned, alignment
pub type ObjAreaTuple = (bool, i32, i32, i32, i32, bool, i32);

fn status(operation: &str, result: RuntimeResult<()>) -> i32 {
    match result {
        Ok(()) => STATUS_OK,
        Err(err) => {
            warn!("{operation} failed: {err}");
            err.status_code()
        }
    }
}

/// `0` on success, `1` if already initialized, `2` if the canvas is unusable
pub fn initialize<P: WidgetProvider>(session: &mut RuntimeSession<P>, canvas_selector: &str) -> i32 {
    status("initialize", session.initialize(canvas_selector))
}

/// Run one provider tick; ignored while not running
pub fn task_handler<P: WidgetProvider>(session: &mut RuntimeSession<P>) {
    if let Err(err) = session.task_handler() {
        warn!("task handler skipped: {err}");
    }
}

/// `0` when rendered, `1` on any render failure
pub fn process_data<P: WidgetProvider>(session: &mut RuntimeSession<P>, xml: &str, display_style: &[&str]) -> i32 {
    status("render", session.render_flat(xml, display_style))
}

/// `0` when registered, `1` when the data is missing or rejected
pub fn load_component_data<P: WidgetProvider>(
    session: &mut RuntimeSession<P>,
    name: &str,
    xml: Option<&str>,
) -> i32 {
    status("component registration", session.register_component(name, xml))
}

/// Geometry of the object at `path`; all zeros when it cannot be found
pub fn get_obj_area<P: WidgetProvider>(session: &mut RuntimeSession<P>, path: &str) -> ObjAreaTuple {
    match session.get_object_area(path) {
        Ok(Some(ObjectArea {
            x,
            y,
            width,
            height,
            layout_positioned,
            alignment,
        })) => (true, x, y, width, height, layout_positioned, alignment),
        Ok(None) => (false, 0, 0, 0, 0, false, 0),
        Err(err) => {
            warn!("object query failed: {err}");
            (false, 0, 0, 0, 0, false, 0)
        }
    }
}

/// Negative sizes are rejected like zero sizes
pub fn resize_canvas<P: WidgetProvider>(session: &mut RuntimeSession<P>, width: i32, height: i32) {
    let (Ok(width), Ok(height)) = (u32::try_from(width), u32::try_from(height)) else {
        warn!("cannot resize canvas to {width}x{height}");
        return;
    };
    if let Err(err) = session.resize_canvas(width, height) {
        warn!("cannot resize canvas: {err}");
    }
}

/// Tear the session down; safe to call repeatedly
pub fn cleanup_runtime<P: WidgetProvider>(session: &mut RuntimeSession<P>) {
    session.cleanup();
}
