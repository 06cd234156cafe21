use std::{cell::RefCell, rc::Rc};

use three_d::Viewport;
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys as web;

use crate::display;
use crate::timeline::Timeline;


/// Registers a scroll listener that retargets the timeline from the page
/// scroll offset. The closure lives for the page session.
pub fn wire_scroll(timeline: Rc<RefCell<Timeline>>) {
    if let Some(window) = web::window() {
        let closure = Closure::wrap(Box::new(move || {
            timeline
                .borrow_mut()
                .set_scroll_offset(crate::utils::scroll_offset());
        }) as Box<dyn FnMut()>);
        let _ = window.add_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}


/// Reconciles the canvas backing store with the pixel-ratio cap and returns
/// the viewport to render with.
///
/// The engine owns the canvas and sizes it from the browser window at the
/// full device pixel ratio; this runs once per frame, after the engine has
/// processed its resize events and before anything is drawn, so the backing
/// store has exactly one writer at a fixed point in the frame.
pub fn clamp_backing_store(
    canvas: &web::HtmlCanvasElement,
    viewport: Viewport,
    device_pixel_ratio: f64,
) -> Viewport {
    let (w, h) = display::capped_render_size(viewport.width, viewport.height, device_pixel_ratio);
    if (canvas.width(), canvas.height()) != (w, h) {
        canvas.set_width(w);
        canvas.set_height(h);
    }
    Viewport::new_at_origo(w, h)
}


/// The canvas the rendering context was created on
pub fn find_canvas() -> Option<web::HtmlCanvasElement> {
    web::window()?
        .document()?
        .query_selector("canvas")
        .ok()??
        .dyn_into::<web::HtmlCanvasElement>()
        .ok()
}
