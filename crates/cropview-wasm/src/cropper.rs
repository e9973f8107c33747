//! Interactive cropper WASM bindings.
//!
//! This module wraps the core [`CropEngine`] in a handle JavaScript can
//! drive directly from DOM listeners. The handle keeps the last committed
//! pan/zoom alongside the engine, so event methods stay free of view
//! arguments: commit state changes through `set_view`, feed events, apply
//! the returned proposals, commit again.
//!
//! Every event method returns an array of tagged `{type, value}` objects
//! (`cropChanged`, `zoomChanged`, `cropComplete`, `interactionStart`,
//! `interactionEnd`, `imageError`).
//!
//! # Example (TypeScript)
//! ```typescript
//! const cropper = new Cropper({ aspect: 16 / 9 });
//! const rect = container.getBoundingClientRect();
//! cropper.attach(rect.x, rect.y, rect.width, rect.height);
//!
//! image.onload = () => {
//!   apply(cropper.set_media_size(
//!     image.offsetWidth, image.offsetHeight,
//!     image.naturalWidth, image.naturalHeight,
//!   ));
//! };
//!
//! container.onpointermove = (e) => {
//!   apply(cropper.mouse_move(e.clientX, e.clientY));
//!   if (cropper.has_pending_updates) {
//!     requestAnimationFrame(() => apply(cropper.on_frame()));
//!   }
//! };
//!
//! function apply(events) {
//!   for (const e of events) {
//!     if (e.type === 'cropChanged') setCrop(e.value);   // re-render, then
//!     if (e.type === 'zoomChanged') setZoom(e.value);   // cropper.set_view(...)
//!     if (e.type === 'cropComplete') onCropComplete(e.value);
//!   }
//! }
//! ```

use cropview_core::{CropConfig, CropEngine, CropShape, InputEvent, Point, Rect, Size, ViewState};
use wasm_bindgen::prelude::*;
use web_time::Instant;

use crate::types::{from_js, to_js, touches_from_array};

/// Interactive cropper handle for JavaScript.
#[wasm_bindgen]
pub struct Cropper {
    engine: CropEngine,
    view: ViewState,
}

#[wasm_bindgen]
impl Cropper {
    /// Create a cropper from a configuration object.
    ///
    /// Pass `undefined` (or `{}`) for the defaults; any subset of the
    /// configuration fields may be present.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<Cropper, JsValue> {
        let config: CropConfig = if config.is_undefined() || config.is_null() {
            CropConfig::default()
        } else {
            from_js(config)?
        };
        Ok(Cropper {
            engine: CropEngine::new(config),
            view: ViewState::default(),
        })
    }

    /// Commit the controlled pan/zoom state.
    ///
    /// Call after applying `cropChanged`/`zoomChanged` proposals; the
    /// engine reads the committed values on the next event.
    pub fn set_view(&mut self, pan_x: f64, pan_y: f64, zoom: f64) {
        self.view = ViewState::new(Point::new(pan_x, pan_y), zoom);
    }

    /// Record the container rectangle from `getBoundingClientRect()`.
    /// Re-call whenever the container moves or resizes.
    pub fn attach(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.engine.attach(Rect::new(x, y, width, height));
    }

    /// Release the container and any in-flight gesture state.
    pub fn detach(&mut self) {
        self.engine.detach();
    }

    /// Report the displayed and natural media dimensions, at load time and
    /// after any re-layout.
    pub fn set_media_size(
        &mut self,
        display_width: f64,
        display_height: f64,
        natural_width: f64,
        natural_height: f64,
    ) -> Result<JsValue, JsValue> {
        let events = self.engine.set_media_size(
            self.view,
            Size::new(display_width, display_height),
            Size::new(natural_width, natural_height),
        );
        to_js(&events)
    }

    /// Surface a media load failure as an `imageError` event.
    pub fn media_error(&self, message: &str) -> Result<JsValue, JsValue> {
        to_js(&self.engine.media_error(message))
    }

    /// Change the rotation in degrees.
    pub fn set_rotation(&mut self, degrees: f64) -> Result<JsValue, JsValue> {
        to_js(&self.engine.set_rotation(self.view, degrees))
    }

    /// Change the target aspect ratio.
    pub fn set_aspect(&mut self, aspect: f64) -> Result<JsValue, JsValue> {
        to_js(&self.engine.set_aspect(self.view, aspect))
    }

    /// Re-restrict and settle the committed view, e.g. after an external
    /// zoom slider commit.
    pub fn recompute(&self) -> Result<JsValue, JsValue> {
        to_js(&self.engine.recompute(self.view))
    }

    pub fn mouse_down(&mut self, x: f64, y: f64) -> Result<JsValue, JsValue> {
        self.dispatch(InputEvent::MouseDown {
            position: Point::new(x, y),
        })
    }

    pub fn mouse_move(&mut self, x: f64, y: f64) -> Result<JsValue, JsValue> {
        self.dispatch(InputEvent::MouseMove {
            position: Point::new(x, y),
        })
    }

    pub fn mouse_up(&mut self, x: f64, y: f64) -> Result<JsValue, JsValue> {
        self.dispatch(InputEvent::MouseUp {
            position: Point::new(x, y),
        })
    }

    /// Begin a touch gesture. `touches` is an array of `{x, y}` objects,
    /// one per active touch point.
    pub fn touch_start(&mut self, touches: js_sys::Array) -> Result<JsValue, JsValue> {
        let touches = touches_from_array(&touches)?;
        self.dispatch(InputEvent::TouchStart { touches })
    }

    pub fn touch_move(&mut self, touches: js_sys::Array) -> Result<JsValue, JsValue> {
        let touches = touches_from_array(&touches)?;
        self.dispatch(InputEvent::TouchMove { touches })
    }

    /// End a touch gesture. `touches` carries the points still down; a
    /// non-empty array restarts a session from the remaining fingers.
    pub fn touch_end(&mut self, touches: js_sys::Array) -> Result<JsValue, JsValue> {
        let touches = touches_from_array(&touches)?;
        self.dispatch(InputEvent::TouchEnd { touches })
    }

    /// Feed a wheel event. Positive `delta_y` zooms out.
    pub fn wheel(&mut self, x: f64, y: f64, delta_y: f64) -> Result<JsValue, JsValue> {
        self.dispatch(InputEvent::Wheel {
            position: Point::new(x, y),
            delta_y,
        })
    }

    /// Drain the coalesced move updates. Call once per animation frame
    /// while `has_pending_updates` is true.
    pub fn on_frame(&mut self) -> Result<JsValue, JsValue> {
        let events = self
            .engine
            .on_frame(self.view)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        to_js(&events)
    }

    /// Fire the wheel idle edge when due. Call from a timer or the frame
    /// loop while a wheel burst is active.
    pub fn poll(&mut self) -> Result<JsValue, JsValue> {
        to_js(&self.engine.poll(self.view, Instant::now()))
    }

    /// Whether a drag or pinch session is active.
    #[wasm_bindgen(getter)]
    pub fn is_gesturing(&self) -> bool {
        self.engine.is_gesturing()
    }

    /// Whether a coalesced update is waiting for `on_frame`.
    #[wasm_bindgen(getter)]
    pub fn has_pending_updates(&self) -> bool {
        self.engine.has_pending_updates()
    }

    /// The current crop window as `{width, height}`, or `undefined` before
    /// media is reported.
    pub fn crop_size(&self) -> Result<JsValue, JsValue> {
        to_js(&self.engine.crop_size())
    }

    /// The rotation-adjusted image dimensions, or `undefined` before media
    /// is reported.
    pub fn image_size(&self) -> Result<JsValue, JsValue> {
        to_js(&self.engine.image_size())
    }

    /// Whether hosts should draw the rule-of-thirds grid.
    #[wasm_bindgen(getter)]
    pub fn show_grid(&self) -> bool {
        self.engine.config().show_grid
    }

    /// The crop window overlay shape, `"rect"` or `"round"`.
    #[wasm_bindgen(getter)]
    pub fn crop_shape(&self) -> String {
        match self.engine.config().crop_shape {
            CropShape::Rect => "rect".to_string(),
            CropShape::Round => "round".to_string(),
        }
    }
}

impl Cropper {
    /// Feed one input event at the current wall-clock time.
    fn dispatch(&mut self, event: InputEvent) -> Result<JsValue, JsValue> {
        let events = self
            .engine
            .handle_event(self.view, event, Instant::now())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        to_js(&events)
    }
}
