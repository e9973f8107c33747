//! Cropview WASM - WebAssembly bindings for Cropview
//!
//! This crate provides WASM bindings to expose the cropview-core
//! functionality to JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `cropper` - The interactive [`Cropper`] handle (gestures, zoom, settling)
//! - `geometry` - Standalone crop geometry functions for custom UIs
//! - `types` - Conversion between core types and JavaScript values
//!
//! # Usage
//!
//! ```typescript
//! import init, { Cropper } from '@cropview/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const cropper = new Cropper({ aspect: 4 / 3 });
//! const rect = container.getBoundingClientRect();
//! cropper.attach(rect.x, rect.y, rect.width, rect.height);
//! ```

use wasm_bindgen::prelude::*;

mod cropper;
mod geometry;
mod types;

// Re-export public types
pub use cropper::Cropper;
pub use geometry::{
    compute_cropped_area, fit_crop_size, initial_crop_from_pixels, restrict_position,
    rotate_point, rotated_bounding_box,
};

/// Forwards engine log records to the browser console.
struct ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::Level::Debug
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = JsValue::from_str(&format!("{} {}", record.target(), record.args()));
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&message),
            log::Level::Warn => web_sys::console::warn_1(&message),
            log::Level::Info => web_sys::console::info_1(&message),
            _ => web_sys::console::debug_1(&message),
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    // set_logger fails when already installed (hot reload); keep the
    // existing logger in that case
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(log::LevelFilter::Debug);
    }
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Simple function to verify WASM is working
#[wasm_bindgen]
pub fn greet(name: &str) -> String {
    format!("Hello, {}! Cropview WASM is ready.", name)
}
