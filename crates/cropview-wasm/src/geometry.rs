//! Crop geometry WASM bindings.
//!
//! Standalone bindings for the pure geometry helpers, for hosts that
//! render their own cropper UI and only need the math: window fitting,
//! position restriction, rotated bounds, and crop descriptors. The
//! interactive state machine lives in [`Cropper`](crate::Cropper).
//!
//! All functions take plain numbers and return plain objects, so no
//! handles need to be kept alive across calls.

use cropview_core::{ImageSize, Point, Rect, Size, ViewState};
use wasm_bindgen::prelude::*;

use crate::types::to_js;

/// Fit the largest crop window of the given aspect ratio inside an image.
///
/// # Arguments
/// * `image_width` / `image_height` - Displayed image bounding box
/// * `aspect` - Target width / height ratio
///
/// # Returns
/// A `{width, height}` object filling the image on at least one axis.
#[wasm_bindgen]
pub fn fit_crop_size(image_width: f64, image_height: f64, aspect: f64) -> Result<JsValue, JsValue> {
    let size = cropview_core::fit_crop_size(Size::new(image_width, image_height), aspect);
    to_js(&size)
}

/// Clamp a pan position so the crop window stays covered by image content.
///
/// # Arguments
/// * `position_x` / `position_y` - Requested pan offset
/// * `image_width` / `image_height` - Displayed image bounding box
/// * `crop_width` / `crop_height` - Crop window size
/// * `zoom` - Current zoom factor
///
/// # Returns
/// The nearest in-budget `{x, y}` position.
#[wasm_bindgen]
pub fn restrict_position(
    position_x: f64,
    position_y: f64,
    image_width: f64,
    image_height: f64,
    crop_width: f64,
    crop_height: f64,
    zoom: f64,
) -> Result<JsValue, JsValue> {
    let position = cropview_core::restrict_position(
        Point::new(position_x, position_y),
        Size::new(image_width, image_height),
        Size::new(crop_width, crop_height),
        zoom,
    );
    to_js(&position)
}

/// Axis-aligned bounding box of a rectangle rotated around its center.
#[wasm_bindgen]
pub fn rotated_bounding_box(width: f64, height: f64, degrees: f64) -> Result<JsValue, JsValue> {
    let size = cropview_core::rotated_bounding_box(Size::new(width, height), degrees);
    to_js(&size)
}

/// Rotate a point around a center by an angle in degrees.
#[wasm_bindgen]
pub fn rotate_point(
    x: f64,
    y: f64,
    center_x: f64,
    center_y: f64,
    degrees: f64,
) -> Result<JsValue, JsValue> {
    let point = cropview_core::rotate_point(
        Point::new(x, y),
        Point::new(center_x, center_y),
        degrees,
    );
    to_js(&point)
}

/// Describe the cropped region for a pan/zoom state, in percent and pixel
/// terms.
///
/// # Arguments
/// * `position_x` / `position_y` - Pan offset
/// * `display_width` / `display_height` - Displayed bounding box (rotation-adjusted)
/// * `natural_width` / `natural_height` - Natural bounding box (rotation-adjusted)
/// * `crop_width` / `crop_height` - Crop window size
/// * `aspect` - Ratio the pixel rectangle is reconciled against
/// * `zoom` - Current zoom factor
/// * `restrict` - Clamp percentages into [0, 100]
///
/// # Returns
/// A `{percent, pixels}` object of two rectangles.
///
/// # Example (TypeScript)
/// ```typescript
/// const area = compute_cropped_area(0, 0, 800, 600, 1600, 1200, 800, 600, 4 / 3, 1, true);
/// console.log(area.pixels); // {x: 0, y: 0, width: 1600, height: 1200}
/// ```
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn compute_cropped_area(
    position_x: f64,
    position_y: f64,
    display_width: f64,
    display_height: f64,
    natural_width: f64,
    natural_height: f64,
    crop_width: f64,
    crop_height: f64,
    aspect: f64,
    zoom: f64,
    restrict: bool,
) -> Result<JsValue, JsValue> {
    let image = ImageSize {
        width: display_width,
        height: display_height,
        natural_width,
        natural_height,
    };
    let area = cropview_core::compute_cropped_area(
        Point::new(position_x, position_y),
        image,
        Size::new(crop_width, crop_height),
        aspect,
        zoom,
        restrict,
    );
    to_js(&area)
}

/// Map a desired pixel crop back to the pan/zoom that frames it.
///
/// # Arguments
/// * `x` / `y` / `width` / `height` - Desired crop in natural-image pixels
/// * `display_width` / `display_height` - Displayed bounding box
/// * `natural_width` / `natural_height` - Natural bounding box
///
/// # Returns
/// A `{pan: {x, y}, zoom}` object reproducing the crop.
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn initial_crop_from_pixels(
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    display_width: f64,
    display_height: f64,
    natural_width: f64,
    natural_height: f64,
) -> Result<JsValue, JsValue> {
    let image = ImageSize {
        width: display_width,
        height: display_height,
        natural_width,
        natural_height,
    };
    let (pan, zoom) =
        cropview_core::initial_crop_from_pixels(Rect::new(x, y, width, height), image);
    to_js(&ViewState::new(pan, zoom))
}
