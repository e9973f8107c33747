//! Crop-area computation.
//!
//! Maps the on-screen pan/zoom state to the selected region of the natural
//! image, and back. The forward direction produces a [`CroppedArea`] with
//! the selection in percent of the natural size and in natural pixels; the
//! inverse direction seeds pan/zoom from a desired pixel rectangle.
//!
//! # Coordinate chain
//!
//! The crop window's top-left corner is first expressed in zoomed
//! display-image space from the pan position, divided by the zoom to reach
//! unzoomed display space, then scaled by natural/display to reach natural
//! pixels:
//!
//! ```text
//! percent.x = ((image.width - crop.width / zoom) / 2 - pan.x / zoom)
//!             / image.width * 100
//! percent.width = crop.width / (image.width * zoom) * 100
//! ```
//!
//! Pixel values are rounded to whole pixels, reconciled to the target
//! aspect from the driving axis, and clamped into the natural bounds, so
//! the pixel output never exceeds the image even for an unrestricted pan.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect, Size};
use crate::sizing::{fit_crop_size, ImageSize};

/// The selected crop region, in both output conventions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CroppedArea {
    /// Selection in percent (0-100 per axis) of the natural image size.
    pub percent: Rect,
    /// Selection in natural image pixels, rounded to whole values.
    pub pixels: Rect,
}

/// Compute the crop descriptor for the current view state.
///
/// # Arguments
///
/// * `position` - Current pan position (restrict beforehand if desired)
/// * `image` - Rotation-adjusted display and natural dimensions
/// * `crop` - The crop-window dimensions
/// * `aspect` - Effective aspect ratio of the crop window
/// * `zoom` - Current zoom factor
/// * `restricted` - Whether pan restriction is active; when true the
///   percent values are clamped into [0, 100], when false they may
///   legitimately describe a window reaching past the image edges
///
/// # Returns
///
/// The selection in percent and in natural pixels. Pixels are rounded,
/// aspect-reconciled (the driving axis is the one the window can fill at
/// minimum zoom), and always clamped into the natural bounds.
///
/// # Example
///
/// ```
/// use cropview_core::area::compute_cropped_area;
/// use cropview_core::geometry::{Point, Rect, Size};
/// use cropview_core::sizing::ImageSize;
///
/// let image = ImageSize {
///     width: 800.0,
///     height: 600.0,
///     natural_width: 800.0,
///     natural_height: 600.0,
/// };
/// let area = compute_cropped_area(
///     Point::new(0.0, 0.0),
///     image,
///     Size::new(400.0, 300.0),
///     4.0 / 3.0,
///     1.0,
///     true,
/// );
/// assert_eq!(area.pixels, Rect::new(200.0, 150.0, 400.0, 300.0));
/// ```
pub fn compute_cropped_area(
    position: Point,
    image: ImageSize,
    crop: Size,
    aspect: f64,
    zoom: f64,
    restricted: bool,
) -> CroppedArea {
    let limit = |max: f64, value: f64| if restricted { value.clamp(0.0, max) } else { value };

    let percent = Rect {
        x: limit(
            100.0,
            (((image.width - crop.width / zoom) / 2.0 - position.x / zoom) / image.width) * 100.0,
        ),
        y: limit(
            100.0,
            (((image.height - crop.height / zoom) / 2.0 - position.y / zoom) / image.height)
                * 100.0,
        ),
        width: limit(100.0, ((crop.width / image.width) * 100.0) / zoom),
        height: limit(100.0, ((crop.height / image.height) * 100.0) / zoom),
    };

    let width_px = ((percent.width * image.natural_width) / 100.0).round();
    let height_px = ((percent.height * image.natural_height) / 100.0).round();

    // Recompute the dependent axis from the aspect so rounding the two axes
    // independently cannot drift the ratio. The driving axis is the one the
    // window fills at minimum zoom.
    let wider_than_high = image.natural_width >= image.natural_height * aspect;
    let (size_w, size_h) = if wider_than_high {
        ((height_px * aspect).round(), height_px)
    } else {
        (width_px, (width_px / aspect).round())
    };
    let size_w = size_w.clamp(0.0, image.natural_width);
    let size_h = size_h.clamp(0.0, image.natural_height);

    let pixels = Rect {
        x: ((percent.x * image.natural_width) / 100.0)
            .round()
            .clamp(0.0, image.natural_width - size_w),
        y: ((percent.y * image.natural_height) / 100.0)
            .round()
            .clamp(0.0, image.natural_height - size_h),
        width: size_w,
        height: size_h,
    };

    CroppedArea { percent, pixels }
}

/// Solve [`compute_cropped_area`] in reverse: the pan position and zoom
/// that select a desired natural-pixel rectangle.
///
/// The crop window is refit internally from the rectangle's own aspect
/// ratio, so this is exact only for the auto-fitted window. Consumed once,
/// at image-ready time, to seed the externally owned view state.
///
/// # Arguments
///
/// * `desired` - Target selection in natural pixels
/// * `image` - Rotation-adjusted display and natural dimensions
///
/// # Returns
///
/// `(pan, zoom)` reproducing `desired` within one natural pixel when fed
/// back through [`compute_cropped_area`]. The zoom is not clamped into the
/// configured bounds; the caller owns zoom and the next interaction clamps.
pub fn initial_crop_from_pixels(desired: Rect, image: ImageSize) -> (Point, f64) {
    let aspect = desired.width / desired.height;
    let crop = fit_crop_size(image.display(), aspect);

    let ratio_x = image.width / image.natural_width;
    let ratio_y = image.height / image.natural_height;

    let zoom = crop.width / (desired.width * ratio_x);
    let pan = Point {
        x: ((image.natural_width - desired.width) / 2.0 - desired.x) * ratio_x * zoom,
        y: ((image.natural_height - desired.height) / 2.0 - desired.y) * ratio_y * zoom,
    };

    (pan, zoom)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
