//! Pan-position restriction.
//!
//! Keeps the zoomed image covering the crop window: the pan position is
//! clamped per axis so no gap can open between the image edge and the
//! window edge. When the zoomed image is smaller than the window on an
//! axis, the position snaps to 0 and the window centers on the image
//! instead; that is a boundary policy, not an error.

use crate::geometry::{Point, Size};

/// Clamp a pan position so the zoomed image covers the crop window.
///
/// Per axis the maximum offset from center is
/// `(image_dim * zoom - crop_dim) / 2`. Positions are clamped into
/// `[-max_offset, +max_offset]`; a negative budget (image smaller than the
/// window) clamps to 0. Axes are independent, and the function is
/// idempotent.
///
/// # Arguments
///
/// * `requested` - The pan position to clamp
/// * `image` - The (rotation-adjusted) displayed image dimensions
/// * `crop` - The crop-window dimensions
/// * `zoom` - Current zoom factor
///
/// # Example
///
/// ```
/// use cropview_core::geometry::{Point, Size};
/// use cropview_core::restrict::restrict_position;
///
/// let image = Size::new(800.0, 600.0);
/// let crop = Size::new(400.0, 300.0);
///
/// // At zoom 1 the image overhangs the window by 200x150 per side
/// let clamped = restrict_position(Point::new(500.0, -500.0), image, crop, 1.0);
/// assert_eq!(clamped, Point::new(200.0, -150.0));
/// ```
pub fn restrict_position(requested: Point, image: Size, crop: Size, zoom: f64) -> Point {
    Point {
        x: restrict_axis(requested.x, image.width, crop.width, zoom),
        y: restrict_axis(requested.y, image.height, crop.height, zoom),
    }
}

fn restrict_axis(position: f64, image_dim: f64, crop_dim: f64, zoom: f64) -> f64 {
    let max_offset = (image_dim * zoom - crop_dim) / 2.0;
    if max_offset < 0.0 {
        // Image smaller than the window on this axis: center on it
        0.0
    } else {
        position.clamp(-max_offset, max_offset)
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
