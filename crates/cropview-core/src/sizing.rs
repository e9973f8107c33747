//! Crop-window and image sizing.
//!
//! The crop window is the fixed on-screen rectangle the user fills by
//! panning and zooming the image behind it. Its size is derived from the
//! image's displayed bounding box and the target aspect ratio, unless the
//! caller supplies an explicit window.
//!
//! Both the displayed and the natural (original-resolution) image dimensions
//! are carried rotation-adjusted: when the image is rotated, every
//! computation sees the bounding box of the rotated image, not the raw
//! dimensions.

use serde::{Deserialize, Serialize};

use crate::geometry::{rotated_bounding_box, Size};

/// Rotation-adjusted image dimensions.
///
/// `width`/`height` describe the displayed bounding box, `natural_width`/
/// `natural_height` the original-resolution bounding box. Both are the
/// dimensions of the rotated image's axis-aligned bounds, so a 90-degree
/// rotation swaps them relative to the raw measurements.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSize {
    /// Displayed bounding-box width in screen pixels.
    pub width: f64,
    /// Displayed bounding-box height in screen pixels.
    pub height: f64,
    /// Natural bounding-box width in image pixels.
    pub natural_width: f64,
    /// Natural bounding-box height in image pixels.
    pub natural_height: f64,
}

impl ImageSize {
    /// Build an `ImageSize` from raw measured dimensions and a rotation.
    ///
    /// The rotation is applied independently to the displayed size and the
    /// natural size (both are plain bounding-box computations, so the two
    /// stay proportional whenever the raw sizes are).
    ///
    /// # Arguments
    ///
    /// * `display` - Measured on-screen image dimensions, unrotated
    /// * `natural` - Original image pixel dimensions, unrotated
    /// * `rotation_degrees` - Current rotation
    pub fn from_media(display: Size, natural: Size, rotation_degrees: f64) -> Self {
        let display_bounds = rotated_bounding_box(display, rotation_degrees);
        let natural_bounds = rotated_bounding_box(natural, rotation_degrees);
        Self {
            width: display_bounds.width,
            height: display_bounds.height,
            natural_width: natural_bounds.width,
            natural_height: natural_bounds.height,
        }
    }

    /// The displayed bounding box as a `Size`.
    pub fn display(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// The natural bounding box as a `Size`.
    pub fn natural(&self) -> Size {
        Size::new(self.natural_width, self.natural_height)
    }
}

/// Compute the largest crop window of the given aspect ratio that fits
/// inside an image bounding box.
///
/// # Arguments
///
/// * `image` - The (rotation-adjusted) displayed image dimensions
/// * `aspect` - Target width/height ratio, must be positive
///
/// # Returns
///
/// A `Size` with `width <= image.width`, `height <= image.height`, and
/// `width / height == aspect`. One axis always matches the image exactly.
///
/// # Example
///
/// ```
/// use cropview_core::geometry::Size;
/// use cropview_core::sizing::fit_crop_size;
///
/// // A 4:3 window inside a wide image is limited by height
/// let window = fit_crop_size(Size::new(1600.0, 600.0), 4.0 / 3.0);
/// assert_eq!(window, Size::new(800.0, 600.0));
/// ```
pub fn fit_crop_size(image: Size, aspect: f64) -> Size {
    if image.width >= image.height * aspect {
        // Wider than the target aspect: height limits the window
        Size::new(image.height * aspect, image.height)
    } else {
        Size::new(image.width, image.width / aspect)
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
