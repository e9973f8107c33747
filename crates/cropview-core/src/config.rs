//! Engine configuration.
//!
//! Bundles the knobs a host sets up front: zoom bounds, rotation, the
//! target aspect ratio, gesture tuning, and the optional overrides
//! (external crop window, initial pixel crop). Rotation and aspect also
//! change at runtime through the engine's setters; the rest is fixed for
//! the engine's lifetime.

use serde::{Deserialize, Serialize};

use crate::geometry::{Rect, Size};

const DEFAULT_MIN_ZOOM: f64 = 1.0;
const DEFAULT_MAX_ZOOM: f64 = 3.0;

/// Shape of the crop window overlay.
///
/// Purely presentational: a round window crops the same rectangle as a
/// rect one, hosts just mask the corners when rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropShape {
    #[default]
    Rect,
    Round,
}

/// Configuration for a [`CropEngine`](crate::CropEngine).
///
/// Deserializes from partial data: absent fields take their defaults, so
/// hosts only spell out what they change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CropConfig {
    /// Image rotation in degrees, normalized into [0, 360).
    pub rotation: f64,
    /// Target aspect ratio (width / height) used to fit the crop window.
    /// Ignored while `crop_size` is set.
    pub aspect: f64,
    /// Lower zoom bound; proposals never go below it.
    pub min_zoom: f64,
    /// Upper zoom bound; proposals never go above it.
    pub max_zoom: f64,
    /// Multiplier on wheel zoom sensitivity.
    pub zoom_speed: f64,
    /// Shape of the crop window overlay.
    pub crop_shape: CropShape,
    /// Whether hosts should draw the rule-of-thirds grid.
    pub show_grid: bool,
    /// Keep the crop window covered by image content at all times. When
    /// false, pan and zoom proposals pass through unclamped.
    pub restrict_position: bool,
    /// Desired initial crop in natural-image pixels, mapped to a seeded
    /// pan/zoom on the first media report and then discarded.
    pub initial_crop_pixels: Option<Rect>,
    /// Externally imposed crop window in display pixels, replacing the
    /// aspect-ratio fit.
    pub crop_size: Option<Size>,
}

impl CropConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// The aspect ratio settled crops are reconciled against: the imposed
    /// window's own ratio when one is set, the configured ratio otherwise.
    pub fn effective_aspect(&self) -> f64 {
        match self.crop_size {
            Some(size) => size.width / size.height,
            None => self.aspect,
        }
    }

    /// Clamp a zoom value into the configured bounds.
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            rotation: 0.0,
            aspect: 4.0 / 3.0,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            zoom_speed: 1.0,
            crop_shape: CropShape::default(),
            show_grid: true,
            restrict_position: true,
            initial_crop_pixels: None,
            crop_size: None,
        }
    }
}
