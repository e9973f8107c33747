//! Cropview Core - Crop geometry and gesture engine
//!
//! This crate provides the headless side of the Cropview image cropper:
//! pure crop geometry (window fitting, position restriction, rotated
//! bounds, crop descriptors) and the [`CropEngine`] state machine that
//! turns raw pointer, touch, and wheel events into pan/zoom proposals
//! over externally owned view state.

pub mod area;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod geometry;
pub mod restrict;
pub mod sizing;

pub use area::{compute_cropped_area, initial_crop_from_pixels, CroppedArea};
pub use config::{CropConfig, CropShape};
pub use engine::{CropEngine, ViewState, WHEEL_IDLE_TIMEOUT};
pub use error::EngineError;
pub use events::{CropEvent, InputEvent};
pub use geometry::{rotate_point, rotated_bounding_box, Point, Rect, Size};
pub use restrict::restrict_position;
pub use sizing::{fit_crop_size, ImageSize};
