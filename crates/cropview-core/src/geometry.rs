//! Point and box geometry for the crop viewport.
//!
//! This module provides the primitive types shared by every other module
//! (points, sizes, rectangles) plus the rotation math used to size the
//! viewport: rotating a point about an arbitrary center and computing the
//! axis-aligned bounding box of a rotated rectangle.
//!
//! # Rotation
//!
//! Rotation is clockwise, in degrees. For a point (x, y) rotated about
//! (cx, cy) by angle a:
//!
//! ```text
//! xr = (x - cx) * cos(a) - (y - cy) * sin(a) + cx
//! yr = (x - cx) * sin(a) + (y - cy) * cos(a) + cy
//! ```
//!
//! The bounding box of a rotated rectangle is obtained by rotating its four
//! corners about its own center and taking the min/max of the rotated
//! coordinates.

use serde::{Deserialize, Serialize};

/// A 2D point in pixel coordinates.
///
/// Depending on context the coordinates are in screen space (input events),
/// container space, or image-content space; the functions that convert
/// between the spaces live in the engine.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A 2D extent in pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle.
///
/// Used for the measured container rectangle (screen space), pixel crop
/// rectangles (natural-image space), and percentage crop rectangles.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Rotate a point about a center, clockwise, by an angle in degrees.
///
/// # Arguments
///
/// * `point` - The point to rotate
/// * `center` - The center of rotation
/// * `angle_degrees` - Rotation angle in degrees
///
/// # Example
///
/// ```
/// use cropview_core::geometry::{rotate_point, Point};
///
/// let rotated = rotate_point(Point::new(1.0, 0.0), Point::new(0.0, 0.0), 90.0);
/// assert!((rotated.x - 0.0).abs() < 1e-9);
/// assert!((rotated.y - 1.0).abs() < 1e-9);
/// ```
pub fn rotate_point(point: Point, center: Point, angle_degrees: f64) -> Point {
    let angle = angle_degrees.to_radians();
    let (sin, cos) = angle.sin_cos();
    let dx = point.x - center.x;
    let dy = point.y - center.y;

    Point {
        x: dx * cos - dy * sin + center.x,
        y: dx * sin + dy * cos + center.y,
    }
}

/// Compute the axis-aligned bounding box of a rectangle rotated about its
/// own center.
///
/// At 0 and 180 degrees the original size is returned; at 90 and 270 the
/// dimensions are swapped. These cases take an exact fast path so repeated
/// recomputation at the common angles does not accumulate floating error.
///
/// # Arguments
///
/// * `size` - The unrotated rectangle dimensions
/// * `angle_degrees` - Rotation angle in degrees (any sign or magnitude)
///
/// # Returns
///
/// The width and height of the smallest axis-aligned box containing the
/// rotated rectangle.
///
/// # Example
///
/// ```
/// use cropview_core::geometry::{rotated_bounding_box, Size};
///
/// let bounds = rotated_bounding_box(Size::new(100.0, 50.0), 90.0);
/// assert_eq!(bounds, Size::new(50.0, 100.0));
/// ```
pub fn rotated_bounding_box(size: Size, angle_degrees: f64) -> Size {
    // Normalize to handle 360, 720, negative angles, etc.
    let abs_angle = (angle_degrees % 360.0).abs();

    // Fast path: no effective rotation
    if abs_angle < 0.001 || (abs_angle - 360.0).abs() < 0.001 || (abs_angle - 180.0).abs() < 0.001 {
        return size;
    }

    // Fast path: quarter turns swap dimensions
    if (abs_angle - 90.0).abs() < 0.001 || (abs_angle - 270.0).abs() < 0.001 {
        return Size::new(size.height, size.width);
    }

    let center = Point::new(size.width / 2.0, size.height / 2.0);
    let corners = [
        rotate_point(Point::new(0.0, 0.0), center, angle_degrees),
        rotate_point(Point::new(size.width, 0.0), center, angle_degrees),
        rotate_point(Point::new(size.width, size.height), center, angle_degrees),
        rotate_point(Point::new(0.0, size.height), center, angle_degrees),
    ];

    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for corner in corners {
        min_x = min_x.min(corner.x);
        max_x = max_x.max(corner.x);
        min_y = min_y.min(corner.y);
        max_y = max_y.max(corner.y);
    }

    Size::new(max_x - min_x, max_y - min_y)
}

/// Euclidean distance between two points.
pub fn distance_between(a: Point, b: Point) -> f64 {
    ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt()
}

/// Midpoint of the segment between two points.
///
/// Used as the tracked pointer for two-finger gestures.
pub fn midpoint(a: Point, b: Point) -> Point {
    Point {
        x: (b.x + a.x) / 2.0,
        y: (b.y + a.y) / 2.0,
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
