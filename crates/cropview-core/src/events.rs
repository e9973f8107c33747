//! Input and output event types.
//!
//! [`InputEvent`] is the raw stream a host feeds in: pointer, touch, and
//! wheel events in container-relative screen coordinates (any consistent
//! screen space works, as long as the attached container rectangle lives
//! in the same space). [`CropEvent`] is everything the engine says back:
//! pan/zoom proposals for the controlled state, settled crop descriptors,
//! and interaction boundaries.

use serde::{Deserialize, Serialize};

use crate::area::CroppedArea;
use crate::geometry::Point;

/// A raw input event in screen coordinates.
///
/// Touch events carry every active touch point; the engine decides from
/// the count whether the gesture drags or pinches.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    MouseDown { position: Point },
    MouseMove { position: Point },
    MouseUp { position: Point },
    TouchStart { touches: Vec<Point> },
    TouchMove { touches: Vec<Point> },
    TouchEnd { touches: Vec<Point> },
    /// Wheel or trackpad scroll over the cropper. Positive `delta_y`
    /// scrolls down and zooms out.
    Wheel { position: Point, delta_y: f64 },
}

/// An output the engine hands back for the host to act on.
///
/// Proposals ([`CropChanged`](CropEvent::CropChanged),
/// [`ZoomChanged`](CropEvent::ZoomChanged)) target the controlled view
/// state: commit them and pass the committed values back in on the next
/// call. The rest are notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum CropEvent {
    /// Proposed new pan position.
    CropChanged(Point),
    /// Proposed new zoom factor.
    ZoomChanged(f64),
    /// The interaction settled; the final selection in percent and pixel
    /// terms.
    CropComplete(CroppedArea),
    /// A gesture or wheel burst began.
    InteractionStart,
    /// The matching gesture or wheel burst finished.
    InteractionEnd,
    /// The rendering collaborator reported a media load failure.
    ImageError(String),
}
