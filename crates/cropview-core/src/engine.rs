//! Interactive crop engine.
//!
//! Consumes raw pointer, touch, and wheel events and turns them into
//! pan/zoom proposals and settled crop descriptors. The engine owns only
//! gesture-session state; pan and zoom are controlled values owned by the
//! caller, passed in through [`ViewState`] on every call and proposed back
//! through [`CropEvent`]s. The caller commits the proposals (or not) and
//! the engine re-reads the committed values on the next call, so there is
//! no second copy of the view state to drift out of sync.
//!
//! # Gesture state machine
//!
//! ```text
//! Idle -> Dragging          mouse down, or touch start with one finger
//! Idle -> Pinching          touch start with two fingers
//! Dragging|Pinching -> Idle pointer up / touch end (settle + notify)
//! ```
//!
//! Wheel zooming is orthogonal: it never changes the drag state and is
//! bracketed by start/end notifications derived from an idle deadline
//! ([`WHEEL_IDLE_TIMEOUT`]) that every wheel event re-arms.
//!
//! # Frame coalescing
//!
//! Move events do not produce proposals directly; they fill a single-slot
//! mailbox per update channel (position, zoom) where a newer event
//! replaces an unapplied older one. The host calls
//! [`CropEngine::on_frame`] once per rendering frame to drain the slots,
//! so at most one update per channel applies per frame and the last event
//! wins. Ending a gesture discards any unapplied slot content.
//!
//! # Time
//!
//! The engine never reads a clock; operations that depend on time take an
//! `Instant` supplied by the caller, which keeps wheel-boundary behavior
//! deterministic under test.

use serde::{Deserialize, Serialize};
use web_time::{Duration, Instant};

use crate::area::{compute_cropped_area, initial_crop_from_pixels};
use crate::config::CropConfig;
use crate::error::EngineError;
use crate::events::{CropEvent, InputEvent};
use crate::geometry::{distance_between, midpoint, Point, Rect, Size};
use crate::restrict::restrict_position;
use crate::sizing::{fit_crop_size, ImageSize};

/// Idle time after the last wheel event before the wheel gesture ends.
pub const WHEEL_IDLE_TIMEOUT: Duration = Duration::from_millis(250);

/// The externally owned pan/zoom values, read on entry to every call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    /// Offset of the image center relative to the crop-window center.
    pub pan: Point,
    /// Zoom factor relative to the aspect-fit display size.
    pub zoom: f64,
}

impl ViewState {
    pub fn new(pan: Point, zoom: f64) -> Self {
        Self { pan, zoom }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            pan: Point::default(),
            zoom: 1.0,
        }
    }
}

/// Transient per-gesture data, created at gesture start and destroyed at
/// gesture end.
#[derive(Debug, Clone, Copy, PartialEq)]
struct GestureSession {
    /// Tracked pointer at gesture start (midpoint for pinches).
    start_pointer: Point,
    /// Committed pan position at gesture start.
    start_pan: Point,
    /// Distance between the two fingers at the last applied pinch update.
    /// 0 means no usable distance yet (fingers coincided).
    last_pinch_distance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Idle,
    Dragging(GestureSession),
    Pinching(GestureSession),
}

impl Gesture {
    fn is_active(&self) -> bool {
        !matches!(self, Gesture::Idle)
    }

    fn session(&self) -> Option<&GestureSession> {
        match self {
            Gesture::Idle => None,
            Gesture::Dragging(session) | Gesture::Pinching(session) => Some(session),
        }
    }

    fn session_mut(&mut self) -> Option<&mut GestureSession> {
        match self {
            Gesture::Idle => None,
            Gesture::Dragging(session) | Gesture::Pinching(session) => Some(session),
        }
    }
}

/// Raw media dimensions as last reported by the rendering collaborator.
#[derive(Debug, Clone, Copy)]
struct MediaSize {
    display: Size,
    natural: Size,
}

/// The crop engine.
///
/// Construct with a [`CropConfig`], attach the measured container
/// rectangle, report the media dimensions once the image loads, then feed
/// input events plus the committed [`ViewState`]. Every operation returns
/// the proposals and notifications it produced, in order.
#[derive(Debug)]
pub struct CropEngine {
    config: CropConfig,
    container: Option<Rect>,
    media: Option<MediaSize>,
    image_size: Option<ImageSize>,
    crop_size: Option<Size>,
    gesture: Gesture,
    /// Position-channel mailbox: latest unapplied pointer (or pinch midpoint).
    pending_drag: Option<Point>,
    /// Zoom-channel mailbox: latest unapplied touch pair.
    pending_pinch: Option<(Point, Point)>,
    /// Wheel burst deadline; `Some` while a wheel gesture is active.
    wheel_deadline: Option<Instant>,
    /// One-shot seed, consumed on the first successful media report.
    pending_seed: Option<Rect>,
}

impl CropEngine {
    pub fn new(config: CropConfig) -> Self {
        let pending_seed = config.initial_crop_pixels;
        Self {
            config,
            container: None,
            media: None,
            image_size: None,
            crop_size: None,
            gesture: Gesture::Idle,
            pending_drag: None,
            pending_pinch: None,
            wheel_deadline: None,
            pending_seed,
        }
    }

    pub fn config(&self) -> &CropConfig {
        &self.config
    }

    /// The current crop window, once media has been reported.
    pub fn crop_size(&self) -> Option<Size> {
        self.crop_size
    }

    /// The rotation-adjusted image dimensions, once media has been reported.
    pub fn image_size(&self) -> Option<ImageSize> {
        self.image_size
    }

    /// Whether a drag or pinch session is currently active.
    pub fn is_gesturing(&self) -> bool {
        self.gesture.is_active()
    }

    /// True when a coalesced update is waiting for the next frame.
    pub fn has_pending_updates(&self) -> bool {
        self.pending_drag.is_some() || self.pending_pinch.is_some()
    }

    /// Record the measured container rectangle. Re-call on container
    /// resize; screen-space zoom anchoring fails without it.
    pub fn attach(&mut self, container: Rect) {
        log::debug!(
            "attached to container {:.0}x{:.0}",
            container.width,
            container.height
        );
        self.container = Some(container);
    }

    /// Release the container and every per-session resource: the gesture,
    /// unapplied mailbox content, and the wheel deadline.
    pub fn detach(&mut self) {
        log::debug!("detached");
        self.container = None;
        self.gesture = Gesture::Idle;
        self.pending_drag = None;
        self.pending_pinch = None;
        self.wheel_deadline = None;
    }

    /// Report the media dimensions, at load time and on every re-measure
    /// (container resize changes the displayed size).
    ///
    /// Rebuilds the rotation-adjusted sizes and the crop window, then
    /// re-restricts the current pan and settles. On the first report, a
    /// configured initial pixel crop is consumed and the seeded pan/zoom
    /// proposals are appended; the caller commits them like any other
    /// proposal.
    pub fn set_media_size(&mut self, view: ViewState, display: Size, natural: Size) -> Vec<CropEvent> {
        self.media = Some(MediaSize { display, natural });
        self.rebuild_sizes();

        let mut out = self.recompute(view);
        if let (Some(desired), Some(image)) = (self.pending_seed, self.image_size) {
            self.pending_seed = None;
            let (pan, zoom) = initial_crop_from_pixels(desired, image);
            log::debug!("seeded initial crop: pan ({:.1}, {:.1}), zoom {:.3}", pan.x, pan.y, zoom);
            out.push(CropEvent::CropChanged(pan));
            out.push(CropEvent::ZoomChanged(zoom));
        }
        out
    }

    /// Surface a media load failure. Geometry state is left unchanged.
    pub fn media_error(&self, message: impl Into<String>) -> Vec<CropEvent> {
        let message = message.into();
        log::warn!("image failed to load: {}", message);
        vec![CropEvent::ImageError(message)]
    }

    /// Change the rotation (degrees, normalized into [0, 360)) and emit the
    /// resulting re-restricted position and settled crop.
    pub fn set_rotation(&mut self, view: ViewState, degrees: f64) -> Vec<CropEvent> {
        self.config.rotation = degrees.rem_euclid(360.0);
        self.rebuild_sizes();
        self.recompute(view)
    }

    /// Change the target aspect ratio and emit the resulting re-restricted
    /// position and settled crop.
    pub fn set_aspect(&mut self, view: ViewState, aspect: f64) -> Vec<CropEvent> {
        self.config.aspect = aspect;
        self.rebuild_sizes();
        self.recompute(view)
    }

    /// Re-restrict the committed pan and settle, without changing any
    /// engine state. Call after committing an externally decided zoom or
    /// pan change so the proposal and the settled descriptor stay
    /// consistent with it. No-op until media has been reported.
    pub fn recompute(&self, view: ViewState) -> Vec<CropEvent> {
        if self.image_size.is_none() || self.crop_size.is_none() {
            return Vec::new();
        }
        let mut out = vec![CropEvent::CropChanged(self.restricted_or(view.pan, view.zoom))];
        if let Some(event) = self.settle(view) {
            out.push(event);
        }
        out
    }

    /// Feed one raw input event.
    ///
    /// Move events only fill the frame mailboxes; the proposals they cause
    /// are returned by the next [`CropEngine::on_frame`]. Wheel events
    /// require an attached container.
    pub fn handle_event(
        &mut self,
        view: ViewState,
        event: InputEvent,
        now: Instant,
    ) -> Result<Vec<CropEvent>, EngineError> {
        match event {
            InputEvent::MouseDown { position } => {
                let mut out = self.end_gesture_if_active(view);
                out.extend(self.start_drag(view, position));
                Ok(out)
            }
            InputEvent::MouseMove { position } => {
                if matches!(self.gesture, Gesture::Dragging(_)) && self.crop_size.is_some() {
                    self.pending_drag = Some(position);
                }
                Ok(Vec::new())
            }
            InputEvent::MouseUp { .. } => Ok(self.end_gesture_if_active(view)),
            InputEvent::TouchStart { touches } => {
                let mut out = self.end_gesture_if_active(view);
                out.extend(self.start_session_for(view, &touches));
                Ok(out)
            }
            InputEvent::TouchMove { touches } => Ok(self.route_touch_move(view, &touches)),
            InputEvent::TouchEnd { touches } => {
                if !self.gesture.is_active() {
                    return Ok(Vec::new());
                }
                let mut out = self.end_gesture(view);
                out.extend(self.start_session_for(view, &touches));
                Ok(out)
            }
            InputEvent::Wheel { position, delta_y } => self.wheel_zoom(view, position, delta_y, now),
        }
    }

    /// Drain the frame mailboxes: the position slot first, then the zoom
    /// slot, matching the order the channels were scheduled in.
    ///
    /// Call once per rendering frame while updates are pending.
    pub fn on_frame(&mut self, view: ViewState) -> Result<Vec<CropEvent>, EngineError> {
        let mut out = Vec::new();
        if let Some(pointer) = self.pending_drag.take() {
            out.extend(self.apply_drag(view, pointer));
        }
        if let Some((a, b)) = self.pending_pinch.take() {
            out.extend(self.apply_pinch_zoom(view, a, b)?);
        }
        Ok(out)
    }

    /// Fire the wheel idle edge: once the deadline armed by the last wheel
    /// event passes, the burst settles and interaction-end is emitted.
    ///
    /// Call from a periodic timer (or the frame loop) while a wheel burst
    /// is active.
    pub fn poll(&mut self, view: ViewState, now: Instant) -> Vec<CropEvent> {
        match self.wheel_deadline {
            Some(deadline) if now >= deadline => {
                log::debug!("wheel burst settled");
                self.wheel_deadline = None;
                let mut out = Vec::new();
                if let Some(event) = self.settle(view) {
                    out.push(event);
                }
                out.push(CropEvent::InteractionEnd);
                out
            }
            _ => Vec::new(),
        }
    }

    fn start_session_for(&mut self, view: ViewState, touches: &[Point]) -> Vec<CropEvent> {
        match touches.len() {
            0 => Vec::new(),
            1 => self.start_drag(view, touches[0]),
            _ => self.start_pinch(view, touches[0], touches[1]),
        }
    }

    fn start_drag(&mut self, view: ViewState, pointer: Point) -> Vec<CropEvent> {
        log::debug!("drag started at ({:.1}, {:.1})", pointer.x, pointer.y);
        self.gesture = Gesture::Dragging(GestureSession {
            start_pointer: pointer,
            start_pan: view.pan,
            last_pinch_distance: 0.0,
        });
        vec![CropEvent::InteractionStart]
    }

    fn start_pinch(&mut self, view: ViewState, a: Point, b: Point) -> Vec<CropEvent> {
        let distance = distance_between(a, b);
        log::debug!("pinch started, finger distance {:.1}", distance);
        self.gesture = Gesture::Pinching(GestureSession {
            start_pointer: midpoint(a, b),
            start_pan: view.pan,
            last_pinch_distance: distance,
        });
        vec![CropEvent::InteractionStart]
    }

    fn end_gesture_if_active(&mut self, view: ViewState) -> Vec<CropEvent> {
        if self.gesture.is_active() {
            self.end_gesture(view)
        } else {
            Vec::new()
        }
    }

    /// Tear down the active session: discard unapplied mailbox content,
    /// settle the crop from the committed view, notify interaction-end.
    fn end_gesture(&mut self, view: ViewState) -> Vec<CropEvent> {
        log::debug!("gesture ended");
        self.gesture = Gesture::Idle;
        self.pending_drag = None;
        self.pending_pinch = None;

        let mut out = Vec::new();
        if let Some(event) = self.settle(view) {
            out.push(event);
        }
        out.push(CropEvent::InteractionEnd);
        out
    }

    /// Touch moves are routed by the active session shape. A touch count
    /// that no longer matches it means a finger went down or up without a
    /// start/end reaching us; the session is conservatively restarted from
    /// the touches at hand.
    fn route_touch_move(&mut self, view: ViewState, touches: &[Point]) -> Vec<CropEvent> {
        match (self.gesture, touches.len()) {
            (Gesture::Idle, _) | (_, 0) => Vec::new(),
            (Gesture::Dragging(_), 1) => {
                if self.crop_size.is_some() {
                    self.pending_drag = Some(touches[0]);
                }
                Vec::new()
            }
            (Gesture::Pinching(_), n) if n >= 2 => {
                if self.crop_size.is_some() {
                    self.pending_drag = Some(midpoint(touches[0], touches[1]));
                }
                self.pending_pinch = Some((touches[0], touches[1]));
                Vec::new()
            }
            (Gesture::Dragging(_), _) => {
                let mut out = self.end_gesture(view);
                out.extend(self.start_pinch(view, touches[0], touches[1]));
                out
            }
            (Gesture::Pinching(_), _) => {
                let mut out = self.end_gesture(view);
                out.extend(self.start_drag(view, touches[0]));
                out
            }
        }
    }

    /// Apply the position channel: offset the pan recorded at gesture
    /// start by the pointer movement, restrict, and propose.
    fn apply_drag(&self, view: ViewState, pointer: Point) -> Vec<CropEvent> {
        let Some(session) = self.gesture.session() else {
            return Vec::new();
        };
        if self.crop_size.is_none() {
            return Vec::new();
        }

        let requested = Point::new(
            session.start_pan.x + (pointer.x - session.start_pointer.x),
            session.start_pan.y + (pointer.y - session.start_pointer.y),
        );
        vec![CropEvent::CropChanged(self.restricted_or(requested, view.zoom))]
    }

    /// Apply the zoom channel: derive the new zoom from the finger
    /// distance ratio and anchor it at the midpoint.
    ///
    /// A recorded distance of 0 (fingers coincided) skips the ratio for
    /// this frame instead of dividing by zero; the new distance is still
    /// recorded so the session recovers on the next move.
    fn apply_pinch_zoom(
        &mut self,
        view: ViewState,
        a: Point,
        b: Point,
    ) -> Result<Vec<CropEvent>, EngineError> {
        let Gesture::Pinching(session) = self.gesture else {
            return Ok(Vec::new());
        };

        let distance = distance_between(a, b);
        let mut out = Vec::new();
        if session.last_pinch_distance > 0.0 {
            let target = view.zoom * (distance / session.last_pinch_distance);
            out.extend(self.zoom_to(view, target, midpoint(a, b))?);
        }
        if let Some(session) = self.gesture.session_mut() {
            session.last_pinch_distance = distance;
        }
        Ok(out)
    }

    fn wheel_zoom(
        &mut self,
        view: ViewState,
        anchor: Point,
        delta_y: f64,
        now: Instant,
    ) -> Result<Vec<CropEvent>, EngineError> {
        let mut out = Vec::new();
        if self.wheel_deadline.is_none() {
            log::debug!("wheel burst started");
            out.push(CropEvent::InteractionStart);
        }

        let target = view.zoom - (delta_y * self.config.zoom_speed) / 200.0;
        out.extend(self.zoom_to(view, target, anchor)?);
        self.wheel_deadline = Some(now + WHEEL_IDLE_TIMEOUT);
        Ok(out)
    }

    /// Zoom toward `target_zoom` keeping the image content under `anchor`
    /// visually fixed: the anchor is mapped to image-content coordinates at
    /// the current zoom, and the proposed pan maps that same coordinate
    /// back to the anchor at the new zoom.
    fn zoom_to(
        &self,
        view: ViewState,
        target_zoom: f64,
        anchor: Point,
    ) -> Result<Vec<CropEvent>, EngineError> {
        if self.crop_size.is_none() {
            return Ok(Vec::new());
        }
        let container = self.container.ok_or(EngineError::NotAttached)?;

        let container_point = Point::new(
            container.width / 2.0 - (anchor.x - container.x),
            container.height / 2.0 - (anchor.y - container.y),
        );
        let image_point = Point::new(
            (container_point.x + view.pan.x) / view.zoom,
            (container_point.y + view.pan.y) / view.zoom,
        );

        let new_zoom = self.config.clamp_zoom(target_zoom);
        let requested = Point::new(
            image_point.x * new_zoom - container_point.x,
            image_point.y * new_zoom - container_point.y,
        );

        Ok(vec![
            CropEvent::CropChanged(self.restricted_or(requested, new_zoom)),
            CropEvent::ZoomChanged(new_zoom),
        ])
    }

    /// The settled crop for the committed view, re-restricted first so a
    /// zoom-out committed since the last proposal cannot leave the
    /// reported area hanging past the image edge.
    fn settle(&self, view: ViewState) -> Option<CropEvent> {
        let image = self.image_size?;
        let crop = self.crop_size?;

        let position = self.restricted_or(view.pan, view.zoom);
        let area = compute_cropped_area(
            position,
            image,
            crop,
            self.config.effective_aspect(),
            view.zoom,
            self.config.restrict_position,
        );
        Some(CropEvent::CropComplete(area))
    }

    /// Rebuild the rotation-adjusted image size and the crop window from
    /// the last reported media dimensions.
    fn rebuild_sizes(&mut self) {
        let Some(media) = self.media else {
            self.image_size = None;
            self.crop_size = None;
            return;
        };

        let image = ImageSize::from_media(media.display, media.natural, self.config.rotation);
        let crop = self
            .config
            .crop_size
            .unwrap_or_else(|| fit_crop_size(image.display(), self.config.aspect));
        log::debug!(
            "sizes rebuilt: display {:.0}x{:.0}, window {:.0}x{:.0}",
            image.width,
            image.height,
            crop.width,
            crop.height
        );
        self.image_size = Some(image);
        self.crop_size = Some(crop);
    }

    fn restricted_or(&self, requested: Point, zoom: f64) -> Point {
        match (self.config.restrict_position, self.image_size, self.crop_size) {
            (true, Some(image), Some(crop)) => {
                restrict_position(requested, image.display(), crop, zoom)
            }
            _ => requested,
        }
    }
}

impl Default for CropEngine {
    fn default() -> Self {
        Self::new(CropConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CropShape;

    const MS_100: Duration = Duration::from_millis(100);
    const MS_200: Duration = Duration::from_millis(200);
    const MS_360: Duration = Duration::from_millis(360);

    fn view() -> ViewState {
        ViewState::default()
    }

    fn mouse_down(x: f64, y: f64) -> InputEvent {
        InputEvent::MouseDown {
            position: Point::new(x, y),
        }
    }

    fn mouse_move(x: f64, y: f64) -> InputEvent {
        InputEvent::MouseMove {
            position: Point::new(x, y),
        }
    }

    fn mouse_up(x: f64, y: f64) -> InputEvent {
        InputEvent::MouseUp {
            position: Point::new(x, y),
        }
    }

    fn touches(points: &[(f64, f64)]) -> Vec<Point> {
        points.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    fn wheel(x: f64, y: f64, delta_y: f64) -> InputEvent {
        InputEvent::Wheel {
            position: Point::new(x, y),
            delta_y,
        }
    }

    /// Engine attached to an 800x600 container showing a wide 1600x600
    /// image, so the fitted 4:3 window (800x600) leaves horizontal pan
    /// room at zoom 1.
    fn wide_engine() -> CropEngine {
        let mut engine = CropEngine::new(CropConfig::default());
        engine.attach(Rect::new(0.0, 0.0, 800.0, 600.0));
        engine.set_media_size(view(), Size::new(1600.0, 600.0), Size::new(1600.0, 600.0));
        engine
    }

    /// Engine whose fitted window exactly covers the displayed image.
    fn snug_engine() -> CropEngine {
        let mut engine = CropEngine::new(CropConfig::default());
        engine.attach(Rect::new(0.0, 0.0, 800.0, 600.0));
        engine.set_media_size(view(), Size::new(800.0, 600.0), Size::new(800.0, 600.0));
        engine
    }

    fn last_position(events: &[CropEvent]) -> Option<Point> {
        events.iter().rev().find_map(|event| match event {
            CropEvent::CropChanged(position) => Some(*position),
            _ => None,
        })
    }

    fn last_zoom(events: &[CropEvent]) -> Option<f64> {
        events.iter().rev().find_map(|event| match event {
            CropEvent::ZoomChanged(zoom) => Some(*zoom),
            _ => None,
        })
    }

    fn count_starts(events: &[CropEvent]) -> usize {
        events
            .iter()
            .filter(|event| matches!(event, CropEvent::InteractionStart))
            .count()
    }

    fn count_ends(events: &[CropEvent]) -> usize {
        events
            .iter()
            .filter(|event| matches!(event, CropEvent::InteractionEnd))
            .count()
    }

    #[test]
    fn test_media_report_emits_position_and_settled_area() {
        let mut engine = CropEngine::new(CropConfig::default());
        engine.attach(Rect::new(0.0, 0.0, 800.0, 600.0));
        let events = engine.set_media_size(view(), Size::new(800.0, 600.0), Size::new(800.0, 600.0));

        assert_eq!(last_position(&events), Some(Point::new(0.0, 0.0)));
        let area = events.iter().find_map(|event| match event {
            CropEvent::CropComplete(area) => Some(*area),
            _ => None,
        });
        let area = area.expect("media report should settle");
        assert_eq!(area.pixels, Rect::new(0.0, 0.0, 800.0, 600.0));
    }

    #[test]
    fn test_media_report_consumes_seed_once() {
        let mut config = CropConfig::default();
        config.initial_crop_pixels = Some(Rect::new(200.0, 150.0, 400.0, 300.0));
        let mut engine = CropEngine::new(config);
        engine.attach(Rect::new(0.0, 0.0, 800.0, 600.0));

        let first = engine.set_media_size(view(), Size::new(800.0, 600.0), Size::new(800.0, 600.0));
        assert_eq!(last_zoom(&first), Some(2.0));
        assert_eq!(last_position(&first), Some(Point::new(0.0, 0.0)));

        let second = engine.set_media_size(view(), Size::new(800.0, 600.0), Size::new(800.0, 600.0));
        assert_eq!(last_zoom(&second), None);
    }

    #[test]
    fn test_drag_session_flow() {
        let mut engine = wide_engine();
        let now = Instant::now();

        let started = engine.handle_event(view(), mouse_down(100.0, 100.0), now).unwrap();
        assert_eq!(count_starts(&started), 1);
        assert!(engine.is_gesturing());

        // Moves only fill the mailbox
        let moved = engine.handle_event(view(), mouse_move(110.0, 105.0), now).unwrap();
        assert!(moved.is_empty());
        assert!(engine.has_pending_updates());

        let frame = engine.on_frame(view()).unwrap();
        assert_eq!(last_position(&frame), Some(Point::new(10.0, 0.0)));
        assert!(!engine.has_pending_updates());
    }

    #[test]
    fn test_drag_updates_coalesce_to_last() {
        let mut engine = wide_engine();
        let now = Instant::now();

        engine.handle_event(view(), mouse_down(0.0, 0.0), now).unwrap();
        engine.handle_event(view(), mouse_move(10.0, 0.0), now).unwrap();
        engine.handle_event(view(), mouse_move(25.0, 0.0), now).unwrap();

        let frame = engine.on_frame(view()).unwrap();
        let proposals: Vec<_> = frame
            .iter()
            .filter(|event| matches!(event, CropEvent::CropChanged(_)))
            .collect();
        assert_eq!(proposals.len(), 1);
        assert_eq!(last_position(&frame), Some(Point::new(25.0, 0.0)));

        // The slot was drained; an empty frame follows
        assert!(engine.on_frame(view()).unwrap().is_empty());
    }

    #[test]
    fn test_drag_respects_pan_budget() {
        let mut engine = wide_engine();
        let now = Instant::now();

        engine.handle_event(view(), mouse_down(0.0, 0.0), now).unwrap();
        engine.handle_event(view(), mouse_move(1000.0, 500.0), now).unwrap();

        // Horizontal budget is (1600 - 800) / 2 = 400; vertical budget is 0
        let frame = engine.on_frame(view()).unwrap();
        assert_eq!(last_position(&frame), Some(Point::new(400.0, 0.0)));
    }

    #[test]
    fn test_mouse_up_settles_and_ends() {
        let mut engine = wide_engine();
        let now = Instant::now();

        engine.handle_event(view(), mouse_down(0.0, 0.0), now).unwrap();
        let ended = engine.handle_event(view(), mouse_up(5.0, 5.0), now).unwrap();

        assert!(matches!(ended[0], CropEvent::CropComplete(_)));
        assert_eq!(count_ends(&ended), 1);
        assert!(!engine.is_gesturing());

        // Idle moves no longer fill the mailbox
        engine.handle_event(view(), mouse_move(50.0, 50.0), now).unwrap();
        assert!(!engine.has_pending_updates());
    }

    #[test]
    fn test_gesture_end_discards_pending_updates() {
        let mut engine = wide_engine();
        let now = Instant::now();

        engine.handle_event(view(), mouse_down(0.0, 0.0), now).unwrap();
        engine.handle_event(view(), mouse_move(30.0, 0.0), now).unwrap();
        assert!(engine.has_pending_updates());

        engine.handle_event(view(), mouse_up(30.0, 0.0), now).unwrap();
        assert!(!engine.has_pending_updates());
        assert!(engine.on_frame(view()).unwrap().is_empty());
    }

    #[test]
    fn test_moves_before_media_are_ignored() {
        let mut engine = CropEngine::new(CropConfig::default());
        engine.attach(Rect::new(0.0, 0.0, 800.0, 600.0));
        let now = Instant::now();

        engine.handle_event(view(), mouse_down(0.0, 0.0), now).unwrap();
        engine.handle_event(view(), mouse_move(40.0, 0.0), now).unwrap();

        assert!(!engine.has_pending_updates());
        assert!(engine.on_frame(view()).unwrap().is_empty());
    }

    #[test]
    fn test_pinch_zoom_from_distance_ratio() {
        let mut engine = wide_engine();
        let now = Instant::now();

        let started = engine
            .handle_event(
                view(),
                InputEvent::TouchStart {
                    touches: touches(&[(100.0, 300.0), (300.0, 300.0)]),
                },
                now,
            )
            .unwrap();
        assert_eq!(count_starts(&started), 1);

        // Fingers spread from 200 to 300 apart: zoom 1 * 300/200 = 1.5
        engine
            .handle_event(
                view(),
                InputEvent::TouchMove {
                    touches: touches(&[(50.0, 300.0), (350.0, 300.0)]),
                },
                now,
            )
            .unwrap();
        let frame = engine.on_frame(view()).unwrap();
        assert_eq!(last_zoom(&frame), Some(1.5));
    }

    #[test]
    fn test_pinch_degenerate_distance_skips_zoom() {
        let mut engine = wide_engine();
        let now = Instant::now();

        // Both fingers on the same spot: recorded distance is 0
        engine
            .handle_event(
                view(),
                InputEvent::TouchStart {
                    touches: touches(&[(100.0, 100.0), (100.0, 100.0)]),
                },
                now,
            )
            .unwrap();

        engine
            .handle_event(
                view(),
                InputEvent::TouchMove {
                    touches: touches(&[(100.0, 100.0), (150.0, 100.0)]),
                },
                now,
            )
            .unwrap();
        let first_frame = engine.on_frame(view()).unwrap();
        assert_eq!(last_zoom(&first_frame), None, "zoom must stay unchanged");

        // The 50px distance was recorded, so the next move zooms normally
        engine
            .handle_event(
                view(),
                InputEvent::TouchMove {
                    touches: touches(&[(100.0, 100.0), (200.0, 100.0)]),
                },
                now,
            )
            .unwrap();
        let second_frame = engine.on_frame(view()).unwrap();
        assert_eq!(last_zoom(&second_frame), Some(2.0));
    }

    #[test]
    fn test_touch_end_with_remaining_finger_restarts() {
        let mut engine = wide_engine();
        let now = Instant::now();

        engine
            .handle_event(
                view(),
                InputEvent::TouchStart {
                    touches: touches(&[(100.0, 300.0), (300.0, 300.0)]),
                },
                now,
            )
            .unwrap();

        let events = engine
            .handle_event(
                view(),
                InputEvent::TouchEnd {
                    touches: touches(&[(100.0, 300.0)]),
                },
                now,
            )
            .unwrap();

        // Old session settles and ends, a drag session starts immediately
        assert_eq!(count_ends(&events), 1);
        assert_eq!(count_starts(&events), 1);
        assert!(engine.is_gesturing());
    }

    #[test]
    fn test_touch_move_with_changed_finger_count_restarts() {
        let mut engine = wide_engine();
        let now = Instant::now();

        engine
            .handle_event(
                view(),
                InputEvent::TouchStart {
                    touches: touches(&[(100.0, 100.0)]),
                },
                now,
            )
            .unwrap();

        // A second finger appears without a touch-start reaching us
        let events = engine
            .handle_event(
                view(),
                InputEvent::TouchMove {
                    touches: touches(&[(100.0, 100.0), (300.0, 100.0)]),
                },
                now,
            )
            .unwrap();

        assert_eq!(count_ends(&events), 1);
        assert_eq!(count_starts(&events), 1);
    }

    #[test]
    fn test_stray_release_events_are_ignored() {
        let mut engine = wide_engine();
        let now = Instant::now();

        assert!(engine.handle_event(view(), mouse_up(0.0, 0.0), now).unwrap().is_empty());
        assert!(engine
            .handle_event(view(), InputEvent::TouchEnd { touches: vec![] }, now)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_wheel_zoom_in_proposes_clamped_zoom() {
        let mut engine = snug_engine();
        let now = Instant::now();

        // Anchored at the container center: delta -200 targets zoom 2.0
        let events = engine.handle_event(view(), wheel(400.0, 300.0, -200.0), now).unwrap();
        assert_eq!(count_starts(&events), 1);
        assert_eq!(last_zoom(&events), Some(2.0));
        assert_eq!(last_position(&events), Some(Point::new(0.0, 0.0)));

        // Zooming out below the minimum clamps to it
        let events = engine.handle_event(view(), wheel(400.0, 300.0, 500.0), now).unwrap();
        assert_eq!(last_zoom(&events), Some(1.0));
    }

    #[test]
    fn test_wheel_burst_boundaries() {
        let mut engine = snug_engine();
        let t0 = Instant::now();

        // Wheel events at t=0 and t=100, then silence
        let first = engine.handle_event(view(), wheel(400.0, 300.0, -40.0), t0).unwrap();
        let second = engine
            .handle_event(view(), wheel(400.0, 300.0, -40.0), t0 + MS_100)
            .unwrap();
        assert_eq!(count_starts(&first), 1);
        assert_eq!(count_starts(&second), 0);

        // The deadline armed at t=100 runs to t=350
        assert!(engine.poll(view(), t0 + MS_200).is_empty());
        let ended = engine.poll(view(), t0 + MS_360);
        assert!(matches!(ended[0], CropEvent::CropComplete(_)));
        assert_eq!(count_ends(&ended), 1);

        // The edge fires exactly once
        assert!(engine.poll(view(), t0 + MS_360 + MS_100).is_empty());
    }

    #[test]
    fn test_wheel_requires_attached_container() {
        let mut engine = CropEngine::new(CropConfig::default());
        engine.set_media_size(view(), Size::new(800.0, 600.0), Size::new(800.0, 600.0));
        let now = Instant::now();

        let result = engine.handle_event(view(), wheel(400.0, 300.0, -40.0), now);
        assert_eq!(result.unwrap_err(), EngineError::NotAttached);
    }

    #[test]
    fn test_wheel_before_media_is_silent() {
        let mut engine = CropEngine::new(CropConfig::default());
        engine.attach(Rect::new(0.0, 0.0, 800.0, 600.0));
        let now = Instant::now();

        // No crop window yet: the zoom is skipped but the burst still opens
        let events = engine.handle_event(view(), wheel(400.0, 300.0, -40.0), now).unwrap();
        assert_eq!(count_starts(&events), 1);
        assert_eq!(last_zoom(&events), None);
    }

    #[test]
    fn test_zoom_keeps_anchor_stationary() {
        let mut config = CropConfig::default();
        config.restrict_position = false;
        let mut engine = CropEngine::new(config);
        let container = Rect::new(0.0, 0.0, 800.0, 600.0);
        engine.attach(container);
        engine.set_media_size(
            ViewState::new(Point::new(40.0, -20.0), 1.3),
            Size::new(800.0, 600.0),
            Size::new(800.0, 600.0),
        );

        let current = ViewState::new(Point::new(40.0, -20.0), 1.3);
        let anchor = Point::new(600.0, 150.0);
        let now = Instant::now();

        let events = engine.handle_event(current, wheel(anchor.x, anchor.y, -80.0), now).unwrap();
        let new_pan = last_position(&events).unwrap();
        let new_zoom = last_zoom(&events).unwrap();

        let container_point = Point::new(
            container.width / 2.0 - anchor.x,
            container.height / 2.0 - anchor.y,
        );
        let before = Point::new(
            (container_point.x + current.pan.x) / current.zoom,
            (container_point.y + current.pan.y) / current.zoom,
        );
        let after = Point::new(
            (container_point.x + new_pan.x) / new_zoom,
            (container_point.y + new_pan.y) / new_zoom,
        );

        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);
    }

    #[test]
    fn test_set_rotation_rebuilds_window() {
        let mut engine = CropEngine::new(CropConfig::default());
        engine.attach(Rect::new(0.0, 0.0, 800.0, 600.0));
        engine.set_media_size(view(), Size::new(800.0, 600.0), Size::new(800.0, 600.0));

        let events = engine.set_rotation(view(), 90.0);
        assert!(!events.is_empty());

        // The display bounds become 600x800; a 4:3 window fits 600x450
        assert_eq!(engine.image_size().unwrap().display(), Size::new(600.0, 800.0));
        assert_eq!(engine.crop_size(), Some(Size::new(600.0, 450.0)));
    }

    #[test]
    fn test_rotation_normalized_into_turn() {
        let mut engine = snug_engine();
        engine.set_rotation(view(), -90.0);
        assert_eq!(engine.config().rotation, 270.0);
        engine.set_rotation(view(), 450.0);
        assert_eq!(engine.config().rotation, 90.0);
    }

    #[test]
    fn test_set_aspect_refits_window() {
        let mut engine = snug_engine();
        let events = engine.set_aspect(view(), 1.0);

        assert_eq!(engine.crop_size(), Some(Size::new(600.0, 600.0)));
        assert!(events
            .iter()
            .any(|event| matches!(event, CropEvent::CropComplete(_))));
    }

    #[test]
    fn test_external_crop_size_overrides_fit() {
        let mut config = CropConfig::default();
        config.crop_size = Some(Size::new(400.0, 300.0));
        config.aspect = 16.0 / 9.0; // ignored while the override is present
        let mut engine = CropEngine::new(config);
        engine.attach(Rect::new(0.0, 0.0, 800.0, 600.0));
        let events = engine.set_media_size(view(), Size::new(800.0, 600.0), Size::new(800.0, 600.0));

        assert_eq!(engine.crop_size(), Some(Size::new(400.0, 300.0)));

        // The settled area uses the override's 4:3 ratio, per the window
        let area = events
            .iter()
            .find_map(|event| match event {
                CropEvent::CropComplete(area) => Some(*area),
                _ => None,
            })
            .unwrap();
        assert_eq!(area.pixels, Rect::new(200.0, 150.0, 400.0, 300.0));
    }

    #[test]
    fn test_recompute_reclamps_after_zoom_out() {
        let engine = wide_engine();

        // A pan committed at zoom 2 is out of budget after zooming back to 1
        let events = engine.recompute(ViewState::new(Point::new(700.0, 0.0), 1.0));
        assert_eq!(last_position(&events), Some(Point::new(400.0, 0.0)));
        assert!(events
            .iter()
            .any(|event| matches!(event, CropEvent::CropComplete(_))));
    }

    #[test]
    fn test_recompute_before_media_is_noop() {
        let engine = CropEngine::new(CropConfig::default());
        assert!(engine.recompute(view()).is_empty());
    }

    #[test]
    fn test_media_error_passes_message_through() {
        let engine = snug_engine();
        let events = engine.media_error("fetch failed: 404");
        assert_eq!(
            events,
            vec![CropEvent::ImageError("fetch failed: 404".to_string())]
        );
        // Geometry is untouched
        assert!(engine.crop_size().is_some());
    }

    #[test]
    fn test_detach_releases_session_state() {
        let mut engine = wide_engine();
        let now = Instant::now();

        engine.handle_event(view(), mouse_down(0.0, 0.0), now).unwrap();
        engine.handle_event(view(), mouse_move(30.0, 0.0), now).unwrap();
        engine.handle_event(view(), wheel(400.0, 300.0, -40.0), now).unwrap();

        engine.detach();
        assert!(!engine.is_gesturing());
        assert!(!engine.has_pending_updates());
        assert!(engine.on_frame(view()).unwrap().is_empty());
        assert!(engine.poll(view(), now + MS_360).is_empty());
    }

    #[test]
    fn test_config_accessors() {
        let engine = CropEngine::new(CropConfig {
            crop_shape: CropShape::Round,
            ..CropConfig::default()
        });
        assert_eq!(engine.config().crop_shape, CropShape::Round);
        assert!(engine.crop_size().is_none());
        assert!(!engine.is_gesturing());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
