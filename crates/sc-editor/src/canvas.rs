//! Per-canvas controller.
//!
//! `DrawingCanvas` ties one drawing session to one raster surface. Pointer
//! events mutate the session synchronously and ask for a redraw; the host
//! runs `on_frame` from its display-refresh callback, where the coalesced
//! redraw replays the session. Canvases share nothing with each other.

use crate::classify::{
    ClassifyError, ClassifyQueue, Classifier, Prediction, Ticket, classify_frame,
};
use crate::frame::FrameScheduler;
use crate::input::{InputEvent, SurfaceOffset};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use sc_core::config::CanvasConfig;
use sc_core::labels::LabelSet;
use sc_core::normalize::{GrayFrame, Tensor, normalize};
use sc_core::session::DrawingSession;
use sc_render::raster::RasterSurface;

/// What the host has to do after an input event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CanvasResponse {
    /// Schedule one display-frame callback that calls `on_frame`.
    pub schedule_frame: bool,
    /// The surface changed outside a frame callback (dot stamp or clear)
    /// and should be presented.
    pub surface_changed: bool,
}

pub struct DrawingCanvas {
    config: CanvasConfig,
    session: DrawingSession,
    surface: RasterSurface,
    frames: FrameScheduler,
    classify: ClassifyQueue,
    offset: SurfaceOffset,
    brush_radius: f32,
}

impl DrawingCanvas {
    pub fn new(config: CanvasConfig) -> Result<Self, String> {
        config.validate()?;
        let surface = RasterSurface::new(config.width, config.height)?;
        Ok(Self {
            session: DrawingSession::with_spacing(config.min_point_spacing),
            surface,
            frames: FrameScheduler::new(),
            classify: ClassifyQueue::new(config.classify_delay_ms),
            offset: SurfaceOffset::default(),
            brush_radius: config.clamp_brush(config.brush_radius),
            config,
        })
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Handle one input event.
    pub fn handle(&mut self, event: &InputEvent) -> CanvasResponse {
        match event {
            InputEvent::PointerDown { x, y } => {
                let p = self.offset.to_local(*x, *y);
                self.session.begin(p, self.brush_radius);
                self.surface.stamp_dot(p, self.brush_radius);
                CanvasResponse {
                    schedule_frame: false,
                    surface_changed: true,
                }
            }
            InputEvent::PointerMove { x, y } => {
                let p = self.offset.to_local(*x, *y);
                let schedule_frame = self.session.extend(p) && self.frames.request();
                CanvasResponse {
                    schedule_frame,
                    surface_changed: false,
                }
            }
            InputEvent::PointerUp | InputEvent::PointerLeave => {
                self.session.end();
                CanvasResponse::default()
            }
            InputEvent::Key { key, modifiers } => {
                match ShortcutMap::resolve(
                    key,
                    modifiers.ctrl,
                    modifiers.shift,
                    modifiers.alt,
                    modifiers.meta,
                ) {
                    Some(ShortcutAction::Reset) => {
                        self.reset();
                        CanvasResponse {
                            schedule_frame: false,
                            surface_changed: true,
                        }
                    }
                    None => CanvasResponse::default(),
                }
            }
        }
    }

    /// Display-frame callback. Replays the session if a redraw is pending
    /// and returns whether the surface was redrawn.
    pub fn on_frame(&mut self) -> bool {
        if !self.frames.take() {
            return false;
        }
        self.surface.render(&self.session);
        true
    }

    /// Clear every stroke and the surface, dropping any pending redraw.
    pub fn reset(&mut self) {
        self.session.reset();
        self.frames.cancel();
        self.surface.clear();
        log::debug!("canvas reset");
    }

    /// Replace the session with a recorded one and redraw immediately.
    pub fn load_session(&mut self, mut session: DrawingSession) {
        session.end();
        session.set_min_spacing(self.config.min_point_spacing);
        self.session = session;
        self.frames.cancel();
        self.surface.render(&self.session);
    }

    // ─── Settings ────────────────────────────────────────────────────────

    /// Set the brush radius for strokes started from now on. Returns the
    /// clamped value. Non-finite radii are ignored and the current radius is
    /// kept.
    pub fn set_brush_radius(&mut self, radius: f32) -> f32 {
        if !radius.is_finite() {
            log::warn!("ignoring brush radius {radius}");
            return self.brush_radius;
        }
        self.brush_radius = self.config.clamp_brush(radius);
        self.brush_radius
    }

    pub fn brush_radius(&self) -> f32 {
        self.brush_radius
    }

    pub fn set_offset(&mut self, offset: SurfaceOffset) {
        self.offset = offset;
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn session(&self) -> &DrawingSession {
        &self.session
    }

    pub fn surface(&self) -> &RasterSurface {
        &self.surface
    }

    pub fn redraw_pending(&self) -> bool {
        self.frames.is_pending()
    }

    // ─── Extraction ──────────────────────────────────────────────────────

    /// Read the current surface as a single-channel frame.
    pub fn extract_frame(&self) -> Result<GrayFrame, String> {
        self.surface.gray_frame()
    }

    /// The model input tensor for the current surface.
    pub fn normalized(&self) -> Result<Tensor, String> {
        let frame = self.extract_frame()?;
        Ok(normalize(&frame, self.config.normalize_options()))
    }

    // ─── Classify ────────────────────────────────────────────────────────

    /// Queue a classify request at `now_ms`.
    pub fn request_classify(&mut self, now_ms: f64) -> Ticket {
        self.classify.request(now_ms)
    }

    /// Run the pending classify request if it is due. Returns the outcome
    /// when a request ran.
    pub fn poll_classify<C: Classifier + ?Sized>(
        &mut self,
        now_ms: f64,
        classifier: Result<&mut C, ClassifyError>,
        labels: LabelSet,
    ) -> Option<Result<Prediction, ClassifyError>> {
        let ticket = self.classify.poll(now_ms)?;
        let outcome = self.classify_now(classifier, labels);
        self.classify.finish(ticket, outcome.clone());
        Some(outcome)
    }

    /// Classify the current surface immediately, bypassing the queue.
    pub fn classify_now<C: Classifier + ?Sized>(
        &self,
        classifier: Result<&mut C, ClassifyError>,
        labels: LabelSet,
    ) -> Result<Prediction, ClassifyError> {
        let classifier = classifier?;
        let frame = self.extract_frame().map_err(ClassifyError::Frame)?;
        classify_frame(classifier, &frame, self.config.normalize_options(), labels)
    }

    pub fn classify_queue(&self) -> &ClassifyQueue {
        &self.classify
    }

    pub fn classify_queue_mut(&mut self) -> &mut ClassifyQueue {
        &mut self.classify
    }

    pub fn is_loading(&self) -> bool {
        self.classify.is_loading()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;
    use pretty_assertions::assert_eq;
    use sc_core::model::Point;

    fn canvas() -> DrawingCanvas {
        DrawingCanvas::new(CanvasConfig::default()).unwrap()
    }

    #[test]
    fn pointer_down_stamps_dot_without_frame() {
        let mut c = canvas();
        let r = c.handle(&InputEvent::from_pointer_down(50.0, 50.0));
        assert_eq!(
            r,
            CanvasResponse {
                schedule_frame: false,
                surface_changed: true
            }
        );
        assert_eq!(c.surface().intensity(50, 50), Some(0));
        assert!(c.session().is_drawing());
    }

    #[test]
    fn moves_coalesce_into_one_frame() {
        let mut c = canvas();
        c.handle(&InputEvent::from_pointer_down(10.0, 10.0));
        let scheduled: Vec<bool> = [20.0, 30.0, 40.0]
            .iter()
            .map(|x| c.handle(&InputEvent::from_pointer_move(*x, 10.0)).schedule_frame)
            .collect();
        assert_eq!(scheduled, vec![true, false, false]);
        assert!(c.on_frame());
        assert!(!c.on_frame());
        assert_eq!(c.session().point_count(), 4);
    }

    #[test]
    fn dropped_move_does_not_schedule() {
        let mut c = canvas();
        c.handle(&InputEvent::from_pointer_down(10.0, 10.0));
        let r = c.handle(&InputEvent::from_pointer_move(11.0, 10.0));
        assert!(!r.schedule_frame);
        assert!(!c.redraw_pending());
    }

    #[test]
    fn offset_translates_client_coordinates() {
        let mut c = canvas();
        c.set_offset(SurfaceOffset::new(100.0, 200.0));
        c.handle(&InputEvent::from_pointer_down(110.0, 210.0));
        assert_eq!(c.session().strokes()[0].points, vec![Point::new(10.0, 10.0)]);
    }

    #[test]
    fn r_key_resets_and_cancels_redraw() {
        let mut c = canvas();
        c.handle(&InputEvent::from_pointer_down(10.0, 10.0));
        c.handle(&InputEvent::from_pointer_move(60.0, 60.0));
        assert!(c.redraw_pending());

        let r = c.handle(&InputEvent::from_key("R", Modifiers::NONE));
        assert!(r.surface_changed);
        assert!(c.session().is_empty());
        assert!(!c.redraw_pending());
        assert!(!c.on_frame());
        assert!(c.surface().is_blank());
    }

    #[test]
    fn brush_change_applies_to_new_strokes_only() {
        let mut c = canvas();
        c.handle(&InputEvent::from_pointer_down(10.0, 10.0));
        c.handle(&InputEvent::PointerUp);
        assert_eq!(c.set_brush_radius(3.0), 3.0);
        c.handle(&InputEvent::from_pointer_down(40.0, 40.0));
        c.handle(&InputEvent::PointerLeave);

        let radii: Vec<f32> = c.session().strokes().iter().map(|s| s.brush_radius).collect();
        assert_eq!(radii, vec![8.0, 3.0]);
        assert_eq!(c.set_brush_radius(100.0), 20.0);
    }

    #[test]
    fn non_finite_brush_radius_keeps_previous() {
        let mut c = canvas();
        assert_eq!(c.set_brush_radius(5.0), 5.0);
        assert_eq!(c.set_brush_radius(f32::NAN), 5.0);
        assert_eq!(c.set_brush_radius(f32::INFINITY), 5.0);
        assert_eq!(c.brush_radius(), 5.0);

        c.handle(&InputEvent::from_pointer_down(20.0, 20.0));
        c.handle(&InputEvent::from_pointer_move(40.0, 20.0));
        c.handle(&InputEvent::from_pointer_move(60.0, 20.0));
        assert!(c.on_frame());
        assert_eq!(c.session().strokes()[0].brush_radius, 5.0);
        assert_eq!(c.surface().intensity(50, 20), Some(0));
    }

    #[test]
    fn blank_canvas_normalizes_to_zero() {
        let c = canvas();
        let tensor = c.normalized().unwrap();
        assert_eq!(tensor.shape(), [1, 28, 28, 1]);
        assert!(tensor.data().iter().all(|v| *v == 0.0));
    }

    #[test]
    fn poll_classify_runs_once_when_due() {
        let mut c = canvas();
        let mut calls = 0;
        let mut model = |_: &Tensor| -> Result<Vec<f32>, String> {
            calls += 1;
            Ok(vec![0.0, 0.0, 1.0])
        };

        c.request_classify(0.0);
        assert!(c.is_loading());
        assert!(c.poll_classify(100.0, Ok(&mut model), LabelSet::Digit).is_none());
        let outcome = c.poll_classify(500.0, Ok(&mut model), LabelSet::Digit).unwrap();
        assert_eq!(outcome.unwrap().label, "2");
        assert!(c.poll_classify(900.0, Ok(&mut model), LabelSet::Digit).is_none());
        assert!(!c.is_loading());
        assert_eq!(calls, 1);
    }
}
