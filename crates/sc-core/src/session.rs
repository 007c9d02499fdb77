//! Stroke capture session.
//!
//! `DrawingSession` owns every stroke drawn on one canvas since its last
//! reset. Pointer handlers feed it `begin` / `extend` / `end`; the renderer
//! replays `strokes()` in order.
//!
//! Points are decimated on capture: a move is recorded only when it lands at
//! least `min_spacing` away from the previous recorded point. This bounds the
//! point count per stroke independent of the input event rate.

use crate::model::{Point, Stroke};
use serde::{Deserialize, Serialize};

/// Default minimum distance between consecutive recorded points.
pub const MIN_POINT_SPACING: f32 = 5.0;

/// The ordered strokes of a single canvas plus the in-progress flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingSession {
    strokes: Vec<Stroke>,
    #[serde(skip)]
    drawing: bool,
    #[serde(skip, default = "default_spacing")]
    min_spacing: f32,
}

fn default_spacing() -> f32 {
    MIN_POINT_SPACING
}

impl Default for DrawingSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawingSession {
    pub fn new() -> Self {
        Self::with_spacing(MIN_POINT_SPACING)
    }

    /// Create a session with a custom decimation threshold.
    pub fn with_spacing(min_spacing: f32) -> Self {
        Self {
            strokes: Vec::new(),
            drawing: false,
            min_spacing,
        }
    }

    /// Parse a recorded session (`{"strokes": [...]}`).
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("invalid session JSON: {e}"))
    }

    /// Serialize the strokes for recording.
    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string(self).map_err(|e| format!("cannot serialize session: {e}"))
    }

    pub fn set_min_spacing(&mut self, min_spacing: f32) {
        self.min_spacing = min_spacing;
    }

    pub fn min_spacing(&self) -> f32 {
        self.min_spacing
    }

    // ─── Capture ─────────────────────────────────────────────────────────

    /// Start a new stroke at `point`. Any stroke already in progress is left
    /// in the session as-is.
    pub fn begin(&mut self, point: Point, brush_radius: f32) {
        self.strokes.push(Stroke::new(point, brush_radius));
        self.drawing = true;
        log::trace!(
            "stroke #{} begin at ({}, {}) r={brush_radius}",
            self.strokes.len(),
            point.x,
            point.y
        );
    }

    /// Append `point` to the current stroke if it is far enough from the last
    /// recorded point. Returns `true` if the point was kept.
    pub fn extend(&mut self, point: Point) -> bool {
        if !self.drawing {
            return false;
        }
        let min_spacing = self.min_spacing;
        let Some(stroke) = self.strokes.last_mut() else {
            return false;
        };
        let Some(last) = stroke.last_point() else {
            stroke.points.push(point);
            return true;
        };
        if last.distance(point) >= min_spacing {
            stroke.points.push(point);
            true
        } else {
            false
        }
    }

    /// Finish the current stroke. The stroke stays in the session.
    pub fn end(&mut self) {
        self.drawing = false;
    }

    /// Discard every stroke.
    pub fn reset(&mut self) {
        self.strokes.clear();
        self.drawing = false;
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    /// The stroke being drawn, if the pointer is down.
    pub fn current_stroke(&self) -> Option<&Stroke> {
        if self.drawing {
            self.strokes.last()
        } else {
            None
        }
    }

    /// Number of strokes.
    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Total recorded points across all strokes.
    pub fn point_count(&self) -> usize {
        self.strokes.iter().map(Stroke::len).sum()
    }
}
