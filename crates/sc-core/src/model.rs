//! Core drawing data model.
//!
//! A drawing is an ordered list of strokes. Each stroke is an ordered list of
//! canvas-local points plus the brush radius that was active when the stroke
//! started. Strokes are never reordered; replaying them in order reproduces
//! the raster exactly.

use serde::{Deserialize, Serialize};

// ─── Point ───────────────────────────────────────────────────────────────

/// A point in canvas-local coordinates (origin at the top-left of the surface).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

// ─── Stroke ──────────────────────────────────────────────────────────────

/// One continuous pointer-down → pointer-up path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub points: Vec<Point>,
    /// Brush radius in logical units. The rendered line width is twice this.
    pub brush_radius: f32,
}

impl Stroke {
    /// Start a stroke at `origin`.
    pub fn new(origin: Point, brush_radius: f32) -> Self {
        Self {
            points: vec![origin],
            brush_radius,
        }
    }

    pub fn last_point(&self) -> Option<Point> {
        self.points.last().copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
