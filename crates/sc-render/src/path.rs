//! Stroke → smoothed Bézier path.
//!
//! Raw pointer samples produce visibly faceted polylines. Strokes with three
//! or more points are smoothed with rolling midpoints: every interior point
//! becomes the control point of a quadratic curve that ends halfway to the
//! next point. The path finishes with a straight segment so it ends exactly
//! on the last recorded point.

use kurbo::{BezPath, PathEl};
use sc_core::model::{Point, Stroke};

/// How a stroke is drawn during replay, decided by its point count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeShape {
    /// 0–1 points. Nothing is replayed; the start dot was stamped on capture.
    Dot,
    /// Exactly two points.
    Segment,
    /// Three or more points.
    Smoothed,
}

impl StrokeShape {
    pub fn of(stroke: &Stroke) -> Self {
        match stroke.points.len() {
            0 | 1 => Self::Dot,
            2 => Self::Segment,
            _ => Self::Smoothed,
        }
    }
}

fn kp(p: Point) -> kurbo::Point {
    kurbo::Point::new(p.x as f64, p.y as f64)
}

/// Build the replay path for a stroke, or `None` if it has fewer than two points.
pub fn stroke_path(stroke: &Stroke) -> Option<BezPath> {
    let points = &stroke.points;
    let mut path = BezPath::new();

    match StrokeShape::of(stroke) {
        StrokeShape::Dot => return None,
        StrokeShape::Segment => {
            path.move_to(kp(points[0]));
            path.line_to(kp(points[1]));
        }
        StrokeShape::Smoothed => {
            path.move_to(kp(points[0]));
            for pair in points[1..].windows(2) {
                let (ctrl, next) = (pair[0], pair[1]);
                path.quad_to(kp(ctrl), kp(ctrl.midpoint(next)));
            }
            if let Some(last) = points.last() {
                path.line_to(kp(*last));
            }
        }
    }
    Some(path)
}

/// Convert a kurbo path into a tiny-skia path for rasterization.
pub(crate) fn to_skia_path(path: &BezPath) -> Option<tiny_skia::Path> {
    let mut pb = tiny_skia::PathBuilder::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(c, p) => pb.quad_to(c.x as f32, c.y as f32, p.x as f32, p.y as f32),
            PathEl::CurveTo(c1, c2, p) => pb.cubic_to(
                c1.x as f32,
                c1.y as f32,
                c2.x as f32,
                c2.y as f32,
                p.x as f32,
                p.y as f32,
            ),
            PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn stroke(points: &[(f32, f32)]) -> Stroke {
        Stroke {
            points: points.iter().map(|&p| Point::from(p)).collect(),
            brush_radius: 4.0,
        }
    }

    #[test]
    fn single_point_has_no_path() {
        assert!(stroke_path(&stroke(&[(5.0, 5.0)])).is_none());
        assert!(stroke_path(&stroke(&[])).is_none());
    }

    #[test]
    fn two_points_make_exact_segment() {
        let path = stroke_path(&stroke(&[(10.0, 10.0), (20.0, 10.0)])).unwrap();
        assert_eq!(
            path.elements(),
            &[
                PathEl::MoveTo(kurbo::Point::new(10.0, 10.0)),
                PathEl::LineTo(kurbo::Point::new(20.0, 10.0)),
            ]
        );
    }

    #[test]
    fn three_points_use_midpoint_quads() {
        let path = stroke_path(&stroke(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)])).unwrap();
        assert_eq!(
            path.elements(),
            &[
                PathEl::MoveTo(kurbo::Point::new(0.0, 0.0)),
                PathEl::QuadTo(kurbo::Point::new(10.0, 0.0), kurbo::Point::new(10.0, 5.0)),
                PathEl::LineTo(kurbo::Point::new(10.0, 10.0)),
            ]
        );
    }

    #[test]
    fn smoothed_path_ends_on_last_point() {
        let pts = [(0.0, 0.0), (10.0, 3.0), (20.0, 0.0), (30.0, 7.0), (41.0, 2.0)];
        let path = stroke_path(&stroke(&pts)).unwrap();
        let quads = path
            .elements()
            .iter()
            .filter(|el| matches!(el, PathEl::QuadTo(..)))
            .count();
        assert_eq!(quads, pts.len() - 2);
        assert_eq!(
            path.elements().last(),
            Some(&PathEl::LineTo(kurbo::Point::new(41.0, 2.0)))
        );
    }

    #[test]
    fn shape_by_point_count() {
        assert_eq!(StrokeShape::of(&stroke(&[(0.0, 0.0)])), StrokeShape::Dot);
        assert_eq!(StrokeShape::of(&stroke(&[(0.0, 0.0), (1.0, 1.0)])), StrokeShape::Segment);
        assert_eq!(
            StrokeShape::of(&stroke(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)])),
            StrokeShape::Smoothed
        );
    }

    #[test]
    fn skia_conversion_keeps_bounds() {
        let path = stroke_path(&stroke(&[(10.0, 20.0), (60.0, 80.0)])).unwrap();
        let skia = to_skia_path(&path).unwrap();
        let b = skia.bounds();
        assert_eq!((b.left(), b.top(), b.right(), b.bottom()), (10.0, 20.0, 60.0, 80.0));
    }
}
