//! CPU raster surface.
//!
//! A fixed-size `tiny_skia::Pixmap` that always holds the full replay of a
//! drawing session after `render`. Strokes are black on a white background,
//! stroked at twice their stored brush radius with round caps and joins.

use crate::path::{stroke_path, to_skia_path};
use sc_core::model::Point;
use sc_core::normalize::GrayFrame;
use sc_core::session::DrawingSession;
use tiny_skia::{Color, FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

/// Surface background.
pub const BACKGROUND: Color = Color::WHITE;

/// Stroke ink.
pub const INK: Color = Color::BLACK;

pub struct RasterSurface {
    pixmap: Pixmap,
}

impl RasterSurface {
    /// Create a blank surface.
    pub fn new(width: u32, height: u32) -> Result<Self, String> {
        let mut pixmap = Pixmap::new(width, height)
            .ok_or_else(|| format!("cannot allocate {width}x{height} raster surface"))?;
        pixmap.fill(BACKGROUND);
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Fill the entire surface with the background.
    pub fn clear(&mut self) {
        self.pixmap.fill(BACKGROUND);
    }

    /// Replay every stroke of `session`, in order, over a cleared surface.
    pub fn render(&mut self, session: &DrawingSession) {
        self.clear();
        let paint = ink_paint();
        let mut drawn = 0usize;
        for stroke in session.strokes() {
            let Some(skia_path) = stroke_path(stroke).and_then(|p| to_skia_path(&p)) else {
                continue;
            };
            let style = Stroke {
                width: stroke.brush_radius * 2.0,
                line_cap: LineCap::Round,
                line_join: LineJoin::Round,
                ..Stroke::default()
            };
            self.pixmap
                .stroke_path(&skia_path, &paint, &style, Transform::identity(), None);
            drawn += 1;
        }
        log::debug!("rendered {drawn}/{} strokes", session.len());
    }

    /// Stamp a filled dot, used as immediate feedback when a stroke starts.
    pub fn stamp_dot(&mut self, center: Point, radius: f32) {
        let Some(circle) = PathBuilder::from_circle(center.x, center.y, radius) else {
            log::trace!("skipping degenerate dot r={radius}");
            return;
        };
        self.pixmap.fill_path(
            &circle,
            &ink_paint(),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
    }

    /// Unpremultiplied RGBA bytes, row-major.
    pub fn rgba(&self) -> Vec<u8> {
        self.pixmap
            .pixels()
            .iter()
            .flat_map(|px| {
                let c = px.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect()
    }

    /// RGB bytes, row-major, with alpha composited over the background.
    pub fn rgb(&self) -> Vec<u8> {
        self.rgba()
            .chunks_exact(4)
            .flat_map(|px| {
                let a = px[3] as u32;
                let over = |c: u8| ((c as u32 * a + 255 * (255 - a) + 127) / 255) as u8;
                [over(px[0]), over(px[1]), over(px[2])]
            })
            .collect()
    }

    /// Extract the single-channel frame the normalizer consumes.
    pub fn gray_frame(&self) -> Result<GrayFrame, String> {
        GrayFrame::from_rgba(
            self.width() as usize,
            self.height() as usize,
            &self.rgba(),
        )
    }

    /// Red channel of the pixel at `(x, y)`, if in bounds.
    pub fn intensity(&self, x: u32, y: u32) -> Option<u8> {
        self.pixmap.pixel(x, y).map(|px| px.demultiply().red())
    }

    /// True if every pixel equals the background.
    pub fn is_blank(&self) -> bool {
        let bg = BACKGROUND.premultiply().to_color_u8();
        self.pixmap.pixels().iter().all(|px| *px == bg)
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }
}

fn ink_paint() -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(INK);
    paint.anti_alias = true;
    paint
}
