//! Stroke smoothing and CPU rasterization for the sketchpad.

pub mod export;
pub mod path;
pub mod raster;

pub use export::{DEFAULT_JPEG_QUALITY, encode_jpeg, export_filename};
pub use path::{StrokeShape, stroke_path};
pub use raster::RasterSurface;
