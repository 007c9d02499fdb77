//! Raster surface → downloadable JPEG.

use crate::raster::RasterSurface;
use image::ExtendedColorType;
use image::codecs::jpeg::JpegEncoder;

/// Encoder quality used when the caller has no preference.
pub const DEFAULT_JPEG_QUALITY: u8 = 92;

/// Encode the surface as a baseline JPEG.
pub fn encode_jpeg(surface: &RasterSurface, quality: u8) -> Result<Vec<u8>, String> {
    let mut out = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100));
    encoder
        .encode(
            &surface.rgb(),
            surface.width(),
            surface.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| format!("JPEG encode failed: {e}"))?;
    log::debug!(
        "encoded {}x{} surface to {} JPEG bytes",
        surface.width(),
        surface.height(),
        out.len()
    );
    Ok(out)
}

/// Download name for an export. The user-supplied name is used as-is.
pub fn export_filename(name: &str) -> String {
    format!("{name}.jpg")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sc_core::model::Point;

    #[test]
    fn jpeg_has_soi_and_eoi_markers() {
        let mut surface = RasterSurface::new(185, 185).unwrap();
        surface.stamp_dot(Point::new(92.0, 92.0), 20.0);
        let bytes = encode_jpeg(&surface, DEFAULT_JPEG_QUALITY).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        assert_eq!(&bytes[bytes.len() - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn filename_is_opaque() {
        assert_eq!(export_filename("filename"), "filename.jpg");
        assert_eq!(export_filename("../a b"), "../a b.jpg");
        assert_eq!(export_filename(""), ".jpg");
    }
}
