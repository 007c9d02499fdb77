//! Raster → model input tensor.
//!
//! The classifier consumes a `[1, 28, 28, 1]` tensor of light-on-dark
//! intensities in `[0, 1]`. The canvas produces dark-on-light pixels at
//! canvas resolution, so every frame goes through:
//!
//! 1. bilinear resize to 28×28
//! 2. invert and rescale `v → (255 - v) / 255`
//! 3. optional H/W transpose (orientation fix for models trained transposed)
//! 4. reshape to NHWC with batch and channel of 1

/// Model input edge length.
pub const MODEL_INPUT_SIZE: usize = 28;

/// Output tensor shape: batch, height, width, channel.
pub const TENSOR_SHAPE: [usize; 4] = [1, MODEL_INPUT_SIZE, MODEL_INPUT_SIZE, 1];

// ─── GrayFrame ───────────────────────────────────────────────────────────

/// A single-channel 8-bit frame extracted from the raster surface.
#[derive(Debug, Clone, PartialEq)]
pub struct GrayFrame {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl GrayFrame {
    /// Wrap a row-major luminance buffer.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self, String> {
        if width == 0 || height == 0 {
            return Err(format!("frame must be non-empty, got {width}x{height}"));
        }
        if data.len() != width * height {
            return Err(format!(
                "frame buffer holds {} bytes, expected {}x{} = {}",
                data.len(),
                width,
                height,
                width * height
            ));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A frame filled with a single value.
    pub fn filled(width: usize, height: usize, value: u8) -> Result<Self, String> {
        Self::new(width, height, vec![value; width * height])
    }

    /// Extract the red channel of an unpremultiplied RGBA buffer, compositing
    /// transparent pixels over white.
    pub fn from_rgba(width: usize, height: usize, rgba: &[u8]) -> Result<Self, String> {
        if rgba.len() != width * height * 4 {
            return Err(format!(
                "RGBA buffer holds {} bytes, expected {}",
                rgba.len(),
                width * height * 4
            ));
        }
        let data = rgba
            .chunks_exact(4)
            .map(|px| {
                let r = px[0] as u32;
                let a = px[3] as u32;
                ((r * a + 255 * (255 - a) + 127) / 255) as u8
            })
            .collect();
        Self::new(width, height, data)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    fn at(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.width + x] as f32
    }
}

// ─── Tensor ──────────────────────────────────────────────────────────────

/// Dense `f32` tensor in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    shape: [usize; 4],
    data: Vec<f32>,
}

impl Tensor {
    pub fn shape(&self) -> [usize; 4] {
        self.shape
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn into_data(self) -> Vec<f32> {
        self.data
    }

    /// Value at spatial position `(row, col)` of the single batch/channel.
    pub fn at(&self, row: usize, col: usize) -> f32 {
        self.data[row * self.shape[2] + col]
    }
}

/// Knobs for `normalize`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizeOptions {
    /// Swap the spatial axes after resizing.
    pub transpose: bool,
}

// ─── Pipeline ────────────────────────────────────────────────────────────

/// Convert a canvas frame into the classifier's input tensor.
///
/// Never fails: shape is always `TENSOR_SHAPE` and values are always in
/// `[0, 1]`, including for a blank frame.
pub fn normalize(frame: &GrayFrame, opts: NormalizeOptions) -> Tensor {
    let size = MODEL_INPUT_SIZE;
    let resized = resize_bilinear(frame, size, size);

    let mut data: Vec<f32> = resized
        .iter()
        .map(|v| ((255.0 - v) / 255.0).clamp(0.0, 1.0))
        .collect();

    if opts.transpose {
        data = transpose_square(&data, size);
    }

    log::trace!(
        "normalized {}x{} frame (transpose={})",
        frame.width,
        frame.height,
        opts.transpose
    );

    Tensor {
        shape: TENSOR_SHAPE,
        data,
    }
}

/// Bilinear resize using corner-aligned-off, no half-pixel-offset sampling:
/// output pixel `d` samples source coordinate `d * in / out`.
fn resize_bilinear(frame: &GrayFrame, out_w: usize, out_h: usize) -> Vec<f32> {
    let scale_x = frame.width as f32 / out_w as f32;
    let scale_y = frame.height as f32 / out_h as f32;
    let max_x = frame.width - 1;
    let max_y = frame.height - 1;

    let mut out = Vec::with_capacity(out_w * out_h);
    for dy in 0..out_h {
        let sy = dy as f32 * scale_y;
        let y0 = (sy.floor() as usize).min(max_y);
        let y1 = (sy.ceil() as usize).min(max_y);
        let fy = sy - y0 as f32;

        for dx in 0..out_w {
            let sx = dx as f32 * scale_x;
            let x0 = (sx.floor() as usize).min(max_x);
            let x1 = (sx.ceil() as usize).min(max_x);
            let fx = sx - x0 as f32;

            let top = frame.at(x0, y0) + (frame.at(x1, y0) - frame.at(x0, y0)) * fx;
            let bottom = frame.at(x0, y1) + (frame.at(x1, y1) - frame.at(x0, y1)) * fx;
            out.push(top + (bottom - top) * fy);
        }
    }
    out
}

fn transpose_square(data: &[f32], size: usize) -> Vec<f32> {
    let mut out = vec![0.0; data.len()];
    for row in 0..size {
        for col in 0..size {
            out[col * size + row] = data[row * size + col];
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn blank_frame_is_all_zero() {
        let frame = GrayFrame::filled(185, 185, 255).unwrap();
        let tensor = normalize(&frame, NormalizeOptions::default());
        assert_eq!(tensor.shape(), [1, 28, 28, 1]);
        assert_eq!(tensor.data().len(), 28 * 28);
        assert!(tensor.data().iter().all(|v| *v == 0.0));
    }

    #[test]
    fn black_frame_is_all_one() {
        let frame = GrayFrame::filled(185, 185, 0).unwrap();
        let tensor = normalize(&frame, NormalizeOptions::default());
        assert!(tensor.data().iter().all(|v| *v == 1.0));
    }

    #[test]
    fn identity_size_only_inverts() {
        let data: Vec<u8> = (0..28 * 28).map(|i| (i % 256) as u8).collect();
        let frame = GrayFrame::new(28, 28, data.clone()).unwrap();
        let tensor = normalize(&frame, NormalizeOptions::default());
        for (v, src) in tensor.data().iter().zip(data) {
            assert!((v - (255.0 - src as f32) / 255.0).abs() < 1e-6);
        }
    }

    #[test]
    fn upscale_interpolates_between_samples() {
        // 2x1 frame: black | white. Output column 14 samples x = 1.0 exactly,
        // column 7 samples x = 0.5.
        let frame = GrayFrame::new(2, 1, vec![0, 255]).unwrap();
        let tensor = normalize(&frame, NormalizeOptions::default());
        assert_eq!(tensor.at(0, 0), 1.0);
        assert!((tensor.at(0, 7) - 0.5).abs() < 1e-6);
        assert_eq!(tensor.at(0, 14), 0.0);
        assert_eq!(tensor.at(27, 27), 0.0);
    }

    #[test]
    fn transpose_swaps_axes() {
        // Dark top row only.
        let mut data = vec![255u8; 28 * 28];
        for px in data.iter_mut().take(28) {
            *px = 0;
        }
        let frame = GrayFrame::new(28, 28, data).unwrap();

        let plain = normalize(&frame, NormalizeOptions { transpose: false });
        let flipped = normalize(&frame, NormalizeOptions { transpose: true });

        assert_eq!(plain.at(0, 27), 1.0);
        assert_eq!(plain.at(27, 0), 0.0);
        assert_eq!(flipped.at(27, 0), 1.0);
        assert_eq!(flipped.at(0, 27), 0.0);
        assert_eq!(flipped.shape(), TENSOR_SHAPE);
    }

    #[test]
    fn values_stay_in_unit_range() {
        let data: Vec<u8> = (0..185 * 185).map(|i| ((i * 37) % 256) as u8).collect();
        let frame = GrayFrame::new(185, 185, data).unwrap();
        let tensor = normalize(&frame, NormalizeOptions { transpose: true });
        assert!(tensor.data().iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn frame_rejects_bad_sizes() {
        assert!(GrayFrame::new(0, 10, vec![]).is_err());
        assert!(GrayFrame::new(2, 2, vec![0; 3]).is_err());
        assert!(GrayFrame::from_rgba(2, 2, &[0; 15]).is_err());
    }

    #[test]
    fn from_rgba_reads_red_over_white() {
        let rgba = [
            0, 0, 0, 255, // opaque black
            200, 10, 10, 255, // opaque red-ish
            0, 0, 0, 0, // transparent
        ];
        let frame = GrayFrame::from_rgba(3, 1, &rgba).unwrap();
        assert_eq!(frame.data(), &[0, 200, 255]);
    }
}
