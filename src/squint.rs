// src/squint.rs - Blurred "squint" view for judging broad value and color masses

use image::imageops;

use crate::errors::{ChromaLensError, Result};
use crate::pixel_buffer::PixelBuffer;

pub const DEFAULT_BLUR_SIGMA: f32 = 5.0;
pub const MIN_BLUR_SIGMA: f32 = 1.0;
pub const MAX_BLUR_SIGMA: f32 = 20.0;

/// Gaussian blur with standard deviation `sigma` in pixels; flat areas keep
/// their exact color and alpha
pub fn squint(buffer: &PixelBuffer, sigma: f32) -> Result<PixelBuffer> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(ChromaLensError::InvalidParameter(format!(
            "blur sigma must be positive, got {}",
            sigma
        )));
    }

    let blurred = imageops::blur(&buffer.to_rgba_image(), sigma);
    PixelBuffer::from_rgba_image(blurred)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edges::edge_map;

    #[test]
    fn blur_keeps_dimensions_and_flat_areas() {
        let flat = PixelBuffer::filled(30, 20, [120, 60, 30, 255]).unwrap();
        let out = squint(&flat, DEFAULT_BLUR_SIGMA).unwrap();
        assert_eq!(out.dimensions(), (30, 20));
        for sigma in [MIN_BLUR_SIGMA, 2.0, DEFAULT_BLUR_SIGMA, 10.0, MAX_BLUR_SIGMA] {
            let out = squint(&flat, sigma).unwrap();
            let [r, g, b, a] = out.pixel(15, 10);
            assert!((r as i16 - 120).abs() <= 1, "sigma {}: r = {}", sigma, r);
            assert!((g as i16 - 60).abs() <= 1, "sigma {}: g = {}", sigma, g);
            assert!((b as i16 - 30).abs() <= 1, "sigma {}: b = {}", sigma, b);
            assert_eq!(a, 255, "sigma {}", sigma);
        }
    }

    #[test]
    fn blur_softens_hard_edges() {
        let step = PixelBuffer::from_fn(40, 10, |x, _| {
            if x < 20 { [0, 0, 0, 255] } else { [255, 255, 255, 255] }
        })
        .unwrap();
        let sharp: u32 = edge_map(&step).pixels().iter().step_by(4).map(|&v| v as u32).max().unwrap_or(0);
        let soft: u32 = edge_map(&squint(&step, 4.0).unwrap())
            .pixels()
            .iter()
            .step_by(4)
            .map(|&v| v as u32)
            .max()
            .unwrap_or(0);
        assert!(soft < sharp);
    }

    #[test]
    fn non_positive_sigma_is_rejected() {
        let flat = PixelBuffer::filled(4, 4, [0, 0, 0, 255]).unwrap();
        assert!(squint(&flat, 0.0).is_err());
        assert!(squint(&flat, -1.0).is_err());
    }
}
