// src/grayscale.rs - Luma conversion and notan (black/white) binarization

use rayon::prelude::*;

use crate::color_space::luma;
use crate::pixel_buffer::{PixelBuffer, CHANNELS};

/// Replace RGB with rounded luma; alpha is carried over untouched
pub fn grayscale(buffer: &PixelBuffer) -> PixelBuffer {
    let mut out = buffer.pixels().to_vec();
    out.par_chunks_mut(CHANNELS).for_each(|px| {
        let value = luma(px[0], px[1], px[2]).round().min(255.0) as u8;
        px[0] = value;
        px[1] = value;
        px[2] = value;
    });
    buffer.with_same_shape(out)
}

/// Binarize a luma buffer: 255 where `luma >= threshold`, otherwise 0.
///
/// The luma is read from the red channel, so the input is expected to be the
/// output of [`grayscale`].
pub fn threshold(luma_buffer: &PixelBuffer, threshold: u8) -> PixelBuffer {
    let mut out = luma_buffer.pixels().to_vec();
    out.par_chunks_mut(CHANNELS).for_each(|px| {
        let value = if px[0] >= threshold { 255 } else { 0 };
        px[0] = value;
        px[1] = value;
        px[2] = value;
    });
    luma_buffer.with_same_shape(out)
}

/// Grayscale followed by threshold
pub fn notan(buffer: &PixelBuffer, cutoff: u8) -> PixelBuffer {
    threshold(&grayscale(buffer), cutoff)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient() -> PixelBuffer {
        PixelBuffer::from_fn(16, 16, |x, y| {
            [(x * 16) as u8, (y * 16) as u8, ((x + y) * 8) as u8, 200]
        })
        .unwrap()
    }

    #[test]
    fn grayscale_channels_are_equal_and_match_luma() {
        let src = gradient();
        let gray = grayscale(&src);
        for y in 0..16 {
            for x in 0..16 {
                let [r, g, b, a] = src.pixel(x, y);
                let [gr, gg, gb, ga] = gray.pixel(x, y);
                assert_eq!(gr, gg);
                assert_eq!(gg, gb);
                assert_eq!(ga, a);
                let expected = luma(r, g, b);
                assert!((gr as f64 - expected).abs() <= 1.0);
            }
        }
    }

    #[test]
    fn threshold_output_is_strictly_binary() {
        let gray = grayscale(&gradient());
        for t in [0u8, 1, 64, 128, 200, 255] {
            let bw = threshold(&gray, t);
            for (i, v) in bw.pixels().iter().enumerate() {
                if i % CHANNELS != 3 {
                    assert!(*v == 0 || *v == 255);
                }
            }
        }
    }

    #[test]
    fn flat_mid_gray_flips_between_128_and_129() {
        let flat = PixelBuffer::filled(100, 100, [128, 128, 128, 255]).unwrap();
        let white = notan(&flat, 128);
        assert!(white.pixels().chunks(CHANNELS).all(|px| px[..3] == [255, 255, 255]));
        let black = notan(&flat, 129);
        assert!(black.pixels().chunks(CHANNELS).all(|px| px[..3] == [0, 0, 0]));
    }

    #[test]
    fn black_white_split_survives_notan() {
        let split = PixelBuffer::from_fn(40, 20, |x, _| {
            if x < 20 { [0, 0, 0, 255] } else { [255, 255, 255, 255] }
        })
        .unwrap();
        let out = notan(&split, 128);
        assert_eq!(out, split);
    }

    #[test]
    fn input_is_left_untouched() {
        let src = gradient();
        let before = src.clone();
        let _ = notan(&src, 90);
        assert_eq!(src, before);
    }
}
