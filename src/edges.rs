// src/edges.rs - Sobel gradient magnitude and edge-presence binarization

use rayon::prelude::*;

use crate::grayscale::grayscale;
use crate::pixel_buffer::{PixelBuffer, CHANNELS};

/// Magnitude above which a pixel counts as an edge
pub const EDGE_PRESENCE_CUTOFF: u8 = 30;

type Kernel3 = [[i32; 3]; 3];

const SOBEL_KERNEL_X: Kernel3 = [[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]];
const SOBEL_KERNEL_Y: Kernel3 = [[-1, -2, -1], [0, 0, 0], [1, 2, 1]];

/// Sobel magnitude map of a grayscale buffer.
///
/// Interior pixels get `min(255, sqrt(gx^2 + gy^2))` written to R, G and B.
/// The outermost ring stays at zero. Alpha is 255 everywhere.
pub fn sobel(luma_buffer: &PixelBuffer) -> PixelBuffer {
    let (w, h) = luma_buffer.dimensions();
    let row_bytes = w as usize * CHANNELS;

    let mut out = vec![0u8; luma_buffer.pixels().len()];
    out.par_chunks_mut(row_bytes).enumerate().for_each(|(y, row)| {
        for px in row.chunks_mut(CHANNELS) {
            px[3] = 255;
        }
        let y = y as u32;
        if y == 0 || y + 1 >= h {
            return;
        }

        for x in 1..w.saturating_sub(1) {
            let mut gx = 0i32;
            let mut gy = 0i32;
            for (ky, yy) in (y - 1..=y + 1).enumerate() {
                for (kx, xx) in (x - 1..=x + 1).enumerate() {
                    let sample = luma_buffer.luma_at(xx, yy) as i32;
                    gx += sample * SOBEL_KERNEL_X[ky][kx];
                    gy += sample * SOBEL_KERNEL_Y[ky][kx];
                }
            }

            let magnitude = ((gx * gx + gy * gy) as f64).sqrt().min(255.0).round() as u8;
            let i = x as usize * CHANNELS;
            row[i] = magnitude;
            row[i + 1] = magnitude;
            row[i + 2] = magnitude;
        }
    });

    luma_buffer.with_same_shape(out)
}

/// Grayscale then Sobel, for callers holding a color buffer
pub fn edge_map(buffer: &PixelBuffer) -> PixelBuffer {
    sobel(&grayscale(buffer))
}

/// One `{0, 1}` flag per pixel: magnitude strictly above `cutoff`
pub fn binarize_edges(edge_map: &PixelBuffer, cutoff: u8) -> Vec<u8> {
    edge_map
        .pixels()
        .par_chunks(CHANNELS)
        .map(|px| u8::from(px[0] > cutoff))
        .collect()
}
