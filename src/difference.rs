// src/difference.rs - Pixel-wise luma comparison of a co-registered reference/artwork pair

use rayon::prelude::*;
use serde::Serialize;

use crate::errors::Result;
use crate::grayscale::grayscale;
use crate::pixel_buffer::{co_register, ensure_same_dimensions, PixelBuffer, CHANNELS, PAIR_MAX_DIMENSIONS};

/// Default classification cutoff
pub const DEFAULT_SENSITIVITY: u32 = 30;

/// Rendered color of a mismatching pixel is `(intensity, 0, 0, MISMATCH_ALPHA)`
pub const MISMATCH_ALPHA: u8 = 180;
/// Rendered color of a matching pixel
pub const MATCH_RGBA: [u8; 4] = [0, 180, 0, 60];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DifferenceCell {
    pub mismatch: bool,
    /// Visual weight `min(255, diff / 255 * 512)`; zero for matches
    pub intensity: u8,
}

/// Per-pixel match/mismatch classification of two luma buffers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DifferenceMap {
    pub width: u32,
    pub height: u32,
    pub sensitivity: u32,
    pub cells: Vec<DifferenceCell>,
}

impl DifferenceMap {
    pub fn cell(&self, x: u32, y: u32) -> DifferenceCell {
        self.cells[y as usize * self.width as usize + x as usize]
    }

    pub fn mismatch_count(&self) -> usize {
        self.cells.iter().filter(|c| c.mismatch).count()
    }

    /// Share of mismatching pixels in `[0, 1]`
    pub fn mismatch_ratio(&self) -> f64 {
        if self.cells.is_empty() {
            return 0.0;
        }
        self.mismatch_count() as f64 / self.cells.len() as f64
    }

    /// Paint with the default red/green palette
    pub fn render(&self) -> Result<PixelBuffer> {
        self.render_with(|cell| {
            if cell.mismatch {
                [cell.intensity, 0, 0, MISMATCH_ALPHA]
            } else {
                MATCH_RGBA
            }
        })
    }

    /// Paint with a caller-supplied palette
    pub fn render_with<F>(&self, paint: F) -> Result<PixelBuffer>
    where
        F: Fn(DifferenceCell) -> [u8; 4] + Sync,
    {
        let mut pixels = vec![0u8; self.cells.len() * CHANNELS];
        pixels
            .par_chunks_mut(CHANNELS)
            .zip(self.cells.par_iter())
            .for_each(|(px, cell)| px.copy_from_slice(&paint(*cell)));
        PixelBuffer::new(self.width, self.height, pixels)
    }
}

#[inline]
fn classify(diff: u32, sensitivity: u32) -> DifferenceCell {
    if diff > sensitivity {
        let intensity = (diff as f64 / 255.0 * 512.0).min(255.0).round() as u8;
        DifferenceCell { mismatch: true, intensity }
    } else {
        DifferenceCell { mismatch: false, intensity: 0 }
    }
}

/// Compare two grayscale buffers of identical shape.
///
/// `sensitivity` is the largest luma difference still counted as a match.
pub fn difference_map(
    reference_luma: &PixelBuffer,
    artwork_luma: &PixelBuffer,
    sensitivity: u32,
) -> Result<DifferenceMap> {
    ensure_same_dimensions(reference_luma, artwork_luma)?;

    let cells = reference_luma
        .pixels()
        .par_chunks(CHANNELS)
        .zip(artwork_luma.pixels().par_chunks(CHANNELS))
        .map(|(r, a)| classify((r[0] as i32 - a[0] as i32).unsigned_abs(), sensitivity))
        .collect();

    Ok(DifferenceMap {
        width: reference_luma.width(),
        height: reference_luma.height(),
        sensitivity,
        cells,
    })
}

/// Co-register two color images at the pair bounds, then compare their luma
pub fn compare_images(
    reference: &PixelBuffer,
    artwork: &PixelBuffer,
    sensitivity: u32,
) -> Result<DifferenceMap> {
    let [max_w, max_h] = PAIR_MAX_DIMENSIONS;
    let (reference, artwork) = co_register(reference, artwork, max_w, max_h)?;
    difference_map(&grayscale(&reference), &grayscale(&artwork), sensitivity)
}
