// src/palette.rs - Dominant color extraction by strided sampling and bucket quantization

use std::collections::HashMap;

use serde::Serialize;

use crate::color_space::Color;
use crate::pixel_buffer::{PixelBuffer, CHANNELS};

/// Approximate number of pixels visited per image
pub const TARGET_SAMPLES: usize = 2000;

/// Per-channel quantization step for bucket keys
pub const BUCKET_SIZE: f64 = 32.0;

/// Palette size shown by the palette tool
pub const DEFAULT_PALETTE_COUNT: usize = 7;

/// Palette size fed into harmony scoring
pub const DEFAULT_HARMONY_COUNT: usize = 6;

/// A bucket's mean color and how many samples landed in it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DominantColor {
    pub color: Color,
    pub weight: u32,
}

#[derive(Debug, Clone, Copy)]
struct Bucket {
    sum_r: u64,
    sum_g: u64,
    sum_b: u64,
    hits: u32,
}

type BucketKey = (u16, u16, u16);

#[inline]
fn quantize(v: u8) -> u16 {
    ((v as f64 / BUCKET_SIZE).round() * BUCKET_SIZE) as u16
}

/// Linear sampling stride over the flattened pixel sequence
pub fn sample_step(pixel_count: usize) -> usize {
    (pixel_count / TARGET_SAMPLES).max(1)
}

/// Extract up to `count` dominant colors, heaviest first.
///
/// Buckets live in a vector in first-seen order with a key-to-index map beside
/// it. The sort is stable, so equal-weight buckets keep first-seen order and the
/// output is reproducible.
pub fn dominant_colors(buffer: &PixelBuffer, count: usize) -> Vec<DominantColor> {
    let step = sample_step(buffer.pixel_count());

    let mut buckets: Vec<Bucket> = Vec::new();
    let mut index: HashMap<BucketKey, usize> = HashMap::new();

    for px in buffer.pixels().chunks_exact(CHANNELS).step_by(step) {
        let (r, g, b) = (px[0], px[1], px[2]);
        let key = (quantize(r), quantize(g), quantize(b));

        let slot = *index.entry(key).or_insert_with(|| {
            buckets.push(Bucket { sum_r: 0, sum_g: 0, sum_b: 0, hits: 0 });
            buckets.len() - 1
        });

        let bucket = &mut buckets[slot];
        bucket.sum_r += r as u64;
        bucket.sum_g += g as u64;
        bucket.sum_b += b as u64;
        bucket.hits += 1;
    }

    buckets.sort_by(|a, b| b.hits.cmp(&a.hits));

    buckets
        .into_iter()
        .take(count)
        .map(|bucket| {
            let hits = bucket.hits as f64;
            let mean = |sum: u64| (sum as f64 / hits).round() as u8;
            DominantColor {
                color: Color::new(mean(bucket.sum_r), mean(bucket.sum_g), mean(bucket.sum_b)),
                weight: bucket.hits,
            }
        })
        .collect()
}

/// Just the colors, in weight order
pub fn palette_colors(dominant: &[DominantColor]) -> Vec<Color> {
    dominant.iter().map(|d| d.color).collect()
}
