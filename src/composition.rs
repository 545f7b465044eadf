// src/composition.rs - Composition guide lines (thirds, grids, golden ratio, diagonals)

use imageproc::drawing::{draw_line_segment_mut, Blend};
use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::errors::{ChromaLensError, Result};
use crate::pixel_buffer::PixelBuffer;

/// Ratio used for golden-section guides
pub const PHI: f64 = 1.618;

pub const DEFAULT_GUIDE_RGB: [u8; 3] = [220, 50, 50];
pub const DEFAULT_GUIDE_OPACITY: f64 = 0.6;

/// Largest custom grid on either axis
pub const MAX_CUSTOM_DIVISIONS: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositionGrid {
    Thirds,
    FourByFour,
    SixBySix,
    Golden,
    Diagonal,
    Custom,
}

/// A guide segment in normalized `[0, 1]` coordinates.
///
/// `weight` scales the overlay opacity; secondary golden-section guides are
/// drawn at half strength.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GuideLine {
    pub start: (f64, f64),
    pub end: (f64, f64),
    pub weight: f64,
}

impl GuideLine {
    fn vertical(x: f64, weight: f64) -> Self {
        Self { start: (x, 0.0), end: (x, 1.0), weight }
    }

    fn horizontal(y: f64, weight: f64) -> Self {
        Self { start: (0.0, y), end: (1.0, y), weight }
    }
}

fn even_divisions(rows: u32, cols: u32) -> Vec<GuideLine> {
    let verticals = (1..cols).map(|i| GuideLine::vertical(i as f64 / cols as f64, 1.0));
    let horizontals = (1..rows).map(|i| GuideLine::horizontal(i as f64 / rows as f64, 1.0));
    verticals.chain(horizontals).collect()
}

/// Guide lines for a grid type; `custom_rows`/`custom_cols` only apply to `Custom`
pub fn guide_lines(grid: CompositionGrid, custom_rows: u32, custom_cols: u32) -> Result<Vec<GuideLine>> {
    let lines = match grid {
        CompositionGrid::Thirds => even_divisions(3, 3),
        CompositionGrid::FourByFour => even_divisions(4, 4),
        CompositionGrid::SixBySix => even_divisions(6, 6),
        CompositionGrid::Custom => {
            let valid = 1..=MAX_CUSTOM_DIVISIONS;
            if !valid.contains(&custom_rows) || !valid.contains(&custom_cols) {
                return Err(ChromaLensError::InvalidParameter(format!(
                    "custom grid {}x{} outside 1..={}",
                    custom_rows, custom_cols, MAX_CUSTOM_DIVISIONS
                )));
            }
            even_divisions(custom_rows, custom_cols)
        }
        CompositionGrid::Golden => {
            let major = 1.0 / PHI;
            let minor = 1.0 - 1.0 / PHI;
            vec![
                GuideLine::vertical(major, 1.0),
                GuideLine::vertical(1.0 - major, 1.0),
                GuideLine::horizontal(major, 1.0),
                GuideLine::horizontal(1.0 - major, 1.0),
                GuideLine::vertical(minor, 0.5),
                GuideLine::horizontal(minor, 0.5),
            ]
        }
        CompositionGrid::Diagonal => vec![
            GuideLine { start: (0.0, 0.0), end: (1.0, 1.0), weight: 1.0 },
            GuideLine { start: (1.0, 0.0), end: (0.0, 1.0), weight: 1.0 },
        ],
    };
    Ok(lines)
}

/// Alpha-blend guide lines over a copy of `buffer`
pub fn draw_guides(
    buffer: &PixelBuffer,
    lines: &[GuideLine],
    rgb: [u8; 3],
    opacity: f64,
) -> Result<PixelBuffer> {
    let max_x = (buffer.width() - 1) as f64;
    let max_y = (buffer.height() - 1) as f64;
    let to_canvas = |(x, y): (f64, f64)| ((x * max_x) as f32, (y * max_y) as f32);

    let mut canvas = Blend(buffer.to_rgba_image());
    for line in lines {
        let alpha = (opacity * line.weight * 255.0).round().clamp(0.0, 255.0) as u8;
        let color = Rgba([rgb[0], rgb[1], rgb[2], alpha]);
        draw_line_segment_mut(&mut canvas, to_canvas(line.start), to_canvas(line.end), color);
    }

    PixelBuffer::from_rgba_image(canvas.0)
}
