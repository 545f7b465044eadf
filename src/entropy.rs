// src/entropy.rs - Per-region brightness complexity (normalized std-dev proxy for entropy)

use rayon::prelude::*;
use serde::Serialize;

use crate::errors::{ChromaLensError, Result};
use crate::pixel_buffer::PixelBuffer;

pub const DEFAULT_GRID_SIZE: u32 = 8;

/// Standard deviation that maps to a full score of 1.0
const STD_DEV_NORMALIZER: f64 = 128.0;

/// Complexity map: `rows x cols` cells, each the local luma standard deviation
/// divided by 128 and capped at 1.0.
///
/// This is a variance-based stand-in, not Shannon entropy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntropyGrid {
    pub rows: u32,
    pub cols: u32,
    pub cells: Vec<Vec<f64>>,
    pub average: f64,
}

impl EntropyGrid {
    pub fn cell(&self, row: u32, col: u32) -> f64 {
        self.cells[row as usize][col as usize]
    }

    /// Average as a whole percentage, as shown next to each complexity map
    pub fn average_percent(&self) -> u32 {
        (self.average * 100.0).round() as u32
    }
}

fn cell_score(luma: &PixelBuffer, x0: u32, y0: u32, cell_w: u32, cell_h: u32) -> f64 {
    let count = cell_w as usize * cell_h as usize;
    if count == 0 {
        return 0.0;
    }

    let values = (y0..y0 + cell_h).flat_map(|y| (x0..x0 + cell_w).map(move |x| (x, y)));

    let sum: f64 = values.clone().map(|(x, y)| luma.luma_at(x, y) as f64).sum();
    let mean = sum / count as f64;
    let variance = values
        .map(|(x, y)| (luma.luma_at(x, y) as f64 - mean).powi(2))
        .sum::<f64>()
        / count as f64;

    (variance.sqrt() / STD_DEV_NORMALIZER).min(1.0)
}

/// Score a grayscale buffer on a `grid_size x grid_size` partition.
///
/// Cells are `floor(w / g) x floor(h / g)`; leftover columns and rows past the
/// last full cell are not visited. Empty cells score 0.
pub fn entropy_grid(luma: &PixelBuffer, grid_size: u32) -> Result<EntropyGrid> {
    if grid_size == 0 {
        return Err(ChromaLensError::InvalidParameter(
            "grid size must be at least 1".to_string(),
        ));
    }

    let cell_w = luma.width() / grid_size;
    let cell_h = luma.height() / grid_size;

    let cells: Vec<Vec<f64>> = (0..grid_size)
        .into_par_iter()
        .map(|gy| {
            (0..grid_size)
                .map(|gx| cell_score(luma, gx * cell_w, gy * cell_h, cell_w, cell_h))
                .collect()
        })
        .collect();

    let total: f64 = cells.iter().flatten().sum();
    let average = total / (grid_size as f64 * grid_size as f64);

    Ok(EntropyGrid {
        rows: grid_size,
        cols: grid_size,
        cells,
        average,
    })
}

/// Fill color for a cell score: blue for uniform, yellow-orange for busy
pub fn complexity_color(score: f64) -> [u8; 4] {
    let v = score.clamp(0.0, 1.0);
    [
        (v * 255.0).round() as u8,
        (v * 200.0).round() as u8,
        ((1.0 - v) * 255.0).round() as u8,
        179,
    ]
}

const GRID_LINE_RGBA: [u8; 4] = [255, 255, 255, 51];

/// Paint the grid over a `width x height` canvas, with white grid lines
pub fn render_complexity_map(grid: &EntropyGrid, width: u32, height: u32) -> Result<PixelBuffer> {
    let cell_w = width as f64 / grid.cols as f64;
    let cell_h = height as f64 / grid.rows as f64;

    PixelBuffer::from_fn(width, height, |x, y| {
        let col = ((x as f64 / cell_w) as u32).min(grid.cols - 1);
        let row = ((y as f64 / cell_h) as u32).min(grid.rows - 1);

        let on_vertical = x == 0 || x == width - 1 || (x as f64 / cell_w).fract() * cell_w < 1.0;
        let on_horizontal = y == 0 || y == height - 1 || (y as f64 / cell_h).fract() * cell_h < 1.0;
        if on_vertical || on_horizontal {
            return GRID_LINE_RGBA;
        }

        complexity_color(grid.cell(row, col))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn uniform_image_scores_zero_everywhere() {
        let flat = PixelBuffer::filled(64, 48, [77, 77, 77, 255]).unwrap();
        let grid = entropy_grid(&flat, 8).unwrap();
        assert_eq!((grid.rows, grid.cols), (8, 8));
        assert!(grid.cells.iter().flatten().all(|&v| v == 0.0));
        assert_eq!(grid.average, 0.0);
    }

    #[test]
    fn pixel_checkerboard_is_near_maximal() {
        let board = PixelBuffer::from_fn(64, 64, |x, y| {
            if (x + y) % 2 == 0 { [0, 0, 0, 255] } else { [255, 255, 255, 255] }
        })
        .unwrap();
        let grid = entropy_grid(&board, 8).unwrap();
        // std dev of half 0 / half 255 is 127.5
        for v in grid.cells.iter().flatten() {
            assert_approx_eq!(*v, 127.5 / 128.0, 1e-9);
        }
        assert_approx_eq!(grid.average, 127.5 / 128.0, 1e-9);
        assert_eq!(grid.average_percent(), 100);
    }

    #[test]
    fn leftover_pixels_are_not_visited() {
        // 10 / 4 = 2 per cell; the last two columns carry the only variation
        let buf = PixelBuffer::from_fn(10, 8, |x, y| {
            if x >= 8 && y % 2 == 0 { [255, 255, 255, 255] } else { [0, 0, 0, 255] }
        })
        .unwrap();
        let grid = entropy_grid(&buf, 4).unwrap();
        assert_eq!(grid.average, 0.0);
    }

    #[test]
    fn grid_larger_than_image_yields_empty_cells() {
        let buf = PixelBuffer::from_fn(3, 3, |x, _| [x as u8 * 100, 0, 0, 255]).unwrap();
        let grid = entropy_grid(&buf, 8).unwrap();
        assert!(grid.cells.iter().flatten().all(|&v| v == 0.0));
        assert_eq!(grid.average, 0.0);
        assert!(entropy_grid(&buf, 0).is_err());
    }

    #[test]
    fn single_cell_half_split() {
        let split = PixelBuffer::from_fn(4, 4, |x, _| {
            if x < 2 { [0, 0, 0, 255] } else { [128, 128, 128, 255] }
        })
        .unwrap();
        let grid = entropy_grid(&split, 1).unwrap();
        assert_approx_eq!(grid.cell(0, 0), 0.5, 1e-12);
    }

    #[test]
    fn complexity_colors_span_blue_to_orange() {
        assert_eq!(complexity_color(0.0), [0, 0, 255, 179]);
        assert_eq!(complexity_color(1.0), [255, 200, 0, 179]);
    }

    #[test]
    fn rendered_map_has_requested_size() {
        let flat = PixelBuffer::filled(32, 32, [10, 10, 10, 255]).unwrap();
        let grid = entropy_grid(&flat, 4).unwrap();
        let map = render_complexity_map(&grid, 32, 32).unwrap();
        assert_eq!(map.dimensions(), (32, 32));
        assert_eq!(map.pixel(0, 5), GRID_LINE_RGBA);
        assert_eq!(map.pixel(4, 4), complexity_color(0.0));
    }
}
