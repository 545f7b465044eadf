use chromalens_lib::PixelBuffer;

/// Black/white checkerboard with square cells of `cell` pixels.
pub fn checkerboard(width: u32, height: u32, cell: u32) -> PixelBuffer {
    assert!(cell > 0, "cell size must be positive");
    PixelBuffer::from_fn(width, height, |x, y| {
        if ((x / cell) + (y / cell)) % 2 == 0 {
            [0, 0, 0, 255]
        } else {
            [255, 255, 255, 255]
        }
    })
    .expect("checkerboard dimensions must be positive")
}

pub fn flat(width: u32, height: u32, rgb: [u8; 3]) -> PixelBuffer {
    PixelBuffer::filled(width, height, [rgb[0], rgb[1], rgb[2], 255]).expect("flat dimensions must be positive")
}

/// Left half black, right half white.
pub fn vertical_split(width: u32, height: u32) -> PixelBuffer {
    PixelBuffer::from_fn(width, height, |x, _| {
        if x < width / 2 {
            [0, 0, 0, 255]
        } else {
            [255, 255, 255, 255]
        }
    })
    .expect("split dimensions must be positive")
}

pub const FOUR_COLORS: [[u8; 3]; 4] = [[200, 40, 40], [40, 160, 60], [50, 70, 200], [230, 210, 90]];

/// Four flat quadrants, one per entry of `FOUR_COLORS`.
pub fn four_color_quadrants(width: u32, height: u32) -> PixelBuffer {
    PixelBuffer::from_fn(width, height, |x, y| {
        let quadrant = (x >= width / 2) as usize + 2 * (y >= height / 2) as usize;
        let [r, g, b] = FOUR_COLORS[quadrant];
        [r, g, b, 255]
    })
    .expect("quadrant dimensions must be positive")
}

/// A filled rectangle on a flat background; gives clean Sobel edges.
pub fn rectangle(width: u32, height: u32, inset: u32) -> PixelBuffer {
    PixelBuffer::from_fn(width, height, |x, y| {
        let inside = x >= inset && x < width - inset && y >= inset && y < height - inset;
        if inside {
            [235, 235, 235, 255]
        } else {
            [20, 20, 20, 255]
        }
    })
    .expect("rectangle dimensions must be positive")
}

/// Smooth color gradient touching many palette buckets.
pub fn gradient(width: u32, height: u32) -> PixelBuffer {
    PixelBuffer::from_fn(width, height, |x, y| {
        [
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            ((x + y) * 127 / (width + height).max(1)) as u8,
            255,
        ]
    })
    .expect("gradient dimensions must be positive")
}
