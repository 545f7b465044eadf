// src/pixel_buffer.rs - Shared RGBA buffer type and the bounded resize entry point

use image::imageops::FilterType;
use image::RgbaImage;

use crate::errors::{ChromaLensError, Result};

/// Bytes per pixel (RGBA, 8-bit channels)
pub const CHANNELS: usize = 4;

/// Working bounds for tools that look at one image at a time
pub const SINGLE_MAX_DIMENSIONS: [u32; 2] = [600, 400];

/// Working bounds for tools that compare a co-registered pair
pub const PAIR_MAX_DIMENSIONS: [u32; 2] = [500, 400];

/// Row-major, top-left origin RGBA buffer.
///
/// The constructor enforces `pixels.len() == width * height * 4` and a non-zero
/// area, so every analysis function can assume a well-formed buffer. Transforms
/// never mutate their input; each one returns a freshly owned buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw RGBA bytes, rejecting zero-area or mis-sized input
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * CHANNELS;
        if width == 0 || height == 0 || pixels.len() != expected {
            return Err(ChromaLensError::InvalidImage {
                width,
                height,
                len: pixels.len(),
            });
        }

        Ok(Self { width, height, pixels })
    }

    /// Create a buffer where every pixel has the same RGBA value
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self> {
        let count = width as usize * height as usize;
        let pixels = rgba.iter().copied().cycle().take(count * CHANNELS).collect();
        Self::new(width, height, pixels)
    }

    /// Build a buffer by evaluating `f(x, y)` for every pixel
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Result<Self>
    where
        F: FnMut(u32, u32) -> [u8; 4],
    {
        let mut pixels = Vec::with_capacity(width as usize * height as usize * CHANNELS);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&f(x, y));
            }
        }
        Self::new(width, height, pixels)
    }

    /// Take ownership of a decoded `image` buffer
    pub fn from_rgba_image(image: RgbaImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        Self::new(width, height, image.into_raw())
    }

    /// Copy into an `image` buffer for saving or further `imageproc` work
    pub fn to_rgba_image(&self) -> RgbaImage {
        let mut image = RgbaImage::new(self.width, self.height);
        image.copy_from_slice(&self.pixels);
        image
    }

    /// Same-shape constructor for transforms that preserve the input dimensions.
    pub(crate) fn with_same_shape(&self, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), self.pixels.len());
        Self {
            width: self.width,
            height: self.height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    #[inline]
    pub fn index_of(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    /// RGBA value at (x, y); callers are expected to stay in bounds
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.index_of(x, y);
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2], self.pixels[i + 3]]
    }

    /// Red channel at (x, y), which is the luma value for grayscale buffers
    #[inline]
    pub fn luma_at(&self, x: u32, y: u32) -> u8 {
        self.pixels[self.index_of(x, y)]
    }

    /// Resample by a uniform factor; target is `floor(dim * scale)`
    pub fn resize_by_scale(&self, scale: f64) -> Result<PixelBuffer> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ChromaLensError::InvalidParameter(format!(
                "scale factor must be positive, got {}",
                scale
            )));
        }

        let width = (self.width as f64 * scale).floor() as u32;
        let height = (self.height as f64 * scale).floor() as u32;
        self.resize_exact(width, height)
    }

    /// Resample to an exact size with a triangle (bilinear) filter
    pub fn resize_exact(&self, width: u32, height: u32) -> Result<PixelBuffer> {
        if width == 0 || height == 0 {
            return Err(ChromaLensError::InvalidImage { width, height, len: 0 });
        }
        if (width, height) == self.dimensions() {
            return Ok(self.clone());
        }

        let resized = image::imageops::resize(
            &self.to_rgba_image(),
            width,
            height,
            FilterType::Triangle,
        );
        PixelBuffer::from_rgba_image(resized)
    }

    /// Keep only the top-left `width x height` region
    pub fn crop(&self, width: u32, height: u32) -> Result<PixelBuffer> {
        if width > self.width || height > self.height {
            return Err(ChromaLensError::InvalidParameter(format!(
                "crop {}x{} exceeds buffer {}x{}",
                width, height, self.width, self.height
            )));
        }
        if (width, height) == self.dimensions() {
            return Ok(self.clone());
        }

        let row_bytes = width as usize * CHANNELS;
        let mut pixels = Vec::with_capacity(row_bytes * height as usize);
        for y in 0..height {
            let start = self.index_of(0, y);
            pixels.extend_from_slice(&self.pixels[start..start + row_bytes]);
        }
        PixelBuffer::new(width, height, pixels)
    }
}

impl TryFrom<RgbaImage> for PixelBuffer {
    type Error = ChromaLensError;

    fn try_from(image: RgbaImage) -> Result<Self> {
        Self::from_rgba_image(image)
    }
}

/// Downscale factor that fits `width x height` inside the bounds; never upscales
pub fn bounded_scale(width: u32, height: u32, max_width: u32, max_height: u32) -> f64 {
    let sx = max_width as f64 / width as f64;
    let sy = max_height as f64 / height as f64;
    sx.min(sy).min(1.0)
}

/// Resize a source image so it fits inside `max_width x max_height`
pub fn resize(source: &PixelBuffer, max_width: u32, max_height: u32) -> Result<PixelBuffer> {
    let scale = bounded_scale(source.width, source.height, max_width, max_height);
    source.resize_by_scale(scale)
}

/// Resize two images with one shared scale taken from the pair's combined
/// bounds, then crop both to their common width and height.
pub fn co_register(
    a: &PixelBuffer,
    b: &PixelBuffer,
    max_width: u32,
    max_height: u32,
) -> Result<(PixelBuffer, PixelBuffer)> {
    let scale = bounded_scale(
        a.width.max(b.width),
        a.height.max(b.height),
        max_width,
        max_height,
    );

    let a = a.resize_by_scale(scale)?;
    let b = b.resize_by_scale(scale)?;

    let width = a.width.min(b.width);
    let height = a.height.min(b.height);
    Ok((a.crop(width, height)?, b.crop(width, height)?))
}

/// Fail with `DimensionMismatch` unless both buffers share a shape
pub fn ensure_same_dimensions(a: &PixelBuffer, b: &PixelBuffer) -> Result<()> {
    if a.dimensions() != b.dimensions() {
        return Err(ChromaLensError::DimensionMismatch {
            expected: a.dimensions(),
            found: b.dimensions(),
        });
    }
    Ok(())
}

/// Check if a point is inside the image bounds
#[inline]
pub fn in_bounds(x: i64, y: i64, width: u32, height: u32) -> bool {
    x >= 0 && y >= 0 && x < width as i64 && y < height as i64
}
