use std::path::{Path, PathBuf};
use image::ImageFormat;

use crate::errors::{ChromaLensError, Result};
use crate::pixel_buffer::PixelBuffer;

/// A decoded source image with its metadata
pub struct InputImage {
    pub buffer: PixelBuffer,
    pub path: PathBuf,
    pub filename: String,
}

/// Decode any format `image` understands into an RGBA pixel buffer
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<InputImage> {
    let path = path.as_ref();

    if !path.is_file() {
        return Err(ChromaLensError::InvalidPath(path.to_path_buf()));
    }

    // Get filename without extension
    let filename = path.file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| ChromaLensError::InvalidPath(path.to_path_buf()))?
        .to_string();

    let rgba_img = image::open(path)?.to_rgba8();
    let buffer = PixelBuffer::try_from(rgba_img)?;

    Ok(InputImage {
        buffer,
        path: path.to_path_buf(),
        filename,
    })
}

/// Save a pixel buffer as PNG
pub fn save_buffer<P: AsRef<Path>>(buffer: &PixelBuffer, path: P) -> Result<()> {
    buffer
        .to_rgba_image()
        .save_with_format(path, ImageFormat::Png)?;

    Ok(())
}
