use thiserror::Error;
use std::io;
use std::path::PathBuf;

/// Custom error types for ChromaLens
#[derive(Error, Debug)]
pub enum ChromaLensError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Decoding failure while acquiring a source image. Only the file-loading
    /// layer produces this; the analysis functions never see encoded bytes.
    #[error("Image decode error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration from {path}: {source}")]
    ConfigLoad {
        source: toml::de::Error,
        path: PathBuf,
    },

    #[error("Invalid image buffer: {width}x{height} with {len} bytes")]
    InvalidImage {
        width: u32,
        height: u32,
        len: usize,
    },

    #[error("Buffer dimensions differ: expected {expected:?}, found {found:?}")]
    DimensionMismatch {
        expected: (u32, u32),
        found: (u32, u32),
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("CSV output error: {0}")]
    CsvOutput(#[from] csv::Error),

    #[error("JSON output error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid input path: {0}")]
    InvalidPath(PathBuf),
}

/// Type alias for Result with our custom error type
pub type Result<T> = std::result::Result<T, ChromaLensError>;
