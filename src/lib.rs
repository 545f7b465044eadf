// src/lib.rs - Library interface for ChromaLens

pub mod coherence;
pub mod color_space;
pub mod composition;
pub mod config;
pub mod difference;
pub mod edges;
pub mod entropy;
pub mod errors;
pub mod grayscale;
pub mod harmony;
pub mod image_io;
pub mod output;
pub mod palette;
pub mod pipeline;
pub mod pixel_buffer;
pub mod squint;

// Re-export commonly used types and functions
pub use errors::{ChromaLensError, Result};
pub use config::Config;
pub use image_io::{InputImage, load_image, save_buffer};
pub use pixel_buffer::{PixelBuffer, co_register, resize};

pub use color_space::{
    Color,
    Hsl,
    SampledColor,
    hsl_to_rgb,
    rgb_to_hex,
    rgb_to_hsl,
    sample_color,
};

pub use grayscale::{grayscale, notan, threshold};
pub use edges::{binarize_edges, edge_map, sobel, EDGE_PRESENCE_CUTOFF};
pub use palette::{DominantColor, dominant_colors};
pub use harmony::{HarmonyResult, HarmonyTier, analyze_harmony};
pub use difference::{DifferenceCell, DifferenceMap, compare_images, difference_map};
pub use coherence::{CoherenceResult, ScaleScore, edge_coherence};
pub use entropy::{EntropyGrid, entropy_grid, render_complexity_map};
pub use squint::squint;
pub use composition::{CompositionGrid, GuideLine, draw_guides, guide_lines};

pub use pipeline::{
    Generation,
    GenerationCounter,
    PairAnalysis,
    PairReport,
    PreparedPair,
    analyze_pair,
    prepare_pair,
};
