// src/config.rs - Tool parameters, loaded from TOML and overridable from the command line

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::coherence::DEFAULT_SCALES;
use crate::composition::{CompositionGrid, MAX_CUSTOM_DIVISIONS};
use crate::difference::DEFAULT_SENSITIVITY;
use crate::entropy::DEFAULT_GRID_SIZE;
use crate::errors::{ChromaLensError, Result};
use crate::palette::{DEFAULT_HARMONY_COUNT, DEFAULT_PALETTE_COUNT};
use crate::pixel_buffer::{PAIR_MAX_DIMENSIONS, SINGLE_MAX_DIMENSIONS};
use crate::squint::{DEFAULT_BLUR_SIGMA, MAX_BLUR_SIGMA, MIN_BLUR_SIGMA};

/// Configuration for ChromaLens
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    pub reference_path: String,
    pub artwork_path: String,
    pub output_base_dir: String,

    #[serde(default = "default_single_max_dimensions")]
    pub single_max_dimensions: [u32; 2],

    #[serde(default = "default_pair_max_dimensions")]
    pub pair_max_dimensions: [u32; 2],

    /// Notan cutoff, 0..=255
    #[serde(default = "default_notan_threshold")]
    pub notan_threshold: u8,

    /// Largest luma difference still counted as a match, 5..=100
    #[serde(default = "default_difference_sensitivity")]
    pub difference_sensitivity: u32,

    #[serde(default = "default_entropy_grid_size")]
    pub entropy_grid_size: u32,

    #[serde(default = "default_palette_color_count")]
    pub palette_color_count: usize,

    #[serde(default = "default_harmony_color_count")]
    pub harmony_color_count: usize,

    #[serde(default = "default_coherence_scales")]
    pub coherence_scales: Vec<f64>,

    #[serde(default = "default_squint_blur_sigma")]
    pub squint_blur_sigma: f32,

    #[serde(default = "default_composition_grid")]
    pub composition_grid: CompositionGrid,

    #[serde(default = "default_custom_grid_divisions")]
    pub custom_grid_rows: u32,

    #[serde(default = "default_custom_grid_divisions")]
    pub custom_grid_cols: u32,

    #[serde(default = "default_parallel")]
    pub use_parallel: bool,
}

fn default_single_max_dimensions() -> [u32; 2] {
    SINGLE_MAX_DIMENSIONS
}

fn default_pair_max_dimensions() -> [u32; 2] {
    PAIR_MAX_DIMENSIONS
}

fn default_notan_threshold() -> u8 {
    128
}

fn default_difference_sensitivity() -> u32 {
    DEFAULT_SENSITIVITY
}

fn default_entropy_grid_size() -> u32 {
    DEFAULT_GRID_SIZE
}

fn default_palette_color_count() -> usize {
    DEFAULT_PALETTE_COUNT
}

fn default_harmony_color_count() -> usize {
    DEFAULT_HARMONY_COUNT
}

fn default_coherence_scales() -> Vec<f64> {
    DEFAULT_SCALES.to_vec()
}

fn default_squint_blur_sigma() -> f32 {
    DEFAULT_BLUR_SIGMA
}

fn default_composition_grid() -> CompositionGrid {
    CompositionGrid::Thirds
}

fn default_custom_grid_divisions() -> u32 {
    3
}

fn default_parallel() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reference_path: "./input/reference.png".to_string(),
            artwork_path: "./input/artwork.png".to_string(),
            output_base_dir: "./output".to_string(),
            single_max_dimensions: default_single_max_dimensions(),
            pair_max_dimensions: default_pair_max_dimensions(),
            notan_threshold: default_notan_threshold(),
            difference_sensitivity: default_difference_sensitivity(),
            entropy_grid_size: default_entropy_grid_size(),
            palette_color_count: default_palette_color_count(),
            harmony_color_count: default_harmony_color_count(),
            coherence_scales: default_coherence_scales(),
            squint_blur_sigma: default_squint_blur_sigma(),
            composition_grid: default_composition_grid(),
            custom_grid_rows: default_custom_grid_divisions(),
            custom_grid_cols: default_custom_grid_divisions(),
            use_parallel: default_parallel(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ChromaLensError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;

        toml::from_str(&content).map_err(|source| ChromaLensError::ConfigLoad {
            source,
            path: path.to_path_buf(),
        })
    }

    /// Check parameter ranges without touching the filesystem
    pub fn validate_parameters(&self) -> Result<()> {
        for (name, [w, h]) in [
            ("single_max_dimensions", self.single_max_dimensions),
            ("pair_max_dimensions", self.pair_max_dimensions),
        ] {
            if w == 0 || h == 0 {
                return Err(ChromaLensError::Config(format!("{} must be non-zero", name)));
            }
        }

        if !(5..=100).contains(&self.difference_sensitivity) {
            return Err(ChromaLensError::Config(
                "difference_sensitivity must be between 5 and 100".to_string(),
            ));
        }

        if !(2..=20).contains(&self.entropy_grid_size) {
            return Err(ChromaLensError::Config(
                "entropy_grid_size must be between 2 and 20".to_string(),
            ));
        }

        if self.palette_color_count == 0 || self.harmony_color_count == 0 {
            return Err(ChromaLensError::Config(
                "palette_color_count and harmony_color_count must be > 0".to_string(),
            ));
        }

        if self.coherence_scales.is_empty() {
            return Err(ChromaLensError::Config(
                "coherence_scales must list at least one scale".to_string(),
            ));
        }
        if let Some(bad) = self.coherence_scales.iter().find(|&&s| !(s > 0.0 && s <= 1.0)) {
            return Err(ChromaLensError::Config(format!(
                "coherence scale {} must be in (0, 1]",
                bad
            )));
        }

        if !(MIN_BLUR_SIGMA..=MAX_BLUR_SIGMA).contains(&self.squint_blur_sigma) {
            return Err(ChromaLensError::Config(format!(
                "squint_blur_sigma must be between {} and {}",
                MIN_BLUR_SIGMA, MAX_BLUR_SIGMA
            )));
        }

        let divisions = 2..=MAX_CUSTOM_DIVISIONS;
        if !divisions.contains(&self.custom_grid_rows) || !divisions.contains(&self.custom_grid_cols) {
            return Err(ChromaLensError::Config(format!(
                "custom_grid_rows and custom_grid_cols must be between 2 and {}",
                MAX_CUSTOM_DIVISIONS
            )));
        }

        Ok(())
    }

    /// Validate parameters and check both input images exist
    pub fn validate(&self) -> Result<()> {
        self.validate_parameters()?;

        for path in [&self.reference_path, &self.artwork_path] {
            let path = PathBuf::from(path);
            if !path.is_file() {
                return Err(ChromaLensError::InvalidPath(path));
            }
        }

        Ok(())
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| {
            ChromaLensError::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, content)?;

        Ok(())
    }
}
