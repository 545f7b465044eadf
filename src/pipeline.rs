// src/pipeline.rs - Prepares a reference/artwork pair once and runs every tool over it

use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, info};
use serde::Serialize;

use crate::coherence::{display_edge_maps, edge_coherence, CoherenceResult};
use crate::color_space::{Color, Hsl};
use crate::config::Config;
use crate::difference::{difference_map, DifferenceMap};
use crate::edges::sobel;
use crate::entropy::{entropy_grid, EntropyGrid};
use crate::errors::Result;
use crate::grayscale::{grayscale, threshold};
use crate::harmony::{analyze_harmony, HarmonyResult};
use crate::palette::{dominant_colors, palette_colors, DominantColor};
use crate::pixel_buffer::{co_register, resize, PixelBuffer};

/// One source image at native size plus its bounded working copy
#[derive(Debug, Clone)]
pub struct PreparedImage {
    pub native: PixelBuffer,
    pub working: PixelBuffer,
    pub luma: PixelBuffer,
}

/// Bounded working copy and its grayscale, computed from a borrowed source
fn working_views(native: &PixelBuffer, max_dimensions: [u32; 2]) -> Result<(PixelBuffer, PixelBuffer)> {
    let working = resize(native, max_dimensions[0], max_dimensions[1])?;
    let luma = grayscale(&working);
    Ok((working, luma))
}

/// Immutable inputs shared by every tool.
///
/// Parameter changes (threshold, sensitivity, grid size) only re-run the tool
/// that uses them; the resized and grayscale buffers are computed once here.
#[derive(Debug, Clone)]
pub struct PreparedPair {
    pub reference: PreparedImage,
    pub artwork: PreparedImage,
    /// Luma of both images co-registered at the pair bounds
    pub pair_luma: (PixelBuffer, PixelBuffer),
}

/// Resize, co-register and convert both images.
///
/// With `use_parallel` the two images are prepared on separate rayon workers;
/// the result does not depend on which finishes first.
pub fn prepare_pair(reference: PixelBuffer, artwork: PixelBuffer, config: &Config) -> Result<PreparedPair> {
    let single = config.single_max_dimensions;
    let [pair_w, pair_h] = config.pair_max_dimensions;

    let pair_luma = || -> Result<(PixelBuffer, PixelBuffer)> {
        let (r, a) = co_register(&reference, &artwork, pair_w, pair_h)?;
        Ok((grayscale(&r), grayscale(&a)))
    };

    // Every derived buffer is computed from borrows; the natives move in afterwards
    let ((reference_views, artwork_views), pair_luma) = if config.use_parallel {
        let ((r, a), p) = rayon::join(
            || rayon::join(|| working_views(&reference, single), || working_views(&artwork, single)),
            pair_luma,
        );
        ((r?, a?), p?)
    } else {
        (
            (working_views(&reference, single)?, working_views(&artwork, single)?),
            pair_luma()?,
        )
    };

    let (working, luma) = reference_views;
    let reference_prepared = PreparedImage { native: reference, working, luma };
    let (working, luma) = artwork_views;
    let artwork_prepared = PreparedImage { native: artwork, working, luma };

    debug!(
        "Prepared pair: reference {:?} -> {:?}, artwork {:?} -> {:?}, co-registered {:?}",
        reference_prepared.native.dimensions(),
        reference_prepared.working.dimensions(),
        artwork_prepared.native.dimensions(),
        artwork_prepared.working.dimensions(),
        pair_luma.0.dimensions(),
    );

    Ok(PreparedPair {
        reference: reference_prepared,
        artwork: artwork_prepared,
        pair_luma,
    })
}

impl PreparedPair {
    /// Black/white value study of both working images
    pub fn notan(&self, cutoff: u8) -> (PixelBuffer, PixelBuffer) {
        (threshold(&self.reference.luma, cutoff), threshold(&self.artwork.luma, cutoff))
    }

    /// Contour overlay edges of both working images
    pub fn edges(&self) -> (PixelBuffer, PixelBuffer) {
        rayon::join(|| sobel(&self.reference.luma), || sobel(&self.artwork.luma))
    }

    pub fn difference(&self, sensitivity: u32) -> Result<DifferenceMap> {
        difference_map(&self.pair_luma.0, &self.pair_luma.1, sensitivity)
    }

    pub fn entropy(&self, grid_size: u32) -> Result<(EntropyGrid, EntropyGrid)> {
        let (r, a) = rayon::join(
            || entropy_grid(&self.reference.luma, grid_size),
            || entropy_grid(&self.artwork.luma, grid_size),
        );
        Ok((r?, a?))
    }

    pub fn palettes(&self, count: usize) -> (Vec<DominantColor>, Vec<DominantColor>) {
        (
            dominant_colors(&self.reference.working, count),
            dominant_colors(&self.artwork.working, count),
        )
    }

    pub fn harmony(&self, count: usize) -> (HarmonyResult, HarmonyResult) {
        let (r, a) = self.palettes(count);
        (analyze_harmony(&palette_colors(&r)), analyze_harmony(&palette_colors(&a)))
    }

    /// Multi-scale coherence on the native images
    pub fn coherence(&self, scales: &[f64]) -> Result<CoherenceResult> {
        edge_coherence(&self.reference.native, &self.artwork.native, scales)
    }

    /// Edge maps for side-by-side display at the pair bounds
    pub fn coherence_display(&self) -> Result<(PixelBuffer, PixelBuffer)> {
        display_edge_maps(&self.reference.native, &self.artwork.native)
    }
}

/// A palette entry as shown to the user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaletteEntry {
    pub color: Color,
    pub hex: String,
    pub hsl: Hsl,
    pub weight: u32,
}

impl From<&DominantColor> for PaletteEntry {
    fn from(d: &DominantColor) -> Self {
        Self {
            color: d.color,
            hex: d.color.hex(),
            hsl: d.color.to_hsl(),
            weight: d.weight,
        }
    }
}

/// Per-image results
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageReport {
    pub native_dimensions: (u32, u32),
    pub working_dimensions: (u32, u32),
    pub palette: Vec<PaletteEntry>,
    pub harmony: HarmonyResult,
    pub entropy: EntropyGrid,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DifferenceSummary {
    pub width: u32,
    pub height: u32,
    pub sensitivity: u32,
    pub mismatch_count: usize,
    pub mismatch_ratio: f64,
}

/// Everything `analyze_pair` computes, ready for serialization
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairReport {
    pub reference: ImageReport,
    pub artwork: ImageReport,
    pub difference: DifferenceSummary,
    pub coherence: CoherenceResult,
}

/// Full results including the per-pixel difference map
#[derive(Debug, Clone)]
pub struct PairAnalysis {
    pub report: PairReport,
    pub difference: DifferenceMap,
}

/// Run every scoring tool over a prepared pair with the configured parameters
pub fn analyze_pair(pair: &PreparedPair, config: &Config) -> Result<PairAnalysis> {
    info!("Extracting palettes and scoring harmony...");
    let (ref_palette, art_palette) = pair.palettes(config.palette_color_count);
    let (ref_harmony, art_harmony) = pair.harmony(config.harmony_color_count);

    info!("Computing complexity grids ({}x{})...", config.entropy_grid_size, config.entropy_grid_size);
    let (ref_entropy, art_entropy) = pair.entropy(config.entropy_grid_size)?;

    info!("Comparing values at sensitivity {}...", config.difference_sensitivity);
    let difference = pair.difference(config.difference_sensitivity)?;

    info!("Scoring edge coherence at scales {:?}...", config.coherence_scales);
    let coherence = pair.coherence(&config.coherence_scales)?;

    debug!(
        "Harmony {} / {}, complexity {:.3} / {:.3}, mismatches {}, coherence {}",
        ref_harmony.score,
        art_harmony.score,
        ref_entropy.average,
        art_entropy.average,
        difference.mismatch_count(),
        coherence.average,
    );

    let report = PairReport {
        reference: ImageReport {
            native_dimensions: pair.reference.native.dimensions(),
            working_dimensions: pair.reference.working.dimensions(),
            palette: ref_palette.iter().map(PaletteEntry::from).collect(),
            harmony: ref_harmony,
            entropy: ref_entropy,
        },
        artwork: ImageReport {
            native_dimensions: pair.artwork.native.dimensions(),
            working_dimensions: pair.artwork.working.dimensions(),
            palette: art_palette.iter().map(PaletteEntry::from).collect(),
            harmony: art_harmony,
            entropy: art_entropy,
        },
        difference: DifferenceSummary {
            width: difference.width,
            height: difference.height,
            sensitivity: difference.sensitivity,
            mismatch_count: difference.mismatch_count(),
            mismatch_ratio: difference.mismatch_ratio(),
        },
        coherence,
    };

    Ok(PairAnalysis { report, difference })
}

/// Ticket identifying one requested computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Generation(u64);

/// Monotonic version counter for discarding superseded results.
///
/// Each new request calls [`GenerationCounter::begin`]; when its computation
/// finishes, [`GenerationCounter::commit`] hands the value back only if no newer
/// request started in the meantime.
#[derive(Debug, Default)]
pub struct GenerationCounter {
    latest: AtomicU64,
}

impl GenerationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> Generation {
        Generation(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    pub fn latest(&self) -> Generation {
        Generation(self.latest.load(Ordering::Acquire))
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        self.latest() == generation
    }

    pub fn commit<T>(&self, generation: Generation, value: T) -> Option<T> {
        if self.is_current(generation) {
            Some(value)
        } else {
            debug!("Discarding result of superseded generation {:?}", generation);
            None
        }
    }
}
