// src/coherence.rs - Multi-scale edge agreement between reference and artwork

use serde::Serialize;

use crate::edges::{binarize_edges, edge_map, EDGE_PRESENCE_CUTOFF};
use crate::errors::{ChromaLensError, Result};
use crate::pixel_buffer::{co_register, PixelBuffer, PAIR_MAX_DIMENSIONS};

/// Large, medium and small structure
pub const DEFAULT_SCALES: [f64; 3] = [0.5, 0.3, 0.15];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScaleScore {
    pub scale_factor: f64,
    /// Percent agreement, `0..=100`
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoherenceResult {
    pub per_scale: Vec<ScaleScore>,
    /// Rounded arithmetic mean of the per-scale scores
    pub average: u32,
}

/// Binary edge mask with its own dimensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeMask {
    pub width: u32,
    pub height: u32,
    pub bits: Vec<u8>,
}

impl EdgeMask {
    pub fn from_edge_map(edges: &PixelBuffer) -> Self {
        Self {
            width: edges.width(),
            height: edges.height(),
            bits: binarize_edges(edges, EDGE_PRESENCE_CUTOFF),
        }
    }

    #[inline]
    fn get(&self, x: u32, y: u32) -> u8 {
        self.bits[y as usize * self.width as usize + x as usize]
    }
}

/// Agreement of two masks over their common top-left region.
///
/// Only pixels where at least one mask has an edge are counted; of those, the
/// ones where both masks have an edge are matches. With no edges on either
/// side the masks agree trivially and the score is 100.
pub fn mask_agreement(reference: &EdgeMask, artwork: &EdgeMask) -> u32 {
    let width = reference.width.min(artwork.width);
    let height = reference.height.min(artwork.height);

    let mut matches = 0u64;
    let mut total = 0u64;
    for y in 0..height {
        for x in 0..width {
            let r = reference.get(x, y);
            let a = artwork.get(x, y);
            if r == 1 || a == 1 {
                total += 1;
                if r == a {
                    matches += 1;
                }
            }
        }
    }

    if total == 0 {
        return 100;
    }
    (100.0 * matches as f64 / total as f64).round() as u32
}

/// Edge mask of an image resampled to `floor(native * scale)`.
///
/// A scale that floors either side to zero yields an empty mask, which has no
/// edges and so agrees with anything.
pub fn edge_mask_at_scale(image: &PixelBuffer, scale: f64) -> Result<EdgeMask> {
    let width = (image.width() as f64 * scale).floor();
    let height = (image.height() as f64 * scale).floor();
    if scale > 0.0 && (width < 1.0 || height < 1.0) {
        return Ok(EdgeMask { width: 0, height: 0, bits: Vec::new() });
    }

    let scaled = image.resize_by_scale(scale)?;
    Ok(EdgeMask::from_edge_map(&edge_map(&scaled)))
}

/// Score edge agreement at each scale, in the order given
pub fn edge_coherence(
    reference: &PixelBuffer,
    artwork: &PixelBuffer,
    scales: &[f64],
) -> Result<CoherenceResult> {
    if scales.is_empty() {
        return Err(ChromaLensError::InvalidParameter(
            "at least one coherence scale is required".to_string(),
        ));
    }

    let per_scale = scales
        .iter()
        .map(|&scale_factor| -> Result<ScaleScore> {
            let (ref_mask, art_mask) = rayon::join(
                || edge_mask_at_scale(reference, scale_factor),
                || edge_mask_at_scale(artwork, scale_factor),
            );
            Ok(ScaleScore {
                scale_factor,
                score: mask_agreement(&ref_mask?, &art_mask?),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let sum: u32 = per_scale.iter().map(|s| s.score).sum();
    let average = (sum as f64 / per_scale.len() as f64).round() as u32;

    Ok(CoherenceResult { per_scale, average })
}

/// Edge maps of both images co-registered at the pair bounds, for display
pub fn display_edge_maps(
    reference: &PixelBuffer,
    artwork: &PixelBuffer,
) -> Result<(PixelBuffer, PixelBuffer)> {
    let [max_w, max_h] = PAIR_MAX_DIMENSIONS;
    let (reference, artwork) = co_register(reference, artwork, max_w, max_h)?;
    Ok(rayon::join(|| edge_map(&reference), || edge_map(&artwork)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask(width: u32, height: u32, bits: &[u8]) -> EdgeMask {
        EdgeMask { width, height, bits: bits.to_vec() }
    }

    #[test]
    fn agreement_counts_only_edge_present_pixels() {
        let a = mask(4, 1, &[1, 1, 0, 0]);
        let b = mask(4, 1, &[1, 0, 1, 0]);
        // edge-present set: {0, 1, 2}; both agree only at 0
        assert_eq!(mask_agreement(&a, &b), 33);
    }

    #[test]
    fn no_edges_anywhere_scores_perfect() {
        let a = mask(3, 3, &[0; 9]);
        assert_eq!(mask_agreement(&a, &a.clone()), 100);
    }

    #[test]
    fn agreement_reads_the_common_region_spatially() {
        // 3x2 vs 2x2: the third column of `a` is ignored
        let a = mask(3, 2, &[1, 0, 1, 0, 1, 1]);
        let b = mask(2, 2, &[1, 0, 0, 1]);
        assert_eq!(mask_agreement(&a, &b), 100);
    }

    #[test]
    fn empty_scale_list_is_rejected() {
        let img = PixelBuffer::filled(10, 10, [0, 0, 0, 255]).unwrap();
        assert!(edge_coherence(&img, &img, &[]).is_err());
    }

    #[test]
    fn collapsed_scale_scores_as_edgeless() {
        let img = PixelBuffer::from_fn(40, 6, |x, _| {
            if x < 20 { [0, 0, 0, 255] } else { [255, 255, 255, 255] }
        })
        .unwrap();
        let mask = edge_mask_at_scale(&img, 0.15).unwrap();
        assert_eq!((mask.width, mask.height), (0, 0));

        let result = edge_coherence(&img, &img, &[0.5, 0.15]).unwrap();
        assert_eq!(result.per_scale[1].score, 100);
        assert_eq!(result.average, 100);
    }

    #[test]
    fn non_positive_scale_is_still_rejected() {
        let img = PixelBuffer::filled(5, 5, [0, 0, 0, 255]).unwrap();
        assert!(matches!(
            edge_coherence(&img, &img, &[0.0]),
            Err(ChromaLensError::InvalidParameter(_))
        ));
    }
}
