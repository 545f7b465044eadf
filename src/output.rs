use std::fs;
use std::path::{Path, PathBuf};
use csv::Writer;
use log::{debug, info};

use crate::coherence::CoherenceResult;
use crate::composition::{draw_guides, guide_lines, DEFAULT_GUIDE_OPACITY, DEFAULT_GUIDE_RGB};
use crate::config::Config;
use crate::entropy::{render_complexity_map, EntropyGrid};
use crate::errors::Result;
use crate::image_io::save_buffer;
use crate::pipeline::{PaletteEntry, PairAnalysis, PairReport, PreparedPair};
use crate::pixel_buffer::PixelBuffer;
use crate::squint::squint;

fn prepare_path<P: AsRef<Path>>(output_dir: P, name: &str) -> Result<PathBuf> {
    let output_path = output_dir.as_ref().join(name);
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(output_path)
}

/// Write the full report as pretty-printed JSON
pub fn write_report_json<P: AsRef<Path>>(report: &PairReport, output_dir: P) -> Result<PathBuf> {
    let output_path = prepare_path(output_dir, "report.json")?;
    let file = fs::File::create(&output_path)?;
    serde_json::to_writer_pretty(file, report)?;
    Ok(output_path)
}

/// One row per grid cell for both images
pub fn write_entropy_csv<P: AsRef<Path>>(
    reference: &EntropyGrid,
    artwork: &EntropyGrid,
    output_dir: P,
) -> Result<PathBuf> {
    let output_path = prepare_path(output_dir, "entropy_grid.csv")?;
    let mut writer = Writer::from_path(&output_path)?;

    writer.write_record(["Image", "Row", "Col", "Complexity"])?;
    for (label, grid) in [("reference", reference), ("artwork", artwork)] {
        for (row, cells) in grid.cells.iter().enumerate() {
            for (col, value) in cells.iter().enumerate() {
                writer.write_record(&[
                    label.to_string(),
                    row.to_string(),
                    col.to_string(),
                    format!("{:.6}", value),
                ])?;
            }
        }
    }

    writer.flush()?;
    Ok(output_path)
}

pub fn write_coherence_csv<P: AsRef<Path>>(coherence: &CoherenceResult, output_dir: P) -> Result<PathBuf> {
    let output_path = prepare_path(output_dir, "coherence.csv")?;
    let mut writer = Writer::from_path(&output_path)?;

    writer.write_record(["Scale", "Score"])?;
    for scale in &coherence.per_scale {
        writer.write_record(&[format!("{:.2}", scale.scale_factor), scale.score.to_string()])?;
    }
    writer.write_record(&["average".to_string(), coherence.average.to_string()])?;

    writer.flush()?;
    Ok(output_path)
}

pub fn write_palette_csv<P: AsRef<Path>>(
    reference: &[PaletteEntry],
    artwork: &[PaletteEntry],
    output_dir: P,
) -> Result<PathBuf> {
    let output_path = prepare_path(output_dir, "palette.csv")?;
    let mut writer = Writer::from_path(&output_path)?;

    writer.write_record(["Image", "Rank", "Hex", "Hue", "Saturation", "Lightness", "Weight"])?;
    for (label, palette) in [("reference", reference), ("artwork", artwork)] {
        for (rank, entry) in palette.iter().enumerate() {
            writer.write_record(&[
                label.to_string(),
                (rank + 1).to_string(),
                entry.hex.clone(),
                entry.hsl.h.to_string(),
                entry.hsl.s.to_string(),
                entry.hsl.l.to_string(),
                entry.weight.to_string(),
            ])?;
        }
    }

    writer.flush()?;
    Ok(output_path)
}

/// Render every visual tool's output for both images, named by tool
pub fn render_visualizations(
    pair: &PreparedPair,
    analysis: &PairAnalysis,
    config: &Config,
) -> Result<Vec<(String, PixelBuffer)>> {
    let mut images = Vec::new();
    let sides = [("reference", &pair.reference), ("artwork", &pair.artwork)];

    let (ref_notan, art_notan) = pair.notan(config.notan_threshold);
    let (ref_edges, art_edges) = pair.edges();
    let (ref_display, art_display) = pair.coherence_display()?;
    let lines = guide_lines(config.composition_grid, config.custom_grid_rows, config.custom_grid_cols)?;

    for (label, prepared) in sides {
        images.push((format!("{}_value.png", label), prepared.luma.clone()));
        images.push((format!("{}_squint.png", label), squint(&prepared.working, config.squint_blur_sigma)?));
        images.push((
            format!("{}_composition.png", label),
            draw_guides(&prepared.working, &lines, DEFAULT_GUIDE_RGB, DEFAULT_GUIDE_OPACITY)?,
        ));
    }

    images.push(("reference_notan.png".to_string(), ref_notan));
    images.push(("artwork_notan.png".to_string(), art_notan));
    images.push(("reference_contours.png".to_string(), ref_edges));
    images.push(("artwork_contours.png".to_string(), art_edges));
    images.push(("reference_coherence_edges.png".to_string(), ref_display));
    images.push(("artwork_coherence_edges.png".to_string(), art_display));
    images.push(("difference_heatmap.png".to_string(), analysis.difference.render()?));

    let report = &analysis.report;
    let (rw, rh) = pair.reference.working.dimensions();
    let (aw, ah) = pair.artwork.working.dimensions();
    images.push((
        "reference_complexity.png".to_string(),
        render_complexity_map(&report.reference.entropy, rw, rh)?,
    ));
    images.push((
        "artwork_complexity.png".to_string(),
        render_complexity_map(&report.artwork.entropy, aw, ah)?,
    ));

    Ok(images)
}

/// Write the JSON report, CSV tables and (optionally) PNG visualizations
pub fn write_outputs<P: AsRef<Path>>(
    pair: &PreparedPair,
    analysis: &PairAnalysis,
    config: &Config,
    output_dir: P,
    save_images: bool,
) -> Result<()> {
    let output_dir = output_dir.as_ref();
    let report = &analysis.report;

    let json = write_report_json(report, output_dir)?;
    info!("Wrote {}", json.display());

    write_entropy_csv(&report.reference.entropy, &report.artwork.entropy, output_dir)?;
    write_coherence_csv(&report.coherence, output_dir)?;
    write_palette_csv(&report.reference.palette, &report.artwork.palette, output_dir)?;

    if save_images {
        let image_dir = output_dir.join("images");
        fs::create_dir_all(&image_dir)?;
        for (name, buffer) in render_visualizations(pair, analysis, config)? {
            debug!("Saving {} ({}x{})", name, buffer.width(), buffer.height());
            save_buffer(&buffer, image_dir.join(&name))?;
        }
        info!("Saved visualizations to {}", image_dir.display());
    }

    Ok(())
}
