use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{info, warn};

use chromalens_lib::composition::CompositionGrid;
use chromalens_lib::output::write_outputs;
use chromalens_lib::{analyze_pair, load_image, prepare_pair, Config};

/// Command-line arguments
#[derive(Parser, Debug)]
#[clap(author, version, about = "ChromaLens - compare an artwork study against its reference")]
struct Args {
    /// Path to the reference image
    #[clap(short, long)]
    reference: Option<String>,

    /// Path to the artwork image
    #[clap(short, long)]
    artwork: Option<String>,

    /// Path to output directory
    #[clap(short, long)]
    output: Option<String>,

    /// Path to configuration file
    #[clap(short, long, default_value = "config.toml")]
    config: String,

    /// Notan cutoff (overwrites config)
    #[clap(short, long)]
    threshold: Option<u8>,

    /// Value-difference sensitivity (overwrites config)
    #[clap(short, long)]
    sensitivity: Option<u32>,

    /// Complexity grid size (overwrites config)
    #[clap(short, long)]
    grid_size: Option<u32>,

    /// Composition guide set (overwrites config)
    #[clap(long)]
    composition: Option<CompositionArg>,

    /// Enable debug logging
    #[clap(short, long)]
    debug: bool,

    /// Only write the JSON and CSV results
    #[clap(long)]
    skip_images: bool,

    /// Write a default configuration to --config and exit
    #[clap(long)]
    write_default_config: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CompositionArg {
    Thirds,
    FourByFour,
    SixBySix,
    Golden,
    Diagonal,
    Custom,
}

impl From<CompositionArg> for CompositionGrid {
    fn from(arg: CompositionArg) -> Self {
        match arg {
            CompositionArg::Thirds => CompositionGrid::Thirds,
            CompositionArg::FourByFour => CompositionGrid::FourByFour,
            CompositionArg::SixBySix => CompositionGrid::SixBySix,
            CompositionArg::Golden => CompositionGrid::Golden,
            CompositionArg::Diagonal => CompositionGrid::Diagonal,
            CompositionArg::Custom => CompositionGrid::Custom,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    if args.write_default_config {
        Config::default()
            .save_to_file(&args.config)
            .with_context(|| format!("writing default config to {}", args.config))?;
        info!("Wrote default configuration to {}", args.config);
        return Ok(());
    }

    // A missing config file means "use defaults"; a malformed one is an error
    let mut config = if PathBuf::from(&args.config).is_file() {
        Config::from_file(&args.config).with_context(|| format!("loading {}", args.config))?
    } else {
        warn!("Config file {} not found, using defaults", args.config);
        Config::default()
    };

    // Override config with command-line arguments
    if let Some(reference) = args.reference {
        config.reference_path = reference;
    }
    if let Some(artwork) = args.artwork {
        config.artwork_path = artwork;
    }
    if let Some(output) = args.output {
        config.output_base_dir = output;
    }
    if let Some(threshold) = args.threshold {
        config.notan_threshold = threshold;
    }
    if let Some(sensitivity) = args.sensitivity {
        config.difference_sensitivity = sensitivity;
    }
    if let Some(grid_size) = args.grid_size {
        config.entropy_grid_size = grid_size;
    }
    if let Some(composition) = args.composition {
        config.composition_grid = composition.into();
    }

    config.validate().context("invalid configuration")?;

    let start_time = Instant::now();

    let output_base = PathBuf::from(&config.output_base_dir);
    fs::create_dir_all(&output_base)
        .with_context(|| format!("creating output directory {}", output_base.display()))?;

    let (reference, artwork) = rayon::join(
        || load_image(&config.reference_path),
        || load_image(&config.artwork_path),
    );
    let reference = reference.with_context(|| format!("loading reference {}", config.reference_path))?;
    let artwork = artwork.with_context(|| format!("loading artwork {}", config.artwork_path))?;
    info!(
        "Comparing {} ({}x{}) with {} ({}x{})",
        reference.filename,
        reference.buffer.width(),
        reference.buffer.height(),
        artwork.filename,
        artwork.buffer.width(),
        artwork.buffer.height(),
    );

    let pair = prepare_pair(reference.buffer, artwork.buffer, &config)?;
    let analysis = analyze_pair(&pair, &config)?;

    let report = &analysis.report;
    info!(
        "Harmony: reference {} ({:?}), artwork {} ({:?})",
        report.reference.harmony.score,
        report.reference.harmony.tier,
        report.artwork.harmony.score,
        report.artwork.harmony.tier,
    );
    info!(
        "Value mismatches: {} ({:.1}%), edge coherence: {}%",
        report.difference.mismatch_count,
        report.difference.mismatch_ratio * 100.0,
        report.coherence.average,
    );

    write_outputs(&pair, &analysis, &config, &output_base, !args.skip_images)
        .with_context(|| format!("writing results to {}", output_base.display()))?;

    let elapsed = start_time.elapsed();
    info!("Processing completed in {:.2} seconds", elapsed.as_secs_f64());

    Ok(())
}
