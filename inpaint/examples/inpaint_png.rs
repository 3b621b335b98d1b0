//! Example: Fill the masked region of a grayscale image
//!
//! Loads an image and a mask of the same size, converts both to 8-bit luma,
//! and inpaints every pixel where the mask is nonzero. Color images are
//! converted to grayscale first.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p inpaint --example inpaint_png -- photo.png mask.png filled.png [config.yaml]
//! ```
//!
//! The optional config is YAML or JSON:
//! ```yaml
//! radius: 5
//! border: replicate
//! ```

use std::env;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context};
use common::log_setup::{setup_logging, LogConfig};
use common::Buffer2;
use image::{GrayImage, ImageReader};
use inpaint::{inpaint_u8, InpaintConfig};

fn main() -> anyhow::Result<()> {
    setup_logging(&LogConfig::default().with_level("info,inpaint=debug"))?;

    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() < 3 || args.len() > 4 {
        bail!("usage: inpaint_png <image> <mask> <output> [config]");
    }
    let image_path = PathBuf::from(&args[0]);
    let mask_path = PathBuf::from(&args[1]);
    let output_path = PathBuf::from(&args[2]);

    let config = match args.get(3) {
        Some(path) => InpaintConfig::from_file(Path::new(path))?,
        None => InpaintConfig::default(),
    };
    tracing::info!(radius = config.radius, border = ?config.border, "Config");

    let image = load_luma(&image_path)?;
    let mask = load_luma(&mask_path)?.map(|&v| v != 0);
    let masked = mask.iter().filter(|&&m| m).count();
    tracing::info!(
        path = %image_path.display(),
        width = image.width(),
        height = image.height(),
        masked,
        "Loaded image"
    );

    let start = Instant::now();
    let filled = inpaint_u8(&image, &mask, &config)
        .with_context(|| format!("Failed to inpaint '{}'", image_path.display()))?;
    tracing::info!(elapsed = ?start.elapsed(), "Inpainting done");

    save_luma(&filled, &output_path)?;
    tracing::info!(path = %output_path.display(), "Saved");

    Ok(())
}

fn load_luma(path: &Path) -> anyhow::Result<Buffer2<u8>> {
    let luma = ImageReader::open(path)
        .with_context(|| format!("Failed to open '{}'", path.display()))?
        .decode()
        .with_context(|| format!("Failed to decode '{}'", path.display()))?
        .into_luma8();

    let (width, height) = luma.dimensions();
    Ok(Buffer2::new(width as usize, height as usize, luma.into_raw()))
}

fn save_luma(buffer: &Buffer2<u8>, path: &Path) -> anyhow::Result<()> {
    let (width, height) = buffer.dimensions();
    let image = GrayImage::from_raw(width as u32, height as u32, buffer.pixels().to_vec())
        .context("Output buffer does not match its dimensions")?;
    image
        .save(path)
        .with_context(|| format!("Failed to write '{}'", path.display()))
}
