//! Entry points: validate inputs, build the grid, march, strip the border.

use std::time::Instant;

use common::Buffer2;
use rayon::prelude::*;

use crate::config::InpaintConfig;
use crate::error::{Error, Result};
use crate::grid::Grid;
use crate::march::{FastMarching, MarchObserver};

/// Fills every masked pixel of `image`.
///
/// `mask` must match the image dimensions; `true` marks a pixel to fill.
/// Unmasked pixels are returned unchanged.
pub fn inpaint(
    image: &Buffer2<f32>,
    mask: &Buffer2<bool>,
    config: &InpaintConfig,
) -> Result<Buffer2<f32>> {
    inpaint_with_observer(image, mask, config, &mut ())
}

/// [`inpaint`] with hooks into the marching loop.
///
/// The observer can cancel the run, in which case no output is produced.
pub fn inpaint_with_observer(
    image: &Buffer2<f32>,
    mask: &Buffer2<bool>,
    config: &InpaintConfig,
    observer: &mut impl MarchObserver,
) -> Result<Buffer2<f32>> {
    let masked = validate(image, mask, config)?;
    if masked == 0 {
        return Ok(image.clone());
    }

    let start = Instant::now();
    let grid = Grid::new(image, mask, config.border);
    let mut marching = FastMarching::new(grid, config.radius);
    let stats = marching.run(observer)?;

    tracing::info!(
        "Inpainted {} of {} pixels ({}x{}, radius {}) in {:.1?}",
        stats.finalized,
        image.len(),
        image.width(),
        image.height(),
        config.radius,
        start.elapsed()
    );

    Ok(marching.into_grid().interior_values())
}

/// 8-bit convenience wrapper around [`inpaint`].
///
/// Filled values are clamped to `0..=255` and rounded half away from zero.
pub fn inpaint_u8(
    image: &Buffer2<u8>,
    mask: &Buffer2<bool>,
    config: &InpaintConfig,
) -> Result<Buffer2<u8>> {
    let filled = inpaint(&image.map(|&v| v as f32), mask, config)?;
    Ok(filled.map(|&v| to_u8(v)))
}

#[inline]
fn to_u8(value: f32) -> u8 {
    value.clamp(0.0, 255.0).round() as u8
}

/// One image and its mask for [`inpaint_batch`].
#[derive(Debug, Clone)]
pub struct InpaintJob {
    pub image: Buffer2<f32>,
    pub mask: Buffer2<bool>,
}

impl InpaintJob {
    pub fn new(image: Buffer2<f32>, mask: Buffer2<bool>) -> Self {
        Self { image, mask }
    }
}

/// Inpaints independent jobs in parallel.
///
/// Each job marches sequentially on its own grid; results keep job order.
pub fn inpaint_batch(jobs: &[InpaintJob], config: &InpaintConfig) -> Vec<Result<Buffer2<f32>>> {
    tracing::debug!("Inpainting batch of {} jobs", jobs.len());
    jobs.par_iter()
        .map(|job| inpaint(&job.image, &job.mask, config))
        .collect()
}

/// Checks arguments in a fixed order and returns the number of masked pixels.
fn validate(image: &Buffer2<f32>, mask: &Buffer2<bool>, config: &InpaintConfig) -> Result<usize> {
    if image.dimensions() != mask.dimensions() {
        return Err(Error::ShapeMismatch {
            image: image.dimensions(),
            mask: mask.dimensions(),
        });
    }
    config.validate()?;
    if image.is_empty() {
        return Err(Error::EmptyImage);
    }

    let masked = mask.iter().filter(|&&m| m).count();
    if masked == mask.len() {
        return Err(Error::NoKnownPixels);
    }
    Ok(masked)
}
