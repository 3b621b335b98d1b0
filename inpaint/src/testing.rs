//! Testing utilities for inpaint.

#![allow(dead_code)]

use common::Buffer2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Initialize tracing subscriber for tests.
/// Safe to call multiple times - will only initialize once.
/// Respects RUST_LOG env var, defaults to "info".
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// `8 * row + col` over an 8x8 image, values 0..=63.
pub fn ramp_8x8() -> Buffer2<f32> {
    Buffer2::from_fn(8, 8, |x, y| (8 * y + x) as f32)
}

/// Masks the axis-aligned rectangle `[x0, x1) x [y0, y1)`.
pub fn rect_mask(
    width: usize,
    height: usize,
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize,
) -> Buffer2<bool> {
    Buffer2::from_fn(width, height, |x, y| {
        (x0..x1).contains(&x) && (y0..y1).contains(&y)
    })
}

/// Masks pixels within `radius` of `(cx, cy)`.
pub fn disc_mask(width: usize, height: usize, cx: f64, cy: f64, radius: f64) -> Buffer2<bool> {
    Buffer2::from_fn(width, height, |x, y| {
        let dx = x as f64 - cx;
        let dy = y as f64 - cy;
        dx * dx + dy * dy <= radius * radius
    })
}

/// Rotates an image by 180 degrees.
pub fn rotate_180<T: Clone>(buffer: &Buffer2<T>) -> Buffer2<T> {
    let (w, h) = buffer.dimensions();
    Buffer2::from_fn(w, h, |x, y| buffer.get(w - 1 - x, h - 1 - y).clone())
}

/// Random image and mask with at least one unmasked pixel.
pub struct RandomCase {
    pub image: Buffer2<f32>,
    pub mask: Buffer2<bool>,
}

impl RandomCase {
    pub fn generate(rng: &mut StdRng, max_side: usize, fill: f64) -> Self {
        let width = rng.random_range(1..=max_side);
        let height = rng.random_range(1..=max_side);
        let image = Buffer2::from_fn(width, height, |_, _| rng_value(rng));
        let mut mask = Buffer2::from_fn(width, height, |_, _| rng.random_bool(fill));

        let keep_x = rng.random_range(0..width);
        let keep_y = rng.random_range(0..height);
        *mask.get_mut(keep_x, keep_y) = false;

        Self { image, mask }
    }

    pub fn masked_count(&self) -> usize {
        self.mask.iter().filter(|&&masked| masked).count()
    }
}

fn rng_value(rng: &mut StdRng) -> f32 {
    rng.random_range(0.0f32..255.0)
}

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}
