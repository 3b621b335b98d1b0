//! Intensity synthesis for a pixel leaving the unknown region.
//!
//! Every eligible neighbor `q` of the target `p` predicts `p` to first order,
//! `I(q) + ∇I(q)·(p - q)`, and the predictions are blended with a normalized
//! weight. A neighbor is eligible only if it became Known strictly before the
//! target, and its weight is the product of three factors:
//!
//! - directional: `|cos|` of the angle between the neighbor offset and the
//!   arrival-time gradient, plus `EPSILON` so no eligible neighbor is dropped
//! - geometric: `1 / distance`
//! - level set: `1 / (1 + |ΔT|)`
//!
//! The directional factor keeps isophotes running into the hole instead of
//! smearing across them; the gradient term carries ramps through it. The
//! blend is clamped to the intensity range the grid started with.

use common::EPSILON;
use glam::DVec2;

use crate::grid::{Coord, Grid};

/// One-sided or central difference along an axis.
///
/// `before`/`after` are the neighbor samples on either side of `center`, if
/// usable. Central when both exist, one-sided toward the one that does,
/// zero otherwise.
#[inline]
pub fn axis_derivative(before: Option<f64>, center: f64, after: Option<f64>) -> f64 {
    match (before, after) {
        (Some(b), Some(a)) => (a - b) * 0.5,
        (None, Some(a)) => a - center,
        (Some(b), None) => center - b,
        (None, None) => 0.0,
    }
}

/// Normalizes `(d/dcol, d/drow)`; `None` for a vanishing gradient.
#[inline]
pub fn unit_gradient(d_col: f64, d_row: f64) -> Option<DVec2> {
    let gradient = DVec2::new(d_col, d_row);
    let length = gradient.length();
    (length > EPSILON).then(|| gradient / length)
}

/// Unit direction of increasing arrival time at `coord`, from neighbors
/// resolved before `time`.
pub fn time_gradient(grid: &Grid, coord: Coord, time: f64) -> Option<DVec2> {
    let earlier = |d_row: isize, d_col: isize| -> Option<f64> {
        grid.offset(coord, d_row, d_col)
            .filter(|&neighbor| grid.resolved_before(neighbor, time))
            .map(|neighbor| grid.time(neighbor))
    };

    let d_col = axis_derivative(earlier(0, -1), time, earlier(0, 1));
    let d_row = axis_derivative(earlier(-1, 0), time, earlier(1, 0));
    unit_gradient(d_col, d_row)
}

/// Intensity gradient `(d/dcol, d/drow)` at a Known cell, sampled from its
/// 4-neighbors known before `time`.
///
/// Zero for cells that carry no image structure; such cells are also never
/// sampled.
pub fn intensity_gradient(grid: &Grid, coord: Coord, time: f64) -> DVec2 {
    if !grid.carries_structure(coord) {
        return DVec2::ZERO;
    }

    let sample = |d_row: isize, d_col: isize| -> Option<f64> {
        grid.offset(coord, d_row, d_col)
            .filter(|&neighbor| {
                grid.known_before(neighbor, time) && grid.carries_structure(neighbor)
            })
            .map(|neighbor| grid.value(neighbor))
    };

    let center = grid.value(coord);
    DVec2::new(
        axis_derivative(sample(0, -1), center, sample(0, 1)),
        axis_derivative(sample(-1, 0), center, sample(1, 0)),
    )
}

/// Weight of a neighbor at `offset` (`x` = column, `y` = row) from the target.
///
/// Without a usable gradient the directional factor is 1.
#[inline]
pub fn sample_weight(offset: DVec2, direction: Option<DVec2>, time_delta: f64) -> f64 {
    let distance = offset.length();
    debug_assert!(distance > 0.0);

    let directional = match direction {
        Some(direction) => (offset / distance).dot(direction).abs() + EPSILON,
        None => 1.0,
    };
    let geometric = 1.0 / distance;
    let level_set = 1.0 / (1.0 + time_delta.abs());

    directional * geometric * level_set
}

/// Inclusive index window of half-size `radius` around `center`, clipped to `0..len`.
#[inline]
fn window(center: usize, radius: usize, len: usize) -> (usize, usize) {
    (
        center.saturating_sub(radius),
        center.saturating_add(radius).min(len - 1),
    )
}

/// Synthesizes the intensity of `coord` as if it were resolved at `time`.
///
/// Returns `None` when nothing in the `radius` neighborhood is eligible.
pub fn synthesize(grid: &Grid, coord: Coord, time: f64, radius: usize) -> Option<f64> {
    let direction = time_gradient(grid, coord, time);
    let (row_lo, row_hi) = window(coord.row, radius, grid.height());
    let (col_lo, col_hi) = window(coord.col, radius, grid.width());

    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;
    for row in row_lo..=row_hi {
        for col in col_lo..=col_hi {
            let neighbor = Coord::new(row, col);
            if neighbor == coord || !grid.known_before(neighbor, time) {
                continue;
            }

            // From the target to the neighbor, so the prediction subtracts it.
            let offset = DVec2::new(
                col as f64 - coord.col as f64,
                row as f64 - coord.row as f64,
            );
            let weight = sample_weight(offset, direction, grid.time(neighbor) - time);
            let prediction =
                grid.value(neighbor) - intensity_gradient(grid, neighbor, time).dot(offset);
            weighted_sum += weight * prediction;
            weight_total += weight;
        }
    }

    let (lo, hi) = grid.known_range();
    (weight_total > 0.0).then(|| (weighted_sum / weight_total).max(lo).min(hi))
}
