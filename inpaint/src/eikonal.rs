//! Upwind finite-difference solve of `|∇T| = 1` on the 4-connected grid.
//!
//! Each axis contributes the smaller arrival time of its two opposite
//! neighbors, counting only resolved (Known or Band) cells. With both axes
//! informative the discrete equation
//!
//! ```text
//! (T - Tx)² + (T - Ty)² = 1
//! ```
//!
//! is solved for its upper root, which is never below `max(Tx, Ty)`. The root
//! only exists with that property while `|Tx - Ty| < 1`; past that the front
//! is effectively one-dimensional and `min(Tx, Ty) + 1` is used.

use crate::grid::{Coord, Grid};

/// Smaller of the two opposite-neighbor times along one axis.
#[inline]
pub fn axis_min(before: Option<f64>, after: Option<f64>) -> Option<f64> {
    match (before, after) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (Some(a), None) | (None, Some(a)) => Some(a),
        (None, None) => None,
    }
}

/// Arrival time from per-axis upwind minima.
///
/// Returns `None` when neither axis has a resolved neighbor.
pub fn solve_arrival_time(horizontal: Option<f64>, vertical: Option<f64>) -> Option<f64> {
    match (horizontal, vertical) {
        (Some(tx), Some(ty)) => {
            let diff = tx - ty;
            if diff.abs() < 1.0 {
                Some((tx + ty + (2.0 - diff * diff).sqrt()) * 0.5)
            } else {
                Some(tx.min(ty) + 1.0)
            }
        }
        (Some(t), None) | (None, Some(t)) => Some(t + 1.0),
        (None, None) => None,
    }
}

/// Candidate arrival time for `coord` from the grid's current resolved neighbors.
pub fn arrival_time(grid: &Grid, coord: Coord) -> Option<f64> {
    let resolved_time = |d_row: isize, d_col: isize| -> Option<f64> {
        let neighbor = grid.offset(coord, d_row, d_col)?;
        grid.state(neighbor)
            .is_resolved()
            .then(|| grid.time(neighbor))
    };

    let horizontal = axis_min(resolved_time(0, -1), resolved_time(0, 1));
    let vertical = axis_min(resolved_time(-1, 0), resolved_time(1, 0));
    solve_arrival_time(horizontal, vertical)
}
