//! Fast marching controller.
//!
//! Sequences the whole fill: seeds the narrow band with the Unknown cells
//! touching the Known region, then repeatedly finalizes the Band cell with
//! the smallest arrival time and pulls its Unknown neighbors onto the front.
//!
//! The loop is strictly sequential. A cell's time and intensity are computed
//! from cells resolved before it, so the pop sequence is non-decreasing in
//! time and every cell moves `Unknown -> Band -> Known` exactly once.

use std::ops::ControlFlow;

use crate::eikonal;
use crate::error::{ConsistencyFault, Error, FaultStage, Result};
use crate::grid::{CellState, Coord, Grid, NEIGHBOR_OFFSETS};
use crate::narrow_band::NarrowBand;
use crate::synthesize;


/// Hooks into the marching loop.
///
/// All methods default to no-ops. `finalized` is called in pop order and may
/// return `Break` to cancel the run between two pops.
pub trait MarchObserver {
    fn state_changed(&mut self, _coord: Coord, _from: CellState, _to: CellState) {}

    fn finalized(&mut self, _coord: Coord, _time: f64, _value: f64) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

impl MarchObserver for () {}

/// Counters collected over one run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MarchStats {
    /// Cells moved from Band to Known.
    pub finalized: usize,
    /// Band keys lowered after a neighbor was finalized.
    pub key_decreases: usize,
    /// Superseded heap entries skipped by the band.
    pub stale_pops: usize,
    /// Arrival time of the last finalized cell.
    pub max_time: f64,
}

pub struct FastMarching {
    grid: Grid,
    band: NarrowBand,
    radius: usize,
}

impl FastMarching {
    pub fn new(grid: Grid, radius: usize) -> Self {
        assert!(radius >= 1, "radius must be at least 1, got {}", radius);
        let band = NarrowBand::new(grid.width(), grid.height());
        Self { grid, band, radius }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn into_grid(self) -> Grid {
        self.grid
    }

    /// Fills every Unknown cell of the grid.
    ///
    /// On error the grid is left partially filled and must be discarded.
    pub fn run(&mut self, observer: &mut impl MarchObserver) -> Result<MarchStats> {
        let unknown = self.grid.count(CellState::Unknown);
        self.initialize(observer)?;

        tracing::debug!(
            "Marching {}x{} grid: {} unknown, {} on initial front, radius {}",
            self.grid.width(),
            self.grid.height(),
            unknown,
            self.band.len(),
            self.radius
        );

        let mut stats = MarchStats::default();
        while let Some((coord, time)) = self.band.pop_min() {
            debug_assert!(
                time >= stats.max_time,
                "pop order went back in time: {} after {}",
                time,
                stats.max_time
            );

            let value = self.synthesize_at(coord, time)?;
            self.grid.set_value(coord, value);
            self.transition(coord, CellState::Known, observer);
            stats.finalized += 1;
            stats.max_time = time;

            if observer.finalized(coord, time, value).is_break() {
                return Err(Error::Cancelled {
                    finalized: stats.finalized,
                });
            }

            for &(d_row, d_col) in &NEIGHBOR_OFFSETS {
                let Some(neighbor) = self.grid.offset(coord, d_row, d_col) else {
                    continue;
                };
                match self.grid.state(neighbor) {
                    CellState::Unknown => self.enter_band(neighbor, observer)?,
                    CellState::Band => {
                        let candidate = self.arrival_time(neighbor)?;
                        if candidate < self.grid.time(neighbor) {
                            self.grid.set_time(neighbor, candidate);
                            self.band.push_or_update(neighbor, candidate);
                            stats.key_decreases += 1;
                        }
                    }
                    CellState::Known => {}
                }
            }
        }

        stats.stale_pops = self.band.stale_pops();
        debug_assert_eq!(self.grid.count(CellState::Unknown), 0);
        debug_assert_eq!(self.grid.count(CellState::Band), 0);

        tracing::debug!(
            "Marching done: {} finalized, {} key decreases, {} stale pops, max time {:.3}",
            stats.finalized,
            stats.key_decreases,
            stats.stale_pops,
            stats.max_time
        );

        Ok(stats)
    }

    /// Seeds the band with every Unknown cell that touches a Known one.
    ///
    /// Times for the whole initial front are computed before any of it
    /// changes state, so the seed does not depend on scan order. Band cells
    /// carry no intensity until they are popped.
    fn initialize(&mut self, observer: &mut impl MarchObserver) -> Result<()> {
        let grid = &self.grid;
        let front: Vec<Coord> = (0..grid.len())
            .map(|idx| grid.coord_of(idx))
            .filter(|&coord| {
                grid.state(coord) == CellState::Unknown
                    && grid
                        .neighbors(coord)
                        .any(|neighbor| grid.state(neighbor) == CellState::Known)
            })
            .collect();

        let times = front
            .iter()
            .map(|&coord| self.arrival_time(coord))
            .collect::<Result<Vec<_>>>()?;

        for (&coord, &time) in front.iter().zip(&times) {
            self.grid.set_time(coord, time);
            self.transition(coord, CellState::Band, observer);
            self.band.push_or_update(coord, time);
        }

        Ok(())
    }

    /// Moves an Unknown cell onto the front with its arrival time.
    fn enter_band(&mut self, coord: Coord, observer: &mut impl MarchObserver) -> Result<()> {
        let time = self.arrival_time(coord)?;
        self.grid.set_time(coord, time);
        self.transition(coord, CellState::Band, observer);
        self.band.push_or_update(coord, time);
        Ok(())
    }

    fn transition(&mut self, coord: Coord, to: CellState, observer: &mut impl MarchObserver) {
        let from = self.grid.advance(coord, to);
        observer.state_changed(coord, from, to);
    }

    fn arrival_time(&self, coord: Coord) -> Result<f64> {
        eikonal::arrival_time(&self.grid, coord)
            .ok_or_else(|| fault(coord, FaultStage::ArrivalTime))
    }

    fn synthesize_at(&self, coord: Coord, time: f64) -> Result<f64> {
        synthesize::synthesize(&self.grid, coord, time, self.radius)
            .ok_or_else(|| fault(coord, FaultStage::Synthesis))
    }
}

fn fault(coord: Coord, stage: FaultStage) -> Error {
    tracing::error!(
        "Consistency fault during {} at row {}, col {}",
        stage,
        coord.row,
        coord.col
    );
    Error::Consistency(ConsistencyFault { coord, stage })
}
