//! Min-priority queue of Band cells keyed by arrival time.
//!
//! `BinaryHeap` has no decrease-key, so lowering a key pushes a fresh entry
//! and the old one is left behind. A dense per-cell key table tells live
//! entries from stale ones at pop time.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::grid::Coord;

#[derive(Debug, Clone, Copy)]
struct BandEntry {
    time: f64,
    coord: Coord,
}

impl PartialEq for BandEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for BandEntry {}

impl Ord for BandEntry {
    /// Time first, then row-major coordinate order for equal times.
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .total_cmp(&other.time)
            .then_with(|| self.coord.cmp(&other.coord))
    }
}

impl PartialOrd for BandEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug)]
pub struct NarrowBand {
    heap: BinaryHeap<Reverse<BandEntry>>,
    /// Current key per cell; `None` when the cell is not in the band.
    keys: Vec<Option<f64>>,
    width: usize,
    live: usize,
    stale_pops: usize,
}

impl NarrowBand {
    /// Empty band over a `width` x `height` grid.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            heap: BinaryHeap::new(),
            keys: vec![None; width * height],
            width,
            live: 0,
            stale_pops: 0,
        }
    }

    #[inline]
    fn slot(&self, coord: Coord) -> usize {
        debug_assert!(coord.col < self.width);
        coord.row * self.width + coord.col
    }

    /// Inserts `coord` or lowers its key.
    ///
    /// A time not below the current key is ignored, so keys never increase.
    /// Returns whether the band changed.
    pub fn push_or_update(&mut self, coord: Coord, time: f64) -> bool {
        let slot = self.slot(coord);
        match self.keys[slot] {
            Some(current) if time >= current => return false,
            Some(_) => {}
            None => self.live += 1,
        }
        self.keys[slot] = Some(time);
        self.heap.push(Reverse(BandEntry { time, coord }));
        true
    }

    /// Removes and returns the live entry with the smallest time.
    pub fn pop_min(&mut self) -> Option<(Coord, f64)> {
        while let Some(Reverse(entry)) = self.heap.pop() {
            let slot = self.slot(entry.coord);
            match self.keys[slot] {
                Some(key) if key == entry.time => {
                    self.keys[slot] = None;
                    self.live -= 1;
                    return Some((entry.coord, entry.time));
                }
                _ => self.stale_pops += 1,
            }
        }
        None
    }

    #[inline]
    pub fn contains(&self, coord: Coord) -> bool {
        self.keys[self.slot(coord)].is_some()
    }

    /// Current key of `coord`, if it is in the band.
    #[inline]
    pub fn key(&self, coord: Coord) -> Option<f64> {
        self.keys[self.slot(coord)]
    }

    /// Number of live entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.live
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Superseded heap entries discarded so far.
    #[inline]
    pub fn stale_pops(&self) -> usize {
        self.stale_pops
    }
}
