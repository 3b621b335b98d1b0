//! Per-pixel state, arrival time and intensity over the padded working grid.

use common::Buffer2;

use crate::config::BorderMode;

/// Position in the padded grid. Row 0 and column 0 are the border ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Classification of a grid cell during marching.
///
/// Cells only ever move forward: `Unknown -> Band -> Known`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellState {
    /// Trusted intensity, arrival time final.
    Known,
    /// On the front with a provisional arrival time.
    Band,
    /// Not reached yet; arrival time is infinite and intensity undefined.
    Unknown,
}

impl CellState {
    #[inline]
    fn rank(self) -> u8 {
        match self {
            CellState::Unknown => 0,
            CellState::Band => 1,
            CellState::Known => 2,
        }
    }

    /// Known or Band.
    #[inline]
    pub fn is_resolved(self) -> bool {
        self != CellState::Unknown
    }

    #[inline]
    pub fn can_advance_to(self, next: CellState) -> bool {
        next.rank() == self.rank() + 1
    }
}

/// Offsets of the 4-connected neighbors in `(row, col)`: up, left, right, down.
pub const NEIGHBOR_OFFSETS: [(isize, isize); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];

/// Working store for one inpainting run.
#[derive(Debug, Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    states: Vec<CellState>,
    times: Vec<f64>,
    values: Vec<f64>,
    /// Smallest and largest Known intensity at construction.
    known_range: (f64, f64),
    /// Whether the border ring mirrors image content.
    ring_has_structure: bool,
}

impl Grid {
    /// Builds the padded grid from an image and its fill mask.
    ///
    /// The grid is one pixel larger than the image on every side. Border and
    /// unmasked pixels start Known at time 0; masked pixels start Unknown at
    /// infinite time with an undefined (NaN) intensity.
    pub fn new(image: &Buffer2<f32>, mask: &Buffer2<bool>, border: BorderMode) -> Self {
        assert_eq!(
            image.dimensions(),
            mask.dimensions(),
            "image and mask dimensions must match"
        );

        let (image_width, image_height) = image.dimensions();
        let fallback = border_fallback(image, mask);
        let border_value = |x: usize, y: usize| -> f64 {
            match border {
                BorderMode::Constant(value) => value as f64,
                BorderMode::Replicate => {
                    if image.is_empty() {
                        return fallback;
                    }
                    let sx = (x as isize - 1).clamp(0, image_width as isize - 1) as usize;
                    let sy = (y as isize - 1).clamp(0, image_height as isize - 1) as usize;
                    if *mask.get(sx, sy) {
                        fallback
                    } else {
                        *image.get(sx, sy) as f64
                    }
                }
            }
        };

        let values = image.map(|&v| v as f64).padded(1, border_value);
        let mask = mask.padded(1, |_, _| false);

        let states: Vec<CellState> = mask
            .iter()
            .map(|&masked| {
                if masked {
                    CellState::Unknown
                } else {
                    CellState::Known
                }
            })
            .collect();
        let times = mask
            .iter()
            .map(|&masked| if masked { f64::INFINITY } else { 0.0 })
            .collect();
        let mut values = values.into_vec();
        for (value, &masked) in values.iter_mut().zip(mask.iter()) {
            if masked {
                *value = f64::NAN;
            }
        }

        let known_range = states
            .iter()
            .zip(&values)
            .filter(|(state, _)| **state == CellState::Known)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, &v)| {
                (lo.min(v), hi.max(v))
            });

        Self {
            width: mask.width(),
            height: mask.height(),
            states,
            times,
            values,
            known_range,
            ring_has_structure: matches!(border, BorderMode::Replicate),
        }
    }

    /// Number of columns, border included.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows, border included.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    #[inline]
    pub fn index(&self, coord: Coord) -> usize {
        assert!(
            coord.row < self.height && coord.col < self.width,
            "coordinate ({}, {}) outside {}x{} grid",
            coord.row,
            coord.col,
            self.height,
            self.width
        );
        coord.row * self.width + coord.col
    }

    #[inline]
    pub fn coord_of(&self, index: usize) -> Coord {
        Coord::new(index / self.width, index % self.width)
    }

    /// Signed lookup; `None` outside the grid.
    #[inline]
    pub fn checked(&self, row: isize, col: isize) -> Option<Coord> {
        if row < 0 || col < 0 {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        (row < self.height && col < self.width).then_some(Coord::new(row, col))
    }

    #[inline]
    pub fn offset(&self, coord: Coord, d_row: isize, d_col: isize) -> Option<Coord> {
        self.checked(coord.row as isize + d_row, coord.col as isize + d_col)
    }

    /// In-bounds 4-connected neighbors: up, left, right, down.
    pub fn neighbors(&self, coord: Coord) -> impl Iterator<Item = Coord> + '_ {
        NEIGHBOR_OFFSETS
            .iter()
            .filter_map(move |&(d_row, d_col)| self.offset(coord, d_row, d_col))
    }

    #[inline]
    pub fn state(&self, coord: Coord) -> CellState {
        self.states[self.index(coord)]
    }

    #[inline]
    pub fn time(&self, coord: Coord) -> f64 {
        self.times[self.index(coord)]
    }

    #[inline]
    pub fn value(&self, coord: Coord) -> f64 {
        self.values[self.index(coord)]
    }

    #[inline]
    pub fn set_time(&mut self, coord: Coord, time: f64) {
        let idx = self.index(coord);
        self.times[idx] = time;
    }

    #[inline]
    pub fn set_value(&mut self, coord: Coord, value: f64) {
        let idx = self.index(coord);
        self.values[idx] = value;
    }

    /// Moves a cell one step forward along `Unknown -> Band -> Known`.
    ///
    /// Panics on any other transition.
    pub fn advance(&mut self, coord: Coord, next: CellState) -> CellState {
        let idx = self.index(coord);
        let previous = self.states[idx];
        assert!(
            previous.can_advance_to(next),
            "illegal state transition {:?} -> {:?} at ({}, {})",
            previous,
            next,
            coord.row,
            coord.col
        );
        self.states[idx] = next;
        previous
    }

    /// Resolved with an arrival time strictly before `time`.
    ///
    /// Only such cells may feed a pixel resolved at `time`.
    #[inline]
    pub fn resolved_before(&self, coord: Coord, time: f64) -> bool {
        let idx = self.index(coord);
        self.states[idx].is_resolved() && self.times[idx] < time
    }

    /// Known with an arrival time strictly before `time`.
    ///
    /// Band cells have a time but no intensity yet, so only these cells may
    /// lend their value to a pixel resolved at `time`.
    #[inline]
    pub fn known_before(&self, coord: Coord, time: f64) -> bool {
        let idx = self.index(coord);
        self.states[idx] == CellState::Known && self.times[idx] < time
    }

    /// Cell of the 1-pixel padding ring.
    #[inline]
    pub fn is_ring(&self, coord: Coord) -> bool {
        coord.row == 0
            || coord.col == 0
            || coord.row + 1 == self.height
            || coord.col + 1 == self.width
    }

    /// Whether the cell's intensity reflects image structure.
    ///
    /// A constant ring is a fill level, not content, so it has no intensity
    /// gradient and does not feed one.
    #[inline]
    pub fn carries_structure(&self, coord: Coord) -> bool {
        self.ring_has_structure || !self.is_ring(coord)
    }

    /// `(min, max)` of the Known intensities the grid started with.
    #[inline]
    pub fn known_range(&self) -> (f64, f64) {
        self.known_range
    }

    pub fn count(&self, state: CellState) -> usize {
        self.states.iter().filter(|&&s| s == state).count()
    }

    /// Intensities with the border ring stripped, back in image coordinates.
    pub fn interior_values(&self) -> Buffer2<f32> {
        Buffer2::new(
            self.width,
            self.height,
            self.values.iter().map(|&v| v as f32).collect(),
        )
        .cropped(1)
    }
}

/// Mean of the unmasked image pixels, used for border pixels whose source is masked.
fn border_fallback(image: &Buffer2<f32>, mask: &Buffer2<bool>) -> f64 {
    let (sum, count) = image
        .iter()
        .zip(mask.iter())
        .filter(|(_, masked)| !**masked)
        .fold((0.0f64, 0usize), |(sum, count), (&v, _)| {
            (sum + v as f64, count + 1)
        });
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp_3x2() -> (Buffer2<f32>, Buffer2<bool>) {
        // row 0 = [0, 1, 2], row 1 = [10, 11, 12]
        let image = Buffer2::from_fn(3, 2, |x, y| (10 * y + x) as f32);
        let mask = Buffer2::from_fn(3, 2, |x, y| x == 1 && y == 1);
        (image, mask)
    }

    #[test]
    fn test_new_pads_by_one() {
        let (image, mask) = ramp_3x2();
        let grid = Grid::new(&image, &mask, BorderMode::Replicate);
        assert_eq!(grid.width(), 5);
        assert_eq!(grid.height(), 4);
        assert_eq!(grid.len(), 20);
    }

    #[test]
    fn test_new_initial_states() {
        let (image, mask) = ramp_3x2();
        let grid = Grid::new(&image, &mask, BorderMode::Replicate);

        let hole = Coord::new(2, 2);
        assert_eq!(grid.state(hole), CellState::Unknown);
        assert_eq!(grid.time(hole), f64::INFINITY);
        assert!(grid.value(hole).is_nan());

        assert_eq!(grid.count(CellState::Unknown), 1);
        assert_eq!(grid.count(CellState::Known), 19);
        assert_eq!(grid.state(Coord::new(0, 0)), CellState::Known);
        assert_eq!(grid.time(Coord::new(0, 0)), 0.0);
        assert_eq!(grid.value(Coord::new(1, 3)), 2.0);
    }

    #[test]
    fn test_replicate_border_copies_nearest_pixel() {
        let (image, mask) = ramp_3x2();
        let grid = Grid::new(&image, &mask, BorderMode::Replicate);
        assert_eq!(grid.value(Coord::new(0, 0)), 0.0);
        assert_eq!(grid.value(Coord::new(0, 4)), 2.0);
        assert_eq!(grid.value(Coord::new(3, 0)), 10.0);
        assert_eq!(grid.value(Coord::new(3, 4)), 12.0);
    }

    #[test]
    fn test_replicate_border_falls_back_to_known_mean_under_mask() {
        let (image, mask) = ramp_3x2();
        let grid = Grid::new(&image, &mask, BorderMode::Replicate);
        // Below the masked pixel (x=1, y=1): mean of 0, 1, 2, 10, 12 = 5
        assert!((grid.value(Coord::new(3, 2)) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_border() {
        let (image, mask) = ramp_3x2();
        let grid = Grid::new(&image, &mask, BorderMode::Constant(7.5));
        assert_eq!(grid.value(Coord::new(0, 0)), 7.5);
        assert_eq!(grid.value(Coord::new(3, 2)), 7.5);
        assert_eq!(grid.value(Coord::new(1, 1)), 0.0);
    }

    #[test]
    fn test_known_range_covers_image_and_ring() {
        let (image, mask) = ramp_3x2();
        let grid = Grid::new(&image, &mask, BorderMode::Replicate);
        assert_eq!(grid.known_range(), (0.0, 12.0));

        let grid = Grid::new(&image, &mask, BorderMode::Constant(-4.0));
        assert_eq!(grid.known_range(), (-4.0, 12.0));
    }

    #[test]
    fn test_only_replicated_ring_carries_structure() {
        let (image, mask) = ramp_3x2();
        let replicate = Grid::new(&image, &mask, BorderMode::Replicate);
        let constant = Grid::new(&image, &mask, BorderMode::Constant(0.0));

        for coord in [Coord::new(0, 2), Coord::new(3, 4), Coord::new(2, 0)] {
            assert!(replicate.is_ring(coord));
            assert!(replicate.carries_structure(coord));
            assert!(!constant.carries_structure(coord));
        }
        let inner = Coord::new(1, 1);
        assert!(!constant.is_ring(inner));
        assert!(constant.carries_structure(inner));
    }

    #[test]
    fn test_neighbors_are_bounded_and_ordered() {
        let (image, mask) = ramp_3x2();
        let grid = Grid::new(&image, &mask, BorderMode::Replicate);

        let inner: Vec<_> = grid.neighbors(Coord::new(2, 2)).collect();
        assert_eq!(
            inner,
            vec![
                Coord::new(1, 2),
                Coord::new(2, 1),
                Coord::new(2, 3),
                Coord::new(3, 2)
            ]
        );

        let corner: Vec<_> = grid.neighbors(Coord::new(0, 0)).collect();
        assert_eq!(corner, vec![Coord::new(0, 1), Coord::new(1, 0)]);
    }

    #[test]
    fn test_checked_rejects_out_of_range() {
        let (image, mask) = ramp_3x2();
        let grid = Grid::new(&image, &mask, BorderMode::Replicate);
        assert_eq!(grid.checked(-1, 0), None);
        assert_eq!(grid.checked(0, 5), None);
        assert_eq!(grid.checked(4, 0), None);
        assert_eq!(grid.checked(3, 4), Some(Coord::new(3, 4)));
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn test_index_panics_out_of_range() {
        let (image, mask) = ramp_3x2();
        let grid = Grid::new(&image, &mask, BorderMode::Replicate);
        grid.state(Coord::new(4, 0));
    }

    #[test]
    fn test_advance_moves_forward_only() {
        let (image, mask) = ramp_3x2();
        let mut grid = Grid::new(&image, &mask, BorderMode::Replicate);
        let hole = Coord::new(2, 2);
        assert_eq!(grid.advance(hole, CellState::Band), CellState::Unknown);
        assert_eq!(grid.advance(hole, CellState::Known), CellState::Band);
        assert_eq!(grid.state(hole), CellState::Known);
    }

    #[test]
    #[should_panic(expected = "illegal state transition")]
    fn test_advance_rejects_regression() {
        let (image, mask) = ramp_3x2();
        let mut grid = Grid::new(&image, &mask, BorderMode::Replicate);
        grid.advance(Coord::new(0, 0), CellState::Band);
    }

    #[test]
    #[should_panic(expected = "illegal state transition")]
    fn test_advance_rejects_skipping_band() {
        let (image, mask) = ramp_3x2();
        let mut grid = Grid::new(&image, &mask, BorderMode::Replicate);
        grid.advance(Coord::new(2, 2), CellState::Known);
    }

    #[test]
    fn test_resolved_before_is_strict() {
        let (image, mask) = ramp_3x2();
        let mut grid = Grid::new(&image, &mask, BorderMode::Replicate);
        let hole = Coord::new(2, 2);
        assert!(grid.resolved_before(Coord::new(1, 1), 0.5));
        assert!(!grid.resolved_before(Coord::new(1, 1), 0.0));
        assert!(!grid.resolved_before(hole, 10.0));

        grid.advance(hole, CellState::Band);
        grid.set_time(hole, 1.0);
        assert!(grid.resolved_before(hole, 1.5));
        assert!(!grid.resolved_before(hole, 1.0));
    }

    #[test]
    fn test_band_cells_lend_time_but_not_value() {
        let (image, mask) = ramp_3x2();
        let mut grid = Grid::new(&image, &mask, BorderMode::Replicate);
        let hole = Coord::new(2, 2);
        assert!(grid.known_before(Coord::new(1, 1), 0.5));
        assert!(!grid.known_before(Coord::new(1, 1), 0.0));

        grid.advance(hole, CellState::Band);
        grid.set_time(hole, 1.0);
        assert!(grid.resolved_before(hole, 1.5));
        assert!(!grid.known_before(hole, 1.5));

        grid.advance(hole, CellState::Known);
        assert!(grid.known_before(hole, 1.5));
    }

    #[test]
    fn test_interior_values_strip_border() {
        let (image, mask) = ramp_3x2();
        let mut grid = Grid::new(&image, &mask, BorderMode::Replicate);
        grid.set_value(Coord::new(2, 2), 6.0);
        let interior = grid.interior_values();
        assert_eq!(interior.dimensions(), (3, 2));
        assert_eq!(interior.pixels(), &[0.0, 1.0, 2.0, 10.0, 6.0, 12.0]);
    }
}
