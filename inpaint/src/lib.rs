//! Grayscale image inpainting with the Fast Marching Method.
//!
//! Masked pixels are filled in order of their distance from the known
//! region. A front advances from the mask boundary inward; each pixel it
//! crosses gets an arrival time from an upwind Eikonal solve and an
//! intensity from a weighted blend of first-order predictions made by pixels
//! the front has already passed.
//!
//! ```no_run
//! use common::Buffer2;
//! use inpaint::{inpaint, InpaintConfig};
//!
//! let image = Buffer2::from_fn(8, 8, |x, y| (8 * y + x) as f32);
//! let mask = Buffer2::from_fn(8, 8, |x, y| (2..6).contains(&x) && (2..6).contains(&y));
//! let filled = inpaint(&image, &mask, &InpaintConfig::default()).unwrap();
//! assert_eq!(filled.dimensions(), (8, 8));
//! ```

pub mod api;
pub mod config;
pub mod eikonal;
pub mod error;
pub mod grid;
pub mod march;
pub mod narrow_band;
pub mod synthesize;

#[cfg(test)]
mod testing;

pub use api::{inpaint, inpaint_batch, inpaint_u8, inpaint_with_observer, InpaintJob};
pub use config::{BorderMode, InpaintConfig, DEFAULT_RADIUS};
pub use error::{ConsistencyFault, Error, FaultStage, Result};
pub use grid::{CellState, Coord, Grid};
pub use march::{FastMarching, MarchObserver, MarchStats};
pub use narrow_band::NarrowBand;
