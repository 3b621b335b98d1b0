//! Error types for inpainting.

use thiserror::Error;

use crate::grid::Coord;

/// Stage of the marching loop in which a consistency fault surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultStage {
    /// Arrival time solve found no resolved 4-neighbor.
    ArrivalTime,
    /// Intensity synthesis found no eligible pixel in the neighborhood.
    Synthesis,
}

impl std::fmt::Display for FaultStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FaultStage::ArrivalTime => write!(f, "arrival time"),
            FaultStage::Synthesis => write!(f, "synthesis"),
        }
    }
}

/// A pixel was reached without the resolved neighbors marching guarantees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsistencyFault {
    pub coord: Coord,
    pub stage: FaultStage,
}

/// Errors that can occur during inpainting.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Mask dimensions {mask:?} do not match image dimensions {image:?}")]
    ShapeMismatch {
        image: (usize, usize),
        mask: (usize, usize),
    },

    #[error("Radius must be at least 1, got {0}")]
    InvalidRadius(usize),

    #[error("Image has zero area")]
    EmptyImage,

    #[error("Mask covers the whole image, nothing to inpaint from")]
    NoKnownPixels,

    #[error(
        "Internal consistency fault during {} at row {}, col {}",
        .0.stage,
        .0.coord.row,
        .0.coord.col
    )]
    Consistency(ConsistencyFault),

    #[error("Inpainting cancelled after {finalized} pixels")]
    Cancelled { finalized: usize },
}

impl Error {
    /// Whether the error stems from caller-supplied arguments.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Error::ShapeMismatch { .. }
                | Error::InvalidRadius(_)
                | Error::EmptyImage
                | Error::NoKnownPixels
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
