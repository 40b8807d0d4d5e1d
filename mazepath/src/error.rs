use thiserror::Error;

use crate::grid::Point;

/// Errors raised while building a grid or preparing a search on it.
///
/// An unreachable goal is not an error, see [`crate::find::PathFinderState::NoPathFound`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("grid must be at least 1x1, got {width}x{height}")]
    MalformedGrid { width: usize, height: usize },

    #[error("a {width}x{height} grid does not fit in memory")]
    TooLarge { width: usize, height: usize },

    #[error("expected {expected} cells for the grid, got {got}")]
    SizeMismatch { expected: usize, got: usize },

    #[error("point {point} is outside the {width}x{height} grid")]
    OutOfBounds {
        point: Point,
        width: usize,
        height: usize,
    },

    #[error("storage for a {got_width}x{got_height} grid used on a {width}x{height} grid")]
    StorageMismatch {
        width: usize,
        height: usize,
        got_width: usize,
        got_height: usize,
    },

    #[error("scale factor must be at least 1")]
    InvalidScale,
}
