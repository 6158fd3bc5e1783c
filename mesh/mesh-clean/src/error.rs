//! Error types for grid cleaning.

use mesh_ugrid::GridError;
use thiserror::Error;

/// Result type for cleaning operations.
pub type CleanResult<T> = Result<T, CleanError>;

/// Errors that can occur while cleaning a grid.
#[derive(Debug, Error)]
pub enum CleanError {
    /// The output grid already holds points or cells.
    #[error("output grid must be empty (has {points} points, {cells} cells)")]
    OutputNotEmpty {
        /// Points already present.
        points: usize,
        /// Cells already present.
        cells: usize,
    },

    /// The locator is borrowed elsewhere for the duration of the run.
    #[error("point locator is already borrowed")]
    LocatorBusy,

    /// The input reported a point id it cannot return coordinates for.
    #[error("input point {point} has no coordinates")]
    MissingPoint {
        /// The point id.
        point: usize,
    },

    /// A cell references a point outside the input.
    #[error("cell {cell} references point {point} (input has {point_count} points)")]
    InvalidPointReference {
        /// The cell id.
        cell: usize,
        /// The referenced point id.
        point: u32,
        /// Number of input points.
        point_count: usize,
    },

    /// A cell references a point that was dropped as having no cells.
    #[error("cell {cell} references point {point}, which was removed as isolated")]
    ExcludedPointReference {
        /// The cell id.
        cell: usize,
        /// The referenced point id.
        point: u32,
    },

    /// Grid construction or attribute copy failed.
    #[error(transparent)]
    Grid(#[from] GridError),
}
