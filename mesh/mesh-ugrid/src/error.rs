//! Error types for grid construction.

use thiserror::Error;

use crate::CellType;

/// Result type for grid operations.
pub type GridResult<T> = Result<T, GridError>;

/// Errors raised while building or querying a grid.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    /// A point index is outside the point set.
    #[error("invalid point index {index} (grid has {point_count} points)")]
    InvalidPointIndex {
        /// The offending index.
        index: u32,
        /// Number of points in the grid.
        point_count: usize,
    },

    /// A cell index is outside the cell set.
    #[error("invalid cell index {index} (grid has {cell_count} cells)")]
    InvalidCellIndex {
        /// The offending index.
        index: usize,
        /// Number of cells in the grid.
        cell_count: usize,
    },

    /// A polyhedral face stream does not follow its own counts.
    #[error("malformed face stream: {reason}")]
    MalformedFaceStream {
        /// What is wrong with the stream.
        reason: String,
    },

    /// A data array length is not a multiple of its component count.
    #[error("array '{name}' has {len} values, not a multiple of {components} components")]
    ComponentMismatch {
        /// Array name.
        name: String,
        /// Number of scalar values supplied.
        len: usize,
        /// Components per tuple.
        components: usize,
    },

    /// Attribute columns disagree in layout, or a tuple index is out of range.
    #[error("attribute array '{name}' does not match the source table")]
    AttributeMismatch {
        /// Array name.
        name: String,
    },

    /// A cell tag was given connectivity of the wrong shape.
    #[error("cell type {cell_type:?} cannot hold this connectivity")]
    ConnectivityMismatch {
        /// The tag that was requested.
        cell_type: CellType,
    },

    /// An image grid was built with a zero dimension or non-positive spacing.
    #[error("invalid image layout: {reason}")]
    InvalidImage {
        /// What is wrong with the layout.
        reason: String,
    },
}
