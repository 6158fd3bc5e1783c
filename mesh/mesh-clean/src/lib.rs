//! Point merging for unstructured grids.
//!
//! This crate removes duplicate points from any [`mesh_ugrid::DataSet`]:
//!
//! - **Merging** - points within a tolerance collapse onto the first one seen
//! - **Isolated point removal** - optionally drop points no cell uses
//! - **Cell remapping** - every cell, including polyhedral face streams, is
//!   rewritten against the new point ids in input order
//! - **Attribute carry-through** - point data follows the surviving points,
//!   cell data is copied whole
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**.
//!
//! # Locators
//!
//! Deduplication is delegated to an [`IncrementalLocator`]. With a zero
//! tolerance the stage uses [`MergePoints`], which merges bitwise-equal
//! coordinates; otherwise it uses [`PointLocator`], which merges into the
//! closest point within the tolerance. Callers may supply their own through
//! a [`SharedLocator`] handle.
//!
//! # Example
//!
//! ```
//! use mesh_clean::{CleanParams, CleanUnstructuredGrid};
//! use mesh_ugrid::{Cell, CellType, DataSet, Points, UnstructuredGrid};
//!
//! let points = Points::from_coords(&[
//!     [0.0, 0.0, 0.0],
//!     [1.0, 0.0, 0.0],
//!     [1.0, 0.0, 0.0],
//!     [5.0, 5.0, 5.0],
//! ]);
//! let cells = vec![
//!     Cell::new(CellType::Line, vec![0, 1]).unwrap(),
//!     Cell::new(CellType::Vertex, vec![2]).unwrap(),
//! ];
//! let input = UnstructuredGrid::from_parts(points, cells).unwrap();
//!
//! let params = CleanParams::default().with_remove_points_without_cells(true);
//! let mut filter = CleanUnstructuredGrid::new(params);
//! let output = filter.run(&input).unwrap();
//!
//! // The duplicate merged and the unused point at (5, 5, 5) is gone.
//! assert_eq!(output.point_count(), 2);
//! assert_eq!(output.cell_points(1), vec![1]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod clean;
mod error;
mod locator;
mod params;
mod progress;
mod result;

pub use clean::{CleanUnstructuredGrid, clean_grid};
pub use error::{CleanError, CleanResult};
pub use locator::{
    IncrementalLocator, LocatorKind, MergePoints, PointLocator, SharedLocator, shared,
};
pub use params::{CleanParams, OutputPrecision, ToleranceMode};
pub use progress::{NoProgress, ProgressSink};
pub use result::CleanSummary;
