//! Unstructured grid types for CortenForge.
//!
//! This crate provides the data model for volumetric and mixed-topology
//! meshes:
//!
//! - [`Points`] - Coordinates with an explicit [`Precision`]
//! - [`Cell`] - A [`CellType`] tag with flat or polyhedral [`Connectivity`]
//! - [`FaceStream`] - Nested face encoding of a polyhedral cell
//! - [`AttributeTable`] - Named per-point or per-cell [`DataArray`] columns
//! - [`UnstructuredGrid`] - Explicit points and cells
//! - [`ImageGrid`] - Implicit regular lattice
//! - [`DataSet`] - The read-only capability set both grids implement
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**.
//!
//! # Example
//!
//! ```
//! use mesh_ugrid::{Cell, CellType, DataSet, FaceStream, Points, UnstructuredGrid};
//!
//! let points = Points::from_coords(&[
//!     [0.0, 0.0, 0.0],
//!     [1.0, 0.0, 0.0],
//!     [0.0, 1.0, 0.0],
//!     [0.0, 0.0, 1.0],
//! ]);
//! let tetra = FaceStream::from_faces(&[[0_u32, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]]);
//! let cells = vec![
//!     Cell::polyhedron(tetra),
//!     Cell::new(CellType::Triangle, vec![0, 1, 2]).unwrap(),
//! ];
//!
//! let grid = UnstructuredGrid::from_parts(points, cells).unwrap();
//! assert_eq!(grid.cell_count(), 2);
//! assert_eq!(grid.face_stream(0).map(|s| s.face_count()), Some(4));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod attributes;
mod bounds;
mod cell;
mod dataset;
mod error;
mod face_stream;
mod grid;
mod image;
mod points;

pub use attributes::{ArrayValues, AttributeTable, DataArray, ValueKind};
pub use bounds::Aabb;
pub use cell::{Cell, CellType, Connectivity};
pub use dataset::DataSet;
pub use error::{GridError, GridResult};
pub use face_stream::{FaceStream, Faces};
pub use grid::UnstructuredGrid;
pub use image::ImageGrid;
pub use points::{Points, Precision};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
