//! The read-only capability set shared by every grid flavour.

use nalgebra::Point3;

use crate::{Aabb, AttributeTable, Cell, CellType, Connectivity, FaceStream, Precision};

/// Read access to points, cells and attributes of a dataset.
///
/// Algorithms take `&impl DataSet` so they work on unstructured grids and
/// implicit lattices alike.
pub trait DataSet {
    /// Number of points.
    fn point_count(&self) -> usize;

    /// Coordinates of point `id`.
    ///
    /// Returns `None` if `id` is out of range.
    fn point(&self, id: usize) -> Option<Point3<f64>>;

    /// Ids of the cells that use point `id`, in ascending order.
    ///
    /// `cells` is cleared first. An out-of-range `id` yields no cells.
    fn point_cells(&self, id: usize, cells: &mut Vec<usize>);

    /// Number of cells.
    fn cell_count(&self) -> usize;

    /// Cell `id` with its type tag and connectivity.
    ///
    /// Returns `None` if `id` is out of range.
    fn cell(&self, id: usize) -> Option<Cell>;

    /// Per-point attributes.
    fn point_data(&self) -> &AttributeTable;

    /// Per-cell attributes.
    fn cell_data(&self) -> &AttributeTable;

    /// Bounds of all points.
    fn bounds(&self) -> Aabb;

    /// Characteristic length: the diagonal of [`DataSet::bounds`].
    fn length(&self) -> f64 {
        self.bounds().diagonal_length()
    }

    /// Precision of the stored coordinates, if the dataset stores any.
    ///
    /// Implicit datasets compute coordinates on demand and return `None`.
    fn native_precision(&self) -> Option<Precision> {
        None
    }

    /// Type tag of cell `id`.
    fn cell_type(&self, id: usize) -> Option<CellType> {
        self.cell(id).map(|c| c.cell_type())
    }

    /// Point ids of cell `id` as [`Cell::point_ids`] returns them; empty if
    /// out of range.
    fn cell_points(&self, id: usize) -> Vec<u32> {
        self.cell(id).map(|c| c.point_ids()).unwrap_or_default()
    }

    /// Face stream of cell `id` if it is a polyhedron.
    fn face_stream(&self, id: usize) -> Option<FaceStream> {
        match self.cell(id)?.into_parts() {
            (_, Connectivity::Faces(stream)) => Some(stream),
            (_, Connectivity::Points(_)) => None,
        }
    }

    /// Check if the dataset has no points or no cells.
    fn is_empty(&self) -> bool {
        self.point_count() == 0 || self.cell_count() == 0
    }
}
