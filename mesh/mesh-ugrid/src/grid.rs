//! Explicit unstructured grid.

use std::sync::OnceLock;

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    Aabb, AttributeTable, Cell, CellType, DataSet, GridError, GridResult, Points, Precision,
};

/// Point-to-cell incidence in compressed row form.
#[derive(Debug, Clone, Default)]
struct CellLinks {
    offsets: Vec<usize>,
    cells: Vec<usize>,
}

impl CellLinks {
    fn build(point_count: usize, cells: &[Cell]) -> Self {
        let mut counts = vec![0_usize; point_count];
        for cell in cells {
            for id in cell.point_ids() {
                if let Some(c) = counts.get_mut(id as usize) {
                    *c += 1;
                }
            }
        }

        let mut offsets = Vec::with_capacity(point_count + 1);
        offsets.push(0);
        for c in &counts {
            offsets.push(offsets[offsets.len() - 1] + c);
        }

        let mut cursor = offsets[..point_count].to_vec();
        let mut links = vec![0_usize; offsets[point_count]];
        for (cell_id, cell) in cells.iter().enumerate() {
            for id in cell.point_ids() {
                if let Some(slot) = cursor.get_mut(id as usize) {
                    links[*slot] = cell_id;
                    *slot += 1;
                }
            }
        }

        Self {
            offsets,
            cells: links,
        }
    }

    fn cells_of(&self, point: usize) -> &[usize] {
        match (self.offsets.get(point), self.offsets.get(point + 1)) {
            (Some(&start), Some(&end)) => &self.cells[start..end],
            _ => &[],
        }
    }
}

/// A grid of explicit points and arbitrarily typed cells.
///
/// Point-to-cell incidence is built on first use and dropped whenever
/// points or cells change.
///
/// # Example
///
/// ```
/// use mesh_ugrid::{CellType, DataSet, Points, UnstructuredGrid};
///
/// let mut grid = UnstructuredGrid::new();
/// grid.set_points(Points::from_coords(&[
///     [0.0, 0.0, 0.0],
///     [1.0, 0.0, 0.0],
///     [0.0, 1.0, 0.0],
///     [5.0, 5.0, 5.0],
/// ]));
/// grid.add_cell(CellType::Triangle, vec![0, 1, 2]).unwrap();
///
/// let mut cells = Vec::new();
/// grid.point_cells(1, &mut cells);
/// assert_eq!(cells, vec![0]);
/// grid.point_cells(3, &mut cells);
/// assert!(cells.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnstructuredGrid {
    points: Points,
    cells: Vec<Cell>,
    point_data: AttributeTable,
    cell_data: AttributeTable,
    #[cfg_attr(feature = "serde", serde(skip))]
    links: OnceLock<CellLinks>,
}

impl UnstructuredGrid {
    /// Create an empty grid with single-precision points.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a grid from points and cells, checking every point reference.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidPointIndex`] if a cell references a
    /// point that does not exist.
    pub fn from_parts(points: Points, cells: Vec<Cell>) -> GridResult<Self> {
        let point_count = points.len();
        for cell in &cells {
            if let Some(&index) = cell.point_ids().iter().find(|&&id| id as usize >= point_count) {
                return Err(GridError::InvalidPointIndex { index, point_count });
            }
        }
        Ok(Self {
            points,
            cells,
            ..Self::default()
        })
    }

    /// Reserve room for `cell_count` more cells.
    pub fn allocate(&mut self, cell_count: usize) {
        self.cells.reserve(cell_count);
    }

    /// Point coordinates.
    #[must_use]
    pub const fn points(&self) -> &Points {
        &self.points
    }

    /// Replace the point set.
    pub fn set_points(&mut self, points: Points) {
        self.points = points;
        self.links = OnceLock::new();
    }

    /// All cells in order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Append a cell and return its id.
    ///
    /// Point references are not checked against the point set, so cells
    /// may be inserted before their points.
    pub fn insert_next_cell(&mut self, cell: Cell) -> usize {
        self.cells.push(cell);
        self.links = OnceLock::new();
        self.cells.len() - 1
    }

    /// Build a flat cell from a tag and point ids and append it.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::ConnectivityMismatch`] if the ids do not fit
    /// the tag.
    pub fn add_cell(&mut self, cell_type: CellType, points: Vec<u32>) -> GridResult<usize> {
        Ok(self.insert_next_cell(Cell::new(cell_type, points)?))
    }

    /// Per-point attributes.
    #[must_use]
    pub const fn point_data(&self) -> &AttributeTable {
        &self.point_data
    }

    /// Mutable per-point attributes.
    pub const fn point_data_mut(&mut self) -> &mut AttributeTable {
        &mut self.point_data
    }

    /// Per-cell attributes.
    #[must_use]
    pub const fn cell_data(&self) -> &AttributeTable {
        &self.cell_data
    }

    /// Mutable per-cell attributes.
    pub const fn cell_data_mut(&mut self) -> &mut AttributeTable {
        &mut self.cell_data
    }

    /// Release unused capacity in every container.
    pub fn squeeze(&mut self) {
        self.points.shrink_to_fit();
        self.cells.shrink_to_fit();
        self.point_data.squeeze();
        self.cell_data.squeeze();
    }

    /// Check if the grid has neither points nor cells.
    #[must_use]
    pub fn has_no_content(&self) -> bool {
        self.points.is_empty() && self.cells.is_empty()
    }

    fn links(&self) -> &CellLinks {
        self.links
            .get_or_init(|| CellLinks::build(self.points.len(), &self.cells))
    }
}

impl PartialEq for UnstructuredGrid {
    fn eq(&self, other: &Self) -> bool {
        self.points == other.points
            && self.cells == other.cells
            && self.point_data == other.point_data
            && self.cell_data == other.cell_data
    }
}

impl DataSet for UnstructuredGrid {
    fn point_count(&self) -> usize {
        self.points.len()
    }

    fn point(&self, id: usize) -> Option<Point3<f64>> {
        self.points.get(id)
    }

    fn point_cells(&self, id: usize, cells: &mut Vec<usize>) {
        cells.clear();
        cells.extend_from_slice(self.links().cells_of(id));
        // A flat cell may list the same point twice.
        cells.dedup();
    }

    fn cell_count(&self) -> usize {
        self.cells.len()
    }

    fn cell(&self, id: usize) -> Option<Cell> {
        self.cells.get(id).cloned()
    }

    fn point_data(&self) -> &AttributeTable {
        &self.point_data
    }

    fn cell_data(&self) -> &AttributeTable {
        &self.cell_data
    }

    fn bounds(&self) -> Aabb {
        self.points.bounds()
    }

    fn native_precision(&self) -> Option<Precision> {
        Some(self.points.precision())
    }

    fn cell_type(&self, id: usize) -> Option<CellType> {
        self.cells.get(id).map(Cell::cell_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FaceStream;

    fn two_triangles() -> UnstructuredGrid {
        let points = Points::from_coords(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
            [9.0, 9.0, 9.0],
        ]);
        let cells = vec![
            Cell::new(CellType::Triangle, vec![0, 1, 2]).unwrap(),
            Cell::new(CellType::Triangle, vec![0, 2, 3]).unwrap(),
        ];
        UnstructuredGrid::from_parts(points, cells).unwrap()
    }

    #[test]
    fn incidence_lists_every_cell() {
        let grid = two_triangles();
        let mut cells = Vec::new();
        grid.point_cells(0, &mut cells);
        assert_eq!(cells, vec![0, 1]);
        grid.point_cells(1, &mut cells);
        assert_eq!(cells, vec![0]);
        grid.point_cells(4, &mut cells);
        assert!(cells.is_empty());
        grid.point_cells(99, &mut cells);
        assert!(cells.is_empty());
    }

    #[test]
    fn incidence_refreshes_after_insert() {
        let mut grid = two_triangles();
        let mut cells = Vec::new();
        grid.point_cells(4, &mut cells);
        assert!(cells.is_empty());

        grid.add_cell(CellType::Vertex, vec![4]).unwrap();
        grid.point_cells(4, &mut cells);
        assert_eq!(cells, vec![2]);
    }

    #[test]
    fn polyhedron_points_counted_once() {
        let mut grid = two_triangles();
        let stream = FaceStream::from_faces(&[[0_u32, 1, 2], [0, 1, 4], [1, 2, 4], [2, 0, 4]]);
        grid.insert_next_cell(Cell::polyhedron(stream));
        let mut cells = Vec::new();
        grid.point_cells(4, &mut cells);
        assert_eq!(cells, vec![2]);
        grid.point_cells(0, &mut cells);
        assert_eq!(cells, vec![0, 1, 2]);
    }

    #[test]
    fn from_parts_rejects_dangling_reference() {
        let points = Points::from_coords(&[[0.0, 0.0, 0.0]]);
        let cells = vec![Cell::new(CellType::Line, vec![0, 1]).unwrap()];
        let err = UnstructuredGrid::from_parts(points, cells).unwrap_err();
        assert_eq!(err, GridError::InvalidPointIndex { index: 1, point_count: 1 });
    }

    #[test]
    fn dataset_accessors() {
        let grid = two_triangles();
        assert_eq!(grid.point_count(), 5);
        assert_eq!(grid.cell_count(), 2);
        assert_eq!(grid.cell_type(1), Some(CellType::Triangle));
        assert_eq!(grid.cell_points(1), vec![0, 2, 3]);
        assert_eq!(grid.face_stream(0), None);
        assert_eq!(grid.native_precision(), Some(Precision::Double));
        assert!((grid.length() - 243.0_f64.sqrt()).abs() < 1e-12);
    }
}
