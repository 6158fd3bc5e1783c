//! Implicit regular lattice.
//!
//! Points and cells of an [`ImageGrid`] are computed from its dimensions,
//! origin and spacing; nothing is stored per point except attributes.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Aabb, AttributeTable, Cell, CellType, DataSet, GridError, GridResult};

/// A regular lattice of points with axis-aligned cells.
///
/// Point `(i, j, k)` has id `i + nx * (j + ny * k)`. Cells span one
/// lattice step along every axis with more than one point, so a lattice
/// of dimensions `[4, 3, 1]` holds pixels and `[4, 1, 1]` holds lines.
///
/// # Example
///
/// ```
/// use mesh_ugrid::{CellType, DataSet, ImageGrid, Point3, Vector3};
///
/// let image = ImageGrid::new([3, 3, 3], Point3::origin(), Vector3::new(1.0, 1.0, 1.0)).unwrap();
/// assert_eq!(image.point_count(), 27);
/// assert_eq!(image.cell_count(), 8);
/// assert_eq!(image.cell_type(0), Some(CellType::Voxel));
/// assert_eq!(image.native_precision(), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ImageGrid {
    dimensions: [usize; 3],
    origin: Point3<f64>,
    spacing: Vector3<f64>,
    point_data: AttributeTable,
    cell_data: AttributeTable,
}

impl ImageGrid {
    /// Create a lattice.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidImage`] if a dimension is zero or a
    /// spacing is not a positive finite number.
    pub fn new(dimensions: [usize; 3], origin: Point3<f64>, spacing: Vector3<f64>) -> GridResult<Self> {
        if dimensions.contains(&0) {
            return Err(GridError::InvalidImage {
                reason: format!("zero dimension in {dimensions:?}"),
            });
        }
        if spacing.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(GridError::InvalidImage {
                reason: format!("spacing {spacing:?} must be positive"),
            });
        }
        Ok(Self {
            dimensions,
            origin,
            spacing,
            point_data: AttributeTable::new(),
            cell_data: AttributeTable::new(),
        })
    }

    /// Points per axis.
    #[must_use]
    pub const fn dimensions(&self) -> [usize; 3] {
        self.dimensions
    }

    /// Mutable per-point attributes.
    pub const fn point_data_mut(&mut self) -> &mut AttributeTable {
        &mut self.point_data
    }

    /// Mutable per-cell attributes.
    pub const fn cell_data_mut(&mut self) -> &mut AttributeTable {
        &mut self.cell_data
    }

    /// Number of axes with more than one point.
    #[must_use]
    pub fn data_dimension(&self) -> usize {
        self.dimensions.iter().filter(|&&n| n > 1).count()
    }

    /// Cells per axis; an axis with one point contributes one cell layer.
    fn cell_dimensions(&self) -> [usize; 3] {
        self.dimensions.map(|n| n.saturating_sub(1).max(1))
    }

    fn axis_step(&self) -> [usize; 3] {
        self.dimensions.map(|n| usize::from(n > 1))
    }

    fn point_ijk(&self, id: usize) -> [usize; 3] {
        let [nx, ny, _] = self.dimensions;
        [id % nx, (id / nx) % ny, id / (nx * ny)]
    }

    fn point_id(&self, [i, j, k]: [usize; 3]) -> usize {
        let [nx, ny, _] = self.dimensions;
        i + nx * (j + ny * k)
    }

    fn cell_kind(&self) -> CellType {
        match self.data_dimension() {
            0 => CellType::Vertex,
            1 => CellType::Line,
            2 => CellType::Pixel,
            _ => CellType::Voxel,
        }
    }
}

impl DataSet for ImageGrid {
    fn point_count(&self) -> usize {
        self.dimensions.iter().product()
    }

    #[allow(clippy::cast_precision_loss)]
    fn point(&self, id: usize) -> Option<Point3<f64>> {
        if id >= self.point_count() {
            return None;
        }
        let ijk = self.point_ijk(id);
        let offset = Vector3::from_fn(|axis, _| ijk[axis] as f64 * self.spacing[axis]);
        Some(self.origin + offset)
    }

    fn point_cells(&self, id: usize, cells: &mut Vec<usize>) {
        cells.clear();
        if id >= self.point_count() {
            return;
        }
        let ijk = self.point_ijk(id);
        let [cx, cy, cz] = self.cell_dimensions();

        // Candidate cell coordinates per axis: the cell below and the cell above.
        let range = |axis: usize, cells_on_axis: usize| {
            if self.dimensions[axis] == 1 {
                0..1
            } else {
                let hi = ijk[axis].min(cells_on_axis - 1);
                ijk[axis].saturating_sub(1)..hi + 1
            }
        };
        for ck in range(2, cz) {
            for cj in range(1, cy) {
                for ci in range(0, cx) {
                    cells.push(ci + cx * (cj + cy * ck));
                }
            }
        }
    }

    fn cell_count(&self) -> usize {
        self.cell_dimensions().iter().product()
    }

    #[allow(clippy::cast_possible_truncation)]
    fn cell(&self, id: usize) -> Option<Cell> {
        if id >= self.cell_count() {
            return None;
        }
        let [cx, cy, _] = self.cell_dimensions();
        let base = [id % cx, (id / cx) % cy, id / (cx * cy)];
        let [sx, sy, sz] = self.axis_step();

        let mut points = Vec::with_capacity(8);
        for dk in 0..=sz {
            for dj in 0..=sy {
                for di in 0..=sx {
                    let corner = [base[0] + di, base[1] + dj, base[2] + dk];
                    points.push(self.point_id(corner) as u32);
                }
            }
        }
        Cell::new(self.cell_kind(), points).ok()
    }

    fn point_data(&self) -> &AttributeTable {
        &self.point_data
    }

    fn cell_data(&self) -> &AttributeTable {
        &self.cell_data
    }

    #[allow(clippy::cast_precision_loss)]
    fn bounds(&self) -> Aabb {
        let extent = Vector3::from_fn(|axis, _| {
            (self.dimensions[axis] - 1) as f64 * self.spacing[axis]
        });
        Aabb::new(self.origin, self.origin + extent)
    }
}
