//! Cell type tags and tagged cell connectivity.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{FaceStream, GridError, GridResult};

/// Type tag of a cell.
///
/// Discriminants match the VTK cell type codes, so tags survive a trip
/// through legacy file formats unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum CellType {
    /// Single point.
    Vertex = 1,
    /// Set of unconnected points.
    PolyVertex = 2,
    /// Two-point segment.
    Line = 3,
    /// Connected segment chain.
    PolyLine = 4,
    /// Three-point triangle.
    Triangle = 5,
    /// Strip of triangles sharing edges.
    TriangleStrip = 6,
    /// Planar polygon with any number of points.
    Polygon = 7,
    /// Axis-aligned quadrilateral (lattice ordering).
    Pixel = 8,
    /// Four-point quadrilateral.
    Quad = 9,
    /// Four-point tetrahedron.
    Tetra = 10,
    /// Axis-aligned hexahedron (lattice ordering).
    Voxel = 11,
    /// Eight-point hexahedron.
    Hexahedron = 12,
    /// Six-point triangular prism.
    Wedge = 13,
    /// Five-point pyramid.
    Pyramid = 14,
    /// General polyhedron described by a face stream.
    Polyhedron = 42,
}

impl CellType {
    /// Numeric type code.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Look up a tag from its numeric code.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            1 => Self::Vertex,
            2 => Self::PolyVertex,
            3 => Self::Line,
            4 => Self::PolyLine,
            5 => Self::Triangle,
            6 => Self::TriangleStrip,
            7 => Self::Polygon,
            8 => Self::Pixel,
            9 => Self::Quad,
            10 => Self::Tetra,
            11 => Self::Voxel,
            12 => Self::Hexahedron,
            13 => Self::Wedge,
            14 => Self::Pyramid,
            42 => Self::Polyhedron,
            _ => return None,
        })
    }

    /// Number of points a cell of this type must have, if fixed.
    #[must_use]
    pub const fn fixed_point_count(self) -> Option<usize> {
        match self {
            Self::Vertex => Some(1),
            Self::Line => Some(2),
            Self::Triangle => Some(3),
            Self::Pixel | Self::Quad | Self::Tetra => Some(4),
            Self::Pyramid => Some(5),
            Self::Wedge => Some(6),
            Self::Voxel | Self::Hexahedron => Some(8),
            Self::PolyVertex
            | Self::PolyLine
            | Self::TriangleStrip
            | Self::Polygon
            | Self::Polyhedron => None,
        }
    }

    /// Whether connectivity is a face stream rather than a flat id list.
    #[must_use]
    pub const fn is_polyhedral(self) -> bool {
        matches!(self, Self::Polyhedron)
    }
}

/// Point references of a cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Connectivity {
    /// Flat list of point ids.
    Points(Vec<u32>),
    /// Nested polyhedral faces.
    Faces(FaceStream),
}

impl Connectivity {
    /// Rewrite every point id through a fallible `f`.
    ///
    /// Face stream markers are never passed to `f`.
    ///
    /// # Errors
    ///
    /// Propagates the first error returned by `f`.
    pub fn try_remap<E>(&mut self, mut f: impl FnMut(u32) -> Result<u32, E>) -> Result<(), E> {
        match self {
            Self::Points(ids) => {
                for id in ids.iter_mut() {
                    *id = f(*id)?;
                }
                Ok(())
            }
            Self::Faces(stream) => stream.try_remap_point_ids(f),
        }
    }

    /// Point ids as stored for a flat list, repeats included; distinct ids
    /// in order of first appearance for a face stream.
    #[must_use]
    pub fn point_ids(&self) -> Vec<u32> {
        match self {
            Self::Points(ids) => ids.clone(),
            Self::Faces(stream) => stream.point_ids(),
        }
    }
}

/// A cell: a type tag plus connectivity of the matching shape.
///
/// # Example
///
/// ```
/// use mesh_ugrid::{Cell, CellType, Connectivity};
///
/// let tri = Cell::new(CellType::Triangle, vec![0, 1, 2]).unwrap();
/// assert_eq!(tri.cell_type(), CellType::Triangle);
/// assert_eq!(tri.connectivity(), &Connectivity::Points(vec![0, 1, 2]));
///
/// assert!(Cell::new(CellType::Triangle, vec![0, 1]).is_err());
/// assert!(Cell::new(CellType::Polyhedron, vec![0, 1, 2, 3]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cell {
    cell_type: CellType,
    connectivity: Connectivity,
}

impl Cell {
    /// Create a cell with a flat point list.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::ConnectivityMismatch`] for a polyhedral tag, an
    /// empty list, or a list whose length disagrees with a fixed-size tag.
    pub fn new(cell_type: CellType, points: Vec<u32>) -> GridResult<Self> {
        Self::from_parts(cell_type, Connectivity::Points(points))
    }

    /// Create a polyhedral cell.
    #[must_use]
    pub const fn polyhedron(faces: FaceStream) -> Self {
        Self {
            cell_type: CellType::Polyhedron,
            connectivity: Connectivity::Faces(faces),
        }
    }

    /// Pair a tag with connectivity, checking that their shapes agree.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::ConnectivityMismatch`] if the tag and the
    /// connectivity variant disagree or a flat list has the wrong length.
    pub fn from_parts(cell_type: CellType, connectivity: Connectivity) -> GridResult<Self> {
        let valid = match (&connectivity, cell_type.is_polyhedral()) {
            (Connectivity::Faces(_), true) => true,
            (Connectivity::Points(ids), false) => {
                !ids.is_empty()
                    && cell_type
                        .fixed_point_count()
                        .is_none_or(|n| n == ids.len())
            }
            _ => false,
        };
        if !valid {
            return Err(GridError::ConnectivityMismatch { cell_type });
        }
        Ok(Self {
            cell_type,
            connectivity,
        })
    }

    /// Type tag.
    #[must_use]
    pub const fn cell_type(&self) -> CellType {
        self.cell_type
    }

    /// Point references.
    #[must_use]
    pub const fn connectivity(&self) -> &Connectivity {
        &self.connectivity
    }

    /// Point ids of the cell; see [`Connectivity::point_ids`].
    #[must_use]
    pub fn point_ids(&self) -> Vec<u32> {
        self.connectivity.point_ids()
    }

    /// Split into tag and connectivity.
    #[must_use]
    pub fn into_parts(self) -> (CellType, Connectivity) {
        (self.cell_type, self.connectivity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for code in 0..=u8::MAX {
            if let Some(tag) = CellType::from_code(code) {
                assert_eq!(tag.code(), code);
            }
        }
        assert_eq!(CellType::from_code(42), Some(CellType::Polyhedron));
        assert_eq!(CellType::from_code(0), None);
    }

    #[test]
    fn variable_size_cells_accept_any_length() {
        assert!(Cell::new(CellType::Polygon, vec![0, 1, 2, 3, 4]).is_ok());
        assert!(Cell::new(CellType::PolyLine, vec![0, 1]).is_ok());
        assert!(Cell::new(CellType::Polygon, vec![]).is_err());
    }

    #[test]
    fn faces_require_polyhedron_tag() {
        let stream = FaceStream::from_faces(&[[0_u32, 1, 2]]);
        assert!(Cell::from_parts(CellType::Tetra, Connectivity::Faces(stream.clone())).is_err());
        let cell = Cell::polyhedron(stream);
        assert!(cell.cell_type().is_polyhedral());
        assert_eq!(cell.point_ids(), vec![0, 1, 2]);
    }

    #[test]
    fn point_ids_keep_flat_repeats() {
        let line = Cell::new(CellType::PolyLine, vec![0, 1, 1, 0]).unwrap();
        assert_eq!(line.point_ids(), vec![0, 1, 1, 0]);

        let stream = FaceStream::from_faces(&[[0_u32, 1, 2], [2, 1, 0]]);
        assert_eq!(Cell::polyhedron(stream).point_ids(), vec![0, 1, 2]);
    }

    #[test]
    fn remap_flat_list() {
        let mut conn = Connectivity::Points(vec![2, 0, 1]);
        let result: Result<(), ()> = conn.try_remap(|id| Ok(id * 10));
        assert!(result.is_ok());
        assert_eq!(conn, Connectivity::Points(vec![20, 0, 10]));
    }
}
