//! Point coordinate storage with an explicit numeric precision.

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Aabb;

/// Numeric representation used to store point coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Precision {
    /// 32-bit floats. This is the default for a fresh point container.
    #[default]
    Single,
    /// 64-bit floats.
    Double,
}

/// Coordinates of a point set.
///
/// Coordinates are always read and written as `f64`; a single-precision
/// container narrows on write, so a value read back is the stored `f32`
/// widened again.
///
/// # Example
///
/// ```
/// use mesh_ugrid::{Point3, Points, Precision};
///
/// let mut points = Points::new(Precision::Single);
/// let id = points.push(Point3::new(0.1, 0.2, 0.3));
/// assert_eq!(id, 0);
/// assert_eq!(points.get(0), Some(Point3::new(0.1_f32, 0.2, 0.3).cast::<f64>()));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Points {
    /// Single-precision storage.
    Single(Vec<Point3<f32>>),
    /// Double-precision storage.
    Double(Vec<Point3<f64>>),
}

impl Points {
    /// Create an empty container with the given precision.
    #[must_use]
    pub const fn new(precision: Precision) -> Self {
        match precision {
            Precision::Single => Self::Single(Vec::new()),
            Precision::Double => Self::Double(Vec::new()),
        }
    }

    /// Create an empty container with room for `capacity` points.
    #[must_use]
    pub fn with_capacity(precision: Precision, capacity: usize) -> Self {
        match precision {
            Precision::Single => Self::Single(Vec::with_capacity(capacity)),
            Precision::Double => Self::Double(Vec::with_capacity(capacity)),
        }
    }

    /// Create a double-precision container from coordinates.
    #[must_use]
    pub fn from_coords(coords: &[[f64; 3]]) -> Self {
        Self::Double(coords.iter().map(|&c| Point3::from(c)).collect())
    }

    /// Storage precision.
    #[must_use]
    pub const fn precision(&self) -> Precision {
        match self {
            Self::Single(_) => Precision::Single,
            Self::Double(_) => Precision::Double,
        }
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Single(v) => v.len(),
            Self::Double(v) => v.len(),
        }
    }

    /// Check if the container holds no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Coordinates of point `id`, or `None` if out of range.
    #[must_use]
    pub fn get(&self, id: usize) -> Option<Point3<f64>> {
        match self {
            Self::Single(v) => v.get(id).map(|p| p.cast::<f64>()),
            Self::Double(v) => v.get(id).copied(),
        }
    }

    /// Append a point and return its id.
    #[allow(clippy::cast_possible_truncation)] // narrowing is the point of single precision
    pub fn push(&mut self, point: Point3<f64>) -> u32 {
        let id = self.len() as u32;
        match self {
            Self::Single(v) => v.push(Point3::new(
                point.x as f32,
                point.y as f32,
                point.z as f32,
            )),
            Self::Double(v) => v.push(point),
        }
        id
    }

    /// Round a coordinate through this container's precision.
    ///
    /// The result is exactly what [`Points::get`] would return after
    /// [`Points::push`]ing `point`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn represent(precision: Precision, point: Point3<f64>) -> Point3<f64> {
        match precision {
            Precision::Single => Point3::new(
                f64::from(point.x as f32),
                f64::from(point.y as f32),
                f64::from(point.z as f32),
            ),
            Precision::Double => point,
        }
    }

    /// Iterate over all coordinates as `f64`.
    pub fn iter(&self) -> impl Iterator<Item = Point3<f64>> + '_ {
        (0..self.len()).filter_map(|id| self.get(id))
    }

    /// Bounds of all points.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.iter())
    }

    /// Release unused capacity.
    pub fn shrink_to_fit(&mut self) {
        match self {
            Self::Single(v) => v.shrink_to_fit(),
            Self::Double(v) => v.shrink_to_fit(),
        }
    }

    /// Remove all points, keeping the precision.
    pub fn clear(&mut self) {
        match self {
            Self::Single(v) => v.clear(),
            Self::Double(v) => v.clear(),
        }
    }
}

impl Default for Points {
    fn default() -> Self {
        Self::new(Precision::default())
    }
}
