//! Exact-match locator.

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use mesh_ugrid::{Aabb, Points, Precision};
use nalgebra::Point3;

use super::{IncrementalLocator, LocatorKind, coordinate_key};

/// Merges points only when their stored coordinates are identical.
///
/// Coordinates are compared after conversion to the output precision, so
/// two inputs that differ only below single-precision resolution merge
/// when the output is single precision. The tolerance is recorded but
/// never consulted.
///
/// # Example
///
/// ```
/// use mesh_clean::{IncrementalLocator, MergePoints};
/// use mesh_ugrid::{Aabb, Point3, Precision};
///
/// let mut locator = MergePoints::new();
/// locator.init_point_insertion(&Aabb::empty(), Precision::Double);
///
/// assert_eq!(locator.insert_unique_point(Point3::new(1.0, 2.0, 3.0)), (0, true));
/// assert_eq!(locator.insert_unique_point(Point3::new(1.0, 2.0, 3.5)), (1, true));
/// assert_eq!(locator.insert_unique_point(Point3::new(1.0, 2.0, 3.0)), (0, false));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MergePoints {
    tolerance: f64,
    points: Points,
    index: HashMap<[u64; 3], u32>,
}

impl MergePoints {
    /// Create an empty locator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl IncrementalLocator for MergePoints {
    fn kind(&self) -> LocatorKind {
        LocatorKind::MergePoints
    }

    fn tolerance(&self) -> f64 {
        self.tolerance
    }

    fn set_tolerance(&mut self, tolerance: f64) {
        self.tolerance = tolerance;
    }

    fn init_point_insertion(&mut self, _bounds: &Aabb, precision: Precision) {
        self.points = Points::new(precision);
        self.index.clear();
    }

    fn insert_unique_point(&mut self, point: Point3<f64>) -> (u32, bool) {
        let stored = Points::represent(self.points.precision(), point);
        match self.index.entry(coordinate_key(&stored)) {
            Entry::Occupied(entry) => (*entry.get(), false),
            Entry::Vacant(entry) => {
                let id = self.points.push(stored);
                entry.insert(id);
                (id, true)
            }
        }
    }

    fn inserted_count(&self) -> usize {
        self.points.len()
    }

    fn take_points(&mut self) -> Points {
        self.index.clear();
        let precision = self.points.precision();
        std::mem::replace(&mut self.points, Points::new(precision))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locator(precision: Precision) -> MergePoints {
        let mut locator = MergePoints::new();
        locator.init_point_insertion(&Aabb::empty(), precision);
        locator
    }

    #[test]
    fn near_points_stay_distinct() {
        let mut locator = locator(Precision::Double);
        locator.set_tolerance(10.0);
        assert_eq!(locator.insert_unique_point(Point3::new(0.0, 0.0, 0.0)), (0, true));
        assert_eq!(locator.insert_unique_point(Point3::new(1e-12, 0.0, 0.0)), (1, true));
        assert_eq!(locator.inserted_count(), 2);
    }

    #[test]
    fn negative_zero_matches_zero() {
        let mut locator = locator(Precision::Double);
        locator.insert_unique_point(Point3::new(0.0, 1.0, 0.0));
        assert_eq!(locator.insert_unique_point(Point3::new(-0.0, 1.0, -0.0)), (0, false));
    }

    #[test]
    fn single_precision_merges_after_rounding() {
        let a = Point3::new(0.1, 0.0, 0.0);
        let b = Point3::new(0.1 + 1e-12, 0.0, 0.0);

        let mut single = locator(Precision::Single);
        single.insert_unique_point(a);
        assert_eq!(single.insert_unique_point(b), (0, false));

        let mut double = locator(Precision::Double);
        double.insert_unique_point(a);
        assert_eq!(double.insert_unique_point(b), (1, true));
    }

    #[test]
    fn init_resets_state() {
        let mut locator = locator(Precision::Double);
        locator.insert_unique_point(Point3::new(1.0, 1.0, 1.0));
        locator.init_point_insertion(&Aabb::empty(), Precision::Single);
        assert_eq!(locator.inserted_count(), 0);
        assert_eq!(locator.insert_unique_point(Point3::new(1.0, 1.0, 1.0)), (0, true));

        let points = locator.take_points();
        assert_eq!(points.len(), 1);
        assert_eq!(points.precision(), Precision::Single);
        assert_eq!(locator.inserted_count(), 0);
    }
}
