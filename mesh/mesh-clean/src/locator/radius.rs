//! Tolerance-radius locator on a uniform spatial hash.

// Bucket coordinates are floor(x / size); saturation on overflow is fine
// because every candidate is distance-checked.
#![allow(clippy::cast_possible_truncation)]

use hashbrown::HashMap;
use mesh_ugrid::{Aabb, Points, Precision};
use nalgebra::Point3;

use super::{IncrementalLocator, LocatorKind};

/// Finest bucket subdivision of the bounding diagonal.
const MAX_DIVISIONS: f64 = 1.0e6;

/// Merges a point into the closest inserted point within the tolerance.
///
/// Points are hashed into cubic buckets at least as wide as the tolerance,
/// so every candidate lies in the 3x3x3 block around the query's bucket.
/// Ties in distance go to the lower id. A zero tolerance merges only
/// coincident points.
///
/// # Example
///
/// ```
/// use mesh_clean::{IncrementalLocator, PointLocator};
/// use mesh_ugrid::{Aabb, Point3, Precision};
///
/// let mut locator = PointLocator::new();
/// locator.set_tolerance(0.1);
/// let bounds = Aabb::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
/// locator.init_point_insertion(&bounds, Precision::Double);
///
/// assert_eq!(locator.insert_unique_point(Point3::new(0.5, 0.5, 0.5)), (0, true));
/// assert_eq!(locator.insert_unique_point(Point3::new(0.55, 0.5, 0.5)), (0, false));
/// assert_eq!(locator.insert_unique_point(Point3::new(0.7, 0.5, 0.5)), (1, true));
/// ```
#[derive(Debug, Clone)]
pub struct PointLocator {
    tolerance: f64,
    points: Points,
    origin: Point3<f64>,
    bucket_size: f64,
    buckets: HashMap<[i64; 3], Vec<u32>>,
}

impl PointLocator {
    /// Create an empty locator with zero tolerance.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tolerance: 0.0,
            points: Points::default(),
            origin: Point3::origin(),
            bucket_size: 1.0,
            buckets: HashMap::new(),
        }
    }

    fn bucket_of(&self, point: &Point3<f64>) -> [i64; 3] {
        let rel = *point - self.origin;
        [rel.x, rel.y, rel.z].map(|c| (c / self.bucket_size).floor() as i64)
    }

    /// Closest inserted point within tolerance, if any.
    #[allow(clippy::float_cmp)]
    fn find_inserted(&self, point: &Point3<f64>) -> Option<u32> {
        let tol2 = self.tolerance * self.tolerance;
        let [bx, by, bz] = self.bucket_of(point);
        let mut best: Option<(f64, u32)> = None;

        for dz in -1..=1_i64 {
            for dy in -1..=1_i64 {
                for dx in -1..=1_i64 {
                    let key = [
                        bx.wrapping_add(dx),
                        by.wrapping_add(dy),
                        bz.wrapping_add(dz),
                    ];
                    let Some(candidates) = self.buckets.get(&key) else {
                        continue;
                    };
                    for &id in candidates {
                        let Some(other) = self.points.get(id as usize) else {
                            continue;
                        };
                        let dist2 = (*point - other).norm_squared();
                        if dist2 > tol2 {
                            continue;
                        }
                        let closer = best.is_none_or(|(d, best_id)| {
                            dist2 < d || (dist2 == d && id < best_id)
                        });
                        if closer {
                            best = Some((dist2, id));
                        }
                    }
                }
            }
        }

        best.map(|(_, id)| id)
    }
}

impl Default for PointLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IncrementalLocator for PointLocator {
    fn kind(&self) -> LocatorKind {
        LocatorKind::PointLocator
    }

    fn tolerance(&self) -> f64 {
        self.tolerance
    }

    fn set_tolerance(&mut self, tolerance: f64) {
        self.tolerance = tolerance.max(0.0);
    }

    fn init_point_insertion(&mut self, bounds: &Aabb, precision: Precision) {
        self.points = Points::new(precision);
        self.buckets.clear();
        self.origin = if bounds.is_empty() {
            Point3::origin()
        } else {
            bounds.min
        };

        let size = self.tolerance.max(bounds.diagonal_length() / MAX_DIVISIONS);
        self.bucket_size = if size.is_finite() && size > 0.0 { size } else { 1.0 };
    }

    fn insert_unique_point(&mut self, point: Point3<f64>) -> (u32, bool) {
        let stored = Points::represent(self.points.precision(), point);
        if let Some(id) = self.find_inserted(&stored) {
            return (id, false);
        }
        let bucket = self.bucket_of(&stored);
        let id = self.points.push(stored);
        self.buckets.entry(bucket).or_default().push(id);
        (id, true)
    }

    fn inserted_count(&self) -> usize {
        self.points.len()
    }

    fn take_points(&mut self) -> Points {
        self.buckets.clear();
        let precision = self.points.precision();
        std::mem::replace(&mut self.points, Points::new(precision))
    }
}
