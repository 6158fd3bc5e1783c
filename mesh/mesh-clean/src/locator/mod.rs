//! Incremental point locators.
//!
//! A locator owns the output point set while it is being built. Each
//! insertion either returns the id of an already inserted point that is
//! close enough, or appends the point and returns its new id.

mod merge;
mod radius;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use mesh_ugrid::{Aabb, Points, Precision};
use nalgebra::Point3;

pub use merge::MergePoints;
pub use radius::PointLocator;

/// Which deduplication strategy a locator implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocatorKind {
    /// Bitwise-equal coordinates only.
    MergePoints,
    /// Closest inserted point within a radius.
    PointLocator,
    /// A caller-provided implementation.
    Custom,
}

impl fmt::Display for LocatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MergePoints => write!(f, "MergePoints"),
            Self::PointLocator => write!(f, "PointLocator"),
            Self::Custom => write!(f, "Custom"),
        }
    }
}

/// A spatial index that inserts points unless a coincident one exists.
pub trait IncrementalLocator {
    /// Strategy implemented by this locator.
    fn kind(&self) -> LocatorKind {
        LocatorKind::Custom
    }

    /// Current merge distance.
    fn tolerance(&self) -> f64;

    /// Set the merge distance used by subsequent insertions.
    fn set_tolerance(&mut self, tolerance: f64);

    /// Discard all inserted points and prepare an empty output container.
    ///
    /// `bounds` covers every point that will be inserted.
    fn init_point_insertion(&mut self, bounds: &Aabb, precision: Precision);

    /// Insert `point` unless an equivalent point is already present.
    ///
    /// Returns the output id and whether the point was newly added.
    fn insert_unique_point(&mut self, point: Point3<f64>) -> (u32, bool);

    /// Number of points inserted since the last initialization.
    fn inserted_count(&self) -> usize;

    /// Hand over the output points, leaving the locator empty.
    fn take_points(&mut self) -> Points;
}

/// A locator whose lifetime is controlled by the caller.
///
/// The cleaning stage keeps a clone of the handle between runs; a caller
/// holding another clone can inspect or reconfigure it.
pub type SharedLocator = Rc<RefCell<dyn IncrementalLocator>>;

/// Wrap a locator in a [`SharedLocator`] handle.
///
/// # Example
///
/// ```
/// use mesh_clean::{LocatorKind, PointLocator, shared};
///
/// let locator = shared(PointLocator::new());
/// assert_eq!(locator.borrow().kind(), LocatorKind::PointLocator);
/// ```
pub fn shared(locator: impl IncrementalLocator + 'static) -> SharedLocator {
    Rc::new(RefCell::new(locator))
}

/// Hash key of a coordinate: the bit patterns of its components, with
/// `-0.0` folded onto `0.0` so they compare equal as numbers do.
fn coordinate_key(point: &Point3<f64>) -> [u64; 3] {
    [point.x, point.y, point.z].map(|c| (c + 0.0).to_bits())
}
