//! Merge duplicate points of a grid and remap its cells.
//!
//! A run has two passes. The point pass inserts every input point into a
//! locator, which either assigns a new output id or returns the id of a
//! coincident point already inserted; the resulting old-to-new map drives
//! the cell pass, which rewrites every point reference (including the ids
//! inside polyhedral face streams) and appends the cell to the output in
//! input order.

use std::fmt;
use std::rc::Rc;

use mesh_ugrid::{
    AttributeTable, Cell, Connectivity, DataSet, GridError, Points, UnstructuredGrid,
};
use tracing::{debug, info, warn};

use crate::locator::{MergePoints, PointLocator, SharedLocator, shared};
use crate::progress::{NoProgress, PassProgress, ProgressSink};
use crate::{CleanError, CleanParams, CleanResult, CleanSummary};

/// Share of a run's progress taken by the point pass.
const POINT_PASS_SHARE: f64 = 0.8;

/// Grid cleaning stage.
///
/// Holds the parameters and, between runs, the locator. The locator is
/// created on the first run unless one is supplied with
/// [`CleanUnstructuredGrid::set_locator`]; see
/// [`CleanUnstructuredGrid::create_default_locator`] for when it is
/// replaced.
///
/// # Example
///
/// ```
/// use mesh_clean::{CleanParams, CleanUnstructuredGrid};
/// use mesh_ugrid::{Cell, CellType, DataSet, Points, UnstructuredGrid};
///
/// // Two triangles whose shared corner is stored twice.
/// let points = Points::from_coords(&[
///     [0.0, 0.0, 0.0],
///     [1.0, 0.0, 0.0],
///     [0.0, 1.0, 0.0],
///     [0.0, 0.0, 0.0],
///     [-1.0, 0.0, 0.0],
///     [0.0, -1.0, 0.0],
/// ]);
/// let cells = vec![
///     Cell::new(CellType::Triangle, vec![0, 1, 2]).unwrap(),
///     Cell::new(CellType::Triangle, vec![3, 4, 5]).unwrap(),
/// ];
/// let input = UnstructuredGrid::from_parts(points, cells).unwrap();
///
/// let mut filter = CleanUnstructuredGrid::new(CleanParams::default());
/// let output = filter.run(&input).unwrap();
///
/// assert_eq!(output.point_count(), 5);
/// assert_eq!(output.cell_points(1), vec![0, 3, 4]);
/// ```
pub struct CleanUnstructuredGrid {
    params: CleanParams,
    locator: Option<SharedLocator>,
}

impl CleanUnstructuredGrid {
    /// Create a stage with the given parameters and no locator.
    #[must_use]
    pub const fn new(params: CleanParams) -> Self {
        Self {
            params,
            locator: None,
        }
    }

    /// Current parameters.
    #[must_use]
    pub const fn params(&self) -> &CleanParams {
        &self.params
    }

    /// Mutable parameters, applied on the next run.
    pub const fn params_mut(&mut self) -> &mut CleanParams {
        &mut self.params
    }

    /// Locator used by the last run, or the one supplied by the caller.
    #[must_use]
    pub const fn locator(&self) -> Option<&SharedLocator> {
        self.locator.as_ref()
    }

    /// Supply a locator, or `None` to have one created on the next run.
    ///
    /// The stage never drops the caller's own handle; it only replaces its
    /// clone when the tolerance rule requires it.
    pub fn set_locator(&mut self, locator: Option<SharedLocator>) {
        self.locator = locator;
    }

    /// Make sure a locator suitable for `tolerance` is installed and return it.
    ///
    /// Without a locator, a zero tolerance selects [`MergePoints`] and a
    /// positive one selects [`PointLocator`]. An existing locator is kept
    /// unless the tolerance is positive while the locator's own tolerance
    /// is zero, in which case a [`PointLocator`] replaces it. A locator
    /// configured with a positive tolerance is kept even when `tolerance`
    /// is zero.
    ///
    /// # Errors
    ///
    /// Returns [`CleanError::LocatorBusy`] if the existing locator is
    /// mutably borrowed elsewhere.
    #[allow(clippy::float_cmp)]
    pub fn create_default_locator(&mut self, tolerance: f64) -> CleanResult<SharedLocator> {
        let locator = match self.locator.take() {
            None => {
                let locator = if tolerance == 0.0 {
                    shared(MergePoints::new())
                } else {
                    shared(PointLocator::new())
                };
                debug!(kind = %locator.borrow().kind(), tolerance, "Created default locator");
                locator
            }
            Some(existing) => {
                let current = existing.try_borrow().map(|l| l.tolerance());
                let Ok(current) = current else {
                    self.locator = Some(existing);
                    return Err(CleanError::LocatorBusy);
                };
                if tolerance > 0.0 && current == 0.0 {
                    warn!(
                        tolerance,
                        "Locator has zero tolerance, replacing it with a PointLocator"
                    );
                    shared(PointLocator::new())
                } else {
                    existing
                }
            }
        };
        self.locator = Some(Rc::clone(&locator));
        Ok(locator)
    }

    /// Clean `input` into `output`, reporting progress to `progress`.
    ///
    /// `output` must be empty. Output cells match input cells one to one in
    /// type and order; cell attributes are copied whole. On error `output`
    /// is left empty.
    ///
    /// # Errors
    ///
    /// - [`CleanError::OutputNotEmpty`] if `output` already has content
    /// - [`CleanError::LocatorBusy`] if the locator is borrowed elsewhere
    /// - [`CleanError::InvalidPointReference`] or
    ///   [`CleanError::ExcludedPointReference`] for a cell referencing a
    ///   point that does not exist or was dropped
    /// - [`CleanError::MissingPoint`] or [`CleanError::Grid`] if the input
    ///   is inconsistent with its own counts
    pub fn execute<D: DataSet + ?Sized>(
        &mut self,
        input: &D,
        output: &mut UnstructuredGrid,
        progress: &mut dyn ProgressSink,
    ) -> CleanResult<CleanSummary> {
        if !output.has_no_content() {
            return Err(CleanError::OutputNotEmpty {
                points: output.points().len(),
                cells: output.cells().len(),
            });
        }

        let result = self.execute_passes(input, output, progress);
        if result.is_err() {
            *output = UnstructuredGrid::new();
        }
        result
    }

    /// Clean `input` into a new grid without progress reporting.
    ///
    /// # Errors
    ///
    /// See [`CleanUnstructuredGrid::execute`].
    pub fn run<D: DataSet + ?Sized>(&mut self, input: &D) -> CleanResult<UnstructuredGrid> {
        let mut output = UnstructuredGrid::new();
        self.execute(input, &mut output, &mut NoProgress)?;
        Ok(output)
    }

    fn execute_passes<D: DataSet + ?Sized>(
        &mut self,
        input: &D,
        output: &mut UnstructuredGrid,
        progress: &mut dyn ProgressSink,
    ) -> CleanResult<CleanSummary> {
        let input_points = input.point_count();
        let cell_count = input.cell_count();
        let tolerance = self.params.effective_tolerance(input.length());
        let precision = self
            .params
            .output_precision
            .resolve(input.native_precision());

        info!(
            points = input_points,
            cells = cell_count,
            tolerance,
            "Starting grid clean"
        );

        let locator = self.create_default_locator(tolerance)?;

        if cell_count == 0 {
            // Same columns as the input, no rows.
            output.allocate(1);
            *output.point_data_mut() = AttributeTable::copy_allocate(input.point_data(), 0);
            *output.cell_data_mut() = AttributeTable::copy_allocate(input.cell_data(), 1);
            output.set_points(Points::new(precision));
            debug!("Input has no cells, produced an empty grid");
            progress.update(1.0);
            return Ok(CleanSummary {
                input_points,
                output_points: 0,
                merged_points: 0,
                isolated_removed: 0,
                cells: 0,
                polyhedra: 0,
                tolerance,
                locator: None,
            });
        }

        *output.point_data_mut() = AttributeTable::copy_allocate(input.point_data(), input_points);
        output.cell_data_mut().pass_data(input.cell_data());

        // Point pass: old id -> new id, `None` for dropped points.
        let mut point_map: Vec<Option<u32>> = Vec::with_capacity(input_points);
        let mut isolated_removed = 0;
        let mut merged_points = 0;
        let locator_kind = {
            let mut locator = locator
                .try_borrow_mut()
                .map_err(|_| CleanError::LocatorBusy)?;
            locator.set_tolerance(tolerance);
            locator.init_point_insertion(&input.bounds(), precision);

            let mut pass = PassProgress::new(&mut *progress, input_points, 0.0, POINT_PASS_SHARE);
            let mut incident = Vec::new();
            for id in 0..input_points {
                pass.checkpoint(id);

                if self.params.remove_points_without_cells {
                    input.point_cells(id, &mut incident);
                    if incident.is_empty() {
                        point_map.push(None);
                        isolated_removed += 1;
                        continue;
                    }
                }

                let point = input
                    .point(id)
                    .ok_or(CleanError::MissingPoint { point: id })?;
                let (new_id, is_new) = locator.insert_unique_point(point);
                if is_new {
                    output
                        .point_data_mut()
                        .copy_tuple(input.point_data(), id, new_id as usize)?;
                } else {
                    merged_points += 1;
                }
                point_map.push(Some(new_id));
            }

            output.set_points(locator.take_points());
            locator.kind()
        };

        let output_points = output.points().len();
        debug!(
            kept = output_points,
            removed = isolated_removed,
            "Point pass complete"
        );

        // Cell pass: same cells, same order, remapped references.
        output.allocate(cell_count);
        let mut polyhedra = 0;
        let mut pass = PassProgress::new(
            &mut *progress,
            cell_count,
            POINT_PASS_SHARE,
            1.0 - POINT_PASS_SHARE,
        );
        for cell_id in 0..cell_count {
            pass.checkpoint(cell_id);

            let cell = input.cell(cell_id).ok_or(GridError::InvalidCellIndex {
                index: cell_id,
                cell_count,
            })?;
            let (cell_type, mut connectivity) = cell.into_parts();
            if matches!(connectivity, Connectivity::Faces(_)) {
                // Only the ids inside each face change; counts stay put.
                polyhedra += 1;
            }
            connectivity.try_remap(|point| lookup(&point_map, cell_id, point))?;
            output.insert_next_cell(Cell::from_parts(cell_type, connectivity)?);
        }

        output.squeeze();
        progress.update(1.0);

        let summary = CleanSummary {
            input_points,
            output_points,
            merged_points,
            isolated_removed,
            cells: cell_count,
            polyhedra,
            tolerance,
            locator: Some(locator_kind),
        };
        info!(
            input = input_points,
            output = output_points,
            merged = summary.merged_points,
            removed = isolated_removed,
            "Grid clean complete"
        );
        Ok(summary)
    }
}

/// New id of `point`, as referenced by `cell`.
fn lookup(point_map: &[Option<u32>], cell: usize, point: u32) -> CleanResult<u32> {
    match point_map.get(point as usize) {
        Some(Some(id)) => Ok(*id),
        Some(None) => Err(CleanError::ExcludedPointReference { cell, point }),
        None => Err(CleanError::InvalidPointReference {
            cell,
            point,
            point_count: point_map.len(),
        }),
    }
}

/// Clean `input` with a fresh locator, returning the grid and statistics.
///
/// # Errors
///
/// See [`CleanUnstructuredGrid::execute`].
///
/// # Example
///
/// ```
/// use mesh_clean::{CleanParams, clean_grid};
/// use mesh_ugrid::{DataSet, ImageGrid, Point3, Vector3};
///
/// let image = ImageGrid::new([3, 3, 1], Point3::origin(), Vector3::new(1.0, 1.0, 1.0)).unwrap();
/// let (grid, summary) = clean_grid(&image, &CleanParams::default()).unwrap();
/// assert_eq!(grid.point_count(), 9);
/// assert_eq!(summary.cells, 4);
/// ```
pub fn clean_grid<D: DataSet + ?Sized>(
    input: &D,
    params: &CleanParams,
) -> CleanResult<(UnstructuredGrid, CleanSummary)> {
    let mut filter = CleanUnstructuredGrid::new(params.clone());
    let mut output = UnstructuredGrid::new();
    let summary = filter.execute(input, &mut output, &mut NoProgress)?;
    Ok((output, summary))
}

impl Default for CleanUnstructuredGrid {
    fn default() -> Self {
        Self::new(CleanParams::default())
    }
}

impl fmt::Debug for CleanUnstructuredGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CleanUnstructuredGrid")
            .field("params", &self.params)
            .field(
                "locator",
                &self
                    .locator
                    .as_ref()
                    .and_then(|l| l.try_borrow().ok().map(|l| l.kind())),
            )
            .finish()
    }
}

impl fmt::Display for CleanUnstructuredGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.locator.as_ref().map(|l| l.try_borrow()) {
            None => writeln!(f, "Locator: none")?,
            Some(Ok(locator)) => writeln!(
                f,
                "Locator: {} (tolerance {})",
                locator.kind(),
                locator.tolerance()
            )?,
            Some(Err(_)) => writeln!(f, "Locator: <in use>")?,
        }
        write!(f, "{}", self.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{IncrementalLocator, LocatorKind};
    use mesh_ugrid::CellType;

    fn line_grid() -> UnstructuredGrid {
        let points = Points::from_coords(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);
        let cells = vec![Cell::new(CellType::Line, vec![0, 1]).unwrap()];
        UnstructuredGrid::from_parts(points, cells).unwrap()
    }

    fn kind_of(locator: &SharedLocator) -> LocatorKind {
        locator.borrow().kind()
    }

    #[test]
    fn zero_tolerance_selects_merge_points() {
        let mut filter = CleanUnstructuredGrid::default();
        let locator = filter.create_default_locator(0.0).unwrap();
        assert_eq!(kind_of(&locator), LocatorKind::MergePoints);
    }

    #[test]
    fn positive_tolerance_selects_point_locator() {
        let mut filter = CleanUnstructuredGrid::default();
        let locator = filter.create_default_locator(0.1).unwrap();
        assert_eq!(kind_of(&locator), LocatorKind::PointLocator);
    }

    #[test]
    fn zero_to_positive_replaces_locator() {
        let mut filter = CleanUnstructuredGrid::default();
        let first = filter.create_default_locator(0.0).unwrap();
        let second = filter.create_default_locator(0.5).unwrap();
        assert!(!Rc::ptr_eq(&first, &second));
        assert_eq!(kind_of(&second), LocatorKind::PointLocator);
        // The old handle is still alive for whoever holds it.
        assert_eq!(kind_of(&first), LocatorKind::MergePoints);
    }

    #[test]
    fn positive_to_zero_keeps_locator() {
        let mut filter = CleanUnstructuredGrid::default();
        let first = filter.create_default_locator(0.5).unwrap();
        first.borrow_mut().set_tolerance(0.5);
        let second = filter.create_default_locator(0.0).unwrap();
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(kind_of(&second), LocatorKind::PointLocator);
    }

    #[test]
    fn busy_locator_is_reported() {
        let mut filter = CleanUnstructuredGrid::default();
        let locator = shared(MergePoints::new());
        filter.set_locator(Some(Rc::clone(&locator)));
        let _guard = locator.borrow_mut();
        assert!(matches!(
            filter.create_default_locator(0.0),
            Err(CleanError::LocatorBusy)
        ));
        assert!(filter.locator().is_some());
    }

    #[test]
    fn output_must_be_empty() {
        let input = line_grid();
        let mut output = line_grid();
        let mut filter = CleanUnstructuredGrid::default();
        let err = filter
            .execute(&input, &mut output, &mut NoProgress)
            .unwrap_err();
        assert!(matches!(err, CleanError::OutputNotEmpty { points: 2, cells: 1 }));
        assert_eq!(output, line_grid());
    }

    #[test]
    fn lookup_distinguishes_missing_and_excluded() {
        let map = [Some(0), None];
        assert_eq!(lookup(&map, 0, 0).unwrap(), 0);
        assert!(matches!(
            lookup(&map, 3, 1),
            Err(CleanError::ExcludedPointReference { cell: 3, point: 1 })
        ));
        assert!(matches!(
            lookup(&map, 3, 7),
            Err(CleanError::InvalidPointReference { point: 7, point_count: 2, .. })
        ));
    }

    #[test]
    fn display_shows_locator_state() {
        let mut filter = CleanUnstructuredGrid::default();
        assert!(filter.to_string().starts_with("Locator: none"));
        filter.run(&line_grid()).unwrap();
        assert!(filter.to_string().starts_with("Locator: MergePoints"));
        assert!(format!("{filter:?}").contains("MergePoints"));
    }
}
