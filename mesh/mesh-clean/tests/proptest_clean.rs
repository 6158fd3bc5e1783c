//! Property-based tests for grid cleaning.
//!
//! These tests use proptest to generate random grids with many coincident
//! points and verify the invariants of the output.
//!
//! Run with: cargo test -p mesh-clean -- proptest

#![allow(clippy::unwrap_used, clippy::expect_used)]

use mesh_clean::{CleanParams, clean_grid};
use mesh_ugrid::{Cell, CellType, Connectivity, DataSet, FaceStream, Points, UnstructuredGrid};
use proptest::prelude::*;

// =============================================================================
// Strategies for generating random grids
// =============================================================================

/// A position on a coarse lattice, so duplicates are common.
fn arb_position() -> impl Strategy<Value = [f64; 3]> + Clone {
    prop::array::uniform3((0..4_i32).prop_map(|c| f64::from(c) * 0.5))
}

/// A position jittered around a coarse lattice.
fn arb_jittered_position() -> impl Strategy<Value = [f64; 3]> + Clone {
    (arb_position(), prop::array::uniform3(-0.01..0.01f64))
        .prop_map(|(p, j)| [p[0] + j[0], p[1] + j[1], p[2] + j[2]])
}

/// A cell over `n` points: a line, a triangle or a tetrahedral polyhedron.
fn arb_cell(n: u32) -> impl Strategy<Value = Cell> {
    prop_oneof![
        prop::array::uniform2(0..n)
            .prop_map(|ids| Cell::new(CellType::Line, ids.to_vec()).unwrap()),
        prop::array::uniform3(0..n)
            .prop_map(|ids| Cell::new(CellType::Triangle, ids.to_vec()).unwrap()),
        prop::array::uniform4(0..n).prop_map(|[a, b, c, d]| {
            Cell::polyhedron(FaceStream::from_faces(&[
                [a, c, b],
                [a, b, d],
                [b, c, d],
                [c, a, d],
            ]))
        }),
    ]
}

/// A valid grid whose cells reference only a prefix of its points, so some
/// points are isolated.
fn arb_grid(
    position: impl Strategy<Value = [f64; 3]> + Clone,
) -> impl Strategy<Value = UnstructuredGrid> {
    prop::collection::vec(position, 4..40).prop_flat_map(|coords| {
        let used = u32::try_from(coords.len() * 3 / 4).unwrap();
        prop::collection::vec(arb_cell(used), 0..20).prop_map(move |cells| {
            UnstructuredGrid::from_parts(Points::from_coords(&coords), cells).unwrap()
        })
    })
}

/// Every point reference of a cell in storage order, repeats included.
fn raw_ids(cell: &Cell) -> Vec<u32> {
    match cell.connectivity() {
        Connectivity::Points(ids) => ids.clone(),
        Connectivity::Faces(stream) => stream.faces().flatten().copied().collect(),
    }
}

fn referenced_points(grid: &UnstructuredGrid) -> Vec<bool> {
    let mut used = vec![false; grid.point_count()];
    for cell in grid.cells() {
        for id in cell.point_ids() {
            used[id as usize] = true;
        }
    }
    used
}

// =============================================================================
// Property tests
// =============================================================================

proptest! {
    /// Cleaning the same input twice yields the same output.
    #[test]
    fn clean_is_deterministic(grid in arb_grid(arb_jittered_position())) {
        let params = CleanParams::absolute(0.05);
        let (first, _) = clean_grid(&grid, &params).unwrap();
        let (second, _) = clean_grid(&grid, &params).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Cell count, order and types are preserved, and points never grow.
    #[test]
    fn cells_are_preserved(grid in arb_grid(arb_position())) {
        let (output, summary) = clean_grid(&grid, &CleanParams::default()).unwrap();

        prop_assert!(output.point_count() <= grid.point_count());
        prop_assert_eq!(output.cell_count(), grid.cell_count());
        prop_assert_eq!(summary.output_points, output.point_count());
        for (before, after) in grid.cells().iter().zip(output.cells()) {
            prop_assert_eq!(before.cell_type(), after.cell_type());
        }
    }

    /// With exact matching, every reference resolves to the same coordinates.
    #[test]
    fn exact_merge_preserves_geometry(grid in arb_grid(arb_position())) {
        let (output, _) = clean_grid(&grid, &CleanParams::default()).unwrap();

        for (before, after) in grid.cells().iter().zip(output.cells()) {
            for (old, new) in raw_ids(before).into_iter().zip(raw_ids(after)) {
                prop_assert_eq!(grid.point(old as usize), output.point(new as usize));
            }
        }

        // No two output points coincide.
        let mut coords: Vec<[u64; 3]> = output
            .points()
            .iter()
            .map(|p| [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()])
            .collect();
        let total = coords.len();
        coords.sort_unstable();
        coords.dedup();
        prop_assert_eq!(coords.len(), total);
    }

    /// With a tolerance, every reference moves by at most the tolerance.
    #[test]
    fn merge_stays_within_tolerance(grid in arb_grid(arb_jittered_position())) {
        let tolerance = 0.05;
        let (output, _) = clean_grid(&grid, &CleanParams::absolute(tolerance)).unwrap();

        for (before, after) in grid.cells().iter().zip(output.cells()) {
            for (old, new) in raw_ids(before).into_iter().zip(raw_ids(after)) {
                let a = grid.point(old as usize).unwrap();
                let b = output.point(new as usize).unwrap();
                prop_assert!((a - b).norm() <= tolerance + 1e-12);
            }
        }
    }

    /// Polyhedral face streams keep their face count and face sizes.
    #[test]
    fn face_stream_shape_is_preserved(grid in arb_grid(arb_jittered_position())) {
        let (output, _) = clean_grid(&grid, &CleanParams::absolute(0.05)).unwrap();

        for id in 0..grid.cell_count() {
            let (Some(before), Some(after)) = (grid.face_stream(id), output.face_stream(id)) else {
                prop_assert_eq!(grid.face_stream(id).is_some(), output.face_stream(id).is_some());
                continue;
            };
            prop_assert_eq!(before.face_count(), after.face_count());
            let sizes = |s: &FaceStream| s.faces().map(<[u32]>::len).collect::<Vec<_>>();
            prop_assert_eq!(sizes(&before), sizes(&after));
        }
    }

    /// Removing isolated points leaves every output point referenced.
    #[test]
    fn removal_leaves_no_isolated_points(grid in arb_grid(arb_position())) {
        let params = CleanParams::default().with_remove_points_without_cells(true);
        let (output, summary) = clean_grid(&grid, &params).unwrap();

        if output.cell_count() > 0 {
            prop_assert!(referenced_points(&output).iter().all(|&used| used));
        }
        let isolated = referenced_points(&grid).iter().filter(|&&used| !used).count();
        if grid.cell_count() > 0 {
            prop_assert_eq!(summary.isolated_removed, isolated);
        }
    }
}
