//! Statistics of a cleaning run.

use std::fmt;

use crate::LocatorKind;

/// What a cleaning run did.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanSummary {
    /// Points in the input.
    pub input_points: usize,
    /// Points in the output.
    pub output_points: usize,
    /// Input points that resolved to an earlier output point.
    pub merged_points: usize,
    /// Input points dropped because no cell uses them.
    pub isolated_removed: usize,
    /// Cells copied to the output (always the input cell count).
    pub cells: usize,
    /// Of those, cells remapped through a face stream.
    pub polyhedra: usize,
    /// Merge distance actually used.
    pub tolerance: f64,
    /// Strategy of the locator used; `None` if no points were inserted.
    pub locator: Option<LocatorKind>,
}

impl CleanSummary {
    /// Check whether the output point set differs from the input's.
    #[must_use]
    pub const fn had_changes(&self) -> bool {
        self.merged_points > 0 || self.isolated_removed > 0
    }
}

impl fmt::Display for CleanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Clean: {} -> {} points ({} merged, {} isolated removed), {} cells ({} polyhedra), tolerance {}",
            self.input_points,
            self.output_points,
            self.merged_points,
            self.isolated_removed,
            self.cells,
            self.polyhedra,
            self.tolerance
        )?;
        if let Some(kind) = self.locator {
            write!(f, " via {kind}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_counts() {
        let summary = CleanSummary {
            input_points: 6,
            output_points: 5,
            merged_points: 1,
            isolated_removed: 0,
            cells: 2,
            polyhedra: 0,
            tolerance: 0.0,
            locator: Some(LocatorKind::MergePoints),
        };
        let text = summary.to_string();
        assert!(text.contains("6 -> 5 points"));
        assert!(text.contains("1 merged"));
        assert!(text.ends_with("via MergePoints"));
        assert!(summary.had_changes());
    }
}
