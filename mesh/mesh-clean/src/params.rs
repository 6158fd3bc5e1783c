//! Parameters for grid cleaning.

use std::fmt;

use mesh_ugrid::Precision;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How the merge distance is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ToleranceMode {
    /// `tolerance` is a fraction of the input's bounding diagonal.
    #[default]
    Relative,
    /// `absolute_tolerance` is used as a distance directly.
    Absolute,
}

/// Coordinate precision of the output points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OutputPrecision {
    /// Keep the input's precision; single if the input stores none.
    #[default]
    MatchInput,
    /// Always single precision.
    Single,
    /// Always double precision.
    Double,
}

impl OutputPrecision {
    /// Resolve to a concrete precision given the input's native one.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_clean::OutputPrecision;
    /// use mesh_ugrid::Precision;
    ///
    /// assert_eq!(OutputPrecision::MatchInput.resolve(Some(Precision::Double)), Precision::Double);
    /// assert_eq!(OutputPrecision::MatchInput.resolve(None), Precision::Single);
    /// assert_eq!(OutputPrecision::Double.resolve(Some(Precision::Single)), Precision::Double);
    /// ```
    #[must_use]
    pub fn resolve(self, native: Option<Precision>) -> Precision {
        match self {
            Self::MatchInput => native.unwrap_or_default(),
            Self::Single => Precision::Single,
            Self::Double => Precision::Double,
        }
    }
}

/// Configuration parameters for [`crate::CleanUnstructuredGrid`].
///
/// # Example
///
/// ```
/// use mesh_clean::{CleanParams, ToleranceMode};
///
/// // Merge points closer than 0.01 units, drop points no cell uses.
/// let params = CleanParams::absolute(0.01).with_remove_points_without_cells(true);
/// assert_eq!(params.tolerance_mode, ToleranceMode::Absolute);
/// assert!((params.effective_tolerance(100.0) - 0.01).abs() < 1e-12);
///
/// // Merge points closer than 0.1% of the bounding diagonal.
/// let params = CleanParams::default().with_tolerance(0.001);
/// assert!((params.effective_tolerance(100.0) - 0.1).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CleanParams {
    /// Merge tolerance as a fraction of the bounding diagonal, in `[0, 1]`.
    ///
    /// Used when `tolerance_mode` is [`ToleranceMode::Relative`].
    /// Default: `0.0` (exact matching)
    pub tolerance: f64,

    /// Merge tolerance as a distance.
    ///
    /// Used when `tolerance_mode` is [`ToleranceMode::Absolute`].
    /// Default: `1.0`
    pub absolute_tolerance: f64,

    /// Which of the two tolerances is active.
    /// Default: [`ToleranceMode::Relative`]
    pub tolerance_mode: ToleranceMode,

    /// Drop points that no cell references.
    /// Default: `false`
    pub remove_points_without_cells: bool,

    /// Precision of the output coordinates.
    /// Default: [`OutputPrecision::MatchInput`]
    pub output_precision: OutputPrecision,
}

impl Default for CleanParams {
    fn default() -> Self {
        Self {
            tolerance: 0.0,
            absolute_tolerance: 1.0,
            tolerance_mode: ToleranceMode::Relative,
            remove_points_without_cells: false,
            output_precision: OutputPrecision::MatchInput,
        }
    }
}

impl CleanParams {
    /// Create params merging points within an absolute distance.
    #[must_use]
    pub fn absolute(distance: f64) -> Self {
        Self {
            absolute_tolerance: distance.max(0.0),
            tolerance_mode: ToleranceMode::Absolute,
            ..Default::default()
        }
    }

    /// Set the relative tolerance, clamped to `[0, 1]`.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance.clamp(0.0, 1.0);
        self
    }

    /// Set the absolute tolerance, clamped to be non-negative.
    #[must_use]
    pub fn with_absolute_tolerance(mut self, distance: f64) -> Self {
        self.absolute_tolerance = distance.max(0.0);
        self
    }

    /// Choose which tolerance is active.
    #[must_use]
    pub const fn with_tolerance_mode(mut self, mode: ToleranceMode) -> Self {
        self.tolerance_mode = mode;
        self
    }

    /// Set whether points without cells are dropped.
    #[must_use]
    pub const fn with_remove_points_without_cells(mut self, remove: bool) -> Self {
        self.remove_points_without_cells = remove;
        self
    }

    /// Set the output coordinate precision.
    #[must_use]
    pub const fn with_output_precision(mut self, precision: OutputPrecision) -> Self {
        self.output_precision = precision;
        self
    }

    /// Merge distance for an input whose characteristic length is `length`.
    #[must_use]
    pub fn effective_tolerance(&self, length: f64) -> f64 {
        match self.tolerance_mode {
            ToleranceMode::Absolute => self.absolute_tolerance.max(0.0),
            ToleranceMode::Relative => self.tolerance.clamp(0.0, 1.0) * length,
        }
    }
}

impl fmt::Display for CleanParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let on_off = |b: bool| if b { "On" } else { "Off" };
        writeln!(
            f,
            "ToleranceIsAbsolute: {}",
            on_off(self.tolerance_mode == ToleranceMode::Absolute)
        )?;
        writeln!(f, "Tolerance: {}", self.tolerance)?;
        writeln!(f, "AbsoluteTolerance: {}", self.absolute_tolerance)?;
        writeln!(
            f,
            "RemovePointsWithoutCells: {}",
            on_off(self.remove_points_without_cells)
        )?;
        write!(f, "OutputPointsPrecision: {:?}", self.output_precision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_params() {
        let params = CleanParams::default();
        assert_relative_eq!(params.tolerance, 0.0);
        assert_relative_eq!(params.absolute_tolerance, 1.0);
        assert_eq!(params.tolerance_mode, ToleranceMode::Relative);
        assert!(!params.remove_points_without_cells);
        assert_eq!(params.output_precision, OutputPrecision::MatchInput);
    }

    #[test]
    fn relative_scales_with_length() {
        let params = CleanParams::default().with_tolerance(0.25);
        assert_relative_eq!(params.effective_tolerance(8.0), 2.0);
        assert_relative_eq!(params.effective_tolerance(0.0), 0.0);
    }

    #[test]
    fn absolute_ignores_length() {
        let params = CleanParams::default()
            .with_tolerance(0.5)
            .with_absolute_tolerance(0.2)
            .with_tolerance_mode(ToleranceMode::Absolute);
        assert_relative_eq!(params.effective_tolerance(1000.0), 0.2);
    }

    #[test]
    fn builders_clamp() {
        assert_relative_eq!(CleanParams::default().with_tolerance(3.0).tolerance, 1.0);
        assert_relative_eq!(CleanParams::default().with_tolerance(-1.0).tolerance, 0.0);
        assert_relative_eq!(CleanParams::absolute(-2.0).absolute_tolerance, 0.0);
    }

    #[test]
    fn display_lists_every_setting() {
        let text = CleanParams::absolute(0.5)
            .with_remove_points_without_cells(true)
            .to_string();
        assert!(text.contains("ToleranceIsAbsolute: On"));
        assert!(text.contains("AbsoluteTolerance: 0.5"));
        assert!(text.contains("RemovePointsWithoutCells: On"));
        assert!(text.contains("OutputPointsPrecision: MatchInput"));
    }
}
