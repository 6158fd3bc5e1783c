//! Progress reporting.

/// Receives the completed fraction of a run, in `[0, 1]`.
///
/// Reports never decrease within a run. Any `FnMut(f64)` closure is a sink.
pub trait ProgressSink {
    /// Called with the completed fraction.
    fn update(&mut self, fraction: f64);
}

impl<F: FnMut(f64)> ProgressSink for F {
    fn update(&mut self, fraction: f64) {
        self(fraction);
    }
}

/// A sink that discards every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn update(&mut self, _fraction: f64) {}
}

/// Reports a pass of `total` items onto the slice `[start, start + span)`
/// of the run, once every hundredth of the pass.
pub(crate) struct PassProgress<'a> {
    sink: &'a mut dyn ProgressSink,
    total: usize,
    step: usize,
    start: f64,
    span: f64,
}

impl<'a> PassProgress<'a> {
    pub(crate) fn new(sink: &'a mut dyn ProgressSink, total: usize, start: f64, span: f64) -> Self {
        Self {
            sink,
            total,
            step: (total / 100).max(1),
            start,
            span,
        }
    }

    /// Report before processing item `index`.
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn checkpoint(&mut self, index: usize) {
        if index % self.step == 0 {
            let done = index as f64 / self.total as f64;
            self.sink.update(self.start + self.span * done);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn small_pass_reports_every_item() {
        let mut seen = Vec::new();
        let mut sink = |f: f64| seen.push(f);
        let mut pass = PassProgress::new(&mut sink, 4, 0.0, 0.8);
        for i in 0..4 {
            pass.checkpoint(i);
        }
        assert_eq!(seen.len(), 4);
        for (got, want) in seen.iter().zip([0.0, 0.2, 0.4, 0.6]) {
            assert_relative_eq!(*got, want, epsilon = 1e-12);
        }
    }

    #[test]
    fn large_pass_is_throttled() {
        let mut count = 0;
        let mut sink = |_: f64| count += 1;
        let mut pass = PassProgress::new(&mut sink, 10_000, 0.8, 0.2);
        for i in 0..10_000 {
            pass.checkpoint(i);
        }
        assert_eq!(count, 100);
    }

    #[test]
    fn no_progress_accepts_anything() {
        let mut sink = NoProgress;
        sink.update(0.5);
    }
}
