//! Progress reporting and cancellation.

/// The progress collaborator asked us to stop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("operation cancelled")]
pub struct Cancelled;

/// Something that wants to hear about the progress of a long operation.
///
/// Returning `Err(Cancelled)` aborts the operation. Output sinks still get
/// flushed, but whatever they received is not guaranteed to be consistent.
pub trait Progress {
    /// Reports that `fraction` (between 0 and 1) of the work is done.
    fn report(&mut self, fraction: f64) -> Result<(), Cancelled>;
}

/// Cancels once a given fraction has been reached.
///
/// Mostly useful for testing that cancellation leaves things in a sane state.
#[derive(Clone, Debug)]
pub struct CancelAfter {
    /// The fraction at which to cancel.
    pub limit: f64,
    /// How many reports we have seen.
    pub reports: usize,
}

impl CancelAfter {
    /// Cancels at the first report of at least `limit`.
    pub fn new(limit: f64) -> Self {
        CancelAfter { limit, reports: 0 }
    }
}

impl Progress for CancelAfter {
    fn report(&mut self, fraction: f64) -> Result<(), Cancelled> {
        self.reports += 1;
        if fraction >= self.limit {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Throttles reports to the collaborator and maps them into a sub-range of
/// the whole operation.
pub(crate) struct Reporter<'a> {
    progress: &'a mut Option<Box<dyn Progress>>,
    interval: usize,
    ticks: usize,
    offset: f64,
    scale: f64,
}

impl<'a> Reporter<'a> {
    pub fn new(progress: &'a mut Option<Box<dyn Progress>>, interval: usize) -> Self {
        Reporter {
            progress,
            interval: interval.max(1),
            ticks: 0,
            offset: 0.0,
            scale: 1.0,
        }
    }

    /// Subsequent reports cover `[start, end)` of the whole operation.
    pub fn phase(&mut self, start: f64, end: f64) {
        self.offset = start;
        self.scale = end - start;
        self.ticks = 0;
    }

    /// Records that `done` out of `total` steps of the current phase are
    /// finished, passing it on every `interval` ticks.
    pub fn tick(&mut self, done: usize, total: usize) -> Result<(), Cancelled> {
        self.ticks += 1;
        if self.ticks % self.interval != 0 {
            return Ok(());
        }
        match self.progress.as_deref_mut() {
            Some(p) => {
                let frac = if total == 0 {
                    1.0
                } else {
                    done as f64 / total as f64
                };
                p.report(self.offset + self.scale * frac)
            }
            None => Ok(()),
        }
    }
}
