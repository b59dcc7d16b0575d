//! Skipping runs of edges that look the same as on the previous scanline.
//!
//! Away from vertices, consecutive scanlines cross the same edges in the
//! same order. If a run of such crossings starts and ends with every
//! evaluator reset, replaying it cannot change any evaluator state, and the
//! only thing the sinks would learn from it is which result edges pass
//! through. So we remember such runs for one scanline, keyed by their first
//! edge, and on the next scanline we only tell the sinks how many result
//! edges were in there.

use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SkipEntry {
    /// The number of slots in the run.
    pub len: usize,
    /// The last edge of the run.
    pub last: usize,
    /// For each sink, the number of result edges in the run.
    pub counts: Vec<usize>,
}

/// A run that is being recorded.
#[derive(Clone, Debug)]
pub(crate) struct Run {
    /// The first slot of the run.
    pub start: usize,
    pub first_edge: usize,
    pub counts: Vec<usize>,
}

impl Run {
    pub fn new(start: usize, first_edge: usize, pairs: usize) -> Self {
        Run {
            start,
            first_edge,
            counts: vec![0; pairs],
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct SkipCache {
    threshold: usize,
    /// Runs seen on the previous scanline.
    prev: HashMap<usize, SkipEntry>,
    /// Runs seen (or skipped) on the current scanline.
    next: HashMap<usize, SkipEntry>,
    pub hits: usize,
    pub skipped_slots: usize,
}

impl SkipCache {
    pub fn new(threshold: usize) -> Self {
        SkipCache {
            threshold,
            ..Self::default()
        }
    }

    pub fn enabled(&self) -> bool {
        self.threshold > 0
    }

    /// Moves on to the next scanline, forgetting anything older than the
    /// one just finished.
    pub fn advance(&mut self) {
        std::mem::swap(&mut self.prev, &mut self.next);
        self.next.clear();
    }

    /// Removes and returns the run from the previous scanline starting with
    /// `first_edge`.
    pub fn take(&mut self, first_edge: usize) -> Option<SkipEntry> {
        self.prev.remove(&first_edge)
    }

    /// Remembers a skipped run for the next scanline.
    pub fn keep(&mut self, first_edge: usize, entry: SkipEntry) {
        self.hits += 1;
        self.skipped_slots += entry.len;
        self.next.insert(first_edge, entry);
    }

    /// Stores a finished run, if it is long enough to be worth it.
    pub fn store(&mut self, run: Run, end: usize, last_edge: usize) {
        let len = end - run.start;
        if self.enabled() && len >= self.threshold {
            self.next.insert(
                run.first_edge,
                SkipEntry {
                    len,
                    last: last_edge,
                    counts: run.counts,
                },
            );
        }
    }
}
