use super::{Evaluator, InsideCount, WindingCounters};
use crate::edges::Property;

/// Merges polygons, optionally keeping only areas covered by several of them.
///
/// A property is inside where its winding number is non-zero. The result is
/// inside where more than `min_wc` properties are inside, so `min_wc = 0`
/// is a plain union and `min_wc = 1` keeps only overlaps.
#[derive(Clone, Debug)]
pub struct MergeOp {
    min_wc: usize,
    wc: WindingCounters,
    inside: InsideCount,
}

impl MergeOp {
    /// Keeps areas covered by more than `min_wc` properties.
    pub fn new(min_wc: usize) -> Self {
        MergeOp {
            min_wc,
            wc: WindingCounters::default(),
            inside: InsideCount::default(),
        }
    }

    fn result(&self, north: bool) -> bool {
        self.inside.get(north) > self.min_wc
    }
}

impl Evaluator for MergeOp {
    fn reset(&mut self) {
        self.wc.reset();
        self.inside = InsideCount::default();
    }

    fn reserve(&mut self, n: usize) {
        self.wc.reserve(n);
    }

    fn edge(&mut self, north: bool, enter: bool, prop: Property) -> i32 {
        let before = self.result(north);
        let (old, new) = self.wc.cross(north, enter, prop);
        self.inside.update(north, old != 0, new != 0);
        i32::from(self.result(north)) - i32::from(before)
    }

    fn compare_ns(&self) -> i32 {
        i32::from(self.result(true)) - i32::from(self.result(false))
    }

    fn is_reset(&self) -> bool {
        self.wc.is_reset()
    }
}
