use std::collections::{BTreeMap, BTreeSet};

use super::{Evaluator, WindingCounters};
use crate::edges::Property;
use crate::geom::Coord;

/// Which relation between primaries and secondaries to report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum InteractionMode {
    /// Pairs that overlap at all.
    Overlapping,
    /// Pairs whose secondary lies inside the union of the primaries.
    Inside,
    /// Secondaries that don't overlap any primary (see
    /// [`InteractionDetector::non_interacting`]).
    Outside,
    /// Pairs whose primary covers all of the secondary on its own.
    Enclosing,
}

/// Finds which polygons interact with each other.
///
/// Properties below `boundary` are primaries, the rest secondaries, and
/// reported pairs are `(primary, secondary)`. A boundary of zero in
/// [`InteractionMode::Overlapping`] mode means that every property is
/// compared with every other one, and pairs come out as `(smaller, larger)`.
#[derive(Clone, Debug)]
pub struct InteractionDetector {
    mode: InteractionMode,
    include_touching: bool,
    boundary: Property,
    wc: WindingCounters,
    /// Properties inside on the north side.
    open: BTreeSet<Property>,
    /// Properties with an edge at the current vertex.
    at_vertex: BTreeSet<Property>,
    in_vertex: bool,
    pairs: BTreeSet<(Property, Property)>,
    seen: BTreeSet<Property>,
    /// Secondaries found to stick out of the primaries.
    outside: BTreeSet<Property>,
    /// For each secondary, the primaries that covered it everywhere so far.
    covering: BTreeMap<Property, BTreeSet<Property>>,
    non_interacting: Vec<Property>,
}

impl InteractionDetector {
    /// A detector in which properties below `boundary` are primaries.
    pub fn new(mode: InteractionMode, include_touching: bool, boundary: Property) -> Self {
        InteractionDetector {
            mode,
            include_touching,
            boundary,
            wc: WindingCounters::default(),
            open: BTreeSet::new(),
            at_vertex: BTreeSet::new(),
            in_vertex: false,
            pairs: BTreeSet::new(),
            seen: BTreeSet::new(),
            outside: BTreeSet::new(),
            covering: BTreeMap::new(),
            non_interacting: Vec::new(),
        }
    }

    /// The interacting pairs, in order. Complete after the sweep has finished.
    pub fn interactions(&self) -> impl Iterator<Item = (Property, Property)> + '_ {
        self.pairs.iter().copied()
    }

    /// In [`InteractionMode::Outside`] mode, the secondaries that interact
    /// with no primary.
    pub fn non_interacting(&self) -> &[Property] {
        &self.non_interacting
    }

    fn all_pairs(&self) -> bool {
        self.boundary == 0 && self.mode == InteractionMode::Overlapping
    }

    fn is_primary(&self, prop: Property) -> bool {
        prop < self.boundary
    }

    fn add_pair(&mut self, a: Property, b: Property) {
        if a == b {
            return;
        }
        if self.all_pairs() {
            self.pairs.insert((a.min(b), a.max(b)));
        } else if self.is_primary(a) != self.is_primary(b) {
            self.pairs.insert(if self.is_primary(a) { (a, b) } else { (b, a) });
        }
    }

    fn open_primaries(&self) -> impl Iterator<Item = Property> + '_ {
        self.open.range(..self.boundary).copied()
    }
}

impl Evaluator for InteractionDetector {
    fn reset(&mut self) {
        self.wc.reset();
        self.open.clear();
        self.at_vertex.clear();
        self.in_vertex = false;
    }

    fn reserve(&mut self, n: usize) {
        self.wc.reserve(n);
    }

    fn edge(&mut self, north: bool, enter: bool, prop: Property) -> i32 {
        if self.in_vertex {
            self.at_vertex.insert(prop);
        }
        if !self.is_primary(prop) {
            self.seen.insert(prop);
        }
        let (old, new) = self.wc.cross(north, enter, prop);
        if north {
            if old == 0 && new != 0 {
                let others: Vec<_> = self.open.iter().copied().collect();
                for other in others {
                    self.add_pair(prop, other);
                }
                self.open.insert(prop);
            } else if old != 0 && new == 0 {
                self.open.remove(&prop);
            }
        }
        0
    }

    fn compare_ns(&self) -> i32 {
        0
    }

    fn is_reset(&self) -> bool {
        self.wc.is_reset()
    }

    fn prefer_touch(&self) -> bool {
        self.include_touching
    }

    fn next_vertex(&mut self, _x: Coord) {
        self.in_vertex = true;
        self.at_vertex.clear();
    }

    fn end_vertex(&mut self) {
        self.in_vertex = false;
        if self.include_touching {
            let touching: Vec<_> = self.at_vertex.iter().copied().collect();
            for (i, &a) in touching.iter().enumerate() {
                for &b in &touching[(i + 1)..] {
                    self.add_pair(a, b);
                }
            }
        }
    }

    fn end_coincident(&mut self) {
        match self.mode {
            InteractionMode::Inside => {
                if self.open_primaries().next().is_none() {
                    let stray: Vec<_> = self.open.range(self.boundary..).copied().collect();
                    self.outside.extend(stray);
                }
            }
            InteractionMode::Enclosing => {
                let primaries: BTreeSet<_> = self.open_primaries().collect();
                let secondaries: Vec<_> = self.open.range(self.boundary..).copied().collect();
                for s in secondaries {
                    self.covering
                        .entry(s)
                        .and_modify(|c| c.retain(|p| primaries.contains(p)))
                        .or_insert_with(|| primaries.clone());
                }
            }
            InteractionMode::Overlapping | InteractionMode::Outside => {}
        }
    }

    fn finish(&mut self) {
        match self.mode {
            InteractionMode::Overlapping => {}
            InteractionMode::Inside => {
                let outside = &self.outside;
                self.pairs.retain(|(_, s)| !outside.contains(s));
            }
            InteractionMode::Outside => {
                let paired: BTreeSet<_> = self.pairs.iter().map(|(_, s)| *s).collect();
                self.non_interacting = self.seen.difference(&paired).copied().collect();
            }
            InteractionMode::Enclosing => {
                let covering = &self.covering;
                self.pairs.retain(|(p, s)| covering.get(s).is_some_and(|c| c.contains(p)));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(det: &mut InteractionDetector, props: &[Property]) {
        det.next_coincident();
        for &p in props {
            det.edge(true, true, p);
        }
        det.end_coincident();
    }

    fn close(det: &mut InteractionDetector, props: &[Property]) {
        det.next_coincident();
        for &p in props {
            det.edge(true, false, p);
        }
        det.end_coincident();
    }

    #[test]
    fn overlapping_all_pairs() {
        let mut det = InteractionDetector::new(InteractionMode::Overlapping, false, 0);
        det.reserve(3);
        det.reset();
        open(&mut det, &[2]);
        open(&mut det, &[0]);
        close(&mut det, &[2]);
        open(&mut det, &[1]);
        close(&mut det, &[0, 1]);
        det.finish();
        assert_eq!(det.interactions().collect::<Vec<_>>(), vec![(0, 1), (0, 2)]);
    }

    #[test]
    fn inside_drops_stray_secondaries() {
        let mut det = InteractionDetector::new(InteractionMode::Inside, false, 1);
        det.reserve(3);
        det.reset();
        // 1 lies within 0, but 2 starts before 0 does.
        open(&mut det, &[2]);
        open(&mut det, &[0]);
        open(&mut det, &[1]);
        close(&mut det, &[1]);
        close(&mut det, &[2]);
        close(&mut det, &[0]);
        det.finish();
        assert_eq!(det.interactions().collect::<Vec<_>>(), vec![(0, 1)]);
    }

    #[test]
    fn outside_reports_loners() {
        let mut det = InteractionDetector::new(InteractionMode::Outside, false, 1);
        det.reserve(3);
        det.reset();
        open(&mut det, &[0]);
        open(&mut det, &[1]);
        close(&mut det, &[1]);
        close(&mut det, &[0]);
        open(&mut det, &[2]);
        close(&mut det, &[2]);
        det.finish();
        assert_eq!(det.non_interacting(), &[2]);
    }

    #[test]
    fn enclosing_needs_a_single_cover() {
        let mut det = InteractionDetector::new(InteractionMode::Enclosing, false, 2);
        det.reserve(4);
        det.reset();
        // Secondary 2 spans primaries 0 and 1; secondary 3 sits inside 1.
        open(&mut det, &[0]);
        open(&mut det, &[2]);
        open(&mut det, &[1]);
        close(&mut det, &[0]);
        close(&mut det, &[2]);
        open(&mut det, &[3]);
        close(&mut det, &[3]);
        close(&mut det, &[1]);
        det.finish();
        assert_eq!(det.interactions().collect::<Vec<_>>(), vec![(1, 3)]);
    }

    #[test]
    fn touching_at_a_vertex() {
        let mut det = InteractionDetector::new(InteractionMode::Overlapping, true, 0);
        det.reserve(2);
        det.reset();
        det.next_vertex(10);
        det.next_coincident();
        det.edge(false, false, 0);
        det.end_coincident();
        det.next_coincident();
        det.edge(true, true, 1);
        det.end_coincident();
        det.end_vertex();
        det.finish();
        assert_eq!(det.interactions().collect::<Vec<_>>(), vec![(0, 1)]);
    }
}
