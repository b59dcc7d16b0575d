use super::{Evaluator, InsideCount, WindingCounters};
use crate::edges::Property;

/// How a winding number decides whether a point is inside one operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum WindingRule {
    /// Inside if the winding number is non-zero.
    NonZero,
    /// Inside if the winding number is odd.
    EvenOdd,
    /// Inside if the winding number is positive.
    Positive,
    /// Inside if the winding number is negative.
    Negative,
    /// Inside if the winding number is at least this much.
    AtLeast(i32),
}

impl WindingRule {
    /// Does winding number `wc` count as inside?
    pub fn is_inside(self, wc: i32) -> bool {
        match self {
            WindingRule::NonZero => wc != 0,
            WindingRule::EvenOdd => wc % 2 != 0,
            WindingRule::Positive => wc > 0,
            WindingRule::Negative => wc < 0,
            WindingRule::AtLeast(n) => wc >= n,
        }
    }
}

/// The set operation applied to the two operands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum BooleanKind {
    /// Inside both operands.
    And,
    /// Inside either operand.
    Or,
    /// Inside exactly one operand.
    Xor,
    /// Inside A but not B.
    ANotB,
    /// Inside B but not A.
    BNotA,
}

impl BooleanKind {
    /// The result at a point, given whether it is inside A and B.
    pub fn combine(self, a: bool, b: bool) -> bool {
        match self {
            BooleanKind::And => a && b,
            BooleanKind::Or => a || b,
            BooleanKind::Xor => a != b,
            BooleanKind::ANotB => a && !b,
            BooleanKind::BNotA => b && !a,
        }
    }
}

/// Boolean operations between operand A (even properties) and operand B
/// (odd properties).
///
/// A point is inside an operand if it is inside (according to that
/// operand's [`WindingRule`]) at least one of the operand's properties.
/// A rule that holds at winding number zero, like `AtLeast(0)`, makes every
/// property inside far away from its edges, so the operand becomes the
/// complement of where the rule fails.
#[derive(Clone, Debug)]
pub struct BooleanOp {
    kind: BooleanKind,
    rule_a: WindingRule,
    rule_b: WindingRule,
    wc: WindingCounters,
    inside_a: InsideCount,
    inside_b: InsideCount,
    /// How many properties of each operand are inside at winding number zero.
    at_zero: (usize, usize),
}

impl BooleanOp {
    /// A boolean operation using the non-zero rule on both operands.
    pub fn new(kind: BooleanKind) -> Self {
        Self::with_rules(kind, WindingRule::NonZero, WindingRule::NonZero)
    }

    /// A boolean operation with a separate winding rule for each operand.
    pub fn with_rules(kind: BooleanKind, rule_a: WindingRule, rule_b: WindingRule) -> Self {
        BooleanOp {
            kind,
            rule_a,
            rule_b,
            wc: WindingCounters::default(),
            inside_a: InsideCount::default(),
            inside_b: InsideCount::default(),
            at_zero: (0, 0),
        }
    }

    fn result(&self, north: bool) -> bool {
        self.kind
            .combine(self.inside_a.get(north) > 0, self.inside_b.get(north) > 0)
    }
}

impl Evaluator for BooleanOp {
    fn reset(&mut self) {
        self.wc.reset();
        self.inside_a = InsideCount::uniform(self.at_zero.0);
        self.inside_b = InsideCount::uniform(self.at_zero.1);
    }

    fn reserve(&mut self, n: usize) {
        self.wc.reserve(n);
        let props = self.wc.len();
        let count = |rule: WindingRule, of_class: usize| {
            if rule.is_inside(0) {
                of_class
            } else {
                0
            }
        };
        self.at_zero = (count(self.rule_a, props.div_ceil(2)), count(self.rule_b, props / 2));
    }

    fn edge(&mut self, north: bool, enter: bool, prop: Property) -> i32 {
        let before = self.result(north);
        let (old, new) = self.wc.cross(north, enter, prop);
        let (rule, inside) = if prop % 2 == 0 {
            (self.rule_a, &mut self.inside_a)
        } else {
            (self.rule_b, &mut self.inside_b)
        };
        inside.update(north, rule.is_inside(old), rule.is_inside(new));
        i32::from(self.result(north)) - i32::from(before)
    }

    fn compare_ns(&self) -> i32 {
        i32::from(self.result(true)) - i32::from(self.result(false))
    }

    fn is_reset(&self) -> bool {
        self.wc.is_reset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules() {
        assert!(WindingRule::EvenOdd.is_inside(-3));
        assert!(!WindingRule::EvenOdd.is_inside(2));
        assert!(WindingRule::Negative.is_inside(-1));
        assert!(!WindingRule::Positive.is_inside(0));
        assert!(WindingRule::AtLeast(2).is_inside(3));
        assert!(!WindingRule::AtLeast(2).is_inside(1));
    }

    #[test]
    fn and_transitions() {
        let mut op = BooleanOp::new(BooleanKind::And);
        op.reserve(2);
        op.reset();
        assert_eq!(op.edge(true, true, 0), 0);
        assert_eq!(op.edge(true, true, 1), 1);
        assert_eq!(op.compare_ns(), 1);
        assert_eq!(op.edge(true, false, 0), -1);
        assert_eq!(op.edge(true, false, 1), 0);
        assert!(op.is_reset());
    }

    #[test]
    fn a_not_b() {
        let mut op = BooleanOp::new(BooleanKind::ANotB);
        op.reserve(4);
        op.reset();
        assert_eq!(op.edge(false, true, 2), 1);
        assert_eq!(op.edge(false, true, 3), -1);
        assert_eq!(op.edge(false, false, 3), 1);
        assert_eq!(op.compare_ns(), -1);
    }

    #[test]
    fn rule_true_at_zero() {
        let mut op = BooleanOp::with_rules(BooleanKind::Or, WindingRule::AtLeast(0), WindingRule::NonZero);
        op.reserve(2);
        op.reset();
        assert_eq!(op.compare_ns(), 0);
        assert_eq!(op.edge(true, false, 0), -1);
        assert_eq!(op.edge(true, true, 0), 1);
        assert_eq!(op.edge(true, true, 1), 0);
        assert_eq!(op.edge(true, false, 1), 0);
        assert!(op.is_reset());
    }

    #[test]
    fn even_odd_operand() {
        let mut op = BooleanOp::with_rules(BooleanKind::Or, WindingRule::EvenOdd, WindingRule::NonZero);
        op.reserve(1);
        op.reset();
        assert_eq!(op.edge(true, true, 0), 1);
        assert_eq!(op.edge(true, true, 0), -1);
        assert_eq!(op.edge(true, false, 0), 1);
    }
}
