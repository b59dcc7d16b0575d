use proptest::prelude::*;

use edgesweep::{
    intersect::intersect,
    ops::{self, edge_set_area},
    BooleanKind, BooleanOp, Config, Edge, EdgeProcessor, MergeOp, Point, Polygon,
};

fn point(size: i32) -> impl Strategy<Value = Point> {
    (-size..=size, -size..=size).prop_map(|(x, y)| Point::new(x, y))
}

fn edge() -> impl Strategy<Value = Edge> {
    (point(100), point(100))
        .prop_filter("degenerate", |(p, q)| p != q)
        .prop_map(|(p, q)| Edge::new(p, q))
}

fn rect() -> impl Strategy<Value = Polygon> {
    (point(30), 1..20i32, 1..20i32).prop_map(|(p, w, h)| Polygon::rect(p, (p.x + w, p.y + h)))
}

fn rects() -> impl Strategy<Value = Vec<Polygon>> {
    prop::collection::vec(rect(), 0..5)
}

/// Arbitrary (possibly self-intersecting) polygons.
fn polygons() -> impl Strategy<Value = Vec<Polygon>> {
    prop::collection::vec(
        prop::collection::vec(point(40), 3..7).prop_map(|ring| Polygon::new(ring)),
        0..4,
    )
}

fn sorted(mut edges: Vec<Edge>) -> Vec<Edge> {
    edges.sort();
    edges
}

fn merge_edges(edges: &[Edge]) -> Vec<Edge> {
    let mut ep = EdgeProcessor::default();
    for e in edges {
        ep.insert(*e, 0);
    }
    let mut out: Vec<Edge> = Vec::new();
    ep.process(&mut out, &mut MergeOp::new(0)).unwrap();
    out
}

proptest! {
    #[test]
    fn intersection_is_symmetric(a in edge(), b in edge()) {
        prop_assert_eq!(intersect(&a, &b), intersect(&b, &a));
        prop_assert_eq!(intersect(&a, &b), intersect(&a.reversed(), &b));
    }

    #[test]
    fn and_plus_xor_is_or(a in polygons(), b in polygons()) {
        let and = ops::boolean(&a, &b, BooleanKind::And).unwrap();
        let xor = ops::boolean(&a, &b, BooleanKind::Xor).unwrap();
        let or = ops::boolean(&a, &b, BooleanKind::Or).unwrap();
        prop_assert_eq!(edge_set_area(&and) + edge_set_area(&xor), edge_set_area(&or));

        let a_not_b = ops::boolean(&a, &b, BooleanKind::ANotB).unwrap();
        let b_not_a = ops::boolean(&a, &b, BooleanKind::BNotA).unwrap();
        prop_assert_eq!(edge_set_area(&a_not_b) + edge_set_area(&b_not_a), edge_set_area(&xor));
    }

    #[test]
    fn xor_with_itself_is_empty(a in polygons()) {
        let xor = ops::boolean(&a, &a, BooleanKind::Xor).unwrap();
        prop_assert!(xor.is_empty());
    }

    #[test]
    fn or_with_nothing_is_merge(a in polygons()) {
        let or = ops::boolean(&a, &[], BooleanKind::Or).unwrap();
        let merged = ops::merge(&a, 0).unwrap();
        prop_assert_eq!(or, merged);
    }

    #[test]
    fn merge_is_idempotent(a in rects()) {
        let once = ops::merge(&a, 0).unwrap();
        let twice = merge_edges(&once);
        prop_assert_eq!(sorted(once), sorted(twice));
    }

    #[test]
    fn merge_is_idempotent_at_any_angle(a in polygons()) {
        let once = ops::merge(&a, 0).unwrap();
        let twice = merge_edges(&once);
        prop_assert_eq!(edge_set_area(&once), edge_set_area(&twice));
        prop_assert_eq!(sorted(once), sorted(twice));
    }

    #[test]
    fn skip_cache_is_transparent(a in polygons(), b in polygons()) {
        let with = ops::boolean_with(Config::default(), &a, &b, BooleanKind::Or).unwrap();
        let without =
            ops::boolean_with(Config::default().without_skip_cache(), &a, &b, BooleanKind::Or)
                .unwrap();
        prop_assert_eq!(with, without);
    }

    #[test]
    fn insertion_order_does_not_matter(a in polygons(), b in polygons()) {
        let forward = ops::boolean(&a, &b, BooleanKind::And).unwrap();
        let mut ep = EdgeProcessor::default();
        for p in b.iter().rev() {
            ep.insert_polygon(p, 1);
        }
        for p in a.iter().rev() {
            ep.insert_polygon(p, 0);
        }
        let mut backward: Vec<Edge> = Vec::new();
        ep.process(&mut backward, &mut BooleanOp::new(BooleanKind::And)).unwrap();
        prop_assert_eq!(sorted(forward), sorted(backward));
    }
}
