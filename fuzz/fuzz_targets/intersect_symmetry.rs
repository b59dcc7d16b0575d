#![no_main]

use arbitrary::Unstructured;
use edgesweep::{arbitrary::edge, intersect::intersect};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    let Ok(size) = u.int_in_range(1..=1_000_000) else {
        return;
    };
    let (Ok(a), Ok(b)) = (edge(size, &mut u), edge(size, &mut u)) else {
        return;
    };

    let ab = intersect(&a, &b);
    assert_eq!(ab, intersect(&b, &a));
    assert_eq!(ab, intersect(&a.reversed(), &b.reversed()));
    for p in &ab {
        // Rounded crossings are within a unit of both edges' boxes.
        for e in [&a, &b] {
            assert!(p.x >= e.x_min() - 1 && p.x <= e.x_max() + 1);
            assert!(p.y >= e.y_min() - 1 && p.y <= e.y_max() + 1);
        }
    }
});
