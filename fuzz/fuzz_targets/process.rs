#![no_main]

use arbitrary::Unstructured;
use edgesweep::{arbitrary::polygons, ops, BooleanKind, Config};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    let (Ok(a), Ok(b)) = (polygons(1000, 6, &mut u), polygons(1000, 6, &mut u)) else {
        return;
    };

    let or = ops::boolean(&a, &b, BooleanKind::Or).unwrap();
    let uncached =
        ops::boolean_with(Config::default().without_skip_cache(), &a, &b, BooleanKind::Or)
            .unwrap();
    assert_eq!(or, uncached);

    let xor = ops::boolean(&a, &a, BooleanKind::Xor).unwrap();
    assert!(xor.is_empty());
});
