use criterion::{black_box, criterion_group, criterion_main, Criterion};

use edgesweep::{
    generators::{checkerboard, columns, slanted_checkerboard, slanties},
    ops, BooleanKind, BooleanOp, Config, CountingSink, EdgeProcessor, MergeOp, Polygon,
};

fn processor(a: &[Polygon], b: &[Polygon], config: Config) -> EdgeProcessor {
    let mut ep = EdgeProcessor::new(config);
    for p in a {
        ep.insert_polygon(p, 0);
    }
    for p in b {
        ep.insert_polygon(p, 1);
    }
    ep
}

fn just_the_sweep(c: &mut Criterion) {
    let (even, odd) = checkerboard(10);
    let mut ep = processor(&even, &odd, Config::default());
    let mut sink = CountingSink::default();
    ep.process(&mut sink, &mut BooleanOp::new(BooleanKind::Xor))
        .unwrap();

    c.bench_function("just the sweep", |b| {
        b.iter(|| {
            let mut sink = CountingSink::default();
            ep.redo(&mut sink, &mut BooleanOp::new(BooleanKind::Xor))
                .unwrap();
            black_box(sink)
        })
    });
}

fn xor(c: &mut Criterion) {
    let (even, odd) = checkerboard(10);
    c.bench_function("xor", |b| {
        b.iter(|| black_box(ops::boolean(&even, &odd, BooleanKind::Xor)))
    });

    let (even, odd) = slanted_checkerboard(10);
    c.bench_function("xor slanted", |b| {
        b.iter(|| black_box(ops::boolean(&even, &odd, BooleanKind::Xor)))
    });
}

fn slanted_intersections(c: &mut Criterion) {
    let (even, odd) = slanties(20);
    c.bench_function("slanties", |b| {
        b.iter(|| black_box(ops::boolean(&even, &odd, BooleanKind::Or)))
    });
}

fn skip_cache(c: &mut Criterion) {
    let polys = columns(100);
    for (name, config) in [
        ("columns with skip cache", Config::default()),
        ("columns without skip cache", Config::default().without_skip_cache()),
    ] {
        let mut ep = processor(&polys, &[], config);
        let mut sink = CountingSink::default();
        ep.process(&mut sink, &mut MergeOp::new(0)).unwrap();
        c.bench_function(name, |b| {
            b.iter(|| {
                let mut sink = CountingSink::default();
                ep.redo(&mut sink, &mut MergeOp::new(0)).unwrap();
                black_box(sink)
            })
        });
    }
}

criterion_group!(benches, just_the_sweep, xor, slanted_intersections, skip_cache);
criterion_main!(benches);
