use criterion::{black_box, criterion_group, criterion_main, Criterion};
use kurbo::Point;

use pathops::{
    find_intersections_with, find_self_intersections, Bezier, IntersectionStrategy,
    DEFAULT_PRECISION,
};

fn bezier(pts: &[(f64, f64)]) -> Bezier {
    Bezier::new(pts.iter().map(|&p| Point::from(p)).collect()).unwrap()
}

fn cubic_pairs(c: &mut Criterion) {
    // Crosses three times.
    let wiggle = bezier(&[(0.0, 0.0), (1.0, 3.0), (2.0, -3.0), (3.0, 0.0)]);
    let line = bezier(&[(-0.5, 0.1), (3.5, -0.1)]);
    // Crosses twice, almost tangentially.
    let arch = bezier(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]);
    let shallow = bezier(&[(-0.1, 0.74), (0.3, 0.76), (0.7, 0.76), (1.1, 0.74)]);

    for (name, strategy) in [
        ("clipping", IntersectionStrategy::BezierClipping),
        ("subdivision", IntersectionStrategy::Subdivision),
    ] {
        c.bench_function(&format!("cubic x line ({name})"), |b| {
            b.iter(|| {
                black_box(find_intersections_with(
                    &wiggle,
                    &line,
                    DEFAULT_PRECISION,
                    strategy,
                ))
            })
        });
        c.bench_function(&format!("cubic x cubic ({name})"), |b| {
            b.iter(|| {
                black_box(find_intersections_with(
                    &arch,
                    &shallow,
                    DEFAULT_PRECISION,
                    strategy,
                ))
            })
        });
    }
}

fn self_intersections(c: &mut Criterion) {
    let looping = bezier(&[(0.0, 0.0), (1.5, 1.0), (-0.5, 1.0), (1.0, 0.0)]);
    c.bench_function("self intersections", |b| {
        b.iter(|| black_box(find_self_intersections(&looping, DEFAULT_PRECISION)))
    });
}

criterion_group!(benches, cubic_pairs, self_intersections);
criterion_main!(benches);
