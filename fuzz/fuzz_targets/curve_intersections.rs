#![no_main]

use ::arbitrary::Unstructured;
use libfuzzer_sys::fuzz_target;
use pathops::{arbitrary, find_intersections_with, IntersectionStrategy, DEFAULT_PRECISION};

fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    let Ok(deg_a) = u.int_in_range(1..=4) else {
        return;
    };
    let Ok(deg_b) = u.int_in_range(1..=4) else {
        return;
    };
    let Ok(a) = arbitrary::bezier(deg_a, &mut u) else {
        return;
    };
    let Ok(b) = arbitrary::another_bezier(deg_b, &a, &mut u) else {
        return;
    };

    let r = a.control_box().union(b.control_box());
    let tolerance = DEFAULT_PRECISION * r.width().max(r.height()).max(1.0);
    for strategy in [
        IntersectionStrategy::BezierClipping,
        IntersectionStrategy::Subdivision,
    ] {
        let xs = find_intersections_with(&a, &b, DEFAULT_PRECISION, strategy);
        for (s, t) in xs {
            assert!((0.0..=1.0).contains(&s) && (0.0..=1.0).contains(&t));
            assert!((a.eval(s) - b.eval(t)).hypot() <= tolerance);
        }
    }
});
