#![no_main]

use ::arbitrary::Unstructured;
use libfuzzer_sys::fuzz_target;
use pathops::{arbitrary, find_self_intersections, DEFAULT_PRECISION};

fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    let Ok(degree) = u.int_in_range(1..=5) else {
        return;
    };
    let Ok(c) = arbitrary::bezier(degree, &mut u) else {
        return;
    };

    let r = c.control_box();
    let tolerance = DEFAULT_PRECISION * r.width().max(r.height()).max(1.0);
    for (s, t) in find_self_intersections(&c, DEFAULT_PRECISION) {
        assert!((0.0..=1.0).contains(&s) && (0.0..=1.0).contains(&t));
        assert!((c.eval(s) - c.eval(t)).hypot() <= tolerance);
    }
});
