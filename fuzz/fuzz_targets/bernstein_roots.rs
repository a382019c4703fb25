#![no_main]

use arbitrary::Unstructured;
use libfuzzer_sys::fuzz_target;
use pathops::{arbitrary::float_in_range, num::bernstein_roots};

fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    let Ok(len) = u.int_in_range(2..=8) else {
        return;
    };
    let Ok(coeffs) = (0..len)
        .map(|_| float_in_range(-1e3, 1e3, &mut u))
        .collect::<Result<Vec<_>, _>>()
    else {
        return;
    };

    let roots = bernstein_roots(&coeffs);
    let first = coeffs[0];
    let last = coeffs[len - 1];
    if first.signum() != last.signum() && first != 0.0 && last != 0.0 {
        assert!(!roots.is_empty());
    }
    for w in roots.windows(2) {
        assert!(w[0] <= w[1]);
    }
    for r in roots {
        assert!((0.0..=1.0).contains(&r));
    }
});
