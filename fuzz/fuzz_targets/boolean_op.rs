#![no_main]

use ::arbitrary::Unstructured;
use libfuzzer_sys::fuzz_target;
use pathops::{arbitrary, boolean_op, BooleanOp, Options};

fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    let curvy: bool = u.arbitrary().unwrap_or(false);
    let shape = |u: &mut Unstructured<'_>| {
        if curvy {
            arbitrary::curvy_path(6, u)
        } else {
            arbitrary::polygon(8, u)
        }
    };
    let (Ok(a), Ok(b)) = (shape(&mut u), shape(&mut u)) else {
        return;
    };

    // Degenerate inputs may legitimately fail, but they shouldn't panic.
    let opts = Options::default();
    for op in [
        BooleanOp::Union,
        BooleanOp::Intersection,
        BooleanOp::Difference,
        BooleanOp::ReverseDifference,
        BooleanOp::Xor,
    ] {
        let _ = boolean_op(&a, &b, op, &opts);
    }
});
