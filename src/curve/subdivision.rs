//! Intersecting two curves by recursive bisection.
//!
//! This is slower than clipping, but it's simple enough to be obviously
//! correct, which makes it a useful cross-check.

use super::Bezier;
use crate::geom::{self, Interval};

/// The maximal total number of bisections (counted over both curves) in the
/// subdivision strategy.
pub const SUBDIVISION_MAX_DEPTH: u32 = 12;

/// Finds candidate intersection parameters by bisecting both curves until
/// they're nearly flat, and then intersecting their chords.
///
/// The two curves are bisected alternately, and pairs of pieces with
/// disjoint bounding boxes are discarded.
pub(crate) fn candidates(a: &Bezier, b: &Bezier, precision: f64) -> Vec<(f64, f64)> {
    let mut out = Vec::new();
    let mut stack = vec![(a.clone(), b.clone(), Interval::UNIT, Interval::UNIT, 0)];

    while let Some((a, b, dom_a, dom_b, depth)) = stack.pop() {
        if !geom::rects_overlap(&a.control_box(), &b.control_box(), precision) {
            continue;
        }

        if a.is_constant(precision) && b.is_constant(precision) {
            out.push((dom_a.middle(), dom_b.middle()));
            continue;
        }

        if depth >= SUBDIVISION_MAX_DEPTH {
            if let Some((ta, tb)) = geom::linear_intersect(a.start(), a.end(), b.start(), b.end())
            {
                out.push((dom_a.value_at(ta), dom_b.value_at(tb)));
            }
            continue;
        }

        let (lo, hi) = (Interval::new(0.0, 0.5), Interval::new(0.5, 1.0));
        if depth % 2 == 0 {
            let (a0, a1) = a.split(0.5);
            stack.push((a1, b.clone(), dom_a.sub_interval(hi), dom_b, depth + 1));
            stack.push((a0, b, dom_a.sub_interval(lo), dom_b, depth + 1));
        } else {
            let (b0, b1) = b.split(0.5);
            stack.push((a.clone(), b1, dom_a, dom_b.sub_interval(hi), depth + 1));
            stack.push((a, b0, dom_a, dom_b.sub_interval(lo), depth + 1));
        }
    }
    out
}
