//! Refining approximate intersections.
//!
//! The clipping iteration stops once the parameter domains are small, but
//! that doesn't mean the midpoints of those domains are the most accurate
//! parameters we can find. We first run a few Newton steps on the residual
//! `a(s) - b(t)`, and then walk the parameters one ulp at a time until the
//! residual stops decreasing.

use arrayvec::ArrayVec;

use super::Bezier;
use crate::num::next_after;

/// The maximal number of Newton steps.
pub const POLISH_NEWTON_ITERATIONS: usize = 4;

/// The maximal number of single-ulp steps.
pub const MAX_ULP_STEPS: usize = 256;

/// Refines the parameters `s` (on `a`) and `t` (on `b`) of an approximate intersection.
///
/// The parameters only ever move if that makes the residual `a(s) - b(t)`
/// strictly smaller: in the Euclidean norm for the Newton steps, and in the
/// L1 norm for the ulp steps. Both parameters stay in `[0, 1]`.
pub fn polish_intersection(a: &Bezier, b: &Bezier, s: &mut f64, t: &mut f64) {
    let da = a.derivative();
    let db = b.derivative();

    let mut best = (a.eval(*s) - b.eval(*t)).hypot2();
    for _ in 0..POLISH_NEWTON_ITERATIONS {
        if best == 0.0 {
            break;
        }
        let f = a.eval(*s) - b.eval(*t);
        let ja = da.eval(*s).to_vec2();
        let jb = db.eval(*t).to_vec2();
        // Solving ja ds - jb dt = -f with Cramer's rule.
        let denom = ja.cross(jb);
        if denom == 0.0 || !denom.is_finite() {
            break;
        }
        let ns = (*s - f.cross(jb) / denom).clamp(0.0, 1.0);
        let nt = (*t - f.cross(ja) / denom).clamp(0.0, 1.0);
        let dist = (a.eval(ns) - b.eval(nt)).hypot2();
        if dist < best {
            best = dist;
            *s = ns;
            *t = nt;
        } else {
            break;
        }
    }

    let residual = |s: f64, t: f64| {
        let d = a.eval(s) - b.eval(t);
        d.x.abs() + d.y.abs()
    };
    let step = |x: f64, dir: f64| next_after(x, dir).clamp(0.0, 1.0);

    let mut best = residual(*s, *t);
    for _ in 0..MAX_ULP_STEPS {
        if best == 0.0 {
            break;
        }
        let up_s = step(*s, f64::INFINITY);
        let down_s = step(*s, f64::NEG_INFINITY);
        let up_t = step(*t, f64::INFINITY);
        let down_t = step(*t, f64::NEG_INFINITY);
        let neighbors: ArrayVec<(f64, f64), 8> = [
            (up_s, *t),
            (down_s, *t),
            (*s, up_t),
            (*s, down_t),
            (up_s, up_t),
            (up_s, down_t),
            (down_s, up_t),
            (down_s, down_t),
        ]
        .into_iter()
        .collect();

        let mut improved = None;
        for (ns, nt) in neighbors {
            let r = residual(ns, nt);
            if r < best {
                best = r;
                improved = Some((ns, nt));
            }
        }
        match improved {
            Some((ns, nt)) => {
                *s = ns;
                *t = nt;
            }
            None => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{CubicBez, Line};

    use super::*;

    #[test]
    fn polish_lines() {
        let a: Bezier = Line::new((0.0, 0.0), (10.0, 10.0)).into();
        let b: Bezier = Line::new((0.0, 10.0), (10.0, 0.0)).into();
        let (mut s, mut t) = (0.48, 0.53);
        polish_intersection(&a, &b, &mut s, &mut t);
        assert!((s - 0.5).abs() < 1e-14);
        assert!((t - 0.5).abs() < 1e-14);
    }

    #[test]
    fn polish_never_gets_worse() {
        let a: Bezier = CubicBez::new((0.0, 0.0), (1.0, 3.0), (2.0, -3.0), (3.0, 0.0)).into();
        let b: Bezier = Line::new((-1.0, 0.1), (4.0, -0.1)).into();
        for (s0, t0) in [(0.0, 0.0), (0.1, 0.3), (0.5, 0.5), (0.9, 0.7), (1.0, 1.0)] {
            let (mut s, mut t) = (s0, t0);
            polish_intersection(&a, &b, &mut s, &mut t);
            assert!((0.0..=1.0).contains(&s));
            assert!((0.0..=1.0).contains(&t));
            let before = (a.eval(s0) - b.eval(t0)).hypot();
            let after = (a.eval(s) - b.eval(t)).hypot();
            // Newton never increases the Euclidean distance, and the ulp walk
            // never increases the L1 distance.
            assert!(after <= before * std::f64::consts::SQRT_2 + 1e-15);
        }
    }

    #[test]
    fn parallel_derivatives_leave_newton_alone() {
        // Two parallel lines have a singular Jacobian everywhere.
        let a: Bezier = Line::new((0.0, 0.0), (10.0, 0.0)).into();
        let b: Bezier = Line::new((0.0, 1.0), (10.0, 1.0)).into();
        let (mut s, mut t) = (0.3, 0.3);
        polish_intersection(&a, &b, &mut s, &mut t);
        assert!((a.eval(s) - b.eval(t)).hypot() <= 1.0);
    }

    #[test]
    fn arbitrary_polish_is_monotone() {
        arbtest::arbtest(|u| {
            let a = crate::arbitrary::bezier(3, u)?;
            let b = crate::arbitrary::bezier(2, u)?;
            let s0 = crate::arbitrary::float_in_range(0.0, 1.0, u)?;
            let t0 = crate::arbitrary::float_in_range(0.0, 1.0, u)?;
            let (mut s, mut t) = (s0, t0);
            polish_intersection(&a, &b, &mut s, &mut t);
            let before = (a.eval(s0) - b.eval(t0)).hypot2();
            let after = (a.eval(s) - b.eval(t)).hypot2();
            // The ulp walk uses the L1 norm, which is within a factor of
            // sqrt(2) of the Euclidean one.
            assert!(after <= 2.0 * before + 1e-24);
            Ok(())
        });
    }
}
