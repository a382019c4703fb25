use super::{find_intersections, polish::polish_intersection, Bezier};
use crate::{geom::Interval, num::bernstein_roots, num::CheapOrderedFloat};

/// Finds the pairs of parameters `(s, t)` with `s < t` at which `curve` crosses itself.
///
/// We split the curve at the extrema of its coordinates, which leaves pieces
/// that are monotonic in both `x` and `y`. Such a piece can't cross itself,
/// so it's enough to intersect all pairs of distinct pieces. Neighboring
/// pieces always meet at their shared endpoint, and we don't report that.
pub fn find_self_intersections(curve: &Bezier, precision: f64) -> Vec<(f64, f64)> {
    let deriv = curve.derivative();
    let xs: Vec<f64> = deriv.control_points().iter().map(|p| p.x).collect();
    let ys: Vec<f64> = deriv.control_points().iter().map(|p| p.y).collect();

    let mut splits = vec![0.0, 1.0];
    splits.extend(bernstein_roots(&xs));
    splits.extend(bernstein_roots(&ys));
    splits.sort_by_key(|t| CheapOrderedFloat::from(*t));

    // Nearly equal splits would leave a sliver piece between them, and then
    // the pieces on either side wouldn't count as neighbors.
    let mut merged: Vec<f64> = Vec::with_capacity(splits.len());
    for t in splits {
        match merged.last() {
            Some(&last) if t - last <= precision => {}
            _ => merged.push(t),
        }
    }
    if let Some(last) = merged.last_mut() {
        *last = 1.0;
    }

    let pieces: Vec<(Interval, Bezier)> = merged
        .windows(2)
        .map(|w| (Interval::new(w[0], w[1]), curve.portion(w[0], w[1])))
        .collect();

    let mut ret = Vec::new();
    for (i, (dom_i, piece_i)) in pieces.iter().enumerate() {
        for (j, (dom_j, piece_j)) in pieces.iter().enumerate().skip(i + 1) {
            for (s, t) in find_intersections(piece_i, piece_j, precision) {
                let mut s = dom_i.value_at(s);
                let mut t = dom_j.value_at(t);
                if j == i + 1 {
                    let shared = dom_i.max;
                    if (s - shared).abs() <= precision && (t - shared).abs() <= precision {
                        continue;
                    }
                }
                polish_intersection(curve, curve, &mut s, &mut t);
                if (t - s).abs() > precision {
                    ret.push((s.min(t), s.max(t)));
                }
            }
        }
    }
    ret
}

#[cfg(test)]
mod tests {
    use kurbo::{CubicBez, Line, QuadBez};

    use super::*;

    #[test]
    fn looping_cubic() {
        let c: Bezier = CubicBez::new((0.0, 0.0), (1.5, 1.0), (-0.5, 1.0), (1.0, 0.0)).into();
        let xs = find_self_intersections(&c, 1e-5);
        assert_eq!(xs.len(), 1, "{xs:?}");

        let (s, t) = xs[0];
        let root = 21.0f64.sqrt();
        assert!((s - (7.0 - root) / 14.0).abs() < 1e-7);
        assert!((t - (7.0 + root) / 14.0).abs() < 1e-7);
        assert!((c.eval(s) - c.eval(t)).hypot() < 1e-9);
    }

    #[test]
    fn simple_curves_have_no_self_intersections() {
        let c: Bezier = CubicBez::new((0.0, 0.0), (1.0, 2.0), (3.0, -1.0), (4.0, 1.0)).into();
        assert!(find_self_intersections(&c, 1e-5).is_empty());

        let q: Bezier = QuadBez::new((0.0, 0.0), (1.0, 2.0), (2.0, 0.0)).into();
        assert!(find_self_intersections(&q, 1e-5).is_empty());

        let l: Bezier = Line::new((0.0, 0.0), (1.0, 1.0)).into();
        assert!(find_self_intersections(&l, 1e-5).is_empty());
    }

    #[test]
    fn folded_quadratic() {
        // The control points are collinear, so the curve runs out and comes
        // back along the same line. Its x and y turn around at nearly (but
        // not exactly) the same parameter.
        let q: Bezier = QuadBez::new((0.0, 0.0), (-6.5, -1.3), (5.0, 1.0)).into();
        assert_eq!(find_self_intersections(&q, 1e-5), vec![]);
    }
}
