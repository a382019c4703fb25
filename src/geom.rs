//! Geometric primitives: parameter intervals, convex hulls, and segment intersection.

use kurbo::{Point, Rect};

use crate::num::{lerp, CheapOrderedFloat};

/// A closed interval of parameter values.
///
/// We use these for sub-domains of curves: `[0, 1]` is the whole curve,
/// and clipping shrinks it.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Interval {
    /// The smaller end.
    pub min: f64,
    /// The larger end.
    pub max: f64,
}

impl Interval {
    /// The unit interval, which is the parameter domain of a whole curve.
    pub const UNIT: Interval = Interval { min: 0.0, max: 1.0 };

    /// Creates the interval spanned by `a` and `b`, in either order.
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Interval { min: a, max: b }
        } else {
            Interval { min: b, max: a }
        }
    }

    /// The length of this interval.
    pub fn extent(&self) -> f64 {
        self.max - self.min
    }

    /// The midpoint of this interval.
    pub fn middle(&self) -> f64 {
        0.5 * (self.min + self.max)
    }

    /// Maps `t` in `[0, 1]` linearly onto this interval.
    pub fn value_at(&self, t: f64) -> f64 {
        lerp(t, self.min, self.max)
    }

    /// Interprets `local` as a sub-interval of `[0, 1]`, and maps it onto this interval.
    ///
    /// If this interval is the domain of some curve `c`, and `local` is a
    /// domain of `c` restricted to this interval, then the result is the
    /// corresponding domain of the original curve.
    pub fn sub_interval(&self, local: Interval) -> Interval {
        Interval {
            min: self.value_at(local.min),
            max: self.value_at(local.max),
        }
    }

    /// The intersection of two intervals, if it's non-empty.
    pub fn intersect(&self, other: &Interval) -> Option<Interval> {
        let min = self.min.max(other.min);
        let max = self.max.min(other.max);
        (min <= max).then_some(Interval { min, max })
    }

    /// Does this interval contain `t`?
    pub fn contains(&self, t: f64) -> bool {
        self.min <= t && t <= self.max
    }

    fn extend(acc: &mut Option<Interval>, t: f64) {
        *acc = Some(match *acc {
            None => Interval { min: t, max: t },
            Some(i) => Interval {
                min: i.min.min(t),
                max: i.max.max(t),
            },
        });
    }

    /// The smallest interval containing all the `ts`, or `None` if there are none.
    pub fn hull_of(ts: impl IntoIterator<Item = f64>) -> Option<Interval> {
        let mut acc = None;
        for t in ts {
            Interval::extend(&mut acc, t);
        }
        acc
    }
}

/// Do two rectangles overlap, after inflating the first by `eps` on every side?
pub fn rects_overlap(a: &Rect, b: &Rect, eps: f64) -> bool {
    a.x0 - eps <= b.x1 && b.x0 <= a.x1 + eps && a.y0 - eps <= b.y1 && b.y0 <= a.y1 + eps
}

/// The bounding box of a non-empty collection of points.
pub fn points_bbox(points: &[Point]) -> Rect {
    let first = points.first().copied().unwrap_or(Point::ZERO);
    points
        .iter()
        .fold(Rect::from_points(first, first), |r, p| r.union_pt(*p))
}

// The z component of (b - a) x (c - a); positive if a, b, c turn counter-clockwise
// (with y pointing up).
fn orientation(a: Point, b: Point, c: Point) -> f64 {
    (b - a).cross(c - a)
}

/// Computes the convex hull of some points, using Andrew's monotone chain.
///
/// The hull is returned in counter-clockwise order (with y pointing up),
/// starting at the point with smallest `x` (and then smallest `y`).
/// Collinear points are dropped, so if all the points are collinear then the
/// hull consists of the two extreme points (or just one point, if they all coincide).
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    let mut pts = points.to_vec();
    pts.sort_by_key(|p| (CheapOrderedFloat::from(p.x), CheapOrderedFloat::from(p.y)));
    pts.dedup();
    if pts.len() <= 2 {
        return pts;
    }

    let mut lower: Vec<Point> = Vec::with_capacity(pts.len());
    for &p in &pts {
        while lower.len() >= 2 && orientation(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0
        {
            lower.pop();
        }
        lower.push(p);
    }

    let mut upper: Vec<Point> = Vec::with_capacity(pts.len());
    for &p in pts.iter().rev() {
        while upper.len() >= 2 && orientation(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0
        {
            upper.pop();
        }
        upper.push(p);
    }

    // The last point of each chain is the first point of the other one.
    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// Intersects the segments `a0 -- a1` and `b0 -- b1`, using Cramer's rule.
///
/// Returns the parameters `(ta, tb)` of the intersection point, both in `[0, 1]`,
/// or `None` if the segments don't intersect. Nearly parallel segments are
/// treated as non-intersecting: the test uses the determinant normalized by
/// the lengths of both segments, so it's scale-invariant.
pub fn linear_intersect(a0: Point, a1: Point, b0: Point, b1: Point) -> Option<(f64, f64)> {
    let ad = a1 - a0;
    let bd = b1 - b0;
    let d = b0 - a0;
    let det = ad.cross(bd);

    let mut det_rel = det;
    if ad.hypot2() > 0.0 && bd.hypot2() > 0.0 {
        det_rel /= ad.hypot() * bd.hypot();
    }
    if det_rel.abs() < f64::EPSILON {
        return None;
    }

    let ta = d.cross(bd) / det;
    let tb = d.cross(ad) / det;
    ((0.0..=1.0).contains(&ta) && (0.0..=1.0).contains(&tb)).then_some((ta, tb))
}
