//! Fat lines, and clipping one curve against the fat line of another.
//!
//! A fat line is a strip between two parallel lines that contains the whole
//! control polygon of a curve. If some other curve intersects our curve, it
//! does so inside the strip, and so the parts of the other curve that lie
//! outside the strip can be discarded. Because a Bézier curve lies in the
//! convex hull of its control points, we can find a parameter interval
//! containing every part of the other curve inside the strip by looking at
//! the convex hull of its "distance curve."

use kurbo::Point;

use super::Bezier;
use crate::geom::{self, Interval};

/// A strip between two parallel lines.
///
/// The lines are described by a normalized line equation `a x + b y + c = 0`
/// (with `a^2 + b^2 = 1`), and an interval of signed distances from it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FatLine {
    a: f64,
    b: f64,
    c: f64,
    bounds: Interval,
}

impl FatLine {
    /// Computes the fat line of `curve`.
    ///
    /// The center line goes through the first control point and the last
    /// control point that isn't within `precision` of the first one, and the
    /// strip is the narrowest one around it that contains all the control
    /// points. Returns `None` if the curve is constant (up to `precision`),
    /// because then there's no sensible direction for the strip.
    pub fn new(curve: &Bezier, precision: f64) -> Option<FatLine> {
        let pts = curve.control_points();
        let p0 = pts[0];
        let far = pts[1..]
            .iter()
            .rev()
            .find(|p| (**p - p0).hypot() > precision)?;

        let a = far.y - p0.y;
        let b = p0.x - far.x;
        let len = a.hypot(b);
        if len == 0.0 || !len.is_finite() {
            return None;
        }
        let (a, b) = (a / len, b / len);
        let c = -(a * p0.x + b * p0.y);

        let mut line = FatLine {
            a,
            b,
            c,
            bounds: Interval::new(0.0, 0.0),
        };
        let dists = pts.iter().map(|p| line.signed_distance(*p));
        line.bounds = Interval::hull_of(dists.chain(std::iter::once(0.0)))?;
        Some(line)
    }

    /// A strip through the middle of the (nearly constant) `clipper`,
    /// orthogonal to the chord of `target`.
    ///
    /// Returns `None` if `target` is also constant, because then it has no
    /// chord.
    fn orthogonal(clipper: &Bezier, target: &Bezier, precision: f64) -> Option<FatLine> {
        let m = clipper.start().midpoint(clipper.end());
        let pts = target.control_points();
        let p0 = pts[0];
        let far = pts[1..]
            .iter()
            .rev()
            .find(|p| (**p - p0).hypot() > precision)?;

        let dir = *far - p0;
        let len = dir.hypot();
        if len == 0.0 || !len.is_finite() {
            return None;
        }
        let (a, b) = (dir.x / len, dir.y / len);
        let mut line = FatLine {
            a,
            b,
            c: -(a * m.x + b * m.y),
            bounds: Interval::new(0.0, 0.0),
        };
        let dists = clipper
            .control_points()
            .iter()
            .map(|p| line.signed_distance(*p));
        line.bounds = Interval::hull_of(dists.chain(std::iter::once(0.0)))?;
        Some(line)
    }

    /// The signed distance from the center line to `p`.
    pub fn signed_distance(&self, p: Point) -> f64 {
        self.a * p.x + self.b * p.y + self.c
    }

    /// The range of signed distances covered by the strip.
    pub fn bounds(&self) -> Interval {
        self.bounds
    }

    /// Finds the parameter interval of `target` that might lie inside this strip.
    ///
    /// Every parameter at which `target` is inside the strip belongs to the
    /// returned interval, but the interval may be larger than necessary.
    /// Returns `None` if `target` is definitely outside the strip.
    pub fn clip(&self, target: &Bezier) -> Option<Interval> {
        let pts = target.control_points();
        if pts.len() == 1 {
            return self
                .bounds
                .contains(self.signed_distance(pts[0]))
                .then_some(Interval::UNIT);
        }

        // The distance from the center line is itself a polynomial in t, whose
        // Bernstein coefficients are the distances of the control points. Its
        // graph lies in the convex hull of the points (i / n, d_i).
        let n = (pts.len() - 1) as f64;
        let dist_pts: Vec<Point> = pts
            .iter()
            .enumerate()
            .map(|(i, p)| Point::new(i as f64 / n, self.signed_distance(*p)))
            .collect();
        let hull = geom::convex_hull(&dist_pts);
        let lo = self.bounds.min;
        let hi = self.bounds.max;

        let mut ts = Vec::new();
        let mut prev = hull[hull.len() - 1];
        for &cur in &hull {
            if self.bounds.contains(cur.y) {
                ts.push(cur.x);
            }
            if (prev.y < lo) != (cur.y < lo) {
                ts.push(crossing_t(prev, cur, lo));
            }
            if (prev.y > hi) != (cur.y > hi) {
                ts.push(crossing_t(prev, cur, hi));
            }
            prev = cur;
        }

        Interval::hull_of(ts)
    }
}

// The t coordinate at which the hull edge from p to q crosses the level d.
fn crossing_t(p: Point, q: Point, d: f64) -> f64 {
    (p.x + (d - p.y) * (q.x - p.x) / (q.y - p.y)).clamp(0.0, 1.0)
}

/// Clips `target` against the fat line of `clipper`.
///
/// Returns the part of `target`'s domain (as a sub-interval of `[0, 1]`)
/// that might intersect `clipper`, or `None` if they definitely don't
/// intersect. If `clipper` is constant (up to `precision`) and so has no
/// fat line, we clip against a strip through it that is orthogonal to
/// `target`'s chord. If both are constant, the whole domain survives
/// exactly when their control boxes are within `precision`.
pub fn clip(clipper: &Bezier, target: &Bezier, precision: f64) -> Option<Interval> {
    if let Some(line) = FatLine::new(clipper, precision) {
        return line.clip(target);
    }
    match FatLine::orthogonal(clipper, target, precision) {
        Some(line) => line.clip(target),
        None => geom::rects_overlap(&clipper.control_box(), &target.control_box(), precision)
            .then_some(Interval::UNIT),
    }
}
