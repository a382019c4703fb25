//! Bézier curves of arbitrary degree, and intersections between them.
//!
//! The main entry points are [`find_intersections`], which finds the
//! parameters at which two curves cross, and [`find_self_intersections`],
//! which does the same for a single curve crossing itself.

use arrayvec::ArrayVec;
use kurbo::{CubicBez, Line, PathSeg, Point, QuadBez, Rect, Vec2};

use crate::{geom, Error};

pub mod fat_line;
mod intersect;
mod polish;
mod self_intersect;
mod subdivision;

pub use intersect::{
    find_intersections, find_intersections_with, IntersectionStrategy, DEFAULT_PRECISION,
    MAX_CLIP_ITERATIONS, MAX_PRECISION, MAX_SUBDIVISION_DEPTH, MIN_CLIPPED_SIZE_THRESHOLD,
};
pub use polish::{polish_intersection, MAX_ULP_STEPS, POLISH_NEWTON_ITERATIONS};
pub use self_intersect::find_self_intersections;
pub use subdivision::SUBDIVISION_MAX_DEPTH;

// Curves with at most this many control points are evaluated without allocating.
const INLINE_POINTS: usize = 8;

/// A Bézier curve of arbitrary degree.
///
/// The curve is defined by its control points; a curve with `n + 1` control
/// points has degree `n`. Curves built through the public API have at least
/// two control points. Internally, we sometimes build constant curves with a
/// single control point (for example, the derivative of a line).
#[derive(Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Vec<Point>", into = "Vec<Point>")]
pub struct Bezier {
    pts: Vec<Point>,
}

impl std::fmt::Debug for Bezier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for p in &self.pts {
            if !first {
                write!(f, " -- ")?;
            }
            write!(f, "({:?}, {:?})", p.x, p.y)?;
            first = false;
        }
        Ok(())
    }
}

impl TryFrom<Vec<Point>> for Bezier {
    type Error = Error;

    fn try_from(pts: Vec<Point>) -> Result<Self, Error> {
        Bezier::new(pts)
    }
}

impl From<Bezier> for Vec<Point> {
    fn from(b: Bezier) -> Self {
        b.pts
    }
}

impl Bezier {
    /// Creates a curve from its control points.
    ///
    /// Returns [`Error::TooFewControlPoints`] if there are fewer than two.
    pub fn new(pts: Vec<Point>) -> Result<Self, Error> {
        if pts.len() < 2 {
            return Err(Error::TooFewControlPoints(pts.len()));
        }
        Ok(Bezier { pts })
    }

    pub(crate) fn from_raw(pts: Vec<Point>) -> Self {
        debug_assert!(!pts.is_empty());
        Bezier { pts }
    }

    /// The degree of this curve, which is one less than the number of control points.
    pub fn degree(&self) -> usize {
        self.pts.len() - 1
    }

    /// The control points.
    pub fn control_points(&self) -> &[Point] {
        &self.pts
    }

    /// The first control point, which is also the point at `t = 0`.
    pub fn start(&self) -> Point {
        self.pts[0]
    }

    /// The last control point, which is also the point at `t = 1`.
    pub fn end(&self) -> Point {
        self.pts[self.pts.len() - 1]
    }

    /// Evaluates the curve at `t`, using de Casteljau's algorithm.
    pub fn eval(&self, t: f64) -> Point {
        if t == 0.0 {
            return self.start();
        }
        if t == 1.0 {
            return self.end();
        }
        if self.pts.len() <= INLINE_POINTS {
            let mut buf: ArrayVec<Point, INLINE_POINTS> = self.pts.iter().copied().collect();
            de_casteljau(&mut buf, t)
        } else {
            de_casteljau(&mut self.pts.clone(), t)
        }
    }

    /// The derivative (hodograph) of this curve, as a curve of one lower degree.
    ///
    /// The derivative of a constant curve is the constant zero curve.
    pub fn derivative(&self) -> Bezier {
        let n = self.degree();
        if n == 0 {
            return Bezier::from_raw(vec![Point::ZERO]);
        }
        let scale = n as f64;
        Bezier::from_raw(
            self.pts
                .windows(2)
                .map(|w| ((w[1] - w[0]) * scale).to_point())
                .collect(),
        )
    }

    /// Evaluates the curve and its first `n` derivatives at `t`.
    ///
    /// The returned vector has `n + 1` entries: the position (as a vector
    /// from the origin), then the first derivative, and so on.
    pub fn value_and_derivatives(&self, t: f64, n: usize) -> Vec<Vec2> {
        let mut ret = Vec::with_capacity(n + 1);
        ret.push(self.eval(t).to_vec2());
        let mut d = self.clone();
        for _ in 0..n {
            d = d.derivative();
            ret.push(d.eval(t).to_vec2());
        }
        ret
    }

    /// Splits this curve at `t`, returning the parts before and after.
    pub fn split(&self, t: f64) -> (Bezier, Bezier) {
        let n = self.pts.len();
        let mut work = self.pts.clone();
        let mut left = Vec::with_capacity(n);
        let mut right = Vec::with_capacity(n);
        left.push(work[0]);
        right.push(work[n - 1]);
        for level in 1..n {
            for i in 0..n - level {
                work[i] = work[i].lerp(work[i + 1], t);
            }
            left.push(work[0]);
            right.push(work[n - 1 - level]);
        }
        right.reverse();
        (Bezier::from_raw(left), Bezier::from_raw(right))
    }

    /// Returns the part of this curve between `from` and `to`, reparametrized to `[0, 1]`.
    ///
    /// If `from > to`, the result runs backwards.
    pub fn portion(&self, from: f64, to: f64) -> Bezier {
        if from > to {
            return self.portion(to, from).reversed();
        }
        if from == 0.0 && to == 1.0 {
            return self.clone();
        }
        if from >= 1.0 {
            return Bezier::from_raw(vec![self.end(); self.pts.len()]);
        }

        let right = if from == 0.0 {
            self.clone()
        } else {
            self.split(from).1
        };
        let local_to = (to - from) / (1.0 - from);
        if local_to >= 1.0 {
            right
        } else {
            right.split(local_to).0
        }
    }

    /// The same curve, traversed backwards.
    pub fn reversed(&self) -> Bezier {
        let mut pts = self.pts.clone();
        pts.reverse();
        Bezier { pts }
    }

    /// Are all the control points within distance `eps` of the first one?
    pub fn is_constant(&self, eps: f64) -> bool {
        let p0 = self.start();
        self.pts.iter().all(|p| (*p - p0).hypot() <= eps)
    }

    /// Do all the control points coincide exactly?
    pub fn is_degenerate(&self) -> bool {
        let p0 = self.start();
        self.pts.iter().all(|p| *p == p0)
    }

    /// The bounding box of the control polygon, which contains the curve.
    pub fn control_box(&self) -> Rect {
        geom::points_bbox(&self.pts)
    }

    /// Converts this curve to a `kurbo` path segment, if its degree is between 1 and 3.
    pub fn to_path_seg(&self) -> Option<PathSeg> {
        match self.pts[..] {
            [p0, p1] => Some(PathSeg::Line(Line::new(p0, p1))),
            [p0, p1, p2] => Some(PathSeg::Quad(QuadBez::new(p0, p1, p2))),
            [p0, p1, p2, p3] => Some(PathSeg::Cubic(CubicBez::new(p0, p1, p2, p3))),
            _ => None,
        }
    }
}

fn de_casteljau(buf: &mut [Point], t: f64) -> Point {
    let n = buf.len();
    for level in 1..n {
        for i in 0..n - level {
            buf[i] = buf[i].lerp(buf[i + 1], t);
        }
    }
    buf[0]
}

impl From<Line> for Bezier {
    fn from(l: Line) -> Self {
        Bezier::from_raw(vec![l.p0, l.p1])
    }
}

impl From<QuadBez> for Bezier {
    fn from(q: QuadBez) -> Self {
        Bezier::from_raw(vec![q.p0, q.p1, q.p2])
    }
}

impl From<CubicBez> for Bezier {
    fn from(c: CubicBez) -> Self {
        Bezier::from_raw(vec![c.p0, c.p1, c.p2, c.p3])
    }
}

impl From<PathSeg> for Bezier {
    fn from(seg: PathSeg) -> Self {
        match seg {
            PathSeg::Line(l) => l.into(),
            PathSeg::Quad(q) => q.into(),
            PathSeg::Cubic(c) => c.into(),
        }
    }
}
