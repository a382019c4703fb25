//! Paths made of Bézier segments, and positions along them.

use kurbo::{BezPath, ParamCurve, ParamCurveNearest, PathEl, PathSeg, Point, Shape};

use crate::{num::CheapOrderedFloat, Error};

/// A connected sequence of segments, each one starting where the previous one ends.
///
/// This is a single component of a [`BezPath`]. A closed path returns to
/// its starting point; the closing segment, if any, is stored explicitly
/// among the others.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    segments: Vec<PathSeg>,
    closed: bool,
}

impl Path {
    /// Creates an open path from a non-empty sequence of segments.
    pub fn new(segments: Vec<PathSeg>) -> Result<Path, Error> {
        if segments.is_empty() {
            return Err(Error::EmptyPath);
        }
        Ok(Path {
            segments,
            closed: false,
        })
    }

    /// Creates a closed polygon with the given vertices.
    pub fn polygon(points: &[Point]) -> Result<Path, Error> {
        let segments = points
            .windows(2)
            .map(|w| PathSeg::Line(kurbo::Line::new(w[0], w[1])))
            .collect();
        let mut path = Path::new(segments)?;
        path.close();
        Ok(path)
    }

    /// Converts the first subpath of `path`.
    ///
    /// Returns `None` if it has no segments. Use [`paths_from_bez_path`] to
    /// get all the subpaths.
    pub fn from_bez_path(path: &BezPath) -> Option<Path> {
        paths_from_bez_path(path).into_iter().next()
    }

    /// The number of segments.
    pub fn size(&self) -> usize {
        self.segments.len()
    }

    /// Does this path return to its starting point?
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// All the segments.
    pub fn segments(&self) -> &[PathSeg] {
        &self.segments
    }

    /// The segment at index `i`.
    pub fn segment(&self, i: usize) -> PathSeg {
        self.segments[i]
    }

    /// The starting point.
    pub fn initial_point(&self) -> Point {
        self.segments[0].start()
    }

    /// The ending point.
    pub fn final_point(&self) -> Point {
        self.segments[self.segments.len() - 1].end()
    }

    /// The point at a path time.
    pub fn point_at(&self, time: PathTime) -> Point {
        self.segments[time.curve_index].eval(time.t)
    }

    /// Closes this path, adding a straight line back to the start if necessary.
    pub fn close(&mut self) {
        let start = self.initial_point();
        let end = self.final_point();
        if start != end {
            self.segments
                .push(PathSeg::Line(kurbo::Line::new(end, start)));
        }
        self.closed = true;
    }

    /// Removes segments whose control points all coincide.
    ///
    /// If every segment is degenerate, we keep the first one so that the
    /// path stays non-empty.
    pub fn strip_degenerate(&mut self) {
        let first = self.segments[0];
        self.segments.retain(|seg| !is_degenerate(seg));
        if self.segments.is_empty() {
            self.segments.push(first);
        }
    }

    /// Is this path a single point?
    pub fn is_degenerate(&self) -> bool {
        self.segments.iter().all(is_degenerate)
    }

    /// The same path, traversed backwards.
    pub fn reversed(&self) -> Path {
        Path {
            segments: self.segments.iter().rev().map(|s| s.reverse()).collect(),
            closed: self.closed,
        }
    }

    /// Converts to a `kurbo` path. Closed paths end with a [`PathEl::ClosePath`].
    pub fn to_bez_path(&self) -> BezPath {
        let mut ret = BezPath::from_path_segments(self.segments.iter().copied());
        if self.closed {
            ret.close_path();
        }
        ret
    }

    /// The winding number of this path around `pt`.
    ///
    /// Open paths are treated as though they were closed by a straight line.
    pub fn winding(&self, pt: Point) -> i32 {
        let mut path = self.to_bez_path();
        if !self.closed {
            path.close_path();
        }
        path.winding(pt)
    }

    /// The distance from `pt` to the nearest point on this path.
    pub fn distance(&self, pt: Point) -> f64 {
        self.segments
            .iter()
            .map(|seg| seg.nearest(pt, 1e-12).distance_sq)
            .fold(f64::INFINITY, f64::min)
            .sqrt()
    }

    /// The signed area enclosed by this path.
    ///
    /// The sign depends on the orientation, and reversing the path negates it.
    pub fn area(&self) -> f64 {
        let mut path = self.to_bez_path();
        if !self.closed {
            path.close_path();
        }
        path.area()
    }

    /// Returns the segments making up a portion of this closed path.
    ///
    /// The first returned segment starts exactly at `start`, and the last
    /// one ends exactly at `end`. These points should be (very close to) the
    /// points of `interval`'s endpoints; we take them as arguments so that
    /// pieces of different paths glued together at an intersection match up
    /// exactly.
    pub fn portion(&self, interval: &PathInterval, start: Point, end: Point) -> Vec<PathSeg> {
        if interval.reverse {
            let flipped = PathInterval::forward(interval.to, interval.from, interval.path_size);
            let mut ret = self.portion(&flipped, end, start);
            ret.reverse();
            for seg in &mut ret {
                *seg = seg.reverse();
            }
            return ret;
        }

        let from = interval.from;
        let to = interval.to;
        let size = self.size();
        let mut ret = Vec::new();
        let mut push = |seg: PathSeg| {
            if !is_degenerate(&seg) {
                ret.push(seg);
            }
        };

        if from.curve_index == to.curve_index && !interval.cross_start {
            push(self.segments[from.curve_index].subsegment(from.t..to.t));
        } else {
            push(self.segments[from.curve_index].subsegment(from.t..1.0));
            let mut i = (from.curve_index + 1) % size;
            while i != to.curve_index {
                push(self.segments[i]);
                i = (i + 1) % size;
            }
            push(self.segments[to.curve_index].subsegment(0.0..to.t));
        }

        if let Some(first) = ret.first_mut() {
            set_start(first, start);
        }
        if let Some(last) = ret.last_mut() {
            set_end(last, end);
        }
        if ret.is_empty() && start != end {
            ret.push(PathSeg::Line(kurbo::Line::new(start, end)));
        }
        ret
    }
}

fn is_degenerate(seg: &PathSeg) -> bool {
    match seg {
        PathSeg::Line(l) => l.p0 == l.p1,
        PathSeg::Quad(q) => q.p0 == q.p1 && q.p1 == q.p2,
        PathSeg::Cubic(c) => c.p0 == c.p1 && c.p1 == c.p2 && c.p2 == c.p3,
    }
}

fn set_start(seg: &mut PathSeg, p: Point) {
    match seg {
        PathSeg::Line(l) => l.p0 = p,
        PathSeg::Quad(q) => q.p0 = p,
        PathSeg::Cubic(c) => c.p0 = p,
    }
}

fn set_end(seg: &mut PathSeg, p: Point) {
    match seg {
        PathSeg::Line(l) => l.p1 = p,
        PathSeg::Quad(q) => q.p2 = p,
        PathSeg::Cubic(c) => c.p3 = p,
    }
}

/// Splits a `kurbo` path into its subpaths.
///
/// Subpaths without any segments (like a lone `MoveTo`) are dropped.
pub fn paths_from_bez_path(path: &BezPath) -> Vec<Path> {
    let mut ret = Vec::new();
    let mut start = 0;
    let els = path.elements();
    for i in 1..=els.len() {
        if i == els.len() || matches!(els[i], PathEl::MoveTo(_)) {
            let sub = &els[start..i];
            let segments: Vec<PathSeg> = kurbo::segments(sub.iter().copied()).collect();
            if !segments.is_empty() {
                ret.push(Path {
                    segments,
                    closed: matches!(sub.last(), Some(PathEl::ClosePath)),
                });
            }
            start = i;
        }
    }
    ret
}

/// Glues some paths back together into a single `kurbo` path.
pub fn paths_to_bez_path(paths: &[Path]) -> BezPath {
    let mut ret = BezPath::new();
    for p in paths {
        ret.extend(p.to_bez_path());
    }
    ret
}

/// The total winding number of a collection of paths around `pt`.
pub fn winding(paths: &[Path], pt: Point) -> i32 {
    paths.iter().map(|p| p.winding(pt)).sum()
}

/// A position on a path: a segment index and a parameter on that segment.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PathTime {
    /// The index of the segment.
    pub curve_index: usize,
    /// The parameter on the segment, in `[0, 1]`.
    pub t: f64,
}

impl PathTime {
    /// Creates a new path time.
    pub fn new(curve_index: usize, t: f64) -> Self {
        PathTime { curve_index, t }
    }

    /// Moves the end of a segment to the start of the next one.
    ///
    /// On a closed path with `path_size` segments, the end of the last
    /// segment wraps around to the start of the first.
    pub fn normalized(self, path_size: usize) -> Self {
        if self.t >= 1.0 {
            PathTime::new((self.curve_index + 1) % path_size, 0.0)
        } else {
            self
        }
    }

    fn key(&self) -> (usize, CheapOrderedFloat) {
        (self.curve_index, CheapOrderedFloat::from(self.t))
    }
}

impl Eq for PathTime {}

impl PartialOrd for PathTime {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PathTime {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.key().cmp(&other.key())
    }
}

/// A stretch of a closed path between two path times.
///
/// Because the path is closed, there are two ways to get from one time to
/// another: forwards (in the direction of increasing time, possibly
/// wrapping around the start) and backwards.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PathInterval {
    /// Where the interval starts.
    pub from: PathTime,
    /// Where the interval ends.
    pub to: PathTime,
    /// Do we go backwards from `from` to `to`?
    pub reverse: bool,
    /// Does the interval pass through the start of the path?
    pub cross_start: bool,
    /// The number of segments in the path.
    pub path_size: usize,
}

impl PathInterval {
    /// The forward interval from `from` to `to`.
    ///
    /// If `from == to`, this is the whole path, starting and ending at `from`.
    pub fn forward(from: PathTime, to: PathTime, path_size: usize) -> Self {
        PathInterval {
            from,
            to,
            reverse: false,
            cross_start: from >= to,
            path_size,
        }
    }

    /// The backward interval from `from` to `to`.
    pub fn backward(from: PathTime, to: PathTime, path_size: usize) -> Self {
        PathInterval {
            from,
            to,
            reverse: true,
            cross_start: from <= to,
            path_size,
        }
    }

    /// The interval from `from` to `to` in the given direction.
    pub fn from_direction(from: PathTime, to: PathTime, reverse: bool, path_size: usize) -> Self {
        if reverse {
            PathInterval::backward(from, to, path_size)
        } else {
            PathInterval::forward(from, to, path_size)
        }
    }

    /// The same stretch of path, traversed in the other direction.
    pub fn flipped(&self) -> Self {
        PathInterval::from_direction(self.to, self.from, !self.reverse, self.path_size)
    }

    /// Returns some time strictly inside this interval.
    ///
    /// If the interval spans a segment boundary, we prefer to return the
    /// start of a segment, which is a more robust point to test than
    /// something in the middle of a curve. But if the interval only covers
    /// a sliver (of parametric length less than `min_dist`) on either side of
    /// the boundary, we go for the middle instead, or for the start of the
    /// following segment.
    pub fn inside(&self, min_dist: f64) -> PathTime {
        if self.reverse {
            return self.flipped().inside(min_dist);
        }

        let from = self.from;
        let to = self.to;
        let size = self.path_size;
        if from.curve_index == to.curve_index && !self.cross_start {
            return PathTime::new(from.curve_index, 0.5 * (from.t + to.t));
        }

        let mut dcurve = (size + to.curve_index - from.curve_index) % size;
        if dcurve == 0 {
            dcurve = size;
        }
        if dcurve == 1 {
            if from.t > 1.0 - min_dist || to.t < min_dist {
                let tmid = 0.5 * ((1.0 - from.t) + to.t) + from.t;
                if tmid >= 1.0 {
                    PathTime::new(to.curve_index, tmid - 1.0)
                } else {
                    PathTime::new(from.curve_index, tmid)
                }
            } else {
                PathTime::new(to.curve_index, 0.0)
            }
        } else {
            let next = (from.curve_index + 1) % size;
            if from.t <= 1.0 - min_dist {
                PathTime::new(next, 0.0)
            } else if dcurve == 2 {
                // The start of the next segment is too close to `from`, and
                // the one after that is where `to` lives.
                PathTime::new(next, 0.5)
            } else {
                PathTime::new((next + 1) % size, 0.0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Circle, Line};

    use super::*;

    fn square(x0: f64, y0: f64, size: f64) -> Path {
        Path::polygon(&[
            Point::new(x0, y0),
            Point::new(x0 + size, y0),
            Point::new(x0 + size, y0 + size),
            Point::new(x0, y0 + size),
        ])
        .unwrap()
    }

    #[test]
    fn empty_path() {
        assert_eq!(Path::new(vec![]), Err(Error::EmptyPath));
        assert_eq!(Path::polygon(&[Point::ZERO]), Err(Error::EmptyPath));
        assert!(Path::from_bez_path(&BezPath::new()).is_none());
    }

    #[test]
    fn polygon_is_closed() {
        let sq = square(0.0, 0.0, 10.0);
        assert_eq!(sq.size(), 4);
        assert!(sq.is_closed());
        assert_eq!(sq.initial_point(), sq.final_point());
        assert_eq!(sq.area().abs(), 100.0);
        assert_eq!(sq.reversed().area(), -sq.area());
        assert_eq!(sq.winding(Point::new(5.0, 5.0)).abs(), 1);
        assert_eq!(sq.winding(Point::new(15.0, 5.0)), 0);
    }

    #[test]
    fn distance_to_boundary() {
        let sq = square(0.0, 0.0, 10.0);
        assert!((sq.distance(Point::new(5.0, 5.0)) - 5.0).abs() < 1e-9);
        assert!((sq.distance(Point::new(13.0, 14.0)) - 5.0).abs() < 1e-9);
        assert!(sq.distance(Point::new(10.0, 3.0)) < 1e-12);
    }

    #[test]
    fn close_only_adds_a_line_when_needed() {
        let mut p = Path::new(vec![
            PathSeg::Line(Line::new((0.0, 0.0), (1.0, 0.0))),
            PathSeg::Line(Line::new((1.0, 0.0), (1.0, 1.0))),
        ])
        .unwrap();
        p.close();
        assert_eq!(p.size(), 3);
        p.close();
        assert_eq!(p.size(), 3);
    }

    #[test]
    fn bez_path_round_trip() {
        let mut bez = Circle::new((0.0, 0.0), 1.0).to_path(0.1);
        bez.extend(square(5.0, 5.0, 1.0).to_bez_path());
        bez.move_to((100.0, 100.0));
        let paths = paths_from_bez_path(&bez);
        assert_eq!(paths.len(), 2);
        assert!(paths.iter().all(Path::is_closed));
        let back = paths_to_bez_path(&paths);
        assert!((back.area() - bez.area()).abs() < 1e-9);
        assert_eq!(winding(&paths, Point::new(5.5, 5.5)).abs(), 1);
    }

    #[test]
    fn strip_degenerate() {
        let mut p = Path::new(vec![
            PathSeg::Line(Line::new((0.0, 0.0), (1.0, 0.0))),
            PathSeg::Line(Line::new((1.0, 0.0), (1.0, 0.0))),
            PathSeg::Line(Line::new((1.0, 0.0), (1.0, 1.0))),
        ])
        .unwrap();
        p.strip_degenerate();
        assert_eq!(p.size(), 2);

        let mut dot = Path::new(vec![PathSeg::Line(Line::new((1.0, 0.0), (1.0, 0.0)))]).unwrap();
        dot.strip_degenerate();
        assert_eq!(dot.size(), 1);
        assert!(dot.is_degenerate());
    }

    #[test]
    fn path_time_order() {
        let a = PathTime::new(0, 0.9);
        let b = PathTime::new(1, 0.1);
        assert!(a < b);
        assert_eq!(PathTime::new(3, 1.0).normalized(4), PathTime::new(0, 0.0));
        assert_eq!(PathTime::new(1, 1.0).normalized(4), PathTime::new(2, 0.0));
        assert_eq!(PathTime::new(1, 0.5).normalized(4), PathTime::new(1, 0.5));
    }

    #[test]
    fn interval_directions() {
        let a = PathTime::new(1, 0.5);
        let b = PathTime::new(2, 0.5);
        assert!(!PathInterval::forward(a, b, 4).cross_start);
        assert!(PathInterval::forward(b, a, 4).cross_start);
        assert!(PathInterval::forward(a, a, 4).cross_start);
        assert!(PathInterval::backward(a, b, 4).cross_start);
        assert!(!PathInterval::backward(b, a, 4).cross_start);
    }

    #[test]
    fn inside_points() {
        let a = PathTime::new(1, 0.5);
        let b = PathTime::new(2, 0.5);
        assert_eq!(PathInterval::forward(a, b, 4).inside(1e-5), PathTime::new(2, 0.0));
        assert_eq!(PathInterval::forward(b, a, 4).inside(1e-5), PathTime::new(3, 0.0));
        assert_eq!(PathInterval::backward(b, a, 4).inside(1e-5), PathTime::new(2, 0.0));
        assert_eq!(
            PathInterval::forward(PathTime::new(1, 0.2), PathTime::new(1, 0.4), 4).inside(1e-5),
            PathTime::new(1, 0.30000000000000004)
        );

        // A sliver on each side of a boundary.
        let sliver = PathInterval::forward(PathTime::new(1, 0.75), PathTime::new(2, 1e-7), 4);
        let mid = sliver.inside(1e-5);
        assert_eq!(mid.curve_index, 1);
        assert!(mid.t > 0.75 && mid.t < 1.0);

        // The whole path.
        assert_eq!(PathInterval::forward(a, a, 4).inside(1e-5), PathTime::new(2, 0.0));
    }

    #[test]
    fn inside_points_skip_a_segment_start_near_the_ends() {
        let near_end = PathTime::new(0, 0.999999);
        assert_eq!(
            PathInterval::forward(near_end, PathTime::new(3, 0.5), 4).inside(1e-5),
            PathTime::new(2, 0.0)
        );
        assert_eq!(
            PathInterval::forward(near_end, PathTime::new(2, 0.5), 4).inside(1e-5),
            PathTime::new(1, 0.5)
        );
        assert_eq!(
            PathInterval::backward(PathTime::new(3, 0.5), near_end, 4).inside(1e-5),
            PathTime::new(2, 0.0)
        );
        // The whole path, wrapping past the start.
        let c = PathTime::new(1, 0.9999999);
        assert_eq!(PathInterval::forward(c, c, 4).inside(1e-5), PathTime::new(3, 0.0));
        // Far enough from the end, the next segment start is fine.
        assert_eq!(
            PathInterval::forward(PathTime::new(0, 0.9), PathTime::new(3, 0.5), 4).inside(1e-5),
            PathTime::new(1, 0.0)
        );
    }

    #[test]
    fn portions() {
        let sq = square(0.0, 0.0, 10.0);
        let size = sq.size();
        let from = PathTime::new(0, 0.5);
        let to = PathTime::new(2, 0.5);
        let p0 = sq.point_at(from);
        let p1 = sq.point_at(to);
        assert_eq!(p0, Point::new(5.0, 0.0));
        assert_eq!(p1, Point::new(5.0, 10.0));

        let fwd = sq.portion(&PathInterval::forward(from, to, size), p0, p1);
        assert_eq!(fwd.len(), 3);
        assert_eq!(fwd[0].start(), p0);
        assert_eq!(fwd[2].end(), p1);
        assert_eq!(fwd[1], sq.segment(1));

        let back = sq.portion(&PathInterval::backward(from, to, size), p0, p1);
        assert_eq!(back.len(), 3);
        assert_eq!(back[0].start(), p0);
        assert_eq!(back[0].end(), Point::new(0.0, 0.0));
        assert_eq!(back[2].end(), p1);

        // Same segment, without wrapping around.
        let short = sq.portion(
            &PathInterval::forward(PathTime::new(1, 0.2), PathTime::new(1, 0.6), size),
            Point::new(10.0, 2.0),
            Point::new(10.0, 6.0),
        );
        assert_eq!(short, vec![PathSeg::Line(Line::new((10.0, 2.0), (10.0, 6.0)))]);

        // Starting at the end of a segment doesn't produce a zero-length segment.
        let from_vertex = sq.portion(
            &PathInterval::forward(PathTime::new(0, 1.0), PathTime::new(2, 0.5), size),
            Point::new(10.0, 0.0),
            p1,
        );
        assert_eq!(from_vertex.len(), 2);
    }

    #[test]
    fn portion_of_whole_loop() {
        let sq = square(0.0, 0.0, 10.0);
        let t = PathTime::new(1, 0.5);
        let p = sq.point_at(t);
        let segs = sq.portion(&PathInterval::forward(t, t, sq.size()), p, p);
        assert_eq!(segs.len(), 5);
        let loop_path = Path::new(segs).unwrap();
        assert_eq!(loop_path.area().abs(), 100.0);
    }
}
