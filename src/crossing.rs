//! Finding the crossings between two collections of paths.

use kurbo::{ParamCurve, ParamCurveExtrema, Point};

use crate::{
    curve::{find_intersections_with, Bezier, IntersectionStrategy, DEFAULT_PRECISION},
    geom,
    path::{Path, PathTime},
};

/// Options for intersecting paths.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Options {
    /// Intersections closer than this (both in parameter space and in
    /// space) are treated as the same intersection. Intersections this close
    /// to the endpoint of a segment are moved onto the endpoint.
    pub precision: f64,
    /// The algorithm for intersecting pairs of segments.
    pub strategy: IntersectionStrategy,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            precision: DEFAULT_PRECISION,
            strategy: IntersectionStrategy::default(),
        }
    }
}

/// A position in a collection of paths.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct PathVectorTime {
    /// The index of the path in its collection.
    pub path_index: usize,
    /// The position on that path.
    pub time: PathTime,
}

/// A point at which a path from the first collection meets a path from the second.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathCrossing {
    /// The position on the first collection.
    pub a: PathVectorTime,
    /// The position on the second collection.
    pub b: PathVectorTime,
    /// The location of the crossing.
    pub point: Point,
}

// Moves parameters that are nearly at the end of a segment onto the start of
// the next one, and parameters nearly at the start onto the start.
fn snap(curve_index: usize, t: f64, size: usize, precision: f64) -> PathTime {
    if t < precision {
        PathTime::new(curve_index, 0.0)
    } else if t > 1.0 - precision {
        PathTime::new((curve_index + 1) % size, 0.0)
    } else {
        PathTime::new(curve_index, t)
    }
}

/// Finds all the points at which the paths in `a` cross the paths in `b`.
///
/// Both collections are expected to consist of closed paths. Crossings that
/// are within `options.precision` of one another on the same pair of paths
/// are reported only once.
pub fn intersect_paths(a: &[Path], b: &[Path], options: &Options) -> Vec<PathCrossing> {
    let precision = options.precision;
    let bboxes = |paths: &[Path]| -> Vec<Vec<kurbo::Rect>> {
        paths
            .iter()
            .map(|p| p.segments().iter().map(|s| s.bounding_box()).collect())
            .collect()
    };
    let a_boxes = bboxes(a);
    let b_boxes = bboxes(b);

    let mut ret = Vec::new();
    for (ia, pa) in a.iter().enumerate() {
        for (ib, pb) in b.iter().enumerate() {
            let mut here: Vec<PathCrossing> = Vec::new();
            for (ca, seg_a) in pa.segments().iter().enumerate() {
                let bez_a = Bezier::from(*seg_a);
                for (cb, seg_b) in pb.segments().iter().enumerate() {
                    if !geom::rects_overlap(&a_boxes[ia][ca], &b_boxes[ib][cb], precision) {
                        continue;
                    }
                    let bez_b = Bezier::from(*seg_b);
                    for (ta, tb) in
                        find_intersections_with(&bez_a, &bez_b, precision, options.strategy)
                    {
                        let point = seg_a.eval(ta).midpoint(seg_b.eval(tb));
                        if here.iter().any(|x| (x.point - point).hypot() <= precision) {
                            continue;
                        }
                        here.push(PathCrossing {
                            a: PathVectorTime {
                                path_index: ia,
                                time: snap(ca, ta, pa.size(), precision),
                            },
                            b: PathVectorTime {
                                path_index: ib,
                                time: snap(cb, tb, pb.size(), precision),
                            },
                            point,
                        });
                    }
                }
            }
            ret.extend(here);
        }
    }
    log::debug!("found {} crossings", ret.len());
    ret
}
