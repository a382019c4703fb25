#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

#[macro_use]
mod typed_vec;

#[cfg(any(test, feature = "arbitrary"))]
pub mod arbitrary;
pub mod crossing;
pub mod curve;
pub mod geom;
pub mod intersection_graph;
pub mod num;
pub mod path;

#[cfg(feature = "generators")]
pub mod generators;

use kurbo::{BezPath, PathEl, Point};

pub use crossing::{intersect_paths, Options};
pub use curve::{
    find_intersections, find_intersections_with, find_self_intersections, Bezier,
    IntersectionStrategy, DEFAULT_PRECISION,
};
pub use intersection_graph::PathIntersectionGraph;
pub use path::{Path, PathInterval, PathTime};

/// Things that can go wrong.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A Bézier curve needs at least two control points.
    #[error("a curve needs at least two control points, but got {0}")]
    TooFewControlPoints(usize),
    /// A path needs at least one segment.
    #[error("a path needs at least one segment")]
    EmptyPath,
    /// At least one of the inputs was infinite.
    #[error("one of the inputs was infinite")]
    Infinity,
    /// At least one of the inputs was not a number.
    #[error("one of the inputs had a NaN")]
    NaN,
    /// Some crossing looked like a crossing on one shape but like a touching
    /// point on the other. This happens when the shapes have overlapping edges.
    #[error("the inputs have defective intersections")]
    DefectiveIntersections,
    /// Walking the intersection graph didn't visit every crossing exactly once.
    #[error("failed to traverse the intersection graph")]
    Traversal,
}

/// Binary operations between sets.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
pub enum BooleanOp {
    /// A point is in the union of two sets if it is in either one.
    Union,
    /// A point is in the intersection of two sets if it is in both.
    Intersection,
    /// A point is in the difference of two sets if it is in the first but not the second.
    Difference,
    /// A point is in the reverse difference of two sets if it is in the second but not the first.
    ReverseDifference,
    /// A point is in the exclusive-or of two sets if it is in one or the other, but not both.
    Xor,
}

fn check_finite(path: &BezPath) -> Result<(), Error> {
    let check = |p: &Point| {
        if p.x.is_nan() || p.y.is_nan() {
            Err(Error::NaN)
        } else if p.x.is_infinite() || p.y.is_infinite() {
            Err(Error::Infinity)
        } else {
            Ok(())
        }
    };
    for el in path.elements() {
        match el {
            PathEl::MoveTo(p) | PathEl::LineTo(p) => check(p)?,
            PathEl::QuadTo(p0, p1) => {
                check(p0)?;
                check(p1)?;
            }
            PathEl::CurveTo(p0, p1, p2) => {
                check(p0)?;
                check(p1)?;
                check(p2)?;
            }
            PathEl::ClosePath => {}
        }
    }
    Ok(())
}

/// Computes a boolean operation between two shapes.
///
/// Each shape is a collection of closed paths (open subpaths get closed
/// with a straight line), and the inside of a shape is determined by the
/// even-odd rule.
pub fn boolean_op(
    set_a: &BezPath,
    set_b: &BezPath,
    op: BooleanOp,
    options: &Options,
) -> Result<BezPath, Error> {
    check_finite(set_a)?;
    check_finite(set_b)?;

    let graph = PathIntersectionGraph::with_options(set_a, set_b, options);
    #[cfg(feature = "debug-svg")]
    {
        if let Err(e) = svg::save("out.svg", &graph.dump_svg()) {
            log::warn!("failed to save debug svg: {e}");
        }
    }

    let paths = match op {
        BooleanOp::Union => graph.union(),
        BooleanOp::Intersection => graph.intersection(),
        BooleanOp::Difference => graph.a_minus_b(),
        BooleanOp::ReverseDifference => graph.b_minus_a(),
        BooleanOp::Xor => graph.xor(),
    }?;
    Ok(path::paths_to_bez_path(&paths))
}
