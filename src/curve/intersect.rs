//! Intersecting two curves by Bézier clipping.

use super::{fat_line, polish::polish_intersection, subdivision, Bezier};
use crate::{
    geom::{self, Interval},
    num::{next_after, CheapOrderedFloat},
};

/// The default precision, in parameter units, of [`find_intersections`].
///
/// The same value is also used as an absolute distance: when clipping has
/// shrunk both curves to points, they count as an intersection if their
/// midpoints are within `precision` of each other. It is a tunable
/// default, not a derived error bound.
pub const DEFAULT_PRECISION: f64 = 1e-5;

/// Precisions finer than this are raised to it.
pub const MAX_PRECISION: f64 = 1e-8;

/// The maximal number of bisections (counted over both curves) on any branch of the search.
///
/// This bounds the total work for pathological inputs, like curves that
/// overlap along an arc: we bisect about 8 times per curve, so at most 256
/// leaves per curve. Once a branch reaches this depth, its two sub-curves
/// are nearly flat and we intersect their chords instead.
pub const MAX_SUBDIVISION_DEPTH: u32 = 16;

/// The maximal number of clipping steps on a single pair of sub-curves.
pub const MAX_CLIP_ITERATIONS: usize = 100;

/// If a clipping step keeps more than this fraction of the clipped domain,
/// the clipping isn't making enough progress and we bisect instead.
pub const MIN_CLIPPED_SIZE_THRESHOLD: f64 = 0.8;

/// The algorithm used for finding intersection candidates.
///
/// Both strategies polish their candidates afterwards, so they have the same
/// accuracy; they differ in speed and robustness.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum IntersectionStrategy {
    /// Bézier clipping against fat lines, falling back to bisection when
    /// clipping doesn't converge.
    #[default]
    BezierClipping,
    /// Recursive bisection of both curves, pruning pairs with disjoint
    /// bounding boxes and solving for chord intersections at the leaves.
    Subdivision,
}

/// Finds the parameters at which the curves `a` and `b` intersect.
///
/// Each returned pair `(ta, tb)` has `a.eval(ta)` very close to
/// `b.eval(tb)`. The `precision` is the size of the parameter domains at
/// which we stop clipping, before polishing the result. Curves that overlap
/// along an arc (or are tangent along one) don't have isolated
/// intersections, and we don't promise to find anything sensible for them.
pub fn find_intersections(a: &Bezier, b: &Bezier, precision: f64) -> Vec<(f64, f64)> {
    find_intersections_with(a, b, precision, IntersectionStrategy::default())
}

/// Like [`find_intersections`], but with a choice of algorithm.
pub fn find_intersections_with(
    a: &Bezier,
    b: &Bezier,
    precision: f64,
    strategy: IntersectionStrategy,
) -> Vec<(f64, f64)> {
    let precision = precision.max(MAX_PRECISION);
    let candidates = match strategy {
        IntersectionStrategy::BezierClipping => clipping_candidates(a, b, precision),
        IntersectionStrategy::Subdivision => subdivision::candidates(a, b, precision),
    };

    // Spatial errors scale with the size of the curves.
    let scale = {
        let r = a.control_box().union(b.control_box());
        r.width().max(r.height()).max(1.0)
    };
    let tolerance = precision * scale;

    let mut xs: Vec<(f64, f64)> = candidates
        .into_iter()
        .filter_map(|(mut ta, mut tb)| {
            polish_intersection(a, b, &mut ta, &mut tb);
            let dist = (a.eval(ta) - b.eval(tb)).hypot();
            if dist <= tolerance {
                Some((ta, tb))
            } else {
                log::trace!("dropping candidate ({ta}, {tb}) at distance {dist}");
                None
            }
        })
        .collect();

    xs.sort_by_key(|&(ta, tb)| (CheapOrderedFloat::from(ta), CheapOrderedFloat::from(tb)));
    xs.dedup_by(|x, y| (x.0 - y.0).abs() <= precision && (x.1 - y.1).abs() <= precision);
    xs
}

struct ClipTask {
    a: Bezier,
    b: Bezier,
    dom_a: Interval,
    dom_b: Interval,
    depth: u32,
}

fn midpoints_near(a: &Bezier, b: &Bezier, precision: f64) -> bool {
    let ma = a.start().midpoint(a.end());
    let mb = b.start().midpoint(b.end());
    (ma - mb).hypot() <= precision
}

fn clipping_candidates(a: &Bezier, b: &Bezier, precision: f64) -> Vec<(f64, f64)> {
    let mut out = Vec::new();
    let mut tasks = vec![ClipTask {
        a: a.clone(),
        b: b.clone(),
        dom_a: Interval::UNIT,
        dom_b: Interval::UNIT,
        depth: 0,
    }];

    while let Some(task) = tasks.pop() {
        clip_task(task, precision, &mut tasks, &mut out);
    }
    out
}

// Runs the clipping iteration on a single pair of sub-curves. Either records
// an intersection in `out`, gives up on the pair, or splits it into two new
// tasks.
fn clip_task(task: ClipTask, precision: f64, tasks: &mut Vec<ClipTask>, out: &mut Vec<(f64, f64)>) {
    let ClipTask {
        a,
        b,
        dom_a,
        dom_b,
        depth,
    } = task;

    if !geom::rects_overlap(&a.control_box(), &b.control_box(), precision) {
        return;
    }
    if a.is_constant(precision) && b.is_constant(precision) {
        if midpoints_near(&a, &b, precision) {
            out.push((dom_a.middle(), dom_b.middle()));
        }
        return;
    }
    log::trace!("clipping {dom_a:?} x {dom_b:?} at depth {depth}");

    // curves[0] is always (a piece of) a, and curves[1] is (a piece of) b.
    // Their roles as clipper and clipped alternate, which avoids slow
    // convergence when one of them is much flatter than the other.
    let mut curves = [a, b];
    let mut doms = [dom_a, dom_b];
    let mut target = 1;
    let mut iter = 0;
    while iter < MAX_CLIP_ITERATIONS
        && (doms[0].extent() >= precision || doms[1].extent() >= precision)
    {
        iter += 1;
        let clipper = 1 - target;
        let Some(dom) = fat_line::clip(&curves[clipper], &curves[target], precision) else {
            return;
        };

        doms[target] = doms[target].sub_interval(dom);
        curves[target] = curves[target].portion(dom.min, dom.max);
        if curves[0].is_constant(precision) && curves[1].is_constant(precision) {
            if !midpoints_near(&curves[0], &curves[1], precision) {
                return;
            }
            break;
        }

        if dom.extent() > MIN_CLIPPED_SIZE_THRESHOLD {
            let [a, b] = curves;
            if depth >= MAX_SUBDIVISION_DEPTH {
                if let Some((ta, tb)) = geom::linear_intersect(a.start(), a.end(), b.start(), b.end())
                {
                    out.push((doms[0].value_at(ta), doms[1].value_at(tb)));
                }
                return;
            }

            let h1 = Interval::new(0.0, 0.5);
            let h2 = Interval::new(next_after(0.5, 1.0), 1.0);
            let depth = depth + 1;
            // Push the second half first, so that the first half is processed first.
            if doms[0].extent() > doms[1].extent() {
                for h in [h2, h1] {
                    tasks.push(ClipTask {
                        a: a.portion(h.min, h.max),
                        b: b.clone(),
                        dom_a: doms[0].sub_interval(h),
                        dom_b: doms[1],
                        depth,
                    });
                }
            } else {
                for h in [h2, h1] {
                    tasks.push(ClipTask {
                        a: a.clone(),
                        b: b.portion(h.min, h.max),
                        dom_a: doms[0],
                        dom_b: doms[1].sub_interval(h),
                        depth,
                    });
                }
            }
            return;
        }

        target = clipper;
    }

    out.push((doms[0].middle(), doms[1].middle()));
}
