//! Utilities for fuzz and/or property testing using `arbitrary`.

use arbitrary::Unstructured;
use kurbo::{BezPath, Point};

use crate::curve::Bezier;

/// Generate an arbitrary float in some range.
pub fn float_in_range(
    start: f64,
    end: f64,
    u: &mut Unstructured<'_>,
) -> Result<f64, arbitrary::Error> {
    let num: u32 = u.arbitrary()?;
    let t = num as f64 / u32::MAX as f64;
    Ok((1.0 - t) * start + t * end)
}

/// Generate a coordinate of moderate size.
///
/// Half of the time we snap to a small integer grid, because exact
/// coincidences (shared vertices, overlapping edges) are where the
/// interesting bugs live.
fn coord(u: &mut Unstructured<'_>) -> Result<f64, arbitrary::Error> {
    let snap: bool = u.arbitrary()?;
    if snap {
        Ok(u.int_in_range(-8..=8)? as f64)
    } else {
        float_in_range(-100.0, 100.0, u)
    }
}

/// Generate an arbitrary point with moderately-sized coordinates.
pub fn point(u: &mut Unstructured<'_>) -> Result<Point, arbitrary::Error> {
    Ok(Point::new(coord(u)?, coord(u)?))
}

/// Generate a point that has a chance to be close to (or equal to) `orig`.
pub fn another_point(orig: Point, u: &mut Unstructured<'_>) -> Result<Point, arbitrary::Error> {
    match u.int_in_range(0..=2)? {
        0 => Ok(orig),
        1 => {
            let dx = float_in_range(-1e-6, 1e-6, u)?;
            let dy = float_in_range(-1e-6, 1e-6, u)?;
            Ok(orig + kurbo::Vec2::new(dx, dy))
        }
        _ => point(u),
    }
}

/// Generate an arbitrary Bézier curve of the given degree.
///
/// # Panics
///
/// Panics if `degree` is zero.
pub fn bezier(degree: usize, u: &mut Unstructured<'_>) -> Result<Bezier, arbitrary::Error> {
    assert!(degree > 0);
    let pts = (0..=degree)
        .map(|_| point(u))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Bezier::from_raw(pts))
}

/// Generate a Bézier curve of the given degree that has a chance to share an
/// endpoint or a tangent with `first`.
pub fn another_bezier(
    degree: usize,
    first: &Bezier,
    u: &mut Unstructured<'_>,
) -> Result<Bezier, arbitrary::Error> {
    let mut pts: Vec<Point> = bezier(degree, u)?.control_points().to_vec();
    let fp = first.control_points();
    pts[0] = another_point(fp[0], u)?;
    if pts.len() > 2 && fp.len() > 2 {
        let same_tangent: bool = u.arbitrary()?;
        if same_tangent && pts[0] == fp[0] {
            pts[1] = fp[1];
        }
    }
    Ok(Bezier::from_raw(pts))
}

/// Generate a closed polygon with between 3 and `max_sides` sides.
pub fn polygon(max_sides: usize, u: &mut Unstructured<'_>) -> Result<BezPath, arbitrary::Error> {
    let sides = u.int_in_range(3..=max_sides.max(3))?;
    let mut path = BezPath::new();
    path.move_to(point(u)?);
    for _ in 1..sides {
        path.line_to(point(u)?);
    }
    path.close_path();
    Ok(path)
}

/// Generate a closed path made of lines, quadratics, and cubics.
pub fn curvy_path(
    max_segments: usize,
    u: &mut Unstructured<'_>,
) -> Result<BezPath, arbitrary::Error> {
    let segments = u.int_in_range(2..=max_segments.max(2))?;
    let mut path = BezPath::new();
    path.move_to(point(u)?);
    for _ in 0..segments {
        match u.int_in_range(0..=2)? {
            0 => path.line_to(point(u)?),
            1 => path.quad_to(point(u)?, point(u)?),
            _ => path.curve_to(point(u)?, point(u)?, point(u)?),
        }
    }
    path.close_path();
    Ok(path)
}
