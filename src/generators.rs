//! Utilities for generating examples, benchmarks, and test cases.

use kurbo::{BezPath, Point, Shape as _};

use crate::path::{paths_to_bez_path, Path};

/// Generate a bunch of squares, arranged in a grid.
///
/// The top-left of the first square is at (x0, y0). Each square has size `size
/// x size`, and the distance between squares (both horizontally and vertically)
/// is `offset`.
///
/// If `slant` is non-zero, generates parallelograms instead of squares: the
/// right-hand side of each square gets translated down by `slant`.
fn squares((x0, y0): (f64, f64), size: f64, offset: f64, slant: f64, count: usize) -> Vec<Path> {
    let mut ret = Vec::new();
    for i in 0..count {
        let x = x0 + i as f64 * offset;
        for j in 0..count {
            let y = y0 + j as f64 * offset;
            let square = Path::polygon(&[
                Point::new(x, y),
                Point::new(x, y + size),
                Point::new(x + size, y + size + slant),
                Point::new(x + size, y + slant),
            ]);
            ret.extend(square.ok());
        }
    }

    ret
}

/// Generate an `n` by `n` checkerboard-like pattern with overlapping squares.
/// For `n = 3`, it looks like:
///
/// ```text
/// ┌────┐ ┌────┐ ┌────┐
/// │    │ │    │ │    │
/// │  ┌─┼─┼─┐┌─┼─┼─┐  │
/// └──┼─┘ └─┼┼─┘ └─┼──┘
/// ┌──┼─┐ ┌─┼┼─┐ ┌─┼──┐
/// │  └─┼─┼─┘└─┼─┼─┘  │
/// │  ┌─┼─┼─┐┌─┼─┼─┐  │
/// └──┼─┘ └─┼┼─┘ └─┼──┘
/// ┌──┼─┐ ┌─┼┼─┐ ┌─┼──┐
/// │  └─┼─┼─┘└─┼─┼─┘  │
/// │    │ │    │ │    │
/// └────┘ └────┘ └────┘
/// ```
///
/// We return the pattern in two parts: the outer collection of `n x n`
/// non-overlapping squares, and the inner collection of `(n - 1) x (n - 1)`
/// non-overlapping squares. Every square has side length 30, and every
/// overlap between an outer and an inner square is 10 by 10.
pub fn checkerboard(n: usize) -> (Vec<Path>, Vec<Path>) {
    (
        squares((0.0, 0.0), 30.0, 40.0, 0.0, n),
        squares((20.0, 20.0), 30.0, 40.0, 0.0, n.saturating_sub(1)),
    )
}

/// Like `checkerboard`, but with no exactly-horizontal lines.
pub fn slanted_checkerboard(n: usize) -> (Vec<Path>, Vec<Path>) {
    (
        squares((0.0, 0.0), 30.0, 40.0, 1.0, n),
        squares((20.0, 20.0), 30.0, 40.0, 1.0, n.saturating_sub(1)),
    )
}

/// The "evens" are a bunch of long, skinny parallelograms going from top-left
/// to bottom-right. The "odds" go from top-right to bottom-left.
pub fn slanties(n: usize) -> (Vec<Path>, Vec<Path>) {
    let h = 20.0 * n as f64;

    let mut even = Vec::new();
    let mut odd = Vec::new();
    for i in 0..n {
        let x_off = 20.0 * i as f64;
        even.extend(
            Path::polygon(&[
                Point::new(x_off, 0.0),
                Point::new(x_off + h, h),
                Point::new(x_off + h + 10.0, h),
                Point::new(x_off + 10.0, 0.0),
            ])
            .ok(),
        );

        odd.extend(
            Path::polygon(&[
                Point::new(x_off + h, 0.0),
                Point::new(x_off, h),
                Point::new(x_off + 10.0, h),
                Point::new(x_off + h + 10.0, 0.0),
            ])
            .ok(),
        );
    }

    (even, odd)
}

/// Two rows of `n` circles of radius 10, approximated by cubics.
///
/// The circles within each row are disjoint, but every circle in the second
/// row crosses its two nearest circles in the first row.
pub fn circles(n: usize) -> (BezPath, BezPath) {
    let row = |y: f64, x_off: f64| {
        let mut ret = BezPath::new();
        for i in 0..n {
            let center = Point::new(x_off + 25.0 * i as f64, y);
            ret.extend(kurbo::Circle::new(center, 10.0).path_elements(1e-3));
        }
        ret
    };
    (row(0.0, 0.0), row(6.0, 12.5))
}

/// Glues a collection of paths into a single `kurbo` path.
pub fn to_bez_path(paths: &[Path]) -> BezPath {
    paths_to_bez_path(paths)
}
