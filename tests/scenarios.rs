use kurbo::{BezPath, Point, Shape as _};
use pathops::{
    boolean_op,
    generators::{checkerboard, circles, slanted_checkerboard, to_bez_path},
    path::paths_from_bez_path,
    BooleanOp, Options, PathIntersectionGraph,
};

fn square(x0: f64, y0: f64, size: f64) -> BezPath {
    BezPath::from_vec(vec![
        kurbo::PathEl::MoveTo(Point::new(x0, y0)),
        kurbo::PathEl::LineTo(Point::new(x0 + size, y0)),
        kurbo::PathEl::LineTo(Point::new(x0 + size, y0 + size)),
        kurbo::PathEl::LineTo(Point::new(x0, y0 + size)),
        kurbo::PathEl::LineTo(Point::new(x0, y0)),
        kurbo::PathEl::ClosePath,
    ])
}

// The total unsigned area of the components. Only meaningful for outputs without holes.
fn component_area(path: &BezPath) -> f64 {
    paths_from_bez_path(path)
        .iter()
        .map(|p| p.area().abs())
        .sum()
}

fn components(path: &BezPath) -> usize {
    paths_from_bez_path(path).len()
}

// Is `p` inside `path`, according to the even-odd rule?
fn inside(path: &BezPath, p: Point) -> bool {
    path.winding(p) % 2 != 0
}

fn op(a: &BezPath, b: &BezPath, op: BooleanOp) -> BezPath {
    boolean_op(a, b, op, &Options::default()).unwrap()
}

#[test]
fn disjoint_squares_keep_their_components() {
    let a = square(0.0, 0.0, 10.0);
    let b = square(100.0, 100.0, 10.0);

    let union = op(&a, &b, BooleanOp::Union);
    assert_eq!(components(&union), 2);
    assert!((component_area(&union) - 200.0).abs() < 1e-9);
    assert_eq!(components(&op(&a, &b, BooleanOp::Intersection)), 0);
    assert_eq!(op(&a, &b, BooleanOp::Difference), a);
    assert_eq!(op(&a, &b, BooleanOp::ReverseDifference), b);
    assert_eq!(components(&op(&a, &b, BooleanOp::Xor)), 2);
}

#[test]
fn checkerboard_operations() {
    let (outer, inner) = checkerboard(3);
    let a = to_bez_path(&outer);
    let b = to_bez_path(&inner);
    let graph = PathIntersectionGraph::new(&a, &b, 1e-5);
    assert!(graph.is_valid());
    // Every inner square crosses four outer squares, twice each.
    assert_eq!(graph.size(), 32);

    let inter = op(&a, &b, BooleanOp::Intersection);
    assert_eq!(components(&inter), 16);
    assert!((component_area(&inter) - 1600.0).abs() < 1e-6);

    let xor = op(&a, &b, BooleanOp::Xor);
    assert_eq!(components(&xor), 13);
    assert!((component_area(&xor) - 8500.0).abs() < 1e-6);

    let diff = op(&a, &b, BooleanOp::Difference);
    assert_eq!(components(&diff), 9);
    assert!((component_area(&diff) - 6500.0).abs() < 1e-6);

    let union = op(&a, &b, BooleanOp::Union);
    for p in [
        Point::new(5.0, 5.0),
        Point::new(35.0, 35.0),
        Point::new(45.0, 45.0),
    ] {
        assert!(inside(&union, p), "{p:?}");
    }
    // The notches between neighboring outer squares stay outside.
    assert!(!inside(&union, Point::new(35.0, 5.0)));
}

#[test]
fn slanted_checkerboard_intersection() {
    let (outer, inner) = slanted_checkerboard(3);
    let a = to_bez_path(&outer);
    let b = to_bez_path(&inner);
    let inter = op(&a, &b, BooleanOp::Intersection);
    assert_eq!(components(&inter), 16);
    // Shearing preserves areas.
    assert!((component_area(&inter) - 1600.0).abs() < 1e-6);
}

#[test]
fn rotated_squares() {
    let a = square(0.0, 0.0, 10.0);
    for k in 1..19 {
        let theta = k as f64 * 0.07;
        let b = kurbo::Affine::rotate_about(theta, Point::new(5.0, 5.0)) * a.clone();
        // Each corner of the rotated square sticks out in a right triangle.
        let h = 5.0 * (theta.sin() + theta.cos() - 1.0);
        let corners = 4.0 * h * h / (2.0 * theta).sin();

        let union = op(&a, &b, BooleanOp::Union);
        assert_eq!(components(&union), 1, "angle {theta}");
        assert!(
            (component_area(&union) - (100.0 + corners)).abs() < 1e-6,
            "angle {theta}"
        );

        let inter = op(&a, &b, BooleanOp::Intersection);
        assert_eq!(components(&inter), 1, "angle {theta}");
        assert!(
            (component_area(&inter) - (100.0 - corners)).abs() < 1e-6,
            "angle {theta}"
        );
    }
}

// The area of the lens formed by two circles of radius `r` at distance `d`.
fn lens_area(r: f64, d: f64) -> f64 {
    2.0 * r * r * (d / (2.0 * r)).acos() - 0.5 * d * (4.0 * r * r - d * d).sqrt()
}

#[test]
fn two_circles() {
    let a = kurbo::Circle::new((0.0, 0.0), 10.0).to_path(1e-4);
    let b = kurbo::Circle::new((10.0, 3.0), 10.0).to_path(1e-4);
    let d = 109.0f64.sqrt();
    let lens = lens_area(10.0, d);
    let disk = std::f64::consts::PI * 100.0;

    let graph = PathIntersectionGraph::new(&a, &b, 1e-5);
    assert_eq!(graph.intersection_points().len(), 2);

    let inter = op(&a, &b, BooleanOp::Intersection);
    assert_eq!(components(&inter), 1);
    assert!((component_area(&inter) - lens).abs() < 0.5);

    let union = op(&a, &b, BooleanOp::Union);
    assert_eq!(components(&union), 1);
    assert!((component_area(&union) - (2.0 * disk - lens)).abs() < 0.5);

    let diff = op(&a, &b, BooleanOp::Difference);
    assert!((component_area(&diff) - (disk - lens)).abs() < 0.5);
}

#[test]
fn rows_of_circles() {
    let (a, b) = circles(4);
    let graph = PathIntersectionGraph::new(&a, &b, 1e-5);
    assert!(graph.is_valid());
    // The first three circles of b each cross two circles of a, and the
    // last one crosses one.
    assert_eq!(graph.size(), 14);

    let inter = op(&a, &b, BooleanOp::Intersection);
    assert_eq!(components(&inter), 7);
}

#[test]
fn operations_agree_with_winding() {
    let a = kurbo::Circle::new((0.0, 0.0), 10.0).to_path(1e-4);
    let b = square(-3.0, -15.0, 8.0);
    let ops: [(BooleanOp, fn(bool, bool) -> bool); 5] = [
        (BooleanOp::Union, |a, b| a || b),
        (BooleanOp::Intersection, |a, b| a && b),
        (BooleanOp::Difference, |a, b| a && !b),
        (BooleanOp::ReverseDifference, |a, b| b && !a),
        (BooleanOp::Xor, |a, b| a != b),
    ];
    for (boolean, expected) in ops {
        let out = op(&a, &b, boolean);
        for i in 0..20 {
            for j in 0..30 {
                // Grid points that stay well away from every boundary.
                let p = Point::new(-12.25 + 1.25 * i as f64, -21.1 + 1.1 * j as f64);
                let near_circle = (p.to_vec2().hypot() - 10.0).abs() < 0.1;
                let near_square = (p.x + 3.0).abs() < 0.1
                    || (p.x - 5.0).abs() < 0.1
                    || (p.y + 15.0).abs() < 0.1
                    || (p.y + 7.0).abs() < 0.1;
                if near_circle || near_square {
                    continue;
                }
                assert_eq!(
                    inside(&out, p),
                    expected(inside(&a, p), inside(&b, p)),
                    "{boolean:?} at {p:?}"
                );
            }
        }
    }
}

#[test]
fn idempotence_and_symmetry() {
    let a = square(0.0, 0.0, 10.0);
    let b = square(5.0, 5.0, 10.0);

    let ab = op(&a, &b, BooleanOp::Union);
    let ba = op(&b, &a, BooleanOp::Union);
    assert!((component_area(&ab) - component_area(&ba)).abs() < 1e-9);

    let ab = op(&a, &b, BooleanOp::Difference);
    let ba = op(&b, &a, BooleanOp::ReverseDifference);
    assert!((component_area(&ab) - component_area(&ba)).abs() < 1e-9);

    // Feeding the output of one operation into another.
    let far = square(50.0, 0.0, 10.0);
    let twice = op(&a, &far, BooleanOp::Union);
    let again = op(&twice, &b, BooleanOp::Union);
    assert_eq!(components(&again), 2);
    assert!((component_area(&again) - 275.0).abs() < 1e-9);
}
