//! Boolean operations on paths, by walking the graph of their intersections.
//!
//! We find all the points where the two shapes cross, and for every stretch
//! of boundary between two consecutive crossings we decide (by testing a
//! single point) whether it lies inside or outside the other shape. A
//! boolean operation then just walks the boundaries, switching from one
//! shape to the other at every crossing, and following the stretches that
//! belong to the output. Components that don't cross the other shape at all
//! are either kept or discarded in their entirety.

use kurbo::{BezPath, Point, Shape};

use crate::{
    crossing::{intersect_paths, Options},
    path::{paths_from_bez_path, paths_to_bez_path, Path, PathInterval, PathTime},
    Error,
};

typed_vec!(
    /// An index into the vertices of a [`PathIntersectionGraph`].
    VertexVec,
    VertexIdx,
    "v"
);

/// One of the two operands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    A,
    B,
}

impl Side {
    fn idx(self) -> usize {
        match self {
            Side::A => 0,
            Side::B => 1,
        }
    }

    fn other(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// Is a piece of one shape's boundary inside the other shape?
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InOutFlag {
    /// The piece is inside.
    Inside,
    /// The piece is outside.
    Outside,
    /// We haven't figured it out, or different parts have different answers.
    Unknown,
}

impl InOutFlag {
    fn from_winding(winding: i32) -> Self {
        if winding % 2 != 0 {
            InOutFlag::Inside
        } else {
            InOutFlag::Outside
        }
    }
}

/// A crossing, as seen from one of the two shapes.
///
/// Every crossing gives rise to two vertices, one on each side, that are
/// each other's `neighbor`.
#[derive(Clone, Debug)]
struct IntersectionVertex {
    side: Side,
    component: usize,
    pos: PathTime,
    point: Point,
    neighbor: VertexIdx,
    /// The label of the boundary going forward from here to the next crossing.
    next_edge: InOutFlag,
    /// The label of the boundary arriving here from the previous crossing.
    previous_edge: InOutFlag,
    defective: bool,
    /// Our position in our component's crossing list, or `None` if we were removed.
    slot: Option<usize>,
}

#[derive(Clone, Debug)]
struct ComponentData {
    /// The crossings on this component, in order of path time.
    xlist: Vec<VertexIdx>,
    /// If all of this component's boundary is on the same side of the other
    /// shape, which side is it?
    status: InOutFlag,
}

/// The crossings between two shapes, and everything needed to compute
/// boolean operations from them.
///
/// Each shape is a collection of closed paths, and the inside of a shape
/// is determined by the even-odd rule.
#[derive(Clone, Debug)]
pub struct PathIntersectionGraph {
    paths: [Vec<Path>; 2],
    shapes: [BezPath; 2],
    vertices: VertexVec<IntersectionVertex>,
    components: [Vec<ComponentData>; 2],
    winding_points: Vec<Point>,
    valid: bool,
    precision: f64,
}

// Closes every subpath, and drops the ones that are just a point.
fn prepare(path: &BezPath) -> Vec<Path> {
    paths_from_bez_path(path)
        .into_iter()
        .filter_map(|mut p| {
            p.close();
            p.strip_degenerate();
            (!p.is_degenerate()).then_some(p)
        })
        .collect()
}

impl PathIntersectionGraph {
    /// Builds the intersection graph of two shapes, with the default
    /// intersection algorithm.
    pub fn new(a: &BezPath, b: &BezPath, precision: f64) -> Self {
        let options = Options {
            precision,
            ..Options::default()
        };
        Self::with_options(a, b, &options)
    }

    /// Builds the intersection graph of two shapes.
    pub fn with_options(a: &BezPath, b: &BezPath, options: &Options) -> Self {
        let paths = [prepare(a), prepare(b)];
        let shapes = [paths_to_bez_path(&paths[0]), paths_to_bez_path(&paths[1])];
        let components = [
            vec![
                ComponentData {
                    xlist: Vec::new(),
                    status: InOutFlag::Unknown,
                };
                paths[0].len()
            ],
            vec![
                ComponentData {
                    xlist: Vec::new(),
                    status: InOutFlag::Unknown,
                };
                paths[1].len()
            ],
        ];
        let mut graph = PathIntersectionGraph {
            paths,
            shapes,
            vertices: VertexVec::default(),
            components,
            winding_points: Vec::new(),
            valid: true,
            precision: options.precision,
        };
        if graph.paths[0].is_empty() || graph.paths[1].is_empty() {
            return graph;
        }

        let crossings = intersect_paths(&graph.paths[0], &graph.paths[1], options);
        if crossings.is_empty() {
            return graph;
        }

        for x in crossings {
            let ia = VertexIdx(graph.vertices.len());
            let ib = VertexIdx(ia.0 + 1);
            let vertex = |side, component, pos, neighbor| IntersectionVertex {
                side,
                component,
                pos,
                point: x.point,
                neighbor,
                next_edge: InOutFlag::Unknown,
                previous_edge: InOutFlag::Unknown,
                defective: false,
                slot: None,
            };
            graph
                .vertices
                .push(vertex(Side::A, x.a.path_index, x.a.time, ib));
            graph
                .vertices
                .push(vertex(Side::B, x.b.path_index, x.b.time, ia));
            graph.components[0][x.a.path_index].xlist.push(ia);
            graph.components[1][x.b.path_index].xlist.push(ib);
        }

        let vertices = &graph.vertices;
        for comp in graph.components.iter_mut().flatten() {
            comp.xlist.sort_by_key(|v| vertices[*v].pos);
        }

        graph.assign_edge_labels();
        graph.assign_statuses();
        graph.remove_degenerate();
        graph.relink();
        graph.check_invariants();
        graph
    }

    // Labels every stretch of boundary between consecutive crossings as
    // inside or outside the other shape.
    //
    // If the test point lies on the other shape's boundary, its parity means
    // nothing: the shapes share an edge there. We mark the stretch's starting
    // crossing as defective.
    fn assign_edge_labels(&mut self) {
        for side in [Side::A, Side::B] {
            let other = &self.shapes[side.other().idx()];
            let other_paths = &self.paths[side.other().idx()];
            for (ci, comp) in self.components[side.idx()].iter().enumerate() {
                let path = &self.paths[side.idx()][ci];
                let n = comp.xlist.len();
                for k in 0..n {
                    let v = comp.xlist[k];
                    let w = comp.xlist[(k + 1) % n];
                    let interval =
                        PathInterval::forward(self.vertices[v].pos, self.vertices[w].pos, path.size());
                    let mid = path.point_at(interval.inside(self.precision));
                    let label = InOutFlag::from_winding(other.winding(mid));
                    self.vertices[v].next_edge = label;
                    self.vertices[w].previous_edge = label;
                    self.winding_points.push(mid);

                    if other_paths.iter().any(|p| p.distance(mid) <= self.precision) {
                        log::warn!("boundaries overlap near {mid:?}");
                        self.valid = false;
                        self.vertices[v].defective = true;
                        let nb = self.vertices[v].neighbor;
                        self.vertices[nb].defective = true;
                    }
                }
            }
        }
    }

    fn assign_statuses(&mut self) {
        for comp in self.components.iter_mut().flatten() {
            let mut labels = comp.xlist.iter().map(|v| self.vertices[*v].next_edge);
            let Some(first) = labels.next() else {
                continue;
            };
            comp.status = if labels.all(|l| l == first) {
                first
            } else {
                InOutFlag::Unknown
            };
        }
    }

    // A crossing where the boundary before and after it are on the same side
    // of the other shape isn't really a crossing: the shapes just touch. We
    // remove those (and their neighbors). If a vertex looks like a touch on
    // one side but not on the other, the graph is defective.
    fn remove_degenerate(&mut self) {
        for side in [Side::A, Side::B] {
            for ci in 0..self.components[side.idx()].len() {
                let mut k = 0;
                while k < self.components[side.idx()][ci].xlist.len() {
                    let xl = &self.components[side.idx()][ci].xlist;
                    let i = xl[k];
                    let next_pos = (k + 1) % xl.len();
                    let n = xl[next_pos];
                    if self.vertices[i].next_edge != self.vertices[n].next_edge {
                        k += 1;
                        continue;
                    }

                    let last_node = i == n;
                    let nn = self.vertices[n].neighbor;
                    let o_side = self.vertices[nn].side.idx();
                    let o_comp = self.vertices[nn].component;
                    let oxl = &self.components[o_side][o_comp].xlist;
                    let Some(nn_pos) = oxl.iter().position(|v| *v == nn) else {
                        k += 1;
                        continue;
                    };
                    let prior = oxl[(nn_pos + oxl.len() - 1) % oxl.len()];
                    if self.vertices[prior].next_edge != self.vertices[nn].next_edge {
                        log::warn!(
                            "defective crossing at {:?}",
                            self.vertices[n].point
                        );
                        self.valid = false;
                        self.vertices[n].defective = true;
                        self.vertices[nn].defective = true;
                        k += 1;
                        continue;
                    }

                    log::trace!("removing touching point at {:?}", self.vertices[n].point);
                    self.components[o_side][o_comp].xlist.remove(nn_pos);
                    self.components[side.idx()][ci].xlist.remove(next_pos);
                    if last_node {
                        break;
                    }
                    if next_pos < k {
                        k -= 1;
                    }
                }
            }
        }
    }

    fn relink(&mut self) {
        for comp in self.components.iter().flatten() {
            let n = comp.xlist.len();
            for (k, v) in comp.xlist.iter().enumerate() {
                let prior = comp.xlist[(k + n - 1) % n];
                self.vertices[*v].slot = Some(k);
                self.vertices[*v].previous_edge = self.vertices[prior].next_edge;
            }
        }
    }

    #[cfg(any(test, feature = "slow-asserts"))]
    fn check_invariants(&self) {
        for (side, comps) in self.components.iter().enumerate() {
            for comp in comps {
                let n = comp.xlist.len();
                for (k, v) in comp.xlist.iter().enumerate() {
                    let vx = &self.vertices[*v];
                    assert_eq!(vx.side.idx(), side);
                    assert_eq!(vx.slot, Some(k));
                    let nb = &self.vertices[vx.neighbor];
                    assert_eq!(nb.neighbor, *v, "{v:?} isn't its neighbor's neighbor");
                    assert_ne!(nb.side, vx.side);
                    assert!(nb.slot.is_some(), "{v:?} has a removed neighbor");

                    if self.valid {
                        let next = &self.vertices[comp.xlist[(k + 1) % n]];
                        assert_ne!(vx.next_edge, next.next_edge, "labels don't alternate at {v:?}");
                    }
                }
                if self.valid {
                    assert_eq!(n % 2, 0);
                }
            }
        }
    }

    #[cfg(not(any(test, feature = "slow-asserts")))]
    fn check_invariants(&self) {}

    // Walks the graph, following the edges selected by `enter`. For each
    // side, `enter` says whether we follow the edges of that side's
    // boundary that are inside the other shape (as opposed to outside).
    fn get_result(&self, enter: [bool; 2]) -> Result<Vec<Path>, Error> {
        if !self.valid {
            return Err(Error::DefectiveIntersections);
        }

        let mut processed = VertexVec::filled(false, self.vertices.len());
        let mut steps = 0;
        let mut result = Vec::new();
        for start in self
            .components
            .iter()
            .flatten()
            .flat_map(|c| c.xlist.iter().copied())
        {
            if processed[start] {
                continue;
            }

            let mut segs = Vec::new();
            let mut reverse = false;
            let mut i = start;
            while !processed[i] {
                let prev = &self.vertices[i];
                let s = prev.side.idx();
                let path = &self.paths[s][prev.component];
                let xl = &self.components[s][prev.component].xlist;
                let slot = prev.slot.ok_or(Error::Traversal)?;

                reverse = (prev.next_edge == InOutFlag::Inside) ^ enter[s];
                let next_slot = if reverse {
                    (slot + xl.len() - 1) % xl.len()
                } else {
                    (slot + 1) % xl.len()
                };
                let next_idx = xl[next_slot];
                let next = &self.vertices[next_idx];

                let interval =
                    PathInterval::from_direction(prev.pos, next.pos, reverse, path.size());
                segs.extend(path.portion(&interval, prev.point, next.point));

                processed[i] = true;
                processed[next_idx] = true;
                steps += 1;
                i = next.neighbor;
            }

            let mut path = Path::new(segs).map_err(|_| Error::Traversal)?;
            path.close();
            if reverse {
                path = path.reversed();
            }
            result.push(path);
        }

        if steps != self.size() {
            log::warn!("visited {steps} edges out of {}", self.size());
            return Err(Error::Traversal);
        }
        Ok(result)
    }

    // Adds the components of `side` that don't cross the other shape, if
    // they're inside it (when `inside` is true) or outside it (otherwise).
    fn push_nonintersecting(&self, side: Side, inside: bool, out: &mut Vec<Path>) {
        let other = &self.shapes[side.other().idx()];
        for (comp, path) in self.components[side.idx()]
            .iter()
            .zip(&self.paths[side.idx()])
        {
            if !comp.xlist.is_empty() {
                continue;
            }
            let state = match comp.status {
                InOutFlag::Inside => true,
                InOutFlag::Outside => false,
                InOutFlag::Unknown => {
                    InOutFlag::from_winding(other.winding(path.initial_point()))
                        == InOutFlag::Inside
                }
            };
            if state == inside {
                out.push(path.clone());
            }
        }
    }

    /// The union of the two shapes.
    pub fn union(&self) -> Result<Vec<Path>, Error> {
        let mut ret = self.get_result([false, false])?;
        self.push_nonintersecting(Side::A, false, &mut ret);
        self.push_nonintersecting(Side::B, false, &mut ret);
        Ok(ret)
    }

    /// The intersection of the two shapes.
    pub fn intersection(&self) -> Result<Vec<Path>, Error> {
        let mut ret = self.get_result([true, true])?;
        self.push_nonintersecting(Side::A, true, &mut ret);
        self.push_nonintersecting(Side::B, true, &mut ret);
        Ok(ret)
    }

    /// The first shape, minus the second.
    pub fn a_minus_b(&self) -> Result<Vec<Path>, Error> {
        let mut ret = self.get_result([false, true])?;
        self.push_nonintersecting(Side::A, false, &mut ret);
        self.push_nonintersecting(Side::B, true, &mut ret);
        Ok(ret)
    }

    /// The second shape, minus the first.
    pub fn b_minus_a(&self) -> Result<Vec<Path>, Error> {
        let mut ret = self.get_result([true, false])?;
        self.push_nonintersecting(Side::B, false, &mut ret);
        self.push_nonintersecting(Side::A, true, &mut ret);
        Ok(ret)
    }

    /// The symmetric difference of the two shapes.
    pub fn xor(&self) -> Result<Vec<Path>, Error> {
        let mut ret = self.a_minus_b()?;
        ret.extend(self.b_minus_a()?);
        Ok(ret)
    }

    /// The points where the shapes cross, not counting points where they
    /// only touch.
    pub fn intersection_points(&self) -> Vec<Point> {
        self.live_points(false)
    }

    /// The crossings that we couldn't make sense of.
    ///
    /// If this is non-empty, the boolean operations return
    /// [`Error::DefectiveIntersections`].
    pub fn defective_points(&self) -> Vec<Point> {
        self.live_points(true)
    }

    fn live_points(&self, defective: bool) -> Vec<Point> {
        self.components[Side::A.idx()]
            .iter()
            .flat_map(|c| c.xlist.iter())
            .map(|v| &self.vertices[*v])
            .filter(|v| v.defective == defective)
            .map(|v| v.point)
            .collect()
    }

    /// The number of crossings.
    pub fn size(&self) -> usize {
        self.components[Side::A.idx()]
            .iter()
            .map(|c| c.xlist.len())
            .sum()
    }

    /// Did everything make sense?
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// The points at which we tested whether the boundary of one shape was
    /// inside the other, for debugging.
    pub fn winding_points(&self) -> &[Point] {
        &self.winding_points
    }

    /// Draws the two shapes and their crossings.
    #[cfg(feature = "debug-svg")]
    pub fn dump_svg(&self) -> svg::Document {
        let bbox = self.shapes[0].bounding_box().union(self.shapes[1].bounding_box());
        let pad = 1.0 + 0.02 * bbox.width().max(bbox.height());
        let stroke_width = bbox.width().max(bbox.height()) / 512.0;
        let mut document = svg::Document::new().set(
            "viewBox",
            (
                bbox.x0 - pad,
                bbox.y0 - pad,
                bbox.width() + 2.0 * pad,
                bbox.height() + 2.0 * pad,
            ),
        );

        for (shape, color) in self.shapes.iter().zip(["red", "blue"]) {
            let path = svg::node::element::Path::new()
                .set("stroke", color)
                .set("stroke-width", stroke_width)
                .set("fill", "none")
                .set("d", shape.to_svg());
            document = document.add(path);
        }

        for v in self.vertices.iter().map(|(_, v)| v) {
            if v.side != Side::A || v.slot.is_none() {
                continue;
            }
            let color = if v.defective { "orange" } else { "black" };
            let circle = svg::node::element::Circle::new()
                .set("cx", v.point.x)
                .set("cy", v.point.y)
                .set("r", 4.0 * stroke_width)
                .set("fill", color);
            document = document.add(circle);
        }
        for p in &self.winding_points {
            let circle = svg::node::element::Circle::new()
                .set("cx", p.x)
                .set("cy", p.y)
                .set("r", 2.0 * stroke_width)
                .set("fill", "green");
            document = document.add(circle);
        }
        document
    }
}
