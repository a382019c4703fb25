use std::path::PathBuf;

use anyhow::{anyhow, Context as _};
use clap::{Args, Parser};
use kurbo::{Affine, BezPath, Shape as _, Vec2};
use svg::Document;

use pathops::{generators, IntersectionStrategy, Options, PathIntersectionGraph};

#[derive(Copy, Clone, Debug)]
enum Op {
    Union,
    Intersection,
    Xor,
    Difference,
    ReverseDifference,
}

#[derive(Copy, Clone, Debug, clap::ValueEnum)]
enum Example {
    Checkerboard,
    SlantedCheckerboard,
    Slanties,
    Circles,
}

#[derive(Copy, Clone, Debug, clap::ValueEnum)]
enum Strategy {
    Clipping,
    Subdivision,
}

#[derive(Parser)]
struct Cli {
    #[arg(long)]
    output: PathBuf,

    #[command(flatten)]
    input: Input,

    #[arg(long)]
    precision: Option<f64>,

    #[arg(long, value_enum)]
    strategy: Option<Strategy>,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct Input {
    /// A text file whose first two non-empty lines are svg path data.
    input: Option<PathBuf>,

    #[arg(long)]
    example: Option<Example>,
}

fn get_shapes(input: &Input) -> anyhow::Result<(BezPath, BezPath)> {
    match (&input.input, &input.example) {
        (Some(path), None) => {
            let input = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let mut lines = input.lines().map(str::trim).filter(|l| !l.is_empty());
            let mut next_shape = || -> anyhow::Result<BezPath> {
                let line = lines.next().ok_or_else(|| anyhow!("expected two paths"))?;
                Ok(BezPath::from_svg(line)?)
            };
            Ok((next_shape()?, next_shape()?))
        }
        (None, Some(example)) => {
            let glue = |(a, b): (Vec<_>, Vec<_>)| {
                (generators::to_bez_path(&a), generators::to_bez_path(&b))
            };
            Ok(match example {
                Example::Checkerboard => glue(generators::checkerboard(10)),
                Example::SlantedCheckerboard => glue(generators::slanted_checkerboard(10)),
                Example::Slanties => glue(generators::slanties(10)),
                Example::Circles => generators::circles(10),
            })
        }
        _ => Err(anyhow!("expected either an input file or an example")),
    }
}

pub fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Cli::parse();
    let (shape_a, shape_b) = get_shapes(&args.input)?;

    let mut opts = Options::default();
    if let Some(precision) = args.precision {
        opts.precision = precision;
    }
    if let Some(strategy) = args.strategy {
        opts.strategy = match strategy {
            Strategy::Clipping => IntersectionStrategy::BezierClipping,
            Strategy::Subdivision => IntersectionStrategy::Subdivision,
        };
    }
    let graph = PathIntersectionGraph::with_options(&shape_a, &shape_b, &opts);
    log::info!(
        "found {} intersections ({} defective)",
        graph.intersection_points().len(),
        graph.defective_points().len()
    );

    let bbox = shape_a.bounding_box().union(shape_b.bounding_box());
    let pad = 1.0;
    let one_width = bbox.width() + 2.0 * pad;
    let one_height = bbox.height() + 2.0 * pad;
    let stroke_width = bbox.width().max(bbox.height()) / 512.0;
    let mut document = Document::new().set(
        "viewBox",
        (
            bbox.x0 - pad,
            bbox.y0 - pad,
            one_width * 3.0,
            one_height * 2.0,
        ),
    );

    // Draw the original shapes.
    for shape in [&shape_a, &shape_b] {
        let path = svg::node::element::Path::new()
            .set("stroke", "black")
            .set("stroke-width", stroke_width)
            .set("stroke-linecap", "round")
            .set("stroke-linejoin", "round")
            .set("opacity", 0.2)
            .set("fill", "none")
            .set("d", shape.to_svg());
        document = document.add(path);
    }

    let panels = [
        (Op::Union, one_width, 0.0),
        (Op::Intersection, one_width * 2.0, 0.0),
        (Op::Xor, 0.0, one_height),
        (Op::Difference, one_width, one_height),
        (Op::ReverseDifference, one_width * 2.0, one_height),
    ];
    for (op, x_off, y_off) in panels {
        document = add_op(document, op, &graph, Vec2::new(x_off, y_off), stroke_width)?;
    }

    svg::save(&args.output, &document)?;

    Ok(())
}

fn add_op(
    mut doc: Document,
    op: Op,
    graph: &PathIntersectionGraph,
    offset: Vec2,
    stroke_width: f64,
) -> anyhow::Result<Document> {
    let paths = match op {
        Op::Union => graph.union(),
        Op::Intersection => graph.intersection(),
        Op::Xor => graph.xor(),
        Op::Difference => graph.a_minus_b(),
        Op::ReverseDifference => graph.b_minus_a(),
    }
    .with_context(|| format!("computing {op:?}"))?;

    let colors = [
        "#005F73", "#0A9396", "#94D2BD", "#E9D8A6", "#EE9B00", "#CA6702", "#BB3E03", "#AE2012",
        "#9B2226",
    ];

    for (path, color) in paths.iter().zip(colors.iter().cycle()) {
        let data = Affine::translate(offset) * path.to_bez_path();
        let path = svg::node::element::Path::new()
            .set("d", data.to_svg())
            .set("stroke", "black")
            .set("stroke-width", stroke_width)
            .set("stroke-linecap", "round")
            .set("stroke-linejoin", "round")
            .set("fill", *color);
        doc = doc.add(path);
    }
    Ok(doc)
}
