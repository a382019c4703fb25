use kurbo::BezPath;
use libtest_mimic::{Arguments, Failed, Trial};
use pathops::{boolean_op, path::paths_from_bez_path, BooleanOp, Error, Options};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize, Debug)]
enum Assertion {
    /// The operation may fail, but it mustn't panic.
    NoPanic,
    /// The operation succeeds, and its output has this many components
    /// with this total (unsigned) area.
    Shape { components: usize, area: f64 },
    /// The inputs share some boundary, and the operation reports it.
    Defective,
}

#[derive(Serialize, Deserialize, Debug)]
struct RegressionCaseDeclaration {
    svg_path_1: String,
    svg_path_2: String,
    op: BooleanOp,
    #[serde(default)]
    options: Options,
    assert: Option<Assertion>,
}

fn main() {
    env_logger::init();
    let args = Arguments::from_args();
    let tests = regression_tests();

    libtest_mimic::run(&args, tests).exit();
}

fn regression_tests() -> Vec<Trial> {
    let ws = std::env::var("CARGO_MANIFEST_DIR").unwrap();
    let file_paths = glob::glob(&format!("{ws}/tests/regression/**/*.ron")).unwrap();

    file_paths
        .into_iter()
        .map(|p| {
            let p = p.unwrap();
            let name = input_path_base(&p).display().to_string();
            Trial::test(name, || generate_regression_test(p))
        })
        .collect()
}

fn input_path_base(input_path: &Path) -> &Path {
    let ws = std::env::var("CARGO_MANIFEST_DIR").unwrap();
    let base = format!("{ws}/tests/regression");
    input_path.strip_prefix(base).unwrap()
}

fn generate_regression_test(path: PathBuf) -> Result<(), Failed> {
    let input = std::fs::read_to_string(&path)?;
    let case: RegressionCaseDeclaration = ron::from_str(&input)?;
    let p0 = BezPath::from_svg(case.svg_path_1.as_str())?;
    let p1 = BezPath::from_svg(case.svg_path_2.as_str())?;
    let output = boolean_op(&p0, &p1, case.op, &case.options);

    match case.assert.unwrap_or(Assertion::NoPanic) {
        Assertion::NoPanic => Ok(()),
        Assertion::Shape { components, area } => {
            let output = output?;
            let paths = paths_from_bez_path(&output);
            if paths.len() != components {
                return Err(format!("expected {components} components, got {}", paths.len()).into());
            }
            let actual: f64 = paths.iter().map(|p| p.area().abs()).sum();
            if (actual - area).abs() > 1e-6 * area.max(1.0) {
                return Err(format!("expected area {area}, got {actual}").into());
            }
            Ok(())
        }
        Assertion::Defective => match output {
            Err(Error::DefectiveIntersections) => Ok(()),
            other => Err(format!("expected defective intersections, got {other:?}").into()),
        },
    }
}
