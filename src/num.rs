//! Scalar numerics: a cheap total order on floats, ULP stepping, and root
//! finding for polynomials in Bernstein form.

use std::hash::Hash;

/// A wrapper for `f64` that implements `Ord`.
///
/// Unlike the more principled wrappers in the `ordered_float` crate, this
/// one just panics when comparing NaNs -- it doesn't order them, nor does
/// it guard against them on construction. We only ever sort parameters and
/// coordinates that were checked for finiteness on the way in.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct CheapOrderedFloat(f64);

impl CheapOrderedFloat {
    /// Retrieve the inner `f64`.
    pub fn into_inner(self) -> f64 {
        self.0
    }
}

impl Hash for CheapOrderedFloat {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state)
    }
}

impl Eq for CheapOrderedFloat {}

impl PartialOrd for CheapOrderedFloat {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CheapOrderedFloat {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        if self.0 < other.0 {
            std::cmp::Ordering::Less
        } else if self.0 > other.0 {
            std::cmp::Ordering::Greater
        } else if self.0 == other.0 {
            std::cmp::Ordering::Equal
        } else {
            panic!("tried to compare NaN")
        }
    }
}

impl From<f64> for CheapOrderedFloat {
    fn from(value: f64) -> Self {
        CheapOrderedFloat(value)
    }
}

/// Linear interpolation: returns `a` at `t = 0` and `b` at `t = 1`.
#[inline]
pub fn lerp(t: f64, a: f64, b: f64) -> f64 {
    (1.0 - t) * a + t * b
}

/// Returns the float adjacent to `x` in the direction of `toward`.
///
/// This is C's `nextafter`: if `x == toward` we return `toward`, and
/// stepping away from zero crosses into the subnormals and eventually to
/// infinity.
pub fn next_after(x: f64, toward: f64) -> f64 {
    if x.is_nan() || toward.is_nan() {
        return f64::NAN;
    }
    if x == toward {
        return toward;
    }
    if x == 0.0 {
        let tiny = f64::from_bits(1);
        return if toward > 0.0 { tiny } else { -tiny };
    }

    // For finite non-zero floats, the bit patterns of same-signed values are
    // ordered like their magnitudes.
    let bits = x.to_bits();
    let away_from_zero = (toward > x) == (x > 0.0);
    if away_from_zero {
        f64::from_bits(bits + 1)
    } else {
        f64::from_bits(bits - 1)
    }
}

/// Once a single root is bracketed by an interval this narrow, we stop subdividing.
const ROOT_TOLERANCE: f64 = 1e-12;

/// Hard cap on the subdivision depth.
///
/// Multiple roots never isolate into a single sign change, so without this
/// we would recurse forever on them.
const MAX_ROOT_DEPTH: u32 = 64;

/// Finds the roots in `[0, 1]` of the polynomial whose Bernstein coefficients are `coeffs`.
///
/// The roots are returned in increasing order. Isolated roots are accurate
/// to about `1e-12`; multiple roots are found less accurately, and may be
/// reported more than once. The zero polynomial has no isolated roots, and
/// so we return nothing for it.
pub fn bernstein_roots(coeffs: &[f64]) -> Vec<f64> {
    let mut roots = Vec::new();
    let (Some(&first), Some(&last)) = (coeffs.first(), coeffs.last()) else {
        return roots;
    };
    if coeffs.iter().all(|&c| c == 0.0) {
        return roots;
    }

    if first == 0.0 {
        roots.push(0.0);
    }
    bernstein_roots_rec(coeffs, 0.0, 1.0, 0, &mut roots);
    if last == 0.0 && coeffs.len() > 1 {
        roots.push(1.0);
    }
    roots
}

fn bernstein_roots_rec(coeffs: &[f64], lo: f64, hi: f64, depth: u32, out: &mut Vec<f64>) {
    let changes = sign_changes(coeffs);
    if changes == 0 {
        return;
    }

    let width = hi - lo;
    if depth >= MAX_ROOT_DEPTH || (changes == 1 && width <= ROOT_TOLERANCE) {
        // The control polygon's chord is a good enough estimate on such a
        // tiny interval.
        let c0 = coeffs[0];
        let cn = coeffs[coeffs.len() - 1];
        let t = if c0 != cn {
            (c0 / (c0 - cn)).clamp(0.0, 1.0)
        } else {
            0.5
        };
        out.push(lo + width * t);
        return;
    }

    let (left, right) = split_bernstein(coeffs, 0.5);
    let mid = lo + 0.5 * width;
    bernstein_roots_rec(&left, lo, mid, depth + 1, out);
    // Zero endpoints are ignored by the sign change count, so a root landing
    // exactly on the split point has to be caught here.
    if left[left.len() - 1] == 0.0 {
        out.push(mid);
    }
    bernstein_roots_rec(&right, mid, hi, depth + 1, out);
}

/// The number of sign changes in a sequence, ignoring zeros.
///
/// By Descartes' rule of signs for the Bernstein basis, this bounds the
/// number of roots in the open interval.
fn sign_changes(coeffs: &[f64]) -> usize {
    let mut changes = 0;
    let mut prev = 0.0f64;
    for &c in coeffs {
        if c != 0.0 {
            if prev != 0.0 && (c > 0.0) != (prev > 0.0) {
                changes += 1;
            }
            prev = c;
        }
    }
    changes
}

/// De Casteljau subdivision of scalar Bernstein coefficients at `t`.
pub(crate) fn split_bernstein(coeffs: &[f64], t: f64) -> (Vec<f64>, Vec<f64>) {
    let n = coeffs.len();
    let mut work = coeffs.to_vec();
    let mut left = Vec::with_capacity(n);
    let mut right = Vec::with_capacity(n);
    left.push(work[0]);
    right.push(work[n - 1]);
    for level in 1..n {
        for i in 0..n - level {
            work[i] = lerp(t, work[i], work[i + 1]);
        }
        left.push(work[0]);
        right.push(work[n - 1 - level]);
    }
    right.reverse();
    (left, right)
}
