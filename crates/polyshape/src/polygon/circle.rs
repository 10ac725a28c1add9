//! 2D circle constructions on projected polygon coordinates.

use nalgebra::{DMatrix, DVector, Vector2};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::cfg::{FIT_EPS, WELZL_SEED};
use crate::error::GeomError;

#[inline]
fn covers(center: &Vector2<f64>, r: f64, p: &Vector2<f64>) -> bool {
    (p - center).norm() <= r * (1.0 + 1e-12) + 1e-12
}

fn diameter_circle(a: &Vector2<f64>, b: &Vector2<f64>) -> (Vector2<f64>, f64) {
    ((a + b) * 0.5, (a - b).norm() * 0.5)
}

/// Circle through three points; collinear triples fall back to the widest pair.
fn circle_through(a: &Vector2<f64>, b: &Vector2<f64>, c: &Vector2<f64>) -> (Vector2<f64>, f64) {
    let ab = b - a;
    let ac = c - a;
    let d = 2.0 * ab.perp(&ac);
    if d.abs() <= 1e-300 {
        let pairs = [(a, b), (a, c), (b, c)];
        let mut best = diameter_circle(a, b);
        for (p, q) in pairs {
            let cand = diameter_circle(p, q);
            if cand.1 > best.1 {
                best = cand;
            }
        }
        return best;
    }
    let ab2 = ab.norm_squared();
    let ac2 = ac.norm_squared();
    let offset = Vector2::new(ac.y * ab2 - ab.y * ac2, ab.x * ac2 - ac.x * ab2) / d;
    (a + offset, offset.norm())
}

/// Minimal enclosing circle (Welzl, iterative form).
pub(super) fn min_enclosing_circle(points: &[Vector2<f64>]) -> (Vector2<f64>, f64) {
    let mut shuffled = points.to_vec();
    shuffled.shuffle(&mut StdRng::seed_from_u64(WELZL_SEED));
    let points = shuffled.as_slice();
    let mut center = points[0];
    let mut r = 0.0;
    for i in 1..points.len() {
        if covers(&center, r, &points[i]) {
            continue;
        }
        center = points[i];
        r = 0.0;
        for j in 0..i {
            if covers(&center, r, &points[j]) {
                continue;
            }
            (center, r) = diameter_circle(&points[i], &points[j]);
            for k in 0..j {
                if !covers(&center, r, &points[k]) {
                    (center, r) = circle_through(&points[i], &points[j], &points[k]);
                }
            }
        }
    }
    (center, r)
}

/// Least-squares circle through all points; fails if any point is off it.
///
/// Solves `2x·cx + 2y·cy + k = x² + y²` with `k = r² - |c|²`.
pub(super) fn fit_circle(points: &[Vector2<f64>]) -> Result<(Vector2<f64>, f64), GeomError> {
    let n = points.len();
    let a = DMatrix::from_fn(n, 3, |i, j| match j {
        0 => 2.0 * points[i].x,
        1 => 2.0 * points[i].y,
        _ => 1.0,
    });
    let b = DVector::from_fn(n, |i, _| points[i].norm_squared());
    let sol = a
        .svd(true, true)
        .solve(&b, 1e-14)
        .map_err(|e| GeomError::geometry(format!("circle fit failed: {e}")))?;
    let center = Vector2::new(sol[0], sol[1]);
    let r2 = sol[2] + center.norm_squared();
    if !(r2.is_finite() && r2 > 0.0) {
        return Err(GeomError::geometry("no circle passes through the vertices"));
    }
    let r = r2.sqrt();
    let worst = points
        .iter()
        .map(|p| ((p - center).norm() - r).abs())
        .fold(0.0, f64::max);
    if worst > FIT_EPS * r.max(1.0) {
        return Err(GeomError::geometry(format!(
            "vertices are not concyclic (residual {worst:.3e})"
        )));
    }
    Ok((center, r))
}
