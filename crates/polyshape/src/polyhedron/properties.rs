//! Integral and curvature properties of a canonical facet topology.
//!
//! Purpose
//! - Volume and area from plane offsets and Newell areas.
//! - Inertia by coning triangulated facets to a reference point (exact for
//!   piecewise-linear boundaries).
//! - Edge-based curvature measures and the derived shape descriptors.
//! - Minimal enclosing sphere (Welzl) and the vertex circumsphere fit.
//!
//! All functions assume outward-wound facets as produced by `canonicalize`.

use std::f64::consts::PI;

use nalgebra::{DMatrix, DVector, Matrix3, Vector3};

use crate::cfg::FIT_EPS;
use crate::error::GeomError;
use crate::polygon::Polygon;
use crate::round::Sphere;
use crate::util::newell_normal;

use super::topology::FacetTopology;

/// Two neighboring facets and the edge they share.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FacetIntersection {
    pub facets: (usize, usize),
    /// Vertex ids of the shared edge, as it runs in the first facet.
    pub edge: (usize, usize),
}

/// Unsigned facet areas.
pub(crate) fn facet_areas(topo: &FacetTopology) -> Vec<f64> {
    (0..topo.num_facets())
        .map(|k| 0.5 * newell_normal(&topo.facet_points(k)).dot(&topo.planes[k].normal).abs())
        .collect()
}

/// `Σ offset_i · area_i / 3`.
pub(crate) fn volume(topo: &FacetTopology) -> f64 {
    facet_areas(topo)
        .iter()
        .zip(&topo.planes)
        .map(|(a, p)| p.offset * a / 3.0)
        .sum()
}

/// The polygon of facet `k`, carrying its outward normal.
pub(crate) fn facet_polygon(topo: &FacetTopology, k: usize) -> Result<Polygon, GeomError> {
    Polygon::with_tolerance(topo.facet_points(k), Some(topo.planes[k].normal), f64::INFINITY)
}

/// Inertia tensor about `origin` (unit density).
///
/// Each facet triangle `(a, b, c)` (relative to `origin`) spans a signed
/// tetrahedron with volume `det/6`; its second-moment matrix is
/// `V/20 · (aaᵀ + bbᵀ + ccᵀ + ssᵀ)` with `s = a + b + c`.
pub(crate) fn inertia_tensor(
    topo: &FacetTopology,
    origin: &Vector3<f64>,
) -> Result<Matrix3<f64>, GeomError> {
    let mut second = Matrix3::zeros();
    for k in 0..topo.num_facets() {
        let poly = facet_polygon(topo, k)?;
        let pts = poly.vertices();
        for [i, j, l] in poly.triangulate() {
            let (a, b, c) = (pts[i] - origin, pts[j] - origin, pts[l] - origin);
            let vol = a.dot(&b.cross(&c)) / 6.0;
            let s = a + b + c;
            second += (a * a.transpose() + b * b.transpose() + c * c.transpose() + s * s.transpose())
                * (vol / 20.0);
        }
    }
    Ok(Matrix3::identity() * second.trace() - second)
}

/// All neighbor pairs `(a, b)` with `a < b`.
pub(crate) fn facet_intersections(topo: &FacetTopology) -> Vec<FacetIntersection> {
    let mut out = Vec::new();
    for (a, list) in topo.neighbors.iter().enumerate() {
        for &b in list.iter().filter(|&&b| b > a) {
            if let Some(edge) = topo.shared_edge(a, b) {
                out.push(FacetIntersection {
                    facets: (a, b),
                    edge,
                });
            }
        }
    }
    out
}

/// Interior dihedral angle `arccos(-n_a · n_b)`.
pub(crate) fn dihedral(topo: &FacetTopology, a: usize, b: usize) -> Result<f64, GeomError> {
    if a >= topo.num_facets() || b >= topo.num_facets() || !topo.neighbors[a].contains(&b) {
        return Err(GeomError::NotNeighbors { a, b });
    }
    let cos = -topo.planes[a].normal.dot(&topo.planes[b].normal);
    Ok(cos.clamp(-1.0, 1.0).acos())
}

/// `Σ_edges L (π - φ) / (8π)`.
pub(crate) fn mean_curvature(topo: &FacetTopology) -> f64 {
    let total: f64 = facet_intersections(topo)
        .iter()
        .map(|fi| {
            let (u, v) = fi.edge;
            let length = (topo.vertices[u] - topo.vertices[v]).norm();
            let cos = -topo.planes[fi.facets.0]
                .normal
                .dot(&topo.planes[fi.facets.1].normal);
            length * (PI - cos.clamp(-1.0, 1.0).acos())
        })
        .sum();
    total / (8.0 * PI)
}

/// Minimal enclosing sphere of the vertices.
pub(crate) fn bounding_sphere(points: &[Vector3<f64>]) -> Sphere {
    let (c, r) = welzl::enclosing(points);
    Sphere::from_parts(c, r)
}

/// Sphere through every vertex, by linear least squares on
/// `2p·c + k = |p|²` with `k = r² - |c|²`.
pub(crate) fn circumsphere(points: &[Vector3<f64>]) -> Result<Sphere, GeomError> {
    let n = points.len();
    let a = DMatrix::from_fn(n, 4, |i, j| if j < 3 { 2.0 * points[i][j] } else { 1.0 });
    let b = DVector::from_fn(n, |i, _| points[i].norm_squared());
    let sol = a
        .svd(true, true)
        .solve(&b, 1e-14)
        .map_err(|e| GeomError::geometry(format!("sphere fit failed: {e}")))?;
    let center = Vector3::new(sol[0], sol[1], sol[2]);
    let r2 = sol[3] + center.norm_squared();
    if !(r2.is_finite() && r2 > 0.0) {
        return Err(GeomError::geometry("no sphere passes through the vertices"));
    }
    let r = r2.sqrt();
    let worst = points
        .iter()
        .map(|p| ((p - center).norm() - r).abs())
        .fold(0.0, f64::max);
    if worst > FIT_EPS * r.max(1.0) {
        return Err(GeomError::geometry(format!(
            "vertices are not cospherical (residual {worst:.3e})"
        )));
    }
    Ok(Sphere::from_parts(center, r))
}

mod welzl {
    //! Iterative Welzl: one nested loop per support point.

    use nalgebra::{Matrix3, Vector3};
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    use crate::cfg::WELZL_SEED;

    type Ball = (Vector3<f64>, f64);

    #[inline]
    fn covers(ball: &Ball, p: &Vector3<f64>) -> bool {
        (p - ball.0).norm() <= ball.1 * (1.0 + 1e-12) + 1e-12
    }

    /// Expected linear time after a seeded shuffle; sorted input would
    /// otherwise hit the quartic worst case.
    pub(super) fn enclosing(points: &[Vector3<f64>]) -> Ball {
        let mut shuffled = points.to_vec();
        shuffled.shuffle(&mut StdRng::seed_from_u64(WELZL_SEED));
        let points = shuffled.as_slice();
        let mut ball = (points[0], 0.0);
        for i in 1..points.len() {
            if !covers(&ball, &points[i]) {
                ball = with_one(&points[..i], &points[i]);
            }
        }
        ball
    }

    fn with_one(points: &[Vector3<f64>], a: &Vector3<f64>) -> Ball {
        let mut ball = (*a, 0.0);
        for j in 0..points.len() {
            if !covers(&ball, &points[j]) {
                ball = with_two(&points[..j], a, &points[j]);
            }
        }
        ball
    }

    fn with_two(points: &[Vector3<f64>], a: &Vector3<f64>, b: &Vector3<f64>) -> Ball {
        let mut ball = diametral(a, b);
        for k in 0..points.len() {
            if !covers(&ball, &points[k]) {
                ball = with_three(&points[..k], a, b, &points[k]);
            }
        }
        ball
    }

    fn with_three(
        points: &[Vector3<f64>],
        a: &Vector3<f64>,
        b: &Vector3<f64>,
        c: &Vector3<f64>,
    ) -> Ball {
        let mut ball = circum3(a, b, c);
        for l in 0..points.len() {
            if !covers(&ball, &points[l]) {
                ball = circum4(a, b, c, &points[l]);
            }
        }
        ball
    }

    fn diametral(a: &Vector3<f64>, b: &Vector3<f64>) -> Ball {
        ((a + b) * 0.5, (a - b).norm() * 0.5)
    }

    /// Smallest sphere through three points (their circumcircle).
    fn circum3(a: &Vector3<f64>, b: &Vector3<f64>, c: &Vector3<f64>) -> Ball {
        let ab = b - a;
        let ac = c - a;
        let n = ab.cross(&ac);
        let denom = 2.0 * n.norm_squared();
        if denom <= 1e-300 {
            return [diametral(a, b), diametral(a, c), diametral(b, c)]
                .into_iter()
                .fold((*a, -1.0), |best, cand| if cand.1 > best.1 { cand } else { best });
        }
        let offset = (n.cross(&ab) * ac.norm_squared() + ac.cross(&n) * ab.norm_squared()) / denom;
        (a + offset, offset.norm())
    }

    /// Sphere through four points; coplanar quadruples fall back to the
    /// smallest covering sphere through three of them.
    fn circum4(a: &Vector3<f64>, b: &Vector3<f64>, c: &Vector3<f64>, d: &Vector3<f64>) -> Ball {
        let m = Matrix3::from_rows(&[
            (b - a).transpose(),
            (c - a).transpose(),
            (d - a).transpose(),
        ]);
        let rhs = Vector3::new(
            0.5 * (b - a).norm_squared(),
            0.5 * (c - a).norm_squared(),
            0.5 * (d - a).norm_squared(),
        );
        let scale = (b - a).norm().max((c - a).norm()).max((d - a).norm());
        if m.determinant().abs() > 1e-12 * scale.powi(3) {
            if let Some(offset) = m.lu().solve(&rhs) {
                return (a + offset, offset.norm());
            }
        }
        let all = [a, b, c, d];
        let mut best: Option<Ball> = None;
        for skip in 0..4 {
            let rest: Vec<&Vector3<f64>> =
                all.iter().enumerate().filter(|(i, _)| *i != skip).map(|(_, p)| *p).collect();
            let ball = circum3(rest[0], rest[1], rest[2]);
            if covers(&ball, all[skip]) && best.map_or(true, |b| ball.1 < b.1) {
                best = Some(ball);
            }
        }
        best.unwrap_or_else(|| diametral(a, d))
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use nalgebra::vector;

        #[test]
        fn regular_tetrahedron_support() {
            let pts = [
                vector![1.0, 1.0, 1.0],
                vector![1.0, -1.0, -1.0],
                vector![-1.0, 1.0, -1.0],
                vector![-1.0, -1.0, 1.0],
                vector![0.1, 0.2, -0.3],
            ];
            let (c, r) = enclosing(&pts);
            assert!(c.norm() < 1e-12);
            assert!((r - 3f64.sqrt()).abs() < 1e-12);
        }

        #[test]
        fn sorted_sphere_samples_are_enclosed() {
            // Points ordered by height, the adversarial order for move-to-front.
            let mut pts: Vec<Vector3<f64>> = (0..400)
                .map(|k| {
                    let t = k as f64 * 2.399_963;
                    let z = -1.0 + 2.0 * (k as f64 + 0.5) / 400.0;
                    let rho = (1.0 - z * z).sqrt();
                    vector![rho * t.cos(), rho * t.sin(), z]
                })
                .collect();
            pts.sort_by(|a, b| a.z.total_cmp(&b.z));
            let (c, r) = enclosing(&pts);
            assert!(r <= 1.0 + 1e-9);
            assert!(r > 0.99);
            for p in &pts {
                assert!((p - c).norm() <= r * (1.0 + 1e-9));
            }
        }

        #[test]
        fn two_far_points_dominate() {
            let pts = [
                vector![0.0, 0.0, -5.0],
                vector![0.1, 0.3, 0.0],
                vector![-0.2, 0.1, 0.2],
                vector![0.0, 0.0, 5.0],
            ];
            let (c, r) = enclosing(&pts);
            assert!(c.norm() < 1e-12);
            assert!((r - 5.0).abs() < 1e-12);
        }
    }
}
