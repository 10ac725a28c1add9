//! Small vector helpers shared by the polygon and polyhedron modules.

use nalgebra::{Matrix3, Vector3};

use crate::cfg::DUP_EPS;

/// Arithmetic mean of a non-empty point set.
pub(crate) fn mean(points: &[Vector3<f64>]) -> Vector3<f64> {
    let mut acc = Vector3::zeros();
    for p in points {
        acc += p;
    }
    acc / (points.len() as f64)
}

/// Two unit vectors `(u, v)` such that `(u, v, n)` is a right-handed
/// orthonormal frame. `n` must be a unit vector.
pub(crate) fn plane_basis(n: &Vector3<f64>) -> (Vector3<f64>, Vector3<f64>) {
    // Project out the axis least aligned with `n`.
    let other = if n.x.abs() <= n.y.abs() && n.x.abs() <= n.z.abs() {
        Vector3::x()
    } else if n.y.abs() <= n.z.abs() {
        Vector3::y()
    } else {
        Vector3::z()
    };
    let u = (other - n * n.dot(&other)).normalize();
    let v = n.cross(&u);
    (u, v)
}

/// Newell's method: unnormalized normal of a closed loop whose length is
/// twice the enclosed (vector) area.
pub(crate) fn newell_normal(loop_points: &[Vector3<f64>]) -> Vector3<f64> {
    let n = loop_points.len();
    let mut acc = Vector3::zeros();
    for i in 0..n {
        acc += loop_points[i].cross(&loop_points[(i + 1) % n]);
    }
    acc
}

/// True if any two points coincide within `DUP_EPS`.
pub(crate) fn has_duplicates(points: &[Vector3<f64>]) -> bool {
    for i in 0..points.len() {
        for j in i + 1..points.len() {
            if (points[i] - points[j]).norm() < DUP_EPS {
                return true;
            }
        }
    }
    false
}

/// Parallel-axis shift of an inertia tensor from the center of mass to a
/// reference point at `-offset` (i.e. the body translated by `offset`).
pub(crate) fn translate_inertia_tensor(
    offset: &Vector3<f64>,
    tensor: &Matrix3<f64>,
    mass: f64,
) -> Matrix3<f64> {
    let shift = Matrix3::identity() * offset.norm_squared() - offset * offset.transpose();
    tensor + shift * mass
}

/// Total ordering on floats for sorting; NaNs compare equal.
#[inline]
pub(crate) fn cmp_f64(a: f64, b: f64) -> std::cmp::Ordering {
    a.partial_cmp(&b).unwrap_or(std::cmp::Ordering::Equal)
}
