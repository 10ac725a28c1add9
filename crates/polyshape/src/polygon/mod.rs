//! Planar polygons embedded in 3D.
//!
//! Purpose
//! - Provide the per-facet geometry used by the polyhedron engine: planarity
//!   validation, a normal, angular reordering, signed area and triangulation.
//! - Stand on its own as a particle shape for 2D systems (area, moments,
//!   bounding/circum/in-circles, containment).
//!
//! Conventions
//! - Vertices are stored as `Vector3<f64>`; 2D input is lifted to `z = 0`.
//! - The stored normal is never flipped implicitly. Signs (signed area,
//!   winding) are always relative to it.
//! - In-plane coordinates use the right-handed frame `(u, v, normal)` from
//!   `util::plane_basis`, measured from the origin's projection.

mod circle;
mod sphero;
mod triangulate;

pub use sphero::Spheropolygon;
pub(crate) use sphero::segment_distance;
pub use triangulate::Triangulation;

use nalgebra::{Matrix3, Vector2, Vector3};

use crate::cfg::{DEGEN_EPS, PLANAR_EPS};
use crate::error::{require_positive, GeomError};
use crate::round::Circle;
use crate::util::{cmp_f64, has_duplicates, mean, newell_normal, plane_basis, translate_inertia_tensor};

/// A simple polygon with an explicit unit normal.
///
/// Invariants:
/// - At least 3 pairwise distinct vertices, not all collinear.
/// - Every vertex lies within `planar_tol` of the plane through `vertices[0]`
///   with normal `normal`.
/// - `normal` has unit length.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    vertices: Vec<Vector3<f64>>,
    normal: Vector3<f64>,
    planar_tol: f64,
}

impl Polygon {
    /// Build a polygon with the default planar tolerance.
    pub fn new(vertices: Vec<Vector3<f64>>, normal: Option<Vector3<f64>>) -> Result<Self, GeomError> {
        Self::with_tolerance(vertices, normal, PLANAR_EPS)
    }

    /// Build a polygon from 2D points (lifted to `z = 0`).
    pub fn from_2d(points: &[Vector2<f64>], normal: Option<Vector3<f64>>) -> Result<Self, GeomError> {
        let vertices = points.iter().map(|p| Vector3::new(p.x, p.y, 0.0)).collect();
        Self::new(vertices, normal)
    }

    /// Build a polygon, checking coplanarity against `planar_tol`.
    pub fn with_tolerance(
        vertices: Vec<Vector3<f64>>,
        normal: Option<Vector3<f64>>,
        planar_tol: f64,
    ) -> Result<Self, GeomError> {
        if vertices.len() < 3 {
            return Err(GeomError::degenerate(format!(
                "a polygon needs at least 3 vertices (got {})",
                vertices.len()
            )));
        }
        if has_duplicates(&vertices) {
            return Err(GeomError::degenerate("polygon vertices must be unique"));
        }
        let normal = match normal {
            Some(n) => {
                let len = n.norm();
                if !(len.is_finite() && len > 0.0) {
                    return Err(GeomError::invalid("polygon normal must be non-zero"));
                }
                n / len
            }
            None => corner_normal(&vertices)
                .ok_or_else(|| GeomError::degenerate("polygon vertices are collinear"))?,
        };
        let origin = vertices[0];
        if let Some(off) = vertices
            .iter()
            .map(|v| normal.dot(&(v - origin)).abs())
            .find(|d| *d > planar_tol)
        {
            return Err(GeomError::degenerate(format!(
                "polygon vertices are not coplanar (distance {off:.3e} > {planar_tol:.1e})"
            )));
        }
        Ok(Self {
            vertices,
            normal,
            planar_tol,
        })
    }

    #[inline]
    pub fn vertices(&self) -> &[Vector3<f64>] {
        &self.vertices
    }

    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn normal(&self) -> Vector3<f64> {
        self.normal
    }

    /// Vertex indices sorted by angle about the centroid.
    ///
    /// Counterclockwise about the normal unless `clockwise`. The result is
    /// rotated so that index 0 stays first.
    pub fn angular_order(&self, clockwise: bool) -> Vec<usize> {
        let c = self.center();
        let (u, v) = plane_basis(&self.normal);
        let mut keyed: Vec<(f64, usize)> = self
            .vertices
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let r = p - c;
                (v.dot(&r).atan2(u.dot(&r)), i)
            })
            .collect();
        keyed.sort_by(|a, b| cmp_f64(a.0, b.0).then(a.1.cmp(&b.1)));
        let mut order: Vec<usize> = keyed.into_iter().map(|(_, i)| i).collect();
        if clockwise {
            order.reverse();
        }
        let start = order.iter().position(|&i| i == 0).unwrap_or(0);
        order.rotate_left(start);
        order
    }

    /// Reorder vertices into a consistent angular winding (see `angular_order`).
    pub fn reorder_vertices(&mut self, clockwise: bool) {
        let order = self.angular_order(clockwise);
        self.vertices = order.into_iter().map(|i| self.vertices[i]).collect();
    }

    /// Shoelace area, positive when the vertices wind counterclockwise about
    /// the normal.
    pub fn signed_area(&self) -> f64 {
        0.5 * newell_normal(&self.vertices).dot(&self.normal)
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Rescale about the centroid so that `area() == value`.
    pub fn set_area(&mut self, value: f64) -> Result<(), GeomError> {
        require_positive("area", value)?;
        let current = self.area();
        let scale = (value / current).sqrt();
        let c = self.center();
        for v in self.vertices.iter_mut() {
            *v = c + (*v - c) * scale;
        }
        Ok(())
    }

    /// Vertex mean.
    #[inline]
    pub fn center(&self) -> Vector3<f64> {
        mean(&self.vertices)
    }

    /// Translate so that `center() == value`.
    pub fn set_center(&mut self, value: Vector3<f64>) {
        let delta = value - self.center();
        for v in self.vertices.iter_mut() {
            *v += delta;
        }
    }

    pub fn perimeter(&self) -> f64 {
        let n = self.vertices.len();
        (0..n)
            .map(|i| (self.vertices[(i + 1) % n] - self.vertices[i]).norm())
            .sum()
    }

    /// Second moments `(∫y², ∫x², ∫xy)` in the in-plane frame, about the
    /// projection of the origin onto the plane.
    pub fn planar_moments_inertia(&self) -> (f64, f64, f64) {
        moments_2d(&self.project(&Vector3::zeros()))
    }

    /// `∫(x² + y²)` about the projection of the origin.
    pub fn polar_moment_inertia(&self) -> f64 {
        let (ixx, iyy, _) = self.planar_moments_inertia();
        ixx + iyy
    }

    /// Inertia tensor of the lamina (unit area density) about the origin.
    ///
    /// The in-plane contribution is treated as a 2D body: the polar moment
    /// about the centroid is placed on the normal axis, then shifted to the
    /// origin with the parallel-axis theorem.
    pub fn inertia_tensor(&self) -> Matrix3<f64> {
        let c = self.center();
        let (ixx, iyy, _) = moments_2d(&self.project(&c));
        let local = self.normal * self.normal.transpose() * (ixx + iyy);
        translate_inertia_tensor(&c, &local, self.area())
    }

    /// Smallest circle containing all vertices.
    pub fn bounding_circle(&self) -> Circle {
        let c = self.center();
        let (cx, r) = circle::min_enclosing_circle(&self.project(&c));
        Circle::from_parts(self.lift(&c, cx), r)
    }

    /// The circle passing through every vertex.
    pub fn circumcircle(&self) -> Result<Circle, GeomError> {
        let c = self.center();
        let (cx, r) = circle::fit_circle(&self.project(&c))?;
        Ok(Circle::from_parts(self.lift(&c, cx), r))
    }

    /// Largest circle centered at the centroid that fits inside the polygon.
    pub fn incircle_from_center(&self) -> Result<Circle, GeomError> {
        if !self.is_convex() {
            return Err(GeomError::geometry(
                "incircle from center is only defined for convex polygons",
            ));
        }
        let c = self.center();
        if !self.contains(&c) {
            return Err(GeomError::geometry("the centroid is not inside the polygon"));
        }
        let n = self.vertices.len();
        let r = (0..n)
            .map(|i| {
                let a = self.vertices[i];
                let b = self.vertices[(i + 1) % n];
                let e = b - a;
                e.cross(&(c - a)).dot(&self.normal).abs() / e.norm()
            })
            .fold(f64::INFINITY, f64::min);
        Ok(Circle::from_parts(c, r))
    }

    /// All turns go the same way (collinear corners are ignored).
    pub fn is_convex(&self) -> bool {
        let n = self.vertices.len();
        let mut sign = 0.0;
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            let c = self.vertices[(i + 2) % n];
            let turn = (b - a).cross(&(c - b)).dot(&self.normal);
            if turn.abs() <= DEGEN_EPS {
                continue;
            }
            if sign == 0.0 {
                sign = turn.signum();
            } else if turn.signum() != sign {
                return false;
            }
        }
        true
    }

    /// Point containment; points on the boundary count as inside. Points off
    /// the plane (beyond the planar tolerance) are outside.
    pub fn contains(&self, point: &Vector3<f64>) -> bool {
        if self.normal.dot(&(point - self.vertices[0])).abs() > self.planar_tol {
            return false;
        }
        let (u, v) = plane_basis(&self.normal);
        let p = Vector2::new(u.dot(point), v.dot(point));
        let ring: Vec<Vector2<f64>> = self
            .vertices
            .iter()
            .map(|q| Vector2::new(u.dot(q), v.dot(q)))
            .collect();
        let n = ring.len();
        let scale = ring.iter().map(|q| q.norm()).fold(1.0, f64::max);
        let mut winding = 0i32;
        for i in 0..n {
            let a = ring[i];
            let b = ring[(i + 1) % n];
            let cross = (b - a).perp(&(p - a));
            if cross.abs() <= 1e-12 * scale * scale
                && (p - a).dot(&(p - b)) <= 0.0
            {
                return true;
            }
            if a.y <= p.y {
                if b.y > p.y && cross > 0.0 {
                    winding += 1;
                }
            } else if b.y <= p.y && cross < 0.0 {
                winding -= 1;
            }
        }
        winding != 0
    }

    /// Lazy ear-clipping triangulation over vertex indices.
    ///
    /// Each call starts a fresh pass; clone the iterator to replay it.
    pub fn triangulate(&self) -> Triangulation {
        Triangulation::new(self.project(&Vector3::zeros()), self.signed_area().signum())
    }

    /// In-plane coordinates relative to `origin`.
    fn project(&self, origin: &Vector3<f64>) -> Vec<Vector2<f64>> {
        let (u, v) = plane_basis(&self.normal);
        self.vertices
            .iter()
            .map(|p| {
                let r = p - origin;
                Vector2::new(u.dot(&r), v.dot(&r))
            })
            .collect()
    }

    fn lift(&self, origin: &Vector3<f64>, p: Vector2<f64>) -> Vector3<f64> {
        let (u, v) = plane_basis(&self.normal);
        origin + u * p.x + v * p.y
    }
}

/// First corner `(v[i+1] - v[i]) × (v[i+2] - v[i])` that is not degenerate.
fn corner_normal(vertices: &[Vector3<f64>]) -> Option<Vector3<f64>> {
    let n = vertices.len();
    for i in 0..n {
        let a = vertices[i];
        let e1 = vertices[(i + 1) % n] - a;
        let e2 = vertices[(i + 2) % n] - a;
        let cross = e1.cross(&e2);
        let len = cross.norm();
        if len > DEGEN_EPS * e1.norm() * e2.norm() && len > 0.0 {
            return Some(cross / len);
        }
    }
    None
}

/// Closed-form second moments of a simple 2D polygon (either winding).
fn moments_2d(ring: &[Vector2<f64>]) -> (f64, f64, f64) {
    let n = ring.len();
    let (mut area2, mut ixx, mut iyy, mut ixy) = (0.0, 0.0, 0.0, 0.0);
    for i in 0..n {
        let p = ring[i];
        let q = ring[(i + 1) % n];
        let c = p.x * q.y - q.x * p.y;
        area2 += c;
        ixx += c * (p.y * p.y + p.y * q.y + q.y * q.y);
        iyy += c * (p.x * p.x + p.x * q.x + q.x * q.x);
        ixy += c * (p.x * q.y + 2.0 * p.x * p.y + 2.0 * q.x * q.y + q.x * p.y);
    }
    let s = if area2 < 0.0 { -1.0 } else { 1.0 };
    (s * ixx / 12.0, s * iyy / 12.0, s * ixy / 24.0)
}
