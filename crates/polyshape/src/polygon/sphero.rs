use std::f64::consts::PI;

use nalgebra::Vector3;

use super::Polygon;
use crate::error::GeomError;

/// A polygon swept by a disk of radius `radius` (Minkowski sum).
#[derive(Clone, Debug, PartialEq)]
pub struct Spheropolygon {
    polygon: Polygon,
    radius: f64,
}

impl Spheropolygon {
    /// `radius == 0` is allowed and degenerates to the polygon itself.
    pub fn new(polygon: Polygon, radius: f64) -> Result<Self, GeomError> {
        Ok(Self {
            polygon,
            radius: check_radius(radius)?,
        })
    }

    #[inline]
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: f64) -> Result<(), GeomError> {
        self.radius = check_radius(radius)?;
        Ok(())
    }

    /// `A + P r + π r²` (convex core).
    pub fn area(&self) -> f64 {
        let r = self.radius;
        self.polygon.area() + self.polygon.perimeter() * r + PI * r * r
    }

    pub fn perimeter(&self) -> f64 {
        self.polygon.perimeter() + 2.0 * PI * self.radius
    }

    /// In-plane containment: inside the core, or within `radius` of an edge.
    pub fn contains(&self, point: &Vector3<f64>) -> bool {
        let n = self.polygon.normal();
        let v0 = self.polygon.vertices()[0];
        let projected = point - n * n.dot(&(point - v0));
        if (point - projected).norm() > self.polygon.planar_tol {
            return false;
        }
        self.polygon.contains(&projected) || self.boundary_distance(&projected) <= self.radius
    }

    fn boundary_distance(&self, p: &Vector3<f64>) -> f64 {
        let vs = self.polygon.vertices();
        let n = vs.len();
        (0..n)
            .map(|i| segment_distance(p, &vs[i], &vs[(i + 1) % n]))
            .fold(f64::INFINITY, f64::min)
    }
}

fn check_radius(radius: f64) -> Result<f64, GeomError> {
    if radius.is_finite() && radius >= 0.0 {
        Ok(radius)
    } else {
        Err(GeomError::invalid(format!(
            "rounding radius must be finite and >= 0 (got {radius})"
        )))
    }
}

pub(crate) fn segment_distance(p: &Vector3<f64>, a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    let ab = b - a;
    let t = ((p - a).dot(&ab) / ab.norm_squared()).clamp(0.0, 1.0);
    (p - (a + ab * t)).norm()
}
