//! Closed-form round shapes: circle, sphere, ellipse, ellipsoid.
//!
//! These carry no topology; they exist so that every descriptor kind maps to a
//! concrete shape and so that bounding/inscribed constructions have a return
//! type. Densities are 1 (area density in 2D, volume density in 3D).

use std::f64::consts::PI;

use nalgebra::{Matrix3, Vector3};

use crate::descriptor::ShapeSpec;
use crate::error::{require_positive, GeomError};
use crate::util::translate_inertia_tensor;

/// A circle in 3D space; its plane is implied by where it came from.
/// Inertia is reported for a lamina in the xy plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    radius: f64,
    center: Vector3<f64>,
}

impl Circle {
    pub fn new(radius: f64) -> Result<Self, GeomError> {
        Ok(Self {
            radius: require_positive("radius", radius)?,
            center: Vector3::zeros(),
        })
    }

    pub(crate) fn from_parts(center: Vector3<f64>, radius: f64) -> Self {
        Self { radius, center }
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[inline]
    pub fn center(&self) -> Vector3<f64> {
        self.center
    }

    pub fn set_radius(&mut self, radius: f64) -> Result<(), GeomError> {
        self.radius = require_positive("radius", radius)?;
        Ok(())
    }

    pub fn set_center(&mut self, center: Vector3<f64>) {
        self.center = center;
    }

    pub fn area(&self) -> f64 {
        PI * self.radius * self.radius
    }

    pub fn perimeter(&self) -> f64 {
        2.0 * PI * self.radius
    }

    pub fn inertia_tensor(&self) -> Matrix3<f64> {
        let i = self.area() * self.radius * self.radius / 4.0;
        let local = Matrix3::from_diagonal(&Vector3::new(i, i, 2.0 * i));
        translate_inertia_tensor(&self.center, &local, self.area())
    }

    /// `4πA / P²`; exactly 1.
    pub fn iq(&self) -> f64 {
        4.0 * PI * self.area() / self.perimeter().powi(2)
    }

    /// Distance test in 3D (boundary inclusive).
    pub fn contains(&self, point: &Vector3<f64>) -> bool {
        (point - self.center).norm() <= self.radius
    }

    pub fn to_spec(&self) -> ShapeSpec {
        ShapeSpec::Sphere {
            diameter: 2.0 * self.radius,
        }
    }
}

/// A solid sphere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    radius: f64,
    center: Vector3<f64>,
}

impl Sphere {
    pub fn new(radius: f64) -> Result<Self, GeomError> {
        Ok(Self {
            radius: require_positive("radius", radius)?,
            center: Vector3::zeros(),
        })
    }

    pub(crate) fn from_parts(center: Vector3<f64>, radius: f64) -> Self {
        Self { radius, center }
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[inline]
    pub fn center(&self) -> Vector3<f64> {
        self.center
    }

    pub fn set_radius(&mut self, radius: f64) -> Result<(), GeomError> {
        self.radius = require_positive("radius", radius)?;
        Ok(())
    }

    pub fn set_center(&mut self, center: Vector3<f64>) {
        self.center = center;
    }

    pub fn volume(&self) -> f64 {
        4.0 / 3.0 * PI * self.radius.powi(3)
    }

    pub fn surface_area(&self) -> f64 {
        4.0 * PI * self.radius * self.radius
    }

    pub fn inertia_tensor(&self) -> Matrix3<f64> {
        let i = 0.4 * self.volume() * self.radius * self.radius;
        translate_inertia_tensor(&self.center, &(Matrix3::identity() * i), self.volume())
    }

    /// `36πV² / S³`; exactly 1.
    pub fn iq(&self) -> f64 {
        36.0 * PI * self.volume().powi(2) / self.surface_area().powi(3)
    }

    pub fn contains(&self, point: &Vector3<f64>) -> bool {
        (point - self.center).norm() <= self.radius
    }

    pub fn to_spec(&self) -> ShapeSpec {
        ShapeSpec::Sphere {
            diameter: 2.0 * self.radius,
        }
    }
}

/// An origin-centered ellipse with semi-axes `a` (x) and `b` (y).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ellipse {
    a: f64,
    b: f64,
}

impl Ellipse {
    pub fn new(a: f64, b: f64) -> Result<Self, GeomError> {
        Ok(Self {
            a: require_positive("a", a)?,
            b: require_positive("b", b)?,
        })
    }

    #[inline]
    pub fn a(&self) -> f64 {
        self.a
    }

    #[inline]
    pub fn b(&self) -> f64 {
        self.b
    }

    pub fn area(&self) -> f64 {
        PI * self.a * self.b
    }

    /// Exact perimeter via the arithmetic-geometric mean.
    pub fn perimeter(&self) -> f64 {
        let (mut an, mut bn) = (self.a.max(self.b), self.a.min(self.b));
        let mut sum = 0.5 * (an * an - bn * bn);
        let mut pow = 1.0;
        for _ in 0..64 {
            let cn = 0.5 * (an - bn);
            if cn.abs() <= f64::EPSILON * an {
                break;
            }
            (an, bn) = (0.5 * (an + bn), (an * bn).sqrt());
            sum += pow * cn * cn;
            pow *= 2.0;
        }
        let major = self.a.max(self.b);
        2.0 * PI / an * (major * major - sum)
    }

    pub fn inertia_tensor(&self) -> Matrix3<f64> {
        let m = self.area();
        let ixx = m * self.b * self.b / 4.0;
        let iyy = m * self.a * self.a / 4.0;
        Matrix3::from_diagonal(&Vector3::new(ixx, iyy, ixx + iyy))
    }

    pub fn iq(&self) -> f64 {
        4.0 * PI * self.area() / self.perimeter().powi(2)
    }

    /// In-plane test; the z component must be zero within `1e-12`.
    pub fn contains(&self, point: &Vector3<f64>) -> bool {
        point.z.abs() <= 1e-12
            && (point.x / self.a).powi(2) + (point.y / self.b).powi(2) <= 1.0
    }

    pub fn to_spec(&self) -> ShapeSpec {
        ShapeSpec::Ellipsoid {
            a: self.a,
            b: self.b,
            c: None,
        }
    }
}

/// An origin-centered ellipsoid with semi-axes along x, y, z.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ellipsoid {
    a: f64,
    b: f64,
    c: f64,
}

impl Ellipsoid {
    pub fn new(a: f64, b: f64, c: f64) -> Result<Self, GeomError> {
        Ok(Self {
            a: require_positive("a", a)?,
            b: require_positive("b", b)?,
            c: require_positive("c", c)?,
        })
    }

    #[inline]
    pub fn axes(&self) -> (f64, f64, f64) {
        (self.a, self.b, self.c)
    }

    pub fn volume(&self) -> f64 {
        4.0 / 3.0 * PI * self.a * self.b * self.c
    }

    /// `4π abc R_G(a⁻², b⁻², c⁻²)` with Carlson's symmetric integral.
    pub fn surface_area(&self) -> f64 {
        let (a, b, c) = (self.a, self.b, self.c);
        4.0 * PI * a * b * c * carlson_rg(1.0 / (a * a), 1.0 / (b * b), 1.0 / (c * c))
    }

    pub fn inertia_tensor(&self) -> Matrix3<f64> {
        let m = self.volume() / 5.0;
        let (a2, b2, c2) = (self.a * self.a, self.b * self.b, self.c * self.c);
        Matrix3::from_diagonal(&Vector3::new(m * (b2 + c2), m * (a2 + c2), m * (a2 + b2)))
    }

    pub fn iq(&self) -> f64 {
        36.0 * PI * self.volume().powi(2) / self.surface_area().powi(3)
    }

    pub fn contains(&self, point: &Vector3<f64>) -> bool {
        (point.x / self.a).powi(2) + (point.y / self.b).powi(2) + (point.z / self.c).powi(2) <= 1.0
    }

    pub fn to_spec(&self) -> ShapeSpec {
        ShapeSpec::Ellipsoid {
            a: self.a,
            b: self.b,
            c: Some(self.c),
        }
    }
}

// Carlson duplication. Each step shrinks the spread of (x, y, z) by 4, so a
// fixed iteration count reaches machine precision for any positive input.
const CARLSON_STEPS: usize = 40;

fn carlson_rf(mut x: f64, mut y: f64, mut z: f64) -> f64 {
    for _ in 0..CARLSON_STEPS {
        let (sx, sy, sz) = (x.sqrt(), y.sqrt(), z.sqrt());
        let lam = sx * sy + sy * sz + sz * sx;
        x = 0.25 * (x + lam);
        y = 0.25 * (y + lam);
        z = 0.25 * (z + lam);
    }
    1.0 / ((x + y + z) / 3.0).sqrt()
}

fn carlson_rd(mut x: f64, mut y: f64, mut z: f64) -> f64 {
    let mut sum = 0.0;
    let mut fac = 1.0;
    for _ in 0..CARLSON_STEPS {
        let (sx, sy, sz) = (x.sqrt(), y.sqrt(), z.sqrt());
        let lam = sx * sy + sy * sz + sz * sx;
        sum += fac / (sz * (z + lam));
        fac *= 0.25;
        x = 0.25 * (x + lam);
        y = 0.25 * (y + lam);
        z = 0.25 * (z + lam);
    }
    let mu = (x + y + z) / 3.0;
    3.0 * sum + fac * mu.powf(-1.5)
}

fn carlson_rg(x: f64, y: f64, z: f64) -> f64 {
    0.5 * (z * carlson_rf(x, y, z) - (x - z) * (y - z) * carlson_rd(x, y, z) / 3.0
        + (x * y / z).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    #[test]
    fn round_shapes_reject_bad_radii() {
        assert!(Circle::new(0.0).is_err());
        assert!(Sphere::new(-1.0).is_err());
        assert!(Ellipse::new(1.0, f64::NAN).is_err());
        assert!(Ellipsoid::new(1.0, 1.0, 0.0).is_err());
    }

    #[test]
    fn sphere_and_circle_are_isoperimetric_optima() {
        assert!((Circle::new(2.0).unwrap().iq() - 1.0).abs() < 1e-12);
        assert!((Sphere::new(0.7).unwrap().iq() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_ellipse_is_a_circle() {
        let e = Ellipse::new(1.5, 1.5).unwrap();
        assert!((e.perimeter() - 3.0 * PI).abs() < 1e-12);
        let i = e.inertia_tensor();
        let c = Circle::new(1.5).unwrap().inertia_tensor();
        assert!((i - c).norm() < 1e-12);
    }

    #[test]
    fn ellipse_perimeter_matches_reference() {
        // 4 E(e) with e² = 3/4 for a = 1, b = 1/2.
        let e = Ellipse::new(1.0, 0.5).unwrap();
        assert!((e.perimeter() - 4.844_224_110_273_838).abs() < 1e-9);
        let swapped = Ellipse::new(0.5, 1.0).unwrap();
        assert!((e.perimeter() - swapped.perimeter()).abs() < 1e-12);
    }

    #[test]
    fn ellipsoid_area_reduces_to_sphere_and_spheroid() {
        let s = Ellipsoid::new(2.0, 2.0, 2.0).unwrap();
        assert!((s.surface_area() - 16.0 * PI).abs() < 1e-9);
        assert!((s.iq() - 1.0).abs() < 1e-9);
        // Prolate spheroid: 2πa² (1 + c/(a e) asin e).
        let (a, c) = (1.0f64, 2.0f64);
        let e = (1.0 - a * a / (c * c)).sqrt();
        let expected = 2.0 * PI * a * a * (1.0 + c / (a * e) * e.asin());
        let p = Ellipsoid::new(a, a, c).unwrap();
        assert!((p.surface_area() - expected).abs() < 1e-9);
    }

    #[test]
    fn containment_is_boundary_inclusive() {
        let s = Sphere::from_parts(vector![1.0, 0.0, 0.0], 1.0);
        assert!(s.contains(&vector![2.0, 0.0, 0.0]));
        assert!(!s.contains(&vector![2.1, 0.0, 0.0]));
        let e = Ellipsoid::new(1.0, 2.0, 3.0).unwrap();
        assert!(e.contains(&vector![0.0, 0.0, 3.0]));
        assert!(!e.contains(&vector![0.0, 2.1, 0.0]));
    }

    #[test]
    fn shifted_sphere_inertia_uses_parallel_axis() {
        let s = Sphere::from_parts(vector![0.0, 0.0, 2.0], 1.0);
        let v = s.volume();
        let i = s.inertia_tensor();
        assert!((i[(0, 0)] - (0.4 * v + 4.0 * v)).abs() < 1e-12);
        assert!((i[(2, 2)] - 0.4 * v).abs() < 1e-12);
    }
}
