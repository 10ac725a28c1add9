//! Canonical convex polyhedra used in tests, benchmarks and the CLI.
//!
//! Purpose
//! - The five Platonic solids and right regular prisms, each built through
//!   the full hull → canonicalize → merge pipeline.
//!
//! Reference values
//! - Cube `[-1, 1]³`: V = 8, S = 24.
//! - Octahedron with vertices `±e_i`: V = 4/3, S = 4√3.
//! - Regular tetrahedron on alternate cube corners: V = 8/3.
//! - Prism over a unit-circumradius n-gon with height 2: V = n sin(2π/n).

use std::f64::consts::PI;

use nalgebra::Vector3;

use crate::error::GeomError;

use super::convex::ConvexPolyhedron;

/// Golden ratio.
const PHI: f64 = 1.618_033_988_749_895;

/// Regular tetrahedron inscribed in the cube `[-1, 1]³`.
pub fn tetrahedron() -> Result<ConvexPolyhedron, GeomError> {
    ConvexPolyhedron::new(&[
        Vector3::new(1.0, 1.0, 1.0),
        Vector3::new(1.0, -1.0, -1.0),
        Vector3::new(-1.0, 1.0, -1.0),
        Vector3::new(-1.0, -1.0, 1.0),
    ])
}

/// Axis-aligned cube `[-1, 1]³`.
pub fn cube() -> Result<ConvexPolyhedron, GeomError> {
    let mut v = Vec::with_capacity(8);
    for &x in &[-1.0, 1.0] {
        for &y in &[-1.0, 1.0] {
            for &z in &[-1.0, 1.0] {
                v.push(Vector3::new(x, y, z));
            }
        }
    }
    ConvexPolyhedron::new(&v)
}

/// Regular octahedron with vertices `±e_i`.
pub fn octahedron() -> Result<ConvexPolyhedron, GeomError> {
    let mut v = Vec::with_capacity(6);
    for axis in 0..3 {
        for &s in &[1.0, -1.0] {
            let mut p = Vector3::zeros();
            p[axis] = s;
            v.push(p);
        }
    }
    ConvexPolyhedron::new(&v)
}

/// Regular dodecahedron containing the cube `[-1, 1]³` as vertices.
pub fn dodecahedron() -> Result<ConvexPolyhedron, GeomError> {
    let inv = 1.0 / PHI;
    let mut v = Vec::with_capacity(20);
    for &x in &[-1.0, 1.0] {
        for &y in &[-1.0, 1.0] {
            for &z in &[-1.0, 1.0] {
                v.push(Vector3::new(x, y, z));
            }
        }
    }
    for &a in &[-inv, inv] {
        for &b in &[-PHI, PHI] {
            v.push(Vector3::new(0.0, a, b));
            v.push(Vector3::new(a, b, 0.0));
            v.push(Vector3::new(b, 0.0, a));
        }
    }
    ConvexPolyhedron::new(&v)
}

/// Regular icosahedron with edge length 2.
pub fn icosahedron() -> Result<ConvexPolyhedron, GeomError> {
    let mut v = Vec::with_capacity(12);
    for &a in &[-1.0, 1.0] {
        for &b in &[-PHI, PHI] {
            v.push(Vector3::new(0.0, a, b));
            v.push(Vector3::new(a, b, 0.0));
            v.push(Vector3::new(b, 0.0, a));
        }
    }
    ConvexPolyhedron::new(&v)
}

/// Right prism over a regular `n`-gon of circumradius 1, spanning `z ∈ [-1, 1]`.
pub fn prism(n: usize) -> Result<ConvexPolyhedron, GeomError> {
    if n < 3 {
        return Err(GeomError::invalid(format!("prism needs n >= 3 (got {n})")));
    }
    let mut v = Vec::with_capacity(2 * n);
    for &z in &[-1.0, 1.0] {
        for k in 0..n {
            let t = 2.0 * PI * k as f64 / n as f64;
            v.push(Vector3::new(t.cos(), t.sin(), z));
        }
    }
    ConvexPolyhedron::new(&v)
}
