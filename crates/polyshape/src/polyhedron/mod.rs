//! Polyhedra built from vertices and facets.
//!
//! Purpose
//! - Own a canonical `FacetTopology` and expose volume, area, inertia,
//!   curvature descriptors and bounding spheres on demand.
//! - Keep every mutation (translation, rescaling, merging) behind `&mut self`
//!   so cached integrals can be dropped in one place.
//!
//! Pipeline: raw facets → `topology::canonicalize` → optional
//! `merge::merge` → properties (cached).

pub mod convex;
pub mod hull;
pub mod merge;
pub mod properties;
pub mod random;
pub mod special;
pub mod topology;

#[cfg(test)]
mod tests;
#[cfg(test)]
mod tests_special;

use std::cell::OnceCell;
use std::f64::consts::PI;

use nalgebra::{Matrix3, Vector3};
use tracing::debug;

use crate::cfg::GeomCfg;
use crate::descriptor::ShapeSpec;
use crate::error::{require_positive, GeomError};
use crate::polygon::Polygon;
use crate::round::Sphere;
use crate::util::mean;

pub use convex::{ConvexPolyhedron, ConvexSpheropolyhedron};
pub use hull::{convex_hull, Hull};
pub use properties::FacetIntersection;
pub use topology::{canonicalize, FacetTopology, Plane};

#[derive(Clone, Debug, Default)]
struct Cache {
    volume: OnceCell<f64>,
    surface_area: OnceCell<f64>,
    inertia: OnceCell<Matrix3<f64>>,
}

/// A closed polyhedron with canonical (outward, counterclockwise) facets.
///
/// Derived integrals are cached; every `&mut self` method resets the cache
/// before returning. The cache makes this type `!Sync`.
#[derive(Clone, Debug)]
pub struct Polyhedron {
    topo: FacetTopology,
    cfg: GeomCfg,
    cache: Cache,
}

impl Polyhedron {
    /// Canonicalize `facets` (indices into `vertices`) with default tolerances.
    pub fn new(vertices: Vec<Vector3<f64>>, facets: Vec<Vec<usize>>) -> Result<Self, GeomError> {
        Self::with_cfg(vertices, facets, GeomCfg::default())
    }

    pub fn with_cfg(
        vertices: Vec<Vector3<f64>>,
        facets: Vec<Vec<usize>>,
        cfg: GeomCfg,
    ) -> Result<Self, GeomError> {
        let topo = topology::canonicalize(vertices, facets, &cfg)?;
        Ok(Self::from_topology(topo, cfg))
    }

    pub(crate) fn from_topology(topo: FacetTopology, cfg: GeomCfg) -> Self {
        Self {
            topo,
            cfg,
            cache: Cache::default(),
        }
    }

    #[inline]
    pub fn topology(&self) -> &FacetTopology {
        &self.topo
    }

    #[inline]
    pub fn cfg(&self) -> &GeomCfg {
        &self.cfg
    }

    #[inline]
    pub fn vertices(&self) -> &[Vector3<f64>] {
        &self.topo.vertices
    }

    #[inline]
    pub fn facets(&self) -> &[Vec<usize>] {
        &self.topo.facets
    }

    /// Outward unit plane equations, one per facet.
    #[inline]
    pub fn planes(&self) -> &[Plane] {
        &self.topo.planes
    }

    #[inline]
    pub fn neighbors(&self) -> &[Vec<usize>] {
        &self.topo.neighbors
    }

    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.topo.vertices.len()
    }

    #[inline]
    pub fn num_facets(&self) -> usize {
        self.topo.num_facets()
    }

    /// Facet `k` as a polygon with its outward normal.
    pub fn facet_polygon(&self, k: usize) -> Result<Polygon, GeomError> {
        if k >= self.num_facets() {
            return Err(GeomError::invalid(format!(
                "facet {k} out of range ({} facets)",
                self.num_facets()
            )));
        }
        properties::facet_polygon(&self.topo, k)
    }

    /// Merge coplanar neighboring facets in place.
    pub fn merge_facets(&mut self, atol: f64, rtol: f64) -> Result<(), GeomError> {
        let cfg = self.cfg.with_merge_tolerances(atol, rtol);
        let merged = merge::merge(&self.topo, &cfg)?;
        debug!(
            before = self.num_facets(),
            after = merged.num_facets(),
            "merge_facets"
        );
        self.topo = merged;
        self.invalidate();
        Ok(())
    }

    /// Merge with the tolerances stored in this polyhedron's `GeomCfg`.
    pub fn merge_facets_default(&mut self) -> Result<(), GeomError> {
        self.merge_facets(self.cfg.merge_atol, self.cfg.merge_rtol)
    }

    pub fn volume(&self) -> f64 {
        *self.cache.volume.get_or_init(|| properties::volume(&self.topo))
    }

    /// Rescale about the center so that `volume() == value`.
    pub fn set_volume(&mut self, value: f64) -> Result<(), GeomError> {
        require_positive("volume", value)?;
        let current = self.volume();
        if current.is_nan() || current <= 0.0 {
            return Err(GeomError::invalid(format!(
                "cannot rescale a polyhedron with volume {current}"
            )));
        }
        self.scale_about_center((value / current).cbrt());
        Ok(())
    }

    pub fn surface_area(&self) -> f64 {
        *self
            .cache
            .surface_area
            .get_or_init(|| self.facet_areas().iter().sum())
    }

    pub fn facet_areas(&self) -> Vec<f64> {
        properties::facet_areas(&self.topo)
    }

    /// Vertex mean.
    pub fn center(&self) -> Vector3<f64> {
        mean(&self.topo.vertices)
    }

    /// Translate so that `center() == value`; plane offsets follow.
    pub fn set_center(&mut self, value: Vector3<f64>) {
        let delta = value - self.center();
        for v in self.topo.vertices.iter_mut() {
            *v += delta;
        }
        for p in self.topo.planes.iter_mut() {
            p.offset += p.normal.dot(&delta);
        }
        self.invalidate();
    }

    /// Inertia tensor about `center()` (unit density).
    pub fn inertia_tensor(&self) -> Result<Matrix3<f64>, GeomError> {
        if let Some(i) = self.cache.inertia.get() {
            return Ok(*i);
        }
        let i = properties::inertia_tensor(&self.topo, &self.center())?;
        Ok(*self.cache.inertia.get_or_init(|| i))
    }

    /// Largest vertex distance from `center()`.
    pub fn circumsphere_radius(&self) -> f64 {
        let c = self.center();
        self.topo
            .vertices
            .iter()
            .map(|v| (v - c).norm())
            .fold(0.0, f64::max)
    }

    /// Rescale about the center so that `circumsphere_radius() == value`.
    pub fn set_circumsphere_radius(&mut self, value: f64) -> Result<(), GeomError> {
        require_positive("circumsphere radius", value)?;
        let current = self.circumsphere_radius();
        self.scale_about_center(value / current);
        Ok(())
    }

    /// Interior dihedral angle between neighboring facets `a` and `b`.
    pub fn dihedral(&self, a: usize, b: usize) -> Result<f64, GeomError> {
        properties::dihedral(&self.topo, a, b)
    }

    pub fn facet_intersections(&self) -> Vec<FacetIntersection> {
        properties::facet_intersections(&self.topo)
    }

    /// Integrated mean curvature normalized so that the cube `[-1, 1]³` gives 1.5.
    pub fn mean_curvature(&self) -> f64 {
        properties::mean_curvature(&self.topo)
    }

    /// Isoperimetric quotient `36π V² / S³`.
    pub fn iq(&self) -> f64 {
        36.0 * PI * self.volume().powi(2) / self.surface_area().powi(3)
    }

    /// `4π R² / S` with `R` the mean curvature.
    pub fn tau(&self) -> f64 {
        4.0 * PI * self.mean_curvature().powi(2) / self.surface_area()
    }

    /// `R S / (3V)` with `R` the mean curvature.
    pub fn asphericity(&self) -> f64 {
        self.mean_curvature() * self.surface_area() / (3.0 * self.volume())
    }

    /// Minimal sphere containing every vertex.
    pub fn bounding_sphere(&self) -> Sphere {
        properties::bounding_sphere(&self.topo.vertices)
    }

    /// The sphere through every vertex, if there is one.
    pub fn circumsphere(&self) -> Result<Sphere, GeomError> {
        properties::circumsphere(&self.topo.vertices)
    }

    pub fn to_spec(&self) -> ShapeSpec {
        ShapeSpec::Mesh {
            vertices: self.topo.vertices.iter().map(|v| [v.x, v.y, v.z]).collect(),
            faces: self.topo.facets.clone(),
        }
    }

    fn scale_about_center(&mut self, factor: f64) {
        let c = self.center();
        for v in self.topo.vertices.iter_mut() {
            *v = c + (*v - c) * factor;
        }
        self.topo.refresh_planes();
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.cache = Cache::default();
    }
}
