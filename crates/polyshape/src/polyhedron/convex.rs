//! Convex polyhedra from bare point clouds, and their rounded variants.

use std::f64::consts::PI;

use nalgebra::Vector3;
use tracing::debug;

use crate::cfg::GeomCfg;
use crate::descriptor::ShapeSpec;
use crate::error::GeomError;
use crate::round::Sphere;

use super::hull::convex_hull;
use super::Polyhedron;

/// The convex hull of a point set as a merged, canonical polyhedron.
///
/// Only hull vertices are kept, in their original relative order; interior
/// and duplicate points are dropped.
#[derive(Clone, Debug)]
pub struct ConvexPolyhedron {
    inner: Polyhedron,
}

impl ConvexPolyhedron {
    pub fn new(vertices: &[Vector3<f64>]) -> Result<Self, GeomError> {
        Self::with_cfg(vertices, GeomCfg::default())
    }

    pub fn with_cfg(vertices: &[Vector3<f64>], cfg: GeomCfg) -> Result<Self, GeomError> {
        let hull = convex_hull(vertices)?;
        let mut remap = vec![usize::MAX; vertices.len()];
        for (new, &old) in hull.vertices.iter().enumerate() {
            remap[old] = new;
        }
        let kept: Vec<Vector3<f64>> = hull.vertices.iter().map(|&i| vertices[i]).collect();
        let facets: Vec<Vec<usize>> = hull
            .simplices
            .iter()
            .map(|s| s.iter().map(|&i| remap[i]).collect())
            .collect();
        debug!(
            input = vertices.len(),
            kept = kept.len(),
            simplices = facets.len(),
            "building convex polyhedron"
        );
        let mut inner = Polyhedron::with_cfg(kept, facets, cfg)?;
        inner.merge_facets_default()?;
        Ok(Self { inner })
    }

    #[inline]
    pub fn polyhedron(&self) -> &Polyhedron {
        &self.inner
    }

    /// Mutable access for setters and re-merging; the shape stays convex
    /// under translation, uniform scaling and merging.
    #[inline]
    pub fn polyhedron_mut(&mut self) -> &mut Polyhedron {
        &mut self.inner
    }

    pub fn into_polyhedron(self) -> Polyhedron {
        self.inner
    }

    /// Every plane distance `<= 0` (boundary inclusive).
    pub fn is_inside(&self, point: &Vector3<f64>) -> bool {
        self.is_inside_eps(point, 0.0)
    }

    /// Every plane distance `<= eps`.
    pub fn is_inside_eps(&self, point: &Vector3<f64>, eps: f64) -> bool {
        self.inner
            .planes()
            .iter()
            .all(|p| p.signed_distance(point) <= eps)
    }

    /// Largest sphere centered at `center()` inside the polyhedron.
    pub fn insphere_from_center(&self) -> Result<Sphere, GeomError> {
        let c = self.center_inside()?;
        let r = self
            .inner
            .planes()
            .iter()
            .map(|p| -p.signed_distance(&c))
            .fold(f64::INFINITY, f64::min);
        Ok(Sphere::from_parts(c, r))
    }

    /// Smallest sphere centered at `center()` containing the polyhedron.
    pub fn circumsphere_from_center(&self) -> Result<Sphere, GeomError> {
        let c = self.center_inside()?;
        Ok(Sphere::from_parts(c, self.inner.circumsphere_radius()))
    }

    pub fn to_spec(&self) -> ShapeSpec {
        ShapeSpec::ConvexPolyhedron {
            vertices: self.inner.vertices().iter().map(|v| [v.x, v.y, v.z]).collect(),
            rounding_radius: None,
        }
    }

    fn center_inside(&self) -> Result<Vector3<f64>, GeomError> {
        let c = self.inner.center();
        if self.is_inside(&c) {
            Ok(c)
        } else {
            Err(GeomError::geometry("the vertex centroid lies outside the polyhedron"))
        }
    }
}

/// A convex polyhedron swept by a ball of radius `radius`.
#[derive(Clone, Debug)]
pub struct ConvexSpheropolyhedron {
    core: ConvexPolyhedron,
    radius: f64,
}

impl ConvexSpheropolyhedron {
    /// `radius == 0` is allowed and degenerates to the core.
    pub fn new(core: ConvexPolyhedron, radius: f64) -> Result<Self, GeomError> {
        Ok(Self {
            core,
            radius: check_radius(radius)?,
        })
    }

    #[inline]
    pub fn core(&self) -> &ConvexPolyhedron {
        &self.core
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: f64) -> Result<(), GeomError> {
        self.radius = check_radius(radius)?;
        Ok(())
    }

    /// Steiner: `V + S r + 4πR r² + 4/3 π r³`.
    pub fn volume(&self) -> f64 {
        let p = self.core.polyhedron();
        let r = self.radius;
        p.volume()
            + p.surface_area() * r
            + 4.0 * PI * p.mean_curvature() * r * r
            + 4.0 / 3.0 * PI * r.powi(3)
    }

    /// Steiner: `S + 8πR r + 4π r²`.
    pub fn surface_area(&self) -> f64 {
        let p = self.core.polyhedron();
        let r = self.radius;
        p.surface_area() + 8.0 * PI * p.mean_curvature() * r + 4.0 * PI * r * r
    }

    /// Inside the core, or within `radius` of its boundary.
    pub fn is_inside(&self, point: &Vector3<f64>) -> bool {
        if self.core.is_inside(point) {
            return true;
        }
        let p = self.core.polyhedron();
        let topo = p.topology();
        (0..p.num_facets()).any(|k| {
            let plane = topo.planes[k];
            let d = plane.signed_distance(point);
            if d < 0.0 || d > self.radius {
                return false;
            }
            let foot = point - plane.normal * d;
            let inside_facet = p
                .facet_polygon(k)
                .map(|poly| poly.contains(&foot))
                .unwrap_or(false);
            inside_facet || edge_distance(&topo.facet_points(k), point) <= self.radius
        })
    }

    pub fn to_spec(&self) -> ShapeSpec {
        match self.core.to_spec() {
            ShapeSpec::ConvexPolyhedron { vertices, .. } => ShapeSpec::ConvexPolyhedron {
                vertices,
                rounding_radius: Some(self.radius),
            },
            other => other,
        }
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

fn edge_distance(loop_points: &[Vector3<f64>], p: &Vector3<f64>) -> f64 {
    let n = loop_points.len();
    (0..n)
        .map(|i| crate::polygon::segment_distance(p, &loop_points[i], &loop_points[(i + 1) % n]))
        .fold(f64::INFINITY, f64::min)
}
