//! Shape descriptors and the shape sum type.
//!
//! `ShapeSpec` is the serialized form (JSON objects tagged on `"type"`).
//! `from_spec` is the one place that maps a descriptor to a concrete shape;
//! every shape maps back with `to_spec`. Polyhedra round-trip up to vertex
//! order and facet winding.

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{require_positive, GeomError};
use crate::polygon::{Polygon, Spheropolygon};
use crate::polyhedron::{ConvexPolyhedron, ConvexSpheropolyhedron, Polyhedron};
use crate::round::{Circle, Ellipse, Ellipsoid, Sphere};

/// Serialized shape description.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ShapeSpec {
    Sphere {
        diameter: f64,
    },
    Ellipsoid {
        a: f64,
        b: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        c: Option<f64>,
    },
    /// 2- or 3-component vertices.
    Polygon {
        vertices: Vec<Vec<f64>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rounding_radius: Option<f64>,
    },
    ConvexPolyhedron {
        vertices: Vec<[f64; 3]>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rounding_radius: Option<f64>,
    },
    Mesh {
        vertices: Vec<[f64; 3]>,
        faces: Vec<Vec<usize>>,
    },
}

/// Every concrete shape the crate can build from a descriptor.
#[derive(Clone, Debug)]
pub enum Shape {
    Circle(Circle),
    Sphere(Sphere),
    Ellipse(Ellipse),
    Ellipsoid(Ellipsoid),
    Polygon(Polygon),
    Spheropolygon(Spheropolygon),
    ConvexPolyhedron(ConvexPolyhedron),
    ConvexSpheropolyhedron(ConvexSpheropolyhedron),
    Polyhedron(Polyhedron),
}

/// Build the shape described by `spec` in `ndim` (2 or 3) dimensions.
pub fn from_spec(spec: &ShapeSpec, ndim: usize) -> Result<Shape, GeomError> {
    if ndim != 2 && ndim != 3 {
        return Err(GeomError::invalid(format!("ndim must be 2 or 3 (got {ndim})")));
    }
    match spec {
        ShapeSpec::Sphere { diameter } => {
            let r = require_positive("diameter", *diameter)? / 2.0;
            Ok(if ndim == 2 {
                Shape::Circle(Circle::new(r)?)
            } else {
                Shape::Sphere(Sphere::new(r)?)
            })
        }
        ShapeSpec::Ellipsoid { a, b, c } => match (c, ndim) {
            (Some(c), 3) => Ok(Shape::Ellipsoid(Ellipsoid::new(*a, *b, *c)?)),
            (Some(_), _) => {
                warn!("ignoring semi-axis c for a 2D ellipse");
                Ok(Shape::Ellipse(Ellipse::new(*a, *b)?))
            }
            (None, _) => Ok(Shape::Ellipse(Ellipse::new(*a, *b)?)),
        },
        ShapeSpec::Polygon {
            vertices,
            rounding_radius,
        } => {
            let pts = vertices
                .iter()
                .map(|v| match v.as_slice() {
                    [x, y] => Ok(Vector3::new(*x, *y, 0.0)),
                    [x, y, z] => Ok(Vector3::new(*x, *y, *z)),
                    other => Err(GeomError::invalid(format!(
                        "polygon vertices need 2 or 3 coordinates (got {})",
                        other.len()
                    ))),
                })
                .collect::<Result<Vec<_>, _>>()?;
            let poly = Polygon::new(pts, None)?;
            match rounding_radius {
                Some(r) => Ok(Shape::Spheropolygon(Spheropolygon::new(poly, *r)?)),
                None => Ok(Shape::Polygon(poly)),
            }
        }
        ShapeSpec::ConvexPolyhedron {
            vertices,
            rounding_radius,
        } => {
            require_3d("ConvexPolyhedron", ndim)?;
            let pts: Vec<Vector3<f64>> = vertices.iter().map(|v| Vector3::from(*v)).collect();
            let core = ConvexPolyhedron::new(&pts)?;
            match rounding_radius {
                Some(r) => Ok(Shape::ConvexSpheropolyhedron(ConvexSpheropolyhedron::new(
                    core, *r,
                )?)),
                None => Ok(Shape::ConvexPolyhedron(core)),
            }
        }
        ShapeSpec::Mesh { vertices, faces } => {
            require_3d("Mesh", ndim)?;
            let pts = vertices.iter().map(|v| Vector3::from(*v)).collect();
            Ok(Shape::Polyhedron(Polyhedron::new(pts, faces.clone())?))
        }
    }
}

fn require_3d(kind: &str, ndim: usize) -> Result<(), GeomError> {
    if ndim == 3 {
        Ok(())
    } else {
        Err(GeomError::invalid(format!("{kind} descriptors are 3D only (got ndim {ndim})")))
    }
}

impl Polygon {
    /// 2-component vertices when the polygon lies in `z = 0`.
    pub fn to_spec(&self) -> ShapeSpec {
        ShapeSpec::Polygon {
            vertices: polygon_vertices(self),
            rounding_radius: None,
        }
    }
}

impl Spheropolygon {
    pub fn to_spec(&self) -> ShapeSpec {
        ShapeSpec::Polygon {
            vertices: polygon_vertices(self.polygon()),
            rounding_radius: Some(self.radius()),
        }
    }
}

fn polygon_vertices(poly: &Polygon) -> Vec<Vec<f64>> {
    let flat = poly.vertices().iter().all(|v| v.z == 0.0);
    poly.vertices()
        .iter()
        .map(|v| if flat { vec![v.x, v.y] } else { vec![v.x, v.y, v.z] })
        .collect()
}

/// Summary of the scalar properties of a shape.
///
/// `measure` is the volume in 3D and the area in 2D; `boundary` is the
/// surface area in 3D and the perimeter in 2D.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShapeProperties {
    pub kind: String,
    pub ndim: usize,
    pub measure: f64,
    pub boundary: f64,
    pub iq: f64,
    /// About the shape's own center for polyhedra, about the origin otherwise.
    pub inertia_tensor: [[f64; 3]; 3],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_vertices: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_facets: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mean_curvature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tau: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asphericity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_radius: Option<f64>,
}

fn rows(m: &Matrix3<f64>) -> [[f64; 3]; 3] {
    [
        [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
        [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
        [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
    ]
}

impl Shape {
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Circle(_) => "Circle",
            Shape::Sphere(_) => "Sphere",
            Shape::Ellipse(_) => "Ellipse",
            Shape::Ellipsoid(_) => "Ellipsoid",
            Shape::Polygon(_) => "Polygon",
            Shape::Spheropolygon(_) => "Spheropolygon",
            Shape::ConvexPolyhedron(_) => "ConvexPolyhedron",
            Shape::ConvexSpheropolyhedron(_) => "ConvexSpheropolyhedron",
            Shape::Polyhedron(_) => "Polyhedron",
        }
    }

    pub fn ndim(&self) -> usize {
        match self {
            Shape::Circle(_) | Shape::Ellipse(_) | Shape::Polygon(_) | Shape::Spheropolygon(_) => 2,
            _ => 3,
        }
    }

    pub fn to_spec(&self) -> ShapeSpec {
        match self {
            Shape::Circle(s) => s.to_spec(),
            Shape::Sphere(s) => s.to_spec(),
            Shape::Ellipse(s) => s.to_spec(),
            Shape::Ellipsoid(s) => s.to_spec(),
            Shape::Polygon(s) => s.to_spec(),
            Shape::Spheropolygon(s) => s.to_spec(),
            Shape::ConvexPolyhedron(s) => s.to_spec(),
            Shape::ConvexSpheropolyhedron(s) => s.to_spec(),
            Shape::Polyhedron(s) => s.to_spec(),
        }
    }

    /// Scalar properties of the shape.
    pub fn properties(&self) -> Result<ShapeProperties, GeomError> {
        let base = |measure: f64, boundary: f64, iq: f64, inertia: Matrix3<f64>| ShapeProperties {
            kind: self.kind().to_string(),
            ndim: self.ndim(),
            measure,
            boundary,
            iq,
            inertia_tensor: rows(&inertia),
            num_vertices: None,
            num_facets: None,
            mean_curvature: None,
            tau: None,
            asphericity: None,
            bounding_radius: None,
        };
        Ok(match self {
            Shape::Circle(s) => ShapeProperties {
                bounding_radius: Some(s.radius()),
                ..base(s.area(), s.perimeter(), s.iq(), s.inertia_tensor())
            },
            Shape::Sphere(s) => ShapeProperties {
                bounding_radius: Some(s.radius()),
                ..base(s.volume(), s.surface_area(), s.iq(), s.inertia_tensor())
            },
            Shape::Ellipse(s) => ShapeProperties {
                bounding_radius: Some(s.a().max(s.b())),
                ..base(s.area(), s.perimeter(), s.iq(), s.inertia_tensor())
            },
            Shape::Ellipsoid(s) => {
                let (a, b, c) = s.axes();
                ShapeProperties {
                    bounding_radius: Some(a.max(b).max(c)),
                    ..base(s.volume(), s.surface_area(), s.iq(), s.inertia_tensor())
                }
            }
            Shape::Polygon(p) => {
                let (area, perim) = (p.area(), p.perimeter());
                ShapeProperties {
                    num_vertices: Some(p.num_vertices()),
                    bounding_radius: Some(p.bounding_circle().radius()),
                    ..base(area, perim, polygon_iq(area, perim), p.inertia_tensor())
                }
            }
            Shape::Spheropolygon(sp) => {
                let (area, perim) = (sp.area(), sp.perimeter());
                ShapeProperties {
                    num_vertices: Some(sp.polygon().num_vertices()),
                    bounding_radius: Some(sp.polygon().bounding_circle().radius() + sp.radius()),
                    ..base(area, perim, polygon_iq(area, perim), sp.polygon().inertia_tensor())
                }
            }
            Shape::ConvexPolyhedron(c) => polyhedron_properties(c.polyhedron(), base)?,
            Shape::ConvexSpheropolyhedron(sp) => {
                let core = sp.core().polyhedron();
                let (v, s) = (sp.volume(), sp.surface_area());
                ShapeProperties {
                    kind: self.kind().to_string(),
                    measure: v,
                    boundary: s,
                    iq: 36.0 * std::f64::consts::PI * v * v / s.powi(3),
                    bounding_radius: Some(core.bounding_sphere().radius() + sp.radius()),
                    ..polyhedron_properties(core, base)?
                }
            }
            Shape::Polyhedron(p) => polyhedron_properties(p, base)?,
        })
    }
}

fn polygon_iq(area: f64, perimeter: f64) -> f64 {
    4.0 * std::f64::consts::PI * area / (perimeter * perimeter)
}

fn polyhedron_properties(
    p: &Polyhedron,
    base: impl Fn(f64, f64, f64, Matrix3<f64>) -> ShapeProperties,
) -> Result<ShapeProperties, GeomError> {
    Ok(ShapeProperties {
        num_vertices: Some(p.num_vertices()),
        num_facets: Some(p.num_facets()),
        mean_curvature: Some(p.mean_curvature()),
        tau: Some(p.tau()),
        asphericity: Some(p.asphericity()),
        bounding_radius: Some(p.bounding_sphere().radius()),
        ..base(p.volume(), p.surface_area(), p.iq(), p.inertia_tensor()?)
    })
}
