//! Polygon and polyhedron geometry for particle shapes.
//!
//! Layout
//! - `polygon`: planar polygons (area, moments, circles, triangulation).
//! - `polyhedron`: hull, facet topology, coplanar merging, integral and
//!   curvature properties, convex and rounded variants, fixtures, generators.
//! - `round`: circle, sphere, ellipse, ellipsoid.
//! - `descriptor`: serialized shape descriptors and the `Shape` sum type.
//!
//! API Policy
//! - Everything runs synchronously on the caller's thread. Polyhedra cache
//!   derived integrals in `OnceCell`s and are therefore `!Sync`.
//! - Tolerances default to the constants in `cfg` and can be overridden per
//!   call through `GeomCfg`.

pub mod api;
pub mod cfg;
pub mod descriptor;
pub mod error;
pub mod polygon;
pub mod polyhedron;
pub mod round;

mod util;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use cfg::GeomCfg;
pub use error::GeomError;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::cfg::GeomCfg;
    pub use crate::descriptor::{from_spec, Shape, ShapeSpec};
    pub use crate::error::GeomError;
    pub use crate::polygon::{Polygon, Spheropolygon};
    pub use crate::polyhedron::{ConvexPolyhedron, ConvexSpheropolyhedron, Polyhedron};
    pub use crate::round::{Circle, Ellipse, Ellipsoid, Sphere};
    pub use nalgebra::{Vector2 as Vec2, Vector3 as Vec3};
}
