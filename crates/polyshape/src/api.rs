//! Curated surface for callers (CLI, Python bindings, benches).
//!
//! Prefer these re-exports over reaching into submodules; internal module
//! paths may move.

// Configuration and errors
pub use crate::cfg::{GeomCfg, MERGE_ATOL, MERGE_RTOL, PLANAR_EPS};
pub use crate::error::GeomError;
// Polygons
pub use crate::polygon::{Polygon, Spheropolygon, Triangulation};
// Polyhedra
pub use crate::polyhedron::merge::merge;
pub use crate::polyhedron::random::{
    PolyhedronGenerator, PolyhedronSample, RandomConvexGenerator, RandomConvexParams, SeedReplay,
};
pub use crate::polyhedron::special;
pub use crate::polyhedron::{
    canonicalize, convex_hull, ConvexPolyhedron, ConvexSpheropolyhedron, FacetIntersection,
    FacetTopology, Hull, Plane, Polyhedron,
};
// Round shapes and descriptors
pub use crate::descriptor::{from_spec, Shape, ShapeProperties, ShapeSpec};
pub use crate::round::{Circle, Ellipse, Ellipsoid, Sphere};
