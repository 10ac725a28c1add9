//! PyO3 bindings for selected `polyshape` functions.
//!
//! Notes
//! - Bindings stay thin: vertices arrive as lists of `(x, y, z)` tuples and
//!   results go back as plain floats or dicts.
//! - Every `GeomError` surfaces as `ValueError` with the error's message.

use nalgebra::Matrix3;
use pyo3::prelude::*;
use pyo3::types::PyDict;
use polyshape::api::{ConvexPolyhedron, Polyhedron};

mod common;

use common::{map_geom_err, points_from_py};

fn rows(m: &Matrix3<f64>) -> Vec<Vec<f64>> {
    (0..3).map(|i| (0..3).map(|j| m[(i, j)]).collect()).collect()
}

/// Properties of the convex hull of `vertices` after coplanar facet merging.
///
/// Keys: volume, surface_area, num_vertices, num_facets, mean_curvature, iq,
/// tau, asphericity, center, inertia_tensor (about the center).
#[pyfunction]
fn convex_polyhedron_properties<'py>(
    py: Python<'py>,
    vertices: Vec<(f64, f64, f64)>,
) -> PyResult<Bound<'py, PyDict>> {
    let convex = ConvexPolyhedron::new(&points_from_py(vertices)).map_err(map_geom_err)?;
    let p = convex.polyhedron();
    let inertia = p.inertia_tensor().map_err(map_geom_err)?;
    let c = p.center();

    let out = PyDict::new_bound(py);
    out.set_item("volume", p.volume())?;
    out.set_item("surface_area", p.surface_area())?;
    out.set_item("num_vertices", p.num_vertices())?;
    out.set_item("num_facets", p.num_facets())?;
    out.set_item("mean_curvature", p.mean_curvature())?;
    out.set_item("iq", p.iq())?;
    out.set_item("tau", p.tau())?;
    out.set_item("asphericity", p.asphericity())?;
    out.set_item("center", (c.x, c.y, c.z))?;
    out.set_item("inertia_tensor", rows(&inertia))?;
    Ok(out)
}

/// Volume enclosed by a closed mesh; face winding may be arbitrary.
#[pyfunction]
fn mesh_volume(vertices: Vec<(f64, f64, f64)>, faces: Vec<Vec<usize>>) -> PyResult<f64> {
    let poly = Polyhedron::new(points_from_py(vertices), faces).map_err(map_geom_err)?;
    Ok(poly.volume())
}

#[pymodule]
fn polyshape_native(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__version__", polyshape::VERSION)?;
    m.add_function(wrap_pyfunction!(convex_polyhedron_properties, m)?)?;
    m.add_function(wrap_pyfunction!(mesh_volume, m)?)?;
    Ok(())
}
