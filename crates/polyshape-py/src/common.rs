use nalgebra::Vector3;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use polyshape::api::GeomError;

pub fn points_from_py(vertices: Vec<(f64, f64, f64)>) -> Vec<Vector3<f64>> {
    vertices
        .into_iter()
        .map(|(x, y, z)| Vector3::new(x, y, z))
        .collect()
}

pub fn map_geom_err(err: GeomError) -> PyErr {
    PyValueError::new_err(err.to_string())
}
