//! Smoke tests for the special polyhedra constructors.
//!
//! Facet counts, Euler characteristic and closed-form volumes; detailed
//! property checks live in `tests.rs`.

use super::special;
use super::ConvexPolyhedron;

fn check_euler(p: &ConvexPolyhedron) {
    let poly = p.polyhedron();
    let edges = poly.facet_intersections().len();
    assert_eq!(
        poly.num_vertices() as i64 - edges as i64 + poly.num_facets() as i64,
        2
    );
}

#[test]
fn platonic_facet_counts() {
    let cases = [
        (special::tetrahedron().unwrap(), 4, 4),
        (special::cube().unwrap(), 8, 6),
        (special::octahedron().unwrap(), 6, 8),
        (special::dodecahedron().unwrap(), 20, 12),
        (special::icosahedron().unwrap(), 12, 20),
    ];
    for (p, nv, nf) in &cases {
        assert_eq!(p.polyhedron().num_vertices(), *nv);
        assert_eq!(p.polyhedron().num_facets(), *nf);
        check_euler(p);
        assert!(p.is_inside(&p.polyhedron().center()));
    }
}

#[test]
fn platonic_volumes() {
    let sqrt5 = 5f64.sqrt();
    let phi = (1.0 + sqrt5) / 2.0;
    let dodeca_edge = 2.0 / phi;
    let cases = [
        (special::tetrahedron().unwrap(), 8.0 / 3.0),
        (special::cube().unwrap(), 8.0),
        (special::octahedron().unwrap(), 4.0 / 3.0),
        (
            special::dodecahedron().unwrap(),
            (15.0 + 7.0 * sqrt5) / 4.0 * dodeca_edge.powi(3),
        ),
        (special::icosahedron().unwrap(), 5.0 * (3.0 + sqrt5) / 12.0 * 8.0),
    ];
    for (p, v) in &cases {
        assert!((p.polyhedron().volume() - v).abs() < 1e-9, "{} vs {v}", p.polyhedron().volume());
    }
}

#[test]
fn prism_counts_and_volume() {
    for n in [3, 4, 6, 17] {
        let p = special::prism(n).unwrap();
        assert_eq!(p.polyhedron().num_facets(), n + 2);
        assert_eq!(p.polyhedron().num_vertices(), 2 * n);
        check_euler(&p);
        let expected = n as f64 * (2.0 * std::f64::consts::PI / n as f64).sin();
        assert!((p.polyhedron().volume() - expected).abs() < 1e-9);
    }
    assert!(special::prism(2).is_err());
}
