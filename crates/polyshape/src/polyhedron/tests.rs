use super::random::{RandomConvexGenerator, RandomConvexParams};
use super::*;
use nalgebra::{vector, SymmetricEigen};
use proptest::prelude::*;

fn cube_points() -> Vec<Vector3<f64>> {
    let mut v = Vec::new();
    for &x in &[-1.0, 1.0] {
        for &y in &[-1.0, 1.0] {
            for &z in &[-1.0, 1.0] {
                v.push(vector![x, y, z]);
            }
        }
    }
    v
}

fn octahedron_points() -> Vec<Vector3<f64>> {
    vec![
        vector![1.0, 0.0, 0.0],
        vector![-1.0, 0.0, 0.0],
        vector![0.0, 1.0, 0.0],
        vector![0.0, -1.0, 0.0],
        vector![0.0, 0.0, 1.0],
        vector![0.0, 0.0, -1.0],
    ]
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn sorted_eigenvalues(m: &Matrix3<f64>) -> Vec<f64> {
    let mut ev: Vec<f64> = SymmetricEigen::new(*m).eigenvalues.iter().copied().collect();
    ev.sort_by(|a, b| a.partial_cmp(b).unwrap());
    ev
}

#[test]
fn cube_reference_values() {
    let hull = convex_hull(&cube_points()).unwrap();
    assert_eq!(hull.simplices.len(), 12);

    let cube = ConvexPolyhedron::new(&cube_points()).unwrap();
    let p = cube.polyhedron();
    assert_eq!(p.num_facets(), 6);
    assert!(close(p.volume(), 8.0));
    assert!(close(p.volume(), hull.volume));
    assert!(close(p.surface_area(), 24.0));
    assert!(p.facet_areas().iter().all(|a| close(*a, 4.0)));
    let expected = Matrix3::identity() * (16.0 / 3.0);
    assert!((p.inertia_tensor().unwrap() - expected).norm() < 1e-9);
    assert!(close(p.iq(), PI / 6.0));
    assert!(close(p.mean_curvature(), 1.5));
    assert!(close(p.tau(), 3.0 * PI / 8.0));
    assert!(close(p.asphericity(), 1.5));
}

#[test]
fn cube_spheres() {
    let cube = ConvexPolyhedron::new(&cube_points()).unwrap();
    let p = cube.polyhedron();
    let bs = p.bounding_sphere();
    assert!(bs.center().norm() < 1e-9);
    assert!(close(bs.radius(), 3f64.sqrt()));
    let cs = p.circumsphere().unwrap();
    assert!(cs.center().norm() < 1e-9);
    assert!(close(cs.radius(), 3f64.sqrt()));
    assert!(close(p.circumsphere_radius(), 3f64.sqrt()));
    let ins = cube.insphere_from_center().unwrap();
    assert!(close(ins.radius(), 1.0));
    let outs = cube.circumsphere_from_center().unwrap();
    assert!(close(outs.radius(), 3f64.sqrt()));
}

#[test]
fn cube_dihedrals() {
    let cube = ConvexPolyhedron::new(&cube_points()).unwrap();
    let p = cube.polyhedron();
    for fi in p.facet_intersections() {
        let (a, b) = fi.facets;
        assert!(close(p.dihedral(a, b).unwrap(), PI / 2.0));
        let (u, v) = fi.edge;
        assert!(close((p.vertices()[u] - p.vertices()[v]).norm(), 2.0));
    }
    assert_eq!(p.facet_intersections().len(), 12);
    // Opposite faces share no edge.
    let opposite = (0..6)
        .find(|&b| (p.planes()[0].normal + p.planes()[b].normal).norm() < 1e-9)
        .unwrap();
    assert_eq!(
        p.dihedral(0, opposite),
        Err(GeomError::NotNeighbors { a: 0, b: opposite })
    );
}

#[test]
fn octahedron_reference_values() {
    let octa = ConvexPolyhedron::new(&octahedron_points()).unwrap();
    let p = octa.polyhedron();
    assert_eq!(p.num_facets(), 8);
    assert!(close(p.volume(), 4.0 / 3.0));
    assert!(close(p.surface_area(), 4.0 * 3f64.sqrt()));
    let expected = Matrix3::identity() * (4.0 / 15.0);
    assert!((p.inertia_tensor().unwrap() - expected).norm() < 1e-9);
    for fi in p.facet_intersections() {
        assert!(close(p.dihedral(fi.facets.0, fi.facets.1).unwrap(), 1.910_633_236_249_018_6));
    }
    assert!((p.mean_curvature() - 0.831_189_635_969_358).abs() < 1e-6);
    assert!((p.tau() - 1.253_110_832_172_730_2).abs() < 1e-6);
    assert!((p.asphericity() - 1.439_662_680_223_607_7).abs() < 1e-6);
    assert!((p.iq() - 0.604_599_788_078_072_7).abs() < 1e-9);
}

#[test]
fn quad_facets_build_directly() {
    let facets = vec![
        vec![0, 1, 3, 2],
        vec![4, 6, 7, 5],
        vec![0, 4, 5, 1],
        vec![2, 3, 7, 6],
        vec![0, 2, 6, 4],
        vec![1, 5, 7, 3],
    ];
    let p = Polyhedron::new(cube_points(), facets).unwrap();
    assert!(close(p.volume(), 8.0));
    assert!(close(p.surface_area(), 24.0));
    for plane in p.planes() {
        assert!(close(plane.offset, 1.0));
    }
}

#[test]
fn triangulated_cube_merges_to_six_faces() {
    let hull = convex_hull(&cube_points()).unwrap();
    let facets = hull.simplices.iter().map(|s| s.to_vec()).collect();
    let mut p = Polyhedron::new(cube_points(), facets).unwrap();
    assert_eq!(p.num_facets(), 12);
    let v = p.volume();
    p.merge_facets(crate::cfg::MERGE_ATOL, crate::cfg::MERGE_RTOL).unwrap();
    assert_eq!(p.num_facets(), 6);
    assert!(close(p.volume(), v));
    let facets = p.facets().to_vec();
    p.merge_facets_default().unwrap();
    assert_eq!(p.facets(), facets.as_slice());
}

#[test]
fn setters_reset_cached_values() {
    let mut p = ConvexPolyhedron::new(&cube_points()).unwrap().into_polyhedron();
    assert!(close(p.volume(), 8.0));
    p.set_volume(1.0).unwrap();
    assert!(close(p.volume(), 1.0));
    assert!(close(p.surface_area(), 6.0));
    p.set_volume(8.0).unwrap();
    assert!(close(p.surface_area(), 24.0));
    assert!(matches!(p.set_volume(0.0), Err(GeomError::InvalidParameter { .. })));
    assert!(p.set_volume(-2.0).is_err());

    p.set_circumsphere_radius(1.0).unwrap();
    assert!(close(p.circumsphere_radius(), 1.0));
    assert!(close(p.volume(), 8.0 / 3f64.powf(1.5)));
    assert!(p.set_circumsphere_radius(0.0).is_err());
}

#[test]
fn translation_updates_planes() {
    let mut p = ConvexPolyhedron::new(&cube_points()).unwrap().into_polyhedron();
    p.set_center(vector![3.0, -1.0, 2.0]);
    assert!((p.center() - vector![3.0, -1.0, 2.0]).norm() < 1e-12);
    for (k, plane) in p.planes().iter().enumerate() {
        for &i in &p.facets()[k] {
            assert!(plane.signed_distance(&p.vertices()[i]).abs() < 1e-12);
        }
    }
    assert!(close(p.volume(), 8.0));
}

#[test]
fn mesh_descriptor_keeps_topology() {
    let p = ConvexPolyhedron::new(&cube_points()).unwrap().into_polyhedron();
    match p.to_spec() {
        ShapeSpec::Mesh { vertices, faces } => {
            assert_eq!(vertices.len(), 8);
            assert_eq!(faces.len(), 6);
            let q = Polyhedron::new(
                vertices.iter().map(|v| Vector3::from(*v)).collect(),
                faces,
            )
            .unwrap();
            assert!(close(q.volume(), 8.0));
        }
        other => panic!("unexpected descriptor {other:?}"),
    }
}

#[test]
fn convex_containment_and_spheropolyhedron() {
    let cube = ConvexPolyhedron::new(&cube_points()).unwrap();
    assert!(cube.is_inside(&vector![0.0, 0.0, 0.0]));
    assert!(cube.is_inside(&vector![1.0, 0.3, -0.2]));
    assert!(!cube.is_inside(&vector![1.01, 0.0, 0.0]));
    assert!(cube.is_inside_eps(&vector![1.01, 0.0, 0.0], 0.02));

    let r = 0.5;
    let sp = ConvexSpheropolyhedron::new(cube, r).unwrap();
    let v = 8.0 + 24.0 * r + 6.0 * PI * r * r + 4.0 / 3.0 * PI * r.powi(3);
    assert!(close(sp.volume(), v));
    let s = 24.0 + 12.0 * PI * r + 4.0 * PI * r * r;
    assert!(close(sp.surface_area(), s));
    assert!(sp.is_inside(&vector![1.4, 0.0, 0.0]));
    assert!(sp.is_inside(&vector![1.3, 1.3, 0.0]));
    assert!(!sp.is_inside(&vector![1.4, 1.4, 0.0]));
    assert!(!sp.is_inside(&vector![1.3, 1.3, 1.3]));
    assert!(ConvexSpheropolyhedron::new(sp.core().clone(), -1.0).is_err());
}

#[test]
fn degenerate_clouds_fail() {
    let flat = vec![
        vector![0.0, 0.0, 0.0],
        vector![1.0, 0.0, 0.0],
        vector![0.0, 1.0, 0.0],
        vector![1.0, 1.0, 0.0],
    ];
    assert!(matches!(
        ConvexPolyhedron::new(&flat),
        Err(GeomError::DegenerateInput { .. })
    ));
}

#[test]
fn hull_drops_interior_points_and_keeps_order() {
    let mut pts = vec![vector![0.1, 0.1, 0.1]];
    pts.extend(octahedron_points());
    let octa = ConvexPolyhedron::new(&pts).unwrap();
    assert_eq!(octa.polyhedron().vertices(), &octahedron_points()[..]);
}

fn random_sample(points: usize, seed: u64) -> ConvexPolyhedron {
    let params = RandomConvexParams {
        points,
        ..RandomConvexParams::default()
    };
    RandomConvexGenerator::generate_single(&params, seed).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// The merged facet set is never larger than the raw hull triangulation.
    #[test]
    fn merged_facets_at_most_simplices(points in 4usize..40, seed in any::<u64>()) {
        let params = RandomConvexParams { points, ..RandomConvexParams::default() };
        let shape = RandomConvexGenerator::generate_single(&params, seed).unwrap();
        let hull = convex_hull(shape.polyhedron().vertices()).unwrap();
        prop_assert!(shape.polyhedron().num_facets() <= hull.simplices.len());
        prop_assert!((shape.polyhedron().volume() - hull.volume).abs() < 1e-9);
    }

    #[test]
    fn remerge_is_idempotent(points in 4usize..40, seed in any::<u64>()) {
        let mut p = random_sample(points, seed).into_polyhedron();
        let before = p.facets().to_vec();
        p.merge_facets_default().unwrap();
        prop_assert_eq!(p.facets(), before.as_slice());
    }

    #[test]
    fn iq_is_a_fraction(points in 4usize..40, seed in any::<u64>()) {
        let p = random_sample(points, seed).into_polyhedron();
        let iq = p.iq();
        prop_assert!(iq > 0.0 && iq <= 1.0, "iq = {}", iq);
    }

    #[test]
    fn translation_preserves_integrals(
        points in 4usize..30,
        seed in any::<u64>(),
        dx in -5.0f64..5.0,
        dy in -5.0f64..5.0,
        dz in -5.0f64..5.0,
    ) {
        let mut p = random_sample(points, seed).into_polyhedron();
        let (v, s) = (p.volume(), p.surface_area());
        let ev = sorted_eigenvalues(&p.inertia_tensor().unwrap());
        let c = p.center();
        p.set_center(c + vector![dx, dy, dz]);
        p.set_center(c);
        prop_assert!((p.volume() - v).abs() < 1e-9);
        prop_assert!((p.surface_area() - s).abs() < 1e-9);
        let ev2 = sorted_eigenvalues(&p.inertia_tensor().unwrap());
        for (a, b) in ev.iter().zip(&ev2) {
            prop_assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn volume_setter_round_trip(points in 4usize..30, seed in any::<u64>(), target in 0.1f64..10.0) {
        let mut p = random_sample(points, seed).into_polyhedron();
        let original = p.volume();
        p.set_volume(target).unwrap();
        prop_assert!((p.volume() - target).abs() < 1e-9 * target.max(1.0));
        p.set_volume(original).unwrap();
        prop_assert!((p.volume() - original).abs() < 1e-9);
    }
}
