//! Facet topology: validation, winding, adjacency and outward orientation.
//!
//! Purpose
//! - Turn an untrusted `(vertices, facets)` pair into a `FacetTopology` whose
//!   facets all wind counterclockwise seen from outside, with outward unit
//!   plane equations and a symmetric neighbor relation.
//!
//! Why this design
//! - The topology is a plain value; `canonicalize` is a pure function that
//!   returns a new one. Adjacency is stored as facet indices, never pointers.
//! - Orientation propagates with an explicit-stack DFS so deep facet graphs
//!   cannot overflow the call stack.

use std::collections::BTreeMap;

use nalgebra::Vector3;
use tracing::{debug, warn};

use crate::cfg::GeomCfg;
use crate::error::GeomError;
use crate::polygon::Polygon;
use crate::util::{mean, newell_normal};

/// Supporting plane `normal · x = offset`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    pub normal: Vector3<f64>,
    pub offset: f64,
}

impl Plane {
    /// Positive outside the facet, negative inside.
    #[inline]
    pub fn signed_distance(&self, p: &Vector3<f64>) -> f64 {
        self.normal.dot(p) - self.offset
    }

    /// `[nx, ny, nz, offset]`, the form compared when merging.
    #[inline]
    pub fn as_array(&self) -> [f64; 4] {
        [self.normal.x, self.normal.y, self.normal.z, self.offset]
    }

    fn through(normal: Vector3<f64>, points: &[Vector3<f64>]) -> Self {
        Self {
            normal,
            offset: normal.dot(&mean(points)),
        }
    }
}

/// Canonical facet topology of a polyhedron.
#[derive(Clone, Debug, PartialEq)]
pub struct FacetTopology {
    pub vertices: Vec<Vector3<f64>>,
    pub facets: Vec<Vec<usize>>,
    pub planes: Vec<Plane>,
    /// Sorted neighbor facet ids per facet.
    pub neighbors: Vec<Vec<usize>>,
}

impl FacetTopology {
    #[inline]
    pub fn num_facets(&self) -> usize {
        self.facets.len()
    }

    /// Positions of a facet's vertices in winding order.
    pub fn facet_points(&self, facet: usize) -> Vec<Vector3<f64>> {
        self.facets[facet].iter().map(|&i| self.vertices[i]).collect()
    }

    /// The shared edge of two neighboring facets, as it runs in `a`.
    pub fn shared_edge(&self, a: usize, b: usize) -> Option<(usize, usize)> {
        directed_edges(&self.facets[a]).find(|&(u, v)| contains_edge(&self.facets[b], u, v))
    }

    /// Recompute plane equations from the current vertex positions, keeping
    /// the facet windings.
    pub(crate) fn refresh_planes(&mut self) {
        self.planes = self
            .facets
            .iter()
            .map(|f| facet_plane(&self.vertices, f))
            .collect();
    }

    /// `Σ offset_i · area_i / 3`, signed by the facet windings.
    pub(crate) fn signed_volume(&self) -> f64 {
        self.facets
            .iter()
            .map(|f| {
                let pts: Vec<Vector3<f64>> = f.iter().map(|&i| self.vertices[i]).collect();
                newell_normal(&pts).dot(&pts[0]) / 6.0
            })
            .sum()
    }
}

/// Canonicalize raw facets against `vertices`.
///
/// Steps: validate indices, reorder each facet angularly, build adjacency,
/// propagate a consistent winding from facet 0, then flip everything if the
/// enclosed volume came out negative.
pub fn canonicalize(
    vertices: Vec<Vector3<f64>>,
    facets: Vec<Vec<usize>>,
    cfg: &GeomCfg,
) -> Result<FacetTopology, GeomError> {
    if facets.is_empty() {
        return Err(GeomError::degenerate("a polyhedron needs at least one facet"));
    }
    validate(&vertices, &facets)?;

    let mut facets = facets
        .iter()
        .enumerate()
        .map(|(k, f)| reorder_facet(&vertices, f, cfg).map_err(|e| with_facet(k, e)))
        .collect::<Result<Vec<_>, _>>()?;

    let neighbors = find_neighbors(&facets)?;
    OrientationRunner::new(&mut facets, &neighbors).run()?;

    let mut topo = FacetTopology {
        vertices,
        facets,
        planes: Vec::new(),
        neighbors,
    };
    let volume = topo.signed_volume();
    if volume < 0.0 {
        for f in topo.facets.iter_mut() {
            reverse_keep_first(f);
        }
    }
    topo.refresh_planes();
    debug!(
        facets = topo.facets.len(),
        vertices = topo.vertices.len(),
        volume = volume.abs(),
        flipped = volume < 0.0,
        "canonicalized facet topology"
    );
    Ok(topo)
}

fn validate(vertices: &[Vector3<f64>], facets: &[Vec<usize>]) -> Result<(), GeomError> {
    for (k, f) in facets.iter().enumerate() {
        if f.len() < 3 {
            return Err(GeomError::degenerate(format!(
                "facet {k} has {} vertices, need at least 3",
                f.len()
            )));
        }
        if let Some(&bad) = f.iter().find(|&&i| i >= vertices.len()) {
            return Err(GeomError::degenerate(format!(
                "facet {k} references vertex {bad}, but there are only {}",
                vertices.len()
            )));
        }
        let mut sorted = f.clone();
        sorted.sort_unstable();
        if sorted.windows(2).any(|w| w[0] == w[1]) {
            return Err(GeomError::degenerate(format!("facet {k} repeats a vertex")));
        }
    }
    Ok(())
}

fn with_facet(k: usize, err: GeomError) -> GeomError {
    match err {
        GeomError::DegenerateInput { reason } => {
            GeomError::degenerate(format!("facet {k}: {reason}"))
        }
        other => other,
    }
}

/// Angular reorder on the facet's vertex subset, mapped back to global ids.
fn reorder_facet(
    vertices: &[Vector3<f64>],
    facet: &[usize],
    cfg: &GeomCfg,
) -> Result<Vec<usize>, GeomError> {
    let pts = facet.iter().map(|&i| vertices[i]).collect();
    let poly = Polygon::with_tolerance(pts, None, cfg.planar_tol)?;
    Ok(poly.angular_order(false).into_iter().map(|j| facet[j]).collect())
}

fn directed_edges(facet: &[usize]) -> impl Iterator<Item = (usize, usize)> + '_ {
    let n = facet.len();
    (0..n).map(move |i| (facet[i], facet[(i + 1) % n]))
}

fn contains_edge(facet: &[usize], u: usize, v: usize) -> bool {
    directed_edges(facet).any(|(a, b)| (a == u && b == v) || (a == v && b == u))
}

fn runs_forward(facet: &[usize], u: usize, v: usize) -> bool {
    directed_edges(facet).any(|e| e == (u, v))
}

fn reverse_keep_first(facet: &mut [usize]) {
    facet.reverse();
    facet.rotate_right(1);
}

/// Build the neighbor lists from an undirected edge index.
pub(crate) fn find_neighbors(facets: &[Vec<usize>]) -> Result<Vec<Vec<usize>>, GeomError> {
    let mut edges: BTreeMap<(usize, usize), Vec<usize>> = BTreeMap::new();
    for (k, f) in facets.iter().enumerate() {
        for (a, b) in directed_edges(f) {
            edges.entry((a.min(b), a.max(b))).or_default().push(k);
        }
    }
    let mut neighbors = vec![Vec::new(); facets.len()];
    let mut boundary = 0usize;
    for (&(a, b), owners) in &edges {
        match owners.as_slice() {
            [_] => boundary += 1,
            [f, g] => {
                neighbors[*f].push(*g);
                neighbors[*g].push(*f);
            }
            _ => {
                return Err(GeomError::disconnected(format!(
                    "edge ({a}, {b}) is shared by {} facets",
                    owners.len()
                )))
            }
        }
    }
    if boundary > 0 {
        warn!(boundary_edges = boundary, "facet set is not closed");
    }
    for list in neighbors.iter_mut() {
        list.sort_unstable();
        list.dedup();
    }
    Ok(neighbors)
}

/// Outward unit plane from the Newell normal of the facet loop.
fn facet_plane(vertices: &[Vector3<f64>], facet: &[usize]) -> Plane {
    let pts: Vec<Vector3<f64>> = facet.iter().map(|&i| vertices[i]).collect();
    let normal = newell_normal(&pts)
        .try_normalize(0.0)
        .unwrap_or_else(Vector3::zeros);
    Plane::through(normal, &pts)
}

/// Explicit-stack DFS that makes every shared edge run in opposite
/// directions in its two facets.
struct OrientationRunner<'a> {
    facets: &'a mut [Vec<usize>],
    neighbors: &'a [Vec<usize>],
    visited: Vec<bool>,
    stack: Vec<usize>,
}

impl<'a> OrientationRunner<'a> {
    fn new(facets: &'a mut [Vec<usize>], neighbors: &'a [Vec<usize>]) -> Self {
        let n = facets.len();
        Self {
            facets,
            neighbors,
            visited: vec![false; n],
            stack: Vec::new(),
        }
    }

    fn run(mut self) -> Result<(), GeomError> {
        let neighbors = self.neighbors;
        self.visited[0] = true;
        self.stack.push(0);
        let mut flips = 0usize;
        while let Some(f) = self.stack.pop() {
            for &g in &neighbors[f] {
                if self.visited[g] {
                    continue;
                }
                let edge = directed_edges(&self.facets[f])
                    .find(|&(u, v)| contains_edge(&self.facets[g], u, v));
                if let Some((u, v)) = edge {
                    if runs_forward(&self.facets[g], u, v) {
                        reverse_keep_first(&mut self.facets[g]);
                        flips += 1;
                    }
                }
                self.visited[g] = true;
                self.stack.push(g);
            }
        }
        if let Some(lost) = self.visited.iter().position(|v| !v) {
            let unreached = self.visited.iter().filter(|v| !**v).count();
            return Err(GeomError::disconnected(format!(
                "{unreached} facets (first: {lost}) are not reachable from facet 0"
            )));
        }
        debug!(flips, "propagated facet orientation");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    fn cube_vertices() -> Vec<Vector3<f64>> {
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

    /// Cube faces with deliberately scrambled windings.
    fn cube_facets() -> Vec<Vec<usize>> {
        vec![
            vec![0, 1, 3, 2],
            vec![4, 6, 7, 5],
            vec![0, 4, 5, 1],
            vec![2, 7, 6, 3],
            vec![0, 2, 6, 4],
            vec![1, 5, 7, 3],
        ]
    }

    #[test]
    fn cube_planes_point_outward() {
        let topo = canonicalize(cube_vertices(), cube_facets(), &GeomCfg::default()).unwrap();
        for (k, plane) in topo.planes.iter().enumerate() {
            assert!((plane.normal.norm() - 1.0).abs() < 1e-12);
            assert!((plane.offset - 1.0).abs() < 1e-12, "facet {k}");
            assert!(plane.signed_distance(&Vector3::zeros()) < 0.0);
        }
        assert!((topo.signed_volume() - 8.0).abs() < 1e-12);
    }

    #[test]
    fn shared_edges_run_opposite_ways() {
        let topo = canonicalize(cube_vertices(), cube_facets(), &GeomCfg::default()).unwrap();
        for (f, list) in topo.neighbors.iter().enumerate() {
            assert_eq!(list.len(), 4);
            for &g in list {
                assert!(topo.neighbors[g].contains(&f));
                let (u, v) = topo.shared_edge(f, g).unwrap();
                assert!(runs_forward(&topo.facets[g], v, u));
            }
        }
    }

    #[test]
    fn first_vertex_is_preserved() {
        let facets = cube_facets();
        let topo = canonicalize(cube_vertices(), facets.clone(), &GeomCfg::default()).unwrap();
        for (raw, canon) in facets.iter().zip(&topo.facets) {
            assert_eq!(raw[0], canon[0]);
        }
    }

    #[test]
    fn rejects_malformed_facets() {
        let cfg = GeomCfg::default();
        let short = canonicalize(cube_vertices(), vec![vec![0, 1]], &cfg);
        assert!(matches!(short, Err(GeomError::DegenerateInput { .. })));
        let out_of_range = canonicalize(cube_vertices(), vec![vec![0, 1, 42]], &cfg);
        assert!(matches!(out_of_range, Err(GeomError::DegenerateInput { .. })));
        let repeated = canonicalize(cube_vertices(), vec![vec![0, 1, 1]], &cfg);
        assert!(matches!(repeated, Err(GeomError::DegenerateInput { .. })));
        let skew = canonicalize(cube_vertices(), vec![vec![0, 1, 3, 6]], &cfg);
        assert!(matches!(skew, Err(GeomError::DegenerateInput { .. })));
    }

    #[test]
    fn disconnected_facets_are_rejected() {
        let mut verts = cube_vertices();
        verts.extend(cube_vertices().into_iter().map(|v| v + vector![10.0, 0.0, 0.0]));
        let mut facets = cube_facets();
        facets.extend(cube_facets().into_iter().map(|f| f.into_iter().map(|i| i + 8).collect()));
        let err = canonicalize(verts, facets, &GeomCfg::default());
        assert!(matches!(err, Err(GeomError::DisconnectedTopology { .. })));
    }

    #[test]
    fn non_manifold_edge_is_rejected() {
        let verts = vec![
            vector![0.0, 0.0, 0.0],
            vector![1.0, 0.0, 0.0],
            vector![0.0, 1.0, 0.0],
            vector![0.0, 0.0, 1.0],
            vector![0.0, -1.0, 0.0],
        ];
        let facets = vec![vec![0, 1, 2], vec![0, 1, 3], vec![0, 1, 4]];
        let err = canonicalize(verts, facets, &GeomCfg::default());
        assert!(matches!(err, Err(GeomError::DisconnectedTopology { .. })));
    }
}
