//! 3D convex hull (QuickHull).
//!
//! Algorithm
//! 1. Seed a tetrahedron from axis extremes, the farthest point from their
//!    line and the farthest point from that plane.
//! 2. Assign every other point to one face it lies strictly outside of.
//! 3. Repeatedly take the farthest outside point of some face, remove all
//!    faces it sees, and cone the horizon (directed edges of visible faces
//!    whose twins are not visible) to it. New faces `(a, b, p)` inherit the
//!    horizon edge direction, so outward winding is preserved.
//! 4. Stop when no face has outside points.
//!
//! Points within `HULL_EPS · extent` of a face count as inside, so coplanar
//! input (cube corners, prism rims) yields a triangulated hull without slivers.
//! All indices refer to the caller's input slice.

use std::collections::HashSet;

use nalgebra::Vector3;
use tracing::debug;

use crate::cfg::HULL_EPS;
use crate::error::GeomError;

use super::topology::Plane;

/// Triangulated convex hull of a point cloud.
#[derive(Clone, Debug)]
pub struct Hull {
    /// Outward-wound triangles (indices into the input).
    pub simplices: Vec<[usize; 3]>,
    /// Outward unit planes, one per simplex.
    pub planes: Vec<Plane>,
    /// Sorted input indices that appear in some simplex.
    pub vertices: Vec<usize>,
    pub volume: f64,
}

#[derive(Clone, Debug)]
struct Face {
    v: [usize; 3],
    plane: Plane,
    outside: Vec<usize>,
    alive: bool,
}

impl Face {
    fn new(points: &[Vector3<f64>], v: [usize; 3]) -> Self {
        let [a, b, c] = v.map(|i| points[i]);
        let normal = (b - a)
            .cross(&(c - a))
            .try_normalize(0.0)
            .unwrap_or_else(Vector3::zeros);
        Self {
            v,
            plane: Plane {
                normal,
                offset: normal.dot(&a),
            },
            outside: Vec::new(),
            alive: true,
        }
    }

    #[inline]
    fn distance(&self, p: &Vector3<f64>) -> f64 {
        self.plane.signed_distance(p)
    }

    fn edges(&self) -> [(usize, usize); 3] {
        let [a, b, c] = self.v;
        [(a, b), (b, c), (c, a)]
    }
}

/// Convex hull of at least four non-coplanar points.
pub fn convex_hull(points: &[Vector3<f64>]) -> Result<Hull, GeomError> {
    if points.len() < 4 {
        return Err(GeomError::degenerate(format!(
            "convex hull needs at least 4 points (got {})",
            points.len()
        )));
    }
    if points.iter().any(|p| !p.iter().all(|x| x.is_finite())) {
        return Err(GeomError::degenerate("convex hull input contains non-finite coordinates"));
    }
    let eps = HULL_EPS * extent(points).max(1.0);
    let seed = initial_simplex(points, eps)?;

    let mut faces = seed_faces(points, seed);
    for i in 0..points.len() {
        if !seed.contains(&i) {
            assign(&mut faces, 0..4, i, points, eps);
        }
    }

    let mut iterations = 0usize;
    while let Some(fi) = faces.iter().position(|f| f.alive && !f.outside.is_empty()) {
        iterations += 1;
        let apex = farthest(&faces[fi], points);
        let p = points[apex];

        let visible: Vec<usize> = (0..faces.len())
            .filter(|&k| faces[k].alive && faces[k].distance(&p) > eps)
            .collect();
        let visible_edges: HashSet<(usize, usize)> =
            visible.iter().flat_map(|&k| faces[k].edges()).collect();
        let horizon: Vec<(usize, usize)> = visible
            .iter()
            .flat_map(|&k| faces[k].edges())
            .filter(|&(a, b)| !visible_edges.contains(&(b, a)))
            .collect();

        let mut orphans = Vec::new();
        for &k in &visible {
            faces[k].alive = false;
            orphans.append(&mut faces[k].outside);
        }

        let first_new = faces.len();
        for (a, b) in horizon {
            faces.push(Face::new(points, [a, b, apex]));
        }
        let end = faces.len();
        for i in orphans {
            if i != apex {
                assign(&mut faces, first_new..end, i, points, eps);
            }
        }
    }

    let simplices: Vec<[usize; 3]> = faces.iter().filter(|f| f.alive).map(|f| f.v).collect();
    let planes: Vec<Plane> = faces.iter().filter(|f| f.alive).map(|f| f.plane).collect();
    let mut vertices: Vec<usize> = simplices.iter().flatten().copied().collect();
    vertices.sort_unstable();
    vertices.dedup();
    let volume = simplices
        .iter()
        .map(|s| {
            let [a, b, c] = s.map(|i| points[i]);
            a.dot(&b.cross(&c)) / 6.0
        })
        .sum();
    debug!(
        points = points.len(),
        simplices = simplices.len(),
        vertices = vertices.len(),
        iterations,
        "convex hull"
    );
    Ok(Hull {
        simplices,
        planes,
        vertices,
        volume,
    })
}

fn extent(points: &[Vector3<f64>]) -> f64 {
    let mut lo = points[0];
    let mut hi = points[0];
    for p in points {
        lo = lo.inf(p);
        hi = hi.sup(p);
    }
    (hi - lo).max()
}

fn initial_simplex(points: &[Vector3<f64>], eps: f64) -> Result<[usize; 4], GeomError> {
    // Widest axis pair.
    let mut best = (0usize, 0usize, -1.0);
    for axis in 0..3 {
        let (mut lo, mut hi) = (0usize, 0usize);
        for (i, p) in points.iter().enumerate() {
            if p[axis] < points[lo][axis] {
                lo = i;
            }
            if p[axis] > points[hi][axis] {
                hi = i;
            }
        }
        let span = points[hi][axis] - points[lo][axis];
        if span > best.2 {
            best = (lo, hi, span);
        }
    }
    let (i0, i1, span) = best;
    if span <= eps {
        return Err(GeomError::degenerate("convex hull input is a single point"));
    }

    let dir = (points[i1] - points[i0]).normalize();
    let line_dist = |p: &Vector3<f64>| {
        let r = p - points[i0];
        (r - dir * r.dot(&dir)).norm()
    };
    let i2 = argmax(points, line_dist);
    if line_dist(&points[i2]) <= eps {
        return Err(GeomError::degenerate("convex hull input is collinear"));
    }

    let n = (points[i1] - points[i0])
        .cross(&(points[i2] - points[i0]))
        .try_normalize(0.0)
        .filter(|n| n.iter().all(|x| x.is_finite()))
        .ok_or_else(|| GeomError::degenerate("convex hull seed triangle is degenerate"))?;
    let plane_dist = |p: &Vector3<f64>| n.dot(&(p - points[i0])).abs();
    let i3 = argmax(points, plane_dist);
    if plane_dist(&points[i3]) <= eps {
        return Err(GeomError::degenerate("convex hull input is coplanar"));
    }
    Ok([i0, i1, i2, i3])
}

fn argmax(points: &[Vector3<f64>], key: impl Fn(&Vector3<f64>) -> f64) -> usize {
    let mut best = (0usize, f64::NEG_INFINITY);
    for (i, p) in points.iter().enumerate() {
        let k = key(p);
        if k > best.1 {
            best = (i, k);
        }
    }
    best.0
}

/// Four outward faces of the seed tetrahedron.
fn seed_faces(points: &[Vector3<f64>], [a, b, c, d]: [usize; 4]) -> Vec<Face> {
    let interior = (points[a] + points[b] + points[c] + points[d]) / 4.0;
    [[a, b, c], [a, d, b], [b, d, c], [c, d, a]]
        .into_iter()
        .map(|[x, y, z]| {
            let face = Face::new(points, [x, y, z]);
            if face.distance(&interior) > 0.0 {
                Face::new(points, [x, z, y])
            } else {
                face
            }
        })
        .collect()
}

/// Put point `i` on the first candidate face it lies outside of, if any.
fn assign(
    faces: &mut [Face],
    candidates: std::ops::Range<usize>,
    i: usize,
    points: &[Vector3<f64>],
    eps: f64,
) {
    for k in candidates {
        if faces[k].alive && faces[k].distance(&points[i]) > eps {
            faces[k].outside.push(i);
            return;
        }
    }
}

fn farthest(face: &Face, points: &[Vector3<f64>]) -> usize {
    let mut best = (face.outside[0], f64::NEG_INFINITY);
    for &i in &face.outside {
        let d = face.distance(&points[i]);
        if d > best.1 {
            best = (i, d);
        }
    }
    best.0
}
