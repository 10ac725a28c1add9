//! Lazy ear clipping.
//!
//! The iterator owns the projected 2D ring and a shrinking index list, so it
//! can be cloned to replay the remaining triangles. Triangles come out with
//! the polygon's own winding.

use nalgebra::Vector2;

/// Iterator over `[usize; 3]` vertex-index triangles.
#[derive(Clone, Debug)]
pub struct Triangulation {
    ring: Vec<Vector2<f64>>,
    remaining: Vec<usize>,
    orientation: f64,
}

impl Triangulation {
    pub(super) fn new(ring: Vec<Vector2<f64>>, orientation: f64) -> Self {
        let remaining = (0..ring.len()).collect();
        let orientation = if orientation < 0.0 { -1.0 } else { 1.0 };
        Self {
            ring,
            remaining,
            orientation,
        }
    }

    fn is_ear(&self, prev: usize, cur: usize, next: usize) -> bool {
        let (a, b, c) = (self.ring[prev], self.ring[cur], self.ring[next]);
        if (b - a).perp(&(c - b)) * self.orientation <= 0.0 {
            return false;
        }
        self.remaining
            .iter()
            .filter(|&&k| k != prev && k != cur && k != next)
            .all(|&k| !covers(&self.ring[k], &a, &b, &c, self.orientation))
    }
}

/// Inside or on the boundary of triangle `abc`.
fn covers(
    p: &Vector2<f64>,
    a: &Vector2<f64>,
    b: &Vector2<f64>,
    c: &Vector2<f64>,
    orientation: f64,
) -> bool {
    let d1 = (b - a).perp(&(p - a)) * orientation;
    let d2 = (c - b).perp(&(p - b)) * orientation;
    let d3 = (a - c).perp(&(p - c)) * orientation;
    d1 >= 0.0 && d2 >= 0.0 && d3 >= 0.0
}

impl Iterator for Triangulation {
    type Item = [usize; 3];

    fn next(&mut self) -> Option<[usize; 3]> {
        let m = self.remaining.len();
        if m < 3 {
            return None;
        }
        if m == 3 {
            let tri = [self.remaining[0], self.remaining[1], self.remaining[2]];
            self.remaining.clear();
            return Some(tri);
        }
        for k in 0..m {
            let prev = self.remaining[(k + m - 1) % m];
            let cur = self.remaining[k];
            let next = self.remaining[(k + 1) % m];
            if self.is_ear(prev, cur, next) {
                self.remaining.remove(k);
                return Some([prev, cur, next]);
            }
        }
        // No clean ear (nearly degenerate ring): clip the first corner anyway.
        let tri = [self.remaining[0], self.remaining[1], self.remaining[2]];
        self.remaining.remove(1);
        Some(tri)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining.len().saturating_sub(2);
        (n, Some(n))
    }
}

impl ExactSizeIterator for Triangulation {}
