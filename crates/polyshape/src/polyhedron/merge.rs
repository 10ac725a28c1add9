//! Coplanar facet merging.
//!
//! Neighboring facets whose plane 4-vectors `(n, d)` agree (or agree up to
//! sign) within `allclose` tolerances are grouped into connected components;
//! each component becomes one facet over the union of its vertices, and the
//! result is canonicalized again. Merging an already merged topology is a
//! no-op. Near the tolerance boundary the grouping is best-effort: chains of
//! almost-coplanar facets merge transitively.

use tracing::debug;

use crate::cfg::{all_close, GeomCfg};
use crate::error::GeomError;

use super::topology::{canonicalize, FacetTopology, Plane};

/// Merge coplanar neighbors of `topo` with `cfg.merge_atol` / `cfg.merge_rtol`.
pub fn merge(topo: &FacetTopology, cfg: &GeomCfg) -> Result<FacetTopology, GeomError> {
    let graph = merge_graph(topo, cfg);
    let components = ComponentRunner::new(&graph).run();
    if components.len() == topo.num_facets() {
        debug!(facets = topo.num_facets(), "no coplanar facets to merge");
        return Ok(topo.clone());
    }

    let facets: Vec<Vec<usize>> = components
        .iter()
        .map(|members| {
            let mut union: Vec<usize> = members
                .iter()
                .flat_map(|&f| topo.facets[f].iter().copied())
                .collect();
            union.sort_unstable();
            union.dedup();
            // Keep a member's first vertex in front so merged facets stay
            // anchored where the original facet was.
            if let Some(pos) = union.iter().position(|&v| v == topo.facets[members[0]][0]) {
                union.swap(0, pos);
            }
            union
        })
        .collect();

    debug!(
        before = topo.num_facets(),
        after = facets.len(),
        "merged coplanar facets"
    );
    canonicalize(topo.vertices.clone(), facets, cfg)
}

fn coplanar(a: &Plane, b: &Plane, cfg: &GeomCfg) -> bool {
    let pa = a.as_array();
    let pb = b.as_array();
    let neg = pb.map(|x| -x);
    all_close(&pa, &pb, cfg.merge_atol, cfg.merge_rtol)
        || all_close(&pa, &neg, cfg.merge_atol, cfg.merge_rtol)
}

/// Adjacency restricted to coplanar neighbor pairs.
fn merge_graph(topo: &FacetTopology, cfg: &GeomCfg) -> Vec<Vec<usize>> {
    topo.neighbors
        .iter()
        .enumerate()
        .map(|(i, list)| {
            list.iter()
                .copied()
                .filter(|&j| coplanar(&topo.planes[i], &topo.planes[j], cfg))
                .collect()
        })
        .collect()
}

/// Connected components by iterative DFS, in order of their smallest facet.
struct ComponentRunner<'a> {
    graph: &'a [Vec<usize>],
    component: Vec<Option<usize>>,
    stack: Vec<usize>,
}

impl<'a> ComponentRunner<'a> {
    fn new(graph: &'a [Vec<usize>]) -> Self {
        Self {
            graph,
            component: vec![None; graph.len()],
            stack: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<Vec<usize>> {
        let graph = self.graph;
        let mut out: Vec<Vec<usize>> = Vec::new();
        for start in 0..graph.len() {
            if self.component[start].is_some() {
                continue;
            }
            let id = out.len();
            let mut members = vec![start];
            self.component[start] = Some(id);
            self.stack.push(start);
            while let Some(f) = self.stack.pop() {
                for &g in &graph[f] {
                    if self.component[g].is_none() {
                        self.component[g] = Some(id);
                        members.push(g);
                        self.stack.push(g);
                    }
                }
            }
            members.sort_unstable();
            out.push(members);
        }
        out
    }
}
