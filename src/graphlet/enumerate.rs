//! Enumeration of the graphlets rooted at a vertex.
//!
//! Every connected vertex set of at most 5 vertices containing the root is visited exactly once:
//! a set is grown one vertex at a time, each new vertex taken from an extension list, and a vertex
//! enters the extension list only through the first set member it is adjacent to (exclusive neighbourhood).
//! Once a vertex has been tried from an extension list it is never proposed again in that branch,
//! so no set is reached twice and no deduplication is needed.
//!
//! Each set is classified from its pairwise adjacencies (at most 10 tests) and its labels are
//! canonicalized before being counted.

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

use super::counts::*;
use super::key::*;
use super::orbit::*;
use crate::graph::SimpleGraph;

/// Enable flags of graphlet sizes 1 to 5.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphletSizes {
    enabled: [bool; MAX_GRAPHLET_SIZE + 1],
}

impl GraphletSizes {
    /// enables the given sizes, each in 1..=5
    pub fn new(sizes: &[usize]) -> anyhow::Result<Self> {
        let mut enabled = [false; MAX_GRAPHLET_SIZE + 1];
        for &s in sizes {
            if s == 0 || s > MAX_GRAPHLET_SIZE {
                log::error!("graphlet size must be in 1..5, got {}", s);
                return Err(anyhow!("graphlet size must be in 1..5, got {}", s));
            }
            enabled[s] = true;
        }
        Ok(GraphletSizes { enabled })
    }

    /// all sizes from 1 to 5
    pub fn all() -> Self {
        GraphletSizes { enabled: [false, true, true, true, true, true] }
    }

    pub fn is_enabled(&self, size: usize) -> bool {
        size <= MAX_GRAPHLET_SIZE && self.enabled[size]
    }

    pub fn is_orbit_enabled(&self, orbit: OrbitId) -> bool {
        orbit < NB_ORBITS && self.enabled[graphlet_size(orbit)]
    }

    /// largest enabled size, 0 if none
    pub fn max_size(&self) -> usize {
        (1..=MAX_GRAPHLET_SIZE).rev().find(|s| self.enabled[*s]).unwrap_or(0)
    }

    /// enabled orbits in increasing order
    pub fn enabled_orbits(&self) -> impl Iterator<Item = OrbitId> + '_ {
        (0..NB_ORBITS).filter(move |o| self.is_orbit_enabled(*o))
    }
} // end of impl GraphletSizes

/// The single vertex graphlet only matches root labels, it is off by default.
impl Default for GraphletSizes {
    fn default() -> Self {
        GraphletSizes { enabled: [false, false, true, true, true, true] }
    }
}

pub struct GraphletEnumerator<'a> {
    graph: &'a SimpleGraph,
    sizes: GraphletSizes,
}

impl<'a> GraphletEnumerator<'a> {
    pub fn new(graph: &'a SimpleGraph, sizes: GraphletSizes) -> Self {
        GraphletEnumerator { graph, sizes }
    }

    /// exact occurrence counts of all graphlets rooted at root
    pub fn enumerate(&self, root: usize) -> anyhow::Result<GraphletCounts> {
        if root >= self.graph.nb_nodes() {
            log::error!("root {} >= graph size {}", root, self.graph.nb_nodes());
            return Err(anyhow!("root {} >= graph size {}", root, self.graph.nb_nodes()));
        }
        let mut counts = GraphletCounts::new(root);
        let max_size = self.sizes.max_size();
        if max_size == 0 {
            return Ok(counts);
        }
        let mut subgraph = Vec::<usize>::with_capacity(MAX_GRAPHLET_SIZE);
        subgraph.push(root);
        let extension = self.graph.get_neighbours(root).to_vec();
        self.extend(&mut subgraph, extension, max_size, &mut counts)?;
        log::trace!("root {} : {} keys", root, counts.nb_keys());
        Ok(counts)
    }

    fn extend(
        &self,
        subgraph: &mut Vec<usize>,
        mut extension: Vec<usize>,
        max_size: usize,
        counts: &mut GraphletCounts,
    ) -> anyhow::Result<()> {
        self.record(subgraph, counts)?;
        if subgraph.len() == max_size {
            return Ok(());
        }
        while let Some(w) = extension.pop() {
            let mut next = extension.clone();
            for &u in self.graph.get_neighbours(w) {
                let covered = subgraph.iter().any(|&s| s == u || self.graph.has_edge(s, u));
                if !covered {
                    next.push(u);
                }
            }
            subgraph.push(w);
            self.extend(subgraph, next, max_size, counts)?;
            subgraph.pop();
        }
        Ok(())
    }

    // classify and count one connected vertex set, subgraph[0] is the root
    fn record(&self, subgraph: &[usize], counts: &mut GraphletCounts) -> anyhow::Result<()> {
        let size = subgraph.len();
        if !self.sizes.is_enabled(size) {
            return Ok(());
        }
        let mut mask = 0u16;
        for i in 0..size {
            for j in i + 1..size {
                if self.graph.has_edge(subgraph[i], subgraph[j]) {
                    mask |= 1 << pair_index(i, j);
                }
            }
        }
        let class = taxonomy()
            .classify(size, mask)
            .ok_or_else(|| anyhow!("unclassified vertex set {:?}, mask {:#b}", subgraph, mask))?;
        let mut labels = [ZERO_LABEL; KEY_FIELDS];
        for i in 0..size {
            labels[class.positions[i] as usize] = self.graph.get_label(subgraph[i]);
        }
        let key = taxonomy().canonical_key(class.orbit, labels[0], &labels[1..size])?;
        counts.get_orbit_mut(class.orbit).increment_match(key)
    }
} // end of impl GraphletEnumerator

/// exact occurrence counts of graphlets rooted at root for enabled sizes
pub fn enumerate(graph: &SimpleGraph, root: usize, sizes: GraphletSizes) -> anyhow::Result<GraphletCounts> {
    GraphletEnumerator::new(graph, sizes).enumerate(root)
}

//========================================================================================

#[cfg(test)]
mod tests {

    use super::*;
    use petgraph::graph::UnGraph;
    use rand::Rng;
    use rand_xoshiro::rand_core::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn template(orbit: OrbitId) -> UnGraph<bool, ()> {
        let spec = taxonomy().get_spec(orbit).unwrap();
        let mut g = UnGraph::<bool, ()>::default();
        let nodes: Vec<_> = (0..spec.get_size()).map(|i| g.add_node(i == 0)).collect();
        for &(a, b) in spec.get_edges() {
            g.add_edge(nodes[a as usize], nodes[b as usize], ());
        }
        g
    }

    // brute force count per orbit of connected vertex sets containing root
    fn oracle(graph: &SimpleGraph, root: usize) -> Vec<f32> {
        let templates: Vec<UnGraph<bool, ()>> = (0..NB_ORBITS).map(template).collect();
        let n = graph.nb_nodes();
        let mut res = vec![0f32; NB_ORBITS];
        for bits in 0u32..(1 << n) {
            if bits & (1 << root) == 0 || bits.count_ones() as usize > MAX_GRAPHLET_SIZE {
                continue;
            }
            let mut vertices = vec![root];
            vertices.extend((0..n).filter(|&v| v != root && bits & (1 << v) != 0));
            let mut g = UnGraph::<bool, ()>::default();
            let nodes: Vec<_> = vertices.iter().map(|v| g.add_node(*v == root)).collect();
            for i in 0..vertices.len() {
                for j in i + 1..vertices.len() {
                    if graph.has_edge(vertices[i], vertices[j]) {
                        g.add_edge(nodes[i], nodes[j], ());
                    }
                }
            }
            if petgraph::algo::connected_components(&g) != 1 {
                continue;
            }
            let size = vertices.len();
            let orbit = orbit_range(size)
                .find(|o| petgraph::algo::is_isomorphic_matching(&g, &templates[*o], |a, b| a == b, |_, _| true))
                .unwrap();
            res[orbit] += 1.;
        }
        res
    }

    fn random_graph(n: usize, proba: f64, seed: u64) -> SimpleGraph {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let mut edges = Vec::new();
        for i in 0..n {
            for j in i + 1..n {
                if rng.gen::<f64>() < proba {
                    edges.push((i, j));
                }
            }
        }
        let labels: Vec<u8> = (0..n).map(|i| b"ABC"[i % 3]).collect();
        SimpleGraph::new(labels, &edges).unwrap()
    }

    #[test]
    fn path_aabb() {
        log_init_test();
        let g = SimpleGraph::new(b"AABB".to_vec(), &[(0, 1), (1, 2), (2, 3)]).unwrap();
        let counts = enumerate(&g, 0, GraphletSizes::default()).unwrap();
        assert!(counts.get_orbit(0).is_empty());
        let o1 = counts.get_orbit(1);
        assert_eq!(o1.len(), 1);
        assert_eq!(o1.retrieve_exact_matches(&Key::encode(b'A', b"A")), 1.);
        let o2 = counts.get_orbit(2);
        assert_eq!(o2.retrieve_exact_matches(&Key::encode(b'A', b"AB")), 1.);
        assert_eq!(o2.len(), 1);
        assert_eq!(counts.get_orbit(5).retrieve_exact_matches(&Key::encode(b'A', b"ABB")), 1.);
        assert_eq!(counts.nb_keys(), 3);
        // with single vertex graphlets
        let counts = enumerate(&g, 0, GraphletSizes::all()).unwrap();
        assert_eq!(counts.get_orbit(0).retrieve_exact_matches(&Key::encode(b'A', b"")), 1.);
    }

    #[test]
    fn isolated_root() {
        log_init_test();
        let g = SimpleGraph::new(b"ABC".to_vec(), &[(1, 2)]).unwrap();
        let counts = enumerate(&g, 0, GraphletSizes::default()).unwrap();
        assert_eq!(counts.nb_keys(), 0);
        assert!(enumerate(&g, 3, GraphletSizes::default()).is_err());
    }

    #[test]
    fn complete_graph_counts() {
        log_init_test();
        let n = 6;
        let edges: Vec<(usize, usize)> = (0..n).flat_map(|i| (i + 1..n).map(move |j| (i, j))).collect();
        let g = SimpleGraph::new(b"AAAAAA".to_vec(), &edges).unwrap();
        let counts = enumerate(&g, 2, GraphletSizes::all()).unwrap();
        assert_eq!(counts.get_orbit(1).total_exact_matches(), 5.);
        assert_eq!(counts.get_orbit(4).total_exact_matches(), 10.);
        assert_eq!(counts.get_orbit(15).total_exact_matches(), 10.);
        assert_eq!(counts.get_orbit(26).total_exact_matches(), 5.);
        assert_eq!(counts.nb_keys(), 5);
    }

    #[test]
    fn count_conservation_against_brute_force() {
        log_init_test();
        for (seed, proba) in [(11u64, 0.3f64), (12, 0.5), (13, 0.7)] {
            let g = random_graph(8, proba, seed);
            for root in 0..g.nb_nodes() {
                let counts = enumerate(&g, root, GraphletSizes::all()).unwrap();
                let expected = oracle(&g, root);
                for orbit in 0..NB_ORBITS {
                    assert_eq!(
                        counts.get_orbit(orbit).total_exact_matches(),
                        expected[orbit],
                        "seed {} root {} orbit {}",
                        seed,
                        root,
                        orbit
                    );
                }
            }
        }
    }

    #[test]
    fn disabled_sizes_are_skipped() {
        log_init_test();
        let g = random_graph(8, 0.5, 5);
        let all = enumerate(&g, 0, GraphletSizes::all()).unwrap();
        let sizes = GraphletSizes::new(&[2, 3, 5]).unwrap();
        let some = enumerate(&g, 0, sizes).unwrap();
        for orbit in 0..NB_ORBITS {
            if graphlet_size(orbit) == 4 || orbit == 0 {
                assert!(some.get_orbit(orbit).is_empty());
            } else {
                assert_eq!(some.get_orbit(orbit).total_exact_matches(), all.get_orbit(orbit).total_exact_matches());
            }
        }
        assert!(GraphletSizes::new(&[6]).is_err());
        assert_eq!(GraphletSizes::new(&[2, 3]).unwrap().max_size(), 3);
        assert_eq!(GraphletSizes::default().enabled_orbits().count(), 73);
    }
} // end of mod tests
