//! Conversion between [SimpleGraph](super::SimpleGraph) and petgraph undirected graphs.
//!
//! Node weights are the vertex labels, edges carry no data on our side.

use petgraph::graph::{IndexType, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

use super::SimpleGraph;
use crate::graphlet::key::Label;

impl SimpleGraph {
    /// petgraph view with labels as node weights. Node i of petgraph is vertex i.
    pub fn to_petgraph(&self) -> UnGraph<Label, ()> {
        let mut g = UnGraph::<Label, ()>::with_capacity(self.nb_nodes(), self.nb_edges());
        for &l in self.get_labels() {
            g.add_node(l);
        }
        for i in 0..self.nb_nodes() {
            for &j in self.get_neighbours(i) {
                if i < j {
                    g.add_edge(NodeIndex::new(i), NodeIndex::new(j), ());
                }
            }
        }
        g
    }

    /// Builds from a petgraph undirected graph, node weights being labels. Edge data are ignored.
    pub fn from_petgraph<E, Ix>(g: &UnGraph<Label, E, Ix>) -> anyhow::Result<SimpleGraph>
    where
        Ix: IndexType,
    {
        let labels: Vec<Label> = g.node_indices().map(|n| g[n]).collect();
        let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); labels.len()];
        for e in g.edge_references() {
            adjacency[e.source().index()].push(e.target().index());
        }
        log::debug!("from_petgraph nb nodes {}, nb edges {}", labels.len(), g.edge_count());
        SimpleGraph::from_adjacency(labels, adjacency)
    }
} // end of impl SimpleGraph

#[cfg(test)]
mod tests {

    use super::*;

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn petgraph_both_ways() {
        log_init_test();
        let g = SimpleGraph::new(b"ABCA".to_vec(), &[(0, 1), (1, 2), (2, 0), (2, 3)]).unwrap();
        let pg = g.to_petgraph();
        assert_eq!(pg.node_count(), 4);
        assert_eq!(pg.edge_count(), 4);
        assert_eq!(pg[NodeIndex::new(3)], b'A');
        let back = SimpleGraph::from_petgraph(&pg).unwrap();
        assert_eq!(back.get_labels(), g.get_labels());
        for i in 0..4 {
            assert_eq!(back.get_neighbours(i), g.get_neighbours(i));
        }
    }
} // end of mod tests
