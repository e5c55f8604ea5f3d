//! A labeled undirected simple graph with sorted adjacency lists.
//!
//! The graph is immutable once built. Adjacency is symmetric, without self loops nor parallel edges,
//! and each vertex carries a one character label.

use anyhow::anyhow;
use std::collections::VecDeque;

use crate::graphlet::key::{is_encodable, Label};

/// interface to petgraph.
pub mod pgraph;

#[derive(Clone, Debug)]
pub struct SimpleGraph {
    labels: Vec<Label>,
    /// sorted neighbours of each vertex
    adjacency: Vec<Vec<usize>>,
}

impl SimpleGraph {
    /// Builds from labels and an adjacency list that may be asymmetric or contain duplicates and self loops.
    /// The adjacency is symmetrised and cleaned.
    pub fn from_adjacency(labels: Vec<Label>, adjacency: Vec<Vec<usize>>) -> anyhow::Result<Self> {
        let nb_nodes = labels.len();
        if adjacency.len() > nb_nodes {
            return Err(anyhow!("adjacency has {} rows for {} labels", adjacency.len(), nb_nodes));
        }
        check_labels(&labels)?;
        let mut cleaned: Vec<Vec<usize>> = vec![Vec::new(); nb_nodes];
        let mut nb_loops = 0;
        for (i, neighbours) in adjacency.iter().enumerate() {
            for &j in neighbours {
                if j >= nb_nodes {
                    log::error!("node index {} >= graph size {}", j, nb_nodes);
                    return Err(anyhow!("node index {} >= graph size {}", j, nb_nodes));
                }
                if i == j {
                    nb_loops += 1;
                    continue;
                }
                cleaned[i].push(j);
                cleaned[j].push(i);
            }
        }
        if nb_loops > 0 {
            log::warn!("dropped {} self loops", nb_loops);
        }
        for n in cleaned.iter_mut() {
            n.sort_unstable();
            n.dedup();
        }
        Ok(SimpleGraph { labels, adjacency: cleaned })
    }

    /// builds from labels and a list of undirected edges
    pub fn new(labels: Vec<Label>, edges: &[(usize, usize)]) -> anyhow::Result<Self> {
        let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); labels.len()];
        for &(i, j) in edges {
            if i >= labels.len() {
                return Err(anyhow!("node index {} >= graph size {}", i, labels.len()));
            }
            adjacency[i].push(j);
        }
        SimpleGraph::from_adjacency(labels, adjacency)
    }

    pub fn nb_nodes(&self) -> usize {
        self.labels.len()
    }

    pub fn nb_edges(&self) -> usize {
        self.adjacency.iter().map(|n| n.len()).sum::<usize>() / 2
    }

    pub fn get_label(&self, node: usize) -> Label {
        self.labels[node]
    }

    pub fn get_labels(&self) -> &[Label] {
        &self.labels
    }

    /// sorted neighbours of node
    pub fn get_neighbours(&self, node: usize) -> &[usize] {
        &self.adjacency[node]
    }

    pub fn get_degree(&self, node: usize) -> usize {
        self.adjacency[node].len()
    }

    #[inline]
    pub fn has_edge(&self, i: usize, j: usize) -> bool {
        self.adjacency[i].binary_search(&j).is_ok()
    }

    /// sorted distinct labels of the graph
    pub fn distinct_labels(&self) -> Vec<Label> {
        let mut l = self.labels.clone();
        l.sort_unstable();
        l.dedup();
        l
    }

    /// BFS distance of each vertex to root, usize::MAX for unreachable vertices
    pub fn breadth_first_sort(&self, root: usize) -> Vec<usize> {
        self.bounded_breadth_first_sort(root, usize::MAX)
    }

    /// BFS distances, exploration stops at distance bound
    pub fn bounded_breadth_first_sort(&self, root: usize, bound: usize) -> Vec<usize> {
        let mut dist = vec![usize::MAX; self.nb_nodes()];
        dist[root] = 0;
        let mut queue = VecDeque::<usize>::new();
        queue.push_back(root);
        while let Some(i) = queue.pop_front() {
            if dist[i] >= bound {
                continue;
            }
            for &k in &self.adjacency[i] {
                if dist[k] == usize::MAX {
                    dist[k] = dist[i] + 1;
                    queue.push_back(k);
                }
            }
        }
        dist
    }
} // end of impl SimpleGraph

fn check_labels(labels: &[Label]) -> anyhow::Result<()> {
    if let Some((i, l)) = labels.iter().enumerate().find(|(_, l)| !is_encodable(**l)) {
        log::error!("label {:?} of node {} cannot be encoded", *l as char, i);
        return Err(anyhow!("label {:?} of node {} cannot be encoded", *l as char, i));
    }
    Ok(())
}

//========================================================================================

// end of mod tests
