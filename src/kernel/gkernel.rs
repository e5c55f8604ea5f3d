//! Graphlet kernel between vertices of a labeled graph.
//!
//! For each root the exact graphlet counts are computed, then expanded according to the kernel type:
//! - graphlet : no expansion.
//! - label substitution : per orbit, label neighbourhoods of exactly matched keys are added and
//!   exact counts are spread on neighbours within VLM substitutions.
//! - edge indel : keys within EM edge edits are credited.
//! - edit distance with EM <= 1 : edge edits, then per orbit spreading of exact counts
//!   on neighbours at exactly one substitution.
//! - edit distance with EM = 2 : one edge edit, spreading of exact + edge counts at one substitution,
//!   then keys at exactly two edge edits, then spreading of exact counts at exactly two substitutions.
//!
//! The kernel value of two roots is the sum over orbits of the join of their counts.
//! Roots are processed in parallel and share the label neighbourhood cache.

use anyhow::anyhow;
use cpu_time::ProcessTime;
use rayon::prelude::*;
use std::time::SystemTime;

use super::aggregate::*;
use super::features::*;
use super::matrix::KernelMatrix;
use super::params::*;
use super::randwalk::random_walk_matrix;
use crate::graph::SimpleGraph;
use crate::graphlet::counts::GraphletCounts;
use crate::graphlet::enumerate::GraphletEnumerator;
use crate::graphlet::key::Label;
use crate::mismatch::indel::EdgeIndelExpander;
use crate::mismatch::label::*;
use crate::mismatch::neighborhood::NeighborhoodCache;
use crate::mismatch::similarity::SimilarityTable;
use crate::mismatch::LabelAlphabet;

pub struct GraphKernel<'a> {
    graph: &'a SimpleGraph,
    params: KernelParams,
    alphabet: LabelAlphabet,
    similarity: SimilarityTable,
    cache: NeighborhoodCache,
}

impl<'a> GraphKernel<'a> {
    /// Without a similarity table every pair of labels of the alphabet and of the graph scores 1.
    /// The similarity threshold of params replaces the threshold of the table.
    pub fn new(
        graph: &'a SimpleGraph,
        params: KernelParams,
        alphabet: LabelAlphabet,
        similarity: Option<SimilarityTable>,
    ) -> anyhow::Result<Self> {
        if params.uses_label_mismatches() && alphabet.is_empty() {
            log::error!("label substitutions asked with an empty alphabet");
            return Err(anyhow!("label substitutions asked with an empty alphabet"));
        }
        let mut similarity = match similarity {
            Some(table) => table,
            None => {
                let mut labels: Vec<Label> = alphabet.all_labels();
                labels.extend(graph.distinct_labels());
                labels.sort_unstable();
                labels.dedup();
                log::info!("no similarity table, using uniform similarity over {} labels", labels.len());
                SimilarityTable::uniform(&labels, params.get_similarity_threshold())
            }
        };
        similarity.set_threshold(params.get_similarity_threshold());
        log::debug!("GraphKernel::new params : {:?}", params);
        Ok(GraphKernel { graph, params, alphabet, similarity, cache: NeighborhoodCache::new() })
    }

    pub fn get_params(&self) -> &KernelParams {
        &self.params
    }

    pub fn get_graph(&self) -> &SimpleGraph {
        self.graph
    }

    pub fn get_similarity(&self) -> &SimilarityTable {
        &self.similarity
    }

    pub fn get_alphabet(&self) -> &LabelAlphabet {
        &self.alphabet
    }

    /// number of cached label neighbourhoods
    pub fn get_cache_size(&self) -> usize {
        self.cache.len()
    }

    /// expanded (and possibly normalized) counts of a root
    pub fn root_counts(&self, root: usize) -> anyhow::Result<GraphletCounts> {
        let mut counts = GraphletEnumerator::new(self.graph, self.params.get_graphlet_sizes()).enumerate(root)?;
        self.expand(&mut counts)?;
        if self.params.get_normalize() {
            normalize(&mut counts, &self.params.get_graphlet_sizes());
        }
        Ok(counts)
    }

    // approximate matching according to kernel type
    fn expand(&self, counts: &mut GraphletCounts) -> anyhow::Result<()> {
        let orbits: Vec<usize> = self.params.get_graphlet_sizes().enabled_orbits().collect();
        let labels = LabelMismatchExpander::new(&self.similarity, &self.alphabet, &self.cache);
        let edges = EdgeIndelExpander::default();
        let em = self.params.get_edge_mismatches();
        //
        match self.params.get_kernel_type() {
            KernelType::CumulativeRandomWalk | KernelType::RandomWalk | KernelType::Graphlet => {}
            KernelType::LabelSubstitution => {
                for &orbit in &orbits {
                    let vlm = self.params.vertex_label_mismatches(orbit)?;
                    labels.expand(counts.get_orbit_mut(orbit), vlm, false, MismatchWeight::Exact, vlm, false)?;
                }
            }
            KernelType::EdgeIndel => {
                edges.add_edge_mismatch_counts(counts, em)?;
            }
            KernelType::EditDistance if em <= 1 => {
                edges.add_edge_mismatch_counts(counts, em)?;
                for &orbit in &orbits {
                    let generate = self.params.vertex_label_mismatches(orbit)?.min(1);
                    labels.expand(counts.get_orbit_mut(orbit), generate, false, MismatchWeight::Exact, 1, true)?;
                }
            }
            KernelType::EditDistance => {
                edges.add_1_edge_mismatch_counts(counts)?;
                for &orbit in &orbits {
                    let generate = self.params.vertex_label_mismatches(orbit)?.min(1);
                    labels.expand(counts.get_orbit_mut(orbit), generate, true, MismatchWeight::ExactAndEdges, 1, true)?;
                }
                edges.add_2_edge_mismatch_counts(counts)?;
                for &orbit in &orbits {
                    let generate = if self.params.vertex_label_mismatches(orbit)? >= 2 { 2 } else { 0 };
                    labels.expand(counts.get_orbit_mut(orbit), generate, false, MismatchWeight::Exact, 2, true)?;
                }
            }
        }
        Ok(())
    }

    fn check_roots(&self, roots: &[usize]) -> anyhow::Result<()> {
        if let Some(r) = roots.iter().find(|r| **r >= self.graph.nb_nodes()) {
            log::error!("root {} >= graph size {}", r, self.graph.nb_nodes());
            return Err(anyhow!("root {} >= graph size {}", r, self.graph.nb_nodes()));
        }
        Ok(())
    }

    /// counts of all roots, in the order of roots
    pub fn compute_counts(&self, roots: &[usize]) -> anyhow::Result<Vec<GraphletCounts>> {
        self.check_roots(roots)?;
        log::info!("computing graphlet counts of {} roots, kernel {}", roots.len(), self.params.get_kernel_type());
        let cpu_start = ProcessTime::now();
        let sys_start = SystemTime::now();
        let counts: anyhow::Result<Vec<GraphletCounts>> = if self.params.get_parallel() {
            roots.par_iter().map(|r| self.root_counts(*r)).collect()
        } else {
            roots.iter().map(|r| self.root_counts(*r)).collect()
        };
        log::info!(
            "compute_counts sys time(s) {:.2e} cpu time(s) {:.2e}, cached neighbourhoods : {}",
            sys_start.elapsed().unwrap_or_default().as_secs_f32(),
            cpu_start.elapsed().as_secs_f32(),
            self.cache.len()
        );
        counts
    }

    /// Kernel matrix between roots. The neighbourhood cache is cleared at the end of the run.
    pub fn compute_matrix(&self, roots: &[usize]) -> anyhow::Result<KernelMatrix> {
        self.check_roots(roots)?;
        let kernel_type = self.params.get_kernel_type();
        if kernel_type.is_random_walk() {
            return random_walk_matrix(
                self.graph,
                roots,
                kernel_type == KernelType::CumulativeRandomWalk,
                self.params.get_steps(),
                self.params.get_restart(),
                self.params.get_seed(),
                self.params.get_parallel(),
            );
        }
        let counts = self.compute_counts(roots)?;
        self.cache.clear();
        //
        let cpu_start = ProcessTime::now();
        let sys_start = SystemTime::now();
        let sizes = self.params.get_graphlet_sizes();
        let normalized = self.params.get_normalize();
        let row = |i: usize| -> Vec<f32> { (0..=i).map(|j| kernel_value(&counts[i], &counts[j], &sizes, normalized)).collect() };
        let rows: Vec<Vec<f32>> = if self.params.get_parallel() {
            (0..counts.len()).into_par_iter().map(row).collect()
        } else {
            (0..counts.len()).map(row).collect()
        };
        log::info!(
            "kernel matrix sys time(s) {:.2e} cpu time(s) {:.2e}",
            sys_start.elapsed().unwrap_or_default().as_secs_f32(),
            cpu_start.elapsed().as_secs_f32()
        );
        KernelMatrix::from_rows(rows)
    }

    /// Sparse features of roots. Edit distance kernels keep only positive values.
    pub fn feature_vectors(&self, roots: &[usize]) -> anyhow::Result<Vec<FeatureVector>> {
        let kernel_type = self.params.get_kernel_type();
        if kernel_type.is_random_walk() {
            log::error!("no feature vectors for kernel {}", kernel_type);
            return Err(anyhow!("no feature vectors for kernel {}", kernel_type));
        }
        let counts = self.compute_counts(roots)?;
        self.cache.clear();
        let sizes = self.params.get_graphlet_sizes();
        let positive_only = kernel_type == KernelType::EditDistance;
        Ok(counts
            .iter()
            .map(|c| feature_vector(c, &sizes, self.params.get_normalize(), positive_only))
            .collect())
    }
} // end of impl GraphKernel

//========================================================================================

#[cfg(test)]
mod tests {

    use super::*;
    use crate::graphlet::key::Key;

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn test_graph() -> SimpleGraph {
        let labels = b"ABBACABCAD".to_vec();
        let edges = [(0, 1), (1, 2), (2, 0), (2, 3), (3, 4), (4, 5), (5, 6), (6, 3), (1, 7), (7, 8)];
        // vertex 9 is isolated
        SimpleGraph::new(labels, &edges).unwrap()
    }

    fn kernel_matrix(g: &SimpleGraph, kernel_type: KernelType, sf: f32, em: usize, normalize: bool) -> KernelMatrix {
        let params = KernelParams::new(kernel_type, normalize, sf, em).unwrap();
        let kernel = GraphKernel::new(g, params, LabelAlphabet::symmetric("ABCD").unwrap(), None).unwrap();
        let roots: Vec<usize> = (0..g.nb_nodes()).collect();
        kernel.compute_matrix(&roots).unwrap()
    }

    #[test]
    fn substitution_on_path() {
        log_init_test();
        let g = SimpleGraph::new(b"AABB".to_vec(), &[(0, 1), (1, 2), (2, 3)]).unwrap();
        let params = KernelParams::new(KernelType::LabelSubstitution, false, 0.5, 0).unwrap();
        let alphabet = LabelAlphabet::new("AB", "A").unwrap();
        let kernel = GraphKernel::new(&g, params, alphabet, None).unwrap();
        let counts = kernel.root_counts(0).unwrap();
        let o1 = counts.get_orbit(1);
        assert_eq!(o1.retrieve_count(&Key::encode(b'A', b"A")), 1.);
        assert_eq!(o1.retrieve_count(&Key::encode(b'A', b"B")), 1.);
        assert!(kernel.get_cache_size() > 0);
    }

    #[test]
    fn matrices_symmetric_non_negative() {
        log_init_test();
        let g = test_graph();
        let configs = [
            (KernelType::Graphlet, 0., 0),
            (KernelType::LabelSubstitution, 0.5, 0),
            (KernelType::EdgeIndel, 0., 1),
            (KernelType::EdgeIndel, 0., 2),
            (KernelType::EditDistance, 0.5, 1),
            (KernelType::EditDistance, 0.5, 2),
        ];
        for (t, sf, em) in configs {
            for normalize in [false, true] {
                let m = kernel_matrix(&g, t, sf, em, normalize);
                let dense = m.to_dense();
                for i in 0..g.nb_nodes() {
                    for j in 0..g.nb_nodes() {
                        assert_eq!(dense[[i, j]], dense[[j, i]]);
                        assert!(dense[[i, j]] >= 0.);
                    }
                    // isolated root has no graphlet of size >= 2
                    assert_eq!(m.get(9, i), 0.);
                }
                if normalize {
                    assert!(m.get(0, 0) > 0.);
                }
            }
        }
    }

    #[test]
    fn mismatches_increase_kernel() {
        log_init_test();
        let g = test_graph();
        let exact = kernel_matrix(&g, KernelType::Graphlet, 0., 0, false);
        let labels = kernel_matrix(&g, KernelType::LabelSubstitution, 0.5, 0, false);
        let edges = kernel_matrix(&g, KernelType::EdgeIndel, 0., 1, false);
        let edges2 = kernel_matrix(&g, KernelType::EdgeIndel, 0., 2, false);
        for i in 0..g.nb_nodes() {
            for j in 0..=i {
                assert!(labels.get(i, j) >= exact.get(i, j));
                assert!(edges.get(i, j) >= exact.get(i, j));
                assert!(edges2.get(i, j) >= edges.get(i, j));
            }
        }
        // standard kernel ignores the label fraction
        assert_eq!(kernel_matrix(&g, KernelType::Graphlet, 0.5, 0, false), exact);
    }

    #[test]
    fn parallel_agrees_with_sequential() {
        log_init_test();
        let g = test_graph();
        let roots: Vec<usize> = (0..g.nb_nodes()).collect();
        for (t, sf, em) in [(KernelType::LabelSubstitution, 0.5, 0), (KernelType::EditDistance, 0.5, 2)] {
            let mut params = KernelParams::new(t, true, sf, em).unwrap();
            let k1 = GraphKernel::new(&g, params.clone(), LabelAlphabet::symmetric("ABCD").unwrap(), None).unwrap();
            params.set_parallel(false);
            let k2 = GraphKernel::new(&g, params, LabelAlphabet::symmetric("ABCD").unwrap(), None).unwrap();
            let m1 = k1.compute_matrix(&roots).unwrap();
            let m2 = k2.compute_matrix(&roots).unwrap();
            for i in 0..roots.len() {
                for j in 0..=i {
                    assert!((m1.get(i, j) - m2.get(i, j)).abs() < 1.0e-5);
                }
            }
        }
    }

    #[test]
    fn edit_distance_features_positive() {
        log_init_test();
        let g = test_graph();
        let params = KernelParams::new(KernelType::EditDistance, false, 0.5, 2).unwrap();
        let kernel = GraphKernel::new(&g, params, LabelAlphabet::symmetric("ABCD").unwrap(), None).unwrap();
        let features = kernel.feature_vectors(&[0, 3, 9]).unwrap();
        assert_eq!(features.len(), 3);
        assert!(!features[0].is_empty());
        assert!(features[2].is_empty());
        for f in &features {
            assert!(f.iter().all(|(_, v)| *v > 0.));
            assert!(f.windows(2).all(|w| w[0].0 < w[1].0));
        }
    }

    #[test]
    fn bad_inputs() {
        log_init_test();
        let g = test_graph();
        let params = KernelParams::new(KernelType::LabelSubstitution, false, 0.5, 0).unwrap();
        assert!(GraphKernel::new(&g, params.clone(), LabelAlphabet::symmetric("").unwrap(), None).is_err());
        let kernel = GraphKernel::new(&g, params, LabelAlphabet::symmetric("AB").unwrap(), None).unwrap();
        assert!(kernel.compute_matrix(&[0, 10]).is_err());
        // labels C and D have no score with a table restricted to A and B
        let params = KernelParams::new(KernelType::LabelSubstitution, false, 0.5, 0).unwrap();
        let table = SimilarityTable::uniform(b"AB", 0.5);
        let kernel = GraphKernel::new(&g, params, LabelAlphabet::symmetric("AB").unwrap(), Some(table)).unwrap();
        assert!(kernel.compute_matrix(&[0, 3]).is_err());
        // random walk kernels have no features
        let params = KernelParams::new(KernelType::RandomWalk, false, 0., 0).unwrap();
        let kernel = GraphKernel::new(&g, params, LabelAlphabet::default(), None).unwrap();
        assert!(kernel.feature_vectors(&[0]).is_err());
        assert_eq!(kernel.compute_matrix(&[0, 1]).unwrap().get_size(), 2);
    }
} // end of mod tests
