//! Kernel parameters
//!
//! The label fraction SF gives, per orbit, the number of graphlet vertices allowed to carry
//! a label substitution : floor(size * SF).
//! The edge budget EM is the number of edge insertions or deletions allowed, 0, 1 or 2.

use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::graphlet::orbit::{set_k, OrbitId};
use crate::mismatch::similarity::DEFAULT_SIMILARITY_THRESHOLD;

pub use crate::graphlet::enumerate::GraphletSizes;

/// largest edge budget
pub const MAX_EDGE_MISMATCHES: usize = 2;

/// default number of random walk steps
pub const DEFAULT_STEPS: usize = 100000;

/// default random walk restart probability
pub const DEFAULT_RESTART: f64 = 0.3;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum KernelType {
    /// labels met by two simultaneous walks are compared at each step
    CumulativeRandomWalk,
    /// label sequences of two simultaneous walks are compared at each restart
    RandomWalk,
    /// exact graphlet counts
    Graphlet,
    /// graphlet counts with vertex label substitutions
    LabelSubstitution,
    /// graphlet counts with edge insertions and deletions
    EdgeIndel,
    /// graphlet counts with label substitutions and edge indels
    EditDistance,
}

impl KernelType {
    pub fn is_random_walk(&self) -> bool {
        matches!(self, KernelType::CumulativeRandomWalk | KernelType::RandomWalk)
    }

    /// short name used in dumps
    pub fn get_name(&self) -> &'static str {
        match self {
            KernelType::CumulativeRandomWalk => "cumulative_random_walk",
            KernelType::RandomWalk => "random_walk",
            KernelType::Graphlet => "graphlet",
            KernelType::LabelSubstitution => "label_substitution",
            KernelType::EdgeIndel => "edge_indel",
            KernelType::EditDistance => "edit_distance",
        }
    }
} // end of impl KernelType

impl TryFrom<usize> for KernelType {
    type Error = anyhow::Error;

    fn try_from(t: usize) -> Result<Self, Self::Error> {
        match t {
            0 => Ok(KernelType::CumulativeRandomWalk),
            1 => Ok(KernelType::RandomWalk),
            2 => Ok(KernelType::Graphlet),
            3 => Ok(KernelType::LabelSubstitution),
            4 => Ok(KernelType::EdgeIndel),
            5 => Ok(KernelType::EditDistance),
            _ => {
                log::error!("unknown kernel type {}, expecting 0..5", t);
                Err(anyhow!("unknown kernel type {}, expecting 0..5", t))
            }
        }
    }
}

impl fmt::Display for KernelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get_name())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KernelParams {
    kernel_type: KernelType,
    /// spectral normalization of each orbit count vector
    normalize: bool,
    /// fraction of graphlet vertices that can be substituted
    label_fraction: f32,
    /// number of edge indels
    edge_mismatches: usize,
    /// minimal similarity of a substitution
    similarity_threshold: f32,
    graphlet_sizes: GraphletSizes,
    /// random walk steps
    steps: usize,
    /// random walk restart probability
    restart: f64,
    /// seed of random walks
    seed: u64,
    /// process roots in parallel
    parallel: bool,
} // end of struct KernelParams

impl KernelParams {
    /// label_fraction must be in [0,1] and edge_mismatches in 0..=2.
    pub fn new(kernel_type: KernelType, normalize: bool, label_fraction: f32, edge_mismatches: usize) -> anyhow::Result<Self> {
        if !(0. ..=1.).contains(&label_fraction) {
            log::error!("label fraction must be in [0,1], got {}", label_fraction);
            return Err(anyhow!("label fraction must be in [0,1], got {}", label_fraction));
        }
        if edge_mismatches > MAX_EDGE_MISMATCHES {
            log::error!("edge mismatches must be in 0..{}, got {}", MAX_EDGE_MISMATCHES, edge_mismatches);
            return Err(anyhow!("edge mismatches must be in 0..{}, got {}", MAX_EDGE_MISMATCHES, edge_mismatches));
        }
        Ok(KernelParams {
            kernel_type,
            normalize,
            label_fraction,
            edge_mismatches,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            graphlet_sizes: GraphletSizes::default(),
            steps: DEFAULT_STEPS,
            restart: DEFAULT_RESTART,
            seed: 0,
            parallel: true,
        })
    }

    //
    pub fn get_kernel_type(&self) -> KernelType {
        self.kernel_type
    }

    //
    pub fn get_normalize(&self) -> bool {
        self.normalize
    }

    //
    pub fn get_label_fraction(&self) -> f32 {
        self.label_fraction
    }

    //
    pub fn get_edge_mismatches(&self) -> usize {
        self.edge_mismatches
    }

    pub fn get_similarity_threshold(&self) -> f32 {
        self.similarity_threshold
    }

    pub fn get_graphlet_sizes(&self) -> GraphletSizes {
        self.graphlet_sizes
    }

    pub fn get_steps(&self) -> usize {
        self.steps
    }

    pub fn get_restart(&self) -> f64 {
        self.restart
    }

    pub fn get_seed(&self) -> u64 {
        self.seed
    }

    pub fn get_parallel(&self) -> bool {
        self.parallel
    }

    /// restart must be a probability
    pub fn set_random_walk(&mut self, steps: usize, restart: f64, seed: u64) -> anyhow::Result<()> {
        if !(0. ..=1.).contains(&restart) {
            log::error!("restart probability must be in [0,1], got {}", restart);
            return Err(anyhow!("restart probability must be in [0,1], got {}", restart));
        }
        self.steps = steps;
        self.restart = restart;
        self.seed = seed;
        Ok(())
    }

    pub fn set_similarity_threshold(&mut self, threshold: f32) {
        self.similarity_threshold = threshold;
    }

    pub fn set_graphlet_sizes(&mut self, sizes: GraphletSizes) {
        self.graphlet_sizes = sizes;
    }

    pub fn set_parallel(&mut self, parallel: bool) {
        self.parallel = parallel;
    }

    /// number of label substitutions allowed in orbit. The standard graphlet kernel has none.
    pub fn vertex_label_mismatches(&self, orbit: OrbitId) -> anyhow::Result<usize> {
        match self.kernel_type {
            KernelType::LabelSubstitution | KernelType::EditDistance => set_k(orbit, self.label_fraction),
            _ => Ok(0),
        }
    }

    /// true if some orbit can get label substitutions
    pub fn uses_label_mismatches(&self) -> bool {
        matches!(self.kernel_type, KernelType::LabelSubstitution | KernelType::EditDistance) && self.label_fraction > 0.
    }
} // end of impl KernelParams

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn kernel_types() {
        for t in 0..6 {
            let kt = KernelType::try_from(t).unwrap();
            assert_eq!(kt.is_random_walk(), t < 2);
        }
        assert!(KernelType::try_from(6).is_err());
        assert_eq!(KernelType::EditDistance.to_string(), "edit_distance");
    }

    #[test]
    fn params_ranges() {
        assert!(KernelParams::new(KernelType::LabelSubstitution, false, 1.5, 0).is_err());
        assert!(KernelParams::new(KernelType::EdgeIndel, false, 0., 3).is_err());
        let mut params = KernelParams::new(KernelType::EditDistance, true, 0.5, 2).unwrap();
        assert_eq!(params.vertex_label_mismatches(73).unwrap(), 2);
        assert_eq!(params.vertex_label_mismatches(1).unwrap(), 1);
        assert!(params.vertex_label_mismatches(74).is_err());
        assert!(params.set_random_walk(10, 1.2, 1).is_err());
        params.set_random_walk(10, 0.2, 1).unwrap();
        assert_eq!(params.get_steps(), 10);
        // standard kernel ignores the fraction
        let params = KernelParams::new(KernelType::Graphlet, false, 0.5, 0).unwrap();
        assert_eq!(params.vertex_label_mismatches(73).unwrap(), 0);
        assert!(!params.uses_label_mismatches());
    }
} // end of mod tests
