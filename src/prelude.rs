//! To ease access to most frequently items
//!

pub use crate::graph::SimpleGraph;

pub use crate::graphlet::counts::{GraphletCounts, MatchInfo, OrbitCounts};
pub use crate::graphlet::enumerate::{enumerate, GraphletEnumerator, GraphletSizes};
pub use crate::graphlet::key::{Key, Label};
pub use crate::graphlet::orbit::{set_k, taxonomy, OrbitId, NB_ORBITS};

pub use crate::mismatch::similarity::SimilarityTable;
pub use crate::mismatch::{LabelAlphabet, AMINO_ACIDS};

pub use crate::kernel::features::FeatureVector;
pub use crate::kernel::gkernel::GraphKernel;
pub use crate::kernel::matrix::KernelMatrix;
pub use crate::kernel::params::*;

pub use crate::io::graphio::{read_examples, Examples};
pub use crate::io::output::{dump_kernel_matrix, MatrixFormat, Output};
pub use crate::io::simmatrix::read_similarity_matrix;
pub use crate::io::svml::{write_labels, write_sparse_svml};
