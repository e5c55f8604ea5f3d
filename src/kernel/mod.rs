//! Kernel computation between vertices of a labeled graph.
//!
//! - [params] : kernel type and parameters,
//! - [gkernel] : graphlet kernels with exact or approximate matching,
//! - [randwalk] : random walk kernels,
//! - [aggregate] and [features] : kernel values and sparse feature vectors from graphlet counts,
//! - [matrix] : the symmetric kernel matrix.

pub mod aggregate;
pub mod features;
pub mod gkernel;
pub mod matrix;
pub mod params;
pub mod randwalk;
