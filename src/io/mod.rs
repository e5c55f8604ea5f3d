//! Input and output.
//!
//! - [graphio] : labels, graph and examples files,
//! - [simmatrix] : label similarity matrix,
//! - [output] and [bson] : kernel matrix dumps,
//! - [svml] : sparse feature vectors and class labels,
//! - [dot] : GraphViz rendering.

pub mod bson;
pub mod dot;
pub mod graphio;
pub mod output;
pub mod simmatrix;
pub mod svml;
