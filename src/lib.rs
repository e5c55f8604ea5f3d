//! Graphlet kernels between vertices of a labeled graph.
//!
//! The kernel value of two vertices compares the labeled graphlets (connected induced subgraphs of
//! up to 5 vertices) rooted at each of them. Matching can be exact or approximate, allowing vertex
//! label substitutions weighted by a label similarity table and edge insertions or deletions.
//! Random walk kernels are also provided.

use env_logger::Builder;

#[macro_use]
extern crate lazy_static;

lazy_static! {
    static ref LOG: u64 = init_log();
}

// install a logger facility
fn init_log() -> u64 {
    Builder::from_default_env().init();
    log::info!("logger initialized");
    1
}

/// to get the logger installed by a library user, value is always 1
pub fn log_init() -> u64 {
    *LOG
}

pub mod graph;

pub mod graphlet;

pub mod mismatch;

pub mod kernel;

pub mod io;

pub mod prelude;
