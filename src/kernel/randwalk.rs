//! Random walk kernels.
//!
//! Two walks start simultaneously from the two roots and move to a uniformly chosen neighbour at each step.
//! After a step both walks go back to their root with probability restart.
//! The restart draw is an integer percentage in 0..=100 divided by 100.
//!
//! Each row of the kernel matrix uses its own random stream, obtained by successive jumps
//! of a generator seeded once, so parallel and sequential runs give the same matrix.

use cpu_time::ProcessTime;
use rand::Rng;
use rand_xoshiro::rand_core::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use std::time::SystemTime;

use super::matrix::KernelMatrix;
use crate::graph::SimpleGraph;
use crate::graphlet::key::Label;

#[inline]
fn compare_labels(a: Label, b: Label) -> f32 {
    if a == b {
        1.
    } else {
        0.
    }
}

#[inline]
fn restart_draw<R: Rng>(rng: &mut R) -> f64 {
    rng.gen_range(0..101) as f64 / 100.
}

/// Counts the steps at which both walks reach vertices with the same label,
/// plus 1 if the roots have the same label. A vertex without neighbour stops the walks.
pub fn random_walk_cumulative<R: Rng>(g: &SimpleGraph, r1: usize, r2: usize, steps: usize, restart: f64, rng: &mut R) -> f32 {
    let mut value = compare_labels(g.get_label(r1), g.get_label(r2));
    let (mut i1, mut i2) = (r1, r2);
    for _ in 1..steps {
        let (n1, n2) = (g.get_neighbours(i1), g.get_neighbours(i2));
        if n1.is_empty() || n2.is_empty() {
            return value;
        }
        let next1 = n1[rng.gen_range(0..n1.len())];
        let next2 = n2[rng.gen_range(0..n2.len())];
        value += compare_labels(g.get_label(next1), g.get_label(next2));
        if restart_draw(rng) < restart {
            i1 = r1;
            i2 = r2;
        } else {
            i1 = next1;
            i2 = next2;
        }
    }
    value
}

/// Counts the restarts at which both walks produced the same label sequence since the previous restart.
/// 0 if root labels differ or a root is isolated.
pub fn random_walk<R: Rng>(g: &SimpleGraph, r1: usize, r2: usize, steps: usize, restart: f64, rng: &mut R) -> f32 {
    let mut value = 0f32;
    if g.get_label(r1) != g.get_label(r2) || g.get_degree(r1) == 0 || g.get_degree(r2) == 0 {
        return value;
    }
    let mut seq1 = vec![g.get_label(r1)];
    let mut seq2 = vec![g.get_label(r2)];
    let (mut i1, mut i2) = (r1, r2);
    for _ in 1..steps {
        let (n1, n2) = (g.get_neighbours(i1), g.get_neighbours(i2));
        if n1.is_empty() || n2.is_empty() {
            return value;
        }
        let next1 = n1[rng.gen_range(0..n1.len())];
        let next2 = n2[rng.gen_range(0..n2.len())];
        seq1.push(g.get_label(next1));
        seq2.push(g.get_label(next2));
        if restart_draw(rng) < restart {
            i1 = r1;
            i2 = r2;
            if seq1 == seq2 {
                value += 1.;
            }
            seq1.truncate(1);
            seq2.truncate(1);
        } else {
            i1 = next1;
            i2 = next2;
        }
    }
    value
}

/// Kernel matrix of roots, entry (i,j) for j <= i computed with the stream of row i.
pub fn random_walk_matrix(
    g: &SimpleGraph,
    roots: &[usize],
    cumulative: bool,
    steps: usize,
    restart: f64,
    seed: u64,
    parallel: bool,
) -> anyhow::Result<KernelMatrix> {
    log::info!("random walk kernel, cumulative : {}, nb roots : {}, steps : {}, restart : {}", cumulative, roots.len(), steps, restart);
    let cpu_start = ProcessTime::now();
    let sys_start = SystemTime::now();
    //
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let mut rngs = Vec::<Xoshiro256PlusPlus>::with_capacity(roots.len());
    for _ in 0..roots.len() {
        rngs.push(rng.clone());
        rng.jump();
    }
    let walk = |i: usize, mut row_rng: Xoshiro256PlusPlus| -> Vec<f32> {
        (0..=i)
            .map(|j| {
                if cumulative {
                    random_walk_cumulative(g, roots[i], roots[j], steps, restart, &mut row_rng)
                } else {
                    random_walk(g, roots[i], roots[j], steps, restart, &mut row_rng)
                }
            })
            .collect()
    };
    let rows: Vec<Vec<f32>> = if parallel {
        rngs.into_par_iter().enumerate().map(|(i, r)| walk(i, r)).collect()
    } else {
        rngs.into_iter().enumerate().map(|(i, r)| walk(i, r)).collect()
    };
    //
    log::info!(
        "random_walk_matrix sys time(s) {:.2e} cpu time(s) {:.2e}",
        sys_start.elapsed().unwrap_or_default().as_secs_f32(),
        cpu_start.elapsed().as_secs_f32()
    );
    KernelMatrix::from_rows(rows)
}
