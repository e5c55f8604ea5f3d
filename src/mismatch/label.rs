//! Vertex label substitutions.
//!
//! For a key of an orbit, its neighbourhood at level 1 is the set of canonical keys obtained by substituting
//! one label (root from the root alphabet, arms from the arm alphabet) by a different label whose
//! similarity reaches the threshold. At level 2, every pair of positions is substituted at once
//! (identical labels allowed, so level 2 also contains level 1).
//!
//! Counting proceeds in two steps for one orbit of one root:
//! 1. [add_vertex_label_mismatch_counts](LabelMismatchExpander::add_vertex_label_mismatch_counts)
//!    registers zero entries for neighbours absent from the occurrence map.
//! 2. [update_label_mismatch_counts](LabelMismatchExpander::update_label_mismatch_counts) spreads the weight
//!    of every key on the other keys of the map: for each other key we look for its nearest equivalent
//!    (smallest number of differing positions, ties broken by larger similarity product) and,
//!    if the distance is within the allowed number of substitutions, add weight * similarity
//!    to that equivalent slot.

use std::collections::BTreeSet;
use std::sync::Arc;

use anyhow::anyhow;

use super::neighborhood::NeighborhoodCache;
use super::similarity::SimilarityTable;
use super::LabelAlphabet;
use crate::graphlet::counts::*;
use crate::graphlet::key::*;
use crate::graphlet::orbit::*;

/// Which part of a key count is spread to its neighbours.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MismatchWeight {
    /// exact matches only
    Exact,
    /// exact matches and edge mismatches
    ExactAndEdges,
}

pub struct LabelMismatchExpander<'a> {
    similarity: &'a SimilarityTable,
    alphabet: &'a LabelAlphabet,
    cache: &'a NeighborhoodCache,
}

impl<'a> LabelMismatchExpander<'a> {
    pub fn new(similarity: &'a SimilarityTable, alphabet: &'a LabelAlphabet, cache: &'a NeighborhoodCache) -> Self {
        LabelMismatchExpander { similarity, alphabet, cache }
    }

    fn substitutes(&self, pos: usize) -> &[Label] {
        if pos == 0 {
            self.alphabet.get_root_alphabet()
        } else {
            self.alphabet.get_alphabet()
        }
    }

    /// canonical keys at one substitution of key
    pub fn neighborhood_m1(&self, orbit: OrbitId, key: Key) -> anyhow::Result<Vec<Key>> {
        let size = taxonomy().get_spec(orbit)?.get_size();
        let labels = key.decode();
        let mut neighbours = BTreeSet::<Key>::new();
        for pos in 0..size {
            for &x in self.substitutes(pos) {
                if x == labels[pos] || !self.similarity.accepts(self.similarity.score_or_zero(labels[pos], x)) {
                    continue;
                }
                let mut new_labels = labels;
                new_labels[pos] = x;
                neighbours.insert(taxonomy().canonical_key(orbit, new_labels[0], &new_labels[1..size])?);
            }
        }
        Ok(neighbours.into_iter().collect())
    }

    /// canonical keys obtained by substituting every pair of positions
    pub fn neighborhood_m2(&self, orbit: OrbitId, key: Key) -> anyhow::Result<Vec<Key>> {
        let size = taxonomy().get_spec(orbit)?.get_size();
        let labels = key.decode();
        let mut neighbours = BTreeSet::<Key>::new();
        for p in 0..size {
            let first: Vec<Label> = self
                .substitutes(p)
                .iter()
                .filter(|x| self.similarity.accepts(self.similarity.score_or_zero(labels[p], **x)))
                .cloned()
                .collect();
            for q in p + 1..size {
                for &x in &first {
                    for &y in self.substitutes(q) {
                        if !self.similarity.accepts(self.similarity.score_or_zero(labels[q], y)) {
                            continue;
                        }
                        let mut new_labels = labels;
                        new_labels[p] = x;
                        new_labels[q] = y;
                        neighbours.insert(taxonomy().canonical_key(orbit, new_labels[0], &new_labels[1..size])?);
                    }
                }
            }
        }
        Ok(neighbours.into_iter().collect())
    }

    /// Cached neighbourhood of a key. Levels other than 1 and 2 have an empty neighbourhood.
    pub fn neighborhood(&self, orbit: OrbitId, vlm: usize, key: Key) -> anyhow::Result<Arc<Vec<Key>>> {
        self.cache.get_or_compute(orbit, vlm, key, || match vlm {
            1 => self.neighborhood_m1(orbit, key),
            2 => self.neighborhood_m2(orbit, key),
            _ => Ok(Vec::new()),
        })
    }

    /// Registers in pending a zero entry for each neighbour of the keys of counts that is present
    /// neither in counts nor in pending. Only keys with exact matches are expanded unless all_keys is set.
    pub fn add_vertex_label_mismatch_counts(
        &self,
        counts: &OrbitCounts,
        pending: &mut OrbitCounts,
        vlm: usize,
        all_keys: bool,
    ) -> anyhow::Result<()> {
        if vlm == 0 {
            return Ok(());
        }
        let orbit = counts.get_orbit();
        for (key, info) in counts.iter() {
            if info.get_exact_matches() <= 0. && !all_keys {
                continue;
            }
            let neighbours = self.neighborhood(orbit, vlm, *key)?;
            for n in neighbours.iter() {
                if !counts.contains(n) {
                    pending.insert_zero(*n)?;
                }
            }
        }
        Ok(())
    }

    /// Spreads the weight of each key of counts on the other keys of counts and pending,
    /// then merges pending into counts.
    /// With exact_distance only neighbours at exactly vlm substitutions are credited,
    /// otherwise all neighbours within vlm substitutions.
    pub fn update_label_mismatch_counts(
        &self,
        counts: &mut OrbitCounts,
        mut pending: OrbitCounts,
        weight: MismatchWeight,
        vlm: usize,
        exact_distance: bool,
    ) -> anyhow::Result<()> {
        if vlm == 0 {
            return Ok(());
        }
        let weights: Vec<(Key, f32)> = counts
            .iter()
            .map(|(k, info)| {
                let w = match weight {
                    MismatchWeight::Exact => info.get_exact_matches(),
                    MismatchWeight::ExactAndEdges => info.edge_count(),
                };
                (*k, w)
            })
            .collect();
        for (key, w) in weights {
            self.update_mismatch_count(counts, key, w, vlm, exact_distance)?;
            self.update_mismatch_count(&mut pending, key, w, vlm, exact_distance)?;
        }
        counts.merge(pending);
        Ok(())
    }

    /// Credits weight w of key to the nearest equivalent of every other key of map.
    pub fn update_mismatch_count(
        &self,
        map: &mut OrbitCounts,
        key: Key,
        w: f32,
        vlm: usize,
        exact_distance: bool,
    ) -> anyhow::Result<()> {
        if w <= 0. || vlm == 0 {
            return Ok(());
        }
        let orbit = map.get_orbit();
        let size = graphlet_size(orbit);
        for (other, info) in map.iter_mut() {
            if *other == key {
                continue;
            }
            let mut min_dist = size + 1;
            let mut min_score = 0f32;
            let mut nearest: Option<Key> = None;
            for partner in info.get_partners().keys() {
                let (dist, score) = self.compare(*partner, key, size)?;
                if dist < min_dist || (dist == min_dist && score > min_score) {
                    min_dist = dist;
                    min_score = score;
                    nearest = Some(*partner);
                }
            }
            let within = if exact_distance { min_dist == vlm } else { min_dist <= vlm };
            if !within || !self.similarity.accepts(min_score) {
                continue;
            }
            let partner = nearest.ok_or_else(|| anyhow!("orbit {} key {} has no declared partner", orbit, other))?;
            info.add_partner_weight(partner, w * min_score).map_err(|e| {
                log::error!("orbit {}, key {} : {}", orbit, other, e);
                anyhow!("orbit {}, mismatch key {} : {}", orbit, other, e)
            })?;
        }
        Ok(())
    }

    /// Number of differing positions among the first size ones and product of the similarity
    /// of each substitution from key to partner. A missing pair in the similarity table is an error.
    pub fn compare(&self, partner: Key, key: Key, size: usize) -> anyhow::Result<(usize, f32)> {
        let p = partner.decode();
        let k = key.decode();
        let mut dist = 0;
        let mut score = 1f32;
        for i in 0..size {
            if p[i] != k[i] {
                dist += 1;
                score *= self.similarity.require(k[i], p[i])?;
            }
        }
        Ok((dist, score))
    }

    /// Both steps for one orbit: neighbourhoods at level `generate` then weight spreading at level `vlm`.
    pub fn expand(
        &self,
        counts: &mut OrbitCounts,
        generate: usize,
        all_keys: bool,
        weight: MismatchWeight,
        vlm: usize,
        exact_distance: bool,
    ) -> anyhow::Result<()> {
        let mut pending = OrbitCounts::new(counts.get_orbit());
        self.add_vertex_label_mismatch_counts(counts, &mut pending, generate, all_keys)?;
        self.update_label_mismatch_counts(counts, pending, weight, vlm, exact_distance)
    }
} // end of impl LabelMismatchExpander

//========================================================================================

// end of mod tests
