//! Orbit transition table: the effect of inserting or deleting one edge of a graphlet template.
//!
//! For each orbit we toggle every pair of template positions (root included) and keep the toggles
//! leaving the graphlet connected. The classification of the new adjacency pattern gives the target orbit
//! and where each vertex lands in the target template, so an occurrence can be relabeled and
//! recanonicalized in the target orbit.

use anyhow::anyhow;
use std::collections::BTreeSet;

use super::key::*;
use super::orbit::*;

/// A single edge insertion or deletion.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Edit {
    /// toggled pair of template positions
    pub pair: (u8, u8),
    /// true if the edit inserts the edge
    pub insertion: bool,
    /// orbit reached
    pub target: OrbitId,
    /// placement[i] is the position in the target template of position i of the source template
    pub placement: Placement,
}

pub struct TransitionTable {
    edits: Vec<Vec<Edit>>,
}

lazy_static! {
    static ref TRANSITIONS: TransitionTable = TransitionTable::build(taxonomy());
}

/// access to the transition table
pub fn transitions() -> &'static TransitionTable {
    &TRANSITIONS
}

impl TransitionTable {
    fn build(taxonomy: &Taxonomy) -> Self {
        let mut edits = Vec::<Vec<Edit>>::with_capacity(NB_ORBITS);
        for spec in taxonomy.get_specs() {
            let size = spec.get_size();
            let mut orbit_edits = Vec::<Edit>::new();
            for a in 0..size {
                for b in a + 1..size {
                    let mask = spec.get_mask() ^ (1 << pair_index(a, b));
                    if let Some(c) = taxonomy.classify(size, mask) {
                        orbit_edits.push(Edit {
                            pair: (a as u8, b as u8),
                            insertion: !spec.has_edge(a, b),
                            target: c.orbit,
                            placement: c.positions,
                        });
                    }
                }
            }
            edits.push(orbit_edits);
        }
        log::debug!("transition table built, {} edits", edits.iter().map(|e| e.len()).sum::<usize>());
        TransitionTable { edits }
    }

    /// edits available from an orbit
    pub fn get_edits(&self, orbit: OrbitId) -> &[Edit] {
        self.edits.get(orbit).map(|e| e.as_slice()).unwrap_or(&[])
    }

    /// Apply an edit to a key of the source orbit of size `size`, returns the canonical key in the target orbit.
    pub fn apply(&self, edit: &Edit, key: Key, size: usize) -> anyhow::Result<Key> {
        let labels = key.decode();
        let mut moved = [ZERO_LABEL; KEY_FIELDS];
        for i in 0..size {
            moved[edit.placement[i] as usize] = labels[i];
        }
        taxonomy().canonical_key(edit.target, moved[0], &moved[1..size])
    }

    /// all (orbit, canonical key) reachable from (orbit, key) by one edit
    pub fn neighbours(&self, orbit: OrbitId, key: Key) -> anyhow::Result<BTreeSet<(OrbitId, Key)>> {
        if orbit >= NB_ORBITS {
            return Err(anyhow!("unsupported orbit id {}", orbit));
        }
        let size = graphlet_size(orbit);
        let mut res = BTreeSet::new();
        for edit in self.get_edits(orbit) {
            res.insert((edit.target, self.apply(edit, key, size)?));
        }
        Ok(res)
    }
} // end of impl TransitionTable

//========================================================================================

// end of mod tests
