//! Edge insertions and deletions.
//!
//! Each key of a root is moved along the orbit transition table. Level 0 holds the (orbit, key) pairs
//! reachable by one edit, level 1 those reachable by two edits and not already at level 0 nor equal
//! to the starting pair. The exact match count of the starting key is added as mismatch weight
//! to every reached key. Keys not yet counted for the root get a new entry, zero weights included,
//! once all keys have been processed.

use std::collections::BTreeSet;

use anyhow::anyhow;

use crate::graphlet::counts::*;
use crate::graphlet::key::*;
use crate::graphlet::orbit::*;
use crate::graphlet::transition::*;

type Node = (OrbitId, Key);

/// Walks the transition table for the keys of a root.
pub struct EdgeIndelExpander<'a> {
    table: &'a TransitionTable,
}

impl<'a> Default for EdgeIndelExpander<'a> {
    fn default() -> Self {
        EdgeIndelExpander { table: transitions() }
    }
}

impl<'a> EdgeIndelExpander<'a> {
    pub fn new(table: &'a TransitionTable) -> Self {
        EdgeIndelExpander { table }
    }

    /// Neighbourhood of (orbit, key) by level, level l contains what needs l+1 edits.
    /// Each level is deduplicated against lower levels and the starting pair.
    pub fn edit_levels(&self, orbit: OrbitId, key: Key, nb_levels: usize) -> anyhow::Result<Vec<BTreeSet<Node>>> {
        let mut levels = Vec::<BTreeSet<Node>>::with_capacity(nb_levels);
        let mut frontier = BTreeSet::<Node>::new();
        frontier.insert((orbit, key));
        for _ in 0..nb_levels {
            let mut next = BTreeSet::<Node>::new();
            for (o, k) in &frontier {
                next.extend(self.table.neighbours(*o, *k)?);
            }
            // the walk goes on from all reached pairs, deduplication only concerns what is credited
            frontier = next.clone();
            next.remove(&(orbit, key));
            for previous in &levels {
                next.retain(|n| !previous.contains(n));
            }
            levels.push(next);
        }
        Ok(levels)
    }

    /// Credits exact matches of every key to the keys within em edits. em = 0 is a no-op.
    pub fn add_edge_mismatch_counts(&self, counts: &mut GraphletCounts, em: usize) -> anyhow::Result<()> {
        self.add_levels(counts, em, 0)
    }

    /// Credits exact matches to keys at exactly one edit.
    pub fn add_1_edge_mismatch_counts(&self, counts: &mut GraphletCounts) -> anyhow::Result<()> {
        self.add_levels(counts, 1, 0)
    }

    /// Credits exact matches to keys at two edits, not reachable by one edit.
    pub fn add_2_edge_mismatch_counts(&self, counts: &mut GraphletCounts) -> anyhow::Result<()> {
        self.add_levels(counts, 2, 1)
    }

    // compute levels 0..nb_levels, credit levels first_level..nb_levels
    fn add_levels(&self, counts: &mut GraphletCounts, nb_levels: usize, first_level: usize) -> anyhow::Result<()> {
        if nb_levels == 0 {
            return Ok(());
        }
        let mut contributions = Vec::<(Node, f32)>::new();
        for orbit_counts in counts.get_orbits() {
            let orbit = orbit_counts.get_orbit();
            for (key, info) in orbit_counts.iter() {
                let w = info.get_exact_matches();
                let levels = self.edit_levels(orbit, *key, nb_levels)?;
                for level in levels.iter().skip(first_level) {
                    for node in level {
                        self.check_canonical(node)?;
                        contributions.push((*node, w));
                    }
                }
            }
        }
        log::trace!("root {} edge indels, {} contributions", counts.get_root(), contributions.len());
        //
        let mut pending: Vec<OrbitCounts> = (0..NB_ORBITS).map(OrbitCounts::new).collect();
        for ((orbit, key), w) in contributions {
            let target = counts.get_orbit_mut(orbit);
            match target.get_mut(&key) {
                Some(info) => info.add_mismatches(w),
                None => pending[orbit].add_mismatches(key, w)?,
            }
        }
        for (orbit, p) in pending.into_iter().enumerate() {
            counts.get_orbit_mut(orbit).merge(p);
        }
        Ok(())
    }

    // a key produced by the table must be its own canonical form
    fn check_canonical(&self, node: &Node) -> anyhow::Result<()> {
        let (orbit, key) = *node;
        let (canonical, _) = taxonomy().canonicalize_key(orbit, key)?;
        if canonical != key {
            log::error!("graphlet keys do not match {} vs {} in orbit {}", canonical, key, orbit);
            return Err(anyhow!("graphlet keys do not match {} vs {} in orbit {}", canonical, key, orbit));
        }
        Ok(())
    }
} // end of impl EdgeIndelExpander

//========================================================================================

#[cfg(test)]
mod tests {

    use super::*;
    use crate::graph::SimpleGraph;
    use crate::graphlet::enumerate::*;

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn triangle_levels() {
        log_init_test();
        let expander = EdgeIndelExpander::default();
        let key = Key::encode(b'A', b"BC");
        let levels = expander.edit_levels(4, key, 2).unwrap();
        assert_eq!(levels.len(), 2);
        assert_eq!(levels[0].len(), 3);
        // from paths and fork we only get back to the triangle, which is the starting point
        assert!(levels[1].is_empty());
        // path ABC: one edit closes it, two edits open it elsewhere
        let levels = expander.edit_levels(2, key, 2).unwrap();
        assert_eq!(levels[0].len(), 1);
        assert!(levels[1].contains(&(2, Key::encode(b'A', b"CB"))));
        assert!(levels[1].contains(&(3, Key::encode(b'A', b"BC"))));
        assert!(!levels[1].contains(&(2, key)));
    }

    #[test]
    fn one_edit_on_path() {
        log_init_test();
        // path A-B-C seen from A
        let g = SimpleGraph::new(b"ABC".to_vec(), &[(0, 1), (1, 2)]).unwrap();
        let mut counts = enumerate(&g, 0, GraphletSizes::default()).unwrap();
        let expander = EdgeIndelExpander::default();
        expander.add_edge_mismatch_counts(&mut counts, 1).unwrap();
        let triangle = Key::encode(b'A', b"BC");
        let info = counts.get_orbit(4).get(&triangle).unwrap();
        assert_eq!(info.get_exact_matches(), 0.);
        assert_eq!(info.get_mismatches(), 1.);
        // size 2 graphlets have no edit
        assert_eq!(counts.get_orbit(1).len(), 1);
        assert_eq!(counts.get_orbit(1).get(&Key::encode(b'A', b"B")).unwrap().get_mismatches(), 0.);
    }

    #[test]
    fn existing_keys_accumulate() {
        log_init_test();
        let mut counts = GraphletCounts::new(0);
        let path = Key::encode(b'A', b"BC");
        let triangle = Key::encode(b'A', b"BC");
        counts.get_orbit_mut(2).increment_match(path).unwrap();
        counts.get_orbit_mut(2).increment_match(path).unwrap();
        counts.get_orbit_mut(4).increment_match(triangle).unwrap();
        let expander = EdgeIndelExpander::default();
        expander.add_1_edge_mismatch_counts(&mut counts).unwrap();
        // triangle gets 2 from the path, path gets 1 from the triangle
        assert_eq!(counts.get_orbit(4).get(&triangle).unwrap().get_mismatches(), 2.);
        assert_eq!(counts.get_orbit(2).get(&path).unwrap().get_mismatches(), 1.);
        // new keys from the triangle
        assert_eq!(counts.get_orbit(2).retrieve_count(&Key::encode(b'A', b"CB")), 1.);
        assert_eq!(counts.get_orbit(3).retrieve_count(&Key::encode(b'A', b"BC")), 1.);
    }

    #[test]
    fn zero_weight_creates_entries() {
        log_init_test();
        let mut counts = GraphletCounts::new(0);
        let path = Key::encode(b'A', b"BC");
        counts.get_orbit_mut(2).insert_zero(path).unwrap();
        let expander = EdgeIndelExpander::default();
        expander.add_edge_mismatch_counts(&mut counts, 1).unwrap();
        let info = counts.get_orbit(4).get(&path).unwrap();
        assert_eq!(info.count(), 0.);
        // em = 0 does nothing
        let before = counts.nb_keys();
        expander.add_edge_mismatch_counts(&mut counts, 0).unwrap();
        assert_eq!(before, counts.nb_keys());
    }

    #[test]
    fn second_level_only() {
        log_init_test();
        let mut counts = GraphletCounts::new(0);
        let path = Key::encode(b'A', b"BC");
        counts.get_orbit_mut(2).increment_match(path).unwrap();
        let expander = EdgeIndelExpander::default();
        expander.add_2_edge_mismatch_counts(&mut counts).unwrap();
        // triangle is at one edit, not credited
        assert!(!counts.get_orbit(4).contains(&path));
        assert_eq!(counts.get_orbit(3).retrieve_count(&path), 1.);
        assert_eq!(counts.get_orbit(2).retrieve_count(&Key::encode(b'A', b"CB")), 1.);
        assert_eq!(counts.get_orbit(2).retrieve_count(&path), 1.);
    }

    #[test]
    fn more_edits_more_keys() {
        log_init_test();
        let labels = b"ABCABCAB".to_vec();
        let edges = [(0, 1), (1, 2), (2, 3), (3, 4), (0, 5), (5, 6), (6, 7), (1, 5)];
        let g = SimpleGraph::new(labels, &edges).unwrap();
        let exact = enumerate(&g, 0, GraphletSizes::default()).unwrap();
        let expander = EdgeIndelExpander::default();
        let mut one = exact.clone();
        expander.add_edge_mismatch_counts(&mut one, 1).unwrap();
        let mut two = exact.clone();
        expander.add_edge_mismatch_counts(&mut two, 2).unwrap();
        assert!(one.nb_keys() >= exact.nb_keys());
        assert!(two.nb_keys() >= one.nb_keys());
        for orbit in 0..NB_ORBITS {
            for (k, info) in one.get_orbit(orbit).iter() {
                let i2 = two.get_orbit(orbit).get(k).unwrap();
                assert_eq!(i2.get_exact_matches(), info.get_exact_matches());
                assert!(i2.get_mismatches() >= info.get_mismatches());
            }
        }
    }
} // end of mod tests
