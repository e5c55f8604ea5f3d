//! Occurrence counts of a root vertex, per orbit and per canonical key.
//!
//! Each key carries a [MatchInfo]: exact matches found by the enumerator, mismatches added
//! by edge indels and the label mismatch weights accumulated on each key equivalent to it.
//! Keys are never removed from a map once inserted.

use anyhow::anyhow;
use std::collections::BTreeMap;

use super::key::*;
use super::orbit::*;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MatchInfo {
    exact_matches: f32,
    /// weight coming from edge insertions or deletions
    mismatches: f32,
    /// weight coming from label substitutions, per equivalent key
    mismatch_partners: BTreeMap<Key, f32>,
    /// count after normalization
    normalized: f32,
}

impl MatchInfo {
    /// entry with zero weights and the given equivalent keys as partners
    pub fn with_partners(partners: &[Key]) -> Self {
        MatchInfo {
            exact_matches: 0.,
            mismatches: 0.,
            mismatch_partners: partners.iter().map(|k| (*k, 0.)).collect(),
            normalized: 0.,
        }
    }

    pub fn get_exact_matches(&self) -> f32 {
        self.exact_matches
    }

    pub fn get_mismatches(&self) -> f32 {
        self.mismatches
    }

    pub fn get_partners(&self) -> &BTreeMap<Key, f32> {
        &self.mismatch_partners
    }

    pub fn get_normalized(&self) -> f32 {
        self.normalized
    }

    /// exact matches and edge mismatches
    pub fn edge_count(&self) -> f32 {
        self.exact_matches + self.mismatches
    }

    /// exact matches, edge mismatches and label mismatches
    pub fn count(&self) -> f32 {
        self.exact_matches + self.mismatches + self.mismatch_partners.values().sum::<f32>()
    }

    pub(crate) fn add_exact(&mut self, w: f32) {
        self.exact_matches += w;
    }

    pub(crate) fn add_mismatches(&mut self, w: f32) {
        self.mismatches += w;
    }

    /// adds weight to a declared partner, error if the partner is unknown
    pub(crate) fn add_partner_weight(&mut self, partner: Key, w: f32) -> anyhow::Result<()> {
        match self.mismatch_partners.get_mut(&partner) {
            Some(v) => {
                *v += w;
                Ok(())
            }
            None => Err(anyhow!("partner key {} not declared", partner)),
        }
    }
} // end of impl MatchInfo

/// Map canonical key -> MatchInfo for one orbit. Iteration is in ascending key order.
#[derive(Clone, Debug)]
pub struct OrbitCounts {
    orbit: OrbitId,
    map: BTreeMap<Key, MatchInfo>,
}

impl OrbitCounts {
    pub fn new(orbit: OrbitId) -> Self {
        OrbitCounts { orbit, map: BTreeMap::new() }
    }

    pub fn get_orbit(&self) -> OrbitId {
        self.orbit
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn contains(&self, key: &Key) -> bool {
        self.map.contains_key(key)
    }

    pub fn get(&self, key: &Key) -> Option<&MatchInfo> {
        self.map.get(key)
    }

    pub(crate) fn get_mut(&mut self, key: &Key) -> Option<&mut MatchInfo> {
        self.map.get_mut(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Key, &MatchInfo)> {
        self.map.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (&Key, &mut MatchInfo)> {
        self.map.iter_mut()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.map.keys()
    }

    /// full count of a key, 0 if absent
    pub fn retrieve_count(&self, key: &Key) -> f32 {
        self.map.get(key).map(|m| m.count()).unwrap_or(0.)
    }

    /// exact match count of a key, 0 if absent
    pub fn retrieve_exact_matches(&self, key: &Key) -> f32 {
        self.map.get(key).map(|m| m.exact_matches).unwrap_or(0.)
    }

    /// sum of exact matches over keys
    pub fn total_exact_matches(&self) -> f32 {
        self.map.values().map(|m| m.exact_matches).sum()
    }

    /// One more exact occurrence of a canonical key. A new entry gets its equivalent keys as partners.
    pub fn increment_match(&mut self, key: Key) -> anyhow::Result<()> {
        if let Some(info) = self.map.get_mut(&key) {
            info.exact_matches += 1.;
            return Ok(());
        }
        let (_, equivalents) = taxonomy().canonicalize_key(self.orbit, key)?;
        let mut info = MatchInfo::with_partners(&equivalents);
        info.exact_matches = 1.;
        self.map.insert(key, info);
        Ok(())
    }

    /// Insert a zero entry for a canonical key if absent. Returns true if inserted.
    pub fn insert_zero(&mut self, key: Key) -> anyhow::Result<bool> {
        if self.map.contains_key(&key) {
            return Ok(false);
        }
        let (_, equivalents) = taxonomy().canonicalize_key(self.orbit, key)?;
        self.map.insert(key, MatchInfo::with_partners(&equivalents));
        Ok(true)
    }

    /// Adds edge mismatch weight to key, creating the entry if needed.
    pub fn add_mismatches(&mut self, key: Key, w: f32) -> anyhow::Result<()> {
        if !self.map.contains_key(&key) {
            self.insert_zero(key)?;
        }
        if let Some(info) = self.map.get_mut(&key) {
            info.mismatches += w;
        }
        Ok(())
    }

    /// Moves entries of other absent from self into self. Entries present in both are left as they are.
    pub fn merge(&mut self, other: OrbitCounts) {
        for (key, info) in other.map {
            if self.map.contains_key(&key) {
                log::warn!("orbit {} merge, key {} already present", self.orbit, key);
                continue;
            }
            self.map.insert(key, info);
        }
    }

    /// L2 normalization of counts, stored in the normalized field of each entry.
    pub fn normalize_spectral(&mut self) {
        let norm = self.map.values().map(|m| m.count() * m.count()).sum::<f32>().sqrt();
        if norm <= 0. {
            return;
        }
        for info in self.map.values_mut() {
            info.normalized = info.count() / norm;
        }
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }
} // end of impl OrbitCounts

/// Occurrence counts of one root for all orbits.
#[derive(Clone, Debug)]
pub struct GraphletCounts {
    root: usize,
    orbits: Vec<OrbitCounts>,
}

impl GraphletCounts {
    pub fn new(root: usize) -> Self {
        GraphletCounts { root, orbits: (0..NB_ORBITS).map(OrbitCounts::new).collect() }
    }

    pub fn get_root(&self) -> usize {
        self.root
    }

    pub fn get_orbit(&self, orbit: OrbitId) -> &OrbitCounts {
        &self.orbits[orbit]
    }

    pub fn get_orbit_mut(&mut self, orbit: OrbitId) -> &mut OrbitCounts {
        &mut self.orbits[orbit]
    }

    pub fn get_orbits(&self) -> &[OrbitCounts] {
        &self.orbits
    }

    pub(crate) fn get_orbits_mut(&mut self) -> &mut [OrbitCounts] {
        &mut self.orbits
    }

    /// number of keys over all orbits
    pub fn nb_keys(&self) -> usize {
        self.orbits.iter().map(|o| o.len()).sum()
    }
} // end of impl GraphletCounts

//========================================================================================

#[cfg(test)]
mod tests {

    use super::*;

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn increment_declares_partners() {
        log_init_test();
        let mut counts = OrbitCounts::new(3);
        let key = taxonomy().canonical_key(3, b'A', b"CB").unwrap();
        counts.increment_match(key).unwrap();
        counts.increment_match(key).unwrap();
        let info = counts.get(&key).unwrap();
        assert_eq!(info.get_exact_matches(), 2.);
        assert_eq!(info.get_mismatches(), 0.);
        let partners: Vec<Key> = info.get_partners().keys().cloned().collect();
        assert_eq!(partners, vec![Key::encode(b'A', b"BC"), Key::encode(b'A', b"CB")]);
        assert_eq!(counts.total_exact_matches(), 2.);
    }

    #[test]
    fn counts_and_partners() {
        log_init_test();
        let mut counts = OrbitCounts::new(1);
        let key = Key::encode(b'A', b"B");
        assert!(counts.insert_zero(key).unwrap());
        assert!(!counts.insert_zero(key).unwrap());
        counts.add_mismatches(key, 2.).unwrap();
        let info = counts.get_mut(&key).unwrap();
        info.add_partner_weight(key, 0.5).unwrap();
        assert!(info.add_partner_weight(Key::encode(b'A', b"C"), 1.).is_err());
        assert_eq!(counts.retrieve_count(&key), 2.5);
        assert_eq!(counts.get(&key).unwrap().edge_count(), 2.);
        assert_eq!(counts.retrieve_count(&Key::encode(b'Z', b"Z")), 0.);
    }

    #[test]
    fn merge_keeps_existing() {
        log_init_test();
        let mut a = OrbitCounts::new(1);
        let mut b = OrbitCounts::new(1);
        let k1 = Key::encode(b'A', b"A");
        let k2 = Key::encode(b'A', b"B");
        a.increment_match(k1).unwrap();
        b.add_mismatches(k1, 3.).unwrap();
        b.add_mismatches(k2, 1.).unwrap();
        a.merge(b);
        assert_eq!(a.len(), 2);
        assert_eq!(a.retrieve_count(&k1), 1.);
        assert_eq!(a.retrieve_count(&k2), 1.);
    }

    #[test]
    fn spectral_normalization() {
        log_init_test();
        let mut a = OrbitCounts::new(1);
        let k1 = Key::encode(b'A', b"A");
        let k2 = Key::encode(b'A', b"B");
        a.add_mismatches(k1, 3.).unwrap();
        a.add_mismatches(k2, 4.).unwrap();
        a.normalize_spectral();
        assert!((a.get(&k1).unwrap().get_normalized() - 0.6).abs() < 1.0e-6);
        assert!((a.get(&k2).unwrap().get_normalized() - 0.8).abs() < 1.0e-6);
        // empty map stays untouched
        let mut e = OrbitCounts::new(2);
        e.normalize_spectral();
        assert!(e.is_empty());
    }
} // end of mod tests
