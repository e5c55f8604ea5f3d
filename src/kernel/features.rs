//! Sparse feature vector of a root : one feature per (orbit, key), identified by [Key::feature_id].

use crate::graphlet::counts::GraphletCounts;
use crate::graphlet::enumerate::GraphletSizes;
use crate::graphlet::key::Key;

/// (feature id, value) sorted by feature id
pub type FeatureVector = Vec<(u64, f32)>;

/// Features of the enabled orbits. Values are normalized counts if normalized is set.
/// With positive_only, null values are skipped.
pub fn feature_vector(counts: &GraphletCounts, sizes: &GraphletSizes, normalized: bool, positive_only: bool) -> FeatureVector {
    let mut features = FeatureVector::new();
    for orbit in sizes.enabled_orbits() {
        for (key, info) in counts.get_orbit(orbit).iter() {
            let value = if normalized { info.get_normalized() } else { info.count() };
            if positive_only && value <= 0. {
                continue;
            }
            features.push((key.feature_id(orbit), value));
        }
    }
    features.sort_unstable_by_key(|f| f.0);
    features
}

/// (orbit, key) of a feature id
pub fn decode_feature(fid: u64) -> (usize, Key) {
    let (key, orbit) = Key::from_feature_id(fid);
    (orbit, key)
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn sorted_features() {
        let mut counts = GraphletCounts::new(0);
        let k1 = Key::encode(b'B', b"A");
        let k2 = Key::encode(b'A', b"AB");
        counts.get_orbit_mut(1).increment_match(k1).unwrap();
        counts.get_orbit_mut(3).increment_match(k2).unwrap();
        counts.get_orbit_mut(2).insert_zero(k2).unwrap();
        let sizes = GraphletSizes::default();
        let all = feature_vector(&counts, &sizes, false, false);
        assert_eq!(all.len(), 3);
        assert!(all.windows(2).all(|w| w[0].0 < w[1].0));
        let positive = feature_vector(&counts, &sizes, false, true);
        assert_eq!(positive.len(), 2);
        for (fid, v) in positive {
            let (orbit, key) = decode_feature(fid);
            assert_eq!(counts.get_orbit(orbit).retrieve_count(&key), v);
        }
    }
}
