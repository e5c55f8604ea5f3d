//! Kernel value between two roots as a join of their occurrence maps.
//!
//! For each enabled orbit, the product of the counts of the keys present in both maps is summed.
//! With normalization the normalized counts are used, see [OrbitCounts::normalize_spectral].

use crate::graphlet::counts::*;
use crate::graphlet::enumerate::GraphletSizes;

/// sum over keys common to a and b of count(a) * count(b)
pub fn distance_hash_join(a: &OrbitCounts, b: &OrbitCounts, normalized: bool) -> f32 {
    // iterate on the smaller map
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let mut sum = 0f32;
    for (key, info) in small.iter() {
        if let Some(other) = large.get(key) {
            if normalized {
                sum += info.get_normalized() * other.get_normalized();
            } else {
                sum += info.count() * other.count();
            }
        }
    }
    sum
}

/// sum of the joins over enabled orbits
pub fn kernel_value(a: &GraphletCounts, b: &GraphletCounts, sizes: &GraphletSizes, normalized: bool) -> f32 {
    sizes
        .enabled_orbits()
        .map(|o| distance_hash_join(a.get_orbit(o), b.get_orbit(o), normalized))
        .sum()
}

/// normalization of each enabled orbit
pub fn normalize(counts: &mut GraphletCounts, sizes: &GraphletSizes) {
    for orbit_counts in counts.get_orbits_mut() {
        if sizes.is_orbit_enabled(orbit_counts.get_orbit()) {
            orbit_counts.normalize_spectral();
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::graph::SimpleGraph;
    use crate::graphlet::enumerate::*;
    use crate::graphlet::key::Key;

    #[test]
    fn join_on_common_keys() {
        let mut a = OrbitCounts::new(1);
        let mut b = OrbitCounts::new(1);
        let k1 = Key::encode(b'A', b"A");
        let k2 = Key::encode(b'A', b"B");
        let k3 = Key::encode(b'A', b"C");
        a.add_mismatches(k1, 2.).unwrap();
        a.add_mismatches(k2, 3.).unwrap();
        b.add_mismatches(k2, 4.).unwrap();
        b.add_mismatches(k3, 5.).unwrap();
        assert_eq!(distance_hash_join(&a, &b, false), 12.);
        assert_eq!(distance_hash_join(&b, &a, false), 12.);
        a.normalize_spectral();
        b.normalize_spectral();
        let cos = distance_hash_join(&a, &b, true);
        assert!((cos - 12. / (13f32.sqrt() * 41f32.sqrt())).abs() < 1.0e-5);
    }

    #[test]
    fn normalized_self_kernel() {
        let g = SimpleGraph::new(b"ABCAB".to_vec(), &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 0), (1, 3)]).unwrap();
        let sizes = GraphletSizes::default();
        let mut c = enumerate(&g, 0, sizes).unwrap();
        let raw = kernel_value(&c, &c, &sizes, false);
        assert!(raw > 0.);
        normalize(&mut c, &sizes);
        // each non empty orbit contributes 1
        let nb_orbits = c.get_orbits().iter().filter(|o| !o.is_empty()).count() as f32;
        assert!((kernel_value(&c, &c, &sizes, true) - nb_orbits).abs() < 1.0e-4);
    }
}
