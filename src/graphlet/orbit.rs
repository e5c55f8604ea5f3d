//! Orbit taxonomy and canonicalizer.
//!
//! A rooted graphlet has its root at position 0 and its other vertices (the arms) at positions 1 to 4.
//! Each of the 74 orbits is described by its edge list over positions. From these lists we derive once:
//! - the automorphism group of each orbit: the permutations of arm positions that keep the edge set,
//! - a classification table mapping any connected adjacency pattern of up to 5 vertices to its orbit
//!   and to the position of each vertex in the orbit template.
//!
//! The canonical key of an occurrence is the smallest key among the images of its arm labels
//! under the automorphism group, so two occurrences of the same shape and labels get the same key.
//!
//! Orbits are grouped by graphlet size : {0} 1 vertex, {1} 2 vertices, {2..4} 3 vertices,
//! {5..15} 4 vertices, {16..73} 5 vertices.

use anyhow::anyhow;
use std::ops::Range;

use super::key::*;

/// orbit identifier 0..73
pub type OrbitId = usize;

/// number of orbits
pub const NB_ORBITS: usize = 74;

/// largest graphlet size
pub const MAX_GRAPHLET_SIZE: usize = 5;

/// number of vertex pairs in a 5-vertex graphlet
pub const NB_PAIRS: usize = 10;

// Edge lists of the orbit templates over positions, root is 0.
static ORBIT_EDGES: [&[(u8, u8)]; NB_ORBITS] = [
    /*  0 */ &[],
    /*  1 */ &[(0, 1)],
    /*  2 */ &[(0, 1), (1, 2)],
    /*  3 */ &[(0, 1), (0, 2)],
    /*  4 */ &[(0, 1), (0, 2), (1, 2)],
    /*  5 */ &[(0, 1), (1, 2), (2, 3)],
    /*  6 */ &[(0, 1), (0, 2), (2, 3)],
    /*  7 */ &[(0, 1), (1, 2), (1, 3)],
    /*  8 */ &[(0, 1), (0, 2), (0, 3)],
    /*  9 */ &[(0, 1), (1, 2), (1, 3), (2, 3)],
    /* 10 */ &[(0, 1), (0, 2), (0, 3), (2, 3)],
    /* 11 */ &[(0, 1), (0, 2), (1, 2), (2, 3)],
    /* 12 */ &[(0, 1), (0, 2), (1, 3), (2, 3)],
    /* 13 */ &[(0, 1), (0, 2), (1, 2), (1, 3), (2, 3)],
    /* 14 */ &[(0, 1), (0, 2), (0, 3), (1, 3), (2, 3)],
    /* 15 */ &[(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)],
    /* 16 */ &[(0, 1), (0, 2), (0, 3), (0, 4)],
    /* 17 */ &[(0, 1), (0, 2), (0, 3), (0, 4), (3, 4)],
    /* 18 */ &[(0, 1), (0, 2), (0, 3), (0, 4), (1, 2), (3, 4)],
    /* 19 */ &[(0, 1), (0, 2), (0, 3), (0, 4), (2, 4), (3, 4)],
    /* 20 */ &[(0, 1), (0, 2), (0, 3), (0, 4), (1, 2), (1, 3), (2, 4)],
    /* 21 */ &[(0, 1), (0, 2), (0, 3), (0, 4), (2, 3), (2, 4), (3, 4)],
    /* 22 */ &[(0, 1), (0, 2), (0, 3), (0, 4), (1, 4), (2, 4), (3, 4)],
    /* 23 */ &[(0, 1), (0, 2), (0, 3), (0, 4), (1, 3), (1, 4), (2, 3), (2, 4)],
    /* 24 */ &[(0, 1), (0, 2), (0, 3), (0, 4), (1, 4), (2, 3), (2, 4), (3, 4)],
    /* 25 */ &[(0, 1), (0, 2), (0, 3), (0, 4), (1, 2), (1, 3), (1, 4), (2, 3), (2, 4)],
    /* 26 */ &[(0, 1), (0, 2), (0, 3), (0, 4), (1, 2), (1, 3), (1, 4), (2, 3), (2, 4), (3, 4)],
    /* 27 */ &[(0, 1), (0, 2), (1, 3), (2, 4)],
    /* 28 */ &[(0, 1), (0, 2), (1, 2), (1, 3), (2, 4)],
    /* 29 */ &[(0, 1), (0, 2), (1, 3), (2, 4), (3, 4)],
    /* 30 */ &[(0, 1), (0, 2), (1, 4), (2, 3), (2, 4)],
    /* 31 */ &[(0, 1), (0, 2), (1, 2), (1, 3), (2, 4), (3, 4)],
    /* 32 */ &[(0, 1), (0, 2), (1, 2), (1, 4), (2, 3), (2, 4)],
    /* 33 */ &[(0, 1), (0, 2), (1, 4), (2, 3), (2, 4), (3, 4)],
    /* 34 */ &[(0, 1), (0, 2), (1, 3), (1, 4), (2, 3), (2, 4)],
    /* 35 */ &[(0, 1), (0, 2), (1, 3), (1, 4), (2, 3), (2, 4), (3, 4)],
    /* 36 */ &[(0, 1), (0, 2), (1, 2), (1, 3), (1, 4), (2, 3), (2, 4)],
    /* 37 */ &[(0, 1), (0, 2), (1, 2), (1, 4), (2, 3), (2, 4), (3, 4)],
    /* 38 */ &[(0, 1), (0, 2), (1, 2), (1, 3), (1, 4), (2, 3), (2, 4), (3, 4)],
    /* 39 */ &[(0, 1), (0, 2), (2, 3), (2, 4)],
    /* 40 */ &[(0, 1), (0, 2), (2, 3), (2, 4), (3, 4)],
    /* 41 */ &[(0, 1), (0, 2), (1, 2), (2, 3), (2, 4)],
    /* 42 */ &[(0, 1), (0, 2), (1, 2), (2, 3), (2, 4), (3, 4)],
    /* 43 */ &[(0, 1), (0, 2), (0, 3), (3, 4)],
    /* 44 */ &[(0, 1), (0, 2), (0, 3), (1, 2), (3, 4)],
    /* 45 */ &[(0, 1), (0, 2), (0, 3), (2, 3), (3, 4)],
    /* 46 */ &[(0, 1), (0, 2), (0, 3), (2, 4), (3, 4)],
    /* 47 */ &[(0, 1), (0, 2), (0, 3), (1, 2), (2, 3), (3, 4)],
    /* 48 */ &[(0, 1), (0, 2), (0, 3), (1, 2), (2, 4), (3, 4)],
    /* 49 */ &[(0, 1), (0, 2), (0, 3), (1, 3), (2, 3), (3, 4)],
    /* 50 */ &[(0, 1), (0, 2), (0, 3), (2, 3), (2, 4), (3, 4)],
    /* 51 */ &[(0, 1), (0, 2), (0, 3), (1, 4), (2, 4), (3, 4)],
    /* 52 */ &[(0, 1), (0, 2), (0, 3), (1, 4), (2, 3), (2, 4), (3, 4)],
    /* 53 */ &[(0, 1), (0, 2), (0, 3), (1, 2), (2, 3), (2, 4), (3, 4)],
    /* 54 */ &[(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3), (3, 4)],
    /* 55 */ &[(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 4), (3, 4)],
    /* 56 */ &[(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (1, 4), (2, 4), (3, 4)],
    /* 57 */ &[(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3), (2, 4), (3, 4)],
    /* 58 */ &[(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (1, 4), (2, 3), (2, 4), (3, 4)],
    /* 59 */ &[(0, 1), (1, 2), (1, 3), (1, 4)],
    /* 60 */ &[(0, 1), (1, 2), (1, 3), (1, 4), (3, 4)],
    /* 61 */ &[(0, 1), (1, 2), (1, 3), (1, 4), (2, 3), (2, 4)],
    /* 62 */ &[(0, 1), (1, 2), (1, 3), (1, 4), (2, 3), (2, 4), (3, 4)],
    /* 63 */ &[(0, 1), (0, 2), (2, 3), (3, 4)],
    /* 64 */ &[(0, 1), (0, 2), (1, 2), (2, 3), (3, 4)],
    /* 65 */ &[(0, 1), (0, 2), (1, 3), (2, 3), (3, 4)],
    /* 66 */ &[(0, 1), (0, 2), (1, 2), (1, 3), (2, 3), (3, 4)],
    /* 67 */ &[(0, 1), (1, 2), (1, 3), (3, 4)],
    /* 68 */ &[(0, 1), (1, 2), (1, 3), (2, 4), (3, 4)],
    /* 69 */ &[(0, 1), (1, 2), (1, 3), (2, 3), (3, 4)],
    /* 70 */ &[(0, 1), (1, 2), (1, 3), (2, 3), (2, 4), (3, 4)],
    /* 71 */ &[(0, 1), (1, 2), (2, 3), (2, 4)],
    /* 72 */ &[(0, 1), (1, 2), (2, 3), (2, 4), (3, 4)],
    /* 73 */ &[(0, 1), (1, 2), (2, 3), (3, 4)],
];

/// graphlet size (number of vertices including root) of an orbit
pub fn graphlet_size(orbit: OrbitId) -> usize {
    match orbit {
        0 => 1,
        1 => 2,
        2..=4 => 3,
        5..=15 => 4,
        _ => 5,
    }
}

/// range of orbits of graphlets of a given size
pub fn orbit_range(size: usize) -> Range<OrbitId> {
    match size {
        1 => 0..1,
        2 => 1..2,
        3 => 2..5,
        4 => 5..16,
        5 => 16..NB_ORBITS,
        _ => 0..0,
    }
}

/// Number of vertices of a graphlet of this orbit allowed to carry a label substitution
/// when a fraction `fraction` of vertices may be substituted: floor(size * fraction).
pub fn set_k(orbit: OrbitId, fraction: f32) -> anyhow::Result<usize> {
    if !(0. ..=1.).contains(&fraction) {
        log::error!("label mismatch fraction must be in [0,1], got {}", fraction);
        return Err(anyhow!("label mismatch fraction must be in [0,1], got {}", fraction));
    }
    if orbit >= NB_ORBITS {
        return Err(anyhow!("unsupported orbit id {}", orbit));
    }
    Ok((graphlet_size(orbit) as f32 * fraction).floor() as usize)
}

/// index of the pair of positions (a,b), a < b < 5, in an adjacency mask
#[inline]
pub fn pair_index(a: usize, b: usize) -> usize {
    debug_assert!(a < b && b < MAX_GRAPHLET_SIZE);
    // rows : 0 -> 0..4, 1 -> 4..7, 2 -> 7..9, 3 -> 9
    const ROW_START: [usize; 4] = [0, 4, 7, 9];
    ROW_START[a] + (b - a - 1)
}

/// A position permutation, entry i is the image of position i. Entry 0 is always 0.
pub type Placement = [u8; MAX_GRAPHLET_SIZE];

/// Static description of one orbit.
#[derive(Clone, Debug)]
pub struct OrbitSpec {
    id: OrbitId,
    size: usize,
    edges: &'static [(u8, u8)],
    /// bit pair_index(a,b) set if positions a and b are linked
    mask: u16,
    /// permutations of arm positions preserving edges, identity first
    automorphisms: Vec<Placement>,
}

impl OrbitSpec {
    fn new(id: OrbitId) -> Self {
        let size = graphlet_size(id);
        let edges = ORBIT_EDGES[id];
        let mut mask = 0u16;
        for &(a, b) in edges {
            mask |= 1 << pair_index(a as usize, b as usize);
        }
        let automorphisms = arm_permutations(size)
            .into_iter()
            .filter(|p| permuted_mask(mask, p, size) == mask)
            .collect();
        OrbitSpec { id, size, edges, mask, automorphisms }
    }

    pub fn get_id(&self) -> OrbitId {
        self.id
    }

    /// number of vertices including root
    pub fn get_size(&self) -> usize {
        self.size
    }

    /// number of arms
    pub fn get_arity(&self) -> usize {
        self.size - 1
    }

    pub fn get_edges(&self) -> &'static [(u8, u8)] {
        self.edges
    }

    pub fn get_mask(&self) -> u16 {
        self.mask
    }

    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        let (a, b) = if a < b { (a, b) } else { (b, a) };
        a != b && self.mask & (1 << pair_index(a, b)) != 0
    }

    pub fn get_automorphisms(&self) -> &[Placement] {
        &self.automorphisms
    }
} // end of impl OrbitSpec

/// Result of the classification of a vertex set: its orbit and the template position of each vertex.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Classification {
    pub orbit: OrbitId,
    /// positions[i] is the template position of the i-th vertex of the classified set
    pub positions: Placement,
}

/// The 74 orbits with their automorphism groups and the classification of adjacency patterns.
pub struct Taxonomy {
    specs: Vec<OrbitSpec>,
    /// classes[size][mask]
    classes: Vec<Vec<Option<Classification>>>,
}

lazy_static! {
    static ref TAXONOMY: Taxonomy = Taxonomy::build();
}

/// access to the (unique) taxonomy
pub fn taxonomy() -> &'static Taxonomy {
    &TAXONOMY
}

impl Taxonomy {
    fn build() -> Self {
        let specs: Vec<OrbitSpec> = (0..NB_ORBITS).map(OrbitSpec::new).collect();
        // indexed by size then by full 10 bit mask
        let mut classes: Vec<Vec<Option<Classification>>> = vec![vec![None; 1 << NB_PAIRS]; MAX_GRAPHLET_SIZE + 1];
        for spec in &specs {
            let size = spec.size;
            for p in arm_permutations(size) {
                // vertex i of the input set sits at template position p[i]
                let input_mask = permuted_mask_inverse(spec.mask, &p, size);
                let slot = &mut classes[size][input_mask as usize];
                if slot.is_none() {
                    *slot = Some(Classification { orbit: spec.id, positions: p });
                }
            }
        }
        log::debug!("orbit taxonomy built");
        Taxonomy { specs, classes }
    }

    /// spec of an orbit, error if orbit id out of range
    pub fn get_spec(&self, orbit: OrbitId) -> anyhow::Result<&OrbitSpec> {
        self.specs.get(orbit).ok_or_else(|| {
            log::error!("unsupported orbit id {}", orbit);
            anyhow!("unsupported orbit id {}", orbit)
        })
    }

    pub fn get_specs(&self) -> &[OrbitSpec] {
        &self.specs
    }

    /// Classify a vertex set of `size` vertices (vertex 0 being the root) given its adjacency mask
    /// built with [pair_index]. Returns None if the pattern is not connected.
    pub fn classify(&self, size: usize, mask: u16) -> Option<&Classification> {
        if size == 0 || size > MAX_GRAPHLET_SIZE {
            return None;
        }
        self.classes[size][mask as usize].as_ref()
    }

    /// canonical key of an occurrence of orbit with root label and arm labels in template positions.
    pub fn canonical_key(&self, orbit: OrbitId, root: Label, arms: &[Label]) -> anyhow::Result<Key> {
        let spec = self.check_arity(orbit, arms)?;
        let mut best = Key::encode(root, arms);
        let mut image = [ZERO_LABEL; MAX_GRAPHLET_SIZE - 1];
        for aut in spec.automorphisms.iter().skip(1) {
            for i in 1..spec.size {
                image[aut[i] as usize - 1] = arms[i - 1];
            }
            let key = Key::encode(root, &image[..spec.size - 1]);
            if key < best {
                best = key;
            }
        }
        Ok(best)
    }

    /// Canonical key and the sorted list of all keys equivalent to it under the orbit automorphisms.
    pub fn canonicalize(&self, orbit: OrbitId, root: Label, arms: &[Label]) -> anyhow::Result<(Key, Vec<Key>)> {
        let spec = self.check_arity(orbit, arms)?;
        let mut equivalents = Vec::<Key>::with_capacity(spec.automorphisms.len());
        let mut image = [ZERO_LABEL; MAX_GRAPHLET_SIZE - 1];
        for aut in spec.automorphisms.iter() {
            for i in 1..spec.size {
                image[aut[i] as usize - 1] = arms[i - 1];
            }
            equivalents.push(Key::encode(root, &image[..spec.size - 1]));
        }
        equivalents.sort_unstable();
        equivalents.dedup();
        Ok((equivalents[0], equivalents))
    }

    /// recanonicalize a packed key of an orbit
    pub fn canonicalize_key(&self, orbit: OrbitId, key: Key) -> anyhow::Result<(Key, Vec<Key>)> {
        let size = self.get_spec(orbit)?.size;
        let labels = key.decode();
        self.canonicalize(orbit, labels[0], &labels[1..size])
    }

    fn check_arity(&self, orbit: OrbitId, arms: &[Label]) -> anyhow::Result<&OrbitSpec> {
        let spec = self.get_spec(orbit)?;
        if arms.len() != spec.get_arity() {
            log::error!("orbit {} expects {} arms, got {}", orbit, spec.get_arity(), arms.len());
            return Err(anyhow!("orbit {} expects {} arms, got {}", orbit, spec.get_arity(), arms.len()));
        }
        Ok(spec)
    }
} // end of impl Taxonomy

// all permutations of positions 1..size, position 0 fixed. Identity comes first.
fn arm_permutations(size: usize) -> Vec<Placement> {
    fn extend(prefix: &mut Vec<u8>, size: usize, res: &mut Vec<Placement>) {
        if prefix.len() == size {
            let mut p = [0u8; MAX_GRAPHLET_SIZE];
            for (i, v) in prefix.iter().enumerate() {
                p[i] = *v;
            }
            res.push(p);
            return;
        }
        for v in 1..size as u8 {
            if !prefix.contains(&v) {
                prefix.push(v);
                extend(prefix, size, res);
                prefix.pop();
            }
        }
    }
    let mut res = Vec::new();
    let mut prefix = vec![0u8];
    extend(&mut prefix, size.max(1), &mut res);
    res
}

// mask of the images of edges of mask under p
fn permuted_mask(mask: u16, p: &Placement, size: usize) -> u16 {
    let mut res = 0u16;
    for a in 0..size {
        for b in a + 1..size {
            if mask & (1 << pair_index(a, b)) != 0 {
                let (x, y) = (p[a] as usize, p[b] as usize);
                let (x, y) = if x < y { (x, y) } else { (y, x) };
                res |= 1 << pair_index(x, y);
            }
        }
    }
    res
}

// mask over input vertices when input vertex i sits at template position p[i]
fn permuted_mask_inverse(template_mask: u16, p: &Placement, size: usize) -> u16 {
    let mut res = 0u16;
    for i in 0..size {
        for j in i + 1..size {
            let (x, y) = (p[i] as usize, p[j] as usize);
            let (x, y) = if x < y { (x, y) } else { (y, x) };
            if template_mask & (1 << pair_index(x, y)) != 0 {
                res |= 1 << pair_index(i, j);
            }
        }
    }
    res
}

//========================================================================================

// end of mod tests
