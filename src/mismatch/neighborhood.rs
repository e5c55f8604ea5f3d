//! Memoized label mismatch neighbourhoods.
//!
//! The neighbourhood of a key only depends on its orbit, the number of substitutions, the alphabets
//! and the similarity table, so it can be shared between roots processed in parallel.
//! The cache is owned by the caller which decides when to clear it.

use ahash::RandomState;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::graphlet::key::Key;
use crate::graphlet::orbit::OrbitId;

type NeighborhoodId = (OrbitId, usize, Key);

#[derive(Default)]
pub struct NeighborhoodCache {
    neighborhoods: RwLock<HashMap<NeighborhoodId, Arc<Vec<Key>>, RandomState>>,
}

impl NeighborhoodCache {
    pub fn new() -> Self {
        NeighborhoodCache::default()
    }

    /// Returns the cached neighbourhood of (orbit, vlm, key) or computes and stores it.
    /// The computation runs without holding the lock, a concurrent insertion of the same entry wins.
    pub fn get_or_compute<F>(&self, orbit: OrbitId, vlm: usize, key: Key, f: F) -> anyhow::Result<Arc<Vec<Key>>>
    where
        F: FnOnce() -> anyhow::Result<Vec<Key>>,
    {
        let id = (orbit, vlm, key);
        if let Some(n) = self.neighborhoods.read().get(&id) {
            return Ok(n.clone());
        }
        let computed = Arc::new(f()?);
        let mut map = self.neighborhoods.write();
        Ok(map.entry(id).or_insert(computed).clone())
    }

    pub fn len(&self) -> usize {
        self.neighborhoods.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighborhoods.read().is_empty()
    }

    pub fn clear(&self) {
        self.neighborhoods.write().clear();
    }
} // end of impl NeighborhoodCache
