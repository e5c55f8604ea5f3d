//! Label similarity table used to weight vertex label substitutions.
//!
//! Scores are stored under upper-cased label pairs, so lookups are case insensitive.
//! The table is not assumed symmetric: (a,b) and (b,a) are distinct entries.

use ahash::RandomState;
use anyhow::anyhow;
use std::collections::HashMap;

use crate::graphlet::key::Label;

/// minimal score for a substitution to be considered
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.5;

#[derive(Clone, Debug)]
pub struct SimilarityTable {
    scores: HashMap<(Label, Label), f32, RandomState>,
    threshold: f32,
}

impl SimilarityTable {
    pub fn new(threshold: f32) -> Self {
        SimilarityTable { scores: HashMap::<(Label, Label), f32, RandomState>::default(), threshold }
    }

    /// every ordered pair of labels, identical ones included, has score 1.
    pub fn uniform(labels: &[Label], threshold: f32) -> Self {
        let mut table = SimilarityTable::new(threshold);
        for &a in labels {
            for &b in labels {
                table.insert(a, b, 1.);
            }
        }
        table
    }

    /// Inserts the score of (a,b) if the pair is not already present. Returns true if inserted.
    pub fn insert(&mut self, a: Label, b: Label, score: f32) -> bool {
        let key = (a.to_ascii_uppercase(), b.to_ascii_uppercase());
        if self.scores.contains_key(&key) {
            return false;
        }
        self.scores.insert(key, score);
        true
    }

    pub fn get(&self, a: Label, b: Label) -> Option<f32> {
        self.scores.get(&(a.to_ascii_uppercase(), b.to_ascii_uppercase())).copied()
    }

    /// score of (a,b), 0 if the pair is absent
    pub fn score_or_zero(&self, a: Label, b: Label) -> f32 {
        self.get(a, b).unwrap_or(0.)
    }

    /// score of (a,b), error if the pair is absent
    pub fn require(&self, a: Label, b: Label) -> anyhow::Result<f32> {
        self.get(a, b).ok_or_else(|| {
            log::error!("no similarity score for pair ({}, {})", a as char, b as char);
            anyhow!("no similarity score for pair ({}, {})", a as char, b as char)
        })
    }

    /// true if score reaches the threshold
    pub fn accepts(&self, score: f32) -> bool {
        score >= self.threshold
    }

    pub fn get_threshold(&self) -> f32 {
        self.threshold
    }

    pub fn set_threshold(&mut self, threshold: f32) {
        self.threshold = threshold;
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
} // end of impl SimilarityTable
