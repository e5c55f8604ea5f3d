//! Approximate matching of graphlets.
//!
//! Exact occurrence counts are extended in two ways:
//! - vertex label substitutions weighted by a label similarity table, see [label],
//! - edge insertions and deletions walking the orbit transition table, see [indel].

use anyhow::anyhow;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::graphlet::key::{is_encodable, Label};

pub mod indel;
pub mod label;
pub mod neighborhood;
pub mod similarity;

/// the 20 amino acid residues
pub const AMINO_ACIDS: &str = "ACDEFGHIKLMNPQRSTVWY";

/// Labels that can be substituted at arm positions and at the root.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabelAlphabet {
    alphabet: Vec<Label>,
    root_alphabet: Vec<Label>,
}

impl LabelAlphabet {
    /// Duplicated labels are removed keeping the first occurrence.
    pub fn new(alphabet: &str, root_alphabet: &str) -> anyhow::Result<Self> {
        Ok(LabelAlphabet { alphabet: to_labels(alphabet)?, root_alphabet: to_labels(root_alphabet)? })
    }

    /// same alphabet for root and arms
    pub fn symmetric(alphabet: &str) -> anyhow::Result<Self> {
        LabelAlphabet::new(alphabet, alphabet)
    }

    pub fn get_alphabet(&self) -> &[Label] {
        &self.alphabet
    }

    pub fn get_root_alphabet(&self) -> &[Label] {
        &self.root_alphabet
    }

    pub fn is_empty(&self) -> bool {
        self.alphabet.is_empty() || self.root_alphabet.is_empty()
    }

    /// all labels of both alphabets
    pub fn all_labels(&self) -> Vec<Label> {
        let set: IndexSet<Label> = self.alphabet.iter().chain(self.root_alphabet.iter()).cloned().collect();
        set.into_iter().collect()
    }
} // end of impl LabelAlphabet

impl Default for LabelAlphabet {
    fn default() -> Self {
        let labels: Vec<Label> = AMINO_ACIDS.bytes().collect();
        LabelAlphabet { alphabet: labels.clone(), root_alphabet: labels }
    }
}

fn to_labels(s: &str) -> anyhow::Result<Vec<Label>> {
    let set: IndexSet<Label> = s.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
    if let Some(l) = set.iter().find(|l| !is_encodable(**l)) {
        log::error!("alphabet label {:?} cannot be encoded", *l as char);
        return Err(anyhow!("alphabet label {:?} cannot be encoded", *l as char));
    }
    Ok(set.into_iter().collect())
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn alphabet_dedup() {
        let a = LabelAlphabet::new("ABBA C", "A").unwrap();
        assert_eq!(a.get_alphabet(), b"ABC");
        assert_eq!(a.get_root_alphabet(), b"A");
        assert_eq!(a.all_labels(), b"ABC".to_vec());
        assert!(LabelAlphabet::symmetric("A-B").is_err());
        assert_eq!(LabelAlphabet::default().get_alphabet().len(), 20);
        assert!(LabelAlphabet::new("", "A").unwrap().is_empty());
    }
}
