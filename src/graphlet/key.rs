//! Bit packed encoding of the labels of a rooted graphlet.
//!
//! A key stores the root label in the most significant field followed by the labels of arms 1 to 4.
//! Each field is [LABEL_BITS] wide and holds `label - ZERO_LABEL`, so the unused arm positions of
//! small graphlets hold 0.
//!
//! A sparse feature identifier appends the orbit on [ORBIT_BITS] bits, see [Key::feature_id].

use std::fmt;

use serde::{Deserialize, Serialize};

/// a vertex label is an ascii character
pub type Label = u8;

/// label value used as offset and as filler for unused arm positions
pub const ZERO_LABEL: Label = b'0';

/// number of bits of a label field
pub const LABEL_BITS: u32 = 7;

/// number of bits used to encode an orbit in a feature id
pub const ORBIT_BITS: u32 = 7;

/// number of label fields, root then 4 arms
pub const KEY_FIELDS: usize = 5;

const LABEL_MASK: u64 = (1 << LABEL_BITS) - 1;

/// largest label the codec can hold
pub const MAX_LABEL: u32 = ZERO_LABEL as u32 + LABEL_MASK as u32;

/// returns true if label fits in a key field
pub fn is_encodable(label: Label) -> bool {
    label >= ZERO_LABEL && (label as u32) <= MAX_LABEL
}

/// The packed labels of a graphlet, root most significant.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Key(u64);

impl Key {
    /// key with all fields set to [ZERO_LABEL]
    pub const ZERO: Key = Key(0);

    /// packs root and arms. Arms beyond the slice length are filled with [ZERO_LABEL].
    pub fn encode(root: Label, arms: &[Label]) -> Key {
        debug_assert!(arms.len() < KEY_FIELDS);
        let mut key = field(root);
        for i in 0..KEY_FIELDS - 1 {
            let label = if i < arms.len() { arms[i] } else { ZERO_LABEL };
            key = (key << LABEL_BITS) | field(label);
        }
        Key(key)
    }

    /// packs a full tuple (root, arm1 ..arm4)
    pub fn from_labels(labels: &[Label; KEY_FIELDS]) -> Key {
        Key::encode(labels[0], &labels[1..])
    }

    /// unpacks root and 4 arms
    pub fn decode(&self) -> [Label; KEY_FIELDS] {
        let mut labels = [ZERO_LABEL; KEY_FIELDS];
        let mut key = self.0;
        for i in (0..KEY_FIELDS).rev() {
            labels[i] = ZERO_LABEL + (key & LABEL_MASK) as u8;
            key >>= LABEL_BITS;
        }
        labels
    }

    /// label at position pos, 0 is the root
    pub fn get_label(&self, pos: usize) -> Label {
        let shift = (KEY_FIELDS - 1 - pos) as u32 * LABEL_BITS;
        ZERO_LABEL + ((self.0 >> shift) & LABEL_MASK) as u8
    }

    /// root label
    pub fn get_root(&self) -> Label {
        self.get_label(0)
    }

    /// returns a key with label at position pos replaced
    pub fn with_label(&self, pos: usize, label: Label) -> Key {
        let shift = (KEY_FIELDS - 1 - pos) as u32 * LABEL_BITS;
        Key((self.0 & !(LABEL_MASK << shift)) | (field(label) << shift))
    }

    /// raw packed value
    pub fn get_value(&self) -> u64 {
        self.0
    }

    /// rebuild from a raw value as found in dumps
    pub fn from_value(value: u64) -> Key {
        Key(value)
    }

    /// sparse feature identifier: key shifted left of the orbit bits, orbit in the low bits.
    pub fn feature_id(&self, orbit: usize) -> u64 {
        debug_assert!((orbit as u64) < (1 << ORBIT_BITS));
        (self.0 << ORBIT_BITS) | orbit as u64
    }

    /// inverse of feature_id
    pub fn from_feature_id(fid: u64) -> (Key, usize) {
        (Key(fid >> ORBIT_BITS), (fid & ((1 << ORBIT_BITS) - 1)) as usize)
    }
} // end of impl Key

#[inline]
fn field(label: Label) -> u64 {
    debug_assert!(is_encodable(label), "label {} out of codec range", label);
    (label.wrapping_sub(ZERO_LABEL) as u64) & LABEL_MASK
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels = self.decode();
        write!(f, "{}:", labels[0] as char)?;
        for l in &labels[1..] {
            write!(f, "{}", *l as char)?;
        }
        Ok(())
    }
}

//========================================================================================

#[cfg(test)]
mod tests {

    use super::*;

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn codec_roundtrip_alphabet() {
        log_init_test();
        let alphabet = b"ACDEFGHIKLMNPQRSTVWYacgtu0";
        for (i, &r) in alphabet.iter().enumerate() {
            let a = alphabet[(i + 3) % alphabet.len()];
            let b = alphabet[(i + 7) % alphabet.len()];
            let c = alphabet[(i + 11) % alphabet.len()];
            let d = alphabet[(i + 13) % alphabet.len()];
            let key = Key::encode(r, &[a, b, c, d]);
            assert_eq!(key.decode(), [r, a, b, c, d]);
            assert_eq!(Key::from_labels(&[r, a, b, c, d]), key);
        }
    } // end of codec_roundtrip_alphabet

    #[test]
    fn unused_arms_are_zero() {
        log_init_test();
        let key = Key::encode(b'A', &[b'B']);
        let labels = key.decode();
        assert_eq!(labels, [b'A', b'B', ZERO_LABEL, ZERO_LABEL, ZERO_LABEL]);
        assert_eq!(key.get_label(2), ZERO_LABEL);
        assert_eq!(format!("{}", key), "A:B000");
    }

    #[test]
    fn root_most_significant() {
        log_init_test();
        // a larger root label gives a larger key whatever the arms
        let k1 = Key::encode(b'A', &[b'z', b'z', b'z', b'z']);
        let k2 = Key::encode(b'B', &[b'0', b'0', b'0', b'0']);
        assert!(k1 < k2);
        // arms compare lexicographically
        let k3 = Key::encode(b'A', &[b'B', b'Z']);
        let k4 = Key::encode(b'A', &[b'C', b'A']);
        assert!(k3 < k4);
    }

    #[test]
    fn label_replacement_and_feature_id() {
        log_init_test();
        let key = Key::encode(b'K', &[b'L', b'M', b'N']);
        let other = key.with_label(2, b'Q');
        assert_eq!(other.decode(), [b'K', b'L', b'Q', b'N', ZERO_LABEL]);
        assert_eq!(other.with_label(2, b'M'), key);
        //
        let fid = key.feature_id(73);
        assert_eq!(fid & 127, 73);
        assert_eq!(Key::from_feature_id(fid), (key, 73));
        assert_eq!(fid, (key.get_value() << 7) + 73);
    }

    #[test]
    fn encodable_range() {
        assert!(is_encodable(b'0'));
        assert!(is_encodable(b'z'));
        assert!(is_encodable(b'~'));
        assert!(!is_encodable(b' '));
        assert!(!is_encodable(b'-'));
    }
} // end of mod tests
