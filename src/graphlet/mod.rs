//! Rooted graphlets.
//!
//! A graphlet is a connected induced subgraph of 1 to 5 vertices containing a root vertex.
//! The position of the root in the graphlet shape defines its orbit, 74 orbits in all.
//! An occurrence is identified by its orbit and the canonical key of its labels.
//!
//! - [key] : packing of labels in a 64 bits key,
//! - [orbit] : orbit templates, automorphisms and canonical keys,
//! - [transition] : orbits reached by inserting or deleting an edge,
//! - [counts] : occurrence counts of a root,
//! - [enumerate] : enumeration of the graphlets of a root.

pub mod counts;
pub mod enumerate;
pub mod key;
pub mod orbit;
pub mod transition;
