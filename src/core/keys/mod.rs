//! Resource key assignment and the nested resource tree.

pub mod assigner;
pub mod resource_tree;

pub use assigner::{Assignment, KeyAssigner, KeyEntry, UnassignedOccurrence, text_hash};
pub use resource_tree::{KeyConflict, ResourceTree};
