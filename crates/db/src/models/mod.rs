//! Row structs for the `trees` and `tree_nodes` tables.
//!
//! Each submodule contains a `FromRow` struct matching the table and the
//! conversion into the corresponding `arbor_core` entity.

pub mod tree;
pub mod tree_node;
