//! Response payloads that are not plain entities.
//!
//! Entities (`Tree`, `TreeNode`, ...) are serialized bare; the types here
//! cover the composite results of a few endpoints.

use arbor_core::forest::{ForestStats, NestedNode};
use arbor_core::tree::Tree;
use arbor_core::types::DbId;
use serde::Serialize;

/// A tree with its nodes assembled into nested form.
#[derive(Debug, Serialize)]
pub struct TreeStructure {
    pub tree: Tree,
    pub nodes: Vec<NestedNode>,
    pub stats: ForestStats,
}

/// Result of a cascading node delete, descendants first.
#[derive(Debug, Serialize)]
pub struct DeletedNodes {
    pub deleted_ids: Vec<DbId>,
}
