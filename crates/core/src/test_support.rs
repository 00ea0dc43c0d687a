//! In-memory repository used by the unit tests of the services.

use std::collections::BTreeMap;

use crate::node::TreeNode;
use crate::repository::{Repository, TreeNodeRepository, TreeRepository};
use crate::tree::Tree;
use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    #[error("row {0} does not exist")]
    MissingRow(DbId),
    #[error("injected failure deleting node {0}")]
    InjectedDeleteFailure(DbId),
}

/// Rows keyed by id. Listings come back in id order, like the Postgres
/// repository's tie-break.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub trees: BTreeMap<DbId, Tree>,
    pub nodes: BTreeMap<DbId, TreeNode>,
    next_id: DbId,
    /// Node id whose delete fails.
    pub fail_delete_of: Option<DbId>,
    /// Ids in the order `delete_node` was called.
    pub delete_log: Vec<DbId>,
    /// Number of `save_node` calls.
    pub node_writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }

    /// Insert an active tree and return its id.
    pub fn add_tree(&mut self, name: &str) -> DbId {
        let id = self.allocate_id();
        let mut tree = Tree::new(name, None);
        tree.id = Some(id);
        self.trees.insert(id, tree);
        id
    }

    /// Insert a simple node and return its id.
    pub fn add_node(&mut self, tree_id: DbId, parent_id: Option<DbId>, sort_order: i32) -> DbId {
        let id = self.allocate_id();
        let mut node = TreeNode::simple(tree_id, parent_id, format!("node-{id}"), sort_order);
        node.id = Some(id);
        self.nodes.insert(id, node);
        id
    }

    pub fn node(&self, id: DbId) -> &TreeNode {
        &self.nodes[&id]
    }

    pub fn sort_order(&self, id: DbId) -> i32 {
        self.nodes[&id].sort_order
    }
}

impl Repository for MemoryStore {
    type Error = MemoryError;
}

impl TreeRepository for MemoryStore {
    async fn find_tree(&mut self, id: DbId) -> Result<Option<Tree>, MemoryError> {
        Ok(self.trees.get(&id).cloned())
    }

    async fn find_active_trees(&mut self) -> Result<Vec<Tree>, MemoryError> {
        Ok(self.trees.values().filter(|t| t.is_active).cloned().collect())
    }

    async fn find_deleted_trees(&mut self) -> Result<Vec<Tree>, MemoryError> {
        Ok(self.trees.values().filter(|t| !t.is_active).cloned().collect())
    }

    async fn save_tree(&mut self, tree: &Tree) -> Result<Tree, MemoryError> {
        let mut stored = tree.clone();
        stored.touch();
        let id = match stored.id {
            Some(id) if self.trees.contains_key(&id) => id,
            Some(id) => return Err(MemoryError::MissingRow(id)),
            None => self.allocate_id(),
        };
        stored.id = Some(id);
        self.trees.insert(id, stored.clone());
        Ok(stored)
    }

    async fn soft_delete_tree(&mut self, id: DbId) -> Result<bool, MemoryError> {
        match self.trees.get_mut(&id) {
            Some(tree) if tree.is_active => {
                tree.is_active = false;
                tree.touch();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn restore_tree(&mut self, id: DbId) -> Result<bool, MemoryError> {
        match self.trees.get_mut(&id) {
            Some(tree) if !tree.is_active => {
                tree.is_active = true;
                tree.touch();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

impl TreeNodeRepository for MemoryStore {
    async fn find_node(&mut self, id: DbId) -> Result<Option<TreeNode>, MemoryError> {
        Ok(self.nodes.get(&id).cloned())
    }

    async fn find_nodes_by_tree(&mut self, tree_id: DbId) -> Result<Vec<TreeNode>, MemoryError> {
        Ok(self
            .nodes
            .values()
            .filter(|n| n.tree_id == tree_id)
            .cloned()
            .collect())
    }

    async fn find_children(&mut self, parent_id: DbId) -> Result<Vec<TreeNode>, MemoryError> {
        Ok(self
            .nodes
            .values()
            .filter(|n| n.parent_id == Some(parent_id))
            .cloned()
            .collect())
    }

    async fn save_node(&mut self, node: &TreeNode) -> Result<TreeNode, MemoryError> {
        self.node_writes += 1;
        let mut stored = node.clone();
        stored.touch();
        let id = match stored.id {
            Some(id) if self.nodes.contains_key(&id) => id,
            Some(id) => return Err(MemoryError::MissingRow(id)),
            None => self.allocate_id(),
        };
        stored.id = Some(id);
        self.nodes.insert(id, stored.clone());
        Ok(stored)
    }

    async fn delete_node(&mut self, id: DbId) -> Result<bool, MemoryError> {
        if self.fail_delete_of == Some(id) {
            return Err(MemoryError::InjectedDeleteFailure(id));
        }
        self.delete_log.push(id);
        Ok(self.nodes.remove(&id).is_some())
    }
}
