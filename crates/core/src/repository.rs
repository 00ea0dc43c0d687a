//! Persistence contracts the services are written against.
//!
//! Implementations live outside this crate (Postgres in `arbor-db`, an
//! in-memory store in the unit tests). Every method is a single read or
//! write; transaction boundaries belong to whoever constructs the
//! repository.

use std::future::Future;

use crate::node::TreeNode;
use crate::tree::Tree;
use crate::types::DbId;

/// Common base of the repository traits, fixing the error type a backend
/// reports. Services propagate this error unchanged.
pub trait Repository: Send {
    type Error: std::error::Error + Send + Sync + 'static;
}

/// Storage for [`Tree`] rows.
pub trait TreeRepository: Repository {
    /// Find a tree by id, active or soft-deleted.
    fn find_tree(
        &mut self,
        id: DbId,
    ) -> impl Future<Output = Result<Option<Tree>, Self::Error>> + Send;

    /// All trees with `is_active = true`.
    fn find_active_trees(&mut self) -> impl Future<Output = Result<Vec<Tree>, Self::Error>> + Send;

    /// All trees with `is_active = false`.
    fn find_deleted_trees(&mut self)
        -> impl Future<Output = Result<Vec<Tree>, Self::Error>> + Send;

    /// Insert when `tree.id` is `None`, otherwise update. Returns the stored
    /// row with a refreshed `updated_at`.
    fn save_tree(&mut self, tree: &Tree) -> impl Future<Output = Result<Tree, Self::Error>> + Send;

    /// Set `is_active = false`. Returns `false` if no active row matched.
    fn soft_delete_tree(
        &mut self,
        id: DbId,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send;

    /// Set `is_active = true`. Returns `false` if no deleted row matched.
    fn restore_tree(&mut self, id: DbId) -> impl Future<Output = Result<bool, Self::Error>> + Send;
}

/// Storage for [`TreeNode`] rows.
pub trait TreeNodeRepository: Repository {
    fn find_node(
        &mut self,
        id: DbId,
    ) -> impl Future<Output = Result<Option<TreeNode>, Self::Error>> + Send;

    /// Every node of a tree as a flat list.
    fn find_nodes_by_tree(
        &mut self,
        tree_id: DbId,
    ) -> impl Future<Output = Result<Vec<TreeNode>, Self::Error>> + Send;

    /// Direct children of `parent_id`.
    fn find_children(
        &mut self,
        parent_id: DbId,
    ) -> impl Future<Output = Result<Vec<TreeNode>, Self::Error>> + Send;

    /// Insert when `node.id` is `None`, otherwise update.
    fn save_node(
        &mut self,
        node: &TreeNode,
    ) -> impl Future<Output = Result<TreeNode, Self::Error>> + Send;

    /// Hard delete a single row. Children are not touched.
    fn delete_node(&mut self, id: DbId) -> impl Future<Output = Result<bool, Self::Error>> + Send;
}
