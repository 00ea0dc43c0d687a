//! Node operations scoped to a tree.
//!
//! Every function takes the tree id from the request and checks that the
//! tree is active and the node belongs to it. A node id from another tree is
//! reported as not found.

use serde::Serialize;

use crate::cascade;
use crate::error::{CoreError, ServiceError};
use crate::forest::Forest;
use crate::node::{build_variant, validate_node_name, validate_sort_order, NewNode, TreeNode};
use crate::repository::{TreeNodeRepository, TreeRepository};
use crate::service::tree::get_active_tree;
use crate::sort::{self, Direction, SortOrderUpdate, SwapResult};
use crate::tree::Tree;
use crate::types::DbId;

/// A node together with everything a cascading delete would remove.
#[derive(Debug, Clone, Serialize)]
pub struct DeletionPreview {
    pub node: TreeNode,
    pub descendants: Vec<TreeNode>,
}

impl DeletionPreview {
    /// Total number of nodes removed, the target included.
    pub fn total(&self) -> usize {
        self.descendants.len() + 1
    }
}

/// Flat listing of a tree's nodes.
pub async fn list_nodes<R>(
    repo: &mut R,
    tree_id: DbId,
) -> Result<Vec<TreeNode>, ServiceError<R::Error>>
where
    R: TreeRepository + TreeNodeRepository,
{
    get_active_tree(repo, tree_id).await?;
    repo.find_nodes_by_tree(tree_id)
        .await
        .map_err(ServiceError::Repository)
}

/// Load an active tree and assemble its nodes into a forest.
///
/// Fails with `MalformedHierarchy` when the tree has nodes but none of them
/// is a root.
pub async fn load_forest<R>(
    repo: &mut R,
    tree_id: DbId,
) -> Result<(Tree, Forest), ServiceError<R::Error>>
where
    R: TreeRepository + TreeNodeRepository,
{
    let tree = get_active_tree(repo, tree_id).await?;
    let nodes = repo
        .find_nodes_by_tree(tree_id)
        .await
        .map_err(ServiceError::Repository)?;
    let forest = Forest::build(nodes);
    forest.ensure_rooted(tree_id)?;
    Ok((tree, forest))
}

/// Find a node of an active tree.
pub async fn get_node_in_tree<R>(
    repo: &mut R,
    tree_id: DbId,
    node_id: DbId,
) -> Result<TreeNode, ServiceError<R::Error>>
where
    R: TreeRepository + TreeNodeRepository,
{
    get_active_tree(repo, tree_id).await?;
    find_node_in_tree(repo, tree_id, node_id).await
}

/// Validate and insert a node.
///
/// The parent, if given, must be a node of the same tree. Without an
/// explicit sort order the node goes after its last sibling.
pub async fn create_node<R>(
    repo: &mut R,
    tree_id: DbId,
    input: NewNode,
) -> Result<TreeNode, ServiceError<R::Error>>
where
    R: TreeRepository + TreeNodeRepository,
{
    get_active_tree(repo, tree_id).await?;

    let name = input.name.trim().to_string();
    validate_node_name(&name)?;
    let variant = build_variant(input.node_type, input.button_text, input.button_action)?;
    if let Some(sort_order) = input.sort_order {
        validate_sort_order(sort_order)?;
    }

    if let Some(parent_id) = input.parent_id {
        find_node_in_tree(repo, tree_id, parent_id).await?;
    }

    let mut node = TreeNode::new(tree_id, input.parent_id, name, 0, variant);
    node.sort_order = match input.sort_order {
        Some(sort_order) => sort_order,
        None => next_sort_order(repo, &node).await?,
    };

    repo.save_node(&node)
        .await
        .map_err(ServiceError::Repository)
}

/// The node plus its descendants, for a confirmation page.
pub async fn delete_preview<R>(
    repo: &mut R,
    tree_id: DbId,
    node_id: DbId,
) -> Result<DeletionPreview, ServiceError<R::Error>>
where
    R: TreeRepository + TreeNodeRepository,
{
    let node = get_node_in_tree(repo, tree_id, node_id).await?;
    let descendants = cascade::collect_descendants(repo, node_id).await?;
    Ok(DeletionPreview { node, descendants })
}

/// Cascading delete of a node of `tree_id`. Returns the deleted ids.
pub async fn delete_node<R>(
    repo: &mut R,
    tree_id: DbId,
    node_id: DbId,
) -> Result<Vec<DbId>, ServiceError<R::Error>>
where
    R: TreeRepository + TreeNodeRepository,
{
    get_node_in_tree(repo, tree_id, node_id).await?;
    cascade::delete_subtree(repo, node_id).await
}

/// Swap a node of `tree_id` with its neighbour in `direction`.
pub async fn move_node<R>(
    repo: &mut R,
    tree_id: DbId,
    node_id: DbId,
    direction: Direction,
) -> Result<SwapResult, ServiceError<R::Error>>
where
    R: TreeRepository + TreeNodeRepository,
{
    get_node_in_tree(repo, tree_id, node_id).await?;
    sort::sort_node(repo, node_id, direction).await
}

/// Overwrite the sort order of a node of `tree_id`.
pub async fn set_sort_order<R>(
    repo: &mut R,
    tree_id: DbId,
    node_id: DbId,
    sort_order: i32,
) -> Result<TreeNode, ServiceError<R::Error>>
where
    R: TreeRepository + TreeNodeRepository,
{
    get_node_in_tree(repo, tree_id, node_id).await?;
    sort::update_node_sort_order(repo, node_id, sort_order).await
}

/// Bulk sort-order assignment for nodes of an active tree.
pub async fn set_sort_orders<R>(
    repo: &mut R,
    tree_id: DbId,
    updates: &[SortOrderUpdate],
) -> Result<Vec<TreeNode>, ServiceError<R::Error>>
where
    R: TreeRepository + TreeNodeRepository,
{
    get_active_tree(repo, tree_id).await?;
    sort::bulk_update_sort_orders(repo, tree_id, updates).await
}

async fn find_node_in_tree<N: TreeNodeRepository>(
    repo: &mut N,
    tree_id: DbId,
    node_id: DbId,
) -> Result<TreeNode, ServiceError<N::Error>> {
    let node = repo
        .find_node(node_id)
        .await
        .map_err(ServiceError::Repository)?
        .filter(|node| node.tree_id == tree_id)
        .ok_or(CoreError::NotFound {
            entity: "TreeNode",
            id: node_id,
        })?;
    Ok(node)
}

async fn next_sort_order<N: TreeNodeRepository>(
    repo: &mut N,
    node: &TreeNode,
) -> Result<i32, ServiceError<N::Error>> {
    let siblings = sort::find_siblings(repo, node).await?;
    Ok(siblings
        .iter()
        .map(|sibling| sibling.sort_order.saturating_add(1))
        .max()
        .unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::node::{NodeKind, NodeVariant};
    use crate::test_support::MemoryStore;

    fn simple(name: &str, parent_id: Option<DbId>) -> NewNode {
        NewNode {
            name: name.to_string(),
            parent_id,
            sort_order: None,
            node_type: NodeKind::Simple,
            button_text: None,
            button_action: None,
        }
    }

    #[tokio::test]
    async fn create_appends_after_last_sibling() {
        let mut store = MemoryStore::new();
        let tree = store.add_tree("t");

        let first = create_node(&mut store, tree, simple("a", None)).await.unwrap();
        let second = create_node(&mut store, tree, simple("b", None)).await.unwrap();
        let child = create_node(&mut store, tree, simple("c", first.id))
            .await
            .unwrap();

        assert_eq!(first.sort_order, 0);
        assert_eq!(second.sort_order, 1);
        assert_eq!(child.sort_order, 0);
        assert_eq!(child.parent_id, first.id);
    }

    #[tokio::test]
    async fn create_button_node() {
        let mut store = MemoryStore::new();
        let tree = store.add_tree("t");

        let node = create_node(
            &mut store,
            tree,
            NewNode {
                name: "Checkout".into(),
                parent_id: None,
                sort_order: Some(4),
                node_type: NodeKind::Button,
                button_text: Some("Pay".into()),
                button_action: Some("/pay".into()),
            },
        )
        .await
        .unwrap();

        assert_eq!(node.sort_order, 4);
        assert_eq!(
            node.variant,
            NodeVariant::Button {
                button_text: "Pay".into(),
                button_action: Some("/pay".into()),
            }
        );
    }

    #[tokio::test]
    async fn create_rejects_parent_from_other_tree() {
        let mut store = MemoryStore::new();
        let tree = store.add_tree("t");
        let other = store.add_tree("u");
        let foreign = store.add_node(other, None, 0);

        assert_matches!(
            create_node(&mut store, tree, simple("x", Some(foreign))).await,
            Err(ServiceError::Core(CoreError::NotFound { entity: "TreeNode", .. }))
        );
    }

    #[tokio::test]
    async fn create_in_deleted_tree_is_not_found() {
        let mut store = MemoryStore::new();
        let tree = store.add_tree("t");
        store.soft_delete_tree(tree).await.unwrap();

        assert_matches!(
            create_node(&mut store, tree, simple("x", None)).await,
            Err(ServiceError::Core(CoreError::NotFound { entity: "Tree", .. }))
        );
        assert!(store.nodes.is_empty());
    }

    #[tokio::test]
    async fn create_rejects_invalid_button() {
        let mut store = MemoryStore::new();
        let tree = store.add_tree("t");
        let mut input = simple("b", None);
        input.node_type = NodeKind::Button;

        assert_matches!(
            create_node(&mut store, tree, input).await,
            Err(ServiceError::Core(CoreError::Validation(_)))
        );
    }

    #[tokio::test]
    async fn load_forest_assembles_tree() {
        let mut store = MemoryStore::new();
        let tree = store.add_tree("t");
        let root = store.add_node(tree, None, 0);
        store.add_node(tree, Some(root), 0);
        store.add_node(tree, Some(root), 1);

        let (loaded, forest) = load_forest(&mut store, tree).await.unwrap();

        assert_eq!(loaded.id, Some(tree));
        assert_eq!(forest.root_count(), 1);
        assert_eq!(forest.node_count(), 3);
    }

    #[tokio::test]
    async fn load_forest_of_empty_tree_is_ok() {
        let mut store = MemoryStore::new();
        let tree = store.add_tree("t");
        let (_, forest) = load_forest(&mut store, tree).await.unwrap();
        assert!(forest.is_empty());
    }

    #[tokio::test]
    async fn load_forest_without_root_is_malformed() {
        let mut store = MemoryStore::new();
        let tree = store.add_tree("t");
        store.add_node(tree, Some(500), 0);

        assert_matches!(
            load_forest(&mut store, tree).await,
            Err(ServiceError::Core(CoreError::MalformedHierarchy { node_count: 1, .. }))
        );
    }

    #[tokio::test]
    async fn preview_lists_descendants() {
        let mut store = MemoryStore::new();
        let tree = store.add_tree("t");
        let root = store.add_node(tree, None, 0);
        let child = store.add_node(tree, Some(root), 0);
        store.add_node(tree, Some(child), 0);

        let preview = delete_preview(&mut store, tree, root).await.unwrap();

        assert_eq!(preview.node.id, Some(root));
        assert_eq!(preview.descendants.len(), 2);
        assert_eq!(preview.total(), 3);
        assert_eq!(store.nodes.len(), 3);
    }

    #[tokio::test]
    async fn delete_rejects_node_of_other_tree() {
        let mut store = MemoryStore::new();
        let tree = store.add_tree("t");
        let other = store.add_tree("u");
        let foreign = store.add_node(other, None, 0);

        assert_matches!(
            delete_node(&mut store, tree, foreign).await,
            Err(ServiceError::Core(CoreError::NotFound { .. }))
        );
        assert!(store.nodes.contains_key(&foreign));
    }

    #[tokio::test]
    async fn move_node_swaps_within_tree() {
        let mut store = MemoryStore::new();
        let tree = store.add_tree("t");
        let a = store.add_node(tree, None, 0);
        let b = store.add_node(tree, None, 1);

        let result = move_node(&mut store, tree, b, Direction::Left).await.unwrap();

        assert!(result.swapped());
        assert_eq!(store.sort_order(a), 1);
        assert_eq!(store.sort_order(b), 0);
    }

    #[tokio::test]
    async fn set_sort_orders_requires_active_tree() {
        let mut store = MemoryStore::new();
        let tree = store.add_tree("t");
        let a = store.add_node(tree, None, 0);
        store.soft_delete_tree(tree).await.unwrap();

        let result = set_sort_orders(
            &mut store,
            tree,
            &[SortOrderUpdate {
                node_id: a,
                sort_order: 3,
            }],
        )
        .await;
        assert_matches!(
            result,
            Err(ServiceError::Core(CoreError::NotFound { entity: "Tree", .. }))
        );
    }
}
