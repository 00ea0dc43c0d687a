//! Sibling ordering: neighbour swaps and explicit sort-order assignment.
//!
//! Siblings are the nodes of one tree that share a `parent_id` (roots are
//! siblings of each other). Swaps exchange exactly two `sort_order` values;
//! explicit assignment performs no collision detection.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, ServiceError};
use crate::node::{validate_sort_order, TreeNode};
use crate::repository::TreeNodeRepository;
use crate::types::DbId;

/// Which neighbour to swap with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Left,
    Right,
}

/// Result of a neighbour swap. `displaced` is `None` when the node was
/// already first (left) or last (right) and nothing changed.
#[derive(Debug, Clone, Serialize)]
pub struct SwapResult {
    pub moved: TreeNode,
    pub displaced: Option<TreeNode>,
}

impl SwapResult {
    pub fn swapped(&self) -> bool {
        self.displaced.is_some()
    }
}

/// One entry of a bulk sort-order update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SortOrderUpdate {
    pub node_id: DbId,
    pub sort_order: i32,
}

/// The siblings of `node`, excluding `node` itself, ordered by
/// `(sort_order, id)`.
pub async fn find_siblings<N: TreeNodeRepository>(
    repo: &mut N,
    node: &TreeNode,
) -> Result<Vec<TreeNode>, ServiceError<N::Error>> {
    let candidates = match node.parent_id {
        Some(parent_id) => repo.find_children(parent_id).await,
        None => repo.find_nodes_by_tree(node.tree_id).await,
    }
    .map_err(ServiceError::Repository)?;

    let mut siblings: Vec<TreeNode> = candidates
        .into_iter()
        .filter(|candidate| candidate.is_sibling_of(node) && candidate.id != node.id)
        .collect();
    siblings.sort_by_key(|sibling| (sibling.sort_order, sibling.id));
    Ok(siblings)
}

/// Swap `node_id` with the sibling immediately before it.
pub async fn sort_node_left<N: TreeNodeRepository>(
    repo: &mut N,
    node_id: DbId,
) -> Result<SwapResult, ServiceError<N::Error>> {
    sort_node(repo, node_id, Direction::Left).await
}

/// Swap `node_id` with the sibling immediately after it.
pub async fn sort_node_right<N: TreeNodeRepository>(
    repo: &mut N,
    node_id: DbId,
) -> Result<SwapResult, ServiceError<N::Error>> {
    sort_node(repo, node_id, Direction::Right).await
}

/// Swap `node_id`'s sort order with its neighbour in `direction`.
///
/// The left neighbour is the sibling with the greatest sort order strictly
/// below the node's; the right neighbour the one with the smallest sort order
/// strictly above it. Without such a neighbour nothing is written.
pub async fn sort_node<N: TreeNodeRepository>(
    repo: &mut N,
    node_id: DbId,
    direction: Direction,
) -> Result<SwapResult, ServiceError<N::Error>> {
    let mut node = repo
        .find_node(node_id)
        .await
        .map_err(ServiceError::Repository)?
        .ok_or(CoreError::NotFound {
            entity: "TreeNode",
            id: node_id,
        })?;

    let siblings = find_siblings(repo, &node).await?;
    let neighbour = match direction {
        Direction::Left => siblings
            .into_iter()
            .filter(|s| s.sort_order < node.sort_order)
            .next_back(),
        Direction::Right => siblings
            .into_iter()
            .find(|s| s.sort_order > node.sort_order),
    };

    let Some(mut neighbour) = neighbour else {
        return Ok(SwapResult {
            moved: node,
            displaced: None,
        });
    };

    std::mem::swap(&mut node.sort_order, &mut neighbour.sort_order);
    node.touch();
    neighbour.touch();

    let moved = repo
        .save_node(&node)
        .await
        .map_err(ServiceError::Repository)?;
    let displaced = repo
        .save_node(&neighbour)
        .await
        .map_err(ServiceError::Repository)?;

    Ok(SwapResult {
        moved,
        displaced: Some(displaced),
    })
}

/// Overwrite one node's sort order. Siblings are not touched.
pub async fn update_node_sort_order<N: TreeNodeRepository>(
    repo: &mut N,
    node_id: DbId,
    sort_order: i32,
) -> Result<TreeNode, ServiceError<N::Error>> {
    validate_sort_order(sort_order)?;

    let mut node = repo
        .find_node(node_id)
        .await
        .map_err(ServiceError::Repository)?
        .ok_or(CoreError::NotFound {
            entity: "TreeNode",
            id: node_id,
        })?;

    node.sort_order = sort_order;
    node.touch();
    repo.save_node(&node)
        .await
        .map_err(ServiceError::Repository)
}

/// Apply many sort-order assignments to nodes of `tree_id`.
///
/// Every entry is checked before the first write: the batch must be
/// non-empty, sort orders non-negative, node ids unique, and every node must
/// exist in `tree_id` (a node of another tree is reported as not found). Any
/// failure rejects the whole batch with nothing written.
pub async fn bulk_update_sort_orders<N: TreeNodeRepository>(
    repo: &mut N,
    tree_id: DbId,
    updates: &[SortOrderUpdate],
) -> Result<Vec<TreeNode>, ServiceError<N::Error>> {
    if updates.is_empty() {
        return Err(ServiceError::validation(
            "Sort order batch must contain at least one entry",
        ));
    }

    let mut seen = HashSet::with_capacity(updates.len());
    for update in updates {
        validate_sort_order(update.sort_order)?;
        if !seen.insert(update.node_id) {
            return Err(ServiceError::validation(format!(
                "Node {} appears more than once in the batch",
                update.node_id
            )));
        }
    }

    let mut pending = Vec::with_capacity(updates.len());
    for update in updates {
        let node = repo
            .find_node(update.node_id)
            .await
            .map_err(ServiceError::Repository)?
            .filter(|node| node.tree_id == tree_id)
            .ok_or(CoreError::NotFound {
                entity: "TreeNode",
                id: update.node_id,
            })?;
        pending.push((node, update.sort_order));
    }

    let mut saved = Vec::with_capacity(pending.len());
    for (mut node, sort_order) in pending {
        node.sort_order = sort_order;
        node.touch();
        saved.push(
            repo.save_node(&node)
                .await
                .map_err(ServiceError::Repository)?,
        );
    }
    Ok(saved)
}
