//! Cascading hard delete of a node and all of its descendants.
//!
//! Descendants are discovered one level at a time through
//! [`TreeNodeRepository::find_children`], so no pre-built forest is needed.
//! The walk and the deletes are plain sequential repository calls; callers
//! that need all-or-nothing behaviour hand in a repository bound to a
//! transaction.

use std::collections::HashSet;

use crate::error::ServiceError;
use crate::node::TreeNode;
use crate::repository::TreeNodeRepository;
use crate::types::DbId;

/// Every transitive descendant of `node_id`, flattened in pre-order: each
/// child comes right before its own subtree, siblings in repository order.
///
/// `node_id` itself is not included. A node id seen twice is skipped, so a
/// corrupt parent cycle cannot make the walk loop.
pub async fn collect_descendants<N: TreeNodeRepository>(
    repo: &mut N,
    node_id: DbId,
) -> Result<Vec<TreeNode>, ServiceError<N::Error>> {
    let mut seen = HashSet::from([node_id]);
    let mut result = Vec::new();

    let mut stack: Vec<TreeNode> = repo
        .find_children(node_id)
        .await
        .map_err(ServiceError::Repository)?;
    stack.reverse();

    while let Some(node) = stack.pop() {
        let id = node.persisted_id()?;
        if !seen.insert(id) {
            continue;
        }
        let mut children = repo
            .find_children(id)
            .await
            .map_err(ServiceError::Repository)?;
        children.reverse();
        stack.extend(children);
        result.push(node);
    }

    Ok(result)
}

/// Delete `node_id` and every descendant. Descendants go first, the node
/// itself last. Returns the deleted ids in that order.
///
/// Fails with `NotFound` if `node_id` does not exist. A repository error part
/// way through is returned as-is; rows deleted before it stay deleted unless
/// the repository is transactional.
pub async fn delete_subtree<N: TreeNodeRepository>(
    repo: &mut N,
    node_id: DbId,
) -> Result<Vec<DbId>, ServiceError<N::Error>> {
    if repo
        .find_node(node_id)
        .await
        .map_err(ServiceError::Repository)?
        .is_none()
    {
        return Err(ServiceError::not_found("TreeNode", node_id));
    }

    let descendants = collect_descendants(repo, node_id).await?;
    let mut deleted = Vec::with_capacity(descendants.len() + 1);
    for node in &descendants {
        let id = node.persisted_id()?;
        repo.delete_node(id)
            .await
            .map_err(ServiceError::Repository)?;
        deleted.push(id);
    }

    repo.delete_node(node_id)
        .await
        .map_err(ServiceError::Repository)?;
    deleted.push(node_id);

    Ok(deleted)
}
