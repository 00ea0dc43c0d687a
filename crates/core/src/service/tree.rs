//! Tree lifecycle: create, update, list, soft delete and restore.

use crate::error::{CoreError, ServiceError};
use crate::repository::TreeRepository;
use crate::tree::{
    normalize_optional_text, validate_tree_description, validate_tree_name, NewTree, Tree,
    TreeUpdate,
};
use crate::types::DbId;

/// All active trees.
pub async fn list_active_trees<R: TreeRepository>(
    repo: &mut R,
) -> Result<Vec<Tree>, ServiceError<R::Error>> {
    repo.find_active_trees()
        .await
        .map_err(ServiceError::Repository)
}

/// All soft-deleted trees.
pub async fn list_deleted_trees<R: TreeRepository>(
    repo: &mut R,
) -> Result<Vec<Tree>, ServiceError<R::Error>> {
    repo.find_deleted_trees()
        .await
        .map_err(ServiceError::Repository)
}

/// Find a tree by id regardless of its active flag.
pub async fn get_tree<R: TreeRepository>(
    repo: &mut R,
    id: DbId,
) -> Result<Tree, ServiceError<R::Error>> {
    let tree = repo
        .find_tree(id)
        .await
        .map_err(ServiceError::Repository)?
        .ok_or(CoreError::NotFound { entity: "Tree", id })?;
    Ok(tree)
}

/// Find an active tree. A soft-deleted tree is reported as not found.
pub async fn get_active_tree<R: TreeRepository>(
    repo: &mut R,
    id: DbId,
) -> Result<Tree, ServiceError<R::Error>> {
    let tree = get_tree(repo, id).await?;
    if !tree.is_active {
        return Err(CoreError::NotFound { entity: "Tree", id }.into());
    }
    Ok(tree)
}

/// Validate and insert a new tree.
///
/// The trimmed name must be unique (case-insensitively) among active trees.
pub async fn create_tree<R: TreeRepository>(
    repo: &mut R,
    input: NewTree,
) -> Result<Tree, ServiceError<R::Error>> {
    let name = input.name.trim().to_string();
    validate_tree_name(&name)?;
    let description = normalize_optional_text(input.description);
    validate_tree_description(description.as_deref())?;

    ensure_name_available(repo, &name, None).await?;

    repo.save_tree(&Tree::new(name, description))
        .await
        .map_err(ServiceError::Repository)
}

/// Apply a partial update to an active tree.
///
/// A blank description clears it. Renaming is subject to the same
/// uniqueness rule as creation, ignoring the tree itself.
pub async fn update_tree<R: TreeRepository>(
    repo: &mut R,
    id: DbId,
    input: TreeUpdate,
) -> Result<Tree, ServiceError<R::Error>> {
    let mut tree = get_active_tree(repo, id).await?;

    if let Some(name) = input.name {
        let name = name.trim().to_string();
        validate_tree_name(&name)?;
        ensure_name_available(repo, &name, Some(id)).await?;
        tree.name = name;
    }
    if let Some(description) = input.description {
        let description = normalize_optional_text(Some(description));
        validate_tree_description(description.as_deref())?;
        tree.description = description;
    }

    tree.touch();
    repo.save_tree(&tree)
        .await
        .map_err(ServiceError::Repository)
}

/// Soft-delete an active tree. Its nodes are kept.
pub async fn soft_delete_tree<R: TreeRepository>(
    repo: &mut R,
    id: DbId,
) -> Result<(), ServiceError<R::Error>> {
    let deleted = repo
        .soft_delete_tree(id)
        .await
        .map_err(ServiceError::Repository)?;
    if !deleted {
        return Err(CoreError::NotFound { entity: "Tree", id }.into());
    }
    Ok(())
}

/// Restore a soft-deleted tree.
///
/// Fails with `Conflict` when an active tree has taken the same name since
/// the deletion.
pub async fn restore_tree<R: TreeRepository>(
    repo: &mut R,
    id: DbId,
) -> Result<Tree, ServiceError<R::Error>> {
    let tree = get_tree(repo, id).await?;
    if tree.is_active {
        return Err(CoreError::NotFound {
            entity: "DeletedTree",
            id,
        }
        .into());
    }

    ensure_name_available(repo, &tree.name, Some(id)).await?;

    let restored = repo
        .restore_tree(id)
        .await
        .map_err(ServiceError::Repository)?;
    if !restored {
        return Err(CoreError::NotFound {
            entity: "DeletedTree",
            id,
        }
        .into());
    }
    get_tree(repo, id).await
}

async fn ensure_name_available<R: TreeRepository>(
    repo: &mut R,
    name: &str,
    except: Option<DbId>,
) -> Result<(), ServiceError<R::Error>> {
    let active = repo
        .find_active_trees()
        .await
        .map_err(ServiceError::Repository)?;
    let taken = active
        .iter()
        .any(|tree| tree.id != except && tree.has_name(name));
    if taken {
        return Err(CoreError::Conflict(format!(
            "An active tree named '{name}' already exists"
        ))
        .into());
    }
    Ok(())
}
