//! Handlers for the `/trees` resource.
//!
//! Reads run on a pooled connection; writes that check state before they
//! modify it run inside a transaction.

use arbor_core::service::{node as node_service, tree as tree_service};
use arbor_core::tree::{NewTree, Tree, TreeUpdate};
use arbor_core::types::DbId;
use arbor_db::repositories::PgStore;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::AppResult;
use crate::response::TreeStructure;
use crate::state::AppState;

/// GET /api/v1/trees
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Tree>>> {
    let mut conn = state.pool.acquire().await?;
    let trees = tree_service::list_active_trees(&mut PgStore::new(&mut conn)).await?;
    Ok(Json(trees))
}

/// GET /api/v1/trees/deleted
pub async fn list_deleted(State(state): State<AppState>) -> AppResult<Json<Vec<Tree>>> {
    let mut conn = state.pool.acquire().await?;
    let trees = tree_service::list_deleted_trees(&mut PgStore::new(&mut conn)).await?;
    Ok(Json(trees))
}

/// POST /api/v1/trees
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<NewTree>,
) -> AppResult<(StatusCode, Json<Tree>)> {
    let mut tx = state.pool.begin().await?;
    let tree = tree_service::create_tree(&mut PgStore::new(&mut tx), input).await?;
    tx.commit().await?;

    tracing::info!(tree_id = tree.id, name = %tree.name, "Tree created");
    Ok((StatusCode::CREATED, Json(tree)))
}

/// GET /api/v1/trees/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Tree>> {
    let mut conn = state.pool.acquire().await?;
    let tree = tree_service::get_active_tree(&mut PgStore::new(&mut conn), id).await?;
    Ok(Json(tree))
}

/// PUT /api/v1/trees/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<TreeUpdate>,
) -> AppResult<Json<Tree>> {
    let mut tx = state.pool.begin().await?;
    let tree = tree_service::update_tree(&mut PgStore::new(&mut tx), id, input).await?;
    tx.commit().await?;

    tracing::info!(tree_id = id, "Tree updated");
    Ok(Json(tree))
}

/// DELETE /api/v1/trees/{id}
///
/// Soft delete. The tree's nodes are kept and come back on restore.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let mut conn = state.pool.acquire().await?;
    tree_service::soft_delete_tree(&mut PgStore::new(&mut conn), id).await?;

    tracing::info!(tree_id = id, "Tree soft-deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/trees/{id}/restore
pub async fn restore(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<Json<Tree>> {
    let mut tx = state.pool.begin().await?;
    let tree = tree_service::restore_tree(&mut PgStore::new(&mut tx), id).await?;
    tx.commit().await?;

    tracing::info!(tree_id = id, "Tree restored");
    Ok(Json(tree))
}

/// GET /api/v1/trees/{id}/structure
///
/// The tree with its nodes nested under their parents, plus summary figures.
pub async fn structure(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<TreeStructure>> {
    let mut conn = state.pool.acquire().await?;
    let (tree, forest) = node_service::load_forest(&mut PgStore::new(&mut conn), id).await?;

    let stats = forest.stats();
    if stats.dropped_count > 0 {
        tracing::warn!(
            tree_id = id,
            dropped = stats.dropped_count,
            "Nodes with a missing parent left out of the structure",
        );
    }

    Ok(Json(TreeStructure {
        tree,
        nodes: forest.to_nested(),
        stats,
    }))
}
