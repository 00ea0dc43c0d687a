//! Handlers for the nodes of a tree (`/trees/{id}/nodes`).

use arbor_core::node::{NewNode, TreeNode};
use arbor_core::service::node::{self as node_service, DeletionPreview};
use arbor_core::sort::{Direction, SortOrderUpdate, SwapResult};
use arbor_core::types::DbId;
use arbor_db::repositories::PgStore;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::error::AppResult;
use crate::response::DeletedNodes;
use crate::state::AppState;

/// Body of `PUT .../sort-order`.
#[derive(Debug, Deserialize)]
pub struct SortOrderInput {
    pub sort_order: i32,
}

/// Body of `PUT .../nodes/sort-orders`.
#[derive(Debug, Deserialize)]
pub struct BulkSortOrderInput {
    pub updates: Vec<SortOrderUpdate>,
}

/// GET /api/v1/trees/{id}/nodes
pub async fn list(
    State(state): State<AppState>,
    Path(tree_id): Path<DbId>,
) -> AppResult<Json<Vec<TreeNode>>> {
    let mut conn = state.pool.acquire().await?;
    let nodes = node_service::list_nodes(&mut PgStore::new(&mut conn), tree_id).await?;
    Ok(Json(nodes))
}

/// POST /api/v1/trees/{id}/nodes
pub async fn create(
    State(state): State<AppState>,
    Path(tree_id): Path<DbId>,
    Json(input): Json<NewNode>,
) -> AppResult<(StatusCode, Json<TreeNode>)> {
    let mut tx = state.pool.begin().await?;
    let node = node_service::create_node(&mut PgStore::new(&mut tx), tree_id, input).await?;
    tx.commit().await?;

    tracing::info!(
        tree_id,
        node_id = node.id,
        parent_id = node.parent_id,
        node_type = node.variant.type_name(),
        "Tree node created",
    );
    Ok((StatusCode::CREATED, Json(node)))
}

/// GET /api/v1/trees/{id}/nodes/{node_id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path((tree_id, node_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<TreeNode>> {
    let mut conn = state.pool.acquire().await?;
    let node =
        node_service::get_node_in_tree(&mut PgStore::new(&mut conn), tree_id, node_id).await?;
    Ok(Json(node))
}

/// DELETE /api/v1/trees/{id}/nodes/{node_id}
///
/// Deletes the node and all of its descendants in one transaction.
pub async fn delete(
    State(state): State<AppState>,
    Path((tree_id, node_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DeletedNodes>> {
    let mut tx = state.pool.begin().await?;
    let deleted_ids =
        node_service::delete_node(&mut PgStore::new(&mut tx), tree_id, node_id).await?;
    tx.commit().await?;

    tracing::info!(
        tree_id,
        node_id,
        deleted = deleted_ids.len(),
        "Tree node deleted with descendants",
    );
    Ok(Json(DeletedNodes { deleted_ids }))
}

/// GET /api/v1/trees/{id}/nodes/{node_id}/descendants
///
/// What a delete of this node would remove.
pub async fn descendants(
    State(state): State<AppState>,
    Path((tree_id, node_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DeletionPreview>> {
    let mut conn = state.pool.acquire().await?;
    let preview =
        node_service::delete_preview(&mut PgStore::new(&mut conn), tree_id, node_id).await?;
    Ok(Json(preview))
}

/// POST /api/v1/trees/{id}/nodes/{node_id}/sort-left
pub async fn sort_left(
    State(state): State<AppState>,
    Path((tree_id, node_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<SwapResult>> {
    move_node(state, tree_id, node_id, Direction::Left).await
}

/// POST /api/v1/trees/{id}/nodes/{node_id}/sort-right
pub async fn sort_right(
    State(state): State<AppState>,
    Path((tree_id, node_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<SwapResult>> {
    move_node(state, tree_id, node_id, Direction::Right).await
}

async fn move_node(
    state: AppState,
    tree_id: DbId,
    node_id: DbId,
    direction: Direction,
) -> AppResult<Json<SwapResult>> {
    let mut tx = state.pool.begin().await?;
    let result =
        node_service::move_node(&mut PgStore::new(&mut tx), tree_id, node_id, direction).await?;
    tx.commit().await?;

    tracing::info!(
        tree_id,
        node_id,
        ?direction,
        swapped = result.swapped(),
        "Tree node moved",
    );
    Ok(Json(result))
}

/// PUT /api/v1/trees/{id}/nodes/{node_id}/sort-order
pub async fn update_sort_order(
    State(state): State<AppState>,
    Path((tree_id, node_id)): Path<(DbId, DbId)>,
    Json(input): Json<SortOrderInput>,
) -> AppResult<Json<TreeNode>> {
    let mut tx = state.pool.begin().await?;
    let node = node_service::set_sort_order(
        &mut PgStore::new(&mut tx),
        tree_id,
        node_id,
        input.sort_order,
    )
    .await?;
    tx.commit().await?;

    tracing::info!(tree_id, node_id, sort_order = input.sort_order, "Sort order set");
    Ok(Json(node))
}

/// PUT /api/v1/trees/{id}/nodes/sort-orders
///
/// Applies every update or none of them.
pub async fn update_sort_orders(
    State(state): State<AppState>,
    Path(tree_id): Path<DbId>,
    Json(input): Json<BulkSortOrderInput>,
) -> AppResult<Json<Vec<TreeNode>>> {
    let mut tx = state.pool.begin().await?;
    let nodes =
        node_service::set_sort_orders(&mut PgStore::new(&mut tx), tree_id, &input.updates).await?;
    tx.commit().await?;

    tracing::info!(tree_id, count = nodes.len(), "Sort orders updated");
    Ok(Json(nodes))
}
