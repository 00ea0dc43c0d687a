//! Route definitions for the `/trees` resource and its nodes.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{node, tree};
use crate::state::AppState;

/// Routes mounted at `/trees`.
///
/// ```text
/// GET    /                                    -> list
/// POST   /                                    -> create
/// GET    /deleted                             -> list_deleted
/// GET    /{id}                                -> get_by_id
/// PUT    /{id}                                -> update
/// DELETE /{id}                                -> delete
/// POST   /{id}/restore                        -> restore
/// GET    /{id}/structure                      -> structure
///
/// GET    /{id}/nodes                          -> node::list
/// POST   /{id}/nodes                          -> node::create
/// PUT    /{id}/nodes/sort-orders              -> node::update_sort_orders
/// GET    /{id}/nodes/{node_id}                -> node::get_by_id
/// DELETE /{id}/nodes/{node_id}                -> node::delete
/// GET    /{id}/nodes/{node_id}/descendants    -> node::descendants
/// POST   /{id}/nodes/{node_id}/sort-left      -> node::sort_left
/// POST   /{id}/nodes/{node_id}/sort-right     -> node::sort_right
/// PUT    /{id}/nodes/{node_id}/sort-order     -> node::update_sort_order
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tree::list).post(tree::create))
        .route("/deleted", get(tree::list_deleted))
        .route(
            "/{id}",
            get(tree::get_by_id).put(tree::update).delete(tree::delete),
        )
        .route("/{id}/restore", post(tree::restore))
        .route("/{id}/structure", get(tree::structure))
        .route("/{id}/nodes", get(node::list).post(node::create))
        .route("/{id}/nodes/sort-orders", put(node::update_sort_orders))
        .route(
            "/{id}/nodes/{node_id}",
            get(node::get_by_id).delete(node::delete),
        )
        .route("/{id}/nodes/{node_id}/descendants", get(node::descendants))
        .route("/{id}/nodes/{node_id}/sort-left", post(node::sort_left))
        .route("/{id}/nodes/{node_id}/sort-right", post(node::sort_right))
        .route(
            "/{id}/nodes/{node_id}/sort-order",
            put(node::update_sort_order),
        )
}
