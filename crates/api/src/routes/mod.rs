pub mod health;
pub mod pages;
pub mod tree;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /trees                                         list, create
/// /trees/deleted                                 soft-deleted trees
/// /trees/{id}                                    get, update, soft delete
/// /trees/{id}/restore                            restore (POST)
/// /trees/{id}/structure                          nested forest + stats
///
/// /trees/{id}/nodes                              list, create
/// /trees/{id}/nodes/sort-orders                  bulk sort orders (PUT)
/// /trees/{id}/nodes/{node_id}                    get, cascading delete
/// /trees/{id}/nodes/{node_id}/descendants        deletion preview
/// /trees/{id}/nodes/{node_id}/sort-left          swap with left sibling (POST)
/// /trees/{id}/nodes/{node_id}/sort-right         swap with right sibling (POST)
/// /trees/{id}/nodes/{node_id}/sort-order         set sort order (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/trees", tree::router())
}
