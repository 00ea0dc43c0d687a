//! Route definitions for the server-rendered pages, mounted at the root.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::pages;
use crate::state::AppState;

/// Page routes.
///
/// ```text
/// GET    /                                      -> tree_list
/// GET    /trees/new                             -> new_tree_form
/// POST   /trees                                 -> create_tree
/// GET    /trees/deleted                         -> deleted_trees
/// GET    /trees/{id}                            -> tree_page
/// GET    /trees/{id}/delete                     -> confirm_delete_tree
/// POST   /trees/{id}/delete                     -> delete_tree
/// POST   /trees/{id}/restore                    -> restore_tree
/// GET    /trees/{id}/nodes/new                  -> new_node_form
/// POST   /trees/{id}/nodes                      -> create_node
/// GET    /trees/{id}/nodes/{node_id}/delete     -> confirm_delete_node
/// POST   /trees/{id}/nodes/{node_id}/delete     -> delete_node
/// POST   /trees/{id}/nodes/{node_id}/sort-left  -> sort_left
/// POST   /trees/{id}/nodes/{node_id}/sort-right -> sort_right
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::tree_list))
        .route("/trees", post(pages::create_tree))
        .route("/trees/new", get(pages::new_tree_form))
        .route("/trees/deleted", get(pages::deleted_trees))
        .route("/trees/{id}", get(pages::tree_page))
        .route(
            "/trees/{id}/delete",
            get(pages::confirm_delete_tree).post(pages::delete_tree),
        )
        .route("/trees/{id}/restore", post(pages::restore_tree))
        .route("/trees/{id}/nodes", post(pages::create_node))
        .route("/trees/{id}/nodes/new", get(pages::new_node_form))
        .route(
            "/trees/{id}/nodes/{node_id}/delete",
            get(pages::confirm_delete_node).post(pages::delete_node),
        )
        .route("/trees/{id}/nodes/{node_id}/sort-left", post(pages::sort_left))
        .route("/trees/{id}/nodes/{node_id}/sort-right", post(pages::sort_right))
}
