//! Handlers for the server-rendered pages.
//!
//! Forms are `application/x-www-form-urlencoded`. A successful submit
//! redirects with `303 See Other`; a rejected one re-renders the form with
//! the message and a 4xx status. Other failures render an error page.

use std::str::FromStr;

use arbor_core::error::{CoreError, ServiceError};
use arbor_core::node::{NewNode, NodeKind};
use arbor_core::service::{node as node_service, tree as tree_service};
use arbor_core::sort::Direction;
use arbor_core::tree::NewTree;
use arbor_core::types::DbId;
use arbor_db::repositories::PgStore;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;

use crate::error::{PageError, PageResult};
use crate::state::AppState;
use crate::views;

// ---------------------------------------------------------------------------
// Forms
// ---------------------------------------------------------------------------

/// Fields of the new-tree form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TreeForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl TreeForm {
    fn to_new_tree(&self) -> NewTree {
        NewTree {
            name: self.name.clone(),
            description: Some(self.description.clone()),
        }
    }
}

/// Fields of the new-node form. Numbers arrive as text and may be blank.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub parent_id: String,
    #[serde(default)]
    pub sort_order: String,
    #[serde(default)]
    pub node_type: String,
    #[serde(default)]
    pub button_text: String,
    #[serde(default)]
    pub button_action: String,
}

impl NodeForm {
    /// Parse the text fields into a [`NewNode`]. Blank numbers mean "not set".
    pub fn to_new_node(&self) -> Result<NewNode, CoreError> {
        let node_type = if self.node_type.trim().is_empty() {
            NodeKind::Simple
        } else {
            NodeKind::parse(&self.node_type)?
        };
        Ok(NewNode {
            name: self.name.clone(),
            parent_id: parse_optional(&self.parent_id, "Parent id")?,
            sort_order: parse_optional(&self.sort_order, "Sort order")?,
            node_type,
            button_text: Some(self.button_text.clone()),
            button_action: Some(self.button_action.clone()),
        })
    }
}

fn parse_optional<T: FromStr>(raw: &str, field: &str) -> Result<Option<T>, CoreError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse()
        .map(Some)
        .map_err(|_| CoreError::Validation(format!("{field} must be a whole number, got '{raw}'")))
}

/// Query of the new-node form page.
#[derive(Debug, Deserialize)]
pub struct NewNodeParams {
    pub parent_id: Option<DbId>,
}

/// Status and message for an error that should re-render the submitted
/// form instead of an error page.
fn form_rejection(err: &ServiceError<sqlx::Error>) -> Option<(StatusCode, String)> {
    match err {
        ServiceError::Core(CoreError::Validation(msg)) => {
            Some((StatusCode::BAD_REQUEST, msg.clone()))
        }
        ServiceError::Core(CoreError::Conflict(msg)) => Some((StatusCode::CONFLICT, msg.clone())),
        _ => None,
    }
}

fn see_other(path: String) -> Response {
    Redirect::to(&path).into_response()
}

// ---------------------------------------------------------------------------
// Trees
// ---------------------------------------------------------------------------

/// GET /
pub async fn tree_list(State(state): State<AppState>) -> PageResult<Html<String>> {
    let mut conn = state.pool.acquire().await?;
    let trees = tree_service::list_active_trees(&mut PgStore::new(&mut conn)).await?;
    Ok(Html(views::tree::tree_list(&trees)))
}

/// GET /trees/new
pub async fn new_tree_form() -> Html<String> {
    Html(views::tree::new_tree_form(&TreeForm::default(), None))
}

/// POST /trees
pub async fn create_tree(
    State(state): State<AppState>,
    Form(form): Form<TreeForm>,
) -> PageResult<Response> {
    let mut tx = state.pool.begin().await?;
    let result = tree_service::create_tree(&mut PgStore::new(&mut tx), form.to_new_tree()).await;

    match result {
        Ok(tree) => {
            tx.commit().await?;
            let id = tree.persisted_id().map_err(|e| PageError(e.into()))?;
            tracing::info!(tree_id = id, name = %tree.name, "Tree created from form");
            Ok(see_other(format!("/trees/{id}")))
        }
        Err(err) => match form_rejection(&err) {
            Some((status, message)) => Ok((
                status,
                Html(views::tree::new_tree_form(&form, Some(&message))),
            )
                .into_response()),
            None => Err(err.into()),
        },
    }
}

/// GET /trees/deleted
pub async fn deleted_trees(State(state): State<AppState>) -> PageResult<Html<String>> {
    let mut conn = state.pool.acquire().await?;
    let trees = tree_service::list_deleted_trees(&mut PgStore::new(&mut conn)).await?;
    Ok(Html(views::tree::deleted_trees(&trees)))
}

/// GET /trees/{id}
pub async fn tree_page(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> PageResult<Html<String>> {
    let mut conn = state.pool.acquire().await?;
    let (tree, forest) = node_service::load_forest(&mut PgStore::new(&mut conn), id).await?;
    Ok(Html(views::tree::tree_page(&tree, &forest)))
}

/// GET /trees/{id}/delete
pub async fn confirm_delete_tree(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> PageResult<Html<String>> {
    let mut conn = state.pool.acquire().await?;
    let mut store = PgStore::new(&mut conn);
    let tree = tree_service::get_active_tree(&mut store, id).await?;
    let nodes = node_service::list_nodes(&mut store, id).await?;
    Ok(Html(views::tree::delete_tree_confirm(&tree, nodes.len())))
}

/// POST /trees/{id}/delete
pub async fn delete_tree(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> PageResult<Response> {
    let mut conn = state.pool.acquire().await?;
    tree_service::soft_delete_tree(&mut PgStore::new(&mut conn), id).await?;

    tracing::info!(tree_id = id, "Tree soft-deleted from form");
    Ok(see_other("/".to_string()))
}

/// POST /trees/{id}/restore
pub async fn restore_tree(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> PageResult<Response> {
    let mut tx = state.pool.begin().await?;
    tree_service::restore_tree(&mut PgStore::new(&mut tx), id).await?;
    tx.commit().await?;

    tracing::info!(tree_id = id, "Tree restored from form");
    Ok(see_other(format!("/trees/{id}")))
}

// ---------------------------------------------------------------------------
// Nodes
// ---------------------------------------------------------------------------

/// GET /trees/{id}/nodes/new?parent_id=
pub async fn new_node_form(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<NewNodeParams>,
) -> PageResult<Html<String>> {
    let mut conn = state.pool.acquire().await?;
    let mut store = PgStore::new(&mut conn);
    let tree = tree_service::get_active_tree(&mut store, id).await?;
    let parent = match params.parent_id {
        Some(parent_id) => Some(node_service::get_node_in_tree(&mut store, id, parent_id).await?),
        None => None,
    };
    Ok(Html(views::node::new_node_form(
        &tree,
        parent.as_ref(),
        &NodeForm::default(),
        None,
    )))
}

/// POST /trees/{id}/nodes
pub async fn create_node(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Form(form): Form<NodeForm>,
) -> PageResult<Response> {
    let result = match form.to_new_node() {
        Ok(input) => {
            let mut tx = state.pool.begin().await?;
            let created = node_service::create_node(&mut PgStore::new(&mut tx), id, input).await;
            if created.is_ok() {
                tx.commit().await?;
            }
            created
        }
        Err(err) => Err(err.into()),
    };

    let err = match result {
        Ok(node) => {
            tracing::info!(
                tree_id = id,
                node_id = node.id,
                parent_id = node.parent_id,
                "Tree node created from form",
            );
            return Ok(see_other(format!("/trees/{id}")));
        }
        Err(err) => err,
    };
    let Some((status, message)) = form_rejection(&err) else {
        return Err(err.into());
    };

    // Re-render with the tree and, if it still resolves, the parent.
    let mut conn = state.pool.acquire().await?;
    let mut store = PgStore::new(&mut conn);
    let tree = tree_service::get_active_tree(&mut store, id).await?;
    let parent = match form.parent_id.trim().parse::<DbId>() {
        Ok(parent_id) => node_service::get_node_in_tree(&mut store, id, parent_id)
            .await
            .ok(),
        Err(_) => None,
    };
    Ok((
        status,
        Html(views::node::new_node_form(
            &tree,
            parent.as_ref(),
            &form,
            Some(&message),
        )),
    )
        .into_response())
}

/// GET /trees/{id}/nodes/{node_id}/delete
pub async fn confirm_delete_node(
    State(state): State<AppState>,
    Path((id, node_id)): Path<(DbId, DbId)>,
) -> PageResult<Html<String>> {
    let mut conn = state.pool.acquire().await?;
    let mut store = PgStore::new(&mut conn);
    let tree = tree_service::get_active_tree(&mut store, id).await?;
    let preview = node_service::delete_preview(&mut store, id, node_id).await?;
    Ok(Html(views::node::delete_node_confirm(&tree, &preview)))
}

/// POST /trees/{id}/nodes/{node_id}/delete
pub async fn delete_node(
    State(state): State<AppState>,
    Path((id, node_id)): Path<(DbId, DbId)>,
) -> PageResult<Response> {
    let mut tx = state.pool.begin().await?;
    let deleted = node_service::delete_node(&mut PgStore::new(&mut tx), id, node_id).await?;
    tx.commit().await?;

    tracing::info!(
        tree_id = id,
        node_id,
        deleted = deleted.len(),
        "Tree node deleted from form",
    );
    Ok(see_other(format!("/trees/{id}")))
}

/// POST /trees/{id}/nodes/{node_id}/sort-left
pub async fn sort_left(
    State(state): State<AppState>,
    Path((id, node_id)): Path<(DbId, DbId)>,
) -> PageResult<Response> {
    move_node(state, id, node_id, Direction::Left).await
}

/// POST /trees/{id}/nodes/{node_id}/sort-right
pub async fn sort_right(
    State(state): State<AppState>,
    Path((id, node_id)): Path<(DbId, DbId)>,
) -> PageResult<Response> {
    move_node(state, id, node_id, Direction::Right).await
}

async fn move_node(
    state: AppState,
    id: DbId,
    node_id: DbId,
    direction: Direction,
) -> PageResult<Response> {
    let mut tx = state.pool.begin().await?;
    node_service::move_node(&mut PgStore::new(&mut tx), id, node_id, direction).await?;
    tx.commit().await?;
    Ok(see_other(format!("/trees/{id}")))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn blank_numbers_are_unset() {
        let input = NodeForm {
            name: "Home".into(),
            ..NodeForm::default()
        }
        .to_new_node()
        .unwrap();
        assert_eq!(input.parent_id, None);
        assert_eq!(input.sort_order, None);
        assert_eq!(input.node_type, NodeKind::Simple);
    }

    #[test]
    fn numbers_are_parsed() {
        let input = NodeForm {
            name: "Home".into(),
            parent_id: " 12 ".into(),
            sort_order: "3".into(),
            node_type: "button".into(),
            button_text: "Go".into(),
            ..NodeForm::default()
        }
        .to_new_node()
        .unwrap();
        assert_eq!(input.parent_id, Some(12));
        assert_eq!(input.sort_order, Some(3));
        assert_eq!(input.node_type, NodeKind::Button);
    }

    #[test]
    fn non_numeric_sort_order_is_a_validation_error() {
        let result = NodeForm {
            name: "Home".into(),
            sort_order: "first".into(),
            ..NodeForm::default()
        }
        .to_new_node();
        assert_matches!(result, Err(CoreError::Validation(msg)) if msg.contains("Sort order"));
    }

    #[test]
    fn unknown_node_type_is_a_validation_error() {
        let result = NodeForm {
            name: "Home".into(),
            node_type: "link".into(),
            ..NodeForm::default()
        }
        .to_new_node();
        assert_matches!(result, Err(CoreError::Validation(_)));
    }

    #[test]
    fn only_validation_and_conflict_re_render() {
        let validation = ServiceError::Core(CoreError::Validation("bad".into()));
        assert_matches!(
            form_rejection(&validation),
            Some((status, msg)) if status == StatusCode::BAD_REQUEST && msg == "bad"
        );
        let conflict = ServiceError::Core(CoreError::Conflict("taken".into()));
        assert_matches!(
            form_rejection(&conflict),
            Some((status, _)) if status == StatusCode::CONFLICT
        );
        let missing: ServiceError<sqlx::Error> = ServiceError::not_found("Tree", 1);
        assert_matches!(form_rejection(&missing), None);
    }
}
