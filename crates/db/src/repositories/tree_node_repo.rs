//! Repository for the `tree_nodes` table.

use arbor_core::node::TreeNode;
use arbor_core::types::DbId;
use sqlx::PgConnection;

use crate::models::tree_node::{variant_columns, TreeNodeRow};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, tree_id, parent_id, name, node_type, button_text, button_action, \
                       sort_order, created_at, updated_at";

/// Provides CRUD operations for tree nodes. Deletes are hard deletes of a
/// single row.
pub struct TreeNodeRepo;

impl TreeNodeRepo {
    /// Insert a new node, returning the created row.
    pub async fn create(conn: &mut PgConnection, node: &TreeNode) -> Result<TreeNode, sqlx::Error> {
        let (node_type, button_text, button_action) = variant_columns(&node.variant);
        let query = format!(
            "INSERT INTO tree_nodes \
                (tree_id, parent_id, name, node_type, button_text, button_action, sort_order, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TreeNodeRow>(&query)
            .bind(node.tree_id)
            .bind(node.parent_id)
            .bind(&node.name)
            .bind(node_type)
            .bind(button_text)
            .bind(button_action)
            .bind(node.sort_order)
            .bind(node.created_at)
            .fetch_one(conn)
            .await?
            .into_node()
    }

    /// Overwrite the mutable columns of an existing node. `tree_id` is
    /// immutable.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        conn: &mut PgConnection,
        id: DbId,
        node: &TreeNode,
    ) -> Result<Option<TreeNode>, sqlx::Error> {
        let (node_type, button_text, button_action) = variant_columns(&node.variant);
        let query = format!(
            "UPDATE tree_nodes SET \
                parent_id = $2, \
                name = $3, \
                node_type = $4, \
                button_text = $5, \
                button_action = $6, \
                sort_order = $7 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TreeNodeRow>(&query)
            .bind(id)
            .bind(node.parent_id)
            .bind(&node.name)
            .bind(node_type)
            .bind(button_text)
            .bind(button_action)
            .bind(node.sort_order)
            .fetch_optional(conn)
            .await?
            .map(TreeNodeRow::into_node)
            .transpose()
    }

    /// Find a node by its internal ID.
    pub async fn find_by_id(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<TreeNode>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tree_nodes WHERE id = $1");
        sqlx::query_as::<_, TreeNodeRow>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await?
            .map(TreeNodeRow::into_node)
            .transpose()
    }

    /// List every node of a tree.
    ///
    /// Roots first, then by sort_order, with the id as tie-break.
    pub async fn list_by_tree(
        conn: &mut PgConnection,
        tree_id: DbId,
    ) -> Result<Vec<TreeNode>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tree_nodes WHERE tree_id = $1 \
             ORDER BY parent_id NULLS FIRST, sort_order, id"
        );
        sqlx::query_as::<_, TreeNodeRow>(&query)
            .bind(tree_id)
            .fetch_all(conn)
            .await?
            .into_iter()
            .map(TreeNodeRow::into_node)
            .collect()
    }

    /// List the direct children of a node, ordered by sort_order then id.
    pub async fn list_children(
        conn: &mut PgConnection,
        parent_id: DbId,
    ) -> Result<Vec<TreeNode>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tree_nodes WHERE parent_id = $1 ORDER BY sort_order, id"
        );
        sqlx::query_as::<_, TreeNodeRow>(&query)
            .bind(parent_id)
            .fetch_all(conn)
            .await?
            .into_iter()
            .map(TreeNodeRow::into_node)
            .collect()
    }

    /// Permanently delete a single node. Returns `true` if a row was removed.
    pub async fn delete(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tree_nodes WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
