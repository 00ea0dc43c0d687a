//! Repository for the `trees` table.

use arbor_core::tree::Tree;
use arbor_core::types::DbId;
use sqlx::PgConnection;

use crate::models::tree::TreeRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, is_active, created_at, updated_at";

/// Provides CRUD and soft-delete operations for trees.
pub struct TreeRepo;

impl TreeRepo {
    /// Insert a new tree, returning the created row.
    pub async fn create(conn: &mut PgConnection, tree: &Tree) -> Result<Tree, sqlx::Error> {
        let query = format!(
            "INSERT INTO trees (name, description, is_active, created_at) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, TreeRow>(&query)
            .bind(&tree.name)
            .bind(&tree.description)
            .bind(tree.is_active)
            .bind(tree.created_at)
            .fetch_one(conn)
            .await?;
        Ok(row.into())
    }

    /// Overwrite the mutable columns of an existing tree.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        conn: &mut PgConnection,
        id: DbId,
        tree: &Tree,
    ) -> Result<Option<Tree>, sqlx::Error> {
        let query = format!(
            "UPDATE trees SET \
                name = $2, \
                description = $3, \
                is_active = $4 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, TreeRow>(&query)
            .bind(id)
            .bind(&tree.name)
            .bind(&tree.description)
            .bind(tree.is_active)
            .fetch_optional(conn)
            .await?;
        Ok(row.map(Tree::from))
    }

    /// Find a tree by ID, including soft-deleted rows.
    pub async fn find_by_id(conn: &mut PgConnection, id: DbId) -> Result<Option<Tree>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM trees WHERE id = $1");
        let row = sqlx::query_as::<_, TreeRow>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await?;
        Ok(row.map(Tree::from))
    }

    /// List trees with the given active flag, most recently created first.
    pub async fn list(conn: &mut PgConnection, is_active: bool) -> Result<Vec<Tree>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM trees WHERE is_active = $1 ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, TreeRow>(&query)
            .bind(is_active)
            .fetch_all(conn)
            .await?;
        Ok(rows.into_iter().map(Tree::from).collect())
    }

    /// Soft-delete a tree by ID. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE trees SET is_active = false WHERE id = $1 AND is_active = true")
                .bind(id)
                .execute(conn)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Restore a soft-deleted tree. Returns `true` if a row was restored.
    pub async fn restore(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE trees SET is_active = true WHERE id = $1 AND is_active = false")
                .bind(id)
                .execute(conn)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
