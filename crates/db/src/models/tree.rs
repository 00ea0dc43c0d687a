//! Tree row model.

use arbor_core::tree::Tree;
use arbor_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `trees` table.
#[derive(Debug, Clone, FromRow)]
pub struct TreeRow {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<TreeRow> for Tree {
    fn from(row: TreeRow) -> Self {
        Tree {
            id: Some(row.id),
            name: row.name,
            description: row.description,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
