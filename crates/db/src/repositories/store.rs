//! [`PgStore`]: the `arbor_core` repository traits over one Postgres
//! connection.
//!
//! Build it from a pooled connection for reads, or from a transaction when a
//! service performs several writes that must commit together.

use arbor_core::node::TreeNode;
use arbor_core::repository::{Repository, TreeNodeRepository, TreeRepository};
use arbor_core::tree::Tree;
use arbor_core::types::DbId;
use sqlx::PgConnection;

use crate::repositories::{TreeNodeRepo, TreeRepo};

pub struct PgStore<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> PgStore<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }
}

impl Repository for PgStore<'_> {
    type Error = sqlx::Error;
}

impl TreeRepository for PgStore<'_> {
    async fn find_tree(&mut self, id: DbId) -> Result<Option<Tree>, sqlx::Error> {
        TreeRepo::find_by_id(&mut *self.conn, id).await
    }

    async fn find_active_trees(&mut self) -> Result<Vec<Tree>, sqlx::Error> {
        tracing::debug!("Listing active trees");
        TreeRepo::list(&mut *self.conn, true).await
    }

    async fn find_deleted_trees(&mut self) -> Result<Vec<Tree>, sqlx::Error> {
        TreeRepo::list(&mut *self.conn, false).await
    }

    async fn save_tree(&mut self, tree: &Tree) -> Result<Tree, sqlx::Error> {
        match tree.id {
            None => TreeRepo::create(&mut *self.conn, tree).await,
            Some(id) => TreeRepo::update(&mut *self.conn, id, tree)
                .await?
                .ok_or(sqlx::Error::RowNotFound),
        }
    }

    async fn soft_delete_tree(&mut self, id: DbId) -> Result<bool, sqlx::Error> {
        tracing::debug!(tree_id = id, "Soft-deleting tree");
        TreeRepo::soft_delete(&mut *self.conn, id).await
    }

    async fn restore_tree(&mut self, id: DbId) -> Result<bool, sqlx::Error> {
        tracing::debug!(tree_id = id, "Restoring tree");
        TreeRepo::restore(&mut *self.conn, id).await
    }
}

impl TreeNodeRepository for PgStore<'_> {
    async fn find_node(&mut self, id: DbId) -> Result<Option<TreeNode>, sqlx::Error> {
        TreeNodeRepo::find_by_id(&mut *self.conn, id).await
    }

    async fn find_nodes_by_tree(&mut self, tree_id: DbId) -> Result<Vec<TreeNode>, sqlx::Error> {
        tracing::debug!(tree_id, "Listing tree nodes");
        TreeNodeRepo::list_by_tree(&mut *self.conn, tree_id).await
    }

    async fn find_children(&mut self, parent_id: DbId) -> Result<Vec<TreeNode>, sqlx::Error> {
        TreeNodeRepo::list_children(&mut *self.conn, parent_id).await
    }

    async fn save_node(&mut self, node: &TreeNode) -> Result<TreeNode, sqlx::Error> {
        match node.id {
            None => TreeNodeRepo::create(&mut *self.conn, node).await,
            Some(id) => TreeNodeRepo::update(&mut *self.conn, id, node)
                .await?
                .ok_or(sqlx::Error::RowNotFound),
        }
    }

    async fn delete_node(&mut self, id: DbId) -> Result<bool, sqlx::Error> {
        tracing::debug!(node_id = id, "Deleting tree node");
        TreeNodeRepo::delete(&mut *self.conn, id).await
    }
}
