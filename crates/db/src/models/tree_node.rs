//! Tree node row model.
//!
//! The node variant is spread over `node_type`, `button_text` and
//! `button_action`; [`TreeNodeRow::into_node`] folds them back into a
//! [`NodeVariant`].

use arbor_core::node::{NodeVariant, TreeNode};
use arbor_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `tree_nodes` table.
#[derive(Debug, Clone, FromRow)]
pub struct TreeNodeRow {
    pub id: DbId,
    pub tree_id: DbId,
    pub parent_id: Option<DbId>,
    pub name: String,
    pub node_type: String,
    pub button_text: Option<String>,
    pub button_action: Option<String>,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TreeNodeRow {
    /// Convert into the domain entity. A row with an unknown `node_type` or a
    /// button without text surfaces as a decode error.
    pub fn into_node(self) -> Result<TreeNode, sqlx::Error> {
        let variant = NodeVariant::from_columns(&self.node_type, self.button_text, self.button_action)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        Ok(TreeNode {
            id: Some(self.id),
            tree_id: self.tree_id,
            parent_id: self.parent_id,
            name: self.name,
            sort_order: self.sort_order,
            variant,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Split a variant into its `(node_type, button_text, button_action)` columns.
pub fn variant_columns(variant: &NodeVariant) -> (&'static str, Option<&str>, Option<&str>) {
    match variant {
        NodeVariant::Simple => (variant.type_name(), None, None),
        NodeVariant::Button {
            button_text,
            button_action,
        } => (
            variant.type_name(),
            Some(button_text.as_str()),
            button_action.as_deref(),
        ),
    }
}
