//! Tree node entity and its closed set of variants.
//!
//! Every node carries the common hierarchy fields (`tree_id`, `parent_id`,
//! `sort_order`). The variant only adds presentation data, so the forest
//! builder, cascading delete and sibling sort never look at it.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::tree::normalize_optional_text;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum allowed length (in characters) for a node name.
pub const MAX_NODE_NAME_LENGTH: usize = 255;

/// Maximum allowed length (in characters) for a button label.
pub const MAX_BUTTON_TEXT_LENGTH: usize = 100;

/// Maximum allowed length (in characters) for a button action.
pub const MAX_BUTTON_ACTION_LENGTH: usize = 255;

/// `node_type` value stored for simple nodes.
pub const NODE_TYPE_SIMPLE: &str = "simple";

/// `node_type` value stored for button nodes.
pub const NODE_TYPE_BUTTON: &str = "button";

// ---------------------------------------------------------------------------
// Variant
// ---------------------------------------------------------------------------

/// Type-specific node data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "node_type", rename_all = "snake_case")]
pub enum NodeVariant {
    Simple,
    Button {
        button_text: String,
        button_action: Option<String>,
    },
}

impl NodeVariant {
    /// The `node_type` discriminator as stored in the database.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Simple => NODE_TYPE_SIMPLE,
            Self::Button { .. } => NODE_TYPE_BUTTON,
        }
    }

    /// Rebuild a variant from its persisted columns.
    pub fn from_columns(
        node_type: &str,
        button_text: Option<String>,
        button_action: Option<String>,
    ) -> Result<Self, CoreError> {
        match node_type {
            NODE_TYPE_SIMPLE => Ok(Self::Simple),
            NODE_TYPE_BUTTON => {
                let button_text = button_text.ok_or_else(|| {
                    CoreError::Internal("Button node is missing its button_text".to_string())
                })?;
                Ok(Self::Button {
                    button_text,
                    button_action,
                })
            }
            other => Err(CoreError::Internal(format!("Unknown node type '{other}'"))),
        }
    }
}

/// Discriminator accepted on input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    #[default]
    Simple,
    Button,
}

impl NodeKind {
    /// Parse a form value (`"simple"` or `"button"`).
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value.trim() {
            NODE_TYPE_SIMPLE => Ok(Self::Simple),
            NODE_TYPE_BUTTON => Ok(Self::Button),
            other => Err(CoreError::Validation(format!(
                "Invalid node type '{other}'. Must be one of: {NODE_TYPE_SIMPLE}, {NODE_TYPE_BUTTON}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A node within a tree.
///
/// `parent_id == None` marks a root node. `id` is `None` until first saved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode {
    pub id: Option<DbId>,
    pub tree_id: DbId,
    pub parent_id: Option<DbId>,
    pub name: String,
    pub sort_order: i32,
    #[serde(flatten)]
    pub variant: NodeVariant,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TreeNode {
    /// Build a new, not yet persisted, node.
    pub fn new(
        tree_id: DbId,
        parent_id: Option<DbId>,
        name: impl Into<String>,
        sort_order: i32,
        variant: NodeVariant,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            tree_id,
            parent_id,
            name: name.into(),
            sort_order,
            variant,
            created_at: now,
            updated_at: now,
        }
    }

    /// Shorthand for a new [`NodeVariant::Simple`] node.
    pub fn simple(
        tree_id: DbId,
        parent_id: Option<DbId>,
        name: impl Into<String>,
        sort_order: i32,
    ) -> Self {
        Self::new(tree_id, parent_id, name, sort_order, NodeVariant::Simple)
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Whether `other` shares this node's tree and parent.
    pub fn is_sibling_of(&self, other: &TreeNode) -> bool {
        self.tree_id == other.tree_id && self.parent_id == other.parent_id
    }

    /// Refresh `updated_at` after a mutation.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// The database id, or an internal error for a node that was never saved.
    pub fn persisted_id(&self) -> Result<DbId, CoreError> {
        self.id
            .ok_or_else(|| CoreError::Internal(format!("Node '{}' has no id", self.name)))
    }
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// DTO for creating a node. `tree_id` comes from the request path.
#[derive(Debug, Clone, Deserialize)]
pub struct NewNode {
    pub name: String,
    pub parent_id: Option<DbId>,
    /// Defaults to one past the largest sibling sort order if omitted.
    pub sort_order: Option<i32>,
    #[serde(default)]
    pub node_type: NodeKind,
    pub button_text: Option<String>,
    pub button_action: Option<String>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a node name: non-empty after trimming and within
/// [`MAX_NODE_NAME_LENGTH`] characters.
pub fn validate_node_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(
            "Node name must not be empty".to_string(),
        ));
    }
    let len = name.chars().count();
    if len > MAX_NODE_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Node name must not exceed {MAX_NODE_NAME_LENGTH} characters, got {len}"
        )));
    }
    Ok(())
}

/// Validate that a sort order is non-negative.
pub fn validate_sort_order(sort_order: i32) -> Result<(), CoreError> {
    if sort_order < 0 {
        return Err(CoreError::Validation(format!(
            "Sort order must be non-negative, got {sort_order}"
        )));
    }
    Ok(())
}

/// Build and validate the variant for a new node.
///
/// Button nodes require a non-blank `button_text`; a blank `button_action`
/// is stored as `None`. Button fields sent for a simple node are ignored.
pub fn build_variant(
    kind: NodeKind,
    button_text: Option<String>,
    button_action: Option<String>,
) -> Result<NodeVariant, CoreError> {
    match kind {
        NodeKind::Simple => Ok(NodeVariant::Simple),
        NodeKind::Button => {
            let button_text = normalize_optional_text(button_text).ok_or_else(|| {
                CoreError::Validation("Button text is required for button nodes".to_string())
            })?;
            let len = button_text.chars().count();
            if len > MAX_BUTTON_TEXT_LENGTH {
                return Err(CoreError::Validation(format!(
                    "Button text must not exceed {MAX_BUTTON_TEXT_LENGTH} characters, got {len}"
                )));
            }
            let button_action = normalize_optional_text(button_action);
            if let Some(action) = &button_action {
                let len = action.chars().count();
                if len > MAX_BUTTON_ACTION_LENGTH {
                    return Err(CoreError::Validation(format!(
                        "Button action must not exceed {MAX_BUTTON_ACTION_LENGTH} characters, got {len}"
                    )));
                }
            }
            Ok(NodeVariant::Button {
                button_text,
                button_action,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn root_and_sibling_checks() {
        let a = TreeNode::simple(1, None, "a", 0);
        let b = TreeNode::simple(1, None, "b", 1);
        let c = TreeNode::simple(1, Some(10), "c", 0);
        let other_tree = TreeNode::simple(2, None, "d", 0);

        assert!(a.is_root());
        assert!(!c.is_root());
        assert!(a.is_sibling_of(&b));
        assert!(!a.is_sibling_of(&c));
        assert!(!a.is_sibling_of(&other_tree));
    }

    #[test]
    fn variant_round_trips_through_columns() {
        let simple = NodeVariant::from_columns("simple", None, None).unwrap();
        assert_eq!(simple, NodeVariant::Simple);

        let button =
            NodeVariant::from_columns("button", Some("Go".into()), Some("/go".into())).unwrap();
        assert_eq!(button.type_name(), NODE_TYPE_BUTTON);
        assert_matches!(
            button,
            NodeVariant::Button { ref button_text, .. } if button_text == "Go"
        );
    }

    #[test]
    fn unknown_or_incomplete_columns_are_internal_errors() {
        assert_matches!(
            NodeVariant::from_columns("widget", None, None),
            Err(CoreError::Internal(_))
        );
        assert_matches!(
            NodeVariant::from_columns("button", None, None),
            Err(CoreError::Internal(_))
        );
    }

    #[test]
    fn node_kind_parses_form_values() {
        assert_eq!(NodeKind::parse("simple").unwrap(), NodeKind::Simple);
        assert_eq!(NodeKind::parse(" button ").unwrap(), NodeKind::Button);
        assert_matches!(NodeKind::parse("link"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn serializes_variant_fields_inline() {
        let mut node = TreeNode::new(
            3,
            None,
            "Buy",
            0,
            NodeVariant::Button {
                button_text: "Buy now".into(),
                button_action: None,
            },
        );
        node.id = Some(9);
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["id"], 9);
        assert_eq!(json["node_type"], "button");
        assert_eq!(json["button_text"], "Buy now");
        assert!(json["button_action"].is_null());
    }

    #[test]
    fn rejects_blank_and_long_names() {
        assert!(validate_node_name("Leaf").is_ok());
        assert!(validate_node_name(" ").is_err());
        assert!(validate_node_name(&"n".repeat(MAX_NODE_NAME_LENGTH + 1)).is_err());
    }

    #[test]
    fn rejects_negative_sort_order() {
        assert!(validate_sort_order(0).is_ok());
        assert!(validate_sort_order(-1).is_err());
    }

    #[test]
    fn simple_variant_ignores_button_fields() {
        let variant = build_variant(NodeKind::Simple, Some("x".into()), None).unwrap();
        assert_eq!(variant, NodeVariant::Simple);
    }

    #[test]
    fn button_variant_requires_text() {
        assert_matches!(
            build_variant(NodeKind::Button, None, None),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            build_variant(NodeKind::Button, Some("   ".into()), None),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn button_variant_enforces_lengths() {
        let long_text = "t".repeat(MAX_BUTTON_TEXT_LENGTH + 1);
        assert!(build_variant(NodeKind::Button, Some(long_text), None).is_err());

        let long_action = "a".repeat(MAX_BUTTON_ACTION_LENGTH + 1);
        assert!(build_variant(NodeKind::Button, Some("ok".into()), Some(long_action)).is_err());
    }

    #[test]
    fn blank_button_action_is_dropped() {
        let variant = build_variant(NodeKind::Button, Some(" Go ".into()), Some(" ".into())).unwrap();
        assert_eq!(
            variant,
            NodeVariant::Button {
                button_text: "Go".into(),
                button_action: None,
            }
        );
    }
}
