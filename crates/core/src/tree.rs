//! Tree entity, input DTOs, and field validation.
//!
//! A tree is a named container of nodes. Trees are never physically removed:
//! soft delete flips `is_active` to `false` and restore flips it back.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum allowed length (in characters) for a tree name.
pub const MAX_TREE_NAME_LENGTH: usize = 255;

/// Maximum allowed length (in characters) for a tree description.
pub const MAX_TREE_DESCRIPTION_LENGTH: usize = 1000;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A named container of nodes.
///
/// `id` is `None` until the tree is first persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tree {
    pub id: Option<DbId>,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Tree {
    /// Build a new, not yet persisted, active tree.
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            name: name.into(),
            description,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Refresh `updated_at` after a mutation.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// The database id, or an internal error for a tree that was never saved.
    pub fn persisted_id(&self) -> Result<DbId, CoreError> {
        self.id
            .ok_or_else(|| CoreError::Internal(format!("Tree '{}' has no id", self.name)))
    }

    /// Case-insensitive name comparison used for the active-name uniqueness rule.
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// DTO for creating a new tree.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTree {
    pub name: String,
    pub description: Option<String>,
}

/// DTO for updating an existing tree. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TreeUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a tree name: non-empty after trimming and within
/// [`MAX_TREE_NAME_LENGTH`] characters.
pub fn validate_tree_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(
            "Tree name must not be empty".to_string(),
        ));
    }
    let len = name.chars().count();
    if len > MAX_TREE_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Tree name must not exceed {MAX_TREE_NAME_LENGTH} characters, got {len}"
        )));
    }
    Ok(())
}

/// Validate an optional tree description against [`MAX_TREE_DESCRIPTION_LENGTH`].
pub fn validate_tree_description(description: Option<&str>) -> Result<(), CoreError> {
    let Some(description) = description else {
        return Ok(());
    };
    let len = description.chars().count();
    if len > MAX_TREE_DESCRIPTION_LENGTH {
        return Err(CoreError::Validation(format!(
            "Tree description must not exceed {MAX_TREE_DESCRIPTION_LENGTH} characters, got {len}"
        )));
    }
    Ok(())
}

/// Trim an optional free-text field, mapping blank input to `None`.
pub fn normalize_optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_tree_is_active_and_unsaved() {
        let tree = Tree::new("Menu", None);
        assert!(tree.id.is_none());
        assert!(tree.is_active);
        assert_eq!(tree.created_at, tree.updated_at);
    }

    #[test]
    fn persisted_id_requires_an_id() {
        let mut tree = Tree::new("Menu", None);
        assert!(tree.persisted_id().is_err());
        tree.id = Some(7);
        assert_eq!(tree.persisted_id().unwrap(), 7);
    }

    #[test]
    fn name_comparison_ignores_case() {
        let tree = Tree::new("Main Menu", None);
        assert!(tree.has_name("main menu"));
        assert!(tree.has_name("MAIN MENU"));
        assert!(!tree.has_name("Main"));
    }

    #[test]
    fn valid_name_at_max_length() {
        let name = "a".repeat(MAX_TREE_NAME_LENGTH);
        assert!(validate_tree_name(&name).is_ok());
    }

    #[test]
    fn rejects_blank_name() {
        assert!(validate_tree_name("").is_err());
        assert!(validate_tree_name("   ").is_err());
    }

    #[test]
    fn rejects_name_over_max_length() {
        let name = "a".repeat(MAX_TREE_NAME_LENGTH + 1);
        assert!(validate_tree_name(&name).is_err());
    }

    #[test]
    fn description_is_optional_but_bounded() {
        assert!(validate_tree_description(None).is_ok());
        let ok = "d".repeat(MAX_TREE_DESCRIPTION_LENGTH);
        assert!(validate_tree_description(Some(&ok)).is_ok());
        let too_long = "d".repeat(MAX_TREE_DESCRIPTION_LENGTH + 1);
        assert!(validate_tree_description(Some(&too_long)).is_err());
    }

    #[test]
    fn blank_optional_text_becomes_none() {
        assert_eq!(normalize_optional_text(Some("  ".into())), None);
        assert_eq!(
            normalize_optional_text(Some(" hi ".into())),
            Some("hi".to_string())
        );
        assert_eq!(normalize_optional_text(None), None);
    }
}
