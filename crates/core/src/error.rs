use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// The tree has nodes but none of them is a root.
    #[error("Tree {tree_id} has {node_count} nodes but no root node")]
    MalformedHierarchy { tree_id: DbId, node_count: usize },

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error returned by the services that sit on top of the repository traits.
///
/// Domain failures are reported as [`CoreError`]; failures raised by the
/// repository itself are carried through untouched in `Repository`.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError<E> {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Repository(E),
}

impl<E> ServiceError<E> {
    /// Shorthand for a `NotFound` domain error.
    pub fn not_found(entity: &'static str, id: DbId) -> Self {
        Self::Core(CoreError::NotFound { entity, id })
    }

    /// Shorthand for a `Validation` domain error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Core(CoreError::Validation(msg.into()))
    }
}
