use crate::types::EntityId;

/// Domain-level error type shared across the workspace.
///
/// HTTP-specific concerns (status codes, response bodies) live in the API
/// crate's `AppError`, which wraps this type.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An entity lookup by id came back empty.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: EntityId },

    /// Input failed a domain validation rule.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An unexpected internal failure with a human-readable message.
    #[error("Internal error: {0}")]
    Internal(String),
}
