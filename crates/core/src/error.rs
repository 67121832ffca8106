use crate::types::DbId;

/// Domain error taxonomy.
///
/// Every failure kind here is recoverable at the call boundary: the API
/// layer maps each variant to an HTTP status and none of them crash the
/// process.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The requested transition is illegal from the entity's current status.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Another officer claimed the alert first.
    #[error("Alert {0} has already been claimed")]
    AlreadyClaimed(DbId),

    /// The user already owns an unexpired active safe-walk session.
    #[error("An active safe-walk session already exists (id {0})")]
    AlreadyActive(DbId),

    #[error("Internal error: {0}")]
    Internal(String),
}
