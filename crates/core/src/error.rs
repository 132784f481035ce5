#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Duplicate session id: {0}")]
    DuplicateSessionId(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Upstream store unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
