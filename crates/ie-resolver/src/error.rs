use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolveError {
    /// The user name, or an identifier resolved earlier in the invocation, does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Transport, auth, throttling or any other failure reported by a remote service.
    #[error("Service error: {0}")]
    Service(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ResolveError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ResolveError::NotFound(_))
    }
}
