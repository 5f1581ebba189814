use crate::WorkId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("initialization failed: {0}")]
    Initialization(String),
    #[error("could not load works: {0}")]
    Load(String),
    #[error("missing required field(s): {}", .0.join(", "))]
    Validation(Vec<&'static str>),
    #[error("work with id {0} not found")]
    NotFound(WorkId),
    #[error("could not save works: {0}")]
    Persist(String),
    #[error("could not store upload: {0}")]
    UploadIo(String),
    #[error("could not delete image: {0}")]
    AssetCleanup(String),
}

impl CoreError {
    /// Errors caused by the request rather than by the store.
    pub fn is_client_error(&self) -> bool {
        matches!(self, CoreError::Validation(_) | CoreError::NotFound(_))
    }
}
