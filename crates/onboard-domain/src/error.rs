use thiserror::Error;

/// Error del dominio de contenido (flujos, pasos, quizzes).
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    ValidationError(String),

    #[error("serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for DomainError {
    fn from(e: serde_json::Error) -> Self {
        DomainError::SerializationError(e.to_string())
    }
}
