use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::hashing::content_hash;
use crate::DomainError;

/// Artículo adjunto a un paso. El almacenamiento de artículos vive fuera del
/// núcleo; aquí sólo se conserva el contenido que el paso necesita mostrar y
/// snapshotear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    id: Uuid,
    title: String,
    content: String,
    summary: Option<String>,
}

impl Article {
    pub fn new(title: &str, content: &str, summary: Option<String>) -> Result<Self, DomainError> {
        if title.trim().is_empty() {
            return Err(DomainError::ValidationError("article title must not be empty".to_string()));
        }
        Ok(Article { id: Uuid::new_v4(),
                     title: title.to_string(),
                     content: content.to_string(),
                     summary })
    }

    pub fn id(&self) -> Uuid { self.id }
    pub fn title(&self) -> &str { &self.title }
    pub fn content(&self) -> &str { &self.content }
    pub fn summary(&self) -> Option<&str> { self.summary.as_deref() }

    /// Hash canónico del contenido visible del artículo.
    pub fn content_hash(&self) -> String {
        content_hash(&serde_json::json!({
            "title": self.title,
            "content": self.content,
            "summary": self.summary,
        }))
    }
}
