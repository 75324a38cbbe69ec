use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::hashing::content_hash;
use crate::DomainError;

/// Tarea de palabra clave: el usuario debe encontrar un código oculto
/// siguiendo la instrucción y enviarlo como respuesta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: Uuid,
    title: String,
    description: String,
    instruction: String,
    code_word: String,
    hint: Option<String>,
}

impl Task {
    /// # Errores
    /// `DomainError::ValidationError` si la palabra clave queda vacía tras
    /// recortar espacios.
    pub fn new(title: &str,
               description: &str,
               instruction: &str,
               code_word: &str,
               hint: Option<String>)
               -> Result<Self, DomainError> {
        if code_word.trim().is_empty() {
            return Err(DomainError::ValidationError("task code word must not be empty".to_string()));
        }
        if title.trim().is_empty() {
            return Err(DomainError::ValidationError("task title must not be empty".to_string()));
        }
        Ok(Task { id: Uuid::new_v4(),
                  title: title.to_string(),
                  description: description.to_string(),
                  instruction: instruction.to_string(),
                  code_word: code_word.to_string(),
                  hint })
    }

    pub fn id(&self) -> Uuid { self.id }
    pub fn title(&self) -> &str { &self.title }
    pub fn description(&self) -> &str { &self.description }
    pub fn instruction(&self) -> &str { &self.instruction }
    pub fn code_word(&self) -> &str { &self.code_word }
    pub fn hint(&self) -> Option<&str> { self.hint.as_deref() }

    /// Comparación sin distinción de mayúsculas y con recorte de espacios.
    /// Una respuesta equivocada es entrada esperada, no un error.
    pub fn check_answer(&self, answer: &str) -> bool {
        answer.trim().to_lowercase() == self.code_word.trim().to_lowercase()
    }

    pub fn content_hash(&self) -> String {
        content_hash(&serde_json::json!({
            "title": self.title,
            "description": self.description,
            "instruction": self.instruction,
            "code_word": self.code_word,
            "hint": self.hint,
        }))
    }
}
