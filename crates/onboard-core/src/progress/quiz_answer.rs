use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Respuesta de un usuario a una pregunta de quiz. Única por par
/// (UserFlow, pregunta): reenviar sobreescribe, no acumula.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserQuizAnswer {
    question_id: Uuid,
    selected_answer_id: Uuid,
    is_correct: bool,
    answered_at: DateTime<Utc>,
}

impl UserQuizAnswer {
    pub fn new(question_id: Uuid, selected_answer_id: Uuid, is_correct: bool) -> Self {
        UserQuizAnswer { question_id,
                         selected_answer_id,
                         is_correct,
                         answered_at: Utc::now() }
    }

    pub fn question_id(&self) -> Uuid { self.question_id }
    pub fn selected_answer_id(&self) -> Uuid { self.selected_answer_id }
    pub fn is_correct(&self) -> bool { self.is_correct }
    pub fn answered_at(&self) -> DateTime<Utc> { self.answered_at }
}
