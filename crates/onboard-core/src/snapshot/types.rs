//! Shapes de los snapshots persistidos.
//!
//! Todos llevan `schema_version` (formato del snapshot) y `content_hash`
//! (hash canónico del contenido vivo al momento de la copia; si el
//! contenido se edita después, el hash delata la diferencia).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Copia del artículo leído, uno por (UserFlow, FlowStep).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleSnapshot {
    pub article_title: String,
    pub article_content: String,
    pub article_summary: String,
    pub content_hash: String,
    pub reading_started_at: DateTime<Utc>,
    pub schema_version: String,
    pub snapshot_created_at: DateTime<Utc>,
}

/// Copia de la tarea más el último intento del usuario. Se reutiliza entre
/// intentos: `attempts_count` crece y `user_answer`/`is_correct` reflejan
/// el intento más reciente.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSnapshot {
    pub task_title: String,
    pub task_description: String,
    pub task_instruction: String,
    pub task_code_word: String,
    pub task_hint: Option<String>,
    pub user_answer: String,
    pub is_correct: bool,
    pub attempts_count: u32,
    pub content_hash: String,
    pub schema_version: String,
    pub snapshot_created_at: DateTime<Utc>,
}

/// Variante de respuesta tal como se mostró.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizAnswerSnapshot {
    pub original_answer_id: Uuid,
    pub answer_text: String,
    pub is_correct: bool,
    pub answer_order: u32,
    pub explanation: String,
}

/// Pregunta tal como se mostró, con todas sus variantes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestionSnapshot {
    pub original_question_id: Uuid,
    pub question_text: String,
    pub question_order: u32,
    pub explanation: String,
    pub answer_options: Vec<QuizAnswerSnapshot>,
}

/// Respuesta elegida por el usuario, referida por ids originales.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserQuizAnswerSnapshot {
    pub question_id: Uuid,
    pub selected_answer_id: Uuid,
    pub is_correct: bool,
    pub answered_at: DateTime<Utc>,
}

/// Árbol completo del quiz al momento del scoring: quiz + cada pregunta +
/// cada variante + la elección del usuario por pregunta. Se escribe apruebe
/// o no; si el usuario reintenta tras reprobar, el árbol se reemplaza con
/// el scoring más reciente.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizSnapshot {
    pub quiz_title: String,
    pub quiz_description: String,
    pub passing_score_percentage: u32,
    pub total_questions: u32,
    pub correct_answers: u32,
    /// Porcentaje redondeado, para registro.
    pub score_percentage: u32,
    pub is_passed: bool,
    pub content_hash: String,
    pub questions: Vec<QuizQuestionSnapshot>,
    pub user_answers: Vec<UserQuizAnswerSnapshot>,
    pub schema_version: String,
    pub snapshot_created_at: DateTime<Utc>,
}
