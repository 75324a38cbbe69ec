//! Quiz, preguntas y variantes de respuesta.
//!
//! Invariantes impuestas en construcción:
//! - `passing_score_percentage` en 1..=100.
//! - Al menos una pregunta por quiz; al menos dos variantes por pregunta.
//! - Exactamente una variante correcta por pregunta (la lógica de puntaje
//!   lo asume).
//! - `order` único dentro de su colección (preguntas por quiz, variantes
//!   por pregunta).

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use crate::hashing::content_hash;
use crate::DomainError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizAnswer {
    id: Uuid,
    answer_text: String,
    is_correct: bool,
    explanation: String,
    order: u32,
}

impl QuizAnswer {
    pub fn new(answer_text: &str, is_correct: bool, explanation: &str, order: u32) -> Result<Self, DomainError> {
        if answer_text.trim().is_empty() {
            return Err(DomainError::ValidationError("answer text must not be empty".to_string()));
        }
        if order < 1 {
            return Err(DomainError::ValidationError("answer order must be >= 1".to_string()));
        }
        Ok(QuizAnswer { id: Uuid::new_v4(),
                        answer_text: answer_text.to_string(),
                        is_correct,
                        explanation: explanation.to_string(),
                        order })
    }

    pub fn id(&self) -> Uuid { self.id }
    pub fn answer_text(&self) -> &str { &self.answer_text }
    pub fn is_correct(&self) -> bool { self.is_correct }
    pub fn explanation(&self) -> &str { &self.explanation }
    pub fn order(&self) -> u32 { self.order }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    id: Uuid,
    question: String,
    explanation: Option<String>,
    order: u32,
    answers: Vec<QuizAnswer>,
}

impl QuizQuestion {
    pub fn new(question: &str,
               explanation: Option<String>,
               order: u32,
               answers: Vec<QuizAnswer>)
               -> Result<Self, DomainError> {
        if question.trim().is_empty() {
            return Err(DomainError::ValidationError("question text must not be empty".to_string()));
        }
        if order < 1 {
            return Err(DomainError::ValidationError("question order must be >= 1".to_string()));
        }
        if answers.len() < 2 {
            return Err(DomainError::ValidationError(format!("question '{}' needs at least two answer options",
                                                            question)));
        }
        let correct = answers.iter().filter(|a| a.is_correct()).count();
        if correct != 1 {
            return Err(DomainError::ValidationError(format!("question '{}' must have exactly one correct answer, got {}",
                                                            question, correct)));
        }
        let mut seen_orders = HashSet::new();
        for a in &answers {
            if !seen_orders.insert(a.order()) {
                return Err(DomainError::ValidationError(format!("duplicate answer order {} in question '{}'",
                                                                a.order(),
                                                                question)));
            }
        }
        let mut answers = answers;
        answers.sort_by_key(|a| a.order());
        Ok(QuizQuestion { id: Uuid::new_v4(),
                          question: question.to_string(),
                          explanation,
                          order,
                          answers })
    }

    pub fn id(&self) -> Uuid { self.id }
    pub fn question(&self) -> &str { &self.question }
    pub fn explanation(&self) -> Option<&str> { self.explanation.as_deref() }
    pub fn order(&self) -> u32 { self.order }

    /// Variantes en orden de presentación.
    pub fn answers(&self) -> &[QuizAnswer] { &self.answers }

    pub fn answer(&self, answer_id: Uuid) -> Option<&QuizAnswer> {
        self.answers.iter().find(|a| a.id() == answer_id)
    }

    /// La única variante marcada como correcta.
    pub fn correct_answer(&self) -> &QuizAnswer {
        // La construcción garantiza exactamente una
        self.answers.iter().find(|a| a.is_correct()).expect("validated at construction")
    }
}

/// Quiz: chequeo de conocimiento con umbral de aprobación.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    id: Uuid,
    title: String,
    description: Option<String>,
    passing_score_percentage: u32,
    shuffle_questions: bool,
    shuffle_answers: bool,
    questions: Vec<QuizQuestion>,
}

impl Quiz {
    pub fn new(title: &str,
               description: Option<String>,
               passing_score_percentage: u32,
               shuffle_questions: bool,
               shuffle_answers: bool,
               questions: Vec<QuizQuestion>)
               -> Result<Self, DomainError> {
        if title.trim().is_empty() {
            return Err(DomainError::ValidationError("quiz title must not be empty".to_string()));
        }
        if !(1..=100).contains(&passing_score_percentage) {
            return Err(DomainError::ValidationError(format!("passing score must be within 1..=100, got {}",
                                                            passing_score_percentage)));
        }
        if questions.is_empty() {
            return Err(DomainError::ValidationError("quiz must have at least one question".to_string()));
        }
        let mut seen_orders = HashSet::new();
        for q in &questions {
            if !seen_orders.insert(q.order()) {
                return Err(DomainError::ValidationError(format!("duplicate question order {} in quiz '{}'",
                                                                q.order(),
                                                                title)));
            }
        }
        let mut questions = questions;
        questions.sort_by_key(|q| q.order());
        Ok(Quiz { id: Uuid::new_v4(),
                  title: title.to_string(),
                  description,
                  passing_score_percentage,
                  shuffle_questions,
                  shuffle_answers,
                  questions })
    }

    pub fn id(&self) -> Uuid { self.id }
    pub fn title(&self) -> &str { &self.title }
    pub fn description(&self) -> Option<&str> { self.description.as_deref() }
    pub fn passing_score_percentage(&self) -> u32 { self.passing_score_percentage }
    pub fn shuffle_questions(&self) -> bool { self.shuffle_questions }
    pub fn shuffle_answers(&self) -> bool { self.shuffle_answers }
    pub fn questions(&self) -> &[QuizQuestion] { &self.questions }
    pub fn total_questions(&self) -> usize { self.questions.len() }

    pub fn question(&self, question_id: Uuid) -> Option<&QuizQuestion> {
        self.questions.iter().find(|q| q.id() == question_id)
    }

    /// Porcentaje entero truncado. Es el valor que se compara contra el
    /// umbral de aprobación.
    pub fn score_percentage(&self, correct_answers: usize) -> u32 {
        (correct_answers as u32 * 100) / self.questions.len() as u32
    }

    /// Porcentaje redondeado, para registro en snapshots.
    pub fn score_percentage_rounded(&self, correct_answers: usize) -> u32 {
        ((correct_answers as f64 / self.questions.len() as f64) * 100.0).round() as u32
    }

    /// Aprueba sii el porcentaje truncado alcanza el umbral.
    pub fn is_passing_score(&self, correct_answers: usize) -> bool {
        self.score_percentage(correct_answers) >= self.passing_score_percentage
    }

    pub fn content_hash(&self) -> String {
        let questions: Vec<serde_json::Value> =
            self.questions
                .iter()
                .map(|q| {
                    let answers: Vec<serde_json::Value> =
                        q.answers()
                         .iter()
                         .map(|a| {
                             serde_json::json!({
                                 "text": a.answer_text(),
                                 "is_correct": a.is_correct(),
                                 "explanation": a.explanation(),
                                 "order": a.order(),
                             })
                         })
                         .collect();
                    serde_json::json!({
                        "question": q.question(),
                        "explanation": q.explanation(),
                        "order": q.order(),
                        "answers": answers,
                    })
                })
                .collect();
        content_hash(&serde_json::json!({
            "title": self.title,
            "description": self.description,
            "passing_score_percentage": self.passing_score_percentage,
            "questions": questions,
        }))
    }
}
