//! Construcción de snapshots a partir del contenido vivo y el estado del
//! aggregate.

use chrono::{DateTime, Utc};
use onboard_domain::{Article, Quiz, Task};
use std::collections::HashMap;
use uuid::Uuid;

use super::{ArticleSnapshot, QuizAnswerSnapshot, QuizQuestionSnapshot, QuizSnapshot, TaskSnapshot,
            UserQuizAnswerSnapshot};
use crate::constants::SNAPSHOT_SCHEMA_VERSION;
use crate::progress::UserQuizAnswer;

pub fn article_snapshot(article: &Article, reading_started_at: DateTime<Utc>) -> ArticleSnapshot {
    ArticleSnapshot { article_title: article.title().to_string(),
                      article_content: article.content().to_string(),
                      article_summary: article.summary().unwrap_or("").to_string(),
                      content_hash: article.content_hash(),
                      reading_started_at,
                      schema_version: SNAPSHOT_SCHEMA_VERSION.to_string(),
                      snapshot_created_at: Utc::now() }
}

/// Copia de la tarea con el intento actual. Si ya existía un snapshot (un
/// intento previo), el contador de intentos continúa desde él.
pub fn task_snapshot(task: &Task, user_answer: &str, is_correct: bool, prior: Option<TaskSnapshot>) -> TaskSnapshot {
    let attempts = prior.map(|p| p.attempts_count + 1).unwrap_or(1);
    TaskSnapshot { task_title: task.title().to_string(),
                   task_description: task.description().to_string(),
                   task_instruction: task.instruction().to_string(),
                   task_code_word: task.code_word().to_string(),
                   task_hint: task.hint().map(|h| h.to_string()),
                   user_answer: user_answer.to_string(),
                   is_correct,
                   attempts_count: attempts,
                   content_hash: task.content_hash(),
                   schema_version: SNAPSHOT_SCHEMA_VERSION.to_string(),
                   snapshot_created_at: Utc::now() }
}

/// Árbol completo del quiz: cada pregunta con todas sus variantes más la
/// elección del usuario. Asume que `answers` cubre todas las preguntas del
/// quiz (el motor sólo puntúa con el quiz completamente respondido).
pub fn quiz_snapshot(quiz: &Quiz, answers: &HashMap<Uuid, UserQuizAnswer>) -> QuizSnapshot {
    let mut questions = Vec::with_capacity(quiz.total_questions());
    let mut user_answers = Vec::with_capacity(quiz.total_questions());
    let mut correct_count = 0usize;

    for question in quiz.questions() {
        let answer_options = question.answers()
                                     .iter()
                                     .map(|a| QuizAnswerSnapshot { original_answer_id: a.id(),
                                                                   answer_text: a.answer_text().to_string(),
                                                                   is_correct: a.is_correct(),
                                                                   answer_order: a.order(),
                                                                   explanation: a.explanation().to_string() })
                                     .collect();
        questions.push(QuizQuestionSnapshot { original_question_id: question.id(),
                                              question_text: question.question().to_string(),
                                              question_order: question.order(),
                                              explanation: question.explanation().unwrap_or("").to_string(),
                                              answer_options });

        if let Some(user_answer) = answers.get(&question.id()) {
            if user_answer.is_correct() {
                correct_count += 1;
            }
            user_answers.push(UserQuizAnswerSnapshot { question_id: question.id(),
                                                       selected_answer_id: user_answer.selected_answer_id(),
                                                       is_correct: user_answer.is_correct(),
                                                       answered_at: user_answer.answered_at() });
        }
    }

    QuizSnapshot { quiz_title: quiz.title().to_string(),
                   quiz_description: quiz.description().unwrap_or("").to_string(),
                   passing_score_percentage: quiz.passing_score_percentage(),
                   total_questions: quiz.total_questions() as u32,
                   correct_answers: correct_count as u32,
                   score_percentage: quiz.score_percentage_rounded(correct_count),
                   is_passed: quiz.is_passing_score(correct_count),
                   content_hash: quiz.content_hash(),
                   questions,
                   user_answers,
                   schema_version: SNAPSHOT_SCHEMA_VERSION.to_string(),
                   snapshot_created_at: Utc::now() }
}
