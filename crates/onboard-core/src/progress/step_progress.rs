//! Progreso de un usuario sobre un paso concreto del flujo.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::StepStatus;

/// Un registro por par (UserFlow, FlowStep), creado en bloque al iniciar el
/// flujo. La accesibilidad NO se guarda aquí: se computa contra el estado
/// del flujo y del paso anterior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStepProgress {
    id: Uuid,
    flow_step_id: Uuid,
    status: StepStatus,
    article_read_at: Option<DateTime<Utc>>,
    task_completed_at: Option<DateTime<Utc>>,
    quiz_completed_at: Option<DateTime<Utc>>,
    quiz_correct_answers: Option<u32>,
    quiz_total_questions: Option<u32>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

impl UserStepProgress {
    pub fn new(flow_step_id: Uuid, status: StepStatus) -> Self {
        UserStepProgress { id: Uuid::new_v4(),
                           flow_step_id,
                           status,
                           article_read_at: None,
                           task_completed_at: None,
                           quiz_completed_at: None,
                           quiz_correct_answers: None,
                           quiz_total_questions: None,
                           started_at: None,
                           completed_at: None }
    }

    pub fn id(&self) -> Uuid { self.id }
    pub fn flow_step_id(&self) -> Uuid { self.flow_step_id }
    pub fn status(&self) -> StepStatus { self.status }
    pub fn article_read_at(&self) -> Option<DateTime<Utc>> { self.article_read_at }
    pub fn task_completed_at(&self) -> Option<DateTime<Utc>> { self.task_completed_at }
    pub fn quiz_completed_at(&self) -> Option<DateTime<Utc>> { self.quiz_completed_at }
    pub fn quiz_correct_answers(&self) -> Option<u32> { self.quiz_correct_answers }
    pub fn quiz_total_questions(&self) -> Option<u32> { self.quiz_total_questions }
    pub fn started_at(&self) -> Option<DateTime<Utc>> { self.started_at }
    pub fn completed_at(&self) -> Option<DateTime<Utc>> { self.completed_at }

    pub fn is_completed(&self) -> bool { self.status == StepStatus::Completed }

    /// Desbloqueo: sólo actúa sobre un paso `Locked`; nunca pisa un paso ya
    /// disponible, en curso o completado.
    pub(crate) fn unlock(&mut self) {
        if self.status == StepStatus::Locked {
            self.status = StepStatus::Available;
        }
    }

    /// Primera interacción del usuario con el paso.
    pub(crate) fn begin(&mut self) {
        if self.status == StepStatus::Available {
            self.status = StepStatus::InProgress;
            self.started_at = Some(Utc::now());
        }
    }

    pub(crate) fn stamp_article_read(&mut self) -> DateTime<Utc> {
        let at = self.article_read_at.unwrap_or_else(Utc::now);
        self.article_read_at = Some(at);
        at
    }

    pub(crate) fn stamp_task_completed(&mut self) {
        if self.task_completed_at.is_none() {
            self.task_completed_at = Some(Utc::now());
        }
    }

    /// Registra el resultado de un scoring completo del quiz (apruebe o no).
    pub(crate) fn stamp_quiz_scored(&mut self, correct: u32, total: u32) {
        self.quiz_completed_at = Some(Utc::now());
        self.quiz_correct_answers = Some(correct);
        self.quiz_total_questions = Some(total);
    }

    pub(crate) fn complete(&mut self) {
        self.status = StepStatus::Completed;
        self.completed_at = Some(Utc::now());
    }

    pub fn quiz_score_percentage(&self) -> Option<f64> {
        match (self.quiz_correct_answers, self.quiz_total_questions) {
            (Some(correct), Some(total)) if total > 0 => Some(correct as f64 / total as f64 * 100.0),
            _ => None,
        }
    }
}
