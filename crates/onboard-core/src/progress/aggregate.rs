//! FlowProgress: el aggregate por instancia de flujo.
//!
//! Rol:
//! - Agrupa UserFlow + un UserStepProgress por paso activo + buddies +
//!   respuestas de quiz. Es la unidad de contención: toda operación de
//!   nivel superior muta un único aggregate bajo un único lock.
//! - El mapa de pasos preserva el orden de ejecución del flujo (inserción
//!   ordenada por `order`) y permite lookup O(1) por id de paso.
//! - La accesibilidad se computa aquí, nunca se almacena.

use indexmap::IndexMap;
use onboard_domain::Flow;
use std::collections::HashMap;
use uuid::Uuid;

use super::{FlowBuddy, FlowStatus, StepStatus, UserFlow, UserQuizAnswer, UserStepProgress};

#[derive(Debug, Clone)]
pub struct FlowProgress {
    pub user_flow: UserFlow,
    /// Progreso por paso, en orden de ejecución del flujo.
    pub steps: IndexMap<Uuid, UserStepProgress>,
    pub buddies: Vec<FlowBuddy>,
    /// Respuestas de quiz por id de pregunta (upsert).
    pub quiz_answers: HashMap<Uuid, UserQuizAnswer>,
}

impl FlowProgress {
    /// Creación en bloque al iniciar: un registro por paso activo, el
    /// primero `Available` y el resto `Locked`.
    pub fn bootstrap(user_flow: UserFlow, flow: &Flow) -> Self {
        let mut steps = IndexMap::new();
        for (idx, step) in flow.active_steps().enumerate() {
            let status = if idx == 0 { StepStatus::Available } else { StepStatus::Locked };
            steps.insert(step.id(), UserStepProgress::new(step.id(), status));
        }
        FlowProgress { user_flow,
                       steps,
                       buddies: Vec::new(),
                       quiz_answers: HashMap::new() }
    }

    pub fn step_progress(&self, step_id: Uuid) -> Option<&UserStepProgress> {
        self.steps.get(&step_id)
    }

    pub fn step_progress_mut(&mut self, step_id: Uuid) -> Option<&mut UserStepProgress> {
        self.steps.get_mut(&step_id)
    }

    /// Accesibilidad computada (función pura sobre el estado actual):
    /// - `false` si el flujo está pausado o suspendido (la pausa congela
    ///   todo el flujo, sin importar lo ya completado);
    /// - `true` para el primer paso activo;
    /// - para los demás, `true` sii el progreso del paso activo
    ///   inmediatamente anterior está completado (tolerante a huecos en la
    ///   numeración).
    pub fn is_accessible(&self, step_id: Uuid) -> bool {
        if matches!(self.user_flow.status(), FlowStatus::Paused | FlowStatus::Suspended) {
            return false;
        }
        match self.steps.get_index_of(&step_id) {
            Some(0) => true,
            Some(idx) => {
                self.steps
                    .get_index(idx - 1)
                    .map(|(_, prev)| prev.is_completed())
                    .unwrap_or(true)
            }
            None => false,
        }
    }

    /// Pasos completados entre los registrados (todos corresponden a pasos
    /// activos al momento del bootstrap).
    pub fn completed_steps(&self) -> usize {
        self.steps.values().filter(|p| p.is_completed()).count()
    }

    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    pub fn progress_percentage(&self) -> f64 {
        if self.steps.is_empty() {
            return 100.0;
        }
        self.completed_steps() as f64 / self.steps.len() as f64 * 100.0
    }

    /// Regla de completitud del flujo: todos los pasos activos completados.
    pub fn is_complete(&self) -> bool {
        !self.steps.is_empty() && self.completed_steps() >= self.steps.len()
    }

    pub fn active_buddies(&self) -> impl Iterator<Item = &FlowBuddy> {
        self.buddies.iter().filter(|b| b.is_active())
    }

    pub fn buddy_for(&self, user_id: Uuid) -> Option<&FlowBuddy> {
        self.active_buddies().find(|b| b.buddy_user_id() == user_id)
    }

    /// Upsert de la respuesta a una pregunta: reenviar reemplaza la
    /// anterior.
    pub fn record_quiz_answer(&mut self, answer: UserQuizAnswer) {
        self.quiz_answers.insert(answer.question_id(), answer);
    }

    /// (respondidas, correctas) para el conjunto de preguntas dado.
    pub fn quiz_tally(&self, question_ids: &[Uuid]) -> (usize, usize) {
        let mut answered = 0;
        let mut correct = 0;
        for qid in question_ids {
            if let Some(a) = self.quiz_answers.get(qid) {
                answered += 1;
                if a.is_correct() {
                    correct += 1;
                }
            }
        }
        (answered, correct)
    }
}
