//! Flujo de onboarding y sus pasos.
//!
//! Rol en el dominio:
//! - `Flow` es un plan de estudios: secuencia ordenada de `FlowStep`.
//! - Cada paso adjunta contenido (`StepContent`): artículo, tarea, quiz o
//!   una combinación. El contenido adjunto es la fuente de verdad; el
//!   `StepKind` se deriva de él y es sólo informativo.
//! - `order` es un entero positivo, único por flujo. Se toleran huecos
//!   (reordenar no renumera).
//! - Borrado suave: `deleted_at` marca la tumba; borrar un flujo marca
//!   también sus pasos.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use crate::{Article, DomainError, Quiz, Task};

/// Tipo informativo del paso, derivado del contenido adjunto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Article,
    Task,
    Quiz,
    Mixed,
}

/// Contenido adjunto a un paso. Al menos un objeto debe estar presente.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepContent {
    pub article: Option<Article>,
    pub task: Option<Task>,
    pub quiz: Option<Quiz>,
}

impl StepContent {
    pub fn article(article: Article) -> Self {
        StepContent { article: Some(article), task: None, quiz: None }
    }

    pub fn task(task: Task) -> Self {
        StepContent { article: None, task: Some(task), quiz: None }
    }

    pub fn quiz(quiz: Quiz) -> Self {
        StepContent { article: None, task: None, quiz: Some(quiz) }
    }

    fn attached_count(&self) -> usize {
        [self.article.is_some(), self.task.is_some(), self.quiz.is_some()].iter().filter(|b| **b).count()
    }

    /// Deriva el tipo informativo a partir de qué contenido existe.
    pub fn kind(&self) -> StepKind {
        match (self.article.is_some(), self.task.is_some(), self.quiz.is_some()) {
            (true, false, false) => StepKind::Article,
            (false, true, false) => StepKind::Task,
            (false, false, true) => StepKind::Quiz,
            _ => StepKind::Mixed,
        }
    }
}

/// Un paso del flujo: título, posición y contenido adjunto.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowStep {
    id: Uuid,
    title: String,
    description: String,
    order: u32,
    is_required: bool,
    is_active: bool,
    estimated_time_minutes: Option<u32>,
    content: StepContent,
    deleted_at: Option<DateTime<Utc>>,
}

impl FlowStep {
    pub fn new(title: &str,
               description: &str,
               order: u32,
               content: StepContent)
               -> Result<Self, DomainError> {
        if title.trim().is_empty() {
            return Err(DomainError::ValidationError("step title must not be empty".to_string()));
        }
        if order < 1 {
            return Err(DomainError::ValidationError("step order must be >= 1".to_string()));
        }
        if content.attached_count() == 0 {
            return Err(DomainError::ValidationError(format!("step '{}' must attach an article, task or quiz", title)));
        }
        Ok(FlowStep { id: Uuid::new_v4(),
                      title: title.to_string(),
                      description: description.to_string(),
                      order,
                      is_required: true,
                      is_active: true,
                      estimated_time_minutes: None,
                      content,
                      deleted_at: None })
    }

    pub fn with_estimated_minutes(mut self, minutes: u32) -> Self {
        self.estimated_time_minutes = Some(minutes);
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.is_required = required;
        self
    }

    pub fn id(&self) -> Uuid { self.id }
    pub fn title(&self) -> &str { &self.title }
    pub fn description(&self) -> &str { &self.description }
    pub fn order(&self) -> u32 { self.order }
    pub fn is_required(&self) -> bool { self.is_required }
    pub fn is_active(&self) -> bool { self.is_active && self.deleted_at.is_none() }
    pub fn estimated_time_minutes(&self) -> Option<u32> { self.estimated_time_minutes }
    pub fn content(&self) -> &StepContent { &self.content }
    pub fn kind(&self) -> StepKind { self.content.kind() }
    pub fn deleted_at(&self) -> Option<DateTime<Utc>> { self.deleted_at }

    pub fn deactivate(&mut self) { self.is_active = false; }

    fn soft_delete(&mut self, at: DateTime<Utc>) {
        if self.deleted_at.is_none() {
            self.deleted_at = Some(at);
        }
    }
}

/// Un plan de estudios con nombre: secuencia ordenada de pasos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flow {
    id: Uuid,
    title: String,
    description: String,
    estimated_duration_hours: Option<u32>,
    is_mandatory: bool,
    is_active: bool,
    deleted_at: Option<DateTime<Utc>>,
    steps: Vec<FlowStep>,
}

impl Flow {
    /// # Errores
    /// `DomainError::ValidationError` si dos pasos comparten `order`.
    pub fn new(title: &str, description: &str, steps: Vec<FlowStep>) -> Result<Self, DomainError> {
        if title.trim().is_empty() {
            return Err(DomainError::ValidationError("flow title must not be empty".to_string()));
        }
        Self::validate_orders(&steps)?;
        let mut steps = steps;
        steps.sort_by_key(|s| s.order());
        Ok(Flow { id: Uuid::new_v4(),
                  title: title.to_string(),
                  description: description.to_string(),
                  estimated_duration_hours: None,
                  is_mandatory: false,
                  is_active: true,
                  deleted_at: None,
                  steps })
    }

    fn validate_orders(steps: &[FlowStep]) -> Result<(), DomainError> {
        let mut seen = HashSet::new();
        for s in steps {
            if !seen.insert(s.order()) {
                return Err(DomainError::ValidationError(format!("duplicate step order {} in flow", s.order())));
            }
        }
        Ok(())
    }

    pub fn with_mandatory(mut self, mandatory: bool) -> Self {
        self.is_mandatory = mandatory;
        self
    }

    pub fn with_estimated_duration_hours(mut self, hours: u32) -> Self {
        self.estimated_duration_hours = Some(hours);
        self
    }

    pub fn id(&self) -> Uuid { self.id }
    pub fn title(&self) -> &str { &self.title }
    pub fn description(&self) -> &str { &self.description }
    pub fn estimated_duration_hours(&self) -> Option<u32> { self.estimated_duration_hours }
    pub fn is_mandatory(&self) -> bool { self.is_mandatory }
    pub fn is_active(&self) -> bool { self.is_active && self.deleted_at.is_none() }
    pub fn deleted_at(&self) -> Option<DateTime<Utc>> { self.deleted_at }

    /// Todos los pasos (incluye inactivos), en orden.
    pub fn steps(&self) -> &[FlowStep] { &self.steps }

    /// Pasos activos en orden de ejecución: el recorrido que ve un usuario.
    pub fn active_steps(&self) -> impl Iterator<Item = &FlowStep> {
        self.steps.iter().filter(|s| s.is_active())
    }

    pub fn total_steps(&self) -> usize { self.active_steps().count() }

    pub fn required_steps(&self) -> usize {
        self.active_steps().filter(|s| s.is_required()).count()
    }

    pub fn step(&self, step_id: Uuid) -> Option<&FlowStep> {
        self.steps.iter().find(|s| s.id() == step_id)
    }

    pub fn step_by_order(&self, order: u32) -> Option<&FlowStep> {
        self.active_steps().find(|s| s.order() == order)
    }

    pub fn first_active_step(&self) -> Option<&FlowStep> {
        self.active_steps().next()
    }

    /// El siguiente paso activo estrictamente posterior a `order`. Tolera
    /// huecos en la numeración.
    pub fn next_active_step_after(&self, order: u32) -> Option<&FlowStep> {
        self.active_steps().find(|s| s.order() > order)
    }

    /// Minutos estimados sumados de los pasos activos (para el cálculo de
    /// fecha límite).
    pub fn total_estimated_minutes(&self) -> u32 {
        self.active_steps().filter_map(|s| s.estimated_time_minutes()).sum()
    }

    /// El siguiente `order` libre para un paso nuevo.
    pub fn next_step_order(&self) -> u32 {
        self.steps.iter().map(|s| s.order()).max().map(|o| o + 1).unwrap_or(1)
    }

    /// Reordena pasos existentes sin renumerar al resto. `new_orders` mapea
    /// id de paso -> nuevo order; la unicidad se revalida sobre el conjunto
    /// resultante.
    pub fn reorder_steps(&mut self, new_orders: &[(Uuid, u32)]) -> Result<(), DomainError> {
        let mut updated = self.steps.clone();
        for (step_id, order) in new_orders {
            if *order < 1 {
                return Err(DomainError::ValidationError("step order must be >= 1".to_string()));
            }
            let step = updated.iter_mut()
                              .find(|s| s.id() == *step_id)
                              .ok_or_else(|| DomainError::ValidationError(format!("unknown step {}", step_id)))?;
            step.order = *order;
        }
        Self::validate_orders(&updated)?;
        updated.sort_by_key(|s| s.order());
        self.steps = updated;
        Ok(())
    }

    /// Borrado suave: marca el flujo y todos sus pasos.
    pub fn soft_delete(&mut self) {
        let now = Utc::now();
        if self.deleted_at.is_none() {
            self.deleted_at = Some(now);
            for step in &mut self.steps {
                step.soft_delete(now);
            }
        }
    }
}
