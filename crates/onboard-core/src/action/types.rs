//! Tipos de acción y estructura `FlowAction`.
//!
//! Rol:
//! - Cada operación del motor emite acciones a un `ActionLog` append-only.
//! - Las acciones nunca se actualizan ni se borran: son el rastro de
//!   auditoría del ciclo de vida de la instancia.
//! - Un notificador externo puede consumirlas para avisos de chat
//!   (fire-and-forget; su falla nunca afecta la transición que las originó).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Vocabulario cerrado de eventos del ciclo de vida.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowActionKind {
    Started,
    Paused,
    Resumed,
    Completed,
    Deleted,
    ExtendedDeadline,
    StepCompleted,
    TaskCompleted,
    QuizPassed,
    BuddyAssigned,
    BuddyRemoved,
}

impl FlowActionKind {
    /// Nombre estable en minúsculas (se persiste como columna de tipo).
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowActionKind::Started => "started",
            FlowActionKind::Paused => "paused",
            FlowActionKind::Resumed => "resumed",
            FlowActionKind::Completed => "completed",
            FlowActionKind::Deleted => "deleted",
            FlowActionKind::ExtendedDeadline => "extended_deadline",
            FlowActionKind::StepCompleted => "step_completed",
            FlowActionKind::TaskCompleted => "task_completed",
            FlowActionKind::QuizPassed => "quiz_passed",
            FlowActionKind::BuddyAssigned => "buddy_assigned",
            FlowActionKind::BuddyRemoved => "buddy_removed",
        }
    }
}

/// Una entrada del log: quién hizo qué sobre qué instancia, cuándo y con
/// qué contexto adicional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowAction {
    pub seq: u64, // asignado por el ActionLog (orden de append por instancia)
    pub user_flow_id: Uuid,
    pub kind: FlowActionKind,
    pub performed_by: Uuid,
    pub reason: Option<String>,
    pub metadata: serde_json::Value,
    pub ts: DateTime<Utc>,
}
