use serde::{Deserialize, Serialize};

/// Estado de una instancia de flujo (UserFlow).
///
/// Transiciones válidas:
/// - `NotStarted` -> `InProgress`
/// - `InProgress` <-> `Paused`
/// - `InProgress` | `Paused` -> `Completed`
/// - `Suspended` es un bloqueo administrativo; ninguna operación de
///   progresión sale de él.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowStatus {
    NotStarted,
    InProgress,
    Paused,
    Completed,
    Suspended,
}

impl FlowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowStatus::NotStarted => "not_started",
            FlowStatus::InProgress => "in_progress",
            FlowStatus::Paused => "paused",
            FlowStatus::Completed => "completed",
            FlowStatus::Suspended => "suspended",
        }
    }

    /// Activo = cuenta para el chequeo de conflicto al iniciar de nuevo.
    pub fn is_active(&self) -> bool {
        matches!(self, FlowStatus::InProgress | FlowStatus::Paused)
    }
}

/// Estado de un paso dentro de una instancia de flujo.
///
/// Transiciones válidas:
/// - `Locked` -> `Available` (desbloqueo al completar el paso anterior)
/// - `Available` -> `InProgress` (primera interacción)
/// - `InProgress` -> `Completed`
///
/// No se permiten reversiones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Locked,
    Available,
    InProgress,
    Completed,
}

impl StepStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Locked => "locked",
            StepStatus::Available => "available",
            StepStatus::InProgress => "in_progress",
            StepStatus::Completed => "completed",
        }
    }
}
