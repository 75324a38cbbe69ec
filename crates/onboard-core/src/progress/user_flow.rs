//! UserFlow: la inscripción de un usuario en un flujo.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::FlowStatus;
use crate::errors::FlowCoreError;

/// Inscripción concreta de un usuario en un flujo. A lo sumo una instancia
/// activa por par (user, flow); las instancias terminadas se conservan para
/// auditoría.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserFlow {
    id: Uuid,
    user_id: Uuid,
    flow_id: Uuid,
    status: FlowStatus,
    current_step: Option<Uuid>,
    paused_by: Option<Uuid>,
    paused_at: Option<DateTime<Utc>>,
    pause_reason: Option<String>,
    expected_completion_date: Option<NaiveDate>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl UserFlow {
    pub fn new(user_id: Uuid, flow_id: Uuid, expected_completion_date: Option<NaiveDate>) -> Self {
        UserFlow { id: Uuid::new_v4(),
                   user_id,
                   flow_id,
                   status: FlowStatus::NotStarted,
                   current_step: None,
                   paused_by: None,
                   paused_at: None,
                   pause_reason: None,
                   expected_completion_date,
                   started_at: None,
                   completed_at: None,
                   created_at: Utc::now(),
                   deleted_at: None }
    }

    pub fn id(&self) -> Uuid { self.id }
    pub fn user_id(&self) -> Uuid { self.user_id }
    pub fn flow_id(&self) -> Uuid { self.flow_id }
    pub fn status(&self) -> FlowStatus { self.status }
    pub fn current_step(&self) -> Option<Uuid> { self.current_step }
    pub fn paused_by(&self) -> Option<Uuid> { self.paused_by }
    pub fn paused_at(&self) -> Option<DateTime<Utc>> { self.paused_at }
    pub fn pause_reason(&self) -> Option<&str> { self.pause_reason.as_deref() }
    pub fn expected_completion_date(&self) -> Option<NaiveDate> { self.expected_completion_date }
    pub fn started_at(&self) -> Option<DateTime<Utc>> { self.started_at }
    pub fn completed_at(&self) -> Option<DateTime<Utc>> { self.completed_at }
    pub fn created_at(&self) -> DateTime<Utc> { self.created_at }
    pub fn deleted_at(&self) -> Option<DateTime<Utc>> { self.deleted_at }
    pub fn is_deleted(&self) -> bool { self.deleted_at.is_some() }

    /// Arranque directo: cuando un buddy inicia el flujo se salta
    /// `NotStarted` y la instancia nace trabajando.
    pub(crate) fn start(&mut self, first_step: Option<Uuid>) {
        self.status = FlowStatus::InProgress;
        self.started_at = Some(Utc::now());
        self.current_step = first_step;
    }

    /// # Errores
    /// `InvalidState` si el estado actual no es `InProgress`.
    pub(crate) fn pause(&mut self, by: Uuid, reason: Option<String>) -> Result<(), FlowCoreError> {
        if self.status != FlowStatus::InProgress {
            return Err(FlowCoreError::InvalidState(format!("cannot pause flow in status {}", self.status.as_str())));
        }
        self.status = FlowStatus::Paused;
        self.paused_by = Some(by);
        self.paused_at = Some(Utc::now());
        self.pause_reason = reason;
        Ok(())
    }

    /// # Errores
    /// `InvalidState` si el estado actual no es `Paused`.
    pub(crate) fn resume(&mut self) -> Result<(), FlowCoreError> {
        if self.status != FlowStatus::Paused {
            return Err(FlowCoreError::InvalidState(format!("cannot resume flow in status {}", self.status.as_str())));
        }
        self.status = FlowStatus::InProgress;
        self.paused_by = None;
        self.paused_at = None;
        self.pause_reason = None;
        Ok(())
    }

    /// Disparada por el motor al alcanzar el umbral de completitud. No-op
    /// silencioso fuera de `InProgress`/`Paused`; devuelve si hubo cambio.
    pub(crate) fn complete(&mut self) -> bool {
        if matches!(self.status, FlowStatus::InProgress | FlowStatus::Paused) {
            self.status = FlowStatus::Completed;
            self.completed_at = Some(Utc::now());
            true
        } else {
            false
        }
    }

    /// Bloqueo administrativo.
    pub fn suspend(&mut self) {
        self.status = FlowStatus::Suspended;
    }

    pub(crate) fn set_current_step(&mut self, step: Option<Uuid>) {
        self.current_step = step;
    }

    pub(crate) fn extend_deadline(&mut self, new_date: NaiveDate) -> Option<NaiveDate> {
        let old = self.expected_completion_date;
        self.expected_completion_date = Some(new_date);
        old
    }

    pub(crate) fn soft_delete(&mut self) {
        if self.deleted_at.is_none() {
            self.deleted_at = Some(Utc::now());
        }
    }

    /// Vencido = sigue activo y la fecha límite quedó atrás.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        match self.expected_completion_date {
            Some(deadline) => {
                matches!(self.status, FlowStatus::NotStarted | FlowStatus::InProgress) && today > deadline
            }
            None => false,
        }
    }
}
