use chrono::Utc;
use dashmap::DashMap;
use thiserror::Error;
use uuid::Uuid;

use super::{FlowAction, FlowActionKind};

/// Falla al escribir/leer el log. Para el motor es best-effort: se loggea y
/// se suprime, nunca aborta la transición que la originó.
#[derive(Debug, Error)]
#[error("action log error: {0}")]
pub struct ActionLogError(pub String);

/// Almacenamiento de acciones append-only.
pub trait ActionLog: Send + Sync {
    /// Agrega una acción y devuelve la entrada completa (con seq y ts).
    fn append(&self,
              user_flow_id: Uuid,
              kind: FlowActionKind,
              performed_by: Uuid,
              reason: Option<String>,
              metadata: serde_json::Value)
              -> Result<FlowAction, ActionLogError>;
    /// Lista las acciones de una instancia (orden ascendente por seq).
    fn list(&self, user_flow_id: Uuid) -> Vec<FlowAction>;
}

#[derive(Default)]
pub struct InMemoryActionLog {
    inner: DashMap<Uuid, Vec<FlowAction>>,
}

impl InMemoryActionLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ActionLog for InMemoryActionLog {
    fn append(&self,
              user_flow_id: Uuid,
              kind: FlowActionKind,
              performed_by: Uuid,
              reason: Option<String>,
              metadata: serde_json::Value)
              -> Result<FlowAction, ActionLogError> {
        let mut vec = self.inner.entry(user_flow_id).or_default();
        let seq = vec.len() as u64;
        let action = FlowAction { seq,
                                  user_flow_id,
                                  kind,
                                  performed_by,
                                  reason,
                                  metadata,
                                  ts: Utc::now() };
        vec.push(action.clone());
        Ok(action)
    }

    fn list(&self, user_flow_id: Uuid) -> Vec<FlowAction> {
        self.inner.get(&user_flow_id).map(|v| v.clone()).unwrap_or_default()
    }
}
