//! Catálogo de definiciones de flujo.
//!
//! El contenido es de sólo lectura para el motor de progresión (editarlo es
//! una operación administrativa fuera de este núcleo). Los flujos borrados
//! quedan registrados pero se excluyen en el borde de lectura.

use dashmap::DashMap;
use onboard_domain::Flow;
use std::sync::Arc;
use uuid::Uuid;

use crate::errors::FlowCoreError;

#[derive(Default)]
pub struct FlowCatalog {
    flows: DashMap<Uuid, Arc<Flow>>,
}

impl FlowCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, flow: Flow) -> Arc<Flow> {
        let arc = Arc::new(flow);
        self.flows.insert(arc.id(), arc.clone());
        arc
    }

    /// Flujo activo por id; excluye borrados e inactivos.
    pub fn get_active(&self, flow_id: Uuid) -> Result<Arc<Flow>, FlowCoreError> {
        match self.flows.get(&flow_id) {
            Some(flow) if flow.is_active() => Ok(flow.clone()),
            _ => Err(FlowCoreError::NotFound(format!("flow {} not found", flow_id))),
        }
    }

    /// Lookup sin filtro de actividad (lecturas de auditoría).
    pub fn get(&self, flow_id: Uuid) -> Option<Arc<Flow>> {
        self.flows.get(&flow_id).map(|f| f.clone())
    }
}
