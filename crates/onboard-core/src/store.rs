//! Almacenamiento en memoria de aggregates de progreso.
//!
//! Política de recurso compartido:
//! - La unidad de contención es el aggregate completo (UserFlow + sus
//!   pasos). `get_mut` devuelve un guard que retiene el lock de la entrada
//!   durante toda la operación de nivel superior: el equivalente a un lock
//!   por fila. Dos requests concurrentes sobre la misma instancia se
//!   serializan; instancias distintas no se coordinan entre sí.
//! - El índice (user, flow) apunta a la instancia más reciente del par; las
//!   instancias viejas (completadas/borradas) permanecen en el mapa
//!   principal para auditoría.

use chrono::NaiveDate;
use dashmap::mapref::one::{Ref, RefMut};
use dashmap::DashMap;
use uuid::Uuid;

use crate::errors::FlowCoreError;
use crate::progress::FlowProgress;
use crate::UserFlow;

#[derive(Default)]
pub struct InMemoryProgressStore {
    aggregates: DashMap<Uuid, FlowProgress>,
    by_user_flow: DashMap<(Uuid, Uuid), Uuid>,
}

impl InMemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserta una instancia nueva para (user, flow).
    ///
    /// # Errores
    /// `Conflict` si el par ya tiene una instancia activa (in_progress o
    /// paused, no borrada). El chequeo y la inserción ocurren bajo el lock
    /// de la entrada del índice, así dos starts concurrentes no pueden
    /// colarse ambos.
    pub fn insert_new(&self, aggregate: FlowProgress) -> Result<(), FlowCoreError> {
        let user_flow = &aggregate.user_flow;
        let key = (user_flow.user_id(), user_flow.flow_id());
        let id = user_flow.id();
        let mut slot = self.by_user_flow.entry(key).or_insert(id);
        if *slot != id {
            if let Some(existing) = self.aggregates.get(&*slot) {
                let uf = &existing.user_flow;
                if uf.status().is_active() && !uf.is_deleted() {
                    return Err(FlowCoreError::Conflict(format!("user {} already has an active instance of flow {}",
                                                               key.0, key.1)));
                }
            }
            *slot = id;
        }
        self.aggregates.insert(id, aggregate);
        Ok(())
    }

    /// Lock por instancia: el guard serializa toda mutación del aggregate.
    pub fn get_mut(&self, user_flow_id: Uuid) -> Result<RefMut<'_, Uuid, FlowProgress>, FlowCoreError> {
        match self.aggregates.get_mut(&user_flow_id) {
            Some(agg) if !agg.user_flow.is_deleted() => Ok(agg),
            _ => Err(FlowCoreError::NotFound(format!("user flow {} not found", user_flow_id))),
        }
    }

    pub fn get(&self, user_flow_id: Uuid) -> Result<Ref<'_, Uuid, FlowProgress>, FlowCoreError> {
        match self.aggregates.get(&user_flow_id) {
            Some(agg) if !agg.user_flow.is_deleted() => Ok(agg),
            _ => Err(FlowCoreError::NotFound(format!("user flow {} not found", user_flow_id))),
        }
    }

    /// La instancia más reciente para (user, flow), si no fue borrada.
    pub fn find(&self, user_id: Uuid, flow_id: Uuid) -> Option<UserFlow> {
        let id = self.by_user_flow.get(&(user_id, flow_id)).map(|r| *r)?;
        self.aggregates
            .get(&id)
            .filter(|agg| !agg.user_flow.is_deleted())
            .map(|agg| agg.user_flow.clone())
    }

    /// Instancias vencidas a la fecha dada (excluye borradas).
    pub fn overdue(&self, today: NaiveDate) -> Vec<UserFlow> {
        self.aggregates
            .iter()
            .filter(|entry| !entry.user_flow.is_deleted() && entry.user_flow.is_overdue(today))
            .map(|entry| entry.user_flow.clone())
            .collect()
    }
}
