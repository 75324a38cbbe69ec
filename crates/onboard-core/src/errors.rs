//! Errores del núcleo de progresión.
//!
//! Cada variante es un resultado recuperable y esperado: la capa que nos
//! invoca decide cómo mapearlos a transporte. Una respuesta equivocada de
//! tarea o quiz NO es un error (es una operación exitosa con
//! `is_correct=false`).

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum FlowCoreError {
    /// Flujo/paso/pregunta/respuesta inexistente o fuera del padre esperado.
    #[error("not found: {0}")]
    NotFound(String),
    /// Ya existe una instancia activa (in_progress/paused) para (user, flow).
    #[error("conflict: {0}")]
    Conflict(String),
    /// Transición ilegal desde el estado actual.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// El paso no es accesible según el cómputo actual.
    #[error("step not accessible: {0}")]
    NotAccessible(String),
    /// Entrada malformada (respuesta ajena a la pregunta, respuesta vacía,
    /// quiz de otro flujo).
    #[error("validation: {0}")]
    Validation(String),
}

impl FlowCoreError {
    /// Código estable legible por máquina; el mapeo a códigos de transporte
    /// es responsabilidad del caller.
    pub fn code(&self) -> &'static str {
        match self {
            FlowCoreError::NotFound(_) => "not_found",
            FlowCoreError::Conflict(_) => "conflict",
            FlowCoreError::InvalidState(_) => "invalid_state",
            FlowCoreError::NotAccessible(_) => "not_accessible",
            FlowCoreError::Validation(_) => "validation",
        }
    }
}
