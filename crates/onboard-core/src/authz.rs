//! Puerto de autorización por capacidades.
//!
//! El motor sólo valida legalidad de estado; quién puede invocar cada
//! operación se decide antes de entrar, contra este único seam. La
//! implementación por defecto deriva las capacidades de las banderas del
//! buddy activo.

use uuid::Uuid;

use crate::progress::FlowBuddy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    PauseFlow,
    ResumeFlow,
    ExtendDeadline,
    ManageBuddies,
    ViewProgress,
}

pub trait AuthorizationPort: Send + Sync {
    fn allows(&self, user_id: Uuid, capability: Capability, buddies: &[FlowBuddy]) -> bool;
}

/// Autorización basada en las banderas del FlowBuddy activo del usuario.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuddyAuthorizer;

impl AuthorizationPort for BuddyAuthorizer {
    fn allows(&self, user_id: Uuid, capability: Capability, buddies: &[FlowBuddy]) -> bool {
        let buddy = match buddies.iter().find(|b| b.is_active() && b.buddy_user_id() == user_id) {
            Some(b) => b,
            None => return false,
        };
        match capability {
            Capability::PauseFlow => buddy.can_pause_flow,
            Capability::ResumeFlow => buddy.can_resume_flow,
            Capability::ExtendDeadline => buddy.can_extend_deadline,
            Capability::ManageBuddies | Capability::ViewProgress => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buddy_flags_gate_capabilities() {
        let buddy_id = Uuid::new_v4();
        let assigner = Uuid::new_v4();
        let mut buddy = FlowBuddy::new(buddy_id, assigner);
        buddy.can_pause_flow = false;
        let buddies = vec![buddy];

        let authz = BuddyAuthorizer;
        assert!(!authz.allows(buddy_id, Capability::PauseFlow, &buddies));
        assert!(authz.allows(buddy_id, Capability::ResumeFlow, &buddies));
        // Un usuario que no es buddy no tiene ninguna capacidad
        assert!(!authz.allows(Uuid::new_v4(), Capability::ViewProgress, &buddies));
    }
}
