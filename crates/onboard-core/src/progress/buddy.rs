use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Mentor asignado a una instancia de flujo, con banderas de capacidad.
/// Una instancia puede tener varios buddies activos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowBuddy {
    id: Uuid,
    buddy_user_id: Uuid,
    assigned_by: Uuid,
    assigned_at: DateTime<Utc>,
    pub can_pause_flow: bool,
    pub can_resume_flow: bool,
    pub can_extend_deadline: bool,
    is_active: bool,
}

impl FlowBuddy {
    pub fn new(buddy_user_id: Uuid, assigned_by: Uuid) -> Self {
        FlowBuddy { id: Uuid::new_v4(),
                    buddy_user_id,
                    assigned_by,
                    assigned_at: Utc::now(),
                    can_pause_flow: true,
                    can_resume_flow: true,
                    can_extend_deadline: true,
                    is_active: true }
    }

    pub fn id(&self) -> Uuid { self.id }
    pub fn buddy_user_id(&self) -> Uuid { self.buddy_user_id }
    pub fn assigned_by(&self) -> Uuid { self.assigned_by }
    pub fn assigned_at(&self) -> DateTime<Utc> { self.assigned_at }
    pub fn is_active(&self) -> bool { self.is_active }

    pub(crate) fn deactivate(&mut self) { self.is_active = false; }
}
