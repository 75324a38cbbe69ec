//! onboard-core: aggregate de progreso y motor de progresión de flujos.
//!
//! Organización:
//! - `progress`: estado por usuario (UserFlow, UserStepProgress, buddies,
//!   respuestas de quiz) y sus transiciones legales.
//! - `engine`: orquestación explícita de cada caso de uso (start/pause/
//!   resume/leer artículo/enviar tarea/responder quiz); toda la cadena de
//!   efectos es visible en el sitio de llamada.
//! - `action`: log de auditoría append-only (FlowAction) con backend en
//!   memoria.
//! - `snapshot`: copias inmutables del contenido al momento de completar un
//!   paso.
//! - `schedule`: calendario laboral y cálculo de fecha límite.
pub mod action;
pub mod authz;
pub mod catalog;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod notify;
pub mod progress;
pub mod schedule;
pub mod snapshot;
pub mod store;

pub use action::{ActionLog, ActionLogError, FlowAction, FlowActionKind, InMemoryActionLog};
pub use authz::{AuthorizationPort, BuddyAuthorizer, Capability};
pub use catalog::FlowCatalog;
pub use engine::{FlowEngine, QuizAnswerOutcome, StepProgressView, TaskAnswerOutcome};
pub use errors::FlowCoreError;
pub use notify::{Notifier, NullNotifier};
pub use progress::{FlowBuddy, FlowProgress, FlowStatus, StepStatus, UserFlow, UserQuizAnswer, UserStepProgress};
pub use snapshot::{ArticleSnapshot, InMemorySnapshotStore, QuizSnapshot, SnapshotError, SnapshotStore, TaskSnapshot};
pub use store::InMemoryProgressStore;
