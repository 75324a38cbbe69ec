//! Snapshots: copias inmutables del contenido al momento de completarlo.
//!
//! El contenido vivo (artículos, tareas, quizzes) es editable; el rastro de
//! auditoría debe reflejar lo que el usuario realmente vio. Al completar un
//! paso se congela una copia del contenido más la interacción del usuario.
//! La escritura de snapshots es best-effort: una falla se loggea y se
//! suprime, la corrección de la progresión va primero.

mod recorder;
mod store;
mod types;

pub use recorder::{article_snapshot, quiz_snapshot, task_snapshot};
pub use store::{InMemorySnapshotStore, SnapshotError, SnapshotStore};
pub use types::{ArticleSnapshot, QuizAnswerSnapshot, QuizQuestionSnapshot, QuizSnapshot, TaskSnapshot,
                UserQuizAnswerSnapshot};
