use dashmap::DashMap;
use thiserror::Error;
use uuid::Uuid;

use super::{ArticleSnapshot, QuizSnapshot, TaskSnapshot};

#[derive(Debug, Error)]
#[error("snapshot store error: {0}")]
pub struct SnapshotError(pub String);

/// Almacenamiento de snapshots, uno por (UserFlow, FlowStep) y tipo.
/// `put_*` es upsert: la tarea acumula intentos y el quiz reemplaza el
/// árbol al re-puntuar.
pub trait SnapshotStore: Send + Sync {
    fn put_article(&self, user_flow_id: Uuid, step_id: Uuid, snapshot: ArticleSnapshot) -> Result<(), SnapshotError>;
    fn get_article(&self, user_flow_id: Uuid, step_id: Uuid) -> Result<Option<ArticleSnapshot>, SnapshotError>;

    fn put_task(&self, user_flow_id: Uuid, step_id: Uuid, snapshot: TaskSnapshot) -> Result<(), SnapshotError>;
    fn get_task(&self, user_flow_id: Uuid, step_id: Uuid) -> Result<Option<TaskSnapshot>, SnapshotError>;

    fn put_quiz(&self, user_flow_id: Uuid, step_id: Uuid, snapshot: QuizSnapshot) -> Result<(), SnapshotError>;
    fn get_quiz(&self, user_flow_id: Uuid, step_id: Uuid) -> Result<Option<QuizSnapshot>, SnapshotError>;
}

#[derive(Default)]
pub struct InMemorySnapshotStore {
    articles: DashMap<(Uuid, Uuid), ArticleSnapshot>,
    tasks: DashMap<(Uuid, Uuid), TaskSnapshot>,
    quizzes: DashMap<(Uuid, Uuid), QuizSnapshot>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn put_article(&self, user_flow_id: Uuid, step_id: Uuid, snapshot: ArticleSnapshot) -> Result<(), SnapshotError> {
        self.articles.insert((user_flow_id, step_id), snapshot);
        Ok(())
    }

    fn get_article(&self, user_flow_id: Uuid, step_id: Uuid) -> Result<Option<ArticleSnapshot>, SnapshotError> {
        Ok(self.articles.get(&(user_flow_id, step_id)).map(|s| s.clone()))
    }

    fn put_task(&self, user_flow_id: Uuid, step_id: Uuid, snapshot: TaskSnapshot) -> Result<(), SnapshotError> {
        self.tasks.insert((user_flow_id, step_id), snapshot);
        Ok(())
    }

    fn get_task(&self, user_flow_id: Uuid, step_id: Uuid) -> Result<Option<TaskSnapshot>, SnapshotError> {
        Ok(self.tasks.get(&(user_flow_id, step_id)).map(|s| s.clone()))
    }

    fn put_quiz(&self, user_flow_id: Uuid, step_id: Uuid, snapshot: QuizSnapshot) -> Result<(), SnapshotError> {
        self.quizzes.insert((user_flow_id, step_id), snapshot);
        Ok(())
    }

    fn get_quiz(&self, user_flow_id: Uuid, step_id: Uuid) -> Result<Option<QuizSnapshot>, SnapshotError> {
        Ok(self.quizzes.get(&(user_flow_id, step_id)).map(|s| s.clone()))
    }
}
