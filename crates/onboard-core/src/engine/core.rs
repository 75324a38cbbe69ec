//! Implementación del FlowEngine.
//!
//! Cada operación de nivel superior es una unidad atómica sobre un único
//! aggregate: se toma el lock de la entrada (equivalente a lock por fila),
//! se valida contra el estado actual, se muta, y recién después de soltar
//! el lock se emiten acciones de auditoría y snapshots. Auditoría y
//! snapshots son best-effort: su falla se loggea y se suprime, nunca
//! revierte la transición que los originó.
//!
//! La cadena completa de efectos de cada caso de uso (validar -> transitar
//! -> snapshot -> desbloquear siguiente -> chequear completitud del flujo)
//! es visible en el cuerpo de cada método; no hay hooks implícitos.

use chrono::{NaiveDate, Utc};
use log::warn;
use onboard_domain::{Flow, FlowStep};
use serde_json::json;
use uuid::Uuid;

use crate::action::{ActionLog, FlowAction, FlowActionKind, InMemoryActionLog};
use crate::catalog::FlowCatalog;
use crate::errors::FlowCoreError;
use crate::notify::{Notifier, NullNotifier};
use crate::progress::{FlowBuddy, FlowProgress, StepStatus, UserFlow, UserQuizAnswer, UserStepProgress};
use crate::schedule::{estimate_completion_date, WeekendCalendar, WorkingCalendar};
use crate::snapshot::{article_snapshot, quiz_snapshot, task_snapshot, InMemorySnapshotStore, SnapshotStore};
use crate::store::InMemoryProgressStore;

/// Resultado de enviar la respuesta de una tarea. Una respuesta incorrecta
/// es entrada esperada y reintentable, no un error.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskAnswerOutcome {
    pub is_correct: bool,
    pub progress: UserStepProgress,
}

/// Resultado de responder una pregunta de quiz. `is_passed` queda en `None`
/// mientras falten preguntas por responder.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizAnswerOutcome {
    pub is_correct: bool,
    pub is_completed: bool,
    pub is_passed: Option<bool>,
    pub progress: UserStepProgress,
}

/// Vista de progreso por paso con la accesibilidad ya computada.
#[derive(Debug, Clone, PartialEq)]
pub struct StepProgressView {
    pub step_id: Uuid,
    pub order: u32,
    pub title: String,
    pub status: StepStatus,
    pub is_accessible: bool,
}

/// Acción pendiente de emisión, acumulada mientras se sostiene el lock del
/// aggregate y despachada después de soltarlo.
type PendingAction = (FlowActionKind, Uuid, Option<String>, serde_json::Value);

/// Motor de progresión de flujos de onboarding.
///
/// Genérico sobre el log de acciones y el store de snapshots para poder
/// intercambiar los backends en memoria por los durables sin tocar la
/// lógica de progresión.
pub struct FlowEngine<A, S>
    where A: ActionLog,
          S: SnapshotStore
{
    catalog: FlowCatalog,
    progress: InMemoryProgressStore,
    actions: A,
    snapshots: S,
    calendar: Box<dyn WorkingCalendar>,
    notifier: Box<dyn Notifier>,
}

impl FlowEngine<InMemoryActionLog, InMemorySnapshotStore> {
    /// Motor con stores en memoria.
    pub fn new() -> Self {
        Self::new_with_stores(InMemoryActionLog::new(), InMemorySnapshotStore::new())
    }
}

impl Default for FlowEngine<InMemoryActionLog, InMemorySnapshotStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, S> FlowEngine<A, S>
    where A: ActionLog,
          S: SnapshotStore
{
    /// Motor con los stores proporcionados.
    pub fn new_with_stores(actions: A, snapshots: S) -> Self {
        FlowEngine { catalog: FlowCatalog::new(),
                     progress: InMemoryProgressStore::new(),
                     actions,
                     snapshots,
                     calendar: Box::new(WeekendCalendar),
                     notifier: Box::new(NullNotifier) }
    }

    pub fn with_calendar(mut self, calendar: impl WorkingCalendar + 'static) -> Self {
        self.calendar = Box::new(calendar);
        self
    }

    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    /// Registra una definición de flujo en el catálogo (solo lectura para
    /// el motor).
    pub fn register_flow(&self, flow: Flow) -> Uuid {
        self.catalog.register(flow).id()
    }

    pub fn action_log(&self) -> &A {
        &self.actions
    }

    pub fn snapshot_store(&self) -> &S {
        &self.snapshots
    }

    // ------------------------------------------------------------------
    // Ciclo de vida del UserFlow (acciones de buddy)
    // ------------------------------------------------------------------

    /// Inicia un flujo para un usuario.
    ///
    /// # Errores
    /// - `NotFound` si el flujo no existe o está inactivo.
    /// - `Conflict` si el par (user, flow) ya tiene una instancia activa.
    pub fn start_flow(&self,
                      flow_id: Uuid,
                      user_id: Uuid,
                      assigned_by: Uuid,
                      expected_completion_date: Option<NaiveDate>,
                      additional_buddies: &[Uuid])
                      -> Result<UserFlow, FlowCoreError> {
        let flow = self.catalog.get_active(flow_id)?;

        let deadline = expected_completion_date.unwrap_or_else(|| {
                           estimate_completion_date(self.calendar.as_ref(), &flow, Utc::now().date_naive())
                       });

        let mut user_flow = UserFlow::new(user_id, flow_id, Some(deadline));
        user_flow.start(flow.first_active_step().map(|s| s.id()));

        let mut aggregate = FlowProgress::bootstrap(user_flow, &flow);
        aggregate.buddies.push(FlowBuddy::new(assigned_by, assigned_by));
        for buddy_id in additional_buddies {
            if aggregate.buddy_for(*buddy_id).is_none() {
                aggregate.buddies.push(FlowBuddy::new(*buddy_id, assigned_by));
            }
        }
        let started = aggregate.user_flow.clone();
        let buddy_ids: Vec<Uuid> = aggregate.active_buddies().map(|b| b.buddy_user_id()).collect();

        // El chequeo de conflicto y la inserción ocurren bajo el lock del
        // índice (user, flow).
        self.progress.insert_new(aggregate)?;

        self.record_action(started.id(),
                           FlowActionKind::Started,
                           assigned_by,
                           None,
                           json!({ "additional_buddies": additional_buddies }));
        for buddy_id in buddy_ids {
            self.record_action(started.id(),
                               FlowActionKind::BuddyAssigned,
                               assigned_by,
                               None,
                               json!({ "buddy_user_id": buddy_id }));
        }
        Ok(started)
    }

    /// Pausa una instancia en curso. La pausa congela la accesibilidad de
    /// todos los pasos hasta el resume.
    pub fn pause_flow(&self, user_flow_id: Uuid, by: Uuid, reason: Option<String>) -> Result<UserFlow, FlowCoreError> {
        let paused = {
            let mut agg = self.progress.get_mut(user_flow_id)?;
            agg.user_flow.pause(by, reason.clone())?;
            agg.user_flow.clone()
        };
        self.record_action(user_flow_id, FlowActionKind::Paused, by, reason, json!({}));
        Ok(paused)
    }

    /// Reanuda una instancia pausada; la accesibilidad vuelve a computarse
    /// como antes de la pausa.
    pub fn resume_flow(&self, user_flow_id: Uuid, by: Uuid) -> Result<UserFlow, FlowCoreError> {
        let resumed = {
            let mut agg = self.progress.get_mut(user_flow_id)?;
            agg.user_flow.resume()?;
            agg.user_flow.clone()
        };
        self.record_action(user_flow_id, FlowActionKind::Resumed, by, None, json!({}));
        Ok(resumed)
    }

    /// Borrado suave. El progreso por paso y los snapshots sobreviven (el
    /// rastro de auditoría no se desarma).
    pub fn delete_flow(&self, user_flow_id: Uuid, by: Uuid, reason: Option<String>) -> Result<(), FlowCoreError> {
        {
            let mut agg = self.progress.get_mut(user_flow_id)?;
            agg.user_flow.soft_delete();
        }
        self.record_action(user_flow_id, FlowActionKind::Deleted, by, reason, json!({}));
        Ok(())
    }

    /// Reemplaza la fecha límite; queda auditado con la fecha anterior.
    pub fn extend_deadline(&self, user_flow_id: Uuid, by: Uuid, new_date: NaiveDate) -> Result<UserFlow, FlowCoreError> {
        let (updated, old) = {
            let mut agg = self.progress.get_mut(user_flow_id)?;
            let old = agg.user_flow.extend_deadline(new_date);
            (agg.user_flow.clone(), old)
        };
        self.record_action(user_flow_id,
                           FlowActionKind::ExtendedDeadline,
                           by,
                           None,
                           json!({ "old_date": old, "new_date": new_date }));
        Ok(updated)
    }

    /// Asigna un buddy adicional a una instancia.
    ///
    /// # Errores
    /// `Conflict` si el usuario ya es buddy activo de la instancia.
    pub fn add_buddy(&self, user_flow_id: Uuid, by: Uuid, buddy_user_id: Uuid) -> Result<FlowBuddy, FlowCoreError> {
        let buddy = {
            let mut agg = self.progress.get_mut(user_flow_id)?;
            if agg.buddy_for(buddy_user_id).is_some() {
                return Err(FlowCoreError::Conflict(format!("user {} is already an active buddy", buddy_user_id)));
            }
            let buddy = FlowBuddy::new(buddy_user_id, by);
            agg.buddies.push(buddy.clone());
            buddy
        };
        self.record_action(user_flow_id,
                           FlowActionKind::BuddyAssigned,
                           by,
                           None,
                           json!({ "buddy_user_id": buddy_user_id }));
        Ok(buddy)
    }

    /// Desactiva un buddy (el registro se conserva).
    pub fn remove_buddy(&self, user_flow_id: Uuid, by: Uuid, buddy_user_id: Uuid) -> Result<(), FlowCoreError> {
        {
            let mut agg = self.progress.get_mut(user_flow_id)?;
            let buddy = agg.buddies
                           .iter_mut()
                           .find(|b| b.is_active() && b.buddy_user_id() == buddy_user_id)
                           .ok_or_else(|| {
                               FlowCoreError::NotFound(format!("no active buddy {} on this instance", buddy_user_id))
                           })?;
            buddy.deactivate();
        }
        self.record_action(user_flow_id,
                           FlowActionKind::BuddyRemoved,
                           by,
                           None,
                           json!({ "buddy_user_id": buddy_user_id }));
        Ok(())
    }

    // ------------------------------------------------------------------
    // Progresión (acciones del usuario)
    // ------------------------------------------------------------------

    /// Marca el artículo del paso como leído. Idempotente: sobre un paso ya
    /// completado devuelve el estado actual sin re-disparar desbloqueos ni
    /// reescribir snapshots.
    pub fn mark_article_read(&self, user_flow_id: Uuid, step_id: Uuid, by: Uuid) -> Result<UserStepProgress, FlowCoreError> {
        let mut pending: Vec<PendingAction> = Vec::new();
        let mut snapshot_write = None;

        let result = {
            let mut agg = self.progress.get_mut(user_flow_id)?;
            let flow = self.flow_for(&agg)?;
            let step = Self::active_step(&flow, step_id)?;
            let article = step.content()
                              .article
                              .as_ref()
                              .ok_or_else(|| FlowCoreError::Validation(format!("step '{}' has no article", step.title())))?;

            let progress = agg.step_progress(step_id)
                              .ok_or_else(|| FlowCoreError::NotFound(format!("no progress record for step {}", step_id)))?;
            if progress.is_completed() {
                return Ok(progress.clone());
            }
            if !agg.is_accessible(step_id) {
                return Err(FlowCoreError::NotAccessible(format!("step '{}' is not accessible", step.title())));
            }

            let p = agg.step_progress_mut(step_id).expect("checked above");
            p.begin();
            let read_at = p.stamp_article_read();
            if Self::gates_satisfied(step, p) {
                p.complete();
                snapshot_write = Some(article_snapshot(article, read_at));
                pending.push((FlowActionKind::StepCompleted,
                              by,
                              None,
                              json!({ "step_id": step_id, "step_title": step.title() })));
                Self::unlock_next_step(&mut agg, &flow, step.order());
                Self::maybe_complete_flow(&mut agg, &mut pending);
            }
            agg.step_progress(step_id).expect("checked above").clone()
        };

        if let Some(snapshot) = snapshot_write {
            if let Err(e) = self.snapshots.put_article(user_flow_id, step_id, snapshot) {
                warn!("article snapshot write failed for {}/{}: {}", user_flow_id, step_id, e);
            }
        }
        self.emit(user_flow_id, pending);
        Ok(result)
    }

    /// Envía la respuesta de una tarea. Cada intento (correcto o no) queda
    /// registrado en el snapshot; sólo un intento correcto completa el paso
    /// y desbloquea el siguiente.
    pub fn submit_task_answer(&self,
                              user_flow_id: Uuid,
                              step_id: Uuid,
                              by: Uuid,
                              answer: &str)
                              -> Result<TaskAnswerOutcome, FlowCoreError> {
        if answer.trim().is_empty() {
            return Err(FlowCoreError::Validation("task answer must not be empty".to_string()));
        }

        let mut pending: Vec<PendingAction> = Vec::new();
        let (outcome, snapshot) = {
            let mut agg = self.progress.get_mut(user_flow_id)?;
            let flow = self.flow_for(&agg)?;
            let step = Self::active_step(&flow, step_id)?;
            let task = step.content()
                           .task
                           .as_ref()
                           .ok_or_else(|| FlowCoreError::Validation(format!("step '{}' has no task", step.title())))?;
            if agg.step_progress(step_id).is_none() {
                return Err(FlowCoreError::NotFound(format!("no progress record for step {}", step_id)));
            }
            if !agg.is_accessible(step_id) {
                return Err(FlowCoreError::NotAccessible(format!("step '{}' is not accessible", step.title())));
            }

            let is_correct = task.check_answer(answer);
            let prior = self.snapshots.get_task(user_flow_id, step_id).unwrap_or_else(|e| {
                                                                          warn!("task snapshot read failed: {}", e);
                                                                          None
                                                                      });
            let snapshot = task_snapshot(task, answer, is_correct, prior);

            let p = agg.step_progress_mut(step_id).expect("checked above");
            p.begin();
            if is_correct && !p.is_completed() {
                p.stamp_task_completed();
                if Self::gates_satisfied(step, p) {
                    p.complete();
                    pending.push((FlowActionKind::TaskCompleted,
                                  by,
                                  None,
                                  json!({ "step_id": step_id, "task_title": task.title() })));
                    pending.push((FlowActionKind::StepCompleted,
                                  by,
                                  None,
                                  json!({ "step_id": step_id, "step_title": step.title() })));
                    Self::unlock_next_step(&mut agg, &flow, step.order());
                    Self::maybe_complete_flow(&mut agg, &mut pending);
                }
            }
            let progress = agg.step_progress(step_id).expect("checked above").clone();
            (TaskAnswerOutcome { is_correct, progress }, snapshot)
        };

        if let Err(e) = self.snapshots.put_task(user_flow_id, step_id, snapshot) {
            warn!("task snapshot write failed for {}/{}: {}", user_flow_id, step_id, e);
        }
        self.emit(user_flow_id, pending);
        Ok(outcome)
    }

    /// Responde una pregunta de quiz (upsert: cambiar la respuesta antes
    /// del scoring está permitido). Con la última pregunta respondida se
    /// puntúa el quiz completo, se escribe el snapshot (apruebe o no) y,
    /// si aprueba, el paso se completa y desbloquea el siguiente.
    pub fn submit_quiz_answer(&self,
                              user_flow_id: Uuid,
                              question_id: Uuid,
                              answer_id: Uuid,
                              by: Uuid)
                              -> Result<QuizAnswerOutcome, FlowCoreError> {
        let mut pending: Vec<PendingAction> = Vec::new();
        let (outcome, snapshot_write) = {
            let mut agg = self.progress.get_mut(user_flow_id)?;
            let flow = self.flow_for(&agg)?;
            // La pregunta debe pertenecer a un quiz del flujo en el que el
            // usuario está inscripto.
            let step = flow.active_steps()
                           .find(|s| {
                               s.content().quiz.as_ref().map(|q| q.question(question_id).is_some()).unwrap_or(false)
                           })
                           .ok_or_else(|| {
                               FlowCoreError::Validation(format!("question {} does not belong to a quiz in this flow",
                                                                 question_id))
                           })?;
            let quiz = step.content().quiz.as_ref().expect("step matched on quiz");
            let question = quiz.question(question_id).expect("step matched on question");
            let answer = question.answer(answer_id).ok_or_else(|| {
                                     FlowCoreError::Validation(format!("answer {} does not belong to question {}",
                                                                       answer_id, question_id))
                                 })?;
            let step_id = step.id();

            let progress = agg.step_progress(step_id)
                              .ok_or_else(|| FlowCoreError::NotFound(format!("no progress record for step {}", step_id)))?;
            if progress.is_completed() {
                // Paso ya completado: eco del registro, sin mutar estado.
                return Ok(QuizAnswerOutcome { is_correct: answer.is_correct(),
                                              is_completed: true,
                                              is_passed: Some(true),
                                              progress: progress.clone() });
            }
            if !agg.is_accessible(step_id) {
                return Err(FlowCoreError::NotAccessible(format!("step '{}' is not accessible", step.title())));
            }

            agg.step_progress_mut(step_id).expect("checked above").begin();
            agg.record_quiz_answer(UserQuizAnswer::new(question_id, answer_id, answer.is_correct()));

            let question_ids: Vec<Uuid> = quiz.questions().iter().map(|q| q.id()).collect();
            let (answered, correct) = agg.quiz_tally(&question_ids);
            if answered < quiz.total_questions() {
                let progress = agg.step_progress(step_id).expect("checked above").clone();
                (QuizAnswerOutcome { is_correct: answer.is_correct(),
                                     is_completed: false,
                                     is_passed: None,
                                     progress },
                 None)
            } else {
                // Quiz completo: puntuar y congelar el árbol, apruebe o no.
                let snapshot = quiz_snapshot(quiz, &agg.quiz_answers);
                let passed = quiz.is_passing_score(correct);
                let p = agg.step_progress_mut(step_id).expect("checked above");
                p.stamp_quiz_scored(correct as u32, quiz.total_questions() as u32);
                if passed && Self::gates_satisfied(step, p) {
                    p.complete();
                    pending.push((FlowActionKind::QuizPassed,
                                  by,
                                  None,
                                  json!({
                                      "step_id": step_id,
                                      "quiz_title": quiz.title(),
                                      "correct_answers": correct,
                                      "total_questions": quiz.total_questions(),
                                  })));
                    pending.push((FlowActionKind::StepCompleted,
                                  by,
                                  None,
                                  json!({ "step_id": step_id, "step_title": step.title() })));
                    Self::unlock_next_step(&mut agg, &flow, step.order());
                    Self::maybe_complete_flow(&mut agg, &mut pending);
                }
                let progress = agg.step_progress(step_id).expect("checked above").clone();
                (QuizAnswerOutcome { is_correct: answer.is_correct(),
                                     is_completed: true,
                                     is_passed: Some(passed),
                                     progress },
                 Some((step_id, snapshot)))
            }
        };

        if let Some((step_id, snapshot)) = snapshot_write {
            if let Err(e) = self.snapshots.put_quiz(user_flow_id, step_id, snapshot) {
                warn!("quiz snapshot write failed for {}/{}: {}", user_flow_id, step_id, e);
            }
        }
        self.emit(user_flow_id, pending);
        Ok(outcome)
    }

    // ------------------------------------------------------------------
    // Lecturas
    // ------------------------------------------------------------------

    pub fn user_flow(&self, user_flow_id: Uuid) -> Result<UserFlow, FlowCoreError> {
        Ok(self.progress.get(user_flow_id)?.user_flow.clone())
    }

    /// La instancia más reciente para (user, flow), si existe y no fue
    /// borrada.
    pub fn find_user_flow(&self, user_id: Uuid, flow_id: Uuid) -> Option<UserFlow> {
        self.progress.find(user_id, flow_id)
    }

    /// Progreso por paso con accesibilidad computada, en orden de
    /// ejecución.
    pub fn flow_progress(&self, user_flow_id: Uuid) -> Result<Vec<StepProgressView>, FlowCoreError> {
        let agg = self.progress.get(user_flow_id)?;
        let flow = self.flow_for(&agg)?;
        let mut views = Vec::with_capacity(agg.total_steps());
        for step in flow.active_steps() {
            if agg.step_progress(step.id()).is_some() {
                views.push(StepProgressView { step_id: step.id(),
                                              order: step.order(),
                                              title: step.title().to_string(),
                                              status: agg.step_progress(step.id()).expect("checked").status(),
                                              is_accessible: agg.is_accessible(step.id()) });
            }
        }
        Ok(views)
    }

    pub fn step_progress(&self, user_flow_id: Uuid, step_id: Uuid) -> Result<UserStepProgress, FlowCoreError> {
        let agg = self.progress.get(user_flow_id)?;
        agg.step_progress(step_id)
           .cloned()
           .ok_or_else(|| FlowCoreError::NotFound(format!("no progress record for step {}", step_id)))
    }

    pub fn buddies(&self, user_flow_id: Uuid) -> Result<Vec<FlowBuddy>, FlowCoreError> {
        Ok(self.progress.get(user_flow_id)?.buddies.clone())
    }

    pub fn actions(&self, user_flow_id: Uuid) -> Vec<FlowAction> {
        self.actions.list(user_flow_id)
    }

    pub fn overdue_flows(&self, today: NaiveDate) -> Vec<UserFlow> {
        self.progress.overdue(today)
    }

    // ------------------------------------------------------------------
    // Internos
    // ------------------------------------------------------------------

    fn flow_for(&self, agg: &FlowProgress) -> Result<std::sync::Arc<Flow>, FlowCoreError> {
        self.catalog
            .get(agg.user_flow.flow_id())
            .ok_or_else(|| FlowCoreError::NotFound(format!("flow {} not found", agg.user_flow.flow_id())))
    }

    fn active_step(flow: &Flow, step_id: Uuid) -> Result<&FlowStep, FlowCoreError> {
        flow.step(step_id)
            .filter(|s| s.is_active())
            .ok_or_else(|| FlowCoreError::NotFound(format!("step {} not found in flow", step_id)))
    }

    /// Un paso se completa cuando todo su contenido adjunto quedó
    /// satisfecho: artículo leído, tarea resuelta, quiz aprobado. Para un
    /// paso de un solo contenido esto colapsa a la regla simple (un paso
    /// sólo-artículo no tiene más compuerta que la lectura).
    fn gates_satisfied(step: &FlowStep, progress: &UserStepProgress) -> bool {
        let content = step.content();
        if content.article.is_some() && progress.article_read_at().is_none() {
            return false;
        }
        if content.task.is_some() && progress.task_completed_at().is_none() {
            return false;
        }
        if let Some(quiz) = &content.quiz {
            match progress.quiz_correct_answers() {
                Some(correct) => {
                    if !quiz.is_passing_score(correct as usize) {
                        return false;
                    }
                }
                None => return false,
            }
        }
        true
    }

    /// Desbloquea el paso activo inmediatamente posterior (si existe y está
    /// `Locked`) y avanza el puntero `current_step`. Nunca toca un paso ya
    /// disponible, en curso o completado.
    fn unlock_next_step(agg: &mut FlowProgress, flow: &Flow, completed_order: u32) {
        if let Some(next) = flow.next_active_step_after(completed_order) {
            if let Some(p) = agg.step_progress_mut(next.id()) {
                p.unlock();
            }
            agg.user_flow.set_current_step(Some(next.id()));
        }
    }

    /// Umbral de completitud: pasos completados >= pasos activos. El
    /// completado del UserFlow es no-op silencioso fuera de
    /// InProgress/Paused.
    fn maybe_complete_flow(agg: &mut FlowProgress, pending: &mut Vec<PendingAction>) {
        if agg.is_complete() && agg.user_flow.complete() {
            pending.push((FlowActionKind::Completed,
                          agg.user_flow.user_id(),
                          None,
                          json!({ "progress_percentage": agg.progress_percentage() })));
        }
    }

    fn record_action(&self,
                     user_flow_id: Uuid,
                     kind: FlowActionKind,
                     performed_by: Uuid,
                     reason: Option<String>,
                     metadata: serde_json::Value) {
        match self.actions.append(user_flow_id, kind, performed_by, reason, metadata) {
            Ok(action) => self.notifier.notify(&action),
            Err(e) => warn!("audit append failed for {} ({}): {}", user_flow_id, kind.as_str(), e),
        }
    }

    fn emit(&self, user_flow_id: Uuid, pending: Vec<PendingAction>) {
        for (kind, by, reason, metadata) in pending {
            self.record_action(user_flow_id, kind, by, reason, metadata);
        }
    }
}
