//! Progresión de punta a punta: el escenario de referencia artículo ->
//! tarea -> quiz, más idempotencia y orden de desbloqueo.

mod common;

use common::{quiz_ids, sample_flow};
use onboard_core::{FlowActionKind, FlowCoreError, FlowEngine, FlowStatus, SnapshotStore, StepStatus};
use uuid::Uuid;

#[test]
fn full_progression_article_task_quiz() {
    let engine = FlowEngine::new();
    let flow = sample_flow();
    let steps: Vec<_> = flow.steps().to_vec();
    let flow_id = engine.register_flow(flow);

    let learner = Uuid::new_v4();
    let buddy = Uuid::new_v4();

    // Arranque: primer paso disponible, el resto bloqueado
    let user_flow = engine.start_flow(flow_id, learner, buddy, None, &[]).expect("start should succeed");
    assert_eq!(user_flow.status(), FlowStatus::InProgress);
    assert!(user_flow.started_at().is_some(), "started_at must be stamped");
    assert_eq!(user_flow.current_step(), Some(steps[0].id()));
    assert!(user_flow.expected_completion_date().is_some(), "deadline must be auto-computed");

    let views = engine.flow_progress(user_flow.id()).unwrap();
    assert_eq!(views[0].status, StepStatus::Available);
    assert!(views[0].is_accessible, "step 1 must be accessible right after start");
    assert_eq!(views[1].status, StepStatus::Locked);
    assert!(!views[1].is_accessible);
    assert_eq!(views[2].status, StepStatus::Locked);
    assert!(!views[2].is_accessible);

    // Leer el artículo completa el paso 1 y desbloquea el 2
    let p1 = engine.mark_article_read(user_flow.id(), steps[0].id(), learner).unwrap();
    assert_eq!(p1.status(), StepStatus::Completed);
    assert!(p1.article_read_at().is_some());
    let views = engine.flow_progress(user_flow.id()).unwrap();
    assert_eq!(views[1].status, StepStatus::Available);
    assert_eq!(views[2].status, StepStatus::Locked, "only order+1 unlocks");

    // Respuesta incorrecta: sin error, sin transición
    let wrong = engine.submit_task_answer(user_flow.id(), steps[1].id(), learner, "banana").unwrap();
    assert!(!wrong.is_correct);
    assert_eq!(wrong.progress.status(), StepStatus::InProgress);

    // Respuesta correcta (insensible a mayúsculas y espacios)
    let right = engine.submit_task_answer(user_flow.id(), steps[1].id(), learner, "  PineApple  ").unwrap();
    assert!(right.is_correct);
    assert_eq!(right.progress.status(), StepStatus::Completed);
    let views = engine.flow_progress(user_flow.id()).unwrap();
    assert_eq!(views[2].status, StepStatus::Available);

    // Quiz: ambas preguntas correctas -> paso completado y flujo completado
    let (q1, a1, _) = quiz_ids(&steps[2], 0);
    let (q2, a2, _) = quiz_ids(&steps[2], 1);
    let first = engine.submit_quiz_answer(user_flow.id(), q1, a1, learner).unwrap();
    assert!(first.is_correct);
    assert!(!first.is_completed, "quiz must not score until every question is answered");
    assert_eq!(first.is_passed, None);

    let second = engine.submit_quiz_answer(user_flow.id(), q2, a2, learner).unwrap();
    assert!(second.is_completed);
    assert_eq!(second.is_passed, Some(true));
    assert_eq!(second.progress.status(), StepStatus::Completed);
    assert_eq!(second.progress.quiz_correct_answers(), Some(2));
    assert_eq!(second.progress.quiz_total_questions(), Some(2));

    let finished = engine.user_flow(user_flow.id()).unwrap();
    assert_eq!(finished.status(), FlowStatus::Completed);
    assert!(finished.completed_at().is_some(), "completed_at must be stamped");

    // Auditoría: el ciclo de vida completo quedó registrado en orden
    let kinds: Vec<FlowActionKind> = engine.actions(user_flow.id()).iter().map(|a| a.kind).collect();
    assert_eq!(kinds.iter().filter(|k| **k == FlowActionKind::Started).count(), 1);
    assert_eq!(kinds.iter().filter(|k| **k == FlowActionKind::StepCompleted).count(), 3);
    assert_eq!(kinds.iter().filter(|k| **k == FlowActionKind::TaskCompleted).count(), 1);
    assert_eq!(kinds.iter().filter(|k| **k == FlowActionKind::QuizPassed).count(), 1);
    assert_eq!(kinds.iter().filter(|k| **k == FlowActionKind::Completed).count(), 1);

    // Snapshots: artículo, tarea con dos intentos y quiz aprobado
    let article = engine.snapshot_store().get_article(user_flow.id(), steps[0].id()).unwrap();
    assert!(article.is_some(), "article snapshot must be written");
    let task = engine.snapshot_store().get_task(user_flow.id(), steps[1].id()).unwrap().unwrap();
    assert_eq!(task.attempts_count, 2, "both attempts must be counted");
    assert!(task.is_correct);
    assert_eq!(task.user_answer, "  PineApple  ");
    let quiz = engine.snapshot_store().get_quiz(user_flow.id(), steps[2].id()).unwrap().unwrap();
    assert!(quiz.is_passed);
    assert_eq!(quiz.score_percentage, 100);
}

#[test]
fn starting_twice_is_a_conflict() {
    let engine = FlowEngine::new();
    let flow_id = engine.register_flow(sample_flow());
    let learner = Uuid::new_v4();
    let buddy = Uuid::new_v4();

    engine.start_flow(flow_id, learner, buddy, None, &[]).unwrap();
    let err = engine.start_flow(flow_id, learner, buddy, None, &[]).unwrap_err();
    assert!(matches!(err, FlowCoreError::Conflict(_)), "expected Conflict, got {:?}", err);
    assert_eq!(err.code(), "conflict");
}

#[test]
fn mark_article_read_is_idempotent() {
    let engine = FlowEngine::new();
    let flow = sample_flow();
    let step1 = flow.steps()[0].id();
    let flow_id = engine.register_flow(flow);
    let learner = Uuid::new_v4();

    let user_flow = engine.start_flow(flow_id, learner, Uuid::new_v4(), None, &[]).unwrap();
    let first = engine.mark_article_read(user_flow.id(), step1, learner).unwrap();
    let actions_after_first = engine.actions(user_flow.id()).len();
    let snapshot_after_first = engine.snapshot_store().get_article(user_flow.id(), step1).unwrap().unwrap();

    // Segunda lectura: mismo estado terminal, sin duplicar auditoría ni
    // snapshot
    let second = engine.mark_article_read(user_flow.id(), step1, learner).unwrap();
    assert_eq!(first, second, "second read must return the same terminal state");
    assert_eq!(engine.actions(user_flow.id()).len(), actions_after_first, "no duplicated actions");
    let snapshot_after_second = engine.snapshot_store().get_article(user_flow.id(), step1).unwrap().unwrap();
    assert_eq!(snapshot_after_first, snapshot_after_second, "snapshot must not be rewritten");
}

#[test]
fn locked_steps_reject_interaction() {
    let engine = FlowEngine::new();
    let flow = sample_flow();
    let task_step = flow.steps()[1].id();
    let flow_id = engine.register_flow(flow);
    let learner = Uuid::new_v4();

    let user_flow = engine.start_flow(flow_id, learner, Uuid::new_v4(), None, &[]).unwrap();
    let err = engine.submit_task_answer(user_flow.id(), task_step, learner, "pineapple").unwrap_err();
    assert!(matches!(err, FlowCoreError::NotAccessible(_)), "expected NotAccessible, got {:?}", err);
    assert_eq!(err.code(), "not_accessible");
}

#[test]
fn completed_steps_never_exceed_active_steps_and_equality_completes_the_flow() {
    let engine = FlowEngine::new();
    let flow = sample_flow();
    let steps: Vec<_> = flow.steps().to_vec();
    let total = flow.total_steps();
    let flow_id = engine.register_flow(flow);
    let learner = Uuid::new_v4();

    let user_flow = engine.start_flow(flow_id, learner, Uuid::new_v4(), None, &[]).unwrap();

    let completed = |engine: &FlowEngine<_, _>| {
        engine.flow_progress(user_flow.id())
              .unwrap()
              .iter()
              .filter(|v| v.status == StepStatus::Completed)
              .count()
    };

    engine.mark_article_read(user_flow.id(), steps[0].id(), learner).unwrap();
    assert!(completed(&engine) <= total);
    engine.submit_task_answer(user_flow.id(), steps[1].id(), learner, "pineapple").unwrap();
    assert!(completed(&engine) <= total);
    let (q1, a1, _) = quiz_ids(&steps[2], 0);
    let (q2, a2, _) = quiz_ids(&steps[2], 1);
    engine.submit_quiz_answer(user_flow.id(), q1, a1, learner).unwrap();
    engine.submit_quiz_answer(user_flow.id(), q2, a2, learner).unwrap();

    assert_eq!(completed(&engine), total);
    // Igualdad alcanzada => el flujo queda completado
    assert_eq!(engine.user_flow(user_flow.id()).unwrap().status(), FlowStatus::Completed);
}

#[test]
fn unknown_instance_and_step_are_not_found() {
    let engine = FlowEngine::new();
    let flow = sample_flow();
    let flow_id = engine.register_flow(sample_flow());
    let learner = Uuid::new_v4();

    let err = engine.user_flow(Uuid::new_v4()).unwrap_err();
    assert_eq!(err.code(), "not_found");

    let user_flow = engine.start_flow(flow_id, learner, Uuid::new_v4(), None, &[]).unwrap();
    // Paso de otra definición de flujo: no pertenece al padre esperado
    let foreign_step = flow.steps()[0].id();
    let err = engine.mark_article_read(user_flow.id(), foreign_step, learner).unwrap_err();
    assert!(matches!(err, FlowCoreError::NotFound(_)), "expected NotFound, got {:?}", err);
}
