//! Pausa/reanudación y su efecto sobre la accesibilidad computada.

mod common;

use common::sample_flow;
use onboard_core::progress::{FlowProgress, UserFlow};
use onboard_core::{FlowCoreError, FlowEngine, FlowStatus};
use uuid::Uuid;

#[test]
fn pausing_freezes_accessibility_and_resume_restores_it() {
    let engine = FlowEngine::new();
    let flow = sample_flow();
    let step1 = flow.steps()[0].id();
    let flow_id = engine.register_flow(flow);
    let learner = Uuid::new_v4();
    let buddy = Uuid::new_v4();

    let user_flow = engine.start_flow(flow_id, learner, buddy, None, &[]).unwrap();
    engine.mark_article_read(user_flow.id(), step1, learner).unwrap();

    let before: Vec<bool> = engine.flow_progress(user_flow.id()).unwrap().iter().map(|v| v.is_accessible).collect();
    assert_eq!(before, vec![true, true, false]);

    // La pausa congela TODO el flujo, sin importar lo ya completado
    let paused = engine.pause_flow(user_flow.id(), buddy, Some("vacaciones".to_string())).unwrap();
    assert_eq!(paused.status(), FlowStatus::Paused);
    assert_eq!(paused.paused_by(), Some(buddy));
    assert!(paused.paused_at().is_some());
    assert_eq!(paused.pause_reason(), Some("vacaciones"));

    let during: Vec<bool> = engine.flow_progress(user_flow.id()).unwrap().iter().map(|v| v.is_accessible).collect();
    assert_eq!(during, vec![false, false, false], "every step must report inaccessible while paused");

    // Interactuar durante la pausa es NotAccessible; la excepción es la
    // relectura de un paso ya completado, que es no-op aun en pausa
    let reread = engine.mark_article_read(user_flow.id(), step1, learner);
    assert!(reread.is_ok(), "idempotent re-read returns current state");
    let task_step = engine.flow_progress(user_flow.id()).unwrap()[1].step_id;
    let err = engine.submit_task_answer(user_flow.id(), task_step, learner, "pineapple").unwrap_err();
    assert!(matches!(err, FlowCoreError::NotAccessible(_)));

    // Resume: la accesibilidad vuelve a los valores pre-pausa
    let resumed = engine.resume_flow(user_flow.id(), buddy).unwrap();
    assert_eq!(resumed.status(), FlowStatus::InProgress);
    assert_eq!(resumed.paused_by(), None);
    assert_eq!(resumed.pause_reason(), None);
    let after: Vec<bool> = engine.flow_progress(user_flow.id()).unwrap().iter().map(|v| v.is_accessible).collect();
    assert_eq!(after, before);
}

#[test]
fn pause_requires_in_progress_and_resume_requires_paused() {
    let engine = FlowEngine::new();
    let flow_id = engine.register_flow(sample_flow());
    let learner = Uuid::new_v4();
    let buddy = Uuid::new_v4();

    let user_flow = engine.start_flow(flow_id, learner, buddy, None, &[]).unwrap();

    // Resume sobre un flujo no pausado
    let err = engine.resume_flow(user_flow.id(), buddy).unwrap_err();
    assert!(matches!(err, FlowCoreError::InvalidState(_)), "expected InvalidState, got {:?}", err);
    assert_eq!(err.code(), "invalid_state");

    // Doble pausa
    engine.pause_flow(user_flow.id(), buddy, None).unwrap();
    let err = engine.pause_flow(user_flow.id(), buddy, None).unwrap_err();
    assert!(matches!(err, FlowCoreError::InvalidState(_)));
}

#[test]
fn suspended_instances_report_every_step_inaccessible() {
    let flow = sample_flow();
    let step1 = flow.steps()[0].id();
    let mut user_flow = UserFlow::new(Uuid::new_v4(), flow.id(), None);
    user_flow.suspend();

    let aggregate = FlowProgress::bootstrap(user_flow, &flow);
    assert!(!aggregate.is_accessible(step1), "suspended lock must freeze even the first step");
}
