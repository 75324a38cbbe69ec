//! Binario de validación end-to-end del motor de progresión.
//!
//! Corre los recorridos de referencia contra los stores en memoria y, con
//! el feature `pg_demo` y DATABASE_URL presente, repite el recorrido con
//! los backends Postgres.

use chrono::Utc;
use onboard_core::{FlowEngine, FlowStatus, StepStatus};
use onboard_domain::{Article, Flow, FlowStep, Quiz, QuizAnswer, QuizQuestion, StepContent, Task};
use uuid::Uuid;

fn sample_flow() -> Flow {
    let article = Article::new("Bienvenida", "Contenido inicial", None).expect("article");
    let task = Task::new("Código", "Buscar la palabra", "Al final de la guía", "pineapple", None).expect("task");
    let questions = vec![QuizQuestion::new("Pregunta 1", None, 1,
                                           vec![QuizAnswer::new("sí", true, "", 1).expect("answer"),
                                                QuizAnswer::new("no", false, "", 2).expect("answer")])
                                     .expect("question"),
                         QuizQuestion::new("Pregunta 2", None, 2,
                                           vec![QuizAnswer::new("sí", true, "", 1).expect("answer"),
                                                QuizAnswer::new("no", false, "", 2).expect("answer")])
                                     .expect("question")];
    let quiz = Quiz::new("Quiz", None, 70, false, false, questions).expect("quiz");
    Flow::new("Onboarding general", "Flujo de validación",
              vec![FlowStep::new("Leer", "", 1, StepContent::article(article)).expect("step")
                                                                             .with_estimated_minutes(30),
                   FlowStep::new("Tarea", "", 2, StepContent::task(task)).expect("step").with_estimated_minutes(60),
                   FlowStep::new("Quiz", "", 3, StepContent::quiz(quiz)).expect("step").with_estimated_minutes(45)])
        .expect("flow")
}

/// Recorre un flujo completo con un motor dado y devuelve el id de la
/// instancia. Deja asserts en cada transición clave.
fn run_flow_to_completion<A, S>(engine: &FlowEngine<A, S>, flow_id: Uuid, steps: &[FlowStep], learner: Uuid) -> Uuid
    where A: onboard_core::ActionLog,
          S: onboard_core::SnapshotStore
{
    let buddy = Uuid::new_v4();
    let user_flow = engine.start_flow(flow_id, learner, buddy, None, &[]).expect("start");
    assert_eq!(user_flow.status(), FlowStatus::InProgress);

    engine.mark_article_read(user_flow.id(), steps[0].id(), learner).expect("read");

    let wrong = engine.submit_task_answer(user_flow.id(), steps[1].id(), learner, "banana").expect("submit");
    assert!(!wrong.is_correct, "wrong answer must not complete the step");
    let right = engine.submit_task_answer(user_flow.id(), steps[1].id(), learner, "PINEAPPLE").expect("submit");
    assert!(right.is_correct);
    assert_eq!(right.progress.status(), StepStatus::Completed);

    let quiz = steps[2].content().quiz.as_ref().expect("quiz");
    for question in quiz.questions() {
        let correct = question.answers().iter().find(|a| a.is_correct()).expect("correct option");
        engine.submit_quiz_answer(user_flow.id(), question.id(), correct.id(), learner).expect("answer");
    }
    assert_eq!(engine.user_flow(user_flow.id()).expect("user flow").status(), FlowStatus::Completed);
    user_flow.id()
}

/// Validación: progresión completa artículo -> tarea -> quiz.
fn run_progression_validation() {
    let engine = FlowEngine::new();
    let flow = sample_flow();
    let steps: Vec<FlowStep> = flow.steps().to_vec();
    let flow_id = engine.register_flow(flow);

    let user_flow_id = run_flow_to_completion(&engine, flow_id, &steps, Uuid::new_v4());
    let actions = engine.actions(user_flow_id);
    assert!(actions.len() >= 6, "full trail must be recorded, got {}", actions.len());
    println!("[OK] progression: {} acciones registradas", actions.len());
}

/// Validación: la pausa congela la accesibilidad y el resume la restaura.
fn run_pause_resume_validation() {
    let engine = FlowEngine::new();
    let flow = sample_flow();
    let first_step = flow.steps()[0].id();
    let flow_id = engine.register_flow(flow);
    let learner = Uuid::new_v4();
    let buddy = Uuid::new_v4();

    let user_flow = engine.start_flow(flow_id, learner, buddy, None, &[]).expect("start");
    engine.mark_article_read(user_flow.id(), first_step, learner).expect("read");
    engine.pause_flow(user_flow.id(), buddy, Some("pausa administrativa".to_string())).expect("pause");

    let frozen = engine.flow_progress(user_flow.id()).expect("progress");
    assert!(frozen.iter().all(|v| !v.is_accessible), "pause must freeze every step");

    engine.resume_flow(user_flow.id(), buddy).expect("resume");
    let thawed = engine.flow_progress(user_flow.id()).expect("progress");
    assert!(thawed.iter().any(|v| v.is_accessible), "resume must restore accessibility");
    assert!(engine.overdue_flows(Utc::now().date_naive()).is_empty(),
            "a freshly started flow must not be overdue");
    println!("[OK] pause/resume");
}

/// Validación: instancias de usuarios distintos progresan en paralelo sin
/// coordinarse; la unidad de contención es cada aggregate.
fn run_concurrency_validation() {
    use rayon::prelude::*;

    let engine = FlowEngine::new();
    let flow = sample_flow();
    let steps: Vec<FlowStep> = flow.steps().to_vec();
    let flow_id = engine.register_flow(flow);

    let learners: Vec<Uuid> = (0..32).map(|_| Uuid::new_v4()).collect();
    let instance_ids: Vec<Uuid> = learners.par_iter()
                                          .map(|learner| run_flow_to_completion(&engine, flow_id, &steps, *learner))
                                          .collect();

    for id in &instance_ids {
        assert_eq!(engine.user_flow(*id).expect("user flow").status(), FlowStatus::Completed);
    }
    println!("[OK] concurrency: {} instancias completadas en paralelo", instance_ids.len());
}

#[cfg(feature = "pg_demo")]
fn run_pg_demo() {
    use onboard_persistence::pg::{PgActionLog, PgSnapshotStore, PoolProvider};

    if std::env::var("DATABASE_URL").is_err() {
        println!("[pg_demo] DATABASE_URL no definido: omitido");
        return;
    }
    let actions = PgActionLog::new(PoolProvider { pool: onboard_persistence::build_dev_pool_from_env().expect("pool") });
    let snapshots =
        PgSnapshotStore::new(PoolProvider { pool: onboard_persistence::build_dev_pool_from_env().expect("pool") });
    let engine = FlowEngine::new_with_stores(actions, snapshots);

    let flow = sample_flow();
    let steps: Vec<FlowStep> = flow.steps().to_vec();
    let flow_id = engine.register_flow(flow);
    let user_flow_id = run_flow_to_completion(&engine, flow_id, &steps, Uuid::new_v4());
    println!("[OK] pg_demo: instancia {} con log durable ({} acciones)",
             user_flow_id,
             engine.actions(user_flow_id).len());
}

fn main() {
    let _ = dotenvy::dotenv();

    run_progression_validation();
    run_pause_resume_validation();
    run_concurrency_validation();

    #[cfg(feature = "pg_demo")]
    run_pg_demo();

    println!("validación completa");
}
