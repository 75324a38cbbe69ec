//! Pruebas de los backends Postgres (requieren DATABASE_URL válido en
//! entorno; sin él se omiten).

use onboard_core::{ActionLog, FlowActionKind, FlowEngine, FlowStatus, SnapshotStore};
use onboard_domain::{Article, Flow, FlowStep, StepContent};
use onboard_persistence::pg::{PgActionLog, PgSnapshotStore, PoolProvider};
use onboard_persistence::{build_dev_pool_from_env, config::DbConfig, pg::build_pool};
use uuid::Uuid;

#[test]
fn create_pool_from_env() {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL no definido: omitiendo test");
        return;
    }
    let cfg = DbConfig::from_env();
    let pool = build_pool(&cfg.url, cfg.min_connections, cfg.max_connections).expect("pool");
    let mut conn = pool.get().expect("conn");
    use diesel::connection::SimpleConnection;
    conn.batch_execute("SELECT 1;").expect("select 1");
}

#[test]
fn action_log_appends_and_lists_in_order() {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL no definido: omitiendo test");
        return;
    }
    let pool = build_dev_pool_from_env().expect("pool");
    let log = PgActionLog::new(PoolProvider { pool });
    let user_flow_id = Uuid::new_v4();
    let actor = Uuid::new_v4();

    log.append(user_flow_id, FlowActionKind::Started, actor, None, serde_json::json!({})).expect("append");
    log.append(user_flow_id,
               FlowActionKind::Paused,
               actor,
               Some("vacaciones".to_string()),
               serde_json::json!({ "x": 1 }))
       .expect("append");

    let actions = log.list(user_flow_id);
    assert_eq!(actions.len(), 2);
    assert_eq!(actions[0].kind, FlowActionKind::Started);
    assert_eq!(actions[1].kind, FlowActionKind::Paused);
    assert!(actions[0].seq < actions[1].seq, "seq must be monotonic");
    assert_eq!(actions[1].reason.as_deref(), Some("vacaciones"));
}

#[test]
fn engine_runs_against_postgres_backends() {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL no definido: omitiendo test");
        return;
    }
    let actions = PgActionLog::new(PoolProvider { pool: build_dev_pool_from_env().expect("pool") });
    let snapshots = PgSnapshotStore::new(PoolProvider { pool: build_dev_pool_from_env().expect("pool") });
    let engine = FlowEngine::new_with_stores(actions, snapshots);

    let article = Article::new("Guía", "contenido", None).unwrap();
    let flow = Flow::new("Flujo pg", "una lectura",
                         vec![FlowStep::new("Leer", "lectura", 1, StepContent::article(article)).unwrap()]).unwrap();
    let step_id = flow.steps()[0].id();
    let flow_id = engine.register_flow(flow);
    let learner = Uuid::new_v4();

    let user_flow = engine.start_flow(flow_id, learner, Uuid::new_v4(), None, &[]).expect("start");
    engine.mark_article_read(user_flow.id(), step_id, learner).expect("read");

    assert_eq!(engine.user_flow(user_flow.id()).unwrap().status(), FlowStatus::Completed);
    // Auditoría y snapshot durables
    let kinds: Vec<FlowActionKind> = engine.actions(user_flow.id()).iter().map(|a| a.kind).collect();
    assert!(kinds.contains(&FlowActionKind::Started));
    assert!(kinds.contains(&FlowActionKind::StepCompleted));
    assert!(kinds.contains(&FlowActionKind::Completed));
    let snapshot = engine.snapshot_store().get_article(user_flow.id(), step_id).expect("read snapshot");
    assert!(snapshot.is_some(), "article snapshot must be durable");
}
