use onboard_core::{FlowEngine, Notifier};
use onboard_domain::{Article, Flow, FlowStep, Quiz, QuizAnswer, QuizQuestion, StepContent, Task};
use uuid::Uuid;

/// Notificador de consola para la demo: imprime cada acción registrada.
struct StdoutNotifier;
impl Notifier for StdoutNotifier {
    fn notify(&self, action: &onboard_core::FlowAction) {
        println!("[notify] {} seq={} by={}", action.kind.as_str(), action.seq, action.performed_by);
    }
}

fn main() {
    // Cargar .env si existe para obtener DATABASE_URL
    let _ = dotenvy::dotenv();
    // CLI mínima:
    //   onboard-cli history --flow <UUID>   (lee el log durable de acciones)
    //   onboard-cli demo                    (corre un flujo en memoria)
    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(|s| s.as_str()) {
        Some("history") => run_history(&args[2..]),
        Some("demo") => run_demo(),
        _ => {
            eprintln!("uso: onboard-cli <history --flow <UUID> | demo>");
            std::process::exit(2);
        }
    }
}

fn run_history(args: &[String]) {
    let mut flow: Option<Uuid> = None;
    let mut i = 0;
    while i < args.len() {
        if args[i] == "--flow" {
            i += 1;
            if i < args.len() {
                flow = Uuid::parse_str(&args[i]).ok();
            }
        }
        i += 1;
    }
    let user_flow_id = match flow {
        Some(id) => id,
        None => {
            eprintln!("[onboard history] falta --flow <UUID>");
            std::process::exit(2);
        }
    };
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("[onboard history] DATABASE_URL no definido");
        std::process::exit(5);
    }
    let pool = match onboard_persistence::build_dev_pool_from_env() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("[onboard history] pool error: {e}");
            std::process::exit(5);
        }
    };
    let log = onboard_persistence::PgActionLog::new(onboard_persistence::PoolProvider { pool });
    use onboard_core::ActionLog;
    let actions = log.list(user_flow_id);
    if actions.is_empty() {
        eprintln!("[onboard history] sin acciones para {}", user_flow_id);
        std::process::exit(4);
    }
    for action in actions {
        println!("{} seq={} by={} reason={} metadata={}",
                 action.kind.as_str(),
                 action.seq,
                 action.performed_by,
                 action.reason.as_deref().unwrap_or("-"),
                 action.metadata);
    }
}

/// Demo en memoria: artículo -> tarea -> quiz, con el rastro de acciones
/// impreso por el notificador.
fn run_demo() {
    let engine = FlowEngine::new().with_notifier(StdoutNotifier);

    let article = Article::new("Bienvenida", "Leé esto primero.", None).expect("article");
    let task = Task::new("Código oculto", "Buscar la palabra", "Está en la guía", "brújula", None).expect("task");
    let questions = vec![QuizQuestion::new("¿Dónde se registra el progreso?", None, 1,
                                           vec![QuizAnswer::new("En el flujo", true, "", 1).expect("answer"),
                                                QuizAnswer::new("En un papel", false, "", 2).expect("answer")])
                                     .expect("question")];
    let quiz = Quiz::new("Quiz final", None, 70, false, false, questions).expect("quiz");

    let flow = Flow::new("Onboarding demo", "Flujo de demostración",
                         vec![FlowStep::new("Leer bienvenida", "", 1, StepContent::article(article)).expect("step"),
                              FlowStep::new("Resolver tarea", "", 2, StepContent::task(task)).expect("step"),
                              FlowStep::new("Quiz final", "", 3, StepContent::quiz(quiz)).expect("step")])
                    .expect("flow");

    let steps: Vec<FlowStep> = flow.steps().to_vec();
    let flow_id = engine.register_flow(flow);
    let learner = Uuid::new_v4();
    let buddy = Uuid::new_v4();

    let user_flow = engine.start_flow(flow_id, learner, buddy, None, &[]).expect("start");
    println!("instancia {} deadline={:?}", user_flow.id(), user_flow.expected_completion_date());

    engine.mark_article_read(user_flow.id(), steps[0].id(), learner).expect("read");
    let wrong = engine.submit_task_answer(user_flow.id(), steps[1].id(), learner, "mapa").expect("submit");
    println!("intento 'mapa': is_correct={}", wrong.is_correct);
    let right = engine.submit_task_answer(user_flow.id(), steps[1].id(), learner, "Brújula").expect("submit");
    println!("intento 'Brújula': is_correct={}", right.is_correct);

    let quiz_step = &steps[2];
    let quiz = quiz_step.content().quiz.as_ref().expect("quiz");
    let question = &quiz.questions()[0];
    let correct = question.answers().iter().find(|a| a.is_correct()).expect("correct option");
    let outcome = engine.submit_quiz_answer(user_flow.id(), question.id(), correct.id(), learner).expect("answer");
    println!("quiz: is_completed={} is_passed={:?}", outcome.is_completed, outcome.is_passed);

    let final_state = engine.user_flow(user_flow.id()).expect("user flow");
    println!("estado final: {}", final_state.status().as_str());
}
