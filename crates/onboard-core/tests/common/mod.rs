//! Builders compartidos por los tests de integración del motor.

use onboard_domain::{Article, Flow, FlowStep, Quiz, QuizAnswer, QuizQuestion, StepContent, Task};
use uuid::Uuid;

pub fn sample_article_step(order: u32) -> FlowStep {
    let article = Article::new("Bienvenida", "Contenido de bienvenida al equipo.", Some("Resumen".to_string())).unwrap();
    FlowStep::new("Leer la guía de bienvenida", "Lectura inicial", order, StepContent::article(article)).unwrap()
                                                                                                       .with_estimated_minutes(30)
}

pub fn sample_task_step(order: u32, code_word: &str) -> FlowStep {
    let task = Task::new("Buscar el código",
                         "Encontrar la palabra clave escondida",
                         "La palabra está al final de la guía",
                         code_word,
                         Some("Mira la última sección".to_string())).unwrap();
    FlowStep::new("Resolver la tarea", "Tarea de código", order, StepContent::task(task)).unwrap()
                                                                                        .with_estimated_minutes(60)
}

/// Quiz con `questions` preguntas de dos variantes; la primera variante de
/// cada pregunta es la correcta.
pub fn sample_quiz(passing: u32, questions: usize) -> Quiz {
    let questions: Vec<QuizQuestion> =
        (1..=questions).map(|i| {
                           let answers = vec![QuizAnswer::new("respuesta correcta", true, "porque sí", 1).unwrap(),
                                              QuizAnswer::new("respuesta incorrecta", false, "porque no", 2).unwrap(),];
                           QuizQuestion::new(&format!("Pregunta {}", i), None, i as u32, answers).unwrap()
                       })
                       .collect();
    Quiz::new("Quiz de conocimiento", None, passing, false, false, questions).unwrap()
}

pub fn sample_quiz_step(order: u32, passing: u32, questions: usize) -> FlowStep {
    FlowStep::new("Responder el quiz", "Chequeo de conocimiento", order,
                  StepContent::quiz(sample_quiz(passing, questions))).unwrap()
                                                                     .with_estimated_minutes(45)
}

/// Flujo de tres pasos: artículo, tarea ("pineapple") y quiz (70%, dos
/// preguntas).
pub fn sample_flow() -> Flow {
    Flow::new("Onboarding general",
              "Flujo de onboarding de prueba",
              vec![sample_article_step(1), sample_task_step(2, "pineapple"), sample_quiz_step(3, 70, 2)]).unwrap()
}

/// Ids (pregunta, variante correcta, variante incorrecta) para la pregunta
/// `idx` (base 0) del quiz del paso dado.
pub fn quiz_ids(step: &FlowStep, idx: usize) -> (Uuid, Uuid, Uuid) {
    let quiz = step.content().quiz.as_ref().expect("step has quiz");
    let question = &quiz.questions()[idx];
    let correct = question.answers().iter().find(|a| a.is_correct()).unwrap().id();
    let wrong = question.answers().iter().find(|a| !a.is_correct()).unwrap().id();
    (question.id(), correct, wrong)
}
