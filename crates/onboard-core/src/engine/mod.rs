//! Motor de progresión: orquestación explícita de cada caso de uso.

mod core;

pub use core::{FlowEngine, QuizAnswerOutcome, StepProgressView, TaskAnswerOutcome};
