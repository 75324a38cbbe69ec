// onboard-domain library entry point
pub mod article;
pub mod error;
pub mod flow;
pub mod hashing;
pub mod quiz;
pub mod task;
pub use article::Article;
pub use error::DomainError;
pub use flow::{Flow, FlowStep, StepContent, StepKind};
pub use quiz::{Quiz, QuizAnswer, QuizQuestion};
pub use task::Task;
