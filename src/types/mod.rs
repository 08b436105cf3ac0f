pub mod interview;
pub mod persona;
pub mod report;

pub use interview::{EvaluationResult, Interview};
pub use persona::Persona;
pub use report::{InterviewResponse, ReportPayload, RunOutcome, StopReason};
