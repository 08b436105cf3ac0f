use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// 调研智能体类型，同时作为模型调用的日志标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentType {
    PersonaSynthesizer,
    InterviewQuestion,
    InterviewAnswer,
    SufficiencyEvaluator,
    ReportGenerator,
}

impl Display for AgentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            AgentType::PersonaSynthesizer => "persona_synthesizer",
            AgentType::InterviewQuestion => "interview_question",
            AgentType::InterviewAnswer => "interview_answer",
            AgentType::SufficiencyEvaluator => "sufficiency_evaluator",
            AgentType::ReportGenerator => "report_generator",
        };
        write!(f, "{}", str)
    }
}
