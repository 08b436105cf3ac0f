// 调研阶段的四个智能体，均为无状态的单元结构体，所需的模型网关与配置从GeneratorContext获取
// PersonaSynthesizer：一次调用生成k个画像
// InterviewConductor：两次批量调用，分别生成问题与回答
// SufficiencyEvaluator：一次调用判断累计访谈是否足以撰写报告
// ReportGenerator：一次调用生成最终调研报告

pub mod agents;
pub mod types;

pub use agents::interview_conductor::InterviewConductor;
pub use agents::persona_synthesizer::PersonaSynthesizer;
pub use agents::report_generator::ReportGenerator;
pub use agents::sufficiency_evaluator::SufficiencyEvaluator;
pub use types::AgentType;
