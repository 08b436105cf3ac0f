pub mod interview_conductor;
pub mod persona_synthesizer;
pub mod report_generator;
pub mod sufficiency_evaluator;
