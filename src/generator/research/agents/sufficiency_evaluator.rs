use anyhow::{Context, Result};
use tracing::info;

use crate::generator::context::GeneratorContext;
use crate::generator::parsers::parse_evaluation;
use crate::generator::research::types::AgentType;
use crate::llm::Prompt;
use crate::types::{EvaluationResult, Interview};

/// 充分性评估员 - 判断已收集的访谈是否足以撰写报告
#[derive(Default)]
pub struct SufficiencyEvaluator;

impl SufficiencyEvaluator {
    pub async fn evaluate(
        &self,
        context: &GeneratorContext,
        user_request: &str,
        interviews: &[Interview],
    ) -> Result<EvaluationResult> {
        let prompt = Prompt::new(
            include_str!("prompts/sufficiency_evaluator_sys.tpl"),
            format!(
                include_str!("prompts/sufficiency_evaluator_user.tpl"),
                user_request = user_request,
                interview_results = format_interviews(interviews)
            ),
            AgentType::SufficiencyEvaluator.to_string(),
        );

        let output = context
            .gateway
            .complete(&prompt)
            .await
            .context("充分性评估调用失败")?;

        let evaluation = parse_evaluation(&output);
        info!(
            "评估结果: is_sufficient={}，理由: {}",
            evaluation.is_sufficient, evaluation.reason
        );
        Ok(evaluation)
    }
}

/// 把访谈记录渲染为提示词中的调查结果块
pub(crate) fn format_interviews(interviews: &[Interview]) -> String {
    interviews
        .iter()
        .map(Interview::to_prompt_block)
        .collect::<Vec<_>>()
        .join("\n\n")
}
