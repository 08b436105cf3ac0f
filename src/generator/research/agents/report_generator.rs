use anyhow::{Context, Result};
use tracing::info;

use super::sufficiency_evaluator::format_interviews;
use crate::generator::context::GeneratorContext;
use crate::generator::research::types::AgentType;
use crate::llm::Prompt;
use crate::types::Interview;

/// 报告撰写员 - 基于全部访谈生成调研报告
#[derive(Default)]
pub struct ReportGenerator;

impl ReportGenerator {
    /// 返回模型的原始输出文本，不做结构化解析
    pub async fn generate(
        &self,
        context: &GeneratorContext,
        user_request: &str,
        interviews: &[Interview],
    ) -> Result<String> {
        let prompt = Prompt::new(
            include_str!("prompts/report_generator_sys.tpl"),
            format!(
                include_str!("prompts/report_generator_user.tpl"),
                user_request = user_request,
                interview_results = format_interviews(interviews)
            ),
            AgentType::ReportGenerator.to_string(),
        );

        let report = context
            .gateway
            .complete(&prompt)
            .await
            .context("调研报告生成调用失败")?;
        info!("✓ 调研报告生成完成，{}字符", report.chars().count());
        Ok(report)
    }
}
