use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::generator::context::GeneratorContext;
use crate::generator::parsers::parse_personas;
use crate::generator::research::types::AgentType;
use crate::llm::Prompt;
use crate::types::Persona;

/// 画像合成员 - 根据调研需求一次性生成一批调研对象
#[derive(Default)]
pub struct PersonaSynthesizer;

impl PersonaSynthesizer {
    /// 生成至多 `count` 个画像
    ///
    /// 只调用一次模型，解析失败的行被丢弃，返回数量可能少于 `count` 甚至为0，不做补充重试。
    pub async fn synthesize(
        &self,
        context: &GeneratorContext,
        user_request: &str,
        count: usize,
    ) -> Result<Vec<Persona>> {
        let prompt = self.build_prompt(user_request, count);
        let output = context
            .gateway
            .complete(&prompt)
            .await
            .context("画像生成调用失败")?;

        let personas = parse_personas(&output);
        if personas.len() < count {
            warn!(
                "期望生成{}个画像，实际解析出{}个",
                count,
                personas.len()
            );
        }
        info!("✓ 画像生成完成，共{}个", personas.len());
        Ok(personas)
    }

    fn build_prompt(&self, user_request: &str, count: usize) -> Prompt {
        Prompt::new(
            include_str!("prompts/persona_synthesizer_sys.tpl"),
            format!(
                include_str!("prompts/persona_synthesizer_user.tpl"),
                count = count,
                user_request = user_request
            ),
            AgentType::PersonaSynthesizer.to_string(),
        )
    }
}
