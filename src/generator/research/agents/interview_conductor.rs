use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::generator::context::GeneratorContext;
use crate::generator::research::types::AgentType;
use crate::llm::Prompt;
use crate::types::{Interview, Persona};

/// 访谈执行员 - 为每个画像生成一个问题并模拟其回答
#[derive(Default)]
pub struct InterviewConductor;

impl InterviewConductor {
    /// 两阶段批量生成：先为全部画像生成问题，再以画像身份回答各自的问题
    ///
    /// 结果按位置与 `personas` 对应。批量调用返回条数不足时按最短序列截断并记录警告，
    /// 因此输出长度为 `min(画像数, 问题数, 回答数)`。
    pub async fn conduct(
        &self,
        context: &GeneratorContext,
        user_request: &str,
        personas: &[Persona],
    ) -> Result<Vec<Interview>> {
        if personas.is_empty() {
            warn!("没有可访谈的画像，跳过访谈");
            return Ok(Vec::new());
        }

        let questions = self
            .generate_questions(context, user_request, personas)
            .await?;
        let answers = self.generate_answers(context, personas, &questions).await?;

        let interviews = Self::create_interviews(personas, questions, answers);
        info!("✓ 访谈完成，共{}条", interviews.len());
        Ok(interviews)
    }

    async fn generate_questions(
        &self,
        context: &GeneratorContext,
        user_request: &str,
        personas: &[Persona],
    ) -> Result<Vec<String>> {
        let prompts: Vec<Prompt> = personas
            .iter()
            .map(|persona| {
                Prompt::new(
                    include_str!("prompts/interview_question_sys.tpl"),
                    format!(
                        include_str!("prompts/interview_question_user.tpl"),
                        user_request = user_request,
                        persona_name = persona.name,
                        persona_background = persona.background
                    ),
                    AgentType::InterviewQuestion.to_string(),
                )
            })
            .collect();

        context
            .gateway
            .complete_batch(&prompts)
            .await
            .context("访谈问题生成调用失败")
    }

    async fn generate_answers(
        &self,
        context: &GeneratorContext,
        personas: &[Persona],
        questions: &[String],
    ) -> Result<Vec<String>> {
        let prompts: Vec<Prompt> = personas
            .iter()
            .zip(questions)
            .map(|(persona, question)| {
                Prompt::new(
                    format!(
                        include_str!("prompts/interview_answer_sys.tpl"),
                        persona_name = persona.name,
                        persona_background = persona.background,
                        persona_age = persona.age_bracket,
                        persona_gender = persona.gender,
                        persona_role = persona.role
                    ),
                    format!(
                        include_str!("prompts/interview_answer_user.tpl"),
                        question = question.trim()
                    ),
                    AgentType::InterviewAnswer.to_string(),
                )
            })
            .collect();

        context
            .gateway
            .complete_batch(&prompts)
            .await
            .context("访谈回答生成调用失败")
    }

    /// 按位置把画像、问题、回答组合为访谈记录
    fn create_interviews(
        personas: &[Persona],
        questions: Vec<String>,
        answers: Vec<String>,
    ) -> Vec<Interview> {
        if questions.len() != personas.len() || answers.len() != personas.len() {
            warn!(
                "批量结果数量不一致（画像{}，问题{}，回答{}），按最短序列截断",
                personas.len(),
                questions.len(),
                answers.len()
            );
        }

        personas
            .iter()
            .zip(questions)
            .zip(answers)
            .map(|((persona, question), answer)| Interview::new(persona.clone(), question, answer))
            .collect()
    }
}
