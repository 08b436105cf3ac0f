use serde::{Deserialize, Serialize};

use super::persona::Persona;

/// 一次访谈记录：一个画像、一个问题、一个回答
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Interview {
    /// 受访画像的副本
    pub persona: Persona,
    pub question: String,
    pub answer: String,
}

impl Interview {
    pub fn new(persona: Persona, question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            persona,
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// 以评估和报告提示词使用的格式输出本条访谈
    pub fn to_prompt_block(&self) -> String {
        format!(
            "調査対象: {}\n質問: {}\n回答: {}",
            self.persona.headline(),
            self.question,
            self.answer
        )
    }
}

/// 信息充分性评估结果，仅用于决定是否继续迭代，不进入最终输出
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EvaluationResult {
    /// 判断理由
    pub reason: String,
    /// 信息是否充分
    pub is_sufficient: bool,
}
