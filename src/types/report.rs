use std::fmt::Display;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{interview::Interview, persona::Persona};

/// 迭代终止原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// 评估智能体判定信息已充分
    Sufficient,
    /// 达到最大迭代次数
    Exhausted,
}

impl Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::Sufficient => write!(f, "sufficient"),
            StopReason::Exhausted => write!(f, "exhausted"),
        }
    }
}

/// 一次完整调研运行的最终产物
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutcome {
    /// 调研报告正文
    #[serde(rename = "summary")]
    pub report: String,
    /// 导出的Excel文件路径
    pub excel_path: PathBuf,
    /// 全部轮次累计的访谈
    pub interviews: Vec<Interview>,
    /// 仅最后一轮生成的画像
    pub personas: Vec<Persona>,
    /// 实际执行的迭代轮数
    pub iterations: usize,
    pub stop_reason: StopReason,
}

/// `POST /generate-interview` 的响应体
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterviewResponse {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub interviews: Vec<Interview>,
    #[serde(default)]
    pub personas: Vec<Persona>,
}

/// 调研结果载荷：要么是结构化结果，要么是无法解析的原始文本
#[derive(Debug, Clone, PartialEq)]
pub enum ReportPayload {
    Parsed(InterviewResponse),
    RawText(String),
}

impl ReportPayload {
    /// 尝试按JSON解析，失败或缺少 `summary` 时整段文本作为原始报告保留
    pub fn from_model_output(text: &str) -> Self {
        match serde_json::from_str::<InterviewResponse>(text.trim()) {
            Ok(parsed) if !parsed.summary.is_empty() => ReportPayload::Parsed(parsed),
            _ => ReportPayload::RawText(text.to_string()),
        }
    }

    pub fn into_interview_response(self) -> InterviewResponse {
        match self {
            ReportPayload::Parsed(response) => response,
            ReportPayload::RawText(summary) => InterviewResponse {
                summary,
                ..Default::default()
            },
        }
    }
}

/// 报告文本在这里解码：模型按JSON输出时取其字段，缺失的访谈与画像由运行结果补齐
impl From<RunOutcome> for InterviewResponse {
    fn from(outcome: RunOutcome) -> Self {
        let mut response =
            ReportPayload::from_model_output(&outcome.report).into_interview_response();
        if response.interviews.is_empty() {
            response.interviews = outcome.interviews;
        }
        if response.personas.is_empty() {
            response.personas = outcome.personas;
        }
        response
    }
}
