//! 模型输出解码器
//!
//! 两种文本格式各自只有一个解码入口：
//! - 画像行：`名前,背景,年代,性別,職業`，每行一个画像
//! - 评估结果：`reason: ...` 与 `is_sufficient: true|false` 两个带标签的行

use tracing::warn;

use crate::types::{EvaluationResult, Persona};

/// 画像行的字段数
pub const PERSONA_FIELD_COUNT: usize = 5;

const REASON_LABEL: &str = "reason:";
const SUFFICIENT_LABEL: &str = "is_sufficient:";

/// 单行解码错误
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("expected {expected} comma-separated fields, found {found}")]
    FieldCount { expected: usize, found: usize },
}

/// 解码一行画像记录，字段去除首尾空白
pub fn parse_persona_line(line: &str) -> Result<Persona, DecodeError> {
    let fields: Vec<&str> = line.trim().split(',').map(str::trim).collect();
    match fields.as_slice() {
        [name, background, age_bracket, gender, role] => {
            Ok(Persona::new(*name, *background, *age_bracket, *gender, *role))
        }
        _ => Err(DecodeError::FieldCount {
            expected: PERSONA_FIELD_COUNT,
            found: fields.len(),
        }),
    }
}

/// 解码整段画像输出；空行跳过，格式错误的行记录警告后丢弃
pub fn parse_personas(text: &str) -> Vec<Persona> {
    let mut personas = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_persona_line(line) {
            Ok(persona) => personas.push(persona),
            Err(e) => warn!("跳过无效的画像行 `{}`: {}", line.trim(), e),
        }
    }
    personas
}

/// 解码评估输出
///
/// 找不到对应标签时 `reason` 为空、`is_sufficient` 为false；同一标签出现多次时以最后一次为准。
pub fn parse_evaluation(text: &str) -> EvaluationResult {
    let mut result = EvaluationResult::default();
    for line in text.lines() {
        let line = line.trim();
        if let Some(reason) = line.strip_prefix(REASON_LABEL) {
            result.reason = reason.trim().to_string();
        } else if let Some(value) = line.strip_prefix(SUFFICIENT_LABEL) {
            result.is_sufficient = value.trim().eq_ignore_ascii_case("true");
        }
    }
    result
}
