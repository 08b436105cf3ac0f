use serde::{Deserialize, Serialize};

/// 调研对象（消费者画像）
///
/// 只由画像合成智能体生成，生成后不再修改。没有持久ID，身份由在序列中的位置决定；
/// 不同轮次之间出现重复画像是合法的。
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Persona {
    /// 名字
    pub name: String,
    /// 背景
    pub background: String,
    /// 年代，例如 "30代"
    #[serde(rename = "age")]
    pub age_bracket: String,
    /// 性别
    pub gender: String,
    /// 职业或在公司中的职位
    #[serde(rename = "position")]
    pub role: String,
}

impl Persona {
    pub fn new(
        name: impl Into<String>,
        background: impl Into<String>,
        age_bracket: impl Into<String>,
        gender: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            background: background.into(),
            age_bracket: age_bracket.into(),
            gender: gender.into(),
            role: role.into(),
        }
    }

    /// 提示词中使用的简短身份描述：`名字 - 背景`
    pub fn headline(&self) -> String {
        format!("{} - {}", self.name, self.background)
    }
}
