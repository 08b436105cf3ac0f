use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// 默认配置文件名，位于当前工作目录
pub const DEFAULT_CONFIG_FILE: &str = "persona-research.toml";

/// LLM Provider类型
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub enum LLMProvider {
    #[serde(rename = "openai")]
    #[default]
    OpenAI,
    #[serde(rename = "deepseek")]
    DeepSeek,
    #[serde(rename = "anthropic")]
    Anthropic,
    #[serde(rename = "ollama")]
    Ollama,
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::OpenAI => write!(f, "openai"),
            LLMProvider::DeepSeek => write!(f, "deepseek"),
            LLMProvider::Anthropic => write!(f, "anthropic"),
            LLMProvider::Ollama => write!(f, "ollama"),
        }
    }
}

impl LLMProvider {
    /// 未配置 `api_base_url` 时使用的地址
    pub fn default_base_url(&self) -> &'static str {
        match self {
            LLMProvider::OpenAI => "https://api.openai.com/v1",
            LLMProvider::DeepSeek => "https://api.deepseek.com",
            LLMProvider::Anthropic => "https://api.anthropic.com",
            LLMProvider::Ollama => "http://localhost:11434",
        }
    }
}

impl std::str::FromStr for LLMProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(LLMProvider::OpenAI),
            "deepseek" => Ok(LLMProvider::DeepSeek),
            "anthropic" => Ok(LLMProvider::Anthropic),
            "ollama" => Ok(LLMProvider::Ollama),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

/// 每轮访谈的对象范围
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterviewScope {
    /// 访谈截至当前轮累计的全部画像（早期画像每轮都会被重新访谈）
    #[serde(rename = "accumulated")]
    #[default]
    Accumulated,
    /// 只访谈本轮新生成的画像
    #[serde(rename = "latest_batch")]
    LatestBatch,
}

impl std::fmt::Display for InterviewScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InterviewScope::Accumulated => write!(f, "accumulated"),
            InterviewScope::LatestBatch => write!(f, "latest_batch"),
        }
    }
}

impl std::str::FromStr for InterviewScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "accumulated" | "all" => Ok(InterviewScope::Accumulated),
            "latest_batch" | "latest" => Ok(InterviewScope::LatestBatch),
            _ => Err(format!("Unknown interview scope: {}", s)),
        }
    }
}

/// 配置校验错误
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("subjects_per_iteration must be at least 1")]
    NoSubjects,
    #[error("max_iterations must be at least 1")]
    NoIterations,
    #[error("max_parallels must be at least 1")]
    NoParallelism,
    #[error("temperature must be within 0.0..=2.0, got {0}")]
    TemperatureOutOfRange(f64),
}

/// 应用程序配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct Config {
    /// Excel输出目录
    pub output_dir: PathBuf,

    /// 调研迭代配置
    pub research: ResearchConfig,

    /// LLM模型配置
    pub llm: LLMConfig,

    /// HTTP服务配置
    pub server: ServerConfig,

    /// 是否启用详细日志
    pub verbose: bool,
}

/// 调研迭代配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ResearchConfig {
    /// 每轮生成的调研对象数量
    pub subjects_per_iteration: usize,

    /// 最大迭代次数
    pub max_iterations: usize,

    pub interview_scope: InterviewScope,
}

/// LLM模型配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LLMConfig {
    /// LLM Provider类型
    pub provider: LLMProvider,

    /// LLM API KEY
    pub api_key: String,

    /// LLM API基地址，为空时使用provider的默认地址
    pub api_base_url: String,

    /// 模型名称
    pub model: String,

    /// 最大tokens
    pub max_tokens: u32,

    /// 温度
    pub temperature: f64,

    /// 单次模型调用的超时时间（秒）
    pub timeout_seconds: u64,

    /// 批量调用时的最大并发数
    pub max_parallels: usize,
}

/// HTTP服务配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    /// 监听地址
    pub bind_address: String,
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut file =
            File::open(path).context(format!("Failed to open config file: {:?}", path))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// 校验数值配置，确保迭代循环至少执行一轮
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.research.subjects_per_iteration == 0 {
            return Err(ConfigError::NoSubjects);
        }
        if self.research.max_iterations == 0 {
            return Err(ConfigError::NoIterations);
        }
        if self.llm.max_parallels == 0 {
            return Err(ConfigError::NoParallelism);
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::TemperatureOutOfRange(self.llm.temperature));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            research: ResearchConfig::default(),
            llm: LLMConfig::default(),
            server: ServerConfig::default(),
            verbose: false,
        }
    }
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            subjects_per_iteration: 10,
            max_iterations: 2,
            interview_scope: InterviewScope::default(),
        }
    }
}

impl LLMConfig {
    /// 实际请求的API地址，去掉末尾的 `/`
    pub fn resolved_base_url(&self) -> String {
        match self.api_base_url.trim() {
            "" => self.provider.default_base_url().to_string(),
            url => url.trim_end_matches('/').to_string(),
        }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::default(),
            api_key: std::env::var("OPENAI_API_KEY").unwrap_or_default(),
            api_base_url: String::new(),
            model: String::from("gpt-4-turbo-preview"),
            max_tokens: 4096,
            temperature: 0.7,
            timeout_seconds: 120,
            max_parallels: 5,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: String::from("0.0.0.0:8000"),
        }
    }
}

// Include tests
#[cfg(test)]
mod tests;
