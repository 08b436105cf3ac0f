//! rig provider适配层：按配置连接到具体的模型服务

use rig::{agent::Agent, client::CompletionClient, completion::Prompt};
use rig::providers::{anthropic, deepseek, ollama, openai};
use tracing::debug;

use crate::config::{LLMConfig, LLMProvider};
use crate::llm::gateway::GatewayError;

/// 已连接到某个模型服务的rig客户端
#[derive(Clone)]
pub enum ProviderClient {
    OpenAI(openai::Client),
    DeepSeek(deepseek::Client),
    Anthropic(anthropic::Client),
    Ollama(ollama::Client),
}

/// 单次调用的智能体参数
pub struct AgentSettings<'a> {
    pub model: &'a str,
    pub preamble: &'a str,
    pub max_tokens: u64,
    pub temperature: f64,
}

impl<'a> AgentSettings<'a> {
    pub fn new(config: &'a LLMConfig, preamble: &'a str) -> Self {
        Self {
            model: &config.model,
            preamble,
            max_tokens: config.max_tokens.into(),
            temperature: config.temperature,
        }
    }
}

impl ProviderClient {
    /// 所有provider都使用 `LLMConfig::resolved_base_url` 作为请求地址
    pub fn connect(config: &LLMConfig) -> Result<Self, GatewayError> {
        let base_url = config.resolved_base_url();
        let api_key = config.api_key.as_str();
        debug!(provider = %config.provider, %base_url, "创建模型客户端");

        let client = match config.provider {
            LLMProvider::OpenAI => Self::OpenAI(
                openai::Client::builder(api_key)
                    .base_url(&base_url)
                    .build(),
            ),
            LLMProvider::DeepSeek => Self::DeepSeek(
                deepseek::Client::builder(api_key)
                    .base_url(&base_url)
                    .build(),
            ),
            LLMProvider::Anthropic => Self::Anthropic(
                anthropic::ClientBuilder::new(api_key)
                    .base_url(&base_url)
                    .build()
                    .map_err(|e| GatewayError::Client(e.to_string()))?,
            ),
            // 本地Ollama服务不做鉴权，api_key不参与请求
            LLMProvider::Ollama => {
                Self::Ollama(ollama::Client::builder().base_url(&base_url).build())
            }
        };
        Ok(client)
    }

    pub fn agent(&self, settings: &AgentSettings<'_>) -> ProviderAgent {
        match self {
            // OpenAI兼容服务统一走chat completions接口
            Self::OpenAI(client) => ProviderAgent::OpenAI(
                client
                    .completion_model(settings.model)
                    .completions_api()
                    .into_agent_builder()
                    .preamble(settings.preamble)
                    .max_tokens(settings.max_tokens)
                    .temperature(settings.temperature)
                    .build(),
            ),
            Self::DeepSeek(client) => ProviderAgent::DeepSeek(
                client
                    .agent(settings.model)
                    .preamble(settings.preamble)
                    .max_tokens(settings.max_tokens)
                    .temperature(settings.temperature)
                    .build(),
            ),
            Self::Anthropic(client) => ProviderAgent::Anthropic(
                client
                    .agent(settings.model)
                    .preamble(settings.preamble)
                    .max_tokens(settings.max_tokens)
                    .temperature(settings.temperature)
                    .build(),
            ),
            Self::Ollama(client) => ProviderAgent::Ollama(
                client
                    .agent(settings.model)
                    .preamble(settings.preamble)
                    .max_tokens(settings.max_tokens)
                    .temperature(settings.temperature)
                    .build(),
            ),
        }
    }
}

pub enum ProviderAgent {
    OpenAI(Agent<openai::CompletionModel>),
    DeepSeek(Agent<deepseek::CompletionModel>),
    Anthropic(Agent<anthropic::completion::CompletionModel>),
    Ollama(Agent<ollama::CompletionModel<reqwest::Client>>),
}

impl ProviderAgent {
    /// 单轮补全，不使用工具
    pub async fn complete(&self, user: &str) -> Result<String, GatewayError> {
        let output = match self {
            Self::OpenAI(agent) => agent.prompt(user).await,
            Self::DeepSeek(agent) => agent.prompt(user).await,
            Self::Anthropic(agent) => agent.prompt(user).await,
            Self::Ollama(agent) => agent.prompt(user).await,
        }?;
        Ok(output)
    }
}
