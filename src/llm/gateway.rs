use async_trait::async_trait;

use crate::utils::threads::do_parallel_with_limit;

/// 未配置时批量调用的默认并发数
pub const DEFAULT_MAX_PARALLELS: usize = 4;

/// 一次模型调用的输入
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    /// 系统提示词
    pub system: String,
    /// 用户提示词
    pub user: String,
    /// 发起调用的智能体标识，用于日志
    pub log_tag: String,
}

impl Prompt {
    pub fn new(
        system: impl Into<String>,
        user: impl Into<String>,
        log_tag: impl Into<String>,
    ) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            log_tag: log_tag.into(),
        }
    }
}

/// 模型网关错误
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// 单次调用超过配置的超时时间
    #[error("model call timed out after {seconds}s")]
    Timeout { seconds: u64 },
    /// 网络、鉴权、限流等服务端错误
    #[error("model provider error: {0}")]
    Provider(String),
    /// rig在补全过程中返回的错误
    #[error("model completion failed: {0}")]
    Completion(#[from] rig::completion::PromptError),
    /// 无法按配置构建provider客户端
    #[error("invalid model client configuration: {0}")]
    Client(String),
}

impl GatewayError {
    /// 超时可以由调用方决定是否重试，其余错误视为致命
    pub fn is_retryable(&self) -> bool {
        matches!(self, GatewayError::Timeout { .. })
    }
}

/// 文本补全能力
///
/// `complete_batch` 的返回值与输入等长且顺序一致；任一调用失败则整个批次失败。
#[async_trait]
pub trait ModelGateway: Send + Sync {
    async fn complete(&self, prompt: &Prompt) -> Result<String, GatewayError>;

    async fn complete_batch(&self, prompts: &[Prompt]) -> Result<Vec<String>, GatewayError> {
        let futures: Vec<_> = prompts.iter().map(|prompt| self.complete(prompt)).collect();
        do_parallel_with_limit(futures, self.max_parallels())
            .await
            .into_iter()
            .collect()
    }

    /// 批量调用的最大并发数
    fn max_parallels(&self) -> usize {
        DEFAULT_MAX_PARALLELS
    }
}
