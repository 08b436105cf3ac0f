//! LLM客户端 - 基于rig的模型网关实现

use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::config::LLMConfig;
use crate::llm::gateway::{GatewayError, ModelGateway, Prompt};

mod providers;

use providers::{AgentSettings, ProviderClient};

/// LLM客户端 - 无状态，可以在并发请求之间共享
#[derive(Clone)]
pub struct LLMClient {
    config: LLMConfig,
    client: ProviderClient,
}

impl LLMClient {
    /// 创建新的LLM客户端
    pub fn new(config: LLMConfig) -> Result<Self> {
        let client = ProviderClient::connect(&config)?;
        Ok(Self { config, client })
    }

    /// 检查模型连接和功能是否正常
    pub async fn check_connection(&self) -> Result<(), GatewayError> {
        info!(provider = %self.config.provider, model = %self.config.model, "正在检查模型连接...");
        let ping = Prompt::new("You are a helpful assistant.", "Hello", "connection_check");
        match self.complete(&ping).await {
            Ok(_) => {
                info!("模型连接正常");
                Ok(())
            }
            Err(e) => {
                error!("模型连接失败: {}", e);
                Err(e)
            }
        }
    }
}

#[async_trait]
impl ModelGateway for LLMClient {
    async fn complete(&self, prompt: &Prompt) -> Result<String, GatewayError> {
        let agent = self
            .client
            .agent(&AgentSettings::new(&self.config, &prompt.system));
        let seconds = self.config.timeout_seconds;

        debug!(tag = %prompt.log_tag, chars = prompt.user.len(), "调用模型服务");
        match tokio::time::timeout(Duration::from_secs(seconds), agent.complete(&prompt.user))
            .await
        {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => {
                error!(tag = %prompt.log_tag, "调用模型服务出错: {}", e);
                Err(e)
            }
            Err(_) => {
                error!(tag = %prompt.log_tag, "调用模型服务超时 ({}s)", seconds);
                Err(GatewayError::Timeout { seconds })
            }
        }
    }

    fn max_parallels(&self) -> usize {
        self.config.max_parallels
    }
}
