use std::sync::Arc;

use anyhow::Result;

use crate::{
    config::Config,
    llm::{LLMClient, ModelGateway},
};

/// 一次调研运行所需的协作者
///
/// 只持有无状态的模型网关与只读配置，可以在并发请求之间克隆共享；
/// 迭代过程中的可变状态由各自的 `RunController` 独占。
#[derive(Clone)]
pub struct GeneratorContext {
    /// 模型网关，用于与AI通信。
    pub gateway: Arc<dyn ModelGateway>,
    /// 配置
    pub config: Config,
}

impl GeneratorContext {
    /// 按配置创建基于rig的生成器上下文
    pub fn new(config: Config) -> Result<Self> {
        let client = LLMClient::new(config.llm.clone())?;
        Ok(Self::with_gateway(config, Arc::new(client)))
    }

    /// 使用指定的模型网关创建上下文
    pub fn with_gateway(config: Config, gateway: Arc<dyn ModelGateway>) -> Self {
        Self { gateway, config }
    }
}
