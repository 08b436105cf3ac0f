// HTTP服务：每个请求构建独立的RunController，仅共享无状态的模型网关与只读配置

mod error;
mod handlers;

pub use error::ApiError;
pub use handlers::{
    DocumentationRequest, ExportedFile, InterviewRequest, create_router, health_check,
};

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::generator::context::GeneratorContext;
use crate::llm::ModelGateway;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub gateway: Arc<dyn ModelGateway>,
}

impl AppState {
    pub fn new(config: Config, gateway: Arc<dyn ModelGateway>) -> Self {
        Self {
            config: Arc::new(config),
            gateway,
        }
    }

    /// 为单个请求构建生成器上下文
    pub fn context(&self) -> GeneratorContext {
        GeneratorContext::with_gateway(self.config.as_ref().clone(), self.gateway.clone())
    }
}

/// 启动HTTP服务，Ctrl-C时优雅退出
pub async fn serve(config: Config) -> Result<()> {
    config.validate()?;
    let addr: SocketAddr = config
        .server
        .bind_address
        .parse()
        .with_context(|| format!("无效的监听地址: {}", config.server.bind_address))?;

    let context = GeneratorContext::new(config.clone())?;
    let app = create_router(AppState::new(config, context.gateway));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("无法绑定地址: {}", addr))?;
    info!("🌐 调研服务已启动: http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("收到退出信号，正在停止服务...");
        })
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests;
